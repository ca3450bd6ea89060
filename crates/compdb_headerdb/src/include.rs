//! `#include` scanning and resolution.
//!
//! Scanning is textual: every line that starts with an `#include` directive
//! counts, whatever the surrounding conditional compilation says.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::options::implicit_search_path;

/// How the included file name was delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `#include "name"`
    Quoted,
    /// `#include <name>`
    Angled,
}

impl Delimiter {
    /// The opening and closing characters.
    pub fn chars(self) -> (char, char) {
        match self {
            Delimiter::Quoted => ('"', '"'),
            Delimiter::Angled => ('<', '>'),
        }
    }
}

/// One `#include` directive found in a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Include {
    /// The delimiter used around the name.
    pub delimiter: Delimiter,
    /// The name between the delimiters, as written.
    pub name: String,
}

impl Include {
    /// Creates an include directive.
    pub fn new(delimiter: Delimiter, name: impl Into<String>) -> Self {
        Self {
            delimiter,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Include {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (open, close) = self.delimiter.chars();
        write!(f, "{open}{}{close}", self.name)
    }
}

// Byte-oriented so that file names in legacy encodings still match.
static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?-u)^\s*#\s*include\s+(["<])(.+?)[">]"#).expect("include regex is valid")
});

/// Extracts the include directives of a file's contents, in file order.
///
/// Names are decoded as UTF-8, falling back to Latin-1.
pub fn parse_includes(contents: &[u8]) -> Vec<Include> {
    contents
        .split(|&b| b == b'\n')
        .filter_map(|line| INCLUDE_RE.captures(line))
        .map(|caps| {
            let delimiter = if &caps[1] == b"<" {
                Delimiter::Angled
            } else {
                Delimiter::Quoted
            };
            Include::new(delimiter, decode_name(&caps[2]))
        })
        .collect()
}

fn decode_name(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Reads a file and returns its include directives.
///
/// A file that cannot be read is logged and contributes nothing.
pub fn scan_includes(path: &Path) -> Vec<Include> {
    match std::fs::read(path) {
        Ok(contents) => parse_includes(&contents),
        Err(e) => {
            tracing::warn!("{}: {e}", compdb_common::friendly_path(path).display());
            Vec::new()
        }
    }
}

/// Finds the directory an include is found in.
///
/// Quoted includes are looked up next to `includer` first, then in
/// `search_paths`; angled includes only in `search_paths`. The first
/// directory where the file exists wins. Unresolved quoted includes are
/// logged as warnings, unresolved angled ones (usually system headers) at
/// debug level.
pub fn resolve_search_path<'a>(
    include: &Include,
    includer: &'a Path,
    search_paths: &'a [PathBuf],
) -> Option<&'a Path> {
    let implicit = match include.delimiter {
        Delimiter::Quoted => implicit_search_path(includer),
        Delimiter::Angled => None,
    };
    let found = implicit
        .into_iter()
        .chain(search_paths.iter().map(PathBuf::as_path))
        .find(|dir| dir.join(&include.name).is_file());

    let shown = || compdb_common::friendly_path(includer);
    match (found, include.delimiter) {
        (Some(_), _) => {
            tracing::debug!("{}: resolved header: {include}", shown().display());
        }
        (None, Delimiter::Quoted) => {
            tracing::warn!("{}: could not resolve header: {include}", shown().display());
        }
        (None, Delimiter::Angled) => {
            tracing::debug!("{}: could not resolve header: {include}", shown().display());
        }
    }
    found
}

/// Resolves an include to the normalized path of the included file.
pub fn resolve_include(
    include: &Include,
    includer: &Path,
    search_paths: &[PathBuf],
) -> Option<PathBuf> {
    resolve_search_path(include, includer, search_paths)
        .map(|dir| compdb_common::join_normalized(dir, Path::new(&include.name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_delimiters() {
        let src = b"#include \"a.hpp\"\n#include <vector>\nint x;\n";
        assert_eq!(
            parse_includes(src),
            vec![
                Include::new(Delimiter::Quoted, "a.hpp"),
                Include::new(Delimiter::Angled, "vector"),
            ]
        );
    }

    #[test]
    fn tolerates_whitespace() {
        let src = b"  #  include   <sys/types.h>\r\n\t#include\t\"x.h\" // trailing\n";
        assert_eq!(
            parse_includes(src),
            vec![
                Include::new(Delimiter::Angled, "sys/types.h"),
                Include::new(Delimiter::Quoted, "x.h"),
            ]
        );
    }

    #[test]
    fn ignores_non_directives() {
        let src = b"// #include \"commented.h\"\nint include = 1;\n#define X\n#include\n";
        assert!(parse_includes(src).is_empty());
    }

    #[test]
    fn scans_inside_disabled_blocks() {
        let src = b"#if 0\n#include \"never.h\"\n#endif\n";
        assert_eq!(parse_includes(src).len(), 1);
    }

    #[test]
    fn decodes_latin1_names() {
        let mut src = b"#include \"latin-1-".to_vec();
        src.push(0xe1);
        src.extend_from_slice(b".hpp\"\n");
        assert_eq!(parse_includes(&src)[0].name, "latin-1-\u{e1}.hpp");

        let utf8 = "#include \"utf-8-\u{e1}.hpp\"\n";
        assert_eq!(parse_includes(utf8.as_bytes())[0].name, "utf-8-\u{e1}.hpp");
    }

    #[test]
    fn display_restores_delimiters() {
        assert_eq!(Include::new(Delimiter::Quoted, "a.h").to_string(), "\"a.h\"");
        assert_eq!(Include::new(Delimiter::Angled, "a.h").to_string(), "<a.h>");
    }

    #[test]
    fn missing_file_has_no_includes() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_includes(&dir.path().join("gone.cpp")).is_empty());
    }

    #[test]
    fn quoted_prefers_includer_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::create_dir_all(root.join("include")).unwrap();
        std::fs::write(root.join("src/a.hpp"), "").unwrap();
        std::fs::write(root.join("include/a.hpp"), "").unwrap();
        let search = vec![root.join("include")];
        let includer = root.join("src/a.cpp");

        let quoted = Include::new(Delimiter::Quoted, "a.hpp");
        assert_eq!(
            resolve_include(&quoted, &includer, &search),
            Some(root.join("src/a.hpp"))
        );
        let angled = Include::new(Delimiter::Angled, "a.hpp");
        assert_eq!(
            resolve_include(&angled, &includer, &search),
            Some(root.join("include/a.hpp"))
        );
    }

    #[test]
    fn first_search_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for d in ["one", "two"] {
            std::fs::create_dir_all(root.join(d)).unwrap();
            std::fs::write(root.join(d).join("x.h"), "").unwrap();
        }
        let search = vec![root.join("missing"), root.join("two"), root.join("one")];
        let include = Include::new(Delimiter::Angled, "x.h");
        assert_eq!(
            resolve_search_path(&include, &root.join("a.c"), &search),
            Some(root.join("two").as_path())
        );
    }

    #[test]
    fn directories_do_not_resolve() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("vector")).unwrap();
        let include = Include::new(Delimiter::Quoted, "vector");
        assert_eq!(resolve_include(&include, &dir.path().join("a.cpp"), &[]), None);
    }

    #[test]
    fn resolved_path_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(root.join("common.h"), "").unwrap();
        let include = Include::new(Delimiter::Quoted, "../common.h");
        assert_eq!(
            resolve_include(&include, &root.join("src/a.c"), &[]),
            Some(root.join("common.h"))
        );
    }
}
