//! On-disk cache files of complementer layers.
//!
//! Each complementer layer is stored as `<build-directory>/<name>.json` in
//! the regular JSON compilation database format, so that other tools can
//! read it too. A cache file is always rewritten in full.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::database::Database;
use crate::error::{DbError, DbResult};
use crate::json::JsonDatabase;
use crate::serialize::write_compile_commands;

/// Writes every compile command of `database` to `path`, replacing the file.
pub fn save_layer(path: &Path, database: &dyn Database) -> DbResult<()> {
    let io_err = |source| DbError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    write_compile_commands(BufWriter::new(file), database.all_compile_commands()?)
        .map_err(io_err)?;
    Ok(())
}

/// Opens a cache file, or returns `None` if it does not exist.
///
/// The file is not read until the returned database is first queried.
pub fn load_layer(path: &Path) -> Option<JsonDatabase> {
    path.is_file().then(|| JsonDatabase::new(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryDatabase;
    use crate::CompileCommand;

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headerdb.json");
        let db = InMemoryDatabase::from(vec![
            CompileCommand::new("/p", "a.hpp", ["cc", "-DA=1", "-c", "a.hpp"]),
            CompileCommand::new("/p", "b.hpp", ["cc", "-DB=\"x y\"", "-c", "b.hpp"]),
        ]);
        save_layer(&path, &db).unwrap();

        let loaded = load_layer(&path).unwrap();
        let commands: Vec<_> = loaded.all_compile_commands().unwrap().collect();
        assert_eq!(commands, db.commands());
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headerdb.json");
        std::fs::write(&path, "garbage that is not json").unwrap();
        save_layer(&path, &InMemoryDatabase::new()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[\n]\n");
    }

    #[test]
    fn load_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_layer(&dir.path().join("headerdb.json")).is_none());
    }

    #[test]
    fn save_into_missing_directory_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("headerdb.json");
        let err = save_layer(&path, &InMemoryDatabase::new()).unwrap_err();
        assert!(matches!(err, DbError::Io { .. }));
    }
}
