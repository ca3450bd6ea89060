//! File name similarity.
//!
//! Two files are compared by the subwords of their stems: `StringRef.cpp`
//! has the subwords `String` and `Ref`. The longest run of subwords shared
//! by both names is rewarded, every other subword is penalized, and living
//! in the same directory earns a bonus.

use std::path::Path;

/// Bonus for two files in the same directory.
pub const SAME_DIRECTORY_BONUS: i32 = 50;

/// Weight of one subword, gained when shared and lost when not.
pub const SUBWORD_WEIGHT: i32 = 10;

/// Splits a name into subwords.
///
/// Any character outside `[A-Za-z0-9]` separates words; inside a word a
/// lowercase letter or digit followed by an uppercase letter starts a new
/// subword, as does the last capital of an acronym followed by a lowercase
/// letter or digit (`NSString` gives `NS`, `String`).
pub fn subword_split(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    for part in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        let bytes = part.as_bytes();
        let mut start = 0;
        for i in 1..bytes.len() {
            let (prev, cur) = (bytes[i - 1], bytes[i]);
            let next = bytes.get(i + 1).copied();
            let lower_to_upper = (prev.is_ascii_lowercase() || prev.is_ascii_digit())
                && cur.is_ascii_uppercase();
            let acronym_end = prev.is_ascii_uppercase()
                && cur.is_ascii_uppercase()
                && next.is_some_and(|n| n.is_ascii_lowercase() || n.is_ascii_digit());
            if lower_to_upper || acronym_end {
                words.push(&part[start..i]);
                start = i;
            }
        }
        if start < part.len() {
            words.push(&part[start..]);
        }
    }
    words
}

/// Length of the longest contiguous run of equal items in `a` and `b`.
pub fn longest_common_run<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let mut best = 0;
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            cur[j + 1] = if x == y { prev[j] + 1 } else { 0 };
            best = best.max(cur[j + 1]);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

fn stem_and_dir(path: &Path) -> (Option<&Path>, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (path.parent(), stem)
}

/// Scores how alike two files are. Higher is more alike; may be negative.
///
/// Both paths are expected absolute and normalized.
pub fn score(a: &Path, b: &Path) -> i32 {
    let (a_dir, a_stem) = stem_and_dir(a);
    let (b_dir, b_stem) = stem_and_dir(b);
    let a_words = subword_split(&a_stem);
    let b_words = subword_split(&b_stem);

    let common = longest_common_run(&a_words, &b_words) as i32;
    let mismatched = (a_words.len() + b_words.len()) as i32 - 2 * common;
    let mut score = SUBWORD_WEIGHT * common - SUBWORD_WEIGHT * mismatched;
    if a_dir == b_dir {
        score += SAME_DIRECTORY_BONUS;
    }
    score
}
