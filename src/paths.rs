//! Common directory prefix of result keys, used to shorten displayed paths.

use std::path::MAIN_SEPARATOR;

/// Prefix returned when the keys share no directory.
///
/// Trimming with this marker leaves keys untouched.
pub fn current_dir_marker() -> String {
    format!(".{}", MAIN_SEPARATOR)
}

/// Longest common directory prefix of `keys`, with a trailing separator.
///
/// Each key is split on the platform separator and its last segment (the file name)
/// is dropped. The prefix is the run of leading directory segments identical across
/// all keys; the comparison stops at the first position where any key disagrees,
/// so segments that happen to match again further along are never included.
///
/// - no keys, or nothing in common: the current-directory marker (`./`)
/// - a single key: that key's own directory
///
/// # Example
///
/// ```
/// use mvc_enumerator::paths::common_prefix;
///
/// let keys = ["a/b/c/X.cs", "a/b/d/Y.cs"];
/// assert_eq!(common_prefix(&keys), "a/b/");
/// ```
pub fn common_prefix<S: AsRef<str>>(keys: &[S]) -> String {
    let directories: Vec<Vec<&str>> = keys
        .iter()
        .map(|key| {
            let mut segments: Vec<&str> = key.as_ref().split(MAIN_SEPARATOR).collect();
            segments.pop();
            segments
        })
        .collect();

    let Some((first, rest)) = directories.split_first() else {
        return current_dir_marker();
    };

    let shared = first
        .iter()
        .enumerate()
        .take_while(|(index, segment)| {
            rest.iter()
                .all(|other| other.get(*index).is_some_and(|s| s == *segment))
        })
        .count();

    if shared == 0 {
        return current_dir_marker();
    }

    let separator = MAIN_SEPARATOR.to_string();
    let mut prefix = first[..shared].join(separator.as_str());
    prefix.push(MAIN_SEPARATOR);
    prefix
}

/// Strips `prefix` from `key` for display.
///
/// The current-directory marker is never stripped, and keys that do not start with
/// the prefix are returned unchanged.
pub fn trim_prefix(key: &str, prefix: &str) -> String {
    if prefix == current_dir_marker() {
        return key.to_string();
    }
    key.strip_prefix(prefix).unwrap_or(key).to_string()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefix_of_two_keys() {
        assert_eq!(common_prefix(&["a/b/c/X.cs", "a/b/d/Y.cs"]), "a/b/");
    }

    #[test]
    fn test_single_key_yields_its_directory() {
        assert_eq!(common_prefix(&["a/b/c/X.cs"]), "a/b/c/");
    }

    #[test]
    fn test_disjoint_keys_yield_marker() {
        assert_eq!(common_prefix(&["a/b/X.cs", "z/y/X.cs"]), "./");
    }

    #[test]
    fn test_no_keys_yield_marker() {
        let keys: [&str; 0] = [];
        assert_eq!(common_prefix(&keys), "./");
    }

    #[test]
    fn test_bare_file_names_yield_marker() {
        assert_eq!(common_prefix(&["X.cs"]), "./");
        assert_eq!(common_prefix(&["X.cs", "Y.cs"]), "./");
    }

    #[test]
    fn test_later_agreement_does_not_extend_prefix() {
        // Position 1 disagrees, positions 2 and 3 agree again.
        let keys = ["root/one/shared/deep/A.cs", "root/two/shared/deep/B.cs"];
        assert_eq!(common_prefix(&keys), "root/");
    }

    #[test]
    fn test_mismatch_in_any_key_stops_prefix() {
        let keys = [
            "src/web/api/A.cs",
            "src/web/api/B.cs",
            "src/web/mvc/C.cs",
            "src/web/api/D.cs",
        ];
        assert_eq!(common_prefix(&keys), "src/web/");
    }

    #[test]
    fn test_order_independent() {
        let forward = ["p/q/r/A.cs", "p/q/B.cs", "p/q/r/s/C.cs"];
        let backward = ["p/q/r/s/C.cs", "p/q/B.cs", "p/q/r/A.cs"];
        assert_eq!(common_prefix(&forward), "p/q/");
        assert_eq!(common_prefix(&backward), "p/q/");
    }

    #[test]
    fn test_file_name_never_part_of_prefix() {
        // Identical directories and identical file names in a shallower key
        let keys = ["a/b/X.cs", "a/b/X.cs/Y.cs"];
        assert_eq!(common_prefix(&keys), "a/b/");
    }

    #[test]
    fn test_absolute_paths() {
        let keys = ["/home/dev/app/Controllers/A.cs", "/home/dev/app/Api/B.cs"];
        assert_eq!(common_prefix(&keys), "/home/dev/app/");
    }

    #[test]
    fn test_trim_prefix() {
        assert_eq!(trim_prefix("a/b/c/X.cs", "a/b/"), "c/X.cs");
        assert_eq!(trim_prefix("./src/X.cs", "./"), "./src/X.cs");
        assert_eq!(trim_prefix("other/X.cs", "a/b/"), "other/X.cs");
    }
}
