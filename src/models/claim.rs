use serde::{Deserialize, Serialize};
use super::known_bug::KnownBug;

/// One candidate bug report cut out of an agent's free-text response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Position among the claims of the response, in order of appearance.
    pub index: usize,
    pub text: String,
    /// 1-based line of the response where the claim starts.
    pub start_line: usize,
    /// File/line the claim points at, when it names one.
    pub location: Option<ClaimLocation>,
}

/// Source location mentioned inside a claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimLocation {
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl ClaimLocation {
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.line.is_none()
    }

    /// True when the reported path and the bug's path agree on their
    /// trailing components (`src/cache.py` agrees with `cache.py`).
    pub fn file_agrees(&self, bug: &KnownBug) -> bool {
        let Some(reported) = self.file.as_deref() else { return false };
        let reported = normalize_path(reported);
        let expected = normalize_path(&bug.file);
        if reported.is_empty() || expected.is_empty() {
            return false;
        }
        path_suffix_of(&reported, &expected) || path_suffix_of(&expected, &reported)
    }

    pub fn line_agrees(&self, bug: &KnownBug) -> bool {
        self.line == Some(bug.line)
    }
}

fn normalize_path(path: &str) -> String {
    let lowered = path.trim().replace('\\', "/").to_lowercase();
    lowered.trim_start_matches("./").to_string()
}

/// Whether `suffix` equals `path` or ends it at a `/` boundary.
fn path_suffix_of(suffix: &str, path: &str) -> bool {
    match path.strip_suffix(suffix) {
        Some("") => true,
        Some(rest) => rest.ends_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(file: Option<&str>, line: Option<u32>) -> ClaimLocation {
        ClaimLocation { file: file.map(str::to_string), line }
    }

    #[test]
    fn test_file_agrees_on_path_suffix() {
        let bug = KnownBug::new("src/cache.py", 44, "Should remove expired entry but doesn't");
        assert!(location(Some("cache.py"), None).file_agrees(&bug));
        assert!(location(Some("test_codebase/src/cache.py"), None).file_agrees(&bug));
        assert!(location(Some("./src/Cache.py"), None).file_agrees(&bug));
    }

    #[test]
    fn test_file_disagrees_on_partial_component() {
        let bug = KnownBug::new("src/cache.py", 44, "x");
        assert!(!location(Some("mycache.py"), None).file_agrees(&bug));
        assert!(!location(None, Some(44)).file_agrees(&bug));
    }

    #[test]
    fn test_line_agrees() {
        let bug = KnownBug::new("src/cache.py", 44, "x");
        assert!(location(None, Some(44)).line_agrees(&bug));
        assert!(!location(None, Some(45)).line_agrees(&bug));
    }
}
