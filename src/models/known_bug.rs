use serde::{Deserialize, Serialize};

/// A ground-truth defect seeded into a benchmark codebase.
///
/// Identity is the `(file, line)` pair; `description` is what agent
/// reports are matched against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KnownBug {
    /// Path relative to the codebase root, `/`-separated.
    pub file: String,
    /// 1-based line of the seeded defect.
    pub line: u32,
    pub description: String,
}

impl KnownBug {
    pub fn new(file: impl Into<String>, line: u32, description: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            description: description.into(),
        }
    }

    /// `file:line` form used in logs and listings.
    pub fn location(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

impl std::fmt::Display for KnownBug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (line {}): {}", self.file, self.line, self.description)
    }
}
