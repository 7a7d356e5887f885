use serde::{Deserialize, Serialize};

/// Which matching tier produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Keyword,
    None,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Keyword => "keyword",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One matcher decision.
///
/// Three shapes occur:
/// - a claim matched a known bug: `bug_index` and `claim_index` set, `matched`
/// - a claim matched nothing: `bug_index` absent, `match_type == None`
/// - a known bug no claim matched: `claim_index` absent, `!matched`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Position of the known bug in the catalog.
    pub bug_index: Option<usize>,
    pub claim_index: Option<usize>,
    pub claim_text: String,
    pub match_type: MatchType,
    pub matched: bool,
    /// The claim named the known bug's file.
    #[serde(default)]
    pub file_match: bool,
    /// The claim named the known bug's line.
    #[serde(default)]
    pub line_match: bool,
}

impl MatchRecord {
    pub fn unmatched_claim(claim_index: usize, claim_text: impl Into<String>) -> Self {
        Self {
            bug_index: None,
            claim_index: Some(claim_index),
            claim_text: claim_text.into(),
            match_type: MatchType::None,
            matched: false,
            file_match: false,
            line_match: false,
        }
    }

    pub fn missed_bug(bug_index: usize) -> Self {
        Self {
            bug_index: Some(bug_index),
            claim_index: None,
            claim_text: String::new(),
            match_type: MatchType::None,
            matched: false,
            file_match: false,
            line_match: false,
        }
    }

    pub fn is_unmatched_claim(&self) -> bool {
        self.bug_index.is_none()
    }
}
