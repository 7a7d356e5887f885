use serde::{Deserialize, Serialize};
use super::match_record::MatchType;

/// Placeholder description for claims that matched no known bug.
pub const UNKNOWN_BUG: &str = "UNKNOWN";

/// One entry of `found_bug_details`: a matched claim or an unmatched one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundBugDetail {
    /// Known-bug description, or `UNKNOWN` for an unmatched claim.
    pub known_bug: String,
    /// The claim text that produced this entry.
    pub agent_description: String,
    /// Catalog position of the known bug, `-1` for an unmatched claim.
    pub bug_index: i64,
    pub match_type: MatchType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_index: Option<usize>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub file_match: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub line_match: bool,
}

impl FoundBugDetail {
    pub fn is_unknown(&self) -> bool {
        self.bug_index < 0
    }
}

/// Scores for one framework in one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkMetrics {
    pub framework: String,
    pub total_known_bugs: usize,
    /// Matched records, counting repeat hits on the same known bug.
    pub bugs_found: usize,
    /// Distinct known bugs matched at least once.
    pub unique_bugs_found: usize,
    pub found_bug_details: Vec<FoundBugDetail>,
    /// `unique_bugs_found / total_known_bugs`, 0 for an empty catalog.
    pub recall: f64,
    /// Claims that matched no known bug.
    pub unmatched_bugs: usize,
    /// Catalog positions of known bugs no claim matched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missed_bug_indices: Vec<usize>,
    /// Share of matched records whose claim named the right line.
    #[serde(default)]
    pub line_match_rate: f64,
    /// Share of matched records whose claim named the right file.
    #[serde(default)]
    pub file_match_rate: f64,
    /// Set when the agent itself failed; all counts are then zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FrameworkMetrics {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Matched records over all records that reported something,
    /// 0 when the agent reported nothing.
    pub fn accuracy(&self) -> f64 {
        let reported = self.bugs_found + self.unmatched_bugs;
        if reported == 0 {
            0.0
        } else {
            self.bugs_found as f64 / reported as f64
        }
    }
}
