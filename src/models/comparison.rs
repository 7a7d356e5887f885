use serde::{Deserialize, Serialize};

/// One row of the cross-framework ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub framework: String,
    pub recall: f64,
    pub bugs_found: usize,
    pub unmatched_bugs: usize,
}

/// Input for a recall bar chart, in ranking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarEntry {
    pub framework: String,
    pub recall_percent: f64,
    pub unique_bugs_found: usize,
    pub total_known_bugs: usize,
}

/// Input for a radar chart; every axis lies in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarEntry {
    pub framework: String,
    pub recall: f64,
    pub bugs_found: f64,
    pub unmatched_bugs: f64,
    pub accuracy: f64,
    pub line_match: f64,
    pub file_match: f64,
}

impl RadarEntry {
    pub const AXES: [&'static str; 6] = [
        "recall",
        "bugs_found",
        "unmatched_bugs",
        "accuracy",
        "line_match",
        "file_match",
    ];

    /// Axis values in `AXES` order.
    pub fn values(&self) -> [f64; 6] {
        [
            self.recall,
            self.bugs_found,
            self.unmatched_bugs,
            self.accuracy,
            self.line_match,
            self.file_match,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartInputs {
    pub bar: Vec<BarEntry>,
    pub radar: Vec<RadarEntry>,
}
