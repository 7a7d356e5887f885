use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::catalog::BugCatalog;
use crate::models::{
    BarEntry, ChartInputs, FoundBugDetail, FrameworkMetrics, MatchRecord, RadarEntry,
    RankingRow, UNKNOWN_BUG,
};

/// Turns match records into metrics and metrics into comparisons.
pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Metrics for one framework from the matcher's records.
    pub fn aggregate(framework: &str, catalog: &BugCatalog, records: &[MatchRecord]) -> FrameworkMetrics {
        let total_known_bugs = catalog.count();
        let matched: Vec<&MatchRecord> = records.iter().filter(|r| r.matched).collect();
        let unique: BTreeSet<usize> = matched.iter().filter_map(|r| r.bug_index).collect();
        let unmatched_bugs = records.iter().filter(|r| r.is_unmatched_claim()).count();

        let found_bug_details = records
            .iter()
            .filter(|r| r.matched || r.is_unmatched_claim())
            .map(|r| detail(catalog, r))
            .collect();

        let missed_bug_indices = (0..total_known_bugs).filter(|i| !unique.contains(i)).collect();

        FrameworkMetrics {
            framework: framework.to_string(),
            total_known_bugs,
            bugs_found: matched.len(),
            unique_bugs_found: unique.len(),
            found_bug_details,
            recall: ratio(unique.len(), total_known_bugs),
            unmatched_bugs,
            missed_bug_indices,
            line_match_rate: ratio(matched.iter().filter(|r| r.line_match).count(), matched.len()),
            file_match_rate: ratio(matched.iter().filter(|r| r.file_match).count(), matched.len()),
            error: None,
        }
    }

    /// Metrics for a framework whose agent failed: zero findings plus the error.
    pub fn failure(framework: &str, catalog: &BugCatalog, error: &str) -> FrameworkMetrics {
        FrameworkMetrics {
            framework: framework.to_string(),
            total_known_bugs: catalog.count(),
            bugs_found: 0,
            unique_bugs_found: 0,
            found_bug_details: Vec::new(),
            recall: 0.0,
            unmatched_bugs: 0,
            missed_bug_indices: Vec::new(),
            line_match_rate: 0.0,
            file_match_rate: 0.0,
            error: Some(error.to_string()),
        }
    }

    /// Frameworks by descending recall, ties by ascending name.
    pub fn rank(metrics: &[FrameworkMetrics]) -> Vec<RankingRow> {
        let mut rows: Vec<RankingRow> = metrics
            .iter()
            .map(|m| RankingRow {
                framework: m.framework.clone(),
                recall: m.recall,
                bugs_found: m.bugs_found,
                unmatched_bugs: m.unmatched_bugs,
            })
            .collect();
        rows.sort_by(|a, b| match b.recall.total_cmp(&a.recall) {
            Ordering::Equal => a.framework.cmp(&b.framework),
            other => other,
        });
        rows
    }

    /// Inputs for the external bar and radar charts.
    pub fn chart_inputs(metrics: &[FrameworkMetrics]) -> ChartInputs {
        let bar = Self::rank(metrics)
            .iter()
            .filter_map(|row| metrics.iter().find(|m| m.framework == row.framework))
            .map(|m| BarEntry {
                framework: m.framework.clone(),
                recall_percent: m.recall * 100.0,
                unique_bugs_found: m.unique_bugs_found,
                total_known_bugs: m.total_known_bugs,
            })
            .collect();

        // Failed frameworks have nothing to plot on a shape chart.
        let scored: Vec<&FrameworkMetrics> = metrics.iter().filter(|m| !m.is_failure()).collect();
        let max_found = scored.iter().map(|m| m.bugs_found).max().unwrap_or(0);
        let max_unmatched = scored.iter().map(|m| m.unmatched_bugs).max().unwrap_or(0);

        let radar = scored
            .iter()
            .map(|m| RadarEntry {
                framework: m.framework.clone(),
                recall: m.recall,
                bugs_found: ratio(m.bugs_found, max_found),
                unmatched_bugs: ratio(m.unmatched_bugs, max_unmatched),
                accuracy: m.accuracy(),
                line_match: m.line_match_rate,
                file_match: m.file_match_rate,
            })
            .collect();

        ChartInputs { bar, radar }
    }
}

fn detail(catalog: &BugCatalog, record: &MatchRecord) -> FoundBugDetail {
    let known = record.bug_index.and_then(|i| catalog.get(i));
    FoundBugDetail {
        known_bug: known.map_or_else(|| UNKNOWN_BUG.to_string(), |b| b.description.clone()),
        agent_description: record.claim_text.clone(),
        bug_index: record.bug_index.map_or(-1, |i| i as i64),
        match_type: record.match_type,
        claim_index: record.claim_index,
        file_match: record.file_match,
        line_match: record.line_match,
    }
}

/// `part / whole`, 0 when `whole` is 0.
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
