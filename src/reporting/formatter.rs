use crate::agents::display_name;
use crate::catalog::BugCatalog;
use crate::models::{EvaluationReport, RadarEntry};
use crate::utils::formatting::{format_bar, format_percent};

const BAR_WIDTH: usize = 30;

/// Plain-text summary, frameworks in ranking order.
pub fn format_summary(report: &EvaluationReport) -> String {
    let mut out = String::new();
    out.push_str("=== AGENT EVALUATION SUMMARY ===\n");
    out.push_str(&format!("Codebase: {}\n", report.codebase));
    out.push_str(&format!("Total bugs in codebase: {}\n", report.known_bugs.len()));
    out.push_str("\nPerformance by agent:\n");

    for row in &report.ranking {
        let Some(metrics) = report.metrics_for(&row.framework) else {
            continue;
        };
        out.push_str(&format!("\n{}:\n", metrics.framework));
        out.push_str(&format!(
            "  Unique bugs found: {} / {}\n",
            metrics.unique_bugs_found, metrics.total_known_bugs
        ));
        out.push_str(&format!("  Recall: {}\n", format_percent(metrics.recall)));
        out.push_str(&format!("  Total matched bugs: {}\n", metrics.bugs_found));
        out.push_str(&format!("  Unmatched bugs: {}\n", metrics.unmatched_bugs));
        if let Some(error) = &metrics.error {
            out.push_str(&format!("  Error: {}\n", error));
        }
    }
    out
}

/// Ranking as a markdown table.
pub fn format_markdown_table(report: &EvaluationReport) -> String {
    let mut out = String::from(
        "| Rank | Framework | Unique found | Recall | Matched | Unmatched | Status |\n|---|---|---|---|---|---|---|\n",
    );
    for (i, row) in report.ranking.iter().enumerate() {
        let metrics = report.metrics_for(&row.framework);
        let unique = metrics.map_or(0, |m| m.unique_bugs_found);
        let total = metrics.map_or(report.known_bugs.len(), |m| m.total_known_bugs);
        let status = match metrics.and_then(|m| m.error.as_deref()) {
            Some(_) => "failed",
            None => "ok",
        };
        out.push_str(&format!(
            "| {} | {} | {} / {} | {} | {} | {} | {} |\n",
            i + 1,
            row.framework,
            unique,
            total,
            format_percent(row.recall),
            row.bugs_found,
            row.unmatched_bugs,
            status,
        ));
    }
    out
}

/// Text renderings of the bar and radar chart inputs.
pub fn format_charts(report: &EvaluationReport) -> String {
    let mut out = String::from("Recall by framework\n");
    let label_width = report.charts.bar.iter()
        .map(|b| display_name(&b.framework).chars().count())
        .max()
        .unwrap_or(0);

    for entry in &report.charts.bar {
        out.push_str(&format!(
            "  {:<width$}  {} {:>6.2}%  ({}/{})\n",
            display_name(&entry.framework),
            format_bar(entry.recall_percent / 100.0, BAR_WIDTH),
            entry.recall_percent,
            entry.unique_bugs_found,
            entry.total_known_bugs,
            width = label_width,
        ));
    }

    if !report.charts.radar.is_empty() {
        out.push_str("\nNormalized comparison\n");
        out.push_str(&format!("  {:<width$}", "", width = label_width));
        for axis in RadarEntry::AXES {
            out.push_str(&format!("  {:>14}", axis));
        }
        out.push('\n');
        for entry in &report.charts.radar {
            out.push_str(&format!("  {:<width$}", display_name(&entry.framework), width = label_width));
            for value in entry.values() {
                out.push_str(&format!("  {:>14.2}", value));
            }
            out.push('\n');
        }
    }
    out
}

/// One line per known bug: `N. file (line L): description`.
pub fn format_catalog_listing(catalog: &BugCatalog) -> String {
    let mut out = format!("Found {} bugs in {}:\n", catalog.count(), catalog.codebase());
    for (i, bug) in catalog.all_bugs().iter().enumerate() {
        out.push_str(&format!("{}. {} (line {}): {}\n", i + 1, bug.file, bug.line, bug.description));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::EvaluationHarness;
    use crate::models::{AgentOutcome, KnownBug};
    use crate::scoring::Scorer;

    fn catalog() -> BugCatalog {
        BugCatalog::new("test_codebase", vec![
            KnownBug::new("src/cache.py", 44, "Should remove expired entry but doesn't"),
            KnownBug::new("src/models.py", 12, "Missing validation for negative quantity"),
        ])
    }

    fn report() -> EvaluationReport {
        EvaluationHarness::new(catalog(), Scorer::default()).score_outcomes(vec![
            AgentOutcome::failed("autogen", "Process timed out"),
            AgentOutcome::succeeded("langchain", "src/cache.py: should remove expired entry but doesn't"),
        ])
    }

    #[test]
    fn test_summary_in_ranking_order() {
        let text = format_summary(&report());
        assert!(text.contains("Total bugs in codebase: 2"));
        let langchain = text.find("langchain:").unwrap();
        let autogen = text.find("autogen:").unwrap();
        assert!(langchain < autogen);
        assert!(text.contains("Recall: 50.00%"));
        assert!(text.contains("Error: Process timed out"));
    }

    #[test]
    fn test_markdown_table() {
        let table = format_markdown_table(&report());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "| 1 | langchain | 1 / 2 | 50.00% | 1 | 0 | ok |");
        assert_eq!(lines[3], "| 2 | autogen | 0 / 2 | 0.00% | 0 | 0 | failed |");
    }

    #[test]
    fn test_charts_skip_failed_radar() {
        let text = format_charts(&report());
        assert!(text.contains("LangChain"));
        assert!(text.contains("AutoGen"));
        let radar = text.split("Normalized comparison").nth(1).unwrap();
        assert!(radar.contains("LangChain"));
        assert!(!radar.contains("AutoGen"));
    }

    #[test]
    fn test_catalog_listing() {
        let text = format_catalog_listing(&catalog());
        assert!(text.starts_with("Found 2 bugs in test_codebase:\n"));
        assert!(text.contains("1. src/cache.py (line 44): Should remove expired entry but doesn't\n"));
        assert!(text.contains("2. src/models.py (line 12): Missing validation for negative quantity\n"));
    }
}
