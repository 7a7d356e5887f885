use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::agents::normalize_framework_name;
use crate::catalog::BugCatalog;
use crate::cli::commands::ScoreArgs;
use crate::errors::BugbenchError;
use crate::harness::EvaluationHarness;
use crate::models::AgentOutcome;
use crate::reporting::format_summary;
use crate::scoring::Scorer;

pub async fn handle_score(args: ScoreArgs, quiet: bool) -> Result<(), BugbenchError> {
    let catalog = BugCatalog::load(Path::new(&args.catalog), &args.codebase)?;
    let content = tokio::fs::read_to_string(&args.outcomes).await?;
    let outcomes = parse_outcomes(&content)?;
    info!(outcomes = outcomes.len(), codebase = %catalog.codebase(), "Scoring saved outcomes");

    let report = EvaluationHarness::new(catalog, Scorer::default()).score_outcomes(outcomes);
    report.save(Path::new(&args.output)).await?;

    if !quiet {
        println!("{}", format_summary(&report));
    }
    println!("Results saved to {}", args.output);
    Ok(())
}

/// Accepts a JSON array of outcomes, a `{name: outcome}` map, or a whole
/// results file with an `agent_results` field. Framework names are
/// normalized; map keys fill in a missing name.
pub fn parse_outcomes(content: &str) -> Result<Vec<AgentOutcome>, BugbenchError> {
    let value: Value = serde_json::from_str(content)?;
    let value = match value {
        Value::Object(mut map) if map.contains_key("agent_results") => {
            map.remove("agent_results").unwrap_or(Value::Null)
        }
        other => other,
    };

    let mut outcomes: Vec<AgentOutcome> = match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()?,
        Value::Object(map) => map
            .into_iter()
            .map(|(name, mut entry)| {
                if let Value::Object(fields) = &mut entry {
                    if !fields.contains_key("framework") && !fields.contains_key("agent") {
                        fields.insert("framework".to_string(), Value::String(name));
                    }
                }
                serde_json::from_value(entry)
            })
            .collect::<Result<_, _>>()?,
        _ => {
            return Err(BugbenchError::Config(
                "outcomes must be a JSON array or an object keyed by framework".into(),
            ))
        }
    };

    for outcome in &mut outcomes {
        outcome.framework = normalize_framework_name(&outcome.framework);
    }
    Ok(outcomes)
}
