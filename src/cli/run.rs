use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::info;

use crate::agents::AgentAdapter;
use crate::catalog::BugCatalog;
use crate::cli::commands::RunArgs;
use crate::cli::progress::RunProgress;
use crate::config::{self, BugbenchConfig};
use crate::errors::BugbenchError;
use crate::harness::{EvaluationHarness, HarnessEvent};
use crate::reporting::format_summary;
use crate::report::ReportParser;
use crate::scoring::{BugMatcher, Scorer};

pub async fn handle_run(args: RunArgs, quiet: bool) -> Result<(), BugbenchError> {
    let config = config::parse_config(&PathBuf::from(&args.config)).await?;
    let catalog = load_catalog(&config)?;
    info!(codebase = %catalog.codebase(), known_bugs = catalog.count(), "Catalog ready");

    let adapters: Vec<Box<dyn AgentAdapter>> = config
        .build_adapters(args.agent.as_deref())?
        .into_iter()
        .map(|a| Box::new(a) as Box<dyn AgentAdapter>)
        .collect();

    let scorer = Scorer::new(
        ReportParser::new(config.parser_config()),
        BugMatcher::new(config.matcher_config()),
    );
    let mut harness = EvaluationHarness::new(catalog, scorer)
        .with_retry(config.retry_config())
        .with_concurrency(config.execution.concurrency);
    if let Some(prompt) = &config.prompt {
        harness = harness.with_prompt(prompt);
    }

    let display = if quiet {
        None
    } else {
        let (tx, rx) = mpsc::unbounded_channel();
        harness = harness.with_event_channel(tx);
        Some(tokio::spawn(render_progress(rx)))
    };

    let report = harness.run(&adapters).await;
    // Closes the event channel so the display task ends
    drop(harness);
    if let Some(task) = display {
        task.await.map_err(|e| BugbenchError::Internal(format!("Progress display failed: {}", e)))?;
    }

    let output = args.output.map(PathBuf::from).unwrap_or_else(|| config.output.path.clone());
    report.save(&output).await?;

    if !quiet {
        println!("\n{}", format_summary(&report));
    }
    println!("Results saved to {}", output.display());
    Ok(())
}

/// Build the ground truth: a catalog file wins over scanning the tree.
pub fn load_catalog(config: &BugbenchConfig) -> Result<BugCatalog, BugbenchError> {
    let codebase = &config.codebase;
    match (&codebase.catalog, &codebase.path) {
        (Some(catalog), _) => BugCatalog::load(catalog, &codebase.name),
        (None, Some(path)) => BugCatalog::scan(&codebase.name, path, &config.scan_options()),
        (None, None) => Err(BugbenchError::Config(
            "codebase needs either 'path' or 'catalog'".into(),
        )),
    }
}

async fn render_progress(mut rx: mpsc::UnboundedReceiver<HarnessEvent>) {
    let mut progress = RunProgress::new();
    while let Some(event) = rx.recv().await {
        progress.handle_event(&event);
    }
}
