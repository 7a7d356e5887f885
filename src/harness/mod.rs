pub mod events;

pub use events::HarnessEvent;

use std::time::Instant;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agents::{render_prompt, AgentAdapter, DEFAULT_PROMPT};
use crate::catalog::BugCatalog;
use crate::errors::{with_retry, RetryConfig};
use crate::models::{AgentOutcome, EvaluationReport, FrameworkMetrics};
use crate::scoring::{ScoreAggregator, Scorer};
use crate::utils::truncation::truncate_output;

/// Version string recorded in every report.
pub fn tool_version() -> String {
    match option_env!("GIT_HASH") {
        Some(hash) => format!("{}+{}", env!("CARGO_PKG_VERSION"), hash),
        None => env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Runs every agent on one codebase and scores the answers.
///
/// Agent failures never abort the run: each becomes a failed outcome and a
/// zero-score metrics entry. The catalog is shared read-only between all
/// frameworks.
pub struct EvaluationHarness {
    catalog: BugCatalog,
    scorer: Scorer,
    prompt: String,
    retry: RetryConfig,
    concurrency: usize,
    event_tx: Option<mpsc::UnboundedSender<HarnessEvent>>,
}

impl EvaluationHarness {
    pub fn new(catalog: BugCatalog, scorer: Scorer) -> Self {
        let prompt = render_prompt(DEFAULT_PROMPT, catalog.codebase());
        Self {
            catalog,
            scorer,
            prompt,
            retry: RetryConfig::default(),
            concurrency: 1,
            event_tx: None,
        }
    }

    /// Replace the task prompt. `{codebase}` is substituted.
    pub fn with_prompt(mut self, template: &str) -> Self {
        self.prompt = render_prompt(template, self.catalog.codebase());
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Maximum number of agents running at once; values below 1 mean 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Attach an event channel for streaming run progress.
    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<HarnessEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn catalog(&self) -> &BugCatalog {
        &self.catalog
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    fn emit(&self, event: HarnessEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    /// Invoke one agent, retrying transient failures. Never fails: the last
    /// error is folded into a failed outcome.
    pub async fn collect_outcome(&self, adapter: &dyn AgentAdapter) -> AgentOutcome {
        let framework = adapter.name().to_string();
        self.emit(HarnessEvent::AgentStarted { framework: framework.clone() });
        info!(framework = %framework, "Running agent");

        let start = Instant::now();
        let mut attempt = 0u32;
        let result = with_retry(&framework, &self.retry, || {
            attempt += 1;
            if attempt > 1 {
                self.emit(HarnessEvent::AgentRetrying {
                    framework: framework.clone(),
                    attempt,
                });
            }
            adapter.invoke(&self.prompt)
        })
        .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) => {
                info!(framework = %framework, duration_ms, chars = response.len(), "Agent completed");
                tracing::debug!(framework = %framework, response = %truncate_output(&response), "Agent response");
                self.emit(HarnessEvent::AgentCompleted { framework: framework.clone(), duration_ms });
                AgentOutcome::succeeded(framework, response).with_duration_ms(duration_ms)
            }
            Err(e) => {
                let error = e.to_string();
                warn!(framework = %framework, error = %error, "Agent failed");
                self.emit(HarnessEvent::AgentFailed { framework: framework.clone(), error: error.clone() });
                AgentOutcome::failed(framework, error).with_duration_ms(duration_ms)
            }
        }
    }

    /// Run all agents, at most `concurrency` at a time, then score them.
    /// Results keep the order of `adapters`.
    pub async fn run(&self, adapters: &[Box<dyn AgentAdapter>]) -> EvaluationReport {
        let start = Instant::now();
        self.emit(HarnessEvent::RunStarted {
            codebase: self.catalog.codebase().to_string(),
            known_bugs: self.catalog.count(),
            agents: adapters.len(),
        });
        info!(
            codebase = %self.catalog.codebase(),
            known_bugs = self.catalog.count(),
            agents = adapters.len(),
            concurrency = self.concurrency,
            "Starting evaluation run"
        );

        let outcomes: Vec<AgentOutcome> = stream::iter(adapters.iter().map(|a| self.collect_outcome(a.as_ref())))
            .buffered(self.concurrency)
            .collect()
            .await;

        let report = self.score_outcomes(outcomes);
        self.emit(HarnessEvent::RunCompleted {
            frameworks: report.evaluation.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        });
        report
    }

    /// Score already-collected outcomes without invoking any agent.
    pub fn score_outcomes(&self, outcomes: Vec<AgentOutcome>) -> EvaluationReport {
        let evaluation: Vec<FrameworkMetrics> = outcomes
            .iter()
            .map(|outcome| {
                let metrics = self.scorer.evaluate(outcome, &self.catalog);
                self.emit(HarnessEvent::AgentScored {
                    framework: metrics.framework.clone(),
                    unique_bugs_found: metrics.unique_bugs_found,
                    total_known_bugs: metrics.total_known_bugs,
                    recall: metrics.recall,
                });
                metrics
            })
            .collect();

        EvaluationReport {
            run_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            tool_version: tool_version(),
            codebase: self.catalog.codebase().to_string(),
            known_bugs: self.catalog.all_bugs().to_vec(),
            ranking: ScoreAggregator::rank(&evaluation),
            charts: ScoreAggregator::chart_inputs(&evaluation),
            agent_results: outcomes,
            evaluation,
        }
    }
}
