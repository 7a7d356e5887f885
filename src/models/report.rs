use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::BugbenchError;
use super::comparison::{ChartInputs, RankingRow};
use super::known_bug::KnownBug;
use super::metrics::FrameworkMetrics;
use super::outcome::AgentOutcome;

/// Everything one evaluation run produced, as written to the results file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub codebase: String,
    pub known_bugs: Vec<KnownBug>,
    pub agent_results: Vec<AgentOutcome>,
    /// Per-framework metrics, in framework order.
    pub evaluation: Vec<FrameworkMetrics>,
    /// Frameworks by descending recall.
    pub ranking: Vec<RankingRow>,
    pub charts: ChartInputs,
}

impl EvaluationReport {
    pub fn metrics_for(&self, framework: &str) -> Option<&FrameworkMetrics> {
        self.evaluation.iter().find(|m| m.framework == framework)
    }

    pub async fn save(&self, path: &Path) -> Result<(), BugbenchError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        info!(path = %path.display(), frameworks = self.evaluation.len(), "Results saved");
        Ok(())
    }

    pub async fn load(path: &Path) -> Result<Self, BugbenchError> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}
