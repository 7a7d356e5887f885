use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::agents::{CommandAdapter, PromptMode};
use crate::agents::command::DEFAULT_TIMEOUT_SECS;
use crate::catalog::ScanOptions;
use crate::errors::{BugbenchError, RetryConfig};
use crate::report::ParserConfig;
use crate::scoring::MatcherConfig;

pub const DEFAULT_OUTPUT_PATH: &str = "agent_evaluation_results.json";

/// One evaluation run, as read from YAML.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BugbenchConfig {
    pub codebase: CodebaseConfig,
    /// Task prompt; `{codebase}` is replaced by the codebase name.
    pub prompt: Option<String>,
    #[serde(default)]
    pub matcher: MatcherSection,
    #[serde(default)]
    pub parser: ParserSection,
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodebaseConfig {
    pub name: String,
    /// Source tree scanned for bug markers.
    pub path: Option<PathBuf>,
    /// Pre-built catalog file; wins over `path` when both are set.
    pub catalog: Option<PathBuf>,
    pub bug_pattern: Option<String>,
    pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatcherSection {
    #[serde(default = "default_keyword_threshold")]
    pub keyword_threshold: f64,
    #[serde(default = "default_min_token_length")]
    pub min_token_length: usize,
    /// Replaces the built-in stop words.
    pub stop_words: Option<Vec<String>>,
    /// Added to whichever stop word list is in effect.
    #[serde(default)]
    pub extra_stop_words: Vec<String>,
}

impl Default for MatcherSection {
    fn default() -> Self {
        Self {
            keyword_threshold: default_keyword_threshold(),
            min_token_length: default_min_token_length(),
            stop_words: None,
            extra_stop_words: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ParserSection {
    pub indicators: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    pub name: String,
    pub command: Vec<String>,
    #[serde(default)]
    pub prompt_mode: PromptMode,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { path: default_output_path() }
    }
}

fn default_keyword_threshold() -> f64 {
    crate::scoring::matcher::DEFAULT_KEYWORD_THRESHOLD
}

fn default_min_token_length() -> usize {
    crate::scoring::matcher::DEFAULT_MIN_TOKEN_LENGTH
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    RetryConfig::default().max_retries
}

fn default_concurrency() -> usize {
    1
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

impl BugbenchConfig {
    pub fn matcher_config(&self) -> MatcherConfig {
        let mut config = MatcherConfig {
            keyword_threshold: self.matcher.keyword_threshold,
            min_token_length: self.matcher.min_token_length,
            ..MatcherConfig::default()
        };
        if let Some(stop_words) = &self.matcher.stop_words {
            config.stop_words = stop_words.clone();
        }
        config.stop_words.extend(self.matcher.extra_stop_words.iter().cloned());
        config
    }

    pub fn parser_config(&self) -> ParserConfig {
        match &self.parser.indicators {
            Some(indicators) => ParserConfig { indicators: indicators.clone() },
            None => ParserConfig::default(),
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        let mut options = ScanOptions::default();
        if let Some(pattern) = &self.codebase.bug_pattern {
            options.bug_pattern = pattern.clone();
        }
        if let Some(extensions) = &self.codebase.extensions {
            options.extensions = extensions.clone();
        }
        options
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.execution.max_retries,
            ..RetryConfig::default()
        }
    }

    /// Build one process adapter per configured agent, optionally keeping
    /// only the agent called `only` (compared after name normalization).
    pub fn build_adapters(&self, only: Option<&str>) -> Result<Vec<CommandAdapter>, BugbenchError> {
        let wanted = only.map(crate::agents::normalize_framework_name);
        let mut adapters = Vec::new();

        for agent in &self.agents {
            let name = crate::agents::normalize_framework_name(&agent.name);
            if wanted.as_ref().is_some_and(|w| *w != name) {
                continue;
            }
            let mut adapter = CommandAdapter::new(name, agent.command.clone())?
                .with_prompt_mode(agent.prompt_mode)
                .with_timeout(Duration::from_secs(agent.timeout_secs))
                .with_env(agent.env.clone());
            if let Some(dir) = &agent.working_dir {
                adapter = adapter.with_working_dir(dir);
            }
            adapters.push(adapter);
        }

        if let Some(wanted) = wanted {
            if adapters.is_empty() {
                return Err(BugbenchError::Config(format!("No agent named '{}' in configuration", wanted)));
            }
        }
        Ok(adapters)
    }
}
