use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::BugbenchError;
use crate::utils::truncation::truncate_error;
use super::adapter::AgentAdapter;

/// Argument placeholder replaced by the prompt in `PromptMode::Arg`.
pub const PROMPT_PLACEHOLDER: &str = "{prompt}";

pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// How the prompt reaches the agent process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    #[default]
    Stdin,
    Arg,
}

/// Runs an agent framework as a child process; its stdout is the answer.
#[derive(Debug, Clone)]
pub struct CommandAdapter {
    name: String,
    program: String,
    args: Vec<String>,
    prompt_mode: PromptMode,
    timeout: Duration,
    env: BTreeMap<String, String>,
    working_dir: Option<PathBuf>,
}

impl CommandAdapter {
    pub fn new(name: impl Into<String>, command: Vec<String>) -> Result<Self, BugbenchError> {
        let name = name.into();
        let mut parts = command.into_iter();
        let program = parts
            .next()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| BugbenchError::Config(format!("Agent '{}' has an empty command", name)))?;

        Ok(Self {
            name,
            program,
            args: parts.collect(),
            prompt_mode: PromptMode::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            env: BTreeMap::new(),
            working_dir: None,
        })
    }

    pub fn with_prompt_mode(mut self, mode: PromptMode) -> Self {
        self.prompt_mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn build_args(&self, prompt: &str) -> Vec<String> {
        match self.prompt_mode {
            PromptMode::Stdin => self.args.clone(),
            PromptMode::Arg => {
                let has_placeholder = self.args.iter().any(|a| a.contains(PROMPT_PLACEHOLDER));
                let mut args: Vec<String> = self.args.iter()
                    .map(|a| a.replace(PROMPT_PLACEHOLDER, prompt))
                    .collect();
                if !has_placeholder {
                    args.push(prompt.to_string());
                }
                args
            }
        }
    }
}

#[async_trait]
impl AgentAdapter for CommandAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, prompt: &str) -> Result<String, BugbenchError> {
        debug!(agent = %self.name, program = %self.program, "Spawning agent process");

        let mut cmd = Command::new(&self.program);
        cmd.args(self.build_args(prompt))
            .envs(&self.env)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd.stdin(match self.prompt_mode {
            PromptMode::Stdin => Stdio::piped(),
            PromptMode::Arg => Stdio::null(),
        });
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| {
            BugbenchError::agent(&self.name, format!("failed to spawn '{}': {}", self.program, e))
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            let prompt = prompt.to_string();
            let name = self.name.clone();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                    warn!(agent = %name, error = %e, "Failed to write prompt to agent stdin");
                }
            });
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| BugbenchError::Timeout(format!(
                "Agent '{}' did not finish within {}s",
                self.name,
                self.timeout.as_secs()
            )))?
            .map_err(|e| BugbenchError::agent(&self.name, format!("failed to collect output: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BugbenchError::agent(
                &self.name,
                format!("{}: {}", output.status, truncate_error(stderr.trim())),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
