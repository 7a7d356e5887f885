use std::path::Path;

use async_trait::async_trait;

use crate::errors::BugbenchError;

/// Uniform boundary to one agent framework: a prompt in, free text out.
#[async_trait]
pub trait AgentAdapter: Send + Sync {
    /// Framework identifier used in results.
    fn name(&self) -> &str;

    /// Run the agent on `prompt` and return its final answer.
    async fn invoke(&self, prompt: &str) -> Result<String, BugbenchError>;
}

/// Replays a fixed answer. Used for recorded transcripts and tests.
#[derive(Debug, Clone)]
pub struct StaticAdapter {
    name: String,
    reply: Result<String, String>,
}

impl StaticAdapter {
    pub fn responding(name: impl Into<String>, response: impl Into<String>) -> Self {
        Self { name: name.into(), reply: Ok(response.into()) }
    }

    pub fn failing(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self { name: name.into(), reply: Err(error.into()) }
    }

    /// Replay the contents of a saved transcript file.
    pub fn from_transcript(name: impl Into<String>, path: &Path) -> Result<Self, BugbenchError> {
        let response = std::fs::read_to_string(path)?;
        Ok(Self::responding(name, response))
    }
}

#[async_trait]
impl AgentAdapter for StaticAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, _prompt: &str) -> Result<String, BugbenchError> {
        match &self.reply {
            Ok(response) => Ok(response.clone()),
            Err(error) => Err(BugbenchError::agent(&self.name, error.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_adapter_replays() {
        let adapter = StaticAdapter::responding("langchain", "1. cache.py: bug");
        assert_eq!(adapter.name(), "langchain");
        assert_eq!(adapter.invoke("find bugs").await.unwrap(), "1. cache.py: bug");
    }

    #[tokio::test]
    async fn test_static_adapter_fails() {
        let adapter = StaticAdapter::failing("autogen", "Process timed out");
        let err = adapter.invoke("find bugs").await.unwrap_err();
        assert!(matches!(err, BugbenchError::AgentInvocation { ref framework, .. } if framework == "autogen"));
    }

    #[test]
    fn test_from_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dspy.txt");
        std::fs::write(&path, "transcript").unwrap();
        let adapter = StaticAdapter::from_transcript("dspy", &path).unwrap();
        assert_eq!(adapter.reply, Ok("transcript".to_string()));
    }
}
