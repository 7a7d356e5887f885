use thiserror::Error;

#[derive(Debug, Error)]
pub enum BugbenchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load bug catalog for codebase '{codebase}': {reason}")]
    CatalogLoad { codebase: String, reason: String },

    #[error("Agent '{framework}' failed: {reason}")]
    AgentInvocation { framework: String, reason: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BugbenchError {
    pub fn catalog(codebase: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CatalogLoad { codebase: codebase.into(), reason: reason.into() }
    }

    pub fn agent(framework: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AgentInvocation { framework: framework.into(), reason: reason.into() }
    }
}
