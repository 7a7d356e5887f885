use super::types::BugbenchError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl BugbenchError {
    /// Classify this error to determine its type and whether it can be retried.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Transient failures at the agent boundary
            BugbenchError::AgentInvocation { .. } => ErrorClassification {
                error_type: "AgentInvocationError",
                retryable: true,
            },
            BugbenchError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                retryable: true,
            },
            BugbenchError::Io(_) => ErrorClassification {
                error_type: "IoError",
                retryable: true,
            },

            // Deterministic failures, retrying cannot change the outcome
            BugbenchError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                retryable: false,
            },
            BugbenchError::CatalogLoad { .. } => ErrorClassification {
                error_type: "CatalogLoadError",
                retryable: false,
            },
            BugbenchError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                retryable: false,
            },
            BugbenchError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                retryable: false,
            },
            BugbenchError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                retryable: false,
            },
        }
    }
}
