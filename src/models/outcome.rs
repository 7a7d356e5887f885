use serde::{Deserialize, Serialize};

/// What a single framework produced for one evaluation run.
///
/// Agent failures are carried here as data (`success == false`) rather
/// than as errors, so one crashed framework never aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOutcome {
    #[serde(alias = "agent")]
    pub framework: String,
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default, alias = "stderr")]
    pub error: Option<String>,
    /// Wall-clock time of the invocation, when the harness measured it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl AgentOutcome {
    pub fn succeeded(framework: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            framework: framework.into(),
            success: true,
            response: Some(response.into()),
            error: None,
            duration_ms: None,
        }
    }

    pub fn failed(framework: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            framework: framework.into(),
            success: false,
            response: None,
            error: Some(error.into()),
            duration_ms: None,
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// The text to score. Absent responses score as empty ones.
    pub fn response_text(&self) -> &str {
        self.response.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_legacy_field_names() {
        let json = r#"{"agent": "autogen", "success": false, "response": "Error running agent", "stderr": "Process timed out"}"#;
        let outcome: AgentOutcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.framework, "autogen");
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Process timed out"));
    }

    #[test]
    fn test_missing_response_is_empty_text() {
        let json = r#"{"framework": "dspy", "success": true, "response": null, "error": null}"#;
        let outcome: AgentOutcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.response_text(), "");
    }
}
