/// Progress messages sent from the harness to a display or other consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum HarnessEvent {
    RunStarted {
        codebase: String,
        known_bugs: usize,
        agents: usize,
    },
    AgentStarted {
        framework: String,
    },
    /// An agent attempt failed and will be retried
    AgentRetrying {
        framework: String,
        attempt: u32,
    },
    AgentCompleted {
        framework: String,
        duration_ms: u64,
    },
    AgentFailed {
        framework: String,
        error: String,
    },
    AgentScored {
        framework: String,
        unique_bugs_found: usize,
        total_known_bugs: usize,
        recall: f64,
    },
    RunCompleted {
        frameworks: usize,
        duration_ms: u64,
    },
}
