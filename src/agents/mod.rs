pub mod adapter;
pub mod command;
pub mod registry;

pub use adapter::{AgentAdapter, StaticAdapter};
pub use command::{CommandAdapter, PromptMode};
pub use registry::{display_name, normalize_framework_name, render_prompt, DEFAULT_PROMPT};
