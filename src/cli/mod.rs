pub mod commands;
pub mod progress;
pub mod run;
pub mod scan;
pub mod score;
pub mod summary;

pub use commands::{Cli, Commands};
