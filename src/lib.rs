pub mod agents;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod harness;
pub mod models;
pub mod report;
pub mod reporting;
pub mod scoring;
pub mod utils;

pub use catalog::BugCatalog;
pub use errors::BugbenchError;
pub use harness::EvaluationHarness;
pub use scoring::Scorer;
