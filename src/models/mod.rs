pub mod known_bug;
pub mod outcome;
pub mod claim;
pub mod match_record;
pub mod metrics;
pub mod comparison;
pub mod report;

pub use known_bug::*;
pub use outcome::*;
pub use claim::*;
pub use match_record::*;
pub use metrics::*;
pub use comparison::*;
pub use report::*;
