pub mod parser;

pub use parser::{ParserConfig, ReportParser, DEFAULT_INDICATORS};
