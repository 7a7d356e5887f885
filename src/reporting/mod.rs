pub mod formatter;

pub use formatter::{format_catalog_listing, format_charts, format_markdown_table, format_summary};
