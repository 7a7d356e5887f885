use std::path::Path;

use crate::cli::commands::SummaryArgs;
use crate::errors::BugbenchError;
use crate::models::EvaluationReport;
use crate::reporting::{format_charts, format_markdown_table, format_summary};

pub async fn handle_summary(args: SummaryArgs) -> Result<(), BugbenchError> {
    let report = EvaluationReport::load(Path::new(&args.input)).await?;

    if args.markdown {
        print!("{}", format_markdown_table(&report));
    } else {
        print!("{}", format_summary(&report));
    }
    if args.charts {
        println!();
        print!("{}", format_charts(&report));
    }
    Ok(())
}
