use std::path::{Path, PathBuf};

use crate::catalog::{BugCatalog, ScanOptions};
use crate::cli::commands::ScanArgs;
use crate::errors::BugbenchError;
use crate::reporting::format_catalog_listing;

pub async fn handle_scan(args: ScanArgs, quiet: bool) -> Result<(), BugbenchError> {
    let root = PathBuf::from(&args.codebase);
    let name = args.name.clone().unwrap_or_else(|| default_name(&root));

    let mut options = ScanOptions::default();
    if let Some(pattern) = &args.pattern {
        options.bug_pattern = pattern.clone();
    }
    if !args.extensions.is_empty() {
        options.extensions = args.extensions.iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect();
    }

    let catalog = BugCatalog::scan(&name, &root, &options)?;
    if !quiet {
        print!("{}", format_catalog_listing(&catalog));
    }

    if let Some(output) = &args.output {
        catalog.save(Path::new(output))?;
        println!("Catalog saved to {}", output);
    }
    Ok(())
}

fn default_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "codebase".to_string())
}
