use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::errors::BugbenchError;
use crate::models::KnownBug;
use super::BugCatalog;

/// Marker comment that seeds a bug in the sample codebases.
pub const DEFAULT_BUG_PATTERN: &str = r"# BUG:\s*(.*)";

const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    "__pycache__",
    "venv",
    "env",
    "node_modules",
    "target",
];

/// How to find seeded bugs in a source tree.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Regex matched per line; capture group 1 (or the whole match) is the description.
    pub bug_pattern: String,
    /// File extensions to read, without the dot.
    pub extensions: Vec<String>,
    /// Directory names skipped anywhere in the tree.
    pub ignored_dirs: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            bug_pattern: DEFAULT_BUG_PATTERN.to_string(),
            extensions: vec!["py".to_string()],
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BugCatalog {
    /// Build a catalog by scanning `root` for bug marker comments.
    ///
    /// Files are visited in sorted path order so the catalog order is stable
    /// across machines.
    pub fn scan(codebase: &str, root: &Path, options: &ScanOptions) -> Result<Self, BugbenchError> {
        if !root.is_dir() {
            return Err(BugbenchError::catalog(
                codebase,
                format!("codebase directory not found: {}", root.display()),
            ));
        }

        let marker = Regex::new(&options.bug_pattern)
            .map_err(|e| BugbenchError::catalog(codebase, format!("invalid bug pattern: {}", e)))?;

        let files = source_files(codebase, root, options)?;
        let mut bugs = Vec::new();

        for path in &files {
            let bytes = std::fs::read(path)
                .map_err(|e| BugbenchError::catalog(codebase, format!("{}: {}", path.display(), e)))?;
            let content = String::from_utf8_lossy(&bytes);
            let relative = relative_path(root, path);

            let before = bugs.len();
            for (i, line) in content.lines().enumerate() {
                if let Some(description) = extract_description(&marker, line) {
                    bugs.push(KnownBug::new(relative.clone(), (i + 1) as u32, description));
                }
            }
            if bugs.len() > before {
                debug!(file = %relative, bugs = bugs.len() - before, "Found seeded bugs");
            }
        }

        info!(
            codebase = %codebase,
            root = %root.display(),
            files = files.len(),
            bugs = bugs.len(),
            "Scanned codebase for seeded bugs"
        );

        Ok(Self::new(codebase, bugs))
    }
}

fn source_files(codebase: &str, root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>, BugbenchError> {
    let pattern_str = format!("{}/**/*", glob::Pattern::escape(&root.to_string_lossy()));

    let mut files = Vec::new();
    for entry in glob::glob(&pattern_str)
        .map_err(|e| BugbenchError::catalog(codebase, format!("invalid glob pattern: {}", e)))?
    {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable path");
                continue;
            }
        };
        if !path.is_file() || is_ignored(root, &path, &options.ignored_dirs) {
            continue;
        }
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |ext| options.extensions.iter().any(|x| x.trim_start_matches('.') == ext));
        if matches_ext {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn is_ignored(root: &Path, path: &Path, ignored_dirs: &[String]) -> bool {
    path.strip_prefix(root)
        .unwrap_or(path)
        .parent()
        .map_or(false, |dir| {
            dir.components().any(|c| {
                let name = c.as_os_str().to_string_lossy();
                ignored_dirs.iter().any(|ignored| *ignored == name)
            })
        })
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn extract_description(marker: &Regex, line: &str) -> Option<String> {
    let caps = marker.captures(line)?;
    let text = caps.get(1).or_else(|| caps.get(0))?.as_str().trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
