pub mod scan;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::errors::BugbenchError;
use crate::models::KnownBug;

pub use scan::{ScanOptions, DEFAULT_BUG_PATTERN};

/// On-disk format of a catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Raw record as written in a catalog file, before validation.
#[derive(Debug, Deserialize)]
struct RawBug {
    file: String,
    line: i64,
    description: String,
}

/// Ground-truth bugs of one benchmark codebase. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugCatalog {
    codebase: String,
    bugs: Vec<KnownBug>,
}

impl BugCatalog {
    pub fn new(codebase: impl Into<String>, bugs: Vec<KnownBug>) -> Self {
        Self { codebase: codebase.into(), bugs }
    }

    /// Load the entry for `codebase` from a `{codebase: [bug, ...]}` file.
    pub fn load(path: &Path, codebase: &str) -> Result<Self, BugbenchError> {
        if !path.exists() {
            return Err(BugbenchError::catalog(
                codebase,
                format!("catalog file not found: {}", path.display()),
            ));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| BugbenchError::catalog(codebase, format!("{}: {}", path.display(), e)))?;
        let catalog = Self::parse(&content, CatalogFormat::from_path(path), codebase)?;
        info!(
            codebase = %codebase,
            path = %path.display(),
            bugs = catalog.count(),
            "Loaded bug catalog"
        );
        Ok(catalog)
    }

    pub fn parse(content: &str, format: CatalogFormat, codebase: &str) -> Result<Self, BugbenchError> {
        let mut sources: BTreeMap<String, serde_json::Value> = match format {
            CatalogFormat::Json => serde_json::from_str(content)
                .map_err(|e| BugbenchError::catalog(codebase, format!("malformed catalog: {}", e)))?,
            CatalogFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| BugbenchError::catalog(codebase, format!("malformed catalog: {}", e)))?,
        };

        let entry = match sources.remove(codebase) {
            Some(entry) => entry,
            None => {
                let available = sources.keys().cloned().collect::<Vec<_>>().join(", ");
                return Err(BugbenchError::catalog(
                    codebase,
                    format!("codebase not present in catalog (available: {})", available),
                ));
            }
        };

        let serde_json::Value::Array(records) = entry else {
            return Err(BugbenchError::catalog(codebase, "expected a list of bug records"));
        };

        let bugs = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| validate_record(codebase, i, record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(codebase, bugs))
    }

    pub fn codebase(&self) -> &str {
        &self.codebase
    }

    pub fn all_bugs(&self) -> &[KnownBug] {
        &self.bugs
    }

    pub fn count(&self) -> usize {
        self.bugs.len()
    }

    pub fn get(&self, index: usize) -> Option<&KnownBug> {
        self.bugs.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.bugs.is_empty()
    }

    /// Write this catalog as a single-codebase JSON catalog file.
    pub fn save(&self, path: &Path) -> Result<(), BugbenchError> {
        let mut sources = BTreeMap::new();
        sources.insert(self.codebase.as_str(), &self.bugs);
        let json = serde_json::to_string_pretty(&sources)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        info!(codebase = %self.codebase, path = %path.display(), bugs = self.count(), "Saved bug catalog");
        Ok(())
    }
}

fn validate_record(codebase: &str, index: usize, record: serde_json::Value) -> Result<KnownBug, BugbenchError> {
    let raw: RawBug = serde_json::from_value(record)
        .map_err(|e| BugbenchError::catalog(codebase, format!("bug #{}: {}", index, e)))?;

    if raw.file.trim().is_empty() {
        return Err(BugbenchError::catalog(codebase, format!("bug #{}: empty `file`", index)));
    }
    if raw.description.trim().is_empty() {
        return Err(BugbenchError::catalog(codebase, format!("bug #{}: empty `description`", index)));
    }
    let line = u32::try_from(raw.line)
        .ok()
        .filter(|l| *l >= 1)
        .ok_or_else(|| BugbenchError::catalog(
            codebase,
            format!("bug #{}: line must be a positive integer, got {}", index, raw.line),
        ))?;

    Ok(KnownBug::new(raw.file, line, raw.description))
}
