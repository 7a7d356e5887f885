use std::collections::HashSet;
use std::path::Path;

use crate::agents::normalize_framework_name;
use crate::errors::BugbenchError;
use super::types::BugbenchConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<BugbenchConfig, BugbenchError> {
    if !path.exists() {
        return Err(BugbenchError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(BugbenchError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let mut config = parse_config_str(&content)?;

    // Relative paths are relative to the config file, not the working directory
    if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        resolve_paths(&mut config, base);
    }

    Ok(config)
}

/// Parse and validate configuration text.
pub fn parse_config_str(content: &str) -> Result<BugbenchConfig, BugbenchError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    // JSON Schema validation
    validate_schema(&yaml)?;

    // Parse into typed config
    let config: BugbenchConfig = serde_yaml::from_value(yaml)?;

    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), BugbenchError> {
    // Convert YAML value to JSON for schema validation
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| BugbenchError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| BugbenchError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory only; the semantic checks below are authoritative
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

/// Reject configurations that would make the run meaningless.
fn validate_semantics(config: &BugbenchConfig) -> Result<(), BugbenchError> {
    if config.codebase.name.trim().is_empty() {
        return Err(BugbenchError::Config("codebase.name must not be empty".into()));
    }
    if config.codebase.path.is_none() && config.codebase.catalog.is_none() {
        return Err(BugbenchError::Config(
            "codebase needs either 'path' (to scan) or 'catalog' (to load)".into(),
        ));
    }

    let threshold = config.matcher.keyword_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(BugbenchError::Config(format!(
            "matcher.keyword_threshold must be in (0, 1], got {}",
            threshold
        )));
    }
    if config.matcher.min_token_length == 0 {
        return Err(BugbenchError::Config("matcher.min_token_length must be at least 1".into()));
    }
    if config.execution.concurrency == 0 {
        return Err(BugbenchError::Config("execution.concurrency must be at least 1".into()));
    }

    let mut seen = HashSet::new();
    for agent in &config.agents {
        if agent.command.first().map_or(true, |p| p.trim().is_empty()) {
            return Err(BugbenchError::Config(format!("Agent '{}' has an empty command", agent.name)));
        }
        let name = normalize_framework_name(&agent.name);
        if !seen.insert(name.clone()) {
            return Err(BugbenchError::Config(format!(
                "Duplicate agent '{}' (from '{}')",
                name, agent.name
            )));
        }
    }

    if config.agents.is_empty() {
        warn!("No agents configured; only the catalog will be built");
    }

    Ok(())
}

fn resolve_paths(config: &mut BugbenchConfig, base: &Path) {
    let resolve = |p: &mut std::path::PathBuf| {
        if p.is_relative() {
            *p = base.join(&*p);
        }
    };
    if let Some(path) = config.codebase.path.as_mut() {
        resolve(path);
    }
    if let Some(catalog) = config.codebase.catalog.as_mut() {
        resolve(catalog);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
codebase:
  name: test_codebase
  catalog: fixtures/bug_catalog.json
matcher:
  keyword_threshold: 0.5
agents:
  - name: langchain
    command: ["python", "langchain_agent.py"]
execution:
  concurrency: 2
"#;

    #[test]
    fn test_valid_config() {
        let config = parse_config_str(VALID).unwrap();
        assert_eq!(config.codebase.name, "test_codebase");
        assert_eq!(config.matcher.keyword_threshold, 0.5);
        assert_eq!(config.execution.concurrency, 2);
    }

    #[test]
    fn test_missing_source_rejected() {
        let err = parse_config_str("codebase:\n  name: x\n").unwrap_err();
        assert!(matches!(err, BugbenchError::Config(ref m) if m.contains("either")));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let yaml = VALID.replace("0.5", "1.5");
        assert!(matches!(parse_config_str(&yaml), Err(BugbenchError::Config(_))));
        let yaml = VALID.replace("0.5", "0.0");
        assert!(matches!(parse_config_str(&yaml), Err(BugbenchError::Config(_))));
        let yaml = VALID.replace("0.5", "1.0");
        assert!(parse_config_str(&yaml).is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let yaml = VALID.replace("concurrency: 2", "concurrency: 0");
        assert!(matches!(parse_config_str(&yaml), Err(BugbenchError::Config(_))));
    }

    #[test]
    fn test_zero_min_token_length_rejected() {
        let yaml = VALID.replace("keyword_threshold: 0.5", "min_token_length: 0");
        assert!(matches!(parse_config_str(&yaml), Err(BugbenchError::Config(_))));
    }

    #[test]
    fn test_empty_command_rejected() {
        let yaml = VALID.replace(r#"["python", "langchain_agent.py"]"#, "[]");
        assert!(matches!(parse_config_str(&yaml), Err(BugbenchError::Config(_))));
    }

    #[test]
    fn test_duplicate_normalized_names_rejected() {
        let yaml = format!(
            "{}  - name: langchain_example.py\n    command: [\"other\"]\n",
            VALID.replace("execution:\n  concurrency: 2\n", "")
        );
        let err = parse_config_str(&yaml).unwrap_err();
        assert!(matches!(err, BugbenchError::Config(ref m) if m.contains("Duplicate")));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(parse_config_str("codebase: [unclosed"), Err(BugbenchError::Yaml(_))));
    }

    #[tokio::test]
    async fn test_parse_config_file_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, VALID).unwrap();
        let config = parse_config(&path).await.unwrap();
        assert_eq!(config.codebase.catalog, Some(dir.path().join("fixtures/bug_catalog.json")));
    }

    #[tokio::test]
    async fn test_parse_config_missing_file() {
        let err = parse_config(Path::new("/nonexistent/run.yaml")).await.unwrap_err();
        assert!(matches!(err, BugbenchError::Config(_)));
    }
}
