use std::path::Path;

/// Task given to every agent unless the run configuration overrides it.
/// `{codebase}` is replaced by the codebase name.
pub const DEFAULT_PROMPT: &str = "Analyze the {codebase} directory and identify all bugs marked with \
'# BUG:' comments. For each bug, explain what the issue is and suggest a solution.";

pub struct FrameworkDefinition {
    pub name: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
}

pub static FRAMEWORK_REGISTRY: &[FrameworkDefinition] = &[
    FrameworkDefinition {
        name: "langchain",
        display_name: "LangChain",
        aliases: &["lang_chain"],
    },
    FrameworkDefinition {
        name: "llamaindex",
        display_name: "LlamaIndex",
        aliases: &["llama_index"],
    },
    FrameworkDefinition {
        name: "semantic_kernel",
        display_name: "Semantic Kernel",
        aliases: &["semantickernel", "sk"],
    },
    FrameworkDefinition {
        name: "autogen",
        display_name: "AutoGen",
        aliases: &["auto_gen"],
    },
    FrameworkDefinition {
        name: "smolagents",
        display_name: "smolagents",
        aliases: &["smol_agents"],
    },
    FrameworkDefinition {
        name: "dspy",
        display_name: "DSPy",
        aliases: &["dspy_react"],
    },
];

/// Map a legacy framework identifier (script name, path, alias) to its
/// canonical name. Unknown names come back lowercased with `-` as `_`.
pub fn normalize_framework_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let base = if trimmed.contains('/') || trimmed.contains('\\') || trimmed.ends_with(".py") {
        Path::new(&trimmed.replace('\\', "/"))
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| trimmed.to_string())
    } else {
        trimmed.to_string()
    };

    let mut name = base.to_lowercase().replace(['-', ' '], "_");
    for suffix in ["_example", "_agent"] {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.to_string();
        }
    }

    match find_framework(&name) {
        Some(def) => def.name.to_string(),
        None => name,
    }
}

pub fn find_framework(name: &str) -> Option<&'static FrameworkDefinition> {
    FRAMEWORK_REGISTRY
        .iter()
        .find(|def| def.name == name || def.aliases.contains(&name))
}

/// Human-readable label for charts and summaries.
pub fn display_name(name: &str) -> String {
    match find_framework(name) {
        Some(def) => def.display_name.to_string(),
        None => name.to_string(),
    }
}

pub fn render_prompt(template: &str, codebase: &str) -> String {
    template.replace("{codebase}", codebase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_legacy_names() {
        assert_eq!(normalize_framework_name("langchain_example.py"), "langchain");
        assert_eq!(normalize_framework_name("frameworks/llamaindex_agent.py"), "llamaindex");
        assert_eq!(normalize_framework_name("dspy_react"), "dspy");
        assert_eq!(normalize_framework_name("SemanticKernel"), "semantic_kernel");
        assert_eq!(normalize_framework_name("semantic-kernel"), "semantic_kernel");
        assert_eq!(normalize_framework_name("smolagents"), "smolagents");
    }

    #[test]
    fn test_normalize_unknown_name() {
        assert_eq!(normalize_framework_name("My-Agent"), "my");
        assert_eq!(normalize_framework_name("crew-ai"), "crew_ai");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("dspy"), "DSPy");
        assert_eq!(display_name("crew_ai"), "crew_ai");
    }

    #[test]
    fn test_render_prompt() {
        let prompt = render_prompt(DEFAULT_PROMPT, "test_codebase");
        assert!(prompt.starts_with("Analyze the test_codebase directory"));
        assert!(!prompt.contains("{codebase}"));
    }
}
