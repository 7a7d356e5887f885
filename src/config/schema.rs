use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["codebase"],
        "properties": {
            "codebase": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": { "type": "string", "minLength": 1 },
                    "path": { "type": "string" },
                    "catalog": { "type": "string" },
                    "bug_pattern": { "type": "string" },
                    "extensions": { "type": "array", "items": { "type": "string" } }
                }
            },
            "prompt": { "type": "string" },
            "matcher": {
                "type": "object",
                "properties": {
                    "keyword_threshold": { "type": "number", "exclusiveMinimum": 0, "maximum": 1 },
                    "min_token_length": { "type": "integer", "minimum": 1 },
                    "stop_words": { "type": "array", "items": { "type": "string" } },
                    "extra_stop_words": { "type": "array", "items": { "type": "string" } }
                }
            },
            "parser": {
                "type": "object",
                "properties": {
                    "indicators": { "type": "array", "items": { "type": "string" } }
                }
            },
            "agents": { "type": "array", "items": { "$ref": "#/$defs/agent" } },
            "execution": {
                "type": "object",
                "properties": {
                    "max_retries": { "type": "integer", "minimum": 0 },
                    "concurrency": { "type": "integer", "minimum": 1 }
                }
            },
            "output": {
                "type": "object",
                "properties": {
                    "path": { "type": "string" }
                }
            }
        },
        "$defs": {
            "agent": {
                "type": "object",
                "required": ["name", "command"],
                "properties": {
                    "name": { "type": "string" },
                    "command": { "type": "array", "minItems": 1, "items": { "type": "string" } },
                    "prompt_mode": { "type": "string", "enum": ["stdin", "arg"] },
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "env": { "type": "object", "additionalProperties": { "type": "string" } },
                    "working_dir": { "type": "string" }
                }
            }
        }
    })
});
