//! The response contract sent with every generation request, plus the
//! standard JSON Schema of [`StructuredDomainModel`] for offline validation.

use serde_json::{json, Value};
use std::sync::OnceLock;

use crate::{IntegrationPattern, StructuredDomainModel};

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn string_list() -> Value {
    json!({ "type": "ARRAY", "items": string() })
}

fn named_list() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": { "name": string(), "description": string() },
            "propertyOrdering": ["name", "description"]
        }
    })
}

fn member_list(list_field: &str) -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": { "name": string(), list_field: string_list() },
            "propertyOrdering": ["name", list_field]
        }
    })
}

fn aggregate() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": string(),
            "rootEntity": string(),
            "entities": member_list("attributes"),
            "valueObjects": member_list("properties"),
            "repository": string(),
            "description": string()
        },
        "propertyOrdering": ["name", "rootEntity", "entities", "valueObjects", "repository", "description"]
    })
}

fn component() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": string(),
            "type": string(),
            "description": string(),
            "responsibilities": string_list(),
            "dependencies": string_list(),
            "interactions": string_list()
        },
        "propertyOrdering": ["name", "type", "description", "responsibilities", "dependencies", "interactions"]
    })
}

fn bounded_context() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": string(),
            "description": string(),
            "responsibilities": string_list(),
            "relationToDomain": string(),
            "ubiquitousLanguage": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": { "term": string(), "definition": string() },
                    "propertyOrdering": ["term", "definition"]
                }
            },
            "aggregates": { "type": "ARRAY", "items": aggregate() },
            "domainServices": named_list(),
            "applicationServices": named_list(),
            "domainEvents": named_list(),
            "components": { "type": "ARRAY", "items": component() }
        },
        "propertyOrdering": [
            "name", "description", "responsibilities", "relationToDomain",
            "ubiquitousLanguage", "aggregates", "domainServices",
            "applicationServices", "domainEvents", "components"
        ]
    })
}

fn context_map() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "upstream": string(),
                "downstream": string(),
                "pattern": { "type": "STRING", "enum": IntegrationPattern::LABELS },
                "description": string()
            },
            "propertyOrdering": ["upstream", "downstream", "pattern", "description"]
        }
    })
}

/// The Gemini-dialect `responseSchema`. Built once; identical for every request.
pub fn response_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        json!({
            "type": "OBJECT",
            "properties": {
                "domain": {
                    "type": "OBJECT",
                    "properties": {
                        "name": string(),
                        "description": string(),
                        "purpose": string()
                    },
                    "propertyOrdering": ["name", "description", "purpose"]
                },
                "boundedContexts": { "type": "ARRAY", "items": bounded_context() },
                "contextMap": context_map(),
                "externalSystems": named_list()
            },
            "propertyOrdering": ["domain", "boundedContexts", "contextMap", "externalSystems"]
        })
    })
}

/// JSON Schema (draft 2020-12) of the decoded model.
pub fn domain_model_json_schema() -> schemars::Schema {
    schemars::schema_for!(StructuredDomainModel)
}
