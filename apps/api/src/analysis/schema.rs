//! Structured-output schema sent with every analysis request.
//!
//! Written in Gemini's OpenAPI subset (uppercase type names, `nullable`).
//! Built once per process and never mutated.

use std::sync::OnceLock;

use serde_json::{json, Value};

/// Top-level report fields the model must always return.
pub const REQUIRED_REPORT_FIELDS: &[&str] = &[
    "research_question",
    "motivation",
    "key_contributions",
    "assumptions",
    "tasks_or_domains",
    "methods_summary",
    "baselines",
    "metrics",
    "datasets",
    "compute_requirements",
    "experiments",
    "ablations",
    "baselines_to_implement",
    "failure_modes",
    "data_preparation_steps",
    "model_definition_steps",
    "training_loop_steps",
    "evaluation_loop_steps",
    "logging_and_tracking",
    "pseudocode",
    "limitations",
    "reproducibility_risks",
    "ethical_considerations",
    "extensions_and_future_work",
    "new_hypotheses",
];

pub fn report_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(build_report_schema)
}

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn nullable_string() -> Value {
    json!({ "type": "STRING", "nullable": true })
}

fn string_list() -> Value {
    json!({ "type": "ARRAY", "items": string() })
}

fn object_list(item: Value) -> Value {
    json!({ "type": "ARRAY", "items": item })
}

fn build_report_schema() -> Value {
    let dataset = json!({
        "type": "OBJECT",
        "properties": {
            "name": string(),
            "public_or_private": string(),
            "url": nullable_string(),
            "modalities": string_list(),
        },
        "required": ["name", "public_or_private", "modalities"],
    });

    let hyperparameters = json!({
        "type": "OBJECT",
        "properties": {
            "learning_rate": nullable_string(),
            "batch_size": nullable_string(),
            "epochs": nullable_string(),
            "optimizer": nullable_string(),
            "regularization": nullable_string(),
            "other_critical_params": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": { "name": string(), "value": string() },
                    "required": ["name", "value"],
                },
                "nullable": true,
            },
        },
    });

    let experiment = json!({
        "type": "OBJECT",
        "properties": {
            "id": string(),
            "goal": string(),
            "setup_summary": string(),
            "dataset": string(),
            "model_or_algorithm": string(),
            "hyperparameters": hyperparameters,
            "training_procedure": string_list(),
            "evaluation_procedure": string_list(),
            "expected_outcomes": string(),
        },
        "required": [
            "id",
            "goal",
            "setup_summary",
            "dataset",
            "model_or_algorithm",
            "training_procedure",
            "evaluation_procedure",
            "expected_outcomes",
        ],
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "research_question": string(),
            "motivation": string(),
            "key_contributions": string_list(),
            "assumptions": string_list(),
            "tasks_or_domains": string_list(),
            "methods_summary": string(),
            "baselines": string_list(),
            "metrics": string_list(),
            "datasets": object_list(dataset),
            "compute_requirements": {
                "type": "OBJECT",
                "properties": {
                    "hardware": string(),
                    "approximate_training_time": string(),
                },
                "required": ["hardware", "approximate_training_time"],
            },
            "experiments": object_list(experiment),
            "ablations": object_list(json!({
                "type": "OBJECT",
                "properties": { "name": string(), "what_it_tests": string() },
                "required": ["name", "what_it_tests"],
            })),
            "baselines_to_implement": object_list(json!({
                "type": "OBJECT",
                "properties": { "name": string(), "notes": string() },
                "required": ["name", "notes"],
            })),
            "failure_modes": string_list(),
            "data_preparation_steps": string_list(),
            "model_definition_steps": string_list(),
            "training_loop_steps": string_list(),
            "evaluation_loop_steps": string_list(),
            "logging_and_tracking": string_list(),
            "pseudocode": string(),
            "limitations": string_list(),
            "reproducibility_risks": string_list(),
            "ethical_considerations": string_list(),
            "extensions_and_future_work": {
                "type": "OBJECT",
                "properties": {
                    "straightforward_extensions": string_list(),
                    "ambitious_extensions": string_list(),
                },
                "required": ["straightforward_extensions", "ambitious_extensions"],
            },
            "new_hypotheses": string_list(),
        },
        "required": REQUIRED_REPORT_FIELDS,
    })
}
