//! The experiment plan produced by one analysis.
//!
//! Field names are the export contract: the JSON export is consumed by other tools,
//! so every name and nesting here must match the response schema byte for byte.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A hyperparameter scalar. Models emit both `3e-4` and `"3e-4"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedParam {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epochs: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regularization: Option<ParamValue>,
    /// Anything not covered by the well-known fields above.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_critical_params: Option<Vec<NamedParam>>,
}

impl Hyperparameters {
    /// The well-known scalars that are set, in display order.
    pub fn known(&self) -> Vec<(&'static str, &ParamValue)> {
        [
            ("learning_rate", &self.learning_rate),
            ("batch_size", &self.batch_size),
            ("epochs", &self.epochs),
            ("optimizer", &self.optimizer),
            ("regularization", &self.regularization),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| (name, v)))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Short opaque key, e.g. `"E1"`. Unique within a report once interpreted.
    pub id: String,
    pub goal: String,
    pub setup_summary: String,
    pub dataset: String,
    pub model_or_algorithm: String,
    #[serde(default)]
    pub hyperparameters: Hyperparameters,
    pub training_procedure: Vec<String>,
    pub evaluation_procedure: Vec<String>,
    pub expected_outcomes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub public_or_private: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub modalities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeRequirements {
    pub hardware: String,
    pub approximate_training_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ablation {
    pub name: String,
    pub what_it_tests: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub name: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extensions {
    pub straightforward_extensions: Vec<String>,
    pub ambitious_extensions: Vec<String>,
}

/// Full structured experiment plan for one paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    // Overview
    pub research_question: String,
    pub motivation: String,
    pub key_contributions: Vec<String>,
    pub assumptions: Vec<String>,
    pub tasks_or_domains: Vec<String>,
    pub methods_summary: String,
    pub baselines: Vec<String>,
    pub metrics: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub compute_requirements: ComputeRequirements,

    // Experiment blueprint
    pub experiments: Vec<Experiment>,
    pub ablations: Vec<Ablation>,
    pub baselines_to_implement: Vec<Baseline>,
    pub failure_modes: Vec<String>,

    // Implementation plan
    pub data_preparation_steps: Vec<String>,
    pub model_definition_steps: Vec<String>,
    pub training_loop_steps: Vec<String>,
    pub evaluation_loop_steps: Vec<String>,
    pub logging_and_tracking: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudocode: Option<String>,

    // Analysis
    pub limitations: Vec<String>,
    pub reproducibility_risks: Vec<String>,
    pub ethical_considerations: Vec<String>,
    pub extensions_and_future_work: Extensions,
    pub new_hypotheses: Vec<String>,
}

impl Report {
    /// Re-keys experiments so every id is non-empty and unique.
    ///
    /// The first occurrence of an id keeps it; later duplicates get `-2`, `-3`, ...
    /// Blank ids become `exp-<position>`. Returns how many ids changed.
    pub fn ensure_unique_experiment_ids(&mut self) -> usize {
        let mut seen: HashSet<String> = HashSet::new();
        let mut changed = 0;

        for (index, experiment) in self.experiments.iter_mut().enumerate() {
            let blank = experiment.id.trim().is_empty();
            if !blank && seen.insert(experiment.id.clone()) {
                continue;
            }

            let base = if blank {
                format!("exp-{}", index + 1)
            } else {
                experiment.id.trim().to_string()
            };
            let mut candidate = base.clone();
            let mut suffix = 2;
            while seen.contains(&candidate) {
                candidate = format!("{base}-{suffix}");
                suffix += 1;
            }

            experiment.id = candidate.clone();
            seen.insert(candidate);
            changed += 1;
        }

        changed
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{experiment, sample_report};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_value_accepts_number_and_string() {
        let numeric: ParamValue = serde_json::from_value(json!(0.0003)).unwrap();
        assert!(matches!(numeric, ParamValue::Number(_)));
        let text: ParamValue = serde_json::from_value(json!("3e-4")).unwrap();
        assert_eq!(text, ParamValue::Text("3e-4".to_string()));
        assert_eq!(text.to_string(), "3e-4");
        assert_eq!(ParamValue::Number(64.into()).to_string(), "64");
    }

    #[test]
    fn test_hyperparameters_default_when_absent() {
        let mut value = serde_json::to_value(experiment("E1")).unwrap();
        value.as_object_mut().unwrap().remove("hyperparameters");
        let parsed: Experiment = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.hyperparameters, Hyperparameters::default());
        assert!(parsed.hyperparameters.known().is_empty());
    }

    #[test]
    fn test_known_hyperparameters_in_order() {
        let exp = experiment("E1");
        let names: Vec<&str> = exp.hyperparameters.known().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["learning_rate", "batch_size", "epochs", "optimizer"]);
    }

    #[test]
    fn test_absent_optional_fields_are_omitted_on_serialize() {
        let mut report = sample_report();
        report.pseudocode = None;
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("pseudocode").is_none());
        assert!(value["datasets"][1].get("url").is_none());
        assert!(value["experiments"][0]["hyperparameters"]
            .get("regularization")
            .is_none());
    }

    #[test]
    fn test_null_optional_fields_deserialize_as_none() {
        let mut value = serde_json::to_value(sample_report()).unwrap();
        value["datasets"][0]["url"] = json!(null);
        value["experiments"][0]["hyperparameters"]["other_critical_params"] = json!(null);
        let report: Report = serde_json::from_value(value).unwrap();
        assert_eq!(report.datasets[0].url, None);
        assert_eq!(report.experiments[0].hyperparameters.other_critical_params, None);
    }

    #[test]
    fn test_unique_ids_left_alone() {
        let mut report = sample_report();
        assert_eq!(report.ensure_unique_experiment_ids(), 0);
        let ids: Vec<&str> = report.experiments.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["E1", "E2"]);
    }

    #[test]
    fn test_duplicate_ids_are_rekeyed() {
        let mut report = sample_report();
        report.experiments = vec![experiment("E1"), experiment("E1"), experiment("E1")];
        assert_eq!(report.ensure_unique_experiment_ids(), 2);
        let ids: Vec<&str> = report.experiments.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["E1", "E1-2", "E1-3"]);
    }

    #[test]
    fn test_rekeying_avoids_existing_suffixed_ids() {
        let mut report = sample_report();
        report.experiments = vec![experiment("A"), experiment("A-2"), experiment("A")];
        report.ensure_unique_experiment_ids();
        let ids: Vec<&str> = report.experiments.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "A-2", "A-3"]);
    }

    #[test]
    fn test_blank_ids_get_positional_keys() {
        let mut report = sample_report();
        report.experiments = vec![experiment("  "), experiment("E2"), experiment("")];
        assert_eq!(report.ensure_unique_experiment_ids(), 2);
        let ids: Vec<&str> = report.experiments.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["exp-1", "E2", "exp-3"]);
    }

    #[test]
    fn test_unique_ids_keep_surrounding_whitespace() {
        let mut report = sample_report();
        report.experiments = vec![experiment(" E1"), experiment("E2 ")];
        assert_eq!(report.ensure_unique_experiment_ids(), 0);
        let ids: Vec<&str> = report.experiments.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec![" E1", "E2 "]);
    }
}
