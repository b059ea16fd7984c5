//! Markdown rendering of a report, one section per report tab:
//! Overview, Experiments, Implementation, Analysis & Risks.

use crate::analysis::report::{Experiment, Report};

pub fn render_markdown(report: &Report) -> String {
    let mut out = String::from("# Experiment Plan\n");
    render_overview(&mut out, report);
    render_experiments(&mut out, report);
    render_implementation(&mut out, report);
    render_analysis(&mut out, report);
    out
}

fn heading(out: &mut String, level: usize, title: &str) {
    out.push('\n');
    out.push_str(&"#".repeat(level));
    out.push(' ');
    out.push_str(title);
    out.push_str("\n\n");
}

fn paragraph(out: &mut String, text: &str) {
    out.push_str(text.trim());
    out.push('\n');
}

fn bullets(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    heading(out, 3, title);
    for item in items {
        out.push_str(&format!("- {}\n", item.trim()));
    }
}

fn numbered(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    heading(out, 3, title);
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, item.trim()));
    }
}

fn render_overview(out: &mut String, report: &Report) {
    heading(out, 2, "Overview");
    heading(out, 3, "Research Question");
    paragraph(out, &report.research_question);
    heading(out, 3, "Motivation");
    paragraph(out, &report.motivation);
    heading(out, 3, "Methods Summary");
    paragraph(out, &report.methods_summary);
    bullets(out, "Key Contributions", &report.key_contributions);
    bullets(out, "Assumptions", &report.assumptions);
    bullets(out, "Tasks / Domains", &report.tasks_or_domains);
    bullets(out, "Baselines", &report.baselines);
    bullets(out, "Metrics", &report.metrics);

    if !report.datasets.is_empty() {
        heading(out, 3, "Datasets");
        out.push_str("| Name | Access | Modalities | URL |\n|---|---|---|---|\n");
        for dataset in &report.datasets {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                dataset.name,
                dataset.public_or_private,
                dataset.modalities.join(", "),
                dataset.url.as_deref().unwrap_or("-"),
            ));
        }
    }

    heading(out, 3, "Compute Requirements");
    out.push_str(&format!(
        "- Hardware: {}\n- Approximate training time: {}\n",
        report.compute_requirements.hardware, report.compute_requirements.approximate_training_time
    ));
}

fn render_experiment(out: &mut String, experiment: &Experiment) {
    heading(out, 3, &format!("{}: {}", experiment.id, experiment.goal));
    out.push_str(&format!(
        "- Setup: {}\n- Dataset: {}\n- Model / algorithm: {}\n",
        experiment.setup_summary, experiment.dataset, experiment.model_or_algorithm
    ));

    let params = &experiment.hyperparameters;
    for (name, value) in params.known() {
        out.push_str(&format!("- `{name}`: {value}\n"));
    }
    for param in params.other_critical_params.iter().flatten() {
        out.push_str(&format!("- `{}`: {}\n", param.name, param.value));
    }

    numbered(out, "Training Procedure", &experiment.training_procedure);
    numbered(out, "Evaluation Procedure", &experiment.evaluation_procedure);
    heading(out, 3, "Expected Outcomes");
    paragraph(out, &experiment.expected_outcomes);
}

fn render_experiments(out: &mut String, report: &Report) {
    heading(out, 2, "Experiments");
    for experiment in &report.experiments {
        render_experiment(out, experiment);
    }

    if !report.ablations.is_empty() {
        heading(out, 3, "Ablations");
        for ablation in &report.ablations {
            out.push_str(&format!("- **{}**: {}\n", ablation.name, ablation.what_it_tests));
        }
    }
    if !report.baselines_to_implement.is_empty() {
        heading(out, 3, "Baselines to Implement");
        for baseline in &report.baselines_to_implement {
            out.push_str(&format!("- **{}**: {}\n", baseline.name, baseline.notes));
        }
    }
    bullets(out, "Failure Modes", &report.failure_modes);
}

fn render_implementation(out: &mut String, report: &Report) {
    heading(out, 2, "Implementation");
    numbered(out, "Data Preparation", &report.data_preparation_steps);
    numbered(out, "Model Definition", &report.model_definition_steps);
    numbered(out, "Training Loop", &report.training_loop_steps);
    numbered(out, "Evaluation Loop", &report.evaluation_loop_steps);
    numbered(out, "Logging & Tracking", &report.logging_and_tracking);

    if let Some(pseudocode) = report.pseudocode.as_deref().filter(|p| !p.trim().is_empty()) {
        heading(out, 3, "Pseudocode");
        out.push_str("```python\n");
        out.push_str(pseudocode.trim_end());
        out.push_str("\n```\n");
    }
}

fn render_analysis(out: &mut String, report: &Report) {
    heading(out, 2, "Analysis & Risks");
    bullets(out, "Limitations", &report.limitations);
    bullets(out, "Reproducibility Risks", &report.reproducibility_risks);
    bullets(out, "Ethical Considerations", &report.ethical_considerations);
    let extensions = &report.extensions_and_future_work;
    bullets(out, "Straightforward Extensions", &extensions.straightforward_extensions);
    bullets(out, "Ambitious Extensions", &extensions.ambitious_extensions);
    bullets(out, "New Hypotheses", &report.new_hypotheses);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report::fixtures::sample_report;

    #[test]
    fn test_sections_follow_tab_order() {
        let md = render_markdown(&sample_report());
        let positions: Vec<usize> = [
            "## Overview",
            "## Experiments",
            "## Implementation",
            "## Analysis & Risks",
        ]
        .iter()
        .map(|h| md.find(h).unwrap_or_else(|| panic!("missing {h}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_experiments_render_hyperparameters() {
        let md = render_markdown(&sample_report());
        assert!(md.contains("### E1: Reproduce the headline accuracy on CIFAR-10"));
        assert!(md.contains("- `batch_size`: 128"));
        assert!(md.contains("- `rho`: 0.05"));
        assert!(md.contains("1. Load data\n2. Train 200 epochs"));
    }

    #[test]
    fn test_private_dataset_without_url() {
        let md = render_markdown(&sample_report());
        assert!(md.contains("| Internal-Eval | private | image, text | - |"));
    }

    #[test]
    fn test_pseudocode_in_code_block() {
        let md = render_markdown(&sample_report());
        assert!(md.contains("```python\nfor x, y in loader:"));
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let mut report = sample_report();
        report.pseudocode = None;
        report.ablations.clear();
        report.new_hypotheses.clear();
        let md = render_markdown(&report);
        assert!(!md.contains("### Pseudocode"));
        assert!(!md.contains("### Ablations"));
        assert!(!md.contains("### New Hypotheses"));
    }
}
