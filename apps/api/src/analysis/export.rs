//! Report export. The JSON form is the one byte-stable surface: downstream tools
//! read `experiment_plan.json` by field name.

use crate::analysis::render::render_markdown;
use crate::analysis::report::Report;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
        }
    }

    /// Download header; the JSON file name is what downstream tools look for.
    pub fn content_disposition(self) -> &'static str {
        match self {
            ExportFormat::Json => "attachment; filename=\"experiment_plan.json\"",
            ExportFormat::Markdown => "attachment; filename=\"experiment_plan.md\"",
        }
    }
}

/// Serializes the report as two-space indented JSON.
pub fn export_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn export(report: &Report, format: ExportFormat) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Json => export_json(report),
        ExportFormat::Markdown => Ok(render_markdown(report)),
    }
}
