//! Analysis orchestration — the only path from user input to a typed report.
//!
//! Flow: ensure_configured → build_request → model.generate (under a deadline) →
//!       interpret_response.
//!
//! Two await points: reading the uploaded file and waiting on the model.

use std::time::Duration;

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::error::AnalysisError;
use crate::analysis::prompts::system_instruction;
use crate::analysis::report::Report;
use crate::analysis::request::{build_request, PaperFile};
use crate::analysis::response::interpret_response;
use crate::analysis::schema::report_schema;
use crate::config::Config;
use crate::llm_client::{GenerationRequest, GenerativeModel, MAX_OUTPUT_TOKENS};

/// What the caller submitted.
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    pub text: String,
    pub file: Option<PaperFile>,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    /// Deadline for the model call. Expiry cancels the call.
    pub timeout: Duration,
    pub max_output_tokens: u32,
}

impl AnalysisSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.analysis_timeout,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// Runs one analysis end to end.
///
/// Every failure is terminal for this attempt; nothing is retried.
pub async fn analyze(
    model: &dyn GenerativeModel,
    input: &AnalysisInput,
    settings: &AnalysisSettings,
) -> Result<Report, AnalysisError> {
    let analysis_id = Uuid::new_v4();
    run(model, input, settings)
        .instrument(info_span!("analysis", %analysis_id))
        .await
}

async fn run(
    model: &dyn GenerativeModel,
    input: &AnalysisInput,
    settings: &AnalysisSettings,
) -> Result<Report, AnalysisError> {
    model.ensure_configured()?;

    let request = build_request(&input.text, input.file.as_ref(), &input.notes).await?;
    let parts = request.parts();
    let system = system_instruction();

    let generation = GenerationRequest {
        system_instruction: &system,
        parts: &parts,
        response_schema: report_schema(),
        max_output_tokens: settings.max_output_tokens,
    };

    info!(
        parts = parts.len(),
        has_notes = request.focus_notes.is_some(),
        "Submitting paper for analysis"
    );

    let output = tokio::time::timeout(settings.timeout, model.generate(&generation))
        .await
        .map_err(|_| {
            warn!("Model call exceeded {:?}", settings.timeout);
            AnalysisError::Timeout(settings.timeout.as_secs())
        })??;

    if let Some(usage) = &output.usage {
        info!(
            prompt_tokens = ?usage.prompt_token_count,
            output_tokens = ?usage.candidates_token_count,
            total_tokens = ?usage.total_token_count,
            "Model call finished"
        );
    }
    if output.finish_reason.as_deref() == Some("MAX_TOKENS") {
        warn!("Model stopped at the output token limit; response is likely truncated");
    }

    let report = interpret_response(output.text.as_deref().unwrap_or_default())?;

    info!(
        experiments = report.experiments.len(),
        datasets = report.datasets.len(),
        "Analysis complete"
    );
    Ok(report)
}
