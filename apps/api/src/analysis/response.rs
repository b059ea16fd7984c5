//! Turns raw model text into a typed `Report` or a diagnosed error.
//! Pure and all-or-nothing.

use serde_json::error::Category;
use serde_json::Value;
use tracing::warn;

use crate::analysis::error::AnalysisError;
use crate::analysis::report::Report;

/// Parses raw model text into a typed report.
///
/// Steps: blank check → brace extraction → JSON parse → typed conversion →
/// experiment id re-keying.
pub fn interpret_response(raw: &str) -> Result<Report, AnalysisError> {
    let value = extract_json(raw)?;

    let mut report: Report = serde_json::from_value(value).map_err(|e| {
        warn!("Model JSON did not match the report schema: {e}");
        AnalysisError::SchemaMismatch(e.to_string())
    })?;

    let rekeyed = report.ensure_unique_experiment_ids();
    if rekeyed > 0 {
        warn!(rekeyed, "Model returned duplicate or blank experiment ids");
    }

    Ok(report)
}

/// Locates and parses the JSON object inside raw model text.
///
/// Tolerates prose or code fences around the object by taking everything from
/// the first `{` to the last `}`. Without such a span the whole text is parsed.
pub fn extract_json(raw: &str) -> Result<Value, AnalysisError> {
    if raw.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    serde_json::from_str(json_candidate(raw)).map_err(|e| {
        warn!("Failed to parse model response as JSON: {e}");
        match e.classify() {
            // Unterminated string or object: the model ran out of output tokens.
            Category::Eof => AnalysisError::TruncatedOutput,
            _ => AnalysisError::MalformedResponse,
        }
    })
}

fn json_candidate(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw,
    }
}
