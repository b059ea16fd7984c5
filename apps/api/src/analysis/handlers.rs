//! Axum route handlers for the Analysis API.

use anyhow::anyhow;
use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::analysis::analyzer::{analyze, AnalysisInput};
use crate::analysis::error::AnalysisError;
use crate::analysis::export::{export, ExportFormat};
use crate::analysis::report::Report;
use crate::analysis::request::PaperFile;
use crate::analysis::session::{AnalysisSession, AnalysisState};
use crate::errors::AppError;
use crate::state::AppState;

/// Uploads above this are rejected before they reach the model.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct OutputQuery {
    #[serde(default)]
    pub format: ExportFormat,
    /// Adds `Content-Disposition: attachment` so browsers save the file.
    #[serde(default)]
    pub download: bool,
}

/// POST /api/v1/analyze
///
/// Multipart fields: `file` (paper upload), `text` (pasted paper), `notes`.
/// Returns the report as JSON, or Markdown with `?format=markdown`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Query(query): Query<OutputQuery>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let input = read_analysis_form(multipart).await?;

    let mut session = AnalysisSession::new();
    session.begin().map_err(|e| AppError::Internal(e.into()))?;
    let outcome = analyze(state.llm.as_ref(), &input, &state.settings).await;
    session
        .finish(outcome)
        .map_err(|e| AppError::Internal(e.into()))?;

    match session.into_state() {
        AnalysisState::Ready(report) => export_response(&report, &query),
        AnalysisState::Failed(failure) => Err(AppError::Analysis(failure)),
        other => Err(AppError::Internal(anyhow!(
            "analysis ended in unexpected state '{}'",
            other.name()
        ))),
    }
}

/// POST /api/v1/export
///
/// Re-exports a previously returned report, e.g. as a downloadable file.
pub async fn handle_export(
    Query(query): Query<OutputQuery>,
    Json(report): Json<Report>,
) -> Result<Response, AppError> {
    export_response(&report, &query)
}

async fn read_analysis_form(mut multipart: Multipart) -> Result<AnalysisInput, AppError> {
    let mut input = AnalysisInput::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let has_file_name = field.file_name().is_some_and(|n| !n.is_empty());
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(file_read_error)?;
                // Browsers send an empty unnamed part when no file was picked.
                if has_file_name || !bytes.is_empty() {
                    input.file = Some(PaperFile::from_bytes(mime_type, bytes));
                }
            }
            "text" => input.text = field.text().await.map_err(form_error)?,
            "notes" => input.notes = field.text().await.map_err(form_error)?,
            _ => {}
        }
    }

    Ok(input)
}

fn form_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AnalysisError::ContentTooLarge.into()
    } else {
        AppError::Validation(format!("Invalid analysis form: {}", err.body_text()))
    }
}

fn file_read_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AnalysisError::ContentTooLarge.into()
    } else {
        AnalysisError::FileRead(err.body_text()).into()
    }
}

fn export_response(report: &Report, query: &OutputQuery) -> Result<Response, AppError> {
    let body = export(report, query.format).map_err(|e| AppError::Internal(e.into()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(query.format.content_type()),
    );
    if query.download {
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static(query.format.content_disposition()),
        );
    }

    Ok((headers, body).into_response())
}
