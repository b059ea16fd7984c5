//! Builds the content parts of one model request from pasted text or an
//! uploaded file, plus optional focus notes.
//!
//! No network I/O happens here. Reading a file from disk is the only await point.

#[cfg(test)]
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use tracing::debug;

use crate::analysis::error::AnalysisError;
use crate::analysis::prompts::{ATTACHMENT_CAPTION, FOCUS_NOTES_PREFIX, PASTED_TEXT_PREFIX};
use crate::llm_client::{ContentPart, InlineData};

/// Used when an upload arrives without a content type.
pub const DEFAULT_ATTACHMENT_MIME: &str = "application/pdf";

/// Where the bytes of an uploaded paper live.
#[derive(Debug, Clone)]
pub enum PaperSource {
    /// Already buffered, e.g. a multipart upload.
    Bytes(Bytes),
    /// On disk; read when the request is built.
    #[cfg(test)]
    Path(PathBuf),
}

/// A paper file plus its declared mime type.
#[derive(Debug, Clone)]
pub struct PaperFile {
    pub mime_type: String,
    pub source: PaperSource,
}

impl PaperFile {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            mime_type: mime_type.into(),
            source: PaperSource::Bytes(bytes.into()),
        }
    }

    #[cfg(test)]
    pub fn from_path(mime_type: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            mime_type: mime_type.into(),
            source: PaperSource::Path(path.into()),
        }
    }

    async fn read(&self) -> Result<Bytes, AnalysisError> {
        let bytes = match &self.source {
            PaperSource::Bytes(bytes) => bytes.clone(),
            #[cfg(test)]
            PaperSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|e| AnalysisError::FileRead(e.to_string()))?,
        };

        if bytes.is_empty() {
            return Err(AnalysisError::FileRead("the file is empty".to_string()));
        }
        Ok(bytes)
    }
}

/// The paper itself: exactly one of pasted text or an encoded attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum PaperContent {
    Text(String),
    Attachment {
        mime_type: String,
        /// Base64 (standard alphabet, padded).
        data: String,
    },
}

/// Everything the model needs to see about one paper.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub content: PaperContent,
    pub focus_notes: Option<String>,
}

impl AnalysisRequest {
    /// Outbound content parts: the paper first, focus notes last.
    pub fn parts(&self) -> Vec<ContentPart> {
        let mut parts = match &self.content {
            PaperContent::Attachment { mime_type, data } => vec![
                ContentPart::InlineData(InlineData {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                }),
                ContentPart::text(ATTACHMENT_CAPTION),
            ],
            PaperContent::Text(text) => {
                vec![ContentPart::text(format!("{PASTED_TEXT_PREFIX}{text}"))]
            }
        };

        if let Some(notes) = &self.focus_notes {
            parts.push(ContentPart::text(format!("{FOCUS_NOTES_PREFIX}{notes}")));
        }
        parts
    }
}

/// Builds the request for one analysis.
///
/// A file always wins over pasted text. Blank text with no file is `NoContent`
/// and performs no I/O. Notes are sent verbatim unless empty.
pub async fn build_request(
    raw_text: &str,
    file: Option<&PaperFile>,
    notes: &str,
) -> Result<AnalysisRequest, AnalysisError> {
    let content = match file {
        Some(file) => {
            let bytes = file.read().await?;
            let mime_type = match file.mime_type.trim() {
                "" => DEFAULT_ATTACHMENT_MIME.to_string(),
                declared => declared.to_string(),
            };
            debug!(mime_type = %mime_type, size = bytes.len(), "Encoding paper attachment");
            PaperContent::Attachment {
                mime_type,
                data: BASE64.encode(&bytes),
            }
        }
        None if raw_text.trim().is_empty() => return Err(AnalysisError::NoContent),
        None => PaperContent::Text(raw_text.to_string()),
    };

    let focus_notes = (!notes.is_empty()).then(|| notes.to_string());

    Ok(AnalysisRequest {
        content,
        focus_notes,
    })
}
