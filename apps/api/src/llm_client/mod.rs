/// LLM Client — the single point of entry for all Gemini API calls in ExpGen.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model interactions MUST go through this module.
///
/// Model: gemini-2.5-flash (hardcoded, not configurable)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// The model used for every analysis.
pub const MODEL: &str = "gemini-2.5-flash";
/// Output token ceiling for one analysis.
pub const MAX_OUTPUT_TOKENS: u32 = 32768;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Gemini API key is not configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One discrete unit of an outbound request payload.
///
/// Serializes to the Gemini wire shape: `{"text": "..."}` or
/// `{"inlineData": {"mimeType": "...", "data": "<base64>"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentPart {
    Text(String),
    InlineData(InlineData),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text(text.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// Provider-neutral description of a single structured-output call.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    pub system_instruction: &'a str,
    pub parts: &'a [ContentPart],
    pub response_schema: &'a Value,
    pub max_output_tokens: u32,
}

/// What came back from the model, before any interpretation.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    pub text: Option<String>,
    pub finish_reason: Option<String>,
    pub usage: Option<UsageMetadata>,
}

/// Seam between the analysis pipeline and the model provider.
///
/// Carried in `AppState` as `Arc<dyn GenerativeModel>` so tests can swap in stubs.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Fails fast when required credentials are missing. Must not touch the network.
    fn ensure_configured(&self) -> Result<(), LlmError> {
        Ok(())
    }

    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<GenerationOutput, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    system_instruction: GeminiSystemInstruction<'a>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: &'a [ContentPart],
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction<'a> {
    parts: Vec<SystemPart<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
    /// Thinking models emit summary parts flagged `thought: true`.
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GeminiResponse {
    /// Concatenates the answer text parts of the first candidate.
    /// Returns `None` when the candidate carries no text at all.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single Gemini client used by the analysis pipeline.
///
/// No retries: every failure is surfaced to the caller, who may resubmit.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
        })
    }

    fn endpoint_url(&self, api_key: &str) -> String {
        format!("{GEMINI_API_BASE}/models/{MODEL}:generateContent?key={api_key}")
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn ensure_configured(&self) -> Result<(), LlmError> {
        self.api_key.as_ref().map(|_| ()).ok_or(LlmError::MissingApiKey)
    }

    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<GenerationOutput, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let body = build_request_body(request);

        debug!(
            model = MODEL,
            parts = request.parts.len(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint_url(api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            warn!("Gemini API returned {}", status);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body_text),
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&body_text)?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            warn!(block_reason = reason, "Gemini blocked the prompt");
        }

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={:?}, output_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(GenerationOutput {
            text: parsed.text(),
            finish_reason: parsed.finish_reason().map(str::to_string),
            usage: parsed.usage_metadata,
        })
    }
}

fn build_request_body<'a>(request: &'a GenerationRequest<'a>) -> GeminiRequest<'a> {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: "user",
            parts: request.parts,
        }],
        system_instruction: GeminiSystemInstruction {
            parts: vec![SystemPart {
                text: request.system_instruction,
            }],
        },
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: request.response_schema,
            max_output_tokens: request.max_output_tokens,
        },
    }
}

/// Pulls `error.message` out of a Gemini error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<GeminiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
