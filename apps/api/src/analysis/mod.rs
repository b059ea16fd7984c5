// Paper analysis: request building, the model call, response interpretation,
// and report export.
// All model calls go through llm_client; no direct Gemini calls here.

pub mod analyzer;
pub mod error;
pub mod export;
pub mod handlers;
pub mod prompts;
pub mod render;
pub mod report;
pub mod request;
pub mod response;
pub mod schema;
pub mod session;
