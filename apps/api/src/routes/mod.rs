pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::analysis::handlers::{self, MAX_UPLOAD_BYTES};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route(
            "/api/v1/analyze",
            post(handlers::handle_analyze).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/export", post(handlers::handle_export))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::analyzer::stub::{StubModel, StubReply};
    use crate::analysis::analyzer::AnalysisSettings;
    use crate::analysis::report::fixtures::sample_report;
    use crate::analysis::report::Report;
    use crate::llm_client::{ContentPart, MAX_OUTPUT_TOKENS};

    const BOUNDARY: &str = "expgen-test-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            file_name: &'a str,
            mime_type: &'a str,
            bytes: &'a [u8],
        },
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    file_name,
                    mime_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn app(model: Arc<StubModel>) -> Router {
        build_router(AppState {
            llm: model,
            settings: AnalysisSettings {
                timeout: Duration::from_secs(30),
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        })
    }

    fn report_reply() -> StubReply {
        StubReply::Text(serde_json::to_string(&sample_report()).unwrap())
    }

    async fn post_form(app: Router, uri: &str, parts: &[Part<'_>]) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(parts)))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(Arc::new(StubModel::replying(report_reply())));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_analyze_pasted_text_returns_report() {
        let model = Arc::new(StubModel::replying(report_reply()));
        let response = post_form(
            app(model.clone()),
            "/api/v1/analyze",
            &[Part::Text("text", "Paper body"), Part::Text("notes", "Focus on E1")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let report: Report = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(report, sample_report());
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_analyze_without_content_is_rejected_before_model_call() {
        let model = Arc::new(StubModel::replying(report_reply()));
        let response = post_form(
            app(model.clone()),
            "/api/v1/analyze",
            &[Part::Text("text", "  "), Part::Text("notes", "anything")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "NO_CONTENT");
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_upload_sends_inline_pdf() {
        let model = Arc::new(StubModel::replying(report_reply()));
        let response = post_form(
            app(model.clone()),
            "/api/v1/analyze",
            &[
                Part::Text("text", "ignored because a file is present"),
                Part::File {
                    file_name: "paper.pdf",
                    mime_type: "application/pdf",
                    bytes: b"%PDF-1.4 test",
                },
            ],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let calls = model.calls.lock().unwrap();
        assert!(
            matches!(&calls[0][0], ContentPart::InlineData(d) if d.mime_type == "application/pdf")
        );
    }

    #[tokio::test]
    async fn test_empty_unnamed_file_part_is_ignored() {
        let model = Arc::new(StubModel::replying(report_reply()));
        let response = post_form(
            app(model.clone()),
            "/api/v1/analyze",
            &[
                Part::File {
                    file_name: "",
                    mime_type: "application/octet-stream",
                    bytes: b"",
                },
                Part::Text("text", "Paper body"),
            ],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let calls = model.calls.lock().unwrap();
        assert!(matches!(&calls[0][0], ContentPart::Text(t) if t.ends_with("Paper body")));
    }

    #[tokio::test]
    async fn test_oversized_upload_is_content_too_large() {
        let model = Arc::new(StubModel::replying(report_reply()));
        let oversized = vec![b'%'; MAX_UPLOAD_BYTES + 1024 * 1024];
        let response = post_form(
            app(model.clone()),
            "/api/v1/analyze",
            &[Part::File {
                file_name: "huge.pdf",
                mime_type: "application/pdf",
                bytes: &oversized,
            }],
        )
        .await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await["error"]["code"], "CONTENT_TOO_LARGE");
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_configuration_error() {
        let model = Arc::new(StubModel::unconfigured());
        let response = post_form(
            app(model.clone()),
            "/api/v1/analyze",
            &[Part::Text("text", "Paper body")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "CONFIGURATION_ERROR"
        );
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_garbage_model_output_is_bad_gateway() {
        let model = Arc::new(StubModel::replying(StubReply::Text(
            "I'm sorry, I can't help with that.".to_string(),
        )));
        let response = post_form(
            app(model),
            "/api/v1/analyze",
            &[Part::Text("text", "Paper body")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "MALFORMED_RESPONSE");
        assert_eq!(
            body["error"]["message"],
            "The AI response was not valid JSON. Please try again."
        );
    }

    #[tokio::test]
    async fn test_markdown_download() {
        let model = Arc::new(StubModel::replying(report_reply()));
        let response = post_form(
            app(model),
            "/api/v1/analyze?format=markdown&download=true",
            &[Part::Text("text", "Paper body")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"experiment_plan.md\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8(bytes.to_vec())
            .unwrap()
            .starts_with("# Experiment Plan"));
    }

    #[tokio::test]
    async fn test_export_returns_indented_json_attachment() {
        let app = app(Arc::new(StubModel::replying(report_reply())));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/export?download=true")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_string(&sample_report()).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"experiment_plan.json\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("{\n  \"research_question\""));
        let reparsed: Report = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, sample_report());
    }
}
