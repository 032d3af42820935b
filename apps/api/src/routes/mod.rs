pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Documents API
        .route(
            "/api/v1/documents/generate",
            post(handlers::handle_generate),
        )
        .route("/api/v1/documents/render", post(handlers::handle_render))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::layout::{default_layout_config, PdfEmitter};
    use crate::llm_client::{LlmError, TextGenerator};

    const RESUME: &str = "# Jane Doe\njane@x.com\n555-0100\n### Experience\n- Built things\n";

    struct StubGenerator {
        reply: Result<&'static str, u16>,
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(LlmError::Api {
                    status,
                    body: "rate limited".to_string(),
                }),
            }
        }
    }

    fn app(reply: Result<&'static str, u16>) -> Router {
        build_router(AppState {
            generator: Arc::new(StubGenerator { reply }),
            emitter: Arc::new(PdfEmitter),
            layout: default_layout_config(),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Ok(RESUME))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_resume_reports_rendered_document() {
        let response = app(Ok(RESUME))
            .oneshot(post_json(
                "/api/v1/documents/generate",
                json!({"document_type": "Resume", "name": "Jane Doe"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["text"], RESUME);
        assert_eq!(body["document"]["status"], "rendered");
        assert_eq!(body["document"]["file_name"], "Resume_Jane_Doe.pdf");
        assert_eq!(body["document"]["truncated"], false);
    }

    #[tokio::test]
    async fn test_generate_failure_suppresses_document() {
        let response = app(Err(429))
            .oneshot(post_json(
                "/api/v1/documents/generate",
                json!({"document_type": "Cover Letter", "name": "Jane"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["text"], "Error: 429 - rate limited");
        assert_eq!(body["document"]["status"], "suppressed");
    }

    #[tokio::test]
    async fn test_generate_download_returns_the_rendered_document() {
        let report = json_body(
            app(Ok(RESUME))
                .oneshot(post_json(
                    "/api/v1/documents/generate",
                    json!({"document_type": "Resume", "name": "Jane Doe"}),
                ))
                .await
                .unwrap(),
        )
        .await;

        let response = app(Ok(RESUME))
            .oneshot(post_json(
                "/api/v1/documents/generate?download=true",
                json!({"document_type": "Resume", "name": "Jane Doe"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Resume_Jane_Doe.pdf\""
        );
        assert_eq!(response.headers()["x-layout-truncated"], "false");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(
            report["document"]["size_bytes"].as_u64(),
            Some(bytes.len() as u64)
        );
    }

    #[tokio::test]
    async fn test_generate_download_falls_back_to_report_when_suppressed() {
        let response = app(Err(500))
            .oneshot(post_json(
                "/api/v1/documents/generate?download=true",
                json!({"document_type": "Resume", "name": "Jane"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let body = json_body(response).await;
        assert_eq!(body["text"], "Error: 500 - rate limited");
        assert_eq!(body["document"]["status"], "suppressed");
    }

    #[tokio::test]
    async fn test_render_returns_pdf_attachment() {
        let response = app(Ok(RESUME))
            .oneshot(post_json(
                "/api/v1/documents/render",
                json!({"document_type": "Cover Letter", "name": "Jane Doe", "text": RESUME}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Cover Letter_Jane_Doe.pdf\""
        );
        assert_eq!(response.headers()["x-layout-truncated"], "false");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_render_rejects_empty_text() {
        let response = app(Ok(RESUME))
            .oneshot(post_json(
                "/api/v1/documents/render",
                json!({"document_type": "Resume", "name": "Jane", "text": "  \n"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_render_rejects_error_text() {
        let response = app(Ok(RESUME))
            .oneshot(post_json(
                "/api/v1/documents/render",
                json!({"document_type": "Resume", "name": "Jane", "text": "Error: 500 - boom"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
