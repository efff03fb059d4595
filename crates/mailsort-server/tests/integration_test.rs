//! Integration tests for the mailsort HTTP service

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use mailsort_server::{create_router, AppState, ServerConfig};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDARY: &str = "mailsort-test-boundary";

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a [u8]),
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(filename, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn local_app() -> Router {
    let state = AppState::new(ServerConfig::default(), None).unwrap();
    create_router(state)
}

async fn classify(app: Router, parts: &[Part<'_>]) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/classify")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn score_of(body: &Value) -> f64 {
    body["score"].as_f64().unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = local_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_thanks_message_short_circuits() {
    let (status, body) = classify(
        local_app(),
        &[
            Part::Text("raw_text", "Obrigado pela atenção, tudo certo!"),
            Part::Text("return_debug", "true"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Unproductive");
    assert!((score_of(&body) - 0.97).abs() < 1e-6);
    assert_eq!(body["suggested_subject"], "Re: Mensagem recebida");
    assert_eq!(body["explanations"]["provider"], "rule");
    assert_eq!(body["explanations"]["remote"]["status"], "unavailable");
}

#[tokio::test]
async fn test_support_request_is_productive() {
    let text = "Preciso de status do chamado 4521, há um erro no sistema.";
    let (status, body) = classify(local_app(), &[Part::Text("raw_text", text)]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Productive");
    assert!((score_of(&body) - 0.9).abs() < 1e-5);
    assert_eq!(body["suggested_subject"], "Re: Sua solicitação");
    assert!(body["suggested_reply"]
        .as_str()
        .unwrap()
        .contains("4 horas úteis"));
    assert_eq!(body["meta"]["chars"], text.chars().count());
}

#[tokio::test]
async fn test_explanations_hidden_by_default() {
    let (status, body) = classify(local_app(), &[Part::Text("raw_text", "Bom dia!")]).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("explanations").is_none());
}

#[tokio::test]
async fn test_empty_content_rejected() {
    let (status, body) = classify(local_app(), &[Part::Text("raw_text", "")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "empty content");
    assert_eq!(body["error"]["type"], "invalid_request_error");

    let (status, _) = classify(local_app(), &[Part::Text("raw_text", " \r\n\r\n\t ")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unsupported_extension_rejected() {
    let (status, body) = classify(
        local_app(),
        &[Part::File("relatorio.docx", b"PK\x03\x04 not really a docx")],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"]["message"].as_str().unwrap();
    assert_eq!(message, "unsupported format 'relatorio.docx', use .txt or .pdf");
}

#[tokio::test]
async fn test_text_file_wins_over_inline_text() {
    let (status, body) = classify(
        local_app(),
        &[
            Part::Text("raw_text", "Bom dia!"),
            Part::File("EMAIL.TXT", "Segue o pedido em anexo, favor resolver.".as_bytes()),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Productive");
}

#[tokio::test]
async fn test_pdf_upload_classified() {
    let pdf = include_bytes!("../../mailsort-core/tests/fixtures/two_pages.pdf");
    let (status, body) = classify(local_app(), &[Part::File("chamado.pdf", pdf)]).await;

    assert_eq!(status, StatusCode::OK);
    // "pedido" on page one, "protocolo" on page two
    assert_eq!(body["category"], "Productive");
    assert!((score_of(&body) - 0.8).abs() < 1e-5);
    assert!(body["meta"]["chars"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_pdf_without_media_box_rejected() {
    let pdf = include_bytes!("../../mailsort-core/tests/fixtures/no_media_box.pdf");
    let (status, body) = classify(local_app(), &[Part::File("scan.pdf", pdf)]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("could not extract text"));
}

#[tokio::test]
async fn test_oversized_request_gets_json_413() {
    let config = ServerConfig {
        max_upload_bytes: 64,
        ..ServerConfig::default()
    };
    let app = create_router(AppState::new(config, None).unwrap());

    let body = multipart_body(&[Part::Text("raw_text", &"a".repeat(1024))]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/classify")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["message"], "request body too large");
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn test_malformed_pdf_rejected() {
    let (status, body) = classify(local_app(), &[Part::File("scan.pdf", b"%PDF-garbage")]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("could not extract text"));
}

#[tokio::test]
async fn test_non_multipart_body_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/classify")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"raw_text":"oi"}"#))
        .unwrap();

    let response = local_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remote_server_error_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = ServerConfig::default();
    config.classifier.api_url = format!("{}/models/xnli", server.uri());
    config.classifier.api_token = Some("hf_test_token".to_string());
    let app = create_router(AppState::new(config, None).unwrap());

    let (status, body) = classify(
        app,
        &[
            Part::Text("raw_text", "Preciso de suporte com o protocolo 99"),
            Part::Text("return_debug", "1"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Productive");
    assert_eq!(body["explanations"]["provider"], "heuristic");
    assert_eq!(
        body["explanations"]["remote"]["reason"],
        "remote classifier returned HTTP 500"
    );
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let response = local_app()
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_page_served() {
    let response = local_app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8_lossy(&bytes);
    assert!(html.contains("/api/classify"));
}

#[tokio::test]
async fn test_stylesheet_served_under_static() {
    let response = local_app()
        .oneshot(Request::get("/static/style.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
}
