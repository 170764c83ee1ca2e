/// Telegram notifier against a mocked Bot API.
use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ledvision_api::config::TelegramConfig;
use ledvision_api::errors::AppError;
use ledvision_api::models::Lead;
use ledvision_api::notifier::{format_lead_message, LeadNotifier, TelegramNotifier};

fn notifier(base_url: &str) -> TelegramNotifier {
    TelegramNotifier::new(&TelegramConfig {
        api_base_url: base_url.to_string(),
        bot_token: "777:secret-token".to_string(),
        chat_id: "-1001234".to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

fn sample_lead() -> Lead {
    Lead {
        id: 3,
        created_at: Utc::now(),
        name: "Yerlan".to_string(),
        phone: "+7 777 123 45 67".to_string(),
        city: "Shymkent".to_string(),
        message: String::new(),
        page_url: "https://ledvision.kz/".to_string(),
        source: "general".to_string(),
        product_id: None,
        solution_id: None,
        status: "new".to_string(),
        manager_note: String::new(),
    }
}

#[tokio::test]
async fn sends_message_to_configured_chat() {
    let server = MockServer::start().await;
    let lead = sample_lead();

    Mock::given(method("POST"))
        .and(path("/bot777:secret-token/sendMessage"))
        .and(body_json(json!({
            "chat_id": "-1001234",
            "text": format_lead_message(&lead),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    notifier(&server.uri()).notify(&lead).await.unwrap();
}

#[tokio::test]
async fn error_status_is_reported_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = notifier(&server.uri())
        .notify(&sample_lead())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ExternalApiError(_)));
    assert!(err.to_string().contains("500"));
    assert!(!err.to_string().contains("secret-token"));
}

#[tokio::test]
async fn connection_failure_hides_token() {
    let err = notifier("http://127.0.0.1:1")
        .notify(&sample_lead())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ExternalApiError(_)));
    assert!(!err.to_string().contains("secret-token"));
}

#[tokio::test]
async fn circuit_opens_after_consecutive_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let notifier = notifier(&server.uri());
    for _ in 0..3 {
        assert!(notifier.notify(&sample_lead()).await.is_err());
    }

    // Fourth call is dropped by the breaker without reaching the server
    let err = notifier.notify(&sample_lead()).await.unwrap_err();
    assert!(err.to_string().contains("circuit open"));
}
