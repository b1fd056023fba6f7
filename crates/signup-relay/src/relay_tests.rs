use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::response::AutomationResponse;

/// Transport returning a canned result and counting calls.
struct FakeTransport {
    calls: AtomicUsize,
    reply: Mutex<Option<Result<AutomationResponse, RelayError>>>,
}

impl FakeTransport {
    fn replying(reply: Result<AutomationResponse, RelayError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: Mutex::new(Some(reply)),
        })
    }

    fn with_body(body: Value) -> Arc<Self> {
        Self::replying(Ok(serde_json::from_value(body).unwrap()))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AutomationTransport for FakeTransport {
    async fn execute(
        &self,
        _script: &AutomationScript,
        _credential: &str,
    ) -> Result<AutomationResponse, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(RelayError::Transport("called twice".to_string())))
    }
}

fn signup() -> Signup {
    Signup {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        is_scientist: true,
    }
}

fn live_config() -> AutomationConfig {
    AutomationConfig {
        token: Some("live-token".to_string()),
        ..Default::default()
    }
}

fn steps_with_html(html: &str) -> Value {
    let mut data = serde_json::Map::new();
    for label in [
        "goto",
        "waitForForm",
        "waitForFormLoad",
        "typeFirstName",
        "typeLastName",
        "typeEmail",
        "waitForRadios",
        "clickRadioLabel",
        "waitForButton",
        "clickSubmit",
    ] {
        data.insert(label.to_string(), json!({ "time": 1 }));
    }
    data.insert(
        "waitAfterSubmit".to_string(),
        json!({ "status": 200, "url": "https://forms.example.com/done" }),
    );
    data.insert("html".to_string(), json!({ "html": html }));
    json!({ "data": data })
}

#[tokio::test]
async fn test_mock_path_without_token() {
    let transport = FakeTransport::with_body(json!({}));
    let relay = FormRelay::with_transport(AutomationConfig::default(), transport.clone());

    assert_eq!(relay.mode(), RelayMode::Mock);
    let outcome = relay.submit_form(&signup()).await;

    assert!(outcome.success);
    assert!(outcome.is_mock());
    assert_eq!(outcome.message, MOCK_MESSAGE);
    let data = outcome.data.unwrap();
    assert_eq!(data["firstName"], "Ada");
    assert_eq!(data["lastName"], "Lovelace");
    assert_eq!(data["email"], "ada@example.com");
    assert_eq!(data["isScientist"], true);
    assert!(data["submittedAt"].as_str().unwrap().ends_with('Z'));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_mock_path_with_empty_or_sentinel_token() {
    for token in ["", "test_token"] {
        let transport = FakeTransport::with_body(json!({}));
        let config = AutomationConfig {
            token: Some(token.to_string()),
            ..Default::default()
        };
        let relay = FormRelay::with_transport(config, transport.clone());
        let outcome = relay.submit_form(&signup()).await;

        assert!(outcome.success);
        assert_eq!(outcome.data.as_ref().unwrap()["mock"], true);
        assert_eq!(transport.calls(), 0);
    }
}

#[tokio::test]
async fn test_live_success() {
    let transport = FakeTransport::with_body(steps_with_html("<p>Thank you for signing up</p>"));
    let relay = FormRelay::with_transport(live_config(), transport.clone());

    assert_eq!(relay.mode(), RelayMode::Live);
    let outcome = relay.submit_form(&signup()).await;

    assert!(outcome.success);
    assert!(!outcome.is_mock());
    assert_eq!(outcome.message, "Form submitted successfully");
    let data = outcome.data.unwrap();
    assert_eq!(data["html"], "<p>Thank you for signing up</p>");
    assert_eq!(data["url"], "https://forms.example.com/done");
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_live_heuristic_mismatch_keeps_evidence() {
    let transport = FakeTransport::with_body(steps_with_html("<form>Sign up</form>"));
    let relay = FormRelay::with_transport(live_config(), transport);

    let outcome = relay.submit_form(&signup()).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Form submission may have failed");
    assert_eq!(outcome.data.unwrap()["html"], "<form>Sign up</form>");
}

#[tokio::test]
async fn test_live_api_errors() {
    let transport = FakeTransport::with_body(json!({ "errors": [{ "message": "X" }] }));
    let relay = FormRelay::with_transport(live_config(), transport);

    let outcome = relay.submit_form(&signup()).await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("X"));
    assert!(outcome.data.is_none());
}

#[tokio::test]
async fn test_live_failed_step() {
    let mut body = steps_with_html("Thank you");
    body["data"]["typeEmail"] = Value::Null;
    let relay = FormRelay::with_transport(live_config(), FakeTransport::with_body(body));

    let outcome = relay.submit_form(&signup()).await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("typeEmail"));
}

#[tokio::test]
async fn test_transport_error_becomes_outcome() {
    let transport = FakeTransport::replying(Err(RelayError::Transport("connection reset".to_string())));
    let relay = FormRelay::with_transport(live_config(), transport);

    let outcome = relay.submit_form(&signup()).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Execution error: connection reset");
}

#[tokio::test]
async fn test_live_end_to_end_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chrome/bql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(steps_with_html("Success")))
        .expect(1)
        .mount(&server)
        .await;

    let config = AutomationConfig {
        url: format!("{}/chrome/bql", server.uri()),
        ..live_config()
    };
    let relay = FormRelay::new(config).unwrap();
    let outcome = relay.submit_form(&signup()).await;

    assert!(outcome.success);
    assert_eq!(outcome.message, SUCCESS_MESSAGE);
}

#[tokio::test]
async fn test_non_json_response_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>login</html>", "text/html"))
        .mount(&server)
        .await;

    let config = AutomationConfig {
        url: format!("{}/chrome/bql", server.uri()),
        ..live_config()
    };
    let outcome = FormRelay::new(config).unwrap().submit_form(&signup()).await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("instead of JSON"));
    assert!(!outcome.message.contains("ada@example.com"));
}

#[test]
fn test_outcome_serialization_skips_empty_data() {
    let outcome = SubmissionOutcome::failed("nope", None);
    let json = serde_json::to_string(&outcome).unwrap();
    assert_eq!(json, r#"{"success":false,"message":"nope"}"#);
}
