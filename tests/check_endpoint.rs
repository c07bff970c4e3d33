//! End-to-end tests of the `/check` route over a scripted session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use browser_session::{ElementId, PageSession, SessionError, SessionFactory};
use byod_compat::server::{build_router, ServeState};
use compat_checker::{selectors, CheckerConfig, CompatChecker};
use serde_json::Value;
use tower::ServiceExt;

const VALID_IMEI: &str = "356938035643809";

#[derive(Default)]
struct ScriptedState {
    elements: HashMap<&'static str, Vec<&'static str>>,
    handles: Mutex<HashMap<ElementId, String>>,
}

#[derive(Clone, Default)]
struct ScriptedSession {
    state: Arc<ScriptedState>,
}

impl ScriptedSession {
    fn success_page() -> Self {
        let mut elements: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
        elements.insert(selectors::IMEI_INPUT, vec![""]);
        elements.insert(selectors::CHECK_BUTTON, vec!["Check compatibility"]);
        elements.insert(selectors::RESULTS_BLOCK, vec![""]);
        elements.insert(selectors::DEVICE_NAME, vec!["Pixel 8"]);
        elements.insert(
            selectors::COMPAT_MESSAGE,
            vec!["Great news, your device is fully compatible!"],
        );
        elements.insert(
            selectors::DEVICE_INFO_ROWS,
            vec!["Network: 4G LTE", "SIM: Nano"],
        );
        Self {
            state: Arc::new(ScriptedState {
                elements,
                handles: Mutex::new(HashMap::new()),
            }),
        }
    }

    fn register(&self, text: &str) -> ElementId {
        let id = ElementId::new();
        self.state
            .handles
            .lock()
            .unwrap()
            .insert(id.clone(), text.to_string());
        id
    }
}

#[async_trait]
impl PageSession for ScriptedSession {
    async fn navigate(&self, _url: &str) -> Result<(), SessionError> {
        Ok(())
    }

    async fn wait_for_clickable(
        &self,
        locator: &str,
        _timeout: Duration,
    ) -> Result<Option<ElementId>, SessionError> {
        self.find(locator).await
    }

    async fn find(&self, locator: &str) -> Result<Option<ElementId>, SessionError> {
        Ok(self
            .state
            .elements
            .get(locator)
            .and_then(|texts| texts.first())
            .map(|text| self.register(text)))
    }

    async fn find_all(&self, locator: &str) -> Result<Vec<ElementId>, SessionError> {
        Ok(self
            .state
            .elements
            .get(locator)
            .map(|texts| texts.iter().map(|text| self.register(text)).collect())
            .unwrap_or_default())
    }

    async fn click(&self, _element: &ElementId) -> Result<(), SessionError> {
        Ok(())
    }

    async fn type_text(&self, _element: &ElementId, _text: &str) -> Result<(), SessionError> {
        Ok(())
    }

    async fn read_text(&self, element: &ElementId) -> Result<String, SessionError> {
        self.state
            .handles
            .lock()
            .unwrap()
            .get(element)
            .cloned()
            .ok_or_else(|| SessionError::StaleHandle(element.to_string()))
    }

    async fn close(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

struct ScriptedFactory {
    session: ScriptedSession,
    opens: AtomicUsize,
}

#[async_trait]
impl SessionFactory for ScriptedFactory {
    async fn open(&self) -> Result<Box<dyn PageSession>, SessionError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.session.clone()))
    }
}

fn test_state(session: ScriptedSession) -> (ServeState, Arc<ScriptedFactory>) {
    let factory = Arc::new(ScriptedFactory {
        session,
        opens: AtomicUsize::new(0),
    });
    let config = CheckerConfig {
        zip_prompt_timeout_ms: 10,
        zip_settle_ms: 0,
        field_timeout_ms: 10,
        results_timeout_ms: 10,
        dialog_settle_ms: 0,
        ..CheckerConfig::default()
    };
    let checker = Arc::new(CompatChecker::new(factory.clone(), config));
    (ServeState { checker }, factory)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_parameter_is_a_client_error() {
    let (state, factory) = test_state(ScriptedSession::default());
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/check").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "IMEI parameter is missing");
    assert_eq!(factory.opens.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_identifier_never_opens_a_session() {
    let (state, factory) = test_state(ScriptedSession::default());
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/check?imei=12345").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid IMEI format");
    assert_eq!(factory.opens.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn successful_check_returns_device_payload() {
    let (state, _factory) = test_state(ScriptedSession::success_page());
    let router = build_router(state);

    let uri = format!("/check?imei={VALID_IMEI}");
    let response = router
        .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["imei"], VALID_IMEI);
    assert_eq!(body["compatible"], true);
    assert_eq!(body["device_name"], "Pixel 8");
    assert_eq!(body["device_info"]["Network"], "4G LTE");
    assert_eq!(body["device_info"]["SIM"], "Nano");
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let (state, _factory) = test_state(ScriptedSession::default());
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}
