//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use torchi_api::{AppState, build_app};
use torchi_auth::JwtEncoder;
use torchi_core::config::AppConfig;
use torchi_core::traits::{
    DeliveryError, DeviceRegistry, EndpointDirectory, PushMessage, PushTransport,
};
use torchi_database::{Backend, MemoryStore};
use torchi_entity::device::{NewDeviceCredential, PushTarget};
use torchi_entity::endpoint::Endpoint;

/// Transport that records deliveries instead of contacting push services.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<(PushTarget, PushMessage)>>,
    /// 1-based delivery number that fails with `Gone`.
    fail_on: Mutex<Option<usize>>,
    /// Receives the notification id of each delivery.
    observer: Mutex<Option<mpsc::UnboundedSender<Uuid>>>,
}

impl RecordingTransport {
    pub fn fail_on(&self, n: usize) {
        *self.fail_on.lock().expect("lock") = Some(n);
    }

    pub fn observe(&self) -> mpsc::UnboundedReceiver<Uuid> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.observer.lock().expect("lock") = Some(tx);
        rx
    }

    pub fn calls(&self) -> Vec<(PushTarget, PushMessage)> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock").len()
    }
}

#[async_trait]
impl PushTransport for RecordingTransport {
    async fn deliver(
        &self,
        target: &PushTarget,
        message: &PushMessage,
    ) -> Result<(), DeliveryError> {
        let n = {
            let mut calls = self.calls.lock().expect("lock");
            calls.push((target.clone(), message.clone()));
            calls.len()
        };
        if let (Some(observer), Some(id)) = (
            self.observer.lock().expect("lock").as_ref(),
            message.notification_id,
        ) {
            let _ = observer.send(id);
        }
        if *self.fail_on.lock().expect("lock") == Some(n) {
            return Err(DeliveryError::Gone);
        }
        Ok(())
    }
}

/// A response with its body decoded.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Body parsed as JSON, `Null` when it is not JSON.
    pub body: Value,
    /// Raw body text.
    pub text: String,
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared application state
    pub state: AppState,
    /// Storage backend shared with the router
    pub backend: Backend,
    /// Transport every push goes through
    pub transport: Arc<RecordingTransport>,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Create a new test application over an in-memory backend.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = "memory".to_string();
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let backend = Backend::from_memory(MemoryStore::new());
        let transport = Arc::new(RecordingTransport::default());
        let encoder = JwtEncoder::new(&config.auth);
        let cors = config.server.cors.clone();

        let state = AppState::new(
            config,
            backend.clone(),
            Arc::clone(&transport) as Arc<dyn PushTransport>,
        );
        let router = build_app(state.clone(), &cors);

        Self {
            router,
            state,
            backend,
            transport,
            encoder,
        }
    }

    /// Issue an access token for a fresh user.
    pub fn login(&self) -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        let (token, _) = self
            .encoder
            .generate_access_token(user_id, "someone@example.com")
            .expect("token");
        (user_id, token)
    }

    /// Create an endpoint for `user_id` directly in storage.
    pub async fn create_endpoint(&self, user_id: Uuid, name: &str, token: &str) -> Endpoint {
        self.backend
            .endpoints
            .insert(user_id, name, token)
            .await
            .expect("endpoint")
    }

    /// Register `count` devices for `user_id` directly in storage.
    pub async fn add_devices(&self, user_id: Uuid, count: usize) {
        for i in 0..count {
            self.backend
                .devices
                .upsert(NewDeviceCredential {
                    user_id,
                    endpoint: format!("https://push.example.com/{user_id}/{i}"),
                    p256dh: "BPublicKey".to_string(),
                    auth: "authsecret".to_string(),
                })
                .await
                .expect("device");
        }
    }

    /// Send a JSON request.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body = body.map_or_else(Body::empty, |v| Body::from(v.to_string()));
        self.send(method, path, "application/json", body, token)
            .await
    }

    /// Send a request with a raw body of the given content type.
    pub async fn request_raw(
        &self,
        method: &str,
        path: &str,
        content_type: &str,
        body: impl Into<String>,
    ) -> TestResponse {
        self.send(method, path, content_type, Body::from(body.into()), None)
            .await
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        content_type: &str,
        body: Body,
        token: Option<&str>,
    ) -> TestResponse {
        send(self.router.clone(), method, path, content_type, body, token).await
    }
}

/// Drive one request through `router`. Usable from spawned tasks.
pub async fn send(
    router: Router,
    method: &str,
    path: &str,
    content_type: &str,
    body: Body,
    token: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, content_type);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(body).expect("request");

    let response = router.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let text = String::from_utf8_lossy(&bytes).to_string();
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);

    TestResponse { status, body, text }
}
