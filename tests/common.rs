#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc, unreachable_pub)]

use async_trait::async_trait;
use push_relay::adapters::push::expo::is_expo_push_token;
use push_relay::adapters::push::{PushError, PushProvider};
use push_relay::config::{AuthConfig, Config, ExpoConfig, LogFormat, ServerConfig, TelemetryConfig};
use push_relay::domain::notification::{PushMessage, PushTicket};
use push_relay::storage::DeviceRegistry;
use push_relay::{AppBuilder, api};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, Once};

pub const TEST_API_KEY: &str = "test-api-key";

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("push_relay=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            shutdown_timeout_secs: 1,
            body_limit_bytes: 10 * 1024 * 1024,
        },
        auth: AuthConfig { api_key: TEST_API_KEY.to_string() },
        expo: ExpoConfig { access_token: None, base_url: "http://127.0.0.1:9".to_string(), request_timeout_secs: 1 },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None },
    }
}

/// One scripted provider reply; batches with no script left are accepted in full.
#[derive(Debug)]
pub enum Reply {
    Tickets(Vec<PushTicket>),
    Fail,
}

/// Push provider that records every batch and replays scripted replies.
#[derive(Debug)]
pub struct RecordingPushProvider {
    batch_size: usize,
    replies: Mutex<VecDeque<Reply>>,
    batches: Mutex<Vec<Vec<PushMessage>>>,
}

impl RecordingPushProvider {
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size, replies: Mutex::new(VecDeque::new()), batches: Mutex::new(Vec::new()) }
    }

    pub fn reply(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn batches(&self) -> Vec<Vec<PushMessage>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushProvider for RecordingPushProvider {
    fn is_valid_token(&self, token: &str) -> bool {
        is_expo_push_token(token)
    }

    fn max_batch_size(&self) -> usize {
        self.batch_size
    }

    async fn send_batch(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        self.batches.lock().unwrap().push(messages.to_vec());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Tickets(tickets)) => Ok(tickets),
            Some(Reply::Fail) => Err(PushError::Other(anyhow::anyhow!("simulated network failure"))),
            None => Ok(messages.iter().enumerate().map(|(i, _)| PushTicket::ok(format!("ticket-{i}"))).collect()),
        }
    }
}

pub struct TestApp {
    pub server_url: String,
    pub client: reqwest::Client,
    pub provider: Arc<RecordingPushProvider>,
    pub registry: Arc<DeviceRegistry>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(get_test_config(), 100).await
    }

    pub async fn spawn_with(config: Config, batch_size: usize) -> Self {
        setup_tracing();
        let provider = Arc::new(RecordingPushProvider::new(batch_size));

        let app = AppBuilder::new(config.clone())
            .with_push_provider(Arc::clone(&provider) as Arc<dyn PushProvider>)
            .build()
            .unwrap();
        let router = api::app_router(config, app.services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>()).await.unwrap();
        });

        Self {
            server_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            provider,
            registry: app.registry,
        }
    }

    pub async fn register_device(&self, token: &str, user_id: Option<&str>) -> reqwest::Response {
        let mut body = serde_json::json!({ "token": token });
        if let Some(user_id) = user_id {
            body["userId"] = Value::from(user_id);
        }
        self.client.post(format!("{}/register-device", self.server_url)).json(&body).send().await.unwrap()
    }

    pub async fn post_authorized(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.server_url))
            .header("X-API-Key", TEST_API_KEY)
            .json(body)
            .send()
            .await
            .unwrap()
    }
}
