//! HTTP client for the remote input-injection backend.
//!
//! Requests are fire-and-forget: `submit` pushes onto an unbounded channel
//! and a background task spawns one HTTP request per message, so a slow or
//! hung request never holds up the engine or later requests.

use crate::{PlatformError, PlatformResult};
use handpoint_core::{BackendConfig, BackendRequest, BackendSink, SinkError, SinkResult};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

const MOVE_PATH: &str = "/api/mouse/move";
const CLICK_PATH: &str = "/api/mouse/click";
const HEALTH_PATH: &str = "/api/health";

/// Response of the backend health endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendHealth {
    pub status: String,
    /// Screen size as `[width, height]`.
    #[serde(default)]
    pub screen: Vec<u32>,
    #[serde(default)]
    pub version: String,
}

/// Backend sink that POSTs JSON to a local HTTP server.
pub struct HttpBackend {
    base_url: String,
    client: Client,
    health_timeout: Duration,
    tx: mpsc::UnboundedSender<BackendRequest>,
    runtime: Option<Runtime>,
}

impl HttpBackend {
    /// Create the client and start its background dispatch task.
    pub fn new(config: &BackendConfig) -> PlatformResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("handpoint-backend")
            .enable_all()
            .build()
            .map_err(|e| PlatformError::Backend(format!("failed to start runtime: {e}")))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PlatformError::Backend(format!("failed to create HTTP client: {e}")))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        runtime.spawn(Self::dispatch_loop(client.clone(), base_url.clone(), rx));

        info!(%base_url, "Backend client started");
        Ok(Self {
            base_url,
            client,
            health_timeout: config.health_timeout(),
            tx,
            runtime: Some(runtime),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn dispatch_loop(
        client: Client,
        base_url: String,
        mut rx: mpsc::UnboundedReceiver<BackendRequest>,
    ) {
        while let Some(request) = rx.recv().await {
            let client = client.clone();
            let base_url = base_url.clone();
            tokio::spawn(async move {
                Self::send(&client, &base_url, request).await;
            });
        }
        debug!("Backend dispatch loop exiting");
    }

    async fn send(client: &Client, base_url: &str, request: BackendRequest) {
        let (path, body) = request_parts(&request);
        let url = format!("{base_url}{path}");

        let result: Result<reqwest::Response, reqwest::Error> =
            client.post(&url).json(&body).send().await;
        match result {
            Ok(resp) if resp.status().is_success() => {
                trace!(?request, "backend request delivered");
            }
            Ok(resp) => {
                warn!(path, status = %resp.status(), "Backend rejected request");
            }
            Err(e) => {
                warn!(path, error = %e, "Backend request failed");
            }
        }
    }

    /// Query the health endpoint once, blocking the caller until it answers
    /// or the health timeout elapses. Must not be called from inside an async
    /// context.
    pub fn probe_health(&self) -> PlatformResult<BackendHealth> {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| PlatformError::Backend("runtime shut down".into()))?;
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        let client = self.client.clone();
        let timeout = self.health_timeout;

        runtime.block_on(async move {
            let resp = client
                .get(&url)
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| PlatformError::Backend(e.to_string()))?;
            if !resp.status().is_success() {
                return Err(PlatformError::Backend(format!(
                    "health check returned {}",
                    resp.status()
                )));
            }
            resp.json::<BackendHealth>()
                .await
                .map_err(|e| PlatformError::Backend(e.to_string()))
        })
    }
}

impl BackendSink for HttpBackend {
    fn submit(&mut self, request: BackendRequest) -> SinkResult {
        self.tx.send(request).map_err(|_| SinkError::Closed)
    }
}

/// In-flight requests are abandoned rather than awaited.
impl Drop for HttpBackend {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
            debug!("Backend client dropped");
        }
    }
}

/// Endpoint path and JSON body for a request.
fn request_parts(request: &BackendRequest) -> (&'static str, Value) {
    match request {
        BackendRequest::Move { x, y } => (MOVE_PATH, json!({ "x": x, "y": y })),
        BackendRequest::Click { button } => (CLICK_PATH, json!({ "button": button.as_str() })),
    }
}
