//! Webhook delivery for ledger events
//!
//! Each event is POSTed as JSON on a spawned tokio task. When a secret is
//! configured the body is signed with HMAC-SHA256 and the hex digest is sent
//! in `X-Todo-Signature`. Delivery is best effort: failures are logged and
//! never reach the ledger.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::runtime::Handle;
use url::Url;
use uuid::Uuid;

use super::events::{TaskEvent, TaskObserver};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Todo-Signature";
pub const DELIVERY_HEADER: &str = "X-Todo-Delivery";
pub const EVENT_HEADER: &str = "X-Todo-Event";

/// Hex HMAC-SHA256 of `body` under `secret`.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Observer that forwards every event to an HTTP endpoint.
pub struct WebhookObserver {
    client: reqwest::Client,
    url: Url,
    secret: Option<String>,
    runtime: Handle,
}

impl WebhookObserver {
    /// Must be called from within a tokio runtime; deliveries are spawned on it.
    pub fn new(url: Url, secret: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            secret,
            runtime: Handle::current(),
        }
    }
}

impl TaskObserver for WebhookObserver {
    fn on_event(&self, event: &TaskEvent) {
        let body = match serde_json::to_vec(event) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, "webhook: failed to encode event");
                return;
            }
        };

        let delivery = Uuid::new_v4().to_string();
        let mut request = self
            .client
            .post(self.url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(DELIVERY_HEADER, &delivery)
            .header(EVENT_HEADER, event.name());
        if let Some(secret) = &self.secret {
            request = request.header(SIGNATURE_HEADER, sign(secret, &body));
        }
        let request = request.body(body);

        let url = self.url.clone();
        self.runtime.spawn(async move {
            match request.send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(%url, %delivery, "webhook delivered");
                }
                Ok(resp) => {
                    tracing::warn!(%url, %delivery, status = %resp.status(), "webhook rejected");
                }
                Err(e) => {
                    tracing::warn!(%url, %delivery, error = %e, "webhook delivery failed");
                }
            }
        });
    }
}
