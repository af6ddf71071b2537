//! Browser-state verification client.
//!
//! Talks JSON-RPC-style frames (`{id, method, params}` / `{id, result|error}`)
//! to the browser automation endpoint over a long-lived WebSocket. The client
//! owns its connection state explicitly: it connects lazily, serializes
//! commands (one outstanding command per connection), and on a dropped
//! connection reconnects and retries the command exactly once. Logical error
//! responses are never retried.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::models::{BrowserConfig, StateSnapshot};
use crate::domain::ports::{StateVerifier, VerifierError};

/// Frames read while hunting for a matching correlation id before the
/// command is declared failed.
const MAX_RECV_ATTEMPTS: u32 = 10;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket client for capturing and cleaning browser state.
pub struct BrowserStateClient {
    ws_url: String,
    command_timeout: Duration,
    conn: Option<WsStream>,
}

impl BrowserStateClient {
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            ws_url: config.ws_url.clone(),
            command_timeout: Duration::from_secs(config.command_timeout_secs),
            conn: None,
        }
    }

    /// Get the cached connection, dialing the endpoint if necessary.
    async fn connection(&mut self) -> Result<&mut WsStream, VerifierError> {
        if self.conn.is_none() {
            let (ws, _) = connect_async(&self.ws_url).await.map_err(|e| {
                let message = e.to_string();
                if message.to_lowercase().contains("connection refused") {
                    VerifierError::ConnectionRefused(message)
                } else {
                    VerifierError::Transport(message)
                }
            })?;
            debug!(url = %self.ws_url, "Connected to automation endpoint");
            self.conn = Some(ws);
        }
        Ok(self.conn.as_mut().unwrap_or_else(|| unreachable!()))
    }

    /// Drop the cached connection and dial again.
    async fn reconnect(&mut self) -> Result<(), VerifierError> {
        if let Some(mut ws) = self.conn.take() {
            let _ = ws.close(None).await;
        }
        self.connection().await?;
        Ok(())
    }

    /// Send one correlated command and await its response.
    ///
    /// Unrelated frames (notifications, stale responses) are skipped, up to
    /// `MAX_RECV_ATTEMPTS`. A transport failure triggers one
    /// reconnect-and-retry; an `error` response or a response timeout
    /// propagates immediately.
    pub async fn send_command(
        &mut self,
        method: &str,
        params: Value,
    ) -> Result<Value, VerifierError> {
        for retry in 0..2 {
            match self.try_command(method, params.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if matches!(e, VerifierError::Transport(_)) && retry == 0 => {
                    warn!(method, error = %e, "Transport failure, reconnecting once");
                    self.reconnect().await?;
                }
                Err(e) => return Err(e),
            }
        }
        Err(VerifierError::Transport(format!(
            "{method}: failed after reconnect"
        )))
    }

    async fn try_command(&mut self, method: &str, params: Value) -> Result<Value, VerifierError> {
        let timeout = self.command_timeout;
        let ws = self.connection().await?;

        let msg_id = Uuid::new_v4().to_string();
        let frame = json!({ "id": msg_id, "method": method, "params": params });
        ws.send(Message::Text(frame.to_string()))
            .await
            .map_err(|e| VerifierError::Transport(e.to_string()))?;

        for _ in 0..MAX_RECV_ATTEMPTS {
            let next = tokio::time::timeout(timeout, ws.next())
                .await
                .map_err(|_| VerifierError::Timeout {
                    method: method.to_string(),
                })?;

            let message = next
                .ok_or_else(|| VerifierError::Transport("WebSocket stream ended".to_string()))?
                .map_err(|e| VerifierError::Transport(e.to_string()))?;

            let Message::Text(text) = message else {
                continue;
            };
            let Ok(response) = serde_json::from_str::<Value>(&text) else {
                continue;
            };

            if response.get("id").and_then(Value::as_str) != Some(msg_id.as_str()) {
                // Not ours; keep reading.
                continue;
            }

            if let Some(error) = response.get("error") {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .map_or_else(|| error.to_string(), ToString::to_string);
                return Err(VerifierError::Command {
                    method: method.to_string(),
                    message,
                });
            }

            return Ok(response.get("result").cloned().unwrap_or(json!({})));
        }

        Err(VerifierError::NoMatchingResponse {
            method: method.to_string(),
            attempts: MAX_RECV_ATTEMPTS,
        })
    }
}

#[async_trait::async_trait]
impl StateVerifier for BrowserStateClient {
    /// Capture full browser state for verification.
    ///
    /// `list_tabs` is required; the three follow-up queries each degrade to
    /// an empty default so one broken sub-query never aborts the snapshot.
    async fn capture_state(&mut self) -> Result<StateSnapshot, VerifierError> {
        let tabs_result = self.send_command("list_tabs", json!({})).await?;
        let tabs = tabs_result.as_array().cloned().unwrap_or_default();

        let active_page_info = match self.send_command("get_page_info", json!({})).await {
            Ok(info) => info,
            Err(e) => {
                debug!(error = %e, "get_page_info failed, degrading to empty");
                json!({})
            }
        };

        let dom_elements = match self.send_command("get_dom", json!({})).await {
            Ok(dom) => dom
                .get("elements")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            Err(e) => {
                debug!(error = %e, "get_dom failed, degrading to empty");
                Vec::new()
            }
        };

        let page_text = match self.send_command("get_page_text", json!({})).await {
            Ok(text) => text
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            Err(e) => {
                debug!(error = %e, "get_page_text failed, degrading to empty");
                String::new()
            }
        };

        Ok(StateSnapshot {
            tabs,
            active_page_info,
            dom_elements,
            page_text,
        })
    }

    /// Close every open tab, tolerating individual failures silently.
    async fn cleanup_tabs(&mut self) -> Result<(), VerifierError> {
        let tabs = match self.send_command("list_tabs", json!({})).await {
            Ok(result) => result.as_array().cloned().unwrap_or_default(),
            Err(e) => {
                debug!(error = %e, "list_tabs failed during cleanup, skipping");
                return Ok(());
            }
        };

        for tab in tabs {
            let Some(tab_id) = tab.get("tab_id").and_then(Value::as_str) else {
                continue;
            };
            if let Err(e) = self
                .send_command("close_tab", json!({ "tab_id": tab_id }))
                .await
            {
                debug!(tab_id, error = %e, "Failed to close tab during cleanup");
            }
        }
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(mut ws) = self.conn.take() {
            let _ = ws.close(None).await;
        }
    }
}
