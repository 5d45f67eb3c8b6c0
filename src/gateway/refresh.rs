//! Coordinated token refresh.
//!
//! At most one refresh call is in flight per gateway at any time. The
//! first 401 victim performs the refresh; every later victim enqueues a
//! oneshot waiter and is notified — in enqueue order — with the fresh
//! token or the refresh error. The refresh POST itself goes over a
//! separate minimal unauthenticated client, so it can never pass back
//! through the gateway's own 401 handling.

use super::envelope::Envelope;
use super::SessionExpiredHook;
use crate::error::ApiError;
use crate::store::{CredentialKey, CredentialStore};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};

/// Refresh must fail fast to unblock the waiter queue.
const REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// What a queued waiter receives: the fresh token, or the refresh
/// failure rendered as a message (errors are not cloneable).
type WaiterResult = Result<String, String>;

/// Refresh-token endpoint response payload. Older backend builds name
/// the fresh token `token`, newer ones `access_token`.
#[derive(Debug, Deserialize)]
struct RefreshData {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<WaiterResult>>,
}

/// Process-wide refresh serialization: one in-flight flag plus an
/// ordered waiter queue, owned by the gateway instance.
pub(super) struct RefreshCoordinator {
    http: reqwest::Client,
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    pub(super) fn new() -> Self {
        // Fall back to reqwest defaults if builder creation fails for any reason.
        let http = reqwest::Client::builder()
            .timeout(REFRESH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            state: Mutex::new(RefreshState::default()),
        }
    }

    /// Return a token minted by the single coordinated refresh.
    ///
    /// Callers arriving while a refresh is already in flight never issue
    /// their own; they wait for the shared outcome.
    pub(super) async fn token_after_refresh(
        &self,
        base_url: &str,
        store: &CredentialStore,
        hook: Option<SessionExpiredHook>,
    ) -> Result<String, ApiError> {
        let waiter = {
            let mut state = self.state.lock().await;
            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.waiters.push(tx);
                Some(rx)
            } else {
                state.in_flight = true;
                None
            }
        };

        if let Some(rx) = waiter {
            return match rx.await {
                Ok(Ok(token)) => Ok(token),
                Ok(Err(message)) => Err(ApiError::SessionExpired(message)),
                Err(_) => Err(ApiError::SessionExpired("token refresh was abandoned".into())),
            };
        }

        match self.request_new_token(base_url, store).await {
            Ok(token) => {
                tracing::debug!("token refresh succeeded");
                for tx in self.close_refresh().await {
                    let _ = tx.send(Ok(token.clone()));
                }
                Ok(token)
            }
            Err(err) => {
                let message = match err {
                    ApiError::SessionExpired(msg) => msg,
                    other => other.to_string(),
                };
                tracing::warn!("token refresh failed, clearing session: {message}");
                // Queued requests must reject with the refresh error, not hang.
                for key in [CredentialKey::AccessToken, CredentialKey::RefreshToken] {
                    if let Err(purge_err) = store.remove(key) {
                        tracing::warn!("failed to purge credential after refresh failure: {purge_err}");
                    }
                }
                for tx in self.close_refresh().await {
                    let _ = tx.send(Err(message.clone()));
                }
                if let Some(hook) = hook {
                    hook();
                }
                Err(ApiError::SessionExpired(message))
            }
        }
    }

    /// Clear the in-flight flag and hand back the waiters for notification.
    async fn close_refresh(&self) -> Vec<oneshot::Sender<WaiterResult>> {
        let mut state = self.state.lock().await;
        state.in_flight = false;
        std::mem::take(&mut state.waiters)
    }

    /// Exchange the stored refresh token for a new access token and
    /// persist the result.
    async fn request_new_token(
        &self,
        base_url: &str,
        store: &CredentialStore,
    ) -> Result<String, ApiError> {
        let Some(refresh_token) = store.get(CredentialKey::RefreshToken) else {
            return Err(ApiError::SessionExpired(
                "no refresh token in credential store".into(),
            ));
        };

        let response = self
            .http
            .post(format!("{base_url}/user/refresh-token"))
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status(status.as_u16(), body));
        }

        let envelope: Envelope = response.json().await?;
        let payload: RefreshData = envelope.into_data()?;
        let token = payload
            .access_token
            .or(payload.token)
            .unwrap_or_default()
            .trim()
            .to_string();
        if token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "refresh response did not include a token".into(),
            ));
        }

        store.set(CredentialKey::AccessToken, &token).map_err(|err| {
            ApiError::SessionExpired(format!("failed to persist refreshed token: {err}"))
        })?;
        if let Some(next_refresh) = payload.refresh_token {
            store
                .set(CredentialKey::RefreshToken, &next_refresh)
                .map_err(|err| {
                    ApiError::SessionExpired(format!(
                        "failed to persist rotated refresh token: {err}"
                    ))
                })?;
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::temp_store_path;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Waiters must be released in the order they queued up. Runs on the
    /// current-thread scheduler so that completion order is deterministic:
    /// tasks record their index immediately after the refresh call returns,
    /// with no await points in between.
    #[tokio::test(flavor = "current_thread")]
    async fn waiters_are_released_in_enqueue_order() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            // Hold the refresh open long enough for every waiter to enqueue.
            tokio::time::sleep(Duration::from_millis(150)).await;
            let body = r#"{"success":true,"message":"ok","data":{"access_token":"fresh-token"},"code":200}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
        });

        let store = CredentialStore::new(temp_store_path());
        store.set(CredentialKey::RefreshToken, "refresh-1").unwrap();
        let coordinator = Arc::new(RefreshCoordinator::new());
        let base_url = format!("http://{addr}");
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut tasks = Vec::new();
        for index in 0usize..4 {
            let coordinator = Arc::clone(&coordinator);
            let store = store.clone();
            let base_url = base_url.clone();
            let order = Arc::clone(&order);
            tasks.push(tokio::spawn(async move {
                // Stagger arrivals: task 0 performs the refresh, the rest queue.
                tokio::time::sleep(Duration::from_millis(10 * index as u64)).await;
                let token = coordinator
                    .token_after_refresh(&base_url, &store, None)
                    .await
                    .expect("refresh should succeed");
                order.lock().unwrap().push(index);
                token
            }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap(), "fresh-token");
        }

        let order = order.lock().unwrap().clone();
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert_eq!(
            store.get(CredentialKey::AccessToken).as_deref(),
            Some("fresh-token")
        );
    }
}
