//! Authenticated HTTP gateway for the billing backend.
//!
//! All outbound REST calls go through [`Gateway`]: it attaches the stored
//! bearer token (except on the unauthenticated allow-list), unwraps the
//! response envelope, and recovers from token expiry with a single
//! coordinated refresh-and-resubmit. Refresh serialization lives in
//! `refresh`; envelope validation in `envelope`.

mod envelope;
mod refresh;

use crate::error::ApiError;
use crate::store::{CredentialKey, CredentialStore};
use envelope::Envelope;
use refresh::RefreshCoordinator;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Callback fired when the session is beyond recovery (refresh failed).
/// The application decides what "redirect to login" means for it.
pub type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// Generous default bound; some backend operations (outbound mail) are slow.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoints that are always sent unauthenticated, even when a token exists.
pub const NO_AUTH_PATHS: [&str; 5] = [
    "/user/login",
    "/user/register",
    "/user/send-reset-code",
    "/user/reset-password",
    "/user/refresh-token",
];

fn requires_auth(path: &str) -> bool {
    !NO_AUTH_PATHS.iter().any(|prefix| path.contains(prefix))
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    store: CredentialStore,
    refresh: RefreshCoordinator,
    on_session_expired: Mutex<Option<SessionExpiredHook>>,
}

/// Authenticated HTTP client, constructed once at startup and shared by
/// handle. Clones share the refresh flag and waiter queue.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<Inner>,
}

impl Gateway {
    pub fn new(base_url: &str, store: CredentialStore) -> Self {
        Self::with_timeout(base_url, store, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, store: CredentialStore, timeout: Duration) -> Self {
        // Fall back to reqwest defaults if builder creation fails for any reason.
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            inner: Arc::new(Inner {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
                store,
                refresh: RefreshCoordinator::new(),
                on_session_expired: Mutex::new(None),
            }),
        }
    }

    /// Register the application's reaction to an unrecoverable session.
    pub fn set_session_expired_hook(&self, hook: SessionExpiredHook) {
        if let Ok(mut slot) = self.inner.on_session_expired.lock() {
            *slot = Some(hook);
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn store(&self) -> &CredentialStore {
        &self.inner.store
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, Some(encode(query)?), None)
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, None, Some(encode(body)?))
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, None, Some(encode(body)?))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, None, None).await
    }

    /// Issue one call, recovering from a single 401 via coordinated refresh.
    ///
    /// The resubmission path is straight-line: a request is retried at
    /// most once, and a 401 on the retried call is terminal.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<Value>,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let authenticated = requires_auth(path);
        let bearer = if authenticated {
            self.inner.store.get(CredentialKey::AccessToken)
        } else {
            None
        };

        let response = self
            .dispatch(method.clone(), path, query.as_ref(), body.as_ref(), bearer.as_deref())
            .await?;

        if authenticated && response.status() == StatusCode::UNAUTHORIZED {
            let hook = self
                .inner
                .on_session_expired
                .lock()
                .ok()
                .and_then(|slot| slot.clone());
            let token = self
                .inner
                .refresh
                .token_after_refresh(&self.inner.base_url, &self.inner.store, hook)
                .await?;
            let retried = self
                .dispatch(method, path, query.as_ref(), body.as_ref(), Some(&token))
                .await?;
            if retried.status() == StatusCode::UNAUTHORIZED {
                return Err(ApiError::SessionExpired(
                    "server rejected a freshly refreshed token".into(),
                ));
            }
            return unwrap_response(retried).await;
        }

        unwrap_response(response).await
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: Option<&Value>,
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut builder = self
            .inner
            .http
            .request(method, format!("{}{path}", self.inner.base_url));
        if let Some(query) = query {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        builder.send().await.map_err(|err| {
            tracing::warn!("request to {path} failed: {err}");
            ApiError::Http(err)
        })
    }
}

/// Serialize a query/body into a replayable JSON value.
fn encode<B: Serialize + ?Sized>(value: &B) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|err| ApiError::InvalidResponse(format!("failed to encode request: {err}")))
}

/// Validate transport status, then unwrap the business envelope.
async fn unwrap_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("request failed with status {code}");
        return Err(ApiError::Status(code, body));
    }
    let envelope: Envelope = response.json().await?;
    envelope.into_data()
}
