//! In-memory auth session over the credential store.
//!
//! One live session per process: built once at startup and shared by
//! `Arc`. The session is `Anonymous` until `restore` finds an unexpired
//! stored token or `sign_in`/`establish` transitions it to
//! `Authenticated`.

use crate::api::user;
use crate::error::{ApiError, StoreError};
use crate::gateway::Gateway;
use crate::store::{CredentialKey, CredentialStore};
use crate::token;
use crate::types::{LoginCredentials, LoginData, UserProfile};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Default)]
struct SessionState {
    logged_in: bool,
    token: Option<String>,
    user: Option<UserProfile>,
}

/// Process-wide session state plus the operations that move it between
/// `Anonymous` and `Authenticated`.
pub struct AuthSession {
    gateway: Gateway,
    store: CredentialStore,
    state: Mutex<SessionState>,
}

fn unix_now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

impl AuthSession {
    /// Create an empty (`Anonymous`) session. The store should be the
    /// same one the gateway consults for bearer tokens.
    pub fn new(gateway: Gateway, store: CredentialStore) -> Self {
        Self {
            gateway,
            store,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Rehydrate session state from the credential store. Idempotent and
    /// cheap; route guards call it before every navigation decision.
    ///
    /// An expired stored token purges all three credential keys and
    /// forces `Anonymous`, overriding any previous in-memory state. An
    /// absent token leaves the current state untouched — in particular,
    /// when a failed gateway refresh has already purged the store, the
    /// in-memory session stays authenticated until the application reacts
    /// to the session-expired hook, which is the cleanup path for that
    /// case.
    pub fn restore(&self) {
        let Some(stored) = self.store.get(CredentialKey::AccessToken) else {
            return;
        };

        if token::is_expired(&stored, unix_now_millis()) {
            tracing::info!("stored token has expired, clearing session");
            for key in [
                CredentialKey::AccessToken,
                CredentialKey::RefreshToken,
                CredentialKey::UserProfile,
            ] {
                if let Err(err) = self.store.remove(key) {
                    tracing::warn!("failed to purge stale credential: {err}");
                }
            }
            if let Ok(mut state) = self.state.lock() {
                *state = SessionState::default();
            }
            return;
        }

        // Profile parse failure leaves `user` unset; the token alone
        // keeps the session authenticated.
        let user = self.store.load_profile();
        if let Ok(mut state) = self.state.lock() {
            state.logged_in = true;
            state.token = Some(stored);
            state.user = user;
        }
    }

    /// Unconditionally transition to `Authenticated` and persist whatever
    /// credentials were supplied. Used after login and by callers that
    /// obtain tokens out of band.
    pub fn establish(
        &self,
        token: &str,
        refresh_token: Option<&str>,
        profile: Option<&UserProfile>,
    ) -> Result<(), StoreError> {
        if let Ok(mut state) = self.state.lock() {
            state.logged_in = true;
            state.token = Some(token.to_string());
            if let Some(profile) = profile {
                state.user = Some(profile.clone());
            }
        }
        self.store.set(CredentialKey::AccessToken, token)?;
        if let Some(refresh) = refresh_token {
            self.store.set(CredentialKey::RefreshToken, refresh)?;
        }
        if let Some(profile) = profile {
            self.store.save_profile(profile)?;
        }
        Ok(())
    }

    /// Log in against the backend and establish the session.
    ///
    /// Any non-success response leaves session state untouched and
    /// propagates unchanged for the caller to present. A login that
    /// succeeds server-side but fails to persist locally still yields an
    /// authenticated in-memory session; the persistence failure is
    /// logged (warm restore will not work until the next login).
    pub async fn sign_in(&self, credentials: &LoginCredentials) -> Result<LoginData, ApiError> {
        let data = user::login(&self.gateway, credentials).await?;
        if let Err(err) = self.establish(
            &data.token,
            data.refresh_token.as_deref(),
            data.user_info.as_ref(),
        ) {
            tracing::warn!("login succeeded but credentials were not persisted: {err}");
        }
        Ok(data)
    }

    /// End the session: best-effort server logout, then local cleanup.
    ///
    /// The logout call's outcome never blocks cleanup. Both tokens are
    /// removed from the store; the cached profile is retained — it cannot
    /// authenticate by itself (restore requires an unexpired token) and
    /// keeping it allows warm prefill after the next login.
    pub async fn teardown(&self) {
        if let Err(err) = user::logout(&self.gateway).await {
            tracing::debug!("server logout failed, continuing local teardown: {err}");
        }
        if let Ok(mut state) = self.state.lock() {
            *state = SessionState::default();
        }
        for key in [CredentialKey::AccessToken, CredentialKey::RefreshToken] {
            if let Err(err) = self.store.remove(key) {
                tracing::warn!("failed to remove credential during teardown: {err}");
            }
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.lock().map(|state| state.logged_in).unwrap_or(false)
    }

    pub fn current_token(&self) -> Option<String> {
        self.state.lock().ok().and_then(|state| state.token.clone())
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.lock().ok().and_then(|state| state.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{fresh_token, sample_profile, stale_token, temp_store_path};
    use crate::types::Role;

    fn session_fixture() -> AuthSession {
        let store = CredentialStore::new(temp_store_path());
        // No network calls are made by restore/establish; the base URL is inert.
        let gateway = Gateway::new("http://127.0.0.1:9", store.clone());
        AuthSession::new(gateway, store)
    }

    #[test]
    fn establish_then_restore_round_trips_session_state() {
        let session = session_fixture();
        let token = fresh_token();
        let profile = sample_profile(Role::SuperAdmin);
        session
            .establish(&token, Some("refresh-1"), Some(&profile))
            .unwrap();

        // Simulate a process reload: a brand-new session over the same store.
        let reloaded = AuthSession::new(
            Gateway::new("http://127.0.0.1:9", session.store.clone()),
            session.store.clone(),
        );
        assert!(!reloaded.is_logged_in());
        reloaded.restore();
        assert!(reloaded.is_logged_in());
        assert_eq!(reloaded.current_token(), Some(token));
        assert_eq!(reloaded.current_user(), Some(profile));
    }

    #[test]
    fn restore_is_idempotent() {
        let session = session_fixture();
        let token = fresh_token();
        session
            .establish(&token, None, Some(&sample_profile(Role::Resident)))
            .unwrap();

        session.restore();
        let first = (
            session.is_logged_in(),
            session.current_token(),
            session.current_user(),
        );
        session.restore();
        let second = (
            session.is_logged_in(),
            session.current_token(),
            session.current_user(),
        );
        assert_eq!(first, second);
        assert!(first.0);
    }

    #[test]
    fn restore_with_empty_store_stays_anonymous() {
        let session = session_fixture();
        session.restore();
        assert!(!session.is_logged_in());
        assert!(session.current_token().is_none());
        assert!(session.current_user().is_none());
    }

    #[test]
    fn restore_purges_expired_token_and_forces_anonymous() {
        let session = session_fixture();
        session
            .establish(&stale_token(), Some("refresh-1"), Some(&sample_profile(Role::Resident)))
            .unwrap();
        // In-memory state currently claims authenticated; restore must override it.
        assert!(session.is_logged_in());

        session.restore();
        assert!(!session.is_logged_in());
        assert!(session.current_token().is_none());
        assert!(session.current_user().is_none());
        for key in [
            CredentialKey::AccessToken,
            CredentialKey::RefreshToken,
            CredentialKey::UserProfile,
        ] {
            assert!(session.store.get(key).is_none(), "{key:?} not purged");
        }
    }

    #[test]
    fn restore_after_external_token_purge_keeps_in_memory_state() {
        let session = session_fixture();
        session
            .establish(&fresh_token(), Some("refresh-1"), Some(&sample_profile(Role::Resident)))
            .unwrap();
        // A failed refresh clears the store out from under the session.
        session.store.remove(CredentialKey::AccessToken).unwrap();
        session.store.remove(CredentialKey::RefreshToken).unwrap();

        // Only an expired token forces logout; an absent one is a no-op.
        // Recovery from this state goes through the session-expired hook.
        session.restore();
        assert!(session.is_logged_in());
    }

    #[test]
    fn restore_survives_malformed_cached_profile() {
        let session = session_fixture();
        let token = fresh_token();
        session.store.set(CredentialKey::AccessToken, &token).unwrap();
        session
            .store
            .set(CredentialKey::UserProfile, "{corrupt")
            .unwrap();

        session.restore();
        assert!(session.is_logged_in());
        assert_eq!(session.current_token(), Some(token));
        assert!(session.current_user().is_none());
    }
}
