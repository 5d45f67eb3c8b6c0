//! Shared fixtures for unit tests.

use crate::types::{Role, UserProfile};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Monotonic id source used to avoid temp-path collisions in tests.
static NEXT_TMP_ID: AtomicU64 = AtomicU64::new(1);

/// Build an isolated temp credential path for one test case.
pub fn temp_store_path() -> PathBuf {
    let mut root = std::env::temp_dir();
    let id = NEXT_TMP_ID.fetch_add(1, Ordering::Relaxed);
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    root.push(format!("wattline-test-{id}-{now}"));
    let _ = std::fs::create_dir_all(&root);
    root.join("credentials.json")
}

/// Build a JWT-shaped token whose claims expire at `exp_secs`.
pub fn token_expiring_at(exp_secs: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"11","exp":{exp_secs}}}"#).as_bytes());
    format!("{header}.{payload}.signature")
}

/// A token that stays valid for the duration of any test run.
pub fn fresh_token() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    token_expiring_at(now + 3600)
}

/// A token that expired an hour ago.
pub fn stale_token() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    token_expiring_at(now - 3600)
}

/// A plausible user record for session fixtures.
pub fn sample_profile(role: Role) -> UserProfile {
    UserProfile {
        user_id: 11,
        mail: "resident@example.cn".into(),
        phone: None,
        real_name: Some("Wei Chen".into()),
        id_card: None,
        region_id: Some(3),
        region_name: Some("North Grid".into()),
        role,
        status: "active".into(),
        create_time: None,
        update_time: None,
    }
}
