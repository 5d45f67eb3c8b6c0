//! Wattline — client library and CLI for an electricity billing and
//! monitoring backend.
//!
//! The library wraps the backend's REST API behind an authenticated
//! [`gateway::Gateway`] that attaches bearer tokens, unwraps response
//! envelopes, and transparently refreshes expired tokens with a single
//! coordinated refresh call. [`session::AuthSession`] keeps the login
//! state and credential persistence, and [`routes::RouteGuard`] gates
//! navigation by required privilege level.
//!
//! # Quick start
//!
//! ```no_run
//! use wattline::gateway::Gateway;
//! use wattline::session::AuthSession;
//! use wattline::store::{default_store_path, CredentialStore};
//! use wattline::types::LoginCredentials;
//!
//! # async fn example() {
//! let store = CredentialStore::new(default_store_path().unwrap());
//! let gateway = Gateway::new("http://127.0.0.1:5000/api/v1", store.clone());
//! let session = AuthSession::new(gateway.clone(), store);
//!
//! session.restore();
//! if !session.is_logged_in() {
//!     let credentials = LoginCredentials {
//!         mail: "resident@example.cn".into(),
//!         password: "secret".into(),
//!     };
//!     session.sign_in(&credentials).await.unwrap();
//! }
//! let bills = wattline::api::bill::query(&gateway, &Default::default()).await.unwrap();
//! println!("{} bills", bills.bills.len());
//! # }
//! ```

pub mod api;
pub mod build_info;
pub mod config;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod session;
pub mod store;
#[cfg(test)]
pub mod testsupport;
pub mod token;
pub mod types;
