//! Typed endpoint wrappers over the gateway.
//!
//! Every function here is thin glue: serialize params, issue the call,
//! let the gateway handle auth, envelopes, and token refresh.

pub mod bill;
pub mod meter;
pub mod notification;
pub mod query;
pub mod system;
pub mod usage;
pub mod user;
