//! Navigation guard over route access metadata.
//!
//! Routes declare a single required [`Access`] level instead of the
//! three independent flags the metadata contract exposes; combined
//! flags collapse with most-restrictive-wins precedence.

use crate::session::AuthSession;
use crate::types::Role;
use std::sync::Arc;

/// Login entry point.
pub const LOGIN_ROUTE: &str = "/login";
/// Default authenticated landing page.
pub const LANDING_ROUTE: &str = "/dashboard";

/// Required privilege level for a route, ordered least to most
/// restrictive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    #[default]
    Public,
    Authenticated,
    Admin,
    SuperAdmin,
}

impl Access {
    /// Collapse the metadata flags into one level, most restrictive wins.
    pub fn from_flags(requires_auth: bool, requires_admin: bool, requires_super_admin: bool) -> Self {
        if requires_super_admin {
            Self::SuperAdmin
        } else if requires_admin {
            Self::Admin
        } else if requires_auth {
            Self::Authenticated
        } else {
            Self::Public
        }
    }
}

/// Navigation metadata attached to a destination.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub path: String,
    pub access: Access,
    pub title: Option<String>,
}

impl RouteMeta {
    pub fn new(path: impl Into<String>, access: Access) -> Self {
        Self {
            path: path.into(),
            access,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Navigation proceeds; `title` is the destination's display metadata.
    Allow { title: Option<String> },
    /// Navigation is redirected elsewhere.
    Redirect(&'static str),
}

/// Pre-navigation interceptor consulting the live session.
pub struct RouteGuard {
    session: Arc<AuthSession>,
}

impl RouteGuard {
    pub fn new(session: Arc<AuthSession>) -> Self {
        Self { session }
    }

    /// Decide whether a navigation to `dest` may proceed.
    pub fn check(&self, dest: &RouteMeta) -> Decision {
        // Always rehydrate first so decisions see fresh state after a reload.
        self.session.restore();
        let logged_in = self.session.is_logged_in();

        if dest.access >= Access::Authenticated && !logged_in {
            return Decision::Redirect(LOGIN_ROUTE);
        }

        // Missing user/role defaults to resident: privilege fails closed.
        let role = self
            .session
            .current_user()
            .map(|user| user.role)
            .unwrap_or_default();

        if dest.access == Access::SuperAdmin && role != Role::SuperAdmin {
            return Decision::Redirect(LANDING_ROUTE);
        }
        if dest.access == Access::Admin && role < Role::AreaAdmin {
            return Decision::Redirect(LANDING_ROUTE);
        }

        if dest.path == LOGIN_ROUTE && logged_in {
            return Decision::Redirect(LANDING_ROUTE);
        }

        Decision::Allow {
            title: dest.title.clone(),
        }
    }
}
