//! Shared API model types.

use serde::{Deserialize, Serialize};

/// User privilege roles, ordered lowest to highest.
///
/// Unknown or missing role strings deserialize to `Resident` so privilege
/// checks fail closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Role {
    #[default]
    Resident,
    AreaAdmin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::AreaAdmin => "area_admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "area_admin" => Self::AreaAdmin,
            "super_admin" => Self::SuperAdmin,
            _ => Self::Resident,
        }
    }
}

/// User account record returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub mail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_card: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

/// Credentials posted to `/user/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub mail: String,
    pub password: String,
}

/// Payload of a successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user_info: Option<UserProfile>,
}

/// Shared pagination block on list responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub per_page: u64,
    #[serde(default)]
    pub pages: u64,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_known_values() {
        for (text, role) in [
            ("resident", Role::Resident),
            ("area_admin", Role::AreaAdmin),
            ("super_admin", Role::SuperAdmin),
        ] {
            let parsed: Role = serde_json::from_str(&format!("\"{text}\"")).unwrap();
            assert_eq!(parsed, role);
            assert_eq!(serde_json::to_string(&role).unwrap(), format!("\"{text}\""));
        }
    }

    #[test]
    fn unknown_role_falls_back_to_resident() {
        let parsed: Role = serde_json::from_str("\"auditor\"").unwrap();
        assert_eq!(parsed, Role::Resident);
    }

    #[test]
    fn roles_are_ordered_by_privilege() {
        assert!(Role::Resident < Role::AreaAdmin);
        assert!(Role::AreaAdmin < Role::SuperAdmin);
    }

    #[test]
    fn profile_tolerates_missing_optional_fields() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"user_id":7,"mail":"a@b.cn","role":"area_admin"}"#).unwrap();
        assert_eq!(profile.user_id, 7);
        assert_eq!(profile.role, Role::AreaAdmin);
        assert!(profile.phone.is_none());
        assert_eq!(profile.status, "");
    }

    #[test]
    fn login_data_accepts_token_only_payload() {
        let data: LoginData = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(data.token, "abc");
        assert!(data.refresh_token.is_none());
        assert!(data.user_info.is_none());
    }
}
