//! User identity models and auth payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A RidePool account as returned by the backend.
///
/// Immutable from the client's perspective except through the explicit
/// profile-update operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

/// Successful login/register response.
///
/// Both fields are optional on the wire so that a response missing either
/// one can be detected and rejected as a contract violation instead of
/// failing deserialization with an opaque message.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Plain acknowledgement body (`{"message": "..."}`).
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_wire_format_is_camel_case() {
        let json = r#"{
            "id": 7,
            "name": "Asha Rao",
            "email": "asha@example.com",
            "phone": "9876543210",
            "profileImage": "https://cdn.example.com/asha.jpg",
            "isVerified": true,
            "createdAt": "2025-01-10T08:00:00Z",
            "updatedAt": "2025-01-12T09:30:00Z"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.profile_image.as_deref(), Some("https://cdn.example.com/asha.jpg"));
        assert!(user.is_verified);
    }

    #[test]
    fn test_user_optional_fields_default() {
        let json = r#"{
            "id": 1,
            "name": "Dev",
            "email": "dev@example.com",
            "phone": "9000000000",
            "createdAt": "2025-01-10T08:00:00Z",
            "updatedAt": "2025-01-10T08:00:00Z"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.profile_image.is_none());
        assert!(!user.is_verified);
    }

    #[test]
    fn test_auth_payload_tolerates_missing_fields() {
        let payload: AuthPayload = serde_json::from_str(r#"{"token": "abc"}"#).unwrap();
        assert_eq!(payload.token.as_deref(), Some("abc"));
        assert!(payload.user.is_none());

        let payload: AuthPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.token.is_none());
        assert!(payload.user.is_none());
    }

    #[test]
    fn test_update_profile_omits_absent_fields() {
        let data = UpdateProfileData {
            phone: Some("9123456789".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, serde_json::json!({"phone": "9123456789"}));
    }
}
