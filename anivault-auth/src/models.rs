use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Requests. One value per attempt; never reused.

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(identifier: &str, password: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            password: password.to_string(),
        }
    }
}

/// Body of `POST /auth/signup`
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

/// Body of `POST /auth/verify-code`
#[derive(Debug, Clone, Serialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

impl VerifyCodeRequest {
    pub fn new(email: &str, code: &str) -> Self {
        Self {
            email: email.to_string(),
            code: code.to_string(),
        }
    }
}

/// Body of `POST /auth/verify-email` (triggers re-issuance of a code)
#[derive(Debug, Clone, Serialize)]
pub struct ResendCodeRequest {
    pub email: String,
}

impl ResendCodeRequest {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
        }
    }
}

// Responses.

/// Successful login/signup response carrying the credential and profile.
///
/// The server emits snake_case keys; camelCase aliases are accepted for
/// older deployments.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(alias = "accessToken")]
    pub access_token: String,
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: Option<String>,
    pub user: UserProfile,
    #[serde(default, alias = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "tokenType")]
    pub token_type: Option<String>,
}

/// User profile as returned by the server.
///
/// Immutable value: replaced wholesale on every successful login or
/// verification, never mutated field by field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub email: String,
    pub username: String,
    #[serde(default, alias = "roleId")]
    pub role_id: i64,
    #[serde(default, alias = "emailVerified")]
    pub email_verified: bool,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "lastLogin")]
    pub last_login: Option<DateTime<Utc>>,
}

// Error envelopes on non-2xx responses.

/// Structured error envelope: `{"success": false, "error": {"code", "message", "details"?}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Older envelope shape still emitted by some endpoints: `{"error": true, "reason": "..."}`
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyErrorEnvelope {
    pub error: bool,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_snake_case() {
        let json = r#"{
            "success": true,
            "access_token": "tok-123",
            "refresh_token": "ref-456",
            "user": {
                "id": "5f8b2a1e-9c3d-4e5f-8a7b-1c2d3e4f5a6b",
                "email": "a@b.com",
                "username": "ab",
                "role_id": 2,
                "email_verified": true
            },
            "expires_at": "2025-06-01T12:00:00Z",
            "token_type": "Bearer"
        }"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "tok-123");
        assert_eq!(response.refresh_token.as_deref(), Some("ref-456"));
        assert_eq!(response.user.username, "ab");
        assert_eq!(response.user.role_id, 2);
        assert!(response.user.email_verified);
        assert!(response.expires_at.is_some());
    }

    #[test]
    fn test_token_response_camel_case_aliases() {
        let json = r#"{
            "success": true,
            "accessToken": "tok-123",
            "user": {
                "email": "a@b.com",
                "username": "ab",
                "roleId": 1
            }
        }"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "tok-123");
        assert_eq!(response.refresh_token, None);
        assert_eq!(response.user.role_id, 1);
        assert!(!response.user.email_verified);
        assert_eq!(response.user.id, None);
    }

    #[test]
    fn test_error_envelopes() {
        let structured = r#"{"success":false,"error":{"code":"DUP","message":"Email already exists"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(structured).unwrap();
        assert_eq!(envelope.error.code, "DUP");
        assert_eq!(envelope.error.message, "Email already exists");

        let legacy = r#"{"error":true,"reason":"User not found"}"#;
        let envelope: LegacyErrorEnvelope = serde_json::from_str(legacy).unwrap();
        assert!(envelope.error);
        assert_eq!(envelope.reason, "User not found");
    }
}
