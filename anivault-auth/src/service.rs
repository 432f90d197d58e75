use async_trait::async_trait;
use reqwest::Method;

use crate::error::AuthError;
use crate::models::{
    LoginRequest, ResendCodeRequest, SignupRequest, TokenResponse, VerifyCodeRequest,
};
use crate::transport::HttpTransport;

/// The four authentication operations.
///
/// Behind a trait so flow controllers can run against a deterministic stub
/// in tests. Every method takes a fresh request value and returns one
/// outcome; no operation retries or logs-and-swallows.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges identifier (email or username) + password for a credential.
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AuthError>;

    /// Creates a pending (unverified) account. The response carries a
    /// token for the unverified account awaiting code entry.
    async fn signup(&self, request: &SignupRequest) -> Result<TokenResponse, AuthError>;

    /// Submits the 6-digit verification code. Success is a bare 2xx.
    async fn verify_code(&self, request: &VerifyCodeRequest) -> Result<(), AuthError>;

    /// Triggers re-issuance of a verification code. Success is a bare 2xx.
    async fn resend_code(&self, request: &ResendCodeRequest) -> Result<(), AuthError>;
}

/// Anivault authentication service talking to the real backend.
pub struct AuthService {
    transport: HttpTransport,
}

impl AuthService {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl AuthApi for AuthService {
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AuthError> {
        self.transport
            .request(Method::POST, "/auth/login", Some(request), false)
            .await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<TokenResponse, AuthError> {
        self.transport
            .request(Method::POST, "/auth/signup", Some(request), false)
            .await
    }

    async fn verify_code(&self, request: &VerifyCodeRequest) -> Result<(), AuthError> {
        self.transport
            .send(Method::POST, "/auth/verify-code", Some(request), false)
            .await?;
        Ok(())
    }

    async fn resend_code(&self, request: &ResendCodeRequest) -> Result<(), AuthError> {
        self.transport
            .send(Method::POST, "/auth/verify-email", Some(request), false)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTokenStore;
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> AuthService {
        let transport =
            HttpTransport::new(&server.uri(), Arc::new(MemoryTokenStore::new())).unwrap();
        AuthService::new(transport)
    }

    #[tokio::test]
    async fn test_login_success_decodes_token_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"identifier": "a@b.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "access_token": "tok-1",
                "refresh_token": "ref-1",
                "user": {"email": "a@b.com", "username": "ab", "role_id": 1},
                "token_type": "Bearer"
            })))
            .mount(&server)
            .await;

        let response = service(&server)
            .login(&LoginRequest::new("a@b.com", "pw"))
            .await
            .unwrap();
        assert_eq!(response.access_token, "tok-1");
        assert_eq!(response.user.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_login_401_maps_to_invalid_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(
                json!({"success": false, "error": {"code": "BAD_CREDS", "message": "nope"}}),
            ))
            .mount(&server)
            .await;

        let result = service(&server).login(&LoginRequest::new("a@b.com", "x")).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_signup_conflict_surfaces_envelope_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signup"))
            .respond_with(ResponseTemplate::new(409).set_body_json(
                json!({"success": false, "error": {"code": "DUP", "message": "Email already exists"}}),
            ))
            .mount(&server)
            .await;

        let result = service(&server)
            .signup(&SignupRequest::new("a@b.com", "pw"))
            .await;
        assert_eq!(
            result.unwrap_err(),
            AuthError::Conflict("Email already exists".to_string())
        );
    }

    #[tokio::test]
    async fn test_verify_code_success_needs_no_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/verify-code"))
            .and(body_json(json!({"email": "a@b.com", "code": "123456"})))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        service(&server)
            .verify_code(&VerifyCodeRequest::new("a@b.com", "123456"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_resend_code_hits_verify_email_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/verify-email"))
            .and(body_json(json!({"email": "a@b.com"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        service(&server)
            .resend_code(&ResendCodeRequest::new("a@b.com"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_malformed_error_body_falls_back_to_server_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let result = service(&server).login(&LoginRequest::new("a@b.com", "pw")).await;
        assert_eq!(
            result.unwrap_err(),
            AuthError::Server {
                status: 503,
                message: "upstream down".to_string(),
            }
        );
    }
}
