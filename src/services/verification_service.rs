use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anivault_auth::{AuthApi, VerifyCodeRequest};
use tokio::sync::watch;

use crate::services::FlightGuard;

/// Observable state of the OTP verification screen.
///
/// `Verified` drives navigation back to the authenticated root; `Failed`
/// keeps the screen interactive for another attempt. The whole state is
/// discarded with the service once verification completes or the user
/// abandons the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationState {
    Idle,
    Verifying,
    Verified,
    Failed(String),
}

/// Orchestrates 6-digit code verification for one email address.
pub struct VerificationService {
    auth: Arc<dyn AuthApi>,
    email: String,
    state: watch::Sender<VerificationState>,
    busy: AtomicBool,
}

impl VerificationService {
    pub fn new(auth: Arc<dyn AuthApi>, email: String) -> Self {
        let (state, _) = watch::channel(VerificationState::Idle);
        Self {
            auth,
            email,
            state,
            busy: AtomicBool::new(false),
        }
    }

    /// The email address this verification targets.
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn state(&self) -> VerificationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<VerificationState> {
        self.state.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Submits one code. Anything other than exactly six digits is
    /// rejected locally; no network call is made for it.
    pub async fn submit(&self, code: &str) {
        if self.busy.swap(true, Ordering::SeqCst) {
            log::debug!("verification: submit ignored, attempt already in flight");
            return;
        }
        let _flight = FlightGuard::new(
            &self.busy,
            &self.state,
            VerificationState::Verifying,
            VerificationState::Idle,
        );

        let code = code.trim();
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            self.state.send_replace(VerificationState::Failed(
                "Please enter a valid 6-digit code.".to_string(),
            ));
            return;
        }
        self.state.send_replace(VerificationState::Verifying);

        let request = VerifyCodeRequest::new(&self.email, code);
        let next = match self.auth.verify_code(&request).await {
            Ok(()) => {
                log::info!("verification: {} verified", self.email);
                VerificationState::Verified
            }
            Err(e) => VerificationState::Failed(e.to_string()),
        };

        self.state.send_replace(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{HangingAuth, StubAuth};
    use anivault_auth::AuthError;

    fn service(auth: Arc<StubAuth>) -> VerificationService {
        VerificationService::new(auth, "user@x.com".to_string())
    }

    #[tokio::test]
    async fn test_short_code_never_hits_the_network() {
        let auth = Arc::new(StubAuth::default());
        let service = service(auth.clone());

        service.submit("12345").await;

        assert_eq!(
            service.state(),
            VerificationState::Failed("Please enter a valid 6-digit code.".to_string())
        );
        assert_eq!(auth.verify_calls(), 0);
    }

    #[tokio::test]
    async fn test_non_numeric_code_rejected_locally() {
        let auth = Arc::new(StubAuth::default());
        let service = service(auth.clone());

        service.submit("12a456").await;

        assert!(matches!(service.state(), VerificationState::Failed(_)));
        assert_eq!(auth.verify_calls(), 0);
    }

    #[tokio::test]
    async fn test_valid_code_verifies() {
        let auth = Arc::new(StubAuth::default());
        let service = service(auth.clone());

        service.submit("123456").await;

        assert_eq!(service.state(), VerificationState::Verified);
        assert_eq!(auth.verify_calls(), 1);
    }

    #[tokio::test]
    async fn test_rejected_code_stays_retryable() {
        let auth = Arc::new(StubAuth {
            verify_result: Err(AuthError::Validation("Invalid code".to_string())),
            ..StubAuth::default()
        });
        let service = service(auth.clone());

        service.submit("123456").await;
        assert_eq!(
            service.state(),
            VerificationState::Failed("Invalid code".to_string())
        );
        assert!(!service.is_busy());

        // Retry still reaches the network
        service.submit("654321").await;
        assert_eq!(auth.verify_calls(), 2);
    }

    #[tokio::test]
    async fn test_dropped_submit_leaves_service_usable() {
        let auth = Arc::new(HangingAuth::default());
        let service = Arc::new(VerificationService::new(
            auth.clone() as Arc<dyn AuthApi>,
            "user@x.com".to_string(),
        ));

        let submitting = Arc::clone(&service);
        let handle = tokio::spawn(async move { submitting.submit("123456").await });
        auth.entered.notified().await;

        handle.abort();
        let _ = handle.await;

        assert!(!service.is_busy());
        assert_eq!(service.state(), VerificationState::Idle);

        service.submit("123456").await;
        assert_eq!(service.state(), VerificationState::Verified);
        assert_eq!(auth.verify_calls(), 2);
    }
}
