use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anivault_auth::{AuthApi, SignupRequest};
use tokio::sync::watch;

use crate::services::FlightGuard;

/// Observable state of one signup attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SignupState {
    Idle,
    Submitting,
    /// Account created; a verification code is on its way to `email`.
    AwaitingCode { email: String },
    Failed(String),
}

/// Orchestrates account creation.
///
/// A successful signup creates a pending (unverified) account; the response
/// token is deliberately discarded — the session only becomes authenticated
/// through a login after the email is verified.
pub struct SignupService {
    auth: Arc<dyn AuthApi>,
    state: watch::Sender<SignupState>,
    busy: AtomicBool,
}

impl SignupService {
    pub fn new(auth: Arc<dyn AuthApi>) -> Self {
        let (state, _) = watch::channel(SignupState::Idle);
        Self {
            auth,
            state,
            busy: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SignupState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SignupState> {
        self.state.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Submits one signup attempt. Empty fields and a mismatched
    /// confirmation are rejected locally; no network call is made for them.
    pub async fn submit(&self, email: &str, password: &str, confirm_password: &str) {
        if self.busy.swap(true, Ordering::SeqCst) {
            log::debug!("signup: submit ignored, attempt already in flight");
            return;
        }
        let _flight = FlightGuard::new(
            &self.busy,
            &self.state,
            SignupState::Submitting,
            SignupState::Idle,
        );

        if email.trim().is_empty() || password.is_empty() || confirm_password.is_empty() {
            self.state
                .send_replace(SignupState::Failed("Please fill in all fields.".to_string()));
            return;
        }
        if password != confirm_password {
            self.state
                .send_replace(SignupState::Failed("Passwords do not match.".to_string()));
            return;
        }
        self.state.send_replace(SignupState::Submitting);

        let email = email.trim().to_string();
        let request = SignupRequest::new(&email, password);
        let next = match self.auth.signup(&request).await {
            // Pre-verification token discarded on purpose
            Ok(_) => SignupState::AwaitingCode { email },
            Err(e) => SignupState::Failed(e.to_string()),
        };

        self.state.send_replace(next);
    }
}
