use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anivault_auth::{AuthApi, AuthError, LoginRequest, ResendCodeRequest};
use tokio::sync::watch;

use crate::services::session_service::SessionService;
use crate::services::FlightGuard;

/// Observable state of one login attempt.
///
/// `Failed` is not a dead end: the message is shown and the form stays
/// interactive for another attempt. `AwaitingCode` drives navigation to the
/// verification screen.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginState {
    Idle,
    Submitting,
    Success,
    AwaitingCode { email: String },
    Failed(String),
}

/// Orchestrates the login flow, including the "email unverified" policy:
/// a 403 with an email-shaped identifier triggers an automatic resend of
/// the verification code and routes to the verification screen.
pub struct LoginService {
    auth: Arc<dyn AuthApi>,
    session: Arc<SessionService>,
    state: watch::Sender<LoginState>,
    busy: AtomicBool,
}

impl LoginService {
    pub fn new(auth: Arc<dyn AuthApi>, session: Arc<SessionService>) -> Self {
        let (state, _) = watch::channel(LoginState::Idle);
        Self {
            auth,
            session,
            state,
            busy: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> LoginState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoginState> {
        self.state.subscribe()
    }

    /// True while a submit is in flight; callers use this to disable the
    /// action. Correctness does not depend on it.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Submits one login attempt. Empty fields are rejected locally; no
    /// network call is made for them.
    pub async fn submit(&self, identifier: &str, password: &str) {
        if self.busy.swap(true, Ordering::SeqCst) {
            log::debug!("login: submit ignored, attempt already in flight");
            return;
        }
        let _flight = FlightGuard::new(
            &self.busy,
            &self.state,
            LoginState::Submitting,
            LoginState::Idle,
        );

        if identifier.trim().is_empty() || password.is_empty() {
            self.state.send_replace(LoginState::Failed(
                "Please enter both username/email and password.".to_string(),
            ));
            return;
        }
        self.state.send_replace(LoginState::Submitting);

        let request = LoginRequest::new(identifier.trim(), password);
        let next = match self.auth.login(&request).await {
            Ok(response) => {
                match self
                    .session
                    .apply_login(response.user.clone(), &response.access_token)
                {
                    Ok(()) => LoginState::Success,
                    Err(e) => {
                        log::error!("login: credential persistence failed: {}", e);
                        LoginState::Failed(format!("Could not save your session: {}", e))
                    }
                }
            }
            Err(AuthError::EmailUnverified) => self.handle_unverified(identifier.trim()).await,
            Err(e) => LoginState::Failed(e.to_string()),
        };

        self.state.send_replace(next);
    }

    /// Resend only works with an email address; a username identifier gets
    /// a message telling the user to retry with their email.
    async fn handle_unverified(&self, identifier: &str) -> LoginState {
        if !identifier.contains('@') {
            return LoginState::Failed(
                "Account not verified. Please login with email to verify.".to_string(),
            );
        }

        match self
            .auth
            .resend_code(&ResendCodeRequest::new(identifier))
            .await
        {
            Ok(()) => LoginState::AwaitingCode {
                email: identifier.to_string(),
            },
            Err(e) => {
                log::warn!("login: OTP resend failed: {}", e);
                LoginState::Failed(format!("Failed to resend verification code: {}", e))
            }
        }
    }
}
