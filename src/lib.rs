//! # Anivault Client Core
//!
//! The non-UI core of the Anivault media-catalog client: configuration,
//! credential persistence, session state and the login/signup/OTP flow
//! controllers. Presentation layers subscribe to the published state and
//! trigger the flows; they never mutate session state directly.
//!
//! The actual wire protocol lives in the `anivault-auth` crate; this crate
//! owns policy: what happens on an unverified email, when the session flips
//! to authenticated, and what the user gets told on failure.

pub mod config;
pub mod core;
pub mod error;
pub mod services;

pub use config::AppConfig;
pub use self::core::AppCore;
pub use error::AppError;
pub use services::{
    FileTokenStore, LoginService, LoginState, SessionService, SessionState, SignupService,
    SignupState, VerificationService, VerificationState,
};
