//! # Anivault Auth
//!
//! A reusable authentication client for the Anivault media-catalog backend.
//!
//! This crate provides:
//! - A typed JSON transport with bearer-token attachment
//! - The login / signup / verify-code / resend-code operations
//! - A closed error taxonomy with centralized status-code mapping
//! - The `TokenStore` contract the transport reads credentials through
//!
//! ## Separation of Concerns
//!
//! This crate focuses solely on talking to the backend. It does **not**:
//! - Persist credentials (the application supplies a [`TokenStore`])
//! - Hold session state (handled by the application)
//! - Decide user-facing error wording (handled by the flow controllers)
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use anivault_auth::{AuthApi, AuthService, HttpTransport, LoginRequest, MemoryTokenStore};
//!
//! let tokens = Arc::new(MemoryTokenStore::new());
//! let transport = HttpTransport::new("https://api.example.com", tokens)?;
//! let service = AuthService::new(transport);
//! let response = service.login(&LoginRequest::new("user@example.com", "secret")).await?;
//! ```

pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod transport;

pub use error::AuthError;
pub use models::{
    ErrorDetail, ErrorEnvelope, LegacyErrorEnvelope, LoginRequest, ResendCodeRequest,
    SignupRequest, TokenResponse, UserProfile, VerifyCodeRequest,
};
pub use service::{AuthApi, AuthService};
pub use store::{MemoryTokenStore, StoreError, TokenStore, ACCESS_TOKEN_KEY};
pub use transport::HttpTransport;
