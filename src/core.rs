use std::sync::Arc;

use anivault_auth::{AuthApi, AuthService, HttpTransport, TokenStore};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::{FileTokenStore, LoginService, SessionService, SignupService, VerificationService};

/// Wires the client core together.
///
/// Constructed once at process start; every component receives its
/// dependencies explicitly — there are no global singletons. Screens grab
/// the services they need from here (the verification flow is created per
/// screen since it is scoped to one email address).
pub struct AppCore {
    pub tokens: Arc<dyn TokenStore>,
    pub auth: Arc<dyn AuthApi>,
    pub session: Arc<SessionService>,
    pub login: LoginService,
    pub signup: SignupService,
}

impl AppCore {
    /// Builds the dependency graph from configuration and restores any
    /// persisted session.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let tokens: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::new(config.data_dir.clone()));

        let transport = HttpTransport::new(&config.api_url, Arc::clone(&tokens))?;
        let auth: Arc<dyn AuthApi> = Arc::new(AuthService::new(transport));

        let session = Arc::new(SessionService::new(Arc::clone(&tokens)));
        session.restore_from_storage();

        let login = LoginService::new(Arc::clone(&auth), Arc::clone(&session));
        let signup = SignupService::new(Arc::clone(&auth));

        log::info!("client core initialized against {}", config.api_url);

        Ok(Self {
            tokens,
            auth,
            session,
            login,
            signup,
        })
    }

    /// Creates the verification flow for one email address. Dropped (and
    /// its state with it) when the screen goes away; late results are
    /// simply discarded.
    pub fn verification_flow(&self, email: String) -> VerificationService {
        VerificationService::new(Arc::clone(&self.auth), email)
    }
}
