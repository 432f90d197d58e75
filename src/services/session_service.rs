use std::sync::{Arc, Mutex};

use anivault_auth::{TokenStore, UserProfile, ACCESS_TOKEN_KEY};
use tokio::sync::watch;

use crate::error::AppError;

/// Client-side authentication state.
///
/// After [`SessionService::restore_from_storage`] the profile is unknown
/// until a profile fetch occurs, hence the `Option`.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated { user: Option<UserProfile> },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }
}

/// Single source of truth for "is the user currently authenticated".
///
/// All mutations go through `apply_login` / `logout` /
/// `restore_from_storage` and are serialized by one mutex, so no
/// interleaving can produce a stored credential with `Unauthenticated`
/// state or the reverse. Committed states are published through a watch
/// channel; subscribers never observe a half-updated value.
pub struct SessionService {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
    write_lock: Mutex<()>,
}

impl SessionService {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Unauthenticated);
        Self {
            store,
            state,
            write_lock: Mutex::new(()),
        }
    }

    /// The current committed state.
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribes to committed state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Persists the credential, then flips to `Authenticated` — in that
    /// order. When persistence fails the state is left untouched so the UI
    /// never ends up authenticated without a stored token.
    pub fn apply_login(&self, user: UserProfile, token: &str) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());

        self.store.save(ACCESS_TOKEN_KEY, token)?;
        log::info!("session: logged in as {}", user.username);
        self.state
            .send_replace(SessionState::Authenticated { user: Some(user) });
        Ok(())
    }

    /// Deletes the credential and flips to `Unauthenticated`.
    ///
    /// The local logout happens regardless of whether storage cleanup
    /// succeeded; an imperfect delete must never leave the user logged in.
    pub fn logout(&self) {
        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());

        if let Err(e) = self.store.delete(ACCESS_TOKEN_KEY) {
            log::warn!("session: credential cleanup failed: {}", e);
        }
        log::info!("session: logged out");
        self.state.send_replace(SessionState::Unauthenticated);
    }

    /// Restores the session on process start: a stored token means
    /// authenticated, with the profile unknown until fetched.
    pub fn restore_from_storage(&self) {
        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());

        let next = if self.store.get(ACCESS_TOKEN_KEY).is_some() {
            log::info!("session: restored credential from storage");
            SessionState::Authenticated { user: None }
        } else {
            SessionState::Unauthenticated
        };
        self.state.send_replace(next);
    }
}
