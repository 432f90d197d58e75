pub mod login_service;
pub mod session_service;
pub mod signup_service;
pub mod token_store;
pub mod verification_service;

pub use login_service::{LoginService, LoginState};
pub use session_service::{SessionService, SessionState};
pub use signup_service::{SignupService, SignupState};
pub use token_store::FileTokenStore;
pub use verification_service::{VerificationService, VerificationState};

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

/// Clears a flow's in-flight flag when the attempt finishes — including
/// when the submit future is dropped mid-await because the consuming
/// screen went away. A dropped attempt also rolls the published state
/// back from `pending` to `idle`, so the long-lived service stays usable
/// for the next submit instead of sitting on a stale in-flight state.
pub(crate) struct FlightGuard<'a, T: Clone + PartialEq> {
    busy: &'a AtomicBool,
    state: &'a watch::Sender<T>,
    pending: T,
    idle: T,
}

impl<'a, T: Clone + PartialEq> FlightGuard<'a, T> {
    pub(crate) fn new(
        busy: &'a AtomicBool,
        state: &'a watch::Sender<T>,
        pending: T,
        idle: T,
    ) -> Self {
        Self {
            busy,
            state,
            pending,
            idle,
        }
    }
}

impl<T: Clone + PartialEq> Drop for FlightGuard<'_, T> {
    fn drop(&mut self) {
        if *self.state.borrow() == self.pending {
            self.state.send_replace(self.idle.clone());
        }
        self.busy.store(false, Ordering::SeqCst);
    }
}
