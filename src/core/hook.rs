//! # ShutdownHook: the process-exit action.
//!
//! Arms a background task that waits for a termination signal and then runs
//! the [`ShutdownCoordinator`] exactly once. The hook must never throw and
//! must stay best-effort even under abrupt termination: everything below the
//! signal wait is already swallow-all by construction.
//!
//! One hook per orchestrator instance; installing a new one replaces (and
//! disarms) the previous. A hook can also be removed explicitly.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::shutdown::ShutdownCoordinator;
use crate::core::signals;

/// Armed process-exit action. Disarm with [`ShutdownHook::remove`].
pub struct ShutdownHook {
    token: CancellationToken,
}

impl ShutdownHook {
    /// Arms the hook: on the next termination signal, the coordinator runs.
    ///
    /// If signal registration fails the hook stays armed but inert; the
    /// failure is reported to stderr since there is no caller to return to.
    pub fn install(coordinator: Arc<ShutdownCoordinator>) -> Self {
        let token = CancellationToken::new();
        let armed = token.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = armed.cancelled() => {}
                res = signals::wait_for_shutdown_signal() => {
                    match res {
                        Ok(()) => {
                            let _ = coordinator.run().await;
                        }
                        Err(e) => {
                            eprintln!("[bootvisor] signal registration failed: {e}");
                        }
                    }
                }
            }
        });

        Self { token }
    }

    /// Disarms the hook; the coordinator will no longer run on signal.
    pub fn remove(&self) {
        self.token.cancel();
    }

    /// True if the hook has been disarmed.
    pub fn is_removed(&self) -> bool {
        self.token.is_cancelled()
    }
}
