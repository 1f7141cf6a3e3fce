pub mod auth;
pub mod config;
pub mod progress;
pub mod session;

use burpees_core::storage::RecordCollection;
use burpees_core::{AuthProvider, AuthState, BurpeeTracker, Config, Database, LocalAuth, RequestState};

/// Resolve the signed-in user and load their records.
///
/// # Errors
/// Returns `not signed in` when no profile is stored, or the fetch error
/// when the collection cannot be read.
pub fn signed_in_tracker<'a>(
    db: &'a Database,
    config: &Config,
) -> Result<BurpeeTracker<RecordCollection<'a>>, Box<dyn std::error::Error>> {
    let mut auth = LocalAuth::new(db);
    auth.refresh()?;
    let user = auth.require_user()?.to_string();
    tracing::debug!(%user, "resolved signed-in user");

    let mut tracker = BurpeeTracker::new(db.collection(&user), config);
    tracker.on_auth_change(AuthState::LoggedIn);
    if let RequestState::Error { message } = tracker.fetch_state() {
        return Err(message.clone().into());
    }
    Ok(tracker)
}
