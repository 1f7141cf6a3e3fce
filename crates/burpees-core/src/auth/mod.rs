//! Sign-in state.
//!
//! The core only reacts to transitions between the three states; it
//! never sees credentials.

mod local;

pub use local::LocalAuth;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    /// Not yet known whether anyone is signed in.
    Checking,
    LoggedIn,
    LoggedOut,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuthState::Checking => "checking",
            AuthState::LoggedIn => "logged in",
            AuthState::LoggedOut => "logged out",
        };
        f.write_str(s)
    }
}

/// Called with the new state and display name on every transition.
pub type AuthListener = Box<dyn FnMut(AuthState, Option<&str>)>;

pub trait AuthProvider {
    fn state(&self) -> AuthState;

    /// Display name of the signed-in user.
    fn display_name(&self) -> Option<&str>;

    fn subscribe(&mut self, listener: AuthListener);

    /// Sign in as `display_name`.
    fn login(&mut self, display_name: &str) -> Result<(), AuthError>;

    fn logout(&mut self) -> Result<(), AuthError>;

    /// Display name, or [`AuthError::NotSignedIn`].
    fn require_user(&self) -> Result<&str, AuthError> {
        match (self.state(), self.display_name()) {
            (AuthState::LoggedIn, Some(name)) => Ok(name),
            _ => Err(AuthError::NotSignedIn),
        }
    }
}
