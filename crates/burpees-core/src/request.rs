//! Request lifecycle bookkeeping for the two backend actions.
//!
//! ```text
//! Idle -> Loading -> (Success | Error) -> Idle
//! ```
//!
//! Like the rest of the core this does not run timers. A tracker with a
//! success reset holds `Success` until a `tick()` past the reset delay.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RequestState {
    Idle,
    Loading,
    Success { at: DateTime<Utc> },
    Error { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestTracker {
    state: RequestState,
    /// How long `Success` is shown before falling back to `Idle`.
    /// `None` falls back immediately.
    #[serde(default)]
    success_reset_ms: Option<i64>,
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestTracker {
    /// Tracker whose success goes straight back to `Idle`.
    pub fn new() -> Self {
        Self {
            state: RequestState::Idle,
            success_reset_ms: None,
        }
    }

    /// Tracker that shows `Success` for `delay` before returning to `Idle`.
    pub fn with_success_reset(delay: Duration) -> Self {
        Self {
            state: RequestState::Idle,
            success_reset_ms: Some(delay.num_milliseconds()),
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == RequestState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RequestState::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Enter `Loading`. Any previous error is cleared.
    pub fn begin(&mut self) {
        self.state = RequestState::Loading;
    }

    pub fn succeed(&mut self, now: DateTime<Utc>) {
        self.state = match self.success_reset_ms {
            Some(_) => RequestState::Success { at: now },
            None => RequestState::Idle,
        };
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = RequestState::Error {
            message: message.into(),
        };
    }

    /// Expire a held `Success`. Returns true if the state changed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let (RequestState::Success { at }, Some(reset_ms)) = (&self.state, self.success_reset_ms)
        else {
            return false;
        };
        if (now - *at).num_milliseconds() >= reset_ms {
            self.state = RequestState::Idle;
            return true;
        }
        false
    }

    /// Back to `Idle` regardless of state.
    pub fn reset(&mut self) {
        self.state = RequestState::Idle;
    }
}
