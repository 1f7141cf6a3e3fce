//! Session tracker: the state behind the progress page.
//!
//! Owns the injected record store, the last loaded records, the count
//! being entered, and one request tracker per backend action. A save
//! that succeeds always triggers a full re-fetch; a failed call leaves
//! the loaded records untouched.

use chrono::{DateTime, TimeZone, Utc};

use crate::auth::AuthState;
use crate::goal::Goal;
use crate::record::{sort_newest_first, SessionRecord};
use crate::request::{RequestState, RequestTracker};
use crate::stats::{ProgressSnapshot, RateSource};
use crate::storage::{Config, EntryConfig, RecordStore};

pub struct BurpeeTracker<S: RecordStore> {
    store: S,
    records: Vec<SessionRecord>,
    count: i64,
    entry: EntryConfig,
    rate_source: RateSource,
    fetch_state: RequestTracker,
    add_state: RequestTracker,
}

impl<S: RecordStore> BurpeeTracker<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            records: Vec::new(),
            count: config.entry.default_amount,
            entry: config.entry.clone(),
            rate_source: config.projection.rate,
            fetch_state: RequestTracker::new(),
            add_state: RequestTracker::with_success_reset(config.feedback.success_reset()),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Loaded records, newest first.
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn fetch_state(&self) -> &RequestState {
        self.fetch_state.state()
    }

    pub fn add_state(&self) -> &RequestState {
        self.add_state.state()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn snapshot<Tz: TimeZone>(&self, goal: &Goal, now: &DateTime<Tz>) -> ProgressSnapshot {
        ProgressSnapshot::compute(&self.records, goal, self.rate_source, now)
    }

    // ── Count entry ──────────────────────────────────────────────────

    pub fn set_count(&mut self, count: i64) {
        self.count = count;
    }

    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(self.entry.step);
    }

    /// Step down, clamped to the configured minimum.
    pub fn decrement(&mut self) {
        self.count = self
            .count
            .saturating_sub(self.entry.step)
            .max(self.entry.minimum);
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Reload every record from the store.
    ///
    /// On failure the previous records stay loaded and the fetch state
    /// carries the error message.
    pub fn fetch(&mut self) {
        self.fetch_state.begin();
        match self.store.fetch_all() {
            Ok(mut records) => {
                sort_newest_first(&mut records);
                tracing::debug!(records = records.len(), "loaded records");
                self.records = records;
                self.fetch_state.succeed(Utc::now());
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetching records failed");
                self.fetch_state.fail(e.to_string());
            }
        }
    }

    /// Save the current count as a session at `now`, then re-fetch.
    ///
    /// Returns the stored record, or `None` if the count was invalid or
    /// the store rejected it.
    pub fn save_session(&mut self, now: DateTime<Utc>) -> Option<SessionRecord> {
        self.add_state.begin();
        let draft = match SessionRecord::new(self.count, now) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!(error = %e, "refusing to save session");
                self.add_state.fail(e.to_string());
                return None;
            }
        };
        match self.store.append(&draft) {
            Ok(saved) => {
                self.add_state.succeed(now);
                self.fetch();
                Some(saved)
            }
            Err(e) => {
                tracing::warn!(error = %e, count = self.count, "saving session failed");
                self.add_state.fail(e.to_string());
                None
            }
        }
    }

    /// Expire a held save acknowledgement.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        self.add_state.tick(now)
    }

    /// React to a sign-in transition.
    pub fn on_auth_change(&mut self, state: AuthState) {
        match state {
            AuthState::LoggedIn => self.fetch(),
            AuthState::LoggedOut => {
                self.records.clear();
                self.count = self.entry.default_amount;
                self.fetch_state.reset();
                self.add_state.reset();
            }
            AuthState::Checking => {}
        }
    }
}
