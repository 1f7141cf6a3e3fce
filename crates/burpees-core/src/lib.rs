//! # Daily Burpees Core Library
//!
//! Business logic for a personal burpee tracker: record sessions, group
//! them by day, and project when a fixed repetition goal will be met.
//! The CLI binary is a thin presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Stats**: the pure aggregation engine. Day grouping, totals,
//!   averages and goal projections over plain record lists
//! - **Storage**: the [`RecordStore`] seam with a SQLite-backed and an
//!   in-memory implementation, plus TOML configuration
//! - **Auth**: the tri-state sign-in seam and a local profile provider
//! - **Tracker**: request lifecycle bookkeeping around fetch and save
//!
//! ## Key Components
//!
//! - [`group_by_day`]: partition records by local calendar day
//! - [`ProgressSnapshot`]: every figure of one update, from one grouping
//! - [`BurpeeTracker`]: the page state driving the store
//! - [`Config`]: goal and entry settings

pub mod auth;
pub mod error;
pub mod goal;
pub mod progress;
pub mod record;
pub mod request;
pub mod stats;
pub mod storage;
pub mod tracker;

pub use auth::{AuthProvider, AuthState, LocalAuth};
pub use error::{AuthError, ConfigError, CoreError, StoreError, ValidationError};
pub use goal::Goal;
pub use progress::{BarStatus, ProgressBar};
pub use record::{RecordDocument, RecordId, SessionRecord};
pub use request::{RequestState, RequestTracker};
pub use stats::{group_by_day, DayGroup, DayGroups, Projection, ProgressSnapshot, RateSource};
pub use storage::{Config, Database, MemoryStore, RecordStore};
pub use tracker::BurpeeTracker;
