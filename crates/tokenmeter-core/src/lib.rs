//! Tokenmeter core — quota & usage accounting engine
//!
//! Tracks pay-per-token LLM models, team token quotas, and per-event usage
//! records, and derives aggregate dashboard snapshots from them.
//!
//! # Module Structure
//!
//! - `store`: SQLite-backed registries (teams, models) and the usage ledger
//! - `dashboard`: derived dashboard snapshot computation
//! - `auth`: access gate issuing and validating bearer tokens
//! - `types`: domain types shared across the engine
//! - `error`: error types

#![forbid(unsafe_code)]

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod store;
pub mod types;

pub use auth::{AccessGate, AuthContext, AuthError};
pub use dashboard::{compute_dashboard, DashboardSnapshot, TeamUsageSummary};
pub use error::{Error, Result};
pub use store::UsageStore;
pub use types::{
    LlmModel, ModelUpdate, NewModel, NewTeam, NewUsage, Team, TeamUpdate, UsageRecord,
};
