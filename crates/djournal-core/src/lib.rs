//! Shared domain types and configuration for the journaling backend.
//!
//! Everything here is plain data: entries, locations, sentiment records,
//! recommendations, rollups, and the [`JournalStore`] seam that the engine
//! reads from and writes back to.

pub mod app_config;
pub mod config;
pub mod journal;
pub mod sentiment;
pub mod store;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use journal::{parse_stored_list, EntryText, JournalEntry, Location};
pub use sentiment::{
    LocationKey, LocationSentimentRollup, Recommendation, RecomputeSummary, SentimentLabel,
    SentimentResult,
};
pub use store::{JournalStore, StoreError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid sentiment label: {0}")]
    InvalidSentimentLabel(String),
}
