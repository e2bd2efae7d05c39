//! Error types for the journal and the trade-logging path.
//!
//! Quote failures never show up here: the price feed masks them with a
//! stale fallback. Everything below is fatal to the action that raised it.

use chrono::NaiveDate;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::core::position_sizer::SizingError;

#[derive(Debug, Error)]
pub enum JournalError {
    /// The daily lock could not be read or written.
    #[error("lock file {}: {source}", .path.display())]
    LockIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("journal {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("journal {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row parsed as CSV but its values make no sense as a trade.
    #[error("journal {} line {line}: {reason}", .path.display())]
    BadRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("rules checklist not confirmed, trade not logged")]
    RulesNotFollowed,

    #[error("one & done: a trade was already logged for {0}")]
    AlreadyTraded(NaiveDate),

    #[error("points must be a finite number, got {0}")]
    InvalidPoints(f64),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sizing(#[from] SizingError),

    #[error(transparent)]
    Journal(#[from] JournalError),

    /// The append failed after the lock was set, and undoing the lock failed too.
    #[error("journal write failed ({write}); restoring the daily lock also failed ({restore})")]
    RollbackFailed {
        write: JournalError,
        restore: JournalError,
    },
}
