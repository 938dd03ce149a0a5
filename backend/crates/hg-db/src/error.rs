use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Migration error: {message} {location}")]
    Migration {
        message: String,
        location: ErrorLocation,
    },

    #[error("Corrupt row: {message} {location}")]
    CorruptRow {
        message: String,
        location: ErrorLocation,
    },
}

impl DbError {
    #[track_caller]
    pub fn corrupt_row<S: Into<String>>(message: S) -> Self {
        Self::CorruptRow {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// True when the underlying failure is a UNIQUE constraint hit,
    /// letting callers map races on unique columns to validation errors.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Sqlx {
                source: sqlx::Error::Database(db),
                ..
            } if db.is_unique_violation()
        )
    }
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
