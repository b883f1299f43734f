//! Error types returned by the time-clock engine and its storage.
//!
//! Business-rule rejections are ordinary values, never panics: every
//! state-machine entry point returns `Result<_, TimeClockError>` and the
//! caller decides how to present it.

use thiserror::Error;

/// A transition that is not valid for the entry's current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("Already clocked in")]
    AlreadyClockedIn,

    #[error("Not clocked in")]
    NotClockedIn,

    #[error("Already on break")]
    AlreadyOnBreak,

    #[error("Not on break")]
    NotOnBreak,

    #[error("Time entry {0} was changed by another request")]
    EntryChanged(i64),
}

/// Rejected forgot-clock-out correction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Corrected end time must be after clock-in")]
    CorrectedEndNotAfterClockIn,

    #[error("Corrected end time must be in the past")]
    CorrectedEndNotBeforeNow,
}

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness or compare-and-set guard rejected the write.
    #[error("Conflicting write")]
    Conflict,

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[source] rusqlite::Error),

    /// A stored value could not be decoded into its column's type.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::FromSqlConversionFailure(idx, _, cause) => {
                StoreError::Corrupt(format!("column {}: {}", idx, cause))
            }
            other => StoreError::Database(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum TimeClockError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("{0}")]
    PreconditionViolation(#[from] Precondition),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl TimeClockError {
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, TimeClockError::PreconditionViolation(_))
    }

    pub fn precondition(&self) -> Option<&Precondition> {
        match self {
            TimeClockError::PreconditionViolation(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preconditions_display_verbatim() {
        let err: TimeClockError = Precondition::AlreadyClockedIn.into();
        assert_eq!(err.to_string(), "Already clocked in");
        assert!(err.is_precondition_violation());
        assert_eq!(err.precondition(), Some(&Precondition::AlreadyClockedIn));

        let err: TimeClockError = ValidationError::CorrectedEndNotBeforeNow.into();
        assert!(!err.is_precondition_violation());
        assert_eq!(err.to_string(), "Corrected end time must be in the past");
    }

    #[test]
    fn decode_failures_become_corrupt() {
        let cause = "2025-13-40".parse::<chrono::NaiveDate>().unwrap_err();
        let err: StoreError =
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(cause)).into();
        assert!(matches!(err, StoreError::Corrupt(ref detail) if detail.starts_with("column 4: ")));

        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
