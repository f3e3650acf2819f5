//! Error types for installdesk.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::appointment::AppointmentId;
use crate::form::RepeatedGroup;

/// Errors that can occur while binding forms or running mutation flows.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Malformed {group}: {left} entries but {right} prices")]
    MalformedRepeatedGroup {
        group: RepeatedGroup,
        left: usize,
        right: usize,
    },

    #[error("Invalid value for '{field}': {value:?}")]
    InvalidField { field: String, value: String },

    #[error("End time {end} is before start time {start}")]
    InvalidTimeRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("View forms are read-only and cannot be submitted")]
    ReadOnlyForm,

    #[error("Appointment has no backend-assigned id")]
    UnassignedId,

    #[error("Appointment not found: {0}")]
    NotFound(AppointmentId),

    #[error("Backend rejected the request: {0}")]
    BackendRejected(String),

    #[error("There was an error processing your request: {0}")]
    TransportFailure(String),

    #[error("A change to appointment {0} is still awaiting confirmation")]
    ChangePending(AppointmentId),

    #[error("No change is awaiting confirmation")]
    NoPendingChange,

    #[error("Cannot {action} a {state} form")]
    InvalidTransition { action: &'static str, state: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScheduleError {
    pub fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        ScheduleError::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True for failures reported by (or on the way to) the backend.
    ///
    /// These take the failure path of the reconciliation table; local
    /// validation errors never reach the backend and never reconcile.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            ScheduleError::BackendRejected(_) | ScheduleError::TransportFailure(_)
        )
    }
}

/// Result type alias for installdesk operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_failures_are_classified() {
        assert!(ScheduleError::BackendRejected("stale".into()).is_backend_failure());
        assert!(ScheduleError::TransportFailure("refused".into()).is_backend_failure());
        assert!(!ScheduleError::ReadOnlyForm.is_backend_failure());
        assert!(
            !ScheduleError::MalformedRepeatedGroup {
                group: RepeatedGroup::Products,
                left: 2,
                right: 1,
            }
            .is_backend_failure()
        );
    }

    #[test]
    fn malformed_group_message_names_the_group() {
        let err = ScheduleError::MalformedRepeatedGroup {
            group: RepeatedGroup::Products,
            left: 2,
            right: 1,
        };
        assert_eq!(err.to_string(), "Malformed products: 2 entries but 1 prices");
    }
}
