//! How the displayed schedule is brought back in line after a mutation.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Drag or resize.
    Move,
    Edit,
    Create,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Move => write!(f, "move"),
            Operation::Edit => write!(f, "edit"),
            Operation::Create => write!(f, "create"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Leave the view as it was (optimistically) mutated.
    NoOp,
    /// Remove one event and rebuild it from authoritative data.
    Patch,
    /// Reload the entire visible event set from the backend.
    RefetchAll,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::NoOp => write!(f, "no-op"),
            Strategy::Patch => write!(f, "patch"),
            Strategy::RefetchAll => write!(f, "refetch-all"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconciliationPolicy {
    /// Reload after a successful move even though the view is already right.
    pub safety_refresh_after_move: bool,
}

impl ReconciliationPolicy {
    pub fn new(safety_refresh_after_move: bool) -> Self {
        ReconciliationPolicy {
            safety_refresh_after_move,
        }
    }

    pub fn decide(&self, operation: Operation, succeeded: bool) -> Strategy {
        match (operation, succeeded) {
            (Operation::Move, true) if self.safety_refresh_after_move => Strategy::RefetchAll,
            (Operation::Move, true) => Strategy::NoOp,
            // The widget already shows the dragged range and cannot undo it.
            (Operation::Move, false) => Strategy::RefetchAll,
            (Operation::Edit, true) => Strategy::Patch,
            // The new id is only known to the backend.
            (Operation::Create, true) => Strategy::RefetchAll,
            (Operation::Delete, true) => Strategy::RefetchAll,
            (Operation::Edit | Operation::Create | Operation::Delete, false) => Strategy::NoOp,
        }
    }

    /// Declining or dismissing a confirmation.
    pub fn on_cancel(&self, operation: Operation) -> Strategy {
        match operation {
            Operation::Move => Strategy::RefetchAll,
            Operation::Edit | Operation::Create | Operation::Delete => Strategy::NoOp,
        }
    }
}
