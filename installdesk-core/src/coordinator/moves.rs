//! Drag and resize confirmation.

use std::fmt;

use tracing::{debug, info, warn};

use crate::appointment::AppointmentId;
use crate::coordinator::MutationCoordinator;
use crate::error::{ScheduleError, ScheduleResult};
use crate::reconcile::{Operation, Strategy};
use crate::surface::CalendarSurface;
use crate::sync::SyncClient;
use crate::sync::protocol::MoveAppointment;
use crate::time_range::TimeRange;
use crate::view::{ViewEvent, from_view_event};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// The event was dragged to a new start; its length is unchanged.
    Drop,
    /// The event's end was dragged.
    Resize,
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveKind::Drop => write!(f, "move"),
            MoveKind::Resize => write!(f, "resize"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveState {
    Tentative,
    Confirmed,
    Cancelled,
}

/// A time change the calendar already displays but the backend has not seen.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    pub id: AppointmentId,
    pub kind: MoveKind,
    pub range: TimeRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub id: AppointmentId,
    pub kind: MoveKind,
    pub state: MoveState,
    pub strategy: Strategy,
}

impl<C: SyncClient, S: CalendarSurface> MutationCoordinator<C, S> {
    pub fn pending_move(&self) -> Option<&PendingMove> {
        self.pending_move.as_ref()
    }

    /// Stage a change the widget has already drawn. Only one change may await
    /// confirmation; a second one is refused and the display is reloaded to
    /// undo what the widget drew for it. A drawn range that cannot be read
    /// back is undone the same way.
    pub async fn begin_move(
        &mut self,
        event: &ViewEvent,
        kind: MoveKind,
    ) -> ScheduleResult<&PendingMove> {
        if let Some(pending) = self.pending_move.take() {
            warn!(id = %pending.id, "change already awaiting confirmation, reloading");
            let strategy = self.policy.on_cancel(Operation::Move);
            self.reconcile_quietly(strategy).await;
            return Err(ScheduleError::ChangePending(pending.id));
        }

        let range = match from_view_event(event) {
            Ok(range) => range,
            Err(e) => {
                warn!(id = %event.id, error = %e, "unreadable drawn range, reloading");
                let strategy = self.policy.on_cancel(Operation::Move);
                self.reconcile_quietly(strategy).await;
                return Err(e);
            }
        };
        debug!(id = %event.id, %kind, start = %range.start(), end = %range.end(), "staged tentative change");

        Ok(&*self.pending_move.insert(PendingMove {
            id: event.id.clone(),
            kind,
            range,
        }))
    }

    /// The operator accepted the change: send it. A failure reloads the
    /// display before the error is returned.
    pub async fn confirm_move(&mut self) -> ScheduleResult<MoveOutcome> {
        let pending = self
            .pending_move
            .take()
            .ok_or(ScheduleError::NoPendingChange)?;

        let request = MoveAppointment::new(pending.id.clone(), pending.range);
        match self.client.move_appointment(request).await {
            Ok(()) => {
                info!(id = %pending.id, kind = %pending.kind, "appointment rescheduled");
                let strategy = self.policy.decide(Operation::Move, true);
                self.reconcile_quietly(strategy).await;
                Ok(MoveOutcome {
                    id: pending.id,
                    kind: pending.kind,
                    state: MoveState::Confirmed,
                    strategy,
                })
            }
            Err(e) => {
                warn!(id = %pending.id, error = %e, "reschedule failed, reverting");
                let strategy = self.policy.decide(Operation::Move, false);
                self.reconcile_quietly(strategy).await;
                Err(e)
            }
        }
    }

    /// The operator declined or dismissed the confirmation.
    pub async fn cancel_move(&mut self) -> ScheduleResult<MoveOutcome> {
        let pending = self
            .pending_move
            .take()
            .ok_or(ScheduleError::NoPendingChange)?;

        debug!(id = %pending.id, "tentative change cancelled");
        let strategy = self.policy.on_cancel(Operation::Move);
        self.reconcile(strategy, None).await?;

        Ok(MoveOutcome {
            id: pending.id,
            kind: pending.kind,
            state: MoveState::Cancelled,
            strategy,
        })
    }
}
