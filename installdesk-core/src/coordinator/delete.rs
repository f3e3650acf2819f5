//! Two-step delete.

use tracing::{debug, info, warn};

use crate::appointment::AppointmentId;
use crate::coordinator::MutationCoordinator;
use crate::error::{ScheduleError, ScheduleResult};
use crate::reconcile::{Operation, Strategy};
use crate::surface::CalendarSurface;
use crate::sync::SyncClient;
use crate::sync::protocol::DeleteAppointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteState {
    PendingConfirmation,
    Deleted,
    Cancelled,
}

impl std::fmt::Display for DeleteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteState::PendingConfirmation => write!(f, "pending"),
            DeleteState::Deleted => write!(f, "deleted"),
            DeleteState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A delete the operator has asked for but not yet confirmed.
///
/// Only a session in `PendingConfirmation` can reach the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteSession {
    id: AppointmentId,
    state: DeleteState,
}

impl DeleteSession {
    pub fn id(&self) -> &AppointmentId {
        &self.id
    }

    pub fn state(&self) -> DeleteState {
        self.state
    }

    fn ensure_pending(&self, action: &'static str) -> ScheduleResult<()> {
        if self.state != DeleteState::PendingConfirmation {
            return Err(ScheduleError::InvalidTransition {
                action,
                state: self.state.to_string(),
            });
        }
        Ok(())
    }
}

impl<C: SyncClient, S: CalendarSurface> MutationCoordinator<C, S> {
    pub fn request_delete(&self, id: AppointmentId) -> DeleteSession {
        debug!(%id, "delete requested");
        DeleteSession {
            id,
            state: DeleteState::PendingConfirmation,
        }
    }

    /// Send the delete. On failure nothing on display changes and the session
    /// stays pending, so the operator can retry or cancel. Refused while a
    /// move awaits confirmation.
    pub async fn confirm_delete(&mut self, session: &mut DeleteSession) -> ScheduleResult<Strategy> {
        session.ensure_pending("confirm")?;
        self.ensure_no_pending_move()?;

        let request = DeleteAppointment::new(session.id.clone());
        if let Err(e) = self.client.delete_appointment(request).await {
            warn!(id = %session.id, error = %e, "delete failed");
            let strategy = self.policy.decide(Operation::Delete, false);
            self.reconcile(strategy, None).await?;
            return Err(e);
        }

        session.state = DeleteState::Deleted;
        info!(id = %session.id, "appointment deleted");

        let strategy = self.policy.decide(Operation::Delete, true);
        if let Err(e) = self.reconcile(strategy, None).await {
            warn!(id = %session.id, error = %e, "reload after delete failed, removing locally");
            self.surface.remove_event(&session.id);
        }
        Ok(strategy)
    }

    pub fn cancel_delete(&self, session: &mut DeleteSession) -> ScheduleResult<()> {
        session.ensure_pending("cancel")?;
        session.state = DeleteState::Cancelled;
        debug!(id = %session.id, "delete cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::MoveKind;
    use crate::coordinator::testing::{FakeBackend, Failure, listed_event};
    use crate::reconcile::ReconciliationPolicy;
    use crate::surface::LocalCalendar;
    use crate::time_range::{TimeRange, parse_local_datetime};

    fn coordinator() -> MutationCoordinator<FakeBackend, LocalCalendar> {
        let events = vec![
            listed_event("1", "Dana", "2024-05-01T09:00:00", "2024-05-01T11:00:00"),
            listed_event("2", "Ravi", "2024-05-01T13:00:00", "2024-05-01T14:00:00"),
        ];
        MutationCoordinator::new(
            FakeBackend::with_events(events.clone()),
            LocalCalendar::with_events(events),
            ReconciliationPolicy::default(),
        )
    }

    #[tokio::test]
    async fn confirmed_delete_reloads_without_the_id() {
        let mut coordinator = coordinator();
        let mut session = coordinator.request_delete(AppointmentId::new("1"));
        assert!(coordinator.client().calls().is_empty());

        let strategy = coordinator.confirm_delete(&mut session).await.unwrap();

        assert_eq!(strategy, Strategy::RefetchAll);
        assert_eq!(session.state(), DeleteState::Deleted);
        assert_eq!(coordinator.client().calls(), vec!["delete 1", "list"]);
        assert!(coordinator.surface().get(&AppointmentId::new("1")).is_none());
        assert_eq!(coordinator.surface().events().len(), 1);
    }

    #[tokio::test]
    async fn declined_delete_touches_nothing() {
        let mut coordinator = coordinator();
        let before = coordinator.surface().events().to_vec();
        let mut session = coordinator.request_delete(AppointmentId::new("1"));

        coordinator.cancel_delete(&mut session).unwrap();

        assert_eq!(session.state(), DeleteState::Cancelled);
        assert!(coordinator.client().calls().is_empty());
        assert_eq!(coordinator.surface().events(), before.as_slice());

        let err = coordinator.confirm_delete(&mut session).await.unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTransition { .. }));
        assert!(coordinator.client().calls().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_stays_pending() {
        let mut coordinator = coordinator();
        let before = coordinator.surface().events().to_vec();
        let mut session = coordinator.request_delete(AppointmentId::new("2"));
        coordinator.client().fail_next(Failure::Transport);

        let err = coordinator.confirm_delete(&mut session).await.unwrap_err();

        assert!(matches!(err, ScheduleError::TransportFailure(_)));
        assert_eq!(session.state(), DeleteState::PendingConfirmation);
        assert_eq!(coordinator.surface().events(), before.as_slice());

        coordinator.confirm_delete(&mut session).await.unwrap();
        assert_eq!(session.state(), DeleteState::Deleted);
    }

    #[tokio::test]
    async fn deleted_session_cannot_be_replayed() {
        let mut coordinator = coordinator();
        let mut session = coordinator.request_delete(AppointmentId::new("1"));
        coordinator.confirm_delete(&mut session).await.unwrap();

        let err = coordinator.confirm_delete(&mut session).await.unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTransition { .. }));
        assert_eq!(coordinator.client().calls(), vec!["delete 1", "list"]);
    }

    #[tokio::test]
    async fn delete_waits_for_the_pending_move() {
        let mut coordinator = coordinator();
        let start = parse_local_datetime("2024-05-03T15:00:00").unwrap();
        let end = parse_local_datetime("2024-05-03T17:00:00").unwrap();
        let moved = coordinator
            .surface_mut()
            .apply_local_change(&AppointmentId::new("1"), TimeRange::new(start, end).unwrap())
            .unwrap();
        coordinator.begin_move(&moved, MoveKind::Drop).await.unwrap();
        let mut session = coordinator.request_delete(AppointmentId::new("2"));

        let err = coordinator.confirm_delete(&mut session).await.unwrap_err();

        assert!(matches!(err, ScheduleError::ChangePending(ref id) if id.as_str() == "1"));
        assert_eq!(session.state(), DeleteState::PendingConfirmation);
        assert!(coordinator.client().calls().is_empty());
        assert_eq!(coordinator.surface().events().len(), 2);

        coordinator.confirm_move().await.unwrap();
        coordinator.confirm_delete(&mut session).await.unwrap();
        assert_eq!(coordinator.client().calls(), vec!["move 1", "delete 2", "list"]);
    }
}
