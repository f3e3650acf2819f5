//! Optimistic mutation flows.
//!
//! The calendar applies drags and resizes to its own display before anyone
//! has confirmed anything. The coordinator stages that tentative change,
//! waits for the operator, sends the mutation and then reconciles the
//! display according to [`ReconciliationPolicy`].
//!
//! There is no shared "current selection": every flow is carried by a value
//! the caller holds ([`PendingMove`], [`FormSession`], [`DeleteSession`]) and
//! hands back to the coordinator to continue it.

mod delete;
mod forms;
mod moves;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::appointment::AppointmentId;
use crate::error::{ScheduleError, ScheduleResult};
use crate::reconcile::{ReconciliationPolicy, Strategy};
use crate::surface::{CalendarSurface, CalendarViewKind};
use crate::sync::SyncClient;
use crate::view::ViewEvent;

pub use delete::{DeleteSession, DeleteState};
pub use forms::{FormSession, FormState, SubmitOutcome};
pub use moves::{MoveKind, MoveOutcome, MoveState, PendingMove};

pub struct MutationCoordinator<C, S> {
    client: C,
    surface: S,
    policy: ReconciliationPolicy,
    pending_move: Option<PendingMove>,
}

impl<C: SyncClient, S: CalendarSurface> MutationCoordinator<C, S> {
    pub fn new(client: C, surface: S, policy: ReconciliationPolicy) -> Self {
        MutationCoordinator {
            client,
            surface,
            policy,
            pending_move: None,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// For forwarding the widget's own local changes (drag, resize).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn policy(&self) -> ReconciliationPolicy {
        self.policy
    }

    pub fn into_parts(self) -> (C, S) {
        (self.client, self.surface)
    }

    /// Initial load; identical to a full refetch.
    pub async fn load(&mut self) -> ScheduleResult<usize> {
        self.refetch_all().await
    }

    /// Replace the displayed events with the backend's list. On failure the
    /// display is left as it was. Refused while a move awaits confirmation,
    /// since the reload would drop the range the operator is confirming.
    pub async fn refetch_all(&mut self) -> ScheduleResult<usize> {
        self.ensure_no_pending_move()?;
        let events = self.client.list_events().await?;
        let count = events.len();
        self.surface.reset_events(events);
        debug!(count, "reloaded events");
        Ok(count)
    }

    /// A click on an empty calendar cell. In month view this only zooms into
    /// the day; otherwise it opens a create dialog seeded with the cell time.
    pub fn date_click(&mut self, at: NaiveDateTime) -> Option<FormSession> {
        if self.surface.view_kind() == CalendarViewKind::Month {
            self.surface.change_view(CalendarViewKind::Day, at);
            return None;
        }
        Some(self.open_create(at))
    }

    /// Only one tentative change may be open at a time.
    fn ensure_no_pending_move(&self) -> ScheduleResult<()> {
        match &self.pending_move {
            Some(pending) => Err(ScheduleError::ChangePending(pending.id.clone())),
            None => Ok(()),
        }
    }

    /// Carry out `strategy`. `patch` is the replacement event for `Patch`.
    async fn reconcile(
        &mut self,
        strategy: Strategy,
        patch: Option<(AppointmentId, ViewEvent)>,
    ) -> ScheduleResult<()> {
        debug!(%strategy, "reconciling view");
        match strategy {
            Strategy::NoOp => Ok(()),
            Strategy::Patch => {
                if let Some((old_id, event)) = patch {
                    self.surface.remove_event(&old_id);
                    let focus = event.start;
                    self.surface.add_event(event);
                    self.surface.change_view(CalendarViewKind::Day, focus);
                }
                Ok(())
            }
            Strategy::RefetchAll => self.refetch_all().await.map(|_| ()),
        }
    }

    /// Reconcile on a path where the mutation outcome is what the caller
    /// needs to hear about; a reload failure is only logged.
    async fn reconcile_quietly(&mut self, strategy: Strategy) {
        if let Err(e) = self.reconcile(strategy, None).await {
            warn!(error = %e, "failed to reload events");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory backend for coordinator tests.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::appointment::AppointmentId;
    use crate::error::{ScheduleError, ScheduleResult};
    use crate::form::{self, FormMode};
    use crate::sync::SyncClient;
    use crate::sync::protocol::{
        CreateAppointment, CreateReply, DeleteAppointment, EditAppointment, EditReply,
        MoveAppointment,
    };
    use crate::time_range::parse_local_datetime;
    use crate::view::{EventProps, ViewEvent, to_view_event};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Failure {
        Rejected,
        Transport,
    }

    #[derive(Default)]
    pub struct FakeBackend {
        pub events: Mutex<Vec<ViewEvent>>,
        pub calls: Mutex<Vec<String>>,
        pub fail_next: Mutex<Option<Failure>>,
        pub next_id: Mutex<u32>,
    }

    impl FakeBackend {
        pub fn with_events(events: Vec<ViewEvent>) -> Self {
            FakeBackend {
                events: Mutex::new(events),
                next_id: Mutex::new(100),
                ..FakeBackend::default()
            }
        }

        pub fn fail_next(&self, failure: Failure) {
            *self.fail_next.lock().unwrap() = Some(failure);
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> ScheduleResult<()> {
            self.calls.lock().unwrap().push(call);
            match self.fail_next.lock().unwrap().take() {
                Some(Failure::Rejected) => {
                    Err(ScheduleError::BackendRejected("Slot unavailable".into()))
                }
                Some(Failure::Transport) => {
                    Err(ScheduleError::TransportFailure("connection refused".into()))
                }
                None => Ok(()),
            }
        }

        fn find_mut<'a>(
            events: &'a mut [ViewEvent],
            id: &AppointmentId,
        ) -> ScheduleResult<&'a mut ViewEvent> {
            events
                .iter_mut()
                .find(|e| &e.id == id)
                .ok_or_else(|| ScheduleError::BackendRejected("Appointment not found".into()))
        }
    }

    #[async_trait]
    impl SyncClient for FakeBackend {
        async fn list_events(&self) -> ScheduleResult<Vec<ViewEvent>> {
            self.record("list".into())?;
            Ok(self.events.lock().unwrap().clone())
        }

        async fn move_appointment(&self, request: MoveAppointment) -> ScheduleResult<()> {
            self.record(format!("move {}", request.id))?;
            let mut events = self.events.lock().unwrap();
            let event = Self::find_mut(&mut events, &request.id)?;
            event.start = request.time.start();
            event.end = Some(request.time.end());
            Ok(())
        }

        async fn edit_appointment(&self, request: EditAppointment) -> ScheduleResult<EditReply> {
            self.record(format!("edit {}", request.id))?;
            let mut events = self.events.lock().unwrap();
            let event = Self::find_mut(&mut events, &request.id)?;

            let mut fields = request.fields.clone();
            for name in form::CUSTOMER_FIELDS {
                fields.set(name, "");
            }
            let mut record = form::deserialize(&fields, FormMode::Edit)?;
            record.id = Some(request.id.clone());
            record.details.customer.first_name = event.extended_props.customer_first_name.clone();
            record.details.customer.last_name = event.extended_props.customer_last_name.clone();
            record.details.customer.phone = event.extended_props.customer_phone.clone();
            *event = to_view_event(&record)?;

            Ok(EditReply {
                customer_first_name: Some(record.details.customer.first_name.clone()),
                customer_last_name: Some(record.details.customer.last_name.clone()),
                customer_phone: Some(record.details.customer.phone.clone()),
            })
        }

        async fn create_appointment(
            &self,
            request: CreateAppointment,
        ) -> ScheduleResult<CreateReply> {
            self.record("create".into())?;
            let mut record = form::deserialize(&request.fields, FormMode::Create)?;
            let id = {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                AppointmentId::new(next.to_string())
            };
            record.id = Some(id.clone());
            self.events.lock().unwrap().push(to_view_event(&record)?);
            Ok(CreateReply { id: Some(id) })
        }

        async fn delete_appointment(&self, request: DeleteAppointment) -> ScheduleResult<()> {
            self.record(format!("delete {}", request.id))?;
            self.events.lock().unwrap().retain(|e| e.id != request.id);
            Ok(())
        }
    }

    /// A listed event for `id` in the backend's shape.
    pub fn listed_event(id: &str, first_name: &str, start: &str, end: &str) -> ViewEvent {
        ViewEvent {
            id: AppointmentId::new(id),
            title: format!("{first_name} Honda Civic"),
            start: parse_local_datetime(start).unwrap(),
            end: parse_local_datetime(end),
            color: Some("blue".into()),
            extended_props: EventProps {
                customer_first_name: first_name.into(),
                customer_last_name: "Whitlock".into(),
                customer_phone: "555-0101".into(),
                vehicle_year: "2019".into(),
                vehicle_make: "Honda".into(),
                vehicle_model: "Civic".into(),
                installation_type: "standard".into(),
                notes: "Keys at front desk".into(),
                ..EventProps::default()
            },
        }
    }
}
