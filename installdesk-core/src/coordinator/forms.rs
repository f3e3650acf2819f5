//! Create, edit and view dialogs.

use std::fmt;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::appointment::AppointmentRecord;
use crate::coordinator::MutationCoordinator;
use crate::error::{ScheduleError, ScheduleResult};
use crate::form::{self, AppointmentForm, FormFields, FormMode};
use crate::reconcile::{Operation, Strategy};
use crate::surface::CalendarSurface;
use crate::sync::SyncClient;
use crate::sync::protocol::{CreateAppointment, EditAppointment};
use crate::view::to_view_event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Draft,
    Submitted,
    Committed,
    Rejected,
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormState::Draft => write!(f, "draft"),
            FormState::Submitted => write!(f, "submitted"),
            FormState::Committed => write!(f, "committed"),
            FormState::Rejected => write!(f, "rejected"),
        }
    }
}

/// One open dialog and the record it was opened for.
#[derive(Debug, Clone)]
pub struct FormSession {
    mode: FormMode,
    original: Option<AppointmentRecord>,
    fields: FormFields,
    state: FormState,
    last_error: Option<String>,
}

impl FormSession {
    fn new(mode: FormMode, original: Option<AppointmentRecord>, fields: FormFields) -> Self {
        FormSession {
            mode,
            original,
            fields,
            state: FormState::Draft,
            last_error: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// The record the dialog was opened for; after a committed edit, the
    /// record as the backend now has it.
    pub fn original(&self) -> Option<&AppointmentRecord> {
        self.original.as_ref()
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    /// Message shown in the dialog after the last failed submit.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn form(&self) -> ScheduleResult<AppointmentForm> {
        AppointmentForm::from_fields(&self.fields, self.mode)
    }

    pub fn set_form(&mut self, form: &AppointmentForm) {
        self.fields = form.to_fields();
    }

    fn fail(&mut self, error: &ScheduleError) {
        self.last_error = Some(error.to_string());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub strategy: Strategy,
    /// The committed record, with its backend id.
    pub record: AppointmentRecord,
}

impl<C: SyncClient, S: CalendarSurface> MutationCoordinator<C, S> {
    /// Blank create dialog starting at the clicked cell.
    pub fn open_create(&self, start: NaiveDateTime) -> FormSession {
        let form = AppointmentForm::blank(FormMode::Create, start);
        FormSession::new(FormMode::Create, None, form.to_fields())
    }

    pub fn open_edit(&self, record: &AppointmentRecord) -> FormSession {
        FormSession::new(
            FormMode::Edit,
            Some(record.clone()),
            form::serialize(record, FormMode::Edit),
        )
    }

    pub fn open_view(&self, record: &AppointmentRecord) -> FormSession {
        FormSession::new(
            FormMode::View,
            Some(record.clone()),
            form::serialize(record, FormMode::View),
        )
    }

    /// Submit a dialog. Local validation failures leave the session as it
    /// was and never reach the backend; a backend failure marks it rejected
    /// and leaves the display untouched. Either way it can be resubmitted.
    /// Refused without touching the session while a move awaits confirmation.
    pub async fn submit(&mut self, session: &mut FormSession) -> ScheduleResult<SubmitOutcome> {
        self.ensure_no_pending_move()?;
        if matches!(session.state, FormState::Submitted | FormState::Committed) {
            return Err(ScheduleError::InvalidTransition {
                action: "submit",
                state: session.state.to_string(),
            });
        }

        let record = match read_submission(session) {
            Ok(record) => record,
            Err(e) => {
                debug!(mode = %session.mode, error = %e, "form failed validation");
                session.fail(&e);
                return Err(e);
            }
        };

        session.state = FormState::Submitted;
        let result = match session.mode {
            FormMode::Edit => self.submit_edit(session, record).await,
            _ => self.submit_create(record).await,
        };

        match result {
            Ok(outcome) => {
                session.state = FormState::Committed;
                session.last_error = None;
                session.original = Some(outcome.record.clone());
                Ok(outcome)
            }
            Err(e) => {
                session.state = FormState::Rejected;
                session.fail(&e);
                Err(e)
            }
        }
    }

    async fn submit_edit(
        &mut self,
        session: &FormSession,
        record: AppointmentRecord,
    ) -> ScheduleResult<SubmitOutcome> {
        let id = record
            .id
            .clone()
            .or_else(|| session.original.as_ref().and_then(|r| r.id.clone()))
            .ok_or(ScheduleError::UnassignedId)?;

        let request = EditAppointment::new(id.clone(), &record);
        let reply = match self.client.edit_appointment(request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(%id, error = %e, "edit rejected");
                let strategy = self.policy.decide(Operation::Edit, false);
                self.reconcile(strategy, None).await?;
                return Err(e);
            }
        };

        let mut merged = reply.merge_into(record);
        merged.id = Some(id.clone());
        let event = to_view_event(&merged)?;

        info!(%id, title = %event.title, "appointment updated");
        let strategy = self.policy.decide(Operation::Edit, true);
        self.reconcile(strategy, Some((id, event))).await?;

        Ok(SubmitOutcome {
            strategy,
            record: merged,
        })
    }

    async fn submit_create(
        &mut self,
        mut record: AppointmentRecord,
    ) -> ScheduleResult<SubmitOutcome> {
        let reply = match self
            .client
            .create_appointment(CreateAppointment::new(&record))
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "create rejected");
                let strategy = self.policy.decide(Operation::Create, false);
                self.reconcile(strategy, None).await?;
                return Err(e);
            }
        };

        record.id = reply.id;
        info!(id = ?record.id, title = %record.title(), "appointment created");

        let strategy = self.policy.decide(Operation::Create, true);
        self.reconcile_quietly(strategy).await;

        Ok(SubmitOutcome { strategy, record })
    }

    /// The dialog was dismissed. The display is reloaded whatever happened
    /// inside it, unless a move is awaiting confirmation.
    pub async fn close(&mut self, session: FormSession) -> ScheduleResult<()> {
        self.ensure_no_pending_move()?;
        debug!(mode = %session.mode, state = %session.state, "dialog closed");
        self.refetch_all().await.map(|_| ())
    }
}

/// Validate a dialog into the record it describes. Submitted appointments
/// need a positive duration.
fn read_submission(session: &FormSession) -> ScheduleResult<AppointmentRecord> {
    let record = form::deserialize(&session.fields, session.mode)?;
    if record.time.is_empty() {
        let raw = session.fields.get(form::DURATION).unwrap_or_default();
        return Err(ScheduleError::invalid_field(form::DURATION, raw));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::AppointmentId;
    use crate::coordinator::MoveKind;
    use crate::coordinator::testing::{FakeBackend, Failure, listed_event};
    use crate::reconcile::ReconciliationPolicy;
    use crate::surface::{CalendarViewKind, LocalCalendar};
    use crate::time_range::{TimeRange, parse_local_datetime};
    use crate::view::record_from_view_event;

    fn at(s: &str) -> NaiveDateTime {
        parse_local_datetime(s).unwrap()
    }

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

    fn displayed_record(
        coordinator: &MutationCoordinator<FakeBackend, LocalCalendar>,
        id: &str,
    ) -> AppointmentRecord {
        let event = coordinator.surface().get(&AppointmentId::new(id)).unwrap();
        record_from_view_event(event).unwrap()
    }

    #[tokio::test]
    async fn edit_replaces_exactly_the_old_event() {
        let mut coordinator = coordinator();
        let record = displayed_record(&coordinator, "1");
        let untouched = coordinator.surface().events()[1].clone();

        let mut session = coordinator.open_edit(&record);
        let mut form = session.form().unwrap();
        form.vehicle_make = "Toyota".into();
        form.vehicle_model = "Corolla".into();
        form.start_time = "2024-05-02T10:00".into();
        form.duration = "3".into();
        form.add_job("Amp install", "120");
        session.set_form(&form);

        let outcome = coordinator.submit(&mut session).await.unwrap();

        assert_eq!(outcome.strategy, Strategy::Patch);
        assert_eq!(session.state(), FormState::Committed);

        let surface = coordinator.surface();
        assert_eq!(surface.events().len(), 2);
        let edited: Vec<_> = surface
            .events()
            .iter()
            .filter(|e| e.id.as_str() == "1")
            .collect();
        assert_eq!(edited.len(), 1);
        assert_eq!(edited[0].title, "Dana Toyota Corolla");
        assert_eq!(edited[0].start, at("2024-05-02T10:00:00"));
        assert_eq!(edited[0].end, Some(at("2024-05-02T13:00:00")));
        assert_eq!(edited[0].extended_props.installation_jobs.len(), 1);
        assert_eq!(surface.get(&AppointmentId::new("2")), Some(&untouched));

        assert_eq!(surface.view_kind(), CalendarViewKind::Day);
        assert_eq!(surface.focus(), Some(at("2024-05-02T10:00:00")));
        assert_eq!(coordinator.client().calls(), vec!["edit 1"]);
    }

    #[tokio::test]
    async fn edit_keeps_customer_echoed_by_backend() {
        let mut coordinator = coordinator();
        let record = displayed_record(&coordinator, "1");

        let mut session = coordinator.open_edit(&record);
        session.fields_mut().set(form::CUSTOMER_FIRST_NAME, "Mallory");

        let outcome = coordinator.submit(&mut session).await.unwrap();

        assert_eq!(outcome.record.details.customer.first_name, "Dana");
        let shown = coordinator.surface().get(&AppointmentId::new("1")).unwrap();
        assert_eq!(shown.title, "Dana Honda Civic");
    }

    #[tokio::test]
    async fn rejected_edit_leaves_display_and_allows_retry() {
        let mut coordinator = coordinator();
        let before = coordinator.surface().events().to_vec();
        let record = displayed_record(&coordinator, "1");

        let mut session = coordinator.open_edit(&record);
        session.fields_mut().set(form::NOTES, "Bring the harness");
        coordinator.client().fail_next(Failure::Rejected);

        let err = coordinator.submit(&mut session).await.unwrap_err();
        assert!(matches!(err, ScheduleError::BackendRejected(_)));
        assert_eq!(session.state(), FormState::Rejected);
        assert!(session.last_error().unwrap().contains("Slot unavailable"));
        assert_eq!(coordinator.surface().events(), before.as_slice());

        coordinator.submit(&mut session).await.unwrap();
        assert_eq!(session.state(), FormState::Committed);
        assert!(session.last_error().is_none());
        let shown = coordinator.surface().get(&AppointmentId::new("1")).unwrap();
        assert_eq!(shown.extended_props.notes, "Bring the harness");
    }

    #[tokio::test]
    async fn malformed_group_is_caught_before_sending() {
        let mut coordinator = coordinator();
        let record = displayed_record(&coordinator, "1");

        let mut session = coordinator.open_edit(&record);
        session.fields_mut().append("edit_product_name[]", "Subwoofer");

        let err = coordinator.submit(&mut session).await.unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedRepeatedGroup { .. }));
        assert_eq!(session.state(), FormState::Draft);
        assert!(session.last_error().is_some());
        assert!(coordinator.client().calls().is_empty());
    }

    #[tokio::test]
    async fn view_dialog_cannot_be_submitted() {
        let mut coordinator = coordinator();
        let record = displayed_record(&coordinator, "2");

        let mut session = coordinator.open_view(&record);
        assert_eq!(session.fields().get_all("view_product_name[]").len(), 0);

        let err = coordinator.submit(&mut session).await.unwrap_err();
        assert!(matches!(err, ScheduleError::ReadOnlyForm));
        assert!(coordinator.client().calls().is_empty());
    }

    #[tokio::test]
    async fn create_without_duration_is_refused() {
        let mut coordinator = coordinator();
        let mut session = coordinator.open_create(at("2024-05-01T15:00:00"));
        session.fields_mut().set(form::CUSTOMER_FIRST_NAME, "Ines");

        let err = coordinator.submit(&mut session).await.unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidField { ref field, .. } if field == "duration"));
        assert!(coordinator.client().calls().is_empty());
    }

    #[tokio::test]
    async fn create_reloads_and_cannot_be_resubmitted() {
        let mut coordinator = coordinator();
        let mut session = coordinator.open_create(at("2024-05-01T15:00:00"));
        let mut form = session.form().unwrap();
        form.duration = "1.5".into();
        form.customer_first_name = "Ines".into();
        form.vehicle_make = "Subaru".into();
        form.vehicle_model = "Outback".into();
        session.set_form(&form);

        let outcome = coordinator.submit(&mut session).await.unwrap();
        assert_eq!(outcome.strategy, Strategy::RefetchAll);
        assert!(outcome.record.id.is_some());
        assert_eq!(coordinator.client().calls(), vec!["create", "list"]);
        assert_eq!(coordinator.surface().events().len(), 3);

        let err = coordinator.submit(&mut session).await.unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn closing_a_dialog_reloads() {
        let mut coordinator = coordinator();
        let record = displayed_record(&coordinator, "1");
        let session = coordinator.open_view(&record);

        coordinator.close(session).await.unwrap();
        assert_eq!(coordinator.client().calls(), vec!["list"]);
    }

    /// The widget's drag of #1 to a new slot, staged for confirmation.
    async fn stage_drag(coordinator: &mut MutationCoordinator<FakeBackend, LocalCalendar>) {
        let range = TimeRange::new(at("2024-05-03T15:00:00"), at("2024-05-03T17:00:00")).unwrap();
        let moved = coordinator
            .surface_mut()
            .apply_local_change(&AppointmentId::new("1"), range)
            .unwrap();
        coordinator.begin_move(&moved, MoveKind::Drop).await.unwrap();
    }

    #[tokio::test]
    async fn closing_while_a_move_is_pending_keeps_the_drawn_range() {
        let mut coordinator = coordinator();
        let record = displayed_record(&coordinator, "2");
        let session = coordinator.open_view(&record);
        stage_drag(&mut coordinator).await;

        let err = coordinator.close(session).await.unwrap_err();
        assert!(matches!(err, ScheduleError::ChangePending(ref id) if id.as_str() == "1"));
        assert!(matches!(
            coordinator.refetch_all().await,
            Err(ScheduleError::ChangePending(_))
        ));
        assert!(coordinator.client().calls().is_empty());
        assert!(coordinator.pending_move().is_some());

        coordinator.confirm_move().await.unwrap();
        let shown = coordinator.surface().get(&AppointmentId::new("1")).unwrap();
        assert_eq!(shown.start, at("2024-05-03T15:00:00"));
        assert_eq!(coordinator.client().calls(), vec!["move 1"]);
    }

    #[tokio::test]
    async fn submit_while_a_move_is_pending_is_refused() {
        let mut coordinator = coordinator();
        let record = displayed_record(&coordinator, "2");
        let mut session = coordinator.open_edit(&record);
        session.fields_mut().set(form::NOTES, "Bring the harness");
        stage_drag(&mut coordinator).await;

        let err = coordinator.submit(&mut session).await.unwrap_err();

        assert!(matches!(err, ScheduleError::ChangePending(_)));
        assert_eq!(session.state(), FormState::Draft);
        assert!(session.last_error().is_none());
        assert!(coordinator.client().calls().is_empty());
        let shown = coordinator.surface().get(&AppointmentId::new("1")).unwrap();
        assert_eq!(shown.start, at("2024-05-03T15:00:00"));

        coordinator.cancel_move().await.unwrap();
        coordinator.submit(&mut session).await.unwrap();
        assert_eq!(session.state(), FormState::Committed);
    }
}
