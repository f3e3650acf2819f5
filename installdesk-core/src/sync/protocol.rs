//! Request and reply shapes of the appointment backend.
//!
//! Mutations are posted as `application/x-www-form-urlencoded` bodies and
//! answered with a JSON envelope `{"status": "success" | "error", "message"?}`
//! plus any operation-specific fields.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::appointment::{AppointmentId, AppointmentRecord};
use crate::error::{ScheduleError, ScheduleResult};
use crate::form::{self, FormFields, FormMode};
use crate::time_range::{TimeRange, format_local_iso};
use crate::view::ViewEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A typed backend request; the reply type is fixed per command.
pub trait BackendCommand {
    type Reply: DeserializeOwned;

    fn method(&self) -> Method {
        Method::Post
    }

    /// Path segments below the backend base URL. Each segment is escaped on
    /// its own, so an id can never add segments or a query.
    fn path(&self) -> Vec<String>;

    fn form(&self) -> FormFields {
        FormFields::new()
    }

    fn decode(body: &str) -> ScheduleResult<Self::Reply> {
        decode_reply(body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub status: ReplyStatus,
    #[serde(default)]
    pub message: Option<String>,
}

impl ReplyEnvelope {
    pub fn into_error(self) -> ScheduleError {
        ScheduleError::BackendRejected(
            self.message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "unknown error".to_string()),
        )
    }
}

/// Decode an envelope reply: `status: error` becomes `BackendRejected`, an
/// unreadable body is a `TransportFailure`.
pub fn decode_reply<T: DeserializeOwned>(body: &str) -> ScheduleResult<T> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ScheduleError::TransportFailure(format!("Failed to parse reply: {e}")))?;

    let envelope: ReplyEnvelope = serde_json::from_value(value.clone())
        .map_err(|e| ScheduleError::TransportFailure(format!("Malformed reply: {e}")))?;

    match envelope.status {
        ReplyStatus::Error => Err(envelope.into_error()),
        ReplyStatus::Success => serde_json::from_value(value)
            .map_err(|e| ScheduleError::TransportFailure(format!("Malformed reply: {e}"))),
    }
}

/// Reply carrying nothing beyond the envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {}

/// Customer fields the backend echoes after an edit, so the title can be
/// rebuilt without a second fetch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditReply {
    #[serde(default)]
    pub customer_first_name: Option<String>,
    #[serde(default)]
    pub customer_last_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
}

impl EditReply {
    /// Overlay the echoed customer fields onto the submitted record.
    pub fn merge_into(self, mut record: AppointmentRecord) -> AppointmentRecord {
        let customer = &mut record.details.customer;
        if let Some(first_name) = self.customer_first_name {
            customer.first_name = first_name;
        }
        if let Some(last_name) = self.customer_last_name {
            customer.last_name = last_name;
        }
        if let Some(phone) = self.customer_phone {
            customer.phone = phone;
        }
        record
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateReply {
    #[serde(default)]
    pub id: Option<AppointmentId>,
}

/// `GET /events`: the full displayable set (a bare JSON array, no envelope).
#[derive(Debug, Clone, Default)]
pub struct ListEvents;

impl BackendCommand for ListEvents {
    type Reply = Vec<ViewEvent>;

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> Vec<String> {
        vec!["events".to_string()]
    }

    fn decode(body: &str) -> ScheduleResult<Self::Reply> {
        serde_json::from_str(body)
            .map_err(|e| ScheduleError::TransportFailure(format!("Failed to parse events: {e}")))
    }
}

fn appointment_path(action: &str, id: &AppointmentId) -> Vec<String> {
    vec!["appointment".to_string(), action.to_string(), id.to_string()]
}

/// `POST /appointment/move/{id}` with the new range.
#[derive(Debug, Clone)]
pub struct MoveAppointment {
    pub id: AppointmentId,
    pub time: TimeRange,
}

impl MoveAppointment {
    pub fn new(id: AppointmentId, time: TimeRange) -> Self {
        MoveAppointment { id, time }
    }
}

impl BackendCommand for MoveAppointment {
    type Reply = Ack;

    fn path(&self) -> Vec<String> {
        appointment_path("move", &self.id)
    }

    fn form(&self) -> FormFields {
        let mut fields = FormFields::new();
        fields.append(form::START_TIME, format_local_iso(&self.time.start()));
        fields.append(form::END_TIME, format_local_iso(&self.time.end()));
        fields
    }
}

/// `POST /appointment/edit/{id}`: full replacement of the editable fields.
///
/// Customer identity is not editable here; the backend echoes it instead.
#[derive(Debug, Clone)]
pub struct EditAppointment {
    pub id: AppointmentId,
    pub fields: FormFields,
}

impl EditAppointment {
    pub fn new(id: AppointmentId, record: &AppointmentRecord) -> Self {
        let mut fields = form::serialize(record, FormMode::Edit);
        fields.retain(|name| name != form::ID && !form::CUSTOMER_FIELDS.contains(&name));
        EditAppointment { id, fields }
    }
}

impl BackendCommand for EditAppointment {
    type Reply = EditReply;

    fn path(&self) -> Vec<String> {
        appointment_path("edit", &self.id)
    }

    fn form(&self) -> FormFields {
        self.fields.clone()
    }
}

/// `POST /schedule`: a new appointment including customer identification.
#[derive(Debug, Clone)]
pub struct CreateAppointment {
    pub fields: FormFields,
}

impl CreateAppointment {
    pub fn new(record: &AppointmentRecord) -> Self {
        CreateAppointment {
            fields: form::serialize(record, FormMode::Create),
        }
    }
}

impl BackendCommand for CreateAppointment {
    type Reply = CreateReply;

    fn path(&self) -> Vec<String> {
        vec!["schedule".to_string()]
    }

    fn form(&self) -> FormFields {
        self.fields.clone()
    }
}

/// `POST /appointment/delete/{id}`.
#[derive(Debug, Clone)]
pub struct DeleteAppointment {
    pub id: AppointmentId,
}

impl DeleteAppointment {
    pub fn new(id: AppointmentId) -> Self {
        DeleteAppointment { id }
    }
}

impl BackendCommand for DeleteAppointment {
    type Reply = Ack;

    fn path(&self) -> Vec<String> {
        appointment_path("delete", &self.id)
    }
}
