//! Backend boundary.
//!
//! The coordinator only talks to the backend through [`SyncClient`]. Every
//! method issues exactly one request and reports failure once, with no
//! timeout and no retry.

mod http;
pub mod protocol;

use async_trait::async_trait;

use crate::error::ScheduleResult;
use crate::sync::protocol::{
    CreateAppointment, CreateReply, DeleteAppointment, EditAppointment, EditReply,
    MoveAppointment,
};
use crate::view::ViewEvent;

pub use http::HttpSyncClient;

#[async_trait]
pub trait SyncClient: Send + Sync {
    /// Authoritative event set, used for the initial load and every refetch.
    async fn list_events(&self) -> ScheduleResult<Vec<ViewEvent>>;

    async fn move_appointment(&self, request: MoveAppointment) -> ScheduleResult<()>;

    async fn edit_appointment(&self, request: EditAppointment) -> ScheduleResult<EditReply>;

    async fn create_appointment(&self, request: CreateAppointment) -> ScheduleResult<CreateReply>;

    async fn delete_appointment(&self, request: DeleteAppointment) -> ScheduleResult<()>;
}
