//! Appointment scheduling core for installdesk.
//!
//! Holds the appointment model, the binding between flat dialog forms and
//! records, the projection onto calendar view events and the coordinator
//! that applies optimistic changes and reconciles them with the backend.

pub mod appointment;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod form;
pub mod reconcile;
pub mod surface;
pub mod sync;
pub mod time_range;
pub mod view;

pub use appointment::{AppointmentDetails, AppointmentId, AppointmentRecord};
pub use config::SchedulerConfig;
pub use coordinator::MutationCoordinator;
pub use error::{ScheduleError, ScheduleResult};
pub use surface::{CalendarSurface, CalendarViewKind, LocalCalendar};
pub use sync::{HttpSyncClient, SyncClient};
pub use time_range::TimeRange;
pub use view::ViewEvent;
