//! The calendar surface the coordinator drives.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::appointment::AppointmentId;
use crate::error::{ScheduleError, ScheduleResult};
use crate::time_range::TimeRange;
use crate::view::ViewEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarViewKind {
    #[default]
    Month,
    Week,
    Day,
}

impl fmt::Display for CalendarViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarViewKind::Month => write!(f, "month"),
            CalendarViewKind::Week => write!(f, "week"),
            CalendarViewKind::Day => write!(f, "day"),
        }
    }
}

/// Commands the core issues to whatever renders the calendar.
pub trait CalendarSurface {
    fn add_event(&mut self, event: ViewEvent);

    /// Remove the event with `id`, returning it if it was displayed.
    fn remove_event(&mut self, id: &AppointmentId) -> Option<ViewEvent>;

    fn change_view(&mut self, kind: CalendarViewKind, focus: NaiveDateTime);

    fn view_kind(&self) -> CalendarViewKind;

    /// Discard everything displayed and show `events` instead.
    fn reset_events(&mut self, events: Vec<ViewEvent>);
}

/// In-memory projection of what the calendar displays.
#[derive(Debug, Clone, Default)]
pub struct LocalCalendar {
    events: Vec<ViewEvent>,
    view: CalendarViewKind,
    focus: Option<NaiveDateTime>,
}

impl LocalCalendar {
    pub fn new() -> Self {
        LocalCalendar::default()
    }

    pub fn with_events(events: Vec<ViewEvent>) -> Self {
        LocalCalendar {
            events,
            ..LocalCalendar::default()
        }
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    pub fn get(&self, id: &AppointmentId) -> Option<&ViewEvent> {
        self.events.iter().find(|e| &e.id == id)
    }

    pub fn focus(&self) -> Option<NaiveDateTime> {
        self.focus
    }

    /// Events starting on `date`, earliest first.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&ViewEvent> {
        let mut events: Vec<_> = self
            .events
            .iter()
            .filter(|e| e.start.date() == date)
            .collect();
        events.sort_by_key(|e| e.start);
        events
    }

    /// All events, earliest first.
    pub fn sorted_events(&self) -> Vec<&ViewEvent> {
        let mut events: Vec<_> = self.events.iter().collect();
        events.sort_by_key(|e| e.start);
        events
    }

    /// What the widget does on drag or resize: rewrite the displayed range in
    /// place before anyone has confirmed anything.
    pub fn apply_local_change(
        &mut self,
        id: &AppointmentId,
        range: TimeRange,
    ) -> ScheduleResult<ViewEvent> {
        let event = self
            .events
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| ScheduleError::NotFound(id.clone()))?;

        event.start = range.start();
        event.end = Some(range.end());
        Ok(event.clone())
    }
}

impl CalendarSurface for LocalCalendar {
    fn add_event(&mut self, event: ViewEvent) {
        self.events.push(event);
    }

    fn remove_event(&mut self, id: &AppointmentId) -> Option<ViewEvent> {
        let position = self.events.iter().position(|e| &e.id == id)?;
        Some(self.events.remove(position))
    }

    fn change_view(&mut self, kind: CalendarViewKind, focus: NaiveDateTime) {
        self.view = kind;
        self.focus = Some(focus);
    }

    fn view_kind(&self) -> CalendarViewKind {
        self.view
    }

    fn reset_events(&mut self, events: Vec<ViewEvent>) {
        self.events = events;
    }
}
