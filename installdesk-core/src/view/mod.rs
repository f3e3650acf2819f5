//! Projection between appointment records and calendar view events.
//!
//! The calendar surface only understands a time range, a title and an opaque
//! metadata bag. These functions are pure: a view event is always rebuilt
//! from a record, never treated as the record itself.

mod props;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::appointment::{AppointmentDetails, AppointmentId, AppointmentRecord};
use crate::error::{ScheduleError, ScheduleResult};
use crate::time_range::{TimeRange, local_iso, local_iso_opt};

pub use props::{EventProps, JobProps, ProductProps};

/// Installation type shown in the default color.
const STANDARD_INSTALLATION: &str = "standard";
const STANDARD_COLOR: &str = "blue";
const OTHER_COLOR: &str = "orange";

/// An event as the calendar surface displays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEvent {
    pub id: AppointmentId,
    #[serde(default)]
    pub title: String,
    #[serde(with = "local_iso")]
    pub start: NaiveDateTime,
    #[serde(default, with = "local_iso_opt", skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "extendedProps", default)]
    pub extended_props: EventProps,
}

impl ViewEvent {
    /// The displayed range; a missing end collapses to the start.
    pub fn time_range(&self) -> ScheduleResult<TimeRange> {
        from_view_event(self)
    }
}

pub fn title_for(details: &AppointmentDetails) -> String {
    details.title()
}

pub fn color_for(installation_type: &str) -> &'static str {
    if installation_type.eq_ignore_ascii_case(STANDARD_INSTALLATION) {
        STANDARD_COLOR
    } else {
        OTHER_COLOR
    }
}

/// Project a committed record onto a view event.
pub fn to_view_event(record: &AppointmentRecord) -> ScheduleResult<ViewEvent> {
    let id = record.id.clone().ok_or(ScheduleError::UnassignedId)?;

    let mut extended_props = EventProps::from(&record.details);
    extended_props.duration = Some(record.time.duration_hours());

    Ok(ViewEvent {
        id,
        title: title_for(&record.details),
        start: record.time.start(),
        end: Some(record.time.end()),
        color: Some(color_for(&record.details.installation_type).to_string()),
        extended_props,
    })
}

/// The only thing the widget reliably reports back: the time range.
pub fn from_view_event(event: &ViewEvent) -> ScheduleResult<TimeRange> {
    TimeRange::with_optional_end(event.start, event.end)
}

/// Rebuild the full record from the metadata bag and time range.
pub fn record_from_view_event(event: &ViewEvent) -> ScheduleResult<AppointmentRecord> {
    Ok(AppointmentRecord::new(
        Some(event.id.clone()),
        from_view_event(event)?,
        AppointmentDetails::from(&event.extended_props),
    ))
}

/// View event for an edit expressed as start + duration hours.
pub fn event_for_duration(
    id: AppointmentId,
    start: NaiveDateTime,
    hours: f64,
    details: AppointmentDetails,
) -> ScheduleResult<ViewEvent> {
    let time = TimeRange::from_duration_hours(start, hours)?;
    to_view_event(&AppointmentRecord::new(Some(id), time, details))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::{Customer, InstallationJob, Product, Vehicle};
    use crate::time_range::parse_local_datetime;

    fn at(s: &str) -> NaiveDateTime {
        parse_local_datetime(s).unwrap()
    }

    fn details(jobs: usize) -> AppointmentDetails {
        AppointmentDetails {
            customer: Customer {
                first_name: "Ravi".into(),
                last_name: "Okafor".into(),
                phone: "555-0199".into(),
            },
            vehicle: Vehicle {
                year: "2021".into(),
                make: "Ford".into(),
                model: "F-150".into(),
            },
            installation_type: "custom".into(),
            notes: "Bring own head unit".into(),
            installation_jobs: (0..jobs)
                .map(|i| InstallationJob {
                    details: format!("Job {i}"),
                    price: "75".into(),
                })
                .collect(),
            products: vec![
                Product {
                    name: "Head unit".into(),
                    price: "".into(),
                },
                Product {
                    name: "Speaker".into(),
                    price: "50".into(),
                },
            ],
        }
    }

    #[test]
    fn metadata_bag_restores_every_non_time_field() {
        for jobs in [0, 1, 3] {
            let record = AppointmentRecord::new(
                Some(AppointmentId::new("9")),
                TimeRange::new(at("2024-05-01T09:00"), at("2024-05-01T12:30")).unwrap(),
                details(jobs),
            );

            let event = to_view_event(&record).unwrap();
            let restored = record_from_view_event(&event).unwrap();
            assert_eq!(restored, record);
        }
    }

    #[test]
    fn title_and_color_are_derived() {
        let record = AppointmentRecord::new(
            Some(AppointmentId::new("9")),
            TimeRange::instant(at("2024-05-01T09:00")),
            details(0),
        );
        let event = to_view_event(&record).unwrap();
        assert_eq!(event.title, "Ravi Ford F-150");
        assert_eq!(event.color.as_deref(), Some("orange"));
        assert_eq!(color_for("Standard"), "blue");
    }

    #[test]
    fn missing_end_defaults_to_start() {
        let event: ViewEvent = serde_json::from_str(
            r#"{"id": 3, "title": "x", "start": "2024-05-01T09:00:00"}"#,
        )
        .unwrap();
        let range = from_view_event(&event).unwrap();
        assert_eq!(range.start(), range.end());
        assert_eq!(event.extended_props, EventProps::default());
    }

    #[test]
    fn duration_edit_builds_end_from_hours() {
        let event =
            event_for_duration(AppointmentId::new("4"), at("2024-05-01T09:00"), 2.0, details(1))
                .unwrap();
        assert_eq!(event.end, Some(at("2024-05-01T11:00")));
        assert_eq!(event.extended_props.duration, Some(2.0));
    }

    #[test]
    fn unassigned_records_cannot_be_displayed() {
        let record = AppointmentRecord::new(
            None,
            TimeRange::instant(at("2024-05-01T09:00")),
            details(0),
        );
        assert!(matches!(
            to_view_event(&record),
            Err(ScheduleError::UnassignedId)
        ));
    }

    #[test]
    fn serializes_in_widget_shape() {
        let record = AppointmentRecord::new(
            Some(AppointmentId::new("9")),
            TimeRange::new(at("2024-05-01T09:00"), at("2024-05-01T10:00")).unwrap(),
            details(0),
        );
        let json = serde_json::to_value(to_view_event(&record).unwrap()).unwrap();
        assert_eq!(json["start"], "2024-05-01T09:00:00");
        assert_eq!(json["end"], "2024-05-01T10:00:00");
        assert_eq!(json["extendedProps"]["products"][1]["name"], "Speaker");
    }
}
