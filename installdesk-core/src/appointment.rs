//! The canonical appointment record.
//!
//! `AppointmentRecord` is the single source of truth for an appointment.
//! Form fields and calendar view events are projections of it (see
//! [`crate::form`] and [`crate::view`]).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::time_range::TimeRange;

/// Backend-assigned appointment identifier.
///
/// Backends send either numbers or strings; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AppointmentId(String);

impl AppointmentId {
    pub fn new(id: impl Into<String>) -> Self {
        AppointmentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for AppointmentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => AppointmentId(s),
            RawId::Number(n) => AppointmentId(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub year: String,
    pub make: String,
    pub model: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationJob {
    pub details: String,
    pub price: String,
}

/// Informational only; prices are never used for billing here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: String,
}

/// Everything about an appointment except its id and time range.
///
/// This is the payload a calendar view event carries in its metadata bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    pub customer: Customer,
    pub vehicle: Vehicle,
    pub installation_type: String,
    pub notes: String,
    /// Display order only.
    pub installation_jobs: Vec<InstallationJob>,
    /// Display order only.
    pub products: Vec<Product>,
}

impl AppointmentDetails {
    /// `"{first name} {make} {model}"`, the calendar title.
    pub fn title(&self) -> String {
        format!(
            "{} {} {}",
            self.customer.first_name, self.vehicle.make, self.vehicle.model
        )
    }
}

/// A scheduled appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    /// `None` until the backend has assigned one (fresh create forms).
    pub id: Option<AppointmentId>,
    pub time: TimeRange,
    #[serde(flatten)]
    pub details: AppointmentDetails,
}

impl AppointmentRecord {
    pub fn new(id: Option<AppointmentId>, time: TimeRange, details: AppointmentDetails) -> Self {
        AppointmentRecord { id, time, details }
    }

    pub fn title(&self) -> String {
        self.details.title()
    }

    /// A move or resize only ever touches the time range.
    pub fn with_time(&self, time: TimeRange) -> Self {
        AppointmentRecord {
            time,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_accepts_numbers_and_strings() {
        let numeric: AppointmentId = serde_json::from_str("42").unwrap();
        let text: AppointmentId = serde_json::from_str("\"a-7\"").unwrap();
        assert_eq!(numeric.as_str(), "42");
        assert_eq!(text.as_str(), "a-7");
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "\"42\"");
    }

    #[test]
    fn title_uses_first_name_make_and_model() {
        let details = AppointmentDetails {
            customer: Customer {
                first_name: "Dana".into(),
                last_name: "Whitlock".into(),
                phone: "555-0101".into(),
            },
            vehicle: Vehicle {
                year: "2019".into(),
                make: "Honda".into(),
                model: "Civic".into(),
            },
            ..Default::default()
        };
        assert_eq!(details.title(), "Dana Honda Civic");
    }
}
