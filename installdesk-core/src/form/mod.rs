//! Flat form binding for appointment dialogs.
//!
//! A dialog submits an ordered list of `(name, value)` pairs. Repeated
//! groups (installation jobs, products) travel as two parallel `[]` arrays
//! where index `i` of each array describes the same row. Field names of the
//! repeated groups carry a mode prefix so the view, edit and create dialogs
//! can coexist on one page.

mod binder;
mod fields;
mod model;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use binder::{deserialize, serialize};
pub use fields::FormFields;
pub use model::{AppointmentForm, JobRow, ProductRow};

pub const ID: &str = "id";
pub const START_TIME: &str = "start_time";
pub const END_TIME: &str = "end_time";
pub const DURATION: &str = "duration";
pub const CUSTOMER_FIRST_NAME: &str = "customer_first_name";
pub const CUSTOMER_LAST_NAME: &str = "customer_last_name";
pub const CUSTOMER_PHONE: &str = "customer_phone";
pub const VEHICLE_YEAR: &str = "vehicle_year";
pub const VEHICLE_MAKE: &str = "vehicle_make";
pub const VEHICLE_MODEL: &str = "vehicle_model";
pub const INSTALLATION_TYPE: &str = "installation_type";
pub const NOTES: &str = "notes";

pub const CUSTOMER_FIELDS: [&str; 3] = [CUSTOMER_FIRST_NAME, CUSTOMER_LAST_NAME, CUSTOMER_PHONE];

/// Which dialog a form belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    /// Read-only projection; never submitted.
    View,
    Edit,
    Create,
}

impl FormMode {
    pub fn prefix(self) -> &'static str {
        match self {
            FormMode::View => "view",
            FormMode::Edit => "edit",
            FormMode::Create => "create",
        }
    }

    pub fn is_read_only(self) -> bool {
        self == FormMode::View
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// A variable-length group of parallel form arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatedGroup {
    InstallationJobs,
    Products,
}

impl RepeatedGroup {
    /// Names of the two parallel arrays, e.g. `edit_product_name[]` and
    /// `edit_product_price[]`.
    pub fn field_names(self, mode: FormMode) -> (String, String) {
        let prefix = mode.prefix();
        match self {
            RepeatedGroup::InstallationJobs => (
                format!("{prefix}_installation_job[]"),
                format!("{prefix}_installation_price[]"),
            ),
            RepeatedGroup::Products => (
                format!("{prefix}_product_name[]"),
                format!("{prefix}_product_price[]"),
            ),
        }
    }
}

impl fmt::Display for RepeatedGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatedGroup::InstallationJobs => write!(f, "installation jobs"),
            RepeatedGroup::Products => write!(f, "products"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_field_names_carry_mode_prefix() {
        assert_eq!(
            RepeatedGroup::InstallationJobs.field_names(FormMode::Edit),
            (
                "edit_installation_job[]".to_string(),
                "edit_installation_price[]".to_string()
            )
        );
        assert_eq!(
            RepeatedGroup::Products.field_names(FormMode::Create),
            (
                "create_product_name[]".to_string(),
                "create_product_price[]".to_string()
            )
        );
    }
}
