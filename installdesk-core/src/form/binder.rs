//! Record <-> flat field conversion.

use crate::appointment::{
    AppointmentDetails, AppointmentId, AppointmentRecord, Customer, InstallationJob, Product,
    Vehicle,
};
use crate::error::{ScheduleError, ScheduleResult};
use crate::form::{self, AppointmentForm, FormFields, FormMode, RepeatedGroup};
use crate::time_range::{TimeRange, parse_local_datetime};

/// Project a record onto the flat fields of a `mode` dialog.
pub fn serialize(record: &AppointmentRecord, mode: FormMode) -> FormFields {
    AppointmentForm::from_record(record, mode).to_fields()
}

/// Read a submitted dialog back into a record.
///
/// View forms are read-only and are refused. Missing text fields become empty
/// strings; a missing duration gives a zero-length range. `start_time` is
/// required.
pub fn deserialize(fields: &FormFields, mode: FormMode) -> ScheduleResult<AppointmentRecord> {
    if mode.is_read_only() {
        return Err(ScheduleError::ReadOnlyForm);
    }

    let installation_jobs = read_group(fields, RepeatedGroup::InstallationJobs, mode)?
        .into_iter()
        .map(|(details, price)| InstallationJob { details, price })
        .collect();
    let products = read_group(fields, RepeatedGroup::Products, mode)?
        .into_iter()
        .map(|(name, price)| Product { name, price })
        .collect();

    let time = read_time(fields)?;

    let id = match mode {
        FormMode::Edit => fields
            .get(form::ID)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(AppointmentId::new),
        _ => None,
    };

    let text = |name: &str| fields.get(name).unwrap_or_default().to_string();

    let details = AppointmentDetails {
        customer: Customer {
            first_name: text(form::CUSTOMER_FIRST_NAME),
            last_name: text(form::CUSTOMER_LAST_NAME),
            phone: text(form::CUSTOMER_PHONE),
        },
        vehicle: Vehicle {
            year: text(form::VEHICLE_YEAR),
            make: text(form::VEHICLE_MAKE),
            model: text(form::VEHICLE_MODEL),
        },
        installation_type: text(form::INSTALLATION_TYPE),
        notes: text(form::NOTES),
        installation_jobs,
        products,
    };

    Ok(AppointmentRecord::new(id, time, details))
}

fn read_time(fields: &FormFields) -> ScheduleResult<TimeRange> {
    let raw_start = fields.get(form::START_TIME).unwrap_or_default();
    let start = parse_local_datetime(raw_start)
        .ok_or_else(|| ScheduleError::invalid_field(form::START_TIME, raw_start))?;

    let raw_duration = fields.get(form::DURATION).unwrap_or_default().trim();
    if raw_duration.is_empty() {
        return Ok(TimeRange::instant(start));
    }

    let hours: f64 = raw_duration
        .parse()
        .map_err(|_| ScheduleError::invalid_field(form::DURATION, raw_duration))?;
    TimeRange::from_duration_hours(start, hours)
}

/// Zip a group's parallel arrays into rows, refusing mismatched lengths.
pub(super) fn read_group(
    fields: &FormFields,
    group: RepeatedGroup,
    mode: FormMode,
) -> ScheduleResult<Vec<(String, String)>> {
    let (entry_name, price_name) = group.field_names(mode);
    let entries = fields.get_all(&entry_name);
    let prices = fields.get_all(&price_name);

    if entries.len() != prices.len() {
        return Err(ScheduleError::MalformedRepeatedGroup {
            group,
            left: entries.len(),
            right: prices.len(),
        });
    }

    Ok(entries
        .into_iter()
        .zip(prices)
        .map(|(entry, price)| (entry.to_string(), price.to_string()))
        .collect())
}
