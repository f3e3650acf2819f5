pub mod delete;
pub mod edit;
pub mod list;
pub mod moves;
pub mod new;
pub mod show;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use installdesk_core::form::AppointmentForm;
use installdesk_core::time_range::parse_local_datetime;
use installdesk_core::view::record_from_view_event;
use installdesk_core::{AppointmentId, AppointmentRecord};

use crate::{CustomerArgs, DetailArgs, Desk};

/// The listed record for `id`.
pub fn find_record(desk: &Desk, id: &str) -> Result<AppointmentRecord> {
    let id = AppointmentId::new(id);
    let event = desk
        .surface()
        .get(&id)
        .with_context(|| format!("Appointment '{id}' not found"))?;
    Ok(record_from_view_event(event)?)
}

pub fn parse_datetime(input: &str) -> Result<NaiveDateTime> {
    parse_local_datetime(input).with_context(|| {
        format!("Invalid date/time '{input}' (expected YYYY-MM-DDTHH:MM[:SS] or YYYY-MM-DD)")
    })
}

/// Split "NAME=PRICE" at the last '='. A missing price is left empty.
fn split_row(input: &str) -> (String, String) {
    match input.rsplit_once('=') {
        Some((name, price)) => (name.trim().to_string(), price.trim().to_string()),
        None => (input.trim().to_string(), String::new()),
    }
}

/// Write each given value into its form field.
fn apply_overrides<const N: usize>(overrides: [(&mut String, Option<String>); N]) {
    for (field, value) in overrides {
        if let Some(value) = value {
            *field = value;
        }
    }
}

pub fn apply_customer(form: &mut AppointmentForm, customer: CustomerArgs) {
    let CustomerArgs {
        first_name,
        last_name,
        phone,
    } = customer;

    apply_overrides([
        (&mut form.customer_first_name, first_name),
        (&mut form.customer_last_name, last_name),
        (&mut form.customer_phone, phone),
    ]);
}

/// Copy the fields given on the command line onto the dialog.
pub fn apply_details(form: &mut AppointmentForm, details: DetailArgs) {
    let DetailArgs {
        year,
        make,
        model,
        installation_type,
        notes,
        jobs,
        products,
    } = details;

    apply_overrides([
        (&mut form.vehicle_year, year),
        (&mut form.vehicle_make, make),
        (&mut form.vehicle_model, model),
        (&mut form.installation_type, installation_type),
        (&mut form.notes, notes),
    ]);

    for job in &jobs {
        let (details, price) = split_row(job);
        form.add_job(details, price);
    }
    for product in &products {
        let (name, price) = split_row(product);
        form.add_product(name, price);
    }
}
