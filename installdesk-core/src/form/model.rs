//! Typed model of an open appointment dialog.

use chrono::NaiveDateTime;

use crate::appointment::{AppointmentId, AppointmentRecord};
use crate::error::ScheduleResult;
use crate::form::{self, FormFields, FormMode, RepeatedGroup};
use crate::time_range::format_local_iso;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobRow {
    pub details: String,
    pub price: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRow {
    pub name: String,
    pub price: String,
}

/// Typed model of one open appointment dialog.
///
/// Values are kept as the operator typed them; parsing happens when the form
/// is deserialized into a record on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentForm {
    pub mode: FormMode,
    pub id: Option<AppointmentId>,
    pub start_time: String,
    pub duration: String,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_phone: String,
    pub vehicle_year: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub installation_type: String,
    pub notes: String,
    pub jobs: Vec<JobRow>,
    pub products: Vec<ProductRow>,
}

impl AppointmentForm {
    /// Empty form with only the start time seeded (from the clicked cell).
    pub fn blank(mode: FormMode, start: NaiveDateTime) -> Self {
        AppointmentForm {
            mode,
            id: None,
            start_time: format_local_iso(&start),
            duration: String::new(),
            customer_first_name: String::new(),
            customer_last_name: String::new(),
            customer_phone: String::new(),
            vehicle_year: String::new(),
            vehicle_make: String::new(),
            vehicle_model: String::new(),
            installation_type: String::new(),
            notes: String::new(),
            jobs: Vec::new(),
            products: Vec::new(),
        }
    }

    pub fn from_record(record: &AppointmentRecord, mode: FormMode) -> Self {
        let details = &record.details;
        AppointmentForm {
            mode,
            id: record.id.clone(),
            start_time: format_local_iso(&record.time.start()),
            duration: record.time.format_duration_hours(),
            customer_first_name: details.customer.first_name.clone(),
            customer_last_name: details.customer.last_name.clone(),
            customer_phone: details.customer.phone.clone(),
            vehicle_year: details.vehicle.year.clone(),
            vehicle_make: details.vehicle.make.clone(),
            vehicle_model: details.vehicle.model.clone(),
            installation_type: details.installation_type.clone(),
            notes: details.notes.clone(),
            jobs: details
                .installation_jobs
                .iter()
                .map(|job| JobRow {
                    details: job.details.clone(),
                    price: job.price.clone(),
                })
                .collect(),
            products: details
                .products
                .iter()
                .map(|product| ProductRow {
                    name: product.name.clone(),
                    price: product.price.clone(),
                })
                .collect(),
        }
    }

    /// Read a flat field list back into the typed model.
    ///
    /// Scalar text is taken verbatim (no parsing), but the repeated groups must
    /// still line up.
    pub fn from_fields(fields: &FormFields, mode: FormMode) -> ScheduleResult<Self> {
        let text = |name: &str| fields.get(name).unwrap_or_default().to_string();

        let jobs = form::binder::read_group(fields, RepeatedGroup::InstallationJobs, mode)?
            .into_iter()
            .map(|(details, price)| JobRow { details, price })
            .collect();
        let products = form::binder::read_group(fields, RepeatedGroup::Products, mode)?
            .into_iter()
            .map(|(name, price)| ProductRow { name, price })
            .collect();

        Ok(AppointmentForm {
            mode,
            id: fields
                .get(form::ID)
                .filter(|id| !id.trim().is_empty())
                .map(AppointmentId::new),
            start_time: text(form::START_TIME),
            duration: text(form::DURATION),
            customer_first_name: text(form::CUSTOMER_FIRST_NAME),
            customer_last_name: text(form::CUSTOMER_LAST_NAME),
            customer_phone: text(form::CUSTOMER_PHONE),
            vehicle_year: text(form::VEHICLE_YEAR),
            vehicle_make: text(form::VEHICLE_MAKE),
            vehicle_model: text(form::VEHICLE_MODEL),
            installation_type: text(form::INSTALLATION_TYPE),
            notes: text(form::NOTES),
            jobs,
            products,
        })
    }

    pub fn to_fields(&self) -> FormFields {
        let mut fields = FormFields::new();

        if let (FormMode::Edit, Some(id)) = (self.mode, &self.id) {
            fields.append(form::ID, id.as_str());
        }

        fields.append(form::START_TIME, &self.start_time);
        fields.append(form::DURATION, &self.duration);
        fields.append(form::CUSTOMER_FIRST_NAME, &self.customer_first_name);
        fields.append(form::CUSTOMER_LAST_NAME, &self.customer_last_name);
        fields.append(form::CUSTOMER_PHONE, &self.customer_phone);
        fields.append(form::VEHICLE_YEAR, &self.vehicle_year);
        fields.append(form::VEHICLE_MAKE, &self.vehicle_make);
        fields.append(form::VEHICLE_MODEL, &self.vehicle_model);
        fields.append(form::INSTALLATION_TYPE, &self.installation_type);
        fields.append(form::NOTES, &self.notes);

        for job in &self.jobs {
            fields.push_row(
                RepeatedGroup::InstallationJobs,
                self.mode,
                &job.details,
                &job.price,
            );
        }
        for product in &self.products {
            fields.push_row(RepeatedGroup::Products, self.mode, &product.name, &product.price);
        }

        fields
    }

    pub fn add_job(&mut self, details: impl Into<String>, price: impl Into<String>) {
        self.jobs.push(JobRow {
            details: details.into(),
            price: price.into(),
        });
    }

    pub fn remove_job(&mut self, index: usize) -> Option<JobRow> {
        (index < self.jobs.len()).then(|| self.jobs.remove(index))
    }

    pub fn add_product(&mut self, name: impl Into<String>, price: impl Into<String>) {
        self.products.push(ProductRow {
            name: name.into(),
            price: price.into(),
        });
    }

    pub fn remove_product(&mut self, index: usize) -> Option<ProductRow> {
        (index < self.products.len()).then(|| self.products.remove(index))
    }
}
