//! The metadata bag a calendar view event carries.
//!
//! Keys follow the backend's event list payload, so a listed event and a
//! locally rebuilt one have the same shape.

use serde::{Deserialize, Deserializer, Serialize};

use crate::appointment::{AppointmentDetails, Customer, InstallationJob, Product, Vehicle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventProps {
    #[serde(deserialize_with = "lenient_string")]
    pub customer_first_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub customer_last_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub customer_phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub vehicle_year: String,
    #[serde(deserialize_with = "lenient_string")]
    pub vehicle_make: String,
    #[serde(deserialize_with = "lenient_string")]
    pub vehicle_model: String,
    #[serde(deserialize_with = "lenient_string")]
    pub installation_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
    /// Hours; lets an edit dialog be pre-filled from a listed event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(deserialize_with = "lenient_list")]
    pub installation_jobs: Vec<JobProps>,
    #[serde(deserialize_with = "lenient_list")]
    pub products: Vec<ProductProps>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobProps {
    #[serde(deserialize_with = "lenient_string")]
    pub job_details: String,
    #[serde(deserialize_with = "lenient_string")]
    pub price: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductProps {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub price: String,
}

impl From<&AppointmentDetails> for EventProps {
    fn from(details: &AppointmentDetails) -> Self {
        EventProps {
            customer_first_name: details.customer.first_name.clone(),
            customer_last_name: details.customer.last_name.clone(),
            customer_phone: details.customer.phone.clone(),
            vehicle_year: details.vehicle.year.clone(),
            vehicle_make: details.vehicle.make.clone(),
            vehicle_model: details.vehicle.model.clone(),
            installation_type: details.installation_type.clone(),
            notes: details.notes.clone(),
            duration: None,
            installation_jobs: details
                .installation_jobs
                .iter()
                .map(|job| JobProps {
                    job_details: job.details.clone(),
                    price: job.price.clone(),
                })
                .collect(),
            products: details
                .products
                .iter()
                .map(|product| ProductProps {
                    name: product.name.clone(),
                    price: product.price.clone(),
                })
                .collect(),
        }
    }
}

impl From<&EventProps> for AppointmentDetails {
    fn from(props: &EventProps) -> Self {
        AppointmentDetails {
            customer: Customer {
                first_name: props.customer_first_name.clone(),
                last_name: props.customer_last_name.clone(),
                phone: props.customer_phone.clone(),
            },
            vehicle: Vehicle {
                year: props.vehicle_year.clone(),
                make: props.vehicle_make.clone(),
                model: props.vehicle_model.clone(),
            },
            installation_type: props.installation_type.clone(),
            notes: props.notes.clone(),
            installation_jobs: props
                .installation_jobs
                .iter()
                .map(|job| InstallationJob {
                    details: job.job_details.clone(),
                    price: job.price.clone(),
                })
                .collect(),
            products: props
                .products
                .iter()
                .map(|product| Product {
                    name: product.name.clone(),
                    price: product.price.clone(),
                })
                .collect(),
        }
    }
}

/// Strings, numbers and null all land as text (`null` -> "").
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerates_backend_nulls_and_numbers() {
        let props: EventProps = serde_json::from_str(
            r#"{
                "customer_first_name": "Dana",
                "vehicle_year": 2019,
                "notes": null,
                "installation_jobs": null,
                "products": [{"name": "Speaker", "price": 50.0}]
            }"#,
        )
        .unwrap();

        assert_eq!(props.vehicle_year, "2019");
        assert_eq!(props.notes, "");
        assert_eq!(props.customer_last_name, "");
        assert!(props.installation_jobs.is_empty());
        assert_eq!(props.products[0].price, "50.0");
    }
}
