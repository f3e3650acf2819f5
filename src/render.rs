//! TUI rendering traits for installdesk types.
//!
//! Extension traits that add colored terminal rendering to installdesk-core
//! types using owo_colors.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use installdesk_core::appointment::AppointmentRecord;
use installdesk_core::{LocalCalendar, ScheduleError, SchedulerConfig, ViewEvent};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

fn time_span(start: &NaiveDateTime, end: Option<&NaiveDateTime>) -> String {
    let end = end.unwrap_or(start);
    format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
}

impl Render for ViewEvent {
    fn render(&self) -> String {
        let title = match self.color.as_deref() {
            Some("blue") => self.title.blue().to_string(),
            Some(_) => self.title.yellow().to_string(),
            None => self.title.clone(),
        };
        let tag = format!("#{}", self.id);

        format!(
            "{} {} {}",
            time_span(&self.start, self.end.as_ref()),
            title,
            tag.dimmed()
        )
    }
}

impl Render for AppointmentRecord {
    fn render(&self) -> String {
        let details = &self.details;
        let mut lines = vec![
            self.title().bold().to_string(),
            format!(
                "   {} {} ({} h)",
                self.time.start().format("%a %b %-d"),
                time_span(&self.time.start(), Some(&self.time.end())),
                self.time.format_duration_hours()
            ),
            format!(
                "   Customer: {} {}  {}",
                details.customer.first_name,
                details.customer.last_name,
                details.customer.phone.dimmed()
            ),
            format!(
                "   Vehicle:  {} {} {}",
                details.vehicle.year, details.vehicle.make, details.vehicle.model
            ),
        ];

        if !details.installation_type.is_empty() {
            lines.push(format!("   Type:     {}", details.installation_type));
        }
        if !details.notes.is_empty() {
            lines.push(format!("   Notes:    {}", details.notes.dimmed()));
        }

        if !details.installation_jobs.is_empty() {
            lines.push("   Installation jobs:".to_string());
            for job in &details.installation_jobs {
                lines.push(format!("      {} {}", job.details, price(&job.price)));
            }
        }
        if !details.products.is_empty() {
            lines.push("   Products:".to_string());
            for product in &details.products {
                lines.push(format!("      {} {}", product.name, price(&product.price)));
            }
        }

        lines.join("\n")
    }
}

impl Render for ScheduleError {
    fn render(&self) -> String {
        match self {
            ScheduleError::BackendRejected(message) => {
                format!("{} {}", "Rejected:".red().bold(), message.red())
            }
            ScheduleError::TransportFailure(_) => format!(
                "{}\n   {}",
                "There was an error processing your request.".red(),
                self.to_string().dimmed()
            ),
            other => other.to_string().red().to_string(),
        }
    }
}

fn price(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("${value}").dimmed().to_string()
    }
}

/// Day grid between the configured slot bounds. Each row lists the events
/// running during that slot.
pub fn render_day(calendar: &LocalCalendar, date: NaiveDate, config: &SchedulerConfig) -> String {
    let events = calendar.events_on(date);
    let step = Duration::minutes(i64::from(config.slot_duration_minutes));
    let last = date.and_time(config.slot_max_time);

    let mut lines = vec![date.format("%A %B %-d").to_string().bold().to_string()];
    let mut slot = date.and_time(config.slot_min_time);

    while slot < last {
        let slot_end = slot + step;
        let running: Vec<String> = events
            .iter()
            .filter(|e| e.start == slot || (e.start < slot_end && e.end.unwrap_or(e.start) > slot))
            .map(|e| e.render())
            .collect();

        let label = slot.format("%H:%M").to_string();
        if running.is_empty() {
            lines.push(format!("  {}", label.dimmed()));
        } else {
            lines.push(format!("  {}  {}", label, running.join(", ")));
        }
        slot = slot_end;
    }

    let outside: Vec<_> = events
        .iter()
        .filter(|e| e.start.time() < config.slot_min_time || e.start.time() >= config.slot_max_time)
        .collect();
    if !outside.is_empty() {
        lines.push(String::new());
        lines.push("  Outside business hours:".dimmed().to_string());
        for event in outside {
            lines.push(format!("  {}", event.render()));
        }
    }

    lines.join("\n")
}
