use anyhow::{Context, Result};
use chrono::NaiveDate;
use installdesk_core::SchedulerConfig;
use owo_colors::OwoColorize;

use crate::Desk;
use crate::render::{Render, render_day};

pub fn run(desk: &Desk, config: &SchedulerConfig, day: Option<&str>, json: bool) -> Result<()> {
    let calendar = desk.surface();

    if json {
        let events = match day {
            Some(day) => calendar.events_on(parse_day(day)?),
            None => calendar.sorted_events(),
        };
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if let Some(day) = day {
        println!("{}", render_day(calendar, parse_day(day)?, config));
        return Ok(());
    }

    let events = calendar.sorted_events();
    if events.is_empty() {
        println!("{}", "No appointments found".dimmed());
        return Ok(());
    }

    // Group by day
    let mut current_date: Option<NaiveDate> = None;
    for event in events {
        let date = event.start.date();
        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date.format("%a %b %-d").to_string().bold());
            current_date = Some(date);
        }
        println!("  {}", event.render());
    }

    Ok(())
}

fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{input}' (expected YYYY-MM-DD)"))
}
