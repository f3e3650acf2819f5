use anyhow::{Context, Result, bail};
use installdesk_core::coordinator::MoveKind;
use installdesk_core::{AppointmentId, TimeRange};
use owo_colors::OwoColorize;

use super::parse_datetime;
use crate::Desk;
use crate::render::Render;
use crate::utils::tui;

/// Do what a drag (new start) or a resize (new end) does on the calendar:
/// draw it locally, then ask before sending it.
pub async fn run(
    desk: &mut Desk,
    id: &str,
    start: Option<&str>,
    end: Option<&str>,
    yes: bool,
) -> Result<()> {
    let id = AppointmentId::new(id);
    let event = desk
        .surface()
        .get(&id)
        .cloned()
        .with_context(|| format!("Appointment '{id}' not found"))?;
    let current = event.time_range()?;

    let (kind, range) = match (start, end) {
        (Some(start), None) => (MoveKind::Drop, current.shifted_to(parse_datetime(start)?)),
        (Some(start), Some(end)) => (
            MoveKind::Drop,
            TimeRange::new(parse_datetime(start)?, parse_datetime(end)?)?,
        ),
        (None, Some(end)) => (
            MoveKind::Resize,
            TimeRange::new(current.start(), parse_datetime(end)?)?,
        ),
        (None, None) => bail!("Nothing to change: pass --start and/or --end"),
    };

    let drawn = desk.surface_mut().apply_local_change(&id, range)?;
    desk.begin_move(&drawn, kind).await?;

    println!("{}", drawn.render());
    let prompt = format!(
        "Confirm {kind} of {} to {} {}?",
        event.title,
        range.start().format("%a %b %-d %H:%M"),
        format!("({} h)", range.format_duration_hours()).dimmed()
    );

    if !tui::confirm(prompt, yes)? {
        desk.cancel_move().await?;
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    let spinner = tui::create_spinner(format!("Saving {kind}"));
    let result = desk.confirm_move().await;
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            println!("{} {}", "Saved".green(), format!("#{}", outcome.id).dimmed());
            Ok(())
        }
        Err(e) => {
            println!("{}", e.render());
            bail!("Appointment {id} was not moved");
        }
    }
}
