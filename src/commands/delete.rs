use anyhow::{Result, bail};
use installdesk_core::AppointmentId;
use owo_colors::OwoColorize;

use super::find_record;
use crate::Desk;
use crate::render::Render;
use crate::utils::tui;

pub async fn run(desk: &mut Desk, id: &str, yes: bool) -> Result<()> {
    let record = find_record(desk, id)?;
    println!("{}", record.render());
    println!();

    let mut session = desk.request_delete(AppointmentId::new(id));

    let prompt = format!("Delete {}?", record.title());
    if !tui::confirm(prompt, yes)? {
        desk.cancel_delete(&mut session)?;
        println!("{}", "Nothing deleted".dimmed());
        return Ok(());
    }

    let spinner = tui::create_spinner(format!("Deleting #{id}"));
    let result = desk.confirm_delete(&mut session).await;
    spinner.finish_and_clear();

    if let Err(e) = result {
        println!("{}", e.render());
        bail!("Appointment {id} was not deleted");
    }

    println!("{} {}", "Deleted".red(), record.title());
    Ok(())
}
