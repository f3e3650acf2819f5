use anyhow::Result;
use owo_colors::OwoColorize;

use super::find_record;
use crate::Desk;
use crate::render::Render;

/// Print the read-only projection of one appointment, as the view dialog
/// shows it.
pub fn run(desk: &Desk, id: &str) -> Result<()> {
    let record = find_record(desk, id)?;
    let session = desk.open_view(&record);
    let form = session.form()?;

    println!("{}", record.render());
    if !form.jobs.is_empty() || !form.products.is_empty() {
        let rows = form.jobs.len() + form.products.len();
        println!(
            "   {}",
            format!("{rows} line {}", if rows == 1 { "item" } else { "items" }).dimmed()
        );
    }

    Ok(())
}
