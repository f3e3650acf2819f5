use anyhow::{Result, bail};
use installdesk_core::time_range::format_local_iso;
use owo_colors::OwoColorize;

use super::{apply_details, find_record, parse_datetime};
use crate::render::Render;
use crate::utils::tui;
use crate::{DetailArgs, Desk};

pub struct EditArgs {
    pub start: Option<String>,
    pub duration: Option<String>,
    pub details: DetailArgs,
    pub clear_jobs: bool,
    pub clear_products: bool,
}

pub async fn run(desk: &mut Desk, id: &str, args: EditArgs) -> Result<()> {
    let record = find_record(desk, id)?;
    let mut session = desk.open_edit(&record);
    let mut form = session.form()?;

    if let Some(start) = args.start {
        form.start_time = format_local_iso(&parse_datetime(&start)?);
    }
    if let Some(duration) = args.duration {
        form.duration = duration;
    }
    if args.clear_jobs {
        form.jobs.clear();
    }
    if args.clear_products {
        form.products.clear();
    }
    apply_details(&mut form, args.details);
    session.set_form(&form);

    let spinner = tui::create_spinner(format!("Updating {}", record.title()));
    let result = desk.submit(&mut session).await;
    spinner.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("{}", e.render());
            bail!("Appointment {id} was not updated");
        }
    };

    println!("{}", "Updated".green());
    println!("{}", outcome.record.render());

    desk.close(session).await?;
    Ok(())
}
