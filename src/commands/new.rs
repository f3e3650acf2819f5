use anyhow::{Result, bail};
use dialoguer::Input;
use owo_colors::OwoColorize;

use super::{apply_customer, apply_details, parse_datetime};
use crate::render::Render;
use crate::utils::tui;
use crate::{CustomerArgs, DetailArgs, Desk};

pub async fn run(
    desk: &mut Desk,
    start: Option<String>,
    duration: Option<String>,
    customer: CustomerArgs,
    details: DetailArgs,
) -> Result<()> {
    let interactive = start.is_none();

    let start = match start {
        Some(s) => parse_datetime(&s)?,
        None => {
            let input: String = Input::new().with_prompt("  When?").interact_text()?;
            parse_datetime(&input)?
        }
    };

    let duration = match duration {
        Some(d) => d,
        None if interactive => Input::new()
            .with_prompt("  How many hours?")
            .default("1".to_string())
            .interact_text()?,
        None => "1".to_string(),
    };

    let mut session = desk.open_create(start);
    let mut form = session.form()?;
    form.duration = duration;
    apply_customer(&mut form, customer);
    apply_details(&mut form, details);

    if form.customer_first_name.is_empty() && interactive {
        form.customer_first_name = Input::new().with_prompt("  Customer").interact_text()?;
    }
    session.set_form(&form);

    let spinner = tui::create_spinner("Booking appointment".to_string());
    let result = desk.submit(&mut session).await;
    spinner.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("{}", e.render());
            bail!("Appointment was not booked");
        }
    };

    desk.close(session).await?;

    let id = outcome
        .record
        .id
        .as_ref()
        .map(|id| format!(" #{id}"))
        .unwrap_or_default();
    println!("{}{}", "Booked".green(), id.dimmed());
    println!("{}", outcome.record.render());

    Ok(())
}
