mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use installdesk_core::{HttpSyncClient, LocalCalendar, MutationCoordinator, SchedulerConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::utils::tui;

/// The coordinator as the CLI runs it: HTTP backend, in-memory calendar.
pub type Desk = MutationCoordinator<HttpSyncClient, LocalCalendar>;

#[derive(Parser)]
#[command(name = "installdesk")]
#[command(about = "Schedule and manage car audio installation appointments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List appointments
    List {
        /// Show the day grid for this date (YYYY-MM-DD)
        #[arg(short, long)]
        day: Option<String>,

        /// Print the events as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one appointment
    Show { id: String },
    /// Book a new appointment
    New {
        /// Start date/time (e.g. "2024-05-01T09:00")
        #[arg(short, long)]
        start: Option<String>,

        /// Length in hours
        #[arg(short, long)]
        duration: Option<String>,

        #[command(flatten)]
        customer: CustomerArgs,

        #[command(flatten)]
        details: DetailArgs,
    },
    /// Change an appointment's details (the customer is fixed once booked)
    Edit {
        id: String,

        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        duration: Option<String>,

        #[command(flatten)]
        details: DetailArgs,

        /// Drop the existing installation jobs before adding --job entries
        #[arg(long)]
        clear_jobs: bool,

        /// Drop the existing products before adding --product entries
        #[arg(long)]
        clear_products: bool,
    },
    /// Reschedule an appointment (drag), or change its end (resize)
    Move {
        id: String,

        /// New start; the length is kept unless --end is given
        #[arg(short, long)]
        start: Option<String>,

        /// New end
        #[arg(short, long)]
        end: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete an appointment
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Customer identification; only a new booking takes it.
#[derive(Args, Debug, Default)]
pub struct CustomerArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

/// Appointment fields shared by `new` and `edit`.
#[derive(Args, Debug, Default)]
pub struct DetailArgs {
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub make: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    /// e.g. "standard" or "custom"
    #[arg(long = "type")]
    pub installation_type: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,

    /// Installation job as DETAILS=PRICE (repeatable)
    #[arg(long = "job")]
    pub jobs: Vec<String>,

    /// Product as NAME=PRICE (repeatable)
    #[arg(long = "product")]
    pub products: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = SchedulerConfig::load()?;
    let mut desk = connect(&config).await?;

    match cli.command {
        Commands::List { day, json } => commands::list::run(&desk, &config, day.as_deref(), json),
        Commands::Show { id } => commands::show::run(&desk, &id),
        Commands::New {
            start,
            duration,
            customer,
            details,
        } => commands::new::run(&mut desk, start, duration, customer, details).await,
        Commands::Edit {
            id,
            start,
            duration,
            details,
            clear_jobs,
            clear_products,
        } => {
            let edit = commands::edit::EditArgs {
                start,
                duration,
                details,
                clear_jobs,
                clear_products,
            };
            commands::edit::run(&mut desk, &id, edit).await
        }
        Commands::Move { id, start, end, yes } => {
            commands::moves::run(&mut desk, &id, start.as_deref(), end.as_deref(), yes).await
        }
        Commands::Delete { id, yes } => commands::delete::run(&mut desk, &id, yes).await,
    }
}

/// Log to stderr, filtered by INSTALLDESK_LOG (default: warn).
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("INSTALLDESK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the coordinator and load the current schedule.
async fn connect(config: &SchedulerConfig) -> Result<Desk> {
    let client = HttpSyncClient::from_config(config)?;
    debug!(backend = %client.base_url(), policy = ?config.policy(), "connecting");
    let mut desk = MutationCoordinator::new(client, LocalCalendar::new(), config.policy());

    let spinner = tui::create_spinner(format!("Loading appointments from {}", config.backend_url));
    let result = desk.load().await;
    spinner.finish_and_clear();
    result?;

    Ok(desk)
}
