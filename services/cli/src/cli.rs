use crate::demo::{run_demo, DemoArgs};
use crate::schedule::{run_schedule, ScheduleArgs};
use clap::{Parser, Subcommand};
use tracing::debug;
use vetlog::config::AppConfig;
use vetlog::error::AppError;
use vetlog::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "vetlog",
    about = "Pet vaccination schedules and adoption workflow from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the vaccines due for a pet of the given species and birth date
    Schedule(ScheduleArgs),
    /// Walk through registration, vaccination scheduling and adoption against an in-memory store
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Schedule(args) => run_schedule(args),
        Command::Demo(args) => run_demo(args, &config),
    }
}
