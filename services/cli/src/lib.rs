mod cli;
mod demo;
mod infra;
mod schedule;

use vetlog::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
