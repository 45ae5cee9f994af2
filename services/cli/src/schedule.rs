use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;
use serde::Serialize;
use vetlog::error::AppError;
use vetlog::workflows::pets::vaccination::{age_in_weeks, localized_vaccine_name};
use vetlog::workflows::pets::{parse_birth_date, Species, VaccinationStrategies};
use vetlog::workflows::{BusinessError, Clock, ServiceError, SystemClock};

use crate::infra::{at_noon, parse_date, parse_species};

#[derive(Args, Debug)]
pub(crate) struct ScheduleArgs {
    /// Pet species (dog, cat, bird, other)
    #[arg(long, value_parser = parse_species)]
    pub(crate) species: Species,
    /// Birth date (YYYY-MM-DD, optionally with THH:MM)
    #[arg(long)]
    pub(crate) birth_date: String,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Language for vaccine names (en, es)
    #[arg(long, default_value = "en")]
    pub(crate) lang: String,
    /// Print the schedule as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct ScheduleReport {
    species: Species,
    age_weeks: u32,
    stage: Option<String>,
    due_on: NaiveDate,
    vaccines: Vec<String>,
}

pub(crate) fn run_schedule(args: ScheduleArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| SystemClock.today());
    let report = schedule_report(
        &VaccinationStrategies::default(),
        args.species,
        &args.birth_date,
        at_noon(today),
        &args.lang,
    )?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    println!(
        "{} aged {} weeks on {}",
        report.species, report.age_weeks, report.due_on
    );
    match &report.stage {
        Some(stage) => println!("Stage reached: {stage}"),
        None => println!("Too young for vaccines"),
    }
    for vaccine in &report.vaccines {
        println!("  - {vaccine}");
    }
    Ok(())
}

fn schedule_report(
    strategies: &VaccinationStrategies,
    species: Species,
    birth_date: &str,
    now: NaiveDateTime,
    language: &str,
) -> Result<ScheduleReport, ServiceError> {
    let schedule = strategies
        .get(species)
        .ok_or(BusinessError::UnsupportedSpecies(species))?;
    let birth_date = parse_birth_date(birth_date, now)?;
    let weeks = age_in_weeks(birth_date, now);

    Ok(ScheduleReport {
        species,
        age_weeks: weeks,
        stage: schedule.stage_for(weeks).map(|stage| stage.label.clone()),
        due_on: now.date(),
        vaccines: schedule
            .vaccines_due(weeks)
            .into_iter()
            .map(|name| localized_vaccine_name(name, language).to_string())
            .collect(),
    })
}
