use chrono::NaiveDateTime;
use tracing::debug;

use super::super::domain::Pet;
use super::schedule::VaccinationSchedule;
use super::DueVaccine;

/// Whole weeks between birth and `now`, truncated. Birth dates in the future count as zero.
pub fn age_in_weeks(birth_date: NaiveDateTime, now: NaiveDateTime) -> u32 {
    let weeks = now.signed_duration_since(birth_date).num_weeks();
    weeks.clamp(0, i64::from(u32::MAX)) as u32
}

pub(crate) fn due_for_pet(
    schedule: &VaccinationSchedule,
    pet: &Pet,
    now: NaiveDateTime,
) -> Vec<DueVaccine> {
    let weeks = age_in_weeks(pet.birth_date, now);
    let due_on = now.date();

    match schedule.stage_for(weeks) {
        None => {
            debug!(pet = %pet.uuid, weeks, "no vaccination needed");
            Vec::new()
        }
        Some(stage) => {
            debug!(pet = %pet.uuid, weeks, stage = %stage.label, "vaccination stage reached");
            schedule
                .vaccines_due(weeks)
                .into_iter()
                .map(|name| DueVaccine {
                    name: name.to_string(),
                    due_on,
                })
                .collect()
        }
    }
}
