//! Species-specific vaccination scheduling and the service persisting due vaccines.

mod locale;
mod schedule;
mod service;
mod strategy;

pub use locale::localized_vaccine_name;
pub use schedule::{VaccinationSchedule, VaccinationStage, VaccinationStrategies};
pub use service::VaccinationService;
pub use strategy::age_in_weeks;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::domain::{Pet, Species};

/// A vaccine the pet should receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueVaccine {
    pub name: String,
    pub due_on: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no vaccination strategy registered for {0}")]
pub struct UnsupportedSpeciesError(pub Species);

/// Stateless planner dispatching to the schedule registered for the pet's species.
#[derive(Debug, Clone)]
pub struct VaccinationPlanner {
    strategies: VaccinationStrategies,
}

impl VaccinationPlanner {
    pub fn new(strategies: VaccinationStrategies) -> Self {
        Self { strategies }
    }

    pub fn supports(&self, species: Species) -> bool {
        self.strategies.get(species).is_some()
    }

    pub fn due_vaccines(
        &self,
        pet: &Pet,
        now: NaiveDateTime,
    ) -> Result<Vec<DueVaccine>, UnsupportedSpeciesError> {
        let species = pet.species();
        let schedule = self
            .strategies
            .get(species)
            .ok_or(UnsupportedSpeciesError(species))?;
        Ok(strategy::due_for_pet(schedule, pet, now))
    }
}

impl Default for VaccinationPlanner {
    fn default() -> Self {
        Self::new(VaccinationStrategies::default())
    }
}
