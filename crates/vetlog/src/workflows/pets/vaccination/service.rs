use std::sync::Arc;

use tracing::info;

use super::super::domain::{NewVaccination, Pet, Vaccination, VaccinationStatus};
use super::super::repository::VaccinationRepository;
use super::{DueVaccine, VaccinationPlanner, VaccinationStrategies};
use crate::workflows::clock::Clock;
use crate::workflows::error::{BusinessError, ServiceError};

/// Persists the vaccines a pet needs at registration time and answers status queries.
pub struct VaccinationService<V: ?Sized> {
    repository: Arc<V>,
    planner: VaccinationPlanner,
    clock: Arc<dyn Clock>,
}

impl<V> VaccinationService<V>
where
    V: VaccinationRepository + ?Sized,
{
    pub fn new(repository: Arc<V>, strategies: VaccinationStrategies, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            planner: VaccinationPlanner::new(strategies),
            clock,
        }
    }

    /// Vaccines due for `pet` right now, without persisting anything.
    pub fn preview(&self, pet: &Pet) -> Result<Vec<DueVaccine>, ServiceError> {
        self.planner
            .due_vaccines(pet, self.clock.now())
            .map_err(|err| BusinessError::UnsupportedSpecies(err.0).into())
    }

    /// Store every due vaccine as a pending row. Calling twice duplicates rows, so this
    /// belongs to pet creation only.
    pub fn save(&self, pet: &Pet) -> Result<Vec<Vaccination>, ServiceError> {
        let due = self.preview(pet)?;

        let mut stored = Vec::with_capacity(due.len());
        for vaccine in due {
            let row = self.repository.insert_vaccination(NewVaccination {
                name: vaccine.name,
                date: vaccine.due_on,
                status: VaccinationStatus::Pending,
                pet: pet.id,
            })?;
            stored.push(row);
        }

        info!(pet = %pet.uuid, species = %pet.species(), count = stored.len(), "registered vaccinations");
        Ok(stored)
    }

    pub fn vaccinations_by_pet(&self, pet: &Pet) -> Result<Vec<Vaccination>, ServiceError> {
        Ok(self.repository.vaccinations_by_pet(pet.id)?)
    }

    pub fn vaccines_by_status(
        &self,
        pet: &Pet,
        status: VaccinationStatus,
    ) -> Result<Vec<Vaccination>, ServiceError> {
        Ok(self
            .vaccinations_by_pet(pet)?
            .into_iter()
            .filter(|vaccination| vaccination.status == status)
            .collect())
    }

    pub fn delete_vaccines_by_pet(&self, pet: &Pet) -> Result<(), ServiceError> {
        self.repository.delete_vaccinations_by_pet(pet.id)?;
        info!(pet = %pet.uuid, "deleted vaccinations");
        Ok(())
    }
}
