use std::sync::Arc;

use tracing::{info, warn};

use super::binder::{bind_new_pet, rebind_pet, resolve_breed};
use super::commands::PetCommand;
use super::domain::{Pet, PetId, PetStatus, PetUuid};
use super::repository::{BreedRepository, PetLogRepository, PetRepository, VaccinationRepository};
use super::vaccination::{VaccinationService, VaccinationStrategies};
use crate::store::{transactional, TransactionManager};
use crate::workflows::accounts::{User, UserId, UserRepository};
use crate::workflows::clock::Clock;
use crate::workflows::error::{BusinessError, ServiceError};

/// Pet registration, editing, listing and deletion. Owns the vaccination service so new pets
/// get their schedule inside the same transaction.
pub struct PetService<S> {
    store: Arc<S>,
    vaccinations: VaccinationService<S>,
    clock: Arc<dyn Clock>,
}

impl<S> PetService<S>
where
    S: PetRepository
        + BreedRepository
        + UserRepository
        + VaccinationRepository
        + PetLogRepository
        + TransactionManager
        + 'static,
{
    pub fn new(store: Arc<S>, strategies: VaccinationStrategies, clock: Arc<dyn Clock>) -> Self {
        let vaccinations = VaccinationService::new(store.clone(), strategies, clock.clone());
        Self {
            store,
            vaccinations,
            clock,
        }
    }

    pub fn vaccinations(&self) -> &VaccinationService<S> {
        &self.vaccinations
    }

    /// Register a pet for `owner` and schedule its vaccines.
    pub fn create(&self, command: PetCommand, owner: &User) -> Result<Pet, ServiceError> {
        transactional(self.store.as_ref(), || {
            let breed = resolve_breed(self.store.as_ref(), &command)?;
            let new_pet = bind_new_pet(command, breed, owner.id, self.clock.now())?;
            let pet = self.store.insert_pet(new_pet)?;
            self.vaccinations.save(&pet)?;
            info!(pet = %pet.uuid, owner = %owner.id, "registered pet");
            Ok(pet)
        })
    }

    /// Re-bind editable fields. The owner must resolve; an unresolved adopter leaves the
    /// stored adopter untouched.
    pub fn update(&self, command: PetCommand) -> Result<Pet, ServiceError> {
        let id = command.id.ok_or_else(|| BusinessError::PetNotFound {
            reference: "id: none".to_string(),
        })?;

        transactional(self.store.as_ref(), || {
            let mut pet = self.pet_by_id(id)?;
            let breed = resolve_breed(self.store.as_ref(), &command)?;
            let owner = self
                .find_user(command.user)?
                .ok_or_else(|| BusinessError::user_reference(describe_user(command.user)))?;
            let adopter = self.find_user(command.adopter)?;

            rebind_pet(&mut pet, &command, breed, self.clock.now())?;
            pet.owner = owner.id;
            if let Some(adopter) = adopter {
                pet.adopter = Some(adopter.id);
            }

            self.store.update_pet(pet.clone())?;
            info!(pet = %pet.uuid, "updated pet");
            Ok(pet)
        })
    }

    pub fn pet_by_id(&self, id: PetId) -> Result<Pet, ServiceError> {
        self.store
            .find_pet(id)?
            .ok_or_else(|| BusinessError::pet_id(id).into())
    }

    pub fn pet_by_uuid(&self, uuid: &str) -> Result<Pet, ServiceError> {
        load_pet_by_uuid(self.store.as_ref(), uuid)
    }

    /// Pets still with `user` plus pets `user` adopted. Pets the user gave away are omitted.
    pub fn pets_by_owner(&self, user: &User) -> Result<Vec<Pet>, ServiceError> {
        let mut pets: Vec<Pet> = self
            .store
            .pets_by_owner(user.id)?
            .into_iter()
            .filter(|pet| pet.status != PetStatus::Adopted)
            .collect();

        for adopted in self.store.pets_by_adopter(user.id)? {
            if !pets.iter().any(|pet| pet.id == adopted.id) {
                pets.push(adopted);
            }
        }
        Ok(pets)
    }

    pub fn pets_by_status(&self, status: PetStatus) -> Result<Vec<Pet>, ServiceError> {
        Ok(self.store.pets_by_status(status)?)
    }

    /// Delete a pet with its vaccinations and vet notes. Pets listed for adoption must be
    /// withdrawn first.
    pub fn delete(&self, id: PetId) -> Result<(), ServiceError> {
        transactional(self.store.as_ref(), || {
            let pet = self.pet_by_id(id)?;
            if pet.status == PetStatus::InAdoption {
                warn!(pet = %pet.uuid, "refused to delete pet listed for adoption");
                return Err(BusinessError::PetInAdoption(pet.id).into());
            }

            self.vaccinations.delete_vaccines_by_pet(&pet)?;
            self.store.delete_pet_logs_by_pet(pet.id)?;
            self.store.delete_pet(pet.id)?;
            info!(pet = %pet.uuid, "deleted pet");
            Ok(())
        })
    }

    fn find_user(&self, id: Option<UserId>) -> Result<Option<User>, ServiceError> {
        match id {
            Some(id) => Ok(self.store.find_user(id)?),
            None => Ok(None),
        }
    }
}

pub(crate) fn load_pet_by_uuid<P>(pets: &P, uuid: &str) -> Result<Pet, ServiceError>
where
    P: PetRepository + ?Sized,
{
    pets.find_pet_by_uuid(&PetUuid(uuid.to_string()))?
        .ok_or_else(|| BusinessError::pet_uuid(uuid).into())
}

fn describe_user(id: Option<UserId>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| "none".to_string())
}
