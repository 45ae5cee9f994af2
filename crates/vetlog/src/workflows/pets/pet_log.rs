use std::sync::Arc;

use tracing::info;

use super::binder::bind_pet_log;
use super::commands::PetLogCommand;
use super::domain::{Pet, PetLog};
use super::repository::{PetLogRepository, PetRepository};
use crate::store::{transactional, TransactionManager};
use crate::workflows::clock::Clock;
use crate::workflows::error::{BusinessError, ServiceError};

/// Vet visit notes attached to registered pets.
pub struct PetLogService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> PetLogService<S>
where
    S: PetRepository + PetLogRepository + TransactionManager + 'static,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn save(&self, command: PetLogCommand) -> Result<PetLog, ServiceError> {
        transactional(self.store.as_ref(), || {
            let pet = self
                .store
                .find_pet(command.pet)?
                .ok_or_else(|| BusinessError::pet_id(command.pet))?;
            let log = self
                .store
                .insert_pet_log(bind_pet_log(command, self.clock.now())?)?;
            info!(pet = %pet.uuid, log = %log.uuid, "recorded pet log");
            Ok(log)
        })
    }

    pub fn pet_logs_by_pet(&self, pet: &Pet) -> Result<Vec<PetLog>, ServiceError> {
        Ok(self.store.pet_logs_by_pet(pet.id)?)
    }
}
