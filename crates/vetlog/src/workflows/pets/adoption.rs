use std::sync::Arc;

use tracing::info;

use super::commands::{AdoptionCommand, TelephoneCommand};
use super::domain::{Pet, PetAdoption, PetStatus};
use super::repository::PetRepository;
use super::service::load_pet_by_uuid;
use crate::config::MessagingConfig;
use crate::store::{transactional, TransactionManager};
use crate::workflows::accounts::{User, UserRepository};
use crate::workflows::error::{BusinessError, ServiceError};
use crate::workflows::notification::{MessageCommand, NotificationService};

/// Drives a pet through `Owned -> InAdoption -> Adopted` and tells the owner who adopted it.
pub struct AdoptionService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    messaging: MessagingConfig,
}

impl<S, N> AdoptionService<S, N>
where
    S: PetRepository + UserRepository + TransactionManager + 'static,
    N: NotificationService + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, messaging: MessagingConfig) -> Self {
        Self {
            store,
            notifier,
            messaging,
        }
    }

    /// List an owned pet for adoption.
    pub fn request_adoption(&self, command: AdoptionCommand) -> Result<PetAdoption, ServiceError> {
        transactional(self.store.as_ref(), || {
            let mut pet = load_pet_by_uuid(self.store.as_ref(), &command.uuid)?;
            let description = command.description.trim();
            if description.is_empty() {
                return Err(BusinessError::MissingAdoptionDescription.into());
            }

            pet.transition_to(PetStatus::InAdoption)?;
            let adoption = PetAdoption {
                description: description.to_string(),
            };
            pet.adoption = Some(adoption.clone());
            self.store.update_pet(pet.clone())?;

            info!(pet = %pet.uuid, "pet listed for adoption");
            Ok(adoption)
        })
    }

    /// Owner takes the listing down; the pet is back to `Owned`.
    pub fn withdraw_adoption(&self, uuid: &str) -> Result<Pet, ServiceError> {
        transactional(self.store.as_ref(), || {
            let mut pet = load_pet_by_uuid(self.store.as_ref(), uuid)?;
            pet.transition_to(PetStatus::Owned)?;
            pet.adoption = None;
            self.store.update_pet(pet.clone())?;

            info!(pet = %pet.uuid, "adoption listing withdrawn");
            Ok(pet)
        })
    }

    /// Close an adoption: record the adopter and their phone, then message the owner.
    pub fn finalize_adoption(
        &self,
        command: TelephoneCommand,
        adopter: &User,
    ) -> Result<Pet, ServiceError> {
        transactional(self.store.as_ref(), || {
            let mut pet = load_pet_by_uuid(self.store.as_ref(), &command.uuid)?;
            pet.transition_to(PetStatus::Adopted)?;
            pet.adopter = Some(adopter.id);

            let mut adopter = adopter.clone();
            adopter.mobile = Some(command.mobile.trim().to_string());

            self.store.update_pet(pet.clone())?;
            self.store.update_user(adopter.clone())?;

            let owner = self
                .store
                .find_user(pet.owner)?
                .ok_or_else(|| BusinessError::user_reference(pet.owner))?;
            let message = adoption_message(&pet, &owner, &adopter, &self.messaging);
            info!(pet = %pet.uuid, owner = %owner.id, adopter = %adopter.id, "pet adopted");
            self.notifier.send_message(message)?;

            Ok(pet)
        })
    }
}

fn adoption_message(
    pet: &Pet,
    owner: &User,
    adopter: &User,
    messaging: &MessagingConfig,
) -> MessageCommand {
    MessageCommand {
        email: owner.email.clone(),
        name: pet.name.clone(),
        template: messaging.adoption_template.clone(),
        message: adopter.mobile.clone().unwrap_or_default(),
        token: messaging.client_token.clone(),
        contact_name: Some(adopter.full_name()),
        email_contact: Some(adopter.email.clone()),
    }
}
