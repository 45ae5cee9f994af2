use super::domain::{
    Breed, BreedId, NewPet, NewPetLog, NewVaccination, Pet, PetId, PetLog, PetStatus, PetUuid,
    Vaccination,
};
use crate::store::RepositoryError;
use crate::workflows::accounts::UserId;

/// Storage abstraction for pets. Absent records are `Ok(None)`, never an error.
pub trait PetRepository: Send + Sync {
    fn insert_pet(&self, pet: NewPet) -> Result<Pet, RepositoryError>;
    fn update_pet(&self, pet: Pet) -> Result<(), RepositoryError>;
    fn find_pet(&self, id: PetId) -> Result<Option<Pet>, RepositoryError>;
    fn find_pet_by_uuid(&self, uuid: &PetUuid) -> Result<Option<Pet>, RepositoryError>;
    fn pets_by_owner(&self, owner: UserId) -> Result<Vec<Pet>, RepositoryError>;
    fn pets_by_adopter(&self, adopter: UserId) -> Result<Vec<Pet>, RepositoryError>;
    fn pets_by_status(&self, status: PetStatus) -> Result<Vec<Pet>, RepositoryError>;
    fn delete_pet(&self, id: PetId) -> Result<(), RepositoryError>;
}

pub trait VaccinationRepository: Send + Sync {
    fn insert_vaccination(&self, vaccination: NewVaccination)
        -> Result<Vaccination, RepositoryError>;
    fn vaccinations_by_pet(&self, pet: PetId) -> Result<Vec<Vaccination>, RepositoryError>;
    fn delete_vaccinations_by_pet(&self, pet: PetId) -> Result<(), RepositoryError>;
}

pub trait BreedRepository: Send + Sync {
    fn find_breed(&self, id: BreedId) -> Result<Option<Breed>, RepositoryError>;
    fn breeds(&self) -> Result<Vec<Breed>, RepositoryError>;
}

/// Vet notes, always listed in insertion order.
pub trait PetLogRepository: Send + Sync {
    fn insert_pet_log(&self, log: NewPetLog) -> Result<PetLog, RepositoryError>;
    fn pet_logs_by_pet(&self, pet: PetId) -> Result<Vec<PetLog>, RepositoryError>;
    fn delete_pet_logs_by_pet(&self, pet: PetId) -> Result<(), RepositoryError>;
}
