//! Pet registration, vaccination scheduling, and the adoption lifecycle.
//!
//! Pets move `Owned -> InAdoption -> Adopted`. Registration schedules vaccines for the pet's
//! species inside the same transaction, and deletion cascades to those vaccines and to the
//! vet notes recorded against the pet.

pub mod adoption;
pub mod binder;
pub mod commands;
pub mod domain;
pub mod pet_log;
pub mod repository;
pub mod service;
pub mod vaccination;

#[cfg(test)]
mod tests;

pub use adoption::AdoptionService;
pub use binder::parse_birth_date;
pub use commands::{AdoptionCommand, PetCommand, PetLogCommand, TelephoneCommand};
pub use domain::{
    Breed, BreedId, NewPet, NewPetLog, NewVaccination, Pet, PetAdoption, PetId, PetImage,
    PetLog, PetLogId, PetStatus, PetUuid, Species, Vaccination, VaccinationId, VaccinationStatus,
};
pub use pet_log::PetLogService;
pub use repository::{BreedRepository, PetLogRepository, PetRepository, VaccinationRepository};
pub use service::PetService;
pub use vaccination::{
    DueVaccine, UnsupportedSpeciesError, VaccinationPlanner, VaccinationSchedule,
    VaccinationService, VaccinationStage, VaccinationStrategies,
};
