use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::workflows::accounts::UserId;
use crate::workflows::error::BusinessError;

/// Database identity of a pet.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PetId(pub u64);

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public identifier used in shareable adoption links.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PetUuid(pub String);

impl PetUuid {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PetUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BreedId(pub u64);

impl fmt::Display for BreedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VaccinationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Other,
}

impl Species {
    pub const fn label(self) -> &'static str {
        match self {
            Species::Dog => "DOG",
            Species::Cat => "CAT",
            Species::Bird => "BIRD",
            Species::Other => "OTHER",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dog" => Some(Species::Dog),
            "cat" => Some(Species::Cat),
            "bird" => Some(Species::Bird),
            "other" => Some(Species::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of a pet inside the adoption workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetStatus {
    Owned,
    InAdoption,
    Adopted,
}

impl PetStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PetStatus::Owned => "OWNED",
            PetStatus::InAdoption => "IN_ADOPTION",
            PetStatus::Adopted => "ADOPTED",
        }
    }

    /// `Adopted` is terminal; an owner may withdraw a listing back to `Owned`.
    pub const fn can_transition_to(self, next: PetStatus) -> bool {
        matches!(
            (self, next),
            (PetStatus::Owned, PetStatus::InAdoption)
                | (PetStatus::InAdoption, PetStatus::Adopted)
                | (PetStatus::InAdoption, PetStatus::Owned)
        )
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VaccinationStatus {
    Pending,
    Applied,
}

/// Read-only reference data describing a breed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breed {
    pub id: BreedId,
    pub name: String,
    pub species: Species,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetImage {
    pub uuid: String,
}

/// Listing details attached while a pet is offered for adoption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetAdoption {
    pub description: String,
}

/// Pet fields before the store assigns an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPet {
    pub uuid: PetUuid,
    pub name: String,
    pub birth_date: NaiveDateTime,
    pub dewormed: bool,
    pub sterilized: bool,
    pub vaccinated: bool,
    pub status: PetStatus,
    pub breed: Breed,
    pub owner: UserId,
    pub adopter: Option<UserId>,
    pub adoption: Option<PetAdoption>,
    pub images: Vec<PetImage>,
    pub date_created: NaiveDateTime,
}

impl NewPet {
    pub fn with_id(self, id: PetId) -> Pet {
        Pet {
            id,
            uuid: self.uuid,
            name: self.name,
            birth_date: self.birth_date,
            dewormed: self.dewormed,
            sterilized: self.sterilized,
            vaccinated: self.vaccinated,
            status: self.status,
            breed: self.breed,
            owner: self.owner,
            adopter: self.adopter,
            adoption: self.adoption,
            images: self.images,
            date_created: self.date_created,
        }
    }
}

/// Persisted pet. Owner and adopter are plain id references resolved through the user repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub uuid: PetUuid,
    pub name: String,
    pub birth_date: NaiveDateTime,
    pub dewormed: bool,
    pub sterilized: bool,
    pub vaccinated: bool,
    pub status: PetStatus,
    pub breed: Breed,
    pub owner: UserId,
    pub adopter: Option<UserId>,
    pub adoption: Option<PetAdoption>,
    pub images: Vec<PetImage>,
    pub date_created: NaiveDateTime,
}

impl Pet {
    pub fn species(&self) -> Species {
        self.breed.species
    }

    /// Move to `next`, rejecting anything the adoption lifecycle does not allow.
    pub fn transition_to(&mut self, next: PetStatus) -> Result<(), BusinessError> {
        if !self.status.can_transition_to(next) {
            return Err(BusinessError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVaccination {
    pub name: String,
    pub date: NaiveDate,
    pub status: VaccinationStatus,
    pub pet: PetId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vaccination {
    pub id: VaccinationId,
    pub name: String,
    pub date: NaiveDate,
    pub status: VaccinationStatus,
    pub pet: PetId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PetLogId(pub u64);

/// Clinical note a vet records against a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPetLog {
    pub uuid: String,
    pub vet_name: Option<String>,
    pub signs: String,
    pub diagnosis: String,
    pub medicine: String,
    pub pet: PetId,
    pub date_created: NaiveDateTime,
}

impl NewPetLog {
    pub fn with_id(self, id: PetLogId) -> PetLog {
        PetLog {
            id,
            uuid: self.uuid,
            vet_name: self.vet_name,
            signs: self.signs,
            diagnosis: self.diagnosis,
            medicine: self.medicine,
            pet: self.pet,
            date_created: self.date_created,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetLog {
    pub id: PetLogId,
    pub uuid: String,
    pub vet_name: Option<String>,
    pub signs: String,
    pub diagnosis: String,
    pub medicine: String,
    pub pet: PetId,
    pub date_created: NaiveDateTime,
}
