use serde::{Deserialize, Serialize};

use super::domain::{BreedId, PetId, PetImage};
use crate::workflows::accounts::UserId;

/// Externally populated pet form. Every id is untrusted until resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetCommand {
    #[serde(default)]
    pub id: Option<PetId>,
    pub name: String,
    /// `YYYY-MM-DD`, optionally with a `THH:MM` time. Empty means "born now".
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub dewormed: bool,
    #[serde(default)]
    pub sterilized: bool,
    #[serde(default)]
    pub vaccinated: bool,
    pub breed: BreedId,
    #[serde(default)]
    pub user: Option<UserId>,
    #[serde(default)]
    pub adopter: Option<UserId>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub images: Vec<PetImage>,
}

/// Request to list a pet for adoption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionCommand {
    pub uuid: String,
    pub description: String,
}

/// Contact exchange submitted by an adopter to close an adoption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelephoneCommand {
    pub uuid: String,
    pub mobile: String,
}

/// Vet visit notes submitted for an existing pet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetLogCommand {
    pub pet: PetId,
    #[serde(default)]
    pub vet_name: Option<String>,
    pub signs: String,
    pub diagnosis: String,
    pub medicine: String,
    #[serde(default)]
    pub uuid: Option<String>,
}
