use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::commands::{PetCommand, PetLogCommand};
use super::domain::{Breed, NewPet, NewPetLog, Pet, PetStatus, PetUuid};
use super::repository::BreedRepository;
use crate::workflows::accounts::UserId;
use crate::workflows::error::{BusinessError, ServiceError};

/// Date-only birth dates are pinned to this time of day.
const DEFAULT_BIRTH_TIME: (u32, u32) = (6, 0);

const MAX_VET_NAME: usize = 200;
const MAX_CLINICAL_NOTE: usize = 1000;

/// Parse a form birth date. Empty input means the pet was born `now`.
pub fn parse_birth_date(raw: &str, now: NaiveDateTime) -> Result<NaiveDateTime, BusinessError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(now);
    }

    let parsed = match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => {
            let (hour, minute) = DEFAULT_BIRTH_TIME;
            let time = NaiveTime::from_hms_opt(hour, minute, 0)
                .ok_or_else(|| BusinessError::InvalidBirthDate(raw.to_string()))?;
            date.and_time(time)
        }
        Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|_| BusinessError::InvalidBirthDate(raw.to_string()))?,
    };

    if parsed > now {
        return Err(BusinessError::BirthDateInFuture);
    }
    Ok(parsed)
}

pub(crate) fn resolve_breed<B>(breeds: &B, command: &PetCommand) -> Result<Breed, ServiceError>
where
    B: BreedRepository + ?Sized,
{
    breeds
        .find_breed(command.breed)?
        .ok_or_else(|| BusinessError::BreedNotFound(command.breed).into())
}

/// Build a fresh `Owned` pet from a validated command.
pub(crate) fn bind_new_pet(
    command: PetCommand,
    breed: Breed,
    owner: UserId,
    now: NaiveDateTime,
) -> Result<NewPet, BusinessError> {
    let birth_date = parse_birth_date(&command.birth_date, now)?;
    let uuid = command
        .uuid
        .filter(|uuid| !uuid.trim().is_empty())
        .map(PetUuid)
        .unwrap_or_else(PetUuid::generate);

    Ok(NewPet {
        uuid,
        name: command.name.trim().to_string(),
        birth_date,
        dewormed: command.dewormed,
        sterilized: command.sterilized,
        vaccinated: command.vaccinated,
        status: PetStatus::Owned,
        breed,
        owner,
        adopter: None,
        adoption: None,
        images: command.images,
        date_created: now,
    })
}

/// Copy the form's editable fields onto a stored pet. Stored images are kept and newly attached
/// ones appended; identity and status stay put.
pub(crate) fn rebind_pet(
    pet: &mut Pet,
    command: &PetCommand,
    breed: Breed,
    now: NaiveDateTime,
) -> Result<(), BusinessError> {
    pet.birth_date = parse_birth_date(&command.birth_date, now)?;
    pet.name = command.name.trim().to_string();
    pet.dewormed = command.dewormed;
    pet.sterilized = command.sterilized;
    pet.vaccinated = command.vaccinated;
    pet.breed = breed;
    for image in &command.images {
        if !pet.images.contains(image) {
            pet.images.push(image.clone());
        }
    }
    Ok(())
}

/// Validate vet notes and stamp them. The pet reference is resolved by the caller.
pub(crate) fn bind_pet_log(
    command: PetLogCommand,
    now: NaiveDateTime,
) -> Result<NewPetLog, BusinessError> {
    let vet_name = command
        .vet_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    if vet_name
        .as_deref()
        .is_some_and(|name| name.chars().count() > MAX_VET_NAME)
    {
        return Err(BusinessError::InvalidPetLog {
            field: "vet_name",
            problem: "is too long",
        });
    }

    Ok(NewPetLog {
        uuid: command
            .uuid
            .filter(|uuid| !uuid.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        vet_name,
        signs: clinical_note("signs", &command.signs)?,
        diagnosis: clinical_note("diagnosis", &command.diagnosis)?,
        medicine: clinical_note("medicine", &command.medicine)?,
        pet: command.pet,
        date_created: now,
    })
}

fn clinical_note(field: &'static str, raw: &str) -> Result<String, BusinessError> {
    let note = raw.trim();
    if note.is_empty() {
        return Err(BusinessError::InvalidPetLog {
            field,
            problem: "is required",
        });
    }
    if note.chars().count() > MAX_CLINICAL_NOTE {
        return Err(BusinessError::InvalidPetLog {
            field,
            problem: "is too long",
        });
    }
    Ok(note.to_string())
}
