use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::notification::NotificationError;
use super::pets::domain::{BreedId, PetId, PetStatus, Species};
use crate::store::RepositoryError;

/// Expected, user-facing domain failures. None of them are retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusinessError {
    #[error("no pet was found with {reference}")]
    PetNotFound { reference: String },
    #[error("no user was found with {reference}")]
    UserNotFound { reference: String },
    #[error("pet {0} is listed for adoption and cannot be deleted")]
    PetInAdoption(PetId),
    #[error("no vaccination strategy found for pet type {0}")]
    UnsupportedSpecies(Species),
    #[error("breed {0} was not found")]
    BreedNotFound(BreedId),
    #[error("birth date '{0}' is not a valid date")]
    InvalidBirthDate(String),
    #[error("birth date must be in the past")]
    BirthDateInFuture,
    #[error("pet cannot move from {from} to {to}")]
    InvalidTransition { from: PetStatus, to: PetStatus },
    #[error("an adoption listing requires a description")]
    MissingAdoptionDescription,
    #[error("password and confirmation do not match")]
    PasswordMismatch,
    #[error("mobile number must contain only digits")]
    InvalidMobile,
    #[error("username '{0}' is already registered")]
    DuplicatedUsername(String),
    #[error("email '{0}' is already registered")]
    DuplicatedEmail(String),
    #[error("registration token was not found")]
    TokenNotFound,
    #[error("account for {0} is not activated yet")]
    AccountNotActivated(String),
    #[error("pet log field '{field}' {problem}")]
    InvalidPetLog {
        field: &'static str,
        problem: &'static str,
    },
    #[error("notification could not be delivered: {0}")]
    NotificationFailed(String),
}

impl BusinessError {
    pub(crate) fn pet_id(id: PetId) -> Self {
        Self::PetNotFound {
            reference: format!("id: {id}"),
        }
    }

    pub(crate) fn pet_uuid(uuid: &str) -> Self {
        Self::PetNotFound {
            reference: format!("uuid: {uuid}"),
        }
    }

    pub(crate) fn user_reference(reference: impl std::fmt::Display) -> Self {
        Self::UserNotFound {
            reference: format!("id: {reference}"),
        }
    }

    /// Stable machine-readable kind, used in error bodies.
    pub const fn code(&self) -> &'static str {
        match self {
            BusinessError::PetNotFound { .. } => "PET_NOT_FOUND",
            BusinessError::UserNotFound { .. } => "USER_NOT_FOUND",
            BusinessError::PetInAdoption(_) => "PET_IN_ADOPTION",
            BusinessError::UnsupportedSpecies(_) => "UNSUPPORTED_SPECIES",
            BusinessError::BreedNotFound(_) => "BREED_NOT_FOUND",
            BusinessError::InvalidBirthDate(_) => "INVALID_BIRTH_DATE",
            BusinessError::BirthDateInFuture => "BIRTH_DATE_IN_FUTURE",
            BusinessError::InvalidTransition { .. } => "INVALID_TRANSITION",
            BusinessError::MissingAdoptionDescription => "MISSING_ADOPTION_DESCRIPTION",
            BusinessError::PasswordMismatch => "PASSWORD_MISMATCH",
            BusinessError::InvalidMobile => "INVALID_MOBILE",
            BusinessError::DuplicatedUsername(_) => "DUPLICATED_USERNAME",
            BusinessError::DuplicatedEmail(_) => "DUPLICATED_EMAIL",
            BusinessError::TokenNotFound => "TOKEN_NOT_FOUND",
            BusinessError::AccountNotActivated(_) => "ACCOUNT_NOT_ACTIVATED",
            BusinessError::InvalidPetLog { .. } => "INVALID_PET_LOG",
            BusinessError::NotificationFailed(_) => "NOTIFICATION_FAILED",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BusinessError::PetNotFound { .. }
            | BusinessError::UserNotFound { .. }
            | BusinessError::BreedNotFound(_)
            | BusinessError::TokenNotFound => StatusCode::NOT_FOUND,
            BusinessError::PetInAdoption(_)
            | BusinessError::InvalidTransition { .. }
            | BusinessError::DuplicatedUsername(_)
            | BusinessError::DuplicatedEmail(_)
            | BusinessError::AccountNotActivated(_) => StatusCode::CONFLICT,
            BusinessError::NotificationFailed(_) => StatusCode::FAILED_DEPENDENCY,
            BusinessError::UnsupportedSpecies(_)
            | BusinessError::InvalidBirthDate(_)
            | BusinessError::BirthDateInFuture
            | BusinessError::MissingAdoptionDescription
            | BusinessError::PasswordMismatch
            | BusinessError::InvalidMobile
            | BusinessError::InvalidPetLog { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for BusinessError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string(), "code": self.code() }));
        (self.status_code(), body).into_response()
    }
}

/// Lookup failure for authentication-adjacent user queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user {0} not found")]
pub struct UserNotFoundError(pub String);

/// Error raised by the workflow services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Business(#[from] BusinessError),
    #[error(transparent)]
    UserNotFound(#[from] UserNotFoundError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error("password hashing failed: {0}")]
    Password(#[from] bcrypt::BcryptError),
}
