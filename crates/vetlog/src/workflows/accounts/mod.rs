//! Account registration, confirmation and recovery tokens, and user lookups.

pub mod domain;
pub mod repository;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ChangePasswordCommand, NewUser, PasswordHash, RegistrationCode, Role, User, UserCommand,
    UserId,
};
pub use repository::{RegistrationCodeRepository, UserRepository};
pub use service::{RecoveryService, RegistrationService, UserService};
