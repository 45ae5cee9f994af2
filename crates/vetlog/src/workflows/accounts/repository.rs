use super::domain::{NewUser, RegistrationCode, User, UserId};
use crate::store::RepositoryError;

/// Storage abstraction for accounts. Absent records are `Ok(None)`.
pub trait UserRepository: Send + Sync {
    fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    fn update_user(&self, user: User) -> Result<(), RepositoryError>;
    fn find_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    fn find_user_by_mobile(&self, mobile: &str) -> Result<Option<User>, RepositoryError>;
}

pub trait RegistrationCodeRepository: Send + Sync {
    fn insert_code(&self, code: RegistrationCode) -> Result<(), RepositoryError>;
    fn find_code(&self, token: &str) -> Result<Option<RegistrationCode>, RepositoryError>;
}
