use std::sync::Arc;

use tracing::{info, warn};

use chrono::NaiveDateTime;

use super::domain::{
    ChangePasswordCommand, NewUser, PasswordHash, RegistrationCode, Role, User, UserCommand,
};
use super::repository::{RegistrationCodeRepository, UserRepository};
use crate::config::{AccountConfig, MessagingConfig};
use crate::store::{transactional, RepositoryError, TransactionManager};
use crate::workflows::clock::Clock;
use crate::workflows::error::{BusinessError, ServiceError, UserNotFoundError};
use crate::workflows::notification::{MessageCommand, NotificationService};

const WELCOME_MESSAGE: &str = "Welcome to Vetlog! Your account is ready.";

/// Account registration and user lookups.
pub struct UserService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    accounts: AccountConfig,
    messaging: MessagingConfig,
    clock: Arc<dyn Clock>,
}

impl<S, N> UserService<S, N>
where
    S: UserRepository + TransactionManager + 'static,
    N: NotificationService + 'static,
{
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        accounts: AccountConfig,
        messaging: MessagingConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            accounts,
            messaging,
            clock,
        }
    }

    /// Validate and store a new account. Accounts from countries outside the allow-list start
    /// disabled and receive no welcome e-mail until confirmed. The welcome goes out only once
    /// the row is stored; a failed delivery rolls the row back.
    pub fn register(&self, command: UserCommand) -> Result<User, ServiceError> {
        transactional(self.store.as_ref(), || {
            self.validate(&command)?;

            let enabled = self.accounts.allows(&command.country_code);
            let new_user = NewUser {
                username: command.username.trim().to_string(),
                password_hash: PasswordHash::from_password(
                    &command.password,
                    self.accounts.password_cost,
                )?,
                first_name: command.first_name.trim().to_string(),
                last_name: command.last_name.trim().to_string(),
                email: command.email.trim().to_string(),
                mobile: Some(command.mobile.trim().to_string()),
                country_code: command.country_code.trim().to_ascii_uppercase(),
                role: Role::User,
                enabled,
                date_created: self.clock.now(),
            };

            let user = self.store.insert_user(new_user)?;
            if user.enabled {
                self.send_welcome_email(&user)?;
            } else {
                info!(user = %user.id, country = %user.country_code, "account awaiting confirmation");
            }
            info!(user = %user.id, enabled = user.enabled, "registered user");
            Ok(user)
        })
    }

    /// Login lookup: username first, then mobile number.
    pub fn by_username(&self, username: &str) -> Result<User, ServiceError> {
        if let Some(user) = self.store.find_user_by_username(username)? {
            return Ok(user);
        }
        self.store
            .find_user_by_mobile(username)?
            .ok_or_else(|| UserNotFoundError(username.to_string()).into())
    }

    pub fn by_email(&self, email: &str) -> Result<User, ServiceError> {
        self.store
            .find_user_by_email(email)?
            .ok_or_else(|| UserNotFoundError(format!("with email: {email}")).into())
    }

    pub fn by_mobile(&self, mobile: &str) -> Result<User, ServiceError> {
        self.store
            .find_user_by_mobile(mobile)?
            .ok_or_else(|| UserNotFoundError(format!("with mobile: {mobile}")).into())
    }

    fn validate(&self, command: &UserCommand) -> Result<(), ServiceError> {
        if command.password != command.password_confirmation {
            return Err(BusinessError::PasswordMismatch.into());
        }
        let mobile = command.mobile.trim();
        if mobile.is_empty() || !mobile.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(BusinessError::InvalidMobile.into());
        }
        let username = command.username.trim();
        if self.store.find_user_by_username(username)?.is_some() {
            return Err(BusinessError::DuplicatedUsername(username.to_string()).into());
        }
        let email = command.email.trim();
        if self.store.find_user_by_email(email)?.is_some() {
            return Err(BusinessError::DuplicatedEmail(email.to_string()).into());
        }
        Ok(())
    }

    /// Delivery failures surface as business errors here, unlike the adoption notification.
    fn send_welcome_email(&self, user: &User) -> Result<(), BusinessError> {
        info!(name = %user.first_name, "sending welcome email");
        let message = MessageCommand {
            email: user.email.clone(),
            name: user.first_name.clone(),
            template: self.messaging.welcome_template.clone(),
            message: WELCOME_MESSAGE.to_string(),
            token: self.messaging.client_token.clone(),
            contact_name: None,
            email_contact: None,
        };
        self.notifier.send_message(message).map_err(|err| {
            warn!(error = %err, "welcome email failed");
            BusinessError::NotificationFailed(err.to_string())
        })
    }
}

/// Confirmation tokens for accounts registered disabled.
pub struct RegistrationService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> RegistrationService<S>
where
    S: RegistrationCodeRepository + UserRepository + TransactionManager + 'static,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn generate_token(&self, email: &str) -> Result<String, ServiceError> {
        transactional(self.store.as_ref(), || {
            Ok(issue_token(self.store.as_ref(), email, self.clock.now())?)
        })
    }

    pub fn email_for_token(&self, token: &str) -> Result<String, ServiceError> {
        self.store
            .find_code(token)?
            .map(|code| code.email)
            .ok_or_else(|| BusinessError::TokenNotFound.into())
    }

    /// Enable the account registered under the token's e-mail.
    pub fn confirm(&self, token: &str) -> Result<User, ServiceError> {
        transactional(self.store.as_ref(), || {
            let email = self.email_for_token(token)?;
            let mut user = self
                .store
                .find_user_by_email(&email)?
                .ok_or_else(|| UserNotFoundError(format!("with email: {email}")))?;
            user.enabled = true;
            self.store.update_user(user.clone())?;
            info!(user = %user.id, "account confirmed");
            Ok(user)
        })
    }
}

/// Forgotten-password flow: mail a reset link, check its token, store the new password.
pub struct RecoveryService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    accounts: AccountConfig,
    messaging: MessagingConfig,
    clock: Arc<dyn Clock>,
}

impl<S, N> RecoveryService<S, N>
where
    S: RegistrationCodeRepository + UserRepository + TransactionManager + 'static,
    N: NotificationService + 'static,
{
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        accounts: AccountConfig,
        messaging: MessagingConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            accounts,
            messaging,
            clock,
        }
    }

    /// Issue a reset token for an enabled account and mail the link. Returns the token.
    pub fn generate_registration_code_for_email(
        &self,
        email: &str,
    ) -> Result<String, ServiceError> {
        transactional(self.store.as_ref(), || {
            let user = self
                .store
                .find_user_by_email(email.trim())?
                .ok_or_else(|| UserNotFoundError(format!("with email: {}", email.trim())))?;
            if !user.enabled {
                return Err(BusinessError::AccountNotActivated(user.email).into());
            }

            let token = issue_token(self.store.as_ref(), &user.email, self.clock.now())?;
            let message = MessageCommand {
                email: user.email.clone(),
                name: user.email.clone(),
                template: self.messaging.forgot_template.clone(),
                message: self.messaging.recovery_link(&token),
                token: self.messaging.client_token.clone(),
                contact_name: None,
                email_contact: None,
            };
            self.notifier.send_message(message).map_err(|err| {
                warn!(error = %err, "recovery email failed");
                BusinessError::NotificationFailed(err.to_string())
            })?;
            info!(user = %user.id, "recovery link sent");
            Ok(token)
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<bool, ServiceError> {
        Ok(self.store.find_code(token)?.is_some())
    }

    pub fn change_password(&self, command: ChangePasswordCommand) -> Result<User, ServiceError> {
        if command.password != command.password_confirmation {
            return Err(BusinessError::PasswordMismatch.into());
        }

        transactional(self.store.as_ref(), || {
            let email = self
                .store
                .find_code(&command.token)?
                .map(|code| code.email)
                .ok_or(BusinessError::TokenNotFound)?;
            let mut user = self
                .store
                .find_user_by_email(&email)?
                .ok_or_else(|| UserNotFoundError(format!("with email: {email}")))?;
            user.password_hash =
                PasswordHash::from_password(&command.password, self.accounts.password_cost)?;
            self.store.update_user(user.clone())?;
            info!(user = %user.id, "password changed");
            Ok(user)
        })
    }
}

fn issue_token<S>(store: &S, email: &str, now: NaiveDateTime) -> Result<String, RepositoryError>
where
    S: RegistrationCodeRepository + ?Sized,
{
    let code = RegistrationCode {
        token: uuid::Uuid::new_v4().to_string(),
        email: email.trim().to_string(),
        date_created: now,
    };
    let token = code.token.clone();
    store.insert_code(code)?;
    Ok(token)
}
