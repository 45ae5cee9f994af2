use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::{AccountConfig, MessagingConfig};
use crate::store::InMemoryStore;
use crate::workflows::accounts::{
    RecoveryService, RegistrationService, UserCommand, UserService,
};
use crate::workflows::clock::FixedClock;
use crate::workflows::notification::{
    MessageCommand, NotificationError, NotificationService, OutboxNotifier,
};

pub(super) fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 5, 2)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid timestamp")
}

pub(super) fn accounts() -> AccountConfig {
    AccountConfig::new(["US", "MX"]).with_password_cost(4)
}

pub(super) fn messaging() -> MessagingConfig {
    MessagingConfig {
        client_token: "secret".to_string(),
        adoption_template: "adoption".to_string(),
        welcome_template: "welcome".to_string(),
        forgot_template: "forgot".to_string(),
        base_url: "https://vetlog.test".to_string(),
        forgot_path: "/recovery/forgot/".to_string(),
    }
}

pub(super) fn command(username: &str, email: &str, country: &str) -> UserCommand {
    UserCommand {
        username: username.to_string(),
        password: "correct horse".to_string(),
        password_confirmation: "correct horse".to_string(),
        first_name: "Josué".to_string(),
        last_name: "Reyes".to_string(),
        email: email.to_string(),
        mobile: "5598765432".to_string(),
        country_code: country.to_string(),
    }
}

pub(super) fn user_service<N: NotificationService + 'static>(
    store: Arc<InMemoryStore>,
    notifier: Arc<N>,
) -> UserService<InMemoryStore, N> {
    UserService::new(
        store,
        notifier,
        accounts(),
        messaging(),
        Arc::new(FixedClock(now())),
    )
}

pub(super) fn registration_service(store: Arc<InMemoryStore>) -> RegistrationService<InMemoryStore> {
    RegistrationService::new(store, Arc::new(FixedClock(now())))
}

pub(super) fn recovery_service<N: NotificationService + 'static>(
    store: Arc<InMemoryStore>,
    notifier: Arc<N>,
) -> RecoveryService<InMemoryStore, N> {
    RecoveryService::new(
        store,
        notifier,
        accounts(),
        messaging(),
        Arc::new(FixedClock(now())),
    )
}

pub(super) fn outbox_service() -> (
    Arc<InMemoryStore>,
    Arc<OutboxNotifier>,
    UserService<InMemoryStore, OutboxNotifier>,
) {
    let store = Arc::new(InMemoryStore::default());
    let notifier = Arc::new(OutboxNotifier::default());
    let service = user_service(store.clone(), notifier.clone());
    (store, notifier, service)
}

/// Gateway that refuses every message.
pub(super) struct UnreachableGateway;

impl NotificationService for UnreachableGateway {
    fn send_message(&self, _message: MessageCommand) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("connection refused".to_string()))
    }
}
