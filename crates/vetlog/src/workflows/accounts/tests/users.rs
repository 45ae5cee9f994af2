use std::sync::{Arc, Mutex};

use super::common::*;
use crate::store::InMemoryStore;
use crate::workflows::accounts::{Role, UserCommand, UserRepository};
use crate::workflows::error::{BusinessError, ServiceError};
use crate::workflows::notification::{MessageCommand, NotificationError, NotificationService};

/// Gateway noting whether each recipient was already stored when its message went out.
struct StoreWitness {
    store: Arc<InMemoryStore>,
    seen: Mutex<Vec<bool>>,
}

impl NotificationService for StoreWitness {
    fn send_message(&self, message: MessageCommand) -> Result<(), NotificationError> {
        let stored = self
            .store
            .find_user_by_email(&message.email)
            .map_err(|err| NotificationError::Transport(err.to_string()))?
            .is_some();
        self.seen.lock().expect("witness mutex poisoned").push(stored);
        Ok(())
    }
}

#[test]
fn register_enables_allowed_countries_and_sends_welcome() {
    let (_store, notifier, service) = outbox_service();

    let user = service
        .register(command("josue", "josue@example.com", "mx"))
        .expect("user registered");

    assert!(user.enabled);
    assert_eq!(user.role, Role::User);
    assert_eq!(user.country_code, "MX");
    assert_eq!(user.date_created, now());
    assert!(user.password_hash.verify("correct horse"));

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].email, "josue@example.com");
    assert_eq!(messages[0].name, "Josué");
    assert_eq!(messages[0].template, "welcome");
    assert_eq!(messages[0].token, "secret");
}

#[test]
fn register_disables_other_countries_without_welcome() {
    let (_store, notifier, service) = outbox_service();

    let user = service
        .register(command("ana", "ana@example.com", "BR"))
        .expect("user registered");

    assert!(!user.enabled);
    assert!(notifier.messages().is_empty());
}

#[test]
fn welcome_failure_is_a_business_error_and_nothing_is_stored() {
    let store = Arc::new(InMemoryStore::default());
    let service = user_service(store.clone(), Arc::new(UnreachableGateway));

    let result = service.register(command("josue", "josue@example.com", "US"));

    match result {
        Err(ServiceError::Business(BusinessError::NotificationFailed(reason))) => {
            assert!(reason.contains("connection refused"))
        }
        other => panic!("expected notification failure, got {other:?}"),
    }
    assert!(matches!(
        service.by_username("josue"),
        Err(ServiceError::UserNotFound(_))
    ));
}

#[test]
fn welcome_is_sent_once_the_account_is_stored() {
    let store = Arc::new(InMemoryStore::default());
    let witness = Arc::new(StoreWitness {
        store: store.clone(),
        seen: Mutex::new(Vec::new()),
    });
    let service = user_service(store, witness.clone());

    service
        .register(command("josue", "josue@example.com", "US"))
        .expect("registered");

    assert_eq!(*witness.seen.lock().expect("witness mutex poisoned"), [true]);
}

#[test]
fn register_validates_before_touching_the_store() {
    let (_store, notifier, service) = outbox_service();

    let mismatch = service.register(UserCommand {
        password_confirmation: "battery staple".to_string(),
        ..command("josue", "josue@example.com", "US")
    });
    let bad_mobile = service.register(UserCommand {
        mobile: "55-1234".to_string(),
        ..command("josue", "josue@example.com", "US")
    });

    assert!(matches!(
        mismatch,
        Err(ServiceError::Business(BusinessError::PasswordMismatch))
    ));
    assert!(matches!(
        bad_mobile,
        Err(ServiceError::Business(BusinessError::InvalidMobile))
    ));
    assert!(notifier.messages().is_empty());
}

#[test]
fn register_rejects_duplicates() {
    let (_store, _notifier, service) = outbox_service();
    service
        .register(command("josue", "josue@example.com", "US"))
        .expect("first registration");

    let same_username = service.register(command("josue", "other@example.com", "US"));
    let same_email = service.register(command("other", "josue@example.com", "US"));

    assert!(matches!(
        same_username,
        Err(ServiceError::Business(BusinessError::DuplicatedUsername(name))) if name == "josue"
    ));
    assert!(matches!(
        same_email,
        Err(ServiceError::Business(BusinessError::DuplicatedEmail(email))) if email == "josue@example.com"
    ));
}

#[test]
fn lookups_fall_back_and_report_missing_users() {
    let (_store, _notifier, service) = outbox_service();
    let user = service
        .register(command("josue", "josue@example.com", "US"))
        .expect("registered");

    assert_eq!(service.by_username("josue").expect("by username").id, user.id);
    assert_eq!(service.by_username("5598765432").expect("by mobile").id, user.id);
    assert_eq!(service.by_email("josue@example.com").expect("by email").id, user.id);
    assert_eq!(service.by_mobile("5598765432").expect("by mobile").id, user.id);

    match service.by_email("nobody@example.com") {
        Err(ServiceError::UserNotFound(err)) => {
            assert_eq!(err.to_string(), "user with email: nobody@example.com not found")
        }
        other => panic!("expected user not found, got {other:?}"),
    }
}
