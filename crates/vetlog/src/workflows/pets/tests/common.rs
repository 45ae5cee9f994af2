use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::config::MessagingConfig;
use crate::store::{InMemoryStore, RepositoryError, TransactionManager};
use crate::workflows::accounts::{
    NewUser, PasswordHash, Role, User, UserId, UserRepository,
};
use crate::workflows::clock::{Clock, FixedClock};
use crate::workflows::notification::{MessageCommand, NotificationError, NotificationService};
use crate::workflows::pets::{
    AdoptionService, Breed, BreedId, BreedRepository, NewPet, NewPetLog, NewVaccination, Pet,
    PetCommand, PetId, PetLog, PetLogRepository, PetLogService, PetRepository, PetService,
    PetStatus, PetUuid, Species, Vaccination, VaccinationRepository, VaccinationStrategies,
};

pub(super) const DOG: BreedId = BreedId(1);
pub(super) const CAT: BreedId = BreedId(2);
pub(super) const BIRD: BreedId = BreedId(3);

pub(super) fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 10)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid timestamp")
}

pub(super) fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(now()))
}

pub(super) fn breeds() -> Vec<Breed> {
    vec![
        Breed {
            id: DOG,
            name: "Labrador".to_string(),
            species: Species::Dog,
        },
        Breed {
            id: CAT,
            name: "Siamese".to_string(),
            species: Species::Cat,
        },
        Breed {
            id: BIRD,
            name: "Cockatiel".to_string(),
            species: Species::Bird,
        },
    ]
}

pub(super) fn messaging() -> MessagingConfig {
    MessagingConfig {
        client_token: "token".to_string(),
        adoption_template: "adoption".to_string(),
        welcome_template: "welcome".to_string(),
        ..MessagingConfig::default()
    }
}

/// Birth date `weeks` before [`now`], in the date-only form the pet form submits.
pub(super) fn born_weeks_ago(weeks: i64) -> String {
    (now() - Duration::weeks(weeks)).format("%Y-%m-%d").to_string()
}

pub(super) fn pet_command(name: &str, breed: BreedId, weeks: i64) -> PetCommand {
    PetCommand {
        name: name.to_string(),
        birth_date: born_weeks_ago(weeks),
        breed,
        ..PetCommand::default()
    }
}

pub(super) fn user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password_hash: PasswordHash::from_password("password", 4).expect("hashed"),
        first_name: username.to_string(),
        last_name: "Tester".to_string(),
        email: email.to_string(),
        mobile: None,
        country_code: "MX".to_string(),
        role: Role::User,
        enabled: true,
        date_created: now(),
    }
}

pub(super) fn stored_user(store: &RecordingStore, username: &str, email: &str) -> User {
    store
        .insert_user(user(username, email))
        .expect("user stored")
}

/// Owner that the store has never seen.
pub(super) fn unsaved_owner() -> User {
    user("ghost", "ghost@example.com").with_id(UserId(1))
}

pub(super) struct Fixture {
    pub store: Arc<RecordingStore>,
    pub notifier: Arc<Outbox>,
    pub pets: PetService<RecordingStore>,
    pub adoptions: AdoptionService<RecordingStore, Outbox>,
    pub logs: PetLogService<RecordingStore>,
}

pub(super) fn fixture() -> Fixture {
    fixture_with(Outbox::default())
}

pub(super) fn fixture_with(notifier: Outbox) -> Fixture {
    let store = Arc::new(RecordingStore::default());
    let notifier = Arc::new(notifier);
    let pets = PetService::new(store.clone(), VaccinationStrategies::default(), clock());
    let adoptions = AdoptionService::new(store.clone(), notifier.clone(), messaging());
    let logs = PetLogService::new(store.clone(), clock());
    Fixture {
        store,
        notifier,
        pets,
        adoptions,
        logs,
    }
}

/// Store wrapper counting the writes the tests care about.
pub(super) struct RecordingStore {
    inner: InMemoryStore,
    vaccination_deletes: AtomicUsize,
    pet_log_deletes: AtomicUsize,
    pet_updates: AtomicUsize,
}

impl Default for RecordingStore {
    fn default() -> Self {
        Self {
            inner: InMemoryStore::with_breeds(breeds()),
            vaccination_deletes: AtomicUsize::new(0),
            pet_log_deletes: AtomicUsize::new(0),
            pet_updates: AtomicUsize::new(0),
        }
    }
}

impl RecordingStore {
    pub fn vaccination_deletes(&self) -> usize {
        self.vaccination_deletes.load(Ordering::SeqCst)
    }

    pub fn pet_log_deletes(&self) -> usize {
        self.pet_log_deletes.load(Ordering::SeqCst)
    }

    pub fn pet_updates(&self) -> usize {
        self.pet_updates.load(Ordering::SeqCst)
    }

    pub fn pet_count(&self) -> usize {
        self.inner.pet_count().expect("count pets")
    }

    pub fn vaccination_count(&self) -> usize {
        self.inner.vaccination_count().expect("count vaccinations")
    }
}

impl TransactionManager for RecordingStore {
    fn begin(&self) -> Result<(), RepositoryError> {
        self.inner.begin()
    }

    fn commit(&self) -> Result<(), RepositoryError> {
        self.inner.commit()
    }

    fn rollback(&self) -> Result<(), RepositoryError> {
        self.inner.rollback()
    }
}

impl PetRepository for RecordingStore {
    fn insert_pet(&self, pet: NewPet) -> Result<Pet, RepositoryError> {
        self.inner.insert_pet(pet)
    }

    fn update_pet(&self, pet: Pet) -> Result<(), RepositoryError> {
        self.pet_updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_pet(pet)
    }

    fn find_pet(&self, id: PetId) -> Result<Option<Pet>, RepositoryError> {
        self.inner.find_pet(id)
    }

    fn find_pet_by_uuid(&self, uuid: &PetUuid) -> Result<Option<Pet>, RepositoryError> {
        self.inner.find_pet_by_uuid(uuid)
    }

    fn pets_by_owner(&self, owner: UserId) -> Result<Vec<Pet>, RepositoryError> {
        self.inner.pets_by_owner(owner)
    }

    fn pets_by_adopter(&self, adopter: UserId) -> Result<Vec<Pet>, RepositoryError> {
        self.inner.pets_by_adopter(adopter)
    }

    fn pets_by_status(&self, status: PetStatus) -> Result<Vec<Pet>, RepositoryError> {
        self.inner.pets_by_status(status)
    }

    fn delete_pet(&self, id: PetId) -> Result<(), RepositoryError> {
        self.inner.delete_pet(id)
    }
}

impl VaccinationRepository for RecordingStore {
    fn insert_vaccination(
        &self,
        vaccination: NewVaccination,
    ) -> Result<Vaccination, RepositoryError> {
        self.inner.insert_vaccination(vaccination)
    }

    fn vaccinations_by_pet(&self, pet: PetId) -> Result<Vec<Vaccination>, RepositoryError> {
        self.inner.vaccinations_by_pet(pet)
    }

    fn delete_vaccinations_by_pet(&self, pet: PetId) -> Result<(), RepositoryError> {
        self.vaccination_deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_vaccinations_by_pet(pet)
    }
}

impl PetLogRepository for RecordingStore {
    fn insert_pet_log(&self, log: NewPetLog) -> Result<PetLog, RepositoryError> {
        self.inner.insert_pet_log(log)
    }

    fn pet_logs_by_pet(&self, pet: PetId) -> Result<Vec<PetLog>, RepositoryError> {
        self.inner.pet_logs_by_pet(pet)
    }

    fn delete_pet_logs_by_pet(&self, pet: PetId) -> Result<(), RepositoryError> {
        self.pet_log_deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_pet_logs_by_pet(pet)
    }
}

impl BreedRepository for RecordingStore {
    fn find_breed(&self, id: BreedId) -> Result<Option<Breed>, RepositoryError> {
        self.inner.find_breed(id)
    }

    fn breeds(&self) -> Result<Vec<Breed>, RepositoryError> {
        self.inner.breeds()
    }
}

impl UserRepository for RecordingStore {
    fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.inner.insert_user(user)
    }

    fn update_user(&self, user: User) -> Result<(), RepositoryError> {
        self.inner.update_user(user)
    }

    fn find_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.inner.find_user(id)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        self.inner.find_user_by_username(username)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.inner.find_user_by_email(email)
    }

    fn find_user_by_mobile(&self, mobile: &str) -> Result<Option<User>, RepositoryError> {
        self.inner.find_user_by_mobile(mobile)
    }
}

/// Notifier recording messages, optionally failing every delivery.
#[derive(Default)]
pub(super) struct Outbox {
    messages: std::sync::Mutex<Vec<MessageCommand>>,
    failing: bool,
}

impl Outbox {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<MessageCommand> {
        self.messages.lock().expect("outbox mutex poisoned").clone()
    }
}

impl NotificationService for Outbox {
    fn send_message(&self, message: MessageCommand) -> Result<(), NotificationError> {
        if self.failing {
            return Err(NotificationError::Transport("gateway down".to_string()));
        }
        self.messages
            .lock()
            .expect("outbox mutex poisoned")
            .push(message);
        Ok(())
    }
}
