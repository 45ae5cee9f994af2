use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use tracing::debug;

use super::{RepositoryError, TransactionManager};
use crate::workflows::accounts::{
    NewUser, RegistrationCode, RegistrationCodeRepository, User, UserId, UserRepository,
};
use crate::workflows::pets::{
    Breed, BreedId, BreedRepository, NewPet, NewPetLog, NewVaccination, Pet, PetId, PetLog,
    PetLogId, PetLogRepository, PetRepository, PetStatus, PetUuid, Vaccination, VaccinationId,
    VaccinationRepository,
};

#[derive(Debug, Clone, Default)]
struct StoreState {
    pets: BTreeMap<PetId, Pet>,
    vaccinations: BTreeMap<VaccinationId, Vaccination>,
    pet_logs: BTreeMap<PetLogId, PetLog>,
    breeds: BTreeMap<BreedId, Breed>,
    users: BTreeMap<UserId, User>,
    codes: BTreeMap<String, RegistrationCode>,
    last_pet_id: u64,
    last_vaccination_id: u64,
    last_pet_log_id: u64,
    last_user_id: u64,
}

#[derive(Debug)]
struct OpenTransaction {
    owner: ThreadId,
    snapshot: StoreState,
}

#[derive(Debug, Default)]
struct Shared {
    state: StoreState,
    transaction: Option<OpenTransaction>,
}

/// Process-local store implementing every repository contract.
///
/// A transaction belongs to the thread that began it. Until it commits or rolls back, every
/// other thread blocks on its first store call, so a rollback only ever discards the owner's
/// own writes. A thread holds at most one transaction at a time.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    shared: Mutex<Shared>,
    released: Condvar,
}

/// Lock on the store state, held only while no other thread owns a transaction.
struct StateGuard<'a>(MutexGuard<'a, Shared>);

impl Deref for StateGuard<'_> {
    type Target = StoreState;

    fn deref(&self) -> &StoreState {
        &self.0.state
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut StoreState {
        &mut self.0.state
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("store lock poisoned".to_string())
}

impl InMemoryStore {
    pub fn with_breeds<I>(breeds: I) -> Self
    where
        I: IntoIterator<Item = Breed>,
    {
        let state = StoreState {
            breeds: breeds.into_iter().map(|breed| (breed.id, breed)).collect(),
            ..StoreState::default()
        };
        Self {
            shared: Mutex::new(Shared {
                state,
                transaction: None,
            }),
            released: Condvar::new(),
        }
    }

    pub fn pet_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.state()?.pets.len())
    }

    pub fn vaccination_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.state()?.vaccinations.len())
    }

    /// Whether the calling thread has a transaction open.
    pub fn in_transaction(&self) -> Result<bool, RepositoryError> {
        Ok(self.shared()?.transaction.is_some())
    }

    fn state(&self) -> Result<StateGuard<'_>, RepositoryError> {
        self.shared().map(StateGuard)
    }

    /// Lock the shared state, waiting while a transaction owned by another thread is open.
    /// Any transaction still present on return belongs to the caller.
    fn shared(&self) -> Result<MutexGuard<'_, Shared>, RepositoryError> {
        let caller = thread::current().id();
        let guard = self.shared.lock().map_err(poisoned)?;
        self.released
            .wait_while(guard, |shared| {
                shared
                    .transaction
                    .as_ref()
                    .is_some_and(|open| open.owner != caller)
            })
            .map_err(poisoned)
    }

    fn finish(&self, restore: bool) -> Result<(), RepositoryError> {
        let mut shared = self.shared()?;
        let open = shared
            .transaction
            .take()
            .ok_or(RepositoryError::NoTransaction)?;
        if restore {
            shared.state = open.snapshot;
        }
        drop(shared);
        self.released.notify_all();
        Ok(())
    }
}

impl TransactionManager for InMemoryStore {
    fn begin(&self) -> Result<(), RepositoryError> {
        let mut shared = self.shared()?;
        if shared.transaction.is_some() {
            return Err(RepositoryError::TransactionActive);
        }
        let owner = thread::current().id();
        let snapshot = shared.state.clone();
        shared.transaction = Some(OpenTransaction { owner, snapshot });
        debug!(?owner, "transaction opened");
        Ok(())
    }

    fn commit(&self) -> Result<(), RepositoryError> {
        self.finish(false)
    }

    fn rollback(&self) -> Result<(), RepositoryError> {
        self.finish(true)
    }
}

impl PetRepository for InMemoryStore {
    fn insert_pet(&self, pet: NewPet) -> Result<Pet, RepositoryError> {
        let mut state = self.state()?;
        if state.pets.values().any(|stored| stored.uuid == pet.uuid) {
            return Err(RepositoryError::Conflict);
        }
        state.last_pet_id += 1;
        let pet = pet.with_id(PetId(state.last_pet_id));
        state.pets.insert(pet.id, pet.clone());
        Ok(pet)
    }

    fn update_pet(&self, pet: Pet) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        match state.pets.get_mut(&pet.id) {
            Some(stored) => {
                *stored = pet;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn find_pet(&self, id: PetId) -> Result<Option<Pet>, RepositoryError> {
        Ok(self.state()?.pets.get(&id).cloned())
    }

    fn find_pet_by_uuid(&self, uuid: &PetUuid) -> Result<Option<Pet>, RepositoryError> {
        Ok(self
            .state()?
            .pets
            .values()
            .find(|pet| &pet.uuid == uuid)
            .cloned())
    }

    fn pets_by_owner(&self, owner: UserId) -> Result<Vec<Pet>, RepositoryError> {
        Ok(self
            .state()?
            .pets
            .values()
            .filter(|pet| pet.owner == owner)
            .cloned()
            .collect())
    }

    fn pets_by_adopter(&self, adopter: UserId) -> Result<Vec<Pet>, RepositoryError> {
        Ok(self
            .state()?
            .pets
            .values()
            .filter(|pet| pet.adopter == Some(adopter))
            .cloned()
            .collect())
    }

    fn pets_by_status(&self, status: PetStatus) -> Result<Vec<Pet>, RepositoryError> {
        Ok(self
            .state()?
            .pets
            .values()
            .filter(|pet| pet.status == status)
            .cloned()
            .collect())
    }

    fn delete_pet(&self, id: PetId) -> Result<(), RepositoryError> {
        self.state()?
            .pets
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

impl VaccinationRepository for InMemoryStore {
    fn insert_vaccination(
        &self,
        vaccination: NewVaccination,
    ) -> Result<Vaccination, RepositoryError> {
        let mut state = self.state()?;
        state.last_vaccination_id += 1;
        let row = Vaccination {
            id: VaccinationId(state.last_vaccination_id),
            name: vaccination.name,
            date: vaccination.date,
            status: vaccination.status,
            pet: vaccination.pet,
        };
        state.vaccinations.insert(row.id, row.clone());
        Ok(row)
    }

    fn vaccinations_by_pet(&self, pet: PetId) -> Result<Vec<Vaccination>, RepositoryError> {
        Ok(self
            .state()?
            .vaccinations
            .values()
            .filter(|row| row.pet == pet)
            .cloned()
            .collect())
    }

    fn delete_vaccinations_by_pet(&self, pet: PetId) -> Result<(), RepositoryError> {
        self.state()?.vaccinations.retain(|_, row| row.pet != pet);
        Ok(())
    }
}

impl PetLogRepository for InMemoryStore {
    fn insert_pet_log(&self, log: NewPetLog) -> Result<PetLog, RepositoryError> {
        let mut state = self.state()?;
        if state.pet_logs.values().any(|stored| stored.uuid == log.uuid) {
            return Err(RepositoryError::Conflict);
        }
        state.last_pet_log_id += 1;
        let log = log.with_id(PetLogId(state.last_pet_log_id));
        state.pet_logs.insert(log.id, log.clone());
        Ok(log)
    }

    fn pet_logs_by_pet(&self, pet: PetId) -> Result<Vec<PetLog>, RepositoryError> {
        Ok(self
            .state()?
            .pet_logs
            .values()
            .filter(|log| log.pet == pet)
            .cloned()
            .collect())
    }

    fn delete_pet_logs_by_pet(&self, pet: PetId) -> Result<(), RepositoryError> {
        self.state()?.pet_logs.retain(|_, log| log.pet != pet);
        Ok(())
    }
}

impl BreedRepository for InMemoryStore {
    fn find_breed(&self, id: BreedId) -> Result<Option<Breed>, RepositoryError> {
        Ok(self.state()?.breeds.get(&id).cloned())
    }

    fn breeds(&self) -> Result<Vec<Breed>, RepositoryError> {
        Ok(self.state()?.breeds.values().cloned().collect())
    }
}

impl UserRepository for InMemoryStore {
    fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut state = self.state()?;
        if state
            .users
            .values()
            .any(|stored| stored.username == user.username)
        {
            return Err(RepositoryError::Conflict);
        }
        state.last_user_id += 1;
        let user = user.with_id(UserId(state.last_user_id));
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn update_user(&self, user: User) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        match state.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn find_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.state()?.users.get(&id).cloned())
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn find_user_by_mobile(&self, mobile: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|user| user.mobile.as_deref() == Some(mobile))
            .cloned())
    }
}

impl RegistrationCodeRepository for InMemoryStore {
    fn insert_code(&self, code: RegistrationCode) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        if state.codes.contains_key(&code.token) {
            return Err(RepositoryError::Conflict);
        }
        state.codes.insert(code.token.clone(), code);
        Ok(())
    }

    fn find_code(&self, token: &str) -> Result<Option<RegistrationCode>, RepositoryError> {
        Ok(self.state()?.codes.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::pets::{Species, VaccinationStatus};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn breed() -> Breed {
        Breed {
            id: BreedId(1),
            name: "Beagle".to_string(),
            species: Species::Dog,
        }
    }

    fn vaccination(pet: u64) -> NewVaccination {
        NewVaccination {
            name: "Rabies".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid"),
            status: VaccinationStatus::Pending,
            pet: PetId(pet),
        }
    }

    fn pet_log(uuid: &str, pet: u64) -> NewPetLog {
        NewPetLog {
            uuid: uuid.to_string(),
            vet_name: None,
            signs: "Cough".to_string(),
            diagnosis: "Kennel cough".to_string(),
            medicine: "Doxycycline".to_string(),
            pet: PetId(pet),
            date_created: NaiveDate::from_ymd_opt(2026, 1, 1)
                .and_then(|date| date.and_hms_opt(8, 0, 0))
                .expect("valid"),
        }
    }

    #[test]
    fn rollback_restores_state_from_begin() {
        let store = InMemoryStore::with_breeds([breed()]);
        store.insert_vaccination(vaccination(1)).expect("insert");

        store.begin().expect("begin");
        store.insert_vaccination(vaccination(1)).expect("insert");
        store.delete_vaccinations_by_pet(PetId(1)).expect("delete");
        assert_eq!(store.vaccination_count().expect("count"), 0);
        store.rollback().expect("rollback");

        assert_eq!(store.vaccination_count().expect("count"), 1);
        assert!(!store.in_transaction().expect("flag"));
    }

    #[test]
    fn commit_keeps_changes_and_closes_transaction() {
        let store = InMemoryStore::default();
        store.begin().expect("begin");
        store.insert_vaccination(vaccination(2)).expect("insert");
        store.commit().expect("commit");

        assert_eq!(store.vaccination_count().expect("count"), 1);
        assert!(matches!(store.commit(), Err(RepositoryError::NoTransaction)));
    }

    #[test]
    fn nested_begin_on_the_same_thread_is_rejected() {
        let store = InMemoryStore::default();
        store.begin().expect("begin");
        assert!(matches!(store.begin(), Err(RepositoryError::TransactionActive)));
    }

    #[test]
    fn other_threads_wait_for_an_open_transaction() {
        let store = InMemoryStore::default();
        store.begin().expect("begin");
        store.insert_vaccination(vaccination(1)).expect("insert");

        thread::scope(|scope| {
            let writer = scope.spawn(|| {
                store.begin()?;
                let row = store.insert_vaccination(vaccination(2))?;
                store.commit()?;
                Ok::<_, RepositoryError>(row)
            });
            thread::sleep(Duration::from_millis(50));
            assert!(!writer.is_finished(), "writer should block until commit");

            store.commit().expect("commit");
            let row = writer
                .join()
                .expect("writer thread")
                .expect("writer transaction");
            assert_eq!(row.id, VaccinationId(2));
        });

        assert_eq!(store.vaccination_count().expect("count"), 2);
    }

    #[test]
    fn rollback_keeps_writes_from_other_threads() {
        let store = InMemoryStore::default();
        store.begin().expect("begin");
        store.insert_vaccination(vaccination(1)).expect("insert");

        thread::scope(|scope| {
            let writer = scope.spawn(|| store.insert_pet_log(pet_log("note-1", 7)));
            thread::sleep(Duration::from_millis(50));
            store.rollback().expect("rollback");
            writer
                .join()
                .expect("writer thread")
                .expect("log stored after rollback");
        });

        assert_eq!(store.vaccination_count().expect("count"), 0);
        assert_eq!(store.pet_logs_by_pet(PetId(7)).expect("logs").len(), 1);
    }

    #[test]
    fn pet_logs_are_listed_and_deleted_per_pet() {
        let store = InMemoryStore::default();
        store.insert_pet_log(pet_log("a", 1)).expect("insert");
        store.insert_pet_log(pet_log("b", 1)).expect("insert");
        store.insert_pet_log(pet_log("c", 2)).expect("insert");
        assert!(matches!(
            store.insert_pet_log(pet_log("a", 2)),
            Err(RepositoryError::Conflict)
        ));

        store.delete_pet_logs_by_pet(PetId(1)).expect("delete");

        assert!(store.pet_logs_by_pet(PetId(1)).expect("logs").is_empty());
        let remaining = store.pet_logs_by_pet(PetId(2)).expect("logs");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, PetLogId(3));
    }

    #[test]
    fn breeds_are_seeded() {
        let store = InMemoryStore::with_breeds([breed()]);
        assert_eq!(store.find_breed(BreedId(1)).expect("lookup"), Some(breed()));
        assert_eq!(store.find_breed(BreedId(2)).expect("lookup"), None);
        assert_eq!(store.breeds().expect("catalog"), vec![breed()]);
    }
}
