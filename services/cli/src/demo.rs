use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use clap::Args;
use tracing::info;
use vetlog::config::AppConfig;
use vetlog::error::AppError;
use vetlog::store::InMemoryStore;
use vetlog::workflows::accounts::{
    ChangePasswordCommand, RecoveryService, RegistrationService, User, UserCommand, UserService,
};
use vetlog::workflows::pets::vaccination::localized_vaccine_name;
use vetlog::workflows::pets::{
    AdoptionCommand, AdoptionService, BreedId, BreedRepository, PetCommand, PetLogCommand,
    PetLogService, PetService, TelephoneCommand, VaccinationStrategies,
};
use vetlog::workflows::{Clock, FixedClock, OutboxNotifier, ServiceError, SystemClock};

use crate::infra::{at_noon, demo_breeds, parse_date, LABRADOR, SIAMESE};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date the demo runs on (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Language for vaccine names (en, es)
    #[arg(long, default_value = "en")]
    pub(crate) lang: String,
    /// Country code used for the adopter account; outside the allow-list it must be confirmed.
    #[arg(long, default_value = "BR")]
    pub(crate) adopter_country: String,
}

pub(crate) fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| SystemClock.today());
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(at_noon(today)));
    let store = Arc::new(InMemoryStore::with_breeds(demo_breeds()));
    let notifier = Arc::new(OutboxNotifier::default());

    let users = UserService::new(
        store.clone(),
        notifier.clone(),
        config.accounts.clone(),
        config.messaging.clone(),
        clock.clone(),
    );
    let registrations = RegistrationService::new(store.clone(), clock.clone());
    let recovery = RecoveryService::new(
        store.clone(),
        notifier.clone(),
        config.accounts.clone(),
        config.messaging.clone(),
        clock.clone(),
    );
    let logs = PetLogService::new(store.clone(), clock.clone());
    let pets = PetService::new(store.clone(), VaccinationStrategies::default(), clock.clone());
    let adoptions = AdoptionService::new(store.clone(), notifier.clone(), config.messaging.clone());

    println!("Vetlog demo ({today})");

    println!("\nBreeds");
    for breed in store.breeds().map_err(ServiceError::from)? {
        println!("- #{} {} ({})", breed.id, breed.name, breed.species);
    }

    println!("\nAccounts");
    let owner = users.register(account("maria", "maria@example.com", "5511112222", "US"))?;
    print_account(&owner);
    let mut adopter = users.register(account(
        "diego",
        "diego@example.com",
        "5533334444",
        &args.adopter_country,
    ))?;
    print_account(&adopter);
    if !adopter.enabled {
        let token = registrations.generate_token(&adopter.email)?;
        adopter = registrations.confirm(&token)?;
        println!("  confirmed {} with token {token}", adopter.username);
    }

    let token = recovery.generate_registration_code_for_email(&owner.email)?;
    recovery.change_password(ChangePasswordCommand {
        token: token.clone(),
        password: "new-demo-password".to_string(),
        password_confirmation: "new-demo-password".to_string(),
    })?;
    println!("  {} reset their password with token {token}", owner.username);

    println!("\nPet registration");
    let luna = pets.create(pet("Luna", LABRADOR, today, 14), &owner)?;
    let michi = pets.create(pet("Michi", SIAMESE, today, 6), &owner)?;
    for registered in [&luna, &michi] {
        let vaccinations = pets.vaccinations().vaccinations_by_pet(registered)?;
        println!(
            "- {} ({}, {}) -> {} vaccines pending",
            registered.name,
            registered.breed.name,
            registered.species(),
            vaccinations.len()
        );
        for vaccination in vaccinations {
            println!(
                "    {} due {}",
                localized_vaccine_name(&vaccination.name, &args.lang),
                vaccination.date
            );
        }
    }
    match pets.create(pet("Kiwi", BreedId(3), today, 20), &owner) {
        Ok(pet) => println!("- {} registered", pet.name),
        Err(err) => println!("- Kiwi rejected: {err}"),
    }

    println!("\nVet log");
    logs.save(PetLogCommand {
        pet: michi.id,
        vet_name: Some("Dr. Ruiz".to_string()),
        signs: "Sneezing".to_string(),
        diagnosis: "Mild upper respiratory infection".to_string(),
        medicine: "Saline drops".to_string(),
        uuid: None,
    })?;
    for log in logs.pet_logs_by_pet(&michi)? {
        println!("- {}: {} -> {}", michi.name, log.signs, log.diagnosis);
    }

    println!("\nAdoption");
    let listing = adoptions.request_adoption(AdoptionCommand {
        uuid: luna.uuid.to_string(),
        description: "Loves long walks and is great with kids".to_string(),
    })?;
    println!("- {} listed: {}", luna.name, listing.description);
    if let Err(err) = pets.delete(luna.id) {
        println!("- delete refused: {err}");
    }

    let adopted = adoptions.finalize_adoption(
        TelephoneCommand {
            uuid: luna.uuid.to_string(),
            mobile: "5533334444".to_string(),
        },
        &adopter,
    )?;
    info!(pet = %adopted.uuid, "demo adoption complete");
    println!("- {} is now {}", adopted.name, adopted.status);

    println!("\nPets by account");
    for user in [&owner, &adopter] {
        let names: Vec<String> = pets
            .pets_by_owner(user)?
            .into_iter()
            .map(|pet| pet.name)
            .collect();
        println!("- {}: {}", user.username, names.join(", "));
    }

    println!("\nOutbox");
    for message in notifier.messages() {
        println!(
            "- [{}] to {} about {}",
            message.template, message.email, message.name
        );
    }

    Ok(())
}

fn account(username: &str, email: &str, mobile: &str, country: &str) -> UserCommand {
    UserCommand {
        username: username.to_string(),
        password: "demo-password".to_string(),
        password_confirmation: "demo-password".to_string(),
        first_name: capitalize(username),
        last_name: "Demo".to_string(),
        email: email.to_string(),
        mobile: mobile.to_string(),
        country_code: country.to_string(),
    }
}

fn pet(name: &str, breed: BreedId, today: NaiveDate, weeks: i64) -> PetCommand {
    PetCommand {
        name: name.to_string(),
        birth_date: (today - Duration::weeks(weeks)).format("%Y-%m-%d").to_string(),
        breed,
        ..PetCommand::default()
    }
}

fn print_account(user: &User) {
    let state = if user.enabled {
        "enabled"
    } else {
        "awaiting confirmation"
    };
    println!(
        "- {} ({}, {}) {state}",
        user.full_name(),
        user.email,
        user.country_code
    );
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
