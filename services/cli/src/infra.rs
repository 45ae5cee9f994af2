use chrono::{NaiveDate, NaiveDateTime};
use vetlog::workflows::pets::{Breed, BreedId, Species};

pub(crate) const LABRADOR: BreedId = BreedId(1);
pub(crate) const SIAMESE: BreedId = BreedId(2);

/// Reference breeds loaded into the demo store.
pub(crate) fn demo_breeds() -> Vec<Breed> {
    vec![
        Breed {
            id: LABRADOR,
            name: "Labrador Retriever".to_string(),
            species: Species::Dog,
        },
        Breed {
            id: SIAMESE,
            name: "Siamese".to_string(),
            species: Species::Cat,
        },
        Breed {
            id: BreedId(3),
            name: "Cockatiel".to_string(),
            species: Species::Bird,
        },
    ]
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_species(raw: &str) -> Result<Species, String> {
    Species::parse(raw).ok_or_else(|| format!("unknown species '{raw}' (dog, cat, bird, other)"))
}

/// Noon on `date`, so whole-week ages don't depend on the hour the command runs.
pub(crate) fn at_noon(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(12, 0, 0).unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN))
}
