use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::Species;

/// Vaccines that become due once a pet reaches `min_age_weeks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationStage {
    pub min_age_weeks: u32,
    pub label: String,
    pub vaccines: Vec<String>,
}

impl VaccinationStage {
    pub fn new(min_age_weeks: u32, label: &str, vaccines: &[&str]) -> Self {
        Self {
            min_age_weeks,
            label: label.to_string(),
            vaccines: vaccines.iter().map(|name| name.to_string()).collect(),
        }
    }
}

/// Cumulative age-based schedule for one species. Reaching a stage makes every
/// earlier stage's vaccines due as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationSchedule {
    stages: Vec<VaccinationStage>,
}

impl VaccinationSchedule {
    pub fn new(mut stages: Vec<VaccinationStage>) -> Self {
        stages.sort_by_key(|stage| stage.min_age_weeks);
        Self { stages }
    }

    pub fn dog() -> Self {
        Self::new(vec![
            VaccinationStage::new(8, "first", &["DA2PP", "Deworming"]),
            VaccinationStage::new(12, "second", &["Leptospirosis"]),
            VaccinationStage::new(16, "annual", &["Rabies", "Canine influenza"]),
        ])
    }

    pub fn cat() -> Self {
        Self::new(vec![
            VaccinationStage::new(8, "first", &["FVRCP", "Deworming"]),
            VaccinationStage::new(12, "second", &["FeLV"]),
            VaccinationStage::new(16, "annual", &["Rabies", "Chlamydia"]),
        ])
    }

    pub fn stages(&self) -> &[VaccinationStage] {
        &self.stages
    }

    /// Latest stage reached at `age_weeks`, if any.
    pub fn stage_for(&self, age_weeks: u32) -> Option<&VaccinationStage> {
        self.stages
            .iter()
            .take_while(|stage| stage.min_age_weeks <= age_weeks)
            .last()
    }

    pub fn vaccines_due(&self, age_weeks: u32) -> Vec<&str> {
        self.stages
            .iter()
            .take_while(|stage| stage.min_age_weeks <= age_weeks)
            .flat_map(|stage| stage.vaccines.iter().map(String::as_str))
            .collect()
    }
}

/// Species to schedule table handed to the vaccination planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationStrategies {
    schedules: BTreeMap<Species, VaccinationSchedule>,
}

impl VaccinationStrategies {
    pub fn empty() -> Self {
        Self {
            schedules: BTreeMap::new(),
        }
    }

    pub fn with(mut self, species: Species, schedule: VaccinationSchedule) -> Self {
        self.schedules.insert(species, schedule);
        self
    }

    pub fn get(&self, species: Species) -> Option<&VaccinationSchedule> {
        self.schedules.get(&species)
    }

    pub fn supported_species(&self) -> impl Iterator<Item = Species> + '_ {
        self.schedules.keys().copied()
    }
}

impl Default for VaccinationStrategies {
    fn default() -> Self {
        Self::empty()
            .with(Species::Dog, VaccinationSchedule::dog())
            .with(Species::Cat, VaccinationSchedule::cat())
    }
}
