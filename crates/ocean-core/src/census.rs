//! Population and mortality bookkeeping.

use crate::types::{DeathCause, Species};
use serde::{Deserialize, Serialize};

/// Living fish per species
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub groper: usize,
    pub herring: usize,
    pub shark: usize,
}

impl PopulationCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, species: Species) {
        *self.slot(species) += 1;
    }

    pub fn get(&self, species: Species) -> usize {
        match species {
            Species::Groper => self.groper,
            Species::Herring => self.herring,
            Species::Shark => self.shark,
        }
    }

    pub fn total(&self) -> usize {
        self.groper + self.herring + self.shark
    }

    /// Number of species with at least one living fish
    pub fn species_present(&self) -> usize {
        Species::ALL.iter().filter(|s| self.get(**s) > 0).count()
    }

    fn slot(&mut self, species: Species) -> &mut usize {
        match species {
            Species::Groper => &mut self.groper,
            Species::Herring => &mut self.herring,
            Species::Shark => &mut self.shark,
        }
    }
}

impl FromIterator<Species> for PopulationCounts {
    fn from_iter<I: IntoIterator<Item = Species>>(iter: I) -> Self {
        let mut counts = Self::new();
        for species in iter {
            counts.add(species);
        }
        counts
    }
}

/// Deaths broken down by cause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathTally {
    pub eaten: u64,
    pub starvation: u64,
    pub old_age: u64,
    pub overcrowding: u64,
}

impl DeathTally {
    pub fn record(&mut self, cause: DeathCause) {
        match cause {
            DeathCause::Eaten => self.eaten += 1,
            DeathCause::Starvation => self.starvation += 1,
            DeathCause::OldAge => self.old_age += 1,
            DeathCause::Overcrowding => self.overcrowding += 1,
        }
    }

    pub fn get(&self, cause: DeathCause) -> u64 {
        match cause {
            DeathCause::Eaten => self.eaten,
            DeathCause::Starvation => self.starvation,
            DeathCause::OldAge => self.old_age,
            DeathCause::Overcrowding => self.overcrowding,
        }
    }

    pub fn total(&self) -> u64 {
        self.eaten + self.starvation + self.old_age + self.overcrowding
    }
}

/// Births and deaths of one species over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCensus {
    pub born: u64,
    pub deaths: DeathTally,
}

/// Cumulative births and deaths across a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub groper: SpeciesCensus,
    pub herring: SpeciesCensus,
    pub shark: SpeciesCensus,
}

impl Census {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_birth(&mut self, species: Species) {
        self.species_mut(species).born += 1;
    }

    pub fn record_death(&mut self, species: Species, cause: DeathCause) {
        self.species_mut(species).deaths.record(cause);
    }

    pub fn species(&self, species: Species) -> &SpeciesCensus {
        match species {
            Species::Groper => &self.groper,
            Species::Herring => &self.herring,
            Species::Shark => &self.shark,
        }
    }

    pub fn total_births(&self) -> u64 {
        Species::ALL.iter().map(|s| self.species(*s).born).sum()
    }

    pub fn total_deaths(&self) -> u64 {
        Species::ALL.iter().map(|s| self.species(*s).deaths.total()).sum()
    }

    /// Deaths of every species from one cause
    pub fn deaths_by(&self, cause: DeathCause) -> u64 {
        Species::ALL
            .iter()
            .map(|s| self.species(*s).deaths.get(cause))
            .sum()
    }

    fn species_mut(&mut self, species: Species) -> &mut SpeciesCensus {
        match species {
            Species::Groper => &mut self.groper,
            Species::Herring => &mut self.herring,
            Species::Shark => &mut self.shark,
        }
    }
}
