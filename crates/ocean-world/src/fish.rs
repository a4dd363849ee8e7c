//! Fish state and the per-species factory.

use ocean_core::{AgentId, DeathCause, Location, Offset, Species, SpeciesParams};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Herring memory carried between ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerringMemory {
    /// Move made on the previous tick, if it went anywhere
    pub last_translation: Option<Offset>,
}

/// Species tag plus any species-specific state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FishKind {
    Groper,
    Herring(HerringMemory),
    Shark,
}

impl FishKind {
    /// Fresh state for a fish of `species`
    pub fn of(species: Species) -> Self {
        match species {
            Species::Groper => FishKind::Groper,
            Species::Herring => FishKind::Herring(HerringMemory::default()),
            Species::Shark => FishKind::Shark,
        }
    }

    pub fn species(&self) -> Species {
        match self {
            FishKind::Groper => Species::Groper,
            FishKind::Herring(_) => Species::Herring,
            FishKind::Shark => Species::Shark,
        }
    }
}

/// A fish in the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fish {
    pub id: AgentId,
    pub kind: FishKind,
    pub age: u32,
    /// Signed: a meal can push hunger below zero
    pub hunger: i32,
    pub max_age: u32,
    pub location: Location,
    pub death: Option<DeathCause>,
}

impl Fish {
    /// A newborn of `species`: age 0, not hungry, with its own jittered max age
    pub fn newborn<R: Rng + ?Sized>(
        id: AgentId,
        species: Species,
        location: Location,
        params: &SpeciesParams,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            kind: FishKind::of(species),
            age: 0,
            hunger: 0,
            max_age: random_max_age(params.average_max_age, rng),
            location,
            death: None,
        }
    }

    /// A fish for the initial population, optionally part way through its life
    pub fn seeded<R: Rng + ?Sized>(
        id: AgentId,
        species: Species,
        location: Location,
        params: &SpeciesParams,
        random_age: bool,
        rng: &mut R,
    ) -> Self {
        let mut fish = Self::newborn(id, species, location, params, rng);
        if random_age && fish.max_age > 0 {
            fish.age = rng.gen_range(0..fish.max_age);
        }
        fish
    }

    pub fn species(&self) -> Species {
        self.kind.species()
    }

    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    /// Mark the fish dead. The first cause sticks.
    pub fn die(&mut self, cause: DeathCause) {
        if self.death.is_none() {
            self.death = Some(cause);
        }
    }

    pub fn feed(&mut self, relief: i32) {
        self.hunger -= relief;
    }

    pub fn herring_memory(&self) -> Option<&HerringMemory> {
        match &self.kind {
            FishKind::Herring(memory) => Some(memory),
            _ => None,
        }
    }

    pub fn herring_memory_mut(&mut self) -> Option<&mut HerringMemory> {
        match &mut self.kind {
            FishKind::Herring(memory) => Some(memory),
            _ => None,
        }
    }
}

/// `average` scaled by a uniform factor in [0.8, 1.2], rounded
pub fn random_max_age<R: Rng + ?Sized>(average: u32, rng: &mut R) -> u32 {
    let factor: f64 = rng.gen_range(0.8..=1.2);
    (average as f64 * factor).round() as u32
}
