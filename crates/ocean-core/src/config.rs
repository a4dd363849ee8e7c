//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::Species;
use serde::{Deserialize, Serialize};

/// Hunger gained by every fish each tick
pub const HUNGER_PER_TICK: i32 = 10;
/// Plankton a herring needs under it to feed, and the amount it takes
pub const HERRING_MEAL: f32 = 2.0;
/// Hunger relieved by a plankton meal
pub const HERRING_MEAL_RELIEF: i32 = 30;
/// Hunger relieved when a groper eats a herring
pub const GROPER_MEAL_RELIEF: i32 = 50;
/// Hunger relieved when a shark eats a herring
pub const SHARK_HERRING_RELIEF: i32 = 25;
/// Hunger relieved when a shark eats a groper
pub const SHARK_GROPER_RELIEF: i32 = 50;

/// Life history constants for one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesParams {
    /// Chance of breeding in a tick once old enough (0.0 to 1.0)
    pub breeding_probability: f64,
    /// Upper bound of a litter
    pub max_litter_size: u32,
    /// Mean lifespan; each fish jitters this by 80%..120% at birth
    pub average_max_age: u32,
    /// Minimum age to breed
    pub breeding_age: u32,
    /// Highest hunger tolerated before starving
    pub stamina: i32,
}

impl SpeciesParams {
    pub fn groper() -> Self {
        Self {
            breeding_probability: 0.03,
            max_litter_size: 3,
            average_max_age: 100,
            breeding_age: 5,
            stamina: 100,
        }
    }

    pub fn herring() -> Self {
        Self {
            breeding_probability: 0.1,
            max_litter_size: 4,
            average_max_age: 50,
            breeding_age: 5,
            stamina: 50,
        }
    }

    pub fn shark() -> Self {
        Self {
            breeding_probability: 0.009,
            max_litter_size: 2,
            average_max_age: 150,
            breeding_age: 8,
            stamina: 300,
        }
    }

    fn validate(&self, species: Species) -> Result<()> {
        if !(0.0..=1.0).contains(&self.breeding_probability) {
            return Err(Error::Validation(format!(
                "{} breeding probability {} is outside [0, 1]",
                species, self.breeding_probability
            )));
        }
        if self.max_litter_size == 0 {
            return Err(Error::Validation(format!(
                "{} max litter size must be at least 1",
                species
            )));
        }
        if self.average_max_age == 0 {
            return Err(Error::Validation(format!(
                "{} average max age must be at least 1",
                species
            )));
        }
        Ok(())
    }
}

/// Per-species parameter table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesTable {
    pub groper: SpeciesParams,
    pub herring: SpeciesParams,
    pub shark: SpeciesParams,
}

impl SpeciesTable {
    pub fn get(&self, species: Species) -> &SpeciesParams {
        match species {
            Species::Groper => &self.groper,
            Species::Herring => &self.herring,
            Species::Shark => &self.shark,
        }
    }

    pub fn get_mut(&mut self, species: Species) -> &mut SpeciesParams {
        match species {
            Species::Groper => &mut self.groper,
            Species::Herring => &mut self.herring,
            Species::Shark => &mut self.shark,
        }
    }
}

impl Default for SpeciesTable {
    fn default() -> Self {
        Self {
            groper: SpeciesParams::groper(),
            herring: SpeciesParams::herring(),
            shark: SpeciesParams::shark(),
        }
    }
}

/// Behavior switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureToggles {
    /// Herring steer towards where a neighboring herring is heading
    pub herring_grouping: bool,
    /// Herring repeat their previous move when nothing better is on offer
    pub herring_direction: bool,
    /// Sharks prefer cells far from other sharks
    pub shark_avoidance: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            herring_grouping: true,
            herring_direction: true,
            shark_avoidance: true,
        }
    }
}

/// Plankton parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Plankton in every cell when a grid is built
    pub initial_plankton: f32,
    /// Regeneration cap
    pub max_plankton: f32,
    /// Plankton added to every cell per tick
    pub plankton_regen: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            initial_plankton: 4.0,
            max_plankton: 10.0,
            plankton_regen: 0.1,
        }
    }
}

/// Initial population parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedingConfig {
    /// Per-cell spawn chance, tried first
    pub shark_probability: f64,
    /// Per-cell spawn chance, tried when no shark spawned
    pub herring_probability: f64,
    /// Per-cell spawn chance, tried last
    pub groper_probability: f64,
    /// Give seeded fish a random age below their max age
    pub random_initial_age: bool,
}

impl SeedingConfig {
    pub fn probability(&self, species: Species) -> f64 {
        match species {
            Species::Groper => self.groper_probability,
            Species::Herring => self.herring_probability,
            Species::Shark => self.shark_probability,
        }
    }
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            shark_probability: 0.0015,
            herring_probability: 0.004,
            groper_probability: 0.0015,
            random_initial_age: true,
        }
    }
}

/// Everything needed to build a simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Rows in each grid
    pub height: i32,
    /// Columns in each grid
    pub width: i32,
    /// Random seed for reproducibility
    pub seed: u64,
    pub species: SpeciesTable,
    pub features: FeatureToggles,
    pub environment: EnvironmentConfig,
    pub seeding: SeedingConfig,
}

impl SimulationConfig {
    /// Config for a `height` x `width` ocean with default parameters
    pub fn with_size(height: i32, width: i32) -> Self {
        Self {
            height,
            width,
            ..Default::default()
        }
    }

    /// Check the config for values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.height <= 0 || self.width <= 0 {
            return Err(Error::Validation(format!(
                "grid dimensions must be positive, got {}x{}",
                self.height, self.width
            )));
        }
        if self.height.checked_mul(self.width).is_none() {
            return Err(Error::Validation(format!(
                "grid of {}x{} cells is too large",
                self.height, self.width
            )));
        }

        for species in Species::ALL {
            self.species.get(species).validate(species)?;

            let p = self.seeding.probability(species);
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::Validation(format!(
                    "{} seeding probability {} is outside [0, 1]",
                    species, p
                )));
            }
        }

        let env = &self.environment;
        let plankton = [env.max_plankton, env.initial_plankton, env.plankton_regen];
        if !plankton.iter().all(|p| p.is_finite() && *p >= 0.0) {
            return Err(Error::Validation(
                "plankton parameters must be finite and non-negative".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            height: 150,
            width: 180,
            seed: 0,
            species: SpeciesTable::default(),
            features: FeatureToggles::default(),
            environment: EnvironmentConfig::default(),
            seeding: SeedingConfig::default(),
        }
    }
}
