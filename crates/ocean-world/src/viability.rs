//! Predicates a driver uses to decide whether a run is still worth continuing.

use crate::grid::Grid;
use ocean_core::PopulationCounts;
use serde::{Deserialize, Serialize};

pub trait Viability {
    fn is_viable(&self, grid: &Grid, population: &PopulationCounts) -> bool;
}

impl<F> Viability for F
where
    F: Fn(&Grid, &PopulationCounts) -> bool,
{
    fn is_viable(&self, grid: &Grid, population: &PopulationCounts) -> bool {
        self(grid, population)
    }
}

/// Viable while at least `min_species` species have a living member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesDiversity {
    pub min_species: usize,
}

impl Default for SpeciesDiversity {
    fn default() -> Self {
        Self { min_species: 2 }
    }
}

impl Viability for SpeciesDiversity {
    fn is_viable(&self, _grid: &Grid, population: &PopulationCounts) -> bool {
        population.species_present() >= self.min_species
    }
}

/// Never stops a run
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl Viability for Always {
    fn is_viable(&self, _grid: &Grid, _population: &PopulationCounts) -> bool {
        true
    }
}
