//! Read-only view of the ocean for renderers and external tools.

use crate::grid::Grid;
use ocean_core::{Location, PopulationCounts, Result, Species};
use serde::{Deserialize, Serialize};

/// What a single cell shows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellView {
    Rock,
    Fish { species: Species },
    Water { plankton: f32 },
}

/// The current grid at the end of a tick, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub height: i32,
    pub width: i32,
    pub cells: Vec<CellView>,
    pub population: PopulationCounts,
}

impl Snapshot {
    pub fn capture(grid: &Grid, tick: u64) -> Self {
        let mut population = PopulationCounts::new();
        let cells = grid
            .iter()
            .map(|cell| {
                if cell.has_obstacle() {
                    CellView::Rock
                } else if let Some(occupant) = cell.occupant() {
                    population.add(occupant.species);
                    CellView::Fish {
                        species: occupant.species,
                    }
                } else {
                    CellView::Water {
                        plankton: cell.plankton(),
                    }
                }
            })
            .collect();

        Self {
            tick,
            height: grid.height,
            width: grid.width,
            cells,
            population,
        }
    }

    /// View of `loc`, or `None` outside the grid
    pub fn at(&self, loc: Location) -> Option<&CellView> {
        if loc.row < 0 || loc.row >= self.height || loc.col < 0 || loc.col >= self.width {
            return None;
        }
        self.cells.get((loc.row * self.width + loc.col) as usize)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
