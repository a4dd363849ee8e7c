//! 2D grid of ocean cells.

use crate::cell::{Cell, Occupant};
use ocean_core::{Location, Obstacle};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A bounded rectangular grid. The simulation keeps two of these and swaps
/// their roles every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub height: i32,
    pub width: i32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(height: i32, width: i32, initial_plankton: f32) -> Self {
        assert!(
            height > 0 && width > 0,
            "grid dimensions must be positive, got {}x{}",
            height,
            width
        );

        let count = height.checked_mul(width).unwrap_or_else(|| {
            panic!("grid of {}x{} cells is too large", height, width)
        });

        let mut cells = Vec::with_capacity(count as usize);
        for row in 0..height {
            for col in 0..width {
                cells.push(Cell::new(Location::new(row, col), initial_plankton));
            }
        }

        Self {
            height,
            width,
            cells,
        }
    }

    pub fn contains(&self, loc: Location) -> bool {
        loc.row >= 0 && loc.row < self.height && loc.col >= 0 && loc.col < self.width
    }

    /// Cell at `loc`. Panics when `loc` lies outside the grid.
    pub fn cell(&self, loc: Location) -> &Cell {
        &self.cells[self.index(loc)]
    }

    /// Mutable cell at `loc`. Panics when `loc` lies outside the grid.
    pub fn cell_mut(&mut self, loc: Location) -> &mut Cell {
        let index = self.index(loc);
        &mut self.cells[index]
    }

    pub fn is_free(&self, loc: Location) -> bool {
        self.cell(loc).is_free()
    }

    pub fn occupant(&self, loc: Location) -> Option<Occupant> {
        self.cell(loc).occupant()
    }

    pub fn place_obstacle(&mut self, loc: Location, obstacle: Obstacle) {
        self.cell_mut(loc).place_obstacle(obstacle);
    }

    /// In-bounds neighbors of `loc` (diagonals included, `loc` excluded), in a
    /// freshly shuffled order on every call.
    pub fn neighbors_of<R: Rng + ?Sized>(&self, loc: Location, rng: &mut R) -> Vec<Location> {
        let mut neighbors = Vec::with_capacity(8);

        for d_row in -1..=1 {
            for d_col in -1..=1 {
                if d_row == 0 && d_col == 0 {
                    continue;
                }

                let candidate = Location::new(loc.row + d_row, loc.col + d_col);
                if self.contains(candidate) {
                    neighbors.push(candidate);
                }
            }
        }

        neighbors.shuffle(rng);
        neighbors
    }

    /// First free neighbor in shuffled order
    pub fn free_neighbor<R: Rng + ?Sized>(&self, loc: Location, rng: &mut R) -> Option<Location> {
        self.neighbors_of(loc, rng)
            .into_iter()
            .find(|n| self.is_free(*n))
    }

    /// First free neighbor, or `loc` itself when it is free
    pub fn free_neighbor_or_self<R: Rng + ?Sized>(
        &self,
        loc: Location,
        rng: &mut R,
    ) -> Option<Location> {
        self.free_neighbor(loc, rng)
            .or_else(|| self.is_free(loc).then_some(loc))
    }

    /// Regenerate plankton in every cell
    pub fn regenerate_plankton(&mut self, rate: f32, max: f32) {
        for cell in &mut self.cells {
            cell.regenerate_plankton(rate, max);
        }
    }

    /// Remove every fish, leaving obstacles and plankton in place
    pub fn clear_occupants(&mut self) {
        for cell in &mut self.cells {
            cell.vacate();
        }
    }

    /// Number of cells holding a fish
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.occupant().is_some()).count()
    }

    fn index(&self, loc: Location) -> usize {
        assert!(
            self.contains(loc),
            "location {} outside {}x{} grid",
            loc,
            self.height,
            self.width
        );
        (loc.row * self.width + loc.col) as usize
    }

    /// Iterator over all locations, row-major
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.cells.iter().map(|c| c.location())
    }

    /// Iterator over all cells, row-major
    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }
}
