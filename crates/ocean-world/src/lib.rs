//! Ocean world simulation engine.
//!
//! A grid of cells holding rocks, plankton and fish. Every tick each fish
//! ages, gets hungrier, may breed, feeds and moves, reading the current grid
//! and writing the update grid. The two grids then swap roles.

pub mod cell;
pub mod fish;
pub mod grid;
pub mod hints;
mod lifecycle;
pub mod seeding;
pub mod simulation;
mod species;
pub mod snapshot;
pub mod viability;

pub use cell::{Cell, Occupant};
pub use fish::{Fish, FishKind, HerringMemory};
pub use grid::Grid;
pub use hints::LeaderHints;
pub use simulation::{Death, RunSummary, Simulation, StepReport, StopReason};
pub use snapshot::{CellView, Snapshot};
pub use viability::{Always, SpeciesDiversity, Viability};
