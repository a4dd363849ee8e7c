//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a fish, allocated sequentially by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Grid coordinate. Ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub row: i32,
    pub col: i32,
}

impl Location {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Shift by `offset`.
    ///
    /// Only yields a location when both resulting coordinates are strictly
    /// positive. There is no upper bound check here: the grid owns its extent.
    pub fn translate(&self, offset: Offset) -> Option<Location> {
        let row = self.row + offset.d_row;
        let col = self.col + offset.d_col;
        if row > 0 && col > 0 {
            Some(Location::new(row, col))
        } else {
            None
        }
    }

    /// Offset that takes `self` to `target`
    pub fn delta_to(&self, target: Location) -> Offset {
        Offset::new(target.row - self.row, target.col - self.col)
    }

    /// Manhattan distance to another location
    pub fn manhattan_distance(&self, other: &Location) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Component-wise displacement between two locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub d_row: i32,
    pub d_col: i32,
}

impl Offset {
    pub fn new(d_row: i32, d_col: i32) -> Self {
        Self { d_row, d_col }
    }

    pub fn is_zero(&self) -> bool {
        self.d_row == 0 && self.d_col == 0
    }
}

/// The three fish species living in the ocean
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Groper,
    Herring,
    Shark,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Groper, Species::Herring, Species::Shark];

    /// Whether a fish of this species will eat a fish of `prey` species
    pub fn preys_on(&self, prey: Species) -> bool {
        matches!(
            (self, prey),
            (Species::Groper, Species::Herring)
                | (Species::Shark, Species::Herring)
                | (Species::Shark, Species::Groper)
        )
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Species::Groper => "groper",
            Species::Herring => "herring",
            Species::Shark => "shark",
        };
        f.write_str(name)
    }
}

/// Why a fish died
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Eaten,
    Starvation,
    OldAge,
    Overcrowding,
}

impl DeathCause {
    pub const ALL: [DeathCause; 4] = [
        DeathCause::Eaten,
        DeathCause::Starvation,
        DeathCause::OldAge,
        DeathCause::Overcrowding,
    ];
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeathCause::Eaten => "eaten",
            DeathCause::Starvation => "starvation",
            DeathCause::OldAge => "old_age",
            DeathCause::Overcrowding => "overcrowding",
        };
        f.write_str(name)
    }
}

/// Immovable obstacle occupying a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Obstacle {
    Rock,
}
