//! A single grid slot.

use ocean_core::{AgentId, Location, Obstacle, Species};
use serde::{Deserialize, Serialize};

/// The fish sitting in a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub id: AgentId,
    pub species: Species,
}

/// One cell of a grid: at most one obstacle, at most one fish, and plankton
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    location: Location,
    obstacle: Option<Obstacle>,
    occupant: Option<Occupant>,
    plankton: f32,
}

impl Cell {
    pub fn new(location: Location, plankton: f32) -> Self {
        Self {
            location,
            obstacle: None,
            occupant: None,
            plankton,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn obstacle(&self) -> Option<Obstacle> {
        self.obstacle
    }

    pub fn occupant(&self) -> Option<Occupant> {
        self.occupant
    }

    pub fn plankton(&self) -> f32 {
        self.plankton
    }

    /// Neither a fish nor an obstacle
    pub fn is_free(&self) -> bool {
        self.occupant.is_none() && self.obstacle.is_none()
    }

    pub fn has_obstacle(&self) -> bool {
        self.obstacle.is_some()
    }

    pub fn place_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacle = Some(obstacle);
    }

    pub fn occupy(&mut self, occupant: Occupant) {
        debug_assert!(
            self.obstacle.is_none(),
            "fish placed on obstacle at {}",
            self.location
        );
        self.occupant = Some(occupant);
    }

    pub fn vacate(&mut self) {
        self.occupant = None;
    }

    pub fn set_plankton(&mut self, plankton: f32) {
        self.plankton = plankton;
    }

    /// Grow plankton by `rate`, capped at `max`
    pub fn regenerate_plankton(&mut self, rate: f32, max: f32) {
        self.plankton = (self.plankton + rate).min(max);
    }

    /// Remove up to `amount` plankton. Never leaves a negative level.
    pub fn consume_plankton(&mut self, amount: f32) {
        if self.plankton > 0.0 {
            self.plankton = (self.plankton - amount).max(0.0);
        }
    }
}
