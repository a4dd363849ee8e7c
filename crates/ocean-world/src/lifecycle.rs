//! The life cycle every fish goes through once per tick.
//!
//! Decisions read the current grid (the state at the start of the tick).
//! Moved fish and newborns are only ever written to the update grid, so an
//! early mover never corrupts what a later fish sees. Herring leader hints are
//! the one deliberate exception and travel through [`LeaderHints`].

use crate::cell::Occupant;
use crate::fish::Fish;
use crate::grid::Grid;
use crate::hints::LeaderHints;
use crate::species;
use ocean_core::{AgentId, DeathCause, Location, SimulationConfig, SpeciesParams, HUNGER_PER_TICK};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Mutable state shared by every fish acting within one tick
pub(crate) struct Tick<'a> {
    pub current: &'a mut Grid,
    pub update: &'a mut Grid,
    /// Every fish except the one currently acting
    pub fish: &'a mut BTreeMap<AgentId, Fish>,
    pub hints: &'a mut LeaderHints,
    pub births: &'a mut Vec<AgentId>,
    pub rng: &'a mut ChaCha8Rng,
    pub config: &'a SimulationConfig,
    pub next_id: &'a mut u64,
    pub tick: u64,
}

impl Tick<'_> {
    /// Occupant of `loc` in the current grid, if it is still alive
    pub fn living_occupant(&self, loc: Location) -> Option<Occupant> {
        self.current
            .occupant(loc)
            .filter(|o| self.fish.get(&o.id).map_or(false, Fish::is_alive))
    }

    pub fn kill(&mut self, id: AgentId, cause: DeathCause) {
        if let Some(victim) = self.fish.get_mut(&id) {
            victim.die(cause);
        }
    }

    fn allocate_id(&mut self) -> AgentId {
        let id = AgentId(*self.next_id);
        *self.next_id += 1;
        id
    }
}

/// Run one tick of `fish`'s life: age, hunger, breeding, then feeding and
/// movement. A fish that dies stops at that point.
pub(crate) fn act(tick: &mut Tick<'_>, fish: &mut Fish) {
    let config = tick.config;
    let params = config.species.get(fish.species());

    fish.age += 1;
    if fish.age > fish.max_age {
        fish.die(DeathCause::OldAge);
        return;
    }

    fish.hunger += HUNGER_PER_TICK;
    if fish.hunger > params.stamina {
        fish.die(DeathCause::Starvation);
        return;
    }

    breed(tick, fish, params);

    let surroundings = tick.current.neighbors_of(fish.location, tick.rng);

    // A meal whose cell is already taken in the update grid is eaten in place.
    let mut target = species::find_food(tick, fish, &surroundings);
    if let Some(spot) = target {
        if !tick.update.is_free(spot) {
            trace!(
                event = "meal_cell_taken",
                fish_id = %fish.id,
                tick = tick.tick,
                "Prey cell already claimed in update grid"
            );
            target = None;
        }
    }
    if target.is_none() {
        target = species::choose_next_location(tick, fish, &surroundings);
    }

    match target {
        Some(spot) => {
            tick.current.cell_mut(fish.location).vacate();
            tick.update.cell_mut(spot).occupy(Occupant {
                id: fish.id,
                species: fish.species(),
            });
            fish.location = spot;
        }
        None => fish.die(DeathCause::Overcrowding),
    }
}

fn breed(tick: &mut Tick<'_>, parent: &Fish, params: &SpeciesParams) {
    if parent.age < params.breeding_age || !tick.rng.gen_bool(params.breeding_probability) {
        return;
    }

    let litter = tick.rng.gen_range(1..=params.max_litter_size);
    for _ in 0..litter {
        let Some(spot) = tick.update.free_neighbor(parent.location, tick.rng) else {
            trace!(
                event = "birth_skipped",
                parent_id = %parent.id,
                tick = tick.tick,
                "No free cell next to parent"
            );
            continue;
        };

        let id = tick.allocate_id();
        let species = parent.species();
        let newborn = Fish::newborn(id, species, spot, params, tick.rng);
        tick.update.cell_mut(spot).occupy(Occupant { id, species });
        tick.fish.insert(id, newborn);
        tick.births.push(id);

        debug!(
            event = "birth",
            parent_id = %parent.id,
            child_id = %id,
            species = %species,
            row = spot.row,
            col = spot.col,
            tick = tick.tick,
            "Fish born"
        );
    }
}
