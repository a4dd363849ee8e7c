//! Species-specific feeding and movement policies.
//!
//! `surroundings` is the acting fish's neighborhood in the current grid,
//! shuffled once per tick, so "first match" picks are fair over time.

use crate::cell::Occupant;
use crate::fish::{Fish, FishKind};
use crate::lifecycle::Tick;
use ocean_core::{
    DeathCause, Location, Species, GROPER_MEAL_RELIEF, HERRING_MEAL, HERRING_MEAL_RELIEF,
    SHARK_GROPER_RELIEF, SHARK_HERRING_RELIEF,
};
use tracing::trace;

/// Feed, possibly killing prey. Returns where the fish wants to move to eat.
pub(crate) fn find_food(tick: &mut Tick<'_>, fish: &mut Fish, surroundings: &[Location]) -> Option<Location> {
    match fish.kind {
        FishKind::Groper => groper_hunt(tick, fish, surroundings),
        FishKind::Herring(_) => {
            graze(tick, fish);
            None
        }
        FishKind::Shark => shark_hunt(tick, fish, surroundings),
    }
}

/// Where to go when feeding gave no destination
pub(crate) fn choose_next_location(
    tick: &mut Tick<'_>,
    fish: &mut Fish,
    surroundings: &[Location],
) -> Option<Location> {
    match fish.kind {
        FishKind::Groper => tick.update.free_neighbor_or_self(fish.location, tick.rng),
        FishKind::Herring(_) => herring_next(tick, fish, surroundings),
        FishKind::Shark => shark_next(tick, fish, surroundings),
    }
}

/// First herring found is dinner
fn groper_hunt(tick: &mut Tick<'_>, groper: &mut Fish, surroundings: &[Location]) -> Option<Location> {
    let (spot, prey) = surroundings.iter().find_map(|&loc| {
        tick.living_occupant(loc)
            .filter(|o| o.species == Species::Herring)
            .map(|o| (loc, o))
    })?;

    tick.kill(prey.id, DeathCause::Eaten);
    groper.feed(GROPER_MEAL_RELIEF);
    trace!(
        event = "meal",
        predator_id = %groper.id,
        prey_id = %prey.id,
        hunger = groper.hunger,
        "Groper ate herring"
    );
    Some(spot)
}

/// Eat plankton from the cell underneath, in both grids
fn graze(tick: &mut Tick<'_>, herring: &mut Fish) {
    let here = herring.location;
    if tick.current.cell(here).plankton() >= HERRING_MEAL {
        tick.current.cell_mut(here).consume_plankton(HERRING_MEAL);
        tick.update.cell_mut(here).consume_plankton(HERRING_MEAL);
        herring.feed(HERRING_MEAL_RELIEF);
    }
}

/// Any prey will do, but a groper beats a herring
fn shark_hunt(tick: &mut Tick<'_>, shark: &mut Fish, surroundings: &[Location]) -> Option<Location> {
    let mut dinner: Option<(Location, Occupant)> = None;

    for &loc in surroundings {
        let Some(candidate) = tick.living_occupant(loc) else {
            continue;
        };
        if !Species::Shark.preys_on(candidate.species) {
            continue;
        }

        match dinner {
            None => dinner = Some((loc, candidate)),
            Some((_, chosen))
                if chosen.species == Species::Herring && candidate.species == Species::Groper =>
            {
                dinner = Some((loc, candidate))
            }
            Some(_) => {}
        }
    }

    let (spot, prey) = dinner?;
    tick.kill(prey.id, DeathCause::Eaten);
    shark.feed(match prey.species {
        Species::Groper => SHARK_GROPER_RELIEF,
        _ => SHARK_HERRING_RELIEF,
    });
    trace!(
        event = "meal",
        predator_id = %shark.id,
        prey_id = %prey.id,
        prey_species = %prey.species,
        hunger = shark.hunger,
        "Shark ate"
    );
    Some(spot)
}

/// Follow a leader if one announced a target, otherwise keep going the same
/// way, otherwise take any free cell. The chosen target is passed on to
/// neighboring herring.
fn herring_next(tick: &mut Tick<'_>, herring: &mut Fish, surroundings: &[Location]) -> Option<Location> {
    let here = herring.location;
    let config = tick.config;
    let features = &config.features;

    let mut next = tick.update.free_neighbor_or_self(here, tick.rng);

    let leader = if features.herring_grouping {
        tick.hints.leader_for(herring.id)
    } else {
        None
    };
    let last_translation = herring.herring_memory().and_then(|m| m.last_translation);

    if let Some(leader) = leader {
        if let Some(spot) = spot_near_leader(tick, surroundings, leader) {
            next = Some(spot);
        }
    } else if features.herring_direction {
        if let Some(ahead) = last_translation.and_then(|step| here.translate(step)) {
            if tick.update.contains(ahead) && tick.update.is_free(ahead) {
                next = Some(ahead);
            }
        }
    }

    let target = next?;

    for &loc in surroundings {
        if let Some(neighbor) = tick.current.occupant(loc) {
            if neighbor.species == Species::Herring {
                tick.hints.lead(neighbor.id, target);
            }
        }
    }

    if let Some(memory) = herring.herring_memory_mut() {
        let delta = here.delta_to(target);
        memory.last_translation = (!delta.is_zero()).then_some(delta);
    }

    Some(target)
}

/// First free cell around us that is also a free cell around the leader's target
fn spot_near_leader(tick: &mut Tick<'_>, surroundings: &[Location], leader: Location) -> Option<Location> {
    let around_leader: Vec<Location> = tick
        .update
        .neighbors_of(leader, tick.rng)
        .into_iter()
        .filter(|loc| tick.update.is_free(*loc))
        .collect();

    surroundings
        .iter()
        .copied()
        .filter(|loc| tick.update.is_free(*loc))
        .find(|loc| around_leader.contains(loc))
}

/// Any free cell, but with sharks nearby pick the one furthest from all of them
fn shark_next(tick: &mut Tick<'_>, shark: &mut Fish, surroundings: &[Location]) -> Option<Location> {
    let mut preferred = tick.update.free_neighbor_or_self(shark.location, tick.rng);
    if !tick.config.features.shark_avoidance {
        return preferred;
    }

    let mut sharks = Vec::new();
    let mut open = Vec::new();
    for &loc in surroundings {
        match tick.update.occupant(loc) {
            Some(o) if o.species == Species::Shark => sharks.push(loc),
            Some(_) => {}
            None if tick.update.is_free(loc) => open.push(loc),
            None => {}
        }
    }

    if sharks.is_empty() {
        return preferred;
    }

    let mut best = 0;
    for spot in open {
        let distance: i32 = sharks.iter().map(|s| spot.manhattan_distance(s)).sum();
        if distance > best {
            best = distance;
            preferred = Some(spot);
        }
    }

    preferred
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::hints::LeaderHints;
    use crate::lifecycle::act;
    use ocean_core::{AgentId, Obstacle, Offset, SimulationConfig};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;

    struct Harness {
        current: Grid,
        update: Grid,
        fish: BTreeMap<AgentId, Fish>,
        hints: LeaderHints,
        births: Vec<AgentId>,
        rng: ChaCha8Rng,
        config: SimulationConfig,
        next_id: u64,
    }

    impl Harness {
        fn new(height: i32, width: i32, seed: u64) -> Self {
            let mut config = SimulationConfig::with_size(height, width);
            for species in Species::ALL {
                config.species.get_mut(species).breeding_probability = 0.0;
            }
            Self {
                current: Grid::new(height, width, 0.0),
                update: Grid::new(height, width, 0.0),
                fish: BTreeMap::new(),
                hints: LeaderHints::new(),
                births: Vec::new(),
                rng: ChaCha8Rng::seed_from_u64(seed),
                config,
                next_id: 1_000,
            }
        }

        fn add(&mut self, id: u64, species: Species, loc: Location) {
            let mut fish = Fish::newborn(
                AgentId(id),
                species,
                loc,
                self.config.species.get(species),
                &mut self.rng,
            );
            fish.max_age = 1_000;
            self.current.cell_mut(loc).occupy(Occupant { id: fish.id, species });
            self.fish.insert(fish.id, fish);
        }

        fn with_tick<T>(&mut self, f: impl FnOnce(&mut Tick<'_>) -> T) -> T {
            let mut tick = Tick {
                current: &mut self.current,
                update: &mut self.update,
                fish: &mut self.fish,
                hints: &mut self.hints,
                births: &mut self.births,
                rng: &mut self.rng,
                config: &self.config,
                next_id: &mut self.next_id,
                tick: 1,
            };
            f(&mut tick)
        }

        /// Let fish `id` take its turn, then put it back
        fn act(&mut self, id: u64) -> Fish {
            let mut fish = self.fish.remove(&AgentId(id)).unwrap();
            self.with_tick(|tick| act(tick, &mut fish));
            self.fish.insert(fish.id, fish.clone());
            fish
        }

        fn alive(&self, id: u64) -> bool {
            self.fish[&AgentId(id)].is_alive()
        }
    }

    #[test]
    fn test_groper_eats_its_only_neighboring_herring() {
        for seed in 0..20 {
            let mut h = Harness::new(3, 3, seed);
            h.add(1, Species::Groper, Location::new(1, 1));
            h.add(2, Species::Herring, Location::new(0, 2));
            h.add(3, Species::Shark, Location::new(2, 0));
            h.add(4, Species::Groper, Location::new(2, 2));
            h.current.place_obstacle(Location::new(0, 0), Obstacle::Rock);
            h.update.place_obstacle(Location::new(0, 0), Obstacle::Rock);

            let groper = h.act(1);

            assert!(!h.alive(2));
            assert_eq!(h.fish[&AgentId(2)].death, Some(DeathCause::Eaten));
            assert_eq!(groper.hunger, 10 - 50);
            assert_eq!(groper.location, Location::new(0, 2));
            assert!(h.alive(3));
            assert!(h.alive(4));
        }
    }

    #[test]
    fn test_groper_ignores_non_herring() {
        let mut h = Harness::new(1, 3, 2);
        h.add(1, Species::Groper, Location::new(0, 1));
        h.add(2, Species::Shark, Location::new(0, 0));
        h.add(3, Species::Groper, Location::new(0, 2));

        let groper = h.act(1);

        assert!(h.alive(2) && h.alive(3));
        assert_eq!(groper.hunger, 10);
    }

    #[test]
    fn test_shark_prefers_groper_over_herring() {
        for seed in 0..20 {
            let mut h = Harness::new(3, 3, seed);
            h.add(1, Species::Shark, Location::new(1, 1));
            h.add(2, Species::Herring, Location::new(0, 0));
            h.add(3, Species::Groper, Location::new(2, 1));
            h.add(4, Species::Herring, Location::new(1, 2));

            let shark = h.act(1);

            assert!(!h.alive(3));
            assert!(h.alive(2) && h.alive(4));
            assert_eq!(shark.hunger, 10 - 50);
            assert_eq!(shark.location, Location::new(2, 1));
        }
    }

    #[test]
    fn test_shark_eats_herring_for_less() {
        let mut h = Harness::new(1, 2, 4);
        h.add(1, Species::Shark, Location::new(0, 0));
        h.add(2, Species::Herring, Location::new(0, 1));

        let shark = h.act(1);

        assert!(!h.alive(2));
        assert_eq!(shark.hunger, 10 - 25);
        assert_eq!(shark.location, Location::new(0, 1));
    }

    #[test]
    fn test_dead_prey_is_not_eaten_twice() {
        let mut h = Harness::new(1, 3, 6);
        h.add(1, Species::Groper, Location::new(0, 0));
        h.add(2, Species::Herring, Location::new(0, 1));
        h.add(3, Species::Shark, Location::new(0, 2));

        let groper = h.act(1);
        assert_eq!(groper.hunger, -40);
        assert!(!h.alive(2));

        // The herring's body is still in the current grid, but the shark
        // does not feed on it.
        assert!(h.current.occupant(Location::new(0, 1)).is_some());
        let shark = h.act(3);
        assert_eq!(shark.hunger, 10);
        assert_eq!(h.fish[&AgentId(2)].death, Some(DeathCause::Eaten));
    }

    #[test]
    fn test_meal_cell_taken_falls_back_to_preference() {
        let mut h = Harness::new(1, 3, 8);
        h.add(1, Species::Shark, Location::new(0, 0));
        h.add(2, Species::Herring, Location::new(0, 1));
        // Something already moved into the herring's cell for next tick
        h.update.cell_mut(Location::new(0, 1)).occupy(Occupant {
            id: AgentId(77),
            species: Species::Groper,
        });

        let shark = h.act(1);

        assert!(!h.alive(2));
        assert_eq!(shark.hunger, 10 - 25);
        assert_eq!(shark.location, Location::new(0, 0));
        assert_eq!(
            h.update.occupant(Location::new(0, 1)).map(|o| o.id),
            Some(AgentId(77))
        );
    }

    #[test]
    fn test_herring_grazes_both_grids() {
        let mut h = Harness::new(2, 2, 1);
        let here = Location::new(0, 0);
        h.current.cell_mut(here).set_plankton(3.0);
        h.update.cell_mut(here).set_plankton(2.5);
        h.add(1, Species::Herring, here);

        let herring = h.act(1);

        assert_eq!(herring.hunger, 10 - 30);
        assert_eq!(h.current.cell(here).plankton(), 1.0);
        assert_eq!(h.update.cell(here).plankton(), 0.5);
    }

    #[test]
    fn test_herring_needs_two_plankton() {
        let mut h = Harness::new(2, 2, 1);
        let here = Location::new(0, 0);
        h.current.cell_mut(here).set_plankton(1.9);
        h.add(1, Species::Herring, here);

        let herring = h.act(1);

        assert_eq!(herring.hunger, 10);
        assert!((h.current.cell(here).plankton() - 1.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_herring_announces_target_to_neighbors() {
        let mut h = Harness::new(3, 3, 12);
        h.add(1, Species::Herring, Location::new(1, 1));
        h.add(2, Species::Herring, Location::new(0, 0));
        h.add(3, Species::Groper, Location::new(2, 2));

        let leader = h.act(1);

        assert_eq!(h.hints.leader_for(AgentId(2)), Some(leader.location));
        assert_eq!(h.hints.leader_for(AgentId(3)), None);
        assert_eq!(
            leader.herring_memory().unwrap().last_translation,
            Some(Location::new(1, 1).delta_to(leader.location))
        );
    }

    #[test]
    fn test_herring_follows_leader() {
        for seed in 0..20 {
            let mut h = Harness::new(1, 5, seed);
            h.add(1, Species::Herring, Location::new(0, 1));
            // The leader is heading for (0, 3); the only cell next to both
            // the follower and that target is (0, 2).
            h.hints.lead(AgentId(1), Location::new(0, 3));

            let follower = h.act(1);
            assert_eq!(follower.location, Location::new(0, 2));
        }
    }

    #[test]
    fn test_grouping_disabled_ignores_leader() {
        let mut h = Harness::new(1, 5, 3);
        h.config.features.herring_grouping = false;
        h.config.features.herring_direction = false;
        h.add(1, Species::Herring, Location::new(0, 1));
        h.hints.lead(AgentId(1), Location::new(0, 3));
        h.update.cell_mut(Location::new(0, 2)).occupy(Occupant {
            id: AgentId(9),
            species: Species::Groper,
        });

        let herring = h.act(1);
        assert_eq!(herring.location, Location::new(0, 0));
    }

    #[test]
    fn test_herring_keeps_direction() {
        for seed in 0..20 {
            let mut h = Harness::new(5, 5, seed);
            h.add(1, Species::Herring, Location::new(2, 2));
            if let Some(memory) = h.fish.get_mut(&AgentId(1)).unwrap().herring_memory_mut() {
                memory.last_translation = Some(Offset::new(1, -1));
            }

            let herring = h.act(1);
            assert_eq!(herring.location, Location::new(3, 1));
            assert_eq!(
                herring.herring_memory().unwrap().last_translation,
                Some(Offset::new(1, -1))
            );
        }
    }

    #[test]
    fn test_unreachable_leader_skips_direction() {
        let mut moves = Vec::new();
        for seed in 0..20 {
            let mut h = Harness::new(3, 7, seed);
            h.add(1, Species::Herring, Location::new(1, 3));
            if let Some(memory) = h.fish.get_mut(&AgentId(1)).unwrap().herring_memory_mut() {
                memory.last_translation = Some(Offset::new(0, 1));
            }
            // Nothing around (1, 0) is next to the herring
            h.hints.lead(AgentId(1), Location::new(1, 0));

            let herring = h.act(1);
            assert_ne!(herring.location, Location::new(1, 3));
            assert!(herring.location.col >= 2 && herring.location.col <= 4);
            moves.push(herring.location);
        }

        // Keeping direction would always give (1, 4)
        assert!(moves.iter().any(|loc| *loc != Location::new(1, 4)));
    }

    #[test]
    fn test_direction_blocked_falls_back_to_free_cell() {
        let mut h = Harness::new(3, 3, 5);
        h.add(1, Species::Herring, Location::new(1, 1));
        if let Some(memory) = h.fish.get_mut(&AgentId(1)).unwrap().herring_memory_mut() {
            // Would step outside the grid
            memory.last_translation = Some(Offset::new(5, 5));
        }

        let herring = h.act(1);
        assert!(herring.is_alive());
        assert_ne!(herring.location, Location::new(6, 6));
        assert!(h.update.contains(herring.location));
    }

    #[test]
    fn test_shark_moves_away_from_sharks() {
        for seed in 0..20 {
            let mut h = Harness::new(1, 5, seed);
            h.add(1, Species::Shark, Location::new(0, 1));
            // A shark that already moved sits at (0, 0) in the update grid
            h.update.cell_mut(Location::new(0, 0)).occupy(Occupant {
                id: AgentId(2),
                species: Species::Shark,
            });

            let shark = h.act(1);
            assert_eq!(shark.location, Location::new(0, 2));
        }
    }

    #[test]
    fn test_avoidance_disabled_ignores_sharks() {
        let mut moves = Vec::new();
        for seed in 0..20 {
            let mut h = Harness::new(3, 3, seed);
            h.config.features.shark_avoidance = false;
            h.add(1, Species::Shark, Location::new(1, 1));
            for (id, loc) in [(2, Location::new(0, 0)), (3, Location::new(0, 1)), (4, Location::new(1, 0))] {
                h.update.cell_mut(loc).occupy(Occupant {
                    id: AgentId(id),
                    species: Species::Shark,
                });
            }

            let shark = h.act(1);
            assert!(shark.is_alive());
            assert_ne!(shark.location, Location::new(1, 1));
            moves.push(shark.location);
        }

        // With avoidance on, every seed picks (2, 2)
        assert!(moves.iter().any(|loc| *loc != Location::new(2, 2)));
    }

    #[test]
    fn test_shark_sums_distance_to_every_shark() {
        for seed in 0..20 {
            let mut h = Harness::new(3, 3, seed);
            h.add(1, Species::Shark, Location::new(1, 1));
            for (id, loc) in [(2, Location::new(0, 0)), (3, Location::new(0, 1)), (4, Location::new(1, 0))] {
                h.update.cell_mut(loc).occupy(Occupant {
                    id: AgentId(id),
                    species: Species::Shark,
                });
            }

            let shark = h.act(1);
            assert_eq!(shark.location, Location::new(2, 2));
        }
    }
}
