//! Step coordinator: runs every fish once per tick over two swapping grids.

use crate::cell::Occupant;
use crate::fish::Fish;
use crate::grid::Grid;
use crate::hints::LeaderHints;
use crate::lifecycle::{act, Tick};
use crate::seeding::plan_population;
use crate::snapshot::Snapshot;
use crate::viability::Viability;
use ocean_core::{
    AgentId, Census, DeathCause, Error, Location, Obstacle, PopulationCounts, Result,
    SimulationConfig, Species,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, event, info, instrument, Level};

/// How often `run` logs population metrics
const METRICS_INTERVAL: u64 = 100;

pub struct Simulation {
    current: Grid,
    update: Grid,
    /// Every fish, including those that died during the last tick
    fish: BTreeMap<AgentId, Fish>,
    hints: LeaderHints,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    tick: u64,
    next_id: u64,
    census: Census,
}

impl Simulation {
    /// An empty ocean built from `config`
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let plankton = config.environment.initial_plankton;
        let current = Grid::new(config.height, config.width, plankton);
        let update = Grid::new(config.height, config.width, plankton);

        Ok(Self {
            current,
            update,
            fish: BTreeMap::new(),
            hints: LeaderHints::new(),
            config,
            rng,
            tick: 0,
            next_id: 0,
            census: Census::new(),
        })
    }

    /// An ocean with a random initial population
    pub fn seeded(config: SimulationConfig) -> Result<Self> {
        let mut sim = Self::new(config)?;
        sim.populate();
        Ok(sim)
    }

    /// Place a random population on the free cells of the current grid.
    /// Returns how many fish were placed.
    pub fn populate(&mut self) -> usize {
        let plan = plan_population(&self.current, &self.config.seeding, &mut self.rng);
        let random_age = self.config.seeding.random_initial_age;

        for &(location, species) in &plan {
            let id = self.allocate_id();
            let params = self.config.species.get(species);
            let fish = Fish::seeded(id, species, location, params, random_age, &mut self.rng);
            self.current
                .cell_mut(location)
                .occupy(Occupant { id, species });
            self.fish.insert(id, fish);
        }

        info!(
            event = "population_seeded",
            fish = plan.len(),
            height = self.config.height,
            width = self.config.width,
            "Seeded initial population"
        );

        plan.len()
    }

    /// Put a newborn of `species` at `location` in the current grid
    pub fn spawn(&mut self, species: Species, location: Location) -> Result<AgentId> {
        self.check_bounds(location)?;
        if !self.current.is_free(location) {
            return Err(Error::CellOccupied(location));
        }

        let id = self.allocate_id();
        let params = self.config.species.get(species);
        let fish = Fish::newborn(id, species, location, params, &mut self.rng);
        self.current
            .cell_mut(location)
            .occupy(Occupant { id, species });
        self.fish.insert(id, fish);

        debug!(
            event = "spawn",
            fish_id = %id,
            species = %species,
            row = location.row,
            col = location.col,
            "Fish spawned"
        );

        Ok(id)
    }

    /// Put rocks on both grids. Nothing is placed unless every location is in
    /// bounds and free of fish.
    pub fn place_obstacles<I>(&mut self, locations: I) -> Result<usize>
    where
        I: IntoIterator<Item = Location>,
    {
        let locations: Vec<Location> = locations.into_iter().collect();

        for &loc in &locations {
            self.check_bounds(loc)?;
            if self.current.occupant(loc).is_some() || self.update.occupant(loc).is_some() {
                return Err(Error::CellOccupied(loc));
            }
        }

        for &loc in &locations {
            self.current.place_obstacle(loc, Obstacle::Rock);
            self.update.place_obstacle(loc, Obstacle::Rock);
        }

        debug!(event = "obstacles_placed", count = locations.len(), "Rocks placed");
        Ok(locations.len())
    }

    /// Exchange the roles of the current and update grids. Only sound at the
    /// end of a tick, after which the new update grid is cleared.
    pub(crate) fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.current, &mut self.update);
    }

    /// Advance the ocean by one tick
    pub fn step(&mut self) -> StepReport {
        debug_assert_eq!(self.update.occupied(), 0, "update grid holds fish before a tick");
        self.compact();

        let mut order: Vec<AgentId> = self.fish.keys().copied().collect();
        order.shuffle(&mut self.rng);

        self.run_tick(order)
    }

    /// Step until `max_ticks` have run or `viability` rejects the ocean
    #[instrument(skip(self, viability), fields(seed = self.config.seed))]
    pub fn run<V: Viability + ?Sized>(&mut self, max_ticks: u64, viability: &V) -> RunSummary {
        info!(
            event = "run_start",
            max_ticks = max_ticks,
            start_tick = self.tick,
            population = self.population().total(),
            "Starting simulation run"
        );

        let mut ticks_run = 0;
        let mut stop_reason = StopReason::BudgetExhausted;

        while ticks_run < max_ticks {
            let report = self.step();
            ticks_run += 1;

            if report.tick % METRICS_INTERVAL == 0 {
                self.emit_population_metrics(&report.population);
            }

            if !viability.is_viable(&self.current, &report.population) {
                stop_reason = StopReason::NotViable;
                break;
            }
        }

        let summary = RunSummary {
            ticks_run,
            final_tick: self.tick,
            stop_reason,
            population: self.population(),
            census: self.census.clone(),
        };

        info!(
            event = "run_summary",
            ticks_run = summary.ticks_run,
            final_tick = summary.final_tick,
            stop_reason = ?summary.stop_reason,
            groper = summary.population.groper,
            herring = summary.population.herring,
            shark = summary.population.shark,
            births = summary.census.total_births(),
            deaths = summary.census.total_deaths(),
            "Simulation run complete"
        );

        summary
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Completed ticks
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn current(&self) -> &Grid {
        &self.current
    }

    pub fn update(&self) -> &Grid {
        &self.update
    }

    pub fn fish(&self, id: AgentId) -> Option<&Fish> {
        self.fish.get(&id)
    }

    pub fn living(&self) -> impl Iterator<Item = &Fish> + '_ {
        self.fish.values().filter(|f| f.is_alive())
    }

    /// Fish on the roster, including any not yet compacted away
    pub fn roster_len(&self) -> usize {
        self.fish.len()
    }

    pub fn population(&self) -> PopulationCounts {
        self.living().map(Fish::species).collect()
    }

    pub fn census(&self) -> &Census {
        &self.census
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.current, self.tick)
    }

    fn check_bounds(&self, location: Location) -> Result<()> {
        if self.current.contains(location) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                location,
                height: self.current.height,
                width: self.current.width,
            })
        }
    }

    fn allocate_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Drop fish that died during the previous tick
    fn compact(&mut self) {
        self.fish.retain(|_, f| f.is_alive());
    }

    /// Let each fish in `order` that is still alive take its turn, then
    /// settle the tick.
    fn run_tick(&mut self, order: Vec<AgentId>) -> StepReport {
        let tick_number = self.tick + 1;
        let mut births = Vec::new();

        let mut tick = Tick {
            current: &mut self.current,
            update: &mut self.update,
            fish: &mut self.fish,
            hints: &mut self.hints,
            births: &mut births,
            rng: &mut self.rng,
            config: &self.config,
            next_id: &mut self.next_id,
            tick: tick_number,
        };

        for id in order {
            let Some(mut fish) = tick.fish.remove(&id) else {
                continue;
            };
            if fish.is_alive() {
                act(&mut tick, &mut fish);
            }
            tick.fish.insert(id, fish);
        }

        let deaths = self.tally(&births, tick_number);

        let env = &self.config.environment;
        self.update
            .regenerate_plankton(env.plankton_regen, env.max_plankton);
        self.swap_buffers();
        self.update.clear_occupants();
        self.hints.clear();
        self.tick = tick_number;

        let living: Vec<AgentId> = self.living().map(|f| f.id).collect();
        StepReport {
            tick: tick_number,
            births,
            deaths,
            living,
            population: self.population(),
        }
    }

    /// Record this tick's births and deaths in the census
    fn tally(&mut self, births: &[AgentId], tick: u64) -> Vec<Death> {
        for id in births {
            if let Some(fish) = self.fish.get(id) {
                self.census.record_birth(fish.species());
            }
        }

        let deaths: Vec<Death> = self
            .fish
            .values()
            .filter_map(|f| {
                f.death.map(|cause| Death {
                    id: f.id,
                    species: f.species(),
                    cause,
                })
            })
            .collect();

        for death in &deaths {
            self.census.record_death(death.species, death.cause);
            debug!(
                event = "death",
                fish_id = %death.id,
                species = %death.species,
                cause = %death.cause,
                tick = tick,
                "Fish died"
            );
        }

        deaths
    }

    fn emit_population_metrics(&self, population: &PopulationCounts) {
        info!(
            event = "population_metrics",
            tick = self.tick,
            total_population = population.total(),
            groper = population.groper,
            herring = population.herring,
            shark = population.shark,
            births = self.census.total_births(),
            eaten = self.census.deaths_by(DeathCause::Eaten),
            starved = self.census.deaths_by(DeathCause::Starvation),
            old_age = self.census.deaths_by(DeathCause::OldAge),
            overcrowded = self.census.deaths_by(DeathCause::Overcrowding),
            "Population metrics snapshot"
        );

        event!(
            Level::INFO,
            gauge_name = "population_total",
            gauge_value = population.total(),
            tick = self.tick,
            "Population gauge"
        );
    }
}

/// A fish that died during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Death {
    pub id: AgentId,
    pub species: Species,
    pub cause: DeathCause,
}

/// What happened during one tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// Number of the tick just completed
    pub tick: u64,
    pub births: Vec<AgentId>,
    pub deaths: Vec<Death>,
    pub living: Vec<AgentId>,
    pub population: PopulationCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    BudgetExhausted,
    NotViable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks_run: u64,
    pub final_tick: u64,
    pub stop_reason: StopReason,
    pub population: PopulationCounts,
    pub census: Census,
}
