//! Random initial population.

use crate::grid::Grid;
use ocean_core::{Location, SeedingConfig, Species};
use rand::Rng;

/// Species draw order for every free cell. The first hit wins.
const DRAW_ORDER: [Species; 3] = [Species::Shark, Species::Herring, Species::Groper];

/// Pick the species to place on each free cell of `grid`, scanning row-major.
///
/// Cells with a rock or a fish are skipped without drawing.
pub fn plan_population<R: Rng + ?Sized>(
    grid: &Grid,
    seeding: &SeedingConfig,
    rng: &mut R,
) -> Vec<(Location, Species)> {
    let mut plan = Vec::new();

    for cell in grid.iter() {
        if !cell.is_free() {
            continue;
        }

        let hit = DRAW_ORDER
            .into_iter()
            .find(|species| rng.gen_bool(seeding.probability(*species)));
        if let Some(species) = hit {
            plan.push((cell.location(), species));
        }
    }

    plan
}
