use std::collections::BTreeSet;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Places mines uniformly at random, without replacement and without any
/// bias towards the first click.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        let config = config.validate()?;
        let total_cells = config.total_cells();
        let mut rng = SmallRng::seed_from_u64(self.seed);

        // rejection sampling: redraw until enough distinct cells are picked
        let mut mines = BTreeSet::new();
        let mut draws: u32 = 0;
        while mines.len() < usize::from(config.mines) {
            let index: CellCount = rng.random_range(0..total_cells);
            mines.insert(CellIndex::from(index));
            draws += 1;
        }
        log::debug!(
            "Placed {} mines on {}x{} in {} draws (seed {})",
            config.mines,
            config.width,
            config.height,
            draws,
            self.seed
        );

        MineLayout::from_mine_indices(config.grid(), mines)
    }
}
