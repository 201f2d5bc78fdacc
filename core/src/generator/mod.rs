use crate::*;
pub use random::*;

mod random;

pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}

/// Uses a predetermined set of mine indices, the count must match the config.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedLayoutGenerator {
    mines: Vec<CellIndex>,
}

impl FixedLayoutGenerator {
    pub fn new(mines: impl IntoIterator<Item = CellIndex>) -> Self {
        Self {
            mines: mines.into_iter().collect(),
        }
    }
}

impl LayoutGenerator for FixedLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        let config = config.validate()?;
        let layout = MineLayout::from_mine_indices(config.grid(), self.mines)?;
        if layout.mine_count() != config.mines {
            return Err(GameError::InvalidConfiguration(
                "mine list does not match the configured count",
            ));
        }
        Ok(layout)
    }
}
