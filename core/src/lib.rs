use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use controller::*;
pub use error::*;
pub use generator::*;
pub use replay::*;
pub use session::*;
pub use store::*;
pub use types::*;

pub use sapper_protocol::{
    BoardSize, GameRecord, Move, MoveResult, RecordId, StoredRecord, WinStatus,
};

mod board;
mod cell;
mod controller;
mod error;
mod generator;
mod replay;
mod session;
mod store;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    /// Square board, the only shape the classic start screen offers.
    pub const fn square(size: Coord, mines: CellCount) -> Self {
        Self::new(size, size, mines)
    }

    pub const fn grid(&self) -> Grid {
        Grid::new(self.width, self.height)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub const fn size(&self) -> BoardSize {
        BoardSize::new(self.width, self.height)
    }

    /// Requires a non-empty board with at least one mine and one safe cell.
    pub fn validate(self) -> Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::InvalidConfiguration("board must not be empty"));
        }
        if self.mines == 0 {
            return Err(GameError::InvalidConfiguration("at least one mine is required"));
        }
        if self.mines >= self.total_cells() {
            return Err(GameError::InvalidConfiguration(
                "mines must leave at least one safe cell",
            ));
        }
        Ok(self)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::square(9, 10)
    }
}

/// Mine positions of one board, fixed for the board's whole life.
#[derive(Clone, Debug, PartialEq)]
pub struct MineLayout {
    grid: Grid,
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_indices(
        grid: Grid,
        mine_indices: impl IntoIterator<Item = CellIndex>,
    ) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(grid.nd_dim());
        let mut mine_count: CellCount = 0;

        for index in mine_indices {
            if !grid.contains(index) {
                return Err(GameError::InvalidCoords);
            }
            let cell = &mut mine_mask[grid.coords_of(index).to_nd_index()];
            if !*cell {
                *cell = true;
                mine_count += 1;
            }
        }

        GameConfig::new(grid.width, grid.height, mine_count).validate()?;

        Ok(Self {
            grid,
            mine_mask,
            mine_count,
        })
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new(self.grid.width, self.grid.height, self.mine_count)
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        if self.grid.contains(index) {
            Ok(index)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.grid.total_cells()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, index: CellIndex) -> bool {
        self[index]
    }

    /// Mine indices in ascending order.
    pub fn mine_indices(&self) -> Vec<CellIndex> {
        self.mine_mask
            .iter()
            .enumerate()
            .filter_map(|(index, &is_mine)| is_mine.then_some(index))
            .collect()
    }

    pub fn adjacent_mine_count(&self, index: CellIndex) -> u8 {
        // at most 8 neighbours, the cast cannot truncate
        self.grid
            .neighbors(index)
            .filter(|&pos| self[pos])
            .count() as u8
    }
}

impl Index<CellIndex> for MineLayout {
    type Output = bool;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.mine_mask[self.grid.coords_of(index).to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_degenerate_configs() {
        assert!(matches!(
            GameConfig::new(0, 5, 1).validate(),
            Err(GameError::InvalidConfiguration(_))
        ));
        assert!(GameConfig::square(3, 0).validate().is_err());
        assert!(GameConfig::square(3, 9).validate().is_err());
        assert!(GameConfig::square(3, 8).validate().is_ok());
        assert_eq!(GameConfig::default().validate(), Ok(GameConfig::square(9, 10)));
    }

    #[test]
    fn layout_collapses_duplicates_and_lists_mines_in_order() {
        let layout = MineLayout::from_mine_indices(Grid::new(3, 3), [7, 2, 7]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.mine_indices(), vec![2, 7]);
        assert_eq!(layout.safe_cell_count(), 7);
        assert!(layout.contains_mine(2));
        assert!(!layout.contains_mine(3));
    }

    #[test]
    fn layout_rejects_out_of_range_index() {
        assert_eq!(
            MineLayout::from_mine_indices(Grid::new(3, 3), [9]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn adjacent_count_ignores_cells_across_the_edge() {
        // 3x3 with mines on the right column, index 3 is the left end of row 1
        let layout = MineLayout::from_mine_indices(Grid::new(3, 3), [2, 5]).unwrap();

        assert_eq!(layout.adjacent_mine_count(3), 0);
        assert_eq!(layout.adjacent_mine_count(4), 2);
        assert_eq!(layout.adjacent_mine_count(1), 2);
    }
}
