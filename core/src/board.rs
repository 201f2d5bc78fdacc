use std::collections::VecDeque;

use hashbrown::HashSet;
use ndarray::Array2;

use crate::*;

/// Outcome of revealing a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The cell was already revealed, nothing changed.
    NoChange,
    /// Newly revealed cells, the activated one first, then the cascade.
    Safe(Vec<CellIndex>),
    Mine,
}

impl RevealOutcome {
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Board simulator: cell states and the log of player moves over a fixed
/// [`MineLayout`].
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    mine_layout: MineLayout,
    cells: Array2<CellState>,
    revealed_count: CellCount,
    detonated: Option<CellIndex>,
    moves: Vec<Move>,
}

impl Board {
    pub fn new(mine_layout: MineLayout) -> Self {
        let cells = Array2::default(mine_layout.grid().nd_dim());
        Self {
            mine_layout,
            cells,
            revealed_count: 0,
            detonated: None,
            moves: Vec::new(),
        }
    }

    /// Generates a layout for `config` and wraps it in a fresh board.
    pub fn initialize(config: GameConfig, generator: impl LayoutGenerator) -> Result<Self> {
        Ok(Self::new(generator.generate(config)?))
    }

    pub fn grid(&self) -> Grid {
        self.mine_layout.grid()
    }

    pub fn config(&self) -> GameConfig {
        self.mine_layout.game_config()
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    /// Panics when `index` is outside the board.
    pub fn cell_at(&self, index: CellIndex) -> CellState {
        self.cells[self.grid().coords_of(index).to_nd_index()]
    }

    pub fn is_mine(&self, index: CellIndex) -> bool {
        self.mine_layout.contains_mine(index)
    }

    pub fn adjacent_mine_count(&self, index: CellIndex) -> Result<u8> {
        let index = self.mine_layout.validate_index(index)?;
        Ok(self.mine_layout.adjacent_mine_count(index))
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn detonated(&self) -> Option<CellIndex> {
        self.detonated
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// `(row, col)` of a cell.
    pub fn position_of(&self, index: CellIndex) -> Result<(Coord, Coord)> {
        let index = self.mine_layout.validate_index(index)?;
        let (x, y) = self.grid().coords_of(index);
        Ok((y, x))
    }

    pub fn index_of(&self, row: Coord, col: Coord) -> Result<CellIndex> {
        let grid = self.grid();
        if row < grid.height && col < grid.width {
            Ok(grid.index_of((col, row)))
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn is_lost(&self) -> bool {
        self.detonated.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.is_lost() || self.revealed_count == self.mine_layout.safe_cell_count()
    }

    /// Every safe cell is revealed. Scans the whole board.
    pub fn check_win(&self) -> bool {
        let won = (0..self.mine_layout.total_cells() as CellIndex)
            .all(|index| self.is_mine(index) || self.cell_at(index).is_revealed());
        debug_assert_eq!(
            won,
            self.revealed_count == self.mine_layout.safe_cell_count(),
            "revealed counter out of sync"
        );
        won
    }

    /// Reveals a cell on behalf of the player and logs the move. A safe cell
    /// with no adjacent mines opens its whole zero region and the numbered
    /// cells bordering it.
    pub fn reveal(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let index = self.mine_layout.validate_index(index)?;

        if self.cell_at(index).is_revealed() {
            return Ok(RevealOutcome::NoChange);
        }
        self.check_not_finished()?;

        let (x, y) = self.grid().coords_of(index);

        if self.is_mine(index) {
            self.cells[(x, y).to_nd_index()] = CellState::Detonated;
            self.detonated = Some(index);
            self.moves.push(Move::new(y, x, MoveResult::Mine));
            log::debug!("Hit mine at {:?}", (x, y));
            return Ok(RevealOutcome::Mine);
        }

        self.moves.push(Move::new(y, x, MoveResult::Safe));
        let revealed = self.flood_reveal(index);
        log::debug!(
            "Revealed {} cell(s) from {:?}, {} of {} safe cells open",
            revealed.len(),
            (x, y),
            self.revealed_count,
            self.mine_layout.safe_cell_count()
        );
        Ok(RevealOutcome::Safe(revealed))
    }

    fn flood_reveal(&mut self, start: CellIndex) -> Vec<CellIndex> {
        let grid = self.grid();
        let mut revealed = Vec::new();
        let mut visited = HashSet::new();
        let mut to_visit = VecDeque::from([start]);
        visited.insert(start);

        while let Some(index) = to_visit.pop_front() {
            if self.cell_at(index).is_revealed() || self.is_mine(index) {
                continue;
            }

            let count = self.mine_layout.adjacent_mine_count(index);
            self.cells[grid.coords_of(index).to_nd_index()] = CellState::Revealed(count);
            self.revealed_count += 1;
            revealed.push(index);
            log::trace!("Opened cell {}, mine count: {}", index, count);

            // only zero cells keep the cascade going
            if count == 0 {
                for neighbor in grid.neighbors(index) {
                    if !self.cell_at(neighbor).is_revealed() && visited.insert(neighbor) {
                        to_visit.push_back(neighbor);
                    }
                }
            }
        }

        revealed
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
