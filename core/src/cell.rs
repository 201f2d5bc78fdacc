/// Player-visible state of one cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Hidden,
    /// Safe cell showing its adjacent mine count.
    Revealed(u8),
    /// The mine that ended the game.
    Detonated,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    pub const fn adjacent_count(self) -> Option<u8> {
        match self {
            Self::Revealed(count) => Some(count),
            _ => None,
        }
    }
}
