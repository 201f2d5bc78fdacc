//! Persisted record format shared between the game core and record stores.
//!
//! A [`GameRecord`] is written once when a game ends and never mutated again.
//! Stores hand records back as [`StoredRecord`], which flattens the assigned
//! [`RecordId`] next to the record fields.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Single coordinate axis used for board width, height, rows and columns.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid board size {0:?}, expected \"WxH\"")]
    InvalidSize(String),
    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ProtocolError>;

/// Opaque identifier a record store assigns on save.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveResult {
    Safe,
    Mine,
}

impl MoveResult {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

impl fmt::Display for MoveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Safe => "Safe",
            Self::Mine => "Mine",
        })
    }
}

/// One user-initiated reveal. Cells opened by a cascade are not moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub row: Coord,
    pub col: Coord,
    pub result: MoveResult,
}

impl Move {
    pub const fn new(row: Coord, col: Coord, result: MoveResult) -> Self {
        Self { row, col, result }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinStatus {
    Win,
    Loss,
}

impl WinStatus {
    pub const fn from_won(won: bool) -> Self {
        if won { Self::Win } else { Self::Loss }
    }

    pub const fn is_win(self) -> bool {
        matches!(self, Self::Win)
    }
}

impl fmt::Display for WinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Win => "Win",
            Self::Loss => "Loss",
        })
    }
}

/// Board dimensions, persisted as a `"WxH"` string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BoardSize {
    pub width: Coord,
    pub height: Coord,
}

impl BoardSize {
    pub const fn new(width: Coord, height: Coord) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for BoardSize {
    type Err = ProtocolError;

    fn from_str(raw: &str) -> Result<Self> {
        let invalid = || ProtocolError::InvalidSize(raw.to_owned());
        let (width, height) = raw.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: Coord = width.parse().map_err(|_| invalid())?;
        let height: Coord = height.parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl From<BoardSize> for String {
    fn from(size: BoardSize) -> Self {
        size.to_string()
    }
}

impl TryFrom<String> for BoardSize {
    type Error = ProtocolError;

    fn try_from(raw: String) -> Result<Self> {
        raw.parse()
    }
}

/// Outcome of one finished game, as handed to a record store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub player_name: String,
    pub size: BoardSize,
    pub mines: CellCount,
    pub win_status: WinStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub moves: Vec<Move>,
}

impl GameRecord {
    /// Position (0-based) and value of the move that hit a mine, if any.
    pub fn losing_move(&self) -> Option<(usize, &Move)> {
        self.moves
            .iter()
            .enumerate()
            .find(|(_, mv)| mv.result.is_mine())
    }
}

/// A record together with the id its store assigned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: GameRecord,
}

pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_size_parses_and_formats() {
        let size: BoardSize = "12x7".parse().unwrap();

        assert_eq!(size, BoardSize::new(12, 7));
        assert_eq!(size.to_string(), "12x7");
    }

    #[test]
    fn board_size_rejects_garbage_and_zero() {
        assert!(matches!(
            "10".parse::<BoardSize>(),
            Err(ProtocolError::InvalidSize(_))
        ));
        assert!("0x5".parse::<BoardSize>().is_err());
        assert!("5x300".parse::<BoardSize>().is_err());
        assert!("axb".parse::<BoardSize>().is_err());
    }

    #[test]
    fn win_status_from_flag() {
        assert_eq!(WinStatus::from_won(true), WinStatus::Win);
        assert_eq!(WinStatus::from_won(false), WinStatus::Loss);
        assert!(WinStatus::Win.is_win());
        assert!(!WinStatus::Loss.is_win());
    }

    #[test]
    fn losing_move_points_at_first_mine() {
        let record = GameRecord {
            player_name: "Ann".to_owned(),
            size: BoardSize::new(3, 3),
            mines: 1,
            win_status: WinStatus::Loss,
            timestamp: DateTime::<Utc>::from_timestamp_millis(0).unwrap(),
            moves: vec![
                Move::new(0, 0, MoveResult::Safe),
                Move::new(1, 1, MoveResult::Mine),
            ],
        };

        let (position, mv) = record.losing_move().unwrap();
        assert_eq!(position, 1);
        assert_eq!((mv.row, mv.col), (1, 1));
    }
}
