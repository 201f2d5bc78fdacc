use core::fmt;

use chrono::{DateTime, Utc};

use crate::*;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Summary of a stored game, one line of the history list.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub id: RecordId,
    pub player_name: String,
    pub size: BoardSize,
    pub mines: CellCount,
    pub win_status: WinStatus,
    pub timestamp: DateTime<Utc>,
}

impl From<&StoredRecord> for HistoryEntry {
    fn from(stored: &StoredRecord) -> Self {
        let record = &stored.record;
        Self {
            id: stored.id,
            player_name: record.player_name.clone(),
            size: record.size,
            mines: record.mines,
            win_status: record.win_status,
            timestamp: record.timestamp,
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Player: {} - Date: {} - Size: {} - Mines: {} - Result: {}",
            self.player_name,
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.size,
            self.mines,
            self.win_status
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReplayStep {
    /// 1-based position in the move log.
    pub number: usize,
    pub row: Coord,
    pub col: Coord,
    pub result: MoveResult,
    /// This move hit a mine and lost the game.
    pub losing: bool,
}

impl fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move {}: {}x{} - {}",
            self.number, self.row, self.col, self.result
        )
    }
}

/// Ordered move-by-move view of a stored game.
#[derive(Clone, Debug, PartialEq)]
pub struct Replay {
    pub summary: HistoryEntry,
    pub steps: Vec<ReplayStep>,
}

impl Replay {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn losing_step(&self) -> Option<&ReplayStep> {
        self.steps.iter().find(|step| step.losing)
    }
}

impl From<&StoredRecord> for Replay {
    fn from(stored: &StoredRecord) -> Self {
        let steps = stored
            .record
            .moves
            .iter()
            .enumerate()
            .map(|(position, mv)| ReplayStep {
                number: position + 1,
                row: mv.row,
                col: mv.col,
                result: mv.result,
                losing: mv.result.is_mine(),
            })
            .collect();

        Self {
            summary: stored.into(),
            steps,
        }
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary)?;
        if self.is_empty() {
            return write!(f, "No recorded moves.");
        }
        for step in &self.steps {
            writeln!(f, "{}", step)?;
        }
        Ok(())
    }
}
