use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Playing,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn win_status(self) -> Option<WinStatus> {
        if self.is_over() {
            Some(WinStatus::from_won(matches!(self, Self::Won)))
        } else {
            None
        }
    }
}

/// What an activation did, for the renderer to act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Game over, already revealed cell, or already saved.
    Ignored,
    CellsRevealed(Vec<CellIndex>),
    /// `revealed` holds the last cells opened, or the detonated mine.
    GameEnded {
        status: WinStatus,
        revealed: Vec<CellIndex>,
    },
}

/// One play-through bound to a player, from start to win or loss.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    player_name: String,
    board: Board,
    state: SessionState,
    saved: bool,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn start(
        player_name: &str,
        config: GameConfig,
        generator: impl LayoutGenerator,
    ) -> Result<Self> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(GameError::InvalidInput("player name must not be empty"));
        }

        let board = Board::initialize(config, generator)?;
        log::debug!(
            "New game for {:?} on {} with {} mines",
            player_name,
            config.size(),
            config.mines
        );

        Ok(Self {
            player_name: player_name.to_owned(),
            board,
            state: SessionState::Playing,
            saved: false,
            started_at: None,
            ended_at: None,
        })
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.board.config()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// How many seconds have passed since the first move, 0 if there was none
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            let secs = (self.ended_at.unwrap_or(now) - started_at).num_seconds();
            u32::try_from(secs.max(0)).unwrap_or(u32::MAX)
        } else {
            0
        }
    }

    /// Reveals `index` for the player and moves the session to its terminal
    /// state when the reveal decides the game.
    pub fn activate(&mut self, index: CellIndex, now: DateTime<Utc>) -> Result<SessionEvent> {
        if self.state.is_over() || self.saved {
            log::debug!("Ignoring activation of {} on a finished game", index);
            return Ok(SessionEvent::Ignored);
        }

        let event = match self.board.reveal(index)? {
            RevealOutcome::NoChange => return Ok(SessionEvent::Ignored),
            RevealOutcome::Mine => {
                self.end(SessionState::Lost, now);
                SessionEvent::GameEnded {
                    status: WinStatus::Loss,
                    revealed: vec![index],
                }
            }
            RevealOutcome::Safe(revealed) if self.board.check_win() => {
                self.end(SessionState::Won, now);
                SessionEvent::GameEnded {
                    status: WinStatus::Win,
                    revealed,
                }
            }
            RevealOutcome::Safe(revealed) => SessionEvent::CellsRevealed(revealed),
        };

        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        Ok(event)
    }

    /// Snapshot of a finished game; `None` while the game is still running.
    pub fn record(&self, timestamp: DateTime<Utc>) -> Option<GameRecord> {
        let win_status = self.state.win_status()?;
        let config = self.config();
        Some(GameRecord {
            player_name: self.player_name.clone(),
            size: config.size(),
            mines: config.mines,
            win_status,
            timestamp,
            moves: self.board.moves().to_vec(),
        })
    }

    /// Persists the finished game once. Later calls, and calls before the game
    /// has ended, return `None` without touching the store. A store failure
    /// leaves the session unsaved.
    pub async fn finalize<S: RecordStore>(
        &mut self,
        store: &mut S,
        now: DateTime<Utc>,
    ) -> Result<Option<RecordId>> {
        if self.saved {
            log::debug!("Game of {:?} already saved", self.player_name);
            return Ok(None);
        }
        let Some(record) = self.record(now) else {
            log::warn!("Not saving game of {:?}, still in progress", self.player_name);
            return Ok(None);
        };

        let id = store.save(record).await?;
        self.saved = true;
        log::debug!("Saved game of {:?} as {}", self.player_name, id);
        Ok(Some(id))
    }

    fn end(&mut self, state: SessionState, now: DateTime<Utc>) {
        log::debug!("Game of {:?} ended: {:?}", self.player_name, state);
        self.state = state;
        self.started_at.get_or_insert(now);
        self.ended_at = Some(now);
    }
}
