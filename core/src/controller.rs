use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::*;

/// Board a new game was started with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameStarted {
    pub config: GameConfig,
}

/// What the renderer has to redraw after a cell activation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellUpdate {
    pub revealed: Vec<CellIndex>,
    /// Set once the activation ended the game.
    pub outcome: Option<WinStatus>,
    /// Id of the record the finished game was saved as.
    pub record_id: Option<RecordId>,
    /// Why the finished game could not be saved; retry with
    /// [`GameController::save_result`].
    pub save_error: Option<StoreError>,
}

impl CellUpdate {
    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn has_update(&self) -> bool {
        !self.revealed.is_empty() || self.outcome.is_some()
    }
}

/// Entry point for a UI: owns the record store and the active session.
#[derive(Debug)]
pub struct GameController<S> {
    store: S,
    session: Option<Session>,
    seeds: SmallRng,
}

impl<S: RecordStore> GameController<S> {
    /// `seed` drives the layouts of every game this controller starts.
    pub fn new(store: S, seed: u64) -> Self {
        Self {
            store,
            session: None,
            seeds: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Square board of `size` x `size`.
    pub fn start_game(
        &mut self,
        player_name: &str,
        size: Coord,
        mines: CellCount,
    ) -> Result<GameStarted> {
        self.start_game_with(player_name, GameConfig::square(size, mines))
    }

    pub fn start_game_with(&mut self, player_name: &str, config: GameConfig) -> Result<GameStarted> {
        let generator = RandomLayoutGenerator::new(self.seeds.random());
        self.start_game_using(player_name, config, generator)
    }

    /// Replaces the active session on success; a rejected start keeps the
    /// previous one.
    pub fn start_game_using(
        &mut self,
        player_name: &str,
        config: GameConfig,
        generator: impl LayoutGenerator,
    ) -> Result<GameStarted> {
        let session = Session::start(player_name, config, generator)?;
        let config = session.config();
        if let Some(previous) = self.session.replace(session) {
            if !previous.is_over() {
                log::debug!("Abandoning unfinished game of {:?}", previous.player_name());
            }
        }
        Ok(GameStarted { config })
    }

    /// Activates a cell and, when that ends the game, saves the result before
    /// returning. A failed save is reported in [`CellUpdate::save_error`] next
    /// to the final outcome.
    pub async fn activate_cell(
        &mut self,
        index: CellIndex,
        now: DateTime<Utc>,
    ) -> Result<CellUpdate> {
        let session = self.session.as_mut().ok_or(GameError::NoActiveGame)?;

        Ok(match session.activate(index, now)? {
            SessionEvent::Ignored => CellUpdate::default(),
            SessionEvent::CellsRevealed(revealed) => CellUpdate {
                revealed,
                ..Default::default()
            },
            SessionEvent::GameEnded { status, revealed } => {
                let (record_id, save_error) = match session.finalize(&mut self.store, now).await {
                    Ok(record_id) => (record_id, None),
                    Err(GameError::Storage(err)) => {
                        log::warn!("Game ended with {} but was not saved: {}", status, err);
                        (None, Some(err))
                    }
                    Err(err) => return Err(err),
                };
                CellUpdate {
                    revealed,
                    outcome: Some(status),
                    record_id,
                    save_error,
                }
            }
        })
    }

    /// Saves the active game if it is over and was not saved yet, for
    /// retrying after a store failure.
    pub async fn save_result(&mut self, now: DateTime<Utc>) -> Result<Option<RecordId>> {
        let session = self.session.as_mut().ok_or(GameError::NoActiveGame)?;
        session.finalize(&mut self.store, now).await
    }

    pub async fn request_history(&self) -> Result<Vec<HistoryEntry>> {
        let records = self.store.list_all().await?;
        Ok(records.iter().map(HistoryEntry::from).collect())
    }

    pub async fn request_replay(&self, id: RecordId) -> Result<Replay> {
        let stored = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(GameError::NotFound(id))?;
        Ok(Replay::from(&stored))
    }

    pub async fn clear_history(&mut self) -> Result<()> {
        self.store.clear_all().await?;
        log::debug!("History cleared");
        Ok(())
    }
}
