use chrono::{DateTime, Utc};
use sapper_core::*;

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
}

fn controller() -> GameController<MemoryRecordStore> {
    GameController::new(MemoryRecordStore::new(), 7)
}

#[tokio::test]
async fn cascade_win_is_saved_and_listed() {
    let mut controller = controller();
    controller
        .start_game_using("Ann", GameConfig::square(4, 1), FixedLayoutGenerator::new([15]))
        .unwrap();

    let update = controller.activate_cell(0, at(100)).await.unwrap();

    assert_eq!(update.revealed.len(), 15);
    assert_eq!(update.outcome, Some(WinStatus::Win));
    let id = update.record_id.unwrap();

    let history = controller.request_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, id);
    assert_eq!(history[0].player_name, "Ann");
    assert_eq!(history[0].size, BoardSize::new(4, 4));
    assert_eq!(history[0].win_status, WinStatus::Win);
    assert_eq!(history[0].timestamp, at(100));

    let replay = controller.request_replay(id).await.unwrap();
    assert_eq!(replay.steps.len(), 1);
    assert_eq!(replay.losing_step(), None);
}

#[tokio::test]
async fn loss_replay_flags_the_mine_move() {
    let mut controller = controller();
    controller
        .start_game_using("Bob", GameConfig::square(3, 1), FixedLayoutGenerator::new([4]))
        .unwrap();

    controller.activate_cell(0, at(0)).await.unwrap();
    let update = controller.activate_cell(4, at(5)).await.unwrap();
    let replay = controller
        .request_replay(update.record_id.unwrap())
        .await
        .unwrap();

    let moves: Vec<_> = replay
        .steps
        .iter()
        .map(|step| (step.number, step.row, step.col, step.result, step.losing))
        .collect();
    assert_eq!(
        moves,
        vec![
            (1, 0, 0, MoveResult::Safe, false),
            (2, 1, 1, MoveResult::Mine, true),
        ]
    );
}

#[tokio::test]
async fn storage_failure_surfaces_and_game_can_be_saved_later() {
    let mut store = MemoryRecordStore::new();
    store.fail_next_save("backend offline");
    let mut controller = GameController::new(store, 1);
    controller
        .start_game_using("Eve", GameConfig::square(4, 1), FixedLayoutGenerator::new([15]))
        .unwrap();

    // the winning cascade and outcome still reach the caller
    let update = controller.activate_cell(0, at(0)).await.unwrap();
    assert_eq!(update.revealed.len(), 15);
    assert!(!update.revealed.contains(&15));
    assert_eq!(update.outcome, Some(WinStatus::Win));
    assert!(update.is_game_over());
    assert_eq!(update.record_id, None);
    assert_eq!(update.save_error, Some(StoreError::new("backend offline")));
    assert!(controller.session().unwrap().is_over());
    assert!(!controller.session().unwrap().is_saved());

    // the board refuses further play, only the save is outstanding
    let update = controller.activate_cell(15, at(1)).await.unwrap();
    assert!(!update.has_update());

    let id = controller.save_result(at(2)).await.unwrap();
    assert_eq!(id, Some(RecordId(1)));
    assert_eq!(controller.store().len(), 1);
    assert_eq!(controller.save_result(at(3)).await.unwrap(), None);
}

#[tokio::test]
async fn new_game_resets_session_state() {
    let mut controller = controller();
    controller
        .start_game_using("Ann", GameConfig::square(3, 1), FixedLayoutGenerator::new([4]))
        .unwrap();
    controller.activate_cell(4, at(0)).await.unwrap();

    controller.start_game("Ann", 5, 4).unwrap();
    let session = controller.session().unwrap();

    assert_eq!(session.state(), SessionState::Playing);
    assert!(!session.is_saved());
    assert!(session.board().moves().is_empty());
    assert_eq!(session.board().revealed_count(), 0);
    assert_eq!(session.config(), GameConfig::square(5, 4));
}

#[tokio::test]
async fn clear_history_removes_all_records() {
    let mut controller = controller();
    for name in ["a", "b"] {
        controller
            .start_game_using(name, GameConfig::square(2, 1), FixedLayoutGenerator::new([0]))
            .unwrap();
        controller.activate_cell(0, at(0)).await.unwrap();
    }
    assert_eq!(controller.request_history().await.unwrap().len(), 2);

    controller.clear_history().await.unwrap();

    assert!(controller.request_history().await.unwrap().is_empty());
    assert_eq!(
        controller.request_replay(RecordId(1)).await,
        Err(GameError::NotFound(RecordId(1)))
    );
}

#[tokio::test]
async fn random_games_play_out_consistently() {
    for seed in 0..20 {
        let mut controller = GameController::new(MemoryRecordStore::new(), seed);
        controller
            .start_game_with("Sim", GameConfig::new(9, 7, 12))
            .unwrap();

        let mut revealed_total = 0;
        let mut index = 0;
        let outcome = loop {
            let update = controller.activate_cell(index, at(0)).await.unwrap();
            revealed_total += update.revealed.len();
            if let Some(outcome) = update.outcome {
                break outcome;
            }
            index += 1;
        };

        let session = controller.session().unwrap();
        let board = session.board();
        let safe_cells = usize::from(board.mine_layout().safe_cell_count());

        assert!(session.is_saved());
        assert_eq!(board.check_win(), outcome.is_win());
        assert_eq!(
            board.check_win(),
            usize::from(board.revealed_count()) == safe_cells
        );
        if outcome.is_win() {
            assert_eq!(revealed_total, safe_cells);
        }
        // one move per activation that changed something, never per cascade cell
        assert!(board.moves().len() <= index + 1);
        let mines_revealed = (0..63)
            .filter(|&i| board.is_mine(i) && board.cell_at(i).is_revealed())
            .count();
        assert_eq!(mines_revealed, usize::from(!outcome.is_win()));
        for i in 0..63 {
            if let Some(count) = board.cell_at(i).adjacent_count() {
                assert_eq!(count, board.adjacent_mine_count(i).unwrap());
            }
        }
    }
}
