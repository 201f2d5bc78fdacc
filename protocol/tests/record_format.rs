use chrono::{DateTime, Utc};
use sapper_protocol::{
    BoardSize, GameRecord, Move, MoveResult, RecordId, StoredRecord, WinStatus, decode, encode,
};

fn sample_record() -> GameRecord {
    GameRecord {
        player_name: "Ivan".to_owned(),
        size: BoardSize::new(8, 8),
        mines: 10,
        win_status: WinStatus::Win,
        timestamp: DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap(),
        moves: vec![Move::new(2, 3, MoveResult::Safe)],
    }
}

#[test]
fn record_uses_camel_case_fields_and_string_size() {
    let value: serde_json::Value = serde_json::from_str(&encode(&sample_record()).unwrap()).unwrap();

    assert_eq!(value["playerName"], "Ivan");
    assert_eq!(value["size"], "8x8");
    assert_eq!(value["mines"], 10);
    assert_eq!(value["winStatus"], "Win");
    assert_eq!(value["timestamp"], "2023-11-14T22:13:20Z");
    assert_eq!(value["moves"][0]["row"], 2);
    assert_eq!(value["moves"][0]["col"], 3);
    assert_eq!(value["moves"][0]["result"], "Safe");
}

#[test]
fn stored_record_flattens_id_next_to_fields() {
    let stored = StoredRecord {
        id: RecordId(4),
        record: sample_record(),
    };

    let raw = encode(&stored).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["id"], 4);
    assert_eq!(value["playerName"], "Ivan");

    let back: StoredRecord = decode(&raw).unwrap();
    assert_eq!(back, stored);
}

#[test]
fn decodes_millisecond_timestamps_and_missing_moves() {
    let raw = r#"{
        "playerName": "Olga",
        "size": "5x5",
        "mines": 3,
        "winStatus": "Loss",
        "timestamp": "2024-03-01T10:15:30.250Z"
    }"#;

    let record: GameRecord = decode(raw).unwrap();

    assert_eq!(record.size, BoardSize::new(5, 5));
    assert_eq!(record.win_status, WinStatus::Loss);
    assert_eq!(record.timestamp.timestamp_millis(), 1_709_288_130_250);
    assert!(record.moves.is_empty());
}

#[test]
fn rejects_malformed_size() {
    let raw = r#"{
        "playerName": "Olga",
        "size": "five",
        "mines": 3,
        "winStatus": "Loss",
        "timestamp": "2024-03-01T10:15:30Z",
        "moves": []
    }"#;

    assert!(decode::<GameRecord>(raw).is_err());
}
