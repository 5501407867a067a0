//! Integration tests for the decompressed stream: time slices, chat,
//! housekeeping blocks, the game record preamble and early stops.

mod common;

use common::{chat_block, game_record, leave_block, time_slice, transfer, ReplayBuilder};
use proptest::prelude::*;
use w3g_replay::records::walk;
use w3g_replay::{ParserOptions, ReplayAction, ReplayInfo, ReplayParser, StreamStatus};

fn parse_stream(stream: &[u8]) -> ReplayInfo {
    let data = ReplayBuilder::new().chunk(stream).encode();
    ReplayInfo::parse(&data).unwrap()
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn test_transfer_in_time_slice() {
    let info = parse_stream(&time_slice(1000, &[(0, &transfer(2, 1, 2))]));

    assert_eq!(info.events().len(), 1);
    assert_eq!(
        info.events()[0].to_string(),
        "1000ms Player 0: Transfer resources to slot 2 gold=1 lumber=2"
    );
}

#[test]
fn test_chat_block_event() {
    let info = parse_stream(&chat_block(0, 0x00, 0, "hello"));

    assert_eq!(info.events().len(), 1);
    let event = &info.events()[0];
    assert_eq!(event.time_ms, 0);
    assert_eq!(event.player_id, 0);
    assert_eq!(
        event.action,
        ReplayAction::ChatMessage {
            mode: 0,
            extra: 0,
            message: "hello".to_string(),
        }
    );
}

#[test]
fn test_chat_block_with_mode() {
    let info = parse_stream(&chat_block(3, 0x20, 2, "push mid"));

    assert_eq!(
        info.events()[0].action,
        ReplayAction::ChatMessage {
            mode: 2,
            extra: 0,
            message: "push mid".to_string(),
        }
    );
}

#[test]
fn test_chat_byte_count_larger_than_body() {
    let mut stream = chat_block(0, 0x00, 0, "hello");
    stream[2..4].copy_from_slice(&10u16.to_le_bytes());
    stream.extend(time_slice(1000, &[(0, &transfer(2, 1, 2))]));
    let info = parse_stream(&stream);

    assert_eq!(info.stream_status(), StreamStatus::Complete);
    let explained: Vec<String> = info.events().iter().map(ToString::to_string).collect();
    assert_eq!(
        explained,
        vec![
            "0ms Player 0: Chat: hello".to_string(),
            "1000ms Player 0: Transfer resources to slot 2 gold=1 lumber=2".to_string(),
        ]
    );
}

#[test]
fn test_players_keep_order_within_slice() {
    let hotkey_one = [0x18, 0x01];
    let hotkey_two = [0x18, 0x02, 0x18, 0x03];
    let info = parse_stream(&time_slice(250, &[(1, &hotkey_one), (2, &hotkey_two)]));

    let seen: Vec<(u32, u8, String)> = info
        .events()
        .iter()
        .map(|e| (e.time_ms, e.player_id, e.action.type_name().to_string()))
        .collect();
    assert_eq!(
        seen,
        vec![
            (250, 1, "SelectGroupHotkey".to_string()),
            (250, 2, "SelectGroupHotkey".to_string()),
            (250, 2, "SelectGroupHotkey".to_string()),
        ]
    );
}

#[test]
fn test_chat_takes_current_clock() {
    let mut stream = time_slice(100, &[]);
    stream.extend(time_slice(150, &[]));
    stream.extend(chat_block(1, 0x00, 0, "gg"));
    stream.extend(time_slice(50, &[(1, &[0x18, 0x00])]));
    let info = parse_stream(&stream);

    let times: Vec<u32> = info.events().iter().map(|e| e.time_ms).collect();
    assert_eq!(times, vec![250, 300]);
}

#[test]
fn test_old_time_slice_id() {
    let mut stream = time_slice(40, &[(1, &[0x18, 0x05])]);
    stream[0] = 0x1E;
    let info = parse_stream(&stream);

    assert_eq!(info.events().len(), 1);
    assert_eq!(info.events()[0].time_ms, 40);
}

#[test]
fn test_housekeeping_blocks_produce_no_events() {
    let mut stream = vec![0x1A, 0x01, 0x00, 0x00, 0x00];
    stream.extend([0x1B, 0x02, 0x00, 0x00, 0x00]);
    stream.extend([0x1C, 0x02, 0x00, 0x00, 0x00]);
    stream.extend(time_slice(100, &[(1, &[0x18, 0x00])]));
    stream.extend([0x22, 0x04, 0x01, 0x02, 0x03, 0x04]);
    stream.extend([0x23; 11]);
    stream.extend(leave_block(1, 0x0C, 0x09));
    stream.extend([0x2F, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00]);
    let info = parse_stream(&stream);

    assert_eq!(info.events().len(), 1);
    assert_eq!(info.stream_status(), StreamStatus::Complete);
}

#[test]
fn test_unknown_actions_are_reported() {
    let info = parse_stream(&time_slice(
        10,
        &[(1, &[0x18, 0x01]), (2, &[0xE5, 0x01, 0x02, 0x03])],
    ));

    assert_eq!(info.events().len(), 2);
    let unknown: Vec<_> = info.unknown_events().collect();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].player_id, 2);
    assert_eq!(
        unknown[0].action,
        ReplayAction::Unknown {
            type_id: 0xE5,
            data: vec![0x01, 0x02, 0x03],
        }
    );
}

// ============================================================================
// Game record preamble
// ============================================================================

#[test]
fn test_game_record_preamble() {
    let mut stream = game_record((1, "Grubby"), "1v1 Twisted Meadows", &[(2, "Moon")]);
    stream.extend(time_slice(100, &[(2, &[0x18, 0x01])]));
    let info = parse_stream(&stream);

    let game = info.game().unwrap();
    assert_eq!(game.host.name, "Grubby");
    assert_eq!(game.game_name, "1v1 Twisted Meadows");
    assert_eq!(game.player_names(), vec!["Grubby", "Moon"]);
    assert_eq!(game.player_name(2), Some("Moon"));

    assert_eq!(info.events().len(), 1);
    assert_eq!(info.events()[0].time_ms, 100);
    assert_eq!(info.stream_status(), StreamStatus::Complete);
}

#[test]
fn test_game_record_disabled() {
    let mut stream = game_record((1, "Host"), "Game", &[]);
    stream.extend(time_slice(100, &[(1, &[0x18, 0x01])]));
    let data = ReplayBuilder::new().chunk(&stream).encode();

    let parser = ReplayParser::with_options(ParserOptions::default().with_game_record(false));
    let info = parser.parse(&data).unwrap();

    assert!(info.game().is_none());
    assert!(!info.stream_status().is_complete());
}

#[test]
fn test_leading_constant_skipped() {
    let mut stream = vec![0x00, 0x00, 0x00, 0x00];
    stream.extend(time_slice(100, &[(1, &[0x18, 0x01])]));
    let info = parse_stream(&stream);

    assert!(info.game().is_none());
    assert_eq!(info.events().len(), 1);
    assert_eq!(info.stream_status(), StreamStatus::Complete);
}

// ============================================================================
// Early stops
// ============================================================================

#[test]
fn test_unknown_block_stops_walk() {
    let mut stream = time_slice(100, &[(1, &[0x18, 0x01])]);
    let offset = stream.len();
    stream.push(0x55);
    stream.extend(time_slice(100, &[(1, &[0x18, 0x02])]));
    let info = parse_stream(&stream);

    assert_eq!(info.events().len(), 1);
    assert_eq!(
        info.stream_status(),
        StreamStatus::UnknownBlock {
            block_id: 0x55,
            offset,
        }
    );
}

#[test]
fn test_truncated_action_keeps_earlier_events() {
    let mut actions = vec![0x18, 0x01];
    actions.extend([0x51, 0x02, 0x01]);
    let mut stream = time_slice(100, &[(1, &[0x18, 0x00])]);
    let offset = stream.len();
    stream.extend(time_slice(100, &[(1, &actions)]));
    let info = parse_stream(&stream);

    assert_eq!(info.events().len(), 2);
    assert_eq!(info.events()[1].time_ms, 200);
    assert_eq!(info.stream_status(), StreamStatus::Truncated { offset });
}

#[test]
fn test_stream_cut_mid_slice() {
    let mut stream = time_slice(100, &[(1, &[0x18, 0x01])]);
    let offset = stream.len();
    let next = time_slice(100, &[(1, &[0x18, 0x02])]);
    stream.extend(&next[..next.len() - 1]);
    let info = parse_stream(&stream);

    assert_eq!(info.events().len(), 1);
    assert_eq!(info.stream_status(), StreamStatus::Truncated { offset });
}

// ============================================================================
// Properties
// ============================================================================

fn slice_strategy() -> impl Strategy<Value = (u16, Vec<u8>)> {
    (
        any::<u16>(),
        prop::collection::vec((any::<u8>(), 0u8..10), 0..4),
    )
        .prop_map(|(time_increment_ms, commands)| {
            let mut stream = Vec::new();
            let actions: Vec<(u8, Vec<u8>)> = commands
                .into_iter()
                .map(|(player, group)| (player, vec![0x18, group]))
                .collect();
            let borrowed: Vec<(u8, &[u8])> = actions
                .iter()
                .map(|(player, bytes)| (*player, bytes.as_slice()))
                .collect();
            stream.extend(time_slice(time_increment_ms, &borrowed));
            (time_increment_ms, stream)
        })
}

proptest! {
    #[test]
    fn test_clock_is_monotonic(slices in prop::collection::vec(slice_strategy(), 0..32)) {
        let mut stream = Vec::new();
        let mut total: u32 = 0;
        for (time_increment_ms, bytes) in &slices {
            total += u32::from(*time_increment_ms);
            stream.extend_from_slice(bytes);
            stream.extend(chat_block(0, 0x00, 0, "tick"));
        }

        let result = walk(&stream);
        prop_assert_eq!(result.status, StreamStatus::Complete);
        prop_assert!(result.events.windows(2).all(|w| w[0].time_ms <= w[1].time_ms));
        if let Some(last) = result.events.last() {
            prop_assert_eq!(last.time_ms, total);
        }
    }

    #[test]
    fn test_walk_arbitrary_stream_no_panics(bytes in prop::collection::vec(any::<u8>(), 0..2048)) {
        let result = walk(&bytes);
        prop_assert!(result.events.windows(2).all(|w| w[0].time_ms <= w[1].time_ms));
    }

    #[test]
    fn test_parse_arbitrary_file_no_panics(bytes in prop::collection::vec(any::<u8>(), 0..2048)) {
        let _ = ReplayInfo::parse(&bytes);

        let mut data = ReplayBuilder::new().encode();
        data[0x2C..0x30].copy_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&bytes);
        let _ = ReplayInfo::parse(&data);
    }
}
