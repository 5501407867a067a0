//! Integration tests for the container: header, block layouts, inflation
//! and the three intake forms.

mod common;

use std::io::Write;

use common::{encode_block, time_slice, transfer, ReplayBuilder};
use w3g_replay::{
    BlockLayout, ParserOptions, ReplayAction, ReplayError, ReplayInfo, ReplayParser, StreamStatus,
};

/// One time slice where player 0 transfers resources.
fn transfer_chunk() -> Vec<u8> {
    time_slice(1000, &[(0, &transfer(2, 1, 2))])
}

fn assert_single_transfer(info: &ReplayInfo) {
    assert_eq!(info.events().len(), 1);
    let event = &info.events()[0];
    assert_eq!(event.time_ms, 1000);
    assert_eq!(event.player_id, 0);
    assert_eq!(
        event.action,
        ReplayAction::TransferResources {
            slot: 2,
            gold: 1,
            lumber: 2,
        }
    );
}

// ============================================================================
// Header
// ============================================================================

#[test]
fn test_empty_replay_metadata() {
    let data = ReplayBuilder::new().encode();
    let info = ReplayInfo::parse(&data).unwrap();

    assert_eq!(info.game_id(), "W3XP");
    assert_eq!(info.version(), 0x0001_0000);
    assert_eq!(info.build(), 1);
    assert_eq!(info.game_length_ms(), 0);
    assert!(info.events().is_empty());
    assert_eq!(info.stream_status(), StreamStatus::Complete);
}

#[test]
fn test_metadata_round_trip() {
    let data = ReplayBuilder::new()
        .game_id(b"PX3W")
        .version(26)
        .build(6059)
        .flags(0x8000)
        .game_length_ms(1_234_567)
        .encode();
    let info = ReplayInfo::parse(&data).unwrap();

    assert_eq!(info.game_id(), "PX3W");
    assert_eq!(info.version(), 26);
    assert_eq!(info.build(), 6059);
    assert_eq!(info.game_length_ms(), 1_234_567);

    let header = info.header();
    assert_eq!(header.header_version, 1);
    assert_eq!(header.block_count, 0);
    assert_eq!(header.data_offset(), 0x44);
    let metadata = header.metadata.as_ref().unwrap();
    assert_eq!(metadata.flags, 0x8000);
}

#[test]
fn test_header_without_metadata() {
    let data = ReplayBuilder::new()
        .header_version(0)
        .chunk(&transfer_chunk())
        .layout(BlockLayout::Legacy16)
        .encode();
    let info = ReplayInfo::parse(&data).unwrap();

    assert!(info.header().metadata.is_none());
    assert_eq!(info.game_id(), "");
    assert_eq!(info.version(), 0);
    assert_eq!(info.build(), 0);
    assert_single_transfer(&info);
}

#[test]
fn test_wrong_signature() {
    let mut data = ReplayBuilder::new().chunk(&transfer_chunk()).encode();
    data[0] = b'w';

    let result = ReplayInfo::parse(&data);
    assert!(matches!(result, Err(ReplayError::Format { .. })));
}

#[test]
fn test_not_a_replay() {
    for data in [&b""[..], b"PK\x03\x04", b"Warcraft III recorded game"] {
        assert!(matches!(
            ReplayInfo::parse(data),
            Err(ReplayError::Format { .. })
        ));
    }
}

#[test]
fn test_truncated_header() {
    let data = ReplayBuilder::new().encode();
    for len in [28, 32, 0x30, 0x40] {
        let result = ReplayInfo::parse(&data[..len]);
        assert!(
            matches!(result, Err(ReplayError::Format { .. })),
            "header cut at {len} bytes"
        );
    }
}

#[test]
fn test_header_padding_is_skipped() {
    let data = ReplayBuilder::new()
        .padding(16)
        .chunk(&transfer_chunk())
        .encode();
    let info = ReplayInfo::parse(&data).unwrap();

    assert_eq!(info.header().data_offset(), 0x54);
    assert_single_transfer(&info);
}

// ============================================================================
// Block layouts
// ============================================================================

#[test]
fn test_legacy_layout() {
    let data = ReplayBuilder::new()
        .version(26)
        .chunk(&transfer_chunk())
        .encode();
    let info = ReplayInfo::parse(&data).unwrap();

    assert_eq!(info.block_layout(), BlockLayout::Legacy16);
    assert_single_transfer(&info);
}

#[test]
fn test_wide_layout() {
    let data = ReplayBuilder::new()
        .version(10_032)
        .chunk(&transfer_chunk())
        .encode();
    let info = ReplayInfo::parse(&data).unwrap();

    assert_eq!(info.block_layout(), BlockLayout::Wide32);
    assert_single_transfer(&info);
}

#[test]
fn test_layout_detected_against_version() {
    let wide_on_old = ReplayBuilder::new()
        .version(26)
        .layout(BlockLayout::Wide32)
        .chunk(&transfer_chunk())
        .encode();
    let info = ReplayInfo::parse(&wide_on_old).unwrap();
    assert_eq!(info.block_layout(), BlockLayout::Wide32);
    assert_single_transfer(&info);

    let legacy_on_new = ReplayBuilder::new()
        .version(10_032)
        .layout(BlockLayout::Legacy16)
        .chunk(&transfer_chunk())
        .encode();
    let info = ReplayInfo::parse(&legacy_on_new).unwrap();
    assert_eq!(info.block_layout(), BlockLayout::Legacy16);
    assert_single_transfer(&info);
}

#[test]
fn test_forced_layout() {
    let data = ReplayBuilder::new()
        .version(26)
        .layout(BlockLayout::Wide32)
        .chunk(&transfer_chunk())
        .encode();

    let wide = ReplayParser::with_options(
        ParserOptions::default().with_block_layout(BlockLayout::Wide32),
    );
    let info = wide.parse(&data).unwrap();
    assert_eq!(info.block_layout(), BlockLayout::Wide32);
    assert_single_transfer(&info);

    let legacy = ReplayParser::with_options(
        ParserOptions::default().with_block_layout(BlockLayout::Legacy16),
    );
    assert!(matches!(
        legacy.parse(&data),
        Err(ReplayError::CorruptBlock { index: 0, .. })
    ));
}

#[test]
fn test_stream_spans_blocks() {
    let chunk = transfer_chunk();
    let (first, second) = chunk.split_at(7);
    let data = ReplayBuilder::new().chunk(first).chunk(second).encode();
    let info = ReplayInfo::parse(&data).unwrap();

    assert_eq!(info.header().block_count, 2);
    assert_single_transfer(&info);
}

// ============================================================================
// Corrupt blocks
// ============================================================================

#[test]
fn test_truncated_block_payload() {
    let mut data = ReplayBuilder::new().chunk(&transfer_chunk()).encode();
    data.truncate(data.len() - 3);

    assert!(matches!(
        ReplayInfo::parse(&data),
        Err(ReplayError::CorruptBlock { index: 0, .. })
    ));
}

#[test]
fn test_missing_block() {
    let mut data = ReplayBuilder::new()
        .chunk(&transfer_chunk())
        .chunk(&transfer_chunk())
        .encode();
    let second_block = encode_block(&transfer_chunk(), BlockLayout::Wide32);
    data.truncate(data.len() - second_block.len());

    assert!(matches!(
        ReplayInfo::parse(&data),
        Err(ReplayError::CorruptBlock { index: 1, .. })
    ));
}

#[test]
fn test_garbage_payload() {
    let mut data = ReplayBuilder::new().encode();
    data[0x2C..0x30].copy_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&8u32.to_le_bytes());
    data.extend_from_slice(&8u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&[0xFF; 8]);

    assert!(matches!(
        ReplayInfo::parse(&data),
        Err(ReplayError::CorruptBlock { index: 0, .. })
    ));
}

#[test]
fn test_inflation_limit() {
    let data = ReplayBuilder::new()
        .chunk(&transfer_chunk())
        .chunk(&transfer_chunk())
        .encode();
    let limit = transfer_chunk().len() + 4;
    let parser = ReplayParser::with_options(
        ParserOptions::default().with_max_decompressed_size(limit),
    );

    assert!(matches!(
        parser.parse(&data),
        Err(ReplayError::CorruptBlock { index: 1, .. })
    ));
}

// ============================================================================
// Intake forms
// ============================================================================

#[test]
fn test_path_and_reader_agree_with_bytes() {
    let data = ReplayBuilder::new()
        .game_length_ms(60_000)
        .chunk(&transfer_chunk())
        .encode();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();
    file.flush().unwrap();

    let from_bytes = ReplayInfo::parse(&data).unwrap();
    let from_path = ReplayInfo::from_path(file.path()).unwrap();
    let from_reader = ReplayInfo::from_reader(std::io::Cursor::new(&data)).unwrap();

    assert_eq!(from_bytes, from_path);
    assert_eq!(from_bytes, from_reader);
    assert_single_transfer(&from_path);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ReplayInfo::from_path(dir.path().join("missing.w3g"));
    assert!(matches!(result, Err(ReplayError::Io(_))));
}

#[test]
fn test_replay_serializes_to_json() {
    let data = ReplayBuilder::new().chunk(&transfer_chunk()).encode();
    let info = ReplayInfo::parse(&data).unwrap();

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["header"]["metadata"]["game_id"], "W3XP");
    assert_eq!(json["block_layout"], "Wide32");
    assert_eq!(json["events"][0]["time_ms"], 1000);
    assert_eq!(json["events"][0]["action"]["type"], "TransferResources");
    assert_eq!(json["events"][0]["action"]["gold"], 1);
    assert_eq!(json["stream_status"], "Complete");
}
