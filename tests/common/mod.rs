//! Replay fixture encoder shared by the integration tests.
//!
//! Builds complete `.w3g` files in memory: signature, header, and zlib
//! blocks in either layout, around hand-assembled stream bytes.

#![allow(dead_code)]

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

use w3g_replay::format::SIGNATURE;
use w3g_replay::records::GAME_RECORD_MAGIC;
use w3g_replay::BlockLayout;

/// Builds a replay file around raw stream chunks, one block per chunk.
#[derive(Debug, Clone)]
pub struct ReplayBuilder {
    header_version: u32,
    game_id: [u8; 4],
    version: u32,
    build: u16,
    flags: u16,
    game_length_ms: u32,
    layout: Option<BlockLayout>,
    padding: usize,
    chunks: Vec<Vec<u8>>,
}

impl Default for ReplayBuilder {
    fn default() -> Self {
        Self {
            header_version: 1,
            game_id: *b"W3XP",
            version: 0x0001_0000,
            build: 1,
            flags: 0,
            game_length_ms: 0,
            layout: None,
            padding: 0,
            chunks: Vec::new(),
        }
    }
}

impl ReplayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header_version(mut self, header_version: u32) -> Self {
        self.header_version = header_version;
        self
    }

    pub fn game_id(mut self, game_id: &[u8; 4]) -> Self {
        self.game_id = *game_id;
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn build(mut self, build: u16) -> Self {
        self.build = build;
        self
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    pub fn game_length_ms(mut self, game_length_ms: u32) -> Self {
        self.game_length_ms = game_length_ms;
        self
    }

    /// Writes blocks in `layout` instead of the one implied by the version.
    pub fn layout(mut self, layout: BlockLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Reserved bytes between the header fields and the first block.
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Appends a stream chunk as its own compressed block.
    pub fn chunk(mut self, chunk: &[u8]) -> Self {
        self.chunks.push(chunk.to_vec());
        self
    }

    pub fn resolved_layout(&self) -> BlockLayout {
        self.layout
            .unwrap_or_else(|| BlockLayout::from_version(self.version))
    }

    /// Encodes the replay file.
    pub fn encode(&self) -> Vec<u8> {
        let layout = self.resolved_layout();
        let blocks: Vec<Vec<u8>> = self
            .chunks
            .iter()
            .map(|chunk| encode_block(chunk, layout))
            .collect();

        let metadata_len = if self.header_version == 1 { 0x14 } else { 0 };
        let header_size = SIGNATURE.len() + 20 + metadata_len + self.padding;
        let compressed_size: usize = blocks.iter().map(Vec::len).sum();
        let decompressed_size: usize = self.chunks.iter().map(Vec::len).sum();

        let mut file = SIGNATURE.to_vec();
        put_u32(&mut file, header_size as u32);
        put_u32(&mut file, (header_size + compressed_size) as u32);
        put_u32(&mut file, self.header_version);
        put_u32(&mut file, decompressed_size as u32);
        put_u32(&mut file, self.chunks.len() as u32);
        if self.header_version == 1 {
            file.extend_from_slice(&self.game_id);
            put_u32(&mut file, self.version);
            file.extend_from_slice(&self.build.to_le_bytes());
            file.extend_from_slice(&self.flags.to_le_bytes());
            put_u32(&mut file, self.game_length_ms);
            put_u32(&mut file, 0);
        }
        file.resize(header_size, 0);

        for block in blocks {
            file.extend_from_slice(&block);
        }
        file
    }
}

/// Compresses `data` into one zlib stream.
pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Encodes one block: header in `layout`, then the zlib payload.
pub fn encode_block(chunk: &[u8], layout: BlockLayout) -> Vec<u8> {
    let payload = zlib(chunk);
    let mut block = Vec::new();
    match layout {
        BlockLayout::Legacy16 => {
            block.extend_from_slice(&(payload.len() as u16).to_le_bytes());
            block.extend_from_slice(&(chunk.len() as u16).to_le_bytes());
        }
        BlockLayout::Wide32 => {
            put_u32(&mut block, payload.len() as u32);
            put_u32(&mut block, chunk.len() as u32);
        }
    }
    put_u32(&mut block, 0);
    block.extend_from_slice(&payload);
    block
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Encodes a time slice block (0x1F) from `(player_id, action bytes)` pairs.
pub fn time_slice(time_increment_ms: u16, commands: &[(u8, &[u8])]) -> Vec<u8> {
    let mut body = time_increment_ms.to_le_bytes().to_vec();
    for (player_id, actions) in commands {
        body.push(*player_id);
        body.extend_from_slice(&(actions.len() as u16).to_le_bytes());
        body.extend_from_slice(actions);
    }

    let mut block = vec![0x1F];
    block.extend_from_slice(&(body.len() as u16).to_le_bytes());
    block.extend_from_slice(&body);
    block
}

/// Encodes a chat block (0x20). A mode word is written when `flags == 0x20`.
pub fn chat_block(player_id: u8, flags: u8, mode: u32, message: &str) -> Vec<u8> {
    let mut body = vec![flags];
    if flags == 0x20 {
        put_u32(&mut body, mode);
    }
    body.extend_from_slice(message.as_bytes());
    body.push(0x00);

    let mut block = vec![0x20, player_id];
    block.extend_from_slice(&(body.len() as u16).to_le_bytes());
    block.extend_from_slice(&body);
    block
}

/// Encodes a leave block (0x17).
pub fn leave_block(player_id: u8, reason: u32, result: u32) -> Vec<u8> {
    let mut block = vec![0x17];
    put_u32(&mut block, reason);
    block.push(player_id);
    put_u32(&mut block, result);
    put_u32(&mut block, 0);
    block
}

/// Encodes a game record with a host and joined players.
pub fn game_record(host: (u8, &str), game_name: &str, players: &[(u8, &str)]) -> Vec<u8> {
    let mut data = Vec::new();
    put_u32(&mut data, GAME_RECORD_MAGIC);
    put_player(&mut data, 0x00, host);
    data.extend_from_slice(game_name.as_bytes());
    data.push(0x00);
    data.push(0x00);
    data.extend_from_slice(b"encoded settings\x00");
    put_u32(&mut data, (players.len() + 1) as u32);
    put_u32(&mut data, 0x01);
    put_u32(&mut data, 0);
    for player in players {
        put_player(&mut data, 0x16, *player);
        put_u32(&mut data, 0);
    }
    data
}

fn put_player(buf: &mut Vec<u8>, record_id: u8, (player_id, name): (u8, &str)) {
    buf.push(record_id);
    buf.push(player_id);
    buf.extend_from_slice(name.as_bytes());
    buf.push(0x00);
    buf.push(0x01);
    buf.push(0x00);
}

/// Builds the action bytes of a `TransferResources` record.
pub fn transfer(slot: u8, gold: u32, lumber: u32) -> Vec<u8> {
    let mut data = vec![0x51, slot];
    put_u32(&mut data, gold);
    put_u32(&mut data, lumber);
    data
}
