//! Replay decoding entry points.
//!
//! [`ReplayInfo`] is the immutable result of decoding one replay.
//! [`ReplayParser`] runs the pipeline (header, layout resolution,
//! inflation, stream walk) with a set of [`ParserOptions`].

use serde::Serialize;
use std::io::Read;
use std::path::Path;

use crate::decompress::{decompress_blocks, DEFAULT_MAX_DECOMPRESSED_SIZE};
use crate::error::Result;
use crate::event::ReplayEvent;
use crate::format::BlockLayout;
use crate::header::ReplayHeader;
use crate::records::{BlockWalker, GameRecord, StreamStatus};

/// Settings for [`ReplayParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Forces a block layout instead of inferring it from the first block.
    pub block_layout: Option<BlockLayout>,

    /// Upper bound on the total inflated size in bytes.
    pub max_decompressed_size: usize,

    /// Whether to decode the game record at the start of the stream.
    pub parse_game_record: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            block_layout: None,
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
            parse_game_record: true,
        }
    }
}

impl ParserOptions {
    /// Forces the given block layout.
    #[must_use]
    pub fn with_block_layout(mut self, layout: BlockLayout) -> Self {
        self.block_layout = Some(layout);
        self
    }

    /// Sets the inflation limit in bytes.
    #[must_use]
    pub fn with_max_decompressed_size(mut self, limit: usize) -> Self {
        self.max_decompressed_size = limit;
        self
    }

    /// Enables or disables game record decoding.
    #[must_use]
    pub fn with_game_record(mut self, enabled: bool) -> Self {
        self.parse_game_record = enabled;
        self
    }
}

/// Decodes replays with a fixed set of options.
///
/// # Example
///
/// ```no_run
/// use w3g_replay::format::BlockLayout;
/// use w3g_replay::{ParserOptions, ReplayParser};
///
/// let parser = ReplayParser::with_options(
///     ParserOptions::default().with_block_layout(BlockLayout::Wide32),
/// );
/// let info = parser.parse_path("ladder.w3g")?;
/// println!("{} events", info.events().len());
/// # Ok::<(), w3g_replay::error::ReplayError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReplayParser {
    options: ParserOptions,
}

impl ReplayParser {
    /// Creates a parser with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given options.
    #[must_use]
    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Returns the options in use.
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Decodes a replay held in memory.
    ///
    /// # Errors
    ///
    /// - `ReplayError::Format` if the signature or header is invalid
    /// - `ReplayError::CorruptBlock` if a compressed block cannot be
    ///   recovered or the inflation limit is exceeded
    pub fn parse(&self, data: &[u8]) -> Result<ReplayInfo> {
        let header = ReplayHeader::parse(data)?;
        let block_layout = self.options.block_layout.unwrap_or_else(|| {
            BlockLayout::detect(data, header.data_offset(), header.layout_hint())
        });

        let stream = decompress_blocks(
            data,
            &header,
            block_layout,
            self.options.max_decompressed_size,
        )?;
        tracing::debug!(
            blocks = header.block_count,
            ?block_layout,
            inflated = stream.len(),
            "decompressed replay stream"
        );

        let walk = BlockWalker::new(&stream)
            .with_game_record(self.options.parse_game_record)
            .run();

        Ok(ReplayInfo {
            header,
            block_layout,
            game: walk.game,
            events: walk.events,
            stream_status: walk.status,
        })
    }

    /// Decodes a replay read to the end from `reader`.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::Io` if reading fails, otherwise as
    /// [`ReplayParser::parse`].
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<ReplayInfo> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.parse(&data)
    }

    /// Decodes the replay file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ReplayError::Io` if the file cannot be read, otherwise as
    /// [`ReplayParser::parse`].
    pub fn parse_path(&self, path: impl AsRef<Path>) -> Result<ReplayInfo> {
        let data = std::fs::read(path)?;
        self.parse(&data)
    }
}

/// A decoded replay.
///
/// Immutable after construction; fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayInfo {
    header: ReplayHeader,
    block_layout: BlockLayout,
    game: Option<GameRecord>,
    events: Vec<ReplayEvent>,
    stream_status: StreamStatus,
}

impl ReplayInfo {
    /// Decodes a replay held in memory with default options.
    ///
    /// # Errors
    ///
    /// See [`ReplayParser::parse`].
    ///
    /// # Example
    ///
    /// ```
    /// use w3g_replay::ReplayInfo;
    ///
    /// let result = ReplayInfo::parse(b"not a replay");
    /// assert!(result.is_err());
    /// ```
    pub fn parse(data: &[u8]) -> Result<Self> {
        ReplayParser::new().parse(data)
    }

    /// Decodes a replay from a reader with default options.
    ///
    /// # Errors
    ///
    /// See [`ReplayParser::parse_reader`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        ReplayParser::new().parse_reader(reader)
    }

    /// Decodes the replay file at `path` with default options.
    ///
    /// # Errors
    ///
    /// See [`ReplayParser::parse_path`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        ReplayParser::new().parse_path(path)
    }

    /// Returns the four-character product code, or `""` without metadata.
    #[must_use]
    pub fn game_id(&self) -> &str {
        self.header.game_id()
    }

    /// Returns the game version, or 0 without metadata.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.header.version()
    }

    /// Returns the build number, or 0 without metadata.
    #[must_use]
    pub fn build(&self) -> u16 {
        self.header.build()
    }

    /// Returns the game length in milliseconds, or 0 without metadata.
    #[must_use]
    pub fn game_length_ms(&self) -> u32 {
        self.header.game_length_ms()
    }

    /// Returns the events in chronological order.
    #[must_use]
    pub fn events(&self) -> &[ReplayEvent] {
        &self.events
    }

    /// Returns only the events whose action type was not recognized.
    pub fn unknown_events(&self) -> impl Iterator<Item = &ReplayEvent> {
        self.events.iter().filter(|e| e.is_unknown())
    }

    /// Returns the parsed container header.
    #[must_use]
    pub fn header(&self) -> &ReplayHeader {
        &self.header
    }

    /// Returns the block layout used to read the compressed blocks.
    #[must_use]
    pub fn block_layout(&self) -> BlockLayout {
        self.block_layout
    }

    /// Returns the game record, if the stream carried one.
    #[must_use]
    pub fn game(&self) -> Option<&GameRecord> {
        self.game.as_ref()
    }

    /// Returns why the stream walk ended.
    #[must_use]
    pub fn stream_status(&self) -> StreamStatus {
        self.stream_status
    }

    /// Consumes the replay and returns its events.
    #[must_use]
    pub fn into_events(self) -> Vec<ReplayEvent> {
        self.events
    }
}
