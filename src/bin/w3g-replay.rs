//! Warcraft 3 replay (.w3g) decoder CLI
//!
//! ## Commands
//!
//! - `info` - Display replay metadata
//! - `events` - List decoded events

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use w3g_replay::{
    BlockLayout, GameRecord, ParserOptions, ReplayEvent, ReplayInfo, ReplayParser, StreamStatus,
};

/// Warcraft 3 replay (.w3g) decoder
#[derive(Parser)]
#[command(name = "w3g-replay")]
#[command(about = "Warcraft 3 replay (.w3g) decoder", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display replay information
    Info {
        /// Path to the replay file
        file: PathBuf,
        /// Output format: json, pretty
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
        #[command(flatten)]
        decode: DecodeArgs,
    },
    /// List the decoded events of a replay
    Events {
        /// Path to the replay file
        file: PathBuf,
        /// Only list events with unrecognized action types
        #[arg(long)]
        unknown_only: bool,
        /// Output format: json, pretty
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
        #[command(flatten)]
        decode: DecodeArgs,
    },
}

/// Decoder settings shared by all commands
#[derive(Args)]
struct DecodeArgs {
    /// Force a compressed block layout instead of detecting it
    #[arg(long)]
    layout: Option<LayoutArg>,
    /// Maximum inflated size in bytes
    #[arg(long)]
    max_size: Option<usize>,
    /// Skip the game record at the start of the stream
    #[arg(long)]
    no_game_record: bool,
}

impl DecodeArgs {
    fn options(&self) -> ParserOptions {
        let mut options = ParserOptions::default().with_game_record(!self.no_game_record);
        if let Some(layout) = self.layout {
            options = options.with_block_layout(layout.into());
        }
        if let Some(limit) = self.max_size {
            options = options.with_max_decompressed_size(limit);
        }
        options
    }
}

/// Output format options
#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

/// Block layout options
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    /// 8-byte block headers with 16-bit lengths
    Legacy16,
    /// 12-byte block headers with 32-bit lengths
    Wide32,
}

impl From<LayoutArg> for BlockLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Legacy16 => BlockLayout::Legacy16,
            LayoutArg::Wide32 => BlockLayout::Wide32,
        }
    }
}

// ============================================================================
// Serializable Output Structures
// ============================================================================

#[derive(Serialize)]
struct InfoOutput<'a> {
    game_id: &'a str,
    version: u32,
    build: u16,
    game_length_ms: u32,
    block_layout: BlockLayout,
    event_count: usize,
    unknown_count: usize,
    stream_status: StreamStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    game: Option<&'a GameRecord>,
}

impl<'a> InfoOutput<'a> {
    fn new(info: &'a ReplayInfo) -> Self {
        Self {
            game_id: info.game_id(),
            version: info.version(),
            build: info.build(),
            game_length_ms: info.game_length_ms(),
            block_layout: info.block_layout(),
            event_count: info.events().len(),
            unknown_count: info.unknown_events().count(),
            stream_status: info.stream_status(),
            game: info.game(),
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info {
            file,
            output,
            decode,
        } => cmd_info(&file, &output, &decode),
        Commands::Events {
            file,
            unknown_only,
            output,
            decode,
        } => cmd_events(&file, unknown_only, &output, &decode),
    }
}

fn load(file: &Path, decode: &DecodeArgs) -> Option<ReplayInfo> {
    match ReplayParser::with_options(decode.options()).parse_path(file) {
        Ok(info) => Some(info),
        Err(e) => {
            eprintln!("Error decoding {}: {}", file.display(), e);
            None
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Info Command Implementation
// ============================================================================

fn cmd_info(file: &Path, output: &OutputFormat, decode: &DecodeArgs) -> ExitCode {
    let Some(info) = load(file, decode) else {
        return ExitCode::FAILURE;
    };

    match output {
        OutputFormat::Json => print_json(&InfoOutput::new(&info)),
        OutputFormat::Pretty => {
            print_info(&info);
            ExitCode::SUCCESS
        }
    }
}

fn print_info(info: &ReplayInfo) {
    println!(
        "Game: {} Version: {} Build: {} Length(ms): {}",
        info.game_id(),
        info.version(),
        info.build(),
        info.game_length_ms()
    );

    if let Some(game) = info.game() {
        println!();
        println!("Game name: {}", game.game_name);
        println!("Host: [{}] {}", game.host.player_id, game.host.name);
        println!("Players:");
        for player in &game.players {
            println!("  [{}] {}", player.player_id, player.name);
        }
    }

    println!();
    println!("Technical:");
    println!("  Block Layout: {:?}", info.block_layout());
    println!("  Blocks: {}", info.header().block_count);
    println!("  Events: {}", info.events().len());
    println!("  Unknown Events: {}", info.unknown_events().count());
    match info.stream_status() {
        StreamStatus::Complete => println!("  Stream: complete"),
        StreamStatus::UnknownBlock { block_id, offset } => println!(
            "  Stream: stopped at unknown block 0x{block_id:02X} (offset 0x{offset:X})"
        ),
        StreamStatus::Truncated { offset } => {
            println!("  Stream: truncated at offset 0x{offset:X}");
        }
    }
}

// ============================================================================
// Events Command Implementation
// ============================================================================

fn cmd_events(
    file: &Path,
    unknown_only: bool,
    output: &OutputFormat,
    decode: &DecodeArgs,
) -> ExitCode {
    let Some(info) = load(file, decode) else {
        return ExitCode::FAILURE;
    };

    let events: Vec<&ReplayEvent> = if unknown_only {
        info.unknown_events().collect()
    } else {
        info.events().iter().collect()
    };

    match output {
        OutputFormat::Json => print_json(&events),
        OutputFormat::Pretty => {
            for event in &events {
                println!("{event}");
            }
            ExitCode::SUCCESS
        }
    }
}
