//! Headless gemgrid runner (default binary).
//!
//! Builds a random board, lets the autoplayer follow the hints for a number
//! of moves and prints either board frames or a JSON-lines notification
//! stream on stdout. Logs go to stderr (`RUST_LOG`, default `info`).

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gemgrid::core::{BoardConfig, BoardSnapshot};
use gemgrid::engine::{Session, SessionOptions};
use gemgrid::types::{
    Notification, DEFAULT_CELL_TRAVEL_MS, DEFAULT_HEIGHT, DEFAULT_TYPE_COUNT, DEFAULT_WIDTH,
    TICK_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Board after every resolved move
    Text,
    /// One JSON object per notification
    Json,
}

/// Match-3 board engine, played headless by following its own hints.
#[derive(Debug, Parser)]
#[command(name = "gemgrid", version)]
struct Args {
    /// Board width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH, value_name = "COLS")]
    width: u8,

    /// Board height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_name = "ROWS")]
    height: u8,

    /// Number of distinct piece types
    #[arg(short, long, default_value_t = DEFAULT_TYPE_COUNT)]
    types: u8,

    /// Seed for the piece type generator
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Idle time before a hint is searched (the autoplayer waits for it)
    #[arg(long, default_value_t = 500, value_name = "MS")]
    hint_delay_ms: u32,

    /// Number of swaps to play before stopping
    #[arg(short, long, default_value_t = 10)]
    moves: u32,

    /// Fixed timestep per frame
    #[arg(long, default_value_t = TICK_MS, value_name = "MS")]
    tick_ms: u32,

    /// Simulated travel time per cell
    #[arg(long, default_value_t = DEFAULT_CELL_TRAVEL_MS, value_name = "MS")]
    cell_ms: u32,

    /// Give up after this many frames
    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let config = BoardConfig {
        width: args.width,
        height: args.height,
        type_count: args.types,
        hint_delay_ms: args.hint_delay_ms,
        seed: args.seed,
    };
    let options = SessionOptions {
        tick_ms: args.tick_ms,
        cell_travel_ms: args.cell_ms,
        autoplay: true,
    };
    let mut session = Session::new(config, options).context("invalid board configuration")?;
    info!(width = args.width, height = args.height, seed = args.seed, "session started");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut snapshot = BoardSnapshot::default();

    for _ in 0..args.max_ticks {
        let frame = session.tick().to_vec();
        let tick = session.ticks();

        for n in &frame {
            match args.format {
                Format::Json => {
                    writeln!(out, "{}", json!({ "tick": tick, "event": n }))?;
                }
                Format::Text => match *n {
                    Notification::SwapStarted { a, b } => writeln!(out, "swap {a} <-> {b}")?,
                    Notification::SwapReverted { .. } => writeln!(out, "  no match, reverted")?,
                    Notification::CascadeFinished { passes, cleared } => {
                        writeln!(out, "  {passes} pass(es), {cleared} cleared")?;
                        session.controller().snapshot_into(&mut snapshot);
                        write_board(&mut out, &snapshot)?;
                    }
                    _ => {}
                },
            }
        }

        if session.is_stuck() || (session.swaps() >= args.moves && session.is_settled()) {
            break;
        }
    }

    session.controller().snapshot_into(&mut snapshot);
    match args.format {
        Format::Json => writeln!(
            out,
            "{}",
            json!({ "tick": session.ticks(), "snapshot": &snapshot })
        )?,
        Format::Text => {
            if session.is_stuck() {
                writeln!(out, "no moves left")?;
            }
        }
    }
    out.flush()?;

    info!(
        swaps = session.swaps(),
        ticks = session.ticks(),
        stuck = session.is_stuck(),
        "session finished"
    );
    Ok(())
}

fn write_board(out: &mut impl Write, snapshot: &BoardSnapshot) -> io::Result<()> {
    for row in snapshot.rows() {
        writeln!(out, "  {row}")?;
    }
    writeln!(out)
}
