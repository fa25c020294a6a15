//! Headless Console Runner
//!
//! Prints marked-up text into a console without opening a window and
//! writes the resulting buffer as a snapshot. Useful for testing layouts
//! and generating deterministic snapshots.
//!
//! # Usage
//!
//! ```bash
//! # Print text from stdin and output a JSON snapshot
//! echo "Hello [[f:#ff0000]]Red" | tessera-headless --output snapshot.json
//!
//! # Wrap a file at 30 columns and output text
//! tessera-headless --input story.txt --wrap 30 --text
//! ```

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tessera::headless::{HeadlessHost, MonospaceFont};
use tessera::{Config, Console};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "tessera-headless")]
#[command(version)]
#[command(about = "Render marked-up text into a console without a window", long_about = None)]
struct Args {
    /// Input file (stdin if not specified)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output as plain text instead of JSON
    #[arg(short, long)]
    text: bool,

    /// Config file (defaults to ~/.config/tessera/config.json)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Console width in cells
    #[arg(long, value_name = "COLS")]
    cols: Option<i32>,

    /// Console height in cells
    #[arg(long, value_name = "ROWS")]
    rows: Option<i32>,

    /// Wrap text at this many columns (0 = no wrapping)
    #[arg(short, long, default_value_t = 0)]
    wrap: i32,

    /// Number of leading lines to skip
    #[arg(short, long, default_value_t = 0)]
    skip: i32,

    /// Center the first line on the middle column
    #[arg(long)]
    center: bool,

    /// Number of frames to run before taking the snapshot
    #[arg(short, long, default_value_t = 1)]
    frames: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };
    if let Some(cols) = args.cols {
        config.width = cols;
    }
    if let Some(rows) = args.rows {
        config.height = rows;
    }
    config.validate()?;

    // Read input
    let text = if let Some(path) = &args.input {
        std::fs::read_to_string(path)?
    } else {
        let mut data = String::new();
        io::stdin().read_to_string(&mut data)?;
        data
    };
    let text = text.trim_end_matches('\n');

    let font = Arc::new(MonospaceFont::new(config.tile_width, config.tile_height));
    let console = Console::from_config(&config, font)?;

    if args.center {
        console.print_ctr_adj(console.width() / 2, 0, text, &[])?;
    } else {
        let lines = console.print_bounded_offset(0, 0, args.wrap, 0, args.skip, text, &[])?;
        tracing::debug!("laid out {} lines", lines);
    }

    let mut host = HeadlessHost::new(args.frames);
    console.start(config.scale, &mut host)?;

    let snapshot = console.snapshot()?;
    let output = if args.text {
        snapshot.to_text()
    } else {
        snapshot.to_json()?
    };

    if let Some(path) = &args.output {
        std::fs::write(path, output)?;
    } else {
        io::stdout().write_all(output.as_bytes())?;
    }

    Ok(())
}
