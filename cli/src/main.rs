mod script;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use piecework::config::{ConfigError, EngineConfig, parse_hit_test};
use piecework::hit::HitTestMode;
use piecework::input::Mode;
use piecework::snapshot::{SnapshotError, decode_pieces, encode_pieces};
use piecework::{EngineCore, EngineError, Piece, Point};
use serde::Serialize;
use tracing_subscriber::filter::LevelFilter;

use crate::script::{ScriptError, parse_events};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("engine rejected command: {0}")]
    Engine(#[from] EngineError),
    #[error("failed to write report: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "piecework", about = "Drive the puzzle-piece engine from recorded pointer events")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a pointer script and print the resulting pieces.
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Event script, one JSON pointer event per line (`-` for stdin).
    #[arg(long)]
    events: String,

    /// Stored piece list to load before replaying.
    #[arg(long)]
    pieces: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ModeArg::Create)]
    mode: ModeArg,

    /// Horizontal screen offset of the image.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset_x: f64,

    /// Vertical screen offset of the image.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    offset_y: f64,

    /// Hit-test shape; overrides PIECEWORK_HIT_TEST.
    #[arg(long, value_parser = parse_hit_test)]
    hit_test: Option<HitTestMode>,

    /// Also write the exported pieces as a stored snapshot.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ModeArg {
    Create,
    Play,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Create => Mode::Create,
            ModeArg::Play => Mode::Play,
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    pieces: Vec<Piece>,
    complete: bool,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Replay(args) => run_replay(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt().with_writer(io::stderr).with_max_level(level).init();
}

fn run_replay(args: ReplayArgs) -> Result<(), CliError> {
    let mut config = EngineConfig::from_env()?;
    if let Some(hit_test) = args.hit_test {
        config.hit_test = hit_test;
    }

    let mut core = EngineCore::with_config(config);
    core.set_mode(args.mode.into())?;
    core.set_image_offset(Point::new(args.offset_x, args.offset_y));

    if let Some(path) = &args.pieces {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.clone(), source })?;
        core.load_snapshot(decode_pieces(&text)?);
    }

    let events = parse_events(open_events(&args.events)?)?;
    tracing::info!(events = events.len(), mode = ?core.mode(), "replaying");

    for action in core.replay(events) {
        tracing::info!(?action, "action");
    }
    if !core.input.is_idle() {
        tracing::warn!(state = ?core.input, "script ended mid-gesture");
    }

    let pieces = core.export_pieces();
    if let Some(path) = &args.out {
        write_snapshot(path, &pieces)?;
    }

    let report = Report { pieces, complete: core.is_complete() };
    let json = if args.pretty { serde_json::to_string_pretty(&report)? } else { serde_json::to_string(&report)? };
    println!("{json}");
    Ok(())
}

fn open_events(source: &str) -> Result<Box<dyn BufRead>, CliError> {
    if source == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let path = PathBuf::from(source);
    let file = File::open(&path).map_err(|source| CliError::Open { path, source })?;
    Ok(Box::new(BufReader::new(file)))
}

fn write_snapshot(path: &Path, pieces: &[Piece]) -> Result<(), CliError> {
    let encoded = encode_pieces(pieces)?;
    std::fs::write(path, encoded).map_err(|source| CliError::Write { path: path.to_path_buf(), source })?;
    tracing::info!(path = %path.display(), pieces = pieces.len(), "snapshot written");
    Ok(())
}
