use std::{
    io::{self, BufRead},
    path::{Path, PathBuf},
    process::exit,
    time::SystemTime,
};

use clap::{Parser, Subcommand, ValueEnum};
use fox_checkers::{
    bench::bench,
    board::Board,
    game::{FIRST_SIDE, GameConfig, Opponent},
    interface::TextInterface,
    search::DEFAULT_SEARCH_DEPTH,
};
use log::{LevelFilter, error, info};

build_info::build_info!(fn build_info);

#[derive(Parser, Debug)]
#[command(name = "fox-checkers", about = "Checkers against a minimax opponent, played over stdin")]
struct Args {
    /// Who plays Blue
    #[arg(long, value_enum, default_value_t = OpponentArg::Computer)]
    opponent: OpponentArg,
    /// Plies searched by the computer
    #[arg(long, default_value_t = DEFAULT_SEARCH_DEPTH, value_parser = clap::value_parser!(u8).range(1..))]
    depth: u8,
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
    /// Also append log output to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read commands from stdin (the default)
    Play,
    /// Count the leaves of the move tree from the starting position
    Perft {
        depth: u8,
        /// Print the count below each first move
        #[arg(long)]
        divide: bool,
    },
    /// Time searches over random positions
    Bench {
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
        depth: Option<u8>,
        #[arg(long, default_value_t = 20)]
        positions: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print build information
    Version,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OpponentArg {
    Computer,
    Human,
}

impl From<OpponentArg> for Opponent {
    fn from(value: OpponentArg) -> Self {
        match value {
            OpponentArg::Computer => Opponent::Computer,
            OpponentArg::Human => Opponent::Human,
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = setup_logger(args.log_level, args.log_file.as_deref()) {
        eprintln!("Failed to set up logging: {e}");
        exit(1);
    }
    log_panics::init();

    info!("{}", version_banner());

    let config = GameConfig {
        opponent: args.opponent.into(),
        search_depth: args.depth,
    };

    match args.command.unwrap_or(Command::Play) {
        Command::Play => play(config),
        Command::Perft { depth, divide } => {
            match Board::new().start_perft(depth, FIRST_SIDE, divide, &mut io::stdout()) {
                Ok(nodes) => println!("nodes {nodes}"),
                Err(e) => error!("Failed to write to stdout: {e}"),
            }
        }
        Command::Bench { depth, positions, seed } => {
            bench(depth.unwrap_or(args.depth), positions, seed);
        }
        Command::Version => println!("{}", version_banner()),
    }
}

fn setup_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_millis(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr());

    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}

fn version_banner() -> String {
    let info = build_info();
    format!(
        "{} {} ({} build, {})",
        info.crate_info.name, info.crate_info.version, info.profile, info.timestamp
    )
}

fn play(config: GameConfig) {
    let mut interface = TextInterface::new(config, io::stdout());

    if let Err(e) = interface.process_command("board") {
        error!("Failed to write to stdout: {e}");
        return;
    }

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {e}");
                break;
            }
        };

        match interface.process_command(&line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!("Failed to write to stdout: {e}");
                break;
            }
        }
    }
}
