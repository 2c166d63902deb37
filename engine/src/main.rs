use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use serde_json::json;

use checkers_engine::game::DEFAULT_MAX_QUIET_PLIES;
use checkers_engine::{Engine, Game, GameStatus, Move, Side};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Player {
    Human,
    Ai,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Play checkers against a minimax engine", long_about = None)]
struct Args {
    /// Search depth in plies
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=12))]
    depth: u32,
    #[arg(long, value_enum, default_value_t = Player::Ai)]
    dark: Player,
    #[arg(long, value_enum, default_value_t = Player::Human)]
    light: Player,
    /// Side that opens the game
    #[arg(long, default_value = "dark")]
    first: Side,
    /// Consecutive king moves without a capture before a draw
    #[arg(long, default_value_t = DEFAULT_MAX_QUIET_PLIES)]
    max_quiet_plies: u32,
    /// Per-move search budget; deepens iteratively up to --depth
    #[arg(long)]
    time_ms: Option<u64>,
    /// Print each move, with the engine's search result, as a JSON line
    #[arg(long)]
    json: bool,
    #[arg(long, default_value = "info")]
    log_level: log::Level,
}

impl Args {
    fn player(&self, side: Side) -> Player {
        match side {
            Side::Dark => self.dark,
            Side::Light => self.light,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = simple_logger::init_with_level(args.log_level) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(status) => {
            info!("Game over: {status}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<GameStatus, Box<dyn Error>> {
    let engine = Engine::default();
    let mut game = Game::new(args.first).with_max_quiet_plies(args.max_quiet_plies);
    let budget = args.time_ms.map(Duration::from_millis);
    let mut lines = io::stdin().lock().lines();

    if !args.json {
        println!("{}", game.board());
    }
    while !game.status().is_over() {
        let side = game.turn();
        let (played, search) = match args.player(side) {
            Player::Ai => {
                let result = game.play_engine_move(&engine, args.depth, budget)?;
                (result.best_move.clone(), Some(result))
            }
            Player::Human => {
                let Some(mv) = read_human_move(&game, &mut lines)? else {
                    info!("Input closed, stopping");
                    return Ok(game.status());
                };
                game.play(&mv)?;
                (mv, None)
            }
        };

        if args.json {
            println!("{}", json!({ "move": played, "search": search, "status": game.status() }));
        } else {
            println!("{side}: {played}\n{}", game.board());
        }
    }
    Ok(game.status())
}

/// Lists the legal moves and reads the number of the chosen one; `None` once
/// stdin is exhausted.
fn read_human_move(
    game: &Game,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> io::Result<Option<Move>> {
    let moves = game.legal_moves();
    loop {
        for (i, mv) in moves.iter().enumerate() {
            println!("{i:>3}: {mv}");
        }
        print!("{} to move> ", game.turn());
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            return Ok(None);
        };
        match line.trim().parse::<usize>().ok().and_then(|i| moves.get(i)) {
            Some(mv) => return Ok(Some(mv.clone())),
            None => warn!("Expected a move number between 0 and {}", moves.len().saturating_sub(1)),
        }
    }
}
