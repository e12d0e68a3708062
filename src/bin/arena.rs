//! AI vs AI arena.
//!
//! Plays a series of games between two difficulty tiers, each starting
//! from a short seeded random opening, and reports the tally.
//!
//! ```text
//! arena --variant mill --first easy --second hard --games 10
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use boardstake::core::{GameConfig, GameRng, Side, SowingStyle, Variant};
use boardstake::games::Game;
use boardstake::rules::{GameResult, RulesEngine};
use boardstake::search::{playout, Difficulty, RandomPlayer};
use boardstake::session::{MatchMode, Session};
use boardstake::settings::Settings;
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game to play: sowing, draughts or mill
    #[arg(short, long, default_value = "sowing")]
    variant: Variant,

    /// Sowing rule set (oware or kalah), overrides the settings file
    #[arg(long)]
    style: Option<SowingStyle>,

    /// Difficulty of the first side
    #[arg(long, default_value = "medium")]
    first: Difficulty,

    /// Difficulty of the second side
    #[arg(long, default_value = "medium")]
    second: Difficulty,

    /// Number of games to play
    #[arg(short, long, default_value_t = 1)]
    games: u64,

    /// Random plies played before the AIs take over
    #[arg(long, default_value_t = 4)]
    opening_plies: usize,

    /// Seed for the random openings; each game forks its own stream
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// AI plies per game before it is abandoned as unfinished
    #[arg(long, default_value_t = 400)]
    max_plies: usize,

    /// Settings file (TOML)
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct Tally {
    first: u64,
    second: u64,
    draws: u64,
    unfinished: u64,
}

impl Tally {
    fn record(&mut self, result: Option<GameResult>) {
        match result.and_then(|r| r.winner()) {
            Some(Side::First) => self.first += 1,
            Some(Side::Second) => self.second += 1,
            None if result.is_some() => self.draws += 1,
            None => self.unfinished += 1,
        }
    }
}

fn main() -> ExitCode {
    initialize_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(tally) => {
            info!(
                first_wins = tally.first,
                second_wins = tally.second,
                draws = tally.draws,
                unfinished = tally.unfinished,
                "Arena finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Arena failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Tally, Box<dyn std::error::Error>> {
    let mut settings = match &args.settings {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    if let Some(style) = args.style {
        settings.sowing.style = style;
    }

    let config = settings.game_config(args.variant);
    let mode = MatchMode::AiVsAi {
        first: args.first,
        second: args.second,
    };
    info!(
        variant = %args.variant,
        first = %args.first,
        second = %args.second,
        games = args.games,
        "Starting arena"
    );

    let mut rng = GameRng::new(args.seed);
    let mut tally = Tally::default();
    for index in 0..args.games {
        let opener = RandomPlayer::new(rng.fork());
        let result = play_one(args, &config, &settings, mode, index, opener)?;
        tally.record(result);
    }
    Ok(tally)
}

fn play_one(
    args: &Args,
    config: &GameConfig,
    settings: &Settings,
    mode: MatchMode,
    index: u64,
    mut opener: RandomPlayer,
) -> Result<Option<GameResult>, Box<dyn std::error::Error>> {
    let game = Game::new(config);
    let (opening, plies) = playout(
        &game,
        &game.initial_state(),
        &mut opener,
        args.opening_plies,
        |_, mv, _| debug!(%mv, "Opening move"),
    );

    let mut session = Session::resume(
        format!("arena-{index}"),
        config,
        mode,
        settings.search.clone(),
        opening,
    )?;

    let mut ai_plies = 0;
    while ai_plies < args.max_plies && session.step_ai().is_some() {
        ai_plies += 1;
    }

    let state = session.state();
    match state.result() {
        Some(result) => info!(
            game = index,
            ?result,
            opening_plies = plies,
            ai_plies,
            first_captured = state.captured_by(Side::First),
            second_captured = state.captured_by(Side::Second),
            "Game over"
        ),
        None => warn!(game = index, ai_plies, "Game abandoned unfinished"),
    }
    println!("{state}");

    Ok(state.result())
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,boardstake=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
