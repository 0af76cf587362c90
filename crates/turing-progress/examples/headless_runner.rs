//! Headless runner: loads the bundled levels, finds a short solution for each
//! by breadth-first search over engine clones, then plays it through a
//! [`Game`] so medals and achievements are recorded.
//!
//! Run with: `RUST_LOG=debug cargo run --package turing-progress --example headless_runner`

use std::collections::VecDeque;
use std::path::Path;

use chrono::Local;
use tracing_subscriber::EnvFilter;
use turing_core::engine::{ClickOutcome, GameState, PuzzleEngine};
use turing_core::level::LevelDef;
use turing_data::{GameConfig, load_config, load_levels};
use turing_progress::notify::Toast;
use turing_progress::storage::{JsonFileStorage, MemoryStorage, Storage};
use turing_progress::translate::KeyTranslator;
use turing_progress::{Game, GameError};

/// Deepest click sequence the search will try.
const MAX_DEPTH: usize = 8;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let data_dir = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../turing-data/data"));
    let levels = load_levels(data_dir).expect("failed to load levels");
    let config = load_config(data_dir).expect("failed to load config");
    println!("Loaded {} levels", levels.len());

    let result = match &config.storage_dir {
        Some(dir) => {
            let storage = JsonFileStorage::open(dir).expect("failed to open storage");
            run(levels, &config, storage)
        }
        None => run(levels, &config, MemoryStorage::new()),
    };
    if let Err(e) = result {
        eprintln!("run failed: {e}");
        std::process::exit(1);
    }
}

fn run<S: Storage>(
    levels: turing_core::level::LevelSet,
    config: &GameConfig,
    storage: S,
) -> Result<(), GameError> {
    let mut engine_config = config.engine_config();
    engine_config.animate = false;
    let now = Local::now().naive_local();

    let mut game = Game::new(
        levels,
        engine_config,
        storage,
        Toast::new(config.notification_ms),
        KeyTranslator,
        now,
    )?;

    loop {
        let level = game.level().clone();
        print!("Level {:>2} (start {:>5}): ", level.level_number, level.start_score);

        match solve(&level, game.engine()) {
            Some(clicks) => {
                for &index in &clicks {
                    game.click(index, now)?;
                }
                let medal = game.engine().earned_medal().unwrap_or_default();
                println!("solved in {} clicks {:?} -> {medal}", clicks.len(), clicks);
            }
            None => println!("no solution within {MAX_DEPTH} clicks"),
        }

        for event in game.drain_events() {
            tracing::debug!(?event, "applied");
        }
        if let Some(message) = game.notifier().message() {
            println!("    notification: {message}");
        }
        if game.engine().state() != GameState::LevelComplete || !game.advance(now)? {
            break;
        }
    }

    println!("\nBest medals:");
    for (level, medal) in game.ledger().iter() {
        println!("  level {level}: {medal}");
    }
    println!("Achievements: {}", game.achievements().len());
    Ok(())
}

/// Shortest click sequence completing `level`, if one exists within reach.
fn solve(level: &LevelDef, start: &PuzzleEngine) -> Option<Vec<usize>> {
    let depth = MAX_DEPTH.min(level.bronze_steps as usize);
    let mut queue = VecDeque::from([(start.clone(), Vec::new())]);

    while let Some((engine, path)) = queue.pop_front() {
        if path.len() >= depth {
            continue;
        }
        for index in 0..engine.buttons().len() {
            let mut next = engine.clone();
            let now = Local::now().naive_local();
            if !matches!(next.click(index, now), Ok(ClickOutcome::Settled)) {
                continue;
            }
            let mut path = path.clone();
            path.push(index);
            if next.state() == GameState::LevelComplete {
                return Some(path);
            }
            queue.push_back((next, path));
        }
    }
    None
}
