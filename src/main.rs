//! Castle Arrows headless runner
//!
//! Drives the engine without a renderer: an autopilot aims at the nearest
//! enemy and fires, which is handy for balance checks and replaying seeds.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use glam::Vec2;

use castle_arrows::consts::SIM_DT;
use castle_arrows::sim::{GameEvent, GamePhase};
use castle_arrows::{Game, Settings};

#[derive(Parser, Debug)]
#[command(name = "castle-arrows", about = "Run a headless Castle Arrows session")]
struct Args {
    /// Run seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Frames to simulate (60 per second)
    #[arg(long, default_value_t = 60 * 60)]
    frames: u32,
    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Let enemies walk in without shooting back
    #[arg(long)]
    no_autopilot: bool,
    /// Print the final snapshot as JSON
    #[arg(long)]
    dump: bool,
}

/// Nearest enemy to the archer, if any
fn nearest_enemy(game: &Game) -> Option<Vec2> {
    let state = game.state();
    let player = state.player.pos;
    state
        .enemies
        .iter()
        .map(|e| e.pos)
        .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let mut game = Game::with_settings(args.seed, settings)?;
    log::info!("Castle Arrows (headless) starting with seed {}", args.seed);

    game.start();
    let mut frames_run = 0;
    for _ in 0..args.frames {
        if !args.no_autopilot {
            match nearest_enemy(&game) {
                Some(target) => {
                    game.aim_at(target);
                    game.shoot_arrow(true);
                }
                None => game.clear_aim(),
            }
        }
        game.advance_frame(SIM_DT);
        frames_run += 1;

        for event in game.drain_events() {
            if let GameEvent::PlayerHit { lives_left, .. } = event {
                log::info!("Archer hit! {} lives left", lives_left);
            }
        }
        if game.phase() == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Finished after {} frames: phase {:?}, score {}, lives {}",
        frames_run,
        game.phase(),
        game.score(),
        game.lives()
    );

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&game.get_state())?);
    }
    Ok(())
}
