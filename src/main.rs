//! Spin Rally Simulator
//!
//! Plays an AI-versus-AI match headlessly and reports the result.
//! Settings come from the environment (see `MatchSettings::load_or_default`).

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spin_rally::{
    MatchController, MatchSettings, RallyPhase, TableConfig, TICK_RATE, VERSION,
    game::events::{TelemetryData, TelemetryEvent},
};

/// Hard stop for the demo match (simulated seconds).
const MAX_MATCH_SECONDS: u32 = 60 * 60;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Spin Rally Simulator v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    demo_match()
}

/// Run one AI-versus-AI match to completion (or the time cap).
fn demo_match() -> anyhow::Result<()> {
    info!("=== Starting Demo Match ===");

    let settings = MatchSettings {
        human_side: None,
        ..MatchSettings::load_or_default()
    };
    info!(
        "First to {} games of {} points, {} AI, seed {}",
        settings.games_to_win, settings.points_to_win, settings.ai_difficulty, settings.rng_seed
    );

    let mut controller = MatchController::new(TableConfig::default(), settings, "Left Bot", "Right Bot")
        .context("invalid match configuration")?;

    let frame = 1.0 / TICK_RATE as f32;
    let max_ticks = MAX_MATCH_SECONDS * TICK_RATE;
    let mut log: Vec<TelemetryEvent> = Vec::new();
    let mut points = 0u32;

    for t in 0..max_ticks {
        controller.tick(frame);

        for event in controller.take_telemetry() {
            if let TelemetryData::PointOver { .. } = event.data {
                points += 1;
            }
            log.push(event);
        }

        if t % (TICK_RATE * 60) == 0 && t > 0 {
            let snap = controller.snapshot();
            info!(
                "{}s: games {}-{}, points {}-{}",
                t / TICK_RATE,
                snap.match_score.a,
                snap.match_score.b,
                snap.game_score.a,
                snap.game_score.b
            );
        }

        if controller.phase() == RallyPhase::MatchOver {
            info!("Match ended at tick {}", t);
            break;
        }
    }

    // Print final results
    info!("=== Match Results ===");
    let snap = controller.snapshot();
    match controller.winner() {
        Some(side) => info!("Winner: {} ({})", snap.players[side].name, side),
        None => info!("No winner after {} simulated seconds", MAX_MATCH_SECONDS),
    }
    info!("Games: {}-{}", snap.match_score.a, snap.match_score.b);
    info!("Points played: {}", points);
    info!("Final State Hash: {}", hex::encode(snap.compute_hash()));

    let json = serde_json::to_string_pretty(&log).context("serializing telemetry")?;
    println!("{}", json);

    Ok(())
}
