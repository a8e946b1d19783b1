use anyhow::Result;
use bevy::prelude::*;
use clap::Parser;
use std::time::{Duration, Instant};

use common::constants::STEP_HZ;
use sim::{Args, SimConfig, build_app, is_finished, report};

const LOG_FILTER: &str = "bevy_app=warn,bevy_ecs=warn";

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    let config = SimConfig::from_args(&args)?;

    let level_name = config.level.name.clone();
    let seed = config.seed;
    let max_ticks = config.ticks;
    let realtime = config.realtime;
    let scripted = config.input.len();

    let mut app = build_app(config)?;
    app.add_plugins(MinimalPlugins).add_plugins(bevy::log::LogPlugin {
        level: bevy::log::Level::INFO,
        filter: LOG_FILTER.to_string(),
        ..default()
    });
    app.finish();
    app.cleanup();

    info!("running level {level_name} with seed {seed}, {scripted} scripted inputs");

    // Step the app manually at STEP_HZ; without --realtime the steps run back to back
    let tick_duration = Duration::from_nanos(1_000_000_000 / u64::from(STEP_HZ));

    for tick in 0..max_ticks {
        let update_start = Instant::now();
        app.update();
        let update_elapsed = update_start.elapsed();

        if realtime {
            if update_elapsed > tick_duration {
                warn!(
                    "tick {} took {:.2}ms (exceeded {:.2}ms budget)",
                    tick,
                    update_elapsed.as_secs_f64() * 1000.0,
                    tick_duration.as_secs_f64() * 1000.0
                );
            } else {
                std::thread::sleep(tick_duration - update_elapsed);
            }
        }

        if is_finished(app.world()) {
            break;
        }
    }

    let summary = report(app.world());
    info!(
        "finished after {} ticks ({:.1}s): {}, score {}, health {:.0}",
        summary.ticks,
        summary.elapsed_ms / 1000.0,
        summary.status.as_str(),
        summary.score,
        summary.player_health
    );
    info!(
        "{} monsters, {} projectiles and {} coins left{}",
        summary.monsters,
        summary.projectiles,
        summary.coins,
        if summary.night { ", lights off" } else { "" }
    );
    Ok(())
}
