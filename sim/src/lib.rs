pub mod config;
pub mod messages;
pub mod resources;
pub mod systems;

use anyhow::Result;
use bevy::prelude::*;

pub use config::{Args, SimConfig};
pub use resources::{LevelStatus, SimReport};

use messages::{LightSwitch, SpawnProjectile};
use resources::*;
use systems::*;

use common::{
    components::StepTime, input::InputSnapshot, lighting::SceneLighting, players::PlayerController,
    score::ScoreLedger,
};

// ============================================================================
// App Setup
// ============================================================================

// Builds the simulation app without any plugins; the caller adds logging and runs the steps
pub fn build_app(config: SimConfig) -> Result<App> {
    let map = config.level.tile_map()?;

    let mut app = App::new();
    app.insert_resource(map)
        .insert_resource(config.level)
        .insert_resource(config.input)
        .insert_resource(SpawnSettings {
            monsters: config.spawn_monsters,
        })
        .insert_resource(SimRng::seeded(config.seed))
        .init_resource::<StepTime>()
        .init_resource::<TickCount>()
        .init_resource::<InputSnapshot>()
        .init_resource::<ScoreLedger>()
        .init_resource::<SceneLighting>()
        .init_resource::<LevelStatus>()
        .init_resource::<ContactPairs>()
        .init_resource::<IdAllocator>()
        .init_resource::<MonsterMap>()
        .init_resource::<ProjectileMap>()
        .init_resource::<CoinMap>()
        .init_resource::<PlayerEntity>()
        .add_message::<SpawnProjectile>()
        .add_message::<LightSwitch>()
        .add_systems(Startup, level_spawn_system)
        .add_systems(
            Update,
            (
                // One step runs in a fixed order:
                // 1. Advance the clock and replay input
                // 2. Before-update logic for the player, monsters and projectiles
                // 3. Physics, then contact resolution
                // 4. After-update latching and level flow
                clock_system,
                input_replay_system,
                player_update_system,
                monster_update_system,
                projectile_update_system,
                projectile_spawn_system,
                physics_system,
                contact_pairs_system,
                collision_system,
                after_update_system,
                level_status_system,
                lighting_system,
            )
                .chain(),
        );

    Ok(app)
}

// ============================================================================
// Run State
// ============================================================================

#[must_use]
pub fn is_finished(world: &World) -> bool {
    let now = world.get_resource::<StepTime>().map_or(0.0, |step| step.now_ms);
    world
        .get_resource::<LevelStatus>()
        .is_some_and(|status| status.is_finished(now))
}

// Snapshot of the run for logging and tests
#[must_use]
pub fn report(world: &World) -> SimReport {
    let player_health = world
        .get_resource::<PlayerEntity>()
        .and_then(|player| player.0)
        .and_then(|entity| world.get::<PlayerController>(entity))
        .map_or(0.0, |player| player.health.current());

    SimReport {
        ticks: world.get_resource::<TickCount>().map_or(0, |ticks| ticks.0),
        elapsed_ms: world.get_resource::<StepTime>().map_or(0.0, |step| step.now_ms),
        score: world.get_resource::<ScoreLedger>().map_or(0, ScoreLedger::total),
        status: world.get_resource::<LevelStatus>().copied().unwrap_or_default(),
        player_health,
        monsters: world.get_resource::<MonsterMap>().map_or(0, |map| map.0.len()),
        projectiles: world.get_resource::<ProjectileMap>().map_or(0, |map| map.0.len()),
        coins: world.get_resource::<CoinMap>().map_or(0, |map| map.0.len()),
        night: world.get_resource::<SceneLighting>().is_some_and(SceneLighting::is_night),
    }
}
