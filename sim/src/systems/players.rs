use bevy::prelude::*;

use crate::{messages::SpawnProjectile, resources::LevelStatus};
use common::{
    components::{Facing, Position, StepTime, Velocity},
    input::InputSnapshot,
    map::TileMap,
    markers::PlayerMarker,
    physics::{Blocked, Body},
    players::{DamageSource, PlayerController, PlayerEvent},
    projectiles::ProjectileKind,
};

// ============================================================================
// Player Update System
// ============================================================================

pub fn player_update_system(
    step: Res<StepTime>,
    input: Res<InputSnapshot>,
    map: Res<TileMap>,
    mut status: ResMut<LevelStatus>,
    mut spawns: MessageWriter<SpawnProjectile>,
    mut query: Query<(&mut PlayerController, &Position, &mut Velocity, &mut Body, &Blocked), With<PlayerMarker>>,
) {
    for (mut player, pos, mut vel, mut body, blocked) in &mut query {
        let events = player.before_update(&step, &input, pos, &mut vel, &mut body, blocked, map.height_px());
        for event in events {
            match event {
                PlayerEvent::SpawnFireball(tier) => {
                    spawns.write(SpawnProjectile {
                        kind: ProjectileKind::Fireball(tier),
                        power: tier.power(),
                        origin: *pos,
                        direction: player.facing,
                    });
                }
                PlayerEvent::Died => player_died(&mut status, step.now_ms),
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

// Damages the player and records the death if the hit was lethal
pub fn apply_player_hit(
    player: &mut PlayerController,
    vel: &mut Velocity,
    damage: f32,
    direction: Facing,
    source: DamageSource,
    now_ms: f64,
    status: &mut LevelStatus,
) {
    if player.hit(damage, direction, source, vel) == Some(PlayerEvent::Died) {
        player_died(status, now_ms);
    } else if player.is_hurting() {
        debug!("player hit for {damage:.1} by {source:?}, health {:.1}", player.health.current());
    }
}

fn player_died(status: &mut LevelStatus, now_ms: f64) {
    if *status == LevelStatus::Running {
        *status = LevelStatus::PlayerDead { died_at: now_ms };
        info!("player died at {:.1}s", now_ms / 1000.0);
    }
}
