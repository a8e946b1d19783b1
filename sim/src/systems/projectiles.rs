use bevy::prelude::*;

use crate::{
    messages::SpawnProjectile,
    resources::{IdAllocator, ProjectileInfo, ProjectileMap},
};
use common::{
    components::{Position, StepTime},
    lighting::SceneLighting,
    markers::ProjectileMarker,
    projectiles::Projectile,
};

// ============================================================================
// Projectile Update System
// ============================================================================

// Advances explosions and despawns projectiles once their explosion finishes
pub fn projectile_update_system(
    mut commands: Commands,
    step: Res<StepTime>,
    mut projectiles: ResMut<ProjectileMap>,
    mut query: Query<(Entity, &mut Projectile, &Position), With<ProjectileMarker>>,
) {
    let delta = step.delta();
    for (entity, mut projectile, pos) in &mut query {
        if projectile.update(delta, *pos) {
            trace!("{} destroyed", projectile.name);
            projectiles.0.remove(&projectile.id);
            commands.entity(entity).despawn();
        }
    }
}

// ============================================================================
// Projectile Spawn System
// ============================================================================

pub fn projectile_spawn_system(
    mut commands: Commands,
    mut reader: MessageReader<SpawnProjectile>,
    lighting: Res<SceneLighting>,
    mut ids: ResMut<IdAllocator>,
    mut projectiles: ResMut<ProjectileMap>,
) {
    for msg in reader.read() {
        let id = ids.projectile();
        let projectile = Projectile::new(id, msg.kind, msg.power, msg.direction, lighting.is_night());
        let pos = msg.kind.spawn_position(msg.origin, msg.direction);
        let vel = projectile.velocity();
        debug!("spawning {} at ({:.0}, {:.0})", projectile.name, pos.x, pos.y);

        let entity = commands
            .spawn((ProjectileMarker, id, pos, vel, msg.kind.body(), projectile))
            .id();
        projectiles.0.insert(id, ProjectileInfo { entity });
    }
}
