use bevy::prelude::*;

use crate::{
    messages::LightSwitch,
    resources::{
        CoinInfo, CoinMap, IdAllocator, LevelStatus, MonsterInfo, MonsterMap, PlayerEntity, SimRng, SpawnSettings,
    },
};
use common::{
    coins::Coin,
    components::{Position, StepTime, Velocity},
    level::LevelData,
    lighting::SceneLighting,
    markers::{CoinMarker, MonsterMarker, PlayerMarker, ProjectileMarker},
    monsters::Monster,
    physics::{Blocked, Body, Contacts},
    players::PlayerController,
    projectiles::Projectile,
    score::ScoreLedger,
};

// ============================================================================
// Level Spawn System
// ============================================================================

// Places the player, monsters and coins described by the level
pub fn level_spawn_system(
    mut commands: Commands,
    level: Res<LevelData>,
    settings: Res<SpawnSettings>,
    mut rng: ResMut<SimRng>,
    mut ids: ResMut<IdAllocator>,
    mut player_entity: ResMut<PlayerEntity>,
    mut monsters: ResMut<MonsterMap>,
    mut coins: ResMut<CoinMap>,
) {
    let player = commands
        .spawn((
            PlayerMarker,
            PlayerController::new(),
            Position::from(level.player_spawn),
            Velocity::default(),
            PlayerController::body(),
            Contacts::default(),
            Blocked::default(),
        ))
        .id();
    player_entity.0 = Some(player);

    if settings.monsters {
        for (kind, pos) in level.monster_spawns() {
            let id = ids.monster();
            let monster = Monster::spawn(id, kind, pos, &mut rng.0);
            info!("spawned {} at ({:.0}, {:.0})", monster.name, pos.x, pos.y);

            let name = monster.name.clone();
            let entity = commands
                .spawn((
                    MonsterMarker,
                    id,
                    monster,
                    pos,
                    Velocity::default(),
                    Monster::body(kind),
                    Contacts::default(),
                    Blocked::default(),
                ))
                .id();
            monsters.0.insert(id, MonsterInfo { entity, name });
        }
    }

    for spawn in &level.coins {
        let id = ids.coin();
        let entity = commands
            .spawn((
                CoinMarker,
                id,
                Coin::new(id, spawn.kind),
                Position::new(spawn.x, spawn.y),
                Coin::body(),
            ))
            .id();
        coins.0.insert(id, CoinInfo { entity });
    }

    info!(
        "level {} ready: {} monsters, {} coins",
        level.name,
        monsters.0.len(),
        coins.0.len()
    );
}

// ============================================================================
// Level Status System
// ============================================================================

// Completes the level when the living player reaches the exit
pub fn level_status_system(
    step: Res<StepTime>,
    level: Res<LevelData>,
    mut ledger: ResMut<ScoreLedger>,
    mut status: ResMut<LevelStatus>,
    query: Query<(&PlayerController, &Position, &Body), With<PlayerMarker>>,
) {
    if *status != LevelStatus::Running {
        return;
    }
    let Ok((player, pos, body)) = query.single() else {
        return;
    };
    if player.is_dead() || !body.shape(pos).overlaps(&level.exit_bounds()) {
        return;
    }

    let award = ledger.level_completed(step.now_ms);
    *status = LevelStatus::Completed {
        elapsed_ms: step.now_ms,
        award,
    };
    info!(
        "level {} completed in {:.1}s, +{award} points (score {})",
        level.name,
        step.now_ms / 1000.0,
        ledger.total()
    );
}

// ============================================================================
// Lighting System
// ============================================================================

// Applies day/night switches to the player's torch and every live projectile light
pub fn lighting_system(
    mut reader: MessageReader<LightSwitch>,
    mut lighting: ResMut<SceneLighting>,
    mut players: Query<&mut PlayerController, With<PlayerMarker>>,
    mut projectiles: Query<&mut Projectile, With<ProjectileMarker>>,
) {
    let mut changed = false;
    for switch in reader.read() {
        changed |= match switch {
            LightSwitch::Off => lighting.lights_off(),
            LightSwitch::On => lighting.lights_on(),
        };
    }
    if !changed {
        return;
    }

    let night = lighting.is_night();
    for mut player in &mut players {
        player.torch.on = night;
    }
    for mut projectile in &mut projectiles {
        projectile.set_light(night);
    }
    info!("lights {}", if night { "off" } else { "on" });
}
