use bevy::prelude::*;

use super::players::apply_player_hit;
use crate::{
    messages::{LightSwitch, SpawnProjectile},
    resources::{LevelStatus, MonsterMap, SimRng},
};
use common::{
    components::{Position, StepTime, Velocity},
    map::TileMap,
    markers::{MonsterMarker, PlayerMarker},
    monsters::{Monster, MonsterEvent, Surroundings},
    physics::{Blocked, Body},
    players::{DamageSource, PlayerController},
    projectiles::ProjectileKind,
    score::ScoreLedger,
};

// ============================================================================
// Monster Update System
// ============================================================================

pub fn monster_update_system(
    mut commands: Commands,
    step: Res<StepTime>,
    map: Res<TileMap>,
    mut rng: ResMut<SimRng>,
    mut ledger: ResMut<ScoreLedger>,
    mut status: ResMut<LevelStatus>,
    mut monsters: ResMut<MonsterMap>,
    mut spawns: MessageWriter<SpawnProjectile>,
    mut lights: MessageWriter<LightSwitch>,
    mut player_query: Query<
        (&mut PlayerController, &Position, &mut Velocity),
        (With<PlayerMarker>, Without<MonsterMarker>),
    >,
    mut monster_query: Query<
        (Entity, &mut Monster, &mut Position, &mut Velocity, &mut Body, &Blocked),
        (With<MonsterMarker>, Without<PlayerMarker>),
    >,
) {
    let Ok((mut player, player_pos, mut player_vel)) = player_query.single_mut() else {
        return;
    };
    let env = Surroundings {
        step: *step,
        player: *player_pos,
        player_dead: player.is_dead(),
        map: &map,
    };

    for (entity, mut monster, mut pos, mut vel, mut body, blocked) in &mut monster_query {
        let events = monster.update(&env, &mut rng.0, &mut pos, &mut vel, &mut body, blocked);

        for event in events {
            match event {
                MonsterEvent::DamagePlayer { damage, direction } => apply_player_hit(
                    &mut player,
                    &mut player_vel,
                    damage,
                    direction,
                    DamageSource::Monster(monster.id),
                    step.now_ms,
                    &mut status,
                ),
                MonsterEvent::SpawnBelch {
                    origin,
                    direction,
                    power,
                } => {
                    spawns.write(SpawnProjectile {
                        kind: ProjectileKind::Belch,
                        power,
                        origin,
                        direction,
                    });
                }
                MonsterEvent::LightsOff => {
                    lights.write(LightSwitch::Off);
                }
                MonsterEvent::LightsOn => {
                    lights.write(LightSwitch::On);
                }
                MonsterEvent::Died => info!("{} killed", monster.name),
                MonsterEvent::Dispose => {
                    if let Some(points) = monster.dispose(&mut ledger) {
                        info!("{} disposed, +{points} points (score {})", monster.name, ledger.total());
                    }
                    monsters.0.remove(&monster.id);
                    commands.entity(entity).despawn();
                }
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

// Applies the side effects of a fireball hit reported by `Monster::hit`
pub fn apply_monster_hit_events(events: Vec<MonsterEvent>, monster: &Monster, lights: &mut MessageWriter<LightSwitch>) {
    for event in events {
        match event {
            MonsterEvent::Died => info!("{} killed", monster.name),
            MonsterEvent::LightsOn => {
                lights.write(LightSwitch::On);
            }
            MonsterEvent::LightsOff => {
                lights.write(LightSwitch::Off);
            }
            other => debug!("ignoring {other:?} from hit on {}", monster.name),
        }
    }
}
