use bevy::prelude::*;

use super::{monsters::apply_monster_hit_events, players::apply_player_hit};
use crate::{
    messages::LightSwitch,
    resources::{CoinMap, ContactPairs, LevelStatus, SimRng},
};
use common::{
    coins::Coin,
    collision::CollisionCategory,
    components::{Position, StepTime, Velocity},
    map::TileMap,
    markers::{CoinMarker, MonsterMarker, PlayerMarker, ProjectileMarker},
    monsters::{Monster, MonsterEvent, Surroundings},
    physics::Body,
    players::{DamageSource, PlayerController},
    projectiles::{Projectile, ProjectileKind},
    score::ScoreLedger,
};

type PlayerQuery<'w, 's> = Query<
    'w,
    's,
    (&'static mut PlayerController, &'static Position, &'static mut Velocity, &'static Body),
    (With<PlayerMarker>, Without<MonsterMarker>, Without<ProjectileMarker>),
>;

type MonsterQuery<'w, 's> = Query<
    'w,
    's,
    (&'static mut Monster, &'static Position, &'static mut Velocity, &'static mut Body),
    (With<MonsterMarker>, Without<PlayerMarker>, Without<ProjectileMarker>),
>;

type ProjectileQuery<'w, 's> = Query<
    'w,
    's,
    (&'static mut Projectile, &'static mut Velocity),
    (With<ProjectileMarker>, Without<PlayerMarker>, Without<MonsterMarker>),
>;

// ============================================================================
// Collision System
// ============================================================================

// Resolves this step's contact pairs: projectile impacts, monster bites, coin pickups
pub fn collision_system(
    mut commands: Commands,
    step: Res<StepTime>,
    map: Res<TileMap>,
    contacts: Res<ContactPairs>,
    mut rng: ResMut<SimRng>,
    mut ledger: ResMut<ScoreLedger>,
    mut status: ResMut<LevelStatus>,
    mut coins: ResMut<CoinMap>,
    mut lights: MessageWriter<LightSwitch>,
    mut player_query: PlayerQuery,
    mut monster_query: MonsterQuery,
    mut projectile_query: ProjectileQuery,
    mut coin_query: Query<(&mut Coin, &Position), With<CoinMarker>>,
) {
    for &entity in &contacts.terrain {
        if let Ok((mut projectile, mut vel)) = projectile_query.get_mut(entity)
            && projectile.on_contact(CollisionCategory::Terrain, &mut vel)
        {
            trace!("{} hit terrain", projectile.name);
        }
    }

    for pair in &contacts.pairs {
        // Projectile impacts
        if let Some((this, other, other_category)) = pair.side(CollisionCategory::is_projectile) {
            let Ok((mut projectile, mut vel)) = projectile_query.get_mut(this) else {
                continue;
            };
            if !projectile.on_contact(other_category, &mut vel) {
                continue;
            }

            match (projectile.kind, other_category) {
                (ProjectileKind::Fireball(tier), CollisionCategory::Monster(_)) => {
                    if let Ok((mut monster, _, mut monster_vel, mut body)) = monster_query.get_mut(other) {
                        let events = monster.hit(
                            tier,
                            projectile.power,
                            projectile.direction,
                            &mut rng.0,
                            &mut monster_vel,
                            &mut body,
                        );
                        apply_monster_hit_events(events, &monster, &mut lights);
                    }
                }
                (ProjectileKind::Belch, CollisionCategory::Player) => {
                    if let Ok((mut player, _, mut player_vel, _)) = player_query.get_mut(other) {
                        apply_player_hit(
                            &mut player,
                            &mut player_vel,
                            projectile.power,
                            projectile.direction,
                            DamageSource::Projectile(projectile.id),
                            step.now_ms,
                            &mut status,
                        );
                    }
                }
                _ => {}
            }
            continue;
        }

        let Some((player_entity, other, other_category)) = pair.side(|c| c == CollisionCategory::Player) else {
            continue;
        };
        let Ok((mut player, player_pos, mut player_vel, player_body)) = player_query.get_mut(player_entity) else {
            continue;
        };

        match other_category {
            // Monster bites
            CollisionCategory::Monster(_) => {
                let Ok((mut monster, monster_pos, _, _)) = monster_query.get_mut(other) else {
                    continue;
                };
                let env = Surroundings {
                    step: *step,
                    player: *player_pos,
                    player_dead: player.is_dead(),
                    map: &map,
                };
                for event in monster.on_player_contact(&env, &mut rng.0, monster_pos) {
                    if let MonsterEvent::DamagePlayer { damage, direction } = event {
                        apply_player_hit(
                            &mut player,
                            &mut player_vel,
                            damage,
                            direction,
                            DamageSource::Monster(monster.id),
                            step.now_ms,
                            &mut status,
                        );
                    }
                }
            }
            // Coin pickups
            CollisionCategory::Pickup => {
                let Ok((mut coin, coin_pos)) = coin_query.get_mut(other) else {
                    continue;
                };
                if !coin.touches(coin_pos, &player_body.shape(player_pos)) {
                    continue;
                }
                if let Some(points) = coin.collect(&mut ledger) {
                    info!("{:?} coin collected, +{points} points (score {})", coin.kind, ledger.total());
                    coins.0.remove(&coin.id);
                    commands.entity(other).despawn();
                }
            }
            _ => {}
        }
    }
}
