pub mod chomper;
pub mod demon_flower;
pub mod flyfly;
pub mod skeleton;

use bevy_ecs::prelude::*;
use bevy_time::Timer;
use rand::Rng;

pub use chomper::{Chomper, ChomperMode};
pub use demon_flower::{DemonFlower, FlowerMode};
pub use flyfly::{Flyfly, FlyflyMode};
pub use skeleton::{Dormancy, Flight, Skeleton, SkeletonMode};

use crate::{
    collision::CollisionCategory,
    components::{
        Facing, Health, HealthBar, HitStats, LightProxy, MonsterId, MonsterKind, Position, StepTime, Velocity,
        anim_timer,
    },
    constants::*,
    map::TileMap,
    physics::{Blocked, Body, SensorSlot},
    projectiles::FireballTier,
    score::ScoreLedger,
    utils::{luid, rand_between},
};

// ============================================================================
// Shared Types
// ============================================================================

// What a monster needs to know about the world for one step
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    pub step: StepTime,
    pub player: Position,
    pub player_dead: bool,
    pub map: &'a TileMap,
}

impl Surroundings<'_> {
    #[must_use]
    pub fn distance_to_player(&self, pos: &Position) -> f32 {
        pos.distance(&self.player)
    }

    // Facing towards the player from `pos`
    #[must_use]
    pub fn facing_player(&self, pos: &Position) -> Facing {
        Facing::from_sign(self.player.x - pos.x)
    }
}

// Side effects the runner applies after a monster step or hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonsterEvent {
    DamagePlayer { damage: f32, direction: Facing },
    SpawnBelch { origin: Position, direction: Facing, power: f32 },
    LightsOff,
    LightsOn,
    Died,
    // Death animation finished; the runner disposes the monster
    Dispose,
}

#[derive(Debug, Clone)]
pub enum Vitality {
    Alive,
    Hurting { timer: Timer },
    Dying { timer: Timer },
    Disposed,
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Chomper(Chomper),
    DemonFlower(DemonFlower),
    Flyfly(Flyfly),
    Skeleton(Skeleton),
}

// ============================================================================
// Monster
// ============================================================================

#[derive(Component, Debug, Clone)]
pub struct Monster {
    pub id: MonsterId,
    pub kind: MonsterKind,
    pub name: String,
    pub health: Health,
    pub stats: HitStats,
    pub facing: Facing,
    pub vitality: Vitality,
    pub behavior: Behavior,
}

impl Monster {
    pub fn spawn(id: MonsterId, kind: MonsterKind, pos: Position, rng: &mut impl Rng) -> Self {
        let (max_health, behavior) = match kind {
            MonsterKind::Chomper => (CHOMPER_MAX_HEALTH, Behavior::Chomper(Chomper::new())),
            MonsterKind::DemonFlower => (DEMON_FLOWER_MAX_HEALTH, Behavior::DemonFlower(DemonFlower::new())),
            MonsterKind::Flyfly => (FLYFLY_MAX_HEALTH, Behavior::Flyfly(Flyfly::new(pos, rng))),
            MonsterKind::Skeleton => (SKELETON_MAX_HEALTH, Behavior::Skeleton(Skeleton::new(rng))),
        };

        Self {
            id,
            kind,
            name: format!("{}-{}", kind.as_str(), luid(rng)),
            health: Health::new(max_health),
            stats: HitStats::default(),
            facing: Facing::Right,
            vitality: Vitality::Alive,
            behavior,
        }
    }

    #[must_use]
    pub fn body(kind: MonsterKind) -> Body {
        let category = CollisionCategory::Monster(kind);
        match kind {
            MonsterKind::Chomper => Body::new(category, CHOMPER_SIZE, CHOMPER_SIZE)
                .with_wall_sensors()
                .with_ledge_sensors(),
            MonsterKind::DemonFlower => Body::new(category, DEMON_FLOWER_SIZE, DEMON_FLOWER_SIZE).as_kinematic(),
            MonsterKind::Flyfly => Body::new(category, FLYFLY_SIZE, FLYFLY_SIZE).as_sensor().without_gravity(),
            MonsterKind::Skeleton => Body::new(category, SKELETON_WIDTH, SKELETON_HEIGHT)
                .with_wall_sensors()
                .with_ledge_sensors(),
        }
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        matches!(self.vitality, Vitality::Alive)
    }

    #[must_use]
    pub const fn is_dead(&self) -> bool {
        matches!(self.vitality, Vitality::Dying { .. } | Vitality::Disposed)
    }

    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        matches!(self.vitality, Vitality::Disposed)
    }

    #[must_use]
    pub fn health_bar(&self) -> HealthBar {
        self.health.bar()
    }

    #[must_use]
    pub const fn light(&self) -> Option<&LightProxy> {
        match &self.behavior {
            Behavior::Skeleton(skeleton) => Some(&skeleton.light),
            _ => None,
        }
    }

    // One simulation step, before physics
    pub fn update(
        &mut self,
        env: &Surroundings,
        rng: &mut impl Rng,
        pos: &mut Position,
        vel: &mut Velocity,
        body: &mut Body,
        blocked: &Blocked,
    ) -> Vec<MonsterEvent> {
        let mut events = Vec::new();
        let delta = env.step.delta();

        match &mut self.vitality {
            Vitality::Disposed => return events,
            Vitality::Dying { timer } => {
                *vel = Velocity::default();
                timer.tick(delta);
                if timer.is_finished() {
                    events.push(MonsterEvent::Dispose);
                }
                return events;
            }
            Vitality::Hurting { timer } => {
                timer.tick(delta);
                if timer.is_finished() {
                    self.vitality = Vitality::Alive;
                    if let Behavior::DemonFlower(flower) = &mut self.behavior {
                        flower.recovered();
                    }
                }
                return events;
            }
            Vitality::Alive => {}
        }

        match &mut self.behavior {
            Behavior::Chomper(chomper) => chomper.update(&mut self.facing, env, pos, vel, body, blocked),
            Behavior::DemonFlower(flower) => flower.update(&mut self.facing, env, rng, pos, &mut events),
            Behavior::Flyfly(flyfly) => flyfly.update(&mut self.facing, env, rng, pos, vel),
            Behavior::Skeleton(skeleton) => {
                skeleton.update(&mut self.facing, env, rng, pos, vel, body, blocked, &mut events);
            }
        }

        if let Behavior::Skeleton(skeleton) = &mut self.behavior {
            skeleton.light.follow(*pos);
        }
        events
    }

    // Primary-body contact with the player. Ignored unless alive.
    pub fn on_player_contact(&mut self, env: &Surroundings, rng: &mut impl Rng, pos: &Position) -> Vec<MonsterEvent> {
        if !self.is_alive() {
            return Vec::new();
        }

        let attack = match &mut self.behavior {
            Behavior::Chomper(chomper) => chomper.attack(),
            Behavior::DemonFlower(flower) => {
                self.facing = env.facing_player(pos);
                flower.attack()
            }
            Behavior::Flyfly(flyfly) => flyfly.attack(),
            Behavior::Skeleton(skeleton) => skeleton.attack(),
        };
        if !attack {
            return Vec::new();
        }

        // Bite damage is rolled when the attack starts; the flower's lands when its animation completes
        let damage = match self.kind {
            MonsterKind::DemonFlower => return Vec::new(),
            MonsterKind::Chomper => rand_between(rng, CHOMPER_ATTACK_POWER),
            MonsterKind::Flyfly => rand_between(rng, FLYFLY_ATTACK_POWER),
            MonsterKind::Skeleton => rand_between(rng, SKELETON_ATTACK_POWER),
        };
        vec![MonsterEvent::DamagePlayer {
            damage,
            direction: self.facing,
        }]
    }

    // Struck by a fireball travelling towards `direction`. Ignored unless alive.
    pub fn hit(
        &mut self,
        tier: FireballTier,
        power: f32,
        direction: Facing,
        rng: &mut impl Rng,
        vel: &mut Velocity,
        body: &mut Body,
    ) -> Vec<MonsterEvent> {
        if !self.is_alive() {
            return Vec::new();
        }

        self.stats.record(tier);
        self.facing = direction.flipped();

        if self.kind == MonsterKind::Flyfly {
            self.health.deplete();
        } else {
            self.health.damage(power);
        }
        if self.health.is_depleted() {
            return self.die(vel, body);
        }

        if let Behavior::Skeleton(skeleton) = &mut self.behavior
            && skeleton.try_transform(self.health.fraction(), rng)
        {
            *vel = Velocity::default();
            return Vec::new();
        }

        self.hurt(direction, vel);
        Vec::new()
    }

    fn hurt(&mut self, knockback: Facing, vel: &mut Velocity) {
        let (duration, knocked) = match &mut self.behavior {
            Behavior::Chomper(chomper) => {
                chomper.interrupt();
                (CHOMPER_HURT_MS, true)
            }
            Behavior::DemonFlower(flower) => {
                flower.interrupt();
                (DEMON_FLOWER_HURT_MS, false)
            }
            // Flyflies die from any hit
            Behavior::Flyfly(_) => (0.0, false),
            Behavior::Skeleton(skeleton) => {
                let grounded = skeleton.interrupt();
                (SKELETON_HURT_MS, grounded)
            }
        };

        if knocked {
            *vel = Velocity::new(knockback.sign() * MONSTER_KNOCKBACK_X, MONSTER_KNOCKBACK_Y);
        }
        self.vitality = Vitality::Hurting {
            timer: anim_timer(duration),
        };
    }

    // Freezes in place for the death animation
    fn die(&mut self, vel: &mut Velocity, body: &mut Body) -> Vec<MonsterEvent> {
        if self.is_dead() {
            return Vec::new();
        }

        let mut events = vec![MonsterEvent::Died];
        let duration = match &mut self.behavior {
            Behavior::Chomper(_) => CHOMPER_DIE_MS,
            Behavior::DemonFlower(_) => DEMON_FLOWER_DIE_MS,
            Behavior::Flyfly(_) => FLYFLY_DIE_MS,
            Behavior::Skeleton(skeleton) => {
                if skeleton.light.on {
                    skeleton.light.on = false;
                    events.push(MonsterEvent::LightsOn);
                }
                SKELETON_DIE_MS
            }
        };

        *vel = Velocity::default();
        body.sensor = true;
        body.ignore_gravity = true;
        body.inert = true;
        self.vitality = Vitality::Dying {
            timer: anim_timer(duration),
        };
        events
    }

    // Reports the kill to the ledger exactly once. Returns the points awarded.
    pub fn dispose(&mut self, ledger: &mut ScoreLedger) -> Option<u32> {
        if self.is_disposed() {
            return None;
        }
        self.vitality = Vitality::Disposed;
        Some(ledger.monster_killed(self.kind, self.stats))
    }
}

// ============================================================================
// Ground Sensing
// ============================================================================

// Ground under the leading bottom corner
fn ground_ahead(facing: Facing, blocked: &Blocked) -> bool {
    match facing {
        Facing::Left => blocked.is(SensorSlot::BottomLeft),
        Facing::Right => blocked.is(SensorSlot::BottomRight),
    }
}

fn grounded(blocked: &Blocked) -> bool {
    blocked.is(SensorSlot::BottomLeft) || blocked.is(SensorSlot::BottomRight)
}

// Wall sensor on the leading side, or the edge of the world
fn wall_ahead(facing: Facing, blocked: &Blocked, pos: &Position, body: &Body, map: &TileMap) -> bool {
    match facing {
        Facing::Left => blocked.is(SensorSlot::Left) || pos.x - body.half.x <= 0.0,
        Facing::Right => blocked.is(SensorSlot::Right) || pos.x + body.half.x >= map.width_px(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};
    use rstest::rstest;

    pub(crate) fn open_map() -> TileMap {
        let mut rows = vec![".".repeat(40); 20];
        rows.push("#".repeat(40));
        TileMap::from_rows(TILE_SIZE, &rows).unwrap_or_else(|e| panic!("{e}"))
    }

    fn spawn(kind: MonsterKind, rng: &mut StdRng) -> (Monster, Velocity, Body) {
        let monster = Monster::spawn(MonsterId(1), kind, Position::new(200.0, 200.0), rng);
        (monster, Velocity::default(), Monster::body(kind))
    }

    #[rstest]
    #[case(MonsterKind::Chomper, 5.0, 15.0)]
    #[case(MonsterKind::Chomper, 50.0, 0.0)]
    #[case(MonsterKind::DemonFlower, 10.0, 20.0)]
    #[case(MonsterKind::Skeleton, 10.0, 20.0)]
    fn hit_floors_health_at_zero(#[case] kind: MonsterKind, #[case] power: f32, #[case] expected: f32) {
        let mut rng = StdRng::seed_from_u64(1);
        let (mut monster, mut vel, mut body) = spawn(kind, &mut rng);
        monster.hit(FireballTier::High, power, Facing::Left, &mut rng, &mut vel, &mut body);
        assert_relative_eq!(monster.health.current(), expected);
        assert_eq!(monster.is_dead(), expected == 0.0);
    }

    #[rstest]
    #[case(1.0)]
    #[case(1000.0)]
    fn flyfly_dies_from_any_hit(#[case] power: f32) {
        let mut rng = StdRng::seed_from_u64(2);
        let (mut monster, mut vel, mut body) = spawn(MonsterKind::Flyfly, &mut rng);
        let events = monster.hit(FireballTier::Low, power, Facing::Right, &mut rng, &mut vel, &mut body);
        assert_eq!(events, vec![MonsterEvent::Died]);
        assert_relative_eq!(monster.health.current(), 0.0);
        assert!(body.inert);
    }

    #[test]
    fn hit_records_tier_and_faces_the_shooter() {
        let mut rng = StdRng::seed_from_u64(3);
        let (mut monster, mut vel, mut body) = spawn(MonsterKind::Chomper, &mut rng);
        monster.hit(FireballTier::Low, 5.0, Facing::Left, &mut rng, &mut vel, &mut body);
        assert_eq!(monster.stats, HitStats { power_hits: 0, fast_hits: 1 });
        assert_eq!(monster.facing, Facing::Right);
        // Knocked away from the shooter
        assert_relative_eq!(vel.x, -MONSTER_KNOCKBACK_X);
        assert!(matches!(monster.vitality, Vitality::Hurting { .. }));

        // Hits while hurting are ignored
        monster.hit(FireballTier::High, 5.0, Facing::Left, &mut rng, &mut vel, &mut body);
        assert_eq!(monster.stats.power_hits, 0);
        assert_relative_eq!(monster.health.current(), 15.0);
    }

    #[test]
    fn dispose_reports_once() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut ledger = ScoreLedger::default();
        let (mut monster, mut vel, mut body) = spawn(MonsterKind::Chomper, &mut rng);
        monster.hit(FireballTier::High, 10.0, Facing::Left, &mut rng, &mut vel, &mut body);
        monster.vitality = Vitality::Alive;
        monster.hit(FireballTier::High, 10.0, Facing::Left, &mut rng, &mut vel, &mut body);

        assert_eq!(monster.dispose(&mut ledger), Some(25 + 5));
        assert_eq!(monster.dispose(&mut ledger), None);
        assert_eq!(ledger.total(), 30);
    }

    #[test]
    fn death_animation_ends_in_dispose() {
        let mut rng = StdRng::seed_from_u64(5);
        let map = open_map();
        let (mut monster, mut vel, mut body) = spawn(MonsterKind::Flyfly, &mut rng);
        monster.hit(FireballTier::Low, 5.0, Facing::Right, &mut rng, &mut vel, &mut body);

        let mut env = Surroundings {
            step: StepTime::new(STEP_MS, 0.0),
            player: Position::new(0.0, 0.0),
            player_dead: false,
            map: &map,
        };
        let mut pos = Position::new(200.0, 200.0);
        let blocked = Blocked::default();
        let mut disposed_after = None;
        for i in 0..60 {
            env.step.advance(STEP_MS);
            let events = monster.update(&env, &mut rng, &mut pos, &mut vel, &mut body, &blocked);
            if events.contains(&MonsterEvent::Dispose) {
                disposed_after = Some(i);
                break;
            }
        }
        // 8 frames at 15 fps is about 533ms
        assert!(matches!(disposed_after, Some(31..=33)), "{disposed_after:?}");
    }

    #[test]
    fn dead_monsters_ignore_contact() {
        let mut rng = StdRng::seed_from_u64(6);
        let map = open_map();
        let (mut monster, mut vel, mut body) = spawn(MonsterKind::Chomper, &mut rng);
        monster.hit(FireballTier::High, 100.0, Facing::Left, &mut rng, &mut vel, &mut body);
        let env = Surroundings {
            step: StepTime::default(),
            player: Position::new(200.0, 200.0),
            player_dead: false,
            map: &map,
        };
        assert!(monster.on_player_contact(&env, &mut rng, &Position::new(200.0, 200.0)).is_empty());
    }
}
