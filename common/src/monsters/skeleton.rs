use bevy_math::Vec2;
use bevy_time::Timer;
use rand::Rng;

use super::{MonsterEvent, Surroundings, ground_ahead, grounded, wall_ahead};
use crate::{
    components::{Facing, LightProxy, Position, Velocity, anim_timer},
    constants::*,
    path::OscillatoryPath,
    physics::{Blocked, Body},
    utils::{chance, choose, rand_between, sign},
};

// ============================================================================
// Modes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dormancy {
    pub started_at: f64,
    pub duration: f64,
}

// Airborne state: the path offset is added to an origin that creeps towards the player
#[derive(Debug, Clone)]
pub struct Flight {
    pub path: OscillatoryPath,
    pub origin: Vec2,
    pub started_at: f64,
}

#[derive(Debug, Clone)]
pub enum SkeletonMode {
    Roam { dormant: Option<Dormancy> },
    Chase,
    Attack { timer: Timer },
    TransformingIn { timer: Timer },
    Fly(Flight),
    TransformingOut { timer: Timer },
}

// ============================================================================
// Skeleton
// ============================================================================

#[derive(Debug, Clone)]
pub struct Skeleton {
    pub mode: SkeletonMode,
    // When dormancy last ended
    last_dormant_at: f64,
    dormancy_cooldown: f64,
    dormancy_probability: f32,
    ethereal_probability: f32,
    pub light: LightProxy,
}

impl Skeleton {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            mode: SkeletonMode::Roam { dormant: None },
            last_dormant_at: 0.0,
            dormancy_cooldown: f64::from(rand_between(rng, SKELETON_DORMANCY_COOLDOWN)),
            dormancy_probability: rand_between(rng, SKELETON_DORMANCY_PROBABILITY),
            ethereal_probability: rand_between(rng, SKELETON_ETHEREAL_PROBABILITY),
            light: LightProxy::new(SKELETON_LIGHT_RADIUS, SKELETON_LIGHT_INTENSITY, SKELETON_LIGHT_COLOR),
        }
    }

    #[must_use]
    pub const fn is_flying(&self) -> bool {
        matches!(self.mode, SkeletonMode::Fly(_))
    }

    #[must_use]
    pub const fn is_dormant(&self) -> bool {
        matches!(self.mode, SkeletonMode::Roam { dormant: Some(_) })
    }

    pub(super) fn update(
        &mut self,
        facing: &mut Facing,
        env: &Surroundings,
        rng: &mut impl Rng,
        pos: &mut Position,
        vel: &mut Velocity,
        body: &mut Body,
        blocked: &Blocked,
        events: &mut Vec<MonsterEvent>,
    ) {
        let delta = env.step.delta();
        let now = env.step.now_ms;

        match &mut self.mode {
            SkeletonMode::TransformingIn { timer } => {
                *vel = Velocity::default();
                timer.tick(delta);
                if timer.is_finished() {
                    self.take_flight(now, rng, pos, body, events);
                }
                return;
            }
            SkeletonMode::TransformingOut { timer } => {
                *vel = Velocity::default();
                timer.tick(delta);
                if timer.is_finished() {
                    self.land(body, events);
                }
                return;
            }
            SkeletonMode::Fly(flight) => {
                if env.player_dead || env.distance_to_player(pos) > SKELETON_FLY_LEASH {
                    self.mode = SkeletonMode::TransformingOut {
                        timer: anim_timer(SKELETON_TRANSFORM_MS),
                    };
                    return;
                }

                let next = flight.origin + flight.path.next((now - flight.started_at) as f32);
                if next.x != pos.x {
                    *facing = Facing::from_sign(next.x - pos.x);
                }
                *pos = Position::from(next);
                flight.origin.x += sign(env.player.x - flight.origin.x) * SKELETON_PATH_DRIFT;
                flight.origin.y += sign(env.player.y - flight.origin.y) * SKELETON_PATH_DRIFT;
                return;
            }
            SkeletonMode::Attack { timer } => {
                timer.tick(delta);
                if !timer.is_finished() {
                    *facing = env.facing_player(pos);
                    return;
                }
                self.mode = SkeletonMode::Roam { dormant: None };
            }
            SkeletonMode::Roam { .. } | SkeletonMode::Chase => {}
        }

        if !env.player_dead && env.distance_to_player(pos) <= SKELETON_CHASE_DISTANCE {
            if self.is_dormant() {
                self.last_dormant_at = now;
            }
            self.mode = SkeletonMode::Chase;
            *facing = env.facing_player(pos);
        } else if let SkeletonMode::Roam { dormant: Some(dormancy) } = self.mode {
            if now - dormancy.started_at <= dormancy.duration {
                vel.x = 0.0;
                return;
            }
            self.last_dormant_at = now;
            *facing = choose(rng, &[Facing::Left, Facing::Right]).copied().unwrap_or(*facing);
            self.mode = SkeletonMode::Roam { dormant: None };
        } else {
            self.mode = SkeletonMode::Roam { dormant: None };
            if now - self.last_dormant_at > self.dormancy_cooldown && chance(rng, self.dormancy_probability) {
                self.mode = SkeletonMode::Roam {
                    dormant: Some(Dormancy {
                        started_at: now,
                        duration: f64::from(rand_between(rng, SKELETON_DORMANCY_DURATION)),
                    }),
                };
                vel.x = 0.0;
                return;
            }
        }

        if !grounded(blocked) {
            return;
        }

        let chasing = matches!(self.mode, SkeletonMode::Chase);
        let edge = !ground_ahead(*facing, blocked);
        // A chasing skeleton waits at the edge instead of walking off it
        if chasing && edge {
            vel.x = 0.0;
            return;
        }
        vel.x = facing.sign() * SKELETON_SPEED;
        if !chasing && (edge || wall_ahead(*facing, blocked, pos, body, env.map)) {
            *facing = facing.flipped();
        }
    }

    // Flying contact bites straight away; on the ground a bite starts the attack animation
    pub(super) fn attack(&mut self) -> bool {
        match self.mode {
            SkeletonMode::Fly(_) => true,
            SkeletonMode::Roam { .. } | SkeletonMode::Chase => {
                self.mode = SkeletonMode::Attack {
                    timer: anim_timer(SKELETON_ATTACK_MS),
                };
                true
            }
            SkeletonMode::Attack { .. } | SkeletonMode::TransformingIn { .. } | SkeletonMode::TransformingOut { .. } => {
                false
            }
        }
    }

    // Called on a non-lethal hit. Returns true if the skeleton is on the ground and can be knocked back.
    pub(super) fn interrupt(&mut self) -> bool {
        match self.mode {
            SkeletonMode::Attack { .. } => {
                self.mode = SkeletonMode::Roam { dormant: None };
                true
            }
            SkeletonMode::Roam { .. } | SkeletonMode::Chase => true,
            SkeletonMode::TransformingIn { .. } | SkeletonMode::Fly(_) | SkeletonMode::TransformingOut { .. } => false,
        }
    }

    // Rolled on every non-lethal hit while grounded
    pub(super) fn try_transform(&mut self, health_fraction: f32, rng: &mut impl Rng) -> bool {
        if !matches!(
            self.mode,
            SkeletonMode::Roam { .. } | SkeletonMode::Chase | SkeletonMode::Attack { .. }
        ) {
            return false;
        }
        if health_fraction > SKELETON_ETHEREAL_THRESHOLD || !chance(rng, self.ethereal_probability) {
            return false;
        }
        self.mode = SkeletonMode::TransformingIn {
            timer: anim_timer(SKELETON_TRANSFORM_MS),
        };
        true
    }

    fn take_flight(
        &mut self,
        now: f64,
        rng: &mut impl Rng,
        pos: &Position,
        body: &mut Body,
        events: &mut Vec<MonsterEvent>,
    ) {
        body.sensor = true;
        body.kinematic = true;
        body.ignore_gravity = true;
        self.light.on = true;
        events.push(MonsterEvent::LightsOff);

        let origin = Vec2::from(*pos);
        self.mode = SkeletonMode::Fly(Flight {
            path: OscillatoryPath::new(
                rng,
                origin,
                SKELETON_PATH_AMPLITUDE,
                SKELETON_PATH_AMPLITUDE,
                SKELETON_PATH_AMPLITUDE,
            ),
            origin,
            started_at: now,
        });
    }

    fn land(&mut self, body: &mut Body, events: &mut Vec<MonsterEvent>) {
        body.sensor = false;
        body.kinematic = false;
        body.ignore_gravity = false;
        self.light.on = false;
        events.push(MonsterEvent::LightsOn);
        self.mode = SkeletonMode::Roam { dormant: None };
    }
}

// ============================================================================
// Tests
// ============================================================================
