use bevy_time::Timer;
use rand::Rng;

use super::{MonsterEvent, Surroundings};
use crate::{
    components::{Facing, Position, anim_timer},
    constants::*,
    utils::rand_between,
};

// Stationary attacker. Each sequence runs to completion once started.
#[derive(Debug, Clone)]
pub enum FlowerMode {
    Idle,
    // Damage lands when the timer ends, if the player is still close
    Attacking { timer: Timer },
    // The belch spawns when the start phase ends
    BelchStart { timer: Timer },
    BelchEnd { timer: Timer },
}

#[derive(Debug, Clone)]
pub struct DemonFlower {
    pub mode: FlowerMode,
    last_belch_at: f64,
    // Armed by recovering from a hurt; skips the belch cooldown once
    reflex: bool,
}

impl Default for DemonFlower {
    fn default() -> Self {
        Self::new()
    }
}

impl DemonFlower {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: FlowerMode::Idle,
            last_belch_at: f64::NEG_INFINITY,
            reflex: false,
        }
    }

    pub(super) fn update(
        &mut self,
        facing: &mut Facing,
        env: &Surroundings,
        rng: &mut impl Rng,
        pos: &Position,
        events: &mut Vec<MonsterEvent>,
    ) {
        let delta = env.step.delta();
        match &mut self.mode {
            FlowerMode::Attacking { timer } => {
                timer.tick(delta);
                if timer.is_finished() {
                    self.mode = FlowerMode::Idle;
                    if env.distance_to_player(pos) <= DEMON_FLOWER_ATTACK_DISTANCE {
                        events.push(MonsterEvent::DamagePlayer {
                            damage: rand_between(rng, DEMON_FLOWER_ATTACK_POWER),
                            direction: facing.flipped(),
                        });
                    }
                }
                return;
            }
            FlowerMode::BelchStart { timer } => {
                timer.tick(delta);
                if timer.is_finished() {
                    events.push(MonsterEvent::SpawnBelch {
                        origin: *pos,
                        direction: *facing,
                        power: rand_between(rng, DEMON_FLOWER_ATTACK_POWER),
                    });
                    self.last_belch_at = env.step.now_ms;
                    self.mode = FlowerMode::BelchEnd {
                        timer: anim_timer(DEMON_FLOWER_BELCH_END_MS),
                    };
                }
                return;
            }
            FlowerMode::BelchEnd { timer } => {
                timer.tick(delta);
                if timer.is_finished() {
                    self.mode = FlowerMode::Idle;
                }
                return;
            }
            FlowerMode::Idle => {}
        }

        let reflex = std::mem::take(&mut self.reflex);
        let distance = env.distance_to_player(pos);
        if distance > DEMON_FLOWER_SENSE_DISTANCE {
            return;
        }

        *facing = env.facing_player(pos);
        if distance <= DEMON_FLOWER_ATTACK_DISTANCE {
            self.attack();
        } else if reflex || env.step.since(self.last_belch_at) >= DEMON_FLOWER_BELCH_COOLDOWN {
            self.mode = FlowerMode::BelchStart {
                timer: anim_timer(DEMON_FLOWER_BELCH_START_MS),
            };
        }
    }

    // Starts the bite sequence unless another sequence is running
    pub(super) fn attack(&mut self) -> bool {
        if !matches!(self.mode, FlowerMode::Idle) {
            return false;
        }
        self.mode = FlowerMode::Attacking {
            timer: anim_timer(DEMON_FLOWER_ATTACK_MS),
        };
        true
    }

    pub(super) const fn interrupt(&mut self) {
        self.mode = FlowerMode::Idle;
    }

    pub(super) const fn recovered(&mut self) {
        self.reflex = true;
    }
}
