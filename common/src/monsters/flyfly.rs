use bevy_math::Vec2;
use bevy_time::Timer;
use rand::Rng;

use super::Surroundings;
use crate::{
    components::{Facing, Position, Velocity, anim_timer},
    constants::*,
    utils::rand_radial,
};

// Free-flying territorial roamer
#[derive(Debug, Clone)]
pub enum FlyflyMode {
    Roam,
    // Seeks the player's current position every step
    Chase,
    // Hovers until the bite animation ends
    Attack { timer: Timer },
}

#[derive(Debug, Clone)]
pub struct Flyfly {
    pub mode: FlyflyMode,
    origin: Vec2,
    waypoint: Vec2,
}

impl Flyfly {
    pub fn new(spawn: Position, rng: &mut impl Rng) -> Self {
        let origin = Vec2::from(spawn);
        Self {
            mode: FlyflyMode::Roam,
            origin,
            waypoint: rand_radial(rng, origin.x, origin.y, FLYFLY_TERRITORY_RADIUS),
        }
    }

    #[must_use]
    pub const fn waypoint(&self) -> Vec2 {
        self.waypoint
    }

    pub(super) fn update(
        &mut self,
        facing: &mut Facing,
        env: &Surroundings,
        rng: &mut impl Rng,
        pos: &Position,
        vel: &mut Velocity,
    ) {
        if let FlyflyMode::Attack { timer } = &mut self.mode {
            *vel = Velocity::default();
            timer.tick(env.step.delta());
            if !timer.is_finished() {
                return;
            }
            self.mode = FlyflyMode::Roam;
        }

        let here = Vec2::from(*pos);
        let target = if env.distance_to_player(pos) <= FLYFLY_CHASE_DISTANCE {
            self.mode = FlyflyMode::Chase;
            Vec2::from(env.player)
        } else {
            self.mode = FlyflyMode::Roam;
            self.waypoint
        };

        if matches!(self.mode, FlyflyMode::Roam) && here.distance(target) <= FLYFLY_WAYPOINT_THRESHOLD {
            self.waypoint = rand_radial(rng, self.origin.x, self.origin.y, FLYFLY_TERRITORY_RADIUS);
        } else if target.x != here.x {
            *facing = Facing::from_sign(target.x - here.x);
        }

        let heading = (target - here).normalize_or_zero() * FLYFLY_SPEED;
        *vel = Velocity::new(heading.x, heading.y);
    }

    pub(super) fn attack(&mut self) -> bool {
        if matches!(self.mode, FlyflyMode::Attack { .. }) {
            return false;
        }
        self.mode = FlyflyMode::Attack {
            timer: anim_timer(FLYFLY_BITE_MS),
        };
        true
    }
}
