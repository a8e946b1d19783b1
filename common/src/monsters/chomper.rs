use bevy_time::Timer;

use super::{Surroundings, grounded, wall_ahead};
use crate::{
    components::{Facing, Position, Velocity, anim_timer},
    constants::*,
    physics::{Blocked, Body},
};

// Ground biter: hops around, turns at ledges and walls, bites on contact
#[derive(Debug, Clone)]
pub enum ChomperMode {
    Roam,
    Chase,
    // Held until the bite animation ends
    Attack { timer: Timer },
}

#[derive(Debug, Clone)]
pub struct Chomper {
    pub mode: ChomperMode,
    last_jumped_at: f64,
}

impl Default for Chomper {
    fn default() -> Self {
        Self::new()
    }
}

impl Chomper {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: ChomperMode::Roam,
            last_jumped_at: f64::NEG_INFINITY,
        }
    }

    pub(super) fn update(
        &mut self,
        facing: &mut Facing,
        env: &Surroundings,
        pos: &Position,
        vel: &mut Velocity,
        body: &Body,
        blocked: &Blocked,
    ) {
        if let ChomperMode::Attack { timer } = &mut self.mode {
            timer.tick(env.step.delta());
            if !timer.is_finished() {
                *facing = env.facing_player(pos);
                return;
            }
            self.mode = ChomperMode::Roam;
        }

        self.mode = if env.distance_to_player(pos) <= CHOMPER_CHASE_DISTANCE {
            *facing = env.facing_player(pos);
            ChomperMode::Chase
        } else {
            ChomperMode::Roam
        };

        if !grounded(blocked) {
            return;
        }

        // Probe one body height below the centre, a leap ahead
        let probe_x = facing.sign().mul_add(CHOMPER_LEAP_DISTANCE, pos.x);
        let ledge = !env.map.tile_at_world(probe_x, pos.y + body.height());
        if ledge || wall_ahead(*facing, blocked, pos, body, env.map) {
            *facing = facing.flipped();
        }

        if env.step.since(self.last_jumped_at) >= CHOMPER_JUMP_COOLDOWN {
            *vel = Velocity::new(facing.sign() * CHOMPER_SPEED, -CHOMPER_JUMP_POWER);
            self.last_jumped_at = env.step.now_ms;
        }
    }

    // Starts a bite unless one is in progress
    pub(super) fn attack(&mut self) -> bool {
        if matches!(self.mode, ChomperMode::Attack { .. }) {
            return false;
        }
        self.mode = ChomperMode::Attack {
            timer: anim_timer(CHOMPER_BITE_MS),
        };
        true
    }

    pub(super) const fn interrupt(&mut self) {
        self.mode = ChomperMode::Roam;
    }
}
