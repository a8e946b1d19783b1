use bevy_ecs::prelude::*;
use bevy_time::Timer;
use std::time::Duration;

use crate::{
    collision::CollisionCategory,
    components::{Facing, LightProxy, Position, ProjectileId, Velocity, anim_timer},
    constants::*,
    physics::Body,
};

// ============================================================================
// Kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FireballTier {
    // Fast attack
    Low,
    // Power attack
    High,
}

impl FireballTier {
    #[must_use]
    pub const fn power(self) -> f32 {
        match self {
            Self::Low => FIREBALL_LOW_POWER,
            Self::High => FIREBALL_HIGH_POWER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    Fireball(FireballTier),
    Belch,
}

impl ProjectileKind {
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Fireball(_) => FIREBALL_SPEED,
            Self::Belch => BELCH_SPEED,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fireball(_) => "fireball",
            Self::Belch => "belch",
        }
    }

    // Where a projectile fired from `origin` towards `direction` appears
    #[must_use]
    pub fn spawn_position(self, origin: Position, direction: Facing) -> Position {
        match self {
            Self::Fireball(_) => Position::new(
                direction.sign().mul_add(FIREBALL_SPAWN_OFFSET_X, origin.x),
                origin.y + FIREBALL_SPAWN_OFFSET_Y,
            ),
            Self::Belch => Position::new(direction.sign().mul_add(BELCH_SPAWN_OFFSET_X, origin.x), origin.y),
        }
    }

    #[must_use]
    pub fn body(self) -> Body {
        let (width, height) = match self {
            Self::Fireball(_) => (FIREBALL_WIDTH, FIREBALL_HEIGHT),
            Self::Belch => (BELCH_WIDTH, BELCH_HEIGHT),
        };
        Body::new(CollisionCategory::Projectile(self), width, height)
            .as_sensor()
            .without_gravity()
    }
}

// ============================================================================
// Projectile
// ============================================================================

#[derive(Debug, Clone)]
pub enum ProjectilePhase {
    Moving,
    Exploding { timer: Timer },
    Destroyed,
}

#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub id: ProjectileId,
    pub kind: ProjectileKind,
    pub name: String,
    pub power: f32,
    pub direction: Facing,
    pub phase: ProjectilePhase,
    // Removed when the projectile explodes
    pub light: Option<LightProxy>,
}

impl Projectile {
    #[must_use]
    pub fn new(id: ProjectileId, kind: ProjectileKind, power: f32, direction: Facing, night: bool) -> Self {
        let mut light = LightProxy::new(PROJECTILE_LIGHT_RADIUS, PROJECTILE_LIGHT_INTENSITY, PROJECTILE_LIGHT_COLOR);
        light.on = night;
        Self {
            id,
            kind,
            name: format!("{}-{}", kind.as_str(), id.0),
            power,
            direction,
            phase: ProjectilePhase::Moving,
            light: Some(light),
        }
    }

    #[must_use]
    pub fn fireball(id: ProjectileId, tier: FireballTier, direction: Facing, night: bool) -> Self {
        Self::new(id, ProjectileKind::Fireball(tier), tier.power(), direction, night)
    }

    #[must_use]
    pub fn belch(id: ProjectileId, power: f32, direction: Facing, night: bool) -> Self {
        Self::new(id, ProjectileKind::Belch, power, direction, night)
    }

    #[must_use]
    pub fn velocity(&self) -> Velocity {
        Velocity::new(self.direction.sign() * self.kind.speed(), 0.0)
    }

    #[must_use]
    pub const fn tier(&self) -> Option<FireballTier> {
        match self.kind {
            ProjectileKind::Fireball(tier) => Some(tier),
            ProjectileKind::Belch => None,
        }
    }

    #[must_use]
    pub const fn is_moving(&self) -> bool {
        matches!(self.phase, ProjectilePhase::Moving)
    }

    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        matches!(self.phase, ProjectilePhase::Destroyed)
    }

    // Contact with `other`. Returns true if this started the explosion.
    pub fn on_contact(&mut self, other: CollisionCategory, vel: &mut Velocity) -> bool {
        if self.kind.ignores(other) {
            return false;
        }
        self.explode(vel)
    }

    // Moving -> Exploding, at most once
    pub fn explode(&mut self, vel: &mut Velocity) -> bool {
        if !self.is_moving() {
            return false;
        }
        vel.x = 0.0;
        vel.y = 0.0;
        self.light = None;
        self.phase = ProjectilePhase::Exploding {
            timer: anim_timer(PROJECTILE_EXPLODE_MS),
        };
        true
    }

    // Advances the explosion and keeps the light on the projectile. Returns true on the step it is destroyed.
    pub fn update(&mut self, delta: Duration, pos: Position) -> bool {
        if let Some(light) = &mut self.light {
            light.follow(pos);
        }

        let ProjectilePhase::Exploding { timer } = &mut self.phase else {
            return false;
        };
        timer.tick(delta);
        if !timer.is_finished() {
            return false;
        }
        self.phase = ProjectilePhase::Destroyed;
        true
    }

    pub fn set_light(&mut self, on: bool) {
        if let Some(light) = &mut self.light {
            light.on = on;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
