use bevy_ecs::prelude::*;
use bevy_math::Vec2;
use bevy_time::{Timer, TimerMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    constants::*,
    projectiles::FireballTier,
    utils::{clamp_low, denormalize, normalize},
};

// ============================================================================
// Identifiers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Component)]
pub struct MonsterId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Component)]
pub struct ProjectileId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Component)]
pub struct CoinId(pub u32);

// ============================================================================
// Clock
// ============================================================================

// Simulation time for the current step. `now_ms` is the time since the run started.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct StepTime {
    pub delta_ms: f32,
    pub now_ms: f64,
}

impl StepTime {
    #[must_use]
    pub const fn new(delta_ms: f32, now_ms: f64) -> Self {
        Self { delta_ms, now_ms }
    }

    #[must_use]
    pub fn delta(&self) -> Duration {
        Duration::from_secs_f32(self.delta_ms.max(0.0) / 1000.0)
    }

    // Moves the clock forward by one step of `delta_ms`
    pub fn advance(&mut self, delta_ms: f32) {
        self.delta_ms = delta_ms;
        self.now_ms += f64::from(delta_ms);
    }

    #[must_use]
    pub fn since(&self, then_ms: f64) -> f64 {
        self.now_ms - then_ms
    }
}

// One-shot countdown standing in for a non-looping animation of `ms` milliseconds
#[must_use]
pub fn anim_timer(ms: f32) -> Timer {
    Timer::new(Duration::from_secs_f32(ms / 1000.0), TimerMode::Once)
}

// ============================================================================
// Kinematics
// ============================================================================

// Position component - pixels, y grows downwards
#[derive(Debug, Clone, Copy, Component, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        Vec2::from(*self).distance(Vec2::from(*other))
    }
}

impl From<Position> for Vec2 {
    fn from(pos: Position) -> Self {
        Self::new(pos.x, pos.y)
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

// Velocity component - pixels per step
#[derive(Debug, Clone, Copy, Component, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// Facing direction; a zero sign resolves to Right
#[derive(Debug, Clone, Copy, Component, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    #[must_use]
    pub fn from_sign(sign: f32) -> Self {
        if sign < 0.0 { Self::Left } else { Self::Right }
    }

    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    #[must_use]
    pub fn fraction(&self) -> f32 {
        normalize(self.current, 0.0, self.max)
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    // Subtracts damage, floored at zero. Returns the remaining health.
    pub fn damage(&mut self, amount: f32) -> f32 {
        self.current = clamp_low(self.current - amount, 0.0);
        self.current
    }

    pub const fn deplete(&mut self) {
        self.current = 0.0;
    }

    #[must_use]
    pub fn bar(&self) -> HealthBar {
        let fraction = self.fraction();
        let color = if fraction >= 0.75 {
            HEALTH_BAR_GREEN
        } else if fraction >= 0.25 {
            HEALTH_BAR_YELLOW
        } else {
            HEALTH_BAR_RED
        };

        HealthBar {
            width: HEALTH_BAR_WIDTH,
            height: HEALTH_BAR_HEIGHT,
            fill_width: denormalize(fraction, 0.0, HEALTH_BAR_FILL_WIDTH),
            fill_color: color,
        }
    }
}

// Floating health bar drawn above an actor: outlined box plus a coloured fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthBar {
    pub width: f32,
    pub height: f32,
    pub fill_width: f32,
    pub fill_color: u32,
}

// ============================================================================
// Kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MonsterKind {
    Chomper,
    DemonFlower,
    Flyfly,
    Skeleton,
}

impl MonsterKind {
    pub const ALL: [Self; 4] = [Self::Chomper, Self::DemonFlower, Self::Flyfly, Self::Skeleton];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chomper => "chomper",
            Self::DemonFlower => "demon-flower",
            Self::Flyfly => "flyfly",
            Self::Skeleton => "skeleton",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinKind {
    Gold,
    Silver,
    Bronze,
}

// Number of projectile hits a monster took, by tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitStats {
    pub power_hits: u32,
    pub fast_hits: u32,
}

impl HitStats {
    pub const fn record(&mut self, tier: FireballTier) {
        match tier {
            FireballTier::High => self.power_hits += 1,
            FireballTier::Low => self.fast_hits += 1,
        }
    }
}

// ============================================================================
// Lights
// ============================================================================

// Point light attached to an entity. Rendering is external; this only tracks intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightProxy {
    pub on: bool,
    pub radius: f32,
    pub intensity: f32,
    pub color: u32,
    pub position: Position,
}

impl LightProxy {
    #[must_use]
    pub const fn new(radius: f32, intensity: f32, color: u32) -> Self {
        Self {
            on: false,
            radius,
            intensity,
            color,
            position: Position::new(0.0, 0.0),
        }
    }

    pub const fn follow(&mut self, position: Position) {
        self.position = position;
    }

    #[must_use]
    pub const fn current_intensity(&self) -> f32 {
        if self.on { self.intensity } else { 0.0 }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(20.0, 5.0, 15.0)]
    #[case(20.0, 20.0, 0.0)]
    #[case(3.0, 1000.0, 0.0)]
    fn damage_floors_at_zero(#[case] start: f32, #[case] power: f32, #[case] expected: f32) {
        let mut health = Health::new(20.0);
        health.damage(20.0 - start);
        assert_relative_eq!(health.damage(power), expected);
        assert!(health.current() >= 0.0);
    }

    #[rstest]
    #[case(100.0, HEALTH_BAR_GREEN, 28.0)]
    #[case(75.0, HEALTH_BAR_GREEN, 21.0)]
    #[case(50.0, HEALTH_BAR_YELLOW, 14.0)]
    #[case(25.0, HEALTH_BAR_YELLOW, 7.0)]
    #[case(10.0, HEALTH_BAR_RED, 2.8)]
    fn health_bar_fill_and_color(#[case] current: f32, #[case] color: u32, #[case] fill: f32) {
        let mut health = Health::new(100.0);
        health.damage(100.0 - current);
        let bar = health.bar();
        assert_eq!(bar.fill_color, color);
        assert_relative_eq!(bar.fill_width, fill, epsilon = 1e-4);
        assert_relative_eq!(bar.width, 30.0);
        assert_relative_eq!(bar.height, 4.0);
    }

    #[test]
    fn facing_from_sign_defaults_right() {
        assert_eq!(Facing::from_sign(-3.0), Facing::Left);
        assert_eq!(Facing::from_sign(0.0), Facing::Right);
        assert_eq!(Facing::Left.flipped(), Facing::Right);
    }

    #[test]
    fn monster_kind_names_match_spawn_keys() {
        let json = serde_json::to_string(&MonsterKind::DemonFlower).unwrap_or_default();
        assert_eq!(json, "\"demon-flower\"");
        assert_eq!(MonsterKind::DemonFlower.as_str(), "demon-flower");
    }
}
