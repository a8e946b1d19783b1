use bevy::prelude::*;

use common::{
    components::{Facing, Position},
    projectiles::ProjectileKind,
};

// ============================================================================
// Bevy Messages
// ============================================================================

// A player or monster fired; the projectile spawner creates the entity
#[derive(Message, Debug, Clone, Copy)]
pub struct SpawnProjectile {
    pub kind: ProjectileKind,
    pub power: f32,
    pub origin: Position,
    pub direction: Facing,
}

// Global day/night toggle raised by the skeleton's transform and death
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightSwitch {
    Off,
    On,
}
