use anyhow::{Context, Result};
use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};

use common::{
    components::{CoinId, MonsterId, ProjectileId},
    constants::LEVEL_DEATH_GRACE_MS,
    input::InputSnapshot,
    physics::ContactPair,
};

// ============================================================================
// Entity Registries
// ============================================================================

pub struct MonsterInfo {
    pub entity: Entity,
    pub name: String,
}

// Active monsters; removed on disposal
#[derive(Resource, Default)]
pub struct MonsterMap(pub HashMap<MonsterId, MonsterInfo>);

pub struct ProjectileInfo {
    pub entity: Entity,
}

// Live projectiles; removed once destroyed
#[derive(Resource, Default)]
pub struct ProjectileMap(pub HashMap<ProjectileId, ProjectileInfo>);

pub struct CoinInfo {
    pub entity: Entity,
}

// Uncollected coins
#[derive(Resource, Default)]
pub struct CoinMap(pub HashMap<CoinId, CoinInfo>);

// The single player entity, once spawned
#[derive(Resource, Default)]
pub struct PlayerEntity(pub Option<Entity>);

// Hands out ids; never reuses one within a run
#[derive(Resource, Default)]
pub struct IdAllocator {
    next_monster: u32,
    next_projectile: u32,
    next_coin: u32,
}

impl IdAllocator {
    pub const fn monster(&mut self) -> MonsterId {
        self.next_monster += 1;
        MonsterId(self.next_monster)
    }

    pub const fn projectile(&mut self) -> ProjectileId {
        self.next_projectile += 1;
        ProjectileId(self.next_projectile)
    }

    pub const fn coin(&mut self) -> CoinId {
        self.next_coin += 1;
        CoinId(self.next_coin)
    }
}

// ============================================================================
// Simulation State
// ============================================================================

// All randomness in a run comes from here, so a seed reproduces the run
#[derive(Resource)]
pub struct SimRng(pub StdRng);

impl SimRng {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

// Number of completed steps
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickCount(pub u64);

// Whether monsters are placed when the level spawns
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnSettings {
    pub monsters: bool,
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub enum LevelStatus {
    #[default]
    Running,
    Completed {
        elapsed_ms: f64,
        award: u32,
    },
    PlayerDead {
        died_at: f64,
    },
}

impl LevelStatus {
    // Completion ends the run at once; death ends it after a grace period
    #[must_use]
    pub fn is_finished(&self, now_ms: f64) -> bool {
        match self {
            Self::Running => false,
            Self::Completed { .. } => true,
            Self::PlayerDead { died_at } => now_ms - died_at >= LEVEL_DEATH_GRACE_MS,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed { .. } => "completed",
            Self::PlayerDead { .. } => "player dead",
        }
    }
}

// Primary-shape overlaps found this step
#[derive(Resource, Default)]
pub struct ContactPairs {
    pub pairs: Vec<ContactPair<Entity>>,
    // Projectile bodies touching solid tiles or the world edges
    pub terrain: Vec<Entity>,
}

// ============================================================================
// Input Script
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    // Simulation time in ms at which the event applies
    pub at: f64,
    pub code: String,
    pub pressed: bool,
    // Touch control name instead of a key code
    #[serde(default)]
    pub touch: bool,
}

// Recorded input replayed into the snapshot as simulation time passes
#[derive(Resource, Debug, Clone, Default)]
pub struct InputScript {
    events: Vec<ScriptedInput>,
    cursor: usize,
}

impl InputScript {
    #[must_use]
    pub fn new(mut events: Vec<ScriptedInput>) -> Self {
        events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { events, cursor: 0 }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let events: Vec<ScriptedInput> = serde_json::from_str(json).context("failed to parse input script")?;
        Ok(Self::new(events))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input script {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("invalid input script {}", path.display()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    // Applies every event due at `now_ms`. Returns how many were applied; unmapped codes count too.
    pub fn replay(&mut self, now_ms: f64, input: &mut InputSnapshot) -> usize {
        let start = self.cursor;
        while let Some(event) = self.events.get(self.cursor)
            && event.at <= now_ms
        {
            if event.touch {
                input.apply_touch(&event.code, event.pressed);
            } else {
                input.apply_key(&event.code, event.pressed);
            }
            self.cursor += 1;
        }
        self.cursor - start
    }
}

// ============================================================================
// Report
// ============================================================================

// End-of-run summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimReport {
    pub ticks: u64,
    pub elapsed_ms: f64,
    pub score: u32,
    pub status: LevelStatus,
    pub player_health: f32,
    pub monsters: usize,
    pub projectiles: usize,
    pub coins: usize,
    pub night: bool,
}
