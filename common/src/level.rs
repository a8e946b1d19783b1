use anyhow::{Context, Result, bail};
use bevy_ecs::prelude::*;
use bevy_math::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    collision::Aabb,
    components::{CoinKind, MonsterKind, Position},
    constants::*,
    map::TileMap,
};

// ============================================================================
// Level Data
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

impl From<SpawnPoint> for Position {
    fn from(p: SpawnPoint) -> Self {
        Self::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitZone {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinSpawn {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type")]
    pub kind: CoinKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MonsterSpawns {
    pub chomper: Vec<SpawnPoint>,
    pub demon_flower: Vec<SpawnPoint>,
    pub flyfly: Vec<SpawnPoint>,
    pub skeleton: Vec<SpawnPoint>,
}

impl MonsterSpawns {
    #[must_use]
    pub fn of(&self, kind: MonsterKind) -> &[SpawnPoint] {
        match kind {
            MonsterKind::Chomper => &self.chomper,
            MonsterKind::DemonFlower => &self.demon_flower,
            MonsterKind::Flyfly => &self.flyfly,
            MonsterKind::Skeleton => &self.skeleton,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        MonsterKind::ALL.iter().map(|kind| self.of(*kind).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Level document. Coordinates are pixels with y growing downwards.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LevelData {
    pub name: String,
    pub tile_size: f32,
    pub rows: Vec<String>,
    pub player_spawn: SpawnPoint,
    pub exit: ExitZone,
    #[serde(default)]
    pub spawns: MonsterSpawns,
    #[serde(default)]
    pub coins: Vec<CoinSpawn>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self> {
        let level: Self = serde_json::from_str(json).context("failed to parse level JSON")?;
        level.validate()?;
        Ok(level)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json =
            std::fs::read_to_string(path).with_context(|| format!("failed to read level file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("invalid level {}", path.display()))
    }

    pub fn tile_map(&self) -> Result<TileMap> {
        TileMap::from_rows(self.tile_size, &self.rows)
    }

    #[must_use]
    pub fn height_px(&self) -> f32 {
        self.rows.len() as f32 * self.tile_size
    }

    #[must_use]
    pub fn exit_bounds(&self) -> Aabb {
        let min = Vec2::new(self.exit.x, self.exit.y);
        Aabb {
            min,
            max: min + Vec2::new(self.exit.width, self.exit.height),
        }
    }

    // All monster placements in archetype order
    pub fn monster_spawns(&self) -> impl Iterator<Item = (MonsterKind, Position)> + '_ {
        MonsterKind::ALL
            .into_iter()
            .flat_map(|kind| self.spawns.of(kind).iter().map(move |p| (kind, Position::from(*p))))
    }

    fn validate(&self) -> Result<()> {
        let map = self.tile_map()?;
        if self.exit.width <= 0.0 || self.exit.height <= 0.0 {
            bail!("exit zone must have a positive size");
        }
        let spawn = self.player_spawn;
        if spawn.x < 0.0 || spawn.x > map.width_px() || spawn.y < 0.0 || spawn.y > map.height_px() {
            bail!("player spawn ({}, {}) is outside the level", spawn.x, spawn.y);
        }
        Ok(())
    }

    // First level of the game, laid out on a 60x20 grid
    #[must_use]
    pub fn builtin() -> Self {
        let cols = LEVEL_DEFAULT_COLS;
        let rows = LEVEL_DEFAULT_ROWS;
        let h = rows as f32 * TILE_SIZE;

        let solid = |row: usize, col: usize| match row {
            // Ground with a pit
            18 | 19 => !(40..=42).contains(&col),
            // Flower platform
            16 | 17 => (22..=26).contains(&col),
            // Skeleton ledge
            12 => (8..=13).contains(&col),
            _ => false,
        };
        let tiles = (0..rows)
            .map(|row| (0..cols).map(|col| if solid(row, col) { '#' } else { '.' }).collect())
            .collect();

        let at = |x: f32, y: f32| SpawnPoint { x, y };
        Self {
            name: "level-1-1".to_string(),
            tile_size: TILE_SIZE,
            rows: tiles,
            player_spawn: at(64.0, h - 100.0),
            exit: ExitZone {
                x: 1850.0,
                y: h - 164.0,
                width: 50.0,
                height: 100.0,
            },
            spawns: MonsterSpawns {
                chomper: vec![at(900.0, h - 120.0)],
                demon_flower: vec![at(784.0, h - 144.0)],
                flyfly: vec![at(600.0, h - 200.0)],
                skeleton: vec![at(320.0, h - 400.0)],
            },
            coins: vec![
                CoinSpawn {
                    x: 200.0,
                    y: h - 88.0,
                    kind: CoinKind::Gold,
                },
                CoinSpawn {
                    x: 420.0,
                    y: h - 280.0,
                    kind: CoinKind::Silver,
                },
                CoinSpawn {
                    x: 1000.0,
                    y: h - 88.0,
                    kind: CoinKind::Bronze,
                },
                CoinSpawn {
                    x: 1300.0,
                    y: h - 88.0,
                    kind: CoinKind::Gold,
                },
            ],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SMALL: &str = r#####"{
        "name": "small",
        "tile-size": 32,
        "rows": ["....", "####"],
        "player-spawn": { "x": 16, "y": 10 },
        "exit": { "x": 96, "y": 0, "width": 32, "height": 32 },
        "spawns": { "demon-flower": [{ "x": 64, "y": 12 }] },
        "coins": [{ "x": 40, "y": 20, "type": "silver" }]
    }"#####;

    #[test]
    fn parses_kebab_case_documents() {
        let level = LevelData::from_json(SMALL).unwrap_or_else(|e| panic!("{e:#}"));
        assert_eq!(level.spawns.demon_flower.len(), 1);
        assert!(level.spawns.chomper.is_empty());
        assert_eq!(level.coins[0].kind, CoinKind::Silver);
        assert_relative_eq!(level.height_px(), 64.0);

        let spawns: Vec<_> = level.monster_spawns().collect();
        assert_eq!(spawns, vec![(MonsterKind::DemonFlower, Position::new(64.0, 12.0))]);
        assert!(level.exit_bounds().contains(Vec2::new(100.0, 10.0)));
    }

    #[test]
    fn rejects_ragged_rows() {
        let json = SMALL.replace(r######""####""######, r####""###""####);
        assert!(LevelData::from_json(&json).is_err());
    }

    #[test]
    fn rejects_spawn_outside_the_level() {
        let json = SMALL.replace(r#""x": 16, "y": 10"#, r#""x": 16, "y": 500"#);
        let err = LevelData::from_json(&json).err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("outside the level"), "{err}");
    }

    #[test]
    fn builtin_level_places_one_of_each_archetype() {
        let level = LevelData::builtin();
        let map = level.tile_map().unwrap_or_else(|e| panic!("{e:#}"));
        let h = map.height_px();
        assert_eq!(level.spawns.len(), 4);
        assert_eq!(level.spawns.chomper, vec![SpawnPoint { x: 900.0, y: h - 120.0 }]);
        assert_eq!(level.spawns.skeleton, vec![SpawnPoint { x: 320.0, y: h - 400.0 }]);
        // Round trips through the on-disk format
        let json = serde_json::to_string(&level).unwrap_or_default();
        assert_eq!(LevelData::from_json(&json).ok(), Some(level));
    }

    #[test]
    fn shipped_level_file_matches_builtin() {
        let level = LevelData::from_json(include_str!("../../levels/level-1-1.json")).unwrap_or_else(|e| panic!("{e:#}"));
        assert_eq!(level, LevelData::builtin());
    }
}
