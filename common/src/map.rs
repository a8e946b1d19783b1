use anyhow::{Result, bail};
use bevy_ecs::prelude::*;
use bevy_math::Vec2;

use crate::collision::Aabb;

// ============================================================================
// Tile Map
// ============================================================================

// Solid/empty tile grid. Row 0 is the top of the level.
#[derive(Resource, Debug, Clone)]
pub struct TileMap {
    tile_size: f32,
    cols: usize,
    rows: usize,
    solid: Vec<bool>,
}

impl TileMap {
    // Rows are strings of '#' (solid) and '.' (empty), all the same length
    pub fn from_rows<S: AsRef<str>>(tile_size: f32, rows: &[S]) -> Result<Self> {
        if tile_size <= 0.0 {
            bail!("tile size must be positive, got {tile_size}");
        }
        let Some(first) = rows.first() else {
            bail!("tile map has no rows");
        };

        let cols = first.as_ref().chars().count();
        let mut solid = Vec::with_capacity(cols * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != cols {
                bail!("tile row {row_index} has {} columns, expected {cols}", row.chars().count());
            }
            for (col_index, c) in row.chars().enumerate() {
                match c {
                    '#' => solid.push(true),
                    '.' => solid.push(false),
                    other => bail!("unknown tile '{other}' at row {row_index}, column {col_index}"),
                }
            }
        }

        Ok(Self {
            tile_size,
            cols,
            rows: rows.len(),
            solid,
        })
    }

    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    #[must_use]
    pub fn width_px(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    #[must_use]
    pub fn height_px(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    // Out-of-range cells are empty
    #[must_use]
    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return false;
        }
        self.solid[row as usize * self.cols + col as usize]
    }

    #[must_use]
    pub fn tile_at_world(&self, x: f32, y: f32) -> bool {
        self.is_solid(self.cell(x), self.cell(y))
    }

    #[must_use]
    pub fn tile_bounds(&self, col: i32, row: i32) -> Aabb {
        let min = Vec2::new(col as f32, row as f32) * self.tile_size;
        Aabb {
            min,
            max: min + Vec2::splat(self.tile_size),
        }
    }

    // Bounds of every solid tile the box overlaps
    #[must_use]
    pub fn solid_tiles_overlapping(&self, aabb: &Aabb) -> Vec<Aabb> {
        let (col_min, col_max) = (self.cell(aabb.min.x), self.cell(aabb.max.x));
        let (row_min, row_max) = (self.cell(aabb.min.y), self.cell(aabb.max.y));

        let mut tiles = Vec::new();
        for row in row_min..=row_max {
            for col in col_min..=col_max {
                if !self.is_solid(col, row) {
                    continue;
                }
                let tile = self.tile_bounds(col, row);
                if tile.overlaps(aabb) {
                    tiles.push(tile);
                }
            }
        }
        tiles
    }

    #[must_use]
    pub fn overlaps_solid(&self, aabb: &Aabb) -> bool {
        !self.solid_tiles_overlapping(aabb).is_empty()
    }

    fn cell(&self, coord: f32) -> i32 {
        (coord / self.tile_size).floor() as i32
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> TileMap {
        TileMap::from_rows(32.0, &["....", "...#", "####"]).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn dimensions_follow_rows() {
        let map = map();
        assert!((map.width_px() - 128.0).abs() < f32::EPSILON);
        assert!((map.height_px() - 96.0).abs() < f32::EPSILON);
    }

    #[test]
    fn world_lookup_hits_solid_tiles() {
        let map = map();
        assert!(map.tile_at_world(10.0, 70.0));
        assert!(map.tile_at_world(100.0, 40.0));
        assert!(!map.tile_at_world(10.0, 40.0));
        assert!(!map.tile_at_world(-5.0, 70.0));
        assert!(!map.tile_at_world(10.0, 500.0));
    }

    #[test]
    fn overlapping_tiles_are_reported() {
        let map = map();
        let probe = Aabb::from_center(Vec2::new(64.0, 64.0), Vec2::new(10.0, 4.0));
        assert_eq!(map.solid_tiles_overlapping(&probe).len(), 2);

        let resting = Aabb::from_center(Vec2::new(16.0, 54.0), Vec2::new(10.0, 10.0));
        assert!(!map.overlaps_solid(&resting));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(TileMap::from_rows(32.0, &["...", ".."]).is_err());
        assert!(TileMap::from_rows(32.0, &["..x"]).is_err());
        assert!(TileMap::from_rows::<&str>(32.0, &[]).is_err());
    }
}
