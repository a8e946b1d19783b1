use bevy_ecs::prelude::*;
use bevy_math::Vec2;

use crate::{
    collision::{Aabb, CollisionCategory},
    components::{Position, Velocity},
    constants::*,
    map::TileMap,
};

// ============================================================================
// Bodies & Sensors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorSlot {
    Left,
    Right,
    Bottom,
    BottomLeft,
    BottomRight,
}

impl SensorSlot {
    const COUNT: usize = 5;

    const fn index(self) -> usize {
        self as usize
    }
}

// Contact-only fixture at an offset from the body centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensor {
    pub slot: SensorSlot,
    pub offset: Vec2,
    pub half: Vec2,
}

// Compound body: one damage-receiving primary box plus contact sensors
#[derive(Component, Debug, Clone)]
pub struct Body {
    pub half: Vec2,
    pub category: CollisionCategory,
    // No terrain response; still reports contacts
    pub sensor: bool,
    pub ignore_gravity: bool,
    // Moved by logic only, never integrated
    pub kinematic: bool,
    // Excluded from contact pairs
    pub inert: bool,
    // Vertical scale of the primary box, anchored at the feet
    pub scale_y: f32,
    pub sensors: Vec<Sensor>,
}

impl Body {
    #[must_use]
    pub const fn new(category: CollisionCategory, width: f32, height: f32) -> Self {
        Self {
            half: Vec2::new(width / 2.0, height / 2.0),
            category,
            sensor: false,
            ignore_gravity: false,
            kinematic: false,
            inert: false,
            scale_y: 1.0,
            sensors: Vec::new(),
        }
    }

    #[must_use]
    pub const fn as_sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    #[must_use]
    pub const fn without_gravity(mut self) -> Self {
        self.ignore_gravity = true;
        self
    }

    #[must_use]
    pub const fn as_kinematic(mut self) -> Self {
        self.kinematic = true;
        self.ignore_gravity = true;
        self
    }

    #[must_use]
    pub fn with_sensor(mut self, slot: SensorSlot, offset: Vec2, size: Vec2) -> Self {
        self.sensors.push(Sensor {
            slot,
            offset,
            half: size / 2.0,
        });
        self
    }

    // Walls left and right at mid height, ground under the feet
    #[must_use]
    pub fn with_wall_sensors(self) -> Self {
        let side = Vec2::new(SENSOR_THICKNESS, self.half.y);
        let x = self.half.x + 1.0;
        let y = -self.half.y * 0.25;
        self.with_sensor(SensorSlot::Left, Vec2::new(-x, y), side)
            .with_sensor(SensorSlot::Right, Vec2::new(x, y), side)
    }

    #[must_use]
    pub fn with_ground_sensor(self) -> Self {
        let size = Vec2::new(self.half.x * 1.5, SENSOR_THICKNESS);
        let y = self.half.y;
        self.with_sensor(SensorSlot::Bottom, Vec2::new(0.0, y), size)
    }

    // Split ground sensors at both bottom corners, used to find ledges
    #[must_use]
    pub fn with_ledge_sensors(self) -> Self {
        let size = Vec2::new(10.0, SENSOR_THICKNESS);
        let (x, y) = (self.half.x, self.half.y);
        self.with_sensor(SensorSlot::BottomLeft, Vec2::new(-x, y), size)
            .with_sensor(SensorSlot::BottomRight, Vec2::new(x, y), size)
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.half.y * 2.0 * self.scale_y
    }

    // Primary box; scaling keeps the bottom edge in place
    #[must_use]
    pub fn shape(&self, pos: &Position) -> Aabb {
        let half = Vec2::new(self.half.x, self.half.y * self.scale_y);
        let center = Vec2::new(pos.x, pos.y + self.half.y - half.y);
        Aabb::from_center(center, half)
    }

    #[must_use]
    pub fn sensor_shape(&self, pos: &Position, sensor: &Sensor) -> Aabb {
        Aabb::from_center(Vec2::from(*pos) + sensor.offset, sensor.half)
    }

    #[must_use]
    pub fn has_sensor(&self, slot: SensorSlot) -> bool {
        self.sensors.iter().any(|sensor| sensor.slot == slot)
    }
}

// Per-step sensor contact counts. Zeroed in before-update, filled by the physics step.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    counts: [u32; SensorSlot::COUNT],
}

impl Contacts {
    pub const fn reset(&mut self) {
        self.counts = [0; SensorSlot::COUNT];
    }

    pub const fn add(&mut self, slot: SensorSlot) {
        self.counts[slot.index()] += 1;
    }

    #[must_use]
    pub const fn count(&self, slot: SensorSlot) -> u32 {
        self.counts[slot.index()]
    }
}

// Blocked flags derived from contact counts in after-update, with the previous step kept for edges
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blocked {
    current: [bool; SensorSlot::COUNT],
    previous: [bool; SensorSlot::COUNT],
}

impl Blocked {
    pub fn latch(&mut self, contacts: &Contacts) {
        self.previous = self.current;
        for (blocked, count) in self.current.iter_mut().zip(contacts.counts) {
            *blocked = count > 0;
        }
    }

    #[must_use]
    pub const fn is(&self, slot: SensorSlot) -> bool {
        self.current[slot.index()]
    }

    #[must_use]
    pub const fn was(&self, slot: SensorSlot) -> bool {
        self.previous[slot.index()]
    }

    pub const fn set(&mut self, slot: SensorSlot, blocked: bool) {
        self.current[slot.index()] = blocked;
    }
}

// ============================================================================
// Step
// ============================================================================

// Integrates one step: gravity, per-axis movement with tile resolution, horizontal world bounds.
pub fn integrate(pos: &mut Position, vel: &mut Velocity, body: &Body, map: &TileMap) {
    if body.kinematic {
        return;
    }

    if !body.ignore_gravity {
        vel.y = (vel.y + GRAVITY).min(TERMINAL_VELOCITY);
    }

    pos.x += vel.x;
    if !body.sensor {
        resolve_x(pos, vel, body, map);
    }

    pos.y += vel.y;
    if !body.sensor {
        resolve_y(pos, vel, body, map);
    }

    let min_x = body.half.x;
    let max_x = map.width_px() - body.half.x;
    if pos.x < min_x {
        pos.x = min_x;
        vel.x = vel.x.max(0.0);
    } else if pos.x > max_x {
        pos.x = max_x;
        vel.x = vel.x.min(0.0);
    }
}

fn resolve_x(pos: &mut Position, vel: &mut Velocity, body: &Body, map: &TileMap) {
    if vel.x.abs() < PHYSICS_EPSILON {
        return;
    }
    for tile in map.solid_tiles_overlapping(&skinned(body.shape(pos), Vec2::new(0.0, CONTACT_SKIN))) {
        let shape = skinned(body.shape(pos), Vec2::new(0.0, CONTACT_SKIN));
        if !tile.overlaps(&shape) {
            continue;
        }
        if vel.x > 0.0 {
            pos.x -= shape.max.x - tile.min.x;
        } else {
            pos.x += tile.max.x - shape.min.x;
        }
        vel.x = 0.0;
    }
}

fn resolve_y(pos: &mut Position, vel: &mut Velocity, body: &Body, map: &TileMap) {
    if vel.y.abs() < PHYSICS_EPSILON {
        return;
    }
    let mut landed = false;
    for tile in map.solid_tiles_overlapping(&skinned(body.shape(pos), Vec2::new(CONTACT_SKIN, 0.0))) {
        let shape = body.shape(pos);
        if !tile.overlaps(&skinned(shape, Vec2::new(CONTACT_SKIN, 0.0))) {
            continue;
        }
        if vel.y > 0.0 {
            pos.y -= shape.max.y - tile.min.y;
            landed = true;
        } else {
            pos.y += tile.max.y - shape.min.y;
        }
        vel.y = 0.0;
    }
    if landed {
        vel.x *= GROUND_FRICTION;
    }
}

// Shrinks a box so edge contact on one axis does not count as overlap on the other
fn skinned(aabb: Aabb, skin: Vec2) -> Aabb {
    Aabb {
        min: aabb.min + skin,
        max: aabb.max - skin,
    }
}

// Counts sensor overlaps with solid tiles into `contacts`
pub fn sense(pos: &Position, body: &Body, map: &TileMap, contacts: &mut Contacts) {
    for sensor in &body.sensors {
        if map.overlaps_solid(&body.sensor_shape(pos, sensor)) {
            contacts.add(sensor.slot);
        }
    }
}

// ============================================================================
// Contact Pairs
// ============================================================================

// Two primary shapes overlapping this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPair<T> {
    pub a: T,
    pub a_category: CollisionCategory,
    pub b: T,
    pub b_category: CollisionCategory,
}

impl<T: Copy> ContactPair<T> {
    // Returns (this side, other side, other category) when `category` matches one side
    #[must_use]
    pub fn side(&self, matches: impl Fn(CollisionCategory) -> bool) -> Option<(T, T, CollisionCategory)> {
        if matches(self.a_category) {
            Some((self.a, self.b, self.b_category))
        } else if matches(self.b_category) {
            Some((self.b, self.a, self.a_category))
        } else {
            None
        }
    }
}

// All overlapping pairs among the given shapes, in input order
#[must_use]
pub fn find_contact_pairs<T: Copy>(shapes: &[(T, Aabb, CollisionCategory)]) -> Vec<ContactPair<T>> {
    let mut pairs = Vec::new();
    for (i, (a, a_shape, a_category)) in shapes.iter().enumerate() {
        for (b, b_shape, b_category) in &shapes[i + 1..] {
            if a_shape.overlaps(b_shape) {
                pairs.push(ContactPair {
                    a: *a,
                    a_category: *a_category,
                    b: *b,
                    b_category: *b_category,
                });
            }
        }
    }
    pairs
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_map() -> TileMap {
        let mut rows = vec!["..........".to_string(); 9];
        rows.push("##########".to_string());
        rows[8] = ".........#".to_string();
        TileMap::from_rows(32.0, &rows).unwrap_or_else(|e| panic!("{e}"))
    }

    fn walker() -> Body {
        Body::new(CollisionCategory::Player, 20.0, 40.0)
            .with_wall_sensors()
            .with_ground_sensor()
    }

    fn settle(pos: &mut Position, vel: &mut Velocity, body: &Body, map: &TileMap) {
        for _ in 0..120 {
            integrate(pos, vel, body, map);
        }
    }

    #[test]
    fn falling_body_lands_on_ground() {
        let map = flat_map();
        let body = walker();
        let mut pos = Position::new(50.0, 100.0);
        let mut vel = Velocity::default();
        settle(&mut pos, &mut vel, &body, &map);

        // Ground row starts at 9 * 32 = 288
        assert_relative_eq!(body.shape(&pos).max.y, 288.0, epsilon = 1e-3);
        assert_relative_eq!(vel.y, 0.0);

        let mut contacts = Contacts::default();
        sense(&pos, &body, &map, &mut contacts);
        assert_eq!(contacts.count(SensorSlot::Bottom), 1);
        assert_eq!(contacts.count(SensorSlot::Left), 0);
    }

    #[test]
    fn walls_stop_horizontal_motion() {
        let map = flat_map();
        let body = walker();
        let mut pos = Position::new(250.0, 268.0);
        let mut vel = Velocity::new(3.0, 0.0);
        for _ in 0..30 {
            vel.x = 3.0;
            integrate(&mut pos, &mut vel, &body, &map);
        }
        // Wall tile at column 9 starts at x = 288
        assert_relative_eq!(body.shape(&pos).max.x, 288.0, epsilon = 1e-3);

        let mut contacts = Contacts::default();
        sense(&pos, &body, &map, &mut contacts);
        assert_eq!(contacts.count(SensorSlot::Right), 1);
    }

    #[test]
    fn sensor_bodies_pass_through_tiles() {
        let map = flat_map();
        let body = Body::new(CollisionCategory::Terrain, 10.0, 10.0).as_sensor().without_gravity();
        let mut pos = Position::new(270.0, 270.0);
        let mut vel = Velocity::new(6.5, 0.0);
        integrate(&mut pos, &mut vel, &body, &map);
        integrate(&mut pos, &mut vel, &body, &map);
        assert_relative_eq!(pos.x, 283.0);
        assert_relative_eq!(vel.x, 6.5);
    }

    #[test]
    fn crouch_scale_keeps_feet_planted() {
        let mut body = walker();
        let pos = Position::new(0.0, 0.0);
        let feet = body.shape(&pos).max.y;
        body.scale_y = 0.5;
        assert_relative_eq!(body.shape(&pos).max.y, feet);
        assert_relative_eq!(body.height(), 20.0);
    }

    #[test]
    fn blocked_latch_keeps_previous() {
        let mut contacts = Contacts::default();
        let mut blocked = Blocked::default();
        contacts.add(SensorSlot::Bottom);
        blocked.latch(&contacts);
        assert!(blocked.is(SensorSlot::Bottom) && !blocked.was(SensorSlot::Bottom));

        contacts.reset();
        blocked.latch(&contacts);
        assert!(!blocked.is(SensorSlot::Bottom) && blocked.was(SensorSlot::Bottom));
    }

    #[test]
    fn contact_pairs_report_both_categories() {
        let shapes = [
            (1, Aabb::from_center(Vec2::ZERO, Vec2::splat(5.0)), CollisionCategory::Player),
            (2, Aabb::from_center(Vec2::new(100.0, 0.0), Vec2::splat(5.0)), CollisionCategory::Pickup),
            (3, Aabb::from_center(Vec2::new(4.0, 0.0), Vec2::splat(5.0)), CollisionCategory::Terrain),
        ];
        let pairs = find_contact_pairs(&shapes);
        assert_eq!(pairs.len(), 1);
        let side = pairs[0].side(|c| c == CollisionCategory::Terrain);
        assert_eq!(side, Some((3, 1, CollisionCategory::Player)));
    }
}
