use bevy_math::Vec2;

// Axis-aligned box in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    #[must_use]
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn half(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    // Strict overlap; boxes that only touch along an edge do not count
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        ranges_overlap_1d(self.min.x, self.max.x, other.min.x, other.max.x)
            && ranges_overlap_1d(self.min.y, self.max.y, other.min.y, other.max.y)
    }

    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

// Check if two open 1D ranges overlap.
#[must_use]
pub fn ranges_overlap_1d(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_max > b_min && a_min < b_max
}

#[must_use]
pub fn overlap_aabb_vs_circle(aabb: &Aabb, center: Vec2, radius: f32) -> bool {
    let closest = center.clamp(aabb.min, aabb.max);
    closest.distance_squared(center) <= radius * radius
}
