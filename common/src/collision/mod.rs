pub mod categories;
pub mod helpers;

pub use categories::CollisionCategory;
pub use helpers::{Aabb, overlap_aabb_vs_circle, ranges_overlap_1d};
