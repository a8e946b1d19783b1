use bevy::prelude::*;

use crate::resources::ContactPairs;
use common::{
    collision::Aabb,
    components::{Position, Velocity},
    map::TileMap,
    physics::{Blocked, Body, Contacts, find_contact_pairs, integrate, sense},
};

// ============================================================================
// Physics Step System
// ============================================================================

// Moves every body, then refills sensor contacts for the new positions
pub fn physics_system(
    map: Res<TileMap>,
    mut query: Query<(&mut Position, &mut Velocity, &Body, Option<&mut Contacts>)>,
) {
    for (mut pos, mut vel, body, contacts) in &mut query {
        integrate(&mut pos, &mut vel, body, &map);

        if let Some(mut contacts) = contacts {
            contacts.reset();
            sense(&pos, body, &map, &mut contacts);
        }
    }
}

// ============================================================================
// Contact Pair System
// ============================================================================

pub fn contact_pairs_system(
    map: Res<TileMap>,
    mut contacts: ResMut<ContactPairs>,
    query: Query<(Entity, &Position, &Body)>,
) {
    let shapes: Vec<(Entity, Aabb, _)> = query
        .iter()
        .filter(|(_, _, body)| !body.inert)
        .map(|(entity, pos, body)| (entity, body.shape(pos), body.category))
        .collect();

    contacts.pairs = find_contact_pairs(&shapes);
    // Solid tiles and the left/right world edges both stop projectiles
    let width = map.width_px();
    contacts.terrain = shapes
        .iter()
        .filter(|(_, shape, category)| {
            category.is_projectile() && (map.overlaps_solid(shape) || shape.min.x <= 0.0 || shape.max.x >= width)
        })
        .map(|(entity, _, _)| *entity)
        .collect();
}

// ============================================================================
// After Update System
// ============================================================================

// Latches this step's contact counts into blocked flags
pub fn after_update_system(mut query: Query<(&Contacts, &mut Blocked)>) {
    for (contacts, mut blocked) in &mut query {
        blocked.latch(contacts);
    }
}
