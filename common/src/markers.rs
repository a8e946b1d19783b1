use bevy_ecs::prelude::*;

// Marker components to tell the entity archetypes of a level apart in queries.
#[derive(Component, Debug, Default)]
pub struct PlayerMarker;

#[derive(Component, Debug, Default)]
pub struct MonsterMarker;

#[derive(Component, Debug, Default)]
pub struct ProjectileMarker;

#[derive(Component, Debug, Default)]
pub struct CoinMarker;
