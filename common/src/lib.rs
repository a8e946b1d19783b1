pub mod coins;
pub mod collision;
pub mod components;
pub mod constants;
pub mod input;
pub mod level;
pub mod lighting;
pub mod map;
pub mod markers;
pub mod monsters;
pub mod path;
pub mod physics;
pub mod players;
pub mod projectiles;
pub mod score;
pub mod utils;
