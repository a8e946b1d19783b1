pub mod clock;
pub mod collision;
pub mod level;
pub mod monsters;
pub mod physics;
pub mod players;
pub mod projectiles;

pub use clock::{clock_system, input_replay_system};
pub use collision::collision_system;
pub use level::{level_spawn_system, level_status_system, lighting_system};
pub use monsters::monster_update_system;
pub use physics::{after_update_system, contact_pairs_system, physics_system};
pub use players::player_update_system;
pub use projectiles::{projectile_spawn_system, projectile_update_system};
