// ============================================================================
// Simulation Step
// ============================================================================

pub const STEP_HZ: u32 = 60;
pub const STEP_MS: f32 = 1000.0 / STEP_HZ as f32;

// Small value for floating-point comparisons (near-zero checks, division guards).
pub const PHYSICS_EPSILON: f32 = 1e-6;

// Duration of a non-looping animation in milliseconds.
#[must_use]
pub const fn anim_ms(frames: u32, fps: u32) -> f32 {
    frames as f32 * 1000.0 / fps as f32
}

// ============================================================================
// World & Physics
// ============================================================================

pub const TILE_SIZE: f32 = 32.0; // pixels
pub const GRAVITY: f32 = 0.28; // pixels per step squared
pub const TERMINAL_VELOCITY: f32 = 10.0; // pixels per step
pub const SENSOR_THICKNESS: f32 = 5.0;
pub const GROUND_FRICTION: f32 = 0.85; // horizontal velocity kept per grounded step
pub const CONTACT_SKIN: f32 = 0.01; // resting contacts closer than this are ignored on the other axis

// ============================================================================
// Player
// ============================================================================

pub const PLAYER_WIDTH: f32 = 20.0;
pub const PLAYER_HEIGHT: f32 = 45.0;
pub const PLAYER_SPAWN_X: f32 = 32.0;
pub const PLAYER_SPAWN_Y: f32 = 800.0;
pub const PLAYER_MAX_HEALTH: f32 = 100.0;

pub const PLAYER_MAX_RUN_SPEED: f32 = 3.0;
pub const PLAYER_SPEED_MODIFIER: f32 = 0.01; // acceleration per ms of held input
pub const PLAYER_DRAG_MODIFIER: f32 = 0.01; // deceleration per ms without input
pub const PLAYER_STOP_SPEED: f32 = 0.1; // |speed| at or below this snaps to zero
pub const PLAYER_JUMP_POWER: f32 = 7.0;
pub const PLAYER_JUMP_INTERVAL: f64 = 250.0;
pub const PLAYER_FAST_ATTACK_COOLDOWN: f64 = 1200.0;
pub const PLAYER_POWER_ATTACK_COOLDOWN: f64 = 1500.0;
pub const PLAYER_CROUCH_SCALE: f32 = 0.5;
pub const PLAYER_KNOCKBACK_X: f32 = 2.0;
pub const PLAYER_KNOCKBACK_Y: f32 = -3.0;

pub const PLAYER_TORCH_RADIUS: f32 = 250.0;
pub const PLAYER_TORCH_INTENSITY: f32 = 1.0;
pub const PLAYER_TORCH_COLOR: u32 = 0x00ff_ffff;

// Walk animation runs at 30 fps when at full speed
pub const PLAYER_WALK_FRAME_MS: f32 = 1000.0 / 30.0;

pub const PLAYER_JUMP_LAND_MS: f32 = anim_ms(4, 20);
pub const PLAYER_HURT_MS: f32 = anim_ms(3, 5);
pub const PLAYER_DEAD_MS: f32 = anim_ms(7, 10);
pub const PLAYER_POWER_ATTACK_MS: f32 = anim_ms(7, 18);
pub const PLAYER_FAST_ATTACK_MS: f32 = anim_ms(6, 60);
pub const PLAYER_CROUCH_IN_MS: f32 = anim_ms(3, 24);
pub const PLAYER_CROUCH_OUT_MS: f32 = anim_ms(3, 24);

// ============================================================================
// Health Bar
// ============================================================================

pub const HEALTH_BAR_WIDTH: f32 = 30.0;
pub const HEALTH_BAR_HEIGHT: f32 = 4.0;
pub const HEALTH_BAR_FILL_WIDTH: f32 = 28.0;
pub const HEALTH_BAR_GREEN: u32 = 0x00ff00;
pub const HEALTH_BAR_YELLOW: u32 = 0xffff00;
pub const HEALTH_BAR_RED: u32 = 0xff0000;

// ============================================================================
// Chomper
// ============================================================================

pub const CHOMPER_SIZE: f32 = 32.0;
pub const CHOMPER_MAX_HEALTH: f32 = 20.0;
pub const CHOMPER_SPEED: f32 = 2.0;
pub const CHOMPER_JUMP_POWER: f32 = 3.0;
pub const CHOMPER_JUMP_COOLDOWN: f64 = 1000.0;
pub const CHOMPER_LEAP_DISTANCE: f32 = 37.0;
pub const CHOMPER_CHASE_DISTANCE: f32 = 128.0;
pub const CHOMPER_ATTACK_DISTANCE: f32 = 45.0;
pub const CHOMPER_ATTACK_POWER: (f32, f32) = (6.0, 12.0);
pub const CHOMPER_MOVE_MS: f32 = anim_ms(5, 12);
pub const CHOMPER_BITE_MS: f32 = anim_ms(6, 17);
pub const CHOMPER_HURT_MS: f32 = anim_ms(3, 20);
pub const CHOMPER_DIE_MS: f32 = anim_ms(8, 15);

// ============================================================================
// Demon Flower
// ============================================================================

pub const DEMON_FLOWER_SIZE: f32 = 40.0;
pub const DEMON_FLOWER_MAX_HEALTH: f32 = 30.0;
pub const DEMON_FLOWER_SENSE_DISTANCE: f32 = 192.0;
pub const DEMON_FLOWER_ATTACK_DISTANCE: f32 = 50.0;
pub const DEMON_FLOWER_BELCH_COOLDOWN: f64 = 2000.0;
pub const DEMON_FLOWER_ATTACK_POWER: (f32, f32) = (12.0, 16.0);
pub const DEMON_FLOWER_ATTACK_MS: f32 = anim_ms(5, 13);
pub const DEMON_FLOWER_BELCH_START_MS: f32 = anim_ms(11, 12);
pub const DEMON_FLOWER_BELCH_END_MS: f32 = anim_ms(3, 12);
pub const DEMON_FLOWER_HURT_MS: f32 = anim_ms(3, 12);
pub const DEMON_FLOWER_DIE_MS: f32 = anim_ms(9, 15);

// ============================================================================
// Flyfly
// ============================================================================

pub const FLYFLY_SIZE: f32 = 24.0;
pub const FLYFLY_MAX_HEALTH: f32 = 20.0;
pub const FLYFLY_SPEED: f32 = 1.5;
pub const FLYFLY_CHASE_DISTANCE: f32 = 175.0;
pub const FLYFLY_ATTACK_DISTANCE: f32 = 45.0;
pub const FLYFLY_TERRITORY_RADIUS: f32 = 300.0;
pub const FLYFLY_WAYPOINT_THRESHOLD: f32 = 3.0;
pub const FLYFLY_ATTACK_POWER: (f32, f32) = (6.0, 12.0);
pub const FLYFLY_BITE_MS: f32 = anim_ms(5, 17);
pub const FLYFLY_DIE_MS: f32 = anim_ms(8, 15);

// ============================================================================
// Skeleton
// ============================================================================

pub const SKELETON_WIDTH: f32 = 16.0;
pub const SKELETON_HEIGHT: f32 = 32.0;
pub const SKELETON_MAX_HEALTH: f32 = 30.0;
pub const SKELETON_SPEED: f32 = 1.0;
pub const SKELETON_CHASE_DISTANCE: f32 = 200.0;
pub const SKELETON_ATTACK_DISTANCE: f32 = 45.0;
pub const SKELETON_ATTACK_POWER: (f32, f32) = (6.0, 12.0);

pub const SKELETON_DORMANCY_DURATION: (f32, f32) = (3000.0, 7000.0);
pub const SKELETON_DORMANCY_COOLDOWN: (f32, f32) = (3000.0, 5000.0);
pub const SKELETON_DORMANCY_PROBABILITY: (f32, f32) = (0.35, 0.55);
pub const SKELETON_ETHEREAL_THRESHOLD: f32 = 0.25; // health fraction
pub const SKELETON_ETHEREAL_PROBABILITY: (f32, f32) = (0.2, 0.3);

pub const SKELETON_FLY_LEASH: f32 = 750.0; // transforms back out beyond this distance
pub const SKELETON_PATH_DRIFT: f32 = 0.75; // pixels per step towards the player
pub const SKELETON_PATH_AMPLITUDE: f32 = 150.0;

pub const SKELETON_LIGHT_COLOR: u32 = 0x00ee_4b2b;
pub const SKELETON_LIGHT_RADIUS: f32 = 65.0;
pub const SKELETON_LIGHT_INTENSITY: f32 = 0.9;

pub const SKELETON_ATTACK_MS: f32 = anim_ms(4, 17);
pub const SKELETON_HURT_MS: f32 = anim_ms(3, 8);
pub const SKELETON_DIE_MS: f32 = anim_ms(7, 15);
pub const SKELETON_TRANSFORM_MS: f32 = anim_ms(6, 14);

// Shared ground-monster knockback when hurt (multiplied by the direction away from the hit)
pub const MONSTER_KNOCKBACK_X: f32 = 2.0;
pub const MONSTER_KNOCKBACK_Y: f32 = -3.0;

// ============================================================================
// Projectiles
// ============================================================================

pub const FIREBALL_SPEED: f32 = 6.5;
pub const FIREBALL_LOW_POWER: f32 = 5.0;
pub const FIREBALL_HIGH_POWER: f32 = 10.0;
pub const FIREBALL_SPAWN_OFFSET_X: f32 = 25.0;
pub const FIREBALL_SPAWN_OFFSET_Y: f32 = -8.0;
pub const FIREBALL_WIDTH: f32 = 16.0;
pub const FIREBALL_HEIGHT: f32 = 8.0;

pub const BELCH_SPEED: f32 = 7.5;
pub const BELCH_SPAWN_OFFSET_X: f32 = 20.0;
pub const BELCH_WIDTH: f32 = 12.0;
pub const BELCH_HEIGHT: f32 = 12.0;

pub const PROJECTILE_EXPLODE_MS: f32 = anim_ms(3, 20);
pub const PROJECTILE_LIGHT_RADIUS: f32 = 48.0;
pub const PROJECTILE_LIGHT_INTENSITY: f32 = 0.8;
pub const PROJECTILE_LIGHT_COLOR: u32 = 0x00ff_a500;

// ============================================================================
// Coins & Scoring
// ============================================================================

pub const COIN_RADIUS: f32 = 8.0;
pub const COIN_GOLD_POINTS: u32 = 10;
pub const COIN_SILVER_POINTS: u32 = 5;
pub const COIN_BRONZE_POINTS: u32 = 2;

pub const LEVEL_FAST_TIME: f64 = 70_000.0; // ms, inclusive
pub const LEVEL_MEDIUM_TIME: f64 = 100_000.0; // ms, inclusive
pub const LEVEL_FAST_POINTS: u32 = 1000;
pub const LEVEL_MEDIUM_POINTS: u32 = 750;
pub const LEVEL_SLOW_POINTS: u32 = 500;

// ============================================================================
// Level Flow
// ============================================================================

pub const LEVEL_DEATH_GRACE_MS: f64 = 2000.0; // run keeps going this long after the player dies
pub const LEVEL_DEFAULT_COLS: usize = 60;
pub const LEVEL_DEFAULT_ROWS: usize = 20;

// ============================================================================
// Oscillatory Path Frequency Bounds (revolutions per second, per axis)
// ============================================================================

pub const PATH_CENTER_RPS_X: (f32, f32) = (0.41, 0.45);
pub const PATH_CENTER_RPS_Y: (f32, f32) = (0.45, 0.49);
pub const PATH_PERTURBATION_RPS_X: (f32, f32) = (0.091, 0.095);
pub const PATH_PERTURBATION_RPS_Y: (f32, f32) = (0.095, 0.099);
pub const PATH_FINE_RPS_X: (f32, f32) = (0.9, 1.1);
pub const PATH_FINE_RPS_Y: (f32, f32) = (0.7, 0.9);
pub const PATH_BASE: f32 = 100.0;
