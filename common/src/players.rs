use bevy_ecs::prelude::*;
use bevy_time::Timer;
use std::time::Duration;

use crate::{
    collision::CollisionCategory,
    components::{
        Facing, Health, HealthBar, LightProxy, MonsterId, Position, ProjectileId, StepTime, Velocity, anim_timer,
    },
    constants::*,
    input::{InputSnapshot, PlayerAction},
    physics::{Blocked, Body, SensorSlot},
    projectiles::FireballTier,
    utils::{clamp, denormalize, normalize},
};

// ============================================================================
// Types
// ============================================================================

// Who hurt the player. Repeated contact with the same source while hurting is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageSource {
    Monster(MonsterId),
    Projectile(ProjectileId),
    // Fell out of the level
    Bounds,
}

#[derive(Debug, Clone)]
pub enum PlayerVitality {
    Active,
    Hurting { by: DamageSource, timer: Timer },
    Dead,
}

// Committed action whose animation suppresses all other animation selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    JumpLand,
    CrouchOut,
    FastAttack,
    PowerAttack,
}

impl BlockKind {
    const fn duration_ms(self) -> f32 {
        match self {
            Self::JumpLand => PLAYER_JUMP_LAND_MS,
            Self::CrouchOut => PLAYER_CROUCH_OUT_MS,
            Self::FastAttack => PLAYER_FAST_ATTACK_MS,
            Self::PowerAttack => PLAYER_POWER_ATTACK_MS,
        }
    }

    const fn animation(self) -> PlayerAnimation {
        match self {
            Self::JumpLand => PlayerAnimation::JumpLand,
            Self::CrouchOut => PlayerAnimation::CrouchOut,
            Self::FastAttack => PlayerAnimation::FastAttack,
            Self::PowerAttack => PlayerAnimation::PowerAttack,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlockingAnimation {
    pub kind: BlockKind,
    pub timer: Timer,
}

impl BlockingAnimation {
    fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            timer: anim_timer(kind.duration_ms()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAnimation {
    Idle,
    // Frame time scales with running speed
    Walk { frame_ms: f32 },
    Jump,
    JumpLand,
    Hurt,
    Dead,
    PowerAttack,
    FastAttack,
    CrouchIn,
    CrouchOut,
}

// Side effects the runner applies after a player step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    SpawnFireball(FireballTier),
    Died,
}

// ============================================================================
// Player Controller
// ============================================================================

#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    pub health: Health,
    pub facing: Facing,
    pub speed: f32,
    pub ducking: bool,
    pub vitality: PlayerVitality,
    pub block: Option<BlockingAnimation>,
    pub animation: PlayerAnimation,
    pub torch: LightProxy,
    last_jumped_at: f64,
    last_fast_attack_at: f64,
    last_power_attack_at: f64,
    prev_input: InputSnapshot,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerController {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            health: Health::new(PLAYER_MAX_HEALTH),
            facing: Facing::Right,
            speed: 0.0,
            ducking: false,
            vitality: PlayerVitality::Active,
            block: None,
            animation: PlayerAnimation::Idle,
            torch: LightProxy::new(PLAYER_TORCH_RADIUS, PLAYER_TORCH_INTENSITY, PLAYER_TORCH_COLOR),
            last_jumped_at: f64::NEG_INFINITY,
            last_fast_attack_at: f64::NEG_INFINITY,
            last_power_attack_at: f64::NEG_INFINITY,
            prev_input: InputSnapshot::new(),
        }
    }

    #[must_use]
    pub fn body() -> Body {
        Body::new(CollisionCategory::Player, PLAYER_WIDTH, PLAYER_HEIGHT)
            .with_wall_sensors()
            .with_ground_sensor()
    }

    #[must_use]
    pub const fn is_dead(&self) -> bool {
        matches!(self.vitality, PlayerVitality::Dead)
    }

    #[must_use]
    pub const fn is_hurting(&self) -> bool {
        matches!(self.vitality, PlayerVitality::Hurting { .. })
    }

    #[must_use]
    pub fn health_bar(&self) -> HealthBar {
        self.health.bar()
    }

    // One simulation step, before physics. Contact counts are reset by the caller afterwards.
    pub fn before_update(
        &mut self,
        step: &StepTime,
        input: &InputSnapshot,
        pos: &Position,
        vel: &mut Velocity,
        body: &mut Body,
        blocked: &Blocked,
        level_height: f32,
    ) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        let delta = step.delta();

        self.torch.follow(Position::new(pos.x, pos.y - body.height() / 2.0));
        self.tick_timers(delta, &mut events);

        if pos.y > level_height {
            events.extend(self.hit(f32::INFINITY, self.facing, DamageSource::Bounds, vel));
        }

        if !self.is_dead() && !self.is_hurting() {
            self.apply_inputs(step, input, vel, body, blocked, &mut events);
        }
        self.animate(input, blocked);

        events
    }

    fn tick_timers(&mut self, delta: Duration, events: &mut Vec<PlayerEvent>) {
        if let PlayerVitality::Hurting { timer, .. } = &mut self.vitality {
            timer.tick(delta);
            if timer.is_finished() {
                self.vitality = PlayerVitality::Active;
            }
        }

        let Some(block) = &mut self.block else {
            return;
        };
        block.timer.tick(delta);
        if block.timer.is_finished() {
            // A power attack only fires if nothing pre-empted it before completion
            if block.kind == BlockKind::PowerAttack {
                events.push(PlayerEvent::SpawnFireball(FireballTier::High));
            }
            self.block = None;
        }
    }

    fn apply_inputs(
        &mut self,
        step: &StepTime,
        input: &InputSnapshot,
        vel: &mut Velocity,
        body: &mut Body,
        blocked: &Blocked,
        events: &mut Vec<PlayerEvent>,
    ) {
        let grounded = blocked.is(SensorSlot::Bottom);
        let crouch = input.is_held(PlayerAction::Crouch);
        let was_crouching = self.prev_input.is_held(PlayerAction::Crouch);

        let moving = input.is_held(PlayerAction::Left) || input.is_held(PlayerAction::Right);
        if moving {
            self.walk(step.delta_ms, input.is_held(PlayerAction::Left), vel);
        } else {
            self.stop(step.delta_ms, vel);
        }

        let jumping = input.is_held(PlayerAction::Jump);
        if jumping && grounded && step.since(self.last_jumped_at) > PLAYER_JUMP_INTERVAL {
            self.last_jumped_at = step.now_ms;
            vel.y = -PLAYER_JUMP_POWER;
        }

        if ((!was_crouching && crouch) || (crouch && grounded)) && !moving && !jumping {
            if grounded && !self.ducking {
                body.scale_y = PLAYER_CROUCH_SCALE;
                self.ducking = true;
            }
        } else if was_crouching && !crouch && self.ducking {
            body.scale_y = 1.0;
            self.ducking = false;
            self.block = Some(BlockingAnimation::new(BlockKind::CrouchOut));
        }
        // Movement stands up straight away, skipping the crouch-out animation
        if (moving || jumping) && self.ducking {
            body.scale_y = 1.0;
            self.ducking = false;
        }

        if input.is_held(PlayerAction::FastAttack)
            && step.since(self.last_fast_attack_at) >= PLAYER_FAST_ATTACK_COOLDOWN
        {
            self.block = Some(BlockingAnimation::new(BlockKind::FastAttack));
            self.last_fast_attack_at = step.now_ms;
            events.push(PlayerEvent::SpawnFireball(FireballTier::Low));
        }
        if input.is_held(PlayerAction::PowerAttack)
            && grounded
            && step.since(self.last_power_attack_at) >= PLAYER_POWER_ATTACK_COOLDOWN
        {
            self.block = Some(BlockingAnimation::new(BlockKind::PowerAttack));
            self.last_power_attack_at = step.now_ms;
        }

        self.prev_input = *input;
    }

    fn walk(&mut self, delta_ms: f32, left: bool, vel: &mut Velocity) {
        let accel = delta_ms * PLAYER_SPEED_MODIFIER;
        let speed = if left { self.speed - accel } else { self.speed + accel };
        self.speed = clamp(speed, -PLAYER_MAX_RUN_SPEED, PLAYER_MAX_RUN_SPEED);
        vel.x = self.speed;
    }

    fn stop(&mut self, delta_ms: f32, vel: &mut Velocity) {
        if self.speed == 0.0 {
            return;
        }

        if self.speed.abs() <= PLAYER_STOP_SPEED {
            self.speed = 0.0;
        } else {
            let drag = -self.speed.signum() * delta_ms * PLAYER_DRAG_MODIFIER;
            self.speed = clamp(self.speed + drag, -PLAYER_MAX_RUN_SPEED, PLAYER_MAX_RUN_SPEED);
        }
        vel.x = self.speed;
    }

    // Picks this step's animation: block > ducking > landing > walk/idle > airborne
    fn animate(&mut self, input: &InputSnapshot, blocked: &Blocked) {
        match self.vitality {
            PlayerVitality::Dead => {
                self.animation = PlayerAnimation::Dead;
                return;
            }
            PlayerVitality::Hurting { .. } => {
                self.animation = PlayerAnimation::Hurt;
                return;
            }
            PlayerVitality::Active => {}
        }

        if let Some(block) = &self.block {
            if input.any_directional() {
                self.block = None;
            } else {
                self.animation = block.kind.animation();
            }
            return;
        }

        let left = input.is_held(PlayerAction::Left);
        let right = input.is_held(PlayerAction::Right);
        if (self.facing == Facing::Left && right) || (self.facing == Facing::Right && left) {
            self.facing = self.facing.flipped();
        }

        if !blocked.is(SensorSlot::Bottom) {
            self.animation = PlayerAnimation::Jump;
            return;
        }
        if self.ducking {
            self.animation = PlayerAnimation::CrouchIn;
            return;
        }
        if !blocked.was(SensorSlot::Bottom) {
            self.block = Some(BlockingAnimation::new(BlockKind::JumpLand));
            self.animation = PlayerAnimation::JumpLand;
            return;
        }
        self.animation = if self.speed.abs() > 0.0 {
            PlayerAnimation::Walk {
                frame_ms: denormalize(normalize(self.speed.abs(), 0.0, PLAYER_MAX_RUN_SPEED), 0.0, PLAYER_WALK_FRAME_MS),
            }
        } else {
            PlayerAnimation::Idle
        };
    }

    // Applies damage unless already hurting from the same source. Returns Died when this hit was lethal.
    pub fn hit(
        &mut self,
        damage: f32,
        direction: Facing,
        source: DamageSource,
        vel: &mut Velocity,
    ) -> Option<PlayerEvent> {
        match &self.vitality {
            PlayerVitality::Dead => return None,
            PlayerVitality::Hurting { by, .. } if *by == source => return None,
            _ => {}
        }

        self.block = None;
        self.health.damage(damage);
        if self.health.is_depleted() {
            self.vitality = PlayerVitality::Dead;
            self.animation = PlayerAnimation::Dead;
            return Some(PlayerEvent::Died);
        }

        *vel = Velocity::new(direction.sign() * PLAYER_KNOCKBACK_X, PLAYER_KNOCKBACK_Y);
        self.facing = direction.flipped();
        self.vitality = PlayerVitality::Hurting {
            by: source,
            timer: anim_timer(PLAYER_HURT_MS),
        };
        self.animation = PlayerAnimation::Hurt;
        None
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Contacts;
    use approx::assert_relative_eq;

    const LEVEL_HEIGHT: f32 = 1000.0;

    struct Rig {
        player: PlayerController,
        pos: Position,
        vel: Velocity,
        body: Body,
        blocked: Blocked,
        step: StepTime,
        input: InputSnapshot,
    }

    impl Rig {
        fn grounded() -> Self {
            let mut contacts = Contacts::default();
            contacts.add(SensorSlot::Bottom);
            let mut blocked = Blocked::default();
            blocked.latch(&contacts);
            blocked.latch(&contacts);
            Self {
                player: PlayerController::new(),
                pos: Position::new(100.0, 500.0),
                vel: Velocity::default(),
                body: PlayerController::body(),
                blocked,
                step: StepTime::new(STEP_MS, 10_000.0),
                input: InputSnapshot::default(),
            }
        }

        fn airborne() -> Self {
            Self {
                blocked: Blocked::default(),
                ..Self::grounded()
            }
        }

        fn tick(&mut self) -> Vec<PlayerEvent> {
            self.step.advance(STEP_MS);
            self.player.before_update(
                &self.step,
                &self.input,
                &self.pos,
                &mut self.vel,
                &mut self.body,
                &self.blocked,
                LEVEL_HEIGHT,
            )
        }

        fn run(&mut self, steps: usize) -> Vec<PlayerEvent> {
            (0..steps).flat_map(|_| self.tick()).collect()
        }
    }

    #[test]
    fn walking_accelerates_to_max_run_speed() {
        let mut rig = Rig::grounded();
        rig.input.press(PlayerAction::Right);
        rig.tick();
        assert_relative_eq!(rig.player.speed, STEP_MS * PLAYER_SPEED_MODIFIER, epsilon = 1e-5);
        rig.run(60);
        assert_relative_eq!(rig.player.speed, PLAYER_MAX_RUN_SPEED);
        assert_relative_eq!(rig.vel.x, PLAYER_MAX_RUN_SPEED);
        assert!(matches!(rig.player.animation, PlayerAnimation::Walk { .. }));
    }

    #[test]
    fn releasing_drags_speed_to_exactly_zero() {
        let mut rig = Rig::grounded();
        rig.input.press(PlayerAction::Left);
        rig.run(30);
        assert!(rig.player.speed < 0.0);
        assert_eq!(rig.player.facing, Facing::Left);

        rig.input.release(PlayerAction::Left);
        rig.run(60);
        assert_relative_eq!(rig.player.speed, 0.0);
        assert_eq!(rig.player.animation, PlayerAnimation::Idle);
    }

    #[test]
    fn jump_needs_ground_and_interval() {
        let mut rig = Rig::airborne();
        rig.input.press(PlayerAction::Jump);
        rig.tick();
        assert_relative_eq!(rig.vel.y, 0.0);
        assert_eq!(rig.player.animation, PlayerAnimation::Jump);

        let mut rig = Rig::grounded();
        rig.input.press(PlayerAction::Jump);
        rig.tick();
        assert_relative_eq!(rig.vel.y, -PLAYER_JUMP_POWER);

        // Still grounded (as far as the sensors know) but inside the interval
        rig.vel.y = 0.0;
        rig.run(10);
        assert_relative_eq!(rig.vel.y, 0.0);
        rig.run(10);
        assert_relative_eq!(rig.vel.y, -PLAYER_JUMP_POWER);
    }

    #[test]
    fn crouch_halves_body_and_release_plays_crouch_out() {
        let mut rig = Rig::grounded();
        rig.input.press(PlayerAction::Crouch);
        rig.tick();
        assert!(rig.player.ducking);
        assert_relative_eq!(rig.body.scale_y, PLAYER_CROUCH_SCALE);
        assert_eq!(rig.player.animation, PlayerAnimation::CrouchIn);

        rig.input.release(PlayerAction::Crouch);
        rig.tick();
        assert!(!rig.player.ducking);
        assert_relative_eq!(rig.body.scale_y, 1.0);
        assert_eq!(rig.player.animation, PlayerAnimation::CrouchOut);

        rig.run(20);
        assert!(rig.player.block.is_none());
        assert_eq!(rig.player.animation, PlayerAnimation::Idle);
    }

    #[test]
    fn moving_while_ducking_stands_up_without_crouch_out() {
        let mut rig = Rig::grounded();
        rig.input.press(PlayerAction::Crouch);
        rig.tick();
        rig.input.press(PlayerAction::Right);
        rig.tick();
        assert!(!rig.player.ducking);
        assert_relative_eq!(rig.body.scale_y, 1.0);
        assert!(rig.player.block.is_none());
    }

    #[test]
    fn fast_attack_fires_at_start_once_per_cooldown() {
        let mut rig = Rig::grounded();
        rig.input.press(PlayerAction::FastAttack);
        assert_eq!(rig.tick(), vec![PlayerEvent::SpawnFireball(FireballTier::Low)]);
        assert_eq!(rig.player.animation, PlayerAnimation::FastAttack);

        // Held for a second: still cooling down
        assert!(rig.run(60).is_empty());
        // 1200ms after the first shot
        assert_eq!(rig.run(15), vec![PlayerEvent::SpawnFireball(FireballTier::Low)]);
    }

    #[test]
    fn power_attack_fires_on_completion() {
        let mut rig = Rig::grounded();
        rig.input.press(PlayerAction::PowerAttack);
        assert!(rig.tick().is_empty());
        rig.input.release(PlayerAction::PowerAttack);

        // 7 frames at 18 fps is about 389ms
        let events = rig.run(30);
        assert_eq!(events, vec![PlayerEvent::SpawnFireball(FireballTier::High)]);
    }

    #[test]
    fn power_attack_cancelled_by_movement() {
        let mut rig = Rig::grounded();
        rig.input.press(PlayerAction::PowerAttack);
        rig.tick();
        rig.input.release(PlayerAction::PowerAttack);
        rig.input.press(PlayerAction::Left);
        assert!(rig.run(30).is_empty());
    }

    #[test]
    fn power_attack_cancelled_by_damage() {
        let mut rig = Rig::grounded();
        rig.input.press(PlayerAction::PowerAttack);
        rig.tick();
        rig.input.release(PlayerAction::PowerAttack);
        rig.player.hit(5.0, Facing::Left, DamageSource::Monster(MonsterId(1)), &mut rig.vel);
        assert!(rig.run(30).is_empty());
    }

    #[test]
    fn power_attack_needs_ground() {
        let mut rig = Rig::airborne();
        rig.input.press(PlayerAction::PowerAttack);
        rig.tick();
        assert!(rig.player.block.is_none());
    }

    #[test]
    fn same_source_only_hurts_once() {
        let mut rig = Rig::grounded();
        let belch = DamageSource::Projectile(ProjectileId(7));
        rig.player.hit(10.0, Facing::Right, belch, &mut rig.vel);
        rig.player.hit(10.0, Facing::Right, belch, &mut rig.vel);
        assert_relative_eq!(rig.player.health.current(), 90.0);

        rig.player.hit(10.0, Facing::Right, DamageSource::Monster(MonsterId(3)), &mut rig.vel);
        assert_relative_eq!(rig.player.health.current(), 80.0);
    }

    #[test]
    fn hurt_knocks_back_and_locks_input() {
        let mut rig = Rig::grounded();
        rig.player.hit(10.0, Facing::Right, DamageSource::Monster(MonsterId(1)), &mut rig.vel);
        assert_relative_eq!(rig.vel.x, PLAYER_KNOCKBACK_X);
        assert_relative_eq!(rig.vel.y, PLAYER_KNOCKBACK_Y);
        assert_eq!(rig.player.facing, Facing::Left);

        rig.input.press(PlayerAction::Right);
        rig.tick();
        assert_relative_eq!(rig.player.speed, 0.0);
        assert_eq!(rig.player.animation, PlayerAnimation::Hurt);

        // Hurt is 3 frames at 5 fps
        rig.run(40);
        assert!(!rig.player.is_hurting());
        assert!(rig.player.speed > 0.0);
    }

    #[test]
    fn falling_out_of_the_level_is_lethal() {
        let mut rig = Rig::airborne();
        rig.pos.y = LEVEL_HEIGHT + 1.0;
        assert_eq!(rig.tick(), vec![PlayerEvent::Died]);
        assert!(rig.player.is_dead());
        assert_relative_eq!(rig.player.health.current(), 0.0);
        assert!(rig.tick().is_empty());
        assert_eq!(rig.player.animation, PlayerAnimation::Dead);
    }

    #[test]
    fn landing_plays_jump_land() {
        let mut rig = Rig::airborne();
        rig.tick();
        let mut contacts = Contacts::default();
        contacts.add(SensorSlot::Bottom);
        rig.blocked.latch(&contacts);
        rig.tick();
        assert_eq!(rig.player.animation, PlayerAnimation::JumpLand);
    }
}
