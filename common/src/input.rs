use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Player Actions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    Left,
    Right,
    Jump,
    Crouch,
    PowerAttack,
    FastAttack,
    ComboAttack,
    ComboKick,
}

impl PlayerAction {
    pub const ALL: [Self; 8] = [
        Self::Left,
        Self::Right,
        Self::Jump,
        Self::Crouch,
        Self::PowerAttack,
        Self::FastAttack,
        Self::ComboAttack,
        Self::ComboKick,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

// Keyboard codes as reported by the browser-style `KeyboardEvent.code`
#[must_use]
pub fn action_for_key(code: &str) -> Option<PlayerAction> {
    match code {
        "ArrowLeft" => Some(PlayerAction::Left),
        "ArrowRight" => Some(PlayerAction::Right),
        "ArrowUp" => Some(PlayerAction::Jump),
        "ArrowDown" => Some(PlayerAction::Crouch),
        "ControlLeft" | "ControlRight" => Some(PlayerAction::PowerAttack),
        "ShiftLeft" | "ShiftRight" => Some(PlayerAction::FastAttack),
        "KeyZ" => Some(PlayerAction::ComboAttack),
        "KeyX" => Some(PlayerAction::ComboKick),
        _ => None,
    }
}

// Virtual joystick and on-screen buttons
#[must_use]
pub fn action_for_touch(control: &str) -> Option<PlayerAction> {
    match control {
        "JoystickLeft" => Some(PlayerAction::Left),
        "JoystickRight" => Some(PlayerAction::Right),
        "JoystickUp" => Some(PlayerAction::Jump),
        "JoystickDown" => Some(PlayerAction::Crouch),
        "A" => Some(PlayerAction::PowerAttack),
        "B" => Some(PlayerAction::FastAttack),
        "C" => Some(PlayerAction::ComboAttack),
        "D" => Some(PlayerAction::ComboKick),
        _ => None,
    }
}

// ============================================================================
// Input Snapshot
// ============================================================================

// "Currently held" state per action. Raw input sources write it; the simulation only reads it.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: [bool; PlayerAction::ALL.len()],
}

impl InputSnapshot {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            held: [false; PlayerAction::ALL.len()],
        }
    }

    #[must_use]
    pub const fn is_held(&self, action: PlayerAction) -> bool {
        self.held[action.index()]
    }

    pub const fn set(&mut self, action: PlayerAction, held: bool) {
        self.held[action.index()] = held;
    }

    pub const fn press(&mut self, action: PlayerAction) {
        self.set(action, true);
    }

    pub const fn release(&mut self, action: PlayerAction) {
        self.set(action, false);
    }

    // Pointer cancel/leave releases everything at once
    pub const fn release_all(&mut self) {
        self.held = [false; PlayerAction::ALL.len()];
    }

    // Applies a keyboard event; returns the mapped action, None for unmapped codes
    pub fn apply_key(&mut self, code: &str, pressed: bool) -> Option<PlayerAction> {
        let action = action_for_key(code)?;
        self.set(action, pressed);
        Some(action)
    }

    pub fn apply_touch(&mut self, control: &str, pressed: bool) -> Option<PlayerAction> {
        let action = action_for_touch(control)?;
        self.set(action, pressed);
        Some(action)
    }

    #[must_use]
    pub const fn any_directional(&self) -> bool {
        self.is_held(PlayerAction::Left)
            || self.is_held(PlayerAction::Right)
            || self.is_held(PlayerAction::Jump)
            || self.is_held(PlayerAction::Crouch)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ArrowLeft", PlayerAction::Left)]
    #[case("ArrowUp", PlayerAction::Jump)]
    #[case("ControlRight", PlayerAction::PowerAttack)]
    #[case("ShiftLeft", PlayerAction::FastAttack)]
    #[case("KeyX", PlayerAction::ComboKick)]
    fn keys_map_to_actions(#[case] code: &str, #[case] action: PlayerAction) {
        assert_eq!(action_for_key(code), Some(action));
    }

    #[rstest]
    #[case("JoystickDown", PlayerAction::Crouch)]
    #[case("A", PlayerAction::PowerAttack)]
    #[case("B", PlayerAction::FastAttack)]
    #[case("C", PlayerAction::ComboAttack)]
    fn touch_controls_map_to_actions(#[case] control: &str, #[case] action: PlayerAction) {
        assert_eq!(action_for_touch(control), Some(action));
    }

    #[test]
    fn press_and_release_track_held_state() {
        let mut input = InputSnapshot::default();
        assert_eq!(input.apply_key("ArrowRight", true), Some(PlayerAction::Right));
        assert!(input.is_held(PlayerAction::Right));
        assert!(input.any_directional());

        input.apply_key("ArrowRight", false);
        assert!(!input.is_held(PlayerAction::Right));
        assert!(!input.any_directional());
    }

    #[test]
    fn unmapped_codes_are_ignored() {
        let mut input = InputSnapshot::default();
        assert_eq!(input.apply_key("KeyQ", true), None);
        assert_eq!(input, InputSnapshot::default());
    }

    #[test]
    fn release_all_clears_every_action() {
        let mut input = InputSnapshot::default();
        for action in PlayerAction::ALL {
            input.press(action);
        }
        input.release_all();
        assert!(PlayerAction::ALL.iter().all(|a| !input.is_held(*a)));
    }
}
