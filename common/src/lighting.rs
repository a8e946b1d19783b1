use bevy_ecs::prelude::*;

// Global day/night state. Night turns on the player's torch and every projectile light.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneLighting {
    day: bool,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self { day: true }
    }
}

impl SceneLighting {
    #[must_use]
    pub const fn is_night(&self) -> bool {
        !self.day
    }

    // Returns true if this switched the scene to night
    pub const fn lights_off(&mut self) -> bool {
        let changed = self.day;
        self.day = false;
        changed
    }

    // Returns true if this switched the scene back to day
    pub const fn lights_on(&mut self) -> bool {
        let changed = !self.day;
        self.day = true;
        changed
    }
}
