use bevy::prelude::*;

use crate::resources::{InputScript, TickCount};
use common::{components::StepTime, constants::STEP_MS, input::InputSnapshot};

// ============================================================================
// Clock & Input Systems
// ============================================================================

// Fixed step: every update is one 60 Hz tick regardless of wall-clock time
pub fn clock_system(mut step: ResMut<StepTime>, mut ticks: ResMut<TickCount>) {
    step.advance(STEP_MS);
    ticks.0 += 1;
}

// Feeds due scripted events into the input snapshot
pub fn input_replay_system(
    step: Res<StepTime>,
    mut script: ResMut<InputScript>,
    mut input: ResMut<InputSnapshot>,
) {
    let applied = script.replay(step.now_ms, &mut input);
    if applied > 0 {
        debug!("applied {applied} scripted inputs at {:.0}ms", step.now_ms);
    }
}
