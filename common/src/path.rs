use bevy_math::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::{constants::*, utils::rand_between};

// ============================================================================
// Oscillatory Path
// ============================================================================

// Smooth, bounded 2D motion built from three pairs of per-axis oscillators.
//
// The centre and perturbation oscillators only drift `center`; the emitted offset comes from the fine
// oscillator around the origin. Callers add the offset to their own anchor, so `center` never feeds back
// into the output.
#[derive(Debug, Clone)]
pub struct OscillatoryPath {
    pub center: Vec2,
    rps_center: Vec2,
    rps_perturbation: Vec2,
    rps_fine: Vec2,
    dist_center: f32,
    dist_perturbation: f32,
    dist_fine: f32,
}

impl OscillatoryPath {
    // Frequencies are rolled once here; after construction the path is a pure function of time.
    pub fn new(rng: &mut impl Rng, center: Vec2, dist_center: f32, dist_perturbation: f32, dist_fine: f32) -> Self {
        Self {
            center,
            rps_center: Vec2::new(rand_between(rng, PATH_CENTER_RPS_X), rand_between(rng, PATH_CENTER_RPS_Y)),
            rps_perturbation: Vec2::new(
                rand_between(rng, PATH_PERTURBATION_RPS_X),
                rand_between(rng, PATH_PERTURBATION_RPS_Y),
            ),
            rps_fine: Vec2::new(rand_between(rng, PATH_FINE_RPS_X), rand_between(rng, PATH_FINE_RPS_Y)),
            dist_center,
            dist_perturbation,
            dist_fine,
        }
    }

    #[must_use]
    pub const fn with_frequencies(
        center: Vec2,
        rps_center: Vec2,
        rps_perturbation: Vec2,
        rps_fine: Vec2,
        dist_center: f32,
        dist_perturbation: f32,
        dist_fine: f32,
    ) -> Self {
        Self {
            center,
            rps_center,
            rps_perturbation,
            rps_fine,
            dist_center,
            dist_perturbation,
            dist_fine,
        }
    }

    #[must_use]
    pub const fn amplitude(&self) -> f32 {
        self.dist_fine
    }

    // Advances the drifting centre, then returns the fine offset for `time_ms`
    pub fn next(&mut self, time_ms: f32) -> Vec2 {
        self.move_center(time_ms);
        self.coords(time_ms)
    }

    #[must_use]
    pub fn coords(&self, time_ms: f32) -> Vec2 {
        let phase = phase(time_ms, self.rps_fine);
        Vec2::new(phase.x.cos() * self.dist_fine, phase.y.sin() * self.dist_fine)
    }

    fn move_center(&mut self, time_ms: f32) {
        let phase_c = phase(time_ms, self.rps_center);
        let phase_p = phase(time_ms, self.rps_perturbation);

        self.center.x = phase_p
            .x
            .cos()
            .mul_add(self.dist_perturbation, phase_c.x.cos().mul_add(self.dist_center, PATH_BASE));
        self.center.y = phase_p
            .y
            .sin()
            .mul_add(self.dist_perturbation, phase_c.y.sin().mul_add(self.dist_center, PATH_BASE));
    }
}

fn phase(time_ms: f32, rps: Vec2) -> Vec2 {
    rps * (time_ms / 1000.0 * TAU)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    fn path(seed: u64) -> OscillatoryPath {
        let mut rng = StdRng::seed_from_u64(seed);
        OscillatoryPath::new(&mut rng, Vec2::new(320.0, 400.0), 150.0, 150.0, 150.0)
    }

    #[test]
    fn offsets_stay_within_fine_amplitude() {
        let mut path = path(1);
        for step in 0..5000 {
            let offset = path.next(step as f32 * STEP_MS);
            assert!(offset.x.abs() <= 150.0 + 1e-3 && offset.y.abs() <= 150.0 + 1e-3, "{offset:?}");
        }
    }

    #[test]
    fn consecutive_offsets_are_continuous() {
        let mut path = path(2);
        // Max speed of the fine oscillator is 2*pi*rps*dist per second, rps <= 1.1
        let max_step = TAU * 1.1 * 150.0 * STEP_MS / 1000.0;
        let mut prev = path.next(0.0);
        for step in 1..5000 {
            let next = path.next(step as f32 * STEP_MS);
            assert!((next.x - prev.x).abs() <= max_step + 1e-3);
            assert!((next.y - prev.y).abs() <= max_step + 1e-3);
            prev = next;
        }
    }

    #[test]
    fn next_is_pure_after_construction() {
        let mut path = path(3);
        let first = path.next(0.0);
        path.next(12_345.0);
        let again = path.next(0.0);
        assert_relative_eq!(first.x, again.x);
        assert_relative_eq!(first.y, again.y);
        assert_relative_eq!(first.x, 150.0);
        assert_relative_eq!(first.y, 0.0);
    }

    #[test]
    fn center_drifts_without_affecting_offsets() {
        let mut path = OscillatoryPath::with_frequencies(
            Vec2::ZERO,
            Vec2::new(0.43, 0.47),
            Vec2::new(0.093, 0.097),
            Vec2::new(1.0, 0.8),
            20.0,
            30.0,
            30.0,
        );
        let offset = path.next(0.0);
        // cos(0) terms: 100 + 20 + 30
        assert_relative_eq!(path.center.x, 150.0);
        assert_relative_eq!(path.center.y, 100.0);

        path.center = Vec2::new(-9999.0, 9999.0);
        let same = path.coords(0.0);
        assert_relative_eq!(offset.x, same.x);
        assert_relative_eq!(offset.y, same.y);
    }

    #[test]
    fn quarter_period_of_fine_oscillator() {
        let path = OscillatoryPath::with_frequencies(
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::new(1.0, 1.0),
            0.0,
            0.0,
            30.0,
        );
        let offset = path.coords(250.0);
        assert_relative_eq!(offset.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(offset.y, 30.0, epsilon = 1e-4);
    }
}
