use bevy_math::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

// ============================================================================
// Math Helpers
// ============================================================================

// Saturating bounds. Unlike f32::clamp this never panics when min > max; min wins.
#[must_use]
pub fn clamp(val: f32, min: f32, max: f32) -> f32 {
    val.min(max).max(min)
}

#[must_use]
pub fn clamp_low(val: f32, min: f32) -> f32 {
    val.max(min)
}

// -1, 0 or 1; zero stays zero unlike f32::signum
#[must_use]
pub fn sign(val: f32) -> f32 {
    if val > 0.0 {
        1.0
    } else if val < 0.0 {
        -1.0
    } else {
        0.0
    }
}

// Linear remap from [min, max] to [0, 1]
#[must_use]
pub fn normalize(val: f32, min: f32, max: f32) -> f32 {
    (val - min) / (max - min)
}

// Linear remap from [0, 1] to [min, max]
#[must_use]
pub fn denormalize(norm: f32, min: f32, max: f32) -> f32 {
    norm.mul_add(max - min, min)
}

// ============================================================================
// Random Helpers
// ============================================================================

// Uniform real in [min, max)
pub fn rand_range(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    denormalize(rng.random::<f32>(), min, max)
}

// Uniform draw from a (min, max) pair, as stored in the tuning constants
pub fn rand_between(rng: &mut impl Rng, bounds: (f32, f32)) -> f32 {
    rand_range(rng, bounds.0, bounds.1)
}

// Area-uniform point inside the disk of radius r around (cx, cy) (sqrt on the radius)
pub fn rand_radial(rng: &mut impl Rng, cx: f32, cy: f32, r: f32) -> Vec2 {
    let radius = r * rand_range(rng, 0.0, 1.0).sqrt();
    let theta = rand_range(rng, 0.0, 1.0) * TAU;
    Vec2::new(radius.mul_add(theta.cos(), cx), radius.mul_add(theta.sin(), cy))
}

// Uniform pick; None for an empty slice
pub fn choose<'a, T>(rng: &mut impl Rng, vals: &'a [T]) -> Option<&'a T> {
    if vals.is_empty() {
        return None;
    }
    vals.get(rng.random_range(0..vals.len()))
}

// True when a uniform draw lands ABOVE p, so a larger p makes this LESS likely.
pub fn chance(rng: &mut impl Rng, p: f32) -> bool {
    rand_range(rng, 0.0, 1.0) > clamp(p, 0.0, 1.0)
}

// Short id used to name entities in logs (8 hex chars)
pub fn luid(rng: &mut impl Rng) -> String {
    format!("{:04x}{:04x}", rng.random::<u16>(), rng.random::<u16>())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};
    use rstest::rstest;

    #[rstest]
    #[case(5.0, 0.0, 10.0, 5.0)]
    #[case(-1.0, 0.0, 10.0, 0.0)]
    #[case(11.0, 0.0, 10.0, 10.0)]
    fn clamp_saturates(#[case] val: f32, #[case] min: f32, #[case] max: f32, #[case] expected: f32) {
        assert_relative_eq!(clamp(val, min, max), expected);
    }

    #[test]
    fn clamp_low_only_bounds_below() {
        assert_relative_eq!(clamp_low(-3.0, 0.0), 0.0);
        assert_relative_eq!(clamp_low(1e9, 0.0), 1e9);
    }

    #[test]
    fn sign_keeps_zero() {
        assert_relative_eq!(sign(-4.0), -1.0);
        assert_relative_eq!(sign(0.0), 0.0);
        assert_relative_eq!(sign(0.1), 1.0);
    }

    #[test]
    fn normalize_and_denormalize_are_inverse() {
        let norm = normalize(75.0, 0.0, 100.0);
        assert_relative_eq!(norm, 0.75);
        assert_relative_eq!(denormalize(norm, 0.0, 28.0), 21.0);
    }

    #[test]
    fn rand_range_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = rand_range(&mut rng, 6.0, 12.0);
            assert!((6.0..12.0).contains(&v), "{v} out of range");
        }
    }

    #[test]
    fn rand_radial_stays_inside_disk() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let p = rand_radial(&mut rng, 100.0, -50.0, 300.0);
            assert!(p.distance(Vec2::new(100.0, -50.0)) <= 300.0 + 1e-3);
        }
    }

    #[test]
    fn rand_radial_is_area_uniform() {
        // Half the area of a disk lies outside radius r / sqrt(2)
        let mut rng = StdRng::seed_from_u64(3);
        let inner = 300.0 / 2f32.sqrt();
        let samples = 20_000;
        let outside = (0..samples)
            .filter(|_| rand_radial(&mut rng, 0.0, 0.0, 300.0).length() > inner)
            .count();
        let ratio = outside as f32 / samples as f32;
        assert!((ratio - 0.5).abs() < 0.03, "ratio {ratio}");
    }

    #[test]
    fn choose_picks_every_value() {
        let mut rng = StdRng::seed_from_u64(5);
        let vals = [-1, 1];
        let mut seen = [false, false];
        for _ in 0..100 {
            match choose(&mut rng, &vals) {
                Some(-1) => seen[0] = true,
                Some(1) => seen[1] = true,
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(seen[0] && seen[1]);
        assert!(choose::<i32>(&mut rng, &[]).is_none());
    }

    #[test]
    fn chance_is_inverted() {
        let mut rng = StdRng::seed_from_u64(9);
        assert!((0..1000).all(|_| !chance(&mut rng, 1.0)));
        assert!((0..1000).all(|_| !chance(&mut rng, 5.0)));

        let hits = (0..10_000).filter(|_| chance(&mut rng, 0.8)).count();
        assert!((1500..2500).contains(&hits), "p=0.8 gave {hits} hits");
    }

    #[test]
    fn luid_is_eight_hex_chars() {
        let mut rng = StdRng::seed_from_u64(1);
        let id = luid(&mut rng);
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, luid(&mut rng));
    }
}
