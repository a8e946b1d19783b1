use bevy_ecs::prelude::*;

use crate::{
    components::{CoinKind, HitStats, MonsterKind},
    constants::*,
};

// ============================================================================
// Score Ledger
// ============================================================================

// Base award plus (power, fast) bonus bases per archetype
const fn kill_award(kind: MonsterKind) -> (u32, f32, f32) {
    match kind {
        MonsterKind::Chomper => (25, 10.0, 20.0),
        MonsterKind::DemonFlower => (55, 20.0, 40.0),
        MonsterKind::Flyfly => (15, 5.0, 10.0),
        MonsterKind::Skeleton => (70, 30.0, 50.0),
    }
}

// Fewer hits of a tier give a larger bonus; no hits of that tier give none
fn hit_bonus(base: f32, hits: u32) -> u32 {
    if hits == 0 { 0 } else { (base / hits as f32).round() as u32 }
}

// Running total. Only ever grows.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreLedger {
    total: u32,
}

impl ScoreLedger {
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    pub fn monster_killed(&mut self, kind: MonsterKind, stats: HitStats) -> u32 {
        let (base, power_base, fast_base) = kill_award(kind);
        let award = base + hit_bonus(power_base, stats.power_hits) + hit_bonus(fast_base, stats.fast_hits);
        self.add(award)
    }

    pub fn level_completed(&mut self, time_ms: f64) -> u32 {
        let award = if time_ms <= LEVEL_FAST_TIME {
            LEVEL_FAST_POINTS
        } else if time_ms <= LEVEL_MEDIUM_TIME {
            LEVEL_MEDIUM_POINTS
        } else {
            LEVEL_SLOW_POINTS
        };
        self.add(award)
    }

    pub fn coin_collected(&mut self, kind: CoinKind) -> u32 {
        let award = match kind {
            CoinKind::Gold => COIN_GOLD_POINTS,
            CoinKind::Silver => COIN_SILVER_POINTS,
            CoinKind::Bronze => COIN_BRONZE_POINTS,
        };
        self.add(award)
    }

    const fn add(&mut self, award: u32) -> u32 {
        self.total = self.total.saturating_add(award);
        award
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const fn stats(power_hits: u32, fast_hits: u32) -> HitStats {
        HitStats { power_hits, fast_hits }
    }

    #[rstest]
    #[case(MonsterKind::Chomper, stats(2, 0), 30)]
    #[case(MonsterKind::Skeleton, stats(0, 0), 70)]
    #[case(MonsterKind::Chomper, stats(1, 1), 55)]
    #[case(MonsterKind::DemonFlower, stats(3, 0), 62)]
    #[case(MonsterKind::Flyfly, stats(0, 1), 25)]
    #[case(MonsterKind::Skeleton, stats(2, 4), 70 + 15 + 13)]
    fn kill_awards(#[case] kind: MonsterKind, #[case] hits: HitStats, #[case] expected: u32) {
        let mut ledger = ScoreLedger::default();
        assert_eq!(ledger.monster_killed(kind, hits), expected);
        assert_eq!(ledger.total(), expected);
    }

    #[rstest]
    #[case(0.0, 1000)]
    #[case(70_000.0, 1000)]
    #[case(70_001.0, 750)]
    #[case(100_000.0, 750)]
    #[case(100_001.0, 500)]
    fn level_completion_tiers(#[case] time_ms: f64, #[case] expected: u32) {
        let mut ledger = ScoreLedger::default();
        assert_eq!(ledger.level_completed(time_ms), expected);
    }

    #[rstest]
    #[case(CoinKind::Gold, 10)]
    #[case(CoinKind::Silver, 5)]
    #[case(CoinKind::Bronze, 2)]
    fn coin_awards(#[case] kind: CoinKind, #[case] expected: u32) {
        let mut ledger = ScoreLedger::default();
        assert_eq!(ledger.coin_collected(kind), expected);
    }

    #[test]
    fn awards_accumulate() {
        let mut ledger = ScoreLedger::default();
        ledger.coin_collected(CoinKind::Gold);
        ledger.monster_killed(MonsterKind::Flyfly, stats(0, 0));
        ledger.level_completed(80_000.0);
        assert_eq!(ledger.total(), 10 + 15 + 750);
    }
}
