use bevy_ecs::prelude::*;
use bevy_math::Vec2;

use crate::{
    collision::{Aabb, CollisionCategory, overlap_aabb_vs_circle},
    components::{CoinId, CoinKind, Position},
    constants::*,
    physics::Body,
    score::ScoreLedger,
};

// Static pickup, worth points once
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coin {
    pub id: CoinId,
    pub kind: CoinKind,
    collected: bool,
}

impl Coin {
    #[must_use]
    pub const fn new(id: CoinId, kind: CoinKind) -> Self {
        Self {
            id,
            kind,
            collected: false,
        }
    }

    #[must_use]
    pub const fn body() -> Body {
        Body::new(CollisionCategory::Pickup, COIN_RADIUS * 2.0, COIN_RADIUS * 2.0).as_kinematic()
    }

    #[must_use]
    pub const fn is_collected(&self) -> bool {
        self.collected
    }

    // Circular pickup area against the player's box
    #[must_use]
    pub fn touches(&self, pos: &Position, player: &Aabb) -> bool {
        !self.collected && overlap_aabb_vs_circle(player, Vec2::from(*pos), COIN_RADIUS)
    }

    // Awards the coin's points the first time only
    pub fn collect(&mut self, ledger: &mut ScoreLedger) -> Option<u32> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(ledger.coin_collected(self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_twice_awards_once() {
        let mut ledger = ScoreLedger::default();
        let mut coin = Coin::new(CoinId(1), CoinKind::Gold);
        assert_eq!(coin.collect(&mut ledger), Some(10));
        assert_eq!(coin.collect(&mut ledger), None);
        assert_eq!(ledger.total(), 10);
        assert!(coin.is_collected());
    }

    #[test]
    fn pickup_area_is_circular() {
        let coin = Coin::new(CoinId(2), CoinKind::Bronze);
        let pos = Position::new(100.0, 100.0);
        // Corner 7 px away on both axes is ~9.9 px from the centre
        let corner = Aabb::from_center(Vec2::new(117.0, 117.0), Vec2::splat(10.0));
        assert!(!coin.touches(&pos, &corner));
        let side = Aabb::from_center(Vec2::new(117.0, 100.0), Vec2::splat(10.0));
        assert!(coin.touches(&pos, &side));
    }
}
