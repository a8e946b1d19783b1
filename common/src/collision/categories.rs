use crate::{components::MonsterKind, projectiles::ProjectileKind};

// Which kind of entity owns a physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionCategory {
    Player,
    Monster(MonsterKind),
    Projectile(ProjectileKind),
    Terrain,
    Pickup,
}

impl CollisionCategory {
    #[must_use]
    pub const fn is_projectile(self) -> bool {
        matches!(self, Self::Projectile(_))
    }
}

// ============================================================================
// Projectile Explosion Table
// ============================================================================

impl ProjectileKind {
    // Categories a projectile passes through without exploding. Pickups and other projectiles are never
    // destroyable and each projectile ignores its own side.
    #[must_use]
    pub const fn ignores(self, other: CollisionCategory) -> bool {
        match (self, other) {
            (_, CollisionCategory::Pickup | CollisionCategory::Projectile(_)) => true,
            (Self::Fireball(_), CollisionCategory::Player) => true,
            (Self::Belch, CollisionCategory::Monster(MonsterKind::DemonFlower)) => true,
            _ => false,
        }
    }

    #[must_use]
    pub const fn explodes_on(self, other: CollisionCategory) -> bool {
        !self.ignores(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectiles::FireballTier;
    use rstest::rstest;

    const LOW: ProjectileKind = ProjectileKind::Fireball(FireballTier::Low);

    #[rstest]
    #[case(LOW, CollisionCategory::Player, false)]
    #[case(LOW, CollisionCategory::Pickup, false)]
    #[case(ProjectileKind::Belch, CollisionCategory::Projectile(LOW), false)]
    #[case(LOW, CollisionCategory::Terrain, true)]
    #[case(LOW, CollisionCategory::Monster(MonsterKind::DemonFlower), true)]
    #[case(LOW, CollisionCategory::Projectile(ProjectileKind::Belch), false)]
    #[case(ProjectileKind::Belch, CollisionCategory::Player, true)]
    #[case(ProjectileKind::Belch, CollisionCategory::Terrain, true)]
    #[case(ProjectileKind::Belch, CollisionCategory::Monster(MonsterKind::DemonFlower), false)]
    #[case(ProjectileKind::Belch, CollisionCategory::Monster(MonsterKind::Skeleton), true)]
    #[case(ProjectileKind::Belch, CollisionCategory::Pickup, false)]
    fn explosion_table(#[case] kind: ProjectileKind, #[case] other: CollisionCategory, #[case] explodes: bool) {
        assert_eq!(kind.explodes_on(other), explodes);
    }
}
