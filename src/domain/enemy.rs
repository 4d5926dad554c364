/// Enemy roster entry: a chicken or the boss.
///
/// Damage dispatch depends on what an enemy can take. The boss has a
/// health counter and absorbs hits; a chicken only knows how to die.

use super::chicken::Chicken;
use super::endboss::{BossHit, Endboss};
use super::entity::{EntityId, Sprite};
use super::geometry::{Hitboxed, Insets, Rect};

/// How long a corpse stays visible.
pub const CORPSE_VISIBLE_MS: u64 = 1000;

#[derive(Clone, Debug)]
pub enum Enemy {
    Chicken(Chicken),
    Endboss(Endboss),
}

/// Result of a thrown bottle landing on an enemy.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProjectileDamage {
    /// Multi-hit enemy took the hit and lives on.
    Absorbed { health: u32 },
    /// Multi-hit enemy ignored the hit (cooldown).
    Shrugged,
    Killed,
}

impl Enemy {
    pub fn id(&self) -> EntityId {
        match self {
            Enemy::Chicken(c) => c.id,
            Enemy::Endboss(b) => b.id,
        }
    }

    pub fn set_id(&mut self, id: EntityId) {
        match self {
            Enemy::Chicken(c) => c.id = id,
            Enemy::Endboss(b) => b.id = id,
        }
    }

    pub fn sprite(&self) -> &Sprite {
        match self {
            Enemy::Chicken(c) => &c.sprite,
            Enemy::Endboss(b) => &b.sprite,
        }
    }

    pub fn is_dead(&self) -> bool {
        match self {
            Enemy::Chicken(c) => c.is_dead,
            Enemy::Endboss(b) => b.is_dead,
        }
    }

    pub fn dead_at(&self) -> Option<u64> {
        match self {
            Enemy::Chicken(c) => c.dead_at,
            Enemy::Endboss(b) => b.dead_at,
        }
    }

    /// Alive, or dead for less than a second.
    pub fn is_drawn(&self, now: u64) -> bool {
        match self.dead_at() {
            Some(t) if self.is_dead() => now.saturating_sub(t) < CORPSE_VISIBLE_MS,
            _ => true,
        }
    }

    pub fn as_endboss(&self) -> Option<&Endboss> {
        match self {
            Enemy::Endboss(b) => Some(b),
            Enemy::Chicken(_) => None,
        }
    }

    /// Instant kill, used by stomps. Returns false if already dead.
    pub fn die(&mut self, now: u64) -> bool {
        match self {
            Enemy::Chicken(c) => c.die(now),
            Enemy::Endboss(b) => b.die(now),
        }
    }

    /// Apply a bottle hit: counted hit for the boss, death for a chicken.
    pub fn take_projectile(&mut self, now: u64) -> ProjectileDamage {
        match self {
            Enemy::Endboss(b) => match b.hit(now) {
                BossHit::Hurt { health } => ProjectileDamage::Absorbed { health },
                BossHit::Killed => ProjectileDamage::Killed,
                BossHit::Ignored => ProjectileDamage::Shrugged,
            },
            Enemy::Chicken(c) => {
                if c.die(now) {
                    ProjectileDamage::Killed
                } else {
                    ProjectileDamage::Shrugged
                }
            }
        }
    }
}

impl Hitboxed for Enemy {
    fn bounds(&self) -> Rect {
        self.sprite().rect()
    }

    fn insets(&self) -> Insets {
        match self {
            Enemy::Chicken(c) => c.insets(),
            Enemy::Endboss(b) => b.insets(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chicken::ChickenKind;

    #[test]
    fn chicken_dies_from_one_bottle() {
        let mut e = Enemy::Chicken(Chicken::new(ChickenKind::Small, 800.0, 0.2));
        assert_eq!(e.take_projectile(10), ProjectileDamage::Killed);
        assert!(e.is_dead());
        assert_eq!(e.take_projectile(20), ProjectileDamage::Shrugged);
    }

    #[test]
    fn boss_absorbs_hits() {
        let mut e = Enemy::Endboss(Endboss::new());
        assert_eq!(e.take_projectile(0), ProjectileDamage::Absorbed { health: 4 });
        assert_eq!(e.take_projectile(10), ProjectileDamage::Shrugged);
        assert!(!e.is_dead());
    }

    #[test]
    fn corpses_vanish_after_a_second() {
        let mut e = Enemy::Chicken(Chicken::new(ChickenKind::Normal, 800.0, 0.2));
        assert!(e.is_drawn(0));
        e.die(500);
        assert!(e.is_drawn(1499));
        assert!(!e.is_drawn(1500));
    }

    #[test]
    fn insets_come_from_the_variant() {
        let e = Enemy::Chicken(Chicken::new(ChickenKind::Normal, 0.0, 0.2));
        assert_eq!(e.hitbox().y, 340.0);
        let b = Enemy::Endboss(Endboss::new());
        assert_eq!(b.hitbox(), b.bounds());
    }
}
