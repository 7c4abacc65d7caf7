#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure damage and outcome calculus for the Selker combat resolver.
//!
//! The authoritative world delegates every numeric combat decision to the
//! functions in this crate so that the arithmetic stays testable in
//! isolation. All values are integers; percentage computations truncate.

use selker_core::{DestructionCause, EnemyKind};

/// Outcome of applying damage to an entity's hit points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitOutcome {
    /// Hit points remaining after the hit, clamped at zero.
    pub remaining: u32,
    /// Whether the hit crossed the destruction threshold.
    pub destroyed: bool,
}

/// Outcome of an enemy body touching the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactOutcome {
    /// The shield absorbed the hit. Shield consumed, enemy survives.
    ShieldAbsorbed,
    /// The player took damage.
    Damaged {
        /// Damage applied to the player.
        damage: u32,
        /// Whether the enemy is destroyed by the contact. Bosses survive.
        enemy_destroyed: bool,
    },
}

/// Applies a hit to the provided hit points, clamping at zero.
///
/// Destruction is reported exactly when this hit crosses the threshold:
/// hitting an already-zero pool reports `destroyed: false` so duplicate
/// resolutions within one tick cannot double-trigger destruction.
#[must_use]
pub const fn apply_hit(hp: u32, damage: u32) -> HitOutcome {
    if hp == 0 {
        return HitOutcome {
            remaining: 0,
            destroyed: false,
        };
    }
    if damage >= hp {
        return HitOutcome {
            remaining: 0,
            destroyed: true,
        };
    }
    HitOutcome {
        remaining: hp - damage,
        destroyed: false,
    }
}

/// Damage a player weapon projectile deals to a boss.
///
/// Weapon damage is amplified by half, truncating (10 becomes 15, 5 becomes
/// 7). Raw damage from bomb and screen-clear effects is never amplified.
#[must_use]
pub const fn boss_weapon_damage(damage: u32, is_raw_damage: bool) -> u32 {
    if is_raw_damage {
        return damage;
    }
    damage.saturating_add(damage / 2)
}

/// Bomb damage against a boss: a truncated fraction of its current HP.
#[must_use]
pub fn bomb_damage(current_hp: u32, percent: f64) -> u32 {
    if current_hp == 0 {
        return 0;
    }
    let fraction = percent.clamp(0.0, 1.0);
    (f64::from(current_hp) * fraction).floor() as u32
}

/// Resolves an enemy body touching the player.
///
/// An active shield absorbs the hit outright. Otherwise the player takes the
/// enemy's collision damage and non-boss enemies die on contact.
#[must_use]
pub const fn contact_outcome(
    kind: EnemyKind,
    shield_active: bool,
    collision_damage: u32,
) -> ContactOutcome {
    if shield_active {
        return ContactOutcome::ShieldAbsorbed;
    }
    ContactOutcome::Damaged {
        damage: collision_damage,
        enemy_destroyed: !matches!(kind, EnemyKind::Boss),
    }
}

/// Score payout for a destruction, if any.
///
/// Contact kills award nothing; only weapon hits and bomb effects score.
#[must_use]
pub const fn score_for(cause: DestructionCause, payout: u32) -> Option<u64> {
    match cause {
        DestructionCause::WeaponHit | DestructionCause::ScreenClear => Some(payout as u64),
        DestructionCause::PlayerContact => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_clamps_at_zero_and_reports_destruction_once() {
        let first = apply_hit(25, 10);
        assert_eq!(
            first,
            HitOutcome {
                remaining: 15,
                destroyed: false
            }
        );

        let lethal = apply_hit(15, 20);
        assert_eq!(
            lethal,
            HitOutcome {
                remaining: 0,
                destroyed: true
            }
        );

        let duplicate = apply_hit(0, 20);
        assert_eq!(
            duplicate,
            HitOutcome {
                remaining: 0,
                destroyed: false
            }
        );
    }

    #[test]
    fn hp_after_repeated_hits_is_linear_until_destruction() {
        let mut hp = 100;
        for expected in [90, 80, 70] {
            let outcome = apply_hit(hp, 10);
            assert!(!outcome.destroyed);
            assert_eq!(outcome.remaining, expected);
            hp = outcome.remaining;
        }
    }

    #[test]
    fn boss_weapon_damage_amplifies_with_truncation() {
        assert_eq!(boss_weapon_damage(10, false), 15);
        assert_eq!(boss_weapon_damage(5, false), 7);
        assert_eq!(boss_weapon_damage(10, true), 10);
    }

    #[test]
    fn bomb_damage_floors_the_fraction() {
        assert_eq!(bomb_damage(333, 0.3), 99);
        assert_eq!(bomb_damage(0, 0.3), 0);
        assert_eq!(bomb_damage(100, 1.5), 100);
        assert_eq!(bomb_damage(100, -0.5), 0);
    }

    #[test]
    fn shield_absorbs_contact_without_destroying_the_enemy() {
        assert_eq!(
            contact_outcome(EnemyKind::Shooter, true, 8),
            ContactOutcome::ShieldAbsorbed
        );
    }

    #[test]
    fn contact_destroys_non_boss_enemies_only() {
        assert_eq!(
            contact_outcome(EnemyKind::Shooter, false, 8),
            ContactOutcome::Damaged {
                damage: 8,
                enemy_destroyed: true
            }
        );
        assert_eq!(
            contact_outcome(EnemyKind::Boss, false, 25),
            ContactOutcome::Damaged {
                damage: 25,
                enemy_destroyed: false
            }
        );
    }

    #[test]
    fn contact_kills_never_score() {
        assert_eq!(score_for(DestructionCause::PlayerContact, 250), None);
        assert_eq!(score_for(DestructionCause::WeaponHit, 250), Some(250));
        assert_eq!(score_for(DestructionCause::ScreenClear, 100), Some(100));
    }
}
