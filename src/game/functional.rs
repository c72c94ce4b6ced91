//! Pure combat helpers: the damage formula and speed ordering.

use rand::{Rng, seq::SliceRandom};

use super::effects::MoveType;
use super::entities::{Damage, Speed};
use super::stats::StatisticGroup;

/// The damage a move deals before any effect hook touches it. Attacks read
/// the attacker's computed Attack, skills the computed Power; the defender's
/// statistics are never consulted.
#[must_use]
pub fn calculate_damage(move_type: MoveType, stats: &StatisticGroup) -> Damage {
    match move_type {
        MoveType::Attack => stats.attack.value(),
        MoveType::Skill => stats.power.value(),
    }
}

/// Order entries by speed, fastest first. Ties are broken by the injected
/// generator: a shuffle followed by a stable sort leaves equal speeds in
/// random order.
pub fn speed_order<T>(mut entries: Vec<(T, Speed)>, rng: &mut impl Rng) -> Vec<T> {
    entries.shuffle(rng);
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.into_iter().map(|(entry, _)| entry).collect()
}
