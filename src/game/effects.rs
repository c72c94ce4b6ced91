//! Combat effect hooks and the transient move value.
//!
//! Effects are the extension surface of the engine: card content attaches
//! [`Effect`] implementations to combat cards, and the move pipeline invokes
//! their hooks in attachment order at fixed points of every round and move.
//! Hooks may mutate only what they are handed (the current [`Move`] or the
//! card's statistics), never other game state.

use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

use super::entities::{CardId, Damage};
use super::stats::StatisticGroup;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum MoveType {
    Attack,
    Skill,
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Attack => "attack",
            Self::Skill => "skill",
        };
        write!(f, "{repr}")
    }
}

/// The computed outcome of one attacker move, created fresh per attacker
/// and per attacker-target pair and discarded after resolution.
///
/// All gates start open; hooks close them to veto parts of the move.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    pub damage: Damage,
    pub move_type: MoveType,
    /// Master gate: when false, the move executes nothing at all.
    pub move_enabled: bool,
    pub attack_enabled: bool,
    pub skills_enabled: bool,
    pub items_enabled: bool,
    pub effects_enabled: bool,
}

impl Move {
    #[must_use]
    pub const fn new(damage: Damage, move_type: MoveType) -> Self {
        Self {
            damage,
            move_type,
            move_enabled: true,
            attack_enabled: true,
            skills_enabled: true,
            items_enabled: true,
            effects_enabled: true,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = format!("{} move for {}", self.move_type, self.damage);
        write!(f, "{repr}")
    }
}

/// The fixed hook set invoked around rounds and moves.
///
/// Every hook has a default empty body, so content implements only the
/// points it cares about. Round hooks receive the owning card's statistics;
/// move hooks receive the transient [`Move`] being resolved plus the card
/// identities involved.
pub trait Effect: fmt::Debug + Send + Sync {
    /// Name used in views and logs.
    fn name(&self) -> &str;

    fn on_round_start(&self, _stats: &mut StatisticGroup) {}

    fn on_round_finish(&self, _stats: &mut StatisticGroup) {}

    /// Invoked once per move on the attacker, before any target is resolved
    /// individually. `targets` is the resolved target set, `enemies` the
    /// full set of live enemy battling cards.
    fn before_move_at_all(&self, _mv: &mut Move, _targets: &[CardId], _enemies: &[CardId]) {}

    fn before_move_at_single_target(&self, _mv: &mut Move, _target: CardId) {}

    /// Invoked on each target's own effects before the move executes.
    fn before_receive(&self, _mv: &mut Move, _attacker: CardId) {}

    fn after_move_at_all(&self, _mv: &mut Move, _targets: &[CardId], _enemies: &[CardId]) {}

    fn after_move_at_single_target(&self, _mv: &mut Move, _target: CardId) {}

    fn after_receive(&self, _mv: &mut Move, _attacker: CardId) {}
}

/// Type alias for a card's attached effects, invoked in attachment order.
pub type EffectList = Vec<Arc<dyn Effect>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Dampen;

    impl Effect for Dampen {
        fn name(&self) -> &str {
            "dampen"
        }

        fn before_receive(&self, mv: &mut Move, _attacker: CardId) {
            mv.damage /= 2;
        }
    }

    // === Move Tests ===

    #[test]
    fn test_new_move_has_all_gates_open() {
        let mv = Move::new(5, MoveType::Attack);
        assert!(mv.move_enabled);
        assert!(mv.attack_enabled);
        assert!(mv.skills_enabled);
        assert!(mv.items_enabled);
        assert!(mv.effects_enabled);
    }

    #[test]
    fn test_move_display() {
        let mv = Move::new(5, MoveType::Skill);
        assert_eq!(mv.to_string(), "skill move for 5");
    }

    // === Hook Tests ===

    #[test]
    fn test_default_hooks_leave_move_untouched() {
        #[derive(Debug)]
        struct Inert;
        impl Effect for Inert {
            fn name(&self) -> &str {
                "inert"
            }
        }

        let mut mv = Move::new(5, MoveType::Attack);
        let effect = Inert;
        effect.before_move_at_all(&mut mv, &[], &[]);
        effect.before_receive(&mut mv, CardId(1));
        assert_eq!(mv.damage, 5);
        assert!(mv.move_enabled);
    }

    #[test]
    fn test_hooks_run_in_attachment_order() {
        #[derive(Debug)]
        struct AddTen;
        impl Effect for AddTen {
            fn name(&self) -> &str {
                "add ten"
            }
            fn before_receive(&self, mv: &mut Move, _attacker: CardId) {
                mv.damage += 10;
            }
        }

        // (5 + 10) / 2 != (5 / 2) + 10, so order is observable.
        let effects: EffectList = vec![Arc::new(AddTen), Arc::new(Dampen)];
        let mut mv = Move::new(5, MoveType::Attack);
        for effect in &effects {
            effect.before_receive(&mut mv, CardId(1));
        }
        assert_eq!(mv.damage, 7);
    }
}
