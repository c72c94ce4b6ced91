//! Card statistics with source-tagged, reversible modifiers.
//!
//! Every combat card carries a [`StatisticGroup`] of three statistic points
//! (Attack, Power, HP). Each point is a base value plus a stack of modifiers,
//! and every modifier is tagged with the card that produced it so the whole
//! contribution of one source can be removed again exactly.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::CardId;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum StatKind {
    Attack,
    Power,
    Health,
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Attack => "attack",
            Self::Power => "power",
            Self::Health => "health",
        };
        write!(f, "{repr}")
    }
}

/// A single adjustment to a statistic point. `Flat` adds to the base;
/// `Scale` multiplies the flat total by a percentage (`Scale(50)` is +50%).
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Modifier {
    Flat(i32),
    Scale(i32),
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Flat(amount) => format!("{amount:+}"),
            Self::Scale(percent) => format!("{percent:+}%"),
        };
        write!(f, "{repr}")
    }
}

/// Where a modifier came from. Item modifiers live for a single move;
/// effect modifiers live for as long as the effect keeps them applied.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ModifierSource {
    Item(CardId),
    Effect(CardId),
}

impl fmt::Display for ModifierSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Item(id) => format!("item {id}"),
            Self::Effect(id) => format!("effect {id}"),
        };
        write!(f, "{repr}")
    }
}

/// One named statistic: a base value and its live modifiers.
///
/// Evaluation order is fixed: base plus all flat modifiers first, then each
/// scale modifier applied in insertion order with integer math.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StatPoints {
    base: i32,
    modifiers: Vec<(ModifierSource, Modifier)>,
}

impl StatPoints {
    #[must_use]
    pub const fn new(base: i32) -> Self {
        Self {
            base,
            modifiers: Vec::new(),
        }
    }

    /// The current computed value.
    #[must_use]
    pub fn value(&self) -> i32 {
        let mut value = self.base;
        for (_, modifier) in &self.modifiers {
            if let Modifier::Flat(amount) = modifier {
                value += amount;
            }
        }
        for (_, modifier) in &self.modifiers {
            if let Modifier::Scale(percent) = modifier {
                value += value * percent / 100;
            }
        }
        value
    }

    #[must_use]
    pub const fn base(&self) -> i32 {
        self.base
    }

    /// Permanently shift the base value. Damage and healing land here so
    /// they survive modifier removal.
    pub fn adjust_base(&mut self, delta: i32) {
        self.base += delta;
    }

    pub fn apply(&mut self, source: ModifierSource, modifier: Modifier) {
        self.modifiers.push((source, modifier));
    }

    /// Remove every modifier tagged with `source`. Removing a source that
    /// was never applied is a no-op.
    pub fn remove_source(&mut self, source: &ModifierSource) {
        self.modifiers.retain(|(s, _)| s != source);
    }
}

impl fmt::Display for StatPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// The three statistic points every combat card carries.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StatisticGroup {
    pub attack: StatPoints,
    pub power: StatPoints,
    pub health: StatPoints,
}

impl StatisticGroup {
    #[must_use]
    pub const fn new(attack: i32, power: i32, health: i32) -> Self {
        Self {
            attack: StatPoints::new(attack),
            power: StatPoints::new(power),
            health: StatPoints::new(health),
        }
    }

    #[must_use]
    pub fn get(&self, kind: StatKind) -> i32 {
        self.points(kind).value()
    }

    #[must_use]
    pub fn points(&self, kind: StatKind) -> &StatPoints {
        match kind {
            StatKind::Attack => &self.attack,
            StatKind::Power => &self.power,
            StatKind::Health => &self.health,
        }
    }

    pub fn points_mut(&mut self, kind: StatKind) -> &mut StatPoints {
        match kind {
            StatKind::Attack => &mut self.attack,
            StatKind::Power => &mut self.power,
            StatKind::Health => &mut self.health,
        }
    }

    pub fn apply(&mut self, kind: StatKind, source: ModifierSource, modifier: Modifier) {
        self.points_mut(kind).apply(source, modifier);
    }

    /// Remove every modifier tagged with `source` from all three points.
    pub fn remove_source(&mut self, source: &ModifierSource) {
        self.attack.remove_source(source);
        self.power.remove_source(source);
        self.health.remove_source(source);
    }
}

impl fmt::Display for StatisticGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = format!(
            "atk {} / pow {} / hp {}",
            self.attack.value(),
            self.power.value(),
            self.health.value()
        );
        write!(f, "{repr}")
    }
}
