//! Core value types: identities, battle dice, cards, skills, and the
//! per-player views handed to the session layer.

use enum_dispatch::enum_dispatch;
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, sync::Arc};
use uuid::Uuid;

use super::controller::ExpectedActionView;
use super::effects::{Effect, EffectList};
use super::stats::{Modifier, StatKind, StatisticGroup};

/// Match identity. Supplied by the session layer, never generated here.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct GameId(Uuid);

impl GameId {
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<Uuid> for GameId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Player identity. Supplied by the session layer, never generated here.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(Uuid);

impl PlayerId {
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<Uuid> for PlayerId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Card identity, unique within a match. Assigned by the content catalog.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type alias for card speed. Higher acts earlier.
pub type Speed = u32;

/// Type alias for damage amounts. Signed on purpose: skill damage is added
/// to the target's HP, so content decides whether a skill harms or heals.
pub type Damage = i32;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum DieFace {
    Strike,
    Fire,
    Water,
    Earth,
    Storm,
}

impl DieFace {
    /// Elemental faces trigger skill moves; `Strike` triggers a plain attack.
    #[must_use]
    pub const fn is_elemental(self) -> bool {
        !matches!(self, Self::Strike)
    }
}

impl fmt::Display for DieFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Strike => "strike",
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Earth => "earth",
            Self::Storm => "storm",
        };
        write!(f, "{repr}")
    }
}

/// Face table of one battle die. `Strike` appears twice, so a third of all
/// rolls come up physical.
pub const DIE_FACES: [DieFace; 6] = [
    DieFace::Strike,
    DieFace::Strike,
    DieFace::Fire,
    DieFace::Water,
    DieFace::Earth,
    DieFace::Storm,
];

/// One rolled battle die.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Die {
    pub face: DieFace,
}

impl Die {
    #[must_use]
    pub fn roll(rng: &mut impl Rng) -> Self {
        let face = DIE_FACES.choose(rng).copied().unwrap_or(DieFace::Strike);
        Self { face }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.face.fmt(f)
    }
}

/// One activatable skill on a combat card, looked up by index from the
/// card's assignment.
#[derive(Clone, Debug)]
pub struct Skill {
    pub name: String,
    /// When true, executing the skill adds the attacker's Power to the
    /// target's HP (signed, so content may heal or harm).
    pub does_power_damage: bool,
    /// Status effects attached to each target on a skill hit.
    pub effects: Vec<Arc<dyn Effect>>,
}

impl Skill {
    #[must_use]
    pub fn new(name: &str, does_power_damage: bool) -> Self {
        Self {
            name: name.to_string(),
            does_power_damage,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_effects(
        name: &str,
        does_power_damage: bool,
        effects: Vec<Arc<dyn Effect>>,
    ) -> Self {
        Self {
            name: name.to_string(),
            does_power_damage,
            effects,
        }
    }
}

/// Combat-facing data shared by units and heroes.
#[derive(Clone, Debug)]
pub struct CombatData {
    pub speed: Speed,
    pub stats: StatisticGroup,
    pub skills: Vec<Skill>,
    pub effects: EffectList,
}

impl CombatData {
    #[must_use]
    pub const fn new(speed: Speed, attack: i32, power: i32, health: i32) -> Self {
        Self {
            speed,
            stats: StatisticGroup::new(attack, power, health),
            skills: Vec::new(),
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.stats.health.value() > 0
    }
}

/// Identity shared by every card kind.
#[enum_dispatch]
pub trait CardIdentity {
    fn id(&self) -> CardId;
    fn name(&self) -> &str;
}

/// A deployable combat unit.
#[derive(Clone, Debug)]
pub struct UnitCard {
    pub id: CardId,
    pub name: String,
    pub combat: CombatData,
    pub items: Vec<ItemCard>,
}

impl UnitCard {
    #[must_use]
    pub fn new(id: CardId, name: &str, combat: CombatData) -> Self {
        Self {
            id,
            name: name.to_string(),
            combat,
            items: Vec::new(),
        }
    }
}

impl CardIdentity for UnitCard {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A player's hero. Placed on the battlefield at match start and never
/// removed; its speed drives the card-laying order.
#[derive(Clone, Debug)]
pub struct HeroCard {
    pub id: CardId,
    pub name: String,
    pub combat: CombatData,
    pub items: Vec<ItemCard>,
}

impl HeroCard {
    #[must_use]
    pub fn new(id: CardId, name: &str, combat: CombatData) -> Self {
        Self {
            id,
            name: name.to_string(),
            combat,
            items: Vec::new(),
        }
    }
}

impl CardIdentity for HeroCard {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// An equippable item. Its statistic modifiers are applied to the holder
/// for the duration of a single move, tagged by the item's id so they can
/// be stripped again exactly.
#[derive(Clone, Debug)]
pub struct ItemCard {
    pub id: CardId,
    pub name: String,
    pub modifiers: Vec<(StatKind, Modifier)>,
}

impl ItemCard {
    #[must_use]
    pub fn new(id: CardId, name: &str, modifiers: Vec<(StatKind, Modifier)>) -> Self {
        Self {
            id,
            name: name.to_string(),
            modifiers,
        }
    }
}

impl CardIdentity for ItemCard {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A laid spell. Spells carry effects but cannot act in combat.
#[derive(Clone, Debug)]
pub struct SpellCard {
    pub id: CardId,
    pub name: String,
    pub effects: EffectList,
}

impl SpellCard {
    #[must_use]
    pub fn new(id: CardId, name: &str, effects: EffectList) -> Self {
        Self {
            id,
            name: name.to_string(),
            effects,
        }
    }
}

impl CardIdentity for SpellCard {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Card kind tag exposed to views.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CardKind {
    Unit,
    Hero,
    Item,
    Spell,
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Unit => "unit",
            Self::Hero => "hero",
            Self::Item => "item",
            Self::Spell => "spell",
        };
        write!(f, "{repr}")
    }
}

/// A card value with a closed set of kinds. Combat logic pattern-matches on
/// capability presence through the accessors below instead of inspecting
/// types at runtime.
#[enum_dispatch(CardIdentity)]
#[derive(Clone, Debug)]
pub enum Card {
    Unit(UnitCard),
    Hero(HeroCard),
    Item(ItemCard),
    Spell(SpellCard),
}

impl Card {
    #[must_use]
    pub const fn kind(&self) -> CardKind {
        match self {
            Self::Unit(_) => CardKind::Unit,
            Self::Hero(_) => CardKind::Hero,
            Self::Item(_) => CardKind::Item,
            Self::Spell(_) => CardKind::Spell,
        }
    }

    /// Combat capability: present on units and heroes only.
    #[must_use]
    pub fn combat(&self) -> Option<&CombatData> {
        match self {
            Self::Unit(unit) => Some(&unit.combat),
            Self::Hero(hero) => Some(&hero.combat),
            Self::Item(_) | Self::Spell(_) => None,
        }
    }

    pub fn combat_mut(&mut self) -> Option<&mut CombatData> {
        match self {
            Self::Unit(unit) => Some(&mut unit.combat),
            Self::Hero(hero) => Some(&mut hero.combat),
            Self::Item(_) | Self::Spell(_) => None,
        }
    }

    /// Item-holding capability: present on units and heroes only.
    #[must_use]
    pub fn items(&self) -> Option<&[ItemCard]> {
        match self {
            Self::Unit(unit) => Some(&unit.items),
            Self::Hero(hero) => Some(&hero.items),
            Self::Item(_) | Self::Spell(_) => None,
        }
    }

    /// Attached effects, for combat cards and spells alike.
    #[must_use]
    pub fn effects(&self) -> Option<&EffectList> {
        match self {
            Self::Unit(unit) => Some(&unit.combat.effects),
            Self::Hero(hero) => Some(&hero.combat.effects),
            Self::Spell(spell) => Some(&spell.effects),
            Self::Item(_) => None,
        }
    }

    #[must_use]
    pub fn speed(&self) -> Option<Speed> {
        self.combat().map(|combat| combat.speed)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = format!("{} {} ({})", self.kind(), self.name(), self.id());
        write!(f, "{repr}")
    }
}

/// A card as one player is allowed to see it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CardView {
    pub id: CardId,
    pub name: String,
    pub kind: CardKind,
    pub speed: Option<Speed>,
    pub attack: Option<i32>,
    pub power: Option<i32>,
    pub health: Option<i32>,
    pub effects: Vec<String>,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        let combat = card.combat();
        Self {
            id: card.id(),
            name: card.name().to_string(),
            kind: card.kind(),
            speed: card.speed(),
            attack: combat.map(|c| c.stats.attack.value()),
            power: combat.map(|c| c.stats.power.value()),
            health: combat.map(|c| c.stats.health.value()),
            effects: card.effects().map_or_else(Vec::new, |effects| {
                effects.iter().map(|e| e.name().to_string()).collect()
            }),
        }
    }
}

/// One participant as seen by a viewer. Opponents' hands are reduced to a
/// count; dice and battlefield cards are public.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    /// `Some` only in the owning player's own view.
    pub hand: Option<Vec<CardView>>,
    pub hand_size: usize,
    pub battlefield: Vec<CardView>,
    pub dice: Vec<DieFace>,
}

// Helper module for Arc serialization
mod arc_serde {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S, T>(arc: &Arc<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        arc.as_ref().serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Arc<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        T::deserialize(deserializer).map(Arc::new)
    }
}

/// The match as one player is allowed to see it. Shared parts are reused
/// across all views for the same instant.
#[derive(Debug, Deserialize, Serialize)]
pub struct GameView {
    pub game_id: GameId,
    pub round: u32,
    pub round_ongoing: bool,
    pub pool_size: usize,
    #[serde(with = "arc_serde")]
    pub center_card: Arc<Option<CardView>>,
    #[serde(with = "arc_serde")]
    pub lay_order: Arc<Vec<PlayerId>>,
    #[serde(with = "arc_serde")]
    pub expected: Arc<Vec<ExpectedActionView>>,
    pub players: Vec<PlayerView>,
}

/// Type alias for per-player redacted views.
pub type GameViews = HashMap<PlayerId, GameView>;
