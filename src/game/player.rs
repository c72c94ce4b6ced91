//! Per-player match state: hand, battlefield, rolled dice, and the die /
//! skill / target assignments attached to battlefield cards for the round.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::entities::{Card, CardId, CardIdentity, Die, DieFace, HeroCard, PlayerId, Speed};

/// Everything a player has attached to one battlefield card for the coming
/// round. Entries are created on first touch and cleared when the round
/// finishes.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CardAssignment {
    /// Index into the player's dice pool. One die per card, one card per die.
    pub die_index: Option<usize>,
    /// Face of the assigned die at assignment time.
    pub die_face: Option<DieFace>,
    /// Chosen skill, only settable while the assigned die shows an
    /// elemental face.
    pub skill_index: Option<usize>,
    /// Cards this card will move at. A card with no die still makes a plain
    /// attack at these targets.
    pub targets: Vec<CardId>,
}

/// One participant. The hero is placed on the battlefield at construction
/// and is never removed from it.
#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    hero_id: CardId,
    hand: Vec<Card>,
    battlefield: Vec<Card>,
    dice: Vec<Die>,
    assignments: HashMap<CardId, CardAssignment>,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, hero: HeroCard) -> Self {
        let hero_id = hero.id;
        Self {
            id,
            hero_id,
            hand: Vec::new(),
            battlefield: vec![Card::Hero(hero)],
            dice: Vec::new(),
            assignments: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn hero_id(&self) -> CardId {
        self.hero_id
    }

    /// The hero's current speed; drives the card-laying order.
    #[must_use]
    pub fn hero_speed(&self) -> Speed {
        self.battlefield_card(self.hero_id)
            .and_then(Card::speed)
            .unwrap_or(0)
    }

    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    #[must_use]
    pub fn battlefield(&self) -> &[Card] {
        &self.battlefield
    }

    pub fn battlefield_mut(&mut self) -> &mut [Card] {
        &mut self.battlefield
    }

    #[must_use]
    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn draw_to_hand(&mut self, card: Card) {
        self.hand.push(card);
    }

    #[must_use]
    pub fn hand_card(&self, card_id: CardId) -> Option<&Card> {
        self.hand.iter().find(|card| card.id() == card_id)
    }

    /// Zone transfer out of the hand; the caller decides where it goes.
    pub fn take_from_hand(&mut self, card_id: CardId) -> Option<Card> {
        let index = self.hand.iter().position(|card| card.id() == card_id)?;
        Some(self.hand.remove(index))
    }

    pub fn lay_to_battlefield(&mut self, card: Card) {
        self.battlefield.push(card);
    }

    #[must_use]
    pub fn battlefield_card(&self, card_id: CardId) -> Option<&Card> {
        self.battlefield.iter().find(|card| card.id() == card_id)
    }

    pub fn battlefield_card_mut(&mut self, card_id: CardId) -> Option<&mut Card> {
        self.battlefield.iter_mut().find(|card| card.id() == card_id)
    }

    #[must_use]
    pub fn has_battlefield_card(&self, card_id: CardId) -> bool {
        self.battlefield_card(card_id).is_some()
    }

    pub fn remove_from_battlefield(&mut self, card_id: CardId) -> Option<Card> {
        let index = self
            .battlefield
            .iter()
            .position(|card| card.id() == card_id)?;
        Some(self.battlefield.remove(index))
    }

    /// Replace the dice pool with `count` fresh rolls.
    pub fn roll_dice(&mut self, count: usize, rng: &mut impl Rng) {
        self.dice = (0..count).map(|_| Die::roll(rng)).collect();
    }

    /// Reroll the listed dice in place. Refuses the whole batch when any
    /// index is out of bounds.
    pub fn reroll_dice(&mut self, indices: &[usize], rng: &mut impl Rng) -> bool {
        if indices.iter().any(|&index| index >= self.dice.len()) {
            return false;
        }
        for &index in indices {
            self.dice[index] = Die::roll(rng);
        }
        true
    }

    /// Attach a die to a battlefield card. Refuses a card that already has
    /// a die and a die that is already on another card.
    pub fn assign_die(&mut self, card_id: CardId, die_index: usize) -> bool {
        let Some(face) = self.dice.get(die_index).map(|die| die.face) else {
            return false;
        };
        if !self.has_battlefield_card(card_id) {
            return false;
        }
        if self
            .assignments
            .values()
            .any(|assignment| assignment.die_index == Some(die_index))
        {
            return false;
        }
        let assignment = self.assignments.entry(card_id).or_default();
        if assignment.die_index.is_some() {
            return false;
        }
        assignment.die_index = Some(die_index);
        assignment.die_face = Some(face);
        true
    }

    /// Detach the card's die. The skill choice goes with it; targets stay,
    /// since a die-less card still makes a plain attack.
    pub fn unassign_die(&mut self, card_id: CardId) -> bool {
        let Some(assignment) = self.assignments.get_mut(&card_id) else {
            return false;
        };
        if assignment.die_index.is_none() {
            return false;
        }
        assignment.die_index = None;
        assignment.die_face = None;
        assignment.skill_index = None;
        true
    }

    /// Record the skill choice. Legal only while the card's assigned die
    /// shows an elemental face; skill existence is the caller's check.
    pub fn choose_skill(&mut self, card_id: CardId, skill_index: usize) -> bool {
        let Some(assignment) = self.assignments.get_mut(&card_id) else {
            return false;
        };
        if !assignment.die_face.is_some_and(DieFace::is_elemental) {
            return false;
        }
        assignment.skill_index = Some(skill_index);
        true
    }

    /// Add a target to the card's move. Duplicates are refused.
    pub fn assign_target(&mut self, card_id: CardId, target: CardId) -> bool {
        if !self.has_battlefield_card(card_id) {
            return false;
        }
        let assignment = self.assignments.entry(card_id).or_default();
        if assignment.targets.contains(&target) {
            return false;
        }
        assignment.targets.push(target);
        true
    }

    pub fn remove_target(&mut self, card_id: CardId, target: CardId) -> bool {
        let Some(assignment) = self.assignments.get_mut(&card_id) else {
            return false;
        };
        let before = assignment.targets.len();
        assignment.targets.retain(|t| *t != target);
        assignment.targets.len() != before
    }

    #[must_use]
    pub fn assignment(&self, card_id: CardId) -> Option<&CardAssignment> {
        self.assignments.get(&card_id)
    }

    /// Clear everything that lives for a single round: dice and card
    /// assignments. Hand and battlefield carry over.
    pub fn reset_for_round(&mut self) {
        self.dice.clear();
        self.assignments.clear();
    }
}
