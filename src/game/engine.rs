//! Turn engine core: settings, errors, events, and the [`Game`] aggregate
//! with its phase methods.
//!
//! A phase method never panics and never partially mutates. Per call it
//! resolves the player, asks the [`ActionController`] whether the action is
//! legal right now (`Ok(false)` when it is not), validates the whole payload
//! (typed errors for data that does not exist), mutates, then advances the
//! controller to the next legal action set.

use log::{debug, error, info};
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashSet, VecDeque},
    fmt,
    sync::Arc,
};
use thiserror::Error;

use super::constants::{
    DEFAULT_DICE_PER_PLAYER, DEFAULT_HAND_SIZE, DEFAULT_USE_CENTER_CARD, MAX_PLAYERS, MIN_PLAYERS,
};
use super::controller::{ActionController, ActionKind, ExpectedAction};
use super::effects::MoveType;
use super::entities::{
    Card, CardId, CardIdentity, CardView, DieFace, GameId, GameView, GameViews, HeroCard, PlayerId,
    PlayerView, Speed,
};
use super::functional;
use super::player::Player;

/// Errors for data that does not exist. Everything else a caller can get
/// wrong is an illegal-but-well-formed request and comes back as `Ok(false)`.
#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("card {0} does not exist")]
    CardNotFound(CardId),
    #[error("die {0} does not exist")]
    DieNotFound(usize),
    #[error("need 2+ players")]
    NotEnoughPlayers,
    #[error("player {0} does not exist")]
    PlayerNotFound(PlayerId),
    #[error("card {card} has no skill {index}")]
    SkillNotFound { card: CardId, index: usize },
    #[error("game is full")]
    TooManyPlayers,
}

/// Events that occur during a match
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    CommonPoolBuilt(usize),
    CardsDrawn(PlayerId, usize),
    LayOrderComputed(Vec<PlayerId>),
    CardsLaid(PlayerId, usize),
    CenterCardSet(PlayerId, CardId),
    DiceRolled(PlayerId, Vec<DieFace>),
    DiceRerolled(PlayerId, Vec<DieFace>),
    DieAssigned(PlayerId, CardId, DieFace),
    DieUnassigned(PlayerId, CardId),
    SkillChosen(PlayerId, CardId, String),
    TargetAssigned(PlayerId, CardId, CardId),
    TargetRemoved(PlayerId, CardId, CardId),
    RoundStarted(u32),
    MovePerformed(PlayerId, CardId, MoveType, Vec<CardId>),
    CardDestroyed(CardId),
    RoundFinished(u32),
}

fn join_list<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::CommonPoolBuilt(count) => format!("common pool built with {count} cards"),
            Self::CardsDrawn(player, count) => format!("{player} drew {count} cards"),
            Self::LayOrderComputed(order) => format!("lay order: {}", join_list(order)),
            Self::CardsLaid(player, count) => format!("{player} laid {count} cards"),
            Self::CenterCardSet(player, card) => {
                format!("{player} set {card} as the center card")
            }
            Self::DiceRolled(player, faces) => {
                format!("{player} rolled [{}]", join_list(faces))
            }
            Self::DiceRerolled(player, faces) => {
                format!("{player} rerolled to [{}]", join_list(faces))
            }
            Self::DieAssigned(player, card, face) => {
                format!("{player} put a {face} die on {card}")
            }
            Self::DieUnassigned(player, card) => format!("{player} took the die off {card}"),
            Self::SkillChosen(player, card, skill) => {
                format!("{player} chose {skill} for {card}")
            }
            Self::TargetAssigned(player, card, target) => {
                format!("{player} aimed {card} at {target}")
            }
            Self::TargetRemoved(player, card, target) => {
                format!("{player} no longer aims {card} at {target}")
            }
            Self::RoundStarted(round) => format!("round {round} started"),
            Self::MovePerformed(_, card, move_type, targets) => {
                format!("{card} made a {move_type} move at {} targets", targets.len())
            }
            Self::CardDestroyed(card) => format!("{card} destroyed"),
            Self::RoundFinished(round) => format!("round {round} finished"),
        };
        write!(f, "{repr}")
    }
}

/// Match configuration settings
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSettings {
    pub hand_size: usize,
    pub dice_per_player: usize,
    /// Whether a laid card may be designated as the shared center card.
    pub use_center_card: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_HAND_SIZE,
            DEFAULT_DICE_PER_PLAYER,
            DEFAULT_USE_CENTER_CARD,
        )
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(hand_size: usize, dice_per_player: usize, use_center_card: bool) -> Self {
        Self {
            hand_size,
            dice_per_player,
            use_center_card,
        }
    }
}

/// Per-round combat restrictions. Written between rounds through
/// [`Game::round_settings_mut`], consulted read-only during target
/// resolution, and reset when the round finishes.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RoundSettings {
    /// Cards that never end up in a resolved target set this round.
    pub not_allowed_as_target: HashSet<CardId>,
    /// When non-empty, every move is redirected at one of these cards,
    /// chosen with the injected generator.
    pub prioritized_to_attack: Vec<CardId>,
}

/// A dice-battle match with data and logic for running it end-to-end.
///
/// The engine is authoritative and synchronous: the session layer calls one
/// phase method at a time and forwards the produced events and views. All
/// randomness is injected per call, so a fixed generator sequence replays a
/// match exactly.
#[derive(Debug)]
pub struct Game {
    pub(super) id: GameId,
    pub(super) settings: GameSettings,
    pub(super) round_settings: RoundSettings,
    pub(super) controller: ActionController,
    pub(super) players: Vec<Player>,
    /// Face-down shared pool; draws come off the end.
    pub(super) pool: Vec<Card>,
    /// The shared center slot. A newly designated center card replaces the
    /// previous one, which leaves play.
    pub(super) center_card: Option<Card>,
    pub(super) lay_order: Vec<PlayerId>,
    pub(super) round: u32,
    pub(super) round_ongoing: bool,
    /// (owner, card) move order for the ongoing round, built lazily on the
    /// first perform call and dropped at round finish.
    pub(super) combat_queue: Option<Vec<(PlayerId, CardId)>>,
    pub(super) queue_cursor: usize,
    /// Queue of game updates produced by actions; drained by the caller.
    pub(super) events: VecDeque<GameEvent>,
}

impl Game {
    /// Create a match with a fixed roster. Each player's hero goes straight
    /// onto their battlefield; the first expected action is building the
    /// common pool.
    pub fn new(
        id: GameId,
        settings: GameSettings,
        roster: Vec<(PlayerId, HeroCard)>,
    ) -> Result<Self, GameError> {
        if roster.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }
        if roster.len() > MAX_PLAYERS {
            return Err(GameError::TooManyPlayers);
        }
        let players: Vec<Player> = roster
            .into_iter()
            .map(|(player_id, hero)| Player::new(player_id, hero))
            .collect();
        let mut controller = ActionController::new();
        controller.set_next_expected_action(ExpectedAction::any(ActionKind::TakeCardsToCommonPool));
        info!("Game {id} created with {} players", players.len());
        Ok(Self {
            id,
            settings,
            round_settings: RoundSettings::default(),
            controller,
            players,
            pool: Vec::new(),
            center_card: None,
            lay_order: Vec::new(),
            round: 0,
            round_ongoing: false,
            combat_queue: None,
            queue_cursor: 0,
            events: VecDeque::new(),
        })
    }

    // === Queries ===

    #[must_use]
    pub const fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub const fn is_round_ongoing(&self) -> bool {
        self.round_ongoing
    }

    #[must_use]
    pub const fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub const fn round_settings(&self) -> &RoundSettings {
        &self.round_settings
    }

    /// Content and session hooks write the coming round's combat
    /// restrictions through this.
    pub fn round_settings_mut(&mut self) -> &mut RoundSettings {
        &mut self.round_settings
    }

    /// Whether `player` (or a player-less caller) may perform `kind` right
    /// now. This is the same gate every phase method consults first.
    #[must_use]
    pub fn can_do(&self, kind: ActionKind, player: Option<&PlayerId>) -> bool {
        self.controller.can_do(kind, player)
    }

    /// Take all events that have occurred since the last drain.
    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get game views for all players. The viewer sees their own hand;
    /// everyone else's hand is reduced to a count. Parts identical across
    /// viewers are shared.
    #[must_use]
    pub fn get_views(&self) -> GameViews {
        let center_card = Arc::new(self.center_card.as_ref().map(CardView::from));
        let lay_order = Arc::new(self.lay_order.clone());
        let expected = Arc::new(self.controller.expected());
        self.players
            .iter()
            .map(|viewer| {
                let players = self
                    .players
                    .iter()
                    .map(|player| PlayerView {
                        id: player.id,
                        hand: (player.id == viewer.id)
                            .then(|| player.hand().iter().map(CardView::from).collect()),
                        hand_size: player.hand().len(),
                        battlefield: player.battlefield().iter().map(CardView::from).collect(),
                        dice: player.dice().iter().map(|die| die.face).collect(),
                    })
                    .collect();
                let view = GameView {
                    game_id: self.id,
                    round: self.round,
                    round_ongoing: self.round_ongoing,
                    pool_size: self.pool.len(),
                    center_card: Arc::clone(&center_card),
                    lay_order: Arc::clone(&lay_order),
                    expected: Arc::clone(&expected),
                    players,
                };
                (viewer.id, view)
            })
            .collect()
    }

    // === Phase methods ===

    /// Seed and shuffle the shared pool. The session layer supplies the
    /// card set; the engine owns the order.
    pub fn take_cards_to_common_pool(
        &mut self,
        mut cards: Vec<Card>,
        rng: &mut impl Rng,
    ) -> Result<bool, GameError> {
        if !self
            .controller
            .can_do(ActionKind::TakeCardsToCommonPool, None)
        {
            return Ok(false);
        }
        cards.shuffle(rng);
        let count = cards.len();
        self.pool = cards;
        self.events.push_back(GameEvent::CommonPoolBuilt(count));
        info!("Game {}: common pool built with {count} cards", self.id);
        let players = self.player_ids();
        self.controller
            .set_next_expected_action(ExpectedAction::all(ActionKind::TakeCardsToHand, players));
        Ok(true)
    }

    /// Refill the player's hand from the pool top, up to the configured
    /// hand size. A dry pool refills what it can.
    pub fn take_cards_to_hand(&mut self, player_id: &PlayerId) -> Result<bool, GameError> {
        let index = self.player_index(player_id)?;
        if !self
            .controller
            .can_do(ActionKind::TakeCardsToHand, Some(player_id))
        {
            return Ok(false);
        }
        let hand_size = self.settings.hand_size;
        let player = &mut self.players[index];
        let mut drawn = 0;
        while player.hand().len() < hand_size {
            let Some(card) = self.pool.pop() else { break };
            player.draw_to_hand(card);
            drawn += 1;
        }
        self.events
            .push_back(GameEvent::CardsDrawn(*player_id, drawn));
        debug!("Game {}: {player_id} drew {drawn} cards", self.id);
        self.controller.set_player_done_or_next_expected_action(
            player_id,
            &[ExpectedAction::any(
                ActionKind::CalculateLayDownOrderPerPlayer,
            )],
        );
        Ok(true)
    }

    /// Order the players for card laying by their heroes' speed, fastest
    /// first, ties broken by the generator.
    pub fn calculate_lay_down_order_per_player(
        &mut self,
        rng: &mut impl Rng,
    ) -> Result<bool, GameError> {
        if !self
            .controller
            .can_do(ActionKind::CalculateLayDownOrderPerPlayer, None)
        {
            return Ok(false);
        }
        let entries: Vec<(PlayerId, Speed)> = self
            .players
            .iter()
            .map(|player| (player.id, player.hero_speed()))
            .collect();
        self.lay_order = functional::speed_order(entries, rng);
        self.events
            .push_back(GameEvent::LayOrderComputed(self.lay_order.clone()));
        debug!("Game {}: lay order {:?}", self.id, self.lay_order);
        let order = self.lay_order.clone();
        self.controller
            .set_next_expected_action(ExpectedAction::ordered(ActionKind::LayCardsToBattle, order));
        Ok(true)
    }

    /// Transfer the listed cards from the player's hand to their
    /// battlefield, in their lay-order turn. One card of the set may be
    /// designated as the shared center card instead, when the match is
    /// configured with a center slot; the previous center card leaves play.
    pub fn lay_cards_to_battle(
        &mut self,
        player_id: &PlayerId,
        card_ids: &[CardId],
        center_card: Option<CardId>,
    ) -> Result<bool, GameError> {
        let index = self.player_index(player_id)?;
        if !self
            .controller
            .can_do(ActionKind::LayCardsToBattle, Some(player_id))
        {
            return Ok(false);
        }
        let distinct: HashSet<CardId> = card_ids.iter().copied().collect();
        if distinct.len() != card_ids.len() {
            return Ok(false);
        }
        for &card_id in card_ids {
            if self.players[index].hand_card(card_id).is_none() {
                return Err(GameError::CardNotFound(card_id));
            }
        }
        if let Some(center_id) = center_card {
            if !self.settings.use_center_card || !card_ids.contains(&center_id) {
                return Ok(false);
            }
        }

        if let Some(center_id) = center_card {
            if let Some(previous) = self.center_card.take() {
                self.events
                    .push_back(GameEvent::CardDestroyed(previous.id()));
            }
            if let Some(card) = self.players[index].take_from_hand(center_id) {
                self.center_card = Some(card);
                self.events
                    .push_back(GameEvent::CenterCardSet(*player_id, center_id));
            }
        }
        let mut laid = 0;
        for &card_id in card_ids {
            if Some(card_id) == center_card {
                continue;
            }
            if let Some(card) = self.players[index].take_from_hand(card_id) {
                self.players[index].lay_to_battlefield(card);
                laid += 1;
            }
        }
        self.events.push_back(GameEvent::CardsLaid(*player_id, laid));
        debug!("Game {}: {player_id} laid {laid} cards", self.id);
        let players = self.player_ids();
        self.controller.set_player_done_or_next_expected_action(
            player_id,
            &[ExpectedAction::all(ActionKind::PlayDices, players)],
        );
        Ok(true)
    }

    /// Roll the player's battle dice for the round.
    pub fn play_dices(
        &mut self,
        player_id: &PlayerId,
        rng: &mut impl Rng,
    ) -> Result<bool, GameError> {
        let index = self.player_index(player_id)?;
        if !self.controller.can_do(ActionKind::PlayDices, Some(player_id)) {
            return Ok(false);
        }
        let count = self.settings.dice_per_player;
        self.players[index].roll_dice(count, rng);
        let faces: Vec<DieFace> = self.players[index]
            .dice()
            .iter()
            .map(|die| die.face)
            .collect();
        self.events
            .push_back(GameEvent::DiceRolled(*player_id, faces));
        let players = self.player_ids();
        self.controller.set_player_done_or_next_expected_action(
            player_id,
            &[
                ExpectedAction::all(ActionKind::ReplayDices, players.clone()),
                ExpectedAction::all(ActionKind::PassReplayDices, players),
            ],
        );
        Ok(true)
    }

    /// Reroll the listed dice once. The alternative is [`Game::pass_replay_dices`];
    /// each player picks exactly one of the two.
    pub fn replay_dices(
        &mut self,
        player_id: &PlayerId,
        die_indices: &[usize],
        rng: &mut impl Rng,
    ) -> Result<bool, GameError> {
        let index = self.player_index(player_id)?;
        if !self
            .controller
            .can_do(ActionKind::ReplayDices, Some(player_id))
        {
            return Ok(false);
        }
        for &die_index in die_indices {
            if die_index >= self.players[index].dice().len() {
                return Err(GameError::DieNotFound(die_index));
            }
        }
        self.players[index].reroll_dice(die_indices, rng);
        let faces: Vec<DieFace> = self.players[index]
            .dice()
            .iter()
            .map(|die| die.face)
            .collect();
        self.events
            .push_back(GameEvent::DiceRerolled(*player_id, faces));
        let next = self.dice_assignment_phase();
        self.controller
            .set_player_done_or_next_expected_action(player_id, &next);
        Ok(true)
    }

    /// Keep the rolled dice as they are.
    pub fn pass_replay_dices(&mut self, player_id: &PlayerId) -> Result<bool, GameError> {
        self.player_index(player_id)?;
        if !self
            .controller
            .can_do(ActionKind::PassReplayDices, Some(player_id))
        {
            return Ok(false);
        }
        let next = self.dice_assignment_phase();
        self.controller
            .set_player_done_or_next_expected_action(player_id, &next);
        Ok(true)
    }

    /// Attach one of the player's dice to one of their battlefield cards.
    /// Free sub-action: repeatable until the player confirms.
    pub fn assign_dice_to_card(
        &mut self,
        player_id: &PlayerId,
        card_id: CardId,
        die_index: usize,
    ) -> Result<bool, GameError> {
        let index = self.player_index(player_id)?;
        if !self
            .controller
            .can_do(ActionKind::AssignDiceToCard, Some(player_id))
        {
            return Ok(false);
        }
        if self.players[index].battlefield_card(card_id).is_none() {
            return Err(GameError::CardNotFound(card_id));
        }
        let Some(face) = self.players[index]
            .dice()
            .get(die_index)
            .map(|die| die.face)
        else {
            return Err(GameError::DieNotFound(die_index));
        };
        let assigned = self.players[index].assign_die(card_id, die_index);
        if assigned {
            self.events
                .push_back(GameEvent::DieAssigned(*player_id, card_id, face));
        }
        Ok(assigned)
    }

    /// Detach the die from one of the player's battlefield cards.
    /// Free sub-action: repeatable until the player confirms.
    pub fn remove_dice_from_card(
        &mut self,
        player_id: &PlayerId,
        card_id: CardId,
    ) -> Result<bool, GameError> {
        let index = self.player_index(player_id)?;
        if !self
            .controller
            .can_do(ActionKind::RemoveDiceFromCard, Some(player_id))
        {
            return Ok(false);
        }
        if self.players[index].battlefield_card(card_id).is_none() {
            return Err(GameError::CardNotFound(card_id));
        }
        let removed = self.players[index].unassign_die(card_id);
        if removed {
            self.events
                .push_back(GameEvent::DieUnassigned(*player_id, card_id));
        }
        Ok(removed)
    }

    /// Lock the player's die assignments in.
    pub fn confirm_assign_dices_to_cards(
        &mut self,
        player_id: &PlayerId,
    ) -> Result<bool, GameError> {
        self.player_index(player_id)?;
        if !self
            .controller
            .can_do(ActionKind::ConfirmAssignDicesToCards, Some(player_id))
        {
            return Ok(false);
        }
        let next = self.targeting_phase();
        self.controller
            .set_player_done_or_next_expected_action(player_id, &next);
        Ok(true)
    }

    /// Pick the skill a card will use. Requires the card's assigned die to
    /// show an elemental face. Free sub-action.
    pub fn choose_card_skill(
        &mut self,
        player_id: &PlayerId,
        card_id: CardId,
        skill_index: usize,
    ) -> Result<bool, GameError> {
        let index = self.player_index(player_id)?;
        if !self
            .controller
            .can_do(ActionKind::ChooseCardSkill, Some(player_id))
        {
            return Ok(false);
        }
        if self.players[index].battlefield_card(card_id).is_none() {
            return Err(GameError::CardNotFound(card_id));
        }
        let Some(skill_name) = self.players[index]
            .battlefield_card(card_id)
            .and_then(Card::combat)
            .and_then(|combat| combat.skills.get(skill_index))
            .map(|skill| skill.name.clone())
        else {
            return Err(GameError::SkillNotFound {
                card: card_id,
                index: skill_index,
            });
        };
        let chosen = self.players[index].choose_skill(card_id, skill_index);
        if chosen {
            self.events
                .push_back(GameEvent::SkillChosen(*player_id, card_id, skill_name));
        }
        Ok(chosen)
    }

    /// Aim one of the player's battlefield cards at any battlefield card.
    /// Free sub-action. Liveness and legality of the target are settled at
    /// move resolution, not here.
    pub fn assign_card_target(
        &mut self,
        player_id: &PlayerId,
        card_id: CardId,
        target_id: CardId,
    ) -> Result<bool, GameError> {
        let index = self.player_index(player_id)?;
        if !self
            .controller
            .can_do(ActionKind::AssignCardTarget, Some(player_id))
        {
            return Ok(false);
        }
        if self.players[index].battlefield_card(card_id).is_none() {
            return Err(GameError::CardNotFound(card_id));
        }
        if !self.battlefield_contains(target_id) {
            return Err(GameError::CardNotFound(target_id));
        }
        let assigned = self.players[index].assign_target(card_id, target_id);
        if assigned {
            self.events
                .push_back(GameEvent::TargetAssigned(*player_id, card_id, target_id));
        }
        Ok(assigned)
    }

    /// Free sub-action.
    pub fn remove_card_target(
        &mut self,
        player_id: &PlayerId,
        card_id: CardId,
        target_id: CardId,
    ) -> Result<bool, GameError> {
        let index = self.player_index(player_id)?;
        if !self
            .controller
            .can_do(ActionKind::RemoveCardTarget, Some(player_id))
        {
            return Ok(false);
        }
        if self.players[index].battlefield_card(card_id).is_none() {
            return Err(GameError::CardNotFound(card_id));
        }
        let removed = self.players[index].remove_target(card_id, target_id);
        if removed {
            self.events
                .push_back(GameEvent::TargetRemoved(*player_id, card_id, target_id));
        }
        Ok(removed)
    }

    /// Lock the player's skill and target choices in. Once every player has
    /// confirmed, the round can start.
    pub fn confirm_all(&mut self, player_id: &PlayerId) -> Result<bool, GameError> {
        self.player_index(player_id)?;
        if !self.controller.can_do(ActionKind::ConfirmAll, Some(player_id)) {
            return Ok(false);
        }
        self.controller.set_player_done_or_next_expected_action(
            player_id,
            &[ExpectedAction::any(ActionKind::StartRound)],
        );
        Ok(true)
    }

    /// Open the round: bump the counter, mark combat ongoing, and run every
    /// living battlefield card's round-start effect hooks.
    pub fn start_round(&mut self) -> Result<bool, GameError> {
        if !self.controller.can_do(ActionKind::StartRound, None) {
            return Ok(false);
        }
        self.round += 1;
        self.round_ongoing = true;
        for player in &mut self.players {
            for card in player.battlefield_mut() {
                let Some(combat) = card.combat_mut() else {
                    continue;
                };
                if !combat.is_alive() {
                    continue;
                }
                let effects = combat.effects.clone();
                for effect in &effects {
                    effect.on_round_start(&mut combat.stats);
                }
            }
        }
        self.events.push_back(GameEvent::RoundStarted(self.round));
        info!("Game {}: round {} started", self.id, self.round);
        self.controller
            .set_next_expected_action(ExpectedAction::any(ActionKind::FinishRound));
        Ok(true)
    }

    // === Lookup helpers ===

    pub(super) fn player_index(&self, player_id: &PlayerId) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|player| player.id == *player_id)
            .ok_or_else(|| {
                error!("Player {player_id} is not in game {}", self.id);
                GameError::PlayerNotFound(*player_id)
            })
    }

    pub(super) fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|player| player.id).collect()
    }

    pub(super) fn battlefield_contains(&self, card_id: CardId) -> bool {
        self.players
            .iter()
            .any(|player| player.has_battlefield_card(card_id))
    }

    fn dice_assignment_phase(&self) -> [ExpectedAction; 3] {
        let players = self.player_ids();
        [
            ExpectedAction::all(ActionKind::AssignDiceToCard, players.clone()),
            ExpectedAction::all(ActionKind::RemoveDiceFromCard, players.clone()),
            ExpectedAction::all(ActionKind::ConfirmAssignDicesToCards, players),
        ]
    }

    fn targeting_phase(&self) -> [ExpectedAction; 4] {
        let players = self.player_ids();
        [
            ExpectedAction::all(ActionKind::ChooseCardSkill, players.clone()),
            ExpectedAction::all(ActionKind::AssignCardTarget, players.clone()),
            ExpectedAction::all(ActionKind::RemoveCardTarget, players.clone()),
            ExpectedAction::all(ActionKind::ConfirmAll, players),
        ]
    }
}
