//! # Dice Clash
//!
//! A dice-driven card battle engine built around an authoritative turn state machine.
//!
//! This library provides a complete battle engine with phase gating, dice rolls,
//! stat modifiers, effect hooks, and per-player views. Every state change goes
//! through an expected-action controller, so out-of-phase requests are refused
//! instead of corrupting the match.
//!
//! ## Architecture
//!
//! A round walks through a fixed sequence of phases, each gating a specific set
//! of player actions:
//!
//! - **TakeCardsToCommonPool**: Building the shared draw pool
//! - **TakeCardsToHand**: Refilling each player's hand
//! - **CalculateLayDownOrderPerPlayer**: Deriving the lay-down order from hero speeds
//! - **LayCardsToBattle**: Laying hands onto battlefields and the center slot
//! - **PlayDices**: Rolling each player's battle dice
//! - **ReplayDices/PassReplayDices**: One optional reroll per player
//! - **AssignDiceToCard/RemoveDiceFromCard**: Committing dice to cards
//! - **ChooseCardSkill/AssignCardTarget/RemoveCardTarget**: Picking skills and targets
//! - **StartRound**: Opening combat and firing round-start effects
//! - **PerformRound/PerformMove**: Resolving moves in speed order
//! - **FinishRound**: Sweeping the fallen and resetting for the next round
//!
//! ## Core Modules
//!
//! - [`game`]: Phase controller, entities, combat pipeline, and views
//!
//! ## Example
//!
//! ```
//! use dice_clash::{
//!     ActionKind, CardId, CombatData, Game, GameId, GameSettings, HeroCard, PlayerId,
//! };
//! use uuid::Uuid;
//!
//! // Create a two-player game; it starts gated on building the common pool
//! let alice = PlayerId::new(Uuid::new_v4());
//! let bob = PlayerId::new(Uuid::new_v4());
//! let roster = vec![
//!     (alice, HeroCard::new(CardId(1), "warden", CombatData::new(5, 3, 2, 20))),
//!     (bob, HeroCard::new(CardId(2), "oracle", CombatData::new(4, 2, 4, 20))),
//! ];
//! let game = Game::new(GameId::new(Uuid::new_v4()), GameSettings::default(), roster)?;
//! assert!(game.can_do(ActionKind::TakeCardsToCommonPool, None));
//! # Ok::<(), dice_clash::GameError>(())
//! ```

/// Core game logic, entities, and the turn state machine.
pub mod game;
pub use game::{
    Game, GameError, GameEvent, GameSettings, RoundSettings,
    constants::{self, MAX_PLAYERS, MIN_PLAYERS},
    controller::{self, ActionController, ActionKind, ExpectedAction, ExpectedActionView},
    effects::{self, Effect, EffectList, Move, MoveType},
    entities::{
        self, Card, CardId, CardIdentity, CardKind, CombatData, DieFace, GameId, GameView,
        GameViews, HeroCard, ItemCard, PlayerId, Skill, SpellCard, UnitCard,
    },
    functional,
    player::{self, Player},
    stats::{self, Modifier, ModifierSource, StatKind, StatisticGroup},
};
