//! Card battle game engine - phase machine and combat logic.
//!
//! This module provides the foundational game implementation including:
//! - Phase gating through an expected-action controller
//! - Per-player hands, battlefields, dice, and assignments
//! - Source-tagged stat modifiers and effect hooks
//! - Speed-ordered combat queue and the move pipeline
//! - Event generation and views

// Submodules
pub mod constants;
pub mod controller;
pub mod effects;
pub mod entities;
pub mod functional;
pub mod player;
pub mod stats;

mod combat;
mod engine;

pub use engine::{Game, GameError, GameEvent, GameSettings, RoundSettings};
