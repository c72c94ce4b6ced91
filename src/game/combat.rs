//! Combat resolution: the per-round move queue and the move pipeline.
//!
//! Once a round is started, every battlefield card gets exactly one move,
//! fastest card first. Resolving a move walks a fixed step order: target
//! filtering, the priority override, item modifiers, the before-hooks, the
//! damage or skill execution, the after-hooks, and the item strip. The two
//! entry points share the lazily built queue: [`Game::perform_round`] drains
//! it, [`Game::perform_move`] consumes a single entry.

use log::{debug, info};
use rand::{Rng, seq::IndexedRandom};
use std::sync::Arc;

use super::controller::{ActionKind, ExpectedAction};
use super::effects::{Effect, EffectList, Move, MoveType};
use super::engine::{Game, GameError, GameEvent, RoundSettings};
use super::entities::{Card, CardId, CardIdentity, CombatData, Damage, PlayerId, Skill, Speed};
use super::functional;
use super::stats::ModifierSource;

impl Game {
    /// Resolve every move left in the ongoing round, building the queue
    /// first if no move has been performed yet. Returns `false` when no
    /// round is ongoing.
    pub fn perform_round(&mut self, rng: &mut impl Rng) -> bool {
        if !self.round_ongoing {
            return false;
        }
        self.ensure_combat_queue(rng);
        while self.perform_move(rng) {}
        true
    }

    /// Resolve exactly one queue entry and advance the cursor. Returns
    /// `false` when no round is ongoing or every move has been performed.
    pub fn perform_move(&mut self, rng: &mut impl Rng) -> bool {
        if !self.round_ongoing {
            return false;
        }
        self.ensure_combat_queue(rng);
        let Some((attacker_owner, attacker_id)) = self
            .combat_queue
            .as_ref()
            .and_then(|queue| queue.get(self.queue_cursor).copied())
        else {
            return false;
        };
        self.queue_cursor += 1;
        self.resolve_move(attacker_owner, attacker_id, rng);
        true
    }

    /// Close the round: run every living battlefield card's round-finish
    /// hooks, sweep destroyed cards off the battlefields (heroes stay, even
    /// at zero HP), clear all per-round state, and go back to drawing.
    pub fn finish_round(&mut self) -> Result<bool, GameError> {
        if !self.controller.can_do(ActionKind::FinishRound, None) {
            return Ok(false);
        }
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
                    effect.on_round_finish(&mut combat.stats);
                }
            }
        }
        for index in 0..self.players.len() {
            let hero_id = self.players[index].hero_id();
            let dead: Vec<CardId> = self.players[index]
                .battlefield()
                .iter()
                .filter(|card| card.id() != hero_id)
                .filter(|card| card.combat().is_some_and(|combat| !combat.is_alive()))
                .map(|card| card.id())
                .collect();
            for card_id in dead {
                if self.players[index].remove_from_battlefield(card_id).is_some() {
                    self.events.push_back(GameEvent::CardDestroyed(card_id));
                    debug!("Game {}: {card_id} destroyed", self.id);
                }
            }
        }
        for player in &mut self.players {
            player.reset_for_round();
        }
        self.combat_queue = None;
        self.queue_cursor = 0;
        self.round_ongoing = false;
        self.round_settings = RoundSettings::default();
        self.events.push_back(GameEvent::RoundFinished(self.round));
        info!("Game {}: round {} finished", self.id, self.round);
        let players = self.player_ids();
        self.controller
            .set_next_expected_action(ExpectedAction::all(ActionKind::TakeCardsToHand, players));
        Ok(true)
    }

    /// Snapshot every battlefield card into a move queue ordered by speed,
    /// fastest first, rng breaking ties. Cards without a speed queue at
    /// zero and later forfeit their move.
    fn ensure_combat_queue(&mut self, rng: &mut impl Rng) {
        if self.combat_queue.is_some() {
            return;
        }
        let entries: Vec<((PlayerId, CardId), Speed)> = self
            .players
            .iter()
            .flat_map(|player| {
                player
                    .battlefield()
                    .iter()
                    .map(move |card| ((player.id, card.id()), card.speed().unwrap_or(0)))
            })
            .collect();
        let queue = functional::speed_order(entries, rng);
        debug!("Game {}: combat queue holds {} cards", self.id, queue.len());
        self.combat_queue = Some(queue);
        self.queue_cursor = 0;
    }

    fn resolve_move(&mut self, attacker_owner: PlayerId, attacker_id: CardId, rng: &mut impl Rng) {
        let Ok(player_index) = self.player_index(&attacker_owner) else {
            return;
        };
        let queue: Vec<(PlayerId, CardId)> = self.combat_queue.clone().unwrap_or_default();
        let live: Vec<(PlayerId, CardId)> = queue
            .iter()
            .copied()
            .filter(|&(owner, card_id)| self.card_is_live(owner, card_id))
            .collect();
        let enemies: Vec<CardId> = live
            .iter()
            .filter(|(owner, _)| *owner != attacker_owner)
            .map(|&(_, card_id)| card_id)
            .collect();

        // 1. The chosen targets, filtered down to cards that can be hit
        //    right now.
        let chosen: Vec<CardId> = self.players[player_index]
            .assignment(attacker_id)
            .map(|assignment| assignment.targets.clone())
            .unwrap_or_default();
        let mut targets: Vec<CardId> = chosen
            .into_iter()
            .filter(|&target| target != attacker_id)
            .filter(|&target| live.iter().any(|&(_, card_id)| card_id == target))
            .filter(|target| !self.round_settings.not_allowed_as_target.contains(target))
            .collect();

        // 2. The priority override redirects the move at one prioritized
        //    enemy card; the not-allowed set still wins.
        if !self.round_settings.prioritized_to_attack.is_empty() {
            if let Some(&priority) = self.round_settings.prioritized_to_attack.choose(rng) {
                targets = enemies
                    .iter()
                    .copied()
                    .filter(|&card_id| card_id == priority)
                    .filter(|card_id| !self.round_settings.not_allowed_as_target.contains(card_id))
                    .collect();
            }
        }

        // 3. A dead or non-combat card forfeits its move.
        if !self.card_is_live(attacker_owner, attacker_id) {
            debug!("Game {}: {attacker_id} cannot act and forfeits its move", self.id);
            return;
        }

        // 4. The assigned die face picks the move type; no die means a
        //    plain attack.
        let die_face = self.players[player_index]
            .assignment(attacker_id)
            .and_then(|assignment| assignment.die_face);
        let move_type = match die_face {
            Some(face) if face.is_elemental() => MoveType::Skill,
            _ => MoveType::Attack,
        };

        // 5. Equipped item modifiers join for the duration of this move.
        let items_applied = self.apply_attacker_items(player_index, attacker_id);

        // 6. The whole-move before-hooks.
        let damage = self.attacker_damage(player_index, attacker_id, move_type);
        let attacker_effects = self.card_effects(attacker_id);
        let mut move_at_all = Move::new(damage, move_type);
        for effect in &attacker_effects {
            effect.before_move_at_all(&mut move_at_all, &targets, &enemies);
        }

        // 7. One move per target, shaped by the attacker's per-target hooks
        //    and the target's own receive hooks.
        let mut target_moves: Vec<(CardId, Move)> = Vec::with_capacity(targets.len());
        for &target in &targets {
            let mut target_move = Move::new(damage, move_type);
            for effect in &attacker_effects {
                effect.before_move_at_single_target(&mut target_move, target);
            }
            for effect in &self.card_effects(target) {
                effect.before_receive(&mut target_move, attacker_id);
            }
            target_moves.push((target, target_move));
        }

        // 8. A hook that vetoed the item stage retracts the modifiers
        //    before execution. Damage already priced into the per-target
        //    moves keeps the item bonus.
        if items_applied && !move_at_all.items_enabled {
            self.remove_attacker_items(player_index, attacker_id);
        }

        // 9. Execution.
        if move_at_all.move_enabled {
            match move_type {
                MoveType::Attack if move_at_all.attack_enabled => {
                    for &(target, target_move) in &target_moves {
                        self.adjust_card_health(target, -target_move.damage);
                    }
                }
                MoveType::Skill if move_at_all.skills_enabled => {
                    if let Some(skill) = self.attacker_skill(player_index, attacker_id) {
                        for &(target, target_move) in &target_moves {
                            if !target_move.skills_enabled {
                                continue;
                            }
                            if skill.does_power_damage {
                                self.adjust_card_health(target, target_move.damage);
                            }
                            if target_move.effects_enabled {
                                self.attach_effects(target, &skill.effects);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        // 10. The after-hooks see the move as the formula prices it now.
        let after_damage = self.attacker_damage(player_index, attacker_id, move_type);
        let mut after_move = Move::new(after_damage, move_type);
        for effect in &attacker_effects {
            effect.after_move_at_all(&mut after_move, &targets, &enemies);
        }
        for &(target, _) in &target_moves {
            let mut target_move = Move::new(after_damage, move_type);
            for effect in &attacker_effects {
                effect.after_move_at_single_target(&mut target_move, target);
            }
            for effect in &self.card_effects(target) {
                effect.after_receive(&mut target_move, attacker_id);
            }
        }

        // 11. Item modifiers never outlive the move.
        self.remove_attacker_items(player_index, attacker_id);

        debug!(
            "Game {}: {attacker_id} made a {move_type} move at {} targets",
            self.id,
            targets.len()
        );
        self.events.push_back(GameEvent::MovePerformed(
            attacker_owner,
            attacker_id,
            move_type,
            targets,
        ));
    }

    // === Card lookup across battlefields ===

    fn card_is_live(&self, owner: PlayerId, card_id: CardId) -> bool {
        self.players
            .iter()
            .find(|player| player.id == owner)
            .and_then(|player| player.battlefield_card(card_id))
            .and_then(Card::combat)
            .is_some_and(CombatData::is_alive)
    }

    /// Snapshot of a card's effect list, wherever the card is.
    fn card_effects(&self, card_id: CardId) -> EffectList {
        self.players
            .iter()
            .find_map(|player| player.battlefield_card(card_id))
            .and_then(Card::effects)
            .cloned()
            .unwrap_or_default()
    }

    fn attacker_damage(&self, player_index: usize, card_id: CardId, move_type: MoveType) -> Damage {
        self.players[player_index]
            .battlefield_card(card_id)
            .and_then(Card::combat)
            .map_or(0, |combat| functional::calculate_damage(move_type, &combat.stats))
    }

    fn attacker_skill(&self, player_index: usize, card_id: CardId) -> Option<Skill> {
        let skill_index = self.players[player_index].assignment(card_id)?.skill_index?;
        self.players[player_index]
            .battlefield_card(card_id)
            .and_then(Card::combat)
            .and_then(|combat| combat.skills.get(skill_index))
            .cloned()
    }

    fn adjust_card_health(&mut self, card_id: CardId, delta: Damage) {
        for player in &mut self.players {
            if let Some(combat) = player
                .battlefield_card_mut(card_id)
                .and_then(Card::combat_mut)
            {
                combat.stats.health.adjust_base(delta);
                debug!(
                    "{card_id} HP adjusted by {delta} to {}",
                    combat.stats.health.value()
                );
                return;
            }
        }
    }

    fn attach_effects(&mut self, card_id: CardId, effects: &[Arc<dyn Effect>]) {
        if effects.is_empty() {
            return;
        }
        for player in &mut self.players {
            if let Some(combat) = player
                .battlefield_card_mut(card_id)
                .and_then(Card::combat_mut)
            {
                combat.effects.extend(effects.iter().map(Arc::clone));
                return;
            }
        }
    }

    // === Item modifiers ===

    fn apply_attacker_items(&mut self, player_index: usize, card_id: CardId) -> bool {
        let Some(card) = self.players[player_index].battlefield_card_mut(card_id) else {
            return false;
        };
        let (combat, items) = match card {
            Card::Unit(unit) => (&mut unit.combat, &unit.items),
            Card::Hero(hero) => (&mut hero.combat, &hero.items),
            Card::Item(_) | Card::Spell(_) => return false,
        };
        let mut applied = false;
        for item in items {
            for &(kind, modifier) in &item.modifiers {
                combat.stats.apply(kind, ModifierSource::Item(item.id), modifier);
            }
            applied = true;
        }
        applied
    }

    fn remove_attacker_items(&mut self, player_index: usize, card_id: CardId) {
        let item_ids: Vec<CardId> = self.players[player_index]
            .battlefield_card(card_id)
            .and_then(Card::items)
            .map_or_else(Vec::new, |items| items.iter().map(|item| item.id).collect());
        if item_ids.is_empty() {
            return;
        }
        let Some(combat) = self.players[player_index]
            .battlefield_card_mut(card_id)
            .and_then(Card::combat_mut)
        else {
            return;
        };
        for item_id in item_ids {
            combat.stats.remove_source(&ModifierSource::Item(item_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::engine::GameSettings;
    use crate::game::entities::{CombatData, GameId, HeroCard, ItemCard, UnitCard};
    use crate::game::stats::{Modifier, StatKind};
    use rand::{SeedableRng, rngs::StdRng};
    use uuid::Uuid;

    fn pid(n: u128) -> PlayerId {
        PlayerId::new(Uuid::from_u128(n))
    }

    fn hero(id: u32, speed: Speed, attack: i32, power: i32, health: i32) -> HeroCard {
        HeroCard::new(CardId(id), "warden", CombatData::new(speed, attack, power, health))
    }

    /// Walk a two-player match up to the dice-assignment phase with an
    /// empty pool, so only the two heroes are on the battlefields.
    fn battle_prelude(
        hero_one: HeroCard,
        hero_two: HeroCard,
        pool: Vec<Card>,
        settings: GameSettings,
    ) -> (Game, StdRng) {
        let mut rng = StdRng::seed_from_u64(77);
        let mut game = Game::new(
            GameId::new(Uuid::from_u128(500)),
            settings,
            vec![(pid(1), hero_one), (pid(2), hero_two)],
        )
        .expect("valid roster");
        game.take_cards_to_common_pool(pool, &mut rng).expect("pool");
        game.take_cards_to_hand(&pid(1)).expect("draw");
        game.take_cards_to_hand(&pid(2)).expect("draw");
        game.calculate_lay_down_order_per_player(&mut rng).expect("order");
        for player_id in game.lay_order.clone() {
            let hand: Vec<CardId> = game
                .players
                .iter()
                .find(|p| p.id == player_id)
                .map(|p| p.hand().iter().map(|c| c.id()).collect())
                .unwrap_or_default();
            game.lay_cards_to_battle(&player_id, &hand, None).expect("lay");
        }
        game.play_dices(&pid(1), &mut rng).expect("dice");
        game.play_dices(&pid(2), &mut rng).expect("dice");
        game.pass_replay_dices(&pid(1)).expect("pass");
        game.pass_replay_dices(&pid(2)).expect("pass");
        (game, rng)
    }

    fn hero_duel(hero_one: HeroCard, hero_two: HeroCard) -> (Game, StdRng) {
        battle_prelude(hero_one, hero_two, Vec::new(), GameSettings::default())
    }

    fn confirm_dice(game: &mut Game) {
        game.confirm_assign_dices_to_cards(&pid(1)).expect("confirm");
        game.confirm_assign_dices_to_cards(&pid(2)).expect("confirm");
    }

    fn confirm_and_start(game: &mut Game) {
        game.confirm_all(&pid(1)).expect("confirm");
        game.confirm_all(&pid(2)).expect("confirm");
        game.start_round().expect("start");
    }

    fn hp(game: &Game, card_id: CardId) -> i32 {
        game.players
            .iter()
            .find_map(|player| player.battlefield_card(card_id))
            .and_then(Card::combat)
            .map_or(i32::MIN, |combat| combat.stats.health.value())
    }

    // === Plain Attack Tests ===

    #[test]
    fn test_attack_reduces_target_hp_by_the_attack_stat() {
        let (mut game, mut rng) = hero_duel(hero(100, 5, 7, 2, 20), hero(200, 4, 3, 1, 20));
        confirm_dice(&mut game);
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        confirm_and_start(&mut game);

        assert!(game.perform_round(&mut rng));
        assert_eq!(hp(&game, CardId(200)), 13);
        // No targets assigned for the other hero, so it hit nothing.
        assert_eq!(hp(&game, CardId(100)), 20);
    }

    #[test]
    fn test_both_heroes_trade_blows() {
        let (mut game, mut rng) = hero_duel(hero(100, 5, 7, 2, 20), hero(200, 4, 3, 1, 20));
        confirm_dice(&mut game);
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        game.assign_card_target(&pid(2), CardId(200), CardId(100))
            .expect("target");
        confirm_and_start(&mut game);

        assert!(game.perform_round(&mut rng));
        assert_eq!(hp(&game, CardId(200)), 13);
        assert_eq!(hp(&game, CardId(100)), 17);
    }

    #[test]
    fn test_perform_requires_an_ongoing_round() {
        let (mut game, mut rng) = hero_duel(hero(100, 5, 7, 2, 20), hero(200, 4, 3, 1, 20));
        assert!(!game.perform_round(&mut rng));
        assert!(!game.perform_move(&mut rng));
    }

    #[test]
    fn test_perform_move_consumes_one_entry_at_a_time() {
        let (mut game, mut rng) = hero_duel(hero(100, 5, 7, 2, 20), hero(200, 4, 3, 1, 20));
        confirm_dice(&mut game);
        confirm_and_start(&mut game);

        assert!(game.perform_move(&mut rng));
        assert!(game.perform_move(&mut rng));
        assert!(!game.perform_move(&mut rng));
        // The round stays ongoing until it is finished explicitly.
        assert!(game.is_round_ongoing());
        assert!(game.perform_round(&mut rng));
    }

    // === Round Settings Tests ===

    #[test]
    fn test_a_not_allowed_card_is_never_hit() {
        let (mut game, mut rng) = hero_duel(hero(100, 5, 7, 2, 20), hero(200, 4, 3, 1, 20));
        confirm_dice(&mut game);
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        confirm_and_start(&mut game);
        game.round_settings_mut()
            .not_allowed_as_target
            .insert(CardId(200));

        assert!(game.perform_round(&mut rng));
        assert_eq!(hp(&game, CardId(200)), 20);
    }

    #[test]
    fn test_priority_override_redirects_a_move_with_no_targets() {
        let (mut game, mut rng) = hero_duel(hero(100, 5, 7, 2, 20), hero(200, 4, 3, 1, 20));
        confirm_dice(&mut game);
        confirm_and_start(&mut game);
        game.round_settings_mut()
            .prioritized_to_attack
            .push(CardId(200));

        assert!(game.perform_round(&mut rng));
        // The first hero was redirected onto the prioritized enemy; the
        // prioritized card itself has no enemy entry matching it.
        assert_eq!(hp(&game, CardId(200)), 13);
        assert_eq!(hp(&game, CardId(100)), 20);
    }

    #[test]
    fn test_the_not_allowed_set_beats_the_priority_list() {
        let (mut game, mut rng) = hero_duel(hero(100, 5, 7, 2, 20), hero(200, 4, 3, 1, 20));
        confirm_dice(&mut game);
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        confirm_and_start(&mut game);
        game.round_settings_mut()
            .prioritized_to_attack
            .push(CardId(200));
        game.round_settings_mut()
            .not_allowed_as_target
            .insert(CardId(200));

        assert!(game.perform_round(&mut rng));
        assert_eq!(hp(&game, CardId(200)), 20);
    }

    // === Attacker State Tests ===

    #[test]
    fn test_a_dead_attacker_forfeits_its_move() {
        // The faster hero kills the slower one before it can act.
        let (mut game, mut rng) = hero_duel(hero(100, 5, 7, 2, 20), hero(200, 4, 9, 1, 5));
        confirm_dice(&mut game);
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        game.assign_card_target(&pid(2), CardId(200), CardId(100))
            .expect("target");
        confirm_and_start(&mut game);

        assert!(game.perform_round(&mut rng));
        assert_eq!(hp(&game, CardId(200)), -2);
        assert_eq!(hp(&game, CardId(100)), 20);
    }

    #[test]
    fn test_a_dead_card_is_not_a_valid_target() {
        let (mut game, mut rng) = hero_duel(hero(100, 5, 7, 2, 20), hero(200, 4, 9, 1, 5));
        confirm_dice(&mut game);
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        confirm_and_start(&mut game);

        assert!(game.perform_move(&mut rng));
        assert_eq!(hp(&game, CardId(200)), -2);
        // Hitting the corpse again resolves to no targets.
        let events_before = game.drain_events();
        assert!(!events_before.is_empty());
        assert!(game.perform_move(&mut rng));
        assert_eq!(hp(&game, CardId(200)), -2);
    }

    // === Skill Tests ===

    fn elemental_die_index(game: &Game, player_id: &PlayerId) -> usize {
        game.players
            .iter()
            .find(|p| p.id == *player_id)
            .and_then(|p| p.dice().iter().position(|die| die.face.is_elemental()))
            .expect("an elemental face among 24 dice")
    }

    fn skill_duel(skill: Skill) -> (Game, StdRng) {
        let mut healer = hero(100, 5, 7, 4, 20);
        healer.combat.skills.push(skill);
        // 24 dice make an all-physical roll practically impossible, and the
        // fixed seed makes it reproducible besides.
        let settings = GameSettings::new(6, 24, true);
        battle_prelude(healer, hero(200, 4, 3, 1, 20), Vec::new(), settings)
    }

    #[test]
    fn test_power_skill_adds_power_to_the_target_hp() {
        let (mut game, mut rng) = skill_duel(Skill::new("mend", true));
        let die_index = elemental_die_index(&game, &pid(1));
        game.assign_dice_to_card(&pid(1), CardId(100), die_index)
            .expect("assign die");
        confirm_dice(&mut game);
        game.choose_card_skill(&pid(1), CardId(100), 0).expect("skill");
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        confirm_and_start(&mut game);

        assert!(game.perform_round(&mut rng));
        // Power 4 is added to the target's HP: a heal by sign.
        assert_eq!(hp(&game, CardId(200)), 24);
    }

    #[test]
    fn test_skill_move_without_a_chosen_skill_does_nothing() {
        let (mut game, mut rng) = skill_duel(Skill::new("mend", true));
        let die_index = elemental_die_index(&game, &pid(1));
        game.assign_dice_to_card(&pid(1), CardId(100), die_index)
            .expect("assign die");
        confirm_dice(&mut game);
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        confirm_and_start(&mut game);

        assert!(game.perform_round(&mut rng));
        assert_eq!(hp(&game, CardId(200)), 20);
    }

    #[derive(Debug)]
    struct Brand;

    impl Effect for Brand {
        fn name(&self) -> &str {
            "brand"
        }
    }

    #[test]
    fn test_skill_attaches_its_effects_to_the_target() {
        let skill = Skill::with_effects("sear", false, vec![Arc::new(Brand)]);
        let (mut game, mut rng) = skill_duel(skill);
        let die_index = elemental_die_index(&game, &pid(1));
        game.assign_dice_to_card(&pid(1), CardId(100), die_index)
            .expect("assign die");
        confirm_dice(&mut game);
        game.choose_card_skill(&pid(1), CardId(100), 0).expect("skill");
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        confirm_and_start(&mut game);

        assert!(game.perform_round(&mut rng));
        // No power damage, just the attached effect.
        assert_eq!(hp(&game, CardId(200)), 20);
        let names: Vec<String> = game
            .players
            .iter()
            .find_map(|p| p.battlefield_card(CardId(200)))
            .and_then(Card::effects)
            .map(|effects| effects.iter().map(|e| e.name().to_string()).collect())
            .unwrap_or_default();
        assert_eq!(names, vec!["brand".to_string()]);
    }

    // === Item Tests ===

    #[test]
    fn test_item_modifiers_last_exactly_one_move() {
        let mut armed = hero(100, 5, 7, 2, 20);
        armed.items.push(ItemCard::new(
            CardId(9),
            "iron blade",
            vec![(StatKind::Attack, Modifier::Flat(5))],
        ));
        let (mut game, mut rng) =
            battle_prelude(armed, hero(200, 4, 3, 1, 20), Vec::new(), GameSettings::default());
        confirm_dice(&mut game);
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        confirm_and_start(&mut game);

        assert!(game.perform_round(&mut rng));
        // 7 base attack + 5 from the blade.
        assert_eq!(hp(&game, CardId(200)), 8);
        let attack_after = game
            .players
            .iter()
            .find_map(|p| p.battlefield_card(CardId(100)))
            .and_then(Card::combat)
            .map_or(0, |combat| combat.stats.attack.value());
        assert_eq!(attack_after, 7);
    }

    // === Effect Hook Tests ===

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

    #[test]
    fn test_the_targets_receive_hook_shapes_the_damage() {
        let mut shielded = hero(200, 4, 3, 1, 20);
        shielded.combat.effects.push(Arc::new(Dampen));
        let (mut game, mut rng) =
            battle_prelude(hero(100, 5, 8, 2, 20), shielded, Vec::new(), GameSettings::default());
        confirm_dice(&mut game);
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        confirm_and_start(&mut game);

        assert!(game.perform_round(&mut rng));
        assert_eq!(hp(&game, CardId(200)), 16);
    }

    #[derive(Debug)]
    struct Pacify;

    impl Effect for Pacify {
        fn name(&self) -> &str {
            "pacify"
        }

        fn before_move_at_all(&self, mv: &mut Move, _targets: &[CardId], _enemies: &[CardId]) {
            mv.move_enabled = false;
        }
    }

    #[test]
    fn test_a_vetoed_move_executes_nothing() {
        let mut pacified = hero(100, 5, 7, 2, 20);
        pacified.combat.effects.push(Arc::new(Pacify));
        let (mut game, mut rng) =
            battle_prelude(pacified, hero(200, 4, 3, 1, 20), Vec::new(), GameSettings::default());
        confirm_dice(&mut game);
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        confirm_and_start(&mut game);

        assert!(game.perform_round(&mut rng));
        assert_eq!(hp(&game, CardId(200)), 20);
    }

    // === Round Finish Tests ===

    #[test]
    fn test_finish_round_sweeps_dead_units_but_never_heroes() {
        let doomed: Card =
            UnitCard::new(CardId(1), "militia", CombatData::new(1, 2, 1, 1)).into();
        let (mut game, mut rng) = battle_prelude(
            hero(100, 5, 9, 2, 20),
            hero(200, 4, 9, 1, 5),
            vec![doomed],
            GameSettings::default(),
        );
        confirm_dice(&mut game);
        // The militia ended up in the first drawer's hand and was laid.
        let unit_owner = game
            .players
            .iter()
            .find(|p| p.has_battlefield_card(CardId(1)))
            .map(|p| p.id)
            .expect("laid unit");
        let (attacker, attacker_card) = if unit_owner == pid(1) {
            (pid(2), CardId(200))
        } else {
            (pid(1), CardId(100))
        };
        game.assign_card_target(&attacker, attacker_card, CardId(1))
            .expect("target");
        confirm_and_start(&mut game);

        assert!(game.perform_round(&mut rng));
        assert!(hp(&game, CardId(1)) <= 0);
        game.drain_events();

        assert_eq!(game.finish_round(), Ok(true));
        assert!(!game.is_round_ongoing());
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::CardDestroyed(CardId(1))));
        assert!(!game.players.iter().any(|p| p.has_battlefield_card(CardId(1))));
        // Heroes stay, whatever their HP.
        assert!(game.players.iter().any(|p| p.has_battlefield_card(CardId(100))));
        assert!(game.players.iter().any(|p| p.has_battlefield_card(CardId(200))));
    }

    #[test]
    fn test_finish_round_resets_per_round_state() {
        let (mut game, mut rng) = hero_duel(hero(100, 5, 7, 2, 20), hero(200, 4, 3, 1, 20));
        confirm_dice(&mut game);
        game.assign_card_target(&pid(1), CardId(100), CardId(200))
            .expect("target");
        confirm_and_start(&mut game);
        game.round_settings_mut()
            .prioritized_to_attack
            .push(CardId(200));
        game.perform_round(&mut rng);

        assert_eq!(game.finish_round(), Ok(true));
        assert!(!game.is_round_ongoing());
        assert!(game.round_settings().prioritized_to_attack.is_empty());
        assert!(game.combat_queue.is_none());
        assert!(game.players.iter().all(|p| p.dice().is_empty()));
        assert!(!game.perform_round(&mut rng));
        // The next phase is drawing again.
        assert!(game.can_do(ActionKind::TakeCardsToHand, Some(&pid(1))));
        assert_eq!(game.round(), 1);
    }

    #[test]
    fn test_finish_round_is_gated_on_an_ongoing_round() {
        let (mut game, _rng) = hero_duel(hero(100, 5, 7, 2, 20), hero(200, 4, 3, 1, 20));
        assert_eq!(game.finish_round(), Ok(false));
    }

    #[test]
    fn test_a_fixed_seed_replays_the_whole_round() {
        let run = || {
            let (mut game, mut rng) = hero_duel(hero(100, 5, 7, 2, 20), hero(200, 4, 5, 1, 20));
            confirm_dice(&mut game);
            game.assign_card_target(&pid(1), CardId(100), CardId(200))
                .expect("target");
            game.assign_card_target(&pid(2), CardId(200), CardId(100))
                .expect("target");
            confirm_and_start(&mut game);
            game.perform_round(&mut rng);
            (hp(&game, CardId(100)), hp(&game, CardId(200)))
        };
        assert_eq!(run(), run());
    }
}
