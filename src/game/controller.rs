//! The legality gate and phase-advance engine.
//!
//! Every phase transition in a match passes through [`ActionController`]:
//! it stores the currently expected action entries, answers whether a given
//! action is legal for a given player right now, and advances to the next
//! expected action set once every required player has completed the current
//! one. Illegality is a normal outcome (`false`), never an error.

use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

use super::entities::PlayerId;

/// Closed tag for every action the engine understands. Comparing submitted
/// actions against expected ones is comparison over these tags.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ActionKind {
    TakeCardsToCommonPool,
    TakeCardsToHand,
    CalculateLayDownOrderPerPlayer,
    LayCardsToBattle,
    PlayDices,
    ReplayDices,
    PassReplayDices,
    AssignDiceToCard,
    RemoveDiceFromCard,
    ConfirmAssignDicesToCards,
    ChooseCardSkill,
    AssignCardTarget,
    RemoveCardTarget,
    ConfirmAll,
    StartRound,
    FinishRound,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::TakeCardsToCommonPool => "take cards to common pool",
            Self::TakeCardsToHand => "take cards to hand",
            Self::CalculateLayDownOrderPerPlayer => "calculate lay-down order",
            Self::LayCardsToBattle => "lay cards to battle",
            Self::PlayDices => "play dices",
            Self::ReplayDices => "replay dices",
            Self::PassReplayDices => "pass replay dices",
            Self::AssignDiceToCard => "assign dice to card",
            Self::RemoveDiceFromCard => "remove dice from card",
            Self::ConfirmAssignDicesToCards => "confirm dice assignments",
            Self::ChooseCardSkill => "choose card skill",
            Self::AssignCardTarget => "assign card target",
            Self::RemoveCardTarget => "remove card target",
            Self::ConfirmAll => "confirm all",
            Self::StartRound => "start round",
            Self::FinishRound => "finish round",
        };
        write!(f, "{repr}")
    }
}

/// One expected action: which kind, which players must perform it, and
/// whether they must do so in the declared order.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ExpectedAction {
    pub kind: ActionKind,
    /// Players that must complete the action. Empty means anyone may
    /// perform it and a single call completes it.
    pub required: Vec<PlayerId>,
    pub obey_order: bool,
}

impl ExpectedAction {
    /// Anyone may perform the action; one call completes it.
    #[must_use]
    pub const fn any(kind: ActionKind) -> Self {
        Self {
            kind,
            required: Vec::new(),
            obey_order: false,
        }
    }

    /// Every listed player must perform the action, in any order.
    #[must_use]
    pub fn all(kind: ActionKind, players: Vec<PlayerId>) -> Self {
        Self {
            kind,
            required: players,
            obey_order: false,
        }
    }

    /// Every listed player must perform the action, in the listed order.
    #[must_use]
    pub fn ordered(kind: ActionKind, players: Vec<PlayerId>) -> Self {
        Self {
            kind,
            required: players,
            obey_order: true,
        }
    }
}

impl fmt::Display for ExpectedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match (self.required.is_empty(), self.obey_order) {
            (true, _) => format!("{} (anyone)", self.kind),
            (false, false) => format!("{} ({} players)", self.kind, self.required.len()),
            (false, true) => format!("{} ({} players, in order)", self.kind, self.required.len()),
        };
        write!(f, "{repr}")
    }
}

/// Snapshot of one active entry, for views and logging.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ExpectedActionView {
    pub kind: ActionKind,
    /// Required players that have not completed the action yet, in the
    /// declared order. Empty when anyone may act.
    pub pending: Vec<PlayerId>,
    pub obey_order: bool,
}

/// One active entry with its done-tracking.
#[derive(Clone, Debug)]
struct Entry {
    kind: ActionKind,
    required: Vec<PlayerId>,
    obey_order: bool,
    done: HashSet<PlayerId>,
}

impl Entry {
    fn allows(&self, kind: ActionKind, player: Option<&PlayerId>) -> bool {
        if self.kind != kind {
            return false;
        }
        let Some(player) = player else {
            // Player-less calls match only entries open to anyone.
            return self.required.is_empty();
        };
        if self.required.is_empty() {
            return true;
        }
        if !self.required.contains(player) || self.done.contains(player) {
            return false;
        }
        if self.obey_order {
            return self.next_in_order() == Some(player);
        }
        true
    }

    fn next_in_order(&self) -> Option<&PlayerId> {
        self.required.iter().find(|p| !self.done.contains(*p))
    }

    fn is_complete(&self) -> bool {
        if self.required.is_empty() {
            // Anyone-entries complete after a single call.
            !self.done.is_empty()
        } else {
            self.required.iter().all(|p| self.done.contains(p))
        }
    }

    fn view(&self) -> ExpectedActionView {
        ExpectedActionView {
            kind: self.kind,
            pending: self
                .required
                .iter()
                .filter(|p| !self.done.contains(*p))
                .copied()
                .collect(),
            obey_order: self.obey_order,
        }
    }
}

impl From<ExpectedAction> for Entry {
    fn from(value: ExpectedAction) -> Self {
        Self {
            kind: value.kind,
            required: value.required,
            obey_order: value.obey_order,
            done: HashSet::new(),
        }
    }
}

/// The phase gate. At any instant exactly one set of expected actions is
/// active; an action not in that set is illegal for everyone.
#[derive(Clone, Debug, Default)]
pub struct ActionController {
    entries: Vec<Entry>,
}

impl ActionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `player` (or a player-less caller, when `None`) may perform
    /// `kind` right now.
    #[must_use]
    pub fn can_do(&self, kind: ActionKind, player: Option<&PlayerId>) -> bool {
        self.entries.iter().any(|entry| entry.allows(kind, player))
    }

    /// Unconditionally replace the active set with a single entry and
    /// reset all done-flags. Returns `true`: the phase advanced.
    pub fn set_next_expected_action(&mut self, expected: ExpectedAction) -> bool {
        self.install(std::slice::from_ref(&expected));
        true
    }

    /// Mark `player` done in every active entry that involves them. When
    /// every entry is complete, advance to `next` (several entries may be
    /// legal at once, e.g. replay-or-pass). Returns `true` either way: the
    /// phase stayed open for the remaining players or advanced.
    pub fn set_player_done_or_next_expected_action(
        &mut self,
        player: &PlayerId,
        next: &[ExpectedAction],
    ) -> bool {
        for entry in &mut self.entries {
            if entry.required.is_empty() || entry.required.contains(player) {
                entry.done.insert(*player);
            }
        }
        if self.entries.iter().all(Entry::is_complete) {
            self.install(next);
        }
        true
    }

    /// Snapshot of the active entries for views and logging.
    #[must_use]
    pub fn expected(&self) -> Vec<ExpectedActionView> {
        self.entries.iter().map(Entry::view).collect()
    }

    fn install(&mut self, next: &[ExpectedAction]) {
        self.entries = next.iter().cloned().map(Entry::from).collect();
        let kinds: Vec<String> = next.iter().map(ToString::to_string).collect();
        debug!("expecting [{}]", kinds.join(" | "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn pid(n: u128) -> PlayerId {
        PlayerId::new(Uuid::from_u128(n))
    }

    fn controller_with(expected: ExpectedAction) -> ActionController {
        let mut controller = ActionController::new();
        controller.set_next_expected_action(expected);
        controller
    }

    // === CanDo Tests ===

    #[test]
    fn test_fresh_controller_allows_nothing() {
        let controller = ActionController::new();
        assert!(!controller.can_do(ActionKind::StartRound, None));
        assert!(!controller.can_do(ActionKind::PlayDices, Some(&pid(1))));
    }

    #[test]
    fn test_only_the_expected_kind_is_legal() {
        let controller = controller_with(ExpectedAction::any(ActionKind::StartRound));
        assert!(controller.can_do(ActionKind::StartRound, None));
        assert!(controller.can_do(ActionKind::StartRound, Some(&pid(1))));
        assert!(!controller.can_do(ActionKind::ConfirmAll, None));
        assert!(!controller.can_do(ActionKind::FinishRound, Some(&pid(1))));
    }

    #[test]
    fn test_required_entry_rejects_outsiders() {
        let controller =
            controller_with(ExpectedAction::all(ActionKind::PlayDices, vec![pid(1), pid(2)]));
        assert!(controller.can_do(ActionKind::PlayDices, Some(&pid(1))));
        assert!(controller.can_do(ActionKind::PlayDices, Some(&pid(2))));
        assert!(!controller.can_do(ActionKind::PlayDices, Some(&pid(3))));
        // A player-less call cannot satisfy a player-scoped entry.
        assert!(!controller.can_do(ActionKind::PlayDices, None));
    }

    #[test]
    fn test_replacing_the_expected_set_revokes_the_old_one() {
        let mut controller = controller_with(ExpectedAction::any(ActionKind::StartRound));
        assert!(controller.set_next_expected_action(ExpectedAction::any(ActionKind::FinishRound)));
        assert!(!controller.can_do(ActionKind::StartRound, None));
        assert!(controller.can_do(ActionKind::FinishRound, None));
    }

    // === Done Tracking Tests ===

    #[test]
    fn test_no_advance_until_every_required_player_is_done() {
        let mut controller =
            controller_with(ExpectedAction::all(ActionKind::TakeCardsToHand, vec![pid(1), pid(2)]));
        let next = [ExpectedAction::any(ActionKind::StartRound)];

        assert!(controller.set_player_done_or_next_expected_action(&pid(1), &next));
        assert!(!controller.can_do(ActionKind::StartRound, None));
        assert!(controller.can_do(ActionKind::TakeCardsToHand, Some(&pid(2))));

        assert!(controller.set_player_done_or_next_expected_action(&pid(2), &next));
        assert!(controller.can_do(ActionKind::StartRound, None));
        assert!(!controller.can_do(ActionKind::TakeCardsToHand, Some(&pid(1))));
    }

    #[test]
    fn test_done_player_loses_the_action() {
        let mut controller =
            controller_with(ExpectedAction::all(ActionKind::TakeCardsToHand, vec![pid(1), pid(2)]));
        controller
            .set_player_done_or_next_expected_action(&pid(1), &[ExpectedAction::any(ActionKind::StartRound)]);
        assert!(!controller.can_do(ActionKind::TakeCardsToHand, Some(&pid(1))));
    }

    #[test]
    fn test_marking_done_twice_does_not_double_count() {
        let mut controller =
            controller_with(ExpectedAction::all(ActionKind::TakeCardsToHand, vec![pid(1), pid(2)]));
        let next = [ExpectedAction::any(ActionKind::StartRound)];
        controller.set_player_done_or_next_expected_action(&pid(1), &next);
        controller.set_player_done_or_next_expected_action(&pid(1), &next);
        controller.set_player_done_or_next_expected_action(&pid(1), &next);
        assert!(!controller.can_do(ActionKind::StartRound, None));
        assert!(controller.can_do(ActionKind::TakeCardsToHand, Some(&pid(2))));
    }

    #[test]
    fn test_zero_required_entry_completes_after_one_call() {
        let mut controller = controller_with(ExpectedAction::any(ActionKind::StartRound));
        controller.set_player_done_or_next_expected_action(
            &pid(9),
            &[ExpectedAction::any(ActionKind::FinishRound)],
        );
        assert!(controller.can_do(ActionKind::FinishRound, None));
        assert!(!controller.can_do(ActionKind::StartRound, None));
    }

    // === Order Enforcement Tests ===

    #[test]
    fn test_order_enforcement_rejects_out_of_turn_players() {
        let controller = controller_with(ExpectedAction::ordered(
            ActionKind::LayCardsToBattle,
            vec![pid(1), pid(2), pid(3)],
        ));
        assert!(controller.can_do(ActionKind::LayCardsToBattle, Some(&pid(1))));
        // Required and not done, but not next.
        assert!(!controller.can_do(ActionKind::LayCardsToBattle, Some(&pid(2))));
        assert!(!controller.can_do(ActionKind::LayCardsToBattle, Some(&pid(3))));
    }

    #[test]
    fn test_order_advances_player_by_player() {
        let mut controller = controller_with(ExpectedAction::ordered(
            ActionKind::LayCardsToBattle,
            vec![pid(1), pid(2)],
        ));
        let next = [ExpectedAction::any(ActionKind::StartRound)];

        controller.set_player_done_or_next_expected_action(&pid(1), &next);
        assert!(!controller.can_do(ActionKind::LayCardsToBattle, Some(&pid(1))));
        assert!(controller.can_do(ActionKind::LayCardsToBattle, Some(&pid(2))));

        controller.set_player_done_or_next_expected_action(&pid(2), &next);
        assert!(controller.can_do(ActionKind::StartRound, None));
    }

    // === Alternative Set Tests ===

    #[test]
    fn test_alternatives_are_simultaneously_legal() {
        let mut controller = controller_with(ExpectedAction::any(ActionKind::PlayDices));
        controller.set_player_done_or_next_expected_action(
            &pid(1),
            &[
                ExpectedAction::all(ActionKind::ReplayDices, vec![pid(1), pid(2)]),
                ExpectedAction::all(ActionKind::PassReplayDices, vec![pid(1), pid(2)]),
            ],
        );
        assert!(controller.can_do(ActionKind::ReplayDices, Some(&pid(1))));
        assert!(controller.can_do(ActionKind::PassReplayDices, Some(&pid(1))));
        assert!(controller.can_do(ActionKind::ReplayDices, Some(&pid(2))));
    }

    #[test]
    fn test_doing_one_alternative_consumes_both() {
        let mut controller = controller_with(ExpectedAction::any(ActionKind::PlayDices));
        let alternatives = [
            ExpectedAction::all(ActionKind::ReplayDices, vec![pid(1), pid(2)]),
            ExpectedAction::all(ActionKind::PassReplayDices, vec![pid(1), pid(2)]),
        ];
        controller.set_player_done_or_next_expected_action(&pid(1), &alternatives);

        let next = [ExpectedAction::any(ActionKind::StartRound)];
        controller.set_player_done_or_next_expected_action(&pid(1), &next);
        assert!(!controller.can_do(ActionKind::ReplayDices, Some(&pid(1))));
        assert!(!controller.can_do(ActionKind::PassReplayDices, Some(&pid(1))));
        assert!(controller.can_do(ActionKind::ReplayDices, Some(&pid(2))));
        assert!(!controller.can_do(ActionKind::StartRound, None));

        controller.set_player_done_or_next_expected_action(&pid(2), &next);
        assert!(controller.can_do(ActionKind::StartRound, None));
    }

    // === View Tests ===

    #[test]
    fn test_expected_view_lists_pending_players_in_order() {
        let mut controller = controller_with(ExpectedAction::ordered(
            ActionKind::LayCardsToBattle,
            vec![pid(1), pid(2), pid(3)],
        ));
        controller.set_player_done_or_next_expected_action(
            &pid(1),
            &[ExpectedAction::any(ActionKind::StartRound)],
        );
        let expected = controller.expected();
        assert_eq!(expected.len(), 1);
        assert_eq!(expected[0].kind, ActionKind::LayCardsToBattle);
        assert_eq!(expected[0].pending, vec![pid(2), pid(3)]);
        assert!(expected[0].obey_order);
    }
}
