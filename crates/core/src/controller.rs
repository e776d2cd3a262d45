//! Swap controller - selection, swaps and the cascade loop
//!
//! This module ties the board, the match detectors, gravity and the hint
//! search together. It is driven from outside with discrete commands
//! (`select_slot`, `deselect_all`, `motion_complete`) and advanced one unit of
//! work per [`Controller::tick`]:
//!
//! ```text
//! Idle ──select──▶ Selecting ──adjacent select──▶ PendingSwap
//!                                                     │ both pieces arrived
//!                                                     ▼
//!                                                 Resolving
//!                            no match ┌───────────────┴───────────────┐ match
//!                                     ▼                               ▼
//!                                 Reverting                       Cascading
//!                                     │ arrived                       │ sweep empty
//!                                     ▼                               ▼
//!                                   Idle                            Idle
//! ```
//!
//! A cascade is a loop of small steps: disable one matched piece, shift the
//! columns down, spawn one refill, wait until nothing moves, sweep the board.
//! The controller never reads a clock: motion is finished only when the
//! collaborator reports it, and the idle timer only advances by the elapsed
//! time passed to `tick`.

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use crate::board::Board;
use crate::config::{BoardConfig, ConfigError};
use crate::events::EventSink;
use crate::gravity::{next_vacancy, refill_slot, shift_down};
use crate::hint::find_hint;
use crate::matcher::{check_for_sequence, find_all_matches};
use crate::rng::{RandomTypes, TypeSource};
use crate::snapshot::BoardSnapshot;
use crate::types::{ControllerState, Direction, Notification, PieceId, SlotIndex};

/// Internal step position; several steps map onto one [`ControllerState`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Swapping {
        a: SlotIndex,
        b: SlotIndex,
    },
    Resolving {
        a: SlotIndex,
        b: SlotIndex,
    },
    Reverting {
        a: SlotIndex,
        b: SlotIndex,
    },
    /// Matched slots still to be disabled, one per step
    Disabling(VecDeque<SlotIndex>),
    Shifting,
    /// Next slot to look at for a vacancy
    Spawning {
        cursor: SlotIndex,
    },
    Settling,
    Detecting,
}

/// Board engine driven by an external per-frame loop
#[derive(Debug)]
pub struct Controller<E = Vec<Notification>, T = RandomTypes> {
    config: BoardConfig,
    board: Board,
    types: T,
    sink: E,
    phase: Phase,
    selection: Option<SlotIndex>,
    hint: Option<[SlotIndex; 3]>,
    /// Hint search already ran during the current idle period
    hint_searched: bool,
    idle_ms: u32,
    /// Removal rounds of the running (or last) cascade
    passes: u32,
    /// Pieces removed by the running (or last) cascade
    cleared: u32,
}

impl<E: EventSink> Controller<E, RandomTypes> {
    /// Build a random board and start the opening drop
    ///
    /// Every piece is announced as spawned above the board and travels into
    /// place; once all of them arrive, any matches the random board happens to
    /// contain are cascaded away.
    pub fn new(config: BoardConfig, sink: E) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut types = RandomTypes::new(config.type_count, config.seed);
        let board = Board::populate(config.width as usize, config.height as usize, &mut types);

        let mut controller = Self::assemble(config, board, types, sink);
        controller.board.set_all_in_motion();
        let rows_above = controller.board.height() as u16;
        for slot in 0..controller.board.slot_count() {
            if let Some(piece) = controller.board.piece_in(slot).copied() {
                controller.sink.notify(Notification::PieceSpawned {
                    slot,
                    piece: piece.id(),
                    kind: piece.kind(),
                    rows_above,
                });
                controller.send_to_slot(piece.id(), slot);
            }
        }
        debug!(
            width = config.width,
            height = config.height,
            types = config.type_count,
            seed = config.seed,
            "board created"
        );
        Ok(controller)
    }
}

impl<E: EventSink, T: TypeSource> Controller<E, T> {
    /// Take over an existing board
    ///
    /// The board keeps its pieces where they are. Vacant slots are refilled
    /// and any matches are cascaded before the controller first goes idle.
    /// The board dimensions must equal the configured ones.
    pub fn with_board(
        config: BoardConfig,
        board: Board,
        types: T,
        sink: E,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if board.width() != config.width as usize || board.height() != config.height as usize {
            return Err(ConfigError::BoardSize {
                width: board.width(),
                height: board.height(),
                expected_width: config.width,
                expected_height: config.height,
            });
        }
        Ok(Self::assemble(config, board, types, sink))
    }

    fn assemble(config: BoardConfig, board: Board, types: T, sink: E) -> Self {
        Self {
            config,
            board,
            types,
            sink,
            phase: Phase::Shifting,
            selection: None,
            hint: None,
            hint_searched: false,
            idle_ms: 0,
            passes: 0,
            cleared: 0,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selection(&self) -> Option<SlotIndex> {
        self.selection
    }

    /// Currently shown hint
    pub fn hint(&self) -> Option<[SlotIndex; 3]> {
        self.hint
    }

    /// True once the hint search ran for the current idle period
    pub fn hint_searched(&self) -> bool {
        self.hint_searched
    }

    pub fn idle_ms(&self) -> u32 {
        self.idle_ms
    }

    /// `(passes, cleared)` of the running or most recent cascade
    pub fn cascade_stats(&self) -> (u32, u32) {
        (self.passes, self.cleared)
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut E {
        &mut self.sink
    }

    pub fn into_sink(self) -> E {
        self.sink
    }

    pub fn state(&self) -> ControllerState {
        match self.phase {
            Phase::Idle if self.selection.is_some() => ControllerState::Selecting,
            Phase::Idle => ControllerState::Idle,
            Phase::Swapping { .. } => ControllerState::PendingSwap,
            Phase::Resolving { .. } => ControllerState::Resolving,
            Phase::Reverting { .. } => ControllerState::Reverting,
            Phase::Disabling(_)
            | Phase::Shifting
            | Phase::Spawning { .. }
            | Phase::Settling
            | Phase::Detecting => ControllerState::Cascading,
        }
    }

    /// True while a swap or cascade is in flight
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.width = self.config.width;
        out.height = self.config.height;
        out.cells.clear();
        out.cells
            .extend((0..self.board.slot_count()).map(|i| self.board.kind_in(i)));
        out.state = self.state();
        out.selection = self.selection;
        out.hint = self.hint;
        out.moving = self.board.moving_pieces().count() as u32;
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Select a slot, or swap with the held selection when adjacent
    ///
    /// Out-of-range and vacant slots are ignored. With no selection the slot
    /// becomes the selection. With a selection held, an adjacent distinct slot
    /// starts a swap (ignored while busy); anything else replaces the
    /// selection. Returns false when the command was rejected.
    pub fn select_slot(&mut self, index: SlotIndex) -> bool {
        if !self.board.contains(index) || self.board.is_vacant(index) {
            return false;
        }
        match self.selection {
            Some(current) if current != index && self.board.are_adjacent(current, index) => {
                self.try_swap(current, index)
            }
            Some(current) if current == index => true,
            _ => {
                self.set_selection(Some(index));
                true
            }
        }
    }

    /// Drag gesture: select `index`, then its neighbour in `direction`
    ///
    /// The drag is a swap attempt, so it is rejected as a whole (selection
    /// untouched) while busy or when either cell is missing.
    pub fn select_neighbour(&mut self, index: SlotIndex, direction: Direction) -> bool {
        if self.is_busy() || !self.board.contains(index) || self.board.is_vacant(index) {
            return false;
        }
        let (x, y) = self.board.coord_of(index);
        let (dx, dy) = direction.delta();
        let Some(neighbour) = self.board.index_of(x as i32 + dx, y as i32 + dy) else {
            return false;
        };
        if self.board.is_vacant(neighbour) {
            return false;
        }
        if self.selection != Some(index) {
            self.set_selection(Some(index));
        }
        self.select_slot(neighbour)
    }

    /// Drop the selection; returns false when nothing was selected
    pub fn deselect_all(&mut self) -> bool {
        if self.selection.is_none() {
            return false;
        }
        self.set_selection(None);
        true
    }

    /// The motion collaborator reports that a piece reached its slot
    pub fn motion_complete(&mut self, piece: PieceId) -> bool {
        self.board.complete_motion(piece)
    }

    /// Advance one unit of work and the idle timer
    ///
    /// Returns true when the step made progress, false while idle or waiting
    /// for motion to finish.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let progressed = self.step();
        self.update_idle(elapsed_ms);
        progressed
    }

    /// Advance one unit of work without touching the idle timer
    pub fn step(&mut self) -> bool {
        match std::mem::take(&mut self.phase) {
            Phase::Idle => false,
            Phase::Swapping { a, b } => {
                if self.slot_in_motion(a) || self.slot_in_motion(b) {
                    self.phase = Phase::Swapping { a, b };
                    return false;
                }
                self.phase = Phase::Resolving { a, b };
                true
            }
            Phase::Resolving { a, b } => {
                self.resolve(a, b);
                true
            }
            Phase::Reverting { a, b } => {
                if self.slot_in_motion(a) || self.slot_in_motion(b) {
                    self.phase = Phase::Reverting { a, b };
                    return false;
                }
                trace!(a, b, "revert settled");
                true
            }
            Phase::Disabling(mut queue) => {
                if let Some(slot) = queue.pop_front() {
                    self.disable(slot);
                }
                self.phase = if queue.is_empty() {
                    Phase::Shifting
                } else {
                    Phase::Disabling(queue)
                };
                true
            }
            Phase::Shifting => {
                let moves = shift_down(&mut self.board);
                trace!(moved = moves.len(), "columns shifted");
                if !moves.is_empty() {
                    self.on_motion_started();
                }
                for m in moves {
                    self.send_to_slot(m.piece, m.to);
                }
                self.phase = Phase::Spawning { cursor: 0 };
                true
            }
            Phase::Spawning { cursor } => {
                let next = match next_vacancy(&self.board, cursor) {
                    Some(slot) => self.spawn(slot),
                    None => Phase::Settling,
                };
                self.phase = next;
                true
            }
            Phase::Settling => {
                if self.board.is_any_moving() {
                    self.phase = Phase::Settling;
                    return false;
                }
                self.phase = Phase::Detecting;
                true
            }
            Phase::Detecting => {
                let matches = find_all_matches(&self.board);
                if matches.is_empty() {
                    debug!(passes = self.passes, cleared = self.cleared, "board stable");
                    self.sink.notify(Notification::CascadeFinished {
                        passes: self.passes,
                        cleared: self.cleared,
                    });
                } else {
                    self.passes += 1;
                    debug!(pass = self.passes, cells = matches.len(), "cascade pass");
                    self.phase = Phase::Disabling(matches.into());
                }
                true
            }
        }
    }

    fn try_swap(&mut self, a: SlotIndex, b: SlotIndex) -> bool {
        if self.is_busy() {
            trace!(a, b, "swap rejected: busy");
            return false;
        }
        if !self.board.swap(a, b) {
            return false;
        }
        debug!(a, b, "swap started");
        self.set_selection(None);
        self.sink.notify(Notification::SwapStarted { a, b });
        self.on_motion_started();
        self.send_occupant(a);
        self.send_occupant(b);
        self.phase = Phase::Swapping { a, b };
        true
    }

    fn resolve(&mut self, a: SlotIndex, b: SlotIndex) {
        let mut matched = check_for_sequence(&self.board, a);
        matched.extend(check_for_sequence(&self.board, b));
        matched.sort_unstable();
        matched.dedup();

        if matched.is_empty() {
            debug!(a, b, "no match, reverting swap");
            self.board.swap(a, b);
            self.sink.notify(Notification::SwapReverted { a, b });
            self.on_motion_started();
            self.send_occupant(a);
            self.send_occupant(b);
            self.phase = Phase::Reverting { a, b };
            return;
        }

        self.passes = 1;
        self.cleared = 0;
        debug!(a, b, cells = matched.len(), "swap matched");
        self.phase = Phase::Disabling(matched.into());
    }

    fn disable(&mut self, slot: SlotIndex) {
        let Some(kind) = self.board.kind_in(slot) else {
            return;
        };
        if let Some(piece) = self.board.disable(slot) {
            self.cleared += 1;
            if self.selection == Some(slot) {
                self.set_selection(None);
            }
            self.sink.notify(Notification::PieceDisabled { slot, piece, kind });
        }
    }

    fn spawn(&mut self, slot: SlotIndex) -> Phase {
        let kind = self.types.next_type();
        let Some(piece) = refill_slot(&mut self.board, slot, kind) else {
            warn!(slot, "no recycled piece left for refill");
            return Phase::Settling;
        };
        self.on_motion_started();
        self.sink.notify(Notification::PieceSpawned {
            slot,
            piece,
            kind,
            rows_above: self.board.height() as u16,
        });
        self.send_to_slot(piece, slot);
        Phase::Spawning { cursor: slot + 1 }
    }

    fn update_idle(&mut self, elapsed_ms: u32) {
        if self.phase != Phase::Idle || self.board.is_any_moving() {
            self.idle_ms = 0;
            return;
        }
        self.idle_ms = self.idle_ms.saturating_add(elapsed_ms);
        if self.idle_ms <= self.config.hint_delay_ms || self.hint.is_some() || self.hint_searched {
            return;
        }
        self.hint_searched = true;
        self.hint = find_hint(&self.board);
        match self.hint {
            Some(slots) => {
                debug!(?slots, "hint found");
                self.sink.notify(Notification::HintShown { slots });
            }
            None => debug!("no hint available"),
        }
    }

    fn on_motion_started(&mut self) {
        self.idle_ms = 0;
        self.hint_searched = false;
        if self.hint.take().is_some() {
            self.sink.notify(Notification::HintCleared);
        }
    }

    fn set_selection(&mut self, slot: Option<SlotIndex>) {
        self.selection = slot;
        self.sink.notify(Notification::SelectionChanged { slot });
    }

    fn slot_in_motion(&self, slot: SlotIndex) -> bool {
        self.board.piece_in(slot).is_some_and(|p| p.is_in_motion())
    }

    fn send_occupant(&mut self, slot: SlotIndex) {
        if let Some(piece) = self.board.piece_in(slot).map(|p| p.id()) {
            self.send_to_slot(piece, slot);
        }
    }

    fn send_to_slot(&mut self, piece: PieceId, slot: SlotIndex) {
        let (x, y) = self.board.coord_of(slot);
        self.sink.notify(Notification::MotionTarget {
            piece,
            slot,
            x: x as u16,
            y: y as u16,
        });
    }
}

impl<T> Controller<Vec<Notification>, T> {
    /// Drain buffered notifications
    pub fn take_events(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedTypes;

    fn config_for(board: &Board) -> BoardConfig {
        BoardConfig {
            width: board.width() as u8,
            height: board.height() as u8,
            type_count: 6,
            hint_delay_ms: 100,
            seed: 1,
        }
    }

    fn controller(rows: &[&str], refill: &str) -> Controller<Vec<Notification>, ScriptedTypes> {
        let board = Board::from_rows(rows).unwrap();
        let config = config_for(&board);
        let mut c =
            Controller::with_board(config, board, ScriptedTypes::from_letters(refill), Vec::new())
                .unwrap();
        run_until_idle(&mut c);
        c.take_events();
        c
    }

    /// Stand-in motion collaborator: every moving piece arrives at once.
    fn run_until_idle<T: TypeSource>(c: &mut Controller<Vec<Notification>, T>) {
        for _ in 0..10_000 {
            let moving: Vec<_> = c.board().moving_pieces().collect();
            for id in moving {
                c.motion_complete(id);
            }
            c.tick(16);
            if !c.is_busy() && !c.board().is_any_moving() {
                return;
            }
        }
        panic!("controller never settled");
    }

    #[test]
    fn new_controller_drops_the_whole_board_in() {
        let mut c = Controller::new(BoardConfig::default(), Vec::new()).unwrap();
        let events = c.take_events();
        let spawned = events
            .iter()
            .filter(|e| matches!(e, Notification::PieceSpawned { rows_above: 8, .. }))
            .count();
        assert_eq!(spawned, 64);
        assert!(c.is_busy());
        assert_eq!(c.state(), ControllerState::Cascading);

        // Nothing settles until the mover reports arrivals.
        for _ in 0..10 {
            c.tick(16);
        }
        assert!(c.is_busy());

        run_until_idle(&mut c);
        assert!(c.board().is_full());
        assert!(find_all_matches(c.board()).is_empty());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = BoardConfig {
            type_count: 0,
            ..BoardConfig::default()
        };
        assert_eq!(
            Controller::new(config, Vec::new()).unwrap_err(),
            ConfigError::TypeCount(0)
        );
    }

    #[test]
    fn with_board_rejects_mismatched_size() {
        let board = Board::from_rows(&["ABC", "BCA", "CAB"]).unwrap();
        let err = Controller::with_board(
            BoardConfig::default(),
            board,
            ScriptedTypes::from_letters("A"),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::BoardSize { width: 3, .. }));
    }

    #[test]
    fn selection_then_replace() {
        let mut c = controller(&["ABC", "BCA", "CAB"], "D");
        assert_eq!(c.state(), ControllerState::Idle);

        assert!(c.select_slot(0));
        assert_eq!(c.state(), ControllerState::Selecting);
        // Diagonal: replaces the selection.
        assert!(c.select_slot(4));
        assert_eq!(c.selection(), Some(4));
        assert_eq!(
            c.take_events(),
            vec![
                Notification::SelectionChanged { slot: Some(0) },
                Notification::SelectionChanged { slot: Some(4) },
            ]
        );

        assert!(c.deselect_all());
        assert!(!c.deselect_all());
        assert_eq!(c.selection(), None);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut c = controller(&["ABC", "BCA", "CAB"], "D");
        assert!(!c.select_slot(9));
        assert_eq!(c.selection(), None);
        assert!(c.take_events().is_empty());
    }

    #[test]
    fn swap_without_match_reverts() {
        let mut c = controller(&["ABC", "BCA", "CAB"], "D");
        let before = c.board().clone();

        assert!(c.select_slot(0));
        assert!(c.select_slot(1));
        assert_eq!(c.state(), ControllerState::PendingSwap);
        assert_eq!(c.selection(), None);

        run_until_idle(&mut c);
        assert_eq!(c.board(), &before);

        let events = c.take_events();
        assert!(events.contains(&Notification::SwapStarted { a: 0, b: 1 }));
        assert!(events.contains(&Notification::SwapReverted { a: 0, b: 1 }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, Notification::PieceDisabled { .. })));
    }

    #[test]
    fn swap_is_rejected_while_busy() {
        let mut c = controller(&["ABC", "BCA", "CAB"], "D");
        assert!(c.select_slot(0));
        assert!(c.select_slot(1));

        // Pending swap in flight: a new adjacent pair is refused.
        assert!(c.select_slot(3));
        assert!(!c.select_slot(6));
        assert_eq!(c.selection(), Some(3));
        assert_eq!(c.state(), ControllerState::PendingSwap);
    }

    #[test]
    fn swap_with_match_cascades() {
        // Swapping (2,0) with (2,1) completes the bottom row of A.
        let mut c = controller(&["BCD", "CDA", "AAB"], "EFG");
        assert!(c.select_slot(2));
        assert!(c.select_slot(5));
        run_until_idle(&mut c);

        let events = c.take_events();
        let disabled = events
            .iter()
            .filter(|e| matches!(e, Notification::PieceDisabled { .. }))
            .count();
        assert_eq!(disabled, 3);
        assert!(events.contains(&Notification::CascadeFinished {
            passes: 1,
            cleared: 3
        }));
        assert!(c.board().is_full());
        assert_eq!(c.board().to_rows(), vec!["EFG", "BCD", "CDB"]);
    }

    #[test]
    fn drag_selects_neighbour() {
        let mut c = controller(&["BCD", "CDA", "AAB"], "EFG");
        assert!(c.select_neighbour(5, Direction::Down));
        assert_eq!(c.state(), ControllerState::PendingSwap);
        assert!(!c.select_neighbour(0, Direction::Left));
    }

    #[test]
    fn drag_while_busy_changes_nothing() {
        let mut c = controller(&["BCD", "CDA", "AAB"], "EFG");
        assert!(c.select_slot(2));
        assert!(c.select_slot(5));
        assert_eq!(c.state(), ControllerState::PendingSwap);
        c.take_events();

        assert!(!c.select_neighbour(0, Direction::Up));
        assert_eq!(c.selection(), None);
        assert!(c.take_events().is_empty());
        assert_eq!(c.state(), ControllerState::PendingSwap);
    }

    #[test]
    fn hint_waits_until_idle_exceeds_delay() {
        let mut c = controller(&["BCD", "CDA", "AAB"], "EFG");
        let idle = c.idle_ms();
        c.tick(100 - idle);
        assert_eq!(c.idle_ms(), 100);
        assert_eq!(c.hint(), None);
        assert!(!c.hint_searched());
        c.tick(1);
        assert!(c.hint().is_some());
    }

    #[test]
    fn hint_appears_after_idle_delay_and_clears_on_motion() {
        let mut c = controller(&["BCD", "CDA", "AAB"], "EFG");
        c.tick(50);
        assert_eq!(c.hint(), None);
        c.tick(60);
        assert!(c.hint().is_some());
        assert!(matches!(
            c.take_events().as_slice(),
            [Notification::HintShown { .. }]
        ));

        assert!(c.select_slot(0));
        assert!(c.select_slot(1));
        assert_eq!(c.hint(), None);
        assert!(c.take_events().contains(&Notification::HintCleared));
    }
}
