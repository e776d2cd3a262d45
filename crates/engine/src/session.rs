//! Headless session - the frame loop around a controller
//!
//! A session plays every external role the board engine expects: it feeds
//! notifications to a [`LinearMover`], reports arrivals back as motion
//! completions, ticks the controller at a fixed timestep and, with autoplay
//! on, turns each shown hint into a swap.
//!
//! # Frame Order
//!
//! | Step | Work |
//! |------|------|
//! | 1 | Forward notifications raised by commands since the last frame |
//! | 2 | Advance the mover by `tick_ms` and report arrivals |
//! | 3 | `Controller::tick(tick_ms)` |
//! | 4 | Forward the notifications of this tick |
//! | 5 | Autoplay, when enabled and the board is idle |

use tracing::{debug, info};

use gemgrid_core::types::{
    Notification, SlotIndex, DEFAULT_CELL_TRAVEL_MS, TICK_MS,
};
use gemgrid_core::{BoardConfig, ConfigError, Controller, RandomTypes, TypeSource};

use crate::mover::LinearMover;
use crate::plan::{find_swap, plan_swap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Fixed timestep per frame
    pub tick_ms: u32,
    /// Simulated travel time per cell
    pub cell_travel_ms: u32,
    /// Play the shown hints automatically
    pub autoplay: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            cell_travel_ms: DEFAULT_CELL_TRAVEL_MS,
            autoplay: true,
        }
    }
}

#[derive(Debug)]
pub struct Session<T = RandomTypes> {
    controller: Controller<Vec<Notification>, T>,
    mover: LinearMover,
    options: SessionOptions,
    frame: Vec<Notification>,
    ticks: u64,
    swaps: u32,
    stuck: bool,
}

impl Session<RandomTypes> {
    pub fn new(config: BoardConfig, options: SessionOptions) -> Result<Self, ConfigError> {
        let controller = Controller::new(config, Vec::new())?;
        Ok(Self::with_controller(controller, options))
    }
}

impl<T: TypeSource> Session<T> {
    /// Wrap an existing controller; notifications it already buffered are
    /// delivered on the first frame
    pub fn with_controller(
        controller: Controller<Vec<Notification>, T>,
        options: SessionOptions,
    ) -> Self {
        Self {
            controller,
            mover: LinearMover::new(options.cell_travel_ms),
            options,
            frame: Vec::new(),
            ticks: 0,
            swaps: 0,
            stuck: false,
        }
    }

    pub fn controller(&self) -> &Controller<Vec<Notification>, T> {
        &self.controller
    }

    pub fn mover(&self) -> &LinearMover {
        &self.mover
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Notifications delivered during the last frame
    pub fn frame(&self) -> &[Notification] {
        &self.frame
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Swaps started by this session (manual and autoplay)
    pub fn swaps(&self) -> u32 {
        self.swaps
    }

    /// Autoplay found no move left on the board
    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    /// Controller idle and nothing on screen moving
    pub fn is_settled(&self) -> bool {
        !self.controller.is_busy() && self.mover.is_idle() && !self.controller.board().is_any_moving()
    }

    /// Run one frame and return its notifications
    pub fn tick(&mut self) -> &[Notification] {
        self.frame.clear();
        self.ticks += 1;

        self.forward();
        for piece in self.mover.advance(self.options.tick_ms) {
            self.controller.motion_complete(piece);
        }
        self.controller.tick(self.options.tick_ms);
        self.forward();

        if self.options.autoplay {
            self.autoplay();
            self.forward();
        }
        &self.frame
    }

    /// Select `a` then `b`; true when a swap started
    pub fn swap(&mut self, a: SlotIndex, b: SlotIndex) -> bool {
        if self.controller.is_busy() {
            return false;
        }
        self.controller.deselect_all();
        let started = self.controller.select_slot(a)
            && self.controller.select_slot(b)
            && self.controller.is_busy();
        if started {
            self.swaps += 1;
        } else {
            self.controller.deselect_all();
        }
        started
    }

    /// Tick until settled; false if `max_ticks` ran out first
    pub fn run_until_settled(&mut self, max_ticks: u64) -> bool {
        for _ in 0..max_ticks {
            self.tick();
            if self.is_settled() {
                return true;
            }
        }
        false
    }

    /// Autoplay until `moves` swaps have resolved, the board is stuck, or
    /// `max_ticks` frames have run; returns the swaps made
    pub fn play(&mut self, moves: u32, max_ticks: u64) -> u32 {
        for _ in 0..max_ticks {
            self.tick();
            if self.stuck || (self.swaps >= moves && self.is_settled()) {
                break;
            }
        }
        self.swaps
    }

    fn forward(&mut self) {
        for n in self.controller.take_events() {
            self.mover.observe(&n);
            self.frame.push(n);
        }
    }

    fn autoplay(&mut self) {
        if self.stuck || !self.is_settled() {
            return;
        }
        let planned = match self.controller.hint() {
            Some(hint) => plan_swap(self.controller.board(), hint)
                .map_err(|err| debug!(code = err.code(), %err, ?hint, "hint not playable"))
                .ok(),
            // Nothing to play until the idle search has run.
            None if !self.controller.hint_searched() => return,
            None => None,
        };
        let Some((a, b)) = planned.or_else(|| find_swap(self.controller.board())) else {
            info!(swaps = self.swaps, "no moves left");
            self.stuck = true;
            return;
        };
        debug!(a, b, "autoplay swap");
        self.swap(a, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemgrid_core::{Board, ScriptedTypes};

    fn session(rows: &[&str], refill: &str, autoplay: bool) -> Session<ScriptedTypes> {
        let board = Board::from_rows(rows).unwrap();
        let config = BoardConfig {
            width: board.width() as u8,
            height: board.height() as u8,
            type_count: 6,
            hint_delay_ms: 64,
            seed: 1,
        };
        let controller =
            Controller::with_board(config, board, ScriptedTypes::from_letters(refill), Vec::new())
                .unwrap();
        Session::with_controller(
            controller,
            SessionOptions {
                tick_ms: 16,
                cell_travel_ms: 32,
                autoplay,
            },
        )
    }

    #[test]
    fn manual_swap_resolves_through_the_mover() {
        let mut s = session(&["BCD", "CDA", "AAB"], "EFG", false);
        assert!(s.run_until_settled(100));

        assert!(s.swap(2, 5));
        assert!(!s.swap(0, 1));
        assert!(s.run_until_settled(1_000));
        assert_eq!(s.controller().board().to_rows(), vec!["EFG", "BCD", "CDB"]);
        assert_eq!(s.swaps(), 1);
    }

    #[test]
    fn manual_swap_rejects_far_pair() {
        let mut s = session(&["BCD", "CDA", "AAB"], "EFG", false);
        assert!(s.run_until_settled(100));
        assert!(!s.swap(0, 8));
        assert_eq!(s.controller().selection(), None);
        assert_eq!(s.swaps(), 0);
    }

    #[test]
    fn autoplay_follows_the_hint() {
        let mut s = session(&["BCD", "CDA", "AAB"], "EFG", true);
        let swaps = s.play(1, 2_000);
        assert_eq!(swaps, 1);
        assert!(s.is_settled());
        assert_eq!(s.controller().board().to_rows(), vec!["EFG", "BCD", "CDB"]);
    }

    #[test]
    fn autoplay_stops_when_no_move_is_left() {
        let mut s = session(&["ABC", "DEF", "BAG"], "H", true);
        s.play(5, 2_000);
        assert!(s.is_stuck());
        assert_eq!(s.swaps(), 0);
    }
}
