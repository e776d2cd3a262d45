//! Core board engine - pure, deterministic, and testable
//!
//! This crate contains the match-3 rules and the state machine that applies
//! them. It has **zero dependencies** on rendering, input or I/O:
//!
//! - **Deterministic**: the same seed (or scripted type source) produces the
//!   same board and the same cascades
//! - **Tick-driven**: long procedures advance one unit of work per tick; the
//!   engine never reads a clock or waits on a timer
//! - **Collaborator-agnostic**: motion, rendering and input live outside and
//!   talk to the engine through commands and [`Notification`](types::Notification)s
//!
//! # Module Structure
//!
//! - [`board`]: slots, the pooled piece arena and coordinate math
//! - [`matcher`]: seed-walk and whole-board match detection
//! - [`gravity`]: column compaction and refill from the recycle queue
//! - [`hint`]: heuristic search for an available move
//! - [`controller`]: selection, swap, revert and the cascade loop
//! - [`rng`]: piece type sources (seeded random, scripted)
//! - [`config`]: validated construction-time configuration
//! - [`snapshot`]: render-ready copy of the visible state
//!
//! # Game Rules
//!
//! - **Swap**: only two orthogonally adjacent pieces may be exchanged
//! - **Match**: three or more same-type pieces in a row or column
//! - **Revert**: a swap that makes no match is exchanged back
//! - **Cascade**: matched pieces are removed, the columns fall, the gaps are
//!   refilled with random types and the board is swept again until stable
//! - **Hint**: after the board sits idle for `hint_delay_ms` a likely move
//!   is suggested
//!
//! # Example
//!
//! ```
//! use gemgrid_core::{Board, BoardConfig, Controller, ScriptedTypes};
//! use gemgrid_core::types::ControllerState;
//!
//! let board = Board::from_rows(&["BCD", "CDA", "AAB"]).unwrap();
//! let config = BoardConfig { width: 3, height: 3, ..BoardConfig::default() };
//! let mut c = Controller::with_board(config, board, ScriptedTypes::from_letters("EFG"), Vec::new())
//!     .unwrap();
//!
//! // Settle the (already stable) board.
//! while c.is_busy() {
//!     c.tick(16);
//! }
//!
//! assert!(c.select_slot(2));
//! assert!(c.select_slot(5));
//! assert_eq!(c.state(), ControllerState::PendingSwap);
//! ```
//!
//! # Timing
//!
//! Call [`Controller::tick`](controller::Controller::tick) every frame with the
//! elapsed time. The elapsed time only feeds the idle-hint timer; motion is
//! finished when the collaborator calls
//! [`Controller::motion_complete`](controller::Controller::motion_complete).

pub mod board;
pub mod config;
pub mod controller;
pub mod events;
pub mod gravity;
pub mod hint;
pub mod matcher;
pub mod rng;
pub mod snapshot;

pub use gemgrid_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardError, Piece};
pub use config::{BoardConfig, ConfigError};
pub use controller::Controller;
pub use events::{Discard, EventSink};
pub use gravity::{next_vacancy, refill_all, refill_slot, shift_down, SlotMove};
pub use hint::find_hint;
pub use matcher::{check_for_sequence, find_all_matches};
pub use rng::{RandomTypes, ScriptedTypes, TypeSource};
pub use snapshot::BoardSnapshot;
