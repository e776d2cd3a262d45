//! Core types module - shared data structures and constants
//!
//! This module defines the plain data shared by the board engine and the
//! collaborators that drive and render it. Nothing here carries behaviour
//! beyond parsing and formatting, so the types can be used by the core
//! engine, a renderer, or a headless driver alike.
//!
//! # Board Geometry
//!
//! - **Default size**: 8 columns x 8 rows
//! - **Slot index**: `y * width + x`, row-major
//! - **Orientation**: `y = 0` is the bottom row; "above" means a larger `y`
//!
//! # Timing Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Suggested driver timestep (~60 FPS) |
//! | `DEFAULT_HINT_DELAY_MS` | 3000 | Idle time before a hint is searched |
//! | `DEFAULT_CELL_TRAVEL_MS` | 60 | Simulated travel time per cell |
//!
//! # Examples
//!
//! ```
//! use gemgrid_types::{Direction, PieceType, DEFAULT_WIDTH};
//!
//! let kind = PieceType::from_char('c').unwrap();
//! assert_eq!(kind, PieceType(2));
//! assert_eq!(kind.as_char(), 'C');
//!
//! assert_eq!(Direction::from_str("up"), Some(Direction::Up));
//! assert_eq!(Direction::Up.delta(), (0, 1));
//!
//! assert_eq!(DEFAULT_WIDTH, 8);
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells (8 columns)
pub const DEFAULT_WIDTH: u8 = 8;

/// Default board height in cells (8 rows)
pub const DEFAULT_HEIGHT: u8 = 8;

/// Default number of distinct piece types
pub const DEFAULT_TYPE_COUNT: u8 = 6;

/// Minimum run length that counts as a match
pub const MIN_RUN: usize = 3;

/// Suggested driver timestep in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Idle time before the controller searches for a hint
pub const DEFAULT_HINT_DELAY_MS: u32 = 3000;

/// Simulated travel time per cell used by the headless mover
pub const DEFAULT_CELL_TRAVEL_MS: u32 = 60;

/// Linear slot index, `y * width + x`.
pub type SlotIndex = usize;

/// Piece type identifier
///
/// Types are small integers `0..type_count`. For text rendering they map onto
/// letters: type 0 is `A`, type 1 is `B`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceType(pub u8);

impl PieceType {
    /// Parse a piece type from its letter (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use gemgrid_types::PieceType;
    ///
    /// assert_eq!(PieceType::from_char('A'), Some(PieceType(0)));
    /// assert_eq!(PieceType::from_char('z'), Some(PieceType(25)));
    /// assert_eq!(PieceType::from_char('.'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Some(PieceType(upper as u8 - b'A'))
        } else {
            None
        }
    }

    /// Letter used when printing boards; types past `Z` print as `?`
    pub fn as_char(&self) -> char {
        if self.0 < 26 {
            (b'A' + self.0) as char
        } else {
            '?'
        }
    }
}

/// Stable identity of a pooled piece
///
/// Pieces are never destroyed: a removed piece goes back to the recycle queue
/// and comes back later with a new type, keeping its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

/// Orthogonal direction, as produced by a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Cell offset `(dx, dy)`; up is `+y`
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Parse direction from string
    ///
    /// Accepts full names or single letters (case-insensitive):
    /// "up" | "u", "down" | "d", "left" | "l", "right" | "r"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Externally visible controller state
///
/// The cycle is `Idle → Selecting → PendingSwap → Resolving`, then either
/// `Cascading → Idle` (the swap made a match) or `Reverting → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControllerState {
    /// Nothing in flight, no selection
    Idle,
    /// Nothing in flight, one slot selected
    Selecting,
    /// Two pieces are travelling to each other's slots
    PendingSwap,
    /// Both swapped pieces arrived; the next step decides match or revert
    Resolving,
    /// Removal, gravity and refill passes are running
    Cascading,
    /// A swap without a match is travelling back
    Reverting,
}

impl ControllerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerState::Idle => "idle",
            ControllerState::Selecting => "selecting",
            ControllerState::PendingSwap => "pendingSwap",
            ControllerState::Resolving => "resolving",
            ControllerState::Cascading => "cascading",
            ControllerState::Reverting => "reverting",
        }
    }

    /// True while a swap or cascade is in flight
    pub fn is_busy(&self) -> bool {
        !matches!(self, ControllerState::Idle | ControllerState::Selecting)
    }
}

/// Notification emitted by the board engine for rendering collaborators
///
/// Every `MotionTarget` must eventually be answered with a motion-complete
/// report for that piece; the engine waits for it before detecting matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notification {
    /// The selected slot changed (`None` hides the cursor)
    SelectionChanged { slot: Option<SlotIndex> },
    /// A recycled piece was given a new type and placed above `slot`
    #[serde(rename_all = "camelCase")]
    PieceSpawned {
        slot: SlotIndex,
        piece: PieceId,
        kind: PieceType,
        rows_above: u16,
    },
    /// A matched piece left the board (spawn an explosion effect here)
    PieceDisabled {
        slot: SlotIndex,
        piece: PieceId,
        kind: PieceType,
    },
    /// A piece must travel to the cell `(x, y)` of `slot`
    ///
    /// Both name the same cell; `slot` is there for renderers that address
    /// cells by index, coordinate-based movers can ignore it.
    MotionTarget {
        piece: PieceId,
        slot: SlotIndex,
        x: u16,
        y: u16,
    },
    /// Two adjacent pieces started exchanging slots
    SwapStarted { a: SlotIndex, b: SlotIndex },
    /// The swap made no match and is travelling back
    SwapReverted { a: SlotIndex, b: SlotIndex },
    /// The board is stable again
    CascadeFinished { passes: u32, cleared: u32 },
    /// Three same-type cells suggesting an available move
    HintShown { slots: [SlotIndex; 3] },
    /// The previously shown hint is no longer valid
    HintCleared,
}

impl Notification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Notification::SelectionChanged { .. } => "selectionChanged",
            Notification::PieceSpawned { .. } => "pieceSpawned",
            Notification::PieceDisabled { .. } => "pieceDisabled",
            Notification::MotionTarget { .. } => "motionTarget",
            Notification::SwapStarted { .. } => "swapStarted",
            Notification::SwapReverted { .. } => "swapReverted",
            Notification::CascadeFinished { .. } => "cascadeFinished",
            Notification::HintShown { .. } => "hintShown",
            Notification::HintCleared => "hintCleared",
        }
    }
}
