//! Board module - slots, pooled pieces and coordinate math
//!
//! The board is a `width x height` grid of slots. Slots never move; only the
//! piece occupying a slot changes. Slots are stored flat in row-major order
//! (`y * width + x`) with `y = 0` as the bottom row, so "above" is `y + 1`.
//!
//! Pieces live in an arena of exactly `width * height` entries and are never
//! destroyed. A matched piece is disabled and queued for reuse; a refill takes
//! the oldest disabled piece, gives it a new type and places it again.

use std::collections::VecDeque;

use thiserror::Error;

use crate::rng::TypeSource;
use crate::types::{PieceId, PieceType, SlotIndex};

/// A pooled board piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    id: PieceId,
    kind: PieceType,
    enabled: bool,
    slot: Option<SlotIndex>,
    in_motion: bool,
}

impl Piece {
    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceType {
        self.kind
    }

    /// True while the piece occupies a slot
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Slot currently occupied, `None` while the piece sits in the recycle queue
    pub fn slot(&self) -> Option<SlotIndex> {
        self.slot
    }

    /// True until the motion collaborator reports this piece arrived
    pub fn is_in_motion(&self) -> bool {
        self.in_motion
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("expected {expected} cells for a {width}x{height} board, got {actual}")]
    CellCount {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
    #[error("board rows must all have the same length (row {row} has {len}, expected {expected})")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("unrecognised cell {0:?} (use letters for types and '.' for vacant)")]
    BadCell(char),
    #[error("board must have at least one row and one column")]
    Empty,
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Occupant of each slot, row-major
    slots: Vec<Option<PieceId>>,
    /// Piece arena indexed by `PieceId`
    pieces: Vec<Piece>,
    /// Disabled pieces waiting to be reused, oldest first
    recycled: VecDeque<PieceId>,
}

impl Board {
    /// Create a fully populated board with types drawn from `source`
    ///
    /// Pieces start at rest; the initial board may already contain matches.
    pub fn populate(width: usize, height: usize, source: &mut impl TypeSource) -> Self {
        let count = width * height;
        let pieces = (0..count)
            .map(|i| Piece {
                id: PieceId(i as u32),
                kind: source.next_type(),
                enabled: true,
                slot: Some(i),
                in_motion: false,
            })
            .collect();
        Self {
            width,
            height,
            slots: (0..count).map(|i| Some(PieceId(i as u32))).collect(),
            pieces,
            recycled: VecDeque::new(),
        }
    }

    /// Create from a flat row-major list of cells (`y = 0` first)
    ///
    /// Vacant cells still get a pooled piece, parked in the recycle queue, so
    /// the arena always holds `width * height` pieces.
    pub fn from_kinds(
        width: usize,
        height: usize,
        kinds: &[Option<PieceType>],
    ) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::Empty);
        }
        let expected = width * height;
        if kinds.len() != expected {
            return Err(BoardError::CellCount {
                width,
                height,
                expected,
                actual: kinds.len(),
            });
        }

        let mut board = Self {
            width,
            height,
            slots: vec![None; expected],
            pieces: Vec::with_capacity(expected),
            recycled: VecDeque::new(),
        };
        for (i, kind) in kinds.iter().enumerate() {
            let id = PieceId(i as u32);
            match kind {
                Some(kind) => {
                    board.pieces.push(Piece {
                        id,
                        kind: *kind,
                        enabled: true,
                        slot: Some(i),
                        in_motion: false,
                    });
                    board.slots[i] = Some(id);
                }
                None => {
                    board.pieces.push(Piece {
                        id,
                        kind: PieceType(0),
                        enabled: false,
                        slot: None,
                        in_motion: false,
                    });
                    board.recycled.push_back(id);
                }
            }
        }
        Ok(board)
    }

    /// Create from text rows listed top row first
    ///
    /// Letters are piece types (`A` = 0), `.` is a vacant slot; spaces are
    /// ignored so rows can be written as `"A B C"`.
    ///
    /// ```
    /// use gemgrid_core::Board;
    ///
    /// let board = Board::from_rows(&["ABC", "AAB", "CCA"]).unwrap();
    /// assert_eq!(board.kind_at(0, 0).unwrap().as_char(), 'C');
    /// assert_eq!(board.kind_at(2, 2).unwrap().as_char(), 'C');
    /// ```
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let parsed: Vec<Vec<char>> = rows
            .iter()
            .map(|r| r.chars().filter(|c| !c.is_whitespace()).collect())
            .collect();
        let height = parsed.len();
        let width = parsed.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(BoardError::Empty);
        }

        let mut kinds = vec![None; width * height];
        for (row, cells) in parsed.iter().enumerate() {
            if cells.len() != width {
                return Err(BoardError::RaggedRow {
                    row,
                    len: cells.len(),
                    expected: width,
                });
            }
            let y = height - 1 - row;
            for (x, &c) in cells.iter().enumerate() {
                kinds[y * width + x] = match c {
                    '.' => None,
                    _ => Some(PieceType::from_char(c).ok_or(BoardError::BadCell(c))?),
                };
            }
        }
        Self::from_kinds(width, height, &kinds)
    }

    /// Text rows, top row first, in the format accepted by [`Board::from_rows`]
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .rev()
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        self.kind_in(y * self.width + x)
                            .map_or('.', |kind| kind.as_char())
                    })
                    .collect()
            })
            .collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Derived coordinate of a slot: `(index mod width, index / width)`
    #[inline(always)]
    pub fn coord_of(&self, index: SlotIndex) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Slot index of `(x, y)`, or `None` outside the board
    #[inline(always)]
    pub fn index_of(&self, x: i32, y: i32) -> Option<SlotIndex> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn contains(&self, index: SlotIndex) -> bool {
        index < self.slots.len()
    }

    /// Piece at `(x, y)`; `None` outside the board or when the slot is vacant
    pub fn piece_at(&self, x: i32, y: i32) -> Option<&Piece> {
        self.index_of(x, y).and_then(|i| self.piece_in(i))
    }

    /// Piece occupying a slot
    pub fn piece_in(&self, slot: SlotIndex) -> Option<&Piece> {
        self.slots
            .get(slot)
            .copied()
            .flatten()
            .map(|id| &self.pieces[id.0 as usize])
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0 as usize)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn kind_at(&self, x: i32, y: i32) -> Option<PieceType> {
        self.piece_at(x, y).map(Piece::kind)
    }

    pub fn kind_in(&self, slot: SlotIndex) -> Option<PieceType> {
        self.piece_in(slot).map(Piece::kind)
    }

    /// True for an in-range slot without an occupant
    pub fn is_vacant(&self, slot: SlotIndex) -> bool {
        matches!(self.slots.get(slot), Some(None))
    }

    /// True when no slot is vacant
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Strict orthogonal neighbours: the two cells lie at Euclidean distance 1
    ///
    /// Symmetric, false for a slot paired with itself, for diagonals and for
    /// out-of-range indices.
    pub fn are_adjacent(&self, a: SlotIndex, b: SlotIndex) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        let (ax, ay) = self.coord_of(a);
        let (bx, by) = self.coord_of(b);
        let dx = ax.abs_diff(bx);
        let dy = ay.abs_diff(by);
        dx * dx + dy * dy == 1
    }

    /// Put a piece into a (normally vacant) slot and send it there
    ///
    /// The piece leaves whatever slot it held and is enabled and marked in
    /// motion until [`Board::complete_motion`] is called for it. Returns false
    /// for an unknown piece or slot.
    pub fn set_piece(&mut self, slot: SlotIndex, id: PieceId) -> bool {
        if !self.contains(slot) || self.piece(id).is_none() {
            return false;
        }
        let idx = id.0 as usize;
        if let Some(prev) = self.pieces[idx].slot {
            if self.slots[prev] == Some(id) {
                self.slots[prev] = None;
            }
        }
        if let Some(displaced) = self.slots[slot] {
            if displaced != id {
                self.pieces[displaced.0 as usize].slot = None;
            }
        }
        self.slots[slot] = Some(id);
        let piece = &mut self.pieces[idx];
        piece.slot = Some(slot);
        piece.enabled = true;
        piece.in_motion = true;
        true
    }

    /// Exchange the occupants of two occupied slots; both start moving
    pub fn swap(&mut self, a: SlotIndex, b: SlotIndex) -> bool {
        let (Some(pa), Some(pb)) = (
            self.slots.get(a).copied().flatten(),
            self.slots.get(b).copied().flatten(),
        ) else {
            return false;
        };
        if a == b {
            return false;
        }
        self.slots[a] = Some(pb);
        self.slots[b] = Some(pa);
        for (id, slot) in [(pa, b), (pb, a)] {
            let piece = &mut self.pieces[id.0 as usize];
            piece.slot = Some(slot);
            piece.in_motion = true;
        }
        true
    }

    /// Remove the occupant of a slot and queue it for reuse
    pub fn disable(&mut self, slot: SlotIndex) -> Option<PieceId> {
        let id = self.slots.get_mut(slot)?.take()?;
        let piece = &mut self.pieces[id.0 as usize];
        piece.enabled = false;
        piece.slot = None;
        piece.in_motion = false;
        self.recycled.push_back(id);
        Some(id)
    }

    /// Oldest disabled piece, removed from the queue
    pub fn take_recycled(&mut self) -> Option<PieceId> {
        self.recycled.pop_front()
    }

    pub fn recycled_len(&self) -> usize {
        self.recycled.len()
    }

    pub(crate) fn set_kind(&mut self, id: PieceId, kind: PieceType) {
        if let Some(piece) = self.pieces.get_mut(id.0 as usize) {
            piece.kind = kind;
        }
    }

    /// Record that a piece reached its slot
    ///
    /// Returns false when the piece is unknown, disabled or already at rest.
    pub fn complete_motion(&mut self, id: PieceId) -> bool {
        match self.pieces.get_mut(id.0 as usize) {
            Some(piece) if piece.enabled && piece.in_motion => {
                piece.in_motion = false;
                true
            }
            _ => false,
        }
    }

    /// Mark every enabled piece as travelling to its slot
    pub(crate) fn set_all_in_motion(&mut self) {
        for piece in self.pieces.iter_mut().filter(|p| p.enabled) {
            piece.in_motion = true;
        }
    }

    /// True while any enabled piece is still travelling
    pub fn is_any_moving(&self) -> bool {
        self.pieces.iter().any(|p| p.enabled && p.in_motion)
    }

    /// Enabled pieces still travelling, in id order
    pub fn moving_pieces(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces
            .iter()
            .filter(|p| p.enabled && p.in_motion)
            .map(|p| p.id)
    }

    /// Type grid, row-major from the bottom row
    pub fn kinds(&self) -> Vec<Option<PieceType>> {
        (0..self.slots.len()).map(|i| self.kind_in(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedTypes;

    fn board_3x3() -> Board {
        Board::from_rows(&["GHI", "DEF", "ABC"]).unwrap()
    }

    #[test]
    fn test_coordinates_roundtrip() {
        let board = Board::from_rows(&["ABCD", "BCDA", "CDAB"]).unwrap();
        for i in 0..board.slot_count() {
            let (x, y) = board.coord_of(i);
            assert_eq!(board.index_of(x as i32, y as i32), Some(i));
        }
        assert_eq!(board.coord_of(5), (1, 1));
        assert_eq!(board.index_of(3, 2), Some(11));
    }

    #[test]
    fn test_index_of_out_of_bounds() {
        let board = board_3x3();
        assert_eq!(board.index_of(-1, 0), None);
        assert_eq!(board.index_of(0, -1), None);
        assert_eq!(board.index_of(3, 0), None);
        assert_eq!(board.index_of(0, 3), None);
    }

    #[test]
    fn test_rows_are_listed_top_first() {
        let board = board_3x3();
        // Bottom-left is slot 0.
        assert_eq!(board.kind_in(0), Some(PieceType(0)));
        assert_eq!(board.kind_at(2, 2), Some(PieceType::from_char('I').unwrap()));
        assert_eq!(board.to_rows(), vec!["GHI", "DEF", "ABC"]);
    }

    #[test]
    fn test_from_rows_errors() {
        assert_eq!(
            Board::from_rows(&["AB", "ABC"]),
            Err(BoardError::RaggedRow {
                row: 1,
                len: 3,
                expected: 2
            })
        );
        assert_eq!(Board::from_rows(&["A#"]), Err(BoardError::BadCell('#')));
        assert_eq!(Board::from_rows(&[]), Err(BoardError::Empty));
    }

    #[test]
    fn test_from_kinds_wrong_length() {
        let err = Board::from_kinds(3, 3, &[None; 4]).unwrap_err();
        assert_eq!(
            err,
            BoardError::CellCount {
                width: 3,
                height: 3,
                expected: 9,
                actual: 4
            }
        );
    }

    #[test]
    fn test_vacant_cells_feed_the_recycle_queue() {
        let board = Board::from_rows(&["A.", ".B"]).unwrap();
        assert_eq!(board.pieces().len(), 4);
        assert_eq!(board.recycled_len(), 2);
        assert!(board.is_vacant(0));
        assert!(!board.is_full());
    }

    #[test]
    fn test_populate_fills_every_slot() {
        let mut source = ScriptedTypes::from_letters("ABC");
        let board = Board::populate(4, 3, &mut source);
        assert!(board.is_full());
        assert!(!board.is_any_moving());
        // Slot i gets the i-th scripted type, bottom row first.
        assert_eq!(board.to_rows(), vec!["CABC", "BCAB", "ABCA"]);
    }

    #[test]
    fn test_adjacency() {
        let board = board_3x3();
        assert!(board.are_adjacent(4, 1));
        assert!(board.are_adjacent(4, 3));
        assert!(board.are_adjacent(4, 5));
        assert!(board.are_adjacent(4, 7));
        // Diagonal
        assert!(!board.are_adjacent(4, 0));
        // Self
        assert!(!board.are_adjacent(4, 4));
        // Row wrap: (2,0) and (0,1) are consecutive indices but not neighbours
        assert!(!board.are_adjacent(2, 3));
        // Out of range
        assert!(!board.are_adjacent(8, 9));
    }

    #[test]
    fn test_swap_marks_both_in_motion() {
        let mut board = board_3x3();
        let before_a = board.piece_in(0).unwrap().id();
        let before_b = board.piece_in(1).unwrap().id();

        assert!(board.swap(0, 1));
        assert_eq!(board.piece_in(0).unwrap().id(), before_b);
        assert_eq!(board.piece_in(1).unwrap().id(), before_a);
        assert_eq!(board.piece(before_a).unwrap().slot(), Some(1));
        assert!(board.is_any_moving());

        assert!(board.complete_motion(before_a));
        assert!(board.complete_motion(before_b));
        assert!(!board.complete_motion(before_b));
        assert!(!board.is_any_moving());
    }

    #[test]
    fn test_disable_and_reuse() {
        let mut board = board_3x3();
        let id = board.disable(4).unwrap();
        assert!(board.is_vacant(4));
        assert!(!board.piece(id).unwrap().is_enabled());
        assert_eq!(board.disable(4), None);

        let reused = board.take_recycled().unwrap();
        assert_eq!(reused, id);
        assert!(board.set_piece(4, reused));
        assert!(board.is_full());
        assert!(board.piece(reused).unwrap().is_in_motion());
    }

    #[test]
    fn test_set_piece_vacates_previous_slot() {
        let mut board = Board::from_rows(&["A", ".", "."]).unwrap();
        let id = board.piece_in(2).unwrap().id();
        assert!(board.set_piece(0, id));
        assert!(board.is_vacant(2));
        assert_eq!(board.piece_in(0).unwrap().id(), id);
        assert!(!board.set_piece(9, id));
    }
}
