//! Swap planning
//!
//! The hint search only names three cells; it does not say which two pieces to
//! exchange. The planner tries the orthogonal swaps touching the hinted cells
//! on a scratch copy of the board and keeps the first one the seed-walk
//! accepts.

use thiserror::Error;
use tracing::instrument;

use gemgrid_core::types::{Direction, SlotIndex};
use gemgrid_core::{check_for_sequence, Board};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("hint slot {0} is outside the board or vacant")]
    BadSlot(SlotIndex),
    #[error("hinted cells do not share a type")]
    MixedTypes,
    #[error("no single swap around the hinted cells makes a match")]
    NoSwap,
}

impl PlanError {
    pub fn code(self) -> &'static str {
        match self {
            PlanError::BadSlot(_) | PlanError::MixedTypes => "invalid_hint",
            PlanError::NoSwap => "no_swap",
        }
    }
}

/// True when exchanging `a` and `b` would make a match at either cell
pub fn swap_makes_match(board: &Board, a: SlotIndex, b: SlotIndex) -> bool {
    if !board.are_adjacent(a, b) {
        return false;
    }
    let mut scratch = board.clone();
    if !scratch.swap(a, b) {
        return false;
    }
    !check_for_sequence(&scratch, a).is_empty() || !check_for_sequence(&scratch, b).is_empty()
}

/// Turn a hinted triple into a concrete adjacent swap
///
/// Swaps are tried for each hinted cell in order, against its neighbours in
/// [`Direction::ALL`] order.
#[instrument(level = "trace", skip(board))]
pub fn plan_swap(board: &Board, hint: [SlotIndex; 3]) -> Result<(SlotIndex, SlotIndex), PlanError> {
    let mut kind = None;
    for slot in hint {
        let Some(k) = board.kind_in(slot) else {
            return Err(PlanError::BadSlot(slot));
        };
        match kind {
            None => kind = Some(k),
            Some(prev) if prev != k => return Err(PlanError::MixedTypes),
            Some(_) => {}
        }
    }

    for slot in hint {
        let (x, y) = board.coord_of(slot);
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            let Some(other) = board.index_of(x as i32 + dx, y as i32 + dy) else {
                continue;
            };
            if swap_makes_match(board, slot, other) {
                return Ok((slot, other));
            }
        }
    }
    Err(PlanError::NoSwap)
}

/// First matching swap in ascending slot order, checking right then up
///
/// Exhaustive where [`find_hint`](gemgrid_core::find_hint) is heuristic.
#[instrument(level = "trace", skip_all)]
pub fn find_swap(board: &Board) -> Option<(SlotIndex, SlotIndex)> {
    for slot in 0..board.slot_count() {
        let (x, y) = board.coord_of(slot);
        for (dx, dy) in [(1, 0), (0, 1)] {
            if let Some(other) = board.index_of(x as i32 + dx, y as i32 + dy) {
                if swap_makes_match(board, slot, other) {
                    return Some((slot, other));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemgrid_core::find_hint;

    #[test]
    fn plan_from_gap_hint() {
        let board = Board::from_rows(&[
            "GHIJ", //
            "CDEF", //
            "AABA",
        ])
        .unwrap();
        let hint = find_hint(&board).unwrap();
        let (a, b) = plan_swap(&board, hint).unwrap();
        assert!(swap_makes_match(&board, a, b));
        // The lone A at (3,0) must slide into the gap at (2,0).
        assert_eq!((a, b), (3, 2));
    }

    #[test]
    fn plan_from_diagonal_hint() {
        let board = Board::from_rows(&["BCA", "AAD"]).unwrap();
        let hint = find_hint(&board).unwrap();
        assert_eq!(hint, [1, 0, 5]);
        // Only the A at (2,1) can complete the row, by swapping down with the D.
        assert_eq!(plan_swap(&board, hint), Ok((5, 2)));
    }

    #[test]
    fn plan_rejects_bad_hints() {
        let board = Board::from_rows(&["AB.", "ABC", "CAB"]).unwrap();
        assert_eq!(plan_swap(&board, [8, 0, 1]), Err(PlanError::BadSlot(8)));
        assert_eq!(plan_swap(&board, [0, 1, 2]), Err(PlanError::MixedTypes));
        assert_eq!(PlanError::MixedTypes.code(), "invalid_hint");
    }

    #[test]
    fn heuristic_hint_without_real_move() {
        // Only two A on the board: no swap can line up three of them.
        let board = Board::from_rows(&[
            "ABC", //
            "DEF", //
            "BAG",
        ])
        .unwrap();
        assert!(find_swap(&board).is_none());
        assert_eq!(plan_swap(&board, [1, 1, 6]), Err(PlanError::NoSwap));
    }

    #[test]
    fn find_swap_scans_exhaustively() {
        let board = Board::from_rows(&[
            "ABCD", //
            "CDAB", //
            "AACB",
        ])
        .unwrap();
        let (a, b) = find_swap(&board).unwrap();
        assert!(swap_makes_match(&board, a, b));
        assert_eq!((a, b), (2, 6));
    }

    #[test]
    fn non_adjacent_swaps_never_match() {
        let board = Board::from_rows(&["AAB", "CDA", "BCD"]).unwrap();
        assert!(!swap_makes_match(&board, 0, 2));
        assert!(!swap_makes_match(&board, 0, 4));
    }
}
