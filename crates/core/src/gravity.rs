//! Gravity and refill
//!
//! After matched pieces are removed, surviving pieces fall to fill the gaps
//! below them and the slots left empty at the top of each column get recycled
//! pieces with fresh types. Every moved or spawned piece is left in motion;
//! the caller must wait for all of them to settle before detecting again.

use crate::board::Board;
use crate::rng::TypeSource;
use crate::types::{PieceId, PieceType, SlotIndex};

/// A piece pulled down from `from` into `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotMove {
    pub piece: PieceId,
    pub from: SlotIndex,
    pub to: SlotIndex,
}

/// Compact every column downward in a single pass
///
/// Slots are visited in ascending index order, so each column is walked from
/// the bottom up. A vacant slot pulls the first enabled piece found above it
/// in the same column, which leaves that source slot vacant for a later visit.
/// Relative order within a column is preserved.
pub fn shift_down(board: &mut Board) -> Vec<SlotMove> {
    let (w, h) = (board.width(), board.height());
    let mut moves = Vec::new();

    for slot in 0..board.slot_count() {
        if !board.is_vacant(slot) {
            continue;
        }
        let (x, y) = board.coord_of(slot);
        let found = (y + 1..h).find_map(|above| {
            let source = above * w + x;
            board
                .piece_in(source)
                .filter(|p| p.is_enabled())
                .map(|p| (source, p.id()))
        });
        if let Some((from, piece)) = found {
            board.set_piece(slot, piece);
            moves.push(SlotMove {
                piece,
                from,
                to: slot,
            });
        }
    }
    moves
}

/// First vacant slot at or after `from`
pub fn next_vacancy(board: &Board, from: SlotIndex) -> Option<SlotIndex> {
    (from..board.slot_count()).find(|&slot| board.is_vacant(slot))
}

/// Place the oldest recycled piece into a vacant slot with a new type
///
/// Returns `None` when the slot is occupied or the recycle queue is empty.
pub fn refill_slot(board: &mut Board, slot: SlotIndex, kind: PieceType) -> Option<PieceId> {
    if !board.is_vacant(slot) {
        return None;
    }
    let id = board.take_recycled()?;
    board.set_kind(id, kind);
    board.set_piece(slot, id);
    Some(id)
}

/// Refill every vacancy at once, in ascending slot order
pub fn refill_all(board: &mut Board, source: &mut impl TypeSource) -> Vec<(SlotIndex, PieceId)> {
    let mut spawned = Vec::new();
    let mut cursor = 0;
    while let Some(slot) = next_vacancy(board, cursor) {
        match refill_slot(board, slot, source.next_type()) {
            Some(id) => spawned.push((slot, id)),
            None => break,
        }
        cursor = slot + 1;
    }
    spawned
}
