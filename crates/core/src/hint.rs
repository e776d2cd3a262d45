//! Hint search
//!
//! Finds three same-type cells that suggest a move, for showing to an idle
//! player. This is a local heuristic over each cell's 3x3 block: it does not
//! prove that a single swap turns the triple into a match.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{PieceType, SlotIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    slot: SlotIndex,
    x: i32,
    y: i32,
}

/// First suggested triple in row-major scan order, or `None`
///
/// For every occupied cell the neighbour set is the cell itself plus the
/// same-type cells of its 3x3 block. Each pair in the set sharing a row or
/// column is then tested:
///
/// 1. a third set member off both rows and both columns of the pair, or
/// 2. for an adjacent pair, a same-type cell two steps beyond either end of
///    the pair along its axis.
///
/// The triple is returned as `[pair_high, pair_low, third]`, where `pair_high`
/// has the larger coordinate.
pub fn find_hint(board: &Board) -> Option<[SlotIndex; 3]> {
    for slot in 0..board.slot_count() {
        let Some(kind) = board.kind_in(slot) else {
            continue;
        };
        let set = neighbour_set(board, slot, kind);
        if set.len() < 2 {
            continue;
        }
        for i in 0..set.len() {
            for j in i + 1..set.len() {
                if let Some(triple) = test_pair(board, kind, &set, set[i], set[j]) {
                    return Some(triple);
                }
            }
        }
    }
    None
}

fn neighbour_set(board: &Board, slot: SlotIndex, kind: PieceType) -> ArrayVec<Cell, 9> {
    let (cx, cy) = board.coord_of(slot);
    let (cx, cy) = (cx as i32, cy as i32);
    let mut set = ArrayVec::new();
    set.push(Cell { slot, x: cx, y: cy });
    for dx in -1..=1 {
        for dy in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if let Some(i) = board.index_of(x, y) {
                if board.kind_in(i) == Some(kind) {
                    set.push(Cell { slot: i, x, y });
                }
            }
        }
    }
    set
}

fn test_pair(
    board: &Board,
    kind: PieceType,
    set: &[Cell],
    a: Cell,
    b: Cell,
) -> Option<[SlotIndex; 3]> {
    if a.x != b.x && a.y != b.y {
        return None;
    }
    let (high, low) = if a.x > b.x || a.y > b.y { (a, b) } else { (b, a) };

    let off_lines = |c: &Cell| c.x != high.x && c.y != high.y && c.x != low.x && c.y != low.y;
    if let Some(third) = set
        .iter()
        .filter(|c| **c != high && **c != low)
        .find(|c| off_lines(c))
    {
        return Some([high.slot, low.slot, third.slot]);
    }

    if (high.x - low.x).abs() + (high.y - low.y).abs() == 1 {
        let (dx, dy) = if high.y == low.y { (1, 0) } else { (0, 1) };
        let beyond = [
            (high.x + 2 * dx, high.y + 2 * dy),
            (low.x - 2 * dx, low.y - 2 * dy),
        ];
        for (x, y) in beyond {
            if let Some(i) = board.index_of(x, y) {
                if board.kind_in(i) == Some(kind) {
                    return Some([high.slot, low.slot, i]);
                }
            }
        }
    }
    None
}
