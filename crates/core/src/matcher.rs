//! Match detection
//!
//! Two detectors with different jobs:
//!
//! - [`check_for_sequence`] walks outward from one seed cell. The controller
//!   runs it on the two cells of a swap to decide between cascade and revert.
//! - [`find_all_matches`] sweeps a three-cell window over every row and
//!   column. The cascade loop runs it after each refill has settled.
//!
//! Both return sorted, deduplicated slot indices and report "no match" with
//! an empty vector.

use crate::board::Board;
use crate::types::{PieceType, SlotIndex, MIN_RUN};

/// Cells of the seed's column and row runs that reach [`MIN_RUN`]
///
/// Walks up and down from the seed while the type matches, then left and
/// right. Each run is counted with the seed included and contributes only if
/// it reaches three. The result holds the seed plus every contributing run
/// member, or nothing when neither run qualifies or the seed slot is vacant.
pub fn check_for_sequence(board: &Board, seed: SlotIndex) -> Vec<SlotIndex> {
    let Some(kind) = board.kind_in(seed) else {
        return Vec::new();
    };
    let (x, y) = board.coord_of(seed);
    let (x, y) = (x as i32, y as i32);

    let mut result = Vec::new();
    for axis in [(0, 1), (1, 0)] {
        let mut run = walk(board, kind, x, y, axis.0, axis.1);
        run.extend(walk(board, kind, x, y, -axis.0, -axis.1));
        if run.len() + 1 >= MIN_RUN {
            result.extend(run);
        }
    }

    if result.is_empty() {
        return result;
    }
    result.push(seed);
    result.sort_unstable();
    result.dedup();
    result
}

/// Same-type cells strictly beyond `(x, y)` in direction `(dx, dy)`
fn walk(board: &Board, kind: PieceType, x: i32, y: i32, dx: i32, dy: i32) -> Vec<SlotIndex> {
    let mut out = Vec::new();
    let (mut cx, mut cy) = (x + dx, y + dy);
    while let Some(slot) = board.index_of(cx, cy) {
        if board.kind_in(slot) != Some(kind) {
            break;
        }
        out.push(slot);
        cx += dx;
        cy += dy;
    }
    out
}

/// Every cell covered by a same-type window of three along a row or column
///
/// Row sweep: for each row, windows centred on `x in 1..width-1`. Column sweep:
/// for each column, windows centred on `y in 1..height-1`. A window with a
/// vacant cell never matches.
pub fn find_all_matches(board: &Board) -> Vec<SlotIndex> {
    let (w, h) = (board.width(), board.height());
    let mut hit = vec![false; board.slot_count()];

    for y in 0..h {
        for x in 1..w.saturating_sub(1) {
            let window = [y * w + x - 1, y * w + x, y * w + x + 1];
            mark_if_uniform(board, &window, &mut hit);
        }
    }
    for x in 0..w {
        for y in 1..h.saturating_sub(1) {
            let window = [(y - 1) * w + x, y * w + x, (y + 1) * w + x];
            mark_if_uniform(board, &window, &mut hit);
        }
    }

    hit.iter()
        .enumerate()
        .filter_map(|(i, &m)| m.then_some(i))
        .collect()
}

fn mark_if_uniform(board: &Board, window: &[SlotIndex; 3], hit: &mut [bool]) {
    let Some(kind) = board.kind_in(window[1]) else {
        return;
    };
    if board.kind_in(window[0]) == Some(kind) && board.kind_in(window[2]) == Some(kind) {
        for &slot in window {
            hit[slot] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_walk_on_short_row() {
        // Row [A, A, A, B, B] at indices 0-4.
        let board = Board::from_rows(&["AAABB"]).unwrap();
        assert_eq!(check_for_sequence(&board, 1), vec![0, 1, 2]);
        assert_eq!(check_for_sequence(&board, 0), vec![0, 1, 2]);
        assert!(check_for_sequence(&board, 3).is_empty());
        assert!(check_for_sequence(&board, 4).is_empty());
    }

    #[test]
    fn seed_walk_joins_column_and_row() {
        let board = Board::from_rows(&[
            "BAB", //
            "AAA", //
            "BAB",
        ])
        .unwrap();
        // Centre cell: full cross of five.
        assert_eq!(check_for_sequence(&board, 4), vec![1, 3, 4, 5, 7]);
        // Edge cell of the row: only the row qualifies.
        assert_eq!(check_for_sequence(&board, 3), vec![3, 4, 5]);
    }

    #[test]
    fn seed_walk_on_vacant_slot_is_empty() {
        let board = Board::from_rows(&["A.A"]).unwrap();
        assert!(check_for_sequence(&board, 1).is_empty());
    }

    #[test]
    fn seed_walk_counts_runs_longer_than_three() {
        let board = Board::from_rows(&["BAAAAB"]).unwrap();
        assert_eq!(check_for_sequence(&board, 2), vec![1, 2, 3, 4]);
    }

    #[test]
    fn sweep_finds_rows_and_columns() {
        let board = Board::from_rows(&[
            "ABCD", //
            "ABDC", //
            "ADDD", //
        ])
        .unwrap();
        // Column x=0 (slots 0, 4, 8) and the row y=0 from x=1 (slots 1, 2, 3).
        assert_eq!(find_all_matches(&board), vec![0, 1, 2, 3, 4, 8]);
    }

    #[test]
    fn sweep_deduplicates_crossing_runs() {
        let board = Board::from_rows(&[
            "BAB", //
            "AAA", //
            "BAB",
        ])
        .unwrap();
        assert_eq!(find_all_matches(&board), vec![1, 3, 4, 5, 7]);
    }

    #[test]
    fn sweep_ignores_vacancies() {
        let board = Board::from_rows(&["A.A", "...", "..."]).unwrap();
        assert!(find_all_matches(&board).is_empty());
    }

    #[test]
    fn sweep_on_stable_board_is_empty() {
        let board = Board::from_rows(&["ABA", "BAB", "ABA"]).unwrap();
        assert!(find_all_matches(&board).is_empty());
    }
}
