//! Clearing matched cells and settling the survivors toward the rim.

use super::grid::{Board, EMPTY};
use super::matcher::Match;

/// Clear every nonzero cell referenced by `matches`, then settle each sector.
/// Returns the number of cells actually cleared; a cell referenced twice is
/// counted once.
pub fn apply_matches(board: &mut Board, matches: &[Match]) -> u32 {
    let mut cleared = 0;
    for idx in matches.iter().flat_map(|m| m.indices.iter()) {
        let idx = *idx as usize;
        if board.get(idx).is_some_and(|c| c != EMPTY) {
            board.set(idx, EMPTY);
            cleared += 1;
        }
    }
    settle(board);
    cleared
}

/// Pack every sector's blocks against the outermost ring, keeping their
/// inner-to-outer order. Gaps end up next to the spawn ring.
pub fn settle(board: &mut Board) {
    let dims = board.dims();
    let mut column = Vec::with_capacity(dims.rings);
    for sector in 0..dims.sectors {
        column.clear();
        column.extend(
            (0..dims.rings)
                .map(|ring| board.cells()[dims.index(ring, sector)])
                .filter(|&c| c != EMPTY),
        );
        let offset = dims.rings - column.len();
        for ring in 0..dims.rings {
            let value = if ring < offset {
                EMPTY
            } else {
                column[ring - offset]
            };
            board.set(dims.index(ring, sector), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::grid::Dimensions;
    use crate::engine::matcher::{find_matches, Axis};

    fn is_settled(board: &Board) -> bool {
        let dims = board.dims();
        (0..dims.sectors).all(|s| {
            let mut gap = false;
            (0..dims.rings).rev().all(|r| {
                let filled = board.at(r, s) != Some(EMPTY);
                if !filled {
                    gap = true;
                }
                !(gap && filled)
            })
        })
    }

    #[test]
    fn test_clear_counts_distinct_cells() {
        let dims = Dimensions::new(12, 24);
        let mut board = Board::new(dims);
        for s in 0..3 {
            board.put(11, s, 2);
        }
        let m = Match {
            indices: (0..3).map(|s| dims.index(11, s) as u32).collect(),
            color: 2,
            axis: Axis::Ring,
        };
        let cleared = apply_matches(&mut board, &[m.clone(), m]);
        assert_eq!(cleared, 3);
        assert!(board.is_clear());
    }

    #[test]
    fn test_empty_reference_not_counted() {
        let dims = Dimensions::new(12, 24);
        let mut board = Board::new(dims);
        board.put(11, 0, 1);
        let m = Match {
            indices: vec![dims.index(11, 0) as u32, dims.index(11, 1) as u32],
            color: 1,
            axis: Axis::Ring,
        };
        assert_eq!(apply_matches(&mut board, &[m]), 1);
    }

    #[test]
    fn test_settle_keeps_order() {
        let mut board = Board::new(Dimensions::new(6, 4));
        board.put(0, 2, 3);
        board.put(2, 2, 1);
        board.put(4, 2, 5);
        settle(&mut board);
        assert_eq!(board.at(5, 2), Some(5));
        assert_eq!(board.at(4, 2), Some(1));
        assert_eq!(board.at(3, 2), Some(3));
        assert_eq!(board.at(2, 2), Some(EMPTY));
        assert!(is_settled(&board));
    }

    #[test]
    fn test_gravity_after_ring_clear() {
        let dims = Dimensions::new(12, 24);
        let mut board = Board::new(dims);
        for s in 0..3 {
            board.put(11, s, 1);
        }
        board.put(10, 1, 4);
        board.put(9, 1, 6);
        let matches = find_matches(&board);
        assert_eq!(apply_matches(&mut board, &matches), 3);
        assert_eq!(board.at(11, 1), Some(4));
        assert_eq!(board.at(10, 1), Some(6));
        assert_eq!(board.at(9, 1), Some(EMPTY));
        assert!(is_settled(&board));
    }
}
