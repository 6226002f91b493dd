//! Finds runs of three or more same-colored cells along rings (wrapping) and
//! along sectors (radial, no wrap).

use super::grid::{Board, EMPTY};

/// Shortest run that counts as a match.
pub const MIN_MATCH_LEN: usize = 3;

/// Board axis a match runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Around a ring, across sectors (circular).
    Ring,
    /// Along a sector, across rings (radial).
    Sector,
}

/// A matched run: distinct indices in walk order, one color, one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub indices: Vec<u32>,
    pub color: u8,
    pub axis: Axis,
}

impl Match {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// All non-overlapping matches on `board`. Ring runs take precedence over
/// sector runs; within each pass earlier scan order wins, and a candidate
/// that shares any cell with an accepted match is dropped whole.
pub fn find_matches(board: &Board) -> Vec<Match> {
    let mut taken = vec![false; board.cell_count()];
    let mut out = Vec::new();

    for candidate in ring_runs(board).chain(sector_runs(board)) {
        if candidate.indices.iter().any(|&i| taken[i as usize]) {
            continue;
        }
        for &i in &candidate.indices {
            taken[i as usize] = true;
        }
        out.push(candidate);
    }
    out
}

/// Circular runs per ring, ordered by ring then start sector.
fn ring_runs(board: &Board) -> impl Iterator<Item = Match> + '_ {
    let dims = board.dims();
    let sectors = dims.sectors;
    (0..dims.rings).flat_map(move |ring| {
        let color_at = move |s: usize| board.cells()[dims.index(ring, s)];
        let first = color_at(0);
        let uniform = first != EMPTY && (1..sectors).all(|s| color_at(s) == first);

        let mut runs = Vec::new();
        if uniform {
            runs.push(Match {
                indices: (0..sectors).map(|s| dims.index(ring, s) as u32).collect(),
                color: first,
                axis: Axis::Ring,
            });
            return runs;
        }

        for start in 0..sectors {
            let color = color_at(start);
            let prev = color_at((start + sectors - 1) % sectors);
            // only the first sector of a maximal run starts one
            if color == EMPTY || prev == color {
                continue;
            }
            let mut len = 1;
            while len < sectors && color_at((start + len) % sectors) == color {
                len += 1;
            }
            if len >= MIN_MATCH_LEN {
                runs.push(Match {
                    indices: (0..len)
                        .map(|k| dims.index(ring, (start + k) % sectors) as u32)
                        .collect(),
                    color,
                    axis: Axis::Ring,
                });
            }
        }
        runs
    })
}

/// Radial runs per sector, ordered by sector then start ring.
fn sector_runs(board: &Board) -> impl Iterator<Item = Match> + '_ {
    let dims = board.dims();
    (0..dims.sectors).flat_map(move |sector| {
        let mut runs = Vec::new();
        let mut ring = 0;
        while ring < dims.rings {
            let color = board.cells()[dims.index(ring, sector)];
            let mut end = ring + 1;
            while end < dims.rings && board.cells()[dims.index(end, sector)] == color {
                end += 1;
            }
            if color != EMPTY && end - ring >= MIN_MATCH_LEN {
                runs.push(Match {
                    indices: (ring..end).map(|r| dims.index(r, sector) as u32).collect(),
                    color,
                    axis: Axis::Sector,
                });
            }
            ring = end;
        }
        runs
    })
}
