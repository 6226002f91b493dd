//! Board geometry: (ring, sector) ⇄ flat index, and the flat cell buffer.

/// Cell value for an empty slot. Colors are `1..=MAX_COLOR`.
pub const EMPTY: u8 = 0;

/// Highest color value a cell can hold.
pub const MAX_COLOR: u8 = 6;

/// Ring/sector counts of a board. Ring 0 is the innermost (spawn) ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rings: usize,
    pub sectors: usize,
}

impl Dimensions {
    pub const fn new(rings: usize, sectors: usize) -> Self {
        Self { rings, sectors }
    }

    /// Number of cells on a board of this size.
    #[inline]
    pub const fn cell_count(&self) -> usize {
        self.rings * self.sectors
    }

    /// Flat index, row-major by ring. No bounds check.
    #[inline]
    pub const fn index(&self, ring: usize, sector: usize) -> usize {
        ring * self.sectors + sector
    }

    #[inline]
    pub const fn ring_of(&self, index: usize) -> usize {
        index / self.sectors
    }

    #[inline]
    pub const fn sector_of(&self, index: usize) -> usize {
        index % self.sectors
    }

    /// Sector modulo `sectors`, always non-negative.
    #[inline]
    pub fn wrap_sector(&self, sector: isize) -> usize {
        sector.rem_euclid(self.sectors as isize) as usize
    }

    /// Ring clamped into `0..=rings-1`.
    #[inline]
    pub fn clamp_ring(&self, ring: isize) -> usize {
        ring.clamp(0, self.rings as isize - 1) as usize
    }

    /// Outermost (settling) ring.
    #[inline]
    pub const fn outer_ring(&self) -> usize {
        self.rings - 1
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_RINGS, crate::config::DEFAULT_SECTORS)
    }
}

/// The circular board: one `u8` per cell, `EMPTY` or a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    dims: Dimensions,
    cells: Vec<u8>,
}

impl Board {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            cells: vec![EMPTY; dims.cell_count()],
        }
    }

    #[inline]
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Number of cells (`rings × sectors`), empty or not.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// No colored cell left anywhere on the board.
    #[inline]
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(|&c| c == EMPTY)
    }

    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Cell at a flat index; `None` when out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.cells.get(index).copied()
    }

    /// Cell at (ring, sector); `None` when out of range.
    #[inline]
    pub fn at(&self, ring: usize, sector: usize) -> Option<u8> {
        if ring >= self.dims.rings || sector >= self.dims.sectors {
            return None;
        }
        self.get(self.dims.index(ring, sector))
    }

    /// Overwrite one cell. Callers guarantee the index is in range.
    #[inline]
    pub(crate) fn set(&mut self, index: usize, value: u8) {
        self.cells[index] = value;
    }

    /// Set (ring, sector). Ignored when out of range.
    pub fn put(&mut self, ring: usize, sector: usize, value: u8) {
        if ring < self.dims.rings && sector < self.dims.sectors {
            let idx = self.dims.index(ring, sector);
            self.cells[idx] = value.min(MAX_COLOR);
        }
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Outermost free ring a block falling in `sector` can rest on, i.e. the
    /// ring just inside the sector's innermost occupied cell. `None` when the
    /// spawn ring itself is occupied.
    pub fn landing_ring(&self, sector: usize) -> Option<usize> {
        let first_filled = (0..self.dims.rings).find(|&ring| {
            self.cells[self.dims.index(ring, sector)] != EMPTY
        });
        match first_filled {
            Some(0) => None,
            Some(ring) => Some(ring - 1),
            None => Some(self.dims.outer_ring()),
        }
    }

    /// Share of occupied cells, `0.0..=1.0`.
    pub fn fill_ratio(&self) -> f32 {
        let filled = self.cells.iter().filter(|&&c| c != EMPTY).count();
        filled as f32 / self.cells.len() as f32
    }

    /// True when no spawn-ring cell is free.
    pub fn spawn_ring_full(&self) -> bool {
        self.cells[..self.dims.sectors].iter().all(|&c| c != EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        let dims = Dimensions::new(12, 24);
        assert_eq!(dims.index(0, 0), 0);
        assert_eq!(dims.index(1, 0), 24);
        assert_eq!(dims.index(5, 22), 142);
        assert_eq!(dims.ring_of(142), 5);
        assert_eq!(dims.sector_of(142), 22);
    }

    #[test]
    fn test_wrap_and_clamp() {
        let dims = Dimensions::new(12, 24);
        assert_eq!(dims.wrap_sector(-1), 23);
        assert_eq!(dims.wrap_sector(24), 0);
        assert_eq!(dims.wrap_sector(-49), 23);
        assert_eq!(dims.clamp_ring(-3), 0);
        assert_eq!(dims.clamp_ring(40), 11);
        assert_eq!(dims.clamp_ring(7), 7);
    }

    #[test]
    fn test_landing_ring_stacks_outward() {
        let mut board = Board::new(Dimensions::new(12, 24));
        assert_eq!(board.landing_ring(3), Some(11));
        board.put(11, 3, 2);
        board.put(10, 3, 1);
        assert_eq!(board.landing_ring(3), Some(9));
        board.put(0, 4, 1);
        assert_eq!(board.landing_ring(4), None);
    }

    #[test]
    fn test_spawn_ring_full() {
        let mut board = Board::new(Dimensions::new(4, 3));
        assert!(!board.spawn_ring_full());
        for s in 0..3 {
            board.put(0, s, 1);
        }
        assert!(board.spawn_ring_full());
        assert!((board.fill_ratio() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_clear_board_keeps_cell_count() {
        let mut board = Board::new(Dimensions::new(4, 6));
        assert!(board.is_clear());
        assert_eq!(board.cell_count(), 24);
        board.put(3, 2, 5);
        assert!(!board.is_clear());
        board.clear();
        assert!(board.is_clear());
        assert_eq!(board.cell_count(), 24);
    }
}
