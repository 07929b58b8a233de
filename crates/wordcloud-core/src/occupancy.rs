//! Pixel occupancy grid with a summed-area table.
//!
//! The prefix table is stored with a leading zero row and column, so
//! `prefix[(y + 1) * (w + 1) + (x + 1)]` is the number of occupied pixels in
//! `[0, x] × [0, y]`. Any half-open rectangle sum is then four lookups.

use crate::error::{LayoutError, LayoutResult};

/// An axis-aligned half-open pixel rectangle `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, saturating at `u32::MAX`.
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `u32::MAX`.
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Number of pixels covered.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether the two rectangles share at least one pixel.
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Initial canvas occupancy supplied by the caller.
///
/// Pixels equal to `free` start out free; every other value is occupied.
/// A solid background fill is a mask whose pixels all equal `free`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    free: u32,
}

impl Mask {
    /// Wrap a row-major pixel buffer.
    pub fn new(width: u32, height: u32, pixels: Vec<u32>, free: u32) -> LayoutResult<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(LayoutError::MaskLength {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            free,
        })
    }

    /// A mask filled entirely with the free sentinel.
    pub fn solid(width: u32, height: u32, free: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![free; width as usize * height as usize],
            free,
        }
    }

    /// Mask width.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Mask height.
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Monotonic occupancy grid answering O(1) rectangle-sum queries.
#[derive(Debug, Clone)]
pub struct OccupancyIndex {
    width: u32,
    height: u32,
    cells: Vec<bool>,
    prefix: Vec<u32>,
}

impl OccupancyIndex {
    /// An all-free grid.
    pub fn new(width: u32, height: u32) -> LayoutResult<Self> {
        if width == 0 || height == 0 {
            return Err(LayoutError::InvalidCanvas { width, height });
        }
        let cells = vec![false; width as usize * height as usize];
        let prefix = vec![0; (width as usize + 1) * (height as usize + 1)];
        Ok(Self {
            width,
            height,
            cells,
            prefix,
        })
    }

    /// A grid seeded from `mask`.
    pub fn from_mask(mask: &Mask) -> LayoutResult<Self> {
        let mut index = Self::new(mask.width, mask.height)?;
        for (cell, &px) in index.cells.iter_mut().zip(&mask.pixels) {
            *cell = px != mask.free;
        }
        index.rebuild();
        Ok(index)
    }

    /// Canvas width.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at `(x, y)` is occupied.
    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        self.cells[self.cell_index(x, y)]
    }

    /// Total number of occupied pixels.
    pub fn occupied_count(&self) -> u32 {
        self.prefix_at(self.width, self.height)
    }

    /// Recompute the whole prefix table from the grid, O(W·H).
    pub fn rebuild(&mut self) {
        self.rebuild_from(0, 0);
    }

    /// Count occupied pixels in `[x0, x1) × [y0, y1)`.
    ///
    /// Coordinates are clamped to the canvas; an empty range counts zero.
    pub fn query(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> u32 {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return 0;
        }
        // Each term is a prefix count; the combination is never negative.
        self.prefix_at(x1, y1) + self.prefix_at(x0, y0)
            - self.prefix_at(x0, y1)
            - self.prefix_at(x1, y0)
    }

    /// Count occupied pixels inside `rect`.
    pub fn query_rect(&self, rect: Rect) -> u32 {
        self.query(rect.x, rect.y, rect.right(), rect.bottom())
    }

    /// Whether every pixel of `rect` is free.
    pub fn is_free(&self, rect: Rect) -> bool {
        self.query_rect(rect) == 0
    }

    /// Mark every pixel of the rectangle occupied.
    ///
    /// The rectangle is clipped to the canvas. Only the part of the prefix
    /// table at or below-right of `(x0, y0)` is recomputed, which yields the
    /// same table as [`rebuild`](Self::rebuild).
    pub fn mark(&mut self, x0: u32, y0: u32, width: u32, height: u32) {
        let x1 = x0.saturating_add(width).min(self.width);
        let y1 = y0.saturating_add(height).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for y in y0..y1 {
            let row = self.cell_index(0, y);
            self.cells[row + x0 as usize..row + x1 as usize].fill(true);
        }
        self.rebuild_from(x0, y0);
    }

    /// Mark `rect` occupied.
    pub fn mark_rect(&mut self, rect: Rect) {
        self.mark(rect.x, rect.y, rect.width, rect.height);
    }

    /// Recompute prefix entries for every cell `(x, y)` with `x >= x0` and
    /// `y >= y0`. Entries outside that quadrant do not depend on it.
    fn rebuild_from(&mut self, x0: u32, y0: u32) {
        let stride = self.width as usize + 1;
        for y in y0..self.height {
            for x in x0..self.width {
                let value = u32::from(self.cells[self.cell_index(x, y)]);
                let (px, py) = (x as usize + 1, y as usize + 1);
                self.prefix[py * stride + px] = value + self.prefix[py * stride + px - 1]
                    + self.prefix[(py - 1) * stride + px]
                    - self.prefix[(py - 1) * stride + px - 1];
            }
        }
    }

    /// Prefix count of `[0, x) × [0, y)`.
    fn prefix_at(&self, x: u32, y: u32) -> u32 {
        self.prefix[y as usize * (self.width as usize + 1) + x as usize]
    }

    fn cell_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(index: &OccupancyIndex, rect: Rect) -> u32 {
        let mut n = 0;
        for y in rect.y..rect.bottom().min(index.height()) {
            for x in rect.x..rect.right().min(index.width()) {
                n += u32::from(index.is_occupied(x, y));
            }
        }
        n
    }

    #[test]
    fn untouched_grid_queries_zero() {
        let index = OccupancyIndex::new(40, 30).unwrap();
        assert_eq!(index.query(0, 0, 40, 30), 0);
        assert_eq!(index.query(5, 7, 12, 9), 0);
        assert!(index.is_free(Rect::new(10, 10, 20, 20)));
    }

    #[test]
    fn marked_rectangle_queries_its_area() {
        let mut index = OccupancyIndex::new(50, 50).unwrap();
        index.mark(3, 4, 10, 7);
        assert_eq!(index.query(3, 4, 13, 11), 70);
        assert_eq!(index.query(0, 0, 50, 50), 70);
        assert_eq!(index.query(13, 11, 50, 50), 0);
        assert!(!index.is_free(Rect::new(12, 10, 5, 5)));
    }

    #[test]
    fn disjoint_marks_sum_to_union() {
        let mut index = OccupancyIndex::new(64, 64).unwrap();
        let rects = [
            Rect::new(0, 0, 8, 8),
            Rect::new(8, 0, 4, 16),
            Rect::new(20, 30, 10, 3),
            Rect::new(40, 40, 24, 24),
        ];
        for r in rects {
            index.mark_rect(r);
        }
        let individual: u32 = rects.iter().map(|r| index.query_rect(*r)).sum();
        let expected: u64 = rects.iter().map(Rect::area).sum();
        assert_eq!(u64::from(individual), expected);
        assert_eq!(u64::from(index.query(0, 0, 64, 64)), expected);
    }

    #[test]
    fn incremental_updates_match_full_rebuild() {
        let mut incremental = OccupancyIndex::new(37, 23).unwrap();
        for (x, y, w, h) in [(30, 20, 9, 9), (0, 0, 5, 5), (10, 3, 12, 1), (2, 15, 30, 2)] {
            incremental.mark(x, y, w, h);
        }
        let mut full = incremental.clone();
        full.rebuild();
        assert_eq!(incremental.prefix, full.prefix);

        for (x, y, w, h) in [(0, 0, 37, 23), (1, 1, 10, 10), (29, 19, 8, 4), (3, 14, 4, 4)] {
            let r = Rect::new(x, y, w, h);
            assert_eq!(incremental.query_rect(r), brute_force(&incremental, r));
        }
    }

    #[test]
    fn marks_are_clipped_to_canvas() {
        let mut index = OccupancyIndex::new(10, 10).unwrap();
        index.mark(8, 8, 5, 5);
        assert_eq!(index.occupied_count(), 4);
    }

    #[test]
    fn occupancy_is_monotonic() {
        let mut index = OccupancyIndex::new(10, 10).unwrap();
        index.mark(0, 0, 4, 4);
        index.mark(2, 2, 4, 4);
        assert_eq!(index.occupied_count(), 16 + 16 - 4);
        index.rebuild();
        assert_eq!(index.occupied_count(), 28);
    }

    #[test]
    fn mask_seeds_occupancy() {
        let free = 0xff00_0000;
        let mut pixels = vec![free; 16];
        pixels[5] = 0xffff_ffff;
        pixels[10] = 0xff00_00ff;
        let mask = Mask::new(4, 4, pixels, free).unwrap();
        let index = OccupancyIndex::from_mask(&mask).unwrap();
        assert_eq!(index.occupied_count(), 2);
        assert!(index.is_occupied(1, 1));
        assert!(index.is_occupied(2, 2));
        assert_eq!(index.query(0, 0, 2, 2), 1);
    }

    #[test]
    fn solid_mask_is_all_free() {
        let index = OccupancyIndex::from_mask(&Mask::solid(8, 6, 0)).unwrap();
        assert_eq!(index.occupied_count(), 0);
    }

    #[test]
    fn mask_length_is_validated() {
        let err = Mask::new(3, 3, vec![0; 8], 0).unwrap_err();
        assert!(matches!(err, LayoutError::MaskLength { len: 8, .. }));
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        assert!(matches!(
            OccupancyIndex::new(0, 10),
            Err(LayoutError::InvalidCanvas { width: 0, height: 10 })
        ));
    }

    #[test]
    fn empty_or_out_of_range_query_is_zero() {
        let mut index = OccupancyIndex::new(5, 5).unwrap();
        index.mark(0, 0, 5, 5);
        assert_eq!(index.query(3, 3, 3, 5), 0);
        assert_eq!(index.query(4, 4, 100, 100), 1);
    }

    #[test]
    fn rect_edges_saturate_at_the_far_corner() {
        let mut index = OccupancyIndex::new(5, 5).unwrap();
        index.mark(0, 0, 5, 5);
        let far = Rect::new(u32::MAX, 0, 5, 5);
        assert_eq!(far.right(), u32::MAX);
        assert_eq!(index.query_rect(far), 0);
        assert!(index.is_free(far));
        assert_eq!(index.query_rect(Rect::new(4, u32::MAX - 1, 5, 5)), 0);
        assert!(!Rect::new(u32::MAX - 1, 0, 5, 5).intersects(&Rect::new(0, 0, 5, 5)));
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(9, 9, 2, 2)));
        assert!(!a.intersects(&Rect::new(10, 0, 2, 2)));
        assert!(!a.intersects(&Rect::new(0, 10, 2, 2)));
    }
}
