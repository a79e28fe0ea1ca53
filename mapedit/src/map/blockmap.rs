//! Uniform grid over the map used to find what is near a point without
//! walking every element.

use glam::Vec2;
use log::warn;
use math::seg_touches_box;

/// Default size of a blockmap cell in map units
pub const MAPBLOCKUNITS: f32 = 128.0;

/// Most cells a grid may have. Maps too large for this get bigger cells
pub const MAX_BLOCKMAP_CELLS: usize = 1 << 20;

/// Columns and rows needed to cover `extent`
fn grid_size(extent: Vec2, cell_size: f32) -> (usize, usize) {
    (
        ((extent.x / cell_size) as usize).saturating_add(1),
        ((extent.y / cell_size) as usize).saturating_add(1),
    )
}

#[derive(Debug, Clone)]
pub struct Blockmap<T> {
    pub x_origin: f32,
    pub y_origin: f32,
    pub cell_size: f32,
    pub columns: usize,
    pub rows: usize,
    cells: Vec<Vec<T>>,
}

impl<T> Default for Blockmap<T> {
    fn default() -> Self {
        Self {
            x_origin: 0.0,
            y_origin: 0.0,
            cell_size: MAPBLOCKUNITS,
            columns: 0,
            rows: 0,
            cells: Vec::new(),
        }
    }
}

impl<T: Copy + PartialEq> Blockmap<T> {
    /// A grid covering `min..=max`. An inverted range (no vertexes) gives an
    /// empty grid.
    pub fn new(min: Vec2, max: Vec2, cell_size: f32) -> Self {
        let cell_size = if cell_size > 0.0 { cell_size } else { MAPBLOCKUNITS };
        if min.x > max.x || min.y > max.y {
            return Self {
                cell_size,
                ..Self::default()
            };
        }

        let extent = max - min;
        let requested = cell_size;
        let mut cell_size = cell_size;
        let (mut columns, mut rows) = grid_size(extent, cell_size);
        while columns.checked_mul(rows).is_none_or(|n| n > MAX_BLOCKMAP_CELLS) {
            cell_size *= 2.0;
            (columns, rows) = grid_size(extent, cell_size);
        }
        if cell_size != requested {
            warn!("Map is {extent} units across, blockmap cells grown from {requested} to {cell_size}");
        }
        Self {
            x_origin: min.x,
            y_origin: min.y,
            cell_size,
            columns,
            rows,
            cells: (0..columns * rows).map(|_| Vec::new()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// Column and row of the cell containing `point`
    pub fn cell_coords(&self, point: Vec2) -> Option<(usize, usize)> {
        let x = ((point.x - self.x_origin) / self.cell_size).floor();
        let y = ((point.y - self.y_origin) / self.cell_size).floor();
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.columns || y >= self.rows {
            return None;
        }
        Some((x, y))
    }

    pub fn cell(&self, column: usize, row: usize) -> &[T] {
        if column >= self.columns || row >= self.rows {
            return &[];
        }
        &self.cells[row * self.columns + column]
    }

    fn cell_bounds(&self, column: usize, row: usize) -> (Vec2, Vec2) {
        let min = Vec2::new(
            self.x_origin + column as f32 * self.cell_size,
            self.y_origin + row as f32 * self.cell_size,
        );
        (min, min + Vec2::splat(self.cell_size))
    }

    /// Add `item` to the cell at the given coordinates, once
    pub fn link(&mut self, item: T, column: usize, row: usize) -> bool {
        if column >= self.columns || row >= self.rows {
            return false;
        }
        let cell = &mut self.cells[row * self.columns + column];
        if cell.contains(&item) {
            return false;
        }
        cell.push(item);
        true
    }

    /// Link `item` into every cell the segment `start..end` passes through.
    /// Returns the number of cells it was linked to.
    pub fn link_segment(&mut self, item: T, start: Vec2, end: Vec2) -> usize {
        if self.columns == 0 {
            return 0;
        }
        let clamp_col = |x: f32, bm: &Self| {
            (((x - bm.x_origin) / bm.cell_size).floor().max(0.0) as usize).min(bm.columns - 1)
        };
        let clamp_row = |y: f32, bm: &Self| {
            (((y - bm.y_origin) / bm.cell_size).floor().max(0.0) as usize).min(bm.rows - 1)
        };
        let (c0, c1) = (
            clamp_col(start.x.min(end.x), self),
            clamp_col(start.x.max(end.x), self),
        );
        let (r0, r1) = (
            clamp_row(start.y.min(end.y), self),
            clamp_row(start.y.max(end.y), self),
        );

        let mut linked = 0;
        for row in r0..=r1 {
            for column in c0..=c1 {
                let (min, max) = self.cell_bounds(column, row);
                if seg_touches_box(start, end, min, max) && self.link(item, column, row) {
                    linked += 1;
                }
            }
        }
        linked
    }

    pub fn unlink(&mut self, item: T) {
        for cell in self.cells.iter_mut() {
            cell.retain(|i| *i != item);
        }
    }
}
