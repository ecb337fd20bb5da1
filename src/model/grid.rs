//! Uniform spatial grid used to find atoms within a fixed radius.
//!
//! Space is binned into cubic cells and a radius query only visits the cells overlapping the
//! query cube. Each cell is a singly linked list threaded through a flat `next` array.

use super::types::Point;
use nalgebra::Vector3;

/// Sentinel value indicating the end of a cell list.
const SENTINEL: u32 = u32::MAX;

/// Upper bound on the number of cells allocated per stored item.
const MAX_CELLS_PER_ITEM: usize = 64;

/// A uniform spatial grid that bins items into cubic cells.
///
/// # Performance
///
/// - Construction: **O(N)**.
/// - Radius queries: **O(1)** average-case when the radius is at most the cell size and
///   items are roughly uniformly distributed.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    cell_size: f64,
    origin: Point,
    dims: Vector3<usize>,
    /// Index of the first item in each cell.
    head: Vec<u32>,
    /// Index of the next item in the same cell.
    next: Vec<u32>,
    items: Vec<(Point, T)>,
}

impl<T> Grid<T> {
    /// Creates a grid enclosing every supplied point.
    ///
    /// The cell size is doubled as often as needed to keep the cell count proportional to the
    /// number of items, so sparse inputs never allocate an oversized grid.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is non-positive.
    pub fn new(items: impl IntoIterator<Item = (Point, T)>, cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "Cell size must be positive");

        let items: Vec<(Point, T)> = items.into_iter().collect();
        if items.is_empty() {
            return Self {
                cell_size,
                origin: Point::origin(),
                dims: Vector3::zeros(),
                head: Vec::new(),
                next: Vec::new(),
                items,
            };
        }

        let mut min = Point::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point::new(f64::MIN, f64::MIN, f64::MIN);
        for (pos, _) in &items {
            min = min.inf(pos);
            max = max.sup(pos);
        }

        let extent = max - min;
        let cell_size = fitted_cell_size(cell_size, &extent, items.len());
        let dims = extent.map(|e| (e / cell_size).floor() as usize + 1);

        let mut head = vec![SENTINEL; dims.x * dims.y * dims.z];
        let mut next = vec![SENTINEL; items.len()];

        let mut grid = Self {
            cell_size,
            origin: min,
            dims,
            head: Vec::new(),
            next: Vec::new(),
            items: Vec::new(),
        };

        for (i, (pos, _)) in items.iter().enumerate() {
            let cell = grid.cell_of(pos);
            let idx = grid.flat_index(cell);
            next[i] = head[idx];
            head[idx] = i as u32;
        }

        grid.head = head;
        grid.next = next;
        grid.items = items;
        grid
    }

    /// Iterates over all stored items, in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &(Point, T)> {
        self.items.iter()
    }

    /// Yields every item whose position lies within `radius` (inclusive) of `center`.
    pub fn within<'a>(
        &'a self,
        center: &Point,
        radius: f64,
    ) -> impl Iterator<Item = &'a T> + use<'a, T> {
        let radius_sq = radius * radius;
        let center = *center;
        self.candidate_cells(&center, radius)
            .flat_map(move |idx| CellIter {
                grid: self,
                current: self.head[idx],
            })
            .filter(move |(pos, _)| nalgebra::distance_squared(pos, &center) <= radius_sq)
            .map(|(_, item)| item)
    }

    fn candidate_cells<'a>(
        &'a self,
        center: &Point,
        radius: f64,
    ) -> impl Iterator<Item = usize> + use<'a, T> {
        let (lo, hi) = if self.items.is_empty() {
            ((1, 1, 1), (0, 0, 0))
        } else {
            let r = Vector3::new(radius, radius, radius);
            (
                self.clamped_cell(&(center - r)),
                self.clamped_cell(&(center + r)),
            )
        };

        (lo.2..=hi.2).flat_map(move |z| {
            (lo.1..=hi.1).flat_map(move |y| {
                (lo.0..=hi.0).map(move |x| self.flat_index((x, y, z)))
            })
        })
    }

    fn cell_of(&self, pos: &Point) -> (usize, usize, usize) {
        self.clamped_cell(pos)
    }

    fn clamped_cell(&self, pos: &Point) -> (usize, usize, usize) {
        let offset = pos - self.origin;
        let axis = |value: f64, dim: usize| -> usize {
            let cell = (value / self.cell_size).floor() as isize;
            cell.clamp(0, dim as isize - 1) as usize
        };
        (
            axis(offset.x, self.dims.x),
            axis(offset.y, self.dims.y),
            axis(offset.z, self.dims.z),
        )
    }

    fn flat_index(&self, (x, y, z): (usize, usize, usize)) -> usize {
        x + y * self.dims.x + z * self.dims.x * self.dims.y
    }
}

fn fitted_cell_size(mut cell_size: f64, extent: &Vector3<f64>, count: usize) -> f64 {
    let limit = count.saturating_mul(MAX_CELLS_PER_ITEM) as f64;
    loop {
        let cells: f64 = extent.iter().map(|e| (e / cell_size).floor() + 1.0).product();
        if !(cells > limit) {
            return cell_size;
        }
        cell_size *= 2.0;
    }
}

struct CellIter<'a, T> {
    grid: &'a Grid<T>,
    current: u32,
}

impl<'a, T> Iterator for CellIter<'a, T> {
    type Item = &'a (Point, T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == SENTINEL {
            return None;
        }
        let idx = self.current as usize;
        self.current = self.grid.next[idx];
        Some(&self.grid.items[idx])
    }
}
