use rayon::prelude::*;

/// A 2D tilemap grid with equirectangular projection (wraps horizontally).
///
/// Storage is row-major: tile `(x, y)` lives at index `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Get the index into the data array, handling horizontal wrapping.
    pub fn index(&self, x: usize, y: usize) -> usize {
        let x = x % self.width; // Wrap horizontally
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Value at a flat row-major index.
    pub fn get_index(&self, idx: usize) -> &T {
        &self.data[idx]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get neighbors with horizontal wrapping (4-connectivity).
    /// Order is always left, right, up, down; callers rely on it.
    /// Top and bottom edges don't wrap.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
        // Left (wraps)
        let left_x = if x == 0 { self.width - 1 } else { x - 1 };
        // Right (wraps)
        let right_x = if x + 1 == self.width { 0 } else { x + 1 };
        // Up (no wrap at top)
        let up = if y > 0 { Some((x, y - 1)) } else { None };
        // Down (no wrap at bottom)
        let down = if y + 1 < self.height { Some((x, y + 1)) } else { None };

        [Some((left_x, y)), Some((right_x, y)), up, down]
            .into_iter()
            .flatten()
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }
}

impl<T: Clone + Send + Sync> Tilemap<T> {
    /// Build a map by evaluating `f(x, y)` for every tile, one row per task.
    ///
    /// `f` must be a pure function of its inputs; the result is then
    /// independent of how rayon schedules rows.
    pub fn from_fn_par<F>(width: usize, height: usize, fill: T, f: F) -> Self
    where
        F: Fn(usize, usize) -> T + Sync,
    {
        let mut map = Self::new_with(width, height, fill);
        map.par_rows_mut().for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = f(x, y);
            }
        });
        map
    }

    /// Mutable rows paired with their `y` coordinate, in parallel.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = (usize, &mut [T])> {
        // chunks of zero length panic, and an empty map has no rows anyway
        let width = self.width.max(1);
        self.data.par_chunks_mut(width).enumerate()
    }
}

/// Shortest signed X offset from `from` to `to` on a map that wraps every `width` tiles.
pub fn wrapped_dx(from: f64, to: f64, width: usize) -> f64 {
    let w = width as f64;
    let mut dx = to - from;
    if dx > w * 0.5 {
        dx -= w;
    } else if dx < -w * 0.5 {
        dx += w;
    }
    dx
}

/// Squared distance between two points with X wrapping and unwrapped Y.
pub fn wrapped_distance_sq(ax: f64, ay: f64, bx: f64, by: f64, width: usize) -> f64 {
    let dx = wrapped_dx(ax, bx, width);
    let dy = by - ay;
    dx * dx + dy * dy
}
