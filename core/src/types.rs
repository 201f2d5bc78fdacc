pub use sapper_protocol::{CellCount, Coord};

/// Two-dimensional coordinates `(x, y)`, that is `(col, row)`.
pub type Coord2 = (Coord, Coord);

/// Flat cell index, `row * width + col`.
pub type CellIndex = usize;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

/// Boards are stored row-major, `[row, col]`, so that the flat layout of an
/// array matches [`CellIndex`] order.
impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Shape of a board, converts between flat indices and coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: Coord,
    pub height: Coord,
}

impl Grid {
    pub const fn new(width: Coord, height: Coord) -> Self {
        Self { width, height }
    }

    pub const fn total_cells(self) -> CellCount {
        mult(self.width, self.height)
    }

    pub const fn contains(self, index: CellIndex) -> bool {
        index < self.total_cells() as CellIndex
    }

    /// Caller must make sure `index` is in range.
    pub const fn coords_of(self, index: CellIndex) -> Coord2 {
        let width = self.width as CellIndex;
        ((index % width) as Coord, (index / width) as Coord)
    }

    pub const fn index_of(self, (x, y): Coord2) -> CellIndex {
        y as CellIndex * self.width as CellIndex + x as CellIndex
    }

    pub const fn nd_dim(self) -> [usize; 2] {
        [self.height as usize, self.width as usize]
    }

    pub fn neighbors(self, index: CellIndex) -> NeighborIter {
        NeighborIter::new(self, self.coords_of(index))
    }
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), grid: Grid) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;

    let next_x = x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= grid.width {
        return None;
    }

    let next_y = y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= grid.height {
        return None;
    }

    Some((next_x, next_y))
}

/// Up to 8 in-bounds neighbours of a cell. Cells on the left or right edge do
/// not see cells of the adjacent rows through the edge.
#[derive(Debug)]
pub struct NeighborIter {
    grid: Grid,
    center: Coord2,
    step: u8,
}

impl NeighborIter {
    fn new(grid: Grid, center: Coord2) -> Self {
        Self {
            grid,
            center,
            step: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellIndex;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.step))?;
            self.step += 1;

            if let Some(coords) = apply_delta(self.center, delta, self.grid) {
                return Some(self.grid.index_of(coords));
            }
        }
    }
}
