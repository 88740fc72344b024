//! The eight symmetries of the square (dihedral group D4) acting on encoded
//! board inputs.

use crate::game::{GRID_SIZE, NUM_CELLS};

/// A permutation of board cells. Applying it to an input vector builds the
/// image `image[cell] = input[map(cell)]`, moving all channels of a cell
/// together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symmetry {
    cell_map: [usize; NUM_CELLS],
}

fn cell(row: usize, col: usize) -> usize {
    row * GRID_SIZE + col
}

impl Symmetry {
    fn from_fn(f: impl Fn(usize, usize) -> (usize, usize)) -> Self {
        let mut cell_map = [0; NUM_CELLS];
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let (r, c) = f(row, col);
                cell_map[cell(row, col)] = cell(r, c);
            }
        }
        Symmetry { cell_map }
    }

    pub fn identity() -> Self {
        Self::from_fn(|r, c| (r, c))
    }

    /// `(r, c) -> (r, 7 - c)`
    pub fn horizontal_flip() -> Self {
        Self::from_fn(|r, c| (r, GRID_SIZE - 1 - c))
    }

    /// `(r, c) -> (7 - r, c)`
    pub fn vertical_flip() -> Self {
        Self::from_fn(|r, c| (GRID_SIZE - 1 - r, c))
    }

    /// `(r, c) -> (c, r)`
    pub fn diagonal_flip() -> Self {
        Self::from_fn(|r, c| (c, r))
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Symmetry) -> Symmetry {
        let mut cell_map = [0; NUM_CELLS];
        for (i, slot) in cell_map.iter_mut().enumerate() {
            *slot = self.cell_map[other.cell_map[i]];
        }
        Symmetry { cell_map }
    }

    /// The seven non-identity symmetries: h, v, d, h∘v, d∘v, v∘d, h∘v∘d.
    ///
    /// `d∘v` and `v∘d` are the two quarter turns; `h∘d` would repeat `d∘v`.
    pub fn non_identity() -> Vec<Symmetry> {
        let h = Self::horizontal_flip();
        let v = Self::vertical_flip();
        let d = Self::diagonal_flip();
        let hv = h.compose(&v);
        let dv = d.compose(&v);
        let vd = v.compose(&d);
        let hvd = hv.compose(&d);
        vec![h, v, d, hv, dv, vd, hvd]
    }

    pub fn map_cell(&self, cell: usize) -> usize {
        self.cell_map[cell]
    }

    /// Image of `input`, which holds `input.len() / 64` channels per cell.
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        let per_cell = input.len() / NUM_CELLS;
        debug_assert_eq!(per_cell * NUM_CELLS, input.len());
        let mut image = Vec::with_capacity(input.len());
        for &source in &self.cell_map {
            image.extend_from_slice(&input[source * per_cell..(source + 1) * per_cell]);
        }
        image
    }
}
