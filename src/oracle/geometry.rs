//! Closed-form permutations of flat buffers.
//!
//! Images and matrices are stored row-major: the cell at column `x` and row `y`
//! of a [`Grid`] lives at `y * width + x`. The oracles here compute where each
//! cell goes without ever building the permutation table, so rotating a buffer
//! in place costs one bit of bookkeeping per cell and nothing else.

use super::CycleOracle;

/// Shape of a row-major two dimensional buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Grid { width, height }
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape of the buffer after a quarter turn.
    pub fn rotated(&self) -> Self {
        Grid {
            width: self.height,
            height: self.width,
        }
    }

    /// Column and row of a linear index.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}

/// Separates even and odd positions: `[0, 1, 2, 3, 4, 5]` becomes `[0, 2, 4, 1, 3, 5]`.
///
/// Odd lengths put the extra element in the even half. The inverse,
/// `Inverse(EvenOdd { len })`, is the perfect shuffle that interleaves two halves.
///
/// # Examples
///
/// ```
/// # use cyclefollow::oracle::{CycleOracle, geometry::EvenOdd};
/// let mut data: Vec<u8> = (0..10).collect();
/// EvenOdd::new(10).apply_in_place(&mut data).unwrap();
/// assert_eq!(data, vec![0, 2, 4, 6, 8, 1, 3, 5, 7, 9]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct EvenOdd {
    pub len: usize,
}

impl EvenOdd {
    pub fn new(len: usize) -> Self {
        EvenOdd { len }
    }

    fn split(&self) -> usize {
        self.len.div_ceil(2)
    }
}

impl CycleOracle for EvenOdd {
    fn len(&self) -> usize {
        self.len
    }

    fn succ(&self, index: usize) -> usize {
        if index % 2 == 0 {
            index / 2
        } else {
            self.split() + index / 2
        }
    }

    fn pred(&self, index: usize) -> usize {
        let split = self.split();
        if index < split {
            2 * index
        } else {
            2 * (index - split) + 1
        }
    }
}

/// Quarter turn clockwise. The result is a buffer of shape [`Grid::rotated`].
///
/// # Examples
///
/// ```
/// # use cyclefollow::oracle::{CycleOracle, geometry::{Grid, RotateCw}};
/// // 0 1 2        3 0
/// // 3 4 5   ->   4 1
/// //              5 2
/// let mut image = vec![0, 1, 2, 3, 4, 5];
/// RotateCw(Grid::new(3, 2)).apply_in_place(&mut image).unwrap();
/// assert_eq!(image, vec![3, 0, 4, 1, 5, 2]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct RotateCw(pub Grid);

impl CycleOracle for RotateCw {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn succ(&self, index: usize) -> usize {
        let Grid { height, .. } = self.0;
        let (x, y) = self.0.coords(index);
        x * height + (height - 1 - y)
    }

    fn pred(&self, index: usize) -> usize {
        let Grid { width, height } = self.0;
        let (col, row) = (index % height, index / height);
        (height - 1 - col) * width + row
    }
}

/// Quarter turn counterclockwise. The result is a buffer of shape [`Grid::rotated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct RotateCcw(pub Grid);

impl CycleOracle for RotateCcw {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn succ(&self, index: usize) -> usize {
        let Grid { width, height } = self.0;
        let (x, y) = self.0.coords(index);
        (width - 1 - x) * height + y
    }

    fn pred(&self, index: usize) -> usize {
        let Grid { width, height } = self.0;
        let (col, row) = (index % height, index / height);
        col * width + (width - 1 - row)
    }
}

/// Half turn. An involution: `succ` and `pred` coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct Rotate180(pub Grid);

impl CycleOracle for Rotate180 {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn succ(&self, index: usize) -> usize {
        let Grid { width, height } = self.0;
        let (x, y) = self.0.coords(index);
        (height - 1 - y) * width + (width - 1 - x)
    }

    fn pred(&self, index: usize) -> usize {
        self.succ(index)
    }
}

/// Matrix transposition. The result is a buffer of shape [`Grid::rotated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct Transpose(pub Grid);

impl CycleOracle for Transpose {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn succ(&self, index: usize) -> usize {
        let (x, y) = self.0.coords(index);
        x * self.0.height + y
    }

    fn pred(&self, index: usize) -> usize {
        let Grid { width, height } = self.0;
        (index % height) * width + index / height
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;
    use crate::{follow::permute_in_place, oracle::Inverse};

    fn range(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    fn shapes() -> Vec<Grid> {
        let mut shapes = vec![];
        for width in 1..7 {
            for height in 1..7 {
                shapes.push(Grid::new(width, height));
            }
        }
        shapes
    }

    #[test]
    fn test_even_odd_matches_closed_form() {
        let oracle = EvenOdd::new(10);
        let succ: Vec<_> = (0..10).map(|x| oracle.succ(x)).collect();
        assert_eq!(succ, vec![0, 5, 1, 6, 2, 7, 3, 8, 4, 9]);
        let round_trip: Vec<_> = succ.iter().map(|&x| oracle.pred(x)).collect();
        assert_eq!(round_trip, range(10));
    }

    #[test]
    fn test_even_odd_cycles() {
        let cycles = EvenOdd::new(10).cycles().unwrap();
        insta::assert_snapshot!(cycles.to_string(), @"(0)(1 5 7 8 4 2)(3 6)(9)");
        assert_eq!(cycles.order(), Some(6));
    }

    #[test]
    fn test_even_odd_odd_lengths() {
        for len in 0..40 {
            let oracle = EvenOdd::new(len);
            assert_eq!(oracle.validate(), Ok(()), "len {len}");

            let mut data = range(len);
            oracle.apply_in_place(&mut data).unwrap();
            let expected: Vec<_> = (0..len).step_by(2).chain((1..len).step_by(2)).collect();
            assert_eq!(data, expected);
        }
    }

    #[test]
    fn test_perfect_shuffle() {
        let mut data = vec!['a', 'b', 'c', 'A', 'B', 'C'];
        Inverse(EvenOdd::new(6)).apply_in_place(&mut data).unwrap();
        assert_eq!(data, vec!['a', 'A', 'b', 'B', 'c', 'C']);
    }

    #[test]
    fn test_geometric_oracles_are_valid() {
        for grid in shapes() {
            assert_eq!(RotateCw(grid).validate(), Ok(()), "{grid:?}");
            assert_eq!(RotateCcw(grid).validate(), Ok(()), "{grid:?}");
            assert_eq!(Rotate180(grid).validate(), Ok(()), "{grid:?}");
            assert_eq!(Transpose(grid).validate(), Ok(()), "{grid:?}");
        }
    }

    #[test]
    fn test_rotations_of_small_image() {
        // 0 1 2
        // 3 4 5
        let grid = Grid::new(3, 2);

        let mut cw = range(6);
        RotateCw(grid).apply_in_place(&mut cw).unwrap();
        assert_eq!(cw, vec![3, 0, 4, 1, 5, 2]);

        let mut ccw = range(6);
        RotateCcw(grid).apply_in_place(&mut ccw).unwrap();
        assert_eq!(ccw, vec![2, 5, 1, 4, 0, 3]);

        let mut half = range(6);
        Rotate180(grid).apply_in_place(&mut half).unwrap();
        assert_eq!(half, vec![5, 4, 3, 2, 1, 0]);

        let mut transposed = range(6);
        Transpose(grid).apply_in_place(&mut transposed).unwrap();
        assert_eq!(transposed, vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_rotate_180_of_4x3() {
        let oracle = Rotate180(Grid::new(4, 3));
        let mut data = range(12);
        permute_in_place(&mut data, &oracle).unwrap();
        assert_eq!(data, vec![11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        permute_in_place(&mut data, &oracle).unwrap();
        assert_eq!(data, range(12));
        assert_eq!(oracle.order(), Ok(Some(2)));
    }

    #[test]
    fn test_quarter_turns_compose() {
        for grid in shapes() {
            let mut twice = range(grid.len());
            RotateCw(grid).apply_in_place(&mut twice).unwrap();
            RotateCw(grid.rotated()).apply_in_place(&mut twice).unwrap();

            let mut half = range(grid.len());
            Rotate180(grid).apply_in_place(&mut half).unwrap();
            assert_eq!(twice, half, "{grid:?}");

            let mut there_and_back = range(grid.len());
            RotateCw(grid).apply_in_place(&mut there_and_back).unwrap();
            RotateCcw(grid.rotated())
                .apply_in_place(&mut there_and_back)
                .unwrap();
            assert_eq!(there_and_back, range(grid.len()), "{grid:?}");
        }
    }

    #[test]
    fn test_square_quarter_turn_cycle_lengths() {
        for side in 1..9 {
            let cycles = RotateCw(Grid::new(side, side)).cycles().unwrap();
            assert!(cycles.cycle_lengths().all(|k| 4 % k == 0), "side {side}");
            let fixed = cycles.fixed_points().count();
            assert_eq!(fixed, side % 2, "side {side}");
        }

        let cycles = RotateCw(Grid::new(3, 3)).cycles().unwrap();
        let mut lengths: Vec<_> = cycles.cycle_lengths().collect();
        lengths.sort();
        assert_eq!(lengths, vec![1, 4, 4]);
        assert_eq!(cycles.order(), Some(4));
    }

    #[test]
    fn test_transpose_moves_cells() {
        // Transposing a row vector or a column vector keeps the buffer untouched.
        let mut row = range(5);
        Transpose(Grid::new(5, 1)).apply_in_place(&mut row).unwrap();
        assert_eq!(row, range(5));

        let grid = Grid::new(4, 3);
        let mut transposed = range(grid.len());
        Transpose(grid).apply_in_place(&mut transposed).unwrap();
        let t = grid.rotated();
        for x in 0..grid.width {
            for y in 0..grid.height {
                assert_eq!(transposed[t.index(y, x)], grid.index(x, y));
            }
        }
    }
}
