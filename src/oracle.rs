//! # Successor/predecessor oracles
//!
//! A [`CycleOracle`] describes a permutation of `0..len` through two functions:
//! `succ(i)`, the position the value at `i` is moved to, and `pred(i)`, the
//! position whose value arrives at `i`. The in-place engine only ever asks for
//! these two functions, so it runs unchanged against a materialized
//! [`Permutation`](crate::permutation::Permutation) or against a closed-form rule
//! from [`geometry`] that never allocates a table.

use crate::{cycles::Cycles, error::PermutationError, follow};

pub mod geometry;

/// A permutation of `0..len` given by its successor and predecessor functions.
///
/// Implementors must guarantee `pred(succ(i)) == i` and `succ(pred(i)) == i` for
/// every `i < len`. [`CycleOracle::validate`] checks this exhaustively.
pub trait CycleOracle {
    /// The number of elements permuted.
    fn len(&self) -> usize;

    /// Destination of the value that starts at `index`.
    fn succ(&self, index: usize) -> usize;

    /// Source of the value that ends up at `index`.
    fn pred(&self, index: usize) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that `succ` and `pred` stay in `0..len` and are mutual inverses.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::oracle::{CycleOracle, FnOracle};
    /// let shift = FnOracle::new(5, |i| (i + 1) % 5, |i| (i + 4) % 5);
    /// assert!(shift.validate().is_ok());
    ///
    /// let broken = FnOracle::new(5, |i| (i + 1) % 5, |i| i);
    /// assert!(broken.validate().is_err());
    /// ```
    fn validate(&self) -> Result<(), PermutationError> {
        let len = self.len();
        for index in 0..len {
            let succ = self.succ(index);
            if succ >= len {
                return Err(PermutationError::IndexOutOfRange { index: succ, len });
            }
            let pred = self.pred(index);
            if pred >= len {
                return Err(PermutationError::IndexOutOfRange { index: pred, len });
            }
            if self.pred(succ) != index || self.succ(pred) != index {
                return Err(PermutationError::InvalidOracle { index });
            }
        }
        Ok(())
    }

    /// The cycle decomposition of the permutation, see [`Cycles::from_oracle`].
    fn cycles(&self) -> Result<Cycles, PermutationError> {
        Cycles::from_oracle(self)
    }

    /// The order of the permutation, `None` if it does not fit in a `usize`.
    fn order(&self) -> Result<Option<usize>, PermutationError> {
        Ok(self.cycles()?.order())
    }

    /// Permutes `slice` in place so that `slice[succ(i)]` ends up holding the old `slice[i]`.
    fn apply_in_place<T>(&self, slice: &mut [T]) -> Result<(), PermutationError>
    where
        Self: Sized,
    {
        follow::permute_in_place(slice, self)
    }

    /// The inverse permutation, obtained by exchanging `succ` and `pred`.
    fn into_inverse(self) -> Inverse<Self>
    where
        Self: Sized,
    {
        Inverse(self)
    }
}

impl<O: CycleOracle + ?Sized> CycleOracle for &O {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn succ(&self, index: usize) -> usize {
        (**self).succ(index)
    }

    fn pred(&self, index: usize) -> usize {
        (**self).pred(index)
    }
}

/// An oracle built from a length and a pair of closures.
///
/// This is how a parametric rule gets its size bound in: the closures capture
/// whatever parameters they need.
///
/// # Examples
///
/// ```
/// # use cyclefollow::oracle::{CycleOracle, FnOracle};
/// let n = 4;
/// let reverse = FnOracle::new(n, move |i| n - 1 - i, move |i| n - 1 - i);
/// let mut data = vec!['a', 'b', 'c', 'd'];
/// reverse.apply_in_place(&mut data).unwrap();
/// assert_eq!(data, vec!['d', 'c', 'b', 'a']);
/// ```
#[derive(Clone, Copy)]
pub struct FnOracle<S, P> {
    len: usize,
    succ: S,
    pred: P,
}

impl<S, P> FnOracle<S, P>
where
    S: Fn(usize) -> usize,
    P: Fn(usize) -> usize,
{
    pub fn new(len: usize, succ: S, pred: P) -> Self {
        FnOracle { len, succ, pred }
    }
}

impl<S, P> CycleOracle for FnOracle<S, P>
where
    S: Fn(usize) -> usize,
    P: Fn(usize) -> usize,
{
    fn len(&self) -> usize {
        self.len
    }

    fn succ(&self, index: usize) -> usize {
        (self.succ)(index)
    }

    fn pred(&self, index: usize) -> usize {
        (self.pred)(index)
    }
}

impl<S, P> std::fmt::Debug for FnOracle<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnOracle").field("len", &self.len).finish()
    }
}

/// The inverse of the wrapped oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct Inverse<O>(pub O);

impl<O: CycleOracle> CycleOracle for Inverse<O> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn succ(&self, index: usize) -> usize {
        self.0.pred(index)
    }

    fn pred(&self, index: usize) -> usize {
        self.0.succ(index)
    }
}
