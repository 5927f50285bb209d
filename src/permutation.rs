//! # Permutations
//!
//! This module provides a table-backed `Permutation` of `0..n`.
//!
//! ## Key Features:
//!
//! - **Representation**: A `Permutation` stores its successor table (`map[i]` is
//!   where the value at `i` is sent) together with its predecessor table (`inv[i]`
//!   is where the value arriving at `i` comes from). The predecessor table is the
//!   one-line notation: position `i` receives the value originally at `line[i]`.
//! - **Construction**:
//!   - Identity permutation: `Permutation::id(n)`.
//!   - From the successor table: `Permutation::from_map(vec![...])`.
//!   - From one-line notation: `Permutation::from_one_line(vec![...])`.
//!   - From disjoint cycles: `Permutation::from_cycles(&cycles)`.
//!   - From any oracle: `Permutation::from_oracle(&oracle)`.
//! - **Basic Operations**:
//!   - Inverse: `p.inverse()`.
//!   - Composition: `p1.compose(&p2)` (applies `p2` then `p1`).
//!   - Apply to slices: `p.apply_slice(data)` (returns a new `Vec`, or `LengthMismatch`),
//!     `p.apply_slice_in_place(data_mut)` (follows the cycles, no extra buffer).
//!   - Power: `p.pow(k)`, order: `p.order()`.
//!   - Sign: `p.sign()` (+1 for even, -1 for odd).
//!
//! `Permutation` implements [`CycleOracle`], so every function of
//! [`follow`](crate::follow) accepts it.

use std::{convert::Infallible, fmt, ops::Index};

use itertools::Itertools;

use crate::{
    cycles::{orbits, Cycles},
    error::{BijectionViolation, PermutationError},
    follow,
    oracle::{CycleOracle, Inverse},
};

/// A permutation of `0..n`, with the ability to apply itself (or its inverse) to slices.
///
/// # Examples
///
/// ```
/// use cyclefollow::permutation::Permutation;
///
/// // Create a permutation that maps 0->2, 1->0, 2->1, 3->3
/// let p = Permutation::from_map(vec![2, 0, 1, 3]).unwrap();
///
/// // Apply the permutation to a slice
/// let mut data = vec![10, 20, 30, 40];
/// p.apply_slice_in_place(&mut data).unwrap();
/// assert_eq!(data, vec![20, 30, 10, 40]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct Permutation {
    map: Vec<usize>,
    inv: Vec<usize>,
}

/// Implement ordering comparisons for permutations based on their `map` field.
impl PartialOrd for Permutation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.map.partial_cmp(&other.map)
    }
}

/// Inverts a table that should be a bijection on `0..table.len()`.
fn invert(table: &[usize]) -> Result<Vec<usize>, PermutationError> {
    let len = table.len();
    let mut inv = vec![usize::MAX; len];
    for (i, &j) in table.iter().enumerate() {
        if j >= len {
            return Err(PermutationError::IndexOutOfRange { index: j, len });
        }
        if inv[j] != usize::MAX {
            return Err(BijectionViolation::Duplicate(j).into());
        }
        inv[j] = i;
    }
    Ok(inv)
}

impl Permutation {
    // --------------------------------------------------------------------------------------------
    // Basic Constructors and Accessors
    // --------------------------------------------------------------------------------------------

    /// Creates the identity permutation of length `n`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::id(4);
    /// assert_eq!(p.apply_slice(&[10,20,30,40]).unwrap(), vec![10,20,30,40]);
    /// ```
    pub fn id(n: usize) -> Self {
        Permutation {
            map: (0..n).collect(),
            inv: (0..n).collect(),
        }
    }

    /// Creates a permutation from its successor table: `map[i]` is the image of `i`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1]).unwrap();
    /// assert_eq!(p.apply_slice(&[10,20,30]).unwrap(), vec![20,30,10]);
    ///
    /// assert!(Permutation::from_map(vec![0, 0, 1]).is_err());
    /// ```
    pub fn from_map(map: Vec<usize>) -> Result<Self, PermutationError> {
        let inv = invert(&map)?;
        Ok(Permutation { map, inv })
    }

    /// Creates a permutation from one-line notation: position `i` receives the
    /// value originally at `line[i]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::from_one_line(vec![0, 2, 4, 1, 3]).unwrap();
    /// assert_eq!(p.apply_slice(&['a', 'b', 'c', 'd', 'e']).unwrap(), vec!['a', 'c', 'e', 'b', 'd']);
    /// ```
    pub fn from_one_line(line: Vec<usize>) -> Result<Self, PermutationError> {
        let map = invert(&line)?;
        Ok(Permutation { map, inv: line })
    }

    /// Creates a permutation from a validated cycle decomposition.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::{cycles::Cycles, permutation::Permutation};
    /// let cycles = Cycles::new(vec![vec![0, 1, 2], vec![3, 4]]).unwrap();
    /// let p = Permutation::from_cycles(&cycles);
    /// assert_eq!(p.map(), &[1, 2, 0, 4, 3]);
    /// ```
    pub fn from_cycles(cycles: &Cycles) -> Self {
        let mut map = (0..cycles.len()).collect::<Vec<_>>();
        let mut inv = map.clone();
        for cycle in cycles {
            for (&from, &to) in cycle.iter().zip(cycle.iter().cycle().skip(1)) {
                map[from] = to;
                inv[to] = from;
            }
        }
        Permutation { map, inv }
    }

    /// Materializes the tables of an oracle, checking that it is consistent.
    pub fn from_oracle<O: CycleOracle + ?Sized>(oracle: &O) -> Result<Self, PermutationError> {
        oracle.validate()?;
        let len = oracle.len();
        Ok(Permutation {
            map: (0..len).map(|i| oracle.succ(i)).collect(),
            inv: (0..len).map(|i| oracle.pred(i)).collect(),
        })
    }

    /// Returns the successor table as a slice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1]).unwrap();
    /// assert_eq!(p.map(), &[2, 0, 1]);
    /// ```
    pub fn map(&self) -> &[usize] {
        &self.map
    }

    /// Returns the predecessor table as a slice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1]).unwrap();
    /// assert_eq!(p.inv(), &[1, 2, 0]);
    /// ```
    pub fn inv(&self) -> &[usize] {
        &self.inv
    }

    /// The one-line notation, which is the predecessor table.
    pub fn one_line(&self) -> &[usize] {
        &self.inv
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    // --------------------------------------------------------------------------------------------
    // Basic Operations
    // --------------------------------------------------------------------------------------------

    /// Returns the inverse of the permutation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1]).unwrap();
    /// let inv = p.inverse();
    /// assert_eq!(inv.apply_slice(&[10,20,30]).unwrap(), vec![30, 10, 20]);
    /// ```
    pub fn inverse(&self) -> Self {
        Permutation {
            map: self.inv.clone(),
            inv: self.map.clone(),
        }
    }

    /// Applies `self` to a slice, returning a new `Vec<T>` in permuted order.
    ///
    /// This allocates a second buffer; [`Permutation::apply_slice_in_place`] does not.
    pub fn apply_slice<T: Clone, S>(&self, slice: S) -> Result<Vec<T>, PermutationError>
    where
        S: AsRef<[T]>,
    {
        let s = self.check_len(slice.as_ref())?;
        Ok(self.inv.iter().map(|&idx| s[idx].clone()).collect())
    }

    /// Applies the inverse of `self` to a slice, returning a new `Vec<T>` in permuted order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1]).unwrap();
    /// let data = vec![10, 20, 30];
    /// assert_eq!(p.apply_slice_inv(&data).unwrap(), vec![30, 10, 20]);
    /// ```
    pub fn apply_slice_inv<T: Clone, S>(&self, slice: S) -> Result<Vec<T>, PermutationError>
    where
        S: AsRef<[T]>,
    {
        let s = self.check_len(slice.as_ref())?;
        Ok(self.map.iter().map(|&idx| s[idx].clone()).collect())
    }

    fn check_len<'a, T>(&self, slice: &'a [T]) -> Result<&'a [T], PermutationError> {
        if slice.len() != self.len() {
            return Err(PermutationError::LengthMismatch {
                slice: slice.len(),
                permutation: self.len(),
            });
        }
        Ok(slice)
    }

    /// Applies `self` in-place to the provided slice by following its cycles.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1]).unwrap();
    /// let mut data = vec![10, 20, 30];
    /// p.apply_slice_in_place(&mut data).unwrap();
    /// assert_eq!(data, vec![20, 30, 10]);
    /// ```
    pub fn apply_slice_in_place<T, S>(&self, slice: &mut S) -> Result<(), PermutationError>
    where
        S: AsMut<[T]> + ?Sized,
    {
        follow::permute_in_place(slice.as_mut(), self)
    }

    /// Applies the inverse of `self` in-place to the provided slice by following its cycles.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1]).unwrap();
    /// let mut data = vec![10, 20, 30];
    /// p.apply_slice_in_place_inv(&mut data).unwrap();
    /// assert_eq!(data, vec![30, 10, 20]);
    /// ```
    pub fn apply_slice_in_place_inv<T, S>(&self, slice: &mut S) -> Result<(), PermutationError>
    where
        S: AsMut<[T]> + ?Sized,
    {
        follow::permute_in_place(slice.as_mut(), &Inverse(self))
    }

    /// Composes `self` with another permutation `other`, returning a new permutation:
    /// `(self ◦ other)(i) = self.map[other.map[i]]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::{error::PermutationError, permutation::Permutation};
    /// let p = Permutation::from_map(vec![1, 2, 0]).unwrap();
    /// assert!(p.compose(&p.inverse()).unwrap().is_identity());
    /// assert_eq!(
    ///     p.compose(&Permutation::id(2)),
    ///     Err(PermutationError::LengthMismatch { slice: 2, permutation: 3 })
    /// );
    /// ```
    pub fn compose(&self, other: &Self) -> Result<Self, PermutationError> {
        if self.len() != other.len() {
            return Err(PermutationError::LengthMismatch {
                slice: other.len(),
                permutation: self.len(),
            });
        }
        Ok(self.compose_same_len(other))
    }

    fn compose_same_len(&self, other: &Self) -> Self {
        let map: Vec<usize> = other.map.iter().map(|&i| self.map[i]).collect();
        let inv = self.inv.iter().map(|&i| other.inv[i]).collect();
        Permutation { map, inv }
    }

    // --------------------------------------------------------------------------------------------
    // Cycles
    // --------------------------------------------------------------------------------------------

    /// Returns the cycle decomposition of `self`.
    /// Each cycle lists the indices of a single cycle, e.g. `[0, 2, 1]` means `0->2, 2->1, 1->0`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::from_map(vec![2, 0, 1, 3]).unwrap();
    /// let cycles = p.cycles();
    /// assert_eq!(cycles.as_slice(), &[vec![0, 2, 1], vec![3]]);
    /// ```
    pub fn cycles(&self) -> Cycles {
        let walked = orbits(self.len(), |i| Ok::<_, Infallible>(self.map[i]));
        match walked {
            Ok(cycles) => Cycles::new_unchecked(cycles, self.len()),
            Err(never) => match never {},
        }
    }

    /// The smallest `k > 0` with `self.pow(k)` the identity, `None` if it overflows `usize`.
    pub fn order(&self) -> Option<usize> {
        self.cycles().order()
    }

    /// Checks if this permutation is the identity permutation (i.e., does nothing).
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::id(4);
    /// assert!(p.is_identity());
    ///
    /// let q = Permutation::from_map(vec![1,0,2,3]).unwrap();
    /// assert!(!q.is_identity());
    /// ```
    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(i, &m)| i == m)
    }

    /// Returns the sign (+1 or -1) of the permutation,
    /// indicating whether it is an even (+1) or odd (-1) permutation.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::from_map(vec![1,0,3,2]).unwrap();
    /// assert_eq!(p.sign(), 1); // even
    ///
    /// let q = Permutation::from_map(vec![2,1,0]).unwrap();
    /// assert_eq!(q.sign(), -1); // odd
    /// ```
    pub fn sign(&self) -> i8 {
        self.cycles().sign()
    }

    /// Computes the k-th power of the permutation (composition with itself k times).
    /// For k = 0, it returns the identity of the same size.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::permutation::Permutation;
    /// let p = Permutation::from_map(vec![1, 2, 0]).unwrap();
    /// // p^2 maps 0->p(1)=2, 1->p(2)=0, 2->p(0)=1 => [2,0,1]
    /// let p2 = p.pow(2);
    /// assert_eq!(p2.map(), &[2, 0, 1]);
    /// ```
    pub fn pow(&self, k: usize) -> Self {
        let mut result = Permutation::id(self.map.len());
        let mut base = self.clone();
        let mut exp = k;

        while exp > 0 {
            if exp % 2 == 1 {
                result = result.compose_same_len(&base);
            }
            base = base.compose_same_len(&base);
            exp /= 2;
        }
        result
    }
}

impl CycleOracle for Permutation {
    fn len(&self) -> usize {
        self.map.len()
    }

    fn succ(&self, index: usize) -> usize {
        self.map[index]
    }

    fn pred(&self, index: usize) -> usize {
        self.inv[index]
    }

    fn cycles(&self) -> Result<Cycles, PermutationError> {
        Ok(Permutation::cycles(self))
    }
}

impl From<&Cycles> for Permutation {
    fn from(cycles: &Cycles) -> Self {
        Permutation::from_cycles(cycles)
    }
}

impl From<&Permutation> for Cycles {
    fn from(permutation: &Permutation) -> Self {
        permutation.cycles()
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First show cycle notation
        let cycles = self.cycles();
        let nontrivial = cycles
            .iter()
            .filter(|cycle| cycle.len() > 1)
            .map(|cycle| format!("({})", cycle.iter().join(" ")))
            .join(" ");
        if nontrivial.is_empty() {
            write!(f, "()")?;
        } else {
            write!(f, "{nontrivial}")?;
        }

        // Then show the successor table
        write!(f, " [{}]", self.map.iter().join(" "))
    }
}

impl Index<usize> for Permutation {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.map()[index]
    }
}
