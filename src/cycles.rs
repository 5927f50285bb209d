//! # Cycle notation
//!
//! A [`Cycles`] value is a validated partition of `0..n` into disjoint cycles.
//! Every cycle lists its indices in successor order: `[s, succ(s), succ(succ(s)), ...]`,
//! so the value sitting at `cycle[i]` is moved to `cycle[i + 1]` (wrapping around).
//!
//! Decompositions are computed with a bitset of unvisited indices and a forward
//! scan, which makes the anchor of every cycle its smallest element and the
//! output deterministic.

use std::fmt;

use ahash::AHashSet;
use bitvec::{bitvec, vec::BitVec};
use itertools::Itertools;
use log::{debug, trace};

use crate::{
    error::{BijectionViolation, PermutationError},
    oracle::CycleOracle,
    permutation::Permutation,
};

/// A disjoint cycle decomposition of a permutation of `0..len`.
///
/// # Examples
///
/// ```
/// # use cyclefollow::cycles::Cycles;
/// let cycles = Cycles::from_one_line(&[0, 2, 4, 6, 8, 1, 3, 5, 7, 9]).unwrap();
/// assert_eq!(cycles.to_string(), "(0)(1 5 7 8 4 2)(3 6)(9)");
/// assert_eq!(cycles.order(), Some(6));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
pub struct Cycles {
    cycles: Vec<Vec<usize>>,
    len: usize,
}

impl Cycles {
    /// Validates a list of cycles as a partition of `0..n`, where `n` is the total
    /// number of indices listed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::{cycles::Cycles, error::{BijectionViolation, PermutationError}};
    /// assert!(Cycles::new(vec![vec![0, 2], vec![1]]).is_ok());
    /// assert_eq!(
    ///     Cycles::new(vec![vec![0, 1], vec![1, 2]]),
    ///     Err(PermutationError::InvalidPermutation(BijectionViolation::Duplicate(1)))
    /// );
    /// assert_eq!(
    ///     Cycles::new(vec![vec![0, 2]]),
    ///     Err(PermutationError::IndexOutOfRange { index: 2, len: 2 })
    /// );
    /// ```
    pub fn new(cycles: Vec<Vec<usize>>) -> Result<Self, PermutationError> {
        if cycles.iter().any(Vec::is_empty) {
            return Err(BijectionViolation::EmptyCycle.into());
        }
        let len: usize = cycles.iter().map(Vec::len).sum();

        // `len` distinct indices below `len` cover all of `0..len`.
        let mut seen: BitVec = bitvec![0; len];
        for &index in cycles.iter().flatten() {
            if index >= len {
                return Err(PermutationError::IndexOutOfRange { index, len });
            }
            if seen.replace(index, true) {
                return Err(BijectionViolation::Duplicate(index).into());
            }
        }

        Ok(Cycles { cycles, len })
    }

    /// Wraps cycles that are already known to partition `0..len`.
    pub(crate) fn new_unchecked(cycles: Vec<Vec<usize>>, len: usize) -> Self {
        Cycles { cycles, len }
    }

    /// The trivial decomposition of the identity on `0..len`: only fixed points.
    pub fn id(len: usize) -> Self {
        Cycles {
            cycles: (0..len).map(|i| vec![i]).collect(),
            len,
        }
    }

    /// Decomposes a permutation given in one-line notation, where `line[i]` is the
    /// index whose value moves into position `i`.
    pub fn from_one_line(line: &[usize]) -> Result<Self, PermutationError> {
        let permutation = Permutation::from_one_line(line.to_vec())?;
        Self::from_oracle(&permutation)
    }

    /// Decomposes the permutation described by `oracle` by walking `succ` from
    /// every not yet visited index. `pred` is checked against each step, so an
    /// inconsistent oracle is reported instead of producing a bogus partition.
    pub fn from_oracle<O: CycleOracle + ?Sized>(oracle: &O) -> Result<Self, PermutationError> {
        let len = oracle.len();
        let cycles = orbits(len, |prev| {
            let x = oracle.succ(prev);
            if x >= len {
                return Err(PermutationError::IndexOutOfRange { index: x, len });
            }
            if oracle.pred(x) != prev {
                return Err(PermutationError::InvalidOracle { index: prev });
            }
            Ok(x)
        })?;

        debug!(
            "decomposed permutation of length {len} into {} cycles",
            cycles.len()
        );
        Ok(Cycles { cycles, len })
    }

    /// Reconstructs the one-line notation: `line[x]` is the predecessor of `x`
    /// in its cycle.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::cycles::Cycles;
    /// let cycles = Cycles::new(vec![vec![0, 2, 1], vec![3]]).unwrap();
    /// assert_eq!(cycles.one_line(), vec![1, 2, 0, 3]);
    /// ```
    pub fn one_line(&self) -> Vec<usize> {
        let mut line = vec![0; self.len];
        for cycle in &self.cycles {
            let k = cycle.len();
            for (i, &x) in cycle.iter().enumerate() {
                line[x] = cycle[(i + k - 1) % k];
            }
        }
        line
    }

    /// The number of elements permuted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn num_cycles(&self) -> usize {
        self.cycles.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<usize>> {
        self.cycles.iter()
    }

    pub fn as_slice(&self) -> &[Vec<usize>] {
        &self.cycles
    }

    pub fn into_inner(self) -> Vec<Vec<usize>> {
        self.cycles
    }

    pub fn cycle_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.cycles.iter().map(Vec::len)
    }

    /// Indices `x` with `succ(x) == x`.
    pub fn fixed_points(&self) -> impl Iterator<Item = usize> + '_ {
        self.cycles
            .iter()
            .filter(|c| c.len() == 1)
            .map(|c| c[0])
    }

    /// Least common multiple of the cycle lengths, `None` if it overflows `usize`.
    pub fn order(&self) -> Option<usize> {
        order_from_cycles(&self.cycles)
    }

    /// +1 for even permutations, -1 for odd ones.
    pub fn sign(&self) -> i8 {
        if (self.len - self.cycles.len()) % 2 == 0 {
            1
        } else {
            -1
        }
    }

    /// Rotates every cycle to start at its smallest index and sorts the cycles by
    /// that index. Two decompositions of the same permutation normalize to the same value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cyclefollow::cycles::Cycles;
    /// let cycles = Cycles::new(vec![vec![3], vec![2, 0, 1]]).unwrap();
    /// assert_eq!(cycles.normalized().to_string(), "(0 1 2)(3)");
    /// ```
    pub fn normalized(&self) -> Self {
        let mut cycles: Vec<Vec<usize>> = self
            .cycles
            .iter()
            .map(|cycle| {
                let mut cycle = cycle.clone();
                if let Some(start) = cycle.iter().position_min() {
                    cycle.rotate_left(start);
                }
                cycle
            })
            .collect();
        cycles.sort_unstable_by_key(|cycle| cycle.first().copied());
        Cycles {
            cycles,
            len: self.len,
        }
    }

    /// Whether both decompositions describe the same permutation, regardless of
    /// cycle order and of which element each cycle starts at.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        if self.len != other.len || self.num_cycles() != other.num_cycles() {
            return false;
        }
        let canonical = |c: &Cycles| -> AHashSet<Vec<usize>> {
            c.normalized().cycles.into_iter().collect()
        };
        canonical(self) == canonical(other)
    }
}

impl<'a> IntoIterator for &'a Cycles {
    type Item = &'a Vec<usize>;
    type IntoIter = std::slice::Iter<'a, Vec<usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cycles.iter()
    }
}

impl fmt::Display for Cycles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cycles.is_empty() {
            return write!(f, "()");
        }
        for cycle in &self.cycles {
            write!(f, "({})", cycle.iter().join(" "))?;
        }
        Ok(())
    }
}

/// Splits `0..len` into the orbits of `step`, anchoring each orbit at its
/// smallest index. An orbit closes when `step` returns to the anchor, or when it
/// leaves `0..len` or reaches an index that is already placed, so the walk
/// terminates for any `step`.
pub(crate) fn orbits<E>(
    len: usize,
    mut step: impl FnMut(usize) -> Result<usize, E>,
) -> Result<Vec<Vec<usize>>, E> {
    let mut unvisited: BitVec = bitvec![1; len];
    let mut orbits = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = unvisited[cursor..].first_one() {
        let anchor = cursor + offset;
        cursor = anchor + 1;
        unvisited.set(anchor, false);

        let mut orbit = vec![anchor];
        let mut prev = anchor;
        loop {
            let x = step(prev)?;
            if x == anchor || x >= len || !unvisited.replace(x, false) {
                break;
            }
            orbit.push(x);
            prev = x;
        }
        trace!("cycle anchored at {anchor} has length {}", orbit.len());
        orbits.push(orbit);
    }
    Ok(orbits)
}

/// Cycle decomposition of a permutation in one-line notation (`line[i]` is the
/// source of position `i`).
pub fn cycles_from_one_line(line: &[usize]) -> Result<Vec<Vec<usize>>, PermutationError> {
    Cycles::from_one_line(line).map(Cycles::into_inner)
}

/// Inverse of [`cycles_from_one_line`], up to the starting point and order of the cycles.
pub fn one_line_from_cycles(cycles: &[Vec<usize>]) -> Result<Vec<usize>, PermutationError> {
    Ok(Cycles::new(cycles.to_vec())?.one_line())
}

/// Order of the permutation with the given cycles: the least common multiple of
/// their lengths. Returns `None` on overflow.
pub fn order_from_cycles<C: AsRef<[usize]>>(cycles: &[C]) -> Option<usize> {
    cycles
        .iter()
        .map(|cycle| cycle.as_ref().len())
        .filter(|&k| k > 0)
        .try_fold(1, lcm)
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn lcm(a: usize, b: usize) -> Option<usize> {
    (a / gcd(a, b)).checked_mul(b)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    const EVEN_ODD_LINE: [usize; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

    #[test]
    fn test_from_one_line_even_odd() {
        let cycles = Cycles::from_one_line(&EVEN_ODD_LINE).unwrap();
        assert_eq!(
            cycles.as_slice(),
            &[vec![0], vec![1, 5, 7, 8, 4, 2], vec![3, 6], vec![9]]
        );
        assert_eq!(cycles.len(), 10);
        assert_eq!(cycles.num_cycles(), 4);
        assert_eq!(cycles.fixed_points().collect::<Vec<_>>(), vec![0, 9]);
        assert_eq!(cycles.order(), Some(6));
        insta::assert_snapshot!(cycles.to_string(), @"(0)(1 5 7 8 4 2)(3 6)(9)");
    }

    #[test]
    fn test_one_line_round_trip() {
        let cycles = cycles_from_one_line(&EVEN_ODD_LINE).unwrap();
        assert_eq!(one_line_from_cycles(&cycles).unwrap(), EVEN_ODD_LINE);

        // Rotated and reordered cycles describe the same permutation.
        let shuffled = vec![vec![6, 3], vec![9], vec![4, 2, 1, 5, 7, 8], vec![0]];
        assert_eq!(one_line_from_cycles(&shuffled).unwrap(), EVEN_ODD_LINE);
        let shuffled = Cycles::new(shuffled).unwrap();
        assert!(shuffled.is_equivalent(&Cycles::from_one_line(&EVEN_ODD_LINE).unwrap()));
        assert_ne!(shuffled, Cycles::from_one_line(&EVEN_ODD_LINE).unwrap());
    }

    #[test]
    fn test_new_rejects_non_partitions() {
        assert_eq!(
            Cycles::new(vec![vec![0, 1], vec![1, 2]]),
            Err(PermutationError::InvalidPermutation(
                BijectionViolation::Duplicate(1)
            ))
        );
        assert_eq!(
            Cycles::new(vec![vec![0, 2]]),
            Err(PermutationError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            Cycles::new(vec![vec![0], vec![]]),
            Err(PermutationError::InvalidPermutation(
                BijectionViolation::EmptyCycle
            ))
        );

        let empty = Cycles::new(vec![]).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.order(), Some(1));
        assert_eq!(empty.to_string(), "()");
    }

    #[test]
    fn test_new_rejects_huge_indices() {
        assert_eq!(
            Cycles::new(vec![vec![usize::MAX]]),
            Err(PermutationError::IndexOutOfRange {
                index: usize::MAX,
                len: 1
            })
        );
        assert_eq!(
            Cycles::new(vec![vec![0, 1 << 40]]),
            Err(PermutationError::IndexOutOfRange {
                index: 1 << 40,
                len: 2
            })
        );
        assert_eq!(
            one_line_from_cycles(&[vec![0, usize::MAX]]),
            Err(PermutationError::IndexOutOfRange {
                index: usize::MAX,
                len: 2
            })
        );
        assert_eq!(
            Cycles::new(vec![vec![1, 0], vec![3]]),
            Err(PermutationError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_orbits_terminate_on_stray_steps() {
        // 0 -> 1 -> 2 -> 1 never returns to 0.
        let looping = orbits::<Infallible>(3, |i| Ok([1, 2, 1][i])).unwrap();
        assert_eq!(looping, vec![vec![0, 1, 2]]);

        let escaping = orbits::<Infallible>(2, |i| Ok(i + 7)).unwrap();
        assert_eq!(escaping, vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_from_one_line_rejects_non_permutations() {
        assert_eq!(
            Cycles::from_one_line(&[0, 0, 1]),
            Err(PermutationError::InvalidPermutation(
                BijectionViolation::Duplicate(0)
            ))
        );
        assert_eq!(
            Cycles::from_one_line(&[0, 3, 1]),
            Err(PermutationError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_normalized() {
        let cycles = Cycles::new(vec![vec![4, 3], vec![2, 0, 1]]).unwrap();
        let normalized = cycles.normalized();
        assert_eq!(normalized.as_slice(), &[vec![0, 1, 2], vec![3, 4]]);
        assert_eq!(normalized.one_line(), cycles.one_line());
    }

    #[test]
    fn test_is_equivalent_distinguishes_direction() {
        let forward = Cycles::new(vec![vec![0, 1, 2]]).unwrap();
        let backward = Cycles::new(vec![vec![0, 2, 1]]).unwrap();
        assert!(!forward.is_equivalent(&backward));
        assert!(forward.is_equivalent(&Cycles::new(vec![vec![1, 2, 0]]).unwrap()));
    }

    #[test]
    fn test_order_and_sign() {
        assert_eq!(order_from_cycles(&[vec![0usize, 1], vec![2, 3, 4]]), Some(6));
        assert_eq!(order_from_cycles(&[vec![0usize, 1, 2, 3], vec![4, 5]]), Some(4));
        assert_eq!(order_from_cycles::<Vec<usize>>(&[]), Some(1));
        assert_eq!(Cycles::id(5).order(), Some(1));

        assert_eq!(Cycles::new(vec![vec![0, 1], vec![2]]).unwrap().sign(), -1);
        assert_eq!(Cycles::new(vec![vec![0, 1, 2]]).unwrap().sign(), 1);
        assert_eq!(Cycles::id(4).sign(), 1);
    }

    #[test]
    fn test_order_overflow() {
        // Cycles with pairwise coprime lengths whose product exceeds u64::MAX.
        let primes: [usize; 17] = [
            2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59,
        ];
        let mut start = 0;
        let cycles: Vec<Vec<usize>> = primes
            .iter()
            .map(|&p| {
                let cycle: Vec<usize> = (start..start + p).collect();
                start += p;
                cycle
            })
            .collect();
        assert_eq!(order_from_cycles(&cycles), None);
        assert_eq!(order_from_cycles(&cycles[..5]), Some(2 * 3 * 5 * 7 * 11));
    }
}
