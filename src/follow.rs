//! # Follow-the-cycles
//!
//! In-place application of a permutation using a bitset of `n` bits as the only
//! bookkeeping. For every cycle the engine picks an anchor `s`, sets its value
//! aside and walks the cycle *backwards*: the value at `pred(s)` moves into `s`,
//! the value at `pred(pred(s))` moves into `pred(s)`, and so on, until the walk
//! returns to `s` and the saved value is deposited at `succ(s)`. Walking
//! backwards means every slot is overwritten only after its own value has left.
//!
//! The saved value rides along in the slot that was just vacated, so each step
//! is a single [`slice::swap`] and `T` needs neither `Clone` nor `Default`.
//!
//! After a pass, `new[succ(i)] == old[i]` for every `i`.

use bitvec::{bitvec, vec::BitVec};
use log::{debug, trace};

use crate::{cycles::Cycles, error::PermutationError, oracle::CycleOracle};

/// Permutes `slice` in place according to `oracle`, moving the value at `i` to
/// `oracle.succ(i)`.
///
/// The walk checks each step: `pred` must stay in range, must not lead back to a
/// slot that was already filled, and `succ` must undo it. A violation returns an
/// error immediately, leaving `slice` partially permuted. Use
/// [`permute_in_place_checked`] when the slice must stay untouched on failure.
///
/// # Examples
///
/// ```
/// # use cyclefollow::{follow::permute_in_place, oracle::geometry::{Grid, Rotate180}};
/// let mut data: Vec<usize> = (0..12).collect();
/// permute_in_place(&mut data, &Rotate180(Grid::new(4, 3))).unwrap();
/// assert_eq!(data, vec![11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
/// ```
pub fn permute_in_place<T, O>(slice: &mut [T], oracle: &O) -> Result<(), PermutationError>
where
    O: CycleOracle + ?Sized,
{
    let len = oracle.len();
    if slice.len() != len {
        return Err(PermutationError::LengthMismatch {
            slice: slice.len(),
            permutation: len,
        });
    }

    let mut unmoved: BitVec = bitvec![1; len];
    let mut cursor = 0;
    let mut cycles = 0;

    while let Some(offset) = unmoved[cursor..].first_one() {
        let anchor = cursor + offset;
        cursor = anchor + 1;
        unmoved.set(anchor, false);

        let length = follow_cycle(slice, oracle, anchor, &mut unmoved)?;
        trace!("moved cycle anchored at {anchor} of length {length}");
        cycles += 1;
    }

    debug!("permuted {len} elements through {cycles} cycles");
    Ok(())
}

/// Moves every value of the cycle through `anchor` one step forward and returns
/// the length of the cycle.
fn follow_cycle<T, O>(
    slice: &mut [T],
    oracle: &O,
    anchor: usize,
    unmoved: &mut BitVec,
) -> Result<usize, PermutationError>
where
    O: CycleOracle + ?Sized,
{
    let len = slice.len();
    // Slot currently holding the anchor's value, i.e. the next slot to fill.
    let mut hole = anchor;
    let mut length = 1;
    let mut x = oracle.pred(anchor);

    while x != anchor {
        if x >= len {
            return Err(PermutationError::IndexOutOfRange { index: x, len });
        }
        if oracle.succ(x) != hole || !unmoved.replace(x, false) {
            return Err(PermutationError::InvalidOracle { index: x });
        }
        slice.swap(hole, x);
        hole = x;
        length += 1;
        x = oracle.pred(x);
    }

    if oracle.succ(anchor) != hole {
        return Err(PermutationError::InvalidOracle { index: anchor });
    }
    Ok(length)
}

/// Like [`permute_in_place`], but validates the whole oracle first so that
/// `slice` is left untouched when an error is returned.
pub fn permute_in_place_checked<T, O>(slice: &mut [T], oracle: &O) -> Result<(), PermutationError>
where
    O: CycleOracle + ?Sized,
{
    if slice.len() != oracle.len() {
        return Err(PermutationError::LengthMismatch {
            slice: slice.len(),
            permutation: oracle.len(),
        });
    }
    oracle.validate()?;
    permute_in_place(slice, oracle)
}

/// Permutes `slice` in place along a materialized cycle decomposition: the value
/// at `cycle[i]` moves to `cycle[i + 1]`, and the last one wraps to `cycle[0]`.
///
/// # Examples
///
/// ```
/// # use cyclefollow::{cycles::Cycles, follow::permute_in_place_by_cycles};
/// let cycles = Cycles::new(vec![vec![0, 2, 1], vec![3]]).unwrap();
/// let mut data = vec!['a', 'b', 'c', 'd'];
/// permute_in_place_by_cycles(&mut data, &cycles).unwrap();
/// assert_eq!(data, vec!['b', 'c', 'a', 'd']);
/// ```
pub fn permute_in_place_by_cycles<T>(
    slice: &mut [T],
    cycles: &Cycles,
) -> Result<(), PermutationError> {
    if slice.len() != cycles.len() {
        return Err(PermutationError::LengthMismatch {
            slice: slice.len(),
            permutation: cycles.len(),
        });
    }

    for cycle in cycles {
        let Some((&anchor, rest)) = cycle.split_first() else {
            continue;
        };
        let mut hole = anchor;
        for &x in rest.iter().rev() {
            slice.swap(hole, x);
            hole = x;
        }
    }

    debug!(
        "permuted {} elements through {} materialized cycles",
        cycles.len(),
        cycles.num_cycles()
    );
    Ok(())
}

/// Applies the permutation `times` times in a row.
///
/// Applying it [`Cycles::order`] times leaves `slice` as it was.
pub fn permute_in_place_pow<T, O>(
    slice: &mut [T],
    oracle: &O,
    times: usize,
) -> Result<(), PermutationError>
where
    O: CycleOracle + ?Sized,
{
    for _ in 0..times {
        permute_in_place(slice, oracle)?;
    }
    Ok(())
}
