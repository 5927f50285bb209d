//! # Cyclefollow
//!
//! Cyclefollow applies permutations to sequences in place. Instead of copying
//! into a second buffer it follows the cycles of the permutation, moving every
//! element exactly once and keeping a single bit of bookkeeping per position.
//!
//! A permutation can be given as a table ([`permutation::Permutation`]), as a
//! cycle decomposition ([`cycles::Cycles`]) or as a pair of closed-form
//! successor/predecessor functions ([`oracle::CycleOracle`]), such as the image
//! rotations and the even/odd split in [`oracle::geometry`].
//!
//! ```
//! use cyclefollow::{
//!     follow::permute_in_place,
//!     oracle::geometry::{Grid, RotateCw},
//! };
//!
//! // 1 2 3        4 1
//! // 4 5 6   ->   5 2
//! //              6 3
//! let mut image = vec![1, 2, 3, 4, 5, 6];
//! permute_in_place(&mut image, &RotateCw(Grid::new(3, 2))).unwrap();
//! assert_eq!(image, vec![4, 1, 5, 2, 6, 3]);
//! ```

pub mod cycles;
pub mod error;
pub mod follow;
pub mod oracle;
pub mod permutation;
