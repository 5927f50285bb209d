use thiserror::Error;

/// Errors raised when a permutation, cycle decomposition or oracle does not
/// describe a bijection on `0..n`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermutationError {
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(BijectionViolation),

    #[error("Invalid oracle: succ and pred are not mutual inverses at index {index}")]
    InvalidOracle { index: usize },

    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Length mismatch: slice has {slice} elements, permutation acts on {permutation}")]
    LengthMismatch { slice: usize, permutation: usize },
}

/// The way in which a candidate permutation fails to be a bijection.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BijectionViolation {
    #[error("index {0} appears more than once")]
    Duplicate(usize),
    #[error("empty cycle")]
    EmptyCycle,
}

impl From<BijectionViolation> for PermutationError {
    fn from(value: BijectionViolation) -> Self {
        PermutationError::InvalidPermutation(value)
    }
}
