//! We give a general description of a fingerprint, which is a bit packed integer encoding some
//! (possibly projected) information about a puzzle state, used as a lookup key.

/// A fingerprint type, encoding a projection of the puzzle P.
///
/// Unlike a dense coordinate, the values of a fingerprint are sparse, so tables keyed by one are
/// hash maps rather than arrays.
pub trait Fingerprint<P>: Copy + Eq + std::hash::Hash {
    /// Obtain the fingerprint that corresponds to the given puzzle.
    fn from_puzzle(puzzle: &P) -> Self;

    /// A representation of this fingerprint as a u64, for use as a table key.
    fn repr(self) -> u64;

    /// Convert the representation of a fingerprint back into the fingerprint itself.
    fn from_repr(n: u64) -> Self;

    /// A short name for the projection, used in log messages.
    fn name() -> &'static str;
}
