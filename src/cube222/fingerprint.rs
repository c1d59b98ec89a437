//! Fingerprints of the 2x2x2 and the bit layout they share.
//!
//! Every fingerprint is taken of the canonical cube, so all rotations of a state share one.
//!
//! ```text
//! permutation  bits 3i..3i+3   piece in slot i   (24 bits)
//! orientation  bits 2i..2i+2   twist in slot i   (16 bits)
//! full         permutation | orientation << 24
//! ```

use super::Cube222;
use crate::fingerprint::Fingerprint;

/// Width of a permutation fingerprint.
pub const PERMUTATION_BITS: u32 = 24;
/// Width of an orientation fingerprint.
pub const ORIENTATION_BITS: u32 = 16;
/// Where the orientation bits start within a full fingerprint.
pub const ORIENTATION_SHIFT: u32 = PERMUTATION_BITS;

const PERMUTATION_MASK: u64 = (1 << PERMUTATION_BITS) - 1;
const ORIENTATION_MASK: u64 = (1 << ORIENTATION_BITS) - 1;

/// The canonical piece permutation, ignoring twists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PermutationFingerprint(u32);

/// The canonical corner twists, ignoring which piece is where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrientationFingerprint(u16);

/// The whole canonical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FullFingerprint(u64);

fn pack_permutation(canonical: &Cube222) -> PermutationFingerprint {
    let bits = canonical
        .corners()
        .iter()
        .enumerate()
        .fold(0, |acc, (i, c)| acc | ((c.piece as u32) << (3 * i)));
    PermutationFingerprint(bits)
}

fn pack_orientation(canonical: &Cube222) -> OrientationFingerprint {
    let bits = canonical
        .corners()
        .iter()
        .enumerate()
        .fold(0, |acc, (i, c)| acc | ((c.twist as u16) << (2 * i)));
    OrientationFingerprint(bits)
}

impl FullFingerprint {
    /// Combine the two projections of one state.
    pub fn join(perm: PermutationFingerprint, ori: OrientationFingerprint) -> FullFingerprint {
        FullFingerprint(perm.0 as u64 | ((ori.0 as u64) << ORIENTATION_SHIFT))
    }

    /// Separate a full fingerprint into its permutation and orientation projections.
    pub fn split(self) -> (PermutationFingerprint, OrientationFingerprint) {
        (
            PermutationFingerprint((self.0 & PERMUTATION_MASK) as u32),
            OrientationFingerprint(((self.0 >> ORIENTATION_SHIFT) & ORIENTATION_MASK) as u16),
        )
    }
}

impl Fingerprint<Cube222> for PermutationFingerprint {
    fn from_puzzle(puzzle: &Cube222) -> Self {
        pack_permutation(&puzzle.canonical())
    }

    fn repr(self) -> u64 {
        self.0 as u64
    }

    fn from_repr(n: u64) -> Self {
        PermutationFingerprint((n & PERMUTATION_MASK) as u32)
    }

    fn name() -> &'static str {
        "permutation"
    }
}

impl Fingerprint<Cube222> for OrientationFingerprint {
    fn from_puzzle(puzzle: &Cube222) -> Self {
        pack_orientation(&puzzle.canonical())
    }

    fn repr(self) -> u64 {
        self.0 as u64
    }

    fn from_repr(n: u64) -> Self {
        OrientationFingerprint((n & ORIENTATION_MASK) as u16)
    }

    fn name() -> &'static str {
        "orientation"
    }
}

impl Fingerprint<Cube222> for FullFingerprint {
    fn from_puzzle(puzzle: &Cube222) -> Self {
        let canonical = puzzle.canonical();
        FullFingerprint::join(pack_permutation(&canonical), pack_orientation(&canonical))
    }

    fn repr(self) -> u64 {
        self.0
    }

    fn from_repr(n: u64) -> Self {
        FullFingerprint(n & (PERMUTATION_MASK | (ORIENTATION_MASK << ORIENTATION_SHIFT)))
    }

    fn name() -> &'static str {
        "full"
    }
}
