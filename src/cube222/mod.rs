//! Implementation of the corner-only 2x2x2 cube (the pocket cube).
//!
//! The state is the piece and twist held by each of the 8 corner slots. The slot index is the
//! position, so the permutation is implicit in which piece sits at which index:
//!
//! ```text
//!  slot   0   1   2   3   4   5   6   7
//!        URF ULF ULB URB DRF DLF DLB DRB
//! solved WRB WRG WOG WOB YRB YRG YOG YOB
//! ```
//!
//! The twist of a corner is the number of clockwise twists needed to bring its U/D sticker back
//! into the U/D layer.

pub mod fingerprint;
pub mod moves;
pub mod solver;
pub mod symmetry;

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{ParseMoveError, TryFromIntToEnumError};
use crate::fingerprint::Fingerprint;
use crate::moves::MoveSequence;
use fingerprint::FullFingerprint;
use moves::Move222;

/// One of the 8 fixed corner positions of the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
#[repr(u8)]
pub enum Slot {
    URF,
    ULF,
    ULB,
    URB,
    DRF,
    DLF,
    DLB,
    DRB,
}

impl Slot {
    /// Every slot, in index order.
    pub const ARRAY: [Slot; 8] = [
        Slot::URF,
        Slot::ULF,
        Slot::ULB,
        Slot::URB,
        Slot::DRF,
        Slot::DLF,
        Slot::DLB,
        Slot::DRB,
    ];
}

impl TryFrom<u8> for Slot {
    type Error = TryFromIntToEnumError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Slot::ARRAY
            .get(n as usize)
            .copied()
            .ok_or(TryFromIntToEnumError::OutOfBounds)
    }
}

/// One of the 8 corner pieces, named by its sticker colours (White/Yellow, Red/Orange,
/// Blue/Green).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
#[repr(u8)]
pub enum Piece {
    WRB,
    WRG,
    WOG,
    WOB,
    YRB,
    YRG,
    YOG,
    YOB,
}

impl Piece {
    /// Every piece, in index order. Piece `i` belongs in slot `i`.
    pub const ARRAY: [Piece; 8] = [
        Piece::WRB,
        Piece::WRG,
        Piece::WOG,
        Piece::WOB,
        Piece::YRB,
        Piece::YRG,
        Piece::YOG,
        Piece::YOB,
    ];
}

impl TryFrom<u8> for Piece {
    type Error = TryFromIntToEnumError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Piece::ARRAY
            .get(n as usize)
            .copied()
            .ok_or(TryFromIntToEnumError::OutOfBounds)
    }
}

/// The twist of a corner, counted in clockwise twists needed to orient it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum CornerTwist {
    /// The U/D sticker faces U or D.
    Oriented = 0,
    /// One clockwise twist orients the corner.
    Clockwise = 1,
    /// Two clockwise twists (one anticlockwise twist) orient the corner.
    AntiClockwise = 2,
}

impl CornerTwist {
    const fn from_mod3(n: u8) -> CornerTwist {
        match n % 3 {
            0 => CornerTwist::Oriented,
            1 => CornerTwist::Clockwise,
            _ => CornerTwist::AntiClockwise,
        }
    }

    /// Add two twists together, modulo 3.
    pub const fn twist_by(self, other: CornerTwist) -> CornerTwist {
        CornerTwist::from_mod3(self as u8 + other as u8)
    }

    /// The twist that cancels this one.
    pub const fn inverse(self) -> CornerTwist {
        CornerTwist::from_mod3(3 - self as u8)
    }
}

impl From<CornerTwist> for u8 {
    fn from(t: CornerTwist) -> u8 {
        t as u8
    }
}

impl TryFrom<u8> for CornerTwist {
    type Error = TryFromIntToEnumError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(CornerTwist::Oriented),
            1 => Ok(CornerTwist::Clockwise),
            2 => Ok(CornerTwist::AntiClockwise),
            _ => Err(TryFromIntToEnumError::OutOfBounds),
        }
    }
}

/// The piece occupying a slot, and how it is twisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CornerState {
    /// Which piece is in the slot.
    pub piece: Piece,
    /// How the piece is twisted.
    pub twist: CornerTwist,
}

/// A corner-only 2x2x2 cube.
///
/// Besides the corners, the cube remembers the last move applied to it. That move only serves
/// the neighbour generator and plays no part in equality: two cubes are equal iff their
/// (canonical) full fingerprints are, so cubes differing by a whole cube rotation are equal.
#[derive(Debug, Clone)]
pub struct Cube222 {
    corners: [CornerState; 8],
    last_move: Move222,
}

impl Cube222 {
    /// The solved cube stored as a const.
    pub const SOLVED: Cube222 = {
        let mut corners = [CornerState {
            piece: Piece::WRB,
            twist: CornerTwist::Oriented,
        }; 8];
        let mut i = 0;
        while i < 8 {
            corners[i].piece = Piece::ARRAY[i];
            i += 1;
        }
        Cube222 {
            corners,
            last_move: Move222::Identity,
        }
    };

    /// A solved cube.
    pub fn new() -> Cube222 {
        Cube222::SOLVED
    }

    /// A solved cube with the given moves applied.
    pub fn from_moves(moves: &str) -> Result<Cube222, ParseMoveError> {
        let mut cube = Cube222::new();
        cube.apply_moves(moves)?;
        Ok(cube)
    }

    /// The corners, indexed by slot.
    pub fn corners(&self) -> &[CornerState; 8] {
        &self.corners
    }

    /// The corner in the given slot.
    pub fn corner(&self, slot: Slot) -> CornerState {
        self.corners[slot as usize]
    }

    /// The slot currently holding the given piece.
    pub fn slot_of(&self, piece: Piece) -> Slot {
        let idx = self
            .corners
            .iter()
            .position(|c| c.piece == piece)
            .expect("every piece occupies exactly one slot");
        Slot::ARRAY[idx]
    }

    /// The last move applied, or [`Move222::Identity`] if there is none.
    pub fn last_move(&self) -> Move222 {
        self.last_move
    }

    /// Forget the last move, so that the neighbour generator treats this cube as a search root.
    pub fn clear_last_move(&mut self) -> &mut Self {
        self.last_move = Move222::Identity;
        self
    }

    /// Parse and apply a whitespace separated move string. Nothing is applied if any token is
    /// invalid.
    pub fn apply_moves(&mut self, moves: &str) -> Result<&mut Self, ParseMoveError> {
        let moves: MoveSequence<Move222> = moves.parse()?;
        Ok(self.make_moves(&moves))
    }

    /// Apply the inverse of a sequence, undoing it if it was the last thing applied.
    pub fn undo_moves(&mut self, moves: &MoveSequence<Move222>) -> &mut Self {
        self.make_moves(&moves.clone().inverse())
    }

    /// Compute a fingerprint of this cube.
    pub fn fingerprint<F: Fingerprint<Cube222>>(&self) -> F {
        F::from_puzzle(self)
    }

    /// Whether the cube is solved, up to a rotation of the whole cube.
    pub fn is_solved(&self) -> bool {
        self.fingerprint::<FullFingerprint>() == Cube222::SOLVED.fingerprint::<FullFingerprint>()
    }
}

impl Default for Cube222 {
    fn default() -> Self {
        Cube222::new()
    }
}

impl PartialEq for Cube222 {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint::<FullFingerprint>() == other.fingerprint::<FullFingerprint>()
    }
}

impl Eq for Cube222 {}

impl Hash for Cube222 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint::<FullFingerprint>().hash(state);
    }
}

impl fmt::Display for Cube222 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, corner) in Slot::ARRAY.iter().zip(&self.corners) {
            writeln!(f, "{slot:?}: {:?} {}", corner.piece, corner.twist as u8)?;
        }
        Ok(())
    }
}
