//! Whole cube rotations and the canonical orientation of a cube.
//!
//! A 2x2x2 has no fixed centres, so the 24 rotations of a state are the same puzzle. We collapse
//! them by rotating until the WRB corner sits in URF with its white sticker on U.

use super::{Cube222, Piece};
use crate::mv;
use super::moves::{Face, Move222};

#[cfg(test)]
use proptest_derive::Arbitrary;

/// A rotation of the whole cube, performed as a turn of two opposite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum Rotation {
    /// Along R, as `R L'`.
    X,
    /// `R' L`
    XPrime,
    /// `R2 L2`
    X2,
    /// Along U, as `U D'`.
    Y,
    /// `U' D`
    YPrime,
    /// `U2 D2`
    Y2,
    /// Along F, as `F B'`.
    Z,
    /// `F' B`
    ZPrime,
    /// `F2 B2`
    Z2,
}

impl Rotation {
    /// Every rotation.
    pub const ARRAY: [Rotation; 9] = [
        Rotation::X,
        Rotation::XPrime,
        Rotation::X2,
        Rotation::Y,
        Rotation::YPrime,
        Rotation::Y2,
        Rotation::Z,
        Rotation::ZPrime,
        Rotation::Z2,
    ];

    /// The pair of face turns making up this rotation.
    pub const fn moves(self) -> [Move222; 2] {
        match self {
            Rotation::X => [mv!(R, 1), mv!(L, 3)],
            Rotation::XPrime => [mv!(R, 3), mv!(L, 1)],
            Rotation::X2 => [mv!(R, 2), mv!(L, 2)],
            Rotation::Y => [mv!(U, 1), mv!(D, 3)],
            Rotation::YPrime => [mv!(U, 3), mv!(D, 1)],
            Rotation::Y2 => [mv!(U, 2), mv!(D, 2)],
            Rotation::Z => [mv!(F, 1), mv!(B, 3)],
            Rotation::ZPrime => [mv!(F, 3), mv!(B, 1)],
            Rotation::Z2 => [mv!(F, 2), mv!(B, 2)],
        }
    }
}

use Rotation::{X, X2, XPrime as Xi, Y, Y2, YPrime as Yi, Z, Z2, ZPrime as Zi};

/// Rotations bringing WRB home, indexed by the slot WRB is in and then its twist.
#[rustfmt::skip]
const CANONICAL: [[&[Rotation]; 3]; 8] = [
    /* URF */ [&[],       &[X, Y],   &[Xi, Zi]],
    /* ULF */ [&[Yi],     &[Z],      &[Y2, Xi]],
    /* ULB */ [&[Y2],     &[Yi, Z],  &[Xi, Z]],
    /* URB */ [&[Y],      &[Y2, Z],  &[Xi]],
    /* DRF */ [&[X2, Y],  &[Zi],     &[X]],
    /* DLF */ [&[Z2],     &[X, Yi],  &[Yi, X]],
    /* DLB */ [&[X2, Yi], &[Y2, Zi], &[Y2, X]],
    /* DRB */ [&[X2],     &[Xi, Y],  &[Y, X]],
];

impl Cube222 {
    /// Rotate the whole cube. The last move is left alone, since no face was turned relative to
    /// the others.
    pub fn rotate(&mut self, rotation: Rotation) -> &mut Self {
        let last_move = self.last_move;
        for mv in rotation.moves() {
            self.make_move(mv);
        }
        self.last_move = last_move;
        self
    }

    /// Rotate the cube into its canonical orientation, with WRB in URF and untwisted.
    pub fn canonicalize(&mut self) -> &mut Self {
        let slot = self.slot_of(Piece::WRB);
        let twist = self.corner(slot).twist;
        for &rotation in CANONICAL[slot as usize][twist as usize] {
            self.rotate(rotation);
        }
        self
    }

    /// A canonicalized copy of this cube.
    pub fn canonical(&self) -> Cube222 {
        let mut cube = self.clone();
        cube.canonicalize();
        cube
    }
}
