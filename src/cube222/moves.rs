//! Face turns of the 2x2x2, their transition table and the pruned neighbour generator.

use std::fmt;
use std::str::FromStr;

use super::{CornerState, CornerTwist, Cube222};
use crate::error::ParseMoveError;
use crate::moves::{Cancellation, MoveSequence};

#[cfg(test)]
use proptest_derive::Arbitrary;

/// The six faces of the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum Face {
    /// Up
    U,
    /// Down
    D,
    /// Front
    F,
    /// Back
    B,
    /// Right
    R,
    /// Left
    L,
}

impl Face {
    /// Every face, in index order.
    pub const ARRAY: [Face; 6] = [Face::U, Face::D, Face::F, Face::B, Face::R, Face::L];

    /// The face opposite to the given one.
    pub const fn opposite(self) -> Face {
        match self {
            Face::U => Face::D,
            Face::D => Face::U,
            Face::F => Face::B,
            Face::B => Face::F,
            Face::R => Face::L,
            Face::L => Face::R,
        }
    }

    /// U, F and R are primary. A turn of a primary face may not be directly followed by a turn of
    /// its opposite face when generating neighbours, since the reverse order reaches the same
    /// state.
    pub const fn is_primary(self) -> bool {
        matches!(self, Face::U | Face::F | Face::R)
    }
}

/// A turn of the 2x2x2, or the identity.
///
/// The discriminant indexes the transition table: the identity comes first, then the quarter
/// turns, the inverse turns and the double turns, each in [`Face::ARRAY`] order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
#[allow(missing_docs)]
#[repr(u8)]
pub enum Move222 {
    Identity,
    U,
    D,
    F,
    B,
    R,
    L,
    UPrime,
    DPrime,
    FPrime,
    BPrime,
    RPrime,
    LPrime,
    U2,
    D2,
    F2,
    B2,
    R2,
    L2,
}

impl Move222 {
    /// Every move in discriminant order.
    pub const ALL: [Move222; 19] = [
        Move222::Identity,
        Move222::U,
        Move222::D,
        Move222::F,
        Move222::B,
        Move222::R,
        Move222::L,
        Move222::UPrime,
        Move222::DPrime,
        Move222::FPrime,
        Move222::BPrime,
        Move222::RPrime,
        Move222::LPrime,
        Move222::U2,
        Move222::D2,
        Move222::F2,
        Move222::B2,
        Move222::R2,
        Move222::L2,
    ];

    /// The turn of `face` by `count` clockwise quarter turns, taken mod 4.
    pub const fn from_face(face: Face, count: u8) -> Move222 {
        let f = face as usize;
        match count % 4 {
            0 => Move222::Identity,
            1 => Move222::ALL[1 + f],
            2 => Move222::ALL[13 + f],
            _ => Move222::ALL[7 + f],
        }
    }

    /// The face being turned, or `None` for the identity.
    pub const fn face(self) -> Option<Face> {
        match self as u8 {
            0 => None,
            n => Some(Face::ARRAY[((n - 1) % 6) as usize]),
        }
    }

    /// The number of clockwise quarter turns this move makes, from 0 to 3.
    pub const fn count(self) -> u8 {
        match self as u8 {
            0 => 0,
            1..=6 => 1,
            7..=12 => 3,
            _ => 2,
        }
    }

    /// Whether this move may directly follow `last` in a search tree.
    ///
    /// Two turns of the same face are never generated in a row, and after a primary face only
    /// that face's own axis partner is blocked as well.
    pub fn may_follow(self, last: Move222) -> bool {
        match (self.face(), last.face()) {
            (Some(face), Some(prev)) => {
                face != prev && !(prev.is_primary() && face == prev.opposite())
            }
            _ => true,
        }
    }
}

impl crate::moves::Move for Move222 {
    fn inverse(self) -> Self {
        match self.face() {
            Some(face) => Move222::from_face(face, 4 - self.count()),
            None => Move222::Identity,
        }
    }

    fn commutes_with(&self, b: &Self) -> bool {
        match (self.face(), b.face()) {
            (Some(a), Some(b)) => a == b || a.opposite() == b,
            _ => true,
        }
    }

    fn cancel(self, b: Self) -> Cancellation<Self> {
        match (self.face(), b.face()) {
            (None, None) => Cancellation::NoMove,
            (None, Some(_)) => Cancellation::OneMove(b),
            (Some(_), None) => Cancellation::OneMove(self),
            (Some(fa), Some(fb)) if fa == fb => match (self.count() + b.count()) % 4 {
                0 => Cancellation::NoMove,
                count => Cancellation::OneMove(Move222::from_face(fa, count)),
            },
            _ => Cancellation::TwoMove(self, b),
        }
    }
}

impl fmt::Display for Move222 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.face(), self.count()) {
            (None, _) => write!(f, "None"),
            (Some(face), 1) => write!(f, "{face:?}"),
            (Some(face), 3) => write!(f, "{face:?}'"),
            (Some(face), count) => write!(f, "{face:?}{count}"),
        }
    }
}

// Derived debug output for moves is unreadable in long sequences.
impl fmt::Debug for Move222 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Move222 {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseMoveError::InvalidMove(s.to_string());
        if s == "None" {
            return Ok(Move222::Identity);
        }

        let mut chars = s.chars();
        let face = match chars.next() {
            Some('U') => Face::U,
            Some('D') => Face::D,
            Some('F') => Face::F,
            Some('B') => Face::B,
            Some('R') => Face::R,
            Some('L') => Face::L,
            _ => return Err(invalid()),
        };
        let count = match chars.as_str() {
            "" => 1,
            "2" => 2,
            "'" => 3,
            _ => return Err(invalid()),
        };
        Ok(Move222::from_face(face, count))
    }
}

/// Create a move by specifying a face and a quarter turn count, e.g. `mv!(R, 3)` for R'. `Face`
/// and `Move222` need to be in scope.
#[macro_export]
macro_rules! mv {
    ($ty:ident, $count: expr) => {
        Move222::from_face(Face::$ty, $count)
    };
}

/// A trait to classify a type as a move generator: the set of moves a search may branch on.
pub trait MoveGenerator {
    /// The amount of moves that are available in the moveset.
    const SIZE: usize;
    /// A list of all valid moves, in the order neighbours are generated.
    const MOVE_LIST: &'static [Move222];
}

/// Type for Half Turn Metric
pub struct Htm;

impl MoveGenerator for Htm {
    const SIZE: usize = 18;
    const MOVE_LIST: &'static [Move222] = &[
        mv!(U, 1),
        mv!(U, 3),
        mv!(U, 2),
        mv!(D, 1),
        mv!(D, 3),
        mv!(D, 2),
        mv!(F, 1),
        mv!(F, 3),
        mv!(F, 2),
        mv!(B, 1),
        mv!(B, 3),
        mv!(B, 2),
        mv!(R, 1),
        mv!(R, 3),
        mv!(R, 2),
        mv!(L, 1),
        mv!(L, 3),
        mv!(L, 2),
    ];
}

/// Where each slot takes its corner from (`new[i] = old[perm[i]]`), and the twist added to it.
#[derive(Clone, Copy)]
struct Transition {
    perm: [u8; 8],
    twist: [CornerTwist; 8],
}

const IDENTITY: Transition = Transition {
    perm: [0, 1, 2, 3, 4, 5, 6, 7],
    twist: [CornerTwist::Oriented; 8],
};

const QUARTER_PERM: [[u8; 8]; 6] = [
    [3, 0, 1, 2, 4, 5, 6, 7],
    [0, 1, 2, 3, 5, 6, 7, 4],
    [1, 5, 2, 3, 0, 4, 6, 7],
    [0, 1, 3, 7, 4, 5, 2, 6],
    [4, 1, 2, 0, 7, 5, 6, 3],
    [0, 2, 6, 3, 4, 1, 5, 7],
];
const QUARTER_TWIST: [[u8; 8]; 6] = [
    [0; 8],
    [0; 8],
    [2, 1, 0, 0, 1, 2, 0, 0],
    [0, 0, 2, 1, 0, 0, 1, 2],
    [1, 0, 0, 2, 2, 0, 0, 1],
    [0, 2, 1, 0, 0, 1, 2, 0],
];

const fn quarter(face: usize) -> Transition {
    let mut twist = [CornerTwist::Oriented; 8];
    let mut i = 0;
    while i < 8 {
        twist[i] = CornerTwist::from_mod3(QUARTER_TWIST[face][i]);
        i += 1;
    }
    Transition {
        perm: QUARTER_PERM[face],
        twist,
    }
}

/// The transition of applying `a` and then `b`.
const fn compose(a: &Transition, b: &Transition) -> Transition {
    let mut result = IDENTITY;
    let mut i = 0;
    while i < 8 {
        let j = b.perm[i] as usize;
        result.perm[i] = a.perm[j];
        result.twist[i] = a.twist[j].twist_by(b.twist[i]);
        i += 1;
    }
    result
}

const TRANSITIONS: [Transition; 19] = {
    let mut table = [IDENTITY; 19];
    let mut face = 0;
    while face < 6 {
        let q = quarter(face);
        let double = compose(&q, &q);
        table[1 + face] = q;
        table[7 + face] = compose(&double, &q);
        table[13 + face] = double;
        face += 1;
    }
    table
};

impl Cube222 {
    /// Apply a move to the cube, recording it as the last move.
    pub fn make_move(&mut self, mv: Move222) -> &mut Self {
        let transition = &TRANSITIONS[mv as usize];
        let old = self.corners;
        for (i, corner) in self.corners.iter_mut().enumerate() {
            let from = old[transition.perm[i] as usize];
            *corner = CornerState {
                piece: from.piece,
                twist: from.twist.twist_by(transition.twist[i]),
            };
        }
        self.last_move = mv;
        self
    }

    /// Apply an algorithm to a cube
    pub fn make_moves(&mut self, mvs: &MoveSequence<Move222>) -> &mut Self {
        for &mv in &mvs.0 {
            self.make_move(mv);
        }
        self
    }

    /// Every state one turn away, skipping turns that [`Move222::may_follow`] rules out after the
    /// last move. Each successor is an independent copy that remembers the turn that produced it.
    pub fn successors(&self) -> Vec<Cube222> {
        Htm::MOVE_LIST
            .iter()
            .filter(|mv| mv.may_follow(self.last_move))
            .map(|&mv| {
                let mut next = self.clone();
                next.make_move(mv);
                next
            })
            .collect()
    }
}

/// A random sequence of `length` turns in which no two consecutive turns share a face.
pub fn random_scramble(rng: &mut fastrand::Rng, length: usize) -> MoveSequence<Move222> {
    let mut moves = Vec::with_capacity(length);
    let mut last = None;
    while moves.len() < length {
        let mv = Htm::MOVE_LIST[rng.usize(..Htm::SIZE)];
        if mv.face() == last {
            continue;
        }
        last = mv.face();
        moves.push(mv);
    }
    MoveSequence(moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube222::Slot;
    use crate::moves::Move;

    fn turned_slots(mv: Move222) -> usize {
        let mut cube = Cube222::SOLVED;
        cube.make_move(mv);
        Slot::ARRAY
            .iter()
            .filter(|&&s| cube.corner(s) != Cube222::SOLVED.corner(s))
            .count()
    }

    #[test]
    fn quarter_turn_loop() {
        for face in Face::ARRAY {
            let mut cube = Cube222::SOLVED;
            for i in 1..=4 {
                cube.make_move(Move222::from_face(face, 1));
                assert_eq!(*cube.corners() == *Cube222::SOLVED.corners(), i == 4);
            }
        }
    }

    #[test]
    fn turns_touch_four_slots() {
        for mv in Htm::MOVE_LIST {
            assert_eq!(turned_slots(*mv), 4, "{mv}");
        }
        assert_eq!(turned_slots(Move222::Identity), 0);
    }

    #[test]
    fn twists() {
        for mv in Htm::MOVE_LIST {
            let mut cube = Cube222::SOLVED;
            cube.make_move(*mv);
            let twisted = cube
                .corners()
                .iter()
                .filter(|c| c.twist != CornerTwist::Oriented)
                .count();
            let expected = match (mv.face(), mv.count()) {
                (Some(Face::U | Face::D), _) | (_, 2) => 0,
                _ => 4,
            };
            assert_eq!(twisted, expected, "{mv}");
        }
    }

    #[test]
    fn double_turns_are_involutions() {
        for face in Face::ARRAY {
            let double = Move222::from_face(face, 2);
            let mut cube = Cube222::from_moves("R U F' L2 D").unwrap();
            let before = *cube.corners();
            cube.make_move(double).make_move(double);
            assert_eq!(*cube.corners(), before);
        }
    }

    #[test]
    fn sexy_move_order() {
        let mut cube = Cube222::new();
        for _ in 0..5 {
            cube.apply_moves("R U R' U'").unwrap();
        }
        assert!(!cube.is_solved());
        cube.apply_moves("R U R' U'").unwrap();
        assert!(cube.is_solved());
    }

    #[test]
    fn move_strings() {
        for mv in Move222::ALL {
            assert_eq!(mv.to_string().parse::<Move222>(), Ok(mv));
            assert_eq!(mv.inverse().inverse(), mv);
        }
        assert_eq!(Move222::Identity.to_string(), "None");
        assert_eq!("None".parse::<Move222>(), Ok(Move222::Identity));
        assert_eq!("R'".parse::<Move222>(), Ok(Move222::RPrime));
        assert_eq!(Move222::B2.to_string(), "B2");
        assert_eq!(format!("{:?}", Move222::LPrime), "L'");
        for bad in ["", "R3", "r", "M", "U''", "R2'", "x", "I", "none"] {
            assert_eq!(
                bad.parse::<Move222>(),
                Err(ParseMoveError::InvalidMove(bad.to_string()))
            );
        }
    }

    #[test]
    fn move_fields() {
        assert_eq!(Move222::FPrime.face(), Some(Face::F));
        assert_eq!(Move222::FPrime.count(), 3);
        assert_eq!(Move222::L2.count(), 2);
        assert_eq!(Move222::Identity.face(), None);
        assert_eq!(mv!(R, 5), Move222::R);
        assert_eq!(mv!(D, 4), Move222::Identity);
    }

    #[test]
    fn neighbour_pruning() {
        let solved = Cube222::new();
        assert_eq!(solved.successors().len(), 18);

        let after = |s: &str| Cube222::from_moves(s).unwrap().successors();
        // A primary face blocks its whole axis, a secondary face only itself.
        assert_eq!(after("U").len(), 12);
        assert_eq!(after("D").len(), 15);
        assert_eq!(after("R2").len(), 12);
        assert_eq!(after("L'").len(), 15);

        for next in after("F") {
            let face = next.last_move().face();
            assert!(face != Some(Face::F) && face != Some(Face::B));
        }
        assert!(after("B")
            .iter()
            .any(|c| c.last_move().face() == Some(Face::F)));
    }

    #[test]
    fn neighbours_are_fresh() {
        let mut cube = Cube222::from_moves("R U").unwrap();
        cube.clear_last_move();
        let successors = cube.successors();
        let moves: Vec<Move222> = successors.iter().map(|c| c.last_move()).collect();
        assert_eq!(moves, Htm::MOVE_LIST);
        assert_eq!(cube.last_move(), Move222::Identity);
        assert_eq!(cube, Cube222::from_moves("R U").unwrap());
    }

    #[test]
    fn scrambles() {
        let mut rng = fastrand::Rng::with_seed(7);
        let scramble = random_scramble(&mut rng, 40);
        assert_eq!(scramble.len(), 40);
        for pair in scramble.0.windows(2) {
            assert_ne!(pair[0].face(), pair[1].face());
        }
        assert!(scramble.0.iter().all(|m| *m != Move222::Identity));

        let again = random_scramble(&mut fastrand::Rng::with_seed(7), 40);
        assert_eq!(scramble, again);
        assert!(random_scramble(&mut rng, 0).is_empty());
    }

    use proptest::collection::vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn inverse_move(mvs in vec(any::<Move222>(), 0..10).prop_map(MoveSequence), mv in any::<Move222>()) {
            let mut cube = Cube222::SOLVED;
            cube.make_moves(&mvs);
            let before = *cube.corners();
            cube.make_move(mv).make_move(mv.inverse());
            assert_eq!(*cube.corners(), before);
        }

        #[test]
        fn cancel_same_moves(mvs in vec(any::<Move222>(), 0..20).prop_map(MoveSequence)) {
            let cancelled = mvs.clone().cancel();
            assert!(cancelled.len() <= mvs.len());
            let mut a = Cube222::SOLVED;
            let mut b = Cube222::SOLVED;
            a.make_moves(&mvs);
            b.make_moves(&cancelled);
            assert_eq!(a.corners(), b.corners());
        }

        #[test]
        fn invert_identity(mvs in vec(any::<Move222>(), 0..=20).prop_map(MoveSequence)) {
            let mut cube = Cube222::SOLVED;
            cube.make_moves(&mvs).make_moves(&mvs.clone().inverse());
            assert_eq!(cube.corners(), Cube222::SOLVED.corners());
            let cancelled = mvs.cancel();
            assert!(cancelled.clone().append(cancelled.inverse()).cancel().len() <= 1);
        }

        #[test]
        fn cancel_idempotent(mvs in vec(any::<Move222>(), 0..20).prop_map(MoveSequence)) {
            let cancelled = mvs.cancel();
            assert_eq!(cancelled.clone().cancel(), cancelled);
        }

        #[test]
        fn sequence_strings(mvs in vec(any::<Move222>(), 0..20).prop_map(MoveSequence)) {
            assert_eq!(mvs.to_string().parse::<MoveSequence<Move222>>(), Ok(mvs));
        }
    }
}
