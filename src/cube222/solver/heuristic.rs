//! Distance estimates for A*, backed by the pattern tables.

use std::fmt;

use super::prune::{HeuristicTables, OrientationTable, PerfectTable, PermutationTable};
use crate::cube222::fingerprint::FullFingerprint;
use crate::cube222::Cube222;
use crate::fingerprint::Fingerprint;

/// An estimate of how many moves a cube is from solved.
///
/// For A* to find optimal solutions the estimate must be admissible, never more than the true
/// distance. Every heuristic here is.
pub trait Heuristic {
    /// Estimate the distance of the cube from solved.
    fn estimate(&self, cube: &Cube222) -> usize;
}

impl<H: Heuristic + ?Sized> Heuristic for &H {
    fn estimate(&self, cube: &Cube222) -> usize {
        (**self).estimate(cube)
    }
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    fn estimate(&self, cube: &Cube222) -> usize {
        (**self).estimate(cube)
    }
}

/// Distance of the piece permutation alone.
#[derive(Clone, Copy)]
pub struct PermutationHeuristic<'t>(pub &'t PermutationTable);

impl Heuristic for PermutationHeuristic<'_> {
    fn estimate(&self, cube: &Cube222) -> usize {
        self.0.lookup(cube) as usize
    }
}

/// Distance of the corner twists alone.
#[derive(Clone, Copy)]
pub struct OrientationHeuristic<'t>(pub &'t OrientationTable);

impl Heuristic for OrientationHeuristic<'_> {
    fn estimate(&self, cube: &Cube222) -> usize {
        self.0.lookup(cube) as usize
    }
}

/// The larger of the permutation and orientation distances.
#[derive(Clone, Copy)]
pub struct DualHeuristic<'t> {
    /// Table for the permutation bound.
    pub permutation: &'t PermutationTable,
    /// Table for the orientation bound.
    pub orientation: &'t OrientationTable,
}

impl Heuristic for DualHeuristic<'_> {
    fn estimate(&self, cube: &Cube222) -> usize {
        let (perm, ori) = cube.fingerprint::<FullFingerprint>().split();
        self.permutation
            .lookup_fingerprint(perm)
            .max(self.orientation.lookup_fingerprint(ori)) as usize
    }
}

/// The exact distance.
#[derive(Clone, Copy)]
pub struct PerfectHeuristic<'t>(pub &'t PerfectTable);

impl Heuristic for PerfectHeuristic<'_> {
    fn estimate(&self, cube: &Cube222) -> usize {
        self.0.lookup(cube) as usize
    }
}

/// The available heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeuristicKind {
    /// [`PermutationHeuristic`]
    Permutation,
    /// [`OrientationHeuristic`]
    Orientation,
    /// [`DualHeuristic`]
    Dual,
    /// [`PerfectHeuristic`]
    Perfect,
}

impl HeuristicKind {
    /// Every heuristic.
    pub const ARRAY: [HeuristicKind; 4] = [
        HeuristicKind::Perfect,
        HeuristicKind::Dual,
        HeuristicKind::Orientation,
        HeuristicKind::Permutation,
    ];
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeuristicKind::Permutation => "permutation",
            HeuristicKind::Orientation => "orientation",
            HeuristicKind::Dual => "dual",
            HeuristicKind::Perfect => "perfect",
        };
        f.write_str(name)
    }
}

/// Every heuristic's estimate for one state, next to its exact distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicReport {
    /// The state.
    pub fingerprint: FullFingerprint,
    /// Exact distance.
    pub perfect: u8,
    /// Orientation bound.
    pub orientation: u8,
    /// Permutation bound.
    pub permutation: u8,
    /// Dual bound.
    pub dual: u8,
}

impl HeuristicTables {
    /// The permutation heuristic.
    pub fn permutation_heuristic(&self) -> PermutationHeuristic<'_> {
        PermutationHeuristic(self.permutation())
    }

    /// The orientation heuristic.
    pub fn orientation_heuristic(&self) -> OrientationHeuristic<'_> {
        OrientationHeuristic(self.orientation())
    }

    /// The dual heuristic.
    pub fn dual_heuristic(&self) -> DualHeuristic<'_> {
        DualHeuristic {
            permutation: self.permutation(),
            orientation: self.orientation(),
        }
    }

    /// The perfect heuristic, if the perfect table was built.
    pub fn perfect_heuristic(&self) -> Option<PerfectHeuristic<'_>> {
        self.perfect().map(PerfectHeuristic)
    }

    /// Select a heuristic at runtime. `None` if it needs the perfect table and that wasn't built.
    pub fn heuristic(&self, kind: HeuristicKind) -> Option<Box<dyn Heuristic + '_>> {
        let heuristic: Box<dyn Heuristic + '_> = match kind {
            HeuristicKind::Permutation => Box::new(self.permutation_heuristic()),
            HeuristicKind::Orientation => Box::new(self.orientation_heuristic()),
            HeuristicKind::Dual => Box::new(self.dual_heuristic()),
            HeuristicKind::Perfect => Box::new(self.perfect_heuristic()?),
        };
        Some(heuristic)
    }

    /// Compare every heuristic against the exact distance of every state, sorted by fingerprint.
    /// `None` if the perfect table wasn't built.
    pub fn evaluation_report(&self) -> Option<Vec<HeuristicReport>> {
        let perfect = self.perfect()?;
        let mut report: Vec<HeuristicReport> = perfect
            .iter()
            .map(|(fingerprint, depth)| {
                let (perm, ori) = fingerprint.split();
                let permutation = self.permutation().lookup_fingerprint(perm);
                let orientation = self.orientation().lookup_fingerprint(ori);
                HeuristicReport {
                    fingerprint,
                    perfect: depth,
                    orientation,
                    permutation,
                    dual: permutation.max(orientation),
                }
            })
            .collect();
        report.sort_unstable_by_key(|r| r.fingerprint.repr());
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube222::solver::prune::shared_tables;

    #[test]
    fn admissible() {
        let report = shared_tables().evaluation_report().unwrap();
        assert_eq!(report.len(), 3_674_160);
        for row in &report {
            assert!(row.permutation <= row.perfect);
            assert!(row.orientation <= row.perfect);
            assert!(row.dual <= row.perfect);
            assert_eq!(row.dual, row.permutation.max(row.orientation));
        }
        assert!(report
            .windows(2)
            .all(|w| w[0].fingerprint < w[1].fingerprint));

        let solved = report
            .iter()
            .find(|r| r.fingerprint == Cube222::SOLVED.fingerprint::<FullFingerprint>())
            .unwrap();
        assert_eq!((solved.perfect, solved.dual), (0, 0));
    }

    #[test]
    fn estimates() {
        let tables = shared_tables();
        let cube = Cube222::from_moves("U R2 D' F' L2 B U2").unwrap();
        let perm = tables.permutation_heuristic().estimate(&cube);
        let ori = tables.orientation_heuristic().estimate(&cube);
        assert_eq!(tables.dual_heuristic().estimate(&cube), perm.max(ori));
        assert_eq!(tables.perfect_heuristic().unwrap().estimate(&cube), 7);

        for kind in HeuristicKind::ARRAY {
            let h = tables.heuristic(kind).unwrap();
            assert_eq!(h.estimate(&Cube222::SOLVED), 0);
            assert!(h.estimate(&cube) <= 7, "{kind}");
        }
    }

    #[test]
    fn perfect_needs_table() {
        let tables = HeuristicTables::generate(false);
        assert!(tables.heuristic(HeuristicKind::Perfect).is_none());
        assert!(tables.heuristic(HeuristicKind::Dual).is_some());
        assert!(tables.evaluation_report().is_none());
    }
}
