//! Optimal solvers for the 2x2x2: a plain breadth first search and A* over pattern table
//! heuristics.
//!
//! Both solvers borrow the cube they solve. A successful [`Solver::solve`] applies the solution
//! to that cube, leaving it solved, and the solution can then be read back with
//! [`Solver::solution`].

pub mod heuristic;
pub mod prune;

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, VecDeque};

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use super::fingerprint::FullFingerprint;
use super::moves::Move222;
use super::Cube222;
use crate::error::SolveError;
use crate::moves::MoveSequence;
use heuristic::Heuristic;

/// Counters describing the work a search did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes taken off the frontier and expanded.
    pub expanded: usize,
    /// Nodes added to the frontier, not counting the start.
    pub generated: usize,
}

/// A search for a shortest solution of a cube.
pub trait Solver {
    /// Search for a solution, and apply it to the cube.
    fn solve(&mut self) -> Result<(), SolveError>;

    /// The solution found by the last successful [`solve`](Self::solve). Fails if there was none,
    /// or if the cube is no longer solved.
    fn solution(&self) -> Result<&MoveSequence<Move222>, SolveError>;

    /// Counters from the last search.
    fn stats(&self) -> SearchStats;
}

/// A search tree node. The move leading to it is the cube's last move.
struct Node {
    cube: Cube222,
    parent: Option<usize>,
}

/// Walk parents back to the root, collecting the moves on the way.
fn reconstruct(nodes: &[Node], mut index: usize) -> MoveSequence<Move222> {
    let mut moves = vec![];
    while let Some(parent) = nodes[index].parent {
        moves.push(nodes[index].cube.last_move());
        index = parent;
    }
    moves.reverse();
    MoveSequence(moves)
}

/// Shared state of both solvers.
struct Search<'c> {
    cube: &'c mut Cube222,
    solution: Option<MoveSequence<Move222>>,
    stats: SearchStats,
}

impl<'c> Search<'c> {
    fn new(cube: &'c mut Cube222) -> Self {
        Self {
            cube,
            solution: None,
            stats: SearchStats::default(),
        }
    }

    /// Reset for a new search, returning the root node.
    fn start(&mut self) -> Node {
        self.cube.clear_last_move();
        self.solution = None;
        self.stats = SearchStats::default();
        Node {
            cube: self.cube.clone(),
            parent: None,
        }
    }

    fn finish(&mut self, name: &str, nodes: &[Node], index: usize) {
        let solution = reconstruct(nodes, index);
        self.cube.make_moves(&solution);
        debug!(
            "{name} found {solution} ({} moves), expanded {} nodes",
            solution.len(),
            self.stats.expanded
        );
        self.solution = Some(solution);
    }

    fn solution(&self) -> Result<&MoveSequence<Move222>, SolveError> {
        match &self.solution {
            Some(solution) if self.cube.is_solved() => Ok(solution),
            _ => Err(SolveError::Unsolved),
        }
    }
}

/// Breadth first search over the whole move graph.
pub struct BfsSolver<'c> {
    search: Search<'c>,
}

impl<'c> BfsSolver<'c> {
    /// Create a solver for the given cube.
    pub fn new(cube: &'c mut Cube222) -> Self {
        Self {
            search: Search::new(cube),
        }
    }
}

impl Solver for BfsSolver<'_> {
    fn solve(&mut self) -> Result<(), SolveError> {
        let root = self.search.start();
        let mut visited = FxHashSet::default();
        visited.insert(root.cube.fingerprint::<FullFingerprint>());
        let mut nodes = vec![root];
        let mut frontier = VecDeque::from([0]);

        while let Some(index) = frontier.pop_front() {
            if nodes[index].cube.is_solved() {
                self.search.finish("bfs", &nodes, index);
                return Ok(());
            }

            self.search.stats.expanded += 1;
            for next in nodes[index].cube.successors() {
                if visited.insert(next.fingerprint::<FullFingerprint>()) {
                    nodes.push(Node {
                        cube: next,
                        parent: Some(index),
                    });
                    frontier.push_back(nodes.len() - 1);
                    self.search.stats.generated += 1;
                }
            }
        }

        Err(SolveError::Exhausted)
    }

    fn solution(&self) -> Result<&MoveSequence<Move222>, SolveError> {
        self.search.solution()
    }

    fn stats(&self) -> SearchStats {
        self.search.stats
    }
}

/// A* search guided by a heuristic.
///
/// Improving on a state's best known cost pushes a new frontier entry rather than updating the
/// old one; outdated entries are skipped when popped.
pub struct AStarSolver<'c, H: Heuristic> {
    search: Search<'c>,
    heuristic: H,
}

impl<'c, H: Heuristic> AStarSolver<'c, H> {
    /// Create a solver for the given cube. The heuristic must be admissible for solutions to be
    /// optimal.
    pub fn new(cube: &'c mut Cube222, heuristic: H) -> Self {
        Self {
            search: Search::new(cube),
            heuristic,
        }
    }
}

impl<H: Heuristic> Solver for AStarSolver<'_, H> {
    fn solve(&mut self) -> Result<(), SolveError> {
        let root = self.search.start();
        let mut best: FxHashMap<FullFingerprint, usize> = FxHashMap::default();
        best.insert(root.cube.fingerprint(), 0);
        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse((self.heuristic.estimate(&root.cube), 0, 0)));
        let mut nodes = vec![root];

        while let Some(Reverse((_, cost, index))) = frontier.pop() {
            let cube = &nodes[index].cube;
            if best
                .get(&cube.fingerprint::<FullFingerprint>())
                .is_some_and(|&best_cost| cost > best_cost)
            {
                continue;
            }

            if cube.is_solved() {
                self.search.finish("a*", &nodes, index);
                return Ok(());
            }

            self.search.stats.expanded += 1;
            let next_cost = cost + 1;
            for next in cube.successors() {
                let improved = match best.entry(next.fingerprint()) {
                    Entry::Occupied(mut e) if next_cost < *e.get() => {
                        e.insert(next_cost);
                        true
                    }
                    Entry::Occupied(_) => false,
                    Entry::Vacant(e) => {
                        e.insert(next_cost);
                        true
                    }
                };
                if !improved {
                    continue;
                }

                let estimate = next_cost + self.heuristic.estimate(&next);
                nodes.push(Node {
                    cube: next,
                    parent: Some(index),
                });
                frontier.push(Reverse((estimate, next_cost, nodes.len() - 1)));
                self.search.stats.generated += 1;
            }
        }

        Err(SolveError::Exhausted)
    }

    fn solution(&self) -> Result<&MoveSequence<Move222>, SolveError> {
        self.search.solution()
    }

    fn stats(&self) -> SearchStats {
        self.search.stats
    }
}
