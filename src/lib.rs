//! A library for optimally solving the corner-only 2x2x2 cube, using breadth first search or A*
//! over pattern table heuristics.

#![deny(missing_docs)]

pub mod cube222;
pub mod error;
pub mod fingerprint;
pub mod moves;
