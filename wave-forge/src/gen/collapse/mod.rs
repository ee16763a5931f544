//! # Collapse-driven tiling generation
//!
//! The generator works by keeping a collection of cells whose final identity is
//! unknown in the beginning - *every cell can be any tile*. Cell by cell it
//! *collapses* the possible options, choosing randomly one of them, and each
//! collapsed cell puts constraints over its neighbours, reducing their options
//! in turn. The process continues until every cell holds a single option, or
//! until some cell runs out of options entirely.
//!
//! The process is known elsewhere as *Wave Function Collapse* or *Model
//! Synthesis*. The implementation here is the simple-tile variant, generalized
//! to any number of spatial dimensions: constraints are strictly possible
//! neighbourhood facts of the form "tile `X` can be placed at offset `D` of
//! tile `Y`", without overlapping-pattern extraction.
//!
//! ## Struct types
//!
//! - [`TilingRule`] is a single adjacency fact; [`TilingAnalysis`] extracts the
//!   full set together with tile frequencies from an example tiling (or accepts
//!   them directly) and precomputes everything the hot loop needs.
//! - [`WaveNode`] tracks the possibilities of one cell with its
//!   [`TileEnablement`] support counters; [`Wave`] is the dense array of nodes
//!   over the output space.
//! - [`WaveFunction`] is the main executor: lowest-entropy selection, weighted
//!   collapse and constraint propagation, seeded through [`RunOptions`] and
//!   observable through a [`Subscriber`].

mod analysis;
mod error;
mod node;
mod propagator;
mod resolver;
mod rules;
pub mod subscriber;

use std::hash::Hash;

// Flattened reexports
pub use analysis::{TileWeights, TilingAnalysis};
pub use error::{AnalysisError, CollapseError};
pub use node::{TileEnablement, WaveNode};
pub use resolver::{RunOptions, Wave, WaveFunction};
pub use rules::TilingRule;
pub use subscriber::Subscriber;

/// Values the generator places into cells.
///
/// Tiles are opaque: the engine only ever clones, compares and hashes them, so
/// identity is value identity - never reference identity. Implemented for
/// every type with the matching std traits.
pub trait Tile: Clone + Eq + Hash {}

impl<T: Clone + Eq + Hash> Tile for T {}
