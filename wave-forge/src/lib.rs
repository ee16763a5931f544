//! Wave-function-collapse tiling generation over spaces of any dimension count.
//!
//! Given an example tiling - or a hand-written ruleset with tile frequencies -
//! the crate produces new tilings over a caller-specified output region whose
//! local neighbourhoods statistically resemble the input. The dimension count
//! is a runtime property: the same engine fills a line, a map or a volume, with
//! optional wrap-around along any subset of axes for seamlessly tileable
//! output.
//!
//! The building blocks, leaves first:
//! - [`core`] holds the spatial primitives: [`MultiVector`] coordinates,
//!   [`MultiSpace`] bounds with periodicity, and [`MultiArray`] /
//!   [`MultiDict`] storage.
//! - [`gen::collapse`] holds the generator: [`TilingAnalysis`] extracts rules
//!   and frequencies, [`WaveFunction`] runs the observe/propagate loop over a
//!   [`Wave`] of per-cell [`WaveNode`]s.
//! - [`convert`] bridges caller-native 1-D slices and [`grid::Grid`]s in and
//!   out of the core types.
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use wave_forge::{convert, TilingAnalysis, MultiSpace, WaveFunction};
//!
//! // Learn from a striped sample, generate a longer stripe.
//! let sample = convert::sample_from_slice(&['.', '#', '.', '#'], false).unwrap();
//! let analysis = TilingAnalysis::from_sample(&sample).unwrap();
//!
//! let output = MultiSpace::from_lengths(&[12], false).unwrap();
//! let mut wave_fn = WaveFunction::new(output, &analysis).unwrap();
//! let mut wave = wave_fn.new_wave();
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! wave_fn.run(&mut wave, &mut rng).unwrap();
//! let stripe = convert::slice_from_wave(&wave).unwrap();
//! assert_eq!(stripe.len(), 12);
//! ```
//!
//! Runs are single-threaded and reproducible: the injected [`rand::Rng`] is the
//! only source of non-determinism, and a [`TilingAnalysis`] can be shared
//! between threads, each running its own wave.

pub mod convert;
pub mod core;
pub mod gen;
pub(crate) mod utils;

#[doc(inline)]
pub use crate::core::{
    MultiArray, MultiCollection, MultiDict, MultiSpace, MultiVector, SpaceError,
};
#[doc(inline)]
pub use crate::gen::collapse::{
    AnalysisError, CollapseError, RunOptions, Subscriber, Tile, TileEnablement, TileWeights,
    TilingAnalysis, TilingRule, Wave, WaveFunction, WaveNode,
};
