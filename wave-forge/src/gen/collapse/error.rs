use std::{error::Error, fmt::Display};

use crate::core::{MultiSpace, MultiVector};

/// Error occuring while building a [`TilingAnalysis`](crate::gen::collapse::TilingAnalysis).
///
/// All variants are construction-time problems with the provided sample, rules
/// or counts - an analysis that constructed successfully never fails afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A rule direction with a different dimension count than the space.
    DimensionMismatch { expected: usize, found: usize },
    /// A rule direction outside of the `[-1, +1]` direction space, or non-zero
    /// along a degenerate axis.
    InvalidDirection { direction: MultiVector },
    /// A rule references a tile missing from the provided counts.
    UnknownTile,
    /// A tile was provided with a count of zero.
    ZeroWeight,
    /// The sample holds no tiles at all.
    EmptySample,
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::DimensionMismatch { expected, found } => write!(
                f,
                "rule direction has {found} components while the space has {expected} axes"
            ),
            AnalysisError::InvalidDirection { direction } => write!(
                f,
                "rule direction {direction:?} is not a member of the direction space"
            ),
            AnalysisError::UnknownTile => {
                write!(f, "a rule references a tile missing from the tile counts")
            }
            AnalysisError::ZeroWeight => {
                write!(f, "tile counts must be positive")
            }
            AnalysisError::EmptySample => {
                write!(f, "cannot analyze a sample without any tiles")
            }
        }
    }
}

impl Error for AnalysisError {}

/// Error occuring during a collapse run.
///
/// Returned by [`WaveFunction::run`](crate::gen::collapse::WaveFunction::run) when
/// some cell runs out of possible tiles, or when the caller's predetermined
/// entries are inconsistent with the analysis. The wave passed into the run is
/// left in its terminal state, so the failed cell can be inspected through it.
///
/// [`CollapseError::is_probabilistic()`] tells whether retrying with a fresh
/// seed can help: contradictions reached during the main loop are a matter of
/// unlucky draws, while failures during initial constraint seeding will repeat
/// on every retry.
#[derive(Debug)]
pub struct CollapseError {
    pos: MultiVector,
    kind: CollapseErrorKind,
    iter: u32,
}

impl CollapseError {
    pub(crate) fn new(pos: MultiVector, kind: CollapseErrorKind, iter: u32) -> Self {
        Self { pos, kind, iter }
    }

    #[inline(always)]
    pub(crate) fn from_result<V>(
        result: Result<V, usize>,
        space: &MultiSpace,
        kind: CollapseErrorKind,
        iter: u32,
    ) -> Result<V, Self> {
        match result {
            Ok(val) => Ok(val),
            Err(flat) => Err(CollapseError::new(space.coords(flat), kind, iter)),
        }
    }

    pub(crate) fn kind(&self) -> &CollapseErrorKind {
        &self.kind
    }

    /// Returns the position of the cell which caused the failure.
    pub fn failed_pos(&self) -> &MultiVector {
        &self.pos
    }

    /// Returns `true` if the failure can be solved by retrying with another seed.
    pub fn is_probabilistic(&self) -> bool {
        matches!(self.kind, CollapseErrorKind::Propagation)
    }

    /// Returns the count of successful collapses before the failure occured.
    pub fn failed_iter(&self) -> u32 {
        self.iter
    }
}

impl Display for CollapseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            CollapseErrorKind::Init => write!(
                f,
                "cell at position {:?} has no possible tiles left after applying the initial constraints",
                self.pos
            ),
            CollapseErrorKind::Propagation => write!(
                f,
                "cell at position {:?} has no possible tiles left during propagation on iteration {}",
                self.pos, self.iter
            ),
            CollapseErrorKind::UnknownTile => write!(
                f,
                "tile banned or placed at position {:?} is not a possibility there",
                self.pos
            ),
            CollapseErrorKind::ZeroWeight => write!(
                f,
                "cell at position {:?} was picked for collapse with zero total weight",
                self.pos
            ),
        }
    }
}

impl Error for CollapseError {}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CollapseErrorKind {
    Init,
    Propagation,
    UnknownTile,
    ZeroWeight,
}
