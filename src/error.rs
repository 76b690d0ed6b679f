use std::fmt;

use thiserror::Error;

/// Host features the marker tool may depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The host can report the current selection range.
    CurrentRange,
    /// The host can show the colour palette popup.
    Palette,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::CurrentRange => f.write_str("current-range"),
            Capability::Palette => f.write_str("palette"),
        }
    }
}

/// Structural problem found while validating a run sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunDefect {
    /// The first run does not start at offset zero.
    NotAtOrigin { start: usize },
    /// A run starts after the previous one ended.
    Gap { at: usize },
    /// A run starts before the previous one ended.
    Overlap { at: usize },
    /// A run with `start >= end`.
    Empty { index: usize },
    /// Two neighbouring runs share a style and should have been merged.
    UnmergedNeighbors { index: usize },
    /// The runs do not cover the text they are attached to.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for RunDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunDefect::NotAtOrigin { start } => write!(f, "first run starts at {start}, not 0"),
            RunDefect::Gap { at } => write!(f, "gap before offset {at}"),
            RunDefect::Overlap { at } => write!(f, "overlapping runs at offset {at}"),
            RunDefect::Empty { index } => write!(f, "run {index} is empty"),
            RunDefect::UnmergedNeighbors { index } => {
                write!(f, "runs {index} and {} share a style", index + 1)
            }
            RunDefect::LengthMismatch { expected, actual } => {
                write!(f, "runs cover {actual} characters, text has {expected}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MarkerError {
    #[error("selection {anchor}..{focus} is outside the document (length {len})")]
    InvalidSelection {
        anchor: usize,
        focus: usize,
        len: usize,
    },
    #[error("invalid run sequence: {0}")]
    InvalidRunSequence(RunDefect),
    #[error("unknown style `{0}`")]
    UnknownStyle(String),
    #[error("host does not provide the `{0}` capability")]
    CapabilityMissing(Capability),
}

pub type Result<T, E = MarkerError> = std::result::Result<T, E>;
