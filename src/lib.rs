pub mod error;
pub mod host;
pub mod logging;
pub mod marker;
pub mod marker_display;
pub mod markup;
pub mod render;
pub mod theme;

pub use error::{Capability, MarkerError, RunDefect};
pub use marker::{
    MarkerEditor, Palette, Run, RunSequence, Selection, StyleId, ToggleAction, ToggleEngine,
    ToggleOutcome,
};
