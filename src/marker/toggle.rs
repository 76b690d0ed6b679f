use tracing::{debug, trace};

use crate::error::Result;

use super::palette::{Palette, StyleId};
use super::runs::{Run, RunSequence, normalize};
use super::selection::Selection;

/// What a toggle call ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleAction {
    /// Caret only, or nothing to remove.
    Noop,
    /// Wrapped the selection in a new run.
    Mark,
    /// Removed the requested style from the selection.
    Unmark,
    /// Removed a whole marked run regardless of its style.
    ForceUnmark { removed: StyleId },
    /// Overwrote part of a run of another style that enclosed the selection.
    Restyle { from: StyleId },
}

impl ToggleAction {
    pub fn is_noop(&self) -> bool {
        matches!(self, ToggleAction::Noop)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub runs: RunSequence,
    /// Spans the text whose style just changed.
    pub selection: Selection,
    pub action: ToggleAction,
}

/// Applies mark / unmark requests against a fixed [`Palette`].
#[derive(Clone, Copy, Debug)]
pub struct ToggleEngine<'p> {
    palette: &'p Palette,
}

impl<'p> ToggleEngine<'p> {
    pub fn new(palette: &'p Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &'p Palette {
        self.palette
    }

    /// Validate raw runs before toggling them.
    pub fn toggle_runs(
        &self,
        runs: &[Run],
        selection: Selection,
        style: StyleId,
        force_remove: bool,
    ) -> Result<ToggleOutcome> {
        let sequence = RunSequence::from_runs(runs.to_vec())?;
        self.toggle(&sequence, selection, style, force_remove)
    }

    pub fn toggle(
        &self,
        runs: &RunSequence,
        selection: Selection,
        style: StyleId,
        force_remove: bool,
    ) -> Result<ToggleOutcome> {
        self.palette.check(style)?;
        for run in runs.marked_runs() {
            if let Some(existing) = run.style {
                self.palette.check(existing)?;
            }
        }
        let range = selection.validate(runs.len())?;

        if range.is_empty() {
            trace!(offset = range.start, "caret selection, nothing to toggle");
            return Ok(unchanged(runs, selection));
        }

        if force_remove {
            let Some(run) = runs.find_enclosing_marked_run(&selection).copied() else {
                debug!(?range, "force remove found no enclosing marker");
                return Ok(unchanged(runs, selection));
            };
            let removed = run.style.unwrap_or(style);
            debug!(start = run.start, end = run.end, %removed, "force removing marker");
            let replaced = runs.overwrite(run.start, run.end, None);
            return Ok(ToggleOutcome {
                runs: finish(&replaced)?,
                selection: selection.with_range(run.start, run.end),
                action: ToggleAction::ForceUnmark { removed },
            });
        }

        if runs
            .find_enclosing_run_with_style(&selection, style)
            .is_some()
        {
            debug!(?range, %style, "unmarking selection");
            let replaced = runs.overwrite(range.start, range.end, None);
            return Ok(ToggleOutcome {
                runs: finish(&replaced)?,
                selection,
                action: ToggleAction::Unmark,
            });
        }

        let action = match runs
            .find_enclosing_marked_run(&selection)
            .and_then(|run| run.style)
        {
            Some(from) => ToggleAction::Restyle { from },
            None => ToggleAction::Mark,
        };
        debug!(?range, %style, ?action, "marking selection");
        let replaced = runs.overwrite(range.start, range.end, Some(style));
        Ok(ToggleOutcome {
            runs: finish(&replaced)?,
            selection,
            action,
        })
    }
}

fn unchanged(runs: &RunSequence, selection: Selection) -> ToggleOutcome {
    ToggleOutcome {
        runs: runs.clone(),
        selection,
        action: ToggleAction::Noop,
    }
}

fn finish(runs: &[Run]) -> Result<RunSequence> {
    let normalized = normalize(runs);
    trace!(before = runs.len(), after = normalized.len(), "normalized runs");
    RunSequence::from_runs(normalized)
}

#[cfg(test)]
#[path = "toggle_tests.rs"]
mod toggle_tests;
