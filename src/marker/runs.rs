use crate::error::{MarkerError, Result, RunDefect};

use super::palette::StyleId;
use super::selection::Selection;

/// A stretch of text that is either plain (`style == None`) or marked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Run {
    pub start: usize,
    pub end: usize,
    pub style: Option<StyleId>,
}

impl Run {
    pub const fn new(start: usize, end: usize, style: Option<StyleId>) -> Self {
        Self { start, end, style }
    }

    pub const fn plain(start: usize, end: usize) -> Self {
        Self::new(start, end, None)
    }

    pub const fn marked(start: usize, end: usize, style: StyleId) -> Self {
        Self::new(start, end, Some(style))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn is_marked(&self) -> bool {
        self.style.is_some()
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// True when `lo..hi` lies inside the run, bounds included.
    pub fn encloses(&self, lo: usize, hi: usize) -> bool {
        self.start <= lo && hi <= self.end
    }

    fn with_bounds(&self, start: usize, end: usize) -> Self {
        Self::new(start, end, self.style)
    }
}

/// Drop empty runs and merge neighbours that share a style.
///
/// Assumes the input is ordered; merged runs take the outer bounds.
pub fn normalize(runs: &[Run]) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs.iter().filter(|run| !run.is_empty()) {
        match merged.last_mut() {
            Some(last) if last.style == run.style => last.end = last.end.max(run.end),
            _ => merged.push(*run),
        }
    }
    merged
}

/// An ordered, gap-free and minimal sequence of runs covering `0..len`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RunSequence {
    runs: Vec<Run>,
}

impl RunSequence {
    /// One plain run over the whole document, or nothing for empty text.
    pub fn plain(len: usize) -> Self {
        if len == 0 {
            return Self::default();
        }
        Self {
            runs: vec![Run::plain(0, len)],
        }
    }

    /// Validate `runs` as they are. Fails on the first structural defect.
    pub fn from_runs(runs: Vec<Run>) -> Result<Self> {
        validate(&runs).map_err(MarkerError::InvalidRunSequence)?;
        Ok(Self { runs })
    }

    /// Normalize `runs` first, then validate what remains.
    pub fn normalized(runs: &[Run]) -> Result<Self> {
        Self::from_runs(normalize(runs))
    }

    /// Validate and check the runs cover exactly `len` characters.
    pub fn for_text(runs: Vec<Run>, len: usize) -> Result<Self> {
        let sequence = Self::from_runs(runs)?;
        if sequence.len() != len {
            return Err(MarkerError::InvalidRunSequence(RunDefect::LengthMismatch {
                expected: len,
                actual: sequence.len(),
            }));
        }
        Ok(sequence)
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn into_runs(self) -> Vec<Run> {
        self.runs
    }

    /// Document length covered by the runs.
    pub fn len(&self) -> usize {
        self.runs.last().map_or(0, |run| run.end)
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Run> {
        self.runs.iter()
    }

    pub fn marked_runs(&self) -> impl Iterator<Item = &Run> {
        self.runs.iter().filter(|run| run.is_marked())
    }

    fn covering_index(&self, offset: usize) -> Option<usize> {
        if offset >= self.len() {
            return None;
        }
        let idx = self.runs.partition_point(|run| run.end <= offset);
        (idx < self.runs.len()).then_some(idx)
    }

    /// The run containing `offset`, if it is inside the document.
    pub fn find_covering_run(&self, offset: usize) -> Option<&Run> {
        self.covering_index(offset).map(|idx| &self.runs[idx])
    }

    /// A marked run of any style containing the whole selection.
    pub fn find_enclosing_marked_run(&self, selection: &Selection) -> Option<&Run> {
        self.find_enclosing(selection, |run| run.is_marked())
    }

    /// A run marked with exactly `style` containing the whole selection.
    pub fn find_enclosing_run_with_style(
        &self,
        selection: &Selection,
        style: StyleId,
    ) -> Option<&Run> {
        self.find_enclosing(selection, |run| run.style == Some(style))
    }

    fn find_enclosing<F>(&self, selection: &Selection, accept: F) -> Option<&Run>
    where
        F: Fn(&Run) -> bool,
    {
        let lo = selection.lo();
        let hi = selection.hi();
        if let Some(run) = self.find_covering_run(lo)
            && run.encloses(lo, hi)
            && accept(run)
        {
            return Some(run);
        }
        // A caret sitting right after a run still counts as inside it.
        if lo == hi && lo > 0 {
            let run = self.find_covering_run(lo - 1)?;
            if run.end == lo && accept(run) {
                return Some(run);
            }
        }
        None
    }

    /// Replace `lo..hi` with one run of `style`, splitting whatever it overlaps.
    pub(crate) fn overwrite(&self, lo: usize, hi: usize, style: Option<StyleId>) -> Vec<Run> {
        let mut result = Vec::with_capacity(self.runs.len() + 2);
        let mut inserted = false;
        for run in &self.runs {
            if run.end <= lo || run.start >= hi {
                if !inserted && run.start >= hi {
                    result.push(Run::new(lo, hi, style));
                    inserted = true;
                }
                result.push(*run);
                continue;
            }
            if run.start < lo {
                result.push(run.with_bounds(run.start, lo));
            }
            if !inserted {
                result.push(Run::new(lo, hi, style));
                inserted = true;
            }
            if run.end > hi {
                result.push(run.with_bounds(hi, run.end));
            }
        }
        if !inserted {
            result.push(Run::new(lo, hi, style));
        }
        result
    }
}

fn validate(runs: &[Run]) -> std::result::Result<(), RunDefect> {
    let mut expected_start = 0;
    for (index, run) in runs.iter().enumerate() {
        if run.is_empty() {
            return Err(RunDefect::Empty { index });
        }
        if index == 0 && run.start != 0 {
            return Err(RunDefect::NotAtOrigin { start: run.start });
        }
        if run.start > expected_start {
            return Err(RunDefect::Gap { at: expected_start });
        }
        if run.start < expected_start {
            return Err(RunDefect::Overlap { at: run.start });
        }
        if index > 0 && runs[index - 1].style == run.style {
            return Err(RunDefect::UnmergedNeighbors { index: index - 1 });
        }
        expected_start = run.end;
    }
    Ok(())
}

#[cfg(test)]
#[path = "runs_tests.rs"]
mod runs_tests;
