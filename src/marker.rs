//! Highlight markers over a plain text document.
//!
//! The document is a list of characters plus a [`RunSequence`] describing which
//! stretches are marked and with which [`StyleId`]. Styling never changes the
//! text, so offsets stay valid across every toggle.

use std::ops::Range;

mod content;
pub mod palette;
pub mod runs;
pub mod selection;
pub mod toggle;

pub use content::{next_word_boundary, previous_word_boundary, word_bounds};
pub use palette::{Palette, StyleEntry, StyleId};
pub use runs::{Run, RunSequence, normalize};
pub use selection::Selection;
pub use toggle::{ToggleAction, ToggleEngine, ToggleOutcome};

use content::{line_end_boundary, line_start_boundary};

use crate::error::Result;

/// Text, its marker runs, the caret and an optional selection anchor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkerEditor {
    chars: Vec<char>,
    runs: RunSequence,
    cursor: usize,
    selection_anchor: Option<usize>,
}

impl MarkerEditor {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let runs = RunSequence::plain(chars.len());
        Self {
            chars,
            runs,
            cursor: 0,
            selection_anchor: None,
        }
    }

    /// Start from existing markers. The runs must cover `text` exactly.
    pub fn with_runs(text: &str, runs: Vec<Run>) -> Result<Self> {
        let chars: Vec<char> = text.chars().collect();
        let runs = RunSequence::for_text(runs, chars.len())?;
        Ok(Self {
            chars,
            runs,
            cursor: 0,
            selection_anchor: None,
        })
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn slice(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        self.chars[start..end].iter().collect()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn runs(&self) -> &RunSequence {
        &self.runs
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selection_anchor(&self) -> Option<usize> {
        self.selection_anchor
    }

    /// Anchor and caret as a selection, collapsed when nothing is selected.
    pub fn current_selection(&self) -> Selection {
        Selection::new(self.selection_anchor.unwrap_or(self.cursor), self.cursor)
    }

    /// The selection if it spans at least one character.
    pub fn selection(&self) -> Option<Selection> {
        let selection = self.current_selection();
        (!selection.is_collapsed()).then_some(selection)
    }

    /// Keep (or start) the anchor when extending, drop it otherwise.
    pub fn prepare_selection(&mut self, extend: bool) {
        if extend {
            if self.selection_anchor.is_none() {
                self.selection_anchor = Some(self.cursor);
            }
        } else {
            self.selection_anchor = None;
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection_anchor = None;
    }

    /// Select `selection`, clamped to the document. The caret goes to its focus.
    pub fn select(&mut self, selection: Selection) {
        let len = self.chars.len();
        let anchor = selection.anchor.min(len);
        let focus = selection.focus.min(len);
        self.cursor = focus;
        self.selection_anchor = (anchor != focus).then_some(anchor);
    }

    pub fn select_all(&mut self) {
        self.select(Selection::new(0, self.chars.len()));
    }

    pub fn select_word_at(&mut self, offset: usize) -> bool {
        let (start, end) = word_bounds(&self.chars, offset);
        if start == end {
            return false;
        }
        self.select(Selection::new(start, end));
        true
    }

    pub fn set_cursor(&mut self, offset: usize) -> bool {
        let clamped = offset.min(self.chars.len());
        if clamped == self.cursor {
            return false;
        }
        self.cursor = clamped;
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.set_cursor(self.cursor.saturating_sub(1))
    }

    pub fn move_right(&mut self) -> bool {
        self.set_cursor(self.cursor + 1)
    }

    pub fn move_word_left(&mut self) -> bool {
        self.set_cursor(previous_word_boundary(&self.chars, self.cursor))
    }

    pub fn move_word_right(&mut self) -> bool {
        self.set_cursor(next_word_boundary(&self.chars, self.cursor))
    }

    pub fn move_to_line_start(&mut self) -> bool {
        self.set_cursor(line_start_boundary(&self.chars, self.cursor))
    }

    pub fn move_to_line_end(&mut self) -> bool {
        self.set_cursor(line_end_boundary(&self.chars, self.cursor))
    }

    pub fn move_to_document_start(&mut self) -> bool {
        self.set_cursor(0)
    }

    pub fn move_to_document_end(&mut self) -> bool {
        self.set_cursor(self.chars.len())
    }

    /// The style of the marker run under the caret or enclosing the selection.
    pub fn active_style(&self) -> Option<StyleId> {
        self.runs
            .find_enclosing_marked_run(&self.current_selection())
            .and_then(|run| run.style)
    }

    /// Toggle `style` on the current selection and restore the selection.
    pub fn toggle_marker(
        &mut self,
        engine: &ToggleEngine<'_>,
        style: StyleId,
        force_remove: bool,
    ) -> Result<ToggleAction> {
        let outcome = engine.toggle(&self.runs, self.current_selection(), style, force_remove)?;
        let action = outcome.action;
        if !action.is_noop() {
            self.commit(outcome);
        }
        Ok(action)
    }

    /// Swap in the runs and selection produced by a toggle.
    pub fn commit(&mut self, outcome: ToggleOutcome) {
        debug_assert_eq!(outcome.runs.len(), self.chars.len());
        self.runs = outcome.runs;
        self.select(outcome.selection);
    }

    /// `(text, style)` pairs in document order.
    pub fn styled_fragments(&self) -> Vec<(String, Option<StyleId>)> {
        self.runs
            .iter()
            .map(|run| (self.slice(run.start..run.end), run.style))
            .collect()
    }
}

#[cfg(test)]
#[path = "marker_tests.rs"]
mod marker_tests;
