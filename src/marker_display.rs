use std::ops::{Deref, DerefMut};

use crate::marker::{MarkerEditor, Palette};
use crate::render::{
    CursorVisualPosition, RenderOptions, RenderResult, nearest_offset, render_runs,
};
use crate::theme::Theme;

/// MarkerDisplay wraps a MarkerEditor and keeps the layout of the last
/// render, so the caret can move by visual line.
#[derive(Debug)]
pub struct MarkerDisplay {
    editor: MarkerEditor,
    positions: Vec<CursorVisualPosition>,
    preferred_column: Option<u16>,
}

impl MarkerDisplay {
    pub fn new(editor: MarkerEditor) -> Self {
        Self {
            editor,
            positions: Vec::new(),
            preferred_column: None,
        }
    }

    pub fn editor(&self) -> &MarkerEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut MarkerEditor {
        &mut self.editor
    }

    pub fn set_preferred_column(&mut self, column: Option<u16>) {
        self.preferred_column = column;
    }

    /// Render the document and remember where every offset landed.
    pub fn render(
        &mut self,
        palette: &Palette,
        theme: &Theme,
        wrap_width: usize,
        left_padding: usize,
    ) -> RenderResult {
        let options = RenderOptions {
            palette,
            theme,
            wrap_width,
            left_padding,
            selection: self.editor.selection(),
            cursor: Some(self.editor.cursor()),
        };
        let result = render_runs(self.editor.chars(), self.editor.runs(), &options);
        self.positions = result.positions.clone();
        result
    }

    /// Move the caret `delta` visual lines, keeping the preferred column.
    pub fn move_cursor_vertical(&mut self, delta: i32) -> bool {
        let Some(current) = self.positions.get(self.editor.cursor()).copied() else {
            return if delta < 0 {
                self.editor.move_to_document_start()
            } else {
                self.editor.move_to_document_end()
            };
        };

        let desired_column = self.preferred_column.unwrap_or(current.column);
        let max_line = self.positions.last().map_or(0, |position| position.line);
        let target_line = (current.line as i64 + delta as i64).clamp(0, max_line as i64) as usize;

        if target_line == current.line {
            let moved = if delta < 0 {
                self.editor.move_to_document_start()
            } else {
                self.editor.move_to_document_end()
            };
            self.preferred_column = None;
            return moved;
        }

        match nearest_offset(&self.positions, target_line, desired_column) {
            Some(offset) => {
                self.editor.set_cursor(offset);
                self.preferred_column = Some(desired_column);
                true
            }
            None => false,
        }
    }
}

impl Deref for MarkerDisplay {
    type Target = MarkerEditor;

    fn deref(&self) -> &Self::Target {
        &self.editor
    }
}

impl DerefMut for MarkerDisplay {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.editor
    }
}
