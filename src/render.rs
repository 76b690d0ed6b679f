use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::marker::{Palette, RunSequence, Selection};
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorVisualPosition {
    pub line: usize,
    pub column: u16,
}

pub struct RenderOptions<'a> {
    pub palette: &'a Palette,
    pub theme: &'a Theme,
    pub wrap_width: usize,
    pub left_padding: usize,
    pub selection: Option<Selection>,
    pub cursor: Option<usize>,
}

#[derive(Debug)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
    pub cursor: Option<CursorVisualPosition>,
    pub total_lines: usize,
    /// Screen position of every caret offset, `0..=len`.
    pub positions: Vec<CursorVisualPosition>,
}

impl RenderResult {
    pub fn position_of(&self, offset: usize) -> Option<CursorVisualPosition> {
        self.positions.get(offset).copied()
    }

    /// The caret offset closest to `column` on `line`.
    pub fn offset_at(&self, line: usize, column: u16) -> Option<usize> {
        nearest_offset(&self.positions, line, column)
    }
}

pub(crate) fn nearest_offset(
    positions: &[CursorVisualPosition],
    line: usize,
    column: u16,
) -> Option<usize> {
    positions
        .iter()
        .enumerate()
        .filter(|(_, position)| position.line == line)
        .min_by_key(|(_, position)| position.column.abs_diff(column))
        .map(|(offset, _)| offset)
}

/// Lay out `chars` with marker colours and the selection overlay, wrapping
/// words at `wrap_width` columns.
pub fn render_runs(chars: &[char], runs: &RunSequence, options: &RenderOptions<'_>) -> RenderResult {
    let mut renderer = Renderer::new(options);
    for token in tokenize(chars, runs, options) {
        renderer.push_token(token);
    }
    renderer.finish()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenKind {
    Word,
    Whitespace,
    LineBreak,
}

#[derive(Clone, Debug)]
struct Cell {
    ch: char,
    style: Style,
    width: usize,
}

#[derive(Clone, Debug)]
struct Token {
    kind: TokenKind,
    cells: Vec<Cell>,
    width: usize,
}

fn token_kind(ch: char) -> TokenKind {
    if ch == '\n' {
        TokenKind::LineBreak
    } else if ch.is_whitespace() {
        TokenKind::Whitespace
    } else {
        TokenKind::Word
    }
}

fn tokenize(chars: &[char], runs: &RunSequence, options: &RenderOptions<'_>) -> Vec<Token> {
    let selected = options.selection.map(|selection| selection.range());
    let mut tokens: Vec<Token> = Vec::new();
    for run in runs.iter() {
        let base = options.theme.marker_style(options.palette, run.style);
        for offset in run.start..run.end.min(chars.len()) {
            let ch = chars[offset];
            let style = match &selected {
                Some(range) if range.contains(&offset) => {
                    base.patch(options.theme.selection_style())
                }
                _ => base,
            };
            let kind = token_kind(ch);
            let width = match kind {
                TokenKind::LineBreak => 0,
                TokenKind::Whitespace if ch == '\t' => 1,
                _ => UnicodeWidthChar::width(ch).unwrap_or(0),
            };
            let cell = Cell { ch, style, width };
            match tokens.last_mut() {
                Some(last) if last.kind == kind && kind != TokenKind::LineBreak => {
                    last.width += width;
                    last.cells.push(cell);
                }
                _ => tokens.push(Token {
                    kind,
                    cells: vec![cell],
                    width,
                }),
            }
        }
    }
    tokens
}

struct Renderer<'a> {
    options: &'a RenderOptions<'a>,
    lines: Vec<Line<'static>>,
    builder: LineBuilder,
    pending_whitespace: Vec<Token>,
    positions: Vec<CursorVisualPosition>,
}

impl<'a> Renderer<'a> {
    fn new(options: &'a RenderOptions<'a>) -> Self {
        Self {
            options,
            lines: Vec::new(),
            builder: LineBuilder::new(options.left_padding),
            pending_whitespace: Vec::new(),
            positions: Vec::new(),
        }
    }

    fn wrap_width(&self) -> usize {
        self.options.wrap_width.max(1) + self.options.left_padding
    }

    fn push_token(&mut self, token: Token) {
        match token.kind {
            TokenKind::LineBreak => {
                self.consume_pending();
                self.place(&token.cells[0]);
                self.break_line();
            }
            TokenKind::Whitespace => self.pending_whitespace.push(token),
            TokenKind::Word => {
                let whitespace_width: usize =
                    self.pending_whitespace.iter().map(|item| item.width).sum();
                if self.builder.width > self.builder.prefix_width
                    && self.builder.width + whitespace_width + token.width > self.wrap_width()
                {
                    self.consume_pending();
                    self.break_line();
                }
                self.consume_pending();
                let oversized = token.width > self.wrap_width() - self.builder.prefix_width;
                for cell in &token.cells {
                    if oversized
                        && self.builder.width > self.builder.prefix_width
                        && self.builder.width + cell.width > self.wrap_width()
                    {
                        self.break_line();
                    }
                    self.place(cell);
                }
            }
        }
    }

    fn consume_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending_whitespace);
        for token in &pending {
            for cell in &token.cells {
                self.place(cell);
            }
        }
    }

    fn place(&mut self, cell: &Cell) {
        self.positions.push(self.current_position());
        // Control characters (the `\r` of CRLF text) keep a caret stop but draw nothing.
        if cell.ch == '\t' || !cell.ch.is_control() {
            self.builder.push(cell);
        }
    }

    fn current_position(&self) -> CursorVisualPosition {
        CursorVisualPosition {
            line: self.lines.len(),
            column: self.builder.width.min(u16::MAX as usize) as u16,
        }
    }

    fn break_line(&mut self) {
        let builder = std::mem::replace(
            &mut self.builder,
            LineBuilder::new(self.options.left_padding),
        );
        self.lines.push(builder.build_line());
    }

    fn finish(mut self) -> RenderResult {
        self.consume_pending();
        self.positions.push(self.current_position());
        let builder = std::mem::replace(&mut self.builder, LineBuilder::new(0));
        self.lines.push(builder.build_line());

        let cursor = self
            .options
            .cursor
            .and_then(|offset| self.positions.get(offset).copied());
        RenderResult {
            total_lines: self.lines.len(),
            lines: self.lines,
            cursor,
            positions: self.positions,
        }
    }
}

struct LineBuilder {
    segments: Vec<(String, Style)>,
    width: usize,
    prefix_width: usize,
}

impl LineBuilder {
    fn new(padding: usize) -> Self {
        let mut segments = Vec::new();
        if padding > 0 {
            segments.push((" ".repeat(padding), Style::default()));
        }
        Self {
            segments,
            width: padding,
            prefix_width: padding,
        }
    }

    fn push(&mut self, cell: &Cell) {
        let ch = if cell.ch == '\t' { ' ' } else { cell.ch };
        match self.segments.last_mut() {
            Some((text, style)) if *style == cell.style => text.push(ch),
            _ => self.segments.push((ch.to_string(), cell.style)),
        }
        self.width += cell.width;
    }

    fn build_line(self) -> Line<'static> {
        if self.segments.is_empty() {
            return Line::from("");
        }
        Line::from(
            self.segments
                .into_iter()
                .map(|(text, style)| Span::styled(text, style))
                .collect::<Vec<_>>(),
        )
    }
}

pub fn visible_width(text: &str) -> usize {
    text.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

pub fn line_width(line: &Line<'_>) -> usize {
    line.spans
        .iter()
        .map(|span| visible_width(span.content.as_ref()))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Run;

    fn options<'a>(palette: &'a Palette, theme: &'a Theme, width: usize) -> RenderOptions<'a> {
        RenderOptions {
            palette,
            theme,
            wrap_width: width,
            left_padding: 0,
            selection: None,
            cursor: None,
        }
    }

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn marked_runs_become_styled_spans() {
        let palette = Palette::colors();
        let theme = Theme::default();
        let red = palette.resolve("red").unwrap();
        let chars: Vec<char> = "hello world".chars().collect();
        let runs =
            RunSequence::from_runs(vec![Run::plain(0, 6), Run::marked(6, 11, red)]).unwrap();

        let result = render_runs(&chars, &runs, &options(&palette, &theme, 80));

        assert_eq!(result.total_lines, 1);
        let spans = &result.lines[0].spans;
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "hello ");
        assert_eq!(spans[1].content, "world");
        assert_eq!(spans[1].style, theme.marker_style(&palette, Some(red)));
    }

    #[test]
    fn long_lines_wrap_at_word_boundaries() {
        let palette = Palette::colors();
        let theme = Theme::default();
        let chars: Vec<char> = "alpha beta gamma".chars().collect();
        let runs = RunSequence::plain(chars.len());

        let result = render_runs(&chars, &runs, &options(&palette, &theme, 11));

        assert_eq!(result.total_lines, 2);
        assert_eq!(line_text(&result.lines[0]), "alpha beta ");
        assert_eq!(line_text(&result.lines[1]), "gamma");
        assert_eq!(
            result.position_of(11),
            Some(CursorVisualPosition { line: 1, column: 0 })
        );
        assert_eq!(
            result.position_of(16),
            Some(CursorVisualPosition { line: 1, column: 5 })
        );
    }

    #[test]
    fn newlines_start_new_lines() {
        let palette = Palette::colors();
        let theme = Theme::default();
        let chars: Vec<char> = "one\ntwo".chars().collect();
        let runs = RunSequence::plain(chars.len());
        let mut opts = options(&palette, &theme, 80);
        opts.cursor = Some(4);

        let result = render_runs(&chars, &runs, &opts);

        assert_eq!(result.total_lines, 2);
        assert_eq!(result.positions.len(), chars.len() + 1);
        assert_eq!(
            result.position_of(3),
            Some(CursorVisualPosition { line: 0, column: 3 })
        );
        assert_eq!(result.cursor, Some(CursorVisualPosition { line: 1, column: 0 }));
        assert_eq!(result.offset_at(1, 2), Some(6));
    }

    #[test]
    fn carriage_returns_are_not_drawn() {
        let palette = Palette::colors();
        let theme = Theme::default();
        let chars: Vec<char> = "one\r\ntwo".chars().collect();
        let runs = RunSequence::plain(chars.len());

        let result = render_runs(&chars, &runs, &options(&palette, &theme, 80));

        assert_eq!(result.total_lines, 2);
        assert_eq!(line_text(&result.lines[0]), "one");
        assert_eq!(line_text(&result.lines[1]), "two");
        assert_eq!(result.positions.len(), chars.len() + 1);
        assert_eq!(
            result.position_of(5),
            Some(CursorVisualPosition { line: 1, column: 0 })
        );
    }

    #[test]
    fn selection_overlays_marker_style() {
        let palette = Palette::colors();
        let theme = Theme::default();
        let chars: Vec<char> = "abcdef".chars().collect();
        let runs = RunSequence::plain(chars.len());
        let mut opts = options(&palette, &theme, 80);
        opts.selection = Some(Selection::new(4, 2));

        let result = render_runs(&chars, &runs, &opts);

        let spans = &result.lines[0].spans;
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content, "cd");
        assert_eq!(spans[1].style, theme.selection_style());
    }

    #[test]
    fn oversized_words_break_by_character() {
        let palette = Palette::colors();
        let theme = Theme::default();
        let chars: Vec<char> = "abcdefgh".chars().collect();
        let runs = RunSequence::plain(chars.len());

        let result = render_runs(&chars, &runs, &options(&palette, &theme, 3));

        let texts: Vec<String> = result.lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["abc", "def", "gh"]);
        assert!(result.lines.iter().all(|line| line_width(line) <= 3));
    }

    #[test]
    fn padding_shifts_columns() {
        let palette = Palette::colors();
        let theme = Theme::default();
        let chars: Vec<char> = "ab".chars().collect();
        let runs = RunSequence::plain(chars.len());
        let mut opts = options(&palette, &theme, 10);
        opts.left_padding = 2;

        let result = render_runs(&chars, &runs, &opts);

        assert_eq!(line_text(&result.lines[0]), "  ab");
        assert_eq!(
            result.position_of(0),
            Some(CursorVisualPosition { line: 0, column: 2 })
        );
    }

    #[test]
    fn empty_document_has_one_line() {
        let palette = Palette::colors();
        let theme = Theme::default();
        let result = render_runs(&[], &RunSequence::default(), &options(&palette, &theme, 10));
        assert_eq!(result.total_lines, 1);
        assert_eq!(result.positions.len(), 1);
    }
}
