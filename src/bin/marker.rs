use std::{
    env, fs, io,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use tracing::{info, warn};

use marker_tui::host::{Capabilities, MarkerTool};
use marker_tui::logging::{self, LogConfig};
use marker_tui::marker::{MarkerEditor, Palette, StyleId, ToggleAction};
use marker_tui::marker_display::MarkerDisplay;
use marker_tui::markup::to_markup;
use marker_tui::render::RenderResult;
use marker_tui::theme::Theme;

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);

const SAMPLE_TEXT: &str = "Select some text with Shift and the arrow keys, then press a digit to \
highlight it in that colour. Press the same digit again to remove the highlight, or x to strip \
whatever highlight encloses the selection.\n\nPress p to open the palette and Ctrl-Q to quit.";

struct Options {
    path: Option<PathBuf>,
    single_style: bool,
    print_markup: bool,
}

fn parse_args() -> Options {
    let mut options = Options {
        path: None,
        single_style: false,
        print_markup: false,
    };
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--single" => options.single_style = true,
            "--print-markup" => options.print_markup = true,
            _ if options.path.is_none() => options.path = Some(PathBuf::from(arg)),
            _ => eprintln!("Ignoring extra argument: {arg}"),
        }
    }
    options
}

fn main() -> Result<()> {
    run()
}

fn editor_wrap_configuration(width: usize) -> (usize, usize) {
    if width == 0 {
        return (1, 0);
    }
    if width < 60 {
        return (width.saturating_sub(1).max(1), 0);
    }
    let padding = if width < 100 {
        2
    } else {
        (width.saturating_sub(100) / 2 + 4).min(width.saturating_sub(1) / 2)
    };
    let wrap_width = width.saturating_sub(padding.saturating_mul(2)).max(1);
    (wrap_width, padding)
}

fn run() -> Result<()> {
    let options = parse_args();
    let log_guard = match logging::init(LogConfig::from_env()) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Logging disabled: {err}");
            None
        }
    };

    let palette = if options.single_style {
        Palette::single()
    } else {
        Palette::colors()
    };
    let (text, label, initial_status) = load_text(options.path.as_ref())?;
    info!(
        chars = text.chars().count(),
        styles = palette.len(),
        log_file = ?log_guard.as_ref().map(|guard| guard.log_file.display().to_string()),
        "starting marker"
    );

    let mut app = App::new(&palette, MarkerEditor::new(&text), label, initial_status);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
    drop(log_guard);

    res?;

    if options.print_markup {
        let editor = app.display.editor();
        let markup = to_markup(editor.chars(), editor.runs(), &palette)
            .context("failed to export markup")?;
        println!("{markup}");
    }
    Ok(())
}

fn load_text(path: Option<&PathBuf>) -> Result<(String, String, Option<String>)> {
    let Some(path) = path else {
        return Ok((
            SAMPLE_TEXT.to_string(),
            "[sample]".to_string(),
            Some("No file given, showing sample text".to_string()),
        ));
    };
    let label = path.display().to_string();
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok((content, label, None))
    } else {
        Ok((String::new(), label, Some("New document".to_string())))
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<'_>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();
    let mut needs_redraw = true;

    while !app.should_quit() {
        if needs_redraw {
            terminal
                .draw(|frame| app.draw(frame))
                .context("failed to draw frame")?;
            needs_redraw = false;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            app.handle_event(evt);
            needs_redraw = true;
        }

        if last_tick.elapsed() >= tick_rate {
            let had_message_before = app.has_status_message();
            app.on_tick();
            last_tick = Instant::now();
            if had_message_before && !app.has_status_message() {
                needs_redraw = true;
            }
        }
    }

    Ok(())
}

struct App<'p> {
    display: MarkerDisplay,
    tool: MarkerTool<'p>,
    theme: Theme,
    file_label: String,
    scroll_top: usize,
    should_quit: bool,
    status_message: Option<(String, Instant)>,
    palette_index: usize,
}

impl<'p> App<'p> {
    fn new(
        palette: &'p Palette,
        editor: MarkerEditor,
        file_label: String,
        initial_status: Option<String>,
    ) -> Self {
        let tool = MarkerTool::negotiate(palette, Capabilities::all());
        Self {
            display: MarkerDisplay::new(editor),
            tool,
            theme: Theme::default(),
            file_label,
            scroll_top: 0,
            should_quit: false,
            status_message: initial_status.map(|msg| (msg, Instant::now())),
            palette_index: 0,
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn has_status_message(&self) -> bool {
        self.status_message.is_some()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn on_tick(&mut self) {
        self.prune_status_message();
    }

    fn prune_status_message(&mut self) {
        if let Some((_, since)) = &self.status_message
            && since.elapsed() >= STATUS_TIMEOUT
        {
            self.status_message = None;
        }
    }

    fn style_name(&self, style: StyleId) -> String {
        self.tool
            .palette()
            .get(style)
            .map_or_else(|| style.to_string(), |entry| entry.name.clone())
    }

    fn report(&mut self, result: marker_tui::error::Result<ToggleAction>) {
        match result {
            Ok(action) => {
                let message = match action {
                    ToggleAction::Noop => "Nothing to toggle".to_string(),
                    ToggleAction::Mark => "Marked selection".to_string(),
                    ToggleAction::Unmark => "Removed marker from selection".to_string(),
                    ToggleAction::ForceUnmark { removed } => {
                        format!("Removed {} marker", self.style_name(removed))
                    }
                    ToggleAction::Restyle { from } => {
                        format!("Replaced {} marker", self.style_name(from))
                    }
                };
                self.display.set_preferred_column(None);
                self.set_status(message);
            }
            Err(err) => {
                warn!(%err, "marker action failed");
                self.set_status(format!("Error: {err}"));
            }
        }
    }

    fn pick_color(&mut self, style: StyleId) {
        let result = self.tool.pick_color(self.display.editor_mut(), style);
        self.report(result);
    }

    fn toggle_default(&mut self) {
        let result = self.tool.surround(self.display.editor_mut(), None, None, false);
        self.report(result);
    }

    fn click_button(&mut self) {
        let result = self.tool.click_button(self.display.editor_mut());
        self.report(result);
    }

    fn style_for_digit(&self, ch: char) -> Option<StyleId> {
        let index = ch.to_digit(10)?.checked_sub(1)? as usize;
        self.tool.palette().iter().nth(index).map(|entry| entry.id)
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return;
        }

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let text_area = vertical[0];
        let status_area = vertical[1];

        let (wrap_width, left_padding) = editor_wrap_configuration(text_area.width as usize);
        let palette = self.tool.palette();
        let render = self
            .display
            .render(palette, &self.theme, wrap_width, left_padding);
        let viewport_height = text_area.height as usize;
        self.adjust_scroll(&render, viewport_height);

        let paragraph = Paragraph::new(Text::from(render.lines.clone()))
            .block(Block::default().borders(Borders::NONE))
            .scroll((self.scroll_top.min(u16::MAX as usize) as u16, 0));
        frame.render_widget(paragraph, text_area);

        if let Some(cursor) = render.cursor
            && cursor.line >= self.scroll_top
            && cursor.line < self.scroll_top + viewport_height
        {
            let cursor_y = text_area.y + (cursor.line - self.scroll_top) as u16;
            let cursor_x = text_area.x + cursor.column.min(text_area.width - 1);
            frame.set_cursor_position(Position::new(cursor_x, cursor_y));
        }

        self.tool.check_state(self.display.editor());
        let status_line = self.status_line();
        let status_widget = Paragraph::new(status_line)
            .block(Block::default().borders(Borders::NONE))
            .style(self.theme.status_bar_style());
        frame.render_widget(status_widget, status_area);

        if self.tool.is_palette_open() {
            self.render_palette(frame, area);
        }
    }

    fn adjust_scroll(&mut self, render: &RenderResult, viewport_height: usize) {
        let viewport = viewport_height.max(1);
        if let Some(cursor) = render.cursor {
            if cursor.line < self.scroll_top {
                self.scroll_top = cursor.line;
            } else if cursor.line >= self.scroll_top + viewport {
                self.scroll_top = cursor.line + 1 - viewport;
            }
        }
        let max_scroll = render.total_lines.saturating_sub(viewport);
        self.scroll_top = self.scroll_top.min(max_scroll);
    }

    fn status_line(&mut self) -> Line<'static> {
        self.prune_status_message();

        let mut spans = vec![Span::styled(
            format!(" {} ", self.file_label),
            self.theme.filename_style(),
        )];

        let editor = self.display.editor();
        let active = match self.tool.active_style() {
            Some(style) => format!("[{}] ", self.style_name(style)),
            None => "[ ] ".to_string(),
        };
        spans.push(Span::raw(active));

        let position = match editor.selection() {
            Some(selection) => format!(
                "{}..{} ({} selected) ",
                selection.lo(),
                selection.hi(),
                selection.len()
            ),
            None => format!("{}/{} ", editor.cursor(), editor.len()),
        };
        spans.push(Span::raw(position));
        spans.push(Span::raw(format!("{} markers", editor.runs().marked_runs().count())));

        if let Some((message, _)) = &self.status_message {
            spans.push(Span::styled(
                format!("  {message}"),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }

        Line::from(spans)
    }

    fn render_palette(&self, frame: &mut Frame, area: Rect) {
        if area.width < 3 || area.height < 3 {
            return;
        }
        let palette = self.tool.palette();

        let label_width = palette
            .iter()
            .map(|entry| entry.name.chars().count())
            .max()
            .unwrap_or(0);
        let content_width = (label_width + 8) as u16;
        let width = (content_width + 4).min(area.width).max(10.min(area.width));
        let height = (palette.len() as u16 + 2).min(area.height).max(3);

        let popup_area = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );

        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem<'_>> = palette
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let swatch = Span::styled(
                    "  ",
                    Style::default().bg(self.theme.marker_background(palette, entry.id)),
                );
                ListItem::new(Line::from(vec![
                    swatch,
                    Span::raw(format!(" {:<label_width$}  {}", entry.name, idx + 1)),
                ]))
            })
            .collect();

        let mut state = ListState::default();
        state.select(Some(self.palette_index.min(palette.len().saturating_sub(1))));

        let list = List::new(items)
            .highlight_style(self.theme.menu_selected_style())
            .style(self.theme.menu_style())
            .block(
                Block::default()
                    .title("Marker")
                    .borders(Borders::ALL)
                    .style(self.theme.menu_style())
                    .border_style(self.theme.menu_disabled_style()),
            );

        frame.render_stateful_widget(list, popup_area, &mut state);
    }

    fn handle_palette_key(&mut self, code: KeyCode) -> bool {
        if !self.tool.is_palette_open() {
            return false;
        }
        let count = self.tool.palette().len().max(1);

        match code {
            KeyCode::Esc => self.tool.hide_palette(),
            KeyCode::Up => self.palette_index = (self.palette_index + count - 1) % count,
            KeyCode::Down => self.palette_index = (self.palette_index + 1) % count,
            KeyCode::Enter => {
                if let Some(style) = self
                    .tool
                    .palette()
                    .iter()
                    .nth(self.palette_index)
                    .map(|entry| entry.id)
                {
                    self.pick_color(style);
                }
            }
            KeyCode::Char('x') => self.click_button(),
            KeyCode::Char(ch) => match self.style_for_digit(ch) {
                Some(style) => self.pick_color(style),
                None => return false,
            },
            _ => return false,
        }
        true
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return;
        };

        if self.handle_palette_key(code) {
            return;
        }

        match (code, modifiers) {
            (KeyCode::Char('q'), m) | (KeyCode::Char('c'), m)
                if m.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
            }
            (KeyCode::Char('a'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.display.select_all();
            }
            (KeyCode::Left, m) if m.contains(KeyModifiers::CONTROL) => {
                self.display.prepare_selection(m.contains(KeyModifiers::SHIFT));
                self.display.move_word_left();
                self.display.set_preferred_column(None);
            }
            (KeyCode::Right, m) if m.contains(KeyModifiers::CONTROL) => {
                self.display.prepare_selection(m.contains(KeyModifiers::SHIFT));
                self.display.move_word_right();
                self.display.set_preferred_column(None);
            }
            (KeyCode::Left, m) => {
                self.display.prepare_selection(m.contains(KeyModifiers::SHIFT));
                self.display.move_left();
                self.display.set_preferred_column(None);
            }
            (KeyCode::Right, m) => {
                self.display.prepare_selection(m.contains(KeyModifiers::SHIFT));
                self.display.move_right();
                self.display.set_preferred_column(None);
            }
            (KeyCode::Up, m) => {
                self.display.prepare_selection(m.contains(KeyModifiers::SHIFT));
                self.display.move_cursor_vertical(-1);
            }
            (KeyCode::Down, m) => {
                self.display.prepare_selection(m.contains(KeyModifiers::SHIFT));
                self.display.move_cursor_vertical(1);
            }
            (KeyCode::Home, m) => {
                self.display.prepare_selection(m.contains(KeyModifiers::SHIFT));
                if m.contains(KeyModifiers::CONTROL) {
                    self.display.move_to_document_start();
                } else {
                    self.display.move_to_line_start();
                }
                self.display.set_preferred_column(None);
            }
            (KeyCode::End, m) => {
                self.display.prepare_selection(m.contains(KeyModifiers::SHIFT));
                if m.contains(KeyModifiers::CONTROL) {
                    self.display.move_to_document_end();
                } else {
                    self.display.move_to_line_end();
                }
                self.display.set_preferred_column(None);
            }
            (KeyCode::Esc, _) => self.display.clear_selection(),
            (KeyCode::Char('w'), _) => {
                let cursor = self.display.cursor();
                self.display.select_word_at(cursor);
            }
            (KeyCode::Char('p'), _) => {
                if !self.tool.hover() {
                    self.set_status("Palette unavailable");
                }
            }
            (KeyCode::Char('m'), _) => self.toggle_default(),
            (KeyCode::Char('x'), _) => self.click_button(),
            (KeyCode::Char(ch), _) => {
                if let Some(style) = self.style_for_digit(ch) {
                    self.pick_color(style);
                }
            }
            _ => {}
        }
    }
}
