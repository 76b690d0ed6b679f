use ratatui::style::{Color, Style};

use crate::marker::{Palette, StyleId};

/// Theme configuration for the marker view
#[derive(Clone, Debug)]
pub struct Theme {
    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,

    /// Color for the current file name in the status bar
    pub filename_color: Color,

    /// Foreground color for active selection
    pub selection_fg: Color,

    /// Background color for active selection
    pub selection_bg: Color,

    /// Foreground color drawn on top of every marker background
    pub marker_fg: Color,

    /// Marker backgrounds, looked up by palette entry name
    pub marker_backgrounds: Vec<(String, Color)>,

    /// Background for palette entries without a named color
    pub marker_fallback_bg: Color,

    /// Foreground color for menu items
    pub menu_fg: Color,

    /// Background color for menu
    pub menu_bg: Color,

    /// Foreground color for disabled menu items
    pub menu_disabled_fg: Color,

    /// Foreground color for selected menu entry
    pub menu_selected_fg: Color,

    /// Background color for selected menu entry
    pub menu_selected_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        let marker_backgrounds = [
            ("default", Color::LightYellow),
            ("blue", Color::LightBlue),
            ("red", Color::LightRed),
            ("green", Color::LightGreen),
            ("brown", Color::Rgb(0xc4, 0x9a, 0x6c)),
            ("purple", Color::LightMagenta),
        ]
        .into_iter()
        .map(|(name, color)| (name.to_string(), color))
        .collect();

        Self {
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
            filename_color: Color::LightYellow,
            selection_fg: Color::White,
            selection_bg: Color::Blue,
            marker_fg: Color::Black,
            marker_backgrounds,
            marker_fallback_bg: Color::LightYellow,
            menu_fg: Color::White,
            menu_bg: Color::Black,
            menu_disabled_fg: Color::DarkGray,
            menu_selected_fg: Color::Black,
            menu_selected_bg: Color::White,
        }
    }
}

impl Theme {
    /// Create a new theme with default colors
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker_background(&self, palette: &Palette, style: StyleId) -> Color {
        palette
            .get(style)
            .and_then(|entry| {
                self.marker_backgrounds
                    .iter()
                    .find(|(name, _)| *name == entry.name)
                    .map(|(_, color)| *color)
            })
            .unwrap_or(self.marker_fallback_bg)
    }

    /// Get the style for text carrying `style`, or plain text for `None`
    pub fn marker_style(&self, palette: &Palette, style: Option<StyleId>) -> Style {
        match style {
            Some(style) => Style::default()
                .fg(self.marker_fg)
                .bg(self.marker_background(palette, style)),
            None => Style::default(),
        }
    }

    /// Get the style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    /// Get the style for the filename in the status bar
    pub fn filename_style(&self) -> Style {
        Style::default().fg(self.filename_color)
    }

    /// Get the style for selected text
    pub fn selection_style(&self) -> Style {
        Style::default().fg(self.selection_fg).bg(self.selection_bg)
    }

    /// Get the style for the palette popup
    pub fn menu_style(&self) -> Style {
        Style::default().fg(self.menu_fg).bg(self.menu_bg)
    }

    /// Get the style for a disabled menu item
    pub fn menu_disabled_style(&self) -> Style {
        Style::default().fg(self.menu_disabled_fg)
    }

    /// Get the style for a selected menu entry
    pub fn menu_selected_style(&self) -> Style {
        Style::default()
            .fg(self.menu_selected_fg)
            .bg(self.menu_selected_bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_style_uses_named_background() {
        let theme = Theme::default();
        let palette = Palette::colors();
        let red = palette.resolve("red").unwrap();
        assert_eq!(
            theme.marker_style(&palette, Some(red)),
            Style::default().fg(Color::Black).bg(Color::LightRed)
        );
        assert_eq!(theme.marker_style(&palette, None), Style::default());
    }

    #[test]
    fn unnamed_entries_fall_back() {
        let theme = Theme::default();
        let palette = Palette::from_entries([("teal", "hl-teal")], "teal").unwrap();
        assert_eq!(
            theme.marker_background(&palette, palette.default_style()),
            theme.marker_fallback_bg
        );
    }
}
