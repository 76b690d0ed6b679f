use std::fmt;

use crate::error::{MarkerError, Result};

/// Opaque token naming one entry of a [`Palette`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleId(u8);

impl StyleId {
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleEntry {
    pub id: StyleId,
    /// Human readable name, also used by the theme to pick a colour.
    pub name: String,
    /// Class token emitted on `<mark>` and accepted by the sanitizer.
    pub class_name: String,
}

/// The fixed set of marker styles known to the application.
///
/// Built once at startup and handed out by reference; nothing mutates it
/// afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<StyleEntry>,
    default: StyleId,
}

const COLOR_NAMES: [&str; 6] = ["default", "blue", "red", "green", "brown", "purple"];
const CLASS_PREFIX: &str = "cdx-marker__";

impl Palette {
    /// Six colours, `default` first.
    pub fn colors() -> Self {
        let entries = COLOR_NAMES
            .iter()
            .enumerate()
            .map(|(idx, name)| StyleEntry {
                id: StyleId(idx as u8),
                name: (*name).to_string(),
                class_name: format!("{CLASS_PREFIX}{name}"),
            })
            .collect();
        Self {
            entries,
            default: StyleId(0),
        }
    }

    /// A palette with one implicit style.
    pub fn single() -> Self {
        Self {
            entries: vec![StyleEntry {
                id: StyleId(0),
                name: "default".to_string(),
                class_name: "cdx-marker".to_string(),
            }],
            default: StyleId(0),
        }
    }

    /// Build a custom palette from `(name, class_name)` pairs.
    ///
    /// Repeated names keep their first entry. At most 256 styles are kept.
    pub fn from_entries<I, N, C>(entries: I, default_name: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let mut built: Vec<StyleEntry> = Vec::new();
        for (name, class_name) in entries {
            let name = name.into();
            if built.iter().any(|entry| entry.name == name) {
                continue;
            }
            let Ok(raw) = u8::try_from(built.len()) else {
                break;
            };
            built.push(StyleEntry {
                id: StyleId(raw),
                name,
                class_name: class_name.into(),
            });
        }
        let default = built
            .iter()
            .find(|entry| entry.name == default_name)
            .map(|entry| entry.id)
            .ok_or_else(|| MarkerError::UnknownStyle(default_name.to_string()))?;
        Ok(Self {
            entries: built,
            default,
        })
    }

    pub fn default_style(&self) -> StyleId {
        self.default
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: StyleId) -> Option<&StyleEntry> {
        self.entries.get(id.index())
    }

    pub fn contains(&self, id: StyleId) -> bool {
        id.index() < self.entries.len()
    }

    /// Returns `id` back when it belongs to this palette.
    pub fn check(&self, id: StyleId) -> Result<StyleId> {
        if self.contains(id) {
            Ok(id)
        } else {
            Err(MarkerError::UnknownStyle(id.to_string()))
        }
    }

    /// Look a style up by its name or its class token.
    pub fn resolve(&self, token: &str) -> Result<StyleId> {
        self.entries
            .iter()
            .find(|entry| entry.name == token || entry.class_name == token)
            .map(|entry| entry.id)
            .ok_or_else(|| MarkerError::UnknownStyle(token.to_string()))
    }

    pub fn class_name(&self, id: StyleId) -> Result<&str> {
        self.get(id)
            .map(|entry| entry.class_name.as_str())
            .ok_or_else(|| MarkerError::UnknownStyle(id.to_string()))
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.class_name.as_str())
            .collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::colors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_palette_has_default_first() {
        let palette = Palette::colors();
        assert_eq!(palette.len(), 6);
        assert_eq!(palette.default_style(), StyleId::new(0));
        assert_eq!(
            palette.class_name(palette.default_style()).unwrap(),
            "cdx-marker__default"
        );
    }

    #[test]
    fn resolve_accepts_name_and_class() {
        let palette = Palette::colors();
        let red = palette.resolve("red").unwrap();
        assert_eq!(palette.resolve("cdx-marker__red").unwrap(), red);
        assert_eq!(
            palette.resolve("orange"),
            Err(MarkerError::UnknownStyle("orange".to_string()))
        );
    }

    #[test]
    fn check_rejects_foreign_ids() {
        let palette = Palette::single();
        assert!(palette.check(StyleId::new(0)).is_ok());
        assert!(matches!(
            palette.check(StyleId::new(3)),
            Err(MarkerError::UnknownStyle(_))
        ));
    }

    #[test]
    fn custom_palette_requires_known_default() {
        let palette = Palette::from_entries([("yellow", "hl-yellow"), ("pink", "hl-pink")], "pink")
            .unwrap();
        assert_eq!(palette.default_style(), palette.resolve("hl-pink").unwrap());

        let missing = Palette::from_entries([("yellow", "hl-yellow")], "pink");
        assert!(matches!(missing, Err(MarkerError::UnknownStyle(name)) if name == "pink"));
    }
}
