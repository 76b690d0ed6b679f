//! Markup export of marker runs and the matching sanitizer whitelist.

use crate::error::Result;
use crate::marker::{Palette, RunSequence};

pub const MARK_TAG: &str = "mark";

/// Whitelist a sanitizer applies to exported markup: the `mark` tag with one
/// of the palette's class tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizeRule {
    pub tag: &'static str,
    pub classes: Vec<String>,
}

impl SanitizeRule {
    pub fn allows_class(&self, class: &str) -> bool {
        self.classes.iter().any(|allowed| allowed == class)
    }
}

pub fn sanitize_rule(palette: &Palette) -> SanitizeRule {
    SanitizeRule {
        tag: MARK_TAG,
        classes: palette
            .class_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

/// Serialize `chars` with every marked run wrapped in `<mark class="...">`.
pub fn to_markup(chars: &[char], runs: &RunSequence, palette: &Palette) -> Result<String> {
    let mut output = String::with_capacity(chars.len() + runs.runs().len() * 32);
    for run in runs.iter() {
        let end = run.end.min(chars.len());
        let start = run.start.min(end);
        match run.style {
            Some(style) => {
                let class = palette.class_name(style)?;
                output.push('<');
                output.push_str(MARK_TAG);
                output.push_str(" class=\"");
                escape_into(&mut output, class.chars());
                output.push_str("\">");
                escape_into(&mut output, chars[start..end].iter().copied());
                output.push_str("</");
                output.push_str(MARK_TAG);
                output.push('>');
            }
            None => escape_into(&mut output, chars[start..end].iter().copied()),
        }
    }
    Ok(output)
}

fn escape_into(output: &mut String, text: impl Iterator<Item = char>) {
    for ch in text {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            _ => output.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarkerError;
    use crate::marker::{Run, StyleId};

    #[test]
    fn sanitize_rule_lists_every_class() {
        let rule = sanitize_rule(&Palette::colors());
        assert_eq!(rule.tag, "mark");
        assert_eq!(rule.classes.len(), 6);
        assert!(rule.allows_class("cdx-marker__purple"));
        assert!(!rule.allows_class("cdx-marker__orange"));

        let single = sanitize_rule(&Palette::single());
        assert_eq!(single.classes, vec!["cdx-marker".to_string()]);
    }

    #[test]
    fn markup_wraps_marked_runs() {
        let palette = Palette::colors();
        let red = palette.resolve("red").unwrap();
        let chars: Vec<char> = "a <b> & c".chars().collect();
        let runs = RunSequence::from_runs(vec![
            Run::plain(0, 2),
            Run::marked(2, 5, red),
            Run::plain(5, 9),
        ])
        .unwrap();

        let markup = to_markup(&chars, &runs, &palette).unwrap();

        assert_eq!(
            markup,
            "a <mark class=\"cdx-marker__red\">&lt;b&gt;</mark> &amp; c"
        );
    }

    #[test]
    fn markup_rejects_styles_outside_palette() {
        let palette = Palette::single();
        let chars: Vec<char> = "abc".chars().collect();
        let runs = RunSequence::from_runs(vec![Run::marked(0, 3, StyleId::new(4))]).unwrap();

        assert!(matches!(
            to_markup(&chars, &runs, &palette),
            Err(MarkerError::UnknownStyle(_))
        ));
    }
}
