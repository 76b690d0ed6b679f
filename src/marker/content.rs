//! Caret motion helpers over a document held as a `char` slice.

pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_punctuation(ch: char) -> bool {
    !ch.is_whitespace() && !is_word_char(ch)
}

/// Where Ctrl+Left lands: the start of the previous word.
pub fn previous_word_boundary(chars: &[char], offset: usize) -> usize {
    let mut idx = offset.min(chars.len());
    while idx > 0 && chars[idx - 1].is_whitespace() {
        idx -= 1;
    }
    if idx > 0 && is_word_char(chars[idx - 1]) {
        while idx > 0 && is_word_char(chars[idx - 1]) {
            idx -= 1;
        }
    } else {
        while idx > 0 && is_punctuation(chars[idx - 1]) {
            idx -= 1;
        }
    }
    idx
}

/// Where Ctrl+Right lands: past the current word and the whitespace after it.
pub fn next_word_boundary(chars: &[char], offset: usize) -> usize {
    let len = chars.len();
    let mut idx = offset.min(len);
    if idx < len && is_word_char(chars[idx]) {
        while idx < len && is_word_char(chars[idx]) {
            idx += 1;
        }
    }
    while idx < len && is_punctuation(chars[idx]) {
        idx += 1;
    }
    while idx < len && chars[idx].is_whitespace() {
        idx += 1;
    }
    idx
}

/// Bounds of the word under `offset`, used for double-click style selection.
pub fn word_bounds(chars: &[char], offset: usize) -> (usize, usize) {
    let len = chars.len();
    if len == 0 {
        return (0, 0);
    }
    let probe = offset.min(len - 1);
    let class = |ch: char| {
        if is_word_char(ch) {
            0
        } else if ch.is_whitespace() {
            1
        } else {
            2
        }
    };
    let target = class(chars[probe]);
    let mut start = probe;
    while start > 0 && class(chars[start - 1]) == target {
        start -= 1;
    }
    let mut end = probe + 1;
    while end < len && class(chars[end]) == target {
        end += 1;
    }
    (start, end)
}

pub fn line_start_boundary(chars: &[char], offset: usize) -> usize {
    let idx = offset.min(chars.len());
    chars[..idx]
        .iter()
        .rposition(|ch| *ch == '\n')
        .map_or(0, |pos| pos + 1)
}

pub fn line_end_boundary(chars: &[char], offset: usize) -> usize {
    let idx = offset.min(chars.len());
    chars[idx..]
        .iter()
        .position(|ch| *ch == '\n')
        .map_or(chars.len(), |pos| idx + pos)
}

#[cfg(test)]
#[path = "content_tests.rs"]
mod content_tests;
