use super::*;

fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

#[test]
fn previous_word_boundary_skips_whitespace_then_word() {
    let text = chars("foo bar  baz");
    assert_eq!(previous_word_boundary(&text, 12), 9);
    assert_eq!(previous_word_boundary(&text, 9), 4);
    assert_eq!(previous_word_boundary(&text, 5), 4);
    assert_eq!(previous_word_boundary(&text, 0), 0);
}

#[test]
fn previous_word_boundary_treats_punctuation_as_a_word() {
    let text = chars("foo...");
    assert_eq!(previous_word_boundary(&text, 6), 3);
}

#[test]
fn next_word_boundary_lands_on_next_word() {
    let text = chars("foo bar, baz");
    assert_eq!(next_word_boundary(&text, 0), 4);
    assert_eq!(next_word_boundary(&text, 4), 9);
    assert_eq!(next_word_boundary(&text, 9), 12);
    assert_eq!(next_word_boundary(&text, 12), 12);
}

#[test]
fn word_bounds_groups_by_character_class() {
    let text = chars("hello, world");
    assert_eq!(word_bounds(&text, 2), (0, 5));
    assert_eq!(word_bounds(&text, 5), (5, 6));
    assert_eq!(word_bounds(&text, 12), (7, 12));
    assert_eq!(word_bounds(&[], 0), (0, 0));
}

#[test]
fn line_boundaries_stop_at_newlines() {
    let text = chars("one\ntwo three\nfour");
    assert_eq!(line_start_boundary(&text, 6), 4);
    assert_eq!(line_end_boundary(&text, 6), 13);
    assert_eq!(line_start_boundary(&text, 2), 0);
    assert_eq!(line_end_boundary(&text, 15), 18);
}
