//! Literal, case-insensitive search over a page's text layer.

use crate::page::TextPage;
use findtext_types::Rect;
use log::debug;

/// Smallest width and height of a reported match, in user space units.
/// Glyphs with no advance (zero `/Widths` entries, `0 Tz`) still get a
/// rectangle an annotation can cover.
const MIN_MATCH_EXTENT: f32 = 1.0;

/// A character of the searchable text and, for real glyphs, where it sits.
struct Slot {
    ch: char,
    /// `(line index, glyph box)`; `None` for the separator between lines.
    place: Option<(usize, Rect)>,
}

/// Folds whitespace to a plain space and letters to lower case. Characters
/// whose lower case form is more than one character are left as they are.
fn normalize(ch: char) -> char {
    if ch.is_whitespace() {
        return ' ';
    }
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => ch,
    }
}

fn haystack(page: &TextPage) -> Vec<Slot> {
    let mut slots: Vec<Slot> = Vec::new();
    for (index, line) in page.lines().iter().enumerate() {
        let starts_with_space = line.chars().first().is_some_and(|c| c.ch.is_whitespace());
        let ends_with_space = slots.last().is_some_and(|s| s.ch == ' ');
        if !slots.is_empty() && !starts_with_space && !ends_with_space {
            slots.push(Slot { ch: ' ', place: None });
        }
        slots.extend(line.chars().iter().map(|c| Slot {
            ch: normalize(c.ch),
            place: Some((index, c.bbox)),
        }));
    }
    slots
}

/// Every non-overlapping occurrence of `needle`, ignoring case, scanned left
/// to right.
///
/// Lines are joined by a single space so a phrase broken across lines is still
/// found; such a match yields one rectangle per line it touches. No returned
/// rectangle is thinner than [`MIN_MATCH_EXTENT`] in either direction.
pub fn find_all(page: &TextPage, needle: &str) -> Vec<Rect> {
    let needle: Vec<char> = needle.chars().map(normalize).collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let slots = haystack(page);
    let mut rects = Vec::new();
    let mut i = 0;
    while i + needle.len() <= slots.len() {
        let window = &slots[i..i + needle.len()];
        if window.iter().zip(&needle).all(|(slot, ch)| slot.ch == *ch) {
            rects.extend(fragment_rects(window));
            i += needle.len();
        } else {
            i += 1;
        }
    }
    rects
}

fn fragment_rects(window: &[Slot]) -> Vec<Rect> {
    let mut rects: Vec<Rect> = Vec::new();
    let mut current: Option<(usize, Rect)> = None;
    for (line, bbox) in window.iter().filter_map(|s| s.place) {
        current = match current {
            Some((open_line, rect)) if open_line == line => Some((line, rect.union(&bbox))),
            Some((_, rect)) => {
                rects.push(rect);
                Some((line, bbox))
            }
            None => Some((line, bbox)),
        };
    }
    rects.extend(current.map(|(_, rect)| rect));
    rects
        .into_iter()
        .map(|rect| {
            if rect.width() < MIN_MATCH_EXTENT || rect.height() < MIN_MATCH_EXTENT {
                debug!("Widening degenerate match box {:?}", rect);
                rect.with_min_size(MIN_MATCH_EXTENT)
            } else {
                rect
            }
        })
        .collect()
}
