//! Positioned characters grouped into lines.

use crate::search;
use findtext_types::{Point, Rect};

/// Gaps wider than this fraction of the font size read as a word break.
const WORD_GAP_RATIO: f32 = 0.15;
/// Baselines closer than this fraction of the font size belong to one line.
const BASELINE_TOLERANCE: f32 = 0.5;
/// Cosine above which two baseline directions count as the same.
const DIRECTION_TOLERANCE: f32 = 0.99;
const SPACE_ASCENT: f32 = 0.8;
const SPACE_DESCENT: f32 = -0.2;

/// A single character with its bounding box in user space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChar {
    pub ch: char,
    pub bbox: Rect,
    /// Baseline origin of the glyph.
    pub origin: Point,
    /// Baseline point the glyph advances to.
    pub end: Point,
    /// Unit vector along the baseline in user space.
    pub dir: Point,
    /// Effective font size in user space units.
    pub size: f32,
}

impl TextChar {
    /// Distance of `p` along this character's baseline direction.
    fn along(&self, p: Point) -> f32 {
        p.x * self.dir.x + p.y * self.dir.y
    }

    /// Signed distance of `p` from the line through this character's baseline.
    fn across(&self, p: Point) -> f32 {
        self.dir.x * (p.y - self.origin.y) - self.dir.y * (p.x - self.origin.x)
    }

    fn same_direction(&self, other: &TextChar) -> bool {
        self.dir.x * other.dir.x + self.dir.y * other.dir.y > DIRECTION_TOLERANCE
    }

    /// A synthetic space filling the gap between `prev` and `next` on their baseline.
    fn word_space_between(prev: &TextChar, next: &TextChar) -> TextChar {
        let up = Point::new(-prev.dir.y, prev.dir.x);
        let offset = |p: Point, k: f32| Point::new(p.x + up.x * k * prev.size, p.y + up.y * k * prev.size);
        let bbox = Rect::from_points(&[
            offset(prev.end, SPACE_DESCENT),
            offset(prev.end, SPACE_ASCENT),
            offset(next.origin, SPACE_DESCENT),
            offset(next.origin, SPACE_ASCENT),
        ])
        .unwrap_or_default();
        TextChar {
            ch: ' ',
            bbox,
            origin: prev.end,
            end: next.origin,
            dir: prev.dir,
            size: prev.size,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    chars: Vec<TextChar>,
}

impl TextLine {
    pub fn chars(&self) -> &[TextChar] {
        &self.chars
    }

    pub fn text(&self) -> String {
        self.chars.iter().map(|c| c.ch).collect()
    }

    pub fn bbox(&self) -> Option<Rect> {
        let first = self.chars.first()?.bbox;
        Some(self.chars.iter().fold(first, |acc, c| acc.union(&c.bbox)))
    }
}

/// The text layer of one page, in content stream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPage {
    lines: Vec<TextLine>,
}

impl TextPage {
    /// Groups characters into lines. Positions are measured along each
    /// glyph's baseline direction, so rotated text groups the same way as
    /// upright text. A new line starts when the direction changes, the
    /// baseline moves sideways or the pen jumps backwards; a visible gap
    /// inside a line becomes a space.
    pub fn from_chars(chars: impl IntoIterator<Item = TextChar>) -> Self {
        let mut lines = Vec::new();
        let mut current: Vec<TextChar> = Vec::new();

        for c in chars {
            if let Some(prev) = current.last() {
                let size = prev.size.max(c.size).max(f32::EPSILON);
                let same_baseline =
                    prev.same_direction(&c) && prev.across(c.origin).abs() <= BASELINE_TOLERANCE * size;
                let moved_back = prev.along(c.origin) < prev.along(prev.origin) - size;
                let gap = prev.along(c.origin) - prev.along(prev.end);
                if !same_baseline || moved_back {
                    lines.push(TextLine {
                        chars: std::mem::take(&mut current),
                    });
                } else if gap > WORD_GAP_RATIO * size && !prev.ch.is_whitespace() && !c.ch.is_whitespace() {
                    let space = TextChar::word_space_between(prev, &c);
                    current.push(space);
                }
            }
            current.push(c);
        }
        if !current.is_empty() {
            lines.push(TextLine { chars: current });
        }
        Self { lines }
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The page text with one line per text line.
    pub fn text(&self) -> String {
        self.lines.iter().map(TextLine::text).collect::<Vec<_>>().join("\n")
    }

    /// Finds every occurrence of `needle` and returns one rectangle per line
    /// fragment of each occurrence, in reading order.
    pub fn search(&self, needle: &str) -> Vec<Rect> {
        search::find_all(self, needle)
    }
}
