//! Built-in advance widths for the standard 14 fonts, which PDF writers may
//! reference without a `/Widths` array.

/// Helvetica advance widths for U+0020..=U+007E, in thousandths of an em.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // A..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // a..z
    334, 260, 334, 584, // {..~
];

const HELVETICA_DEFAULT: f32 = 556.0;
const COURIER_WIDTH: f32 = 600.0;

/// Strips a subset tag such as `ABCDEF+` from a base font name.
pub(crate) fn strip_subset_prefix(base_font: &str) -> &str {
    match base_font.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => base_font,
    }
}

pub(crate) fn is_standard_font(base_font: &str) -> bool {
    let name = strip_subset_prefix(base_font);
    ["Helvetica", "Arial", "Courier", "Times", "Symbol", "ZapfDingbats"]
        .iter()
        .any(|family| name.starts_with(family))
}

/// Width of `ch` in a standard font, in thousandths of an em.
///
/// Faces other than Courier reuse the Helvetica table: match rectangles only
/// need to cover the glyphs, not reproduce exact typesetting.
pub(crate) fn standard_width(base_font: &str, ch: char) -> f32 {
    let name = strip_subset_prefix(base_font);
    if name.starts_with("Courier") {
        return COURIER_WIDTH;
    }
    match u32::from(ch) {
        code @ 0x20..=0x7E => f32::from(HELVETICA_ASCII[(code - 0x20) as usize]),
        _ => HELVETICA_DEFAULT,
    }
}
