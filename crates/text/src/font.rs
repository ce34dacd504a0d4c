//! Font dictionaries reduced to what text search needs: how to split a string
//! operand into character codes, what text each code stands for, and how far
//! each glyph advances the pen.

use crate::cmap::ToUnicodeMap;
use crate::encoding::{BaseEncoding, glyph_name_to_char};
use crate::metrics;
use crate::objects::{dict_get, dict_number, number, numbers, resolve, resolve_dict, stream_bytes};
use log::{debug, warn};
use lopdf::{Dictionary, Document, Object};

const DEFAULT_ASCENT: f32 = 0.8;
const DEFAULT_DESCENT: f32 = -0.2;
/// Width used for simple fonts that carry neither `/Widths` nor `/MissingWidth`.
const DEFAULT_WIDTH: f32 = 500.0;
const DEFAULT_CID_WIDTH: f32 = 1000.0;

/// One decoded glyph from a string operand.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub code: u32,
    /// Unicode text for the glyph; empty when the font gives no way to recover it.
    pub text: String,
    /// Horizontal advance in text space units (before scaling by the font size).
    pub width: f32,
    /// Single-byte code 32, the only code word spacing applies to.
    pub is_word_space: bool,
}

#[derive(Debug, Clone)]
enum Encoding {
    /// One byte per code, mapped through a 256 entry table.
    Simple(Box<[Option<char>; 256]>),
    /// Two bytes per code. `unicode` is set for the predefined `UCS2`/`UTF16`
    /// CMaps, whose codes are Unicode values; for everything else (`Identity-H`
    /// and embedded CMaps) a code is a glyph index with no text of its own.
    Composite { unicode: bool },
}

#[derive(Debug, Clone, Default)]
struct Widths {
    first_char: u32,
    widths: Vec<f32>,
    /// `(first, last, width)` runs from a CID font's `/W` array.
    cid_ranges: Vec<(u32, u32, f32)>,
    missing: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct Font {
    base_font: String,
    encoding: Encoding,
    widths: Widths,
    to_unicode: Option<ToUnicodeMap>,
    /// Glyph space to text space factor: 1/1000 except for Type 3 fonts.
    scale: f32,
    standard: bool,
    pub ascent: f32,
    pub descent: f32,
}

impl Font {
    /// Builds a font from its dictionary. Missing or malformed entries fall back
    /// to defaults; a font never fails to load.
    pub fn load(doc: &Document, dict: &Dictionary) -> Self {
        let subtype = name_of(doc, dict, b"Subtype").unwrap_or_default();
        let base_font = name_of(doc, dict, b"BaseFont").unwrap_or_default();
        let to_unicode = load_to_unicode(doc, dict);

        let font = match subtype.as_str() {
            "Type0" => Self::load_composite(doc, dict, base_font, to_unicode),
            "Type3" => Self::load_type3(doc, dict, base_font, to_unicode),
            _ => Self::load_simple(doc, dict, base_font, to_unicode),
        };
        debug!(
            "Loaded {} font '{}' (scale {}, ToUnicode: {})",
            if subtype.is_empty() { "untyped" } else { subtype.as_str() },
            font.base_font,
            font.scale,
            font.to_unicode.is_some()
        );
        font
    }

    fn load_simple(doc: &Document, dict: &Dictionary, base_font: String, to_unicode: Option<ToUnicodeMap>) -> Self {
        let descriptor = dict_get(doc, dict, b"FontDescriptor").and_then(|o| resolve_dict(doc, o));
        let (ascent, descent) = vertical_metrics(doc, descriptor);
        let standard = metrics::is_standard_font(&base_font) && !dict.has(b"Widths");
        Self {
            encoding: Encoding::Simple(simple_encoding(doc, dict)),
            widths: simple_widths(doc, dict, descriptor),
            to_unicode,
            scale: 0.001,
            standard,
            ascent,
            descent,
            base_font,
        }
    }

    fn load_type3(doc: &Document, dict: &Dictionary, base_font: String, to_unicode: Option<ToUnicodeMap>) -> Self {
        let scale = dict_get(doc, dict, b"FontMatrix")
            .and_then(|o| numbers(doc, o))
            .and_then(|m| m.first().copied())
            .filter(|a| *a != 0.0)
            .unwrap_or(0.001);
        Self {
            encoding: Encoding::Simple(simple_encoding(doc, dict)),
            widths: simple_widths(doc, dict, None),
            to_unicode,
            scale,
            standard: false,
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
            base_font,
        }
    }

    fn load_composite(doc: &Document, dict: &Dictionary, base_font: String, to_unicode: Option<ToUnicodeMap>) -> Self {
        let descendant = dict_get(doc, dict, b"DescendantFonts")
            .and_then(|o| match o {
                Object::Array(items) => items.first(),
                _ => None,
            })
            .and_then(|o| resolve_dict(doc, o));

        let mut widths = Widths {
            missing: Some(DEFAULT_CID_WIDTH),
            ..Widths::default()
        };
        let mut descriptor = None;
        if let Some(cid_font) = descendant {
            if let Some(dw) = dict_number(doc, cid_font, b"DW") {
                widths.missing = Some(dw);
            }
            if let Some(w) = dict_get(doc, cid_font, b"W") {
                widths.cid_ranges = cid_widths(doc, w);
            }
            descriptor = dict_get(doc, cid_font, b"FontDescriptor").and_then(|o| resolve_dict(doc, o));
        } else {
            warn!("Type0 font '{}' has no descendant font", base_font);
        }
        let (ascent, descent) = vertical_metrics(doc, descriptor);
        let unicode = composite_codes_are_unicode(doc, dict, &base_font);
        if !unicode && to_unicode.is_none() {
            warn!(
                "Type0 font '{}' has no ToUnicode map; its text cannot be searched",
                base_font
            );
        }
        Self {
            encoding: Encoding::Composite { unicode },
            widths,
            to_unicode,
            scale: 0.001,
            standard: false,
            ascent,
            descent,
            base_font,
        }
    }

    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    /// Splits a string operand into glyphs.
    pub fn decode(&self, bytes: &[u8]) -> Vec<Glyph> {
        match &self.encoding {
            Encoding::Simple(table) => bytes
                .iter()
                .map(|&b| {
                    let code = u32::from(b);
                    let text = self.text_for(code, || table[usize::from(b)]);
                    Glyph {
                        code,
                        width: self.width_for(code, &text),
                        is_word_space: b == b' ',
                        text,
                    }
                })
                .collect(),
            Encoding::Composite { unicode } => bytes
                .chunks(2)
                .map(|pair| {
                    let code = pair.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
                    let text = self.text_for(code, || {
                        char::from_u32(code).filter(|c| *unicode && !c.is_control())
                    });
                    Glyph {
                        code,
                        width: self.width_for(code, &text),
                        is_word_space: false,
                        text,
                    }
                })
                .collect(),
        }
    }

    fn text_for(&self, code: u32, fallback: impl FnOnce() -> Option<char>) -> String {
        if let Some(text) = self.to_unicode.as_ref().and_then(|m| m.get(code)) {
            return text.to_string();
        }
        fallback().map(String::from).unwrap_or_default()
    }

    fn width_for(&self, code: u32, text: &str) -> f32 {
        let w = &self.widths;
        let glyph_width = if let Some((_, _, width)) = w.cid_ranges.iter().find(|(lo, hi, _)| (*lo..=*hi).contains(&code)) {
            *width
        } else if let Some(width) = code.checked_sub(w.first_char).and_then(|i| w.widths.get(i as usize)) {
            *width
        } else if self.standard {
            metrics::standard_width(&self.base_font, text.chars().next().unwrap_or(' '))
        } else {
            w.missing.unwrap_or(DEFAULT_WIDTH)
        };
        glyph_width * self.scale
    }
}

/// Whether a Type0 font's `/Encoding` names a CMap whose codes are Unicode.
/// Other predefined CMaps may mix one and two byte codes, which are still
/// read two bytes at a time.
fn composite_codes_are_unicode(doc: &Document, dict: &Dictionary, base_font: &str) -> bool {
    let Some(name) = name_of(doc, dict, b"Encoding") else {
        debug!("Type0 font '{}' uses an embedded CMap", base_font);
        return false;
    };
    if name.starts_with("Identity-") {
        return false;
    }
    if name.contains("UCS2") || name.contains("UTF16") {
        return true;
    }
    warn!(
        "Type0 font '{}' uses CMap {}; codes are read as two bytes and may split wrongly",
        base_font, name
    );
    false
}

fn name_of(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict_get(doc, dict, key)
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

fn load_to_unicode(doc: &Document, dict: &Dictionary) -> Option<ToUnicodeMap> {
    let Some(Object::Stream(stream)) = dict_get(doc, dict, b"ToUnicode") else {
        return None;
    };
    match stream_bytes(stream) {
        Ok(bytes) => Some(ToUnicodeMap::parse(&bytes)).filter(|m| !m.is_empty()),
        Err(e) => {
            warn!("Ignoring unreadable ToUnicode stream: {}", e);
            None
        }
    }
}

fn vertical_metrics(doc: &Document, descriptor: Option<&Dictionary>) -> (f32, f32) {
    let Some(descriptor) = descriptor else {
        return (DEFAULT_ASCENT, DEFAULT_DESCENT);
    };
    let ascent = dict_number(doc, descriptor, b"Ascent")
        .map(|a| a / 1000.0)
        .filter(|a| *a > 0.0)
        .unwrap_or(DEFAULT_ASCENT);
    let descent = dict_number(doc, descriptor, b"Descent")
        .map(|d| d / 1000.0)
        .filter(|d| *d < 0.0)
        .unwrap_or(DEFAULT_DESCENT);
    (ascent, descent)
}

fn simple_widths(doc: &Document, dict: &Dictionary, descriptor: Option<&Dictionary>) -> Widths {
    Widths {
        first_char: dict_number(doc, dict, b"FirstChar").map_or(0, |f| f.max(0.0) as u32),
        widths: dict_get(doc, dict, b"Widths")
            .and_then(|o| numbers(doc, o))
            .unwrap_or_default(),
        cid_ranges: Vec::new(),
        missing: descriptor.and_then(|d| dict_number(doc, d, b"MissingWidth")),
    }
}

/// Parses a `/W` array: `c [w1 w2 ...]` lists and `c_first c_last w` runs.
fn cid_widths(doc: &Document, w: &Object) -> Vec<(u32, u32, f32)> {
    let Object::Array(items) = w else {
        return Vec::new();
    };
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < items.len() {
        let Some(first) = resolve(doc, &items[i]).and_then(number) else {
            i += 1;
            continue;
        };
        let first = first.max(0.0) as u32;
        match items.get(i + 1).and_then(|o| resolve(doc, o)) {
            Some(Object::Array(list)) => {
                for (offset, width) in list.iter().filter_map(|o| resolve(doc, o).and_then(number)).enumerate() {
                    let code = first + offset as u32;
                    ranges.push((code, code, width));
                }
                i += 2;
            }
            Some(last) => {
                let last = number(last).map_or(first, |l| l.max(0.0) as u32);
                if let Some(width) = items.get(i + 2).and_then(|o| resolve(doc, o)).and_then(number) {
                    ranges.push((first, last, width));
                }
                i += 3;
            }
            None => break,
        }
    }
    ranges
}

fn simple_encoding(doc: &Document, dict: &Dictionary) -> Box<[Option<char>; 256]> {
    let mut base = BaseEncoding::default();
    let mut differences: Option<&Vec<Object>> = None;
    match dict_get(doc, dict, b"Encoding") {
        Some(Object::Name(name)) => {
            base = BaseEncoding::from_name(name).unwrap_or_default();
        }
        Some(Object::Dictionary(enc)) => {
            if let Some(name) = dict_get(doc, enc, b"BaseEncoding").and_then(|o| o.as_name().ok()) {
                base = BaseEncoding::from_name(name).unwrap_or_default();
            }
            if let Some(Object::Array(items)) = dict_get(doc, enc, b"Differences") {
                differences = Some(items);
            }
        }
        _ => {}
    }

    let mut table = Box::new([None; 256]);
    for (code, slot) in table.iter_mut().enumerate() {
        *slot = base.decode(code as u8);
    }
    if let Some(items) = differences {
        let mut code: Option<usize> = None;
        for item in items {
            match resolve(doc, item) {
                Some(Object::Integer(start)) => code = usize::try_from(*start).ok(),
                Some(Object::Name(glyph)) => {
                    if let Some(c) = code.filter(|c| *c < 256) {
                        table[c] = glyph_name_to_char(&String::from_utf8_lossy(glyph));
                        code = Some(c + 1);
                    }
                }
                _ => {}
            }
        }
    }
    table
}
