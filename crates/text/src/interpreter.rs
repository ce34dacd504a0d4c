//! Runs a page's content stream far enough to know where every glyph lands.

use crate::error::TextError;
use crate::font::{Font, Glyph};
use crate::objects::{dict_get, number, numbers, resolve, resolve_dict, stream_bytes};
use crate::page::TextChar;
use findtext_types::{Matrix, Point, Rect};
use log::{debug, warn};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;
use std::rc::Rc;

/// Form XObjects nested deeper than this are not entered.
const MAX_FORM_DEPTH: usize = 8;

#[derive(Debug, Clone)]
struct TextState {
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    leading: f32,
    rise: f32,
    font: Option<Rc<Font>>,
    font_size: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
            font: None,
            font_size: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GraphicsState {
    ctm: Matrix,
    text: TextState,
}

pub(crate) struct Interpreter<'a> {
    doc: &'a Document,
    fonts: HashMap<ObjectId, Rc<Font>>,
    chars: Vec<TextChar>,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            fonts: HashMap::new(),
            chars: Vec::new(),
        }
    }

    pub(crate) fn into_chars(self) -> Vec<TextChar> {
        self.chars
    }

    /// Interprets `content` with the given resources, starting from `ctm`.
    pub(crate) fn run(
        &mut self,
        content: &[u8],
        resources: Option<&'a Dictionary>,
        ctm: Matrix,
        depth: usize,
    ) -> Result<(), TextError> {
        let content = Content::decode(content).map_err(|e| TextError::Content(e.to_string()))?;
        let mut gs = GraphicsState {
            ctm,
            text: TextState::default(),
        };
        let mut saved: Vec<GraphicsState> = Vec::new();
        let mut tm = Matrix::identity();
        let mut tlm = Matrix::identity();

        for op in &content.operations {
            let operands = op.operands.as_slice();
            match op.operator.as_str() {
                "q" => saved.push(gs.clone()),
                "Q" => {
                    if let Some(previous) = saved.pop() {
                        gs = previous;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_operand(operands) {
                        gs.ctm = m.multiply(&gs.ctm);
                    }
                }
                "BT" => {
                    tm = Matrix::identity();
                    tlm = Matrix::identity();
                }
                "Tc" => gs.text.char_spacing = operand(operands, 0),
                "Tw" => gs.text.word_spacing = operand(operands, 0),
                "Tz" => gs.text.horizontal_scaling = operand(operands, 0) / 100.0,
                "TL" => gs.text.leading = operand(operands, 0),
                "Ts" => gs.text.rise = operand(operands, 0),
                "Tf" => {
                    let name = operands.first().and_then(|o| o.as_name().ok());
                    gs.text.font = name.and_then(|n| self.font(resources, n));
                    gs.text.font_size = operand(operands, 1);
                }
                "Td" | "TD" => {
                    let (tx, ty) = (operand(operands, 0), operand(operands, 1));
                    if op.operator == "TD" {
                        gs.text.leading = -ty;
                    }
                    tlm = Matrix::translation(tx, ty).multiply(&tlm);
                    tm = tlm;
                }
                "Tm" => {
                    if let Some(m) = matrix_operand(operands) {
                        tlm = m;
                        tm = m;
                    }
                }
                "T*" => {
                    tlm = Matrix::translation(0.0, -gs.text.leading).multiply(&tlm);
                    tm = tlm;
                }
                "Tj" => {
                    if let Some(bytes) = string_operand(operands.first()) {
                        self.show(&gs, &mut tm, bytes);
                    }
                }
                "'" => {
                    tlm = Matrix::translation(0.0, -gs.text.leading).multiply(&tlm);
                    tm = tlm;
                    if let Some(bytes) = string_operand(operands.first()) {
                        self.show(&gs, &mut tm, bytes);
                    }
                }
                "\"" => {
                    gs.text.word_spacing = operand(operands, 0);
                    gs.text.char_spacing = operand(operands, 1);
                    tlm = Matrix::translation(0.0, -gs.text.leading).multiply(&tlm);
                    tm = tlm;
                    if let Some(bytes) = string_operand(operands.get(2)) {
                        self.show(&gs, &mut tm, bytes);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        for item in items {
                            if let Some(bytes) = string_operand(Some(item)) {
                                self.show(&gs, &mut tm, bytes);
                            } else if let Some(adjust) = number(item) {
                                let tx = -adjust / 1000.0 * gs.text.font_size * gs.text.horizontal_scaling;
                                tm = Matrix::translation(tx, 0.0).multiply(&tm);
                            }
                        }
                    }
                }
                "Do" => {
                    if let Some(name) = operands.first().and_then(|o| o.as_name().ok()) {
                        self.draw_form(resources, name, gs.ctm, depth);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn font(&mut self, resources: Option<&'a Dictionary>, name: &[u8]) -> Option<Rc<Font>> {
        let doc = self.doc;
        let fonts = resources.and_then(|r| dict_get(doc, r, b"Font")).and_then(|o| resolve_dict(doc, o))?;
        let entry = fonts.get(name).ok()?;
        if let Object::Reference(id) = entry {
            if let Some(font) = self.fonts.get(id) {
                return Some(Rc::clone(font));
            }
        }
        let Some(dict) = resolve_dict(doc, entry) else {
            warn!("Font resource /{} is not a dictionary", String::from_utf8_lossy(name));
            return None;
        };
        let font = Rc::new(Font::load(doc, dict));
        if let Object::Reference(id) = entry {
            self.fonts.insert(*id, Rc::clone(&font));
        }
        Some(font)
    }

    fn show(&mut self, gs: &GraphicsState, tm: &mut Matrix, bytes: &[u8]) {
        let Some(font) = gs.text.font.as_ref() else {
            debug!("Text shown without a font selected; skipping {} bytes", bytes.len());
            return;
        };
        let ts = &gs.text;
        for glyph in font.decode(bytes) {
            let trm = Matrix::new(ts.font_size * ts.horizontal_scaling, 0.0, 0.0, ts.font_size, 0.0, ts.rise)
                .multiply(tm)
                .multiply(&gs.ctm);
            self.emit(&glyph, font, &trm, baseline_direction(tm, &gs.ctm));

            let spacing = ts.char_spacing + if glyph.is_word_space { ts.word_spacing } else { 0.0 };
            let tx = (glyph.width * ts.font_size + spacing) * ts.horizontal_scaling;
            *tm = Matrix::translation(tx, 0.0).multiply(tm);
        }
    }

    /// Records the characters of one glyph. Multi-character glyphs (ligatures
    /// and the like) are split into equal slices of the glyph box.
    fn emit(&mut self, glyph: &Glyph, font: &Font, trm: &Matrix, dir: Point) {
        let text = expand_ligatures(&glyph.text);
        let count = text.chars().count();
        if count == 0 {
            return;
        }
        let origin = trm.transform_point(0.0, 0.0);
        let up = trm.transform_point(0.0, 1.0);
        let size = ((up.x - origin.x).powi(2) + (up.y - origin.y).powi(2)).sqrt();
        let slice = glyph.width.max(0.0) / count as f32;
        for (i, ch) in text.chars().enumerate() {
            let left = slice * i as f32;
            let glyph_box = Rect::new(left, font.descent, left + slice, font.ascent);
            self.chars.push(TextChar {
                ch,
                bbox: trm.transform_rect(&glyph_box),
                origin: trm.transform_point(left, 0.0),
                end: trm.transform_point(left + slice, 0.0),
                dir,
                size,
            });
        }
    }

    fn draw_form(&mut self, resources: Option<&'a Dictionary>, name: &[u8], ctm: Matrix, depth: usize) {
        let doc = self.doc;
        let Some(Object::Stream(stream)) = resources
            .and_then(|r| dict_get(doc, r, b"XObject"))
            .and_then(|o| resolve_dict(doc, o))
            .and_then(|x| x.get(name).ok())
            .and_then(|o| resolve(doc, o))
        else {
            return;
        };
        if stream.dict.get(b"Subtype").and_then(|s| s.as_name()).ok() != Some(b"Form".as_slice()) {
            return;
        }
        if depth >= MAX_FORM_DEPTH {
            warn!("Form XObject /{} nested too deeply; skipped", String::from_utf8_lossy(name));
            return;
        }
        let matrix = dict_get(doc, &stream.dict, b"Matrix")
            .and_then(|o| numbers(doc, o))
            .and_then(|m| Matrix::from_slice(&m))
            .unwrap_or_default();
        let form_resources = dict_get(doc, &stream.dict, b"Resources")
            .and_then(|o| resolve_dict(doc, o))
            .or(resources);
        let result = stream_bytes(stream)
            .and_then(|bytes| self.run(&bytes, form_resources, matrix.multiply(&ctm), depth + 1));
        if let Err(e) = result {
            warn!("Skipping unreadable form XObject /{}: {}", String::from_utf8_lossy(name), e);
        }
    }
}

/// Unit vector of the text baseline in user space. Taken from the text and
/// graphics matrices alone, so it survives a zero font size or `0 Tz`.
fn baseline_direction(tm: &Matrix, ctm: &Matrix) -> Point {
    let m = tm.multiply(ctm);
    let origin = m.transform_point(0.0, 0.0);
    let ahead = m.transform_point(1.0, 0.0);
    let (dx, dy) = (ahead.x - origin.x, ahead.y - origin.y);
    let len = (dx * dx + dy * dy).sqrt();
    if len > f32::EPSILON {
        Point::new(dx / len, dy / len)
    } else {
        Point::new(1.0, 0.0)
    }
}

fn operand(operands: &[Object], index: usize) -> f32 {
    operands.get(index).and_then(number).unwrap_or(0.0)
}

fn matrix_operand(operands: &[Object]) -> Option<Matrix> {
    let values: Option<Vec<f32>> = operands.iter().map(number).collect();
    Matrix::from_slice(&values?)
}

fn string_operand(obj: Option<&Object>) -> Option<&[u8]> {
    match obj? {
        Object::String(bytes, _) => Some(bytes.as_slice()),
        _ => None,
    }
}

/// Replaces the Latin presentation-form ligatures with their letters.
fn expand_ligatures(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{FB00}' => out.push_str("ff"),
            '\u{FB01}' => out.push_str("fi"),
            '\u{FB02}' => out.push_str("fl"),
            '\u{FB03}' => out.push_str("ffi"),
            '\u{FB04}' => out.push_str("ffl"),
            '\u{FB05}' | '\u{FB06}' => out.push_str("st"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}
