//! Markup annotations over search matches.
//!
//! An annotation is created in two steps: [`add_highlight`] / [`add_outline`]
//! write the annotation dictionary and attach it to the page, and
//! [`Annotation::update`] generates the `/AP` normal appearance so viewers can
//! draw it without regenerating it themselves.

use crate::error::ComposerError;
use chrono::Utc;
use findtext_types::{Color, Rect};
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

/// Print flag: the annotation is printed along with the page.
const FLAG_PRINT: i64 = 4;
const HIGHLIGHT_OPACITY: f32 = 0.5;
const OUTLINE_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    /// `/Highlight` text markup.
    Highlight,
    /// `/Square` with a stroked border.
    Outline,
}

impl AnnotationKind {
    fn subtype(self) -> &'static str {
        match self {
            Self::Highlight => "Highlight",
            Self::Outline => "Square",
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Highlight => Color::YELLOW,
            Self::Outline => Color::RED,
        }
    }
}

/// Handle to an annotation that has been attached to a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    id: ObjectId,
    page_id: ObjectId,
    kind: AnnotationKind,
    rect: Rect,
    color: Color,
}

impl Annotation {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn page_id(&self) -> ObjectId {
        self.page_id
    }

    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Generates the normal appearance stream and stores it under `/AP /N`,
    /// replacing any previous appearance.
    pub fn update(&self, doc: &mut Document) -> Result<(), ComposerError> {
        let appearance = match self.kind {
            AnnotationKind::Highlight => highlight_appearance(&self.rect, self.color)?,
            AnnotationKind::Outline => outline_appearance(&self.rect, self.color)?,
        };
        let appearance_id = doc.add_object(appearance);
        let annot = doc.get_object_mut(self.id)?.as_dict_mut()?;
        annot.set("AP", dictionary! { "N" => appearance_id });
        annot.set("M", modification_date());
        Ok(())
    }
}

/// Covers `rect` on the page with a yellow highlight.
pub fn add_highlight(doc: &mut Document, page_id: ObjectId, rect: Rect) -> Result<Annotation, ComposerError> {
    add_annotation(doc, page_id, rect, AnnotationKind::Highlight)
}

/// Draws a red rectangle around `rect` on the page.
pub fn add_outline(doc: &mut Document, page_id: ObjectId, rect: Rect) -> Result<Annotation, ComposerError> {
    add_annotation(doc, page_id, rect, AnnotationKind::Outline)
}

fn add_annotation(
    doc: &mut Document,
    page_id: ObjectId,
    rect: Rect,
    kind: AnnotationKind,
) -> Result<Annotation, ComposerError> {
    if rect.is_empty() {
        return Err(ComposerError::Other(format!("Cannot annotate an empty rectangle {:?}", rect)));
    }
    // Fail before allocating anything if the target is not a page.
    doc.get_object(page_id)?.as_dict()?;

    let color = kind.color();
    let id = doc.new_object_id();
    let mut annot = dictionary! {
        "Type" => "Annot",
        "Subtype" => kind.subtype(),
        "Rect" => reals(&rect.to_array()),
        "C" => reals(&color.components()),
        "F" => FLAG_PRINT,
        "P" => page_id,
        "NM" => Object::string_literal(format!("findtext-annot-{}-{}", id.0, id.1)),
        "M" => modification_date(),
    };
    match kind {
        AnnotationKind::Highlight => {
            annot.set("QuadPoints", reals(&rect.quad_points()));
            annot.set("CA", HIGHLIGHT_OPACITY);
        }
        AnnotationKind::Outline => {
            annot.set("Border", vec![0.into(), 0.into(), OUTLINE_WIDTH.into()]);
            annot.set("BS", dictionary! { "Type" => "Border", "W" => OUTLINE_WIDTH, "S" => "S" });
        }
    }
    doc.objects.insert(id, Object::Dictionary(annot));
    attach_to_page(doc, page_id, id)?;
    debug!("Added {:?} annotation {:?} on page {:?} at {:?}", kind, id, page_id, rect);

    Ok(Annotation {
        id,
        page_id,
        kind,
        rect,
        color,
    })
}

/// Appends `annot_id` to the page's `/Annots`, which may be a direct array or
/// a reference to one.
fn attach_to_page(doc: &mut Document, page_id: ObjectId, annot_id: ObjectId) -> Result<(), ComposerError> {
    let shared_array = doc
        .get_object(page_id)?
        .as_dict()?
        .get(b"Annots")
        .and_then(Object::as_reference)
        .ok();
    if let Some(array_id) = shared_array {
        if let Ok(Object::Array(items)) = doc.get_object_mut(array_id) {
            items.push(Object::Reference(annot_id));
            return Ok(());
        }
    }

    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    if let Ok(Object::Array(items)) = page_dict.get_mut(b"Annots") {
        items.push(Object::Reference(annot_id));
    } else {
        page_dict.set("Annots", vec![Object::Reference(annot_id)]);
    }
    Ok(())
}

fn highlight_appearance(rect: &Rect, color: Color) -> Result<Stream, ComposerError> {
    let [r, g, b] = color.components();
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new("gs", vec!["GS0".into()]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new(
                "re",
                vec![rect.left.into(), rect.bottom.into(), rect.width().into(), rect.height().into()],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ],
    };
    let resources = dictionary! {
        "ExtGState" => dictionary! {
            // Opacity comes from the annotation's /CA; repeating it here would apply it twice.
            "GS0" => dictionary! {
                "Type" => "ExtGState",
                "BM" => "Multiply",
            },
        },
    };
    form_xobject(rect, resources, content)
}

fn outline_appearance(rect: &Rect, color: Color) -> Result<Stream, ComposerError> {
    let [r, g, b] = color.components();
    // Inset by half the line width so the stroke stays inside the box.
    let inner = rect.inflate(-OUTLINE_WIDTH / 2.0);
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new("w", vec![OUTLINE_WIDTH.into()]),
            Operation::new(
                "re",
                vec![inner.left.into(), inner.bottom.into(), inner.width().into(), inner.height().into()],
            ),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ],
    };
    form_xobject(rect, Dictionary::new(), content)
}

fn form_xobject(bbox: &Rect, resources: Dictionary, content: Content) -> Result<Stream, ComposerError> {
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "FormType" => 1,
        "BBox" => reals(&bbox.to_array()),
        "Resources" => resources,
    };
    Ok(Stream::new(dict, content.encode()?))
}

fn reals(values: &[f32]) -> Vec<Object> {
    values.iter().map(|v| Object::Real(*v)).collect()
}

fn modification_date() -> Object {
    Object::string_literal(Utc::now().format("D:%Y%m%d%H%M%SZ").to_string())
}
