use lopdf::{Dictionary, Document as LopdfDocument, Object};

fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// The annotation dictionaries of a page (1-based page number).
pub fn annotations(doc: &LopdfDocument, page_number: u32) -> Vec<&Dictionary> {
    let Some(page_id) = doc.get_pages().get(&page_number).copied() else {
        return Vec::new();
    };
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    let Some(annots) = page.get(b"Annots").ok().and_then(|a| resolve(doc, a)) else {
        return Vec::new();
    };
    let Ok(items) = annots.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| resolve(doc, item))
        .filter_map(|item| item.as_dict().ok())
        .collect()
}

/// `/Subtype` names of a page's annotations, in array order.
pub fn annotation_subtypes(doc: &LopdfDocument, page_number: u32) -> Vec<String> {
    annotations(doc, page_number)
        .into_iter()
        .filter_map(|a| a.get(b"Subtype").and_then(Object::as_name).ok())
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect()
}

/// `/Rect` of each annotation on a page as `[x1, y1, x2, y2]`.
pub fn annotation_rects(doc: &LopdfDocument, page_number: u32) -> Vec<[f32; 4]> {
    annotations(doc, page_number)
        .into_iter()
        .filter_map(|a| a.get(b"Rect").and_then(Object::as_array).ok())
        .filter_map(|rect| {
            let values: Vec<f32> = rect.iter().filter_map(|v| v.as_float().ok()).collect();
            <[f32; 4]>::try_from(values).ok()
        })
        .collect()
}

/// Titles and target pages of the outline, in outline order.
pub fn outline_entries(doc: &LopdfDocument) -> Vec<(String, u32)> {
    findtext::composer::get_toc(doc)
        .map(|toc| toc.into_iter().map(|e| (e.title, e.page)).collect())
        .unwrap_or_default()
}

/// Assert the number of annotations of `subtype` on a page
#[macro_export]
macro_rules! assert_annotation_count {
    ($doc:expr, $page:expr, $subtype:expr, $count:expr) => {
        let subtypes = $crate::common::pdf_assertions::annotation_subtypes(&$doc, $page);
        let found = subtypes.iter().filter(|s| s.as_str() == $subtype).count();
        assert_eq!(
            found, $count,
            "Expected {} '{}' annotations on page {}, found subtypes {:?}",
            $count, $subtype, $page, subtypes
        );
    };
}

/// Assert the outline titles, in order
#[macro_export]
macro_rules! assert_outline_titles {
    ($doc:expr, $titles:expr) => {
        let entries = $crate::common::pdf_assertions::outline_entries(&$doc);
        let titles: Vec<&str> = entries.iter().map(|(t, _)| t.as_str()).collect();
        let expected: Vec<&str> = $titles.to_vec();
        assert_eq!(titles, expected, "Unexpected outline titles");
    };
}
