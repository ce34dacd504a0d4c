//! Reading and replacing the document outline (bookmarks).

use crate::error::ComposerError;
use crate::text_string;
use findtext_types::{Destination, TocEntry};
use log::{debug, info, warn};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::{HashMap, HashSet};

/// Replaces the document outline with `entries`.
///
/// Entries are a flat list in display order whose `level` fields describe the
/// nesting: the first entry must be level 1 and no entry may be more than one
/// level deeper than its predecessor. An empty list removes the outline.
/// Returns the number of outline items written.
pub fn set_toc(doc: &mut Document, entries: &[TocEntry]) -> Result<usize, ComposerError> {
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    validate(entries, page_ids.len())?;

    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    let removed = remove_outline(doc, root_id)?;
    if removed > 0 {
        debug!("Removed {} existing outline items", removed);
    }

    if entries.is_empty() {
        let catalog = doc.get_object_mut(root_id)?.as_dict_mut()?;
        if catalog.get(b"PageMode").and_then(Object::as_name).ok() == Some(b"UseOutlines".as_slice()) {
            catalog.remove(b"PageMode");
        }
        return Ok(0);
    }

    struct FlatOutlineItem {
        id: ObjectId,
        parent_idx: Option<usize>,
        dict: Dictionary,
    }
    struct NodeOutlineItem {
        id: ObjectId,
        children: Vec<NodeOutlineItem>,
        dict: Dictionary,
    }

    let mut flat_list = Vec::with_capacity(entries.len());
    let mut level_stack: Vec<(u8, usize)> = Vec::new();
    for entry in entries {
        while level_stack.last().is_some_and(|(level, _)| *level >= entry.level) {
            level_stack.pop();
        }
        let parent_idx = level_stack.last().map(|(_, idx)| *idx);
        let page_id = page_ids[entry.destination.page_index as usize];
        let dest = vec![
            Object::Reference(page_id),
            "XYZ".into(),
            entry.destination.left.into(),
            entry.destination.top.into(),
            0.into(),
        ];
        let dict = dictionary! {
            "Title" => text_string::encode(&entry.title),
            "Dest" => dest,
        };
        let new_idx = flat_list.len();
        flat_list.push(FlatOutlineItem {
            id: doc.new_object_id(),
            parent_idx,
            dict,
        });
        level_stack.push((entry.level, new_idx));
    }

    let mut children_map: HashMap<usize, Vec<NodeOutlineItem>> = HashMap::new();
    let mut root_items = Vec::new();
    for (i, flat_node) in flat_list.into_iter().enumerate().rev() {
        let mut children = children_map.remove(&i).unwrap_or_default();
        children.reverse();
        let node = NodeOutlineItem {
            id: flat_node.id,
            children,
            dict: flat_node.dict,
        };
        match flat_node.parent_idx {
            Some(parent_idx) => children_map.entry(parent_idx).or_default().push(node),
            None => root_items.push(node),
        }
    }
    root_items.reverse();

    let (Some(first), Some(last)) = (root_items.first(), root_items.last()) else {
        return Ok(0);
    };
    let outline_root_id = doc.add_object(dictionary! {
        "Type" => "Outlines",
        "First" => Object::Reference(first.id),
        "Last" => Object::Reference(last.id),
        "Count" => root_items.len() as i64,
    });

    fn add_outline_level(items: &[NodeOutlineItem], parent_id: ObjectId, doc: &mut Document) {
        for (i, item) in items.iter().enumerate() {
            let mut dict = item.dict.clone();
            dict.set("Parent", Object::Reference(parent_id));
            if i > 0 {
                dict.set("Prev", Object::Reference(items[i - 1].id));
            }
            if let Some(next) = items.get(i + 1) {
                dict.set("Next", Object::Reference(next.id));
            }
            if let (Some(first), Some(last)) = (item.children.first(), item.children.last()) {
                dict.set("First", Object::Reference(first.id));
                dict.set("Last", Object::Reference(last.id));
                dict.set("Count", -(item.children.len() as i64));
                add_outline_level(&item.children, item.id, doc);
            }
            doc.objects.insert(item.id, dict.into());
        }
    }
    add_outline_level(&root_items, outline_root_id, doc);

    let catalog = doc.get_object_mut(root_id)?.as_dict_mut()?;
    catalog.set("Outlines", outline_root_id);
    catalog.set("PageMode", "UseOutlines");
    info!("Installed outline with {} entries", entries.len());
    Ok(entries.len())
}

fn validate(entries: &[TocEntry], page_count: usize) -> Result<(), ComposerError> {
    let mut previous_level = 0u8;
    for (i, entry) in entries.iter().enumerate() {
        if entry.level == 0 || (i == 0 && entry.level != 1) {
            return Err(ComposerError::InvalidToc(format!(
                "entry {} ('{}') has level {}; the first entry must be level 1",
                i + 1,
                entry.title,
                entry.level
            )));
        }
        if entry.level > previous_level.saturating_add(1) {
            return Err(ComposerError::InvalidToc(format!(
                "entry {} ('{}') jumps from level {} to {}",
                i + 1,
                entry.title,
                previous_level,
                entry.level
            )));
        }
        if entry.page == 0 || entry.page as usize > page_count {
            return Err(ComposerError::InvalidToc(format!(
                "entry {} ('{}') points to page {} of a {}-page document",
                i + 1,
                entry.title,
                entry.page,
                page_count
            )));
        }
        if entry.destination.page_index.checked_add(1) != Some(entry.page) {
            return Err(ComposerError::InvalidToc(format!(
                "entry {} ('{}') has page {} but its destination is page index {}",
                i + 1,
                entry.title,
                entry.page,
                entry.destination.page_index
            )));
        }
        previous_level = entry.level;
    }
    Ok(())
}

/// Deletes every outline item reachable from the catalog's `/Outlines` and
/// the outline root itself. Returns the number of items removed.
fn remove_outline(doc: &mut Document, root_id: ObjectId) -> Result<usize, ComposerError> {
    let catalog = doc.get_object_mut(root_id)?.as_dict_mut()?;
    let Some(outlines) = catalog.remove(b"Outlines") else {
        return Ok(0);
    };
    let Ok(outline_root_id) = outlines.as_reference() else {
        return Ok(0);
    };

    let mut item_ids = Vec::new();
    let mut visited = HashSet::new();
    if let Ok(root) = doc.get_dictionary(outline_root_id) {
        collect_items(doc, root, &mut item_ids, &mut visited);
    }
    for id in &item_ids {
        doc.objects.remove(id);
    }
    doc.objects.remove(&outline_root_id);
    Ok(item_ids.len())
}

fn collect_items(doc: &Document, parent: &Dictionary, out: &mut Vec<ObjectId>, visited: &mut HashSet<ObjectId>) {
    let mut next = parent.get(b"First").and_then(Object::as_reference).ok();
    while let Some(id) = next {
        if !visited.insert(id) {
            warn!("Outline item {:?} is linked more than once; stopping walk", id);
            break;
        }
        out.push(id);
        let Ok(item) = doc.get_dictionary(id) else {
            break;
        };
        collect_items(doc, item, out, visited);
        next = item.get(b"Next").and_then(Object::as_reference).ok();
    }
}

/// Reads the document outline back as a flat list of entries in display order.
pub fn get_toc(doc: &Document) -> Result<Vec<TocEntry>, ComposerError> {
    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    let catalog = doc.get_dictionary(root_id)?;
    let Some(outline_root) = catalog
        .get(b"Outlines")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .ok()
    else {
        return Ok(Vec::new());
    };

    let page_numbers: HashMap<ObjectId, u32> = doc.get_pages().into_iter().map(|(n, id)| (id, n)).collect();
    let mut entries = Vec::new();
    let mut visited = HashSet::new();
    read_level(doc, outline_root, 1, &page_numbers, &mut entries, &mut visited);
    Ok(entries)
}

fn read_level(
    doc: &Document,
    parent: &Dictionary,
    level: u8,
    page_numbers: &HashMap<ObjectId, u32>,
    entries: &mut Vec<TocEntry>,
    visited: &mut HashSet<ObjectId>,
) {
    let mut next = parent.get(b"First").and_then(Object::as_reference).ok();
    while let Some(id) = next {
        if !visited.insert(id) {
            break;
        }
        let Ok(item) = doc.get_dictionary(id) else {
            break;
        };
        let title = match item.get(b"Title") {
            Ok(Object::String(bytes, _)) => text_string::decode(bytes),
            _ => String::new(),
        };
        let (page, destination) = read_destination(doc, item, page_numbers).unwrap_or_default();
        entries.push(TocEntry {
            level,
            title,
            page,
            destination,
        });
        read_level(doc, item, level.saturating_add(1), page_numbers, entries, visited);
        next = item.get(b"Next").and_then(Object::as_reference).ok();
    }
}

/// Resolves `/Dest` (or a `/GoTo` action's `/D`) to a 1-based page number and
/// scroll position. Named destinations are not followed.
fn read_destination(
    doc: &Document,
    item: &Dictionary,
    page_numbers: &HashMap<ObjectId, u32>,
) -> Option<(u32, Destination)> {
    let dest = match item.get(b"Dest") {
        Ok(dest) => dest,
        Err(_) => item
            .get(b"A")
            .and_then(|a| match a {
                Object::Reference(id) => doc.get_dictionary(*id),
                other => other.as_dict(),
            })
            .and_then(|action| action.get(b"D"))
            .ok()?,
    };
    let dest = match dest {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let parts = dest.as_array().ok()?;
    let page = *page_numbers.get(&parts.first()?.as_reference().ok()?)?;
    let number_at = |i: usize| parts.get(i).and_then(|o| o.as_float().ok());
    let (left, top) = match parts.get(1).and_then(|o| o.as_name().ok()) {
        Some(b"XYZ") => (number_at(2).unwrap_or(0.0), number_at(3).unwrap_or(0.0)),
        Some(b"FitH") | Some(b"FitBH") => (0.0, number_at(2).unwrap_or(0.0)),
        _ => (0.0, 0.0),
    };
    Some((
        page,
        Destination {
            page_index: page - 1,
            left,
            top,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::create_dummy_pdf;

    fn entry(level: u8, title: &str, page: u32, top: f32) -> TocEntry {
        TocEntry {
            level,
            ..TocEntry::top_level(title, page, top)
        }
    }

    fn catalog(doc: &Document) -> &Dictionary {
        let root_id = doc.trailer.get(b"Root").and_then(Object::as_reference).expect("root");
        doc.get_dictionary(root_id).expect("catalog")
    }

    #[test]
    fn flat_toc_round_trips() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut doc = create_dummy_pdf(3);
        let entries = vec![
            TocEntry::top_level("Alpha", 1, 712.0),
            TocEntry::top_level("Alpha", 3, 500.5),
            TocEntry::top_level("Beta", 2, 100.0),
        ];
        assert_eq!(set_toc(&mut doc, &entries).expect("set_toc"), 3);
        assert_eq!(get_toc(&doc).expect("get_toc"), entries);
        assert_eq!(
            catalog(&doc).get(b"PageMode").and_then(Object::as_name).ok(),
            Some(b"UseOutlines".as_slice())
        );
    }

    #[test]
    fn nested_levels_build_a_tree() {
        let mut doc = create_dummy_pdf(2);
        let entries = vec![
            entry(1, "Chapter", 1, 700.0),
            entry(2, "Section", 1, 600.0),
            entry(3, "Detail", 2, 500.0),
            entry(1, "Appendix", 2, 400.0),
        ];
        set_toc(&mut doc, &entries).expect("set_toc");
        assert_eq!(get_toc(&doc).expect("get_toc"), entries);

        let outlines_id = catalog(&doc).get(b"Outlines").and_then(Object::as_reference).expect("outlines");
        let root = doc.get_dictionary(outlines_id).expect("outline root");
        assert_eq!(root.get(b"Count").and_then(Object::as_i64).ok(), Some(2));
    }

    #[test]
    fn replacing_removes_previous_items() {
        let mut doc = create_dummy_pdf(1);
        set_toc(&mut doc, &[TocEntry::top_level("Old", 1, 10.0)]).expect("first");
        let objects_after_first = doc.objects.len();

        set_toc(&mut doc, &[TocEntry::top_level("New", 1, 20.0)]).expect("second");
        assert_eq!(doc.objects.len(), objects_after_first);
        let toc = get_toc(&doc).expect("get_toc");
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].title, "New");
    }

    #[test]
    fn empty_toc_removes_outline() {
        let mut doc = create_dummy_pdf(1);
        set_toc(&mut doc, &[TocEntry::top_level("Only", 1, 10.0)]).expect("set");
        assert_eq!(set_toc(&mut doc, &[]).expect("clear"), 0);
        assert!(!catalog(&doc).has(b"Outlines"));
        assert!(!catalog(&doc).has(b"PageMode"));
        assert!(get_toc(&doc).expect("get_toc").is_empty());
    }

    #[test]
    fn invalid_tocs_are_rejected() {
        let mut doc = create_dummy_pdf(2);
        let cases = vec![
            vec![entry(2, "Deep start", 1, 0.0)],
            vec![entry(1, "A", 1, 0.0), entry(3, "Jump", 1, 0.0)],
            vec![TocEntry::top_level("Past the end", 3, 0.0)],
            vec![TocEntry::top_level("Page zero", 0, 0.0)],
        ];
        for entries in cases {
            let result = set_toc(&mut doc, &entries);
            assert!(matches!(result, Err(ComposerError::InvalidToc(_))), "{:?}", entries);
        }
    }

    #[test]
    fn unicode_titles_survive() {
        let mut doc = create_dummy_pdf(1);
        let entries = vec![TocEntry::top_level("Straße Δ", 1, 42.0)];
        set_toc(&mut doc, &entries).expect("set_toc");
        assert_eq!(get_toc(&doc).expect("get_toc")[0].title, "Straße Δ");
    }
}
