//! The page loop: search, mark, collect outline entries, commit, save.

use crate::config::Settings;
use crate::document::{MarkupDocument, PdfDocument};
use crate::error::FindTextError;
use crate::terms::load_terms;
use crate::validate::validate;
use findtext_types::TocEntry;
use log::{debug, info};
use std::io::{self, Write};

/// Counts gathered over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub pages: usize,
    pub matches: usize,
    pub toc_entries: usize,
}

/// Runs the whole pipeline for `settings`, printing progress to stdout.
pub fn run(settings: &Settings) -> Result<ProcessReport, FindTextError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(settings, &mut out)
}

/// Like [`run`], with progress lines written to `out`.
pub fn run_with_output<W: Write>(settings: &Settings, out: &mut W) -> Result<ProcessReport, FindTextError> {
    validate(settings)?;
    let terms = load_terms(&settings.search_terms_path)?;
    let mut doc = PdfDocument::open(&settings.input_path)?;
    let report = process_document(&mut doc, &terms, settings, out)?;
    doc.save(&settings.output_path)?;
    info!(
        "Done: {} pages, {} matches, {} outline entries",
        report.pages, report.matches, report.toc_entries
    );
    Ok(report)
}

/// Marks every match of every term and replaces the outline with one entry
/// per match, sorted by term. Does not save.
pub fn process_document<D, W>(
    doc: &mut D,
    terms: &[String],
    settings: &Settings,
    out: &mut W,
) -> Result<ProcessReport, FindTextError>
where
    D: MarkupDocument,
    W: Write,
{
    let mut toc = Vec::new();
    let mut report = ProcessReport {
        pages: doc.page_count(),
        ..ProcessReport::default()
    };

    for page_index in 0..doc.page_count() {
        let page_number = page_index + 1;
        if !settings.quiet {
            writeln!(out, "\nPDF Page: {}", page_number)?;
        }
        let matches = doc.search_page(page_index, terms)?;
        for (term, rects) in terms.iter().zip(matches) {
            if rects.is_empty() {
                continue;
            }
            for rect in &rects {
                doc.annotate(page_index, *rect, settings.emphasis)?;
                toc.push(TocEntry::top_level(term.as_str(), page_number as u32, rect.top));
            }
            debug!("Page {}: {} matches for '{}'", page_number, rects.len(), term);
            report.matches += rects.len();
            if !settings.quiet {
                writeln!(out, "Processed {} search term matches for: {}", rects.len(), term)?;
            }
        }
    }

    sort_toc(&mut toc);
    doc.set_toc(&toc)?;
    report.toc_entries = toc.len();
    Ok(report)
}

/// Orders entries by title; entries with equal titles keep their relative order.
pub fn sort_toc(entries: &mut [TocEntry]) {
    entries.sort_by(|a, b| a.title.cmp(&b.title));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmphasisMode;
    use crate::document::tests::text_pdf;
    use findtext_types::Rect;
    use std::collections::HashMap;
    use std::path::Path;

    /// An in-memory document whose pages are lists of `(term, rects)` hits.
    #[derive(Default)]
    struct FakeDocument {
        pages: Vec<HashMap<String, Vec<Rect>>>,
        annotations: Vec<(usize, Rect, EmphasisMode)>,
        toc: Option<Vec<TocEntry>>,
    }

    impl MarkupDocument for FakeDocument {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn search_page(&self, page_index: usize, terms: &[String]) -> Result<Vec<Vec<Rect>>, FindTextError> {
            let page = &self.pages[page_index];
            Ok(terms.iter().map(|t| page.get(t).cloned().unwrap_or_default()).collect())
        }

        fn annotate(&mut self, page_index: usize, rect: Rect, emphasis: EmphasisMode) -> Result<(), FindTextError> {
            self.annotations.push((page_index, rect, emphasis));
            Ok(())
        }

        fn set_toc(&mut self, entries: &[TocEntry]) -> Result<(), FindTextError> {
            self.toc = Some(entries.to_vec());
            Ok(())
        }

        fn save(&mut self, _path: &Path) -> Result<(), FindTextError> {
            Ok(())
        }
    }

    fn rect_at(top: f32) -> Rect {
        Rect::new(72.0, top - 10.0, 120.0, top)
    }

    fn settings() -> Settings {
        Settings::new("in.pdf", "terms.json", "out.pdf")
    }

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn toc_is_sorted_by_title_and_stable() -> Result<(), FindTextError> {
        let mut doc = FakeDocument::default();
        doc.pages.push(HashMap::from([
            ("Beta".to_string(), vec![rect_at(700.0)]),
            ("Alpha".to_string(), vec![rect_at(650.0), rect_at(600.0)]),
        ]));
        doc.pages.push(HashMap::from([("Alpha".to_string(), vec![rect_at(500.0)])]));

        let mut out = Vec::new();
        let report = process_document(&mut doc, &terms(&["Beta", "Alpha"]), &settings(), &mut out)?;
        assert_eq!(report, ProcessReport { pages: 2, matches: 4, toc_entries: 4 });

        let toc = doc.toc.unwrap_or_default();
        let summary: Vec<(&str, u32, f32)> = toc.iter().map(|e| (e.title.as_str(), e.page, e.destination.top)).collect();
        assert_eq!(
            summary,
            vec![("Alpha", 1, 650.0), ("Alpha", 1, 600.0), ("Alpha", 2, 500.0), ("Beta", 1, 700.0)]
        );
        assert!(toc.iter().all(|e| e.level == 1 && e.destination.page_index + 1 == e.page));
        Ok(())
    }

    #[test]
    fn progress_lines_follow_term_order() -> Result<(), FindTextError> {
        let mut doc = FakeDocument::default();
        doc.pages.push(HashMap::from([
            ("Alpha".to_string(), vec![rect_at(700.0), rect_at(680.0)]),
            ("Beta".to_string(), vec![rect_at(660.0)]),
        ]));
        doc.pages.push(HashMap::new());

        let mut out = Vec::new();
        process_document(&mut doc, &terms(&["Beta", "Gamma", "Alpha"]), &settings(), &mut out)?;
        let printed = String::from_utf8_lossy(&out);
        assert_eq!(
            printed,
            "\nPDF Page: 1\n\
             Processed 1 search term matches for: Beta\n\
             Processed 2 search term matches for: Alpha\n\
             \nPDF Page: 2\n"
        );
        Ok(())
    }

    #[test]
    fn quiet_mode_prints_nothing() -> Result<(), FindTextError> {
        let mut doc = FakeDocument::default();
        doc.pages.push(HashMap::from([("Alpha".to_string(), vec![rect_at(700.0)])]));
        let mut out = Vec::new();
        process_document(&mut doc, &terms(&["Alpha"]), &settings().with_quiet(true), &mut out)?;
        assert!(out.is_empty());
        assert_eq!(doc.annotations.len(), 1);
        Ok(())
    }

    #[test]
    fn emphasis_is_passed_to_every_annotation() -> Result<(), FindTextError> {
        let mut doc = FakeDocument::default();
        doc.pages.push(HashMap::from([("Alpha".to_string(), vec![rect_at(700.0), rect_at(600.0)])]));
        let settings = settings().with_emphasis(EmphasisMode::Highlight).with_quiet(true);
        process_document(&mut doc, &terms(&["Alpha"]), &settings, &mut Vec::new())?;
        assert_eq!(doc.annotations.len(), 2);
        assert!(doc.annotations.iter().all(|(page, _, mode)| *page == 0 && *mode == EmphasisMode::Highlight));
        Ok(())
    }

    #[test]
    fn no_matches_installs_empty_outline() -> Result<(), FindTextError> {
        let mut doc = FakeDocument::default();
        doc.pages.push(HashMap::new());
        let report = process_document(&mut doc, &terms(&["Gamma", "Delta"]), &settings().with_quiet(true), &mut Vec::new())?;
        assert_eq!(report.matches, 0);
        assert_eq!(doc.toc, Some(Vec::new()));
        assert!(doc.annotations.is_empty());
        Ok(())
    }

    #[test]
    fn sort_toc_orders_bytewise() {
        let mut entries = vec![
            TocEntry::top_level("beta", 1, 0.0),
            TocEntry::top_level("Beta", 2, 0.0),
            TocEntry::top_level("Alpha", 3, 0.0),
        ];
        sort_toc(&mut entries);
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta", "beta"]);
    }

    #[test]
    fn invisible_zero_width_match_does_not_abort_the_run() -> Result<(), Box<dyn std::error::Error>> {
        use lopdf::content::{Content, Operation};
        use lopdf::{Object, Stream};

        let mut doc = text_pdf(&[&["placeholder"]]);
        let page_id = doc.get_pages().get(&1).copied().ok_or("page 1")?;
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("TL", vec![20.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal("Alpha")]),
                Operation::new("Tz", vec![0.into()]),
                Operation::new("T*", vec![]),
                Operation::new("Tj", vec![Object::string_literal("Alpha")]),
                Operation::new("ET", vec![]),
            ],
        }
        .encode()?;
        let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content));
        doc.get_object_mut(page_id)?.as_dict_mut()?.set("Contents", content_id);

        let dir = tempfile::tempdir()?;
        let input = dir.path().join("in.pdf");
        let terms_path = dir.path().join("terms.json");
        let output = dir.path().join("out.pdf");
        doc.save(&input)?;
        std::fs::write(&terms_path, r#"{"text_terms": ["Alpha"]}"#)?;

        let settings = Settings::new(&input, &terms_path, &output).with_quiet(true);
        let report = run_with_output(&settings, &mut Vec::new())?;
        assert_eq!(report.matches, 2);
        assert!(output.exists());
        Ok(())
    }

    #[test]
    fn real_document_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("in.pdf");
        let terms_path = dir.path().join("terms.json");
        let output = dir.path().join("out.pdf");
        text_pdf(&[&["Alpha Beta Alpha"]]).save(&input)?;
        std::fs::write(&terms_path, r#"{"text_terms": ["Alpha", "Gamma"]}"#)?;

        let settings = Settings::new(&input, &terms_path, &output).with_quiet(true);
        let report = run_with_output(&settings, &mut Vec::new())?;
        assert_eq!(report, ProcessReport { pages: 1, matches: 2, toc_entries: 2 });
        assert!(output.exists());

        let saved = PdfDocument::open(&output)?;
        let toc = findtext_composer::get_toc(saved.document())?;
        assert_eq!(toc.len(), 2);
        assert!(toc.iter().all(|e| e.title == "Alpha" && e.page == 1));
        Ok(())
    }
}
