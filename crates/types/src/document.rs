/// Where an outline entry jumps to: a page and a point on it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Destination {
    /// 0-based index of the target page.
    pub page_index: u32,
    /// Horizontal scroll position in user space.
    pub left: f32,
    /// Vertical scroll position in user space (the top edge of the view).
    pub top: f32,
}

/// An entry in the document outline (table of contents).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TocEntry {
    /// Nesting level, 1 for top-level entries.
    pub level: u8,
    /// The visible bookmark text.
    pub title: String,
    /// 1-based page number the entry refers to.
    pub page: u32,
    pub destination: Destination,
}

impl TocEntry {
    /// A top-level entry pointing at `top` on the given 1-based page.
    pub fn top_level(title: impl Into<String>, page: u32, top: f32) -> Self {
        Self {
            level: 1,
            title: title.into(),
            page,
            destination: Destination {
                page_index: page.saturating_sub(1),
                left: 0.0,
                top,
            },
        }
    }
}
