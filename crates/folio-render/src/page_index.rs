//! Page index for combined views.
//!
//! A [`PageIndex`] flattens the page DAG below a root into an ordered list and
//! numbers each page by first encounter. Combined views use those numbers to
//! build document-unique anchors (`page3`, `page3-intro`).
//!
//! # Anchor naming
//!
//! Every consumer (link resolution, tree rendering and the combined view
//! itself) goes through [`ref_id`] so that the same `(index, id)` pair always
//! produces the same anchor.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use folio_model::{CaptureError, CaptureLevel, ContentSource, Page, PageRef};

/// Ordered, numbered view of the pages reachable from a root.
#[derive(Debug)]
pub struct PageIndex {
    root: Arc<Page>,
    pages: Vec<Arc<Page>>,
    positions: HashMap<PageRef, usize>,
}

impl PageIndex {
    /// Capture `root` and every page reachable through accessible books.
    ///
    /// The root is captured at [`CaptureLevel::Meta`] and descendants at
    /// [`CaptureLevel::Page`]. Pages are listed in pre-order following the
    /// declared child order; a page reached again through another parent
    /// keeps its first index and is not walked a second time.
    pub fn build(source: &dyn ContentSource, root: &PageRef) -> Result<Self, CaptureError> {
        let root_page = source.capture(root, CaptureLevel::Meta)?;

        let mut pages = vec![Arc::clone(&root_page)];
        let mut visited: HashSet<PageRef> = HashSet::from([root.clone()]);
        let mut stack: Vec<PageRef> = root_page.child_refs().iter().rev().cloned().collect();

        while let Some(page_ref) = stack.pop() {
            if visited.contains(&page_ref) {
                continue;
            }
            if !source.is_accessible(&page_ref.book) {
                tracing::trace!(page = %page_ref, "Skipping page in inaccessible book");
                continue;
            }
            let page = source.capture(&page_ref, CaptureLevel::Page)?;
            stack.extend(page.child_refs().iter().rev().cloned());
            visited.insert(page_ref);
            pages.push(page);
        }

        let positions = pages
            .iter()
            .enumerate()
            .map(|(index, page)| (page.page_ref().clone(), index))
            .collect();

        tracing::debug!(root = %root, pages = pages.len(), "Built page index");

        Ok(Self {
            root: root_page,
            pages,
            positions,
        })
    }

    /// The root page, captured at meta level.
    #[must_use]
    pub fn root_page(&self) -> &Arc<Page> {
        &self.root
    }

    /// Indexed pages in index order; the root comes first.
    #[must_use]
    pub fn pages(&self) -> &[Arc<Page>] {
        &self.pages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// 0-based index of a page, if it is part of this index.
    #[must_use]
    pub fn index_of(&self, page_ref: &PageRef) -> Option<usize> {
        self.positions.get(page_ref).copied()
    }
}

/// Anchor for `id` on the page at `index`.
///
/// With an index the anchor is `page{index+1}`, suffixed with `-{id}` when
/// `id` is non-empty. Without an index, `id` is returned unchanged.
///
/// ```
/// use folio_render::ref_id;
///
/// assert_eq!(ref_id(Some(0), ""), "page1");
/// assert_eq!(ref_id(Some(2), "foo"), "page3-foo");
/// assert_eq!(ref_id(None, "foo"), "foo");
/// ```
#[must_use]
pub fn ref_id(index: Option<usize>, id: &str) -> String {
    match index {
        Some(index) if id.is_empty() => format!("page{}", index + 1),
        Some(index) => format!("page{}-{id}", index + 1),
        None => id.to_owned(),
    }
}

/// Anchor for `id` on `page`, looked up in an optional active index.
#[must_use]
pub fn ref_id_in_page(index: Option<&PageIndex>, page: &PageRef, id: &str) -> String {
    ref_id(index.and_then(|index| index.index_of(page)), id)
}
