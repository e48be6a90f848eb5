//! Request-scoped render context.
//!
//! A [`RenderContext`] carries everything a single render request needs: the
//! capture collaborator, the read-only start-up configuration, the capture
//! level decided for the response, and the mutable per-request state (current
//! page, active page index, page links recorded per node).
//!
//! Contexts are never shared between requests. Traversals take them by
//! `&mut` so the per-request state has exactly one writer.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use folio_model::{CaptureLevel, ContentSource, NodeKey, Page, PageRef};

use crate::css::CssClasses;
use crate::page_index::PageIndex;
use crate::view::ViewRegistry;

/// State of one render request.
pub struct RenderContext<'a> {
    source: &'a dyn ContentSource,
    views: &'a ViewRegistry,
    css: &'a CssClasses,
    level: CaptureLevel,
    context_path: String,
    current_page: Option<Arc<Page>>,
    page_index: Option<Arc<PageIndex>>,
    current_node: Option<NodeKey>,
    recorded_links: HashMap<NodeKey, Vec<PageRef>>,
    recorded_set: HashSet<(NodeKey, PageRef)>,
}

impl<'a> RenderContext<'a> {
    /// Create a context rendering at [`CaptureLevel::Body`] with an empty
    /// context path and no current page.
    #[must_use]
    pub fn new(source: &'a dyn ContentSource, views: &'a ViewRegistry, css: &'a CssClasses) -> Self {
        Self {
            source,
            views,
            css,
            level: CaptureLevel::Body,
            context_path: String::new(),
            current_page: None,
            page_index: None,
            current_node: None,
            recorded_links: HashMap::new(),
            recorded_set: HashSet::new(),
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: CaptureLevel) -> Self {
        self.level = level;
        self
    }

    /// URL prefix for cross-document hrefs (`""` or `/app`).
    #[must_use]
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = context_path.into();
        self
    }

    /// Set the page being rendered; it also becomes the current node.
    #[must_use]
    pub fn with_current_page(mut self, page: Arc<Page>) -> Self {
        self.set_current_page(Some(page));
        self
    }

    #[must_use]
    pub fn with_page_index(mut self, index: Arc<PageIndex>) -> Self {
        self.page_index = Some(index);
        self
    }

    pub fn source(&self) -> &'a dyn ContentSource {
        self.source
    }

    pub fn views(&self) -> &'a ViewRegistry {
        self.views
    }

    pub fn css(&self) -> &'a CssClasses {
        self.css
    }

    pub fn level(&self) -> CaptureLevel {
        self.level
    }

    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    pub fn current_page(&self) -> Option<&Arc<Page>> {
        self.current_page.as_ref()
    }

    /// Replace the current page and make it the current node.
    ///
    /// Returns the previous page so nested renders can restore it.
    pub fn set_current_page(&mut self, page: Option<Arc<Page>>) -> Option<Arc<Page>> {
        self.current_node = page.as_ref().map(|p| NodeKey::Page(p.page_ref().clone()));
        std::mem::replace(&mut self.current_page, page)
    }

    pub fn page_index(&self) -> Option<&Arc<PageIndex>> {
        self.page_index.as_ref()
    }

    /// Activate (or clear) the page index consulted for same-document hrefs.
    pub fn set_page_index(&mut self, index: Option<Arc<PageIndex>>) -> Option<Arc<PageIndex>> {
        std::mem::replace(&mut self.page_index, index)
    }

    /// Index of a page in the active page index.
    pub fn index_of(&self, page_ref: &PageRef) -> Option<usize> {
        self.page_index.as_ref().and_then(|index| index.index_of(page_ref))
    }

    pub fn current_node(&self) -> Option<&NodeKey> {
        self.current_node.as_ref()
    }

    /// Node whose rendered content is being produced; page links are
    /// recorded against it.
    pub fn set_current_node(&mut self, node: Option<NodeKey>) -> Option<NodeKey> {
        std::mem::replace(&mut self.current_node, node)
    }

    /// Record that the current node links to `page_ref`.
    ///
    /// Without a current node nothing is recorded.
    pub fn record_page_link(&mut self, page_ref: &PageRef) {
        let Some(node) = &self.current_node else {
            return;
        };
        if self.recorded_set.insert((node.clone(), page_ref.clone())) {
            self.recorded_links.entry(node.clone()).or_default().push(page_ref.clone());
        }
    }

    /// Page links recorded on the current node, in first-recorded order.
    pub fn recorded_links(&self) -> &[PageRef] {
        match &self.current_node {
            Some(node) => self.links_recorded_on(node),
            None => &[],
        }
    }

    /// Page links recorded on `node`, in first-recorded order.
    pub fn links_recorded_on(&self, node: &NodeKey) -> &[PageRef] {
        self.recorded_links.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Drain the page links recorded on `node`.
    pub fn take_recorded_links(&mut self, node: &NodeKey) -> Vec<PageRef> {
        self.recorded_set.retain(|(key, _)| key != node);
        self.recorded_links.remove(node).unwrap_or_default()
    }
}
