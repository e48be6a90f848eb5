//! Tagged view over pages and elements.

use std::sync::Arc;

use crate::element::{Element, ElementKind};
use crate::page::Page;
use crate::page_ref::PageRef;

/// A traversable node: a whole page or one element of a page.
///
/// Elements are addressed by their arena index in the owning page.
#[derive(Clone, Debug)]
pub enum Node {
    Page(Arc<Page>),
    Element(Arc<Page>, usize),
}

/// Stable identity of a [`Node`], independent of capture level.
///
/// Two captures of the same page yield equal keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    Page(PageRef),
    Element(PageRef, String),
}

impl NodeKey {
    #[must_use]
    pub fn page_ref(&self) -> &PageRef {
        match self {
            Self::Page(page_ref) | Self::Element(page_ref, _) => page_ref,
        }
    }
}

impl Node {
    /// Page owning this node (the node itself for pages).
    #[must_use]
    pub fn page(&self) -> &Arc<Page> {
        match self {
            Self::Page(page) | Self::Element(page, _) => page,
        }
    }

    #[must_use]
    pub fn page_ref(&self) -> &PageRef {
        self.page().page_ref()
    }

    /// The element, for element nodes.
    #[must_use]
    pub fn element(&self) -> Option<&Element> {
        match self {
            Self::Page(_) => None,
            Self::Element(page, index) => page.element(*index),
        }
    }

    #[must_use]
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page(_))
    }

    #[must_use]
    pub fn element_kind(&self) -> Option<ElementKind> {
        self.element().map(Element::kind)
    }

    #[must_use]
    pub fn element_id(&self) -> Option<&str> {
        self.element().map(Element::id)
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.element().is_some_and(Element::is_hidden)
    }

    #[must_use]
    pub fn key(&self) -> NodeKey {
        match self.element() {
            None => NodeKey::Page(self.page_ref().clone()),
            Some(element) => NodeKey::Element(self.page_ref().clone(), element.id().to_owned()),
        }
    }

    /// Page title or element label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Page(page) => page.title(),
            Self::Element(..) => self.element().map_or("", Element::label),
        }
    }

    /// Page links declared directly on this node.
    #[must_use]
    pub fn links(&self) -> &[PageRef] {
        match self {
            Self::Page(page) => page.links(),
            Self::Element(..) => self.element().map_or(&[][..], Element::links),
        }
    }

    /// Directly nested elements, hidden ones included, in document order.
    #[must_use]
    pub fn child_elements(&self) -> Vec<Node> {
        let indices = match self {
            Self::Page(page) => page.top_level_elements(),
            Self::Element(..) => self.element().map_or(&[][..], Element::children),
        };
        let page = self.page();
        indices
            .iter()
            .map(|&index| Self::Element(Arc::clone(page), index))
            .collect()
    }
}
