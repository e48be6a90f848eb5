//! Trees of the pages and elements that lead to matching elements.

use std::sync::Arc;

use folio_model::{CaptureLevel, Element, ElementKind, Node, Page};

use super::{TreeItem, TreeOptions, TreeVisitor, discover_matches, node_href, render_tree};
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::html::escape_html;

/// Predicate over elements.
pub trait ElementFilter {
    fn matches(&self, element: &Element) -> bool;
}

impl<F> ElementFilter for F
where
    F: Fn(&Element) -> bool,
{
    fn matches(&self, element: &Element) -> bool {
        self(element)
    }
}

/// Matches visible elements of a kind or any of its sub-kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindFilter {
    kind: ElementKind,
}

impl KindFilter {
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }
}

impl ElementFilter for KindFilter {
    fn matches(&self, element: &Element) -> bool {
        !element.is_hidden() && element.kind().is_a(self.kind)
    }
}

/// Tree of every branch below `root` containing an element accepted by the
/// filter.
///
/// The root is always rendered, even when nothing matches.
#[derive(Clone, Debug)]
pub struct ElementFilterTree<F> {
    root: Arc<Page>,
    filter: F,
    include_elements: bool,
}

impl<F: ElementFilter> ElementFilterTree<F> {
    #[must_use]
    pub fn new(root: Arc<Page>, filter: F) -> Self {
        Self {
            root,
            filter,
            include_elements: false,
        }
    }

    #[must_use]
    pub fn include_elements(mut self, include_elements: bool) -> Self {
        self.include_elements = include_elements;
        self
    }

    /// Write the filtered tree as nested `<ul>` lists.
    pub fn write_html(&self, ctx: &mut RenderContext<'_>, out: &mut String) -> Result<(), RenderError> {
        if ctx.level() < CaptureLevel::Meta {
            return Ok(());
        }
        let root = Node::Page(Arc::clone(&self.root));
        let matches = discover_matches(ctx, &root, self.include_elements, |node: &Node| {
            node.element().is_some_and(|element| self.filter.matches(element))
        })?;
        let options = TreeOptions {
            include_elements: self.include_elements,
            child_level: CaptureLevel::Meta,
            ..TreeOptions::default()
        };
        render_tree(ctx, &root, &options, Some(&matches), &mut FilterHtml { out })
    }
}

struct FilterHtml<'o> {
    out: &'o mut String,
}

impl TreeVisitor for FilterHtml<'_> {
    fn start_list(&mut self, depth: usize) {
        if depth > 1 {
            self.out.push('\n');
        }
        self.out.push_str("<ul>\n");
    }

    fn start_item(&mut self, ctx: &RenderContext<'_>, item: &TreeItem<'_>) -> Result<(), RenderError> {
        let node = item.node;
        self.out.push_str("<li");
        if let Some(class) = ctx.css().list_item_class(node) {
            self.out.push_str(" class=\"");
            self.out.push_str(&escape_html(&class));
            self.out.push('"');
        }
        self.out.push_str("><a href=\"");
        self.out.push_str(&escape_html(&node_href(ctx, node)));
        self.out.push_str("\">");
        self.out.push_str(&escape_html(node.label()));
        if let Some(index) = item.index {
            self.out.push_str("<sup>[");
            self.out.push_str(&(index + 1).to_string());
            self.out.push_str("]</sup>");
        }
        self.out.push_str("</a>");
        Ok(())
    }

    fn end_item(&mut self, _item: &TreeItem<'_>) {
        self.out.push_str("</li>\n");
    }

    fn end_list(&mut self, _depth: usize) {
        self.out.push_str("</ul>\n");
    }
}
