//! Two-phase tree filtering.
//!
//! Navigation trees and element-filter trees share one algorithm:
//!
//! 1. [`discover_matches`] walks the graph post-order and collects every node
//!    whose subtree contains a predicate match into a [`MatchSet`].
//! 2. [`render_tree`] walks the graph pre-order from the root, keeps only
//!    children present in the match set, applies the depth limit and hands
//!    each node to a [`TreeVisitor`].
//!
//! Elements are first-class nodes only when `include_elements` is set;
//! otherwise an element match is attributed to the page that owns it.
//! Children in inaccessible books are never captured or visited.

mod element_filter;
mod navigation;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use folio_model::{CaptureLevel, Node, NodeKey, PageRef};

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::html::{encode_fragment, encode_path};
use crate::page_index::ref_id;

pub use element_filter::{ElementFilter, ElementFilterTree, KindFilter};
pub use navigation::{
    EXPANDED_CLASS, LINKS_TO_PAGE_CLASS, NO_LINK_TO_THIS_PAGE_CLASS, NavItem, NavigationTree, THIS_PAGE_CLASS, THIS_PAGE_ID,
};

/// Child nodes of `node`: visible child elements (when `include_elements`),
/// then child pages in accessible books captured at `level`.
pub fn child_nodes(
    ctx: &RenderContext<'_>,
    node: &Node,
    include_elements: bool,
    level: CaptureLevel,
) -> Result<Vec<Node>, RenderError> {
    let mut children = Vec::new();
    if include_elements {
        children.extend(node.child_elements().into_iter().filter(|child| !child.is_hidden()));
    }
    if let Node::Page(page) = node {
        let source = ctx.source();
        for child_ref in page.child_refs() {
            if source.is_accessible(&child_ref.book) {
                children.push(Node::Page(source.capture(child_ref, level)?));
            }
        }
    }
    Ok(children)
}

/// Nodes whose subtree contains at least one predicate match.
#[derive(Debug, Default, Clone)]
pub struct MatchSet {
    matched: HashSet<NodeKey>,
    direct: HashSet<NodeKey>,
}

impl MatchSet {
    /// Whether the node's subtree (itself included) has a match.
    #[must_use]
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.matched.contains(key)
    }

    /// Whether the node itself matched.
    ///
    /// When elements are not traversable, a match on any element of a page
    /// counts as a match of the page.
    #[must_use]
    pub fn is_direct(&self, key: &NodeKey) -> bool {
        self.direct.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matched.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.matched.iter()
    }
}

/// Phase 1: collect every node below `root` whose subtree has a match.
///
/// Pages are captured at [`CaptureLevel::Meta`]. A page reached through
/// several parents is evaluated once per call.
pub fn discover_matches<P>(
    ctx: &RenderContext<'_>,
    root: &Node,
    include_elements: bool,
    predicate: P,
) -> Result<MatchSet, RenderError>
where
    P: Fn(&Node) -> bool,
{
    let mut discovery = Discovery {
        ctx,
        include_elements,
        predicate,
        memo: HashMap::new(),
        result: MatchSet::default(),
    };
    discovery.visit(root)?;
    tracing::debug!(
        root = %root.page_ref(),
        matched = discovery.result.len(),
        visited = discovery.memo.len(),
        "Discovered tree matches"
    );
    Ok(discovery.result)
}

struct Discovery<'c, 'a, P> {
    ctx: &'c RenderContext<'a>,
    include_elements: bool,
    predicate: P,
    memo: HashMap<NodeKey, bool>,
    result: MatchSet,
}

impl<P: Fn(&Node) -> bool> Discovery<'_, '_, P> {
    fn visit(&mut self, node: &Node) -> Result<bool, RenderError> {
        let key = node.key();
        if let Some(&known) = self.memo.get(&key) {
            return Ok(known);
        }
        // Re-entry through a cycle sees no match.
        self.memo.insert(key.clone(), false);

        let mut direct = (self.predicate)(node);
        let mut has_match = direct;

        if self.include_elements {
            for child in node.child_elements() {
                if !child.is_hidden() && self.visit(&child)? {
                    has_match = true;
                }
            }
        } else if !direct {
            let page = node.page();
            direct = (0..page.elements().len())
                .any(|index| (self.predicate)(&Node::Element(Arc::clone(page), index)));
            has_match = direct;
        }

        if let Node::Page(page) = node {
            let source = self.ctx.source();
            for child_ref in page.child_refs() {
                if !source.is_accessible(&child_ref.book) {
                    continue;
                }
                let child_match = match self.memo.get(&NodeKey::Page(child_ref.clone())) {
                    Some(&known) => known,
                    None => {
                        let child = source.capture(child_ref, CaptureLevel::Meta)?;
                        self.visit(&Node::Page(child))?
                    }
                };
                if child_match {
                    has_match = true;
                }
            }
        }

        if direct {
            self.result.direct.insert(key.clone());
        }
        if has_match {
            self.result.matched.insert(key.clone());
        }
        self.memo.insert(key, has_match);
        Ok(has_match)
    }
}

/// Options for [`render_tree`].
#[derive(Clone, Debug)]
pub struct TreeOptions {
    /// Traverse elements as nodes.
    pub include_elements: bool,
    /// Deepest level whose children are fetched; `0` is unlimited.
    pub max_depth: usize,
    /// Render the root's filtered children as top-level items.
    pub skip_root: bool,
    /// Page to highlight; only its first page occurrence is highlighted.
    pub this_page: Option<PageRef>,
    /// Level at which child pages are captured.
    pub child_level: CaptureLevel,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            include_elements: false,
            max_depth: 0,
            skip_root: false,
            this_page: None,
            child_level: CaptureLevel::Page,
        }
    }
}

/// A node as presented to a [`TreeVisitor`].
#[derive(Debug)]
pub struct TreeItem<'n> {
    pub node: &'n Node,
    /// 1 for top-level items.
    pub depth: usize,
    /// Index of the node's page in the active page index.
    pub index: Option<usize>,
    /// Node is the "this page" page (any occurrence).
    pub this_page: bool,
    /// Node is the first occurrence of the "this page" page.
    pub highlighted: bool,
    /// Node itself matched the filter predicate.
    pub direct_match: bool,
}

/// Receives the pre-order walk of [`render_tree`].
///
/// Only invoked when rendering at [`CaptureLevel::Body`]. Lists are opened
/// only when they have at least one item.
pub trait TreeVisitor {
    fn start_list(&mut self, depth: usize);
    fn start_item(&mut self, ctx: &RenderContext<'_>, item: &TreeItem<'_>) -> Result<(), RenderError>;
    fn end_item(&mut self, item: &TreeItem<'_>);
    fn end_list(&mut self, depth: usize);
}

/// Phase 2: walk from `root`, keeping only children in `matches` (when
/// given), and report each node to `visitor`.
///
/// Every visited node records a page link on the context's current node.
/// Below [`CaptureLevel::Meta`] nothing happens; below
/// [`CaptureLevel::Body`] only the side effects happen.
pub fn render_tree<V: TreeVisitor>(
    ctx: &mut RenderContext<'_>,
    root: &Node,
    options: &TreeOptions,
    matches: Option<&MatchSet>,
    visitor: &mut V,
) -> Result<(), RenderError> {
    if ctx.level() < CaptureLevel::Meta {
        return Ok(());
    }
    let mut walk = TreeWalk {
        emit: ctx.level() == CaptureLevel::Body,
        ctx,
        options,
        matches,
        visitor,
        found_this_page: false,
        visited: 0,
    };

    if options.skip_root {
        let children = walk.filtered_children(root)?;
        if !children.is_empty() {
            walk.start_list(1);
            for child in &children {
                walk.walk(child, 1)?;
            }
            walk.end_list(1);
        }
    } else {
        walk.start_list(1);
        walk.walk(root, 1)?;
        walk.end_list(1);
    }

    tracing::debug!(root = %root.page_ref(), visited = walk.visited, "Rendered tree");
    Ok(())
}

struct TreeWalk<'w, 'a, V> {
    ctx: &'w mut RenderContext<'a>,
    options: &'w TreeOptions,
    matches: Option<&'w MatchSet>,
    visitor: &'w mut V,
    emit: bool,
    found_this_page: bool,
    visited: usize,
}

impl<V: TreeVisitor> TreeWalk<'_, '_, V> {
    fn filtered_children(&self, node: &Node) -> Result<Vec<Node>, RenderError> {
        let mut children = child_nodes(
            &*self.ctx,
            node,
            self.options.include_elements,
            self.options.child_level,
        )?;
        if let Some(matches) = self.matches {
            children.retain(|child| matches.contains(&child.key()));
        }
        Ok(children)
    }

    fn start_list(&mut self, depth: usize) {
        if self.emit {
            self.visitor.start_list(depth);
        }
    }

    fn end_list(&mut self, depth: usize) {
        if self.emit {
            self.visitor.end_list(depth);
        }
    }

    fn walk(&mut self, node: &Node, depth: usize) -> Result<(), RenderError> {
        self.visited += 1;
        let page_ref = node.page_ref();
        self.ctx.record_page_link(page_ref);

        let this_page = node.is_page() && self.options.this_page.as_ref() == Some(page_ref);
        let highlighted = this_page && !self.found_this_page;
        if highlighted {
            self.found_this_page = true;
        }
        let item = TreeItem {
            node,
            depth,
            index: self.ctx.index_of(page_ref),
            this_page,
            highlighted,
            direct_match: self.matches.is_some_and(|m| m.is_direct(&node.key())),
        };
        if self.emit {
            self.visitor.start_item(&*self.ctx, &item)?;
        }

        let max_depth = self.options.max_depth;
        if max_depth == 0 || depth < max_depth {
            let children = self.filtered_children(node)?;
            if !children.is_empty() {
                self.start_list(depth + 1);
                for child in &children {
                    self.walk(child, depth + 1)?;
                }
                self.end_list(depth + 1);
            }
        }

        if self.emit {
            self.visitor.end_item(&item);
        }
        Ok(())
    }
}

/// Href for a tree node.
///
/// Inside an active page index this is a same-document `#pageN[-id]`
/// fragment; otherwise the encoded context path, book prefix and page path,
/// followed by `#id` for elements.
pub fn node_href(ctx: &RenderContext<'_>, node: &Node) -> String {
    let page_ref = node.page_ref();
    let element_id = node.element_id();
    if let Some(index) = ctx.index_of(page_ref) {
        let mut href = String::from("#");
        href.push_str(&encode_fragment(&ref_id(Some(index), element_id.unwrap_or(""))));
        return href;
    }
    let mut href = encode_path(&format!("{}{}", ctx.context_path(), page_ref.servlet_path()));
    if let Some(id) = element_id {
        href.push('#');
        href.push_str(&encode_fragment(id));
    }
    href
}
