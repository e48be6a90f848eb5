//! Navigation trees.
//!
//! A [`NavigationTree`] renders the page hierarchy below a root, optionally
//! filtered to branches that link to a given page, with the current page
//! highlighted.

use std::sync::Arc;

use folio_model::{CaptureLevel, Node, Page, PageRef};
use serde::Serialize;

use super::{MatchSet, TreeItem, TreeOptions, TreeVisitor, discover_matches, node_href, render_tree};
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::html::{escape_html, hex_data};

/// Id of the first "this page" item.
pub const THIS_PAGE_ID: &str = "folio-tree-this-page";
/// Class of "this page" items.
pub const THIS_PAGE_CLASS: &str = "folio-tree-this-page";
/// Class of items linking to the links-to target.
pub const LINKS_TO_PAGE_CLASS: &str = "folio-links-to-page";
/// Class of "this page" items that do not link to the links-to target.
pub const NO_LINK_TO_THIS_PAGE_CLASS: &str = "folio-no-link-to-this-page";
/// Class added to top-level items.
pub const EXPANDED_CLASS: &str = "expanded";

/// Builder for a navigation tree rooted at a page.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use folio_model::{BookRef, CaptureLevel, ContentSource, MemorySource, PageBuilder, PageRef};
/// use folio_render::{CssClasses, NavigationTree, RenderContext, ViewRegistry};
///
/// let book = BookRef::new("example.com", "");
/// let root = PageRef::new(book.clone(), "/index");
/// let intro = PageRef::new(book, "/intro");
/// let source = MemorySource::new()
///     .with_page(PageBuilder::new(root.clone(), "Home").child(intro.clone()).build())
///     .with_page(PageBuilder::new(intro, "Introduction").build());
/// let (views, css) = (ViewRegistry::new(), CssClasses::new());
/// let mut ctx = RenderContext::new(&source, &views, &css);
///
/// let mut html = String::new();
/// NavigationTree::new(source.capture(&root, CaptureLevel::Meta)?).write_html(&mut ctx, &mut html)?;
/// assert!(html.contains(r#"<a href="/intro">Introduction</a>"#));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct NavigationTree {
    root: Arc<Page>,
    skip_root: bool,
    yui_config: bool,
    include_elements: bool,
    target: Option<String>,
    this_page: Option<PageRef>,
    links_to: Option<PageRef>,
    max_depth: usize,
}

impl NavigationTree {
    #[must_use]
    pub fn new(root: Arc<Page>) -> Self {
        Self {
            root,
            skip_root: false,
            yui_config: false,
            include_elements: false,
            target: None,
            this_page: None,
            links_to: None,
            max_depth: 0,
        }
    }

    /// List the root's children as top-level items instead of the root.
    #[must_use]
    pub fn skip_root(mut self, skip_root: bool) -> Self {
        self.skip_root = skip_root;
        self
    }

    /// Emit `yuiConfig` data attributes for tree widgets.
    #[must_use]
    pub fn yui_config(mut self, yui_config: bool) -> Self {
        self.yui_config = yui_config;
        self
    }

    #[must_use]
    pub fn include_elements(mut self, include_elements: bool) -> Self {
        self.include_elements = include_elements;
        self
    }

    /// Link `target` attribute (e.g. a frame name).
    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into()).filter(|t| !t.is_empty());
        self
    }

    #[must_use]
    pub fn this_page(mut self, page_ref: PageRef) -> Self {
        self.this_page = Some(page_ref);
        self
    }

    /// Keep only branches containing a node that links to `page_ref`.
    #[must_use]
    pub fn links_to(mut self, page_ref: PageRef) -> Self {
        self.links_to = Some(page_ref);
        self
    }

    /// Deepest level rendered; `0` is unlimited.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn options(&self) -> TreeOptions {
        TreeOptions {
            include_elements: self.include_elements,
            max_depth: self.max_depth,
            skip_root: self.skip_root,
            this_page: self.this_page.clone(),
            child_level: if self.include_elements {
                CaptureLevel::Meta
            } else {
                CaptureLevel::Page
            },
        }
    }

    fn find_links(&self, ctx: &RenderContext<'_>, root: &Node) -> Result<Option<MatchSet>, RenderError> {
        let Some(target) = &self.links_to else {
            return Ok(None);
        };
        let matches = discover_matches(ctx, root, self.include_elements, |node: &Node| {
            node.links().contains(target)
        })?;
        Ok(Some(matches))
    }

    fn render<V: TreeVisitor>(&self, ctx: &mut RenderContext<'_>, visitor: &mut V) -> Result<(), RenderError> {
        if ctx.level() < CaptureLevel::Meta {
            return Ok(());
        }
        let root = Node::Page(Arc::clone(&self.root));
        let matches = self.find_links(ctx, &root)?;
        render_tree(ctx, &root, &self.options(), matches.as_ref(), visitor)
    }

    /// Write the tree as nested `<ul>` lists.
    pub fn write_html(&self, ctx: &mut RenderContext<'_>, out: &mut String) -> Result<(), RenderError> {
        let mut writer = NavHtml {
            out,
            yui_config: self.yui_config,
            target: self.target.as_deref(),
            filtering: self.links_to.is_some(),
        };
        self.render(ctx, &mut writer)
    }

    /// Collect the tree as serializable items.
    ///
    /// Items are only produced when rendering at [`CaptureLevel::Body`].
    pub fn items(&self, ctx: &mut RenderContext<'_>) -> Result<Vec<NavItem>, RenderError> {
        let mut collector = NavCollector::default();
        self.render(ctx, &mut collector)?;
        Ok(collector.roots)
    }
}

/// Serializable navigation tree item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Short title for pages, label for elements.
    pub title: String,
    pub href: String,
    /// Page reference as `domain:/book/path`.
    pub page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    /// 1-based number in the active page index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<usize>,
    #[serde(rename = "thisPage", skip_serializing_if = "std::ops::Not::not")]
    pub this_page: bool,
    #[serde(rename = "linksToPage", skip_serializing_if = "std::ops::Not::not")]
    pub links_to_page: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

fn item_title(node: &Node) -> &str {
    match node {
        Node::Page(page) => page.short_title(),
        Node::Element(..) => node.label(),
    }
}

struct NavHtml<'o, 't> {
    out: &'o mut String,
    yui_config: bool,
    target: Option<&'t str>,
    filtering: bool,
}

impl TreeVisitor for NavHtml<'_, '_> {
    fn start_list(&mut self, depth: usize) {
        if depth > 1 {
            self.out.push('\n');
        }
        self.out.push_str("<ul>\n");
    }

    fn start_item(&mut self, ctx: &RenderContext<'_>, item: &TreeItem<'_>) -> Result<(), RenderError> {
        let node = item.node;
        let out = &mut *self.out;

        out.push_str("<li");
        if self.yui_config {
            let mut servlet_path = node.page_ref().servlet_path();
            if let Some(id) = node.element_id() {
                servlet_path.push('#');
                servlet_path.push_str(id);
            }
            out.push_str(" yuiConfig='{\"data\":\"");
            out.push_str(&hex_data(&servlet_path));
            out.push_str("\"}'");
        }
        let css_class = ctx.css().list_item_class(node);
        if css_class.is_some() || item.depth == 1 {
            let classes: Vec<&str> = css_class
                .as_deref()
                .into_iter()
                .chain((item.depth == 1).then_some(EXPANDED_CLASS))
                .collect();
            out.push_str(" class=\"");
            out.push_str(&escape_html(&classes.join(" ")));
            out.push('"');
        }
        out.push_str("><a");

        if item.highlighted {
            out.push_str(" id=\"");
            out.push_str(THIS_PAGE_ID);
            out.push('"');
        }
        let link_class = if item.this_page && self.filtering && !item.direct_match {
            Some(NO_LINK_TO_THIS_PAGE_CLASS)
        } else if item.this_page {
            Some(THIS_PAGE_CLASS)
        } else if item.direct_match {
            Some(LINKS_TO_PAGE_CLASS)
        } else {
            None
        };
        if let Some(class) = link_class {
            out.push_str(" class=\"");
            out.push_str(class);
            out.push('"');
        }
        if let Some(target) = self.target {
            out.push_str(" target=\"");
            out.push_str(&escape_html(target));
            out.push('"');
        }
        out.push_str(" href=\"");
        out.push_str(&escape_html(&node_href(ctx, node)));
        out.push_str("\">");
        out.push_str(&escape_html(item_title(node)));
        if let Some(index) = item.index {
            out.push_str("<sup>[");
            out.push_str(&(index + 1).to_string());
            out.push_str("]</sup>");
        }
        out.push_str("</a>");
        Ok(())
    }

    fn end_item(&mut self, _item: &TreeItem<'_>) {
        self.out.push_str("</li>\n");
    }

    fn end_list(&mut self, _depth: usize) {
        self.out.push_str("</ul>\n");
    }
}

/// Builds [`NavItem`]s with an explicit stack of open items.
#[derive(Default)]
struct NavCollector {
    stack: Vec<NavItem>,
    roots: Vec<NavItem>,
}

impl TreeVisitor for NavCollector {
    fn start_list(&mut self, _depth: usize) {}

    fn start_item(&mut self, ctx: &RenderContext<'_>, item: &TreeItem<'_>) -> Result<(), RenderError> {
        let node = item.node;
        self.stack.push(NavItem {
            title: item_title(node).to_owned(),
            href: node_href(ctx, node),
            page: node.page_ref().to_string(),
            element: node.element_id().map(str::to_owned),
            number: item.index.map(|index| index + 1),
            this_page: item.this_page,
            links_to_page: item.direct_match,
            children: Vec::new(),
        });
        Ok(())
    }

    fn end_item(&mut self, _item: &TreeItem<'_>) {
        if let Some(done) = self.stack.pop() {
            match self.stack.last_mut() {
                Some(parent) => parent.children.push(done),
                None => self.roots.push(done),
            }
        }
    }

    fn end_list(&mut self, _depth: usize) {}
}
