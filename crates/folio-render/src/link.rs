//! Links to pages, elements and anchors.
//!
//! [`LinkRequest::resolve`] decides the href for a link and validates its
//! target; [`LinkRequest::write_html`] renders it. Hrefs follow a fixed
//! precedence:
//!
//! 1. Target inside the active page index, default view: `#pageN[-id]`.
//! 2. Element or anchor on the current page, default view: `#id`.
//! 3. Otherwise the context path, book prefix and page path, then
//!    `?view=name` for non-default views and `#id` when targeted.
//!
//! Links into inaccessible books are not an error: the target page is left
//! unresolved and the link label becomes a visible broken-reference marker.

use std::sync::Arc;

use folio_model::{CaptureLevel, Node, Page, PageRef};

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::html::{append_params, encode_fragment, encode_path, encode_query_component, escape_html};
use crate::page_index::ref_id;
use crate::view::{DEFAULT_VIEW_NAME, VIEW_PARAM};

/// Parameters of one link.
///
/// Empty strings are treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkRequest {
    page: Option<PageRef>,
    element: Option<String>,
    anchor: Option<String>,
    view: Option<String>,
    allow_generated_element: bool,
    small: bool,
    params: Vec<(String, String)>,
    class: Option<String>,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    Some(value.into()).filter(|v| !v.is_empty())
}

impl LinkRequest {
    /// Link to the current page.
    #[must_use]
    pub fn current_page() -> Self {
        Self::default()
    }

    /// Link to `page`.
    #[must_use]
    pub fn to_page(page: PageRef) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn element(mut self, id: impl Into<String>) -> Self {
        self.element = non_empty(id);
        self
    }

    #[must_use]
    pub fn anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = non_empty(anchor);
        self
    }

    #[must_use]
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = non_empty(view);
        self
    }

    /// Permit linking to an element whose id was generated.
    #[must_use]
    pub fn allow_generated_element(mut self, allow: bool) -> Self {
        self.allow_generated_element = allow;
        self
    }

    /// Render the label as text followed by a small `[link]`.
    #[must_use]
    pub fn small(mut self, small: bool) -> Self {
        self.small = small;
        self
    }

    /// Append a query parameter to the href.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Explicit CSS class; an empty class suppresses the resolved one.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Resolve the link.
    ///
    /// At [`CaptureLevel::Meta`] and above the target page is recorded as a
    /// page link of the current node. Below [`CaptureLevel::Body`] nothing
    /// else happens and `None` is returned.
    pub fn resolve(&self, ctx: &mut RenderContext<'_>) -> Result<Option<ResolvedLink>, RenderError> {
        if ctx.level() < CaptureLevel::Meta {
            return Ok(None);
        }
        let current_page = ctx.current_page().map(Arc::clone);
        let target_ref = match (&self.page, &current_page) {
            (Some(page_ref), _) => page_ref.clone(),
            (None, Some(current)) => current.page_ref().clone(),
            (None, None) => return Err(RenderError::NoCurrentPage),
        };
        ctx.record_page_link(&target_ref);
        if ctx.level() < CaptureLevel::Body {
            return Ok(None);
        }

        if let (Some(element), Some(anchor)) = (&self.element, &self.anchor) {
            return Err(RenderError::AmbiguousTarget {
                element: element.clone(),
                anchor: anchor.clone(),
            });
        }
        let view = ctx.views().get(self.view.as_deref().unwrap_or(DEFAULT_VIEW_NAME))?;
        let is_default_view = view.is_default();

        let target_page = self.capture_target(ctx, &target_ref, current_page.as_ref())?;
        let target_element = match (&self.element, &target_page) {
            (Some(id), Some(page)) => Some(self.validate_element(page, id)?),
            _ => None,
        };

        let index = ctx.index_of(&target_ref);
        let fragment = self.element.as_deref().or(self.anchor.as_deref());
        let on_current_page = match (&current_page, &target_page) {
            (Some(current), Some(target)) => current.page_ref() == target.page_ref(),
            _ => false,
        };

        let href = if index.is_some() && is_default_view {
            format!("#{}", encode_fragment(&ref_id(index, fragment.unwrap_or(""))))
        } else if let Some(id) = fragment.filter(|_| on_current_page && is_default_view) {
            format!("#{}", encode_fragment(id))
        } else {
            let mut href = encode_path(&format!("{}{}", ctx.context_path(), target_ref.servlet_path()));
            if !is_default_view {
                href.push('?');
                href.push_str(VIEW_PARAM);
                href.push('=');
                href.push_str(&encode_query_component(view.name()));
            }
            if let Some(id) = fragment {
                href.push('#');
                href.push_str(&encode_fragment(id));
            }
            href
        };
        let same_page = href.starts_with('#');

        tracing::trace!(page = %target_ref, href = %href, "Resolved link");

        Ok(Some(ResolvedLink {
            href: append_params(&href, &self.params),
            same_page,
            nofollow: target_page.as_ref().is_some_and(|page| !view.allows_robots(page)),
            view: view.name().to_owned(),
            target_ref,
            target_page,
            target_element,
            element_id: self.element.clone(),
            index,
        }))
    }

    /// Capture the target page, or `None` when its book is inaccessible.
    ///
    /// The current page is reused when it is the target and holds the
    /// requested element.
    fn capture_target(
        &self,
        ctx: &RenderContext<'_>,
        target_ref: &PageRef,
        current_page: Option<&Arc<Page>>,
    ) -> Result<Option<Arc<Page>>, RenderError> {
        let source = ctx.source();
        if !source.is_accessible(&target_ref.book) {
            tracing::debug!(page = %target_ref, "Link target in inaccessible book");
            return Ok(None);
        }
        if let Some(current) = current_page.filter(|current| {
            current.page_ref() == target_ref
                && self.element.as_deref().is_none_or(|id| current.element_index(id).is_some())
        }) {
            return Ok(Some(Arc::clone(current)));
        }
        let level = if self.element.is_some() {
            CaptureLevel::Meta
        } else {
            CaptureLevel::Page
        };
        Ok(Some(source.capture(target_ref, level)?))
    }

    fn validate_element(&self, page: &Page, id: &str) -> Result<usize, RenderError> {
        let Some(index) = page.element_index(id) else {
            return Err(RenderError::TargetNotFound {
                page_ref: page.page_ref().clone(),
                id: id.to_owned(),
            });
        };
        if !self.allow_generated_element && page.is_generated_id(id) {
            return Err(RenderError::GeneratedIdLink {
                page_ref: page.page_ref().clone(),
                id: id.to_owned(),
            });
        }
        if page.element(index).is_some_and(|element| element.is_hidden()) {
            return Err(RenderError::HiddenElementLink {
                page_ref: page.page_ref().clone(),
                id: id.to_owned(),
            });
        }
        Ok(index)
    }

    /// Resolve the link and write it as HTML.
    pub fn write_html(&self, ctx: &mut RenderContext<'_>, out: &mut String) -> Result<(), RenderError> {
        let Some(link) = self.resolve(ctx)? else {
            return Ok(());
        };
        let href = escape_html(&link.href);

        if self.small {
            out.push_str("<span");
        } else {
            out.push_str("<a href=\"");
            out.push_str(&href);
            out.push('"');
        }
        let class = match &self.class {
            Some(class) => Some(class.clone()).filter(|c| !c.is_empty()),
            None => link.target_node().and_then(|node| ctx.css().link_class(&node)),
        };
        if let Some(class) = class {
            out.push_str(" class=\"");
            out.push_str(&escape_html(&class));
            out.push('"');
        }
        if link.nofollow {
            out.push_str(" rel=\"nofollow\"");
        }
        out.push('>');

        out.push_str(&escape_html(&link.label()));
        if let Some(index) = link.index {
            out.push_str("<sup>[");
            out.push_str(&(index + 1).to_string());
            out.push_str("]</sup>");
        }

        if self.small {
            out.push_str("<sup><a href=\"");
            out.push_str(&href);
            out.push_str("\">[link]</a></sup></span>");
        } else {
            out.push_str("</a>");
        }
        Ok(())
    }
}

/// Outcome of [`LinkRequest::resolve`].
#[derive(Clone, Debug)]
pub struct ResolvedLink {
    /// Final href, query parameters included.
    pub href: String,
    /// Href is a same-document fragment.
    pub same_page: bool,
    /// Robots should not follow the link.
    pub nofollow: bool,
    /// Name of the view linked to.
    pub view: String,
    pub target_ref: PageRef,
    /// `None` when the target's book is inaccessible.
    pub target_page: Option<Arc<Page>>,
    /// Arena index of the target element in `target_page`.
    pub target_element: Option<usize>,
    /// Requested element id.
    pub element_id: Option<String>,
    /// Target page's index in the active page index.
    pub index: Option<usize>,
}

impl ResolvedLink {
    /// Link target has been captured.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.target_page.is_none()
    }

    /// Target element, else target page, as a node.
    #[must_use]
    pub fn target_node(&self) -> Option<Node> {
        let page = self.target_page.as_ref()?;
        Some(match self.target_element {
            Some(index) => Node::Element(Arc::clone(page), index),
            None => Node::Page(Arc::clone(page)),
        })
    }

    /// Element label, page title, or the broken-reference marker.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.target_page {
            Some(page) => match self.target_element.and_then(|index| page.element(index)) {
                Some(element) => element.label().to_owned(),
                None => page.title().to_owned(),
            },
            None => self.target_ref.broken_path(self.element_id.as_deref()),
        }
    }
}
