//! Views and the start-up view registry.
//!
//! A view is one way of presenting a page (its content, a list of its
//! figures, ...). The default view, [`DEFAULT_VIEW_NAME`], is always
//! registered and is never named explicitly in a URL.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use folio_model::{CaptureLevel, ElementKind, Page, PageRef};
use serde::{Deserialize, Serialize};

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::html::{encode_path, encode_query_component};

/// Name of the default view.
pub const DEFAULT_VIEW_NAME: &str = "content";

/// Query parameter selecting a non-default view.
pub const VIEW_PARAM: &str = "view";

const TITLE_SEPARATOR: &str = " - ";

/// View groupings, in display order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewGroup {
    /// Placed before everything else.
    First,
    /// Shown on every page.
    #[default]
    Fixed,
    /// Shown only where relevant to the page or its children.
    Variable,
}

impl FromStr for ViewGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "fixed" => Ok(Self::Fixed),
            "variable" => Ok(Self::Variable),
            _ => Err(format!("unknown view group: {s}")),
        }
    }
}

/// A registered view.
///
/// Views are equal when their names are equal.
#[derive(Clone, Debug)]
pub struct View {
    name: String,
    display: String,
    group: ViewGroup,
    allow_robots: bool,
    applies_globally: bool,
    requires: Option<ElementKind>,
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for View {}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl View {
    #[must_use]
    pub fn new(name: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display: display.into(),
            group: ViewGroup::default(),
            allow_robots: true,
            applies_globally: true,
            requires: None,
        }
    }

    #[must_use]
    pub fn group(mut self, group: ViewGroup) -> Self {
        self.group = group;
        self
    }

    #[must_use]
    pub fn allow_robots(mut self, allow_robots: bool) -> Self {
        self.allow_robots = allow_robots;
        self
    }

    #[must_use]
    pub fn applies_globally(mut self, applies_globally: bool) -> Self {
        self.applies_globally = applies_globally;
        self
    }

    /// Only apply to pages holding a visible element of `kind`.
    #[must_use]
    pub fn requires(mut self, kind: ElementKind) -> Self {
        self.requires = Some(kind);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    #[must_use]
    pub fn view_group(&self) -> ViewGroup {
        self.group
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_VIEW_NAME
    }

    #[must_use]
    pub fn applies_in_global_navigation(&self) -> bool {
        self.applies_globally
    }

    #[must_use]
    pub fn required_kind(&self) -> Option<ElementKind> {
        self.requires
    }

    /// Whether robots may follow links to `page` in this view.
    #[must_use]
    pub fn allows_robots(&self, page: &Page) -> bool {
        self.allow_robots && page.allow_robots()
    }

    /// Whether the view applies to `page`, captured at meta level or above.
    #[must_use]
    pub fn is_applicable(&self, page: &Page) -> bool {
        self.requires.is_none_or(|kind| {
            page.elements()
                .iter()
                .any(|element| !element.is_hidden() && element.kind().is_a(kind))
        })
    }

    /// `display - title[ - book title]`.
    #[must_use]
    pub fn title(&self, page: &Page, book_title: Option<&str>) -> String {
        let mut title = format!("{}{TITLE_SEPARATOR}{}", self.display, page.title());
        if let Some(book_title) = book_title.filter(|t| !t.is_empty()) {
            title.push_str(TITLE_SEPARATOR);
            title.push_str(book_title);
        }
        title
    }

    /// Encoded book path of `page` in this view, without a context path.
    #[must_use]
    pub fn canonical_path(&self, page_ref: &PageRef) -> String {
        let mut path = encode_path(&page_ref.servlet_path());
        if !self.is_default() {
            path.push('?');
            path.push_str(VIEW_PARAM);
            path.push('=');
            path.push_str(&encode_query_component(&self.name));
        }
        path
    }

    fn default_view() -> Self {
        Self::new(DEFAULT_VIEW_NAME, "Content")
    }
}

/// Views registered at start-up.
///
/// Built once and then shared read-only between requests.
#[derive(Clone, Debug)]
pub struct ViewRegistry {
    default_view: View,
    others: HashMap<String, View>,
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRegistry {
    /// Registry holding only the default view.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_view: View::default_view(),
            others: HashMap::new(),
        }
    }

    /// Add a view; names must be unique.
    pub fn register(&mut self, view: View) -> Result<(), RenderError> {
        if view.is_default() || self.others.contains_key(&view.name) {
            return Err(RenderError::DuplicateView(view.name));
        }
        tracing::debug!(view = %view.name, group = ?view.group, "Registered view");
        self.others.insert(view.name.clone(), view);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&View, RenderError> {
        self.find(name)
            .ok_or_else(|| RenderError::ViewNotFound(name.to_owned()))
    }

    fn find(&self, name: &str) -> Option<&View> {
        if name == DEFAULT_VIEW_NAME {
            Some(&self.default_view)
        } else {
            self.others.get(name)
        }
    }

    #[must_use]
    pub fn default_view(&self) -> &View {
        &self.default_view
    }

    /// Views ordered by group, then display, then name.
    #[must_use]
    pub fn sorted(&self) -> Vec<&View> {
        let mut views: Vec<&View> = std::iter::once(&self.default_view)
            .chain(self.others.values())
            .collect();
        views.sort_by(|a, b| (a.group, &a.display, &a.name).cmp(&(b.group, &b.display, &b.name)));
        views
    }

    /// View selected by a request's `view` parameter.
    ///
    /// A missing parameter or an unknown name selects the default view;
    /// naming the default view explicitly is an error.
    pub fn resolve_param(&self, param: Option<&str>) -> Result<&View, RenderError> {
        match param {
            None => Ok(&self.default_view),
            Some(DEFAULT_VIEW_NAME) => Err(RenderError::DefaultViewParam(DEFAULT_VIEW_NAME.to_owned())),
            Some(name) => Ok(self.others.get(name).unwrap_or_else(|| {
                tracing::debug!(view = name, "Unknown view requested, using default");
                &self.default_view
            })),
        }
    }
}

/// Parents of `page`, in accessible books, to which `view` applies.
///
/// Parents are captured at [`CaptureLevel::Meta`] and listed once each in
/// declaration order.
pub fn applicable_parents(
    ctx: &RenderContext<'_>,
    view: &View,
    page: &Page,
) -> Result<Vec<Arc<Page>>, RenderError> {
    let source = ctx.source();
    let mut seen = HashSet::new();
    let mut parents = Vec::new();
    for parent_ref in page.parent_refs() {
        if !source.is_accessible(&parent_ref.book) || !seen.insert(parent_ref) {
            continue;
        }
        let parent = source.capture(parent_ref, CaptureLevel::Meta)?;
        if view.is_applicable(&parent) {
            parents.push(parent);
        }
    }
    Ok(parents)
}
