//! Shared fixtures for unit tests.

use folio_model::{BookRef, MemorySource, PageBuilder, PageRef};

use crate::context::RenderContext;
use crate::css::CssClasses;
use crate::view::ViewRegistry;

pub(crate) fn docs(path: &str) -> PageRef {
    PageRef::new(BookRef::new("example.com", "/docs"), path)
}

pub(crate) fn private(path: &str) -> PageRef {
    PageRef::new(BookRef::new("example.com", "/private"), path)
}

/// Title derived from a path: `/intro` becomes `Intro`.
pub(crate) fn title_of(path: &str) -> String {
    let name = path.trim_start_matches('/');
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Root".to_owned(),
    }
}

/// Source with one `/docs` page per entry, children in the same book.
pub(crate) fn graph(pages: &[(&str, &[&str])]) -> MemorySource {
    let mut source = MemorySource::new();
    for (path, children) in pages {
        let mut builder = PageBuilder::new(docs(path), title_of(path));
        for child in *children {
            builder = builder.child(docs(child));
        }
        source = source.with_page(builder.build());
    }
    source
}

/// Read-only configuration shared by tests.
pub(crate) struct Fixture {
    pub(crate) source: MemorySource,
    pub(crate) views: ViewRegistry,
    pub(crate) css: CssClasses,
}

impl Fixture {
    pub(crate) fn new(source: MemorySource) -> Self {
        Self {
            source,
            views: ViewRegistry::new(),
            css: CssClasses::new(),
        }
    }

    pub(crate) fn ctx(&self) -> RenderContext<'_> {
        RenderContext::new(&self.source, &self.views, &self.css)
    }
}
