//! In-memory content source.
//!
//! Provides [`MemorySource`], a [`ContentSource`] backed by maps of books and
//! pages. Pages can be registered through the builder methods or loaded from a
//! YAML content file.
//!
//! # YAML format
//!
//! ```yaml
//! domain: example.com          # optional, overrides the loader's default domain
//! books:
//!   - prefix: /docs
//!     title: Documentation
//!   - prefix: /internal
//!     accessible: false
//! pages:
//!   - book: /docs
//!     path: /index
//!     title: Home
//!     children: [/intro, { book: /internal, path: /notes }]
//!   - book: /docs
//!     path: /intro
//!     title: Introduction
//!     body: "<p>Hello</p>"
//!     elements:
//!       - kind: section
//!         id: setup
//!         label: Setup
//!         children:
//!           - { kind: figure, label: Diagram }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Deserialize;

use crate::capture::{CaptureError, CaptureLevel, ContentSource};
use crate::element::{ElementKind, ElementSpec};
use crate::page::{ModelError, Page, PageBuilder};
use crate::page_ref::{BookRef, PageRef};

const DEFAULT_DOMAIN: &str = "localhost";

#[derive(Clone, Debug)]
struct BookEntry {
    accessible: bool,
    title: Option<String>,
}

/// Page stored with and without its body, so captures below body level never
/// expose body content.
#[derive(Debug)]
struct StoredPage {
    full: Arc<Page>,
    meta: Arc<Page>,
}

/// In-memory content graph.
///
/// Books referenced only by child or link references and never declared are
/// treated as inaccessible. Registering a page declares its book as
/// accessible unless the book was declared before.
///
/// # Example
///
/// ```
/// use folio_model::{BookRef, CaptureLevel, ContentSource, MemorySource, PageBuilder, PageRef};
///
/// let book = BookRef::new("example.com", "/docs");
/// let page_ref = PageRef::new(book.clone(), "/index");
/// let source = MemorySource::new()
///     .with_page(PageBuilder::new(page_ref.clone(), "Home").body("<p>Hi</p>").build());
///
/// assert!(source.capture(&page_ref, CaptureLevel::Page)?.body().is_none());
/// assert!(source.capture(&page_ref, CaptureLevel::Body)?.body().is_some());
/// assert_eq!(source.capture_count(), 2);
/// # Ok::<(), folio_model::CaptureError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    books: HashMap<BookRef, BookEntry>,
    pages: HashMap<PageRef, StoredPage>,
    captures: AtomicUsize,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a book and whether it may be visited.
    #[must_use]
    pub fn with_book(mut self, book: BookRef, accessible: bool) -> Self {
        self.books
            .entry(book)
            .and_modify(|entry| entry.accessible = accessible)
            .or_insert(BookEntry {
                accessible,
                title: None,
            });
        self
    }

    /// Set the display title of a book, declaring it accessible if unknown.
    #[must_use]
    pub fn with_book_title(mut self, book: BookRef, title: impl Into<String>) -> Self {
        let title = title.into();
        self.books
            .entry(book)
            .and_modify(|entry| entry.title = Some(title.clone()))
            .or_insert(BookEntry {
                accessible: true,
                title: Some(title),
            });
        self
    }

    /// Register a page, replacing any page with the same reference.
    #[must_use]
    pub fn with_page(mut self, page: Page) -> Self {
        self.insert_page(page);
        self
    }

    fn insert_page(&mut self, page: Page) {
        self.books
            .entry(page.page_ref().book.clone())
            .or_insert(BookEntry {
                accessible: true,
                title: None,
            });
        let meta = Arc::new(page.without_body());
        self.pages.insert(
            page.page_ref().clone(),
            StoredPage {
                full: Arc::new(page),
                meta,
            },
        );
    }

    /// Number of pages registered.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of successful captures served so far.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::Relaxed)
    }

    /// Load a content graph from a YAML file.
    ///
    /// Pages and references without an explicit domain use `default_domain`.
    pub fn from_yaml_file(path: &Path, default_domain: &str) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|e| ModelError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content, default_domain)
    }

    /// Load a content graph from YAML text.
    ///
    /// Parent references are derived from declared children, in page order.
    pub fn from_yaml_str(yaml: &str, default_domain: &str) -> Result<Self, ModelError> {
        let doc: ContentDoc = serde_yaml::from_str(yaml)?;
        let domain = doc
            .domain
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(if default_domain.is_empty() {
                DEFAULT_DOMAIN
            } else {
                default_domain
            });

        let mut source = Self::new();
        for book in &doc.books {
            let book_ref = BookRef::new(book.domain.as_deref().unwrap_or(domain), &book.prefix);
            if source.books.contains_key(&book_ref) {
                return Err(ModelError::DuplicateBook(book_ref));
            }
            source.books.insert(
                book_ref,
                BookEntry {
                    accessible: book.accessible,
                    title: book.title.clone(),
                },
            );
        }

        // Resolve identities first so parents can be derived from children.
        let mut page_refs = Vec::with_capacity(doc.pages.len());
        let mut parents: HashMap<PageRef, Vec<PageRef>> = HashMap::new();
        for page in &doc.pages {
            let book = BookRef::new(page.domain.as_deref().unwrap_or(domain), &page.book);
            let page_ref = PageRef::new(book, &page.path);
            if page_refs.contains(&page_ref) {
                return Err(ModelError::DuplicatePage(page_ref));
            }
            for child in &page.children {
                let child_ref = child.resolve(&page_ref.book, domain);
                parents.entry(child_ref).or_default().push(page_ref.clone());
            }
            page_refs.push(page_ref);
        }

        for (page, page_ref) in doc.pages.into_iter().zip(page_refs) {
            let book = page_ref.book.clone();
            let mut builder = PageBuilder::new(page_ref.clone(), page.title).allow_robots(page.allow_robots);
            if let Some(short_title) = page.short_title {
                builder = builder.short_title(short_title);
            }
            if let Some(body) = page.body {
                builder = builder.body(body);
            }
            for parent in parents.remove(&page_ref).unwrap_or_default() {
                builder.push_parent(parent);
            }
            for child in &page.children {
                let child_ref = child.resolve(&book, domain);
                if !source.books.contains_key(&child_ref.book) && child_ref.book != book {
                    tracing::warn!(page = %page_ref, child = %child_ref, "Child reference into unknown book");
                }
                builder = builder.child(child_ref);
            }
            for link in &page.links {
                builder = builder.link(link.resolve(&book, domain));
            }
            for element in page.elements {
                add_element(&mut builder, None, element, &book, domain)?;
            }
            source.insert_page(builder.build());
        }

        for orphan in parents.keys() {
            tracing::debug!(page = %orphan, "Child reference to undeclared page");
        }
        tracing::debug!(pages = source.pages.len(), books = source.books.len(), "Loaded content graph");
        Ok(source)
    }
}

fn add_element(
    builder: &mut PageBuilder,
    parent: Option<usize>,
    def: ElementDef,
    book: &BookRef,
    domain: &str,
) -> Result<(), ModelError> {
    let spec = ElementSpec {
        kind: def.kind,
        id: def.id.filter(|id| !id.is_empty()),
        label: def.label,
        hidden: def.hidden,
        links: def.links.iter().map(|link| link.resolve(book, domain)).collect(),
    };
    let index = builder.add_element(parent, spec)?;
    for child in def.children {
        add_element(builder, Some(index), child, book, domain)?;
    }
    Ok(())
}

impl ContentSource for MemorySource {
    fn capture(&self, page_ref: &PageRef, level: CaptureLevel) -> Result<Arc<Page>, CaptureError> {
        if level == CaptureLevel::None {
            return Err(CaptureError::InvalidLevel(page_ref.clone()));
        }
        let stored = self
            .pages
            .get(page_ref)
            .ok_or_else(|| CaptureError::NotFound(page_ref.clone()))?;
        self.captures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(page = %page_ref, level = %level, "Captured page");
        let page = if level == CaptureLevel::Body {
            &stored.full
        } else {
            &stored.meta
        };
        Ok(Arc::clone(page))
    }

    fn is_accessible(&self, book: &BookRef) -> bool {
        self.books.get(book).is_some_and(|entry| entry.accessible)
    }

    fn book_title(&self, book: &BookRef) -> Option<String> {
        self.books.get(book).and_then(|entry| entry.title.clone())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ContentDoc {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    books: Vec<BookDef>,
    #[serde(default)]
    pages: Vec<PageDef>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BookDef {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    prefix: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default = "default_true")]
    accessible: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PageDef {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    book: String,
    path: String,
    title: String,
    #[serde(default)]
    short_title: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default = "default_true")]
    allow_robots: bool,
    #[serde(default)]
    children: Vec<RefDef>,
    #[serde(default)]
    links: Vec<RefDef>,
    #[serde(default)]
    elements: Vec<ElementDef>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ElementDef {
    kind: ElementKind,
    #[serde(default)]
    id: Option<String>,
    label: String,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    links: Vec<RefDef>,
    #[serde(default)]
    children: Vec<ElementDef>,
}

/// Page reference as written in YAML: a bare path in the same book, or a
/// mapping naming another book.
#[derive(Deserialize)]
#[serde(untagged)]
enum RefDef {
    Path(String),
    Full {
        #[serde(default)]
        domain: Option<String>,
        #[serde(default)]
        book: Option<String>,
        path: String,
    },
}

impl RefDef {
    fn resolve(&self, current: &BookRef, domain: &str) -> PageRef {
        match self {
            Self::Path(path) => PageRef::new(current.clone(), path),
            Self::Full {
                domain: ref_domain,
                book,
                path,
            } => {
                let book = match (ref_domain, book) {
                    (None, None) => current.clone(),
                    (Some(d), None) => BookRef::new(d.as_str(), &current.prefix),
                    (d, Some(prefix)) => BookRef::new(d.as_deref().unwrap_or(domain), prefix),
                };
                PageRef::new(book, path)
            }
        }
    }
}

fn default_true() -> bool {
    true
}
