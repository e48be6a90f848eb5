//! Captured pages.
//!
//! A [`Page`] is immutable once built. Elements live in a flat arena with
//! parent/children relationships tracked by indices, mirroring how the page
//! is laid out in document order.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::element::{Element, ElementSpec};
use crate::page_ref::{BookRef, PageRef};

/// Error raised while assembling pages or loading a content graph.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Content file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Content file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Content file is not valid.
    #[error("Invalid content graph: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Two pages share a reference.
    #[error("Duplicate page {0}")]
    DuplicatePage(PageRef),
    /// A book was declared twice.
    #[error("Duplicate book {0}")]
    DuplicateBook(BookRef),
    /// Two elements of one page declared the same id.
    #[error("Duplicate element id \"{id}\" in {page_ref}")]
    DuplicateElementId {
        /// Page being built.
        page_ref: PageRef,
        /// Offending id.
        id: String,
    },
    /// Element id is empty or contains whitespace.
    #[error("Invalid element id \"{id}\" in {page_ref}")]
    InvalidElementId {
        /// Page being built.
        page_ref: PageRef,
        /// Offending id.
        id: String,
    },
    /// Parent index passed to `add_element` does not exist.
    #[error("Unknown parent element {index} in {page_ref}")]
    UnknownParent {
        /// Page being built.
        page_ref: PageRef,
        /// Requested parent arena index.
        index: usize,
    },
}

/// A captured page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    page_ref: PageRef,
    title: String,
    short_title: Option<String>,
    parents: Vec<PageRef>,
    children: Vec<PageRef>,
    elements: Vec<Element>,
    top_level: Vec<usize>,
    ids: HashMap<String, usize>,
    generated_ids: HashSet<String>,
    links: Vec<PageRef>,
    body: Option<String>,
    allow_robots: bool,
}

impl Page {
    #[must_use]
    pub fn page_ref(&self) -> &PageRef {
        &self.page_ref
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Short title for navigation, falling back to the full title.
    #[must_use]
    pub fn short_title(&self) -> &str {
        self.short_title.as_deref().unwrap_or(&self.title)
    }

    /// Parent page references, in declaration order.
    #[must_use]
    pub fn parent_refs(&self) -> &[PageRef] {
        &self.parents
    }

    /// Child page references, in declaration order without duplicates.
    #[must_use]
    pub fn child_refs(&self) -> &[PageRef] {
        &self.children
    }

    /// All elements in document order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Arena indices of elements not nested in another element.
    #[must_use]
    pub fn top_level_elements(&self) -> &[usize] {
        &self.top_level
    }

    #[must_use]
    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Arena index of the element with the given id.
    #[must_use]
    pub fn element_index(&self, id: &str) -> Option<usize> {
        self.ids.get(id).copied()
    }

    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.element_index(id).and_then(|index| self.elements.get(index))
    }

    /// Whether `id` was assigned at build time rather than by the author.
    #[must_use]
    pub fn is_generated_id(&self, id: &str) -> bool {
        self.generated_ids.contains(id)
    }

    #[must_use]
    pub fn generated_ids(&self) -> &HashSet<String> {
        &self.generated_ids
    }

    /// Pages the page's own content links to.
    #[must_use]
    pub fn links(&self) -> &[PageRef] {
        &self.links
    }

    /// Rendered body, present only when captured at body level.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    #[must_use]
    pub fn allow_robots(&self) -> bool {
        self.allow_robots
    }

    /// Copy of the page with the body dropped.
    #[must_use]
    pub fn without_body(&self) -> Self {
        Self {
            body: None,
            ..self.clone()
        }
    }
}

/// Builder for [`Page`].
///
/// ```
/// use folio_model::{BookRef, ElementKind, ElementSpec, PageBuilder, PageRef};
///
/// let page_ref = PageRef::new(BookRef::new("example.com", ""), "/guide");
/// let mut builder = PageBuilder::new(page_ref, "Guide");
/// let section = builder.add_element(None, ElementSpec::new(ElementKind::Section, "Setup"))?;
/// builder.add_element(Some(section), ElementSpec::new(ElementKind::Figure, "Diagram").with_id("diagram"))?;
/// let page = builder.build();
///
/// assert_eq!(page.elements()[0].id(), "section-1");
/// assert!(page.is_generated_id("section-1"));
/// assert!(!page.is_generated_id("diagram"));
/// # Ok::<(), folio_model::ModelError>(())
/// ```
#[derive(Debug)]
pub struct PageBuilder {
    page: Page,
    pending_ids: Vec<Option<String>>,
}

impl PageBuilder {
    /// Start a page with the given identity and title.
    #[must_use]
    pub fn new(page_ref: PageRef, title: impl Into<String>) -> Self {
        Self {
            page: Page {
                page_ref,
                title: title.into(),
                short_title: None,
                parents: Vec::new(),
                children: Vec::new(),
                elements: Vec::new(),
                top_level: Vec::new(),
                ids: HashMap::new(),
                generated_ids: HashSet::new(),
                links: Vec::new(),
                body: None,
                allow_robots: true,
            },
            pending_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn short_title(mut self, short_title: impl Into<String>) -> Self {
        self.page.short_title = Some(short_title.into());
        self
    }

    /// Declare a parent page. Repeated parents are ignored.
    #[must_use]
    pub fn parent(mut self, parent: PageRef) -> Self {
        self.push_parent(parent);
        self
    }

    /// Declare a child page. Repeated children keep their first position.
    #[must_use]
    pub fn child(mut self, child: PageRef) -> Self {
        if !self.page.children.contains(&child) {
            self.page.children.push(child);
        }
        self
    }

    /// Record a link from the page's content to another page.
    #[must_use]
    pub fn link(mut self, target: PageRef) -> Self {
        if !self.page.links.contains(&target) {
            self.page.links.push(target);
        }
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.page.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn allow_robots(mut self, allow: bool) -> Self {
        self.page.allow_robots = allow;
        self
    }

    pub(crate) fn push_parent(&mut self, parent: PageRef) {
        if !self.page.parents.contains(&parent) {
            self.page.parents.push(parent);
        }
    }

    /// Add an element, nested under `parent` when given.
    ///
    /// Returns the arena index of the new element.
    pub fn add_element(&mut self, parent: Option<usize>, spec: ElementSpec) -> Result<usize, ModelError> {
        let index = self.page.elements.len();
        if let Some(parent_index) = parent
            && parent_index >= index
        {
            return Err(ModelError::UnknownParent {
                page_ref: self.page.page_ref.clone(),
                index: parent_index,
            });
        }
        if let Some(id) = &spec.id {
            if id.is_empty() || id.chars().any(char::is_whitespace) {
                return Err(ModelError::InvalidElementId {
                    page_ref: self.page.page_ref.clone(),
                    id: id.clone(),
                });
            }
            if self.page.ids.contains_key(id) {
                return Err(ModelError::DuplicateElementId {
                    page_ref: self.page.page_ref.clone(),
                    id: id.clone(),
                });
            }
            self.page.ids.insert(id.clone(), index);
        }

        match parent {
            Some(parent_index) => self.page.elements[parent_index].children.push(index),
            None => self.page.top_level.push(index),
        }
        self.pending_ids.push(spec.id);
        self.page.elements.push(Element {
            id: String::new(),
            kind: spec.kind,
            label: spec.label,
            hidden: spec.hidden,
            links: spec.links,
            parent,
            children: Vec::new(),
        });
        Ok(index)
    }

    /// Finish the page, assigning `kind-N` ids to elements without one.
    ///
    /// Numbering is per kind in document order and skips ids already taken
    /// by an explicit declaration.
    #[must_use]
    pub fn build(self) -> Page {
        let Self { mut page, pending_ids } = self;
        let mut counters: HashMap<&'static str, usize> = HashMap::new();

        for (index, explicit) in pending_ids.into_iter().enumerate() {
            let id = match explicit {
                Some(id) => id,
                None => {
                    let prefix = page.elements[index].kind.as_str();
                    let counter = counters.entry(prefix).or_insert(0);
                    let generated = loop {
                        *counter += 1;
                        let candidate = format!("{prefix}-{counter}");
                        if !page.ids.contains_key(&candidate) {
                            break candidate;
                        }
                    };
                    page.ids.insert(generated.clone(), index);
                    page.generated_ids.insert(generated.clone());
                    generated
                }
            };
            page.elements[index].id = id;
        }

        page
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::element::ElementKind;

    fn page_ref(path: &str) -> PageRef {
        PageRef::new(BookRef::new("example.com", "/docs"), path)
    }

    #[test]
    fn test_build_assigns_generated_ids_per_kind() {
        let mut builder = PageBuilder::new(page_ref("/a"), "A");
        builder
            .add_element(None, ElementSpec::new(ElementKind::Section, "One"))
            .unwrap();
        builder
            .add_element(None, ElementSpec::new(ElementKind::Figure, "Fig"))
            .unwrap();
        builder
            .add_element(None, ElementSpec::new(ElementKind::Section, "Two"))
            .unwrap();

        let page = builder.build();
        let ids: Vec<&str> = page.elements().iter().map(Element::id).collect();

        assert_eq!(ids, vec!["section-1", "figure-1", "section-2"]);
        assert_eq!(page.generated_ids().len(), 3);
    }

    #[test]
    fn test_build_skips_taken_generated_ids() {
        let mut builder = PageBuilder::new(page_ref("/a"), "A");
        builder
            .add_element(None, ElementSpec::new(ElementKind::Section, "One"))
            .unwrap();
        builder
            .add_element(None, ElementSpec::new(ElementKind::Section, "Two").with_id("section-1"))
            .unwrap();

        let page = builder.build();

        assert_eq!(page.elements()[0].id(), "section-2");
        assert_eq!(page.elements()[1].id(), "section-1");
        assert!(!page.is_generated_id("section-1"));
        assert!(page.is_generated_id("section-2"));
    }

    #[test]
    fn test_add_element_duplicate_id_fails() {
        let mut builder = PageBuilder::new(page_ref("/a"), "A");
        builder
            .add_element(None, ElementSpec::new(ElementKind::Code, "x").with_id("same"))
            .unwrap();

        let result = builder.add_element(None, ElementSpec::new(ElementKind::Code, "y").with_id("same"));

        assert!(matches!(result, Err(ModelError::DuplicateElementId { ref id, .. }) if id == "same"));
    }

    #[test]
    fn test_add_element_invalid_id_fails() {
        let mut builder = PageBuilder::new(page_ref("/a"), "A");

        let result = builder.add_element(None, ElementSpec::new(ElementKind::Code, "x").with_id("two words"));

        assert!(matches!(result, Err(ModelError::InvalidElementId { .. })));
    }

    #[test]
    fn test_add_element_unknown_parent_fails() {
        let mut builder = PageBuilder::new(page_ref("/a"), "A");

        let result = builder.add_element(Some(0), ElementSpec::new(ElementKind::Code, "x"));

        assert!(matches!(result, Err(ModelError::UnknownParent { index: 0, .. })));
    }

    #[test]
    fn test_nested_elements_track_parent_and_children() {
        let mut builder = PageBuilder::new(page_ref("/a"), "A");
        let section = builder
            .add_element(None, ElementSpec::new(ElementKind::Section, "S"))
            .unwrap();
        let figure = builder
            .add_element(Some(section), ElementSpec::new(ElementKind::Figure, "F"))
            .unwrap();

        let page = builder.build();

        assert_eq!(page.top_level_elements(), &[section]);
        assert_eq!(page.elements()[section].children(), &[figure]);
        assert_eq!(page.elements()[figure].parent(), Some(section));
    }

    #[test]
    fn test_child_refs_are_deduplicated_in_order() {
        let page = PageBuilder::new(page_ref("/a"), "A")
            .child(page_ref("/b"))
            .child(page_ref("/c"))
            .child(page_ref("/b"))
            .build();

        assert_eq!(page.child_refs(), &[page_ref("/b"), page_ref("/c")]);
    }

    #[test]
    fn test_short_title_falls_back_to_title() {
        let plain = PageBuilder::new(page_ref("/a"), "Alpha").build();
        let short = PageBuilder::new(page_ref("/b"), "Beta Release Notes")
            .short_title("Beta")
            .build();

        assert_eq!(plain.short_title(), "Alpha");
        assert_eq!(short.short_title(), "Beta");
    }

    #[test]
    fn test_without_body_drops_only_body() {
        let page = PageBuilder::new(page_ref("/a"), "A").body("<p>Hi</p>").build();

        let stripped = page.without_body();

        assert_eq!(stripped.body(), None);
        assert_eq!(stripped.title(), "A");
    }
}
