//! Page elements.
//!
//! Elements are owned by exactly one [`Page`](crate::Page) and stored in the
//! page's arena in document order. Element ids are unique within their page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::page_ref::PageRef;

/// Closed set of element kinds.
///
/// Kinds form a small "is-a" hierarchy: a [`ElementKind::Note`] is an
/// [`ElementKind::Aside`], which is a [`ElementKind::Section`]. Every other
/// kind stands alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Section,
    Aside,
    Heading,
    Figure,
    Table,
    File,
    Code,
    Note,
    Other,
}

impl ElementKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Section,
        Self::Aside,
        Self::Heading,
        Self::Figure,
        Self::Table,
        Self::File,
        Self::Code,
        Self::Note,
        Self::Other,
    ];

    /// Lowercase name, also used as the generated-id prefix.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Aside => "aside",
            Self::Heading => "heading",
            Self::Figure => "figure",
            Self::Table => "table",
            Self::File => "file",
            Self::Code => "code",
            Self::Note => "note",
            Self::Other => "other",
        }
    }

    /// The kind this one specializes, if any.
    #[must_use]
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Aside => Some(Self::Section),
            Self::Note => Some(Self::Aside),
            _ => None,
        }
    }

    /// Whether this kind is `ancestor` or specializes it.
    ///
    /// ```
    /// use folio_model::ElementKind;
    ///
    /// assert!(ElementKind::Note.is_a(ElementKind::Section));
    /// assert!(!ElementKind::Section.is_a(ElementKind::Note));
    /// ```
    #[must_use]
    pub fn is_a(self, ancestor: Self) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown element kind: {s}"))
    }
}

/// Element stored in a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub(crate) id: String,
    pub(crate) kind: ElementKind,
    pub(crate) label: String,
    pub(crate) hidden: bool,
    pub(crate) links: Vec<PageRef>,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

impl Element {
    /// Element id, explicit or generated.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Hidden elements are never listed and may not be linked to.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Pages this element's content links to.
    #[must_use]
    pub fn links(&self) -> &[PageRef] {
        &self.links
    }

    /// Arena index of the enclosing element, `None` for top-level elements.
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Arena indices of nested elements, in document order.
    #[must_use]
    pub fn children(&self) -> &[usize] {
        &self.children
    }
}

/// Description of an element to add through [`PageBuilder::add_element`](crate::PageBuilder::add_element).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementSpec {
    pub kind: ElementKind,
    pub id: Option<String>,
    pub label: String,
    pub hidden: bool,
    pub links: Vec<PageRef>,
}

impl ElementSpec {
    /// Visible element without an explicit id.
    #[must_use]
    pub fn new(kind: ElementKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            id: None,
            label: label.into(),
            hidden: false,
            links: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn with_link(mut self, target: PageRef) -> Self {
        self.links.push(target);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_a_self() {
        for kind in ElementKind::ALL {
            assert!(kind.is_a(kind));
        }
    }

    #[test]
    fn test_kind_is_a_walks_chain() {
        assert!(ElementKind::Note.is_a(ElementKind::Aside));
        assert!(ElementKind::Note.is_a(ElementKind::Section));
        assert!(ElementKind::Aside.is_a(ElementKind::Section));
    }

    #[test]
    fn test_kind_is_a_unrelated() {
        assert!(!ElementKind::Figure.is_a(ElementKind::Section));
        assert!(!ElementKind::Aside.is_a(ElementKind::Note));
        assert!(!ElementKind::Code.is_a(ElementKind::File));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Figure".parse::<ElementKind>(), Ok(ElementKind::Figure));
        assert!("chapter".parse::<ElementKind>().is_err());
    }

    #[test]
    fn test_element_spec_builder() {
        let spec = ElementSpec::new(ElementKind::Code, "Listing").with_id("listing-1").hidden();

        assert_eq!(spec.id.as_deref(), Some("listing-1"));
        assert!(spec.hidden);
        assert_eq!(spec.label, "Listing");
    }
}
