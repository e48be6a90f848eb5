//! CSS class resolvers for tree items and links.
//!
//! Resolvers are registered once at start-up against a [`CssTarget`] and
//! looked up through an explicit fallback chain: an element kind falls back
//! to its parent kinds, then to [`CssTarget::Element`], then to
//! [`CssTarget::Node`]; pages fall back to [`CssTarget::Node`].

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::str::FromStr;

use folio_model::{ElementKind, Node};

use crate::error::RenderError;

/// Tag a CSS class resolver is registered under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CssTarget {
    /// Any node.
    Node,
    Page,
    /// Any element.
    Element,
    Kind(ElementKind),
}

impl CssTarget {
    /// Most specific target for a node.
    #[must_use]
    pub fn of(node: &Node) -> Self {
        node.element_kind().map_or(Self::Page, Self::Kind)
    }

    /// Next target consulted when this one has no answer.
    #[must_use]
    pub fn fallback(self) -> Option<Self> {
        match self {
            Self::Kind(kind) => Some(kind.parent().map_or(Self::Element, Self::Kind)),
            Self::Element | Self::Page => Some(Self::Node),
            Self::Node => None,
        }
    }

    /// This target followed by its fallbacks.
    pub fn chain(self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self), |target| target.fallback())
    }
}

impl fmt::Display for CssTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Page => f.write_str("page"),
            Self::Element => f.write_str("element"),
            Self::Kind(kind) => f.write_str(kind.as_str()),
        }
    }
}

impl FromStr for CssTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "node" => Ok(Self::Node),
            "page" => Ok(Self::Page),
            "element" => Ok(Self::Element),
            other => other
                .parse::<ElementKind>()
                .map(Self::Kind)
                .map_err(|_| format!("unknown CSS target: {s}")),
        }
    }
}

type Resolver = Box<dyn Fn(&Node) -> Option<String> + Send + Sync>;

/// Registered list-item and link class resolvers.
#[derive(Default)]
pub struct CssClasses {
    list_items: HashMap<CssTarget, Resolver>,
    links: HashMap<CssTarget, Resolver>,
}

impl fmt::Debug for CssClasses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CssClasses")
            .field("list_items", &self.list_items.keys().collect::<Vec<_>>())
            .field("links", &self.links.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn register(map: &mut HashMap<CssTarget, Resolver>, target: CssTarget, resolver: Resolver) -> Result<(), RenderError> {
    match map.entry(target) {
        Entry::Occupied(_) => Err(RenderError::DuplicateCssResolver(target)),
        Entry::Vacant(slot) => {
            slot.insert(resolver);
            Ok(())
        }
    }
}

fn resolve(map: &HashMap<CssTarget, Resolver>, node: &Node) -> Option<String> {
    CssTarget::of(node)
        .chain()
        .find_map(|target| map.get(&target).and_then(|resolver| resolver(node)))
}

impl CssClasses {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the list-item class resolver for `target`.
    pub fn add_list_item_resolver<R>(&mut self, target: CssTarget, resolver: R) -> Result<(), RenderError>
    where
        R: Fn(&Node) -> Option<String> + Send + Sync + 'static,
    {
        register(&mut self.list_items, target, Box::new(resolver))
    }

    /// Register a constant list-item class for `target`.
    pub fn add_list_item_class(&mut self, target: CssTarget, class: impl Into<String>) -> Result<(), RenderError> {
        let class = class.into();
        self.add_list_item_resolver(target, move |_: &Node| Some(class.clone()))
    }

    /// Register the link class resolver for `target`.
    pub fn add_link_resolver<R>(&mut self, target: CssTarget, resolver: R) -> Result<(), RenderError>
    where
        R: Fn(&Node) -> Option<String> + Send + Sync + 'static,
    {
        register(&mut self.links, target, Box::new(resolver))
    }

    /// Register a constant link class for `target`.
    pub fn add_link_class(&mut self, target: CssTarget, class: impl Into<String>) -> Result<(), RenderError> {
        let class = class.into();
        self.add_link_resolver(target, move |_: &Node| Some(class.clone()))
    }

    /// Class of the `<li>` wrapping a tree item.
    #[must_use]
    pub fn list_item_class(&self, node: &Node) -> Option<String> {
        resolve(&self.list_items, node)
    }

    /// Class of an `<a>` linking to the node.
    #[must_use]
    pub fn link_class(&self, node: &Node) -> Option<String> {
        resolve(&self.links, node)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use folio_model::{ElementSpec, PageBuilder};
    use pretty_assertions::assert_eq;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::testing::docs;

    assert_impl_all!(CssClasses: Send, Sync);

    fn nodes() -> (Node, Node, Node) {
        let mut builder = PageBuilder::new(docs("/p"), "P");
        builder
            .add_element(None, ElementSpec::new(ElementKind::Note, "N"))
            .unwrap();
        builder
            .add_element(None, ElementSpec::new(ElementKind::Figure, "F"))
            .unwrap();
        let page = Arc::new(builder.build());
        (
            Node::Page(Arc::clone(&page)),
            Node::Element(Arc::clone(&page), 0),
            Node::Element(page, 1),
        )
    }

    #[test]
    fn test_fallback_chain_for_kinds() {
        let chain: Vec<CssTarget> = CssTarget::Kind(ElementKind::Note).chain().collect();

        assert_eq!(
            chain,
            vec![
                CssTarget::Kind(ElementKind::Note),
                CssTarget::Kind(ElementKind::Aside),
                CssTarget::Kind(ElementKind::Section),
                CssTarget::Element,
                CssTarget::Node,
            ]
        );
        assert_eq!(CssTarget::Page.chain().collect::<Vec<_>>(), vec![CssTarget::Page, CssTarget::Node]);
    }

    #[test]
    fn test_lookup_uses_most_specific_registration() {
        let (page, note, figure) = nodes();
        let mut css = CssClasses::new();
        css.add_list_item_class(CssTarget::Kind(ElementKind::Section), "section-item")
            .unwrap();
        css.add_list_item_class(CssTarget::Node, "node-item").unwrap();

        assert_eq!(css.list_item_class(&note).as_deref(), Some("section-item"));
        assert_eq!(css.list_item_class(&figure).as_deref(), Some("node-item"));
        assert_eq!(css.list_item_class(&page).as_deref(), Some("node-item"));
        assert_eq!(css.link_class(&page), None);
    }

    #[test]
    fn test_resolver_returning_none_falls_through() {
        let (page, note, _) = nodes();
        let mut css = CssClasses::new();
        css.add_link_resolver(CssTarget::Element, |node: &Node| {
            (node.label() == "F").then(|| "figure-link".to_owned())
        })
        .unwrap();
        css.add_link_class(CssTarget::Node, "plain-link").unwrap();

        assert_eq!(css.link_class(&note).as_deref(), Some("plain-link"));
        assert_eq!(css.link_class(&page).as_deref(), Some("plain-link"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut css = CssClasses::new();
        css.add_link_class(CssTarget::Page, "a").unwrap();

        let result = css.add_link_class(CssTarget::Page, "b");

        assert!(matches!(result, Err(RenderError::DuplicateCssResolver(CssTarget::Page))));
        css.add_list_item_class(CssTarget::Page, "c").unwrap();
    }

    #[test]
    fn test_target_parse_and_display() {
        assert_eq!("page".parse::<CssTarget>(), Ok(CssTarget::Page));
        assert_eq!("Figure".parse::<CssTarget>(), Ok(CssTarget::Kind(ElementKind::Figure)));
        assert!("widget".parse::<CssTarget>().is_err());
        assert_eq!(CssTarget::Kind(ElementKind::Code).to_string(), "code");
    }
}
