//! Page-graph indexing, tree filtering and link resolution for Folio.
//!
//! Everything here runs per render request against a [`RenderContext`]:
//!
//! - [`PageIndex`]: flattens the page DAG below a root for combined views,
//!   with [`ref_id`] naming the resulting anchors
//! - [`NavigationTree`] and [`ElementFilterTree`]: the two users of the
//!   two-phase tree engine in [`tree`]
//! - [`LinkRequest`]: href resolution and link markup
//! - [`ViewRegistry`] and [`CssClasses`]: read-only start-up configuration
//! - [`write_combined`]: all pages below a root as one document
//!
//! # Example
//!
//! ```
//! use folio_model::{BookRef, MemorySource, PageBuilder, PageRef};
//! use folio_render::{CssClasses, LinkRequest, RenderContext, ViewRegistry, write_combined};
//!
//! let book = BookRef::new("example.com", "/docs");
//! let root = PageRef::new(book.clone(), "/index");
//! let intro = PageRef::new(book, "/intro");
//! let source = MemorySource::new()
//!     .with_page(PageBuilder::new(root.clone(), "Home").child(intro.clone()).build())
//!     .with_page(PageBuilder::new(intro.clone(), "Introduction").build());
//! let (views, css) = (ViewRegistry::new(), CssClasses::new());
//! let mut ctx = RenderContext::new(&source, &views, &css);
//!
//! let mut html = String::new();
//! let index = write_combined(&mut ctx, &root, &mut html)?;
//! assert_eq!(index.index_of(&intro), Some(1));
//!
//! let link = LinkRequest::to_page(intro).resolve(&mut ctx)?.expect("rendered at body level");
//! assert_eq!(link.href, "/docs/intro");
//! # Ok::<(), folio_render::RenderError>(())
//! ```

mod combined;
mod context;
mod css;
mod error;
pub mod html;
mod link;
mod page_index;
pub mod tree;
mod view;

#[cfg(test)]
mod testing;

pub use combined::write_combined;
pub use context::RenderContext;
pub use css::{CssClasses, CssTarget};
pub use error::RenderError;
pub use link::{LinkRequest, ResolvedLink};
pub use page_index::{PageIndex, ref_id, ref_id_in_page};
pub use tree::{ElementFilter, ElementFilterTree, KindFilter, NavItem, NavigationTree};
pub use view::{DEFAULT_VIEW_NAME, VIEW_PARAM, View, ViewGroup, ViewRegistry, applicable_parents};
