//! Content model and capture abstraction for Folio.
//!
//! This crate describes the read-only page graph consumed by the renderer:
//!
//! - [`BookRef`] and [`PageRef`]: structural identities of books and pages
//! - [`Page`] and [`Element`]: captured page content, built with [`PageBuilder`]
//! - [`Node`] and [`NodeKey`]: tagged view over pages and elements used by traversals
//! - [`ContentSource`]: the capture collaborator, with [`CaptureLevel`] gating detail
//! - [`MemorySource`]: in-memory content graph, loadable from YAML
//!
//! # Example
//!
//! ```
//! use folio_model::{BookRef, CaptureLevel, ContentSource, MemorySource, PageBuilder, PageRef};
//!
//! let book = BookRef::new("example.com", "/docs");
//! let root = PageRef::new(book.clone(), "/index");
//! let child = PageRef::new(book.clone(), "/intro");
//!
//! let source = MemorySource::new()
//!     .with_page(PageBuilder::new(root.clone(), "Home").child(child.clone()).build())
//!     .with_page(PageBuilder::new(child.clone(), "Introduction").build());
//!
//! let page = source.capture(&root, CaptureLevel::Meta)?;
//! assert_eq!(page.child_refs(), &[child]);
//! # Ok::<(), folio_model::CaptureError>(())
//! ```

mod capture;
mod element;
mod memory;
mod node;
mod page;
mod page_ref;

pub use capture::{CaptureError, CaptureLevel, ContentSource};
pub use element::{Element, ElementKind, ElementSpec};
pub use memory::MemorySource;
pub use node::{Node, NodeKey};
pub use page::{ModelError, Page, PageBuilder};
pub use page_ref::{BookRef, PageRef};
