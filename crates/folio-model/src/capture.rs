//! Capture trait and error types.
//!
//! Provides the [`ContentSource`] trait through which the renderer materializes
//! pages, along with [`CaptureLevel`] describing how much of a page is needed.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::page::Page;
use crate::page_ref::{BookRef, PageRef};

/// Amount of detail requested when capturing a page.
///
/// Levels are ordered: `None < Meta < Page < Body`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureLevel {
    /// Nothing is captured; rendering is a no-op.
    #[default]
    None,
    /// Child lists, elements and links, enough for traversal.
    Meta,
    /// Everything needed to reference the page (title and metadata).
    Page,
    /// Full page including its body.
    Body,
}

impl CaptureLevel {
    /// Lowercase name of the level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Meta => "meta",
            Self::Page => "page",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for CaptureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptureLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "meta" => Ok(Self::Meta),
            "page" => Ok(Self::Page),
            "body" => Ok(Self::Body),
            other => Err(format!("unknown capture level: {other}")),
        }
    }
}

/// Error raised when a page cannot be materialized.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// No page exists for the reference.
    #[error("Page not found: {0}")]
    NotFound(PageRef),
    /// Capturing at [`CaptureLevel::None`] is meaningless.
    #[error("Cannot capture {0} at capture level none")]
    InvalidLevel(PageRef),
    /// Backend-specific failure.
    #[error("Failed to capture {page_ref}: {message}")]
    Backend {
        /// Page being captured.
        page_ref: PageRef,
        /// Backend error message.
        message: String,
    },
}

/// Source of captured pages.
///
/// Implementations may cache captures for the lifetime of a request; the
/// renderer never caches pages itself. Capturing is synchronous and may be
/// re-entered while rendering another page.
pub trait ContentSource: Send + Sync {
    /// Materialize the page for `page_ref` with at least the given detail.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError`] if the page does not exist or cannot be built.
    fn capture(&self, page_ref: &PageRef, level: CaptureLevel) -> Result<Arc<Page>, CaptureError>;

    /// Whether pages of the given book may be visited.
    ///
    /// Inaccessible books are silently skipped by traversals.
    fn is_accessible(&self, book: &BookRef) -> bool;

    /// Display title of a book, if it has one.
    fn book_title(&self, _book: &BookRef) -> Option<String> {
        None
    }
}
