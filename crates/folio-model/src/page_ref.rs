//! Book and page identities.
//!
//! A page is identified by the book it lives in plus a path within that book.
//! Both types are plain values: equality and hashing are structural, so they
//! serve directly as map and set keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a book: a domain plus a path prefix.
///
/// The prefix is either empty (book mounted at the site root) or starts with
/// `/` and has no trailing slash (e.g. `/docs`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookRef {
    /// Domain name hosting the book.
    pub domain: String,
    /// Path prefix of the book (`""` or `/segment...`).
    pub prefix: String,
}

impl BookRef {
    /// Create a book reference, normalizing the prefix.
    ///
    /// ```
    /// use folio_model::BookRef;
    ///
    /// assert_eq!(BookRef::new("example.com", "docs/").prefix, "/docs");
    /// assert_eq!(BookRef::new("example.com", "/").prefix, "");
    /// ```
    #[must_use]
    pub fn new(domain: impl Into<String>, prefix: impl AsRef<str>) -> Self {
        let trimmed = prefix.as_ref().trim_matches('/');
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        Self {
            domain: domain.into(),
            prefix,
        }
    }
}

impl fmt::Display for BookRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.prefix)
    }
}

/// Identity of a page: its book plus a path within the book.
///
/// The path always begins with `/`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageRef {
    /// Book containing the page.
    pub book: BookRef,
    /// Path within the book (e.g. `/intro`).
    pub path: String,
}

impl PageRef {
    /// Create a page reference, adding the leading slash when missing.
    #[must_use]
    pub fn new(book: BookRef, path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        let path = if path.starts_with('/') {
            path.to_owned()
        } else {
            format!("/{path}")
        };
        Self { book, path }
    }

    /// Path of the page relative to the site root (`prefix + path`).
    #[must_use]
    pub fn servlet_path(&self) -> String {
        format!("{}{}", self.book.prefix, self.path)
    }

    /// Marker used in place of a link label when the target cannot be resolved.
    ///
    /// Format: `¿domain:/book/path#target?`, no encoding applied.
    ///
    /// ```
    /// use folio_model::{BookRef, PageRef};
    ///
    /// let page = PageRef::new(BookRef::new("example.com", "/docs"), "/intro");
    /// assert_eq!(page.broken_path(None), "¿example.com:/docs/intro?");
    /// assert_eq!(page.broken_path(Some("setup")), "¿example.com:/docs/intro#setup?");
    /// ```
    #[must_use]
    pub fn broken_path(&self, target_id: Option<&str>) -> String {
        let mut out = format!("¿{}:{}{}", self.book.domain, self.book.prefix, self.path);
        if let Some(id) = target_id {
            out.push('#');
            out.push_str(id);
        }
        out.push('?');
        out
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.book.domain, self.book.prefix, self.path)
    }
}
