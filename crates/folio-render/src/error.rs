//! Render error types.

use folio_model::{CaptureError, PageRef};

use crate::css::CssTarget;

/// Error raised while rendering trees, links or combined views.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A page could not be captured; aborts the current render.
    #[error(transparent)]
    Capture(#[from] CaptureError),
    /// Both an element and an anchor were requested.
    #[error("May not provide both \"element\" and \"anchor\": element=\"{element}\", anchor=\"{anchor}\"")]
    AmbiguousTarget {
        /// Requested element id.
        element: String,
        /// Requested anchor.
        anchor: String,
    },
    /// The requested element does not exist on the target page.
    #[error("Element not found in target page {page_ref}: {id}")]
    TargetNotFound {
        /// Target page.
        page_ref: PageRef,
        /// Requested element id.
        id: String,
    },
    /// The requested element id was generated rather than authored.
    #[error(
        "Not allowed to link to a generated element id, set an explicit id on the target element: {id}"
    )]
    GeneratedIdLink {
        /// Target page.
        page_ref: PageRef,
        /// Requested element id.
        id: String,
    },
    /// The requested element is hidden.
    #[error("Not allowed to link to a hidden element: {id}")]
    HiddenElementLink {
        /// Target page.
        page_ref: PageRef,
        /// Requested element id.
        id: String,
    },
    /// No view is registered under the name.
    #[error("View not found: {0}")]
    ViewNotFound(String),
    /// A view with the same name is already registered.
    #[error("View already registered: {0}")]
    DuplicateView(String),
    /// The default view was requested through an explicit parameter.
    #[error("view parameter may not be sent for default view: {0}")]
    DefaultViewParam(String),
    /// A CSS class resolver is already registered for the target.
    #[error("CSS class resolver already registered: {0}")]
    DuplicateCssResolver(CssTarget),
    /// A link without a target page was rendered outside of any page.
    #[error("Link must be nested in a page when no target page is given")]
    NoCurrentPage,
}

#[cfg(test)]
mod tests {
    use folio_model::BookRef;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(RenderError: Send, Sync, std::error::Error);

    #[test]
    fn test_capture_error_is_transparent() {
        let page_ref = PageRef::new(BookRef::new("example.com", ""), "/missing");
        let err = RenderError::from(CaptureError::NotFound(page_ref));

        assert_eq!(err.to_string(), "Page not found: example.com:/missing");
    }

    #[test]
    fn test_ambiguous_target_message_names_both() {
        let err = RenderError::AmbiguousTarget {
            element: "fig".to_owned(),
            anchor: "top".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            "May not provide both \"element\" and \"anchor\": element=\"fig\", anchor=\"top\""
        );
    }
}
