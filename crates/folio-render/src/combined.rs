//! Combined view: every page below a root in a single document.

use std::sync::Arc;

use folio_model::{CaptureLevel, PageRef};

use crate::context::RenderContext;
use crate::error::RenderError;
use crate::html::escape_html;
use crate::page_index::{PageIndex, ref_id};
use crate::tree::NavigationTree;

/// Write the combined document for `root` and return its page index.
///
/// The index is active on `ctx` while writing, so every tree and link href
/// to an indexed page becomes a `#pageN` fragment. Each page is written as a
/// `<section>` with the page as the current page, followed by one
/// `pageN-<id>` anchor per visible element and the page body as-is. The context's previous page index and current page are restored
/// afterwards.
pub fn write_combined(
    ctx: &mut RenderContext<'_>,
    root: &PageRef,
    out: &mut String,
) -> Result<Arc<PageIndex>, RenderError> {
    let index = Arc::new(PageIndex::build(ctx.source(), root)?);
    let previous_index = ctx.set_page_index(Some(Arc::clone(&index)));
    let previous_page = ctx.current_page().map(Arc::clone);

    let result = write_document(ctx, &index, out);

    ctx.set_page_index(previous_index);
    ctx.set_current_page(previous_page);
    result?;

    tracing::debug!(root = %root, pages = index.len(), "Wrote combined view");
    Ok(index)
}

fn write_document(ctx: &mut RenderContext<'_>, index: &PageIndex, out: &mut String) -> Result<(), RenderError> {
    ctx.set_current_page(Some(Arc::clone(index.root_page())));
    out.push_str("<nav>\n");
    NavigationTree::new(Arc::clone(index.root_page())).write_html(ctx, out)?;
    out.push_str("</nav>\n");

    if ctx.level() < CaptureLevel::Body {
        return Ok(());
    }
    let source = ctx.source();
    for (position, indexed) in index.pages().iter().enumerate() {
        let page = source.capture(indexed.page_ref(), CaptureLevel::Body)?;
        ctx.set_current_page(Some(Arc::clone(&page)));

        out.push_str("<section id=\"");
        out.push_str(&escape_html(&ref_id(Some(position), "")));
        out.push_str("\">\n<h1>");
        out.push_str(&escape_html(page.title()));
        out.push_str("<sup>[");
        out.push_str(&(position + 1).to_string());
        out.push_str("]</sup></h1>\n");
        for element in page.elements().iter().filter(|element| !element.is_hidden()) {
            out.push_str("<a id=\"");
            out.push_str(&escape_html(&ref_id(Some(position), element.id())));
            out.push_str("\">");
            out.push_str(&escape_html(element.label()));
            out.push_str("</a>\n");
        }
        if let Some(body) = page.body() {
            out.push_str(body);
            out.push('\n');
        }
        out.push_str("</section>\n");
    }
    Ok(())
}
