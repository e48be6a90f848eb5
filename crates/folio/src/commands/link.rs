//! `folio link` command implementation.

use clap::Args;
use folio_config::CliSettings;
use folio_model::CaptureLevel;
use folio_render::LinkRequest;

use super::{GlobalArgs, Site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the link command.
#[derive(Args)]
pub(crate) struct LinkArgs {
    /// Page the link is rendered on (`PATH` or `BOOK:PATH`).
    from: String,

    /// Target page; defaults to the page the link is rendered on.
    to: Option<String>,

    /// Id of the target element.
    #[arg(long, conflicts_with = "anchor")]
    element: Option<String>,

    /// Free-form fragment on the target page.
    #[arg(long)]
    anchor: Option<String>,

    /// View to link to.
    #[arg(long)]
    view: Option<String>,

    /// Allow linking to elements whose id was generated.
    #[arg(long)]
    allow_generated: bool,

    /// Render the label as text followed by a small `[link]`.
    #[arg(long)]
    small: bool,

    /// Resolve hrefs inside the combined view of this root page.
    #[arg(long, value_name = "ROOT")]
    combined: Option<String>,
}

impl LinkArgs {
    pub(crate) fn execute(&self, global: &GlobalArgs, output: &Output) -> Result<(), CliError> {
        let site = Site::load(global, CliSettings::default())?;
        output.document(&self.render(&site)?);
        Ok(())
    }

    fn request(&self, site: &Site) -> LinkRequest {
        let mut request = match &self.to {
            Some(to) => LinkRequest::to_page(site.page_ref(to)),
            None => LinkRequest::current_page(),
        };
        if let Some(element) = &self.element {
            request = request.element(element.as_str());
        }
        if let Some(anchor) = &self.anchor {
            request = request.anchor(anchor.as_str());
        }
        if let Some(view) = &self.view {
            request = request.view(view.as_str());
        }
        request.allow_generated_element(self.allow_generated).small(self.small)
    }

    fn render(&self, site: &Site) -> Result<String, CliError> {
        let from = site.capture(&self.from, CaptureLevel::Body)?;
        let mut ctx = site.context().with_current_page(from);
        if let Some(root) = &self.combined {
            site.activate_index(&mut ctx, root)?;
        }

        let mut html = String::new();
        self.request(site).write_html(&mut ctx, &mut html)?;
        Ok(html)
    }
}
