//! `folio combined` command implementation.

use clap::Args;
use folio_config::CliSettings;
use folio_render::write_combined;

use super::{GlobalArgs, Site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the combined command.
#[derive(Args)]
pub(crate) struct CombinedArgs {
    /// Root page (`PATH` or `BOOK:PATH`).
    root: String,
}

impl CombinedArgs {
    pub(crate) fn execute(&self, global: &GlobalArgs, output: &Output) -> Result<(), CliError> {
        let site = Site::load(global, CliSettings::default())?;
        output.document(&self.render(&site)?);
        Ok(())
    }

    fn render(&self, site: &Site) -> Result<String, CliError> {
        let mut html = String::new();
        let index = write_combined(&mut site.context(), &site.page_ref(&self.root), &mut html)?;
        tracing::info!(root = %index.root_page().page_ref(), pages = index.len(), "Rendered combined view");
        Ok(html)
    }
}
