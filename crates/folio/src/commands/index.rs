//! `folio index` command implementation.

use std::fmt::Write as _;

use clap::Args;
use folio_config::CliSettings;
use folio_render::{PageIndex, RenderError, ref_id};

use super::{GlobalArgs, Site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the index command.
#[derive(Args)]
pub(crate) struct IndexArgs {
    /// Root page (`PATH` or `BOOK:PATH`).
    root: String,
}

impl IndexArgs {
    pub(crate) fn execute(&self, global: &GlobalArgs, output: &Output) -> Result<(), CliError> {
        let site = Site::load(global, CliSettings::default())?;
        output.document(&self.render(&site)?);
        Ok(())
    }

    /// One `pageN<TAB>ref<TAB>title` line per indexed page.
    fn render(&self, site: &Site) -> Result<String, CliError> {
        let index = PageIndex::build(site.source(), &site.page_ref(&self.root)).map_err(RenderError::from)?;
        let mut out = String::new();
        for (position, page) in index.pages().iter().enumerate() {
            let _ = writeln!(out, "{}\t{}\t{}", ref_id(Some(position), ""), page.page_ref(), page.title());
        }
        Ok(out)
    }
}
