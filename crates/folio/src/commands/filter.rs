//! `folio filter` command implementation.

use clap::Args;
use folio_config::CliSettings;
use folio_model::{CaptureLevel, ElementKind};
use folio_render::{ElementFilterTree, KindFilter};

use super::{GlobalArgs, Site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the filter command.
#[derive(Args)]
pub(crate) struct FilterArgs {
    /// Root page (`PATH` or `BOOK:PATH`).
    root: String,

    /// Element kind to keep (section, aside, heading, figure, table, file, code, note, other).
    #[arg(long)]
    kind: ElementKind,

    /// List matching elements, not just the pages holding them (overrides config).
    #[arg(long)]
    include_elements: bool,
}

impl FilterArgs {
    pub(crate) fn execute(&self, global: &GlobalArgs, output: &Output) -> Result<(), CliError> {
        let settings = CliSettings {
            include_elements: self.include_elements.then_some(true),
            ..CliSettings::default()
        };
        let site = Site::load(global, settings)?;
        output.document(&self.render(&site)?);
        Ok(())
    }

    fn render(&self, site: &Site) -> Result<String, CliError> {
        let root = site.capture(&self.root, CaptureLevel::Meta)?;
        let tree = ElementFilterTree::new(root, KindFilter::new(self.kind))
            .include_elements(site.config().render_resolved.include_elements);
        let mut html = String::new();
        tree.write_html(&mut site.context(), &mut html)?;
        Ok(html)
    }
}
