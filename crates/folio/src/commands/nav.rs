//! `folio nav` command implementation.

use clap::Args;
use folio_config::CliSettings;
use folio_model::CaptureLevel;
use folio_render::NavigationTree;

use super::{GlobalArgs, Site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Root page (`PATH` or `BOOK:PATH`).
    root: String,

    /// Render the root's children as top-level items.
    #[arg(long)]
    skip_root: bool,

    /// List page elements below each page (overrides config).
    #[arg(long)]
    include_elements: bool,

    /// Maximum tree depth, 0 for unlimited (overrides config).
    #[arg(long)]
    max_depth: Option<usize>,

    /// Page to mark as the current page.
    #[arg(long)]
    this_page: Option<String>,

    /// Only show branches linking to this page.
    #[arg(long)]
    links_to: Option<String>,

    /// `target` attribute of every link.
    #[arg(long)]
    target: Option<String>,

    /// Add `yuiConfig` attributes to list items (overrides config).
    #[arg(long)]
    yui: bool,

    /// Print the tree as JSON instead of HTML.
    #[arg(long)]
    json: bool,

    /// Link to `#pageN` anchors of the root's combined view.
    #[arg(long)]
    combined: bool,
}

impl NavArgs {
    pub(crate) fn execute(&self, global: &GlobalArgs, output: &Output) -> Result<(), CliError> {
        let settings = CliSettings {
            max_depth: self.max_depth,
            include_elements: self.include_elements.then_some(true),
            ..CliSettings::default()
        };
        let site = Site::load(global, settings)?;
        output.document(&self.render(&site)?);
        Ok(())
    }

    fn tree(&self, site: &Site) -> Result<NavigationTree, CliError> {
        let render = &site.config().render_resolved;
        let mut tree = NavigationTree::new(site.capture(&self.root, CaptureLevel::Meta)?)
            .skip_root(self.skip_root)
            .include_elements(render.include_elements)
            .max_depth(render.max_depth)
            .yui_config(self.yui || render.yui_config);
        if let Some(page) = &self.this_page {
            tree = tree.this_page(site.page_ref(page));
        }
        if let Some(page) = &self.links_to {
            tree = tree.links_to(site.page_ref(page));
        }
        if let Some(target) = &self.target {
            tree = tree.target(target.as_str());
        }
        Ok(tree)
    }

    fn render(&self, site: &Site) -> Result<String, CliError> {
        let tree = self.tree(site)?;
        let mut ctx = site.context();
        if self.combined {
            site.activate_index(&mut ctx, &self.root)?;
        }

        if self.json {
            return Ok(serde_json::to_string_pretty(&tree.items(&mut ctx)?)?);
        }
        let mut html = String::new();
        tree.write_html(&mut ctx, &mut html)?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::commands::testing;

    fn args(root: &str) -> NavArgs {
        NavArgs {
            root: root.to_owned(),
            skip_root: false,
            include_elements: false,
            max_depth: None,
            this_page: None,
            links_to: None,
            target: None,
            yui: false,
            json: false,
            combined: false,
        }
    }

    #[test]
    fn test_render_html() {
        let site = testing::site();

        let html = args("docs:/index").render(&site).unwrap();

        assert_eq!(
            html,
            "<ul>\n\
             <li class=\"expanded\"><a href=\"/docs/index\">Home</a>\n\
             <ul>\n\
             <li><a href=\"/docs/intro\">Introduction</a></li>\n\
             <li><a href=\"/docs/guide\">Guide (short)</a></li>\n\
             </ul>\n\
             </li>\n\
             </ul>\n"
        );
    }

    #[test]
    fn test_render_links_to_and_combined() {
        let site = testing::site();
        let args = NavArgs {
            links_to: Some("docs:/intro".to_owned()),
            combined: true,
            ..args("docs:/index")
        };

        let html = args.render(&site).unwrap();

        assert!(html.contains("href=\"#page3\">Guide (short)<sup>[3]</sup></a>"));
        assert!(!html.contains("Introduction"));
    }

    #[test]
    fn test_render_json() {
        let site = testing::site();
        let args = NavArgs {
            json: true,
            skip_root: true,
            ..args("docs:/index")
        };

        let json: serde_json::Value = serde_json::from_str(&args.render(&site).unwrap()).unwrap();

        assert_eq!(json[0]["title"], "Introduction");
        assert_eq!(json[0]["href"], "/docs/intro");
        assert_eq!(json[1]["title"], "Guide (short)");
        assert_eq!(json.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_render_missing_root_fails() {
        let site = testing::site();
        assert!(args("docs:/nope").render(&site).is_err());
    }
}
