//! CLI command implementations.

pub(crate) mod combined;
pub(crate) mod filter;
pub(crate) mod index;
pub(crate) mod link;
pub(crate) mod nav;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_model::{BookRef, CaptureLevel, ContentSource, MemorySource, Page, PageRef};
use folio_render::{CssClasses, PageIndex, RenderContext, RenderError, ViewRegistry};

use crate::error::CliError;

pub(crate) use combined::CombinedArgs;
pub(crate) use filter::FilterArgs;
pub(crate) use index::IndexArgs;
pub(crate) use link::LinkArgs;
pub(crate) use nav::NavArgs;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Content graph YAML file (overrides config).
    #[arg(long, global = true, env = "FOLIO_CONTENT")]
    content: Option<PathBuf>,

    /// URL prefix for cross-document hrefs (overrides config).
    #[arg(long, global = true)]
    pub(crate) context_path: Option<String>,

    /// Domain of books given without one (overrides config).
    #[arg(long, global = true)]
    domain: Option<String>,

    /// Capture level: none, meta, page or body (overrides config).
    #[arg(long, global = true)]
    capture_level: Option<CaptureLevel>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,
}

impl GlobalArgs {
    /// Merge global overrides into command-specific settings.
    fn apply(&self, settings: CliSettings) -> CliSettings {
        CliSettings {
            content: self.content.clone(),
            context_path: self.context_path.clone(),
            default_domain: self.domain.clone(),
            capture_level: self.capture_level,
            ..settings
        }
    }
}

/// Loaded configuration and content, shared by one command run.
pub(crate) struct Site {
    config: Config,
    source: MemorySource,
    views: ViewRegistry,
    css: CssClasses,
}

impl Site {
    /// Load configuration and the content graph it points at.
    pub(crate) fn load(global: &GlobalArgs, settings: CliSettings) -> Result<Self, CliError> {
        let settings = global.apply(settings);
        let config = Config::load(global.config.as_deref(), Some(&settings))?;
        let site = &config.site_resolved;
        let source = MemorySource::from_yaml_file(&site.content, &site.default_domain)?;
        tracing::info!(content = %site.content.display(), pages = source.page_count(), "Loaded site");
        Self::from_parts(config, source)
    }

    pub(crate) fn from_parts(config: Config, source: MemorySource) -> Result<Self, CliError> {
        let views = config.view_registry()?;
        let css = config.css_classes()?;
        Ok(Self {
            config,
            source,
            views,
            css,
        })
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn source(&self) -> &MemorySource {
        &self.source
    }

    /// Fresh render context at the configured level and context path.
    pub(crate) fn context(&self) -> RenderContext<'_> {
        RenderContext::new(&self.source, &self.views, &self.css)
            .with_level(self.config.render_resolved.capture_level)
            .with_context_path(self.config.site_resolved.context_path.as_str())
    }

    /// Page reference for a `PATH` or `BOOK:PATH` argument.
    pub(crate) fn page_ref(&self, arg: &str) -> PageRef {
        parse_page_arg(arg, &self.config.site_resolved.default_domain)
    }

    /// Capture the page named by a command argument.
    pub(crate) fn capture(&self, arg: &str, level: CaptureLevel) -> Result<Arc<Page>, CliError> {
        let page_ref = self.page_ref(arg);
        self.source
            .capture(&page_ref, level)
            .map_err(|e| CliError::Render(e.into()))
    }

    /// Activate the combined-view index of `root` on `ctx`.
    pub(crate) fn activate_index(&self, ctx: &mut RenderContext<'_>, root: &str) -> Result<(), CliError> {
        let index = PageIndex::build(&self.source, &self.page_ref(root)).map_err(RenderError::from)?;
        ctx.set_page_index(Some(Arc::new(index)));
        Ok(())
    }
}

/// Split `BOOK:PATH` at the first colon; a bare `PATH` is in the root book.
fn parse_page_arg(arg: &str, domain: &str) -> PageRef {
    let (prefix, path) = arg.split_once(':').unwrap_or(("", arg));
    PageRef::new(BookRef::new(domain, prefix), path)
}

#[cfg(test)]
pub(crate) mod testing {
    use folio_model::MemorySource;

    use super::Site;

    const CONTENT: &str = r#"
books:
  - prefix: /docs
    title: Docs
  - prefix: /internal
    accessible: false
pages:
  - book: /docs
    path: /index
    title: Home
    children: [/intro, /guide, { book: /internal, path: /secret }]
  - book: /docs
    path: /intro
    title: Introduction
    body: "<p>Hello</p>"
    elements:
      - kind: section
        id: setup
        label: Setup
        children:
          - { kind: figure, id: diagram, label: Diagram }
  - book: /docs
    path: /guide
    title: Guide
    short_title: Guide (short)
    links: [/intro]
  - book: /internal
    path: /secret
    title: Secret
"#;

    pub(crate) fn site() -> Site {
        let source = MemorySource::from_yaml_str(CONTENT, "localhost").unwrap();
        Site::from_parts(folio_config::Config::default(), source).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_page_arg_bare_path() {
        let page_ref = parse_page_arg("/intro", "example.com");
        assert_eq!(page_ref, PageRef::new(BookRef::new("example.com", ""), "/intro"));
    }

    #[test]
    fn test_parse_page_arg_with_book() {
        let page_ref = parse_page_arg("docs:intro", "example.com");
        assert_eq!(page_ref.book.prefix, "/docs");
        assert_eq!(page_ref.path, "/intro");
        assert_eq!(page_ref.to_string(), "example.com:/docs/intro");
    }

    #[test]
    fn test_global_args_override_settings() {
        let global = GlobalArgs {
            config: None,
            content: Some(PathBuf::from("graph.yaml")),
            context_path: Some("/site".to_owned()),
            domain: None,
            capture_level: Some(CaptureLevel::Meta),
            verbose: false,
        };
        let settings = global.apply(CliSettings {
            max_depth: Some(2),
            ..CliSettings::default()
        });

        assert_eq!(settings.content, Some(PathBuf::from("graph.yaml")));
        assert_eq!(settings.context_path.as_deref(), Some("/site"));
        assert_eq!(settings.max_depth, Some(2));
        assert_eq!(settings.capture_level, Some(CaptureLevel::Meta));
    }

    #[test]
    fn test_site_capture_missing_page() {
        let site = testing::site();
        let err = site.capture("docs:/missing", CaptureLevel::Meta).err().unwrap();
        assert_eq!(err.to_string(), "Page not found: localhost:/docs/missing");
    }
}
