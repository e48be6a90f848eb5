//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.content`
//! - `site.context_path`

mod expand;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use folio_model::{CaptureLevel, ElementKind};
use folio_render::{CssClasses, CssTarget, DEFAULT_VIEW_NAME, View, ViewGroup, ViewRegistry};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content graph file.
    pub content: Option<PathBuf>,
    /// Override URL prefix for cross-document hrefs.
    pub context_path: Option<String>,
    /// Override domain of books declared without one.
    pub default_domain: Option<String>,
    /// Override navigation depth limit.
    pub max_depth: Option<usize>,
    /// Override element inclusion in navigation trees.
    pub include_elements: Option<bool>,
    /// Override capture level.
    pub capture_level: Option<CaptureLevel>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Default content graph file, relative to the config directory.
const DEFAULT_CONTENT: &str = "content.yaml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration (strings as written in TOML).
    site: SiteConfigRaw,
    /// Render configuration (capture level unparsed).
    render: RenderConfigRaw,
    /// Views registered next to the default view.
    pub views: Vec<ViewConfig>,
    /// Static CSS classes keyed by node tag.
    css: CssConfigRaw,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Resolved render configuration (set after loading).
    #[serde(skip)]
    pub render_resolved: RenderConfig,
    /// Resolved CSS classes (set after loading).
    #[serde(skip)]
    pub css_resolved: CssConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    content: Option<String>,
    context_path: Option<String>,
    default_domain: Option<String>,
}

/// Resolved site configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Content graph YAML file.
    pub content: PathBuf,
    /// URL prefix for cross-document hrefs; empty or `/`-prefixed.
    pub context_path: String,
    /// Domain of books declared without one.
    pub default_domain: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RenderConfigRaw {
    max_depth: Option<usize>,
    include_elements: Option<bool>,
    yui_config: Option<bool>,
    capture_level: Option<String>,
}

/// Resolved render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Navigation depth limit, 0 for unlimited.
    pub max_depth: usize,
    /// Whether navigation trees list page elements.
    pub include_elements: bool,
    /// Whether navigation items carry `yuiConfig` attributes.
    pub yui_config: bool,
    pub capture_level: CaptureLevel,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 0,
            include_elements: false,
            yui_config: false,
            capture_level: CaptureLevel::Body,
        }
    }
}

/// A `[[views]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    /// Name used in the `view` request parameter.
    pub name: String,
    /// Display name; defaults to `name`.
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub group: ViewGroup,
    #[serde(default = "default_true")]
    pub allow_robots: bool,
    #[serde(default = "default_true")]
    pub applies_globally: bool,
    /// Element kind a page must contain for the view to apply.
    #[serde(default)]
    pub requires: Option<ElementKind>,
}

fn default_true() -> bool {
    true
}

impl ViewConfig {
    /// Build the render-side view.
    #[must_use]
    pub fn to_view(&self) -> View {
        let display = self.display.as_deref().unwrap_or(&self.name);
        let view = View::new(self.name.as_str(), display)
            .group(self.group)
            .allow_robots(self.allow_robots)
            .applies_globally(self.applies_globally);
        match self.requires {
            Some(kind) => view.requires(kind),
            None => view,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CssConfigRaw {
    list_items: BTreeMap<String, String>,
    links: BTreeMap<String, String>,
}

/// Resolved CSS classes, in key order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CssConfig {
    /// Classes of `<li>` elements in trees.
    pub list_items: Vec<(CssTarget, String)>,
    /// Classes of `<a>` elements.
    pub links: Vec<(CssTarget, String)>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.content`").
        field: String,
        /// Error message (e.g., "${`CONTENT_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Parse CSS class keys into targets.
fn parse_css_targets(
    classes: &BTreeMap<String, String>,
    section: &str,
) -> Result<Vec<(CssTarget, String)>, ConfigError> {
    classes
        .iter()
        .map(|(key, class)| {
            key.parse::<CssTarget>()
                .map(|target| (target, class.clone()))
                .map_err(|e| ConfigError::Validation(format!("css.{section}: {e}")))
        })
        .collect()
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated again after they are applied.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or a value is invalid.
    pub fn load(config_path: Option<&Path>, cli_settings: Option<&CliSettings>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir().ok().and_then(|cwd| discover_config(&cwd)) {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content) = &settings.content {
            self.site_resolved.content.clone_from(content);
        }
        if let Some(context_path) = &settings.context_path {
            self.site_resolved.context_path.clone_from(context_path);
        }
        if let Some(default_domain) = &settings.default_domain {
            self.site_resolved.default_domain.clone_from(default_domain);
        }
        if let Some(max_depth) = settings.max_depth {
            self.render_resolved.max_depth = max_depth;
        }
        if let Some(include_elements) = settings.include_elements {
            self.render_resolved.include_elements = include_elements;
        }
        if let Some(capture_level) = settings.capture_level {
            self.render_resolved.capture_level = capture_level;
        }
    }

    /// Registry holding the default view and every configured view.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for empty, duplicate or reserved names.
    pub fn view_registry(&self) -> Result<ViewRegistry, ConfigError> {
        let mut registry = ViewRegistry::new();
        for view in &self.views {
            require_non_empty(&view.name, "views.name")?;
            registry.register(view.to_view()).map_err(|e| {
                if view.name == DEFAULT_VIEW_NAME {
                    ConfigError::Validation(format!("view \"{DEFAULT_VIEW_NAME}\" is built in and cannot be redeclared"))
                } else {
                    ConfigError::Validation(e.to_string())
                }
            })?;
        }
        Ok(registry)
    }

    /// CSS classes from the `[css.*]` tables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` when two keys name the same target.
    pub fn css_classes(&self) -> Result<CssClasses, ConfigError> {
        let mut css = CssClasses::new();
        for (target, class) in &self.css_resolved.list_items {
            css.add_list_item_class(*target, class.as_str())
                .map_err(|e| ConfigError::Validation(format!("css.list_items: {e}")))?;
        }
        for (target, class) in &self.css_resolved.links {
            css.add_link_class(*target, class.as_str())
                .map_err(|e| ConfigError::Validation(format!("css.links: {e}")))?;
        }
        Ok(css)
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            render: RenderConfigRaw::default(),
            views: Vec::new(),
            css: CssConfigRaw::default(),
            site_resolved: SiteConfig {
                content: base.join(DEFAULT_CONTENT),
                context_path: String::new(),
                default_domain: "localhost".to_owned(),
            },
            render_resolved: RenderConfig::default(),
            css_resolved: CssConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_views()?;
        self.css_classes()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        let context_path = &self.site_resolved.context_path;
        if !context_path.is_empty() && !context_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "site.context_path must start with /: {context_path}"
            )));
        }
        if context_path.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "site.context_path must not end with /: {context_path}"
            )));
        }
        require_non_empty(&self.site_resolved.default_domain, "site.default_domain")
    }

    fn validate_views(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for view in &self.views {
            if !names.insert(view.name.as_str()) {
                return Err(ConfigError::Validation(format!("duplicate view name: {}", view.name)));
            }
        }
        self.view_registry().map(drop)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref content) = self.site.content {
            self.site.content = Some(expand::expand_env(content, "site.content")?);
        }
        if let Some(ref context_path) = self.site.context_path {
            self.site.context_path = Some(expand::expand_env(context_path, "site.context_path")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory and parse typed values.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        self.site_resolved = SiteConfig {
            content: config_dir.join(self.site.content.as_deref().unwrap_or(DEFAULT_CONTENT)),
            context_path: self.site.context_path.clone().unwrap_or_default(),
            default_domain: self
                .site
                .default_domain
                .clone()
                .unwrap_or_else(|| "localhost".to_owned()),
        };

        let defaults = RenderConfig::default();
        let capture_level = match self.render.capture_level.as_deref() {
            Some(level) => level
                .parse::<CaptureLevel>()
                .map_err(|e| ConfigError::Validation(format!("render.capture_level: {e}")))?,
            None => defaults.capture_level,
        };
        self.render_resolved = RenderConfig {
            max_depth: self.render.max_depth.unwrap_or(defaults.max_depth),
            include_elements: self.render.include_elements.unwrap_or(defaults.include_elements),
            yui_config: self.render.yui_config.unwrap_or(defaults.yui_config),
            capture_level,
        };

        self.css_resolved = CssConfig {
            list_items: parse_css_targets(&self.css.list_items, "list_items")?,
            links: parse_css_targets(&self.css.links, "links")?,
        };

        Ok(())
    }
}

/// Search for config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_model::{BookRef, PageBuilder, PageRef};
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml: &str, base: &Path) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(base).unwrap();
        config
    }

    fn write_config(dir: &Path, toml: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, toml).unwrap();
        path
    }

    fn assert_validation_error(config: &Config, expected: &[&str]) {
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "unexpected error: {err}");
        let msg = err.to_string();
        for part in expected {
            assert!(msg.contains(part), "expected {part:?} in {msg:?}");
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));

        assert_eq!(
            config.site_resolved,
            SiteConfig {
                content: PathBuf::from("/test/content.yaml"),
                context_path: String::new(),
                default_domain: "localhost".to_owned(),
            }
        );
        assert_eq!(config.render_resolved, RenderConfig::default());
        assert_eq!(config.render_resolved.capture_level, CaptureLevel::Body);
        assert!(config.views.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse("", Path::new("/test"));
        assert_eq!(config.site_resolved.content, PathBuf::from("/test/content.yaml"));
        assert_eq!(config.render_resolved.max_depth, 0);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[site]
content = "graph/site.yaml"
context_path = "/docs"
default_domain = "example.com"

[render]
max_depth = 3
include_elements = true
yui_config = true
capture_level = "meta"

[[views]]
name = "print"
display = "Print"
group = "fixed"
allow_robots = false

[[views]]
name = "figures"
requires = "figure"
applies_globally = false

[css.list_items]
page = "nav-page"
note = "nav-note"

[css.links]
node = "link"
"#;
        let config = parse(toml, Path::new("/srv"));

        assert_eq!(config.site_resolved.content, PathBuf::from("/srv/graph/site.yaml"));
        assert_eq!(config.site_resolved.context_path, "/docs");
        assert_eq!(config.site_resolved.default_domain, "example.com");
        assert_eq!(
            config.render_resolved,
            RenderConfig {
                max_depth: 3,
                include_elements: true,
                yui_config: true,
                capture_level: CaptureLevel::Meta,
            }
        );
        assert_eq!(config.views.len(), 2);
        assert_eq!(config.views[0].group, ViewGroup::Fixed);
        assert_eq!(config.views[1].requires, Some(ElementKind::Figure));
        assert!(config.views[1].allow_robots);
        assert_eq!(
            config.css_resolved.list_items,
            vec![
                (CssTarget::Kind(ElementKind::Note), "nav-note".to_owned()),
                (CssTarget::Page, "nav-page".to_owned()),
            ]
        );
        assert_eq!(config.css_resolved.links, vec![(CssTarget::Node, "link".to_owned())]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_view_registry_from_config() {
        let toml = r#"
[[views]]
name = "print"
display = "Print"
group = "fixed"

[[views]]
name = "outline"
allow_robots = false
"#;
        let config = parse(toml, Path::new("/test"));

        let registry = config.view_registry().unwrap();

        let names: Vec<&str> = registry.sorted().into_iter().map(View::name).collect();
        assert_eq!(names, vec!["content", "print", "outline"]);
        let outline = registry.get("outline").unwrap();
        assert_eq!(outline.display(), "outline");
        let page = PageBuilder::new(PageRef::new(BookRef::new("example.com", ""), "/p"), "P").build();
        assert!(!outline.allows_robots(&page));
        assert_eq!(registry.get("print").unwrap().view_group(), ViewGroup::Fixed);
    }

    #[test]
    fn test_css_classes_from_config() {
        let toml = r#"
[css.list_items]
section = "nav-section"
"#;
        let config = parse(toml, Path::new("/test"));
        let css = config.css_classes().unwrap();

        let mut builder = PageBuilder::new(PageRef::new(BookRef::new("example.com", ""), "/p"), "P");
        builder
            .add_element(None, folio_model::ElementSpec::new(ElementKind::Note, "N"))
            .unwrap();
        let page = std::sync::Arc::new(builder.build());
        let note = folio_model::Node::Element(page, 0);

        assert_eq!(css.list_item_class(&note).as_deref(), Some("nav-section"));
        assert_eq!(css.link_class(&note), None);
    }

    #[test]
    fn test_invalid_capture_level() {
        let mut config: Config = toml::from_str("[render]\ncapture_level = \"everything\"").unwrap();
        let err = config.resolve(Path::new("/test")).unwrap_err();
        assert!(err.to_string().contains("render.capture_level"));
    }

    #[test]
    fn test_invalid_css_target() {
        let mut config: Config = toml::from_str("[css.links]\nwidget = \"w\"").unwrap();
        let err = config.resolve(Path::new("/test")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("css.links"));
        assert!(err.to_string().contains("widget"));
    }

    #[test]
    fn test_validate_duplicate_css_target() {
        let config = parse("[css.links]\npage = \"a\"\nPage = \"b\"", Path::new("/test"));
        assert_validation_error(&config, &["css.links", "page"]);
    }

    #[test]
    fn test_validate_context_path_without_leading_slash() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.context_path = "docs".to_owned();
        assert_validation_error(&config, &["site.context_path", "start"]);
    }

    #[test]
    fn test_validate_context_path_with_trailing_slash() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.context_path = "/docs/".to_owned();
        assert_validation_error(&config, &["site.context_path", "end"]);

        config.site_resolved.context_path = "/".to_owned();
        assert_validation_error(&config, &["site.context_path"]);
    }

    #[test]
    fn test_validate_default_domain_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.default_domain = String::new();
        assert_validation_error(&config, &["site.default_domain", "empty"]);
    }

    #[test]
    fn test_validate_duplicate_view() {
        let config = parse("[[views]]\nname = \"print\"\n[[views]]\nname = \"print\"", Path::new("/test"));
        assert_validation_error(&config, &["duplicate", "print"]);
    }

    #[test]
    fn test_validate_default_view_redeclared() {
        let config = parse("[[views]]\nname = \"content\"", Path::new("/test"));
        assert_validation_error(&config, &["content", "built in"]);
    }

    #[test]
    fn test_validate_empty_view_name() {
        let config = parse("[[views]]\nname = \"\"", Path::new("/test"));
        assert_validation_error(&config, &["views.name", "empty"]);
    }

    #[test]
    fn test_unknown_view_group_fails_parse() {
        let result: Result<Config, _> = toml::from_str("[[views]]\nname = \"x\"\ngroup = \"sideways\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let settings = CliSettings {
            content: Some(PathBuf::from("/other/graph.yaml")),
            context_path: Some("/site".to_owned()),
            max_depth: Some(2),
            include_elements: Some(true),
            capture_level: Some(CaptureLevel::Page),
            ..CliSettings::default()
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.site_resolved.content, PathBuf::from("/other/graph.yaml"));
        assert_eq!(config.site_resolved.context_path, "/site");
        assert_eq!(config.site_resolved.default_domain, "localhost");
        assert_eq!(config.render_resolved.max_depth, 2);
        assert!(config.render_resolved.include_elements);
        assert!(!config.render_resolved.yui_config);
        assert_eq!(config.render_resolved.capture_level, CaptureLevel::Page);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.site_resolved.content, PathBuf::from("/test/content.yaml"));
        assert_eq!(config.render_resolved, RenderConfig::default());
    }

    #[test]
    fn test_expand_env_vars_site() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("FOLIO_TEST_CONTENT_DIR", "/data");
            std::env::remove_var("FOLIO_TEST_CONTEXT");
        }
        let toml = r#"
[site]
content = "${FOLIO_TEST_CONTENT_DIR}/graph.yaml"
context_path = "${FOLIO_TEST_CONTEXT:-/docs}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve(Path::new("/test")).unwrap();

        assert_eq!(config.site_resolved.content, PathBuf::from("/data/graph.yaml"));
        assert_eq!(config.site_resolved.context_path, "/docs");

        unsafe {
            std::env::remove_var("FOLIO_TEST_CONTENT_DIR");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FOLIO_TEST_MISSING_CONTEXT");
        }
        let mut config: Config = toml::from_str("[site]\ncontext_path = \"${FOLIO_TEST_MISSING_CONTEXT}\"").unwrap();

        let err = config.expand_env_vars().unwrap_err();

        match err {
            ConfigError::EnvVar { field, message } => {
                assert_eq!(field, "site.context_path");
                assert!(message.contains("FOLIO_TEST_MISSING_CONTEXT"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[site]\ncontent = \"graph.yaml\"\ncontext_path = \"/docs\"\n[render]\nmax_depth = 4\n",
        );

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site_resolved.content, dir.path().join("graph.yaml"));
        assert_eq!(config.site_resolved.context_path, "/docs");
        assert_eq!(config.render_resolved.max_depth, 4);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        let err = Config::load(Some(&missing), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(ref p) if *p == missing));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[site\ncontent = ");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[site]\ncontext_path = \"docs/\"\n");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_validates_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let settings = CliSettings {
            context_path: Some("/docs/".to_owned()),
            ..CliSettings::default()
        };

        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

        assert!(err.to_string().contains("site.context_path"));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_config(&nested), Some(path.clone()));
        assert_eq!(discover_config(dir.path()), Some(path));
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "");
        let nested = dir.path().join("sub");
        std::fs::create_dir_all(&nested).unwrap();
        let nearest = write_config(&nested, "");

        assert_eq!(discover_config(&nested), Some(nearest));
    }
}
