//! Configuration management for mdoc.
//!
//! Parses `mdoc.toml` configuration files with serde and provides
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
//! - `server.host`
//! - `docs.base_path`
//! - `clidoc.output_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override external link checking.
    pub check_external: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdoc.toml";

/// Default delimiter line between concatenated articles.
pub const DEFAULT_ARTICLE_DELIMITER: &str = "<!-- split -->";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Link handling configuration.
    pub links: LinksConfig,
    /// Redirect table configuration.
    pub redirects: RedirectsConfig,
    /// Lint configuration.
    pub lint: LintConfig,
    /// CLI reference generation (paths are relative strings from TOML).
    clidoc: ClidocConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved CLI reference configuration (set after loading).
    #[serde(skip)]
    pub clidoc_resolved: ClidocConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    index_file: Option<String>,
    base_path: Option<String>,
    article_delimiter: Option<String>,
    exclude: Option<Vec<String>>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Clone)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Index page holding the navigation and redirect tables, relative to `source_dir`.
    pub index_file: String,
    /// URL prefix pages are published under (e.g. `/docs`).
    pub base_path: String,
    /// Line separating concatenated articles inside one file.
    pub article_delimiter: String,
    /// Glob patterns (relative to `source_dir`) of files to skip.
    pub exclude: Vec<String>,
}

impl DocsConfig {
    /// Absolute path of the index page.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.source_dir.join(&self.index_file)
    }

    fn with_base(base: &Path) -> Self {
        Self {
            source_dir: base.join("docs"),
            index_file: "index.md".to_owned(),
            base_path: "/docs".to_owned(),
            article_delimiter: DEFAULT_ARTICLE_DELIMITER.to_owned(),
            exclude: Vec::new(),
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

/// Link handling configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LinksConfig {
    /// Prefix of Discourse-style topic links (`/t/{slug}/{id}`).
    pub topic_prefix: String,
    /// Probe external links over HTTP during `check`.
    pub check_external: bool,
    /// Timeout for each external probe, in seconds.
    pub external_timeout_secs: u64,
    /// Glob patterns of external URLs that are never probed.
    pub ignore: Vec<String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            topic_prefix: "/t/".to_owned(),
            check_external: false,
            external_timeout_secs: 10,
            ignore: Vec::new(),
        }
    }
}

/// Redirect table configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RedirectsConfig {
    /// Maximum number of redirects followed while resolving a path.
    pub max_hops: usize,
}

impl Default for RedirectsConfig {
    fn default() -> Self {
        Self { max_hops: 10 }
    }
}

/// Lint configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LintConfig {
    /// Report pages that are missing from the navigation table.
    pub orphans: bool,
    /// Diagnostic codes to suppress (e.g. `"redirect-chain"`).
    pub disable: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            orphans: true,
            disable: Vec::new(),
        }
    }
}

/// Raw CLI reference configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ClidocConfigRaw {
    output_dir: Option<String>,
    skip_groups: Option<Vec<String>>,
}

/// Resolved CLI reference configuration.
#[derive(Debug, Clone)]
pub struct ClidocConfig {
    /// Directory the generated reference pages are written to.
    pub output_dir: PathBuf,
    /// Command groups that never get a page.
    pub skip_groups: Vec<String>,
}

impl ClidocConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            output_dir: base.join("docs/cli"),
            skip_groups: default_skip_groups(),
        }
    }
}

impl Default for ClidocConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

fn default_skip_groups() -> Vec<String> {
    vec!["local".to_owned(), "admin".to_owned()]
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Config file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`MDOC_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL path field to start with `/`.
fn require_absolute_url_path(value: &str, field: &str) -> Result<(), ConfigError> {
    if !value.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "{field} must start with '/'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
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
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(check_external) = settings.check_external {
            self.links.check_external = check_external;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            links: LinksConfig::default(),
            redirects: RedirectsConfig::default(),
            lint: LintConfig::default(),
            clidoc: ClidocConfigRaw::default(),
            docs_resolved: DocsConfig::with_base(base),
            clidoc_resolved: ClidocConfig::with_base(base),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_docs()?;
        self.validate_links()?;

        if self.redirects.max_hops == 0 {
            return Err(ConfigError::Validation(
                "redirects.max_hops must be at least 1".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 lets the OS pick a port, which is never what a config file means
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;
        require_non_empty(&docs.index_file, "docs.index_file")?;
        require_absolute_url_path(&docs.base_path, "docs.base_path")?;
        require_non_empty(&docs.article_delimiter, "docs.article_delimiter")?;

        for pattern in &docs.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                ConfigError::Validation(format!("docs.exclude pattern '{pattern}': {e}"))
            })?;
        }

        Ok(())
    }

    fn validate_links(&self) -> Result<(), ConfigError> {
        let prefix = &self.links.topic_prefix;
        require_absolute_url_path(prefix, "links.topic_prefix")?;
        if !prefix.ends_with('/') {
            return Err(ConfigError::Validation(
                "links.topic_prefix must end with '/'".to_owned(),
            ));
        }
        if self.links.external_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "links.external_timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        expand::expand_opt(&mut self.docs.base_path, "docs.base_path")?;
        expand::expand_opt(&mut self.clidoc.output_dir, "clidoc.output_dir")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));
        let defaults = DocsConfig::with_base(config_dir);

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            index_file: self.docs.index_file.clone().unwrap_or(defaults.index_file),
            base_path: self
                .docs
                .base_path
                .as_deref()
                .map_or(defaults.base_path, normalize_base_path),
            article_delimiter: self
                .docs
                .article_delimiter
                .clone()
                .unwrap_or(defaults.article_delimiter),
            exclude: self.docs.exclude.clone().unwrap_or_default(),
        };

        self.clidoc_resolved = ClidocConfig {
            output_dir: resolve(self.clidoc.output_dir.as_deref(), "docs/cli"),
            skip_groups: self
                .clidoc
                .skip_groups
                .clone()
                .unwrap_or_else(default_skip_groups),
        };
    }
}

/// Drop trailing slashes from a base path, keeping `/` for the site root.
fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/".to_owned()
    } else {
        trimmed.to_owned()
    }
}
