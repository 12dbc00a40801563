//! Configuration management for gfmx.
//!
//! Parses `gfmx.toml` files with serde. When no path is given the file is
//! discovered in the current directory or its parents; without any file the
//! defaults apply. CLI settings are applied last via [`CliSettings`].
//!
//! ```toml
//! [parse]
//! gfm = true
//! extensions = ["mention", "checkbox"]
//!
//! [render]
//! backend = "xhtml"
//! mention_url_template = "https://${FORGE_HOST:-github.com}/{handle}"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `render.mention_url_template` supports `${VAR}` (error if unset) and
//! `${VAR:-default}`.

mod expand;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use gfmx_engine::{BUILTIN_EXTENSIONS, ExtensionKind, HANDLE_PLACEHOLDER};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "gfmx.toml";

/// CLI settings that override configuration file values.
///
/// Only `Some` fields override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override GFM table, strikethrough and footnote support.
    pub gfm: Option<bool>,
    /// Override the output backend.
    pub backend: Option<Backend>,
    /// Override the mention URL template.
    pub mention_url_template: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Parser configuration.
    pub parse: ParseConfig,
    /// Renderer configuration.
    pub render: RenderConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Parser configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Enable GFM tables, strikethrough and footnotes.
    pub gfm: bool,
    /// Extension identifiers in priority order.
    pub extensions: Vec<String>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            extensions: BUILTIN_EXTENSIONS
                .iter()
                .map(|kind| kind.name().to_owned())
                .collect(),
        }
    }
}

impl ParseConfig {
    /// Resolve extension identifiers to kinds, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for an unknown or repeated identifier.
    pub fn extension_kinds(&self) -> Result<Vec<ExtensionKind>, ConfigError> {
        let mut kinds = Vec::with_capacity(self.extensions.len());
        for name in &self.extensions {
            let kind = ExtensionKind::from_str(name)
                .map_err(|err| ConfigError::Validation(format!("parse.extensions: {err}")))?;
            if kinds.contains(&kind) {
                return Err(ConfigError::Validation(format!(
                    "parse.extensions lists {name} more than once"
                )));
            }
            kinds.push(kind);
        }
        Ok(kinds)
    }

    /// Whether the configured extensions are exactly the built-in set in order.
    #[must_use]
    pub fn uses_builtin_extensions(&self) -> bool {
        self.extensions
            .iter()
            .map(String::as_str)
            .eq(BUILTIN_EXTENSIONS.iter().map(|kind| kind.name()))
    }
}

/// Renderer configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output flavour.
    pub backend: Backend,
    /// URL template for mentions; `{handle}` is replaced with the handle.
    pub mention_url_template: Option<String>,
}

/// Output backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Compact HTML.
    #[default]
    Html,
    /// XHTML-compatible markup with self-closing void elements.
    Xhtml,
}

impl Backend {
    /// Identifier used in config files and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Xhtml => "xhtml",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Self::Html),
            "xhtml" => Ok(Self::Xhtml),
            other => Err(format!("unknown backend {other:?}, expected html or xhtml")),
        }
    }
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
        /// Config field path (e.g., "`render.mention_url_template`").
        field: String,
        /// Error message (e.g., "${`FORGE_HOST`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `gfmx.toml` in the current directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let start = std::env::current_dir().unwrap_or_default();
        Self::load_from(&start, config_path, cli_settings)
    }

    /// [`Config::load`] with discovery starting at `start` instead of the
    /// current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_from(
        start: &Path,
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = discover_config(start) {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(gfm) = settings.gfm {
            self.parse.gfm = gfm;
        }
        if let Some(backend) = settings.backend {
            self.render.backend = backend;
        }
        if let Some(template) = &settings.mention_url_template {
            self.render.mention_url_template = Some(template.clone());
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parse.extension_kinds()?;
        self.validate_render()?;
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        if let Some(template) = &self.render.mention_url_template
            && !template.contains(HANDLE_PLACEHOLDER)
        {
            return Err(ConfigError::Validation(format!(
                "render.mention_url_template must contain {HANDLE_PLACEHOLDER}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(template) = &self.render.mention_url_template {
            self.render.mention_url_template = Some(expand::expand_env(
                template,
                "render.mention_url_template",
            )?);
        }
        Ok(())
    }
}

/// Search for the config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.parse.gfm);
        assert_eq!(config.parse.extensions, vec!["mention", "checkbox"]);
        assert_eq!(config.render.backend, Backend::Html);
        assert_eq!(config.render.mention_url_template, None);
        assert!(config.parse.uses_builtin_extensions());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.parse.gfm);
        assert_eq!(config.parse.extensions.len(), 2);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[parse]
gfm = false
extensions = ["checkbox"]

[render]
backend = "xhtml"
mention_url_template = "https://example.com/{handle}"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.parse.gfm);
        assert_eq!(
            config.parse.extension_kinds().unwrap(),
            vec![ExtensionKind::Checkbox]
        );
        assert!(!config.parse.uses_builtin_extensions());
        assert_eq!(config.render.backend, Backend::Xhtml);
        assert_eq!(
            config.render.mention_url_template.as_deref(),
            Some("https://example.com/{handle}")
        );
    }

    #[test]
    fn test_parse_unknown_backend_fails() {
        let result: Result<Config, _> = toml::from_str("[render]\nbackend = \"pdf\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("xhtml".parse::<Backend>(), Ok(Backend::Xhtml));
        assert_eq!("html".parse::<Backend>(), Ok(Backend::Html));
        assert!("HTML".parse::<Backend>().is_err());
        assert_eq!(Backend::Xhtml.to_string(), "xhtml");
    }

    #[test]
    fn test_extension_order_is_kept() {
        let parse = ParseConfig {
            gfm: true,
            extensions: vec!["checkbox".to_owned(), "mention".to_owned()],
        };
        assert_eq!(
            parse.extension_kinds().unwrap(),
            vec![ExtensionKind::Checkbox, ExtensionKind::Mention]
        );
        assert!(!parse.uses_builtin_extensions());
    }

    #[test]
    fn test_validate_unknown_extension() {
        let mut config = Config::default();
        config.parse.extensions.push("emoji".to_owned());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("emoji"));
    }

    #[test]
    fn test_validate_duplicate_extension() {
        let mut config = Config::default();
        config.parse.extensions.push("mention".to_owned());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_empty_extensions_is_valid() {
        let mut config = Config::default();
        config.parse.extensions.clear();
        config.validate().unwrap();
        assert!(config.parse.extension_kinds().unwrap().is_empty());
    }

    #[test]
    fn test_validate_template_without_placeholder() {
        let mut config = Config::default();
        config.render.mention_url_template = Some("https://example.com/users".to_owned());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("{handle}"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            gfm: Some(false),
            backend: Some(Backend::Xhtml),
            mention_url_template: Some("/u/{handle}".to_owned()),
        });
        assert!(!config.parse.gfm);
        assert_eq!(config.render.backend, Backend::Xhtml);
        assert_eq!(
            config.render.mention_url_template.as_deref(),
            Some("/u/{handle}")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.render.mention_url_template = Some("/u/{handle}".to_owned());
        config.apply_cli_settings(&CliSettings::default());
        assert!(config.parse.gfm);
        assert_eq!(config.render.backend, Backend::Html);
        assert_eq!(
            config.render.mention_url_template.as_deref(),
            Some("/u/{handle}")
        );
    }

    #[test]
    fn test_load_explicit_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::load_from(dir.path(), Some(&missing), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(path) if path == missing));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[render]\nbackend = \"xhtml\"\n").unwrap();

        let config = Config::load_from(dir.path(), Some(&path), None).unwrap();
        assert_eq!(config.render.backend, Backend::Xhtml);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_discovers_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[parse]\ngfm = false\n");
        let nested = dir.path().join("docs").join("guides");
        fs::create_dir_all(&nested).unwrap();

        let config = Config::load_from(&nested, None, None).unwrap();
        assert!(!config.parse.gfm);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path(), None, None).unwrap();
        assert_eq!(config.config_path, None);
        assert_eq!(config.render.backend, Backend::Html);
    }

    #[test]
    fn test_load_applies_cli_settings_last() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "[render]\nbackend = \"xhtml\"\nmention_url_template = \"/a/{handle}\"\n",
        );
        let settings = CliSettings {
            backend: Some(Backend::Html),
            ..CliSettings::default()
        };

        let config = Config::load_from(dir.path(), None, Some(&settings)).unwrap();
        assert_eq!(config.render.backend, Backend::Html);
        assert_eq!(
            config.render.mention_url_template.as_deref(),
            Some("/a/{handle}")
        );
    }

    #[test]
    fn test_load_rejects_cli_template_without_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CliSettings {
            mention_url_template: Some("/people".to_owned()),
            ..CliSettings::default()
        };
        let err = Config::load_from(dir.path(), None, Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[parse\ngfm = true\n");
        let err = Config::load_from(dir.path(), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_expands_template() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("GFMX_CONFIG_FORGE", "git.example.com");
        }
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "[render]\nmention_url_template = \"https://${GFMX_CONFIG_FORGE}/{handle}\"\n",
        );

        let config = Config::load_from(dir.path(), None, None).unwrap();
        assert_eq!(
            config.render.mention_url_template.as_deref(),
            Some("https://git.example.com/{handle}")
        );
        unsafe {
            std::env::remove_var("GFMX_CONFIG_FORGE");
        }
    }

    #[test]
    fn test_load_missing_env_var() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::remove_var("GFMX_CONFIG_MISSING");
        }
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "[render]\nmention_url_template = \"https://${GFMX_CONFIG_MISSING}/{handle}\"\n",
        );

        let err = Config::load_from(dir.path(), None, None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EnvVar { ref field, .. } if field == "render.mention_url_template"
        ));
    }
}
