//! `gfmx render` command implementation.

use std::path::PathBuf;

use clap::Args;
use gfmx_config::{Backend, CliSettings, Config};
use gfmx_engine::{
    HtmlBackend, MarkdownRenderer, Parser, Registry, RenderBackend, RenderOptions, XhtmlBackend,
};

use crate::commands::{read_input, registry_for};
use crate::error::CliError;
use crate::output::{Output, write_stdout};

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin).
    input: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover gfmx.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output backend: html or xhtml (overrides config).
    #[arg(long)]
    backend: Option<Backend>,

    /// URL template for mentions, e.g. `https://github.com/{handle}` (overrides config).
    #[arg(long, env = "GFMX_MENTION_URL_TEMPLATE")]
    mention_url_template: Option<String>,

    /// Disable GFM tables, strikethrough and footnotes.
    #[arg(long)]
    no_gfm: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or input/output cannot be accessed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            gfm: self.no_gfm.then_some(false),
            backend: self.backend,
            mention_url_template: self.mention_url_template,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let source = read_input(self.input.as_deref())?;
        let registry = registry_for(&config.parse)?;
        let html = render_markdown(&source, &registry, &config);

        match self.output {
            Some(path) => {
                std::fs::write(&path, html)?;
                Output::new().success(&format!("Wrote {}", path.display()));
            }
            None => write_stdout(&html)?,
        }
        Ok(())
    }
}

/// Parse and render `source` with the configured backend.
pub(crate) fn render_markdown(source: &str, registry: &Registry, config: &Config) -> String {
    match config.render.backend {
        Backend::Html => render_with::<HtmlBackend>(source, registry, config),
        Backend::Xhtml => render_with::<XhtmlBackend>(source, registry, config),
    }
}

fn render_with<B: RenderBackend>(source: &str, registry: &Registry, config: &Config) -> String {
    let document = Parser::new(registry)
        .with_gfm(config.parse.gfm)
        .parse(source);
    let options = RenderOptions {
        mention_url_template: config.render.mention_url_template.clone(),
    };
    MarkdownRenderer::<B>::new(registry)
        .with_options(options)
        .render(&document)
}

#[cfg(test)]
mod tests {
    use gfmx_engine::{ExtensionKind, global_registry};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_default_config() {
        let html = render_markdown("hi @bob", global_registry(), &Config::default());
        assert_eq!(html, r#"<p>hi <span class="mention">@bob</span></p>"#);
    }

    #[test]
    fn test_render_with_template() {
        let mut config = Config::default();
        config.render.mention_url_template = Some("/users/{handle}".to_owned());
        let html = render_markdown("@bob said hi", global_registry(), &config);
        assert_eq!(
            html,
            r#"<p><a class="mention" href="/users/bob">@bob</a> said hi</p>"#
        );
    }

    #[test]
    fn test_render_xhtml_backend() {
        let mut config = Config::default();
        config.render.backend = Backend::Xhtml;
        let html = render_markdown("- [x] done\n\n---\n", global_registry(), &config);
        assert!(html.contains(r#"<input type="checkbox" checked="" disabled="" />"#));
        assert!(html.contains("<hr />"));
    }

    #[test]
    fn test_render_without_gfm_leaves_tables_as_text() {
        let mut config = Config::default();
        config.parse.gfm = false;
        let html = render_markdown("| a |\n|---|\n| 1 |\n", global_registry(), &config);
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_render_with_checkbox_only_registry() {
        let registry = Registry::with_extensions([ExtensionKind::Checkbox]);
        let html = render_markdown("- [ ] ping @bob", &registry, &Config::default());
        assert!(html.contains(r#"<li class="task-list-item">"#));
        assert!(!html.contains("mention"));
        assert!(html.contains("ping @bob"));
    }
}
