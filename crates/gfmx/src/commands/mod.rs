//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod tree;

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use gfmx_config::ParseConfig;
use gfmx_engine::{Registry, global_registry};

use crate::error::CliError;

pub(crate) use render::RenderArgs;
pub(crate) use tree::TreeArgs;

/// Read markdown from `path`, or from stdin when `path` is `None` or `-`.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| CliError::Input {
                path: path.display().to_string(),
                source,
            })
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin().lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Registry holding the configured extensions.
///
/// The process-wide registry is shared when the configuration asks for
/// exactly the built-in extensions; any other list gets its own registry.
pub(crate) fn registry_for(parse: &ParseConfig) -> Result<Cow<'static, Registry>, CliError> {
    if parse.uses_builtin_extensions() {
        return Ok(Cow::Borrowed(global_registry()));
    }
    let kinds = parse.extension_kinds()?;
    tracing::info!(
        extensions = ?kinds,
        "Using a custom extension registry"
    );
    Ok(Cow::Owned(Registry::with_extensions(kinds)))
}
