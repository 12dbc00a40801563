//! `${VAR}` expansion in configuration strings.
//!
//! - `${VAR}` is replaced with the value of `VAR` and fails when it is unset.
//! - `${VAR:-default}` falls back to `default` when `VAR` is unset.
//!
//! Bare `$VAR` is left alone even next to braced references, and so are the
//! `{handle}` placeholders of mention URL templates.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// Only braced references are handed to `shellexpand`; text between them,
/// including any bare `$`, is copied as is. An unterminated `${` stays literal.
///
/// `field` names the configuration key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(open) = rest.find("${") {
        out.push_str(&rest[..open]);
        let body = open + 2;
        match rest[body..].find(['{', '}']).map(|len| body + len) {
            Some(close) if rest[close..].starts_with('}') => {
                out.push_str(&expand_reference(&rest[open..=close], field)?);
                rest = &rest[close + 1..];
            }
            _ => {
                out.push_str("${");
                rest = &rest[body..];
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Expand a single `${VAR}` or `${VAR:-default}` reference.
fn expand_reference(reference: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env_with_context(reference, |name| -> Result<Option<String>, UnsetVar> {
        std::env::var(name)
            .map(Some)
            .map_err(|_| UnsetVar(name.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|err| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", err.cause.0),
    })
}

/// Lookup failure carrying the variable name.
struct UnsetVar(String);
