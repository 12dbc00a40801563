//! Process-wide registration of the built-in extensions.
//!
//! [`ensure_registered`] may be called from any number of call sites and
//! threads. The registration body runs exactly once; every caller, whether it
//! ran the body or arrived later, observes the fully populated registry.

use std::sync::OnceLock;

use crate::extension::{ExtensionKind, create_extension};
use crate::registry::Registry;

/// Built-in extensions in registration (priority) order.
pub const BUILTIN_EXTENSIONS: [ExtensionKind; 2] =
    [ExtensionKind::Mention, ExtensionKind::Checkbox];

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Register the built-in extensions into the process-wide registry.
///
/// Idempotent and safe under concurrent first use. There is no way to
/// unregister.
pub fn ensure_registered() {
    global_registry();
}

/// The process-wide registry, populated on first access.
///
/// # Example
///
/// ```
/// use gfmx_engine::{ExtensionKind, global_registry};
///
/// let registry = global_registry();
/// assert!(registry.contains(ExtensionKind::Mention));
/// assert!(registry.contains(ExtensionKind::Checkbox));
/// ```
pub fn global_registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        let mut registry = Registry::new();
        for kind in BUILTIN_EXTENSIONS {
            registry.register(create_extension(kind));
        }
        tracing::info!(
            extensions = registry.len(),
            "Registered built-in syntax extensions"
        );
        registry
    })
}
