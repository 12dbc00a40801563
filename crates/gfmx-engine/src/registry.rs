//! Extension registry.
//!
//! The registry is an ordered list of extensions: registration order is
//! matching priority and the first extension that matches wins. It is built
//! once and then only read, so a shared reference can be handed to any number
//! of parsers and renderers running in parallel.

use crate::extension::{Extension, ExtensionKind, create_extension};

/// Outcome of [`Registry::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// The extension was appended.
    Added,
    /// An extension with the same identifier was already registered.
    AlreadyPresent,
}

/// Ordered set of registered extensions.
///
/// # Example
///
/// ```
/// use gfmx_engine::{ExtensionKind, Registration, Registry, create_extension};
///
/// let mut registry = Registry::new();
/// let first = registry.register(create_extension(ExtensionKind::Mention));
/// let again = registry.register(create_extension(ExtensionKind::Mention));
///
/// assert_eq!(first, Registration::Added);
/// assert_eq!(again, Registration::AlreadyPresent);
/// assert_eq!(registry.len(), 1);
/// assert!(registry.is_trigger('@'));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Registry {
    extensions: Vec<Extension>,
    /// Union of inline trigger chars, in first-registration order.
    triggers: Vec<char>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the given extensions in order.
    ///
    /// Duplicate kinds are absorbed.
    #[must_use]
    pub fn with_extensions(kinds: impl IntoIterator<Item = ExtensionKind>) -> Self {
        let mut registry = Self::new();
        for kind in kinds {
            registry.register(create_extension(kind));
        }
        registry
    }

    /// Append an extension unless one with the same identifier exists.
    pub fn register(&mut self, extension: Extension) -> Registration {
        if self.contains(extension.kind()) {
            tracing::debug!(
                extension = extension.name(),
                "Extension already registered"
            );
            return Registration::AlreadyPresent;
        }

        for &trigger in extension.inline_triggers() {
            if !self.triggers.contains(&trigger) {
                self.triggers.push(trigger);
            }
        }
        tracing::debug!(
            extension = extension.name(),
            priority = self.extensions.len(),
            "Registered extension"
        );
        self.extensions.push(extension);
        Registration::Added
    }

    /// Number of registered extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Whether no extension is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Whether an extension of `kind` is registered.
    #[must_use]
    pub fn contains(&self, kind: ExtensionKind) -> bool {
        self.get(kind).is_some()
    }

    /// Look up the extension of `kind`.
    #[must_use]
    pub fn get(&self, kind: ExtensionKind) -> Option<&Extension> {
        self.extensions.iter().find(|ext| ext.kind() == kind)
    }

    /// Iterate over extensions in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.iter()
    }

    /// Kinds in priority order.
    pub fn kinds(&self) -> impl Iterator<Item = ExtensionKind> + '_ {
        self.extensions.iter().map(Extension::kind)
    }

    /// Union of inline trigger chars across all extensions.
    pub fn inline_triggers(&self) -> impl Iterator<Item = char> + '_ {
        self.triggers.iter().copied()
    }

    /// Whether `c` triggers at least one inline extension.
    #[must_use]
    pub fn is_trigger(&self, c: char) -> bool {
        self.triggers.contains(&c)
    }

    /// Extensions listening on trigger `c`, in priority order.
    pub fn inline_handlers(&self, c: char) -> impl Iterator<Item = &Extension> {
        self.extensions
            .iter()
            .filter(move |ext| ext.inline_triggers().contains(&c))
    }

    /// Extensions installing a list-item block starter, in priority order.
    pub fn block_starters(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.iter().filter(|ext| ext.starts_blocks())
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Extension;
    type IntoIter = std::slice::Iter<'a, Extension>;

    fn into_iter(self) -> Self::IntoIter {
        self.extensions.iter()
    }
}

/// Register `extension` into `registry`.
pub fn register_extension(registry: &mut Registry, extension: Extension) -> Registration {
    registry.register(extension)
}
