//! Scope resolution for call receivers.
//!
//! Maps a call's receiver expression to a declared type using a strict
//! precedence: local-variable bindings first, then the enclosing file's
//! struct fields, then nothing. Package attribution is a separate,
//! swappable heuristic over the import list.
//!
//! This is deliberately not a type checker. Local bindings are replaced
//! wholesale on every assignment (single-assignment-wins, no block
//! scoping), and package inference is a suffix match against import
//! paths. Both are documented precision limits.

use crate::ir::{CodeField, CodeImport};

/// One local variable binding: a name paired with the type tag inferred
/// from the right-hand side of the assignment that introduced it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalBinding {
    pub name: String,
    pub type_tag: String,
}

/// An immutable set of local bindings, threaded functionally through a
/// statement walk. Each assignment statement produces a fresh set that
/// replaces the previous one entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalBindings {
    bindings: Vec<LocalBinding>,
}

impl LocalBindings {
    /// The empty binding set, used at function entry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fresh set built from one assignment's (name, tag) pairs.
    /// The caller discards the old set; prior bindings do not survive.
    pub fn replaced_with(pairs: Vec<LocalBinding>) -> Self {
        Self { bindings: pairs }
    }

    /// Look up a binding by name. The most recent entry wins, matching
    /// last-assignment-visible semantics within one statement.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| b.type_tag.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Resolve a call receiver name to a declared type.
///
/// Precedence is strict: local bindings shadow fields, fields shadow
/// nothing. `None` means "unknown - likely a local not introduced via
/// assignment, or a package-qualified call"; callers record an empty
/// type and continue.
pub fn resolve_receiver(
    name: &str,
    locals: &LocalBindings,
    fields: &[CodeField],
) -> Option<String> {
    if let Some(tag) = locals.lookup(name) {
        return Some(tag.to_string());
    }
    fields
        .iter()
        .find(|f| f.type_value == name)
        .map(|f| f.type_type.clone())
}

/// Strategy for attributing a call to a package/namespace.
///
/// Kept behind a trait so a stricter resolver (real type checking) can
/// replace the heuristic without touching the builder.
pub trait PackageInference: Send + Sync {
    /// Infer the namespace for a resolved owner text given the file's
    /// import list. `None` means "attribute to the current package".
    fn infer(&self, owner: &str, imports: &[CodeImport]) -> Option<String>;
}

/// The default heuristic: when the owner text is qualified (`pkg.Symbol`),
/// the prefix is taken as the package name if any import's source path
/// ends with it.
///
/// Known precision limit: two imported modules sharing a trailing path
/// segment can be mis-attributed.
pub struct SuffixMatchInference;

impl PackageInference for SuffixMatchInference {
    fn infer(&self, owner: &str, imports: &[CodeImport]) -> Option<String> {
        let prefix = match owner.split_once('.') {
            Some((prefix, _)) if !prefix.is_empty() => prefix,
            _ => return None,
        };

        imports
            .iter()
            .any(|imp| imp.source.ends_with(prefix))
            .then(|| prefix.to_string())
    }
}
