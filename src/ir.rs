//! Language-neutral intermediate representation.
//!
//! Every syntax tree, whatever its source language, is normalized into the
//! entity set defined here: files, functions, fields, imports, calls, and
//! typed properties. The IR is immutable once built - the builder creates
//! each entity in a single linear pass over its source file, and the graph
//! assembler only reads it.
//!
//! Field names serialize in PascalCase so the JSON artifacts stay
//! interchangeable with the original Go tooling's output.

use serde::{Deserialize, Serialize};

/// Type tag for a property whose type is a plain identifier.
pub const TYPE_IDENTIFY: &str = "Identify";
/// Type tag for an array/slice type.
pub const TYPE_ARRAY: &str = "ArrayType";
/// Type tag for a function-valued type.
pub const TYPE_FUNCTION: &str = "Function";
/// Type tag for a pointer/reference type.
pub const TYPE_STAR: &str = "Star";
/// Type tag for a qualified (dotted) reference, e.g. `pkg.Type`.
pub const TYPE_SELECTOR: &str = "Selector";

/// A typed slot: a field, parameter, return value, or call argument.
///
/// `type_type` is one of the `TYPE_*` tags, or empty when resolution
/// failed. An empty tag means "unknown type" and must be treated as a
/// degraded-precision value, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeProperty {
    /// Slot name; empty for anonymous slots and return values.
    #[serde(default)]
    pub name: String,
    /// Type tag (`TYPE_*` constant or empty).
    #[serde(default)]
    pub type_type: String,
    /// Resolved type name, e.g. `"UserRepo"` or `"pkg.Type"`.
    #[serde(default)]
    pub type_value: String,
    /// Parameter slots; populated only when `type_type == TYPE_FUNCTION`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<CodeProperty>,
    /// Return slots; populated only when `type_type == TYPE_FUNCTION`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub return_types: Vec<CodeProperty>,
}

impl CodeProperty {
    /// A property with a name and a simple (non-function) type.
    pub fn typed(name: &str, type_type: &str, type_value: &str) -> Self {
        Self {
            name: name.to_string(),
            type_type: type_type.to_string(),
            type_value: type_value.to_string(),
            ..Default::default()
        }
    }

    /// Whether type resolution failed for this slot.
    pub fn is_unknown(&self) -> bool {
        self.type_type.is_empty()
    }
}

/// A declared struct member, used for receiver-type lookup.
///
/// Note the inherited layout quirk: `type_value` holds the field *name*
/// and `type_type` holds the field's resolved *type*.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeField {
    /// The field name (e.g. `"repo"`).
    #[serde(default)]
    pub type_value: String,
    /// The field's resolved type (e.g. `"Repository"`).
    #[serde(default)]
    pub type_type: String,
}

/// One import statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeImport {
    /// The import source path, quotes stripped.
    #[serde(default)]
    pub source: String,
}

/// A single call site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeCall {
    /// Inferred module/namespace; empty means "local".
    #[serde(default)]
    pub package: String,
    /// Resolved receiver type name; empty means "free function" or
    /// "could not resolve".
    #[serde(rename = "Type", default)]
    pub type_name: String,
    /// Raw receiver expression text (e.g. `"s.repo"`).
    #[serde(default)]
    pub node_name: String,
    /// The invoked method/function name.
    #[serde(default)]
    pub method_name: String,
    /// One property per argument expression, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<CodeProperty>,
}

/// A function or method declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeFunction {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<CodeProperty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multiple_returns: Vec<CodeProperty>,
    /// Calls in lexical order of appearance in the body.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub function_calls: Vec<CodeCall>,
}

/// The IR for one source file. Owns its functions, fields, and imports
/// exclusively; nothing is shared or mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeFile {
    #[serde(default)]
    pub package_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<CodeImport>,
    /// Union of all struct fields declared in the file, used by the scope
    /// resolver for receiver-type lookup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<CodeField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<CodeFunction>,
    /// Non-fatal builder diagnostics (unsupported syntax shapes). Kept out
    /// of the serialized artifact.
    #[serde(skip)]
    pub diagnostics: Vec<String>,
}

impl CodeFile {
    /// Find a declared field by name.
    pub fn find_field(&self, name: &str) -> Option<&CodeField> {
        self.fields.iter().find(|f| f.type_value == name)
    }

    /// Find a function by name.
    pub fn find_function(&self, name: &str) -> Option<&CodeFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}
