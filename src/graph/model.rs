//! Input models for the call graph assembler.
//!
//! Two serialized inputs feed the assembler: API-entry descriptors from
//! the REST front end, and class/method adjacency nodes from the full
//! dependency scan. Both are opaque to the assembler beyond identity and
//! adjacency. A missing or unparseable adjacency file is the one fatal
//! input condition in the pipeline.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ir::CodeFile;

/// Errors for required assembler inputs.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("lost file: {0}")]
    Missing(String),
    #[error("malformed input {0}: {1}")]
    Malformed(String, #[source] serde_json::Error),
}

/// One API entry point: an identifier plus the ordered call chain from
/// the endpoint into the codebase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiDescriptor {
    /// Entry identifier, e.g. `"GET /users"`.
    #[serde(default)]
    pub name: String,
    /// Method identities (`Class.Method`) along the entry's direct chain.
    #[serde(default)]
    pub chain: Vec<String>,
}

/// A method and its outgoing calls, as supplied by the dependency scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MethodNode {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub method_calls: Vec<MethodCallRef>,
}

/// A reference to a called method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MethodCallRef {
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub method_name: String,
}

impl MethodCallRef {
    /// Graph identity of the callee (`Class.Method`).
    pub fn identity(&self) -> String {
        format!("{}.{}", self.class, self.method_name)
    }
}

/// One class/record and its methods - an opaque adjacency source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClassNode {
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub class: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodNode>,
}

impl ClassNode {
    /// Graph identity of one of this class's methods.
    pub fn method_identity(&self, method: &MethodNode) -> String {
        format!("{}.{}", self.class, method.name)
    }

    /// Fold builder IR into adjacency nodes so a dependency set can be
    /// produced from a `scan` run without the external front end.
    ///
    /// Functions group under their file's package; a call's class is its
    /// resolved receiver type when known, otherwise its package.
    pub fn from_code_files<'a>(files: impl IntoIterator<Item = &'a CodeFile>) -> Vec<ClassNode> {
        files
            .into_iter()
            .map(|file| ClassNode {
                package: file.package_name.clone(),
                class: file.package_name.clone(),
                methods: file
                    .functions
                    .iter()
                    .map(|function| MethodNode {
                        name: function.name.clone(),
                        method_calls: function
                            .function_calls
                            .iter()
                            .map(|call| MethodCallRef {
                                package: call.package.clone(),
                                class: if call.type_name.is_empty() {
                                    call.package.clone()
                                } else {
                                    call.type_name.clone()
                                },
                                method_name: call.method_name.clone(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Read the API-entry descriptors (Input A).
pub fn load_descriptors(path: &Path) -> Result<Vec<ApiDescriptor>, InputError> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|_| InputError::Missing(display.clone()))?;
    serde_json::from_str(&raw).map_err(|e| InputError::Malformed(display, e))
}

/// Read the dependency adjacency nodes (Input B).
pub fn load_class_nodes(path: &Path) -> Result<Vec<ClassNode>, InputError> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|_| InputError::Missing(display.clone()))?;
    serde_json::from_str(&raw).map_err(|e| InputError::Malformed(display, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CodeCall, CodeFunction};
    use std::io::Write;

    #[test]
    fn test_descriptor_round_trip() {
        let apis = vec![
            ApiDescriptor {
                name: "GET /users".to_string(),
                chain: vec!["UserController.list".to_string()],
            },
            ApiDescriptor {
                name: "POST /users".to_string(),
                chain: vec![
                    "UserController.create".to_string(),
                    "UserService.create".to_string(),
                ],
            },
        ];

        let json = serde_json::to_string_pretty(&apis).unwrap();
        let back: Vec<ApiDescriptor> = serde_json::from_str(&json).unwrap();
        assert_eq!(apis, back);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let err = load_class_nodes(Path::new("/nonexistent/deps.json")).unwrap_err();
        assert!(matches!(err, InputError::Missing(_)));
        assert!(err.to_string().contains("deps.json"));
    }

    #[test]
    fn test_malformed_input_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = load_class_nodes(file.path()).unwrap_err();
        assert!(matches!(err, InputError::Malformed(_, _)));
    }

    #[test]
    fn test_nodes_from_code_files() {
        let file = CodeFile {
            package_name: "service".to_string(),
            functions: vec![CodeFunction {
                name: "Create".to_string(),
                function_calls: vec![CodeCall {
                    package: "repository".to_string(),
                    type_name: "Repository".to_string(),
                    method_name: "Save".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };

        let nodes = ClassNode::from_code_files([&file]);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].class, "service");
        assert_eq!(nodes[0].method_identity(&nodes[0].methods[0]), "service.Create");
        assert_eq!(nodes[0].methods[0].method_calls[0].identity(), "Repository.Save");
    }
}
