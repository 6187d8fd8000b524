//! Go IR builder using tree-sitter.
//!
//! Walks one file's syntax tree and emits the language-neutral IR:
//! package name, imports, struct fields, and functions with their call
//! sites. Receiver types are resolved with the scope rules in
//! `analysis::scope`.

use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use crate::analysis::scope::{
    resolve_receiver, LocalBinding, LocalBindings, PackageInference, SuffixMatchInference,
};
use crate::analysis::{LanguageAnalyzer, ParsedFile};
use crate::ir::{
    CodeCall, CodeField, CodeFile, CodeFunction, CodeImport, CodeProperty, TYPE_ARRAY,
    TYPE_FUNCTION, TYPE_IDENTIFY, TYPE_SELECTOR, TYPE_STAR,
};

/// Tree-sitter query for the package declaration.
const PACKAGE_QUERY: &str = r#"
(package_clause
  (package_identifier) @package_name
)
"#;

/// Tree-sitter query for import paths.
const IMPORT_QUERY: &str = r#"
(import_declaration
  (import_spec
    path: (interpreted_string_literal) @path
  )
)

(import_declaration
  (import_spec_list
    (import_spec
      path: (interpreted_string_literal) @path
    )
  )
)
"#;

/// Tree-sitter query for struct field declarations.
const FIELD_QUERY: &str = r#"
(type_declaration
  (type_spec
    type: (struct_type
      (field_declaration_list
        (field_declaration) @field
      )
    )
  )
)
"#;

/// Closed classification of the syntax shapes the property builder
/// models. Anything else lands in `Unsupported` and degrades to an
/// empty-typed property with a diagnostic.
enum TypeShape<'a> {
    Identifier(Node<'a>),
    Array(Node<'a>),
    Function(Node<'a>),
    Pointer(Node<'a>),
    Selector(Node<'a>),
    Unsupported(&'static str),
}

fn classify_type(node: Node<'_>) -> TypeShape<'_> {
    match node.kind() {
        "type_identifier" | "identifier" => TypeShape::Identifier(node),
        "slice_type" | "array_type" => TypeShape::Array(node),
        "function_type" => TypeShape::Function(node),
        "pointer_type" => TypeShape::Pointer(node),
        "qualified_type" => TypeShape::Selector(node),
        other => TypeShape::Unsupported(other),
    }
}

/// The result of evaluating an expression: its raw text and the type tag
/// the builder can infer from its shape alone.
struct ExprInfo {
    text: String,
    tag: String,
}

/// Go language analyzer.
pub struct GoAnalyzer {
    language: Language,
    inference: Box<dyn PackageInference>,
}

impl GoAnalyzer {
    /// Create a new Go analyzer with the default suffix-match package
    /// inference.
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
            inference: Box::new(SuffixMatchInference),
        }
    }

    /// Replace the package inference strategy.
    pub fn with_inference(mut self, inference: Box<dyn PackageInference>) -> Self {
        self.inference = inference;
        self
    }

    /// Create a new parser for this thread.
    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Extract the package name from a parsed file.
    fn extract_package(&self, parsed: &ParsedFile) -> Option<String> {
        let query = Query::new(&self.language, PACKAGE_QUERY).ok()?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        if let Some(m) = matches.next() {
            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                if name == "package_name" {
                    return Some(parsed.node_text(capture.node).to_string());
                }
            }
        }
        None
    }

    /// Extract imports in document order.
    fn extract_imports(&self, parsed: &ParsedFile) -> anyhow::Result<Vec<CodeImport>> {
        let query = Query::new(&self.language, IMPORT_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        let mut imports = Vec::new();
        let mut seen = std::collections::HashSet::new();

        while let Some(m) = matches.next() {
            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                if name == "path" {
                    let source = parsed.node_text(capture.node).trim_matches('"').to_string();
                    if !source.is_empty() && seen.insert(source.clone()) {
                        imports.push(CodeImport { source });
                    }
                }
            }
        }

        Ok(imports)
    }

    /// Extract the union of all named struct fields declared in the file.
    ///
    /// Embedded (anonymous) fields carry no name usable for receiver
    /// lookup and are skipped.
    fn extract_fields(
        &self,
        parsed: &ParsedFile,
        diagnostics: &mut Vec<String>,
    ) -> anyhow::Result<Vec<CodeField>> {
        let query = Query::new(&self.language, FIELD_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        let mut fields = Vec::new();

        while let Some(m) = matches.next() {
            for capture in m.captures {
                let decl = capture.node;
                let type_node = match decl.child_by_field_name("type") {
                    Some(n) => n,
                    None => continue,
                };

                let property = self.build_property(parsed, "", type_node, diagnostics);

                let mut walk = decl.walk();
                for name_node in decl.children_by_field_name("name", &mut walk) {
                    fields.push(CodeField {
                        type_value: parsed.node_text(name_node).to_string(),
                        type_type: property.type_value.clone(),
                    });
                }
            }
        }

        Ok(fields)
    }

    /// Build exactly one `CodeProperty` from a typed slot's type node.
    ///
    /// Dispatch is by syntactic shape (see `TypeShape`); unmodeled shapes
    /// produce an empty-typed property and a diagnostic, never an abort.
    fn build_property(
        &self,
        parsed: &ParsedFile,
        name: &str,
        type_node: Node,
        diagnostics: &mut Vec<String>,
    ) -> CodeProperty {
        let mut property = CodeProperty {
            name: name.to_string(),
            ..Default::default()
        };

        match classify_type(type_node) {
            TypeShape::Identifier(node) => {
                property.type_type = TYPE_IDENTIFY.to_string();
                property.type_value = parsed.node_text(node).to_string();
            }
            TypeShape::Array(node) => {
                property.type_type = TYPE_ARRAY.to_string();
                match node.child_by_field_name("element") {
                    Some(elem)
                        if matches!(elem.kind(), "type_identifier" | "qualified_type") =>
                    {
                        property.type_value = parsed.node_text(elem).to_string();
                    }
                    Some(elem) => {
                        diagnostics.push(format!(
                            "array element type not modeled: {}",
                            elem.kind()
                        ));
                    }
                    None => {}
                }
            }
            TypeShape::Function(node) => {
                property.type_type = TYPE_FUNCTION.to_string();
                property.type_value = "func".to_string();
                if let Some(params) = node.child_by_field_name("parameters") {
                    property.parameters = self.build_slot_list(parsed, params, diagnostics);
                }
                if let Some(result) = node.child_by_field_name("result") {
                    property.return_types = self.build_result(parsed, result, diagnostics);
                }
            }
            TypeShape::Pointer(node) => {
                property.type_type = TYPE_STAR.to_string();
                match node.named_child(0) {
                    Some(pointee)
                        if matches!(pointee.kind(), "type_identifier" | "qualified_type") =>
                    {
                        property.type_value = parsed.node_text(pointee).to_string();
                    }
                    Some(pointee) => {
                        diagnostics
                            .push(format!("pointee type not modeled: {}", pointee.kind()));
                    }
                    None => {}
                }
            }
            TypeShape::Selector(node) => {
                property.type_type = TYPE_SELECTOR.to_string();
                property.type_value = parsed.node_text(node).to_string();
            }
            TypeShape::Unsupported(kind) => {
                diagnostics.push(format!("type shape not modeled: {}", kind));
            }
        }

        property
    }

    /// Build properties for a parameter list, one per declared name.
    fn build_slot_list(
        &self,
        parsed: &ParsedFile,
        list: Node,
        diagnostics: &mut Vec<String>,
    ) -> Vec<CodeProperty> {
        let mut properties = Vec::new();
        let mut cursor = list.walk();

        for decl in list.named_children(&mut cursor) {
            if !matches!(
                decl.kind(),
                "parameter_declaration" | "variadic_parameter_declaration"
            ) {
                continue;
            }

            let type_node = match decl.child_by_field_name("type") {
                Some(n) => n,
                None => continue,
            };

            // `a, b int` groups under one declaration; the slot takes the
            // first declared name, matching the flat field model.
            let name = decl
                .child_by_field_name("name")
                .map(|n| parsed.node_text(n).to_string())
                .unwrap_or_default();

            properties.push(self.build_property(parsed, &name, type_node, diagnostics));
        }

        properties
    }

    /// Build return slots. Go allows both a parenthesized list and a bare
    /// type here.
    fn build_result(
        &self,
        parsed: &ParsedFile,
        result: Node,
        diagnostics: &mut Vec<String>,
    ) -> Vec<CodeProperty> {
        if result.kind() == "parameter_list" {
            self.build_slot_list(parsed, result, diagnostics)
        } else {
            vec![self.build_property(parsed, "", result, diagnostics)]
        }
    }

    /// Build a `CodeFunction` from a function or method declaration,
    /// walking its body statements in order.
    fn build_function(
        &self,
        parsed: &ParsedFile,
        node: Node,
        file: &CodeFile,
        diagnostics: &mut Vec<String>,
    ) -> CodeFunction {
        let mut function = CodeFunction {
            name: node
                .child_by_field_name("name")
                .map(|n| parsed.node_text(n).to_string())
                .unwrap_or_default(),
            ..Default::default()
        };

        if let Some(params) = node.child_by_field_name("parameters") {
            function.parameters = self.build_slot_list(parsed, params, diagnostics);
        }
        if let Some(result) = node.child_by_field_name("result") {
            function.multiple_returns = self.build_result(parsed, result, diagnostics);
        }

        if let Some(body) = node.child_by_field_name("body") {
            // The binding set is threaded functionally: each statement
            // receives the current set and returns the next one.
            let mut locals = LocalBindings::empty();
            let mut cursor = body.walk();
            for statement in body.named_children(&mut cursor) {
                locals =
                    self.build_statement(parsed, statement, &mut function, file, locals, diagnostics);
            }
        }

        function
    }

    /// Process one body statement, appending any extracted calls and
    /// returning the local-binding set visible to the next statement.
    fn build_statement(
        &self,
        parsed: &ParsedFile,
        statement: Node,
        function: &mut CodeFunction,
        file: &CodeFile,
        locals: LocalBindings,
        diagnostics: &mut Vec<String>,
    ) -> LocalBindings {
        match statement.kind() {
            "expression_statement" => {
                match statement.named_child(0) {
                    Some(expr) if expr.kind() == "call_expression" => {
                        let call = self.build_call(parsed, expr, file, &locals, diagnostics);
                        function.function_calls.push(call);
                    }
                    Some(expr) => {
                        diagnostics
                            .push(format!("expression not modeled: {}", expr.kind()));
                    }
                    None => {}
                }
                locals
            }
            // Deferred and scheduled calls are recorded as ordinary calls;
            // their timing is irrelevant to the graph.
            "defer_statement" | "go_statement" => {
                if let Some(expr) = statement.named_child(0) {
                    if expr.kind() == "call_expression" {
                        let call = self.build_call(parsed, expr, file, &locals, diagnostics);
                        function.function_calls.push(call);
                    }
                }
                locals
            }
            "short_var_declaration" | "assignment_statement" => {
                self.bind_assignment(parsed, statement, diagnostics)
            }
            "comment" => locals,
            other => {
                // Calls nested inside unmodeled statements are not captured.
                diagnostics.push(format!("statement not modeled: {}", other));
                locals
            }
        }
    }

    /// Build the binding set introduced by one assignment.
    ///
    /// Every left-hand identifier is paired with the type tag of every
    /// right-hand expression, and the resulting set replaces the previous
    /// one wholesale. Block scoping and shadowing across nested blocks are
    /// deliberately not modeled.
    fn bind_assignment(
        &self,
        parsed: &ParsedFile,
        statement: Node,
        diagnostics: &mut Vec<String>,
    ) -> LocalBindings {
        let mut pairs = Vec::new();

        let left = statement.child_by_field_name("left");
        let right = statement.child_by_field_name("right");

        if let (Some(left), Some(right)) = (left, right) {
            let mut left_cursor = left.walk();
            for lhs in left.named_children(&mut left_cursor) {
                let name = if lhs.kind() == "identifier" {
                    parsed.node_text(lhs).to_string()
                } else {
                    String::new()
                };

                let mut right_cursor = right.walk();
                for rhs in right.named_children(&mut right_cursor) {
                    let info = self.eval_expr(parsed, rhs, diagnostics);
                    pairs.push(LocalBinding {
                        name: name.clone(),
                        type_tag: info.tag,
                    });
                }
            }
        }

        LocalBindings::replaced_with(pairs)
    }

    /// Evaluate an expression to its raw text and an inferred type tag.
    ///
    /// Only shape-level inference: identifiers and selectors yield their
    /// shape tag, constructor-like expressions (calls and composite
    /// literals) yield a name, everything else yields an empty tag.
    fn eval_expr(
        &self,
        parsed: &ParsedFile,
        node: Node,
        diagnostics: &mut Vec<String>,
    ) -> ExprInfo {
        match node.kind() {
            "identifier" | "field_identifier" => ExprInfo {
                text: parsed.node_text(node).to_string(),
                tag: TYPE_IDENTIFY.to_string(),
            },
            "selector_expression" => ExprInfo {
                text: parsed.node_text(node).to_string(),
                tag: TYPE_SELECTOR.to_string(),
            },
            // A call's tag is the called function's name, so constructor
            // results stay traceable (`repo := NewRepo()` tags repo with
            // "NewRepo").
            "call_expression" => {
                let callee = node.child_by_field_name("function");
                let tag = callee
                    .map(|f| self.callee_name(parsed, f))
                    .unwrap_or_default();
                ExprInfo {
                    text: callee
                        .map(|f| parsed.node_text(f).to_string())
                        .unwrap_or_default(),
                    tag,
                }
            }
            // `Service{}` tags the binding with the literal's type.
            "composite_literal" => {
                let tag = node
                    .child_by_field_name("type")
                    .map(|t| parsed.node_text(t).to_string())
                    .unwrap_or_default();
                ExprInfo {
                    text: parsed.node_text(node).to_string(),
                    tag,
                }
            }
            // `&Service{}` evaluates to its operand.
            "unary_expression" => match node.child_by_field_name("operand") {
                Some(operand) => self.eval_expr(parsed, operand, diagnostics),
                None => ExprInfo {
                    text: parsed.node_text(node).to_string(),
                    tag: String::new(),
                },
            },
            _ => ExprInfo {
                text: parsed.node_text(node).to_string(),
                tag: String::new(),
            },
        }
    }

    /// The bare name of a call target (`NewRepo` for `pkg.NewRepo`).
    fn callee_name(&self, parsed: &ParsedFile, callee: Node) -> String {
        match callee.kind() {
            "identifier" => parsed.node_text(callee).to_string(),
            "selector_expression" => callee
                .child_by_field_name("field")
                .map(|f| parsed.node_text(f).to_string())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Build one `CodeCall` from a call expression, resolving the receiver
    /// against locals then fields, and attributing a package.
    fn build_call(
        &self,
        parsed: &ParsedFile,
        call_node: Node,
        file: &CodeFile,
        locals: &LocalBindings,
        diagnostics: &mut Vec<String>,
    ) -> CodeCall {
        let callee = call_node.child_by_field_name("function");

        let (node_name, owner_key, method_name) = match callee {
            Some(fun) if fun.kind() == "identifier" => {
                (String::new(), String::new(), parsed.node_text(fun).to_string())
            }
            Some(fun) if fun.kind() == "selector_expression" => {
                let operand = fun.child_by_field_name("operand");
                let method = fun
                    .child_by_field_name("field")
                    .map(|f| parsed.node_text(f).to_string())
                    .unwrap_or_default();

                let node_name = operand
                    .map(|o| parsed.node_text(o).to_string())
                    .unwrap_or_default();

                // Receiver lookup uses the final component of the owner
                // expression: `s.repo.Save` resolves via "repo".
                let owner_key = match operand {
                    Some(o) if o.kind() == "identifier" => parsed.node_text(o).to_string(),
                    Some(o) if o.kind() == "selector_expression" => o
                        .child_by_field_name("field")
                        .map(|f| parsed.node_text(f).to_string())
                        .unwrap_or_default(),
                    _ => String::new(),
                };

                (node_name, owner_key, method)
            }
            Some(fun) => {
                diagnostics.push(format!("call target not modeled: {}", fun.kind()));
                (parsed.node_text(fun).to_string(), String::new(), String::new())
            }
            None => (String::new(), String::new(), String::new()),
        };

        let type_name = if owner_key.is_empty() {
            String::new()
        } else {
            resolve_receiver(&owner_key, locals, &file.fields).unwrap_or_default()
        };

        // Package attribution works on the resolved type; an unqualified
        // or unresolved type attributes the call to the current package.
        let package = self
            .inference
            .infer(&type_name, &file.imports)
            .unwrap_or_else(|| file.package_name.clone());

        let mut call = CodeCall {
            package,
            type_name,
            node_name,
            method_name,
            parameters: Vec::new(),
        };

        if let Some(args) = call_node.child_by_field_name("arguments") {
            let mut cursor = args.walk();
            for arg in args.named_children(&mut cursor) {
                let info = self.eval_expr(parsed, arg, diagnostics);
                call.parameters.push(CodeProperty {
                    name: String::new(),
                    type_type: info.tag,
                    type_value: info.text,
                    ..Default::default()
                });
            }
        }

        call
    }
}

impl Default for GoAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for GoAnalyzer {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse Go source: {}", path.display()))?;

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }

    fn build_ir(&self, parsed: &ParsedFile) -> anyhow::Result<CodeFile> {
        let mut diagnostics = Vec::new();

        let mut file = CodeFile {
            package_name: self.extract_package(parsed).unwrap_or_default(),
            imports: self.extract_imports(parsed)?,
            ..Default::default()
        };
        file.fields = self.extract_fields(parsed, &mut diagnostics)?;

        if parsed.tree.root_node().has_error() {
            diagnostics.push(format!("{}: source contains syntax errors", parsed.path));
        }

        let root = parsed.tree.root_node();
        let mut cursor = root.walk();
        let mut functions = Vec::new();
        for decl in root.named_children(&mut cursor) {
            if matches!(decl.kind(), "function_declaration" | "method_declaration") {
                functions.push(self.build_function(parsed, decl, &file, &mut diagnostics));
            }
        }

        file.functions = functions;
        file.diagnostics = diagnostics;
        Ok(file)
    }
}
