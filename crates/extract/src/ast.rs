//! Tree-sitter front end for the JavaScript family.
//!
//! Parsing is best-effort: a tree containing error nodes counts as a failed
//! parse. TypeScript sources get a second chance through
//! [`strip_type_syntax`](crate::strip_type_syntax) and the JavaScript grammar
//! before callers drop to line patterns.

use crate::language::Language;
use crate::strip::strip_type_syntax;
use crate::types::{ExportSurface, Signature, SignatureKind};
use std::borrow::Cow;
use tree_sitter::{Node, Parser, Tree};

/// Grammar used for one parse attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Grammar {
    JavaScript,
    TypeScript,
    Tsx,
}

impl Grammar {
    pub(crate) fn for_source(language: Language, path: &str) -> Option<Self> {
        match language {
            Language::JavaScript => Some(Grammar::JavaScript),
            Language::TypeScript if path.to_lowercase().ends_with(".tsx") => Some(Grammar::Tsx),
            Language::TypeScript => Some(Grammar::TypeScript),
            _ => None,
        }
    }

    fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Grammar::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Grammar::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    fn parse(self, text: &str) -> Option<Tree> {
        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&self.tree_sitter_language()) {
            log::warn!("Failed to load {self:?} grammar: {e}");
            return None;
        }
        let tree = parser.parse(text, None)?;
        if tree.root_node().has_error() {
            return None;
        }
        Some(tree)
    }
}

/// A successfully parsed source together with the text the tree indexes into
pub(crate) struct ParsedSource<'a> {
    pub tree: Tree,
    pub text: Cow<'a, str>,
}

impl ParsedSource<'_> {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn src(&self) -> &str {
        &self.text
    }
}

/// Parse a JavaScript-family file, or return `None` when no grammar accepts it
pub(crate) fn parse_source<'a>(
    language: Language,
    path: &str,
    code: &'a str,
) -> Option<ParsedSource<'a>> {
    let grammar = Grammar::for_source(language, path)?;
    if let Some(tree) = grammar.parse(code) {
        return Some(ParsedSource {
            tree,
            text: Cow::Borrowed(code),
        });
    }

    if language != Language::TypeScript {
        log::debug!("Grammar parse failed for {path}");
        return None;
    }

    let stripped = strip_type_syntax(code);
    match Grammar::JavaScript.parse(&stripped) {
        Some(tree) => {
            log::debug!("Parsed {path} after stripping type syntax");
            Some(ParsedSource {
                tree,
                text: Cow::Owned(stripped),
            })
        }
        None => {
            log::debug!("Grammar parse failed for {path}, even after stripping types");
            None
        }
    }
}

/// Closed set of node kinds the walkers care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    FunctionDeclaration,
    ClassDeclaration,
    MethodDefinition,
    FieldDefinition,
    VariableDeclaration,
    ExpressionStatement,
    FunctionLiteral,
    Export,
    If,
    Ternary,
    Loop,
    Switch,
    SwitchCase,
    Catch,
    Binary,
    Other,
}

impl NodeKind {
    pub(crate) fn of(node: Node<'_>) -> Self {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                NodeKind::FunctionDeclaration
            }
            "class_declaration" | "abstract_class_declaration" => NodeKind::ClassDeclaration,
            "method_definition" => NodeKind::MethodDefinition,
            "field_definition" | "public_field_definition" => NodeKind::FieldDefinition,
            "lexical_declaration" | "variable_declaration" => NodeKind::VariableDeclaration,
            "expression_statement" => NodeKind::ExpressionStatement,
            "function_expression" | "function" | "arrow_function" | "generator_function" => {
                NodeKind::FunctionLiteral
            }
            "export_statement" => NodeKind::Export,
            "if_statement" => NodeKind::If,
            "ternary_expression" => NodeKind::Ternary,
            "for_statement" | "for_in_statement" | "while_statement" | "do_statement" => {
                NodeKind::Loop
            }
            "switch_statement" => NodeKind::Switch,
            "switch_case" => NodeKind::SwitchCase,
            "catch_clause" => NodeKind::Catch,
            "binary_expression" => NodeKind::Binary,
            _ => NodeKind::Other,
        }
    }

    /// Function-like nodes whose bodies are scored on their own
    pub(crate) fn is_function_boundary(self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration | NodeKind::FunctionLiteral | NodeKind::MethodDefinition
        )
    }
}

/// How far the declaration walk descends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SiteScope {
    /// Only statements at module level (and inside `export`)
    TopLevel,
    /// Also declarations nested inside function bodies
    Nested,
}

/// A declaration found by the walk, with the body complexity is scored on
pub(crate) struct FunctionSite<'t> {
    pub signature: Signature,
    pub body: Option<Node<'t>>,
}

pub(crate) fn node_text<'s>(node: Node<'_>, src: &'s str) -> &'s str {
    src.get(node.byte_range()).unwrap_or("")
}

fn line_of(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

fn unquote(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}

fn is_generator(node: Node<'_>) -> bool {
    node.kind().starts_with("generator_function") || has_token(node, "*")
}

fn param_name(node: Node<'_>, src: &str) -> String {
    match node.kind() {
        "identifier" | "this" => node_text(node, src).to_string(),
        "assignment_pattern" => node
            .child_by_field_name("left")
            .map(|left| param_name(left, src))
            .unwrap_or_else(|| "?".to_string()),
        "rest_pattern" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|child| child.kind() == "identifier");
            match inner {
                Some(ident) => format!("...{}", node_text(ident, src)),
                None => "?".to_string(),
            }
        }
        "object_pattern" => "{...}".to_string(),
        "array_pattern" => "[...]".to_string(),
        "required_parameter" | "optional_parameter" => node
            .child_by_field_name("pattern")
            .map(|pattern| param_name(pattern, src))
            .unwrap_or_else(|| "?".to_string()),
        _ => "?".to_string(),
    }
}

fn params_of(func: Node<'_>, src: &str) -> Vec<String> {
    if let Some(params) = func.child_by_field_name("parameters") {
        let mut cursor = params.walk();
        let names = params
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .map(|child| param_name(child, src))
            .collect();
        return names;
    }
    func.child_by_field_name("parameter")
        .map(|single| vec![param_name(single, src)])
        .unwrap_or_default()
}

fn member_name(node: Node<'_>, src: &str) -> String {
    match node.kind() {
        "string" => unquote(node_text(node, src)).to_string(),
        "computed_property_name" => node
            .named_child(0)
            .map(|inner| member_name(inner, src))
            .unwrap_or_else(|| "anonymous".to_string()),
        "property_identifier" | "private_property_identifier" | "identifier" | "number" => {
            node_text(node, src).to_string()
        }
        _ => "anonymous".to_string(),
    }
}

/// Signature for a function-like node (declaration, literal or method)
fn function_signature(
    name: String,
    kind: SignatureKind,
    func: Node<'_>,
    line: usize,
    src: &str,
) -> Signature {
    Signature::new(name, kind, line)
        .with_params(params_of(func, src))
        .with_async(has_token(func, "async"))
        .with_generator(is_generator(func))
}

fn is_exports_object(node: Node<'_>, src: &str) -> bool {
    match node.kind() {
        "identifier" => node_text(node, src) == "exports",
        "member_expression" => {
            let object = node.child_by_field_name("object");
            let property = node.child_by_field_name("property");
            matches!(
                (object, property),
                (Some(o), Some(p)) if node_text(o, src) == "module" && node_text(p, src) == "exports"
            )
        }
        _ => false,
    }
}

/// Name assigned by `module.exports.x = ...` / `exports.x = ...`
pub(crate) fn legacy_export_name(left: Node<'_>, src: &str) -> Option<String> {
    let object = left.child_by_field_name("object")?;
    if !is_exports_object(object, src) {
        return None;
    }
    match left.kind() {
        "member_expression" => left
            .child_by_field_name("property")
            .map(|p| node_text(p, src).to_string()),
        "subscript_expression" => left
            .child_by_field_name("index")
            .filter(|index| index.kind() == "string")
            .map(|index| unquote(node_text(index, src)).to_string()),
        _ => None,
    }
}

struct SiteCollector<'s, 't> {
    src: &'s str,
    scope: SiteScope,
    sites: Vec<FunctionSite<'t>>,
    stack: Vec<Node<'t>>,
}

impl<'s, 't> SiteCollector<'s, 't> {
    fn push_children(&mut self, node: Node<'t>) {
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
        self.stack.extend(children.into_iter().rev());
    }

    fn descend(&mut self, node: Node<'t>) {
        if self.scope == SiteScope::Nested {
            self.push_children(node);
        }
    }

    fn visit(&mut self, node: Node<'t>) {
        match NodeKind::of(node) {
            NodeKind::FunctionDeclaration => {
                if let Some(name) = node.child_by_field_name("name") {
                    let signature = function_signature(
                        node_text(name, self.src).to_string(),
                        SignatureKind::Function,
                        node,
                        line_of(node),
                        self.src,
                    );
                    self.sites.push(FunctionSite {
                        signature,
                        body: node.child_by_field_name("body"),
                    });
                }
                self.descend(node);
            }
            NodeKind::ClassDeclaration => self.visit_class(node),
            NodeKind::VariableDeclaration => {
                let mut cursor = node.walk();
                let declarators: Vec<Node<'t>> = node
                    .named_children(&mut cursor)
                    .filter(|child| child.kind() == "variable_declarator")
                    .collect();
                for declarator in declarators {
                    let name = declarator
                        .child_by_field_name("name")
                        .filter(|n| n.kind() == "identifier");
                    let value = declarator
                        .child_by_field_name("value")
                        .filter(|v| NodeKind::of(*v) == NodeKind::FunctionLiteral);
                    if let (Some(name), Some(value)) = (name, value) {
                        let signature = function_signature(
                            node_text(name, self.src).to_string(),
                            SignatureKind::Arrow,
                            value,
                            line_of(node),
                            self.src,
                        );
                        self.sites.push(FunctionSite {
                            signature,
                            body: value.child_by_field_name("body"),
                        });
                    }
                }
                self.descend(node);
            }
            NodeKind::ExpressionStatement => {
                let assignment = node
                    .named_child(0)
                    .filter(|expr| expr.kind() == "assignment_expression");
                if let Some(assignment) = assignment {
                    let left = assignment.child_by_field_name("left");
                    let right = assignment
                        .child_by_field_name("right")
                        .filter(|r| NodeKind::of(*r) == NodeKind::FunctionLiteral);
                    if let (Some(left), Some(right)) = (left, right) {
                        if let Some(name) = legacy_export_name(left, self.src) {
                            let signature = function_signature(
                                name,
                                SignatureKind::Function,
                                right,
                                line_of(node),
                                self.src,
                            );
                            self.sites.push(FunctionSite {
                                signature,
                                body: right.child_by_field_name("body"),
                            });
                        }
                    }
                }
                self.descend(node);
            }
            NodeKind::Export => self.push_children(node),
            _ => self.descend(node),
        }
    }

    fn visit_class(&mut self, node: Node<'t>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let class_name = node_text(name, self.src).to_string();
        self.sites.push(FunctionSite {
            signature: Signature::new(class_name.clone(), SignatureKind::Class, line_of(node)),
            body: None,
        });

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let mut cursor = body.walk();
        let members: Vec<Node<'t>> = body.named_children(&mut cursor).collect();
        for member in members {
            match NodeKind::of(member) {
                NodeKind::MethodDefinition => {
                    let method = member
                        .child_by_field_name("name")
                        .map(|key| member_name(key, self.src))
                        .unwrap_or_else(|| "anonymous".to_string());
                    let signature = function_signature(
                        format!("{class_name}.{method}"),
                        SignatureKind::Method,
                        member,
                        line_of(member),
                        self.src,
                    );
                    self.sites.push(FunctionSite {
                        signature,
                        body: member.child_by_field_name("body"),
                    });
                }
                NodeKind::FieldDefinition => {
                    let value = member
                        .child_by_field_name("value")
                        .filter(|v| NodeKind::of(*v) == NodeKind::FunctionLiteral);
                    let Some(value) = value else { continue };
                    let field = member
                        .child_by_field_name("property")
                        .or_else(|| member.child_by_field_name("name"))
                        .map(|key| member_name(key, self.src))
                        .unwrap_or_else(|| "anonymous".to_string());
                    let signature = function_signature(
                        format!("{class_name}.{field}"),
                        SignatureKind::Method,
                        value,
                        line_of(member),
                        self.src,
                    );
                    self.sites.push(FunctionSite {
                        signature,
                        body: value.child_by_field_name("body"),
                    });
                }
                _ => {}
            }
        }
    }
}

/// Walk declarations in source order
pub(crate) fn collect_sites<'t>(root: Node<'t>, src: &str, scope: SiteScope) -> Vec<FunctionSite<'t>> {
    let mut collector = SiteCollector {
        src,
        scope,
        sites: Vec::new(),
        stack: Vec::new(),
    };
    collector.push_children(root);
    while let Some(node) = collector.stack.pop() {
        collector.visit(node);
    }
    collector.sites
}

fn declared_names(declaration: Node<'_>, src: &str) -> Vec<String> {
    if NodeKind::of(declaration) == NodeKind::VariableDeclaration {
        let mut cursor = declaration.walk();
        let names = declaration
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "variable_declarator")
            .filter_map(|declarator| declarator.child_by_field_name("name"))
            .filter(|name| name.kind() == "identifier")
            .map(|name| node_text(name, src).to_string())
            .collect();
        return names;
    }
    declaration
        .child_by_field_name("name")
        .map(|name| vec![node_text(name, src).to_string()])
        .unwrap_or_default()
}

fn export_clause_names(statement: Node<'_>, src: &str) -> Option<Vec<String>> {
    let mut cursor = statement.walk();
    let clause = statement
        .named_children(&mut cursor)
        .find(|child| child.kind() == "export_clause")?;
    let mut clause_cursor = clause.walk();
    let names = clause
        .named_children(&mut clause_cursor)
        .filter(|spec| spec.kind() == "export_specifier")
        .map(|spec| {
            spec.child_by_field_name("alias")
                .or_else(|| spec.child_by_field_name("name"))
                .map(|n| unquote(node_text(n, src)).to_string())
                .unwrap_or_else(|| "unknown".to_string())
        })
        .collect();
    Some(names)
}

/// Declarative (ESM) exports of a parsed module. Legacy assignment exports
/// are scanned separately and merged by the caller.
pub(crate) fn walk_exports(root: Node<'_>, src: &str) -> ExportSurface {
    let mut surface = ExportSurface::default();
    let mut cursor = root.walk();
    let statements: Vec<Node<'_>> = root
        .named_children(&mut cursor)
        .filter(|child| NodeKind::of(*child) == NodeKind::Export)
        .collect();

    for statement in statements {
        if let Some(source) = statement.child_by_field_name("source") {
            match export_clause_names(statement, src) {
                Some(names) => surface.re_exports.extend(names),
                None => surface
                    .re_exports
                    .push(format!("* from {}", unquote(node_text(source, src)))),
            }
        } else if has_token(statement, "default") {
            let name = if let Some(declaration) = statement.child_by_field_name("declaration") {
                declaration
                    .child_by_field_name("name")
                    .map(|n| node_text(n, src).to_string())
            } else {
                statement
                    .child_by_field_name("value")
                    .filter(|v| v.kind() == "identifier")
                    .map(|v| node_text(v, src).to_string())
            };
            surface.default = Some(name.unwrap_or_else(|| "anonymous".to_string()));
        } else if let Some(declaration) = statement.child_by_field_name("declaration") {
            surface.named.extend(declared_names(declaration, src));
        } else if let Some(names) = export_clause_names(statement, src) {
            surface.named.extend(names);
        }
    }
    surface
}
