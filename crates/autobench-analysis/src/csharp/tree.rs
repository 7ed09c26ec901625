//! tree-sitter C# tree → syntax model

use autobench_model::syntax::{
    CallExpr, CompilationUnit, ConstructorDecl, Expr, MethodDecl, Modifiers, ParamDecl, TypeDecl,
};
use std::path::Path;
use tree_sitter::Node;

/// Convert a parsed tree into a compilation unit
pub(crate) fn convert(root: Node<'_>, source: &str, path: &Path) -> CompilationUnit {
    let mut walker = Walker {
        source: source.as_bytes(),
        unit: CompilationUnit::new(path),
    };
    walker.visit_children(root, "");
    walker.collect_calls(root);
    walker.unit
}

struct Walker<'s> {
    source: &'s [u8],
    unit: CompilationUnit,
}

impl Walker<'_> {
    fn text(&self, node: Node<'_>) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }

    /// Source text with whitespace runs collapsed
    fn type_text(&self, node: Node<'_>) -> String {
        self.text(node).split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn visit_children(&mut self, node: Node<'_>, namespace: &str) {
        let mut current = namespace.to_string();
        for i in 0..node.named_child_count() {
            let Some(child) = node.named_child(i) else {
                continue;
            };
            if child.kind() == "file_scoped_namespace_declaration" {
                if let Some(name) = child.child_by_field_name("name") {
                    current = join(namespace, &self.text(name));
                }
            }
            self.visit(child, &current);
        }
    }

    fn visit(&mut self, node: Node<'_>, namespace: &str) {
        match node.kind() {
            "namespace_declaration" => {
                let nested = node
                    .child_by_field_name("name")
                    .map(|name| join(namespace, &self.text(name)))
                    .unwrap_or_else(|| namespace.to_string());
                self.visit_children(node, &nested);
            }
            "class_declaration" => {
                let decl = self.class(node, namespace);
                let inner = decl.full_name();
                self.unit.types.push(decl);
                if let Some(body) = body_of(node) {
                    self.visit_children(body, &inner);
                }
            }
            _ => self.visit_children(node, namespace),
        }
    }

    fn class(&self, node: Node<'_>, namespace: &str) -> TypeDecl {
        let mut decl = TypeDecl {
            name: node
                .child_by_field_name("name")
                .map(|name| self.text(name))
                .unwrap_or_default(),
            namespace: namespace.to_string(),
            modifiers: self.modifiers(node),
            ..TypeDecl::default()
        };

        for i in 0..node.named_child_count() {
            let Some(child) = node.named_child(i) else {
                continue;
            };
            match child.kind() {
                "base_list" => decl.base_types = self.base_list(child),
                "parameter_list" => decl.primary_constructor = Some(self.parameters(child)),
                "type_parameter_list" => decl.is_generic = true,
                _ => {}
            }
        }

        if let Some(body) = body_of(node) {
            for i in 0..body.named_child_count() {
                let Some(member) = body.named_child(i) else {
                    continue;
                };
                match member.kind() {
                    "constructor_declaration" => decl.constructors.push(ConstructorDecl {
                        modifiers: self.modifiers(member),
                        parameters: self.parameters_of(member),
                    }),
                    "method_declaration" => decl.methods.push(self.method(member)),
                    _ => {}
                }
            }
        }
        decl
    }

    fn method(&self, node: Node<'_>) -> MethodDecl {
        let return_type = node
            .child_by_field_name("returns")
            .or_else(|| node.child_by_field_name("type"))
            .map(|ty| self.type_text(ty))
            .unwrap_or_else(|| "void".to_string());

        let is_generic = node.child_by_field_name("type_parameters").is_some()
            || (0..node.named_child_count())
                .filter_map(|i| node.named_child(i))
                .any(|child| child.kind() == "type_parameter_list");

        MethodDecl {
            name: node
                .child_by_field_name("name")
                .map(|name| self.text(name))
                .unwrap_or_default(),
            modifiers: self.modifiers(node),
            return_type,
            parameters: self.parameters_of(node),
            is_generic,
        }
    }

    fn modifiers(&self, node: Node<'_>) -> Modifiers {
        let keywords: Vec<String> = (0..node.child_count())
            .filter_map(|i| node.child(i))
            .filter(|child| child.kind() == "modifier")
            .map(|child| self.text(child))
            .collect();
        Modifiers::from_keywords(keywords.iter().map(String::as_str))
    }

    fn base_list(&self, node: Node<'_>) -> Vec<String> {
        (0..node.named_child_count())
            .filter_map(|i| node.named_child(i))
            .filter(|child| child.kind() != "argument_list")
            .map(|child| {
                // `Base(args)` in a primary-constructor base list
                let ty = if child.kind() == "primary_constructor_base_type" {
                    child.named_child(0).unwrap_or(child)
                } else {
                    child
                };
                self.type_text(ty)
            })
            .collect()
    }

    fn parameters_of(&self, node: Node<'_>) -> Vec<ParamDecl> {
        node.child_by_field_name("parameters")
            .or_else(|| {
                (0..node.named_child_count())
                    .filter_map(|i| node.named_child(i))
                    .find(|child| child.kind() == "parameter_list")
            })
            .map(|list| self.parameters(list))
            .unwrap_or_default()
    }

    fn parameters(&self, list: Node<'_>) -> Vec<ParamDecl> {
        (0..list.named_child_count())
            .filter_map(|i| list.named_child(i))
            .filter(|child| child.kind() == "parameter")
            .map(|param| {
                let name = param
                    .child_by_field_name("name")
                    .map(|name| self.text(name))
                    .unwrap_or_default();
                let type_sig = param
                    .child_by_field_name("type")
                    .map(|ty| self.type_text(ty))
                    .unwrap_or_default();
                ParamDecl::new(name, type_sig)
            })
            .collect()
    }

    /// Every invocation in pre-order
    fn collect_calls(&mut self, node: Node<'_>) {
        if node.kind() == "invocation_expression" {
            let call = self.call(node);
            self.unit.calls.push(call);
        }
        for i in 0..node.named_child_count() {
            if let Some(child) = node.named_child(i) {
                self.collect_calls(child);
            }
        }
    }

    fn call(&self, node: Node<'_>) -> CallExpr {
        let function = node
            .child_by_field_name("function")
            .or_else(|| node.named_child(0));
        let arguments = node.child_by_field_name("arguments").or_else(|| {
            (0..node.named_child_count())
                .filter_map(|i| node.named_child(i))
                .find(|child| child.kind() == "argument_list")
        });

        let mut call = match function {
            Some(func) if func.kind() == "member_access_expression" => {
                let (method, type_args) = func
                    .child_by_field_name("name")
                    .map(|name| self.name_parts(name))
                    .unwrap_or_default();
                let mut call = CallExpr {
                    method,
                    type_args,
                    ..CallExpr::default()
                };
                if let Some(target) = func.child_by_field_name("expression") {
                    call.receiver = Some(Box::new(self.expr(target)));
                }
                call
            }
            Some(func) if matches!(func.kind(), "identifier" | "generic_name") => {
                let (method, type_args) = self.name_parts(func);
                CallExpr {
                    method,
                    type_args,
                    ..CallExpr::default()
                }
            }
            Some(func) => CallExpr::new(self.text(func)),
            None => CallExpr::default(),
        };

        if let Some(list) = arguments {
            call.args = (0..list.named_child_count())
                .filter_map(|i| list.named_child(i))
                .filter(|child| child.kind() == "argument")
                .filter_map(|arg| {
                    let count = arg.named_child_count();
                    count.checked_sub(1).and_then(|last| arg.named_child(last))
                })
                .map(|value| self.expr(value))
                .collect();
        }
        call
    }

    fn name_parts(&self, node: Node<'_>) -> (String, Vec<String>) {
        if node.kind() != "generic_name" {
            return (self.text(node), Vec::new());
        }
        let mut name = String::new();
        let mut type_args = Vec::new();
        for i in 0..node.named_child_count() {
            let Some(child) = node.named_child(i) else {
                continue;
            };
            match child.kind() {
                "identifier" => name = self.text(child),
                "type_argument_list" => {
                    type_args = (0..child.named_child_count())
                        .filter_map(|j| child.named_child(j))
                        .map(|ty| self.type_text(ty))
                        .collect();
                }
                _ => {}
            }
        }
        (name, type_args)
    }

    fn expr(&self, node: Node<'_>) -> Expr {
        match node.kind() {
            "invocation_expression" => Expr::Call(self.call(node)),
            "member_access_expression" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|name| self.name_parts(name).0)
                    .unwrap_or_default();
                match node.child_by_field_name("expression") {
                    Some(target) => Expr::member(self.expr(target), name),
                    None => Expr::Other(self.text(node)),
                }
            }
            "identifier" => Expr::Identifier(self.text(node)),
            "string_literal" | "verbatim_string_literal" | "raw_string_literal" => {
                Expr::StringLiteral(unquote(&self.text(node)))
            }
            "parenthesized_expression" => node
                .named_child(0)
                .map_or_else(|| Expr::Other(self.text(node)), |inner| self.expr(inner)),
            _ => Expr::Other(self.text(node)),
        }
    }
}

fn body_of(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("body").or_else(|| {
        (0..node.named_child_count())
            .filter_map(|i| node.named_child(i))
            .find(|child| child.kind() == "declaration_list")
    })
}

fn join(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

/// Strip the delimiters of a regular, verbatim or raw string literal
fn unquote(text: &str) -> String {
    let text = text.strip_prefix('@').unwrap_or(text);
    if text.starts_with("\"\"\"") {
        let quotes = text.chars().take_while(|&c| c == '"').count();
        if text.len() >= quotes * 2 {
            return text[quotes..text.len() - quotes].trim().to_string();
        }
    }
    text.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text)
        .to_string()
}
