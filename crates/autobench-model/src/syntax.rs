//! Syntax model
//!
//! The part of a parsed compilation unit the extractor needs: type
//! declarations with their members, and every call expression in source order.
//! Model providers translate their native trees into these types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One parsed source file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Source file path
    pub path: PathBuf,
    /// Class declarations, outer before nested, in source order
    pub types: Vec<TypeDecl>,
    /// Every call expression, pre-order
    pub calls: Vec<CallExpr>,
}

impl CompilationUnit {
    /// Create an empty unit for a path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            types: Vec::new(),
            calls: Vec::new(),
        }
    }
}

/// Member modifiers relevant to the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// `public`
    pub is_public: bool,
    /// `static`
    pub is_static: bool,
    /// `abstract`
    pub is_abstract: bool,
    /// `async`
    pub is_async: bool,
}

impl Modifiers {
    /// Public, nothing else
    #[must_use]
    pub fn public() -> Self {
        Self {
            is_public: true,
            ..Self::default()
        }
    }

    /// Build from modifier keywords
    #[must_use]
    pub fn from_keywords<'a>(keywords: impl IntoIterator<Item = &'a str>) -> Self {
        let mut modifiers = Self::default();
        for keyword in keywords {
            match keyword {
                "public" => modifiers.is_public = true,
                "static" => modifiers.is_static = true,
                "abstract" => modifiers.is_abstract = true,
                "async" => modifiers.is_async = true,
                _ => {}
            }
        }
        modifiers
    }
}

/// A class declaration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Simple name
    pub name: String,
    /// Enclosing namespace
    pub namespace: String,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Base types as written (class first, interfaces after)
    pub base_types: Vec<String>,
    /// Declares its own type parameters
    pub is_generic: bool,
    /// Parameters of a primary constructor, when declared
    pub primary_constructor: Option<Vec<ParamDecl>>,
    /// Explicit constructors in source order
    pub constructors: Vec<ConstructorDecl>,
    /// Methods in source order
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    /// Create a public class declaration
    #[must_use]
    pub fn public_class(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            modifiers: Modifiers::public(),
            ..Self::default()
        }
    }

    /// With base type
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_types.push(base.into());
        self
    }

    /// With constructor
    #[must_use]
    pub fn with_constructor(mut self, constructor: ConstructorDecl) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// With method
    #[must_use]
    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    /// Fully qualified name
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

/// A constructor declaration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstructorDecl {
    /// Modifiers
    pub modifiers: Modifiers,
    /// Parameters in order
    pub parameters: Vec<ParamDecl>,
}

impl ConstructorDecl {
    /// Public constructor with parameters
    #[must_use]
    pub fn public(parameters: Vec<ParamDecl>) -> Self {
        Self {
            modifiers: Modifiers::public(),
            parameters,
        }
    }
}

/// A method declaration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Method name
    pub name: String,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Return type as written
    pub return_type: String,
    /// Parameters in order
    pub parameters: Vec<ParamDecl>,
    /// Declares its own type parameters
    pub is_generic: bool,
}

impl MethodDecl {
    /// Public method
    #[must_use]
    pub fn public(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::public(),
            return_type: return_type.into(),
            parameters: Vec::new(),
            is_generic: false,
        }
    }

    /// With parameter
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, type_sig: impl Into<String>) -> Self {
        self.parameters.push(ParamDecl::new(name, type_sig));
        self
    }
}

/// A parameter declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ParamDecl {
    /// Parameter name
    pub name: String,
    /// Type as written
    pub type_sig: String,
}

impl ParamDecl {
    /// Create parameter
    #[must_use]
    pub fn new(name: impl Into<String>, type_sig: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_sig: type_sig.into(),
        }
    }
}

/// A call expression `receiver.method<type_args>(args)`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallExpr {
    /// Expression before the final member access, if any
    pub receiver: Option<Box<Expr>>,
    /// Invoked method name
    pub method: String,
    /// Explicit type arguments as written
    pub type_args: Vec<String>,
    /// Arguments in order
    pub args: Vec<Expr>,
}

impl CallExpr {
    /// Create a call without receiver
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ..Self::default()
        }
    }

    /// With receiver expression
    #[must_use]
    pub fn on(mut self, receiver: Expr) -> Self {
        self.receiver = Some(Box::new(receiver));
        self
    }

    /// With type argument
    #[must_use]
    pub fn with_type_arg(mut self, type_arg: impl Into<String>) -> Self {
        self.type_args.push(type_arg.into());
        self
    }

    /// With argument
    #[must_use]
    pub fn with_arg(mut self, arg: Expr) -> Self {
        self.args.push(arg);
        self
    }

    /// String literal value of the argument at `index`
    #[must_use]
    pub fn literal_arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).and_then(Expr::as_literal)
    }
}

/// Expression shapes the endpoint matchers distinguish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// Nested call
    Call(CallExpr),
    /// `target.name`
    Member {
        /// Accessed expression
        target: Box<Expr>,
        /// Member name
        name: String,
    },
    /// Bare identifier
    Identifier(String),
    /// String literal (unquoted value)
    StringLiteral(String),
    /// Anything else, kept as source text
    Other(String),
}

impl Expr {
    /// Member access helper
    #[must_use]
    pub fn member(target: Expr, name: impl Into<String>) -> Self {
        Expr::Member {
            target: Box::new(target),
            name: name.into(),
        }
    }

    /// Identifier helper
    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    /// String literal helper
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Expr::StringLiteral(value.into())
    }

    /// Literal value, if this is a string literal
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Expr::StringLiteral(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_from_keywords() {
        let modifiers = Modifiers::from_keywords(["public", "static", "partial"]);
        assert!(modifiers.is_public);
        assert!(modifiers.is_static);
        assert!(!modifiers.is_async);
    }

    #[test]
    fn literal_arg_ignores_non_literals() {
        let call = CallExpr::new("SendAsync")
            .with_arg(Expr::ident("json"))
            .with_arg(Expr::literal("ReceiveTelemetry"));

        assert_eq!(call.literal_arg(0), None);
        assert_eq!(call.literal_arg(1), Some("ReceiveTelemetry"));
        assert_eq!(call.literal_arg(2), None);
    }

    #[test]
    fn type_decl_full_name() {
        let decl = TypeDecl::public_class("Worker", "Apollo.SignalProcessor");
        assert_eq!(decl.full_name(), "Apollo.SignalProcessor.Worker");
    }
}
