//! Argument synthesis and eligibility rules
//!
//! Pure decision tables: which parameter types can be fabricated, which
//! source literal stands in for them, and which types are safe to exercise.
//!
//! | Parameter type | Constructor literal | Method literal |
//! |----------------|---------------------|----------------|
//! | `ILogger<T>` | `NullLogger<T>.Instance` | `default` |
//! | `IOptions<T>` | `Options.Create(new T())` | `default` |
//! | `IMemoryCache` | `new MemoryCache(new MemoryCacheOptions())` | `default` |
//! | primitives | fixed sample value | fixed sample value |
//! | `DateTime`, `Guid` | not fabricable | current time, new id |

use autobench_model::{ParameterModel, TypeModel};

/// Literal used when no rule matches a method parameter
pub const DEFAULT_LITERAL: &str = "default";

/// A type signature split into name and generic arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSig {
    /// Possibly qualified name without generic arguments
    pub name: String,
    /// Top-level generic arguments as written
    pub args: Vec<String>,
    /// Declared with a trailing `?`
    pub nullable: bool,
}

impl TypeSig {
    /// Parse a type signature
    #[must_use]
    pub fn parse(sig: &str) -> Self {
        let mut text = sig.trim();
        text = text.strip_prefix("global::").unwrap_or(text);

        let nullable = text.ends_with('?');
        if nullable {
            text = text[..text.len() - 1].trim_end();
        }

        match (text.find('<'), text.rfind('>')) {
            (Some(open), Some(close)) if close > open && close == text.len() - 1 => Self {
                name: text[..open].trim().to_string(),
                args: split_top_level(&text[open + 1..close]),
                nullable,
            },
            _ => Self {
                name: text.to_string(),
                args: Vec::new(),
                nullable,
            },
        }
    }

    /// Name after the last namespace separator
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Whether the type is `Simple<A>` with exactly one argument
    fn is_single_generic(&self, simple: &str) -> bool {
        self.simple_name() == simple && self.args.len() == 1
    }
}

/// Split a generic argument list on commas that are not nested
fn split_top_level(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..idx].trim().to_string());
                start = idx + 1;
            }
            _ => {}
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        parts.push(last.to_string());
    }
    parts
}

/// Sample literal for a primitive type (keyword or `System.*` spelling)
fn primitive_literal(sig: &TypeSig) -> Option<&'static str> {
    if !sig.args.is_empty() || sig.nullable {
        return None;
    }
    let literal = match sig.name.as_str() {
        "string" | "System.String" | "String" => "\"sample\"",
        "int" | "System.Int32" | "Int32" => "42",
        "long" | "System.Int64" | "Int64" => "42L",
        "bool" | "System.Boolean" | "Boolean" => "true",
        "double" | "System.Double" | "Double" => "42.0",
        "float" | "System.Single" | "Single" => "42.0f",
        "decimal" | "System.Decimal" | "Decimal" => "42m",
        _ => return None,
    };
    Some(literal)
}

/// Framework namespace a constructor literal needs imported
#[must_use]
pub fn required_namespace(type_sig: &str) -> Option<&'static str> {
    let sig = TypeSig::parse(type_sig);
    if sig.is_single_generic("ILogger") {
        Some("Microsoft.Extensions.Logging.Abstractions")
    } else if sig.is_single_generic("IOptions") {
        Some("Microsoft.Extensions.Options")
    } else if sig.simple_name() == "IMemoryCache" && sig.args.is_empty() {
        Some("Microsoft.Extensions.Caching.Memory")
    } else {
        None
    }
}

/// Source literal for a constructor parameter, `None` when not fabricable
#[must_use]
pub fn constructor_argument(type_sig: &str) -> Option<String> {
    let sig = TypeSig::parse(type_sig);
    if sig.nullable {
        return None;
    }

    if sig.is_single_generic("ILogger") {
        return Some(format!(
            "Microsoft.Extensions.Logging.Abstractions.NullLogger<{}>.Instance",
            sig.args[0]
        ));
    }
    if sig.is_single_generic("IOptions") {
        return Some(format!("Options.Create(new {}())", sig.args[0]));
    }
    if sig.simple_name() == "IMemoryCache" && sig.args.is_empty() {
        return Some("new MemoryCache(new MemoryCacheOptions())".to_string());
    }

    primitive_literal(&sig).map(str::to_string)
}

/// Whether a constructor parameter type can be fabricated
#[inline]
#[must_use]
pub fn is_fabricable(type_sig: &str) -> bool {
    constructor_argument(type_sig).is_some()
}

/// Source literal for a method parameter; never fails
#[must_use]
pub fn method_argument(type_sig: &str) -> String {
    let sig = TypeSig::parse(type_sig);
    if let Some(literal) = primitive_literal(&sig) {
        return literal.to_string();
    }
    if sig.args.is_empty() && !sig.nullable {
        match sig.name.as_str() {
            "DateTime" | "System.DateTime" => return "DateTime.UtcNow".to_string(),
            "Guid" | "System.Guid" => return "Guid.NewGuid()".to_string(),
            _ => {}
        }
    }
    DEFAULT_LITERAL.to_string()
}

/// Comma-separated constructor literals, `None` if any parameter is not fabricable
#[must_use]
pub fn constructor_arguments(params: &[ParameterModel]) -> Option<Vec<String>> {
    params
        .iter()
        .map(|param| constructor_argument(&param.type_sig))
        .collect()
}

/// Whether a type may receive a unit harness
///
/// Requires every constructor parameter to be fabricable, no infrastructure
/// ancestry, an accessible constructor and a concrete class. Static classes
/// qualify without construction.
#[must_use]
pub fn is_unit_eligible(ty: &TypeModel) -> bool {
    if ty.is_infrastructure || ty.public_methods.is_empty() {
        return false;
    }
    if ty.is_static {
        return true;
    }
    !ty.is_abstract
        && ty.has_accessible_constructor
        && ty
            .constructor_params
            .iter()
            .all(|param| is_fabricable(&param.type_sig))
}
