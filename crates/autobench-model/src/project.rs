//! Project model
//!
//! Built once per analysis pass by the extractor and read-only afterwards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project category, derived from the build manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectKind {
    /// No manifest available
    #[default]
    Unknown,
    /// Executable hosting web endpoints
    Service,
    /// Plain executable
    Console,
    /// Non-executable library
    Library,
}

impl ProjectKind {
    /// Whether the project produces a runnable executable
    #[inline]
    #[must_use]
    pub fn is_executable(&self) -> bool {
        matches!(self, ProjectKind::Service | ProjectKind::Console)
    }
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProjectKind::Unknown => "Unknown",
            ProjectKind::Service => "Service",
            ProjectKind::Console => "Console",
            ProjectKind::Library => "Library",
        };
        write!(f, "{}", name)
    }
}

/// One compiled project of the analyzed solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectModel {
    /// Project name
    pub name: String,
    /// Path to the project manifest
    pub path: PathBuf,
    /// Project category
    pub kind: ProjectKind,
    /// Public types with at least one public method
    pub types: Vec<TypeModel>,
    /// Detected live-messaging endpoint (Service projects only)
    pub hub_endpoint: Option<HubEndpointModel>,
}

impl ProjectModel {
    /// Create an empty project model
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: ProjectKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            types: Vec::new(),
            hub_endpoint: None,
        }
    }

    /// With types
    #[must_use]
    pub fn with_types(mut self, types: Vec<TypeModel>) -> Self {
        self.types = types;
        self
    }

    /// With hub endpoint
    #[must_use]
    pub fn with_hub_endpoint(mut self, hub: HubEndpointModel) -> Self {
        self.hub_endpoint = Some(hub);
        self
    }

    /// Project name with dots removed, usable as an identifier fragment
    #[must_use]
    pub fn safe_name(&self) -> String {
        self.name.replace('.', "")
    }

    /// Directory that holds the project manifest
    #[must_use]
    pub fn directory(&self) -> PathBuf {
        self.path
            .parent()
            .map(std::path::Path::to_path_buf)
            .unwrap_or_default()
    }
}

/// A public class with at least one public method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeModel {
    /// Simple name
    pub name: String,
    /// Containing namespace (empty for the global namespace)
    pub namespace: String,
    /// Fully qualified name
    pub full_name: String,
    /// Parameters of the first public constructor, in declaration order
    pub constructor_params: Vec<ParameterModel>,
    /// Public, non-generic methods
    pub public_methods: Vec<MethodModel>,
    /// Derives from a hosted-service, hub or controller base type
    pub is_infrastructure: bool,
    /// Declared `static`
    pub is_static: bool,
    /// Declared `abstract`
    pub is_abstract: bool,
    /// False when constructors exist but none of them is public
    pub has_accessible_constructor: bool,
}

impl TypeModel {
    /// Create a type model with a default constructor and no methods
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        let name = name.into();
        let namespace = namespace.into();
        let full_name = if namespace.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", namespace, name)
        };
        Self {
            name,
            namespace,
            full_name,
            constructor_params: Vec::new(),
            public_methods: Vec::new(),
            is_infrastructure: false,
            is_static: false,
            is_abstract: false,
            has_accessible_constructor: true,
        }
    }

    /// With constructor parameters
    #[must_use]
    pub fn with_constructor(mut self, params: Vec<ParameterModel>) -> Self {
        self.constructor_params = params;
        self
    }

    /// With an additional public method
    #[must_use]
    pub fn with_method(mut self, method: MethodModel) -> Self {
        self.public_methods.push(method);
        self
    }

    /// Mark as infrastructure
    #[must_use]
    pub fn infrastructure(mut self) -> Self {
        self.is_infrastructure = true;
        self
    }
}

/// How a method's return value is consumed as a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SequenceKind {
    /// Not a sequence
    #[default]
    None,
    /// `IEnumerable<T>`
    Sync,
    /// `IAsyncEnumerable<T>`
    Async,
}

/// A public method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodModel {
    /// Method name
    pub name: String,
    /// Return type as written
    pub return_type: String,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterModel>,
    /// Awaitable (async modifier or task-like return)
    pub is_async: bool,
    /// Declared `static`
    pub is_static: bool,
    /// Lazy sequence shape of the return type
    pub sequence: SequenceKind,
}

impl MethodModel {
    /// Create a synchronous method returning `void`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: "void".to_string(),
            parameters: Vec::new(),
            is_async: false,
            is_static: false,
            sequence: SequenceKind::None,
        }
    }

    /// With return type
    #[must_use]
    pub fn returning(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = return_type.into();
        self
    }

    /// With parameter
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, type_sig: impl Into<String>) -> Self {
        self.parameters.push(ParameterModel::new(name, type_sig));
        self
    }

    /// Mark async
    #[must_use]
    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// With sequence kind
    #[must_use]
    pub fn with_sequence(mut self, sequence: SequenceKind) -> Self {
        self.sequence = sequence;
        self
    }
}

/// Name and type signature of a parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterModel {
    /// Parameter name
    pub name: String,
    /// Type signature as resolved by the model provider
    pub type_sig: String,
}

impl ParameterModel {
    /// Create parameter
    #[must_use]
    pub fn new(name: impl Into<String>, type_sig: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_sig: type_sig.into(),
        }
    }
}

/// A detected live-messaging endpoint
///
/// Only ever built with a non-empty mount path and callback name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubEndpointModel {
    /// Hub type (fully qualified when resolvable)
    pub hub_type: String,
    /// Mount path, e.g. `/hubs/telemetry`
    pub mount_path: String,
    /// Client callback method name
    pub callback_method: String,
    /// Group topic; `None` means every client receives every message
    pub subscription_topic: Option<String>,
}

impl HubEndpointModel {
    /// Whether delivery is unconditional (no subscription needed)
    #[inline]
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self.subscription_topic.is_none()
    }
}
