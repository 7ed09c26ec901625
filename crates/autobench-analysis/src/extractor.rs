//! Type and endpoint extraction
//!
//! Turns a loaded [`SolutionSource`] into [`ProjectModel`]s:
//! - public classes with at least one public, non-generic method become types
//! - constructor parameters come from the first public constructor
//! - ancestry through hosted-service, hub or controller bases marks
//!   infrastructure
//! - Service projects are scanned for a live-messaging endpoint
//!
//! Projects with no sources or no qualifying types are dropped.

use crate::classifier::classify;
use crate::endpoint::{find_mount, find_send, EndpointPatterns};
use crate::provider::{simple_name, SolutionSource, SourceProject};
use autobench_model::syntax::{MethodDecl, ParamDecl, TypeDecl};
use autobench_model::{
    HubEndpointModel, MethodModel, ParameterModel, ProjectKind, ProjectModel, SequenceKind,
    TypeModel,
};
use tracing::{debug, info};

/// Base types that mark a class as hosting infrastructure
pub const INFRASTRUCTURE_MARKERS: &[&str] =
    &["BackgroundService", "Hub", "ControllerBase", "Controller"];

/// Builds the project model from a loaded solution
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    patterns: EndpointPatterns,
}

impl Extractor {
    /// Create extractor with endpoint patterns
    #[inline]
    #[must_use]
    pub fn new(patterns: EndpointPatterns) -> Self {
        Self { patterns }
    }

    /// Extract every qualifying project, in manifest order
    #[must_use]
    pub fn extract(&self, solution: &SolutionSource) -> Vec<ProjectModel> {
        let projects: Vec<ProjectModel> = solution
            .projects
            .iter()
            .filter_map(|project| self.extract_project(project, solution))
            .collect();

        info!(
            solution = %solution.name(),
            projects = projects.len(),
            types = projects.iter().map(|p| p.types.len()).sum::<usize>(),
            "Extracted project model"
        );
        projects
    }

    /// Extract one project; `None` when it has no sources or no qualifying types
    #[must_use]
    pub fn extract_project(
        &self,
        project: &SourceProject,
        solution: &SolutionSource,
    ) -> Option<ProjectModel> {
        if project.units.is_empty() {
            debug!(project = %project.name, "Skipping project without sources");
            return None;
        }

        let types: Vec<TypeModel> = project
            .type_decls()
            .filter_map(|decl| self.type_model(decl, solution))
            .collect();
        if types.is_empty() {
            debug!(project = %project.name, "Skipping project without public types");
            return None;
        }

        let kind = classify(project.manifest_text.as_deref());
        let mut model = ProjectModel::new(&project.name, &project.manifest_path, kind).with_types(types);

        if kind == ProjectKind::Service {
            if let Some(hub) = self.detect_endpoint(project, solution) {
                debug!(
                    project = %project.name,
                    path = %hub.mount_path,
                    callback = %hub.callback_method,
                    "Detected hub endpoint"
                );
                model = model.with_hub_endpoint(hub);
            }
        }
        Some(model)
    }

    /// Run both matchers over the project's calls and merge their results
    #[must_use]
    pub fn detect_endpoint(
        &self,
        project: &SourceProject,
        solution: &SolutionSource,
    ) -> Option<HubEndpointModel> {
        let calls = || project.units.iter().flat_map(|unit| unit.calls.iter());
        let mount = find_mount(calls(), &self.patterns)?;
        let send = find_send(calls(), &self.patterns)?;

        let hub_type = solution
            .resolve_type(&mount.hub_type)
            .map_or(mount.hub_type.clone(), str::to_string);

        Some(HubEndpointModel {
            hub_type,
            mount_path: mount.path,
            callback_method: send.callback,
            subscription_topic: send.topic,
        })
    }

    fn type_model(&self, decl: &TypeDecl, solution: &SolutionSource) -> Option<TypeModel> {
        if !decl.modifiers.is_public || decl.is_generic || decl.name.is_empty() {
            return None;
        }

        let methods: Vec<MethodModel> = decl
            .methods
            .iter()
            .filter(|method| method.modifiers.is_public && !method.is_generic)
            .map(|method| method_model(method, solution))
            .collect();
        if methods.is_empty() {
            return None;
        }

        let mut ty = TypeModel::new(&decl.name, &decl.namespace);
        ty.public_methods = methods;
        ty.is_static = decl.modifiers.is_static;
        ty.is_abstract = decl.modifiers.is_abstract;

        // Primary constructor precedes explicit ones in source
        let first_public = decl.primary_constructor.as_deref().or_else(|| {
            decl.constructors
                .iter()
                .find(|ctor| ctor.modifiers.is_public)
                .map(|ctor| ctor.parameters.as_slice())
        });
        match first_public {
            Some(params) => ty.constructor_params = parameter_models(params, solution),
            None => ty.has_accessible_constructor = decl.constructors.is_empty(),
        }

        ty.is_infrastructure = solution
            .ancestor_names(&decl.base_types)
            .iter()
            .any(|name| INFRASTRUCTURE_MARKERS.contains(&name.as_str()));

        Some(ty)
    }
}

fn parameter_models(params: &[ParamDecl], solution: &SolutionSource) -> Vec<ParameterModel> {
    params
        .iter()
        .map(|param| ParameterModel::new(&param.name, solution.qualify(&param.type_sig)))
        .collect()
}

fn method_model(method: &MethodDecl, solution: &SolutionSource) -> MethodModel {
    let return_name = simple_name(&method.return_type);
    let sequence = match return_name {
        "IAsyncEnumerable" => SequenceKind::Async,
        "IEnumerable" => SequenceKind::Sync,
        _ => SequenceKind::None,
    };

    MethodModel {
        name: method.name.clone(),
        return_type: method.return_type.clone(),
        parameters: parameter_models(&method.parameters, solution),
        is_async: method.modifiers.is_async || matches!(return_name, "Task" | "ValueTask"),
        is_static: method.modifiers.is_static,
        sequence,
    }
}
