//! Unit harness synthesis
//!
//! One `[MemoryDiagnoser]` class per eligible type. Construction happens once
//! in `[GlobalSetup]`; each public method becomes a `Measure_<Method>`
//! benchmark shaped by how its result is consumed.

use crate::config::HarnessConfig;
use autobench_analysis::synthesis::{self, is_unit_eligible};
use autobench_model::{MethodModel, ProjectModel, SequenceKind, TypeModel};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// A synthesized harness source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessSource {
    /// Harness class name (also the file stem)
    pub class_name: String,
    /// C# source text
    pub source: String,
}

impl HarnessSource {
    /// File name inside the generated project
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.cs", self.class_name)
    }
}

/// Unit harnesses for a solution, with the projects they exercise
#[derive(Debug, Clone, Default)]
pub struct UnitPlan {
    /// Harness sources in project then type order
    pub harnesses: Vec<HarnessSource>,
    /// Indices into the input projects that have at least one harness
    pub exercised: Vec<usize>,
}

/// Build unit harnesses for every eligible type
#[must_use]
pub fn plan_unit(projects: &[ProjectModel], config: &HarnessConfig) -> UnitPlan {
    let eligible: Vec<(usize, &TypeModel)> = projects
        .iter()
        .enumerate()
        .flat_map(|(idx, project)| project.types.iter().map(move |ty| (idx, ty)))
        .filter(|(_, ty)| {
            let eligible = is_unit_eligible(ty);
            if !eligible {
                debug!(type_name = %ty.full_name, "Type not eligible for unit harness");
            }
            eligible
        })
        .collect();

    let mut simple_counts: HashMap<&str, usize> = HashMap::new();
    for (_, ty) in &eligible {
        *simple_counts.entry(ty.name.as_str()).or_default() += 1;
    }

    let mut plan = UnitPlan::default();
    let mut used = HashSet::new();
    for (idx, ty) in eligible {
        let base = if simple_counts.get(ty.name.as_str()).copied().unwrap_or(0) > 1 {
            format!("{}{}Benchmarks", ty.namespace.replace('.', ""), ty.name)
        } else {
            format!("{}Benchmarks", ty.name)
        };
        let class_name = unique_name(&base, &mut used);

        if !is_identifier(&class_name) {
            warn!(type_name = %ty.full_name, class = %class_name, "Skipping type without a valid harness name");
            continue;
        }
        let Some(source) = unit_source(ty, &class_name, config) else {
            warn!(type_name = %ty.full_name, "Skipping type with unfabricable constructor");
            continue;
        };

        plan.harnesses.push(HarnessSource { class_name, source });
        if !plan.exercised.contains(&idx) {
            plan.exercised.push(idx);
        }
    }
    plan
}

/// Render the harness class for one type
///
/// Returns `None` when a constructor argument cannot be fabricated.
#[must_use]
pub fn unit_source(ty: &TypeModel, class_name: &str, config: &HarnessConfig) -> Option<String> {
    let construct = !ty.is_static;
    let args = if construct {
        synthesis::constructor_arguments(&ty.constructor_params)?
    } else {
        Vec::new()
    };

    let mut usings = vec!["BenchmarkDotNet.Attributes"];
    if construct {
        for param in &ty.constructor_params {
            if let Some(ns) = synthesis::required_namespace(&param.type_sig) {
                if !usings.contains(&ns) {
                    usings.push(ns);
                }
            }
        }
    }

    let mut out = String::new();
    for ns in &usings {
        out.push_str(&format!("using {};\n", ns));
    }
    out.push('\n');
    out.push_str(&format!("namespace {};\n\n", config.namespace));
    out.push_str("[MemoryDiagnoser]\n");
    out.push_str(&format!("public class {}\n{{\n", class_name));

    if construct {
        out.push_str(&format!("    private {}? _testSubject;\n\n", ty.full_name));
        out.push_str("    [GlobalSetup]\n");
        out.push_str("    public void Initialize()\n    {\n");
        if args.is_empty() {
            out.push_str(&format!("        _testSubject = new {}();\n", ty.full_name));
        } else {
            let joined = args
                .iter()
                .map(|arg| format!("            {}", arg))
                .collect::<Vec<_>>()
                .join(",\n");
            out.push_str(&format!("        _testSubject = new {}(\n{});\n", ty.full_name, joined));
        }
        out.push_str("    }\n\n");
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for method in &ty.public_methods {
        let count = seen.entry(method.name.as_str()).or_default();
        *count += 1;
        let bench_name = if *count == 1 {
            format!("Measure_{}", method.name)
        } else {
            format!("Measure_{}_{}", method.name, count)
        };

        let receiver = if method.is_static || ty.is_static {
            ty.full_name.clone()
        } else {
            "_testSubject!".to_string()
        };
        out.push_str(&benchmark_method(method, &bench_name, &receiver));
        out.push('\n');
    }

    // trailing blank line after the last member
    if out.ends_with("\n\n") {
        out.pop();
    }
    out.push_str("}\n");
    Some(out)
}

fn benchmark_method(method: &MethodModel, bench_name: &str, receiver: &str) -> String {
    let args = method
        .parameters
        .iter()
        .map(|param| synthesis::method_argument(&param.type_sig))
        .collect::<Vec<_>>()
        .join(", ");
    let invocation = format!("{}.{}({})", receiver, method.name, args);

    let mut out = String::from("    [Benchmark]\n");
    match method.sequence {
        SequenceKind::Async => {
            out.push_str(&format!("    public async Task {}()\n    {{\n", bench_name));
            out.push_str(&format!("        await foreach (var _ in {})\n", invocation));
            out.push_str("        {\n            break;\n        }\n");
        }
        SequenceKind::Sync => {
            out.push_str(&format!("    public void {}()\n    {{\n", bench_name));
            out.push_str(&format!("        foreach (var _ in {})\n", invocation));
            out.push_str("        {\n            break;\n        }\n");
        }
        SequenceKind::None if is_awaitable(method) => {
            out.push_str(&format!("    public async Task {}()\n    {{\n", bench_name));
            out.push_str(&format!("        await {};\n", invocation));
        }
        SequenceKind::None => {
            out.push_str(&format!("    public void {}()\n    {{\n", bench_name));
            out.push_str(&format!("        {};\n", invocation));
        }
    }
    out.push_str("    }\n");
    out
}

/// `async void` methods cannot be awaited
fn is_awaitable(method: &MethodModel) -> bool {
    method.is_async && method.return_type.trim() != "void"
}

pub(crate) fn unique_name(base: &str, used: &mut HashSet<String>) -> String {
    let mut name = base.to_string();
    let mut suffix = 2;
    while !used.insert(name.clone()) {
        name = format!("{}{}", base, suffix);
        suffix += 1;
    }
    name
}

/// Whether `name` is a plain C# identifier
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
