//! C# source-model provider
//!
//! Loads `.slnx`/`.sln` solutions with tree-sitter:
//! - project manifests are read as text for classification
//! - every `.cs` file below a project directory is parsed, skipping build output
//! - parsing runs on the blocking pool, one file at a time per project

mod tree;

use crate::error::{AnalysisError, AnalysisResult};
use crate::manifest::{project_paths, SolutionFormat};
use crate::provider::{SolutionSource, SourceModelProvider, SourceProject};
use autobench_model::syntax::CompilationUnit;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const SKIPPED_DIRS: &[&str] = &["bin", "obj", ".git"];

/// Handle to the loaded C# grammar
///
/// Created once by the entry point and passed to the provider.
#[derive(Clone)]
pub struct CSharpToolchain {
    language: tree_sitter::Language,
}

impl std::fmt::Debug for CSharpToolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CSharpToolchain").finish_non_exhaustive()
    }
}

impl CSharpToolchain {
    /// Load the grammar and verify a parser accepts it
    ///
    /// # Errors
    /// Returns `ParserInit` if the grammar ABI is incompatible.
    pub fn initialize() -> AnalysisResult<Self> {
        let language: tree_sitter::Language = tree_sitter_c_sharp::LANGUAGE.into();
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| AnalysisError::ParserInit(e.to_string()))?;
        Ok(Self { language })
    }

    fn parser(&self) -> AnalysisResult<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| AnalysisError::ParserInit(e.to_string()))?;
        Ok(parser)
    }

    /// Parse one source file into a compilation unit
    ///
    /// # Errors
    /// Returns `ParseFailed` when tree-sitter produces no tree.
    pub fn parse_source(&self, path: &Path, source: &str) -> AnalysisResult<CompilationUnit> {
        let mut parser = self.parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::ParseFailed(path.to_path_buf()))?;
        Ok(tree::convert(tree.root_node(), source, path))
    }
}

/// tree-sitter backed [`SourceModelProvider`]
#[derive(Debug, Clone)]
pub struct CSharpModelProvider {
    toolchain: CSharpToolchain,
}

impl CSharpModelProvider {
    /// Create provider from an initialized toolchain
    #[inline]
    #[must_use]
    pub fn new(toolchain: CSharpToolchain) -> Self {
        Self { toolchain }
    }

    async fn load_project(&self, manifest_path: PathBuf) -> AnalysisResult<SourceProject> {
        let name = manifest_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut project = SourceProject::new(name, manifest_path.clone());

        match tokio::fs::read_to_string(&manifest_path).await {
            Ok(text) => project.manifest_text = Some(text),
            Err(err) => {
                warn!(project = %manifest_path.display(), error = %err, "Project manifest unreadable");
                return Ok(project);
            }
        }

        let Some(dir) = manifest_path.parent().map(Path::to_path_buf) else {
            return Ok(project);
        };
        let toolchain = self.toolchain.clone();
        project.units = tokio::task::spawn_blocking(move || parse_directory(&toolchain, &dir))
            .await
            .map_err(|e| AnalysisError::Task(e.to_string()))??;

        debug!(
            project = %project.name,
            units = project.units.len(),
            "Parsed project sources"
        );
        Ok(project)
    }
}

#[async_trait::async_trait]
impl SourceModelProvider for CSharpModelProvider {
    async fn load_solution(&self, solution_path: &Path) -> AnalysisResult<SolutionSource> {
        if !solution_path.is_file() {
            return Err(AnalysisError::SolutionNotFound(solution_path.to_path_buf()));
        }
        let format = SolutionFormat::from_path(solution_path)?;
        let text = tokio::fs::read_to_string(solution_path)
            .await
            .map_err(|e| AnalysisError::io_error(solution_path, e))?;

        let mut projects = Vec::new();
        for manifest in project_paths(solution_path, &text, format) {
            projects.push(self.load_project(manifest).await?);
        }
        Ok(SolutionSource::new(solution_path, projects))
    }
}

/// Parse every source file below a project directory, sorted by path
fn parse_directory(toolchain: &CSharpToolchain, dir: &Path) -> AnalysisResult<Vec<CompilationUnit>> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("cs")))
        .collect();
    files.sort();

    let mut units = Vec::with_capacity(files.len());
    for path in files {
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "Skipping unreadable source file");
                continue;
            }
        };
        units.push(toolchain.parse_source(&path, &source)?);
    }
    Ok(units)
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && SKIPPED_DIRS
            .iter()
            .any(|skip| entry.file_name().to_string_lossy().eq_ignore_ascii_case(skip))
}

#[cfg(test)]
mod tests {
    use super::*;
    use autobench_model::syntax::Expr;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> CompilationUnit {
        let toolchain = CSharpToolchain::initialize().expect("grammar loads");
        toolchain
            .parse_source(Path::new("Test.cs"), source)
            .expect("source parses")
    }

    #[test]
    fn extracts_file_scoped_namespace_and_members() {
        let unit = parse(
            r#"
namespace Apollo.SignalProcessor;

public class SignalFilter
{
    private readonly ILogger<SignalFilter> _logger;

    public SignalFilter(ILogger<SignalFilter> logger, int window)
    {
        _logger = logger;
    }

    public double Smooth(double value) => value;

    public async Task<int> FlushAsync() { await Task.Yield(); return 1; }

    public T Echo<T>(T value) => value;

    private void Hidden() { }
}
"#,
        );

        assert_eq!(unit.types.len(), 1);
        let decl = &unit.types[0];
        assert_eq!(decl.full_name(), "Apollo.SignalProcessor.SignalFilter");
        assert!(decl.modifiers.is_public);
        assert_eq!(decl.constructors.len(), 1);
        assert_eq!(decl.constructors[0].parameters[0].type_sig, "ILogger<SignalFilter>");
        assert_eq!(decl.constructors[0].parameters[1].name, "window");

        let names: Vec<_> = decl.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Smooth", "FlushAsync", "Echo", "Hidden"]);
        assert!(decl.methods[1].modifiers.is_async);
        assert_eq!(decl.methods[1].return_type, "Task<int>");
        assert!(decl.methods[2].is_generic);
        assert!(!decl.methods[3].modifiers.is_public);
    }

    #[test]
    fn extracts_block_namespace_and_bases() {
        let unit = parse(
            r#"
namespace Juno.Monitor
{
    public sealed class TelemetryWorker : BackgroundService, IDisposable
    {
        protected override Task ExecuteAsync(CancellationToken token) => Task.CompletedTask;
    }
}
"#,
        );
        let decl = &unit.types[0];
        assert_eq!(decl.namespace, "Juno.Monitor");
        assert_eq!(decl.base_types, vec!["BackgroundService".to_string(), "IDisposable".to_string()]);
    }

    #[test]
    fn extracts_hub_calls_with_literals() {
        let unit = parse(
            r#"
var app = builder.Build();
app.MapHub<TelemetryHub>("/hubs/telemetry");

public class Broadcaster
{
    public async Task Push(string json)
    {
        await _hubContext.Clients.Group("sensors").SendAsync("ReceiveTelemetry", json);
    }
}
"#,
        );

        let map_hub = unit
            .calls
            .iter()
            .find(|call| call.method == "MapHub")
            .expect("MapHub call");
        assert_eq!(map_hub.type_args, vec!["TelemetryHub".to_string()]);
        assert_eq!(map_hub.literal_arg(0), Some("/hubs/telemetry"));

        let send = unit
            .calls
            .iter()
            .find(|call| call.method == "SendAsync")
            .expect("SendAsync call");
        assert_eq!(send.literal_arg(0), Some("ReceiveTelemetry"));
        let Some(receiver) = send.receiver.as_deref() else {
            panic!("SendAsync has a receiver");
        };
        let Expr::Call(group) = receiver else {
            panic!("receiver is a Group call, got {:?}", receiver);
        };
        assert_eq!(group.method, "Group");
        assert_eq!(group.literal_arg(0), Some("sensors"));
    }

    #[test]
    fn primary_constructor_is_captured() {
        let unit = parse("namespace App; public class Cache(IMemoryCache cache) { public void Clear() { } }");
        let decl = &unit.types[0];
        let params = decl.primary_constructor.as_ref().expect("primary constructor");
        assert_eq!(params[0].type_sig, "IMemoryCache");
    }

    #[test]
    fn skipped_directories_are_case_insensitive() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(temp.path().join("Obj")).expect("mkdir");
        std::fs::create_dir_all(temp.path().join("Models")).expect("mkdir");
        std::fs::write(temp.path().join("Obj/Generated.cs"), "public class Generated { }").expect("write");
        std::fs::write(temp.path().join("Models/Reading.cs"), "public class Reading { }").expect("write");

        let toolchain = CSharpToolchain::initialize().expect("grammar loads");
        let units = parse_directory(&toolchain, temp.path()).expect("parse");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].types[0].name, "Reading");
    }
}
