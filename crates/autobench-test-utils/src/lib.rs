//! Testing utilities for the autobench workspace
//!
//! Shared fixtures: model builders, result builders and an on-disk sample
//! solution with a library, a console tool and a hub-hosting service.

#![allow(missing_docs)]

use autobench_model::{
    BenchmarkResult, BenchmarkSummary, HubEndpointModel, MethodModel, ParameterModel,
    PlatformError, ProcessOutput, ProjectKind, ProjectModel, RunRequest, TypeModel,
};
use chrono::{TimeZone, Utc};
use std::path::{Path, PathBuf};

pub const LIBRARY_MANIFEST: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net9.0</TargetFramework>
  </PropertyGroup>
</Project>
"#;

pub const CONSOLE_MANIFEST: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <OutputType>Exe</OutputType>
    <TargetFramework>net9.0</TargetFramework>
  </PropertyGroup>
</Project>
"#;

pub const SERVICE_MANIFEST: &str = r#"<Project Sdk="Microsoft.NET.Sdk.Web">
  <PropertyGroup>
    <OutputType>Exe</OutputType>
    <TargetFramework>net9.0</TargetFramework>
  </PropertyGroup>
</Project>
"#;

const LIBRARY_SOURCE: &str = r#"namespace Apollo.Core;

public class SignalFilter
{
    private readonly ILogger<SignalFilter> _logger;

    public SignalFilter(ILogger<SignalFilter> logger, int window)
    {
        _logger = logger;
    }

    public double Smooth(double value) => value * 0.5;

    public async Task<int> FlushAsync()
    {
        await Task.Yield();
        return 1;
    }
}

public class ReadingRepository
{
    public ReadingRepository(ISignalStore store) { }

    public int Count() => 0;
}
"#;

const CONSOLE_SOURCE: &str = r#"namespace Apollo.Tool;

public static class Checksum
{
    public static int Compute(string text) => text.Length;
}
"#;

const SERVICE_SOURCE: &str = r#"namespace Apollo.Api;

public class TelemetryHub : Hub
{
    public Task Subscribe(string topic) => Groups.AddToGroupAsync(Context.ConnectionId, topic);
}

public class TelemetryPublisher
{
    private readonly IHubContext<TelemetryHub> _hubContext;

    public TelemetryPublisher(IHubContext<TelemetryHub> hubContext)
    {
        _hubContext = hubContext;
    }

    public async Task PublishAsync(string json)
    {
        await _hubContext.Clients.Group("telemetry").SendAsync("ReceiveTelemetry", json);
    }
}
"#;

const SERVICE_PROGRAM: &str = r#"var builder = WebApplication.CreateBuilder(args);
builder.Services.AddSignalR();
var app = builder.Build();
app.MapHub<Apollo.Api.TelemetryHub>("/hubs/telemetry");
app.Run();
"#;

mockall::mock! {
    pub BuildTool {}

    #[async_trait::async_trait]
    impl autobench_model::BuildTool for BuildTool {
        async fn build_and_run(&self, request: &RunRequest) -> Result<ProcessOutput, PlatformError>;
        async fn add_to_solution(
            &self,
            solution: &Path,
            project: &Path,
        ) -> Result<ProcessOutput, PlatformError>;
    }
}

/// Write a file, creating parent directories
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Write the sample `.slnx` solution under `root/<name>/` and return its path
pub fn write_sample_solution(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    write_file(&dir.join("src/Apollo.Core/Apollo.Core.csproj"), LIBRARY_MANIFEST);
    write_file(&dir.join("src/Apollo.Core/SignalFilter.cs"), LIBRARY_SOURCE);
    write_file(&dir.join("src/Apollo.Core/obj/Generated.cs"), "public class Generated { public void X() { } }");
    write_file(&dir.join("src/Apollo.Tool/Apollo.Tool.csproj"), CONSOLE_MANIFEST);
    write_file(&dir.join("src/Apollo.Tool/Checksum.cs"), CONSOLE_SOURCE);
    write_file(&dir.join("src/Apollo.Api/Apollo.Api.csproj"), SERVICE_MANIFEST);
    write_file(&dir.join("src/Apollo.Api/Program.cs"), SERVICE_PROGRAM);
    write_file(&dir.join("src/Apollo.Api/TelemetryHub.cs"), SERVICE_SOURCE);

    let solution = dir.join(format!("{name}.slnx"));
    write_file(
        &solution,
        r#"<Solution>
  <Folder Name="/src/">
    <Project Path="src/Apollo.Core/Apollo.Core.csproj" />
    <Project Path="src/Apollo.Tool/Apollo.Tool.csproj" />
    <Project Path="src/Apollo.Api/Apollo.Api.csproj" />
  </Folder>
</Solution>
"#,
    );
    solution
}

pub fn logger_type(name: &str, namespace: &str) -> TypeModel {
    TypeModel::new(name, namespace)
        .with_constructor(vec![
            ParameterModel::new("logger", format!("ILogger<{namespace}.{name}>")),
            ParameterModel::new("window", "int"),
        ])
        .with_method(MethodModel::new("Smooth").returning("double").with_param("value", "double"))
        .with_method(MethodModel::new("FlushAsync").returning("Task<int>").asynchronous())
}

pub fn unfabricable_type(name: &str, namespace: &str) -> TypeModel {
    TypeModel::new(name, namespace)
        .with_constructor(vec![ParameterModel::new("store", format!("{namespace}.ISignalStore"))])
        .with_method(MethodModel::new("Count").returning("int"))
}

pub fn library_project(root: &Path) -> ProjectModel {
    ProjectModel::new(
        "Apollo.Core",
        root.join("src/Apollo.Core/Apollo.Core.csproj"),
        ProjectKind::Library,
    )
    .with_types(vec![
        logger_type("SignalFilter", "Apollo.Core"),
        unfabricable_type("ReadingRepository", "Apollo.Core"),
    ])
}

pub fn console_project(root: &Path) -> ProjectModel {
    let mut checksum = TypeModel::new("Checksum", "Apollo.Tool")
        .with_method(MethodModel::new("Compute").returning("int").with_param("text", "string"));
    checksum.is_static = true;
    checksum.public_methods[0].is_static = true;
    ProjectModel::new(
        "Apollo.Tool",
        root.join("src/Apollo.Tool/Apollo.Tool.csproj"),
        ProjectKind::Console,
    )
    .with_types(vec![checksum])
}

pub fn hub_endpoint(topic: Option<&str>) -> HubEndpointModel {
    HubEndpointModel {
        hub_type: "Apollo.Api.TelemetryHub".to_string(),
        mount_path: "/hubs/telemetry".to_string(),
        callback_method: "ReceiveTelemetry".to_string(),
        subscription_topic: topic.map(str::to_string),
    }
}

pub fn service_project(root: &Path, hub: Option<HubEndpointModel>) -> ProjectModel {
    let publisher = TypeModel::new("TelemetryPublisher", "Apollo.Api")
        .with_constructor(vec![ParameterModel::new("hubContext", "IHubContext<Apollo.Api.TelemetryHub>")])
        .with_method(MethodModel::new("PublishAsync").returning("Task").asynchronous());
    let project = ProjectModel::new(
        "Apollo.Api",
        root.join("src/Apollo.Api/Apollo.Api.csproj"),
        ProjectKind::Service,
    )
    .with_types(vec![publisher]);
    match hub {
        Some(hub) => project.with_hub_endpoint(hub),
        None => project,
    }
}

pub fn result(method: &str, mean_ns: f64, allocated_bytes: f64) -> BenchmarkResult {
    BenchmarkResult::new(method, method)
        .with_mean_ns(mean_ns)
        .with_stddev_ns(mean_ns / 100.0)
        .with_allocated_bytes(allocated_bytes)
}

pub fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
}

pub fn summary_ok(project: &str, results: Vec<BenchmarkResult>) -> BenchmarkSummary {
    BenchmarkSummary::succeeded(project, fixed_time(), results)
}

pub fn summary_failed(project: &str, message: &str) -> BenchmarkSummary {
    BenchmarkSummary::failed(project, fixed_time(), message)
}
