//! End-to-end harness synthesis
//!
//! One harness class per executable project:
//! - Service without hub: a GET `/` through an in-process web host
//! - Service with hub: a live connection measuring one message round trip
//! - Console: launching the compiled executable and waiting for exit

use crate::config::HarnessConfig;
use crate::unit::{is_identifier, unique_name, HarnessSource};
use autobench_model::{HubEndpointModel, ProjectKind, ProjectModel};
use std::collections::HashSet;
use tracing::warn;

/// Benchmark name of the root-endpoint measurement
pub const ROOT_ENDPOINT_BENCHMARK: &str = "MeasureRootEndpoint";

/// Benchmark name of the live message-flow measurement
pub const MESSAGE_FLOW_BENCHMARK: &str = "MeasureSignalRMessageFlow";

/// Benchmark name of the executable-launch measurement
pub const CONSOLE_BENCHMARK: &str = "MeasureConsoleExecution";

/// Seconds a message-flow measurement waits before failing
pub const MESSAGE_TIMEOUT_SECS: u32 = 30;

/// End-to-end harnesses with the projects they exercise
#[derive(Debug, Clone, Default)]
pub struct E2ePlan {
    /// Harness sources in project order
    pub harnesses: Vec<HarnessSource>,
    /// Indices into the input projects that have a harness
    pub exercised: Vec<usize>,
    /// A Service harness exists
    pub web_testing: bool,
    /// A hub harness exists
    pub hub_client: bool,
}

/// Build end-to-end harnesses for every executable project
#[must_use]
pub fn plan_e2e(projects: &[ProjectModel], config: &HarnessConfig) -> E2ePlan {
    let mut plan = E2ePlan::default();
    let mut used = HashSet::new();
    for (idx, project) in projects.iter().enumerate() {
        if !project.kind.is_executable() {
            continue;
        }
        let class_name = unique_name(&format!("{}E2EBenchmarks", project.safe_name()), &mut used);
        if !is_identifier(&class_name) {
            warn!(project = %project.name, class = %class_name, "Skipping project without a valid harness name");
            continue;
        }

        let source = match (project.kind, project.hub_endpoint.as_ref()) {
            (ProjectKind::Service, Some(hub)) => {
                plan.web_testing = true;
                plan.hub_client = true;
                hub_source(project, hub, &class_name, config)
            }
            (ProjectKind::Service, None) => {
                plan.web_testing = true;
                http_source(project, &class_name, config)
            }
            _ => console_source(project, &class_name, config),
        };

        plan.harnesses.push(HarnessSource { class_name, source });
        plan.exercised.push(idx);
    }
    plan
}

/// Type used to locate the service assembly
fn anchor_type(project: &ProjectModel) -> String {
    project
        .types
        .first()
        .map_or_else(|| format!("{}.Program", project.name), |ty| ty.full_name.clone())
}

fn http_source(project: &ProjectModel, class_name: &str, config: &HarnessConfig) -> String {
    let anchor = anchor_type(project);
    let mut out = String::new();
    out.push_str("using BenchmarkDotNet.Attributes;\n");
    out.push_str("using Microsoft.AspNetCore.Mvc.Testing;\n\n");
    out.push_str(&format!("namespace {};\n\n", config.namespace));
    out.push_str("[MemoryDiagnoser]\n");
    out.push_str(&format!("public class {}\n{{\n", class_name));
    out.push_str(&format!("    private WebApplicationFactory<{}> _factory = null!;\n", anchor));
    out.push_str("    private HttpClient _httpClient = null!;\n\n");
    out.push_str("    [GlobalSetup]\n");
    out.push_str("    public void Initialize()\n    {\n");
    out.push_str(&format!("        _factory = new WebApplicationFactory<{}>();\n", anchor));
    out.push_str("        _httpClient = _factory.CreateClient();\n");
    out.push_str("    }\n\n");
    out.push_str("    [GlobalCleanup]\n");
    out.push_str("    public void Cleanup()\n    {\n");
    out.push_str("        _httpClient.Dispose();\n");
    out.push_str("        _factory.Dispose();\n");
    out.push_str("    }\n\n");
    out.push_str("    [Benchmark]\n");
    out.push_str(&format!("    public async Task {}()\n    {{\n", ROOT_ENDPOINT_BENCHMARK));
    out.push_str("        using var response = await _httpClient.GetAsync(\"/\");\n");
    out.push_str("    }\n}\n");
    out
}

fn hub_source(
    project: &ProjectModel,
    hub: &HubEndpointModel,
    class_name: &str,
    config: &HarnessConfig,
) -> String {
    let anchor = anchor_type(project);
    let fresh_source = "new TaskCompletionSource<string>(TaskCreationOptions.RunContinuationsAsynchronously)";

    let mut out = String::new();
    out.push_str("using BenchmarkDotNet.Attributes;\n");
    out.push_str("using Microsoft.AspNetCore.Mvc.Testing;\n");
    out.push_str("using Microsoft.AspNetCore.SignalR.Client;\n");
    out.push_str("using Microsoft.AspNetCore.TestHost;\n\n");
    out.push_str(&format!("namespace {};\n\n", config.namespace));
    out.push_str("[MemoryDiagnoser]\n");
    out.push_str(&format!("public class {}\n{{\n", class_name));
    out.push_str(&format!("    private WebApplicationFactory<{}> _factory = null!;\n", anchor));
    out.push_str("    private HubConnection _hubConnection = null!;\n");
    out.push_str("    private TaskCompletionSource<string> _messageReceived = null!;\n\n");

    out.push_str("    [GlobalSetup]\n");
    out.push_str("    public async Task Initialize()\n    {\n");
    out.push_str(&format!("        _factory = new WebApplicationFactory<{}>();\n", anchor));
    out.push_str("        var handler = _factory.Server.CreateHandler();\n\n");
    out.push_str("        _hubConnection = new HubConnectionBuilder()\n");
    out.push_str(&format!(
        "            .WithUrl(\"http://localhost{}\", options =>\n",
        csharp_escape(&hub.mount_path)
    ));
    out.push_str("            {\n");
    out.push_str("                options.HttpMessageHandlerFactory = _ => handler;\n");
    out.push_str("                options.Transports = Microsoft.AspNetCore.Http.Connections.HttpTransportType.ServerSentEvents;\n");
    out.push_str("            })\n");
    out.push_str("            .Build();\n\n");
    out.push_str(&format!("        _messageReceived = {};\n\n", fresh_source));
    out.push_str(&format!(
        "        _hubConnection.On<string>(\"{}\", message =>\n",
        csharp_escape(&hub.callback_method)
    ));
    out.push_str("        {\n");
    out.push_str("            _messageReceived.TrySetResult(message);\n");
    out.push_str("        });\n\n");
    out.push_str("        await _hubConnection.StartAsync();\n");
    if let Some(topic) = &hub.subscription_topic {
        out.push_str(&format!(
            "        await _hubConnection.InvokeAsync(\"Subscribe\", \"{}\");\n",
            csharp_escape(topic)
        ));
    }
    out.push_str("    }\n\n");

    out.push_str("    [IterationSetup]\n");
    out.push_str("    public void ResetCompletionSource()\n    {\n");
    out.push_str(&format!("        _messageReceived = {};\n", fresh_source));
    out.push_str("    }\n\n");

    out.push_str("    [GlobalCleanup]\n");
    out.push_str("    public async Task Cleanup()\n    {\n");
    out.push_str("        if (_hubConnection != null)\n        {\n");
    out.push_str("            await _hubConnection.DisposeAsync();\n");
    out.push_str("        }\n");
    out.push_str("        _factory?.Dispose();\n");
    out.push_str("    }\n\n");

    out.push_str("    [Benchmark]\n");
    out.push_str(&format!(
        "    public async Task<string> {}()\n    {{\n",
        MESSAGE_FLOW_BENCHMARK
    ));
    out.push_str(&format!(
        "        using var cts = new CancellationTokenSource(TimeSpan.FromSeconds({}));\n",
        MESSAGE_TIMEOUT_SECS
    ));
    out.push_str("        using var registration = cts.Token.Register(() => _messageReceived.TrySetCanceled());\n");
    out.push_str("        return await _messageReceived.Task;\n");
    out.push_str("    }\n}\n");
    out
}

fn console_source(project: &ProjectModel, class_name: &str, config: &HarnessConfig) -> String {
    let project_dir = project.directory().to_string_lossy().replace('"', "\"\"");

    let mut out = String::new();
    out.push_str("using System.Diagnostics;\n");
    out.push_str("using BenchmarkDotNet.Attributes;\n\n");
    out.push_str(&format!("namespace {};\n\n", config.namespace));
    out.push_str("[MemoryDiagnoser]\n");
    out.push_str(&format!("public class {}\n{{\n", class_name));
    out.push_str("    private string _executablePath = null!;\n\n");
    out.push_str("    [GlobalSetup]\n");
    out.push_str("    public void Initialize()\n    {\n");
    out.push_str(&format!("        var projectDir = @\"{}\";\n", project_dir));
    out.push_str(&format!(
        "        var executable = OperatingSystem.IsWindows() ? \"{0}.exe\" : \"{0}\";\n",
        csharp_escape(&project.name)
    ));
    out.push_str(&format!(
        "        _executablePath = Path.Combine(projectDir, \"bin\", \"Release\", \"{}\", executable);\n",
        config.target_framework
    ));
    out.push_str("    }\n\n");
    out.push_str("    [Benchmark]\n");
    out.push_str(&format!("    public void {}()\n    {{\n", CONSOLE_BENCHMARK));
    out.push_str("        using var process = Process.Start(new ProcessStartInfo\n");
    out.push_str("        {\n");
    out.push_str("            FileName = _executablePath,\n");
    out.push_str("            RedirectStandardOutput = true,\n");
    out.push_str("            RedirectStandardError = true,\n");
    out.push_str("            UseShellExecute = false,\n");
    out.push_str("            CreateNoWindow = true\n");
    out.push_str("        });\n");
    out.push_str("        process?.WaitForExit();\n");
    out.push_str("    }\n}\n");
    out
}

/// Escape a value for a regular C# string literal
fn csharp_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use autobench_test_utils::{console_project, hub_endpoint, library_project, service_project};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn root() -> &'static Path {
        Path::new("/repo")
    }

    #[test]
    fn libraries_are_never_exercised() {
        let projects = vec![library_project(root()), console_project(root())];
        let plan = plan_e2e(&projects, &HarnessConfig::default());

        assert_eq!(plan.exercised, vec![1]);
        assert_eq!(plan.harnesses[0].class_name, "ApolloToolE2EBenchmarks");
        assert!(plan.harnesses.iter().all(|h| !h.source.contains("Apollo.Core")));
        assert!(!plan.web_testing);
        assert!(!plan.hub_client);
    }

    #[test]
    fn service_without_hub_measures_root_endpoint() {
        let projects = vec![service_project(root(), None)];
        let plan = plan_e2e(&projects, &HarnessConfig::default());
        let source = &plan.harnesses[0].source;

        assert!(plan.web_testing);
        assert!(!plan.hub_client);
        assert!(source.contains("WebApplicationFactory<Apollo.Api.TelemetryPublisher>"));
        assert!(source.contains("public async Task MeasureRootEndpoint()"));
        assert!(source.contains("GetAsync(\"/\")"));
    }

    #[test]
    fn hub_with_topic_subscribes() {
        let projects = vec![service_project(root(), Some(hub_endpoint(Some("telemetry"))))];
        let plan = plan_e2e(&projects, &HarnessConfig::default());
        let source = &plan.harnesses[0].source;

        assert!(plan.hub_client);
        assert!(source.contains(".WithUrl(\"http://localhost/hubs/telemetry\""));
        assert!(source.contains("_hubConnection.On<string>(\"ReceiveTelemetry\""));
        assert!(source.contains("InvokeAsync(\"Subscribe\", \"telemetry\")"));
        assert!(source.contains("TimeSpan.FromSeconds(30)"));
        assert!(source.contains(
            "using var registration = cts.Token.Register(() => _messageReceived.TrySetCanceled());"
        ));
        assert!(source.contains("[IterationSetup]"));
    }

    #[test]
    fn broadcast_hub_never_subscribes() {
        let projects = vec![service_project(root(), Some(hub_endpoint(None)))];
        let plan = plan_e2e(&projects, &HarnessConfig::default());
        let source = &plan.harnesses[0].source;

        assert!(source.contains("MeasureSignalRMessageFlow"));
        assert!(!source.contains("Subscribe"));
    }

    #[test]
    fn console_launches_release_build() {
        let projects = vec![console_project(root())];
        let plan = plan_e2e(&projects, &HarnessConfig::default());
        let source = &plan.harnesses[0].source;

        assert!(source.contains("var projectDir = @\"/repo/src/Apollo.Tool\";"));
        assert!(source.contains("\"Apollo.Tool.exe\" : \"Apollo.Tool\""));
        assert!(source.contains("\"bin\", \"Release\", \"net9.0\""));
        assert!(source.contains("public void MeasureConsoleExecution()"));
    }

    #[test]
    fn colliding_project_names_get_distinct_classes() {
        let dotted = ProjectModel::new("A.B", "/repo/A.B/A.B.csproj", ProjectKind::Console);
        let plain = ProjectModel::new("AB", "/repo/AB/AB.csproj", ProjectKind::Console);
        let plan = plan_e2e(&[dotted, plain], &HarnessConfig::default());

        let names: Vec<&str> = plan.harnesses.iter().map(|h| h.class_name.as_str()).collect();
        assert_eq!(names, vec!["ABE2EBenchmarks", "ABE2EBenchmarks2"]);
        assert!(plan.harnesses[1].source.contains("public class ABE2EBenchmarks2\n"));
        assert_eq!(plan.exercised, vec![0, 1]);
    }

    #[test]
    fn anchor_falls_back_to_program() {
        let project = ProjectModel::new("Juno.Api", "/repo/Juno.Api/Juno.Api.csproj", ProjectKind::Service);
        assert_eq!(anchor_type(&project), "Juno.Api.Program");
    }
}
