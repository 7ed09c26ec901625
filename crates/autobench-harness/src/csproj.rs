//! Build descriptor (`.csproj`) and entry point rendering

use crate::config::HarnessConfig;
use crate::paths::relative_path;
use std::path::{Path, PathBuf};

/// Entry point source shared by every generated project
pub const PROGRAM_SOURCE: &str = "using BenchmarkDotNet.Running;\n\nBenchmarkSwitcher.FromAssembly(typeof(Program).Assembly).Run(args);\n";

/// What a generated project's build descriptor needs to declare
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildDescriptor {
    /// Source project manifests to reference
    pub references: Vec<PathBuf>,
    /// Add the in-process web host testing package
    pub web_testing: bool,
    /// Add the live-connection client package
    pub hub_client: bool,
}

impl BuildDescriptor {
    /// Render the descriptor for a project located in `project_dir`
    #[must_use]
    pub fn render(&self, project_dir: &Path, config: &HarnessConfig) -> String {
        let mut out = String::new();
        out.push_str("<Project Sdk=\"Microsoft.NET.Sdk\">\n");
        out.push_str("  <PropertyGroup>\n");
        out.push_str("    <OutputType>Exe</OutputType>\n");
        out.push_str(&format!(
            "    <TargetFramework>{}</TargetFramework>\n",
            config.target_framework
        ));
        out.push_str("    <ImplicitUsings>enable</ImplicitUsings>\n");
        out.push_str("    <Nullable>enable</Nullable>\n");
        out.push_str("  </PropertyGroup>\n\n");

        out.push_str("  <ItemGroup>\n");
        push_package(&mut out, "BenchmarkDotNet", &config.benchmark_version);
        for package in [
            "Microsoft.Extensions.Logging.Abstractions",
            "Microsoft.Extensions.Options",
            "Microsoft.Extensions.Caching.Memory",
        ] {
            push_package(&mut out, package, &config.extensions_version);
        }
        if self.web_testing {
            push_package(&mut out, "Microsoft.AspNetCore.Mvc.Testing", &config.aspnetcore_version);
        }
        if self.hub_client {
            push_package(
                &mut out,
                "Microsoft.AspNetCore.SignalR.Client",
                &config.aspnetcore_version,
            );
        }
        out.push_str("  </ItemGroup>\n\n");

        out.push_str("  <ItemGroup>\n");
        for reference in &self.references {
            out.push_str(&format!(
                "    <ProjectReference Include=\"{}\" />\n",
                relative_path(project_dir, reference)
            ));
        }
        out.push_str("  </ItemGroup>\n");
        out.push_str("</Project>\n");
        out
    }
}

fn push_package(out: &mut String, name: &str, version: &str) {
    out.push_str(&format!(
        "    <PackageReference Include=\"{}\" Version=\"{}\" />\n",
        name, version
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditional_packages() {
        let config = HarnessConfig::default();
        let plain = BuildDescriptor::default().render(Path::new("/repo/App.E2EBenchmarks"), &config);
        assert!(plain.contains("BenchmarkDotNet\" Version=\"0.14.0\""));
        assert!(!plain.contains("Mvc.Testing"));
        assert!(!plain.contains("SignalR.Client"));

        let web = BuildDescriptor {
            web_testing: true,
            hub_client: true,
            ..BuildDescriptor::default()
        }
        .render(Path::new("/repo/App.E2EBenchmarks"), &config);
        assert!(web.contains("Microsoft.AspNetCore.Mvc.Testing\" Version=\"9.0.0\""));
        assert!(web.contains("Microsoft.AspNetCore.SignalR.Client"));
    }

    #[test]
    fn references_are_relative() {
        let descriptor = BuildDescriptor {
            references: vec![PathBuf::from("/repo/src/Apollo.Core/Apollo.Core.csproj")],
            ..BuildDescriptor::default()
        };
        let text = descriptor.render(Path::new("/repo/Apollo.UnitBenchmarks"), &HarnessConfig::default());
        assert!(text.contains("<ProjectReference Include=\"../src/Apollo.Core/Apollo.Core.csproj\" />"));
        assert!(text.contains("<TargetFramework>net9.0</TargetFramework>"));
    }
}
