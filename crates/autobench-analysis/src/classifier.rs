//! Project classification from the build manifest

use autobench_model::ProjectKind;
use once_cell::sync::Lazy;
use regex::Regex;

static OUTPUT_TYPE_EXE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<OutputType>\s*(Win)?Exe\s*</OutputType>").expect("output type regex")
});

static WEB_SDK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)Sdk\s*=\s*"Microsoft\.NET\.Sdk\.Web""#).expect("sdk regex")
});

const WEB_MARKERS: &[&str] = &["Microsoft.AspNetCore", "Microsoft.NET.Sdk.Web"];

/// Classify a project from its manifest text
///
/// An explicit executable output kind, or the web SDK, makes the project
/// runnable. Runnable projects referencing web hosting are services. Worker
/// projects need an explicit output kind, since a hosted worker never exits.
#[must_use]
pub fn classify(manifest: Option<&str>) -> ProjectKind {
    let Some(text) = manifest else {
        return ProjectKind::Unknown;
    };

    let executable = OUTPUT_TYPE_EXE.is_match(text) || WEB_SDK.is_match(text);
    if !executable {
        return ProjectKind::Library;
    }

    if WEB_MARKERS.iter().any(|marker| text.contains(marker)) {
        ProjectKind::Service
    } else {
        ProjectKind::Console
    }
}
