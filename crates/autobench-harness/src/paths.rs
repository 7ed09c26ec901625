//! Relative path computation for build descriptors and solution manifests

use std::path::{Component, Path};

/// Path of `target` relative to directory `from`, with `/` separators
///
/// Both paths must share a root; the common prefix is compared component-wise.
#[must_use]
pub fn relative_path(from: &Path, target: &Path) -> String {
    let from: Vec<Component<'_>> = from.components().filter(|c| *c != Component::CurDir).collect();
    let target: Vec<Component<'_>> = target
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();

    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = std::iter::repeat("..".to_string())
        .take(from.len() - common)
        .collect();
    parts.extend(
        target[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Normalize a manifest path for comparison
#[must_use]
pub fn normalize(path: &str) -> String {
    path.trim().replace('\\', "/").to_ascii_lowercase()
}
