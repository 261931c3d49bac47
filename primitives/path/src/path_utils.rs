// SPDX-License-Identifier: CC0-1.0

//! Resource naming and path resolution for provider registries.
//!
//! Every provider interface owns exactly one registry resource, addressed by the
//! interface's qualified name under [`SERVICES_DIR`]. Writers and the runtime
//! lookup must agree on this convention, so both go through this module.

use std::path::{Path, PathBuf};

/// Directory, relative to the output root, holding one registry resource per interface.
pub const SERVICES_DIR: &str = "META-INF/services";

/// Resource name for the registry of `interface`.
///
/// # Examples
///
/// ```
/// use autoservice_path::services_resource_name;
/// assert_eq!(services_resource_name("svc.Greeter"), "META-INF/services/svc.Greeter");
/// assert_eq!(services_resource_name("p.Outer$Inner"), "META-INF/services/p.Outer$Inner");
/// ```
pub fn services_resource_name(interface: &str) -> String { format!("{}/{}", SERVICES_DIR, interface) }

/// Resolve a `/`-separated resource name against an output root directory.
///
/// Empty segments are skipped so that `"META-INF//services/x"` and
/// `"/META-INF/services/x"` land on the same file as the canonical name.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use autoservice_path::resource_path;
/// let path = resource_path(Path::new("out"), "META-INF/services/svc.Greeter");
/// assert_eq!(path, Path::new("out").join("META-INF").join("services").join("svc.Greeter"));
/// ```
pub fn resource_path(root: &Path, resource_name: &str) -> PathBuf {
    resource_name
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Path of the registry file for `interface` under `root`.
pub fn services_file_path(root: &Path, interface: &str) -> PathBuf {
    resource_path(root, &services_resource_name(interface))
}

/// Check that `interface` can be used as a registry resource name.
///
/// Qualified names never contain path separators or whitespace; anything that
/// does would escape [`SERVICES_DIR`] or produce an unreadable file name.
pub fn validate_interface_name(interface: &str) -> Result<(), String> {
    if interface.is_empty() {
        return Err("provider interface name is empty".to_string());
    }
    if let Some(bad) = interface.chars().find(|c| matches!(c, '/' | '\\') || c.is_whitespace()) {
        return Err(format!(
            "provider interface name {:?} contains invalid character {:?}",
            interface, bad
        ));
    }
    if interface.split('.').any(|segment| segment.is_empty()) {
        return Err(format!("provider interface name {:?} has an empty segment", interface));
    }
    Ok(())
}
