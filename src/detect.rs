//! Detection of installed AI coding tools.
//!
//! A target counts as installed when one of its marker paths exists under the
//! user home or the working directory. Nothing is created or modified.

use serde::Serialize;
use std::path::Path;

use crate::fs::path_exists;
use crate::targets::Target;

/// Reason reported when no marker path exists
pub const NOT_FOUND: &str = "not found";

/// Detection outcome for one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub name: &'static str,
    #[serde(skip)]
    pub target: Target,
    pub detected: bool,
    /// `found <path>` or `not found`
    pub reason: String,
}

/// Check every known target, in canonical order.
pub fn detect_installed_tools(home: &Path, cwd: &Path) -> Vec<Detection> {
    Target::all()
        .iter()
        .map(|&target| detect_target(target, home, cwd))
        .collect()
}

/// Targets with `detected = true`, in canonical order.
pub fn detected_targets(home: &Path, cwd: &Path) -> Vec<Target> {
    detect_installed_tools(home, cwd)
        .into_iter()
        .filter(|d| d.detected)
        .map(|d| d.target)
        .collect()
}

fn detect_target(target: Target, home: &Path, cwd: &Path) -> Detection {
    let found = target
        .profile()
        .markers
        .iter()
        .map(|marker| marker.resolve(home, cwd))
        .find(|path| path_exists(path));

    match found {
        Some(path) => Detection {
            name: target.id(),
            target,
            detected: true,
            reason: format!("found {}", path.display()),
        },
        None => Detection {
            name: target.id(),
            target,
            detected: false,
            reason: NOT_FOUND.to_string(),
        },
    }
}
