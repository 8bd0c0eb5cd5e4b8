//! Projection of the agent-home model into one target's layout.

use std::path::{Path, PathBuf};

use crate::config::AgentConfig;
use crate::error::Result;
use crate::fs::{ensure_dir, read_optional, write_file};
use crate::linker::{self, LinkSummary};
use crate::mcp::reshape_servers;
use crate::settings::merge_settings;
use crate::targets::{Target, TargetProfile};

/// What happened to a target's settings file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOutcome {
    /// No MCP servers, so no settings file was touched
    Skipped,
    Created(PathBuf),
    Updated(PathBuf),
    /// Merged content matched the file on disk
    Unchanged(PathBuf),
}

/// Result of a successful projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionSummary {
    pub output_root: PathBuf,
    pub links: LinkSummary,
    pub settings: SettingsOutcome,
}

/// Materializes the agent-home model under a target's output root
pub trait Projector {
    fn target(&self) -> Target;

    /// Write skill links and merged settings under `output_root`.
    fn project(&self, config: &AgentConfig, output_root: &Path) -> Result<ProjectionSummary>;
}

/// Projector driven entirely by a target's static [`TargetProfile`]
#[derive(Debug, Clone, Copy)]
pub struct ProfileProjector {
    target: Target,
    profile: &'static TargetProfile,
}

impl ProfileProjector {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            profile: target.profile(),
        }
    }
}

impl Projector for ProfileProjector {
    fn target(&self) -> Target {
        self.target
    }

    fn project(&self, config: &AgentConfig, output_root: &Path) -> Result<ProjectionSummary> {
        let settings = &self.profile.settings;
        let settings_path = output_root.join(settings.file);

        linker::check_unique_names(&config.skills)?;

        // Merge before writing anything so a broken settings file aborts the
        // whole target with nothing touched.
        let generated = reshape_servers(&config.mcp_servers, &settings.shape);
        let (existing, merged) = if generated.is_empty() {
            (None, None)
        } else {
            let existing = read_optional(&settings_path)?;
            let merged = merge_settings(existing.as_deref(), settings, &generated)
                .map_err(|e| e.at(&settings_path))?;
            (existing, merged)
        };

        ensure_dir(output_root)?;
        let links = linker::link_skills(&config.skills, output_root)?;

        let settings_outcome = match merged {
            None => {
                tracing::debug!(target = %self.target, "No MCP servers, skipping settings");
                SettingsOutcome::Skipped
            }
            Some(content) if existing.as_deref() == Some(content.as_str()) => {
                tracing::debug!(path = %settings_path.display(), "Settings unchanged");
                SettingsOutcome::Unchanged(settings_path)
            }
            Some(content) => {
                write_file(&settings_path, &content)?;
                tracing::debug!(path = %settings_path.display(), "Wrote settings");
                if existing.is_some() {
                    SettingsOutcome::Updated(settings_path)
                } else {
                    SettingsOutcome::Created(settings_path)
                }
            }
        };

        tracing::info!(
            target = %self.target,
            root = %output_root.display(),
            links_created = links.created,
            links_updated = links.updated,
            "Projected target"
        );

        Ok(ProjectionSummary {
            output_root: output_root.to_path_buf(),
            links,
            settings: settings_outcome,
        })
    }
}

/// Look up the projector for a target.
pub fn projector_for(target: Target) -> Box<dyn Projector> {
    Box::new(ProfileProjector::new(target))
}
