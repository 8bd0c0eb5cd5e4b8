//! Skill symlink creation and management
//!
//! Every skill becomes `<output_root>/skills/<name>`, a symbolic link to the
//! skill's source directory. Links are refreshed in place; anything at the
//! link path that is not a symlink belongs to the user and is left alone.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::Skill;
use crate::error::{Result, SyncError};
use crate::fs::ensure_dir;

/// Directory under a target's output root that receives skill links
pub const SKILLS_DIR: &str = "skills";

/// What happened to one skill link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    /// A symlink pointing elsewhere was replaced
    Updated,
    /// Already pointed at the right place
    Unchanged,
}

/// Totals for a batch of skill links
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl LinkSummary {
    fn record(&mut self, outcome: LinkOutcome) {
        match outcome {
            LinkOutcome::Created => self.created += 1,
            LinkOutcome::Updated => self.updated += 1,
            LinkOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

/// Reject skill sets where two skills would land on the same link path.
pub fn check_unique_names(skills: &[Skill]) -> Result<()> {
    let mut seen = HashSet::new();
    for skill in skills {
        if !seen.insert(skill.name.as_str()) {
            return Err(SyncError::DuplicateSkillName {
                name: skill.name.clone(),
            });
        }
    }
    Ok(())
}

/// Link every skill under `<output_root>/skills/`.
pub fn link_skills(skills: &[Skill], output_root: &Path) -> Result<LinkSummary> {
    let mut summary = LinkSummary::default();
    if skills.is_empty() {
        return Ok(summary);
    }

    check_unique_names(skills)?;

    let skills_dir = output_root.join(SKILLS_DIR);
    ensure_dir(&skills_dir)?;

    for skill in skills {
        summary.record(link_skill(skill, &skills_dir)?);
    }

    Ok(summary)
}

/// Create or refresh the link for one skill inside `skills_dir`.
pub fn link_skill(skill: &Skill, skills_dir: &Path) -> Result<LinkOutcome> {
    let dest = skills_dir.join(&skill.name);

    let outcome = match fs::symlink_metadata(&dest) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let current = fs::read_link(&dest).map_err(|e| SyncError::fs("read symlink", &dest, e))?;
            if current == skill.source_dir {
                tracing::debug!(skill = %skill.name, dest = %dest.display(), "Already linked");
                return Ok(LinkOutcome::Unchanged);
            }

            tracing::debug!(
                skill = %skill.name,
                dest = %dest.display(),
                was = %current.display(),
                "Replacing stale symlink"
            );
            remove_symlink(&dest)?;
            LinkOutcome::Updated
        }
        Ok(_) => {
            return Err(SyncError::SkillLinkConflict { path: dest });
        }
        Err(e) if e.kind() == ErrorKind::NotFound => LinkOutcome::Created,
        Err(e) => return Err(SyncError::fs("inspect path", &dest, e)),
    };

    create_dir_symlink(&skill.source_dir, &dest)?;
    tracing::debug!(
        skill = %skill.name,
        dest = %dest.display(),
        source = %skill.source_dir.display(),
        "Linked skill"
    );

    Ok(outcome)
}

fn create_dir_symlink(source: &Path, dest: &Path) -> Result<()> {
    #[cfg(unix)]
    std::os::unix::fs::symlink(source, dest)
        .map_err(|e| SyncError::fs("create symlink", dest, e))?;

    #[cfg(windows)]
    std::os::windows::fs::symlink_dir(source, dest)
        .map_err(|e| SyncError::fs("create symlink", dest, e))?;

    Ok(())
}

fn remove_symlink(path: &Path) -> Result<()> {
    // Directory symlinks on Windows must be removed as directories.
    #[cfg(windows)]
    let removed = fs::remove_dir(path).or_else(|_| fs::remove_file(path));
    #[cfg(not(windows))]
    let removed = fs::remove_file(path);

    removed.map_err(|e| SyncError::fs("remove stale symlink", path, e))
}
