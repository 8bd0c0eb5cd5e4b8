//! Sync orchestration across targets.
//!
//! Resolves which targets a run covers, projects each one in turn and keeps
//! every target's outcome separately observable.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::config::{AgentConfig, McpServerConfig};
use crate::detect::{Detection, detect_installed_tools};
use crate::error::SyncError;
use crate::projector::{ProjectionSummary, projector_for};
use crate::targets::{Target, TargetSelector};

static SECRET_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)key|token|secret|password|credential|api_key").unwrap()
});

/// An MCP env var whose name suggests it carries a secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretHint {
    pub server: String,
    pub key: String,
}

/// Env var names across all servers that look like secrets.
///
/// Best-effort name matching only; values are never inspected.
pub fn find_potential_secrets<'a, I>(servers: I) -> Vec<SecretHint>
where
    I: IntoIterator<Item = (&'a String, &'a McpServerConfig)>,
{
    servers
        .into_iter()
        .flat_map(|(server, config)| {
            config
                .env
                .keys()
                .filter(|key| SECRET_KEY_RE.is_match(key))
                .map(move |key| SecretHint {
                    server: server.clone(),
                    key: key.clone(),
                })
        })
        .collect()
}

/// Outcome of projecting one target
#[derive(Debug)]
pub struct TargetOutcome {
    pub target: Target,
    pub output_root: PathBuf,
    pub result: Result<ProjectionSummary, SyncError>,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// `all` was requested and no tool is installed; nothing was written
    NothingDetected,
    Targets(Vec<TargetOutcome>),
}

/// Everything a sync run produced
#[derive(Debug)]
pub struct SyncReport {
    pub secrets: Vec<SecretHint>,
    /// Present for `all` runs
    pub detections: Option<Vec<Detection>>,
    pub outcome: RunOutcome,
}

impl SyncReport {
    /// False if any projected target failed
    pub fn is_success(&self) -> bool {
        match &self.outcome {
            RunOutcome::NothingDetected => true,
            RunOutcome::Targets(outcomes) => outcomes.iter().all(|o| o.result.is_ok()),
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &TargetOutcome> {
        let outcomes: &[TargetOutcome] = match &self.outcome {
            RunOutcome::NothingDetected => &[],
            RunOutcome::Targets(outcomes) => outcomes,
        };
        outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Drives projection for one or all targets against explicit process roots
#[derive(Debug, Clone)]
pub struct Orchestrator {
    home: PathBuf,
    cwd: PathBuf,
}

impl Orchestrator {
    pub fn new(home: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            cwd: cwd.into(),
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn output_root(&self, target: Target) -> PathBuf {
        target.output_root(&self.home, &self.cwd)
    }

    pub fn detect(&self) -> Vec<Detection> {
        detect_installed_tools(&self.home, &self.cwd)
    }

    /// Parse `requested` ("all" or a target id) and run it.
    ///
    /// An unknown name fails before any detection or projection.
    pub fn run_named(&self, requested: &str, config: &AgentConfig) -> Result<SyncReport, SyncError> {
        let selector: TargetSelector = requested.parse()?;
        Ok(self.run(selector, config))
    }

    /// Run a sync for `selector`.
    ///
    /// Target failures are reported in the returned [`SyncReport`], never as `Err`.
    pub fn run(&self, selector: TargetSelector, config: &AgentConfig) -> SyncReport {
        let secrets = find_potential_secrets(&config.mcp_servers);
        for hint in &secrets {
            tracing::warn!(
                server = %hint.server,
                key = %hint.key,
                "MCP env var may contain a secret and will be copied to target config"
            );
        }

        match selector {
            TargetSelector::One(target) => SyncReport {
                secrets,
                detections: None,
                outcome: RunOutcome::Targets(vec![self.sync_target(target, config)]),
            },
            TargetSelector::All => {
                let detections = self.detect();
                let active: Vec<Target> = detections
                    .iter()
                    .filter(|d| d.detected)
                    .map(|d| d.target)
                    .collect();

                let outcome = if active.is_empty() {
                    tracing::info!("No AI coding tools detected");
                    RunOutcome::NothingDetected
                } else {
                    RunOutcome::Targets(
                        active
                            .into_iter()
                            .map(|target| self.sync_target(target, config))
                            .collect(),
                    )
                };

                SyncReport {
                    secrets,
                    detections: Some(detections),
                    outcome,
                }
            }
        }
    }

    fn sync_target(&self, target: Target, config: &AgentConfig) -> TargetOutcome {
        let output_root = self.output_root(target);
        let result = projector_for(target).project(config, &output_root);

        if let Err(ref e) = result {
            tracing::error!(target = %target, error = %e, "Error syncing target");
        }

        TargetOutcome {
            target,
            output_root,
            result,
        }
    }
}
