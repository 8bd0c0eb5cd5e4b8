//! Skillport - project a Claude Code home into other AI coding tools
//!
//! Reads skills and MCP server definitions from an agent home (`~/.claude`)
//! and materializes them in the layouts OpenCode, Codex, Pi, Droid, Cursor
//! and Gemini expect: skill directories are symlinked, MCP servers are merged
//! into each tool's settings file without disturbing unrelated settings.

pub mod config;
pub mod detect;
pub mod error;
pub mod fs;
pub mod linker;
pub mod mcp;
pub mod projector;
pub mod settings;
pub mod sync;
pub mod targets;

pub use config::{AgentConfig, McpServerConfig, Skill};
pub use detect::{Detection, detect_installed_tools, detected_targets};
pub use error::SyncError;
pub use projector::{ProjectionSummary, Projector, SettingsOutcome, projector_for};
pub use sync::{Orchestrator, RunOutcome, SyncReport, TargetOutcome};
pub use targets::{Target, TargetSelector};
