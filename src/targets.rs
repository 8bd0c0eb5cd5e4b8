//! Supported sync targets and their per-target configuration.
//!
//! Every target is described by a static [`TargetProfile`]: where its output
//! root lives, which marker paths reveal an installation, which settings file
//! carries MCP servers and how a server entry is reshaped for it. Adding a
//! target means adding a variant and a profile; nothing else branches on it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::SyncError;

/// Known sync targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// OpenCode (~/.config/opencode)
    OpenCode,
    /// OpenAI Codex CLI (~/.codex)
    Codex,
    /// Pi coding agent (~/.pi/agent)
    Pi,
    /// Factory Droid (~/.factory)
    Droid,
    /// Cursor (./.cursor)
    Cursor,
    /// Gemini CLI (./.gemini)
    Gemini,
}

/// Which process root a relative path hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootBase {
    Home,
    Cwd,
}

/// A path relative to the user home or the working directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootedPath {
    pub base: RootBase,
    pub rel: &'static str,
}

impl RootedPath {
    const fn home(rel: &'static str) -> Self {
        Self {
            base: RootBase::Home,
            rel,
        }
    }

    const fn cwd(rel: &'static str) -> Self {
        Self {
            base: RootBase::Cwd,
            rel,
        }
    }

    pub fn resolve(&self, home: &Path, cwd: &Path) -> PathBuf {
        let base = match self.base {
            RootBase::Home => home,
            RootBase::Cwd => cwd,
        };
        self.rel.split('/').fold(base.to_path_buf(), |acc, part| acc.join(part))
    }
}

/// On-disk encoding of a settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Json,
    Toml,
}

/// How a local server's command line is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStyle {
    /// `command: "npx", args: ["-y", "pkg"]`
    Split,
    /// `command: ["npx", "-y", "pkg"]`
    Joined,
}

/// Declarative rules for translating one MCP server entry into a target schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerShape {
    /// Value of `type` on local servers
    pub local_type: Option<&'static str>,
    /// Value of `type` on remote servers
    pub remote_type: Option<&'static str>,
    pub command_style: CommandStyle,
    pub env_key: &'static str,
    pub url_key: &'static str,
    pub headers_key: &'static str,
    /// Extra boolean flag written on every server, e.g. `enabled: true`
    pub flag: Option<(&'static str, bool)>,
}

impl ServerShape {
    /// Fields written exactly as they appear in the agent home
    pub const PASSTHROUGH: ServerShape = ServerShape {
        local_type: None,
        remote_type: None,
        command_style: CommandStyle::Split,
        env_key: "env",
        url_key: "url",
        headers_key: "headers",
        flag: None,
    };
}

/// The settings file a target reads MCP servers from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsProfile {
    /// Path relative to the output root
    pub file: &'static str,
    pub format: SettingsFormat,
    /// Top-level key holding the server mapping
    pub container_key: &'static str,
    /// Top-level keys inserted when absent
    pub seed: &'static [(&'static str, &'static str)],
    pub shape: ServerShape,
}

/// Static description of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetProfile {
    pub output_root: RootedPath,
    /// Checked in order; the first existing path wins
    pub markers: &'static [RootedPath],
    pub settings: SettingsProfile,
}

static OPENCODE: TargetProfile = TargetProfile {
    output_root: RootedPath::home(".config/opencode"),
    markers: &[RootedPath::home(".config/opencode"), RootedPath::cwd(".opencode")],
    settings: SettingsProfile {
        file: "opencode.json",
        format: SettingsFormat::Json,
        container_key: "mcp",
        seed: &[("$schema", "https://opencode.ai/config.json")],
        shape: ServerShape {
            local_type: Some("local"),
            remote_type: Some("remote"),
            command_style: CommandStyle::Joined,
            env_key: "environment",
            url_key: "url",
            headers_key: "headers",
            flag: Some(("enabled", true)),
        },
    },
};

static CODEX: TargetProfile = TargetProfile {
    output_root: RootedPath::home(".codex"),
    markers: &[RootedPath::home(".codex")],
    settings: SettingsProfile {
        file: "config.toml",
        format: SettingsFormat::Toml,
        container_key: "mcp_servers",
        seed: &[],
        // Codex MCP schema uses `http_headers` for static headers.
        shape: ServerShape {
            headers_key: "http_headers",
            ..ServerShape::PASSTHROUGH
        },
    },
};

static PI: TargetProfile = TargetProfile {
    output_root: RootedPath::home(".pi/agent"),
    markers: &[RootedPath::home(".pi")],
    settings: SettingsProfile {
        file: "mcporter.json",
        format: SettingsFormat::Json,
        container_key: "mcpServers",
        seed: &[],
        shape: ServerShape {
            url_key: "baseUrl",
            ..ServerShape::PASSTHROUGH
        },
    },
};

static DROID: TargetProfile = TargetProfile {
    output_root: RootedPath::home(".factory"),
    markers: &[RootedPath::home(".factory")],
    settings: SettingsProfile {
        file: "mcp.json",
        format: SettingsFormat::Json,
        container_key: "mcpServers",
        seed: &[],
        shape: ServerShape {
            local_type: Some("stdio"),
            remote_type: Some("http"),
            flag: Some(("disabled", false)),
            ..ServerShape::PASSTHROUGH
        },
    },
};

static CURSOR: TargetProfile = TargetProfile {
    output_root: RootedPath::cwd(".cursor"),
    // Home marker wins over the project marker; only the reported reason differs.
    markers: &[RootedPath::home(".cursor"), RootedPath::cwd(".cursor")],
    settings: SettingsProfile {
        file: "mcp.json",
        format: SettingsFormat::Json,
        container_key: "mcpServers",
        seed: &[],
        shape: ServerShape::PASSTHROUGH,
    },
};

static GEMINI: TargetProfile = TargetProfile {
    output_root: RootedPath::cwd(".gemini"),
    // Home marker wins over the project marker; only the reported reason differs.
    markers: &[RootedPath::home(".gemini"), RootedPath::cwd(".gemini")],
    settings: SettingsProfile {
        file: "settings.json",
        format: SettingsFormat::Json,
        container_key: "mcpServers",
        seed: &[],
        shape: ServerShape::PASSTHROUGH,
    },
};

impl Target {
    /// All targets in canonical detection and reporting order
    pub fn all() -> &'static [Target] {
        &[
            Target::OpenCode,
            Target::Codex,
            Target::Droid,
            Target::Cursor,
            Target::Pi,
            Target::Gemini,
        ]
    }

    /// Identifier used on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Target::OpenCode => "opencode",
            Target::Codex => "codex",
            Target::Pi => "pi",
            Target::Droid => "droid",
            Target::Cursor => "cursor",
            Target::Gemini => "gemini",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Target::OpenCode => "OpenCode",
            Target::Codex => "OpenAI Codex CLI",
            Target::Pi => "Pi",
            Target::Droid => "Factory Droid",
            Target::Cursor => "Cursor",
            Target::Gemini => "Gemini CLI",
        }
    }

    pub fn profile(&self) -> &'static TargetProfile {
        match self {
            Target::OpenCode => &OPENCODE,
            Target::Codex => &CODEX,
            Target::Pi => &PI,
            Target::Droid => &DROID,
            Target::Cursor => &CURSOR,
            Target::Gemini => &GEMINI,
        }
    }

    /// Directory this target's files are written under
    pub fn output_root(&self, home: &Path, cwd: &Path) -> PathBuf {
        self.profile().output_root.resolve(home, cwd)
    }

    /// Parse a target from its identifier (case-insensitive)
    pub fn from_id(id: &str) -> Option<Target> {
        Target::all()
            .iter()
            .copied()
            .find(|target| target.id().eq_ignore_ascii_case(id))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What a sync run was asked to cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSelector {
    One(Target),
    /// Every target the detector finds installed
    All,
}

impl TargetSelector {
    /// Selector values accepted on the command line, in help order
    pub const VALID: &'static [&'static str] =
        &["opencode", "codex", "pi", "droid", "cursor", "gemini", "all"];
}

impl FromStr for TargetSelector {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(TargetSelector::All);
        }
        Target::from_id(s)
            .map(TargetSelector::One)
            .ok_or_else(|| SyncError::UnknownTarget {
                name: s.to_string(),
                valid: TargetSelector::VALID.join(", "),
            })
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSelector::One(target) => fmt::Display::fmt(target, f),
            TargetSelector::All => f.write_str("all"),
        }
    }
}
