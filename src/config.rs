//! Normalized agent-home model
//!
//! Skills and MCP server definitions read from a Claude Code home
//! (`~/.claude`), independent of any sync target.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory under the agent home that holds skill bundles
pub const SKILLS_DIR: &str = "skills";

/// Manifest file every skill directory must contain
pub const SKILL_MANIFEST: &str = "SKILL.md";

/// Settings file under the agent home that carries `mcpServers`
pub const SETTINGS_FILE: &str = "settings.json";

/// Default agent home directory name under the user home
pub const DEFAULT_AGENT_HOME: &str = ".claude";

/// A named skill bundle living in the agent home
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub name: String,
    /// Directory the skill lives in; never modified by a sync
    pub source_dir: PathBuf,
    /// Path to the skill manifest inside `source_dir`
    pub skill_path: PathBuf,
}

impl Skill {
    pub fn new(name: impl Into<String>, source_dir: impl Into<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        let skill_path = source_dir.join(SKILL_MANIFEST);
        Self {
            name: name.into(),
            source_dir,
            skill_path,
        }
    }
}

/// A single MCP server definition.
///
/// Either remote (`url`, optional `headers`) or a local process
/// (`command`, `args`, `env`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Fields not modeled above (`type`, `cwd`, `timeout`, ...), kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl McpServerConfig {
    /// Remote server reachable at `url`
    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Locally launched server process
    pub fn local<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: Some(command.into()),
            args: args.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn is_remote(&self) -> bool {
        self.url.is_some()
    }
}

/// Everything one sync run projects. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    pub skills: Vec<Skill>,
    pub mcp_servers: BTreeMap<String, McpServerConfig>,
}

impl AgentConfig {
    /// Load skills and MCP servers from an agent home directory
    pub fn load(agent_home: &Path) -> Result<Self> {
        let agent_home = std::path::absolute(agent_home).with_context(|| {
            format!("Failed to resolve agent home: {}", agent_home.display())
        })?;

        let skills = load_skills(&agent_home.join(SKILLS_DIR))?;
        let mcp_servers = load_mcp_servers(&agent_home.join(SETTINGS_FILE))?;

        tracing::debug!(
            home = %agent_home.display(),
            skills = skills.len(),
            mcp_servers = mcp_servers.len(),
            "Loaded agent home"
        );

        Ok(Self {
            skills,
            mcp_servers,
        })
    }
}

fn load_skills(skills_dir: &Path) -> Result<Vec<Skill>> {
    if !skills_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut skills = Vec::new();
    for entry in WalkDir::new(skills_dir).min_depth(1).max_depth(1) {
        let entry = entry
            .with_context(|| format!("Failed to read skills directory: {}", skills_dir.display()))?;
        let path = entry.path();

        // is_dir/is_file follow symlinks, so linked skill directories count too
        if !path.is_dir() || !path.join(SKILL_MANIFEST).is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        skills.push(Skill::new(name, path));
    }

    skills.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(skills)
}

fn load_mcp_servers(settings_path: &Path) -> Result<BTreeMap<String, McpServerConfig>> {
    if !settings_path.is_file() {
        return Ok(BTreeMap::new());
    }

    let content = fs::read_to_string(settings_path)
        .with_context(|| format!("Failed to read settings: {}", settings_path.display()))?;
    let parsed: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings: {}", settings_path.display()))?;

    match parsed.get("mcpServers") {
        Some(servers) => serde_json::from_value(servers.clone()).with_context(|| {
            format!(
                "Invalid mcpServers in settings: {}",
                settings_path.display()
            )
        }),
        None => Ok(BTreeMap::new()),
    }
}

/// Expand a leading `~` against `home`
pub fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_skill(home: &Path, name: &str) -> PathBuf {
        let dir = home.join(SKILLS_DIR).join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SKILL_MANIFEST), format!("---\nname: {name}\n---\n")).unwrap();
        dir
    }

    #[test]
    fn test_load_empty_home() {
        let temp_dir = TempDir::new().unwrap();
        let config = AgentConfig::load(temp_dir.path()).unwrap();

        assert!(config.skills.is_empty());
        assert!(config.mcp_servers.is_empty());
    }

    #[test]
    fn test_load_skills_sorted_and_requires_manifest() {
        let temp_dir = TempDir::new().unwrap();
        write_skill(temp_dir.path(), "zeta");
        let alpha = write_skill(temp_dir.path(), "alpha");
        fs::create_dir_all(temp_dir.path().join(SKILLS_DIR).join("no-manifest")).unwrap();
        fs::write(temp_dir.path().join(SKILLS_DIR).join("README.md"), "x").unwrap();

        let config = AgentConfig::load(temp_dir.path()).unwrap();
        let names: Vec<&str> = config.skills.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(config.skills[0].source_dir, alpha);
        assert_eq!(config.skills[0].skill_path, alpha.join(SKILL_MANIFEST));
    }

    #[test]
    #[cfg(unix)]
    fn test_load_follows_symlinked_skill_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let real = elsewhere.path().join("linked");
        fs::create_dir_all(&real).unwrap();
        fs::write(real.join(SKILL_MANIFEST), "# linked").unwrap();

        let skills_dir = temp_dir.path().join(SKILLS_DIR);
        fs::create_dir_all(&skills_dir).unwrap();
        std::os::unix::fs::symlink(&real, skills_dir.join("linked")).unwrap();

        let config = AgentConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.skills.len(), 1);
        assert_eq!(config.skills[0].name, "linked");
    }

    #[test]
    fn test_load_mcp_servers_from_settings() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(SETTINGS_FILE),
            r#"{
                "theme": "dark",
                "mcpServers": {
                    "context7": { "url": "https://mcp.context7.com/mcp" },
                    "local": { "command": "echo", "args": ["hello"], "env": { "FOO": "bar" } }
                }
            }"#,
        )
        .unwrap();

        let config = AgentConfig::load(temp_dir.path()).unwrap();

        assert_eq!(
            config.mcp_servers["context7"],
            McpServerConfig::remote("https://mcp.context7.com/mcp")
        );
        assert_eq!(
            config.mcp_servers["local"],
            McpServerConfig::local("echo", ["hello"]).with_env("FOO", "bar")
        );
    }

    #[test]
    fn test_load_keeps_unmodeled_server_fields() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(SETTINGS_FILE),
            r#"{ "mcpServers": { "local": { "command": "node", "cwd": "/srv", "timeout": 30000 } } }"#,
        )
        .unwrap();

        let config = AgentConfig::load(temp_dir.path()).unwrap();
        let local = &config.mcp_servers["local"];

        assert_eq!(local.command.as_deref(), Some("node"));
        assert_eq!(local.extra["cwd"], Value::from("/srv"));
        assert_eq!(local.extra["timeout"], Value::from(30000));
        assert!(!local.extra.contains_key("command"));
    }

    #[test]
    fn test_load_settings_without_mcp_servers() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE), r#"{"theme":"dark"}"#).unwrap();

        let config = AgentConfig::load(temp_dir.path()).unwrap();
        assert!(config.mcp_servers.is_empty());
    }

    #[test]
    fn test_load_invalid_settings_fails() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE), "{ not json").unwrap();

        let err = AgentConfig::load(temp_dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse settings"));
    }

    #[test]
    fn test_expand_home() {
        let home = Path::new("/home/someone");
        assert_eq!(
            expand_home(Path::new("~/.claude"), home),
            PathBuf::from("/home/someone/.claude")
        );
        assert_eq!(expand_home(Path::new("~"), home), PathBuf::from("/home/someone"));
        assert_eq!(
            expand_home(Path::new("/opt/claude"), home),
            PathBuf::from("/opt/claude")
        );
    }
}
