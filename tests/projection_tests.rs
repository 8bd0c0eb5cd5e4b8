//! Projection properties checked against every target.

use serde_json::{Value, json};
use skillport::config::{AgentConfig, McpServerConfig, Skill};
use skillport::targets::SettingsFormat;
use skillport::{SettingsOutcome, Target, projector_for};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn make_skills(root: &Path, names: &[&str]) -> Vec<Skill> {
    names
        .iter()
        .map(|name| {
            let dir = root.join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("SKILL.md"), format!("# {name}")).unwrap();
            Skill::new(*name, dir)
        })
        .collect()
}

fn sample_servers() -> BTreeMap<String, McpServerConfig> {
    BTreeMap::from([
        (
            "context7".to_string(),
            McpServerConfig::remote("https://mcp.context7.com/mcp"),
        ),
        (
            "local".to_string(),
            McpServerConfig::local("node", ["server.js"]).with_env("PORT", "3000"),
        ),
    ])
}

fn settings_path(target: Target, root: &Path) -> std::path::PathBuf {
    root.join(target.profile().settings.file)
}

#[test]
#[cfg(unix)]
fn test_every_skill_gets_one_link_to_its_source() {
    for &target in Target::all() {
        let source = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let config = AgentConfig {
            skills: make_skills(source.path(), &["alpha", "beta", "gamma"]),
            mcp_servers: BTreeMap::new(),
        };

        projector_for(target).project(&config, root.path()).unwrap();

        let skills_dir = root.path().join("skills");
        assert_eq!(fs::read_dir(&skills_dir).unwrap().count(), 3, "{target}");
        for skill in &config.skills {
            let link = skills_dir.join(&skill.name);
            assert!(link.is_symlink(), "{target}: {}", skill.name);
            assert_eq!(
                fs::canonicalize(&link).unwrap(),
                fs::canonicalize(&skill.source_dir).unwrap()
            );
        }
    }
}

#[test]
fn test_empty_mcp_servers_never_touch_settings() {
    for &target in Target::all() {
        let root = TempDir::new().unwrap();
        let config = AgentConfig::default();

        let summary = projector_for(target).project(&config, root.path()).unwrap();

        assert_eq!(summary.settings, SettingsOutcome::Skipped, "{target}");
        assert!(!settings_path(target, root.path()).exists(), "{target}");
    }
}

#[test]
fn test_json_merge_keeps_unrelated_keys_and_servers() {
    for &target in Target::all() {
        let settings = &target.profile().settings;
        if settings.format != SettingsFormat::Json {
            continue;
        }

        let root = TempDir::new().unwrap();
        let path = settings_path(target, root.path());
        let mut existing = json!({ "theme": "dark" });
        existing[settings.container_key] = json!({ "existing": { "command": "keep-me" } });
        fs::write(&path, serde_json::to_string_pretty(&existing).unwrap()).unwrap();

        let config = AgentConfig {
            skills: vec![],
            mcp_servers: sample_servers(),
        };
        projector_for(target).project(&config, root.path()).unwrap();

        let merged: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let container = merged[settings.container_key].as_object().unwrap();
        assert_eq!(merged["theme"], json!("dark"), "{target}");
        assert_eq!(container["existing"], json!({ "command": "keep-me" }), "{target}");
        assert!(container.contains_key("context7"), "{target}");
        assert!(container.contains_key("local"), "{target}");
    }
}

#[test]
fn test_generated_server_replaces_same_named_entry() {
    for &target in Target::all() {
        let settings = &target.profile().settings;
        if settings.format != SettingsFormat::Json {
            continue;
        }

        let root = TempDir::new().unwrap();
        let path = settings_path(target, root.path());
        let mut existing = json!({});
        existing[settings.container_key] = json!({ "local": { "stale": true } });
        fs::write(&path, existing.to_string()).unwrap();

        let config = AgentConfig {
            skills: vec![],
            mcp_servers: sample_servers(),
        };
        projector_for(target).project(&config, root.path()).unwrap();

        let merged: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(
            merged[settings.container_key]["local"].get("stale").is_none(),
            "{target}"
        );
    }
}

#[test]
#[cfg(unix)]
fn test_second_run_changes_nothing() {
    for &target in Target::all() {
        let source = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let config = AgentConfig {
            skills: make_skills(source.path(), &["alpha"]),
            mcp_servers: sample_servers(),
        };
        let projector = projector_for(target);

        projector.project(&config, root.path()).unwrap();
        let first = fs::read_to_string(settings_path(target, root.path())).unwrap();

        let summary = projector.project(&config, root.path()).unwrap();
        let second = fs::read_to_string(settings_path(target, root.path())).unwrap();

        assert_eq!(first, second, "{target}");
        assert_eq!(summary.links.unchanged, 1, "{target}");
        assert_eq!(summary.links.created + summary.links.updated, 0, "{target}");
        assert!(
            matches!(summary.settings, SettingsOutcome::Unchanged(_)),
            "{target}"
        );
    }
}

#[test]
fn test_codex_merge_keeps_existing_tables() {
    let root = TempDir::new().unwrap();
    let path = root.path().join("config.toml");
    fs::write(
        &path,
        "model = \"o3\"\n\n[mcp_servers.existing]\ncommand = \"keep-me\"\n",
    )
    .unwrap();

    let config = AgentConfig {
        skills: vec![],
        mcp_servers: sample_servers(),
    };
    projector_for(Target::Codex)
        .project(&config, root.path())
        .unwrap();

    let parsed: toml::Table = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed["model"].as_str(), Some("o3"));
    let servers = parsed["mcp_servers"].as_table().unwrap();
    assert_eq!(servers["existing"]["command"].as_str(), Some("keep-me"));
    assert_eq!(servers["local"]["command"].as_str(), Some("node"));
    assert_eq!(servers["local"]["env"]["PORT"].as_str(), Some("3000"));
    assert_eq!(
        servers["context7"]["url"].as_str(),
        Some("https://mcp.context7.com/mcp")
    );
}
