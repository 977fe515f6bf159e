use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Project directory holding the store and project config.
pub const PROJECT_DIR: &str = ".ticketdesk";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub comments: CommentConfig,
    #[serde(default)]
    pub tickets: TicketConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentConfig {
    #[serde(default = "default_max_body_chars")]
    pub max_body_chars: usize,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            max_body_chars: default_max_body_chars(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketConfig {
    #[serde(default = "default_max_description_chars")]
    pub max_description_chars: usize,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            max_description_chars: default_max_description_chars(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
    /// Username used when neither `--actor` nor `TICKETDESK_ACTOR` is set.
    #[serde(default)]
    pub actor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

/// Path of the ticket store inside `project_root`.
#[must_use]
pub fn store_path(project_root: &Path) -> PathBuf {
    project_root
        .join(PROJECT_DIR)
        .join(crate::db::STORE_FILE_NAME)
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(PROJECT_DIR).join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("ticketdesk/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn resolve_config(project_root: &Path, cli_json: bool) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_json, user.output.as_deref(), env_format.as_deref());

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

/// Pick the output mode: `--json`, then `FORMAT`, then user config, then
/// pretty on a terminal and text otherwise.
#[must_use]
pub fn resolve_output(
    cli_json: bool,
    user_output: Option<&str>,
    env_format: Option<&str>,
) -> String {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some("pretty"),
            "text" | "table" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if std::io::stdout().is_terminal() {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

const fn default_busy_timeout_ms() -> u64 {
    5_000
}

const fn default_max_body_chars() -> usize {
    8_192
}

const fn default_max_description_chars() -> usize {
    20_000
}

const fn default_page_size() -> u32 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir must be created");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg, ProjectConfig::default());
        assert_eq!(cfg.store.busy_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.comments.max_body_chars, 8_192);
        assert_eq!(cfg.tickets.max_description_chars, 20_000);
        assert_eq!(cfg.listing.page_size, 50);
    }

    #[test]
    fn partial_project_config_keeps_other_defaults() {
        let root = tempfile::tempdir().expect("temp dir must be created");
        let dir = root.path().join(PROJECT_DIR);
        std::fs::create_dir_all(&dir).expect("create project dir");
        std::fs::write(
            dir.join("config.toml"),
            "[comments]\nmax_body_chars = 140\n\n[listing]\npage_size = 10\n",
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.comments.max_body_chars, 140);
        assert_eq!(cfg.listing.page_size, 10);
        assert_eq!(cfg.store.busy_timeout_ms, 5_000);
    }

    #[test]
    fn malformed_project_config_is_an_error() {
        let root = tempfile::tempdir().expect("temp dir must be created");
        let dir = root.path().join(PROJECT_DIR);
        std::fs::create_dir_all(&dir).expect("create project dir");
        std::fs::write(dir.join("config.toml"), "[store\nbusy").expect("write config");

        let err = load_project_config(root.path()).expect_err("parse must fail");
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn cli_json_overrides_env_and_config() {
        let output = resolve_output(true, Some("pretty"), Some("text"));
        assert_eq!(output, "json");
    }

    #[test]
    fn env_beats_user_config() {
        assert_eq!(resolve_output(false, Some("json"), Some("text")), "text");
    }

    #[test]
    fn aliases_are_normalized() {
        assert_eq!(resolve_output(false, Some("table"), Some("human")), "pretty");
        assert_eq!(resolve_output(false, Some("human"), Some("table")), "text");
    }

    #[test]
    fn user_config_parses_actor() {
        let cfg: UserConfig =
            toml::from_str("output = \"json\"\nactor = \"alice\"\n").expect("parse");
        assert_eq!(cfg.output.as_deref(), Some("json"));
        assert_eq!(cfg.actor.as_deref(), Some("alice"));
    }

    #[test]
    fn store_path_lives_in_project_dir() {
        let path = store_path(Path::new("/srv/app"));
        assert_eq!(path, PathBuf::from("/srv/app/.ticketdesk/tickets.sqlite3"));
    }
}
