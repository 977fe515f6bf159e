use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use ticketdesk_core::config::{self, PROJECT_DIR};
use ticketdesk_core::db::{self, migrations};
use ticketdesk_core::users;

use crate::cmd;
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Rewrite the default config even if `.ticketdesk/` already exists.
    /// Existing tickets are kept.
    #[arg(long)]
    pub force: bool,

    /// Register this user as the first administrator.
    #[arg(long, value_name = "USERNAME")]
    pub admin: Option<String>,
}

const CONFIG_TOML: &str = "[store]\n\
    busy_timeout_ms = 5000\n\
    \n\
    [comments]\n\
    max_body_chars = 8192\n\
    \n\
    [tickets]\n\
    max_description_chars = 20000\n\
    \n\
    [listing]\n\
    page_size = 50\n";

const GITIGNORE: &str = "tickets.sqlite3\ntickets.sqlite3-wal\ntickets.sqlite3-shm\n";

#[derive(Debug, Serialize)]
struct InitReport {
    project_dir: String,
    store: String,
    schema_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin: Option<String>,
}

/// Execute `td init`. Creates the project skeleton:
///
/// ```text
/// .ticketdesk/
///   config.toml         (default project config)
///   .gitignore          (the store and its WAL files)
///   tickets.sqlite3     (migrated ticket store)
/// ```
///
/// # Errors
///
/// Returns an error if `.ticketdesk/` already exists and `--force` is not
/// set, or if any filesystem or store operation fails.
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let project_dir = project_root.join(PROJECT_DIR);

    if project_dir.exists() && !args.force {
        anyhow::bail!("{PROJECT_DIR}/ already exists. Use `td init --force` to reinitialize.");
    }

    std::fs::create_dir_all(&project_dir).with_context(|| {
        format!(
            "Failed to create project directory: {}",
            project_dir.display()
        )
    })?;

    let config_path = project_dir.join("config.toml");
    std::fs::write(&config_path, CONFIG_TOML)
        .with_context(|| format!("Failed to write config: {}", config_path.display()))?;

    let gitignore_path = project_dir.join(".gitignore");
    std::fs::write(&gitignore_path, GITIGNORE)
        .with_context(|| format!("Failed to write .gitignore: {}", gitignore_path.display()))?;

    let store = config::store_path(project_root);
    let mut conn = db::open_store(&store, db::DEFAULT_BUSY_TIMEOUT)?;
    let schema_version = migrations::current_schema_version(&conn)?;

    if let Some(name) = args.admin.as_deref() {
        users::register_user(&mut conn, name, true).map_err(|e| cmd::fail(output, e))?;
    }

    tracing::info!(path = %store.display(), schema_version, "initialized ticket store");

    let report = InitReport {
        project_dir: project_dir.display().to_string(),
        store: store.display().to_string(),
        schema_version,
        admin: args.admin.clone(),
    };

    render(output, &report, |report, mode, w| {
        if mode == OutputMode::Pretty {
            pretty_section(w, &format!("Initialized {PROJECT_DIR}/"))?;
            pretty_kv(w, "Store", &report.store)?;
            pretty_kv(w, "Schema", report.schema_version.to_string())?;
            if let Some(admin) = &report.admin {
                pretty_kv(w, "Admin", admin)?;
            }
            writeln!(w)?;
            writeln!(w, "Next steps:")?;
            writeln!(w, "  td user add <name> [--admin]")?;
            writeln!(w, "  export TICKETDESK_ACTOR=<name>")?;
            writeln!(w, "  td create --application <app> --description \"...\"")
        } else {
            writeln!(w, "{}\t{}", report.store, report.schema_version)
        }
    })
}
