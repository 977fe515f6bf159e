//! Actor identity resolution for CLI commands.
//!
//! The resolution chain: `--actor` flag > `TICKETDESK_ACTOR` env > `actor`
//! in the user config file. With none of them set the command runs as the
//! anonymous actor, which may read public data but never write.

use std::env;

use rusqlite::Connection;
use ticketdesk_core::TicketError;
use ticketdesk_core::config;
use ticketdesk_core::model::Actor;
use ticketdesk_core::users;

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
    fn config_actor(&self) -> Option<String>;
}

/// Real environment reader.
struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    fn config_actor(&self) -> Option<String> {
        // A malformed user config already failed in `resolve_config`.
        config::load_user_config().ok().and_then(|cfg| cfg.actor)
    }
}

fn resolve_actor_name_with(cli_flag: Option<&str>, env: &dyn EnvReader) -> Option<String> {
    if let Some(name) = cli_flag.map(str::trim).filter(|name| !name.is_empty()) {
        return Some(name.to_string());
    }

    if let Some(name) = env.get("TICKETDESK_ACTOR") {
        return Some(name.trim().to_string());
    }

    env.config_actor()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// The username the command acts as, if any.
pub fn resolve_actor_name(cli_flag: Option<&str>) -> Option<String> {
    resolve_actor_name_with(cli_flag, &RealEnv)
}

/// Resolve the acting user against the store.
///
/// # Errors
///
/// Returns [`TicketError::UserNotFound`] when the name is not registered.
pub fn resolve_actor(conn: &Connection, cli_flag: Option<&str>) -> Result<Actor, TicketError> {
    let name = resolve_actor_name(cli_flag);
    let actor = users::resolve_actor(conn, name.as_deref())?;
    tracing::debug!(actor = %actor, "resolved actor");
    Ok(actor)
}
