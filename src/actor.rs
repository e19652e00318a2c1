//! Acting-user resolution.
//!
//! Resolution order:
//! 1) CLI --actor (explicit)
//! 2) TANAMAO_ACTOR environment variable
//! 3) Persisted workspace value in .tanamao/actor
//! 4) Config default (actor.default)

use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::Storage;

/// Resolve the acting user id using CLI, environment, persisted value, and
/// config. Returns `None` when nothing is configured; commands that need
/// an actor turn that into an error with a hint.
pub fn resolve_actor(root: &Path, cli_actor: Option<&str>) -> Option<String> {
    if let Some(actor) = non_empty(cli_actor) {
        return Some(actor.to_string());
    }

    if let Ok(env_actor) = std::env::var("TANAMAO_ACTOR") {
        if let Some(actor) = non_empty(Some(env_actor.as_str())) {
            return Some(actor.to_string());
        }
    }

    let storage = Storage::new(root.to_path_buf());
    if let Some(actor) = storage.read_actor() {
        return Some(actor);
    }

    let config = Config::load_from_root(root);
    non_empty(Some(config.actor.default.as_str())).map(str::to_string)
}

/// Persist the acting-user id in `.tanamao/actor`.
pub fn persist_actor(root: &Path, actor: &str) -> Result<()> {
    let actor = non_empty(Some(actor))
        .ok_or_else(|| Error::InvalidArgument("actor id cannot be empty".to_string()))?;

    let storage = Storage::new(root.to_path_buf());
    storage.write_actor(actor)
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn cli_actor_wins() {
        let temp = TempDir::new().unwrap();
        let actor = resolve_actor(temp.path(), Some("  u2  "));
        assert_eq!(actor.as_deref(), Some("u2"));
    }

    #[test]
    fn persisted_actor_is_used() {
        let temp = TempDir::new().unwrap();
        persist_actor(temp.path(), "u5").unwrap();
        let actor = resolve_actor(temp.path(), None);
        assert_eq!(actor.as_deref(), Some("u5"));
    }

    #[test]
    fn config_default_is_last_resort() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".tanamao.toml"),
            "[actor]\ndefault = \"u1\"\n",
        )
        .unwrap();
        let actor = resolve_actor(temp.path(), None);
        assert_eq!(actor.as_deref(), Some("u1"));
    }

    #[test]
    fn empty_everything_resolves_to_none() {
        let temp = TempDir::new().unwrap();
        assert!(resolve_actor(temp.path(), None).is_none());
    }

    #[test]
    fn blank_actor_cannot_be_persisted() {
        let temp = TempDir::new().unwrap();
        let err = persist_actor(temp.path(), "   ").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
