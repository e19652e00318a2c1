//! Shared command context: workspace resolution, dataset loading, acting
//! user lookup, and parsing of the CLI's string-typed filters.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};

use crate::actor;
use crate::config::Config;
use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::lifecycle::LifecycleRules;
use crate::model::{Role, TaskFrequency, TaskPriority, TaskStatus, UserProfile};
use crate::repository::JsonRepository;
use crate::storage::Storage;

pub struct Context {
    pub root: PathBuf,
    pub config: Config,
    pub storage: Storage,
    pub directory: Directory,
    pub repository: JsonRepository,
    pub rules: LifecycleRules,
    actor_id: Option<String>,
}

impl Context {
    /// Load everything a command needs from an initialized workspace.
    pub fn load(root: Option<PathBuf>, cli_actor: Option<String>) -> Result<Self> {
        let root = resolve_root(root)?;
        let storage = Storage::new(root.clone());
        storage.require_initialized()?;

        let config = Config::load_from_root(&root);
        let directory = storage.read_directory()?;
        let repository = JsonRepository::new(storage.clone());
        let rules = LifecycleRules::new(config.lifecycle.clone());
        let actor_id = actor::resolve_actor(&root, cli_actor.as_deref());

        Ok(Self {
            root,
            config,
            storage,
            directory,
            repository,
            rules,
            actor_id,
        })
    }

    /// The resolved acting-user id, if any.
    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    /// The acting user's directory profile. Commands that mutate tasks
    /// require one; absence is a user error with a pointer to `actor set`.
    pub fn require_actor(&self) -> Result<&UserProfile> {
        let id = self.actor_id.as_deref().ok_or_else(|| {
            Error::InvalidArgument(
                "no acting user; pass --actor <id> or run `tnm actor set <id>`".to_string(),
            )
        })?;
        self.directory
            .user_by_id(id)
            .ok_or_else(|| Error::UserNotFound(id.to_string()))
    }
}

pub fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => Ok(std::env::current_dir()?),
    }
}

pub fn parse_status(value: &str) -> Result<TaskStatus> {
    match value.trim() {
        "pendente" => Ok(TaskStatus::Pendente),
        "em_progresso" => Ok(TaskStatus::EmProgresso),
        "concluida" => Ok(TaskStatus::Concluida),
        "atrasada" => Ok(TaskStatus::Atrasada),
        other => Err(Error::InvalidArgument(format!(
            "unknown status '{other}' (expected pendente|em_progresso|concluida|atrasada)"
        ))),
    }
}

pub fn parse_priority(value: &str) -> Result<TaskPriority> {
    match value.trim() {
        "urgent_important" => Ok(TaskPriority::UrgentImportant),
        "urgent" => Ok(TaskPriority::Urgent),
        "important" => Ok(TaskPriority::Important),
        "normal" => Ok(TaskPriority::Normal),
        other => Err(Error::InvalidArgument(format!(
            "unknown priority '{other}' (expected urgent_important|urgent|important|normal)"
        ))),
    }
}

pub fn parse_frequency(value: &str) -> Result<TaskFrequency> {
    match value.trim() {
        "diaria" => Ok(TaskFrequency::Diaria),
        "semanal" => Ok(TaskFrequency::Semanal),
        "quinzenal" => Ok(TaskFrequency::Quinzenal),
        "mensal" => Ok(TaskFrequency::Mensal),
        "bimestral" => Ok(TaskFrequency::Bimestral),
        "trimestral" => Ok(TaskFrequency::Trimestral),
        "semestral" => Ok(TaskFrequency::Semestral),
        "anual" => Ok(TaskFrequency::Anual),
        "pontual" => Ok(TaskFrequency::Pontual),
        other => Err(Error::InvalidArgument(format!(
            "unknown frequency '{other}'"
        ))),
    }
}

pub fn parse_role(value: &str) -> Result<Role> {
    match value.trim() {
        "gerente" => Ok(Role::Gerente),
        "colaborador" => Ok(Role::Colaborador),
        "supervisor" => Ok(Role::Supervisor),
        "matriz_adm" => Ok(Role::MatrizAdm),
        other => Err(Error::InvalidArgument(format!(
            "unknown role '{other}' (expected gerente|colaborador|supervisor|matriz_adm)"
        ))),
    }
}

/// Parse a deadline: full RFC 3339, or a bare date taken as end of that
/// business day (17:00 UTC).
pub fn parse_due(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let ts = date
            .and_hms_opt(17, 0, 0)
            .ok_or_else(|| Error::InvalidArgument(format!("invalid date '{trimmed}'")))?;
        return Ok(DateTime::from_naive_utc_and_offset(ts, Utc));
    }
    Err(Error::InvalidArgument(format!(
        "invalid due date '{trimmed}' (expected RFC 3339 or YYYY-MM-DD)"
    )))
}
