//! tnm actor command implementations.

use std::path::PathBuf;

use crate::actor;
use crate::cli::context::{self, Context};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct SetOptions {
    pub id: String,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub actor: Option<String>,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct ActorOutput {
    actor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

pub fn run_set(options: SetOptions) -> Result<()> {
    let ctx = Context::load(options.root, None)?;
    let user = ctx
        .directory
        .user_by_id(options.id.trim())
        .ok_or_else(|| Error::UserNotFound(options.id.clone()))?;

    actor::persist_actor(&ctx.root, &user.id)?;

    let output = ActorOutput {
        actor: user.id.clone(),
        name: Some(user.name.clone()),
        role: Some(user.role.to_string()),
    };

    let mut human = HumanOutput::new("Actor set");
    human.push_summary("Actor", format!("{} ({})", user.name, user.id));
    human.push_summary("Role", user.role.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "actor set",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let root = context::resolve_root(options.root)?;
    let resolved = actor::resolve_actor(&root, options.actor.as_deref()).ok_or_else(|| {
        Error::InvalidArgument(
            "no acting user; pass --actor <id> or run `tnm actor set <id>`".to_string(),
        )
    })?;

    // Directory lookup is best-effort: the id may predate a reseed.
    let ctx = Context::load(Some(root), None).ok();
    let profile = ctx
        .as_ref()
        .and_then(|ctx| ctx.directory.user_by_id(&resolved))
        .cloned();

    let output = ActorOutput {
        actor: resolved.clone(),
        name: profile.as_ref().map(|user| user.name.clone()),
        role: profile.as_ref().map(|user| user.role.to_string()),
    };

    let mut human = HumanOutput::new("Acting user");
    match profile {
        Some(user) => {
            human.push_summary("Actor", format!("{} ({})", user.name, user.id));
            human.push_summary("Role", user.role.to_string());
        }
        None => {
            human.push_summary("Actor", resolved);
            human.push_warning("id not present in the user directory".to_string());
        }
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "actor show",
        &output,
        Some(&human),
    )
}
