//! tnm user command implementations.

use std::path::PathBuf;

use crate::cli::context::{self, Context};
use crate::error::{Error, Result};
use crate::model::UserProfile;
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct ListOptions {
    pub role: Option<String>,
    pub store: Option<String>,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub id: String,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct UserListOutput {
    total: usize,
    users: Vec<UserProfile>,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = Context::load(options.root, None)?;

    let users: Vec<UserProfile> = match options.role.as_deref() {
        Some(role) => {
            let role = context::parse_role(role)?;
            ctx.directory
                .users_by_role(role, options.store.as_deref())
                .into_iter()
                .cloned()
                .collect()
        }
        None => match options.store.as_deref() {
            Some(store_id) => ctx
                .directory
                .users_in_store(store_id)
                .into_iter()
                .cloned()
                .collect(),
            None => ctx.directory.users.clone(),
        },
    };

    let output = UserListOutput {
        total: users.len(),
        users: users.clone(),
    };

    let mut human = HumanOutput::new("Users");
    human.push_summary("Total", users.len().to_string());
    for user in &users {
        let mut line = format!("[{}] {} {}", user.role, user.id, user.name);
        if let Some(position) = user.position.as_deref() {
            line.push_str(&format!(" ({position})"));
        }
        if let Some(store_id) = user.store_id.as_deref() {
            line.push_str(&format!(" @ store {store_id}"));
        }
        human.push_detail(line);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "user list",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = Context::load(options.root, None)?;
    let user = ctx
        .directory
        .user_by_id(options.id.trim())
        .ok_or_else(|| Error::UserNotFound(options.id.clone()))?
        .clone();

    let mut human = HumanOutput::new(format!("User {}", user.id));
    human.push_summary("Name", user.name.clone());
    human.push_summary("Role", user.role.to_string());
    if let Some(store_id) = user.store_id.as_deref() {
        human.push_summary("Store", store_id.to_string());
    }
    if let Some(region_id) = user.region_id.as_deref() {
        human.push_summary("Region", region_id.to_string());
    }
    if let Some(position) = user.position.as_deref() {
        human.push_summary("Position", position.to_string());
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "user show",
        &user,
        Some(&human),
    )
}
