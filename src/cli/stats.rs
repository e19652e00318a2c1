//! tnm stats command implementations.
//!
//! Every number here comes from the aggregator over the current task set;
//! nothing is cached between invocations.

use std::path::PathBuf;

use crate::cli::context::Context;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::repository::{TaskFilter, TaskRepository};
use crate::stats;

pub struct UserOptions {
    pub id: String,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct StoreOptions {
    pub id: String,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RegionOptions {
    pub id: String,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_user(options: UserOptions) -> Result<()> {
    let ctx = Context::load(options.root, None)?;
    let user = ctx
        .directory
        .user_by_id(options.id.trim())
        .ok_or_else(|| Error::UserNotFound(options.id.clone()))?;

    let tasks = ctx.repository.list(&TaskFilter::default())?;
    let stats = stats::user_stats(user, &tasks);

    let mut human = HumanOutput::new(format!("Performance: {}", stats.user_name));
    human.push_summary("Assigned", stats.tasks_assigned.to_string());
    human.push_summary("Started", stats.tasks_started.to_string());
    human.push_summary("Completed", stats.tasks_completed.to_string());
    human.push_summary("Delayed", stats.tasks_delayed.to_string());
    human.push_summary("Performance", format!("{}%", stats.performance));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "stats user",
        &stats,
        Some(&human),
    )
}

pub fn run_store(options: StoreOptions) -> Result<()> {
    let ctx = Context::load(options.root, None)?;
    let store = ctx
        .directory
        .store_by_id(options.id.trim())
        .ok_or_else(|| Error::StoreNotFound(options.id.clone()))?;

    let tasks = ctx.repository.list(&TaskFilter::default())?;
    let stats = stats::store_stats(store, &tasks);

    let mut human = HumanOutput::new(format!("Performance: {}", stats.store_name));
    human.push_summary("Total", stats.tasks_total.to_string());
    human.push_summary("Completed", stats.tasks_completed.to_string());
    human.push_summary("In progress", stats.tasks_in_progress.to_string());
    human.push_summary("Pending", stats.tasks_pending.to_string());
    human.push_summary("Delayed", stats.tasks_delayed.to_string());
    human.push_summary("Performance", format!("{}%", stats.performance));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "stats store",
        &stats,
        Some(&human),
    )
}

pub fn run_region(options: RegionOptions) -> Result<()> {
    let ctx = Context::load(options.root, None)?;
    let region = ctx
        .directory
        .region_by_id(options.id.trim())
        .ok_or_else(|| Error::RegionNotFound(options.id.clone()))?;

    let stores: Vec<&crate::model::Store> = ctx.directory.stores.iter().collect();
    let tasks = ctx.repository.list(&TaskFilter::default())?;
    let stats = stats::region_stats(region, &stores, &tasks);

    let mut human = HumanOutput::new(format!("Performance: {}", stats.region_name));
    human.push_summary("Stores", stats.stores.len().to_string());
    human.push_summary("Total", stats.tasks_total.to_string());
    human.push_summary("Completed", stats.tasks_completed.to_string());
    human.push_summary("Delayed", stats.tasks_delayed.to_string());
    human.push_summary("Performance", format!("{}%", stats.performance));
    for row in &stats.stores {
        human.push_detail(format!(
            "{} {}: {}/{} done ({}%)",
            row.store_id, row.store_name, row.tasks_completed, row.tasks_total, row.performance
        ));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "stats region",
        &stats,
        Some(&human),
    )
}
