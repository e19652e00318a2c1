//! tnm task command implementations.

use std::path::PathBuf;

use chrono::Utc;

use crate::cli::context::{self, Context};
use crate::error::{Error, Result};
use crate::ids;
use crate::lifecycle::{self, ConfirmationToken};
use crate::model::{sort_for_display, Role, Task, TaskStatus, UserProfile};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::repository::{TaskFilter, TaskRepository};

pub struct NewOptions {
    pub title: String,
    pub description: String,
    pub due: String,
    pub store: Option<String>,
    pub region: Option<String>,
    pub all_stores: bool,
    pub priority: String,
    pub frequency: String,
    pub observations: Option<String>,
    pub owner: Option<String>,
    pub assign: Option<String>,
    pub delegates: Vec<String>,
    pub delegable: bool,
    pub extendable: bool,
    pub actor: Option<String>,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub store: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub priority: Option<String>,
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

pub struct StartOptions {
    pub id: String,
    pub actor: Option<String>,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct CompleteOptions {
    pub id: String,
    pub confirm: bool,
    pub actor: Option<String>,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct DelegateOptions {
    pub id: String,
    pub to: String,
    pub actor: Option<String>,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ExtendOptions {
    pub id: String,
    pub due: String,
    pub actor: Option<String>,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct SweepOptions {
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct TaskCreatedOutput {
    ids: Vec<String>,
    stores: Vec<String>,
}

#[derive(serde::Serialize)]
struct TaskListOutput {
    total: usize,
    tasks: Vec<Task>,
}

#[derive(serde::Serialize)]
struct SuggestedDelegate {
    id: String,
    name: String,
}

#[derive(serde::Serialize)]
struct TaskShowOutput {
    task: Task,
    suggested_delegates: Vec<SuggestedDelegate>,
}

#[derive(serde::Serialize)]
struct SweepOutput {
    swept: usize,
    total: usize,
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let mut ctx = Context::load(options.root, options.actor)?;
    let actor = ctx.require_actor()?.clone();

    let title = options.title.trim();
    if title.is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }
    let description = options.description.trim();
    if description.is_empty() {
        return Err(Error::InvalidArgument(
            "description cannot be empty".to_string(),
        ));
    }

    let priority = context::parse_priority(&options.priority)?;
    let frequency = context::parse_frequency(&options.frequency)?;
    let due_date = context::parse_due(&options.due)?;

    let target_stores = resolve_target_stores(
        &ctx,
        &actor,
        options.store.as_deref(),
        options.region.as_deref(),
        options.all_stores,
    )?;

    if let Some(assignee) = options.assign.as_deref() {
        if ctx.directory.user_by_id(assignee).is_none() {
            return Err(Error::UserNotFound(assignee.to_string()));
        }
    }
    for delegate in &options.delegates {
        if ctx.directory.user_by_id(delegate).is_none() {
            return Err(Error::UserNotFound(delegate.clone()));
        }
    }
    if let Some(owner) = options.owner.as_deref() {
        if ctx.directory.user_by_id(owner).is_none() {
            return Err(Error::UserNotFound(owner.to_string()));
        }
    }

    let now = Utc::now();
    let mut created_ids = Vec::new();
    let mut existing: Vec<String> = ctx
        .repository
        .list(&TaskFilter::default())?
        .into_iter()
        .map(|task| task.id)
        .collect();

    for store_id in &target_stores {
        let owner = match options.owner.clone() {
            Some(owner) => owner,
            None => default_owner(&ctx, store_id, &actor),
        };

        let id = ids::generate_task_id(
            &ctx.config.tasks,
            existing.iter().map(String::as_str),
        );
        existing.push(id.clone());

        let task = Task {
            id: id.clone(),
            title: title.to_string(),
            description: description.to_string(),
            observations: options.observations.clone(),
            priority,
            frequency,
            store_id: store_id.clone(),
            created_at: now,
            due_date,
            status: TaskStatus::Pendente,
            delegable: options.delegable,
            extendable: options.extendable,
            owner,
            delegates: options.delegates.clone(),
            assigned_to: options.assign.clone(),
            started_by: None,
            started_at: None,
            completed_by: None,
            completed_at: None,
        };
        ctx.repository.insert(task)?;
        created_ids.push(id);
    }

    tracing::info!(
        actor = %actor.id,
        count = created_ids.len(),
        "tasks created"
    );

    let output = TaskCreatedOutput {
        ids: created_ids.clone(),
        stores: target_stores.clone(),
    };

    let mut human = HumanOutput::new(if created_ids.len() == 1 {
        "Task created"
    } else {
        "Tasks created"
    });
    human.push_summary("Stores", target_stores.len().to_string());
    for (id, store_id) in created_ids.iter().zip(target_stores.iter()) {
        human.push_detail(format!("{id} (store {store_id})"));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task new",
        &output,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = Context::load(options.root, None)?;

    let filter = TaskFilter {
        store_id: options.store,
        status: options.status.as_deref().map(context::parse_status).transpose()?,
        assigned_to: options.assignee,
        priority: options
            .priority
            .as_deref()
            .map(context::parse_priority)
            .transpose()?,
    };

    let mut tasks = ctx.repository.list(&filter)?;
    sort_for_display(&mut tasks);

    let output = TaskListOutput {
        total: tasks.len(),
        tasks: tasks.clone(),
    };

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", tasks.len().to_string());
    for task in &tasks {
        human.push_detail(format!(
            "[{}][{}] {} {} (store {}) -> {}",
            task.status,
            task.priority,
            task.id,
            task.title,
            task.store_id,
            task.effective_assignee(),
        ));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task list",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = Context::load(options.root, None)?;
    let task = require_task(&ctx, &options.id)?;

    let suggested_delegates: Vec<SuggestedDelegate> = task
        .delegates
        .iter()
        .filter_map(|id| ctx.directory.user_by_id(id))
        .map(|user| SuggestedDelegate {
            id: user.id.clone(),
            name: user.name.clone(),
        })
        .collect();

    let mut human = HumanOutput::new(format!("Task {}", task.id));
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", task.status.to_string());
    human.push_summary("Priority", task.priority.to_string());
    human.push_summary("Frequency", task.frequency.to_string());
    human.push_summary("Store", task.store_id.clone());
    human.push_summary("Owner", task.owner.clone());
    human.push_summary("Assignee", task.effective_assignee().to_string());
    human.push_summary("Due", task.due_date.to_rfc3339());
    if let Some(observations) = task.observations.as_deref() {
        human.push_detail(format!("Observations: {observations}"));
    }
    if task.delegable {
        for delegate in &suggested_delegates {
            human.push_detail(format!("Delegate candidate: {} ({})", delegate.name, delegate.id));
        }
    }

    let output = TaskShowOutput {
        task,
        suggested_delegates,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task show",
        &output,
        Some(&human),
    )
}

pub fn run_start(options: StartOptions) -> Result<()> {
    let mut ctx = Context::load(options.root, options.actor)?;
    let actor = ctx.require_actor()?.clone();
    let task = require_task(&ctx, &options.id)?;

    let updated = ctx.rules.start(&task, &actor, Utc::now())?;
    let updated = ctx.repository.update(updated)?;

    tracing::info!(task = %updated.id, actor = %actor.id, "task started");

    let mut human = HumanOutput::new("Task started");
    human.push_summary("ID", updated.id.clone());
    human.push_summary("Status", updated.status.to_string());
    human.push_summary("Started by", actor.id.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task start",
        &updated,
        Some(&human),
    )
}

pub fn run_complete(options: CompleteOptions) -> Result<()> {
    let mut ctx = Context::load(options.root, options.actor)?;
    let actor = ctx.require_actor()?.clone();
    let task = require_task(&ctx, &options.id)?;

    // The --confirm flag stands in for the out-of-band completion check
    // (the stores use a biometric reader).
    let token = options.confirm.then(ConfirmationToken::issue);
    let updated = ctx
        .rules
        .complete(&task, &actor, token.as_ref(), Utc::now())?;
    let updated = ctx.repository.update(updated)?;

    tracing::info!(task = %updated.id, actor = %actor.id, "task completed");

    let mut human = HumanOutput::new("Task completed");
    human.push_summary("ID", updated.id.clone());
    human.push_summary("Status", updated.status.to_string());
    human.push_summary("Completed by", actor.id.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task complete",
        &updated,
        Some(&human),
    )
}

pub fn run_delegate(options: DelegateOptions) -> Result<()> {
    let mut ctx = Context::load(options.root, options.actor)?;
    let actor = ctx.require_actor()?.clone();
    let task = require_task(&ctx, &options.id)?;

    let assignee = ctx
        .directory
        .user_by_id(options.to.trim())
        .ok_or_else(|| Error::UserNotFound(options.to.clone()))?;
    if assignee.store_id.as_deref() != Some(task.store_id.as_str()) {
        return Err(Error::InvalidArgument(format!(
            "{} does not work in store {}",
            assignee.id, task.store_id
        )));
    }

    let updated = ctx.rules.delegate(&task, &actor, &assignee.id)?;
    let updated = ctx.repository.update(updated)?;

    tracing::info!(
        task = %updated.id,
        from = %actor.id,
        to = %assignee.id,
        "task delegated"
    );

    let mut human = HumanOutput::new("Task delegated");
    human.push_summary("ID", updated.id.clone());
    human.push_summary("Assignee", assignee.id.clone());
    human.push_summary("Status", updated.status.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task delegate",
        &updated,
        Some(&human),
    )
}

pub fn run_extend(options: ExtendOptions) -> Result<()> {
    let mut ctx = Context::load(options.root, options.actor)?;
    let actor = ctx.require_actor()?.clone();
    let task = require_task(&ctx, &options.id)?;
    let new_due = context::parse_due(&options.due)?;

    let updated = ctx.rules.extend(&task, &actor, new_due)?;
    let updated = ctx.repository.update(updated)?;

    let mut human = HumanOutput::new("Due date extended");
    human.push_summary("ID", updated.id.clone());
    human.push_summary("Due", updated.due_date.to_rfc3339());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task extend",
        &updated,
        Some(&human),
    )
}

pub fn run_sweep(options: SweepOptions) -> Result<()> {
    let mut ctx = Context::load(options.root, None)?;

    let mut tasks = ctx.repository.list(&TaskFilter::default())?;
    let swept = lifecycle::sweep_overdue(&mut tasks, Utc::now());
    let total = tasks.len();
    if swept > 0 {
        ctx.repository.replace_all(tasks)?;
    }

    tracing::info!(swept, total, "overdue sweep finished");

    let output = SweepOutput { swept, total };

    let mut human = HumanOutput::new("Overdue sweep");
    human.push_summary("Marked atrasada", swept.to_string());
    human.push_summary("Tasks checked", total.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task sweep",
        &output,
        Some(&human),
    )
}

fn require_task(ctx: &Context, id: &str) -> Result<Task> {
    ctx.repository
        .get(id.trim())?
        .ok_or_else(|| Error::TaskNotFound(id.trim().to_string()))
}

/// Which stores a creation request lands in, and whether the actor's role
/// allows it. This is the CLI's analogue of the dashboard's role-gated
/// routes: gerente creates in their own store, supervisor fans out within
/// their region, matriz_adm anywhere.
fn resolve_target_stores(
    ctx: &Context,
    actor: &UserProfile,
    store: Option<&str>,
    region: Option<&str>,
    all_stores: bool,
) -> Result<Vec<String>> {
    if all_stores {
        if actor.role != Role::MatrizAdm {
            return Err(Error::Unauthorized {
                actor: actor.id.clone(),
                action: "create in every store for".to_string(),
                task: "the chain".to_string(),
            });
        }
        let mut ids: Vec<String> = ctx
            .directory
            .stores
            .iter()
            .map(|store| store.id.clone())
            .collect();
        ids.sort();
        return Ok(ids);
    }

    if let Some(region_id) = region {
        if ctx.directory.region_by_id(region_id).is_none() {
            return Err(Error::RegionNotFound(region_id.to_string()));
        }
        let allowed = match actor.role {
            Role::MatrizAdm => true,
            Role::Supervisor => actor.region_id.as_deref() == Some(region_id),
            _ => false,
        };
        if !allowed {
            return Err(Error::Unauthorized {
                actor: actor.id.clone(),
                action: "create across region for".to_string(),
                task: region_id.to_string(),
            });
        }
        let mut ids: Vec<String> = ctx
            .directory
            .stores_by_region(region_id)
            .into_iter()
            .map(|store| store.id.clone())
            .collect();
        ids.sort();
        if ids.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "region {region_id} has no stores"
            )));
        }
        return Ok(ids);
    }

    let store_id = match store {
        Some(store_id) => store_id.to_string(),
        None => actor.store_id.clone().ok_or_else(|| {
            Error::InvalidArgument(
                "specify --store, --region, or --all-stores".to_string(),
            )
        })?,
    };

    if ctx.directory.store_by_id(&store_id).is_none() {
        return Err(Error::StoreNotFound(store_id));
    }

    let allowed = match actor.role {
        Role::MatrizAdm => true,
        Role::Gerente => actor.store_id.as_deref() == Some(store_id.as_str()),
        Role::Supervisor => ctx
            .directory
            .store_by_id(&store_id)
            .map(|store| Some(store.region_id.as_str()) == actor.region_id.as_deref())
            .unwrap_or(false),
        Role::Colaborador => false,
    };
    if !allowed {
        return Err(Error::Unauthorized {
            actor: actor.id.clone(),
            action: "create in store".to_string(),
            task: store_id,
        });
    }

    Ok(vec![store_id])
}

/// Default accountable owner for a new task: the store's manager, falling
/// back to the creator.
fn default_owner(ctx: &Context, store_id: &str, actor: &UserProfile) -> String {
    ctx.directory
        .users_by_role(Role::Gerente, Some(store_id))
        .first()
        .map(|manager| manager.id.clone())
        .unwrap_or_else(|| actor.id.clone())
}
