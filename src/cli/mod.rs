//! Command-line interface for tnm
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule. The CLI is the
//! presentation boundary: it resolves the acting user, gates commands by
//! role, and obtains the completion confirmation before calling into the
//! lifecycle rules.

use clap::{Parser, Subcommand};

use crate::error::Result;

mod actor;
mod context;
mod init;
mod stats;
mod store;
mod task;
mod user;

pub use context::Context;

/// tnm - TaNaMao task management
///
/// A CLI for retail pharmacy chains: managers assign and delegate store
/// tasks, staff execute them, supervisors read store performance, head
/// office fans tasks out across stores.
#[derive(Parser, Debug)]
#[command(name = "tnm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Workspace root (defaults to current directory)
    #[arg(long, global = true, env = "TANAMAO_ROOT")]
    pub root: Option<std::path::PathBuf>,

    /// Acting user id for lifecycle operations
    #[arg(long, global = true, env = "TANAMAO_ACTOR")]
    pub actor: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the data directory
    Init {
        /// Load the deterministic demo dataset
        #[arg(long)]
        seed: bool,
    },

    /// Task operations
    #[command(subcommand)]
    Task(TaskCommands),

    /// User directory queries
    #[command(subcommand)]
    User(UserCommands),

    /// Store directory queries
    #[command(subcommand)]
    Store(StoreCommands),

    /// Performance statistics
    #[command(subcommand)]
    Stats(StatsCommands),

    /// Acting-user identity
    #[command(subcommand)]
    Actor(ActorCommands),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task (managers in their store; supervisors and head
    /// office may fan out across stores)
    New {
        /// Task title
        title: String,

        /// What needs to be done
        #[arg(long)]
        description: String,

        /// Deadline (RFC 3339 timestamp or YYYY-MM-DD)
        #[arg(long)]
        due: String,

        /// Target store id (defaults to the manager's own store)
        #[arg(long)]
        store: Option<String>,

        /// Fan out to every store of a region (supervisor/matriz_adm)
        #[arg(long, conflicts_with = "store")]
        region: Option<String>,

        /// Fan out to every store in the chain (matriz_adm only)
        #[arg(long, conflicts_with_all = ["store", "region"])]
        all_stores: bool,

        /// Priority: urgent_important, urgent, important, normal
        #[arg(long, default_value = "normal")]
        priority: String,

        /// Frequency: diaria, semanal, quinzenal, mensal, bimestral,
        /// trimestral, semestral, anual, pontual
        #[arg(long, default_value = "pontual")]
        frequency: String,

        /// Free-form observations/instructions
        #[arg(long)]
        observations: Option<String>,

        /// Accountable owner (defaults to the store's manager)
        #[arg(long)]
        owner: Option<String>,

        /// Initial assignee
        #[arg(long)]
        assign: Option<String>,

        /// Suggested delegates (repeatable)
        #[arg(long = "delegate")]
        delegates: Vec<String>,

        /// Allow the task to be reassigned
        #[arg(long)]
        delegable: bool,

        /// Allow the due date to be pushed
        #[arg(long)]
        extendable: bool,
    },

    /// List tasks
    List {
        /// Filter by store id
        #[arg(long)]
        store: Option<String>,

        /// Filter by status: pendente, em_progresso, concluida, atrasada
        #[arg(long)]
        status: Option<String>,

        /// Filter by current assignee
        #[arg(long)]
        assignee: Option<String>,

        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,
    },

    /// Show one task with delegation suggestions
    Show {
        /// Task id
        id: String,
    },

    /// Start a pending task
    Start {
        /// Task id
        id: String,
    },

    /// Complete a task in progress
    Complete {
        /// Task id
        id: String,

        /// Acknowledge the out-of-band completion check
        #[arg(long)]
        confirm: bool,
    },

    /// Reassign a pending, delegable task (managers only)
    Delegate {
        /// Task id
        id: String,

        /// New assignee user id
        #[arg(long)]
        to: String,
    },

    /// Push the due date of an extendable task (managers only)
    Extend {
        /// Task id
        id: String,

        /// New deadline (RFC 3339 timestamp or YYYY-MM-DD)
        #[arg(long)]
        due: String,
    },

    /// Mark overdue open tasks as atrasada
    Sweep,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List users
    List {
        /// Filter by role: gerente, colaborador, supervisor, matriz_adm
        #[arg(long)]
        role: Option<String>,

        /// Filter by store id
        #[arg(long)]
        store: Option<String>,
    },

    /// Show one user
    Show {
        /// User id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum StoreCommands {
    /// List stores
    List {
        /// Filter by region id
        #[arg(long)]
        region: Option<String>,
    },

    /// Show one store
    Show {
        /// Store id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum StatsCommands {
    /// Performance counters for one user
    User {
        /// User id
        id: String,
    },

    /// Performance counters for one store
    Store {
        /// Store id
        id: String,
    },

    /// Per-store rows and rollup for one region
    Region {
        /// Region id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ActorCommands {
    /// Persist the acting-user id for this workspace
    Set {
        /// User id
        id: String,
    },

    /// Show the resolved acting user
    Show,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init { seed } => init::run(init::Options {
                seed,
                root: self.root,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Task(cmd) => match cmd {
                TaskCommands::New {
                    title,
                    description,
                    due,
                    store,
                    region,
                    all_stores,
                    priority,
                    frequency,
                    observations,
                    owner,
                    assign,
                    delegates,
                    delegable,
                    extendable,
                } => task::run_new(task::NewOptions {
                    title,
                    description,
                    due,
                    store,
                    region,
                    all_stores,
                    priority,
                    frequency,
                    observations,
                    owner,
                    assign,
                    delegates,
                    delegable,
                    extendable,
                    actor: self.actor,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::List {
                    store,
                    status,
                    assignee,
                    priority,
                } => task::run_list(task::ListOptions {
                    store,
                    status,
                    assignee,
                    priority,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Show { id } => task::run_show(task::ShowOptions {
                    id,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Start { id } => task::run_start(task::StartOptions {
                    id,
                    actor: self.actor,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Complete { id, confirm } => {
                    task::run_complete(task::CompleteOptions {
                        id,
                        confirm,
                        actor: self.actor,
                        root: self.root,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                TaskCommands::Delegate { id, to } => {
                    task::run_delegate(task::DelegateOptions {
                        id,
                        to,
                        actor: self.actor,
                        root: self.root,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                TaskCommands::Extend { id, due } => task::run_extend(task::ExtendOptions {
                    id,
                    due,
                    actor: self.actor,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Sweep => task::run_sweep(task::SweepOptions {
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::User(cmd) => match cmd {
                UserCommands::List { role, store } => user::run_list(user::ListOptions {
                    role,
                    store,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
                UserCommands::Show { id } => user::run_show(user::ShowOptions {
                    id,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Store(cmd) => match cmd {
                StoreCommands::List { region } => store::run_list(store::ListOptions {
                    region,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
                StoreCommands::Show { id } => store::run_show(store::ShowOptions {
                    id,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Stats(cmd) => match cmd {
                StatsCommands::User { id } => stats::run_user(stats::UserOptions {
                    id,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
                StatsCommands::Store { id } => stats::run_store(stats::StoreOptions {
                    id,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
                StatsCommands::Region { id } => stats::run_region(stats::RegionOptions {
                    id,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Actor(cmd) => match cmd {
                ActorCommands::Set { id } => actor::run_set(actor::SetOptions {
                    id,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
                ActorCommands::Show => actor::run_show(actor::ShowOptions {
                    actor: self.actor,
                    root: self.root,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
        }
    }
}
