//! tnm init command implementation.

use std::path::PathBuf;

use chrono::Utc;

use crate::cli::context;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::seed;
use crate::storage::{self, Storage};

pub struct Options {
    pub seed: bool,
    pub root: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct InitOutput {
    root: PathBuf,
    seeded: bool,
    users: usize,
    stores: usize,
    tasks: usize,
}

pub fn run(options: Options) -> Result<()> {
    let root = context::resolve_root(options.root)?;
    let storage = Storage::new(root.clone());
    let already = storage.is_initialized();
    storage.init()?;

    let mut users = 0;
    let mut stores = 0;
    let mut tasks = 0;
    if options.seed {
        let directory = seed::demo_directory();
        let demo_tasks = seed::demo_tasks(Utc::now());
        users = directory.users.len();
        stores = directory.stores.len();
        tasks = demo_tasks.len();
        storage.write_directory(&directory)?;
        storage.write_tasks(&demo_tasks)?;
    }

    let _ = storage::ensure_gitignore(&root);

    let output = InitOutput {
        root: root.clone(),
        seeded: options.seed,
        users,
        stores,
        tasks,
    };

    let mut human = HumanOutput::new(if already {
        "Workspace already initialized"
    } else {
        "Workspace initialized"
    });
    human.push_summary("Root", root.display().to_string());
    if options.seed {
        human.push_summary("Users", users.to_string());
        human.push_summary("Stores", stores.to_string());
        human.push_summary("Tasks", tasks.to_string());
        human.push_next_step("tnm actor set <user-id>");
        human.push_next_step("tnm task list --store 1");
    } else {
        human.push_next_step("tnm init --seed  (load the demo dataset)");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "init",
        &output,
        Some(&human),
    )
}
