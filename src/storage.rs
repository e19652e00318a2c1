//! Storage layer for tanamao
//!
//! Persistent state lives in a `.tanamao/` data directory at the
//! workspace root:
//!
//! ```text
//! .tanamao/
//!   tasks.json      # Task set (mutable through the repository)
//!   users.json      # User directory (written at init/seed time)
//!   stores.json     # Store directory
//!   regions.json    # Region directory
//!   actor           # Persisted acting-user id for this workspace
//! ```
//!
//! Writes go through the temp-file-then-rename pattern with a sidecar
//! lock, so a reader never observes a partially written file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::model::{Region, Store, Task, UserProfile};

/// Name of the data directory
pub const DATA_DIR: &str = ".tanamao";

/// Storage manager for the tanamao data directory
#[derive(Debug, Clone)]
pub struct Storage {
    /// Workspace root (the directory containing `.tanamao/`)
    root: PathBuf,
}

impl Storage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir().join("tasks.json")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    pub fn stores_file(&self) -> PathBuf {
        self.data_dir().join("stores.json")
    }

    pub fn regions_file(&self) -> PathBuf {
        self.data_dir().join("regions.json")
    }

    pub fn actor_file(&self) -> PathBuf {
        self.data_dir().join("actor")
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Create the data directory and empty data files where missing.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.data_dir())?;

        for path in [
            self.tasks_file(),
            self.users_file(),
            self.stores_file(),
            self.regions_file(),
        ] {
            if !path.exists() {
                self.write_json(&path, &Vec::<serde_json::Value>::new())?;
            }
        }

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.data_dir().exists()
    }

    /// Error unless `tnm init` has run here.
    pub fn require_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(Error::NotInitialized(self.data_dir()))
        }
    }

    // =========================================================================
    // File I/O helpers (atomic writes for safety)
    // =========================================================================

    /// Write JSON data atomically (write to temp, then rename).
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        lock::write_atomic(path, json.as_bytes())
    }

    /// Write JSON data atomically while holding the file's sidecar lock.
    pub fn write_json_locked<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        lock::write_atomic_locked(path, json.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)
    }

    /// Read JSON data from a file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    // =========================================================================
    // Dataset accessors
    // =========================================================================

    pub fn read_tasks(&self) -> Result<Vec<Task>> {
        self.require_initialized()?;
        if !self.tasks_file().exists() {
            return Ok(Vec::new());
        }
        self.read_json(&self.tasks_file())
    }

    pub fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.require_initialized()?;
        self.write_json_locked(&self.tasks_file(), &tasks)
    }

    /// Run `mutator` over the task set while holding the tasks lock, then
    /// persist the result. This is the single write path for tasks.
    pub fn update_tasks<T, F>(&self, mutator: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<T>,
    {
        self.require_initialized()?;
        let path = self.tasks_file();
        let lock_path = PathBuf::from(format!("{}.lock", path.display()));
        let _lock = FileLock::acquire(&lock_path, DEFAULT_LOCK_TIMEOUT_MS)?;

        let mut tasks: Vec<Task> = if path.exists() {
            self.read_json(&path)?
        } else {
            Vec::new()
        };

        let result = mutator(&mut tasks)?;

        let json = serde_json::to_string_pretty(&tasks)?;
        lock::write_atomic(&path, json.as_bytes())?;

        Ok(result)
    }

    /// Load the user/store/region directory.
    pub fn read_directory(&self) -> Result<Directory> {
        self.require_initialized()?;
        let users: Vec<UserProfile> = self.read_json(&self.users_file())?;
        let stores: Vec<Store> = self.read_json(&self.stores_file())?;
        let regions: Vec<Region> = self.read_json(&self.regions_file())?;
        Ok(Directory::new(users, stores, regions))
    }

    /// Replace the directory files. Used by init/seed only; the directory
    /// has no mutation surface beyond membership.
    pub fn write_directory(&self, directory: &Directory) -> Result<()> {
        self.require_initialized()?;
        self.write_json(&self.users_file(), &directory.users)?;
        self.write_json(&self.stores_file(), &directory.stores)?;
        self.write_json(&self.regions_file(), &directory.regions)?;
        Ok(())
    }

    // =========================================================================
    // Actor persistence
    // =========================================================================

    /// Read the persisted acting-user id for this workspace
    pub fn read_actor(&self) -> Option<String> {
        let path = self.actor_file();
        let raw = fs::read_to_string(path).ok()?;
        let actor = raw.trim();
        if actor.is_empty() {
            None
        } else {
            Some(actor.to_string())
        }
    }

    /// Write the acting-user id for this workspace
    pub fn write_actor(&self, actor: &str) -> Result<()> {
        fs::create_dir_all(self.data_dir())?;
        lock::write_atomic(&self.actor_file(), format!("{actor}\n").as_bytes())
    }
}

/// Ensure `.tanamao/` is in .gitignore if the workspace has one started.
pub fn ensure_gitignore(root: &Path) -> std::io::Result<()> {
    use std::io::Write;

    let gitignore_path = root.join(".gitignore");
    let pattern = format!("/{}/", DATA_DIR);

    let existing = if gitignore_path.exists() {
        fs::read_to_string(&gitignore_path)?
    } else {
        String::new()
    };

    let already_ignored = existing.lines().any(|line| {
        let trimmed = line.trim();
        trimmed == DATA_DIR
            || trimmed == format!("{DATA_DIR}/")
            || trimmed == format!("/{DATA_DIR}")
            || trimmed == pattern
    });

    if !already_ignored {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&gitignore_path)?;

        if !existing.is_empty() && !existing.ends_with('\n') {
            writeln!(file)?;
        }

        writeln!(file, "# tanamao workspace data")?;
        writeln!(file, "{pattern}")?;
    }

    Ok(())
}
