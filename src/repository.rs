//! Task persistence.
//!
//! The lifecycle rules validate; a repository only stores the result. The
//! trait keeps the rules and the aggregator testable without touching disk
//! and lets embedders swap the backing entirely.
//!
//! Writes are last-write-wins per task: there is no version field and no
//! cross-task transaction. The file-backed implementation serializes
//! concurrent writers with the storage lock, nothing more.

use crate::error::{Error, Result};
use crate::model::{Task, TaskPriority, TaskStatus};
use crate::storage::Storage;

/// Criteria for listing tasks. Empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub store_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<String>,
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(store_id) = self.store_id.as_deref() {
            if task.store_id != store_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(assigned_to) = self.assigned_to.as_deref() {
            if task.effective_assignee() != assigned_to {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        true
    }
}

/// Storage abstraction for the task set.
pub trait TaskRepository {
    /// All tasks matching the filter. Never null; empty when nothing matches.
    fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// One task by id, absent when unknown.
    fn get(&self, id: &str) -> Result<Option<Task>>;

    /// Add a new task. Rejects duplicate ids.
    fn insert(&mut self, task: Task) -> Result<()>;

    /// Replace an existing task (matched by id) with a validated update.
    fn update(&mut self, task: Task) -> Result<Task>;

    /// Replace the whole set. Used by bulk passes like the overdue sweep.
    fn replace_all(&mut self, tasks: Vec<Task>) -> Result<()>;
}

/// In-memory repository for library embedders and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    tasks: Vec<Task>,
}

impl MemoryRepository {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl TaskRepository for MemoryRepository {
    fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    fn get(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.tasks.iter().find(|task| task.id == id).cloned())
    }

    fn insert(&mut self, task: Task) -> Result<()> {
        if self.tasks.iter().any(|existing| existing.id == task.id) {
            return Err(Error::InvalidArgument(format!(
                "task already exists: {}",
                task.id
            )));
        }
        self.tasks.push(task);
        Ok(())
    }

    fn update(&mut self, task: Task) -> Result<Task> {
        let slot = self
            .tasks
            .iter_mut()
            .find(|existing| existing.id == task.id)
            .ok_or_else(|| Error::TaskNotFound(task.id.clone()))?;
        *slot = task.clone();
        Ok(task)
    }

    fn replace_all(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.tasks = tasks;
        Ok(())
    }
}

/// File-backed repository over the `.tanamao/` layout.
#[derive(Debug, Clone)]
pub struct JsonRepository {
    storage: Storage,
}

impl JsonRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}

impl TaskRepository for JsonRepository {
    fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let tasks = self.storage.read_tasks()?;
        Ok(tasks
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect())
    }

    fn get(&self, id: &str) -> Result<Option<Task>> {
        let tasks = self.storage.read_tasks()?;
        Ok(tasks.into_iter().find(|task| task.id == id))
    }

    fn insert(&mut self, task: Task) -> Result<()> {
        self.storage.update_tasks(|tasks| {
            if tasks.iter().any(|existing| existing.id == task.id) {
                return Err(Error::InvalidArgument(format!(
                    "task already exists: {}",
                    task.id
                )));
            }
            tasks.push(task.clone());
            Ok(())
        })
    }

    fn update(&mut self, task: Task) -> Result<Task> {
        self.storage.update_tasks(|tasks| {
            let slot = tasks
                .iter_mut()
                .find(|existing| existing.id == task.id)
                .ok_or_else(|| Error::TaskNotFound(task.id.clone()))?;
            *slot = task.clone();
            Ok(task.clone())
        })
    }

    fn replace_all(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.storage.update_tasks(|existing| {
            *existing = tasks.clone();
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskFrequency, TaskPriority};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn task(id: &str, store: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: "test".to_string(),
            observations: None,
            priority: TaskPriority::Normal,
            frequency: TaskFrequency::Diaria,
            store_id: store.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
            due_date: Utc.with_ymd_and_hms(2024, 1, 2, 17, 0, 0).unwrap(),
            status,
            delegable: false,
            extendable: false,
            owner: "1".to_string(),
            delegates: Vec::new(),
            assigned_to: Some("2".to_string()),
            started_by: None,
            started_at: None,
            completed_by: None,
            completed_at: None,
        }
    }

    #[test]
    fn memory_insert_rejects_duplicates() {
        let mut repo = MemoryRepository::default();
        repo.insert(task("t1", "1", TaskStatus::Pendente)).unwrap();
        let err = repo
            .insert(task("t1", "1", TaskStatus::Pendente))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn memory_update_unknown_is_not_found() {
        let mut repo = MemoryRepository::default();
        let err = repo.update(task("t1", "1", TaskStatus::Pendente)).unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(_)));
    }

    #[test]
    fn filter_by_store_and_status() {
        let repo = MemoryRepository::new(vec![
            task("t1", "1", TaskStatus::Pendente),
            task("t2", "1", TaskStatus::Concluida),
            task("t3", "2", TaskStatus::Pendente),
        ]);

        let filter = TaskFilter {
            store_id: Some("1".to_string()),
            status: Some(TaskStatus::Pendente),
            ..TaskFilter::default()
        };
        let found = repo.list(&filter).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "t1");
    }

    #[test]
    fn filter_by_assignee_uses_effective_assignee() {
        let mut unassigned = task("t1", "1", TaskStatus::Pendente);
        unassigned.assigned_to = None;
        let repo = MemoryRepository::new(vec![unassigned]);

        // falls back to owner "1"
        let filter = TaskFilter {
            assigned_to: Some("1".to_string()),
            ..TaskFilter::default()
        };
        assert_eq!(repo.list(&filter).unwrap().len(), 1);
    }

    #[test]
    fn json_repository_round_trips_through_disk() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().to_path_buf());
        storage.init().unwrap();

        let mut repo = JsonRepository::new(storage.clone());
        repo.insert(task("t1", "1", TaskStatus::Pendente)).unwrap();

        let mut updated = repo.get("t1").unwrap().unwrap();
        updated.status = TaskStatus::EmProgresso;
        repo.update(updated).unwrap();

        // fresh handle sees the persisted state
        let fresh = JsonRepository::new(storage);
        let found = fresh.get("t1").unwrap().unwrap();
        assert_eq!(found.status, TaskStatus::EmProgresso);
    }

    #[test]
    fn json_update_unknown_id_is_not_found() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().to_path_buf());
        storage.init().unwrap();

        let mut repo = JsonRepository::new(storage);
        let err = repo.update(task("ghost", "1", TaskStatus::Pendente)).unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(_)));
    }
}
