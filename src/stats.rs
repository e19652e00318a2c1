//! Performance aggregation.
//!
//! Counters are recomputed in full on every query, so a result is exactly
//! as fresh as the task set handed in. Nothing here caches or maintains
//! increments, and an empty denominator is a defined 0%, never NaN.

use serde::Serialize;

use crate::model::{Region, Store, Task, TaskStatus, UserProfile};

/// Per-user summary counters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserStats {
    pub user_id: String,
    pub user_name: String,
    pub user_role: String,
    pub tasks_assigned: usize,
    pub tasks_started: usize,
    pub tasks_completed: usize,
    pub tasks_delayed: usize,
    /// Integer percentage 0-100: completed over assigned.
    pub performance: u8,
}

/// Per-store summary counters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StoreStats {
    pub store_id: String,
    pub store_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_city: Option<String>,
    pub tasks_total: usize,
    pub tasks_completed: usize,
    pub tasks_in_progress: usize,
    pub tasks_pending: usize,
    pub tasks_delayed: usize,
    pub performance: u8,
}

/// Per-region rollup: one row per store plus summed totals.
#[derive(Debug, Clone, Serialize)]
pub struct RegionStats {
    pub region_id: String,
    pub region_name: String,
    pub stores: Vec<StoreStats>,
    pub tasks_total: usize,
    pub tasks_completed: usize,
    pub tasks_in_progress: usize,
    pub tasks_pending: usize,
    pub tasks_delayed: usize,
    pub performance: u8,
}

/// Compute summary counters for one user over the given task set.
///
/// Tasks without an assignee never count toward a user. When the profile
/// carries a store, counts are additionally scoped to that store.
pub fn user_stats(user: &UserProfile, tasks: &[Task]) -> UserStats {
    let mine: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.assigned_to.as_deref() == Some(user.id.as_str()))
        .filter(|task| match user.store_id.as_deref() {
            Some(store_id) => task.store_id == store_id,
            None => true,
        })
        .collect();

    let tasks_assigned = mine.len();
    let tasks_started = count_status(&mine, TaskStatus::EmProgresso);
    let tasks_completed = count_status(&mine, TaskStatus::Concluida);
    let tasks_delayed = count_status(&mine, TaskStatus::Atrasada);

    UserStats {
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        user_role: user.role.to_string(),
        tasks_assigned,
        tasks_started,
        tasks_completed,
        tasks_delayed,
        performance: percentage(tasks_completed, tasks_assigned),
    }
}

/// Compute summary counters for one store over the given task set.
pub fn store_stats(store: &Store, tasks: &[Task]) -> StoreStats {
    let in_store: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.store_id == store.id)
        .collect();

    let tasks_total = in_store.len();
    let tasks_completed = count_status(&in_store, TaskStatus::Concluida);
    let tasks_in_progress = count_status(&in_store, TaskStatus::EmProgresso);
    let tasks_pending = count_status(&in_store, TaskStatus::Pendente);
    let tasks_delayed = count_status(&in_store, TaskStatus::Atrasada);

    StoreStats {
        store_id: store.id.clone(),
        store_name: store.name.clone(),
        store_city: Some(store.city.clone()),
        tasks_total,
        tasks_completed,
        tasks_in_progress,
        tasks_pending,
        tasks_delayed,
        performance: percentage(tasks_completed, tasks_total),
    }
}

/// Compute per-store rows and a summed rollup for one region.
pub fn region_stats(region: &Region, stores: &[&Store], tasks: &[Task]) -> RegionStats {
    let mut rows: Vec<StoreStats> = stores
        .iter()
        .filter(|store| store.region_id == region.id)
        .map(|store| store_stats(store, tasks))
        .collect();
    rows.sort_by(|a, b| a.store_id.cmp(&b.store_id));

    let tasks_total = rows.iter().map(|row| row.tasks_total).sum();
    let tasks_completed = rows.iter().map(|row| row.tasks_completed).sum();
    let tasks_in_progress = rows.iter().map(|row| row.tasks_in_progress).sum();
    let tasks_pending = rows.iter().map(|row| row.tasks_pending).sum();
    let tasks_delayed = rows.iter().map(|row| row.tasks_delayed).sum();

    RegionStats {
        region_id: region.id.clone(),
        region_name: region.name.clone(),
        stores: rows,
        tasks_total,
        tasks_completed,
        tasks_in_progress,
        tasks_pending,
        tasks_delayed,
        performance: percentage(tasks_completed, tasks_total),
    }
}

fn count_status(tasks: &[&Task], status: TaskStatus) -> usize {
    tasks.iter().filter(|task| task.status == status).count()
}

fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u8
}
