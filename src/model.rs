//! Core data model: users, stores, regions, and tasks.
//!
//! Wire spellings follow the chain's existing vocabulary (Portuguese status
//! and role names), so exported JSON stays compatible with the dashboards
//! that consume it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roles a user can hold. Closed set; every capability check in the
/// lifecycle rules dispatches on this enum rather than on raw strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Store manager: assigns, delegates, and extends tasks in one store.
    Gerente,
    /// Store staff: executes tasks assigned to them.
    Colaborador,
    /// Regional supervisor: reads store performance across a region.
    Supervisor,
    /// Head-office administrator: fans tasks out to many stores.
    MatrizAdm,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Gerente => "gerente",
            Role::Colaborador => "colaborador",
            Role::Supervisor => "supervisor",
            Role::MatrizAdm => "matriz_adm",
        };
        f.write_str(name)
    }
}

/// Task lifecycle status.
///
/// `Concluida` and `Atrasada` are terminal: no operation leaves them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pendente,
    EmProgresso,
    Concluida,
    Atrasada,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Concluida | TaskStatus::Atrasada)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskStatus::Pendente => "pendente",
            TaskStatus::EmProgresso => "em_progresso",
            TaskStatus::Concluida => "concluida",
            TaskStatus::Atrasada => "atrasada",
        };
        f.write_str(name)
    }
}

/// Eisenhower-matrix priority. Drives display order only; there is no
/// scheduling automation behind it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    UrgentImportant,
    Urgent,
    Important,
    Normal,
}

impl TaskPriority {
    /// Receipt sort rank: urgent+important first, normal last.
    pub fn rank(self) -> usize {
        match self {
            TaskPriority::UrgentImportant => 0,
            TaskPriority::Urgent => 1,
            TaskPriority::Important => 2,
            TaskPriority::Normal => 3,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskPriority::UrgentImportant => "urgent_important",
            TaskPriority::Urgent => "urgent",
            TaskPriority::Important => "important",
            TaskPriority::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// How often a task recurs on the store calendar. Informational: completing
/// a task never creates the next occurrence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskFrequency {
    Diaria,
    Semanal,
    Quinzenal,
    Mensal,
    Bimestral,
    Trimestral,
    Semestral,
    Anual,
    Pontual,
}

impl fmt::Display for TaskFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskFrequency::Diaria => "diaria",
            TaskFrequency::Semanal => "semanal",
            TaskFrequency::Quinzenal => "quinzenal",
            TaskFrequency::Mensal => "mensal",
            TaskFrequency::Bimestral => "bimestral",
            TaskFrequency::Trimestral => "trimestral",
            TaskFrequency::Semestral => "semestral",
            TaskFrequency::Anual => "anual",
            TaskFrequency::Pontual => "pontual",
        };
        f.write_str(name)
    }
}

/// A member of the user directory. Immutable once created; directory
/// membership is the only lifecycle a profile has.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Store affiliation; required for gerente and colaborador.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    /// Region affiliation; supervisors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    /// Free-text job title; colaborador only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// A physical retail location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub region_id: String,
}

/// A grouping of stores under one supervisor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    pub name: String,
}

/// A unit of work in one store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Free-form instructions shown alongside the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    pub priority: TaskPriority,
    pub frequency: TaskFrequency,
    pub store_id: String,
    pub created_at: DateTime<Utc>,
    /// Deadline. Mutable only when `extendable`.
    pub due_date: DateTime<Utc>,
    pub status: TaskStatus,
    /// Whether ownership may be reassigned.
    pub delegable: bool,
    /// Whether the due date may be pushed.
    pub extendable: bool,
    /// User accountable for the task by default.
    pub owner: String,
    /// Candidate assignees suggested for delegation. Advisory only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delegates: Vec<String>,
    /// Currently responsible executor; falls back to `owner` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// The user responsible for executing the task right now.
    pub fn effective_assignee(&self) -> &str {
        self.assigned_to.as_deref().unwrap_or(&self.owner)
    }
}

/// Sort tasks the way the printed store receipt orders them: priority
/// rank, then due date, then id for a stable tie-break.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| {
        left.priority
            .rank()
            .cmp(&right.priority.rank())
            .then_with(|| left.due_date.cmp(&right.due_date))
            .then_with(|| left.id.cmp(&right.id))
    });
}
