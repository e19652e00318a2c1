//! Task lifecycle rules.
//!
//! Every status transition in the system goes through this module. The
//! rules are pure: they take a task, the acting user, and an explicit
//! timestamp, and either return the updated task or a typed rejection.
//! Persistence is the caller's job; an operation whose precondition fails
//! leaves the task untouched.
//!
//! Normal flow is one-directional:
//!
//! ```text
//! pendente --start--> em_progresso --complete--> concluida
//! pendente --delegate--> pendente          (assignee changes, status doesn't)
//! pendente | em_progresso --sweep--> atrasada   (due date elapsed)
//! ```
//!
//! `concluida` and `atrasada` are terminal.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::LifecycleConfig;
use crate::error::{Error, Result};
use crate::model::{Role, Task, TaskStatus, UserProfile};

/// Opaque proof that the boundary performed its completion check (the
/// stores simulate a biometric read). The rules only care that one was
/// issued, never how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationToken(String);

impl ConfirmationToken {
    /// Mint a token after an out-of-band confirmation succeeded.
    pub fn issue() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Lifecycle rule set, parameterized by the site's config toggles.
#[derive(Debug, Clone, Default)]
pub struct LifecycleRules {
    config: LifecycleConfig,
}

impl LifecycleRules {
    pub fn new(config: LifecycleConfig) -> Self {
        Self { config }
    }

    /// True iff `actor` may start `task` right now. Pure predicate.
    pub fn can_start(&self, task: &Task, actor: &UserProfile) -> bool {
        task.status == TaskStatus::Pendente && is_executor(task, &actor.id)
    }

    /// Transition `pendente -> em_progresso`, stamping who and when.
    /// `started_by`/`started_at` are set exactly once and never cleared.
    pub fn start(&self, task: &Task, actor: &UserProfile, now: DateTime<Utc>) -> Result<Task> {
        if task.status != TaskStatus::Pendente {
            return Err(Error::InvalidTransition {
                task: task.id.clone(),
                actual: task.status,
                action: "start".to_string(),
            });
        }
        if !is_executor(task, &actor.id) {
            return Err(Error::Unauthorized {
                actor: actor.id.clone(),
                action: "start".to_string(),
                task: task.id.clone(),
            });
        }

        let mut updated = task.clone();
        updated.status = TaskStatus::EmProgresso;
        updated.started_by = Some(actor.id.clone());
        updated.started_at = Some(now);
        Ok(updated)
    }

    /// True iff `actor` may complete `task` right now. Pure predicate.
    pub fn can_complete(&self, task: &Task, actor: &UserProfile) -> bool {
        match task.status {
            TaskStatus::EmProgresso => {
                actor.id == task.effective_assignee()
                    || task.started_by.as_deref() == Some(actor.id.as_str())
            }
            TaskStatus::Pendente => {
                self.config.allow_complete_from_pending && is_executor(task, &actor.id)
            }
            _ => false,
        }
    }

    /// Transition to `concluida`, stamping who and when.
    ///
    /// The boundary must hand over the confirmation token it obtained
    /// (unless the site config waives it). With
    /// `allow_complete_from_pending` a task may skip `em_progresso`; the
    /// started fields then stay unset, recording the skip honestly.
    pub fn complete(
        &self,
        task: &Task,
        actor: &UserProfile,
        confirmation: Option<&ConfirmationToken>,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        match task.status {
            TaskStatus::EmProgresso => {}
            TaskStatus::Pendente if self.config.allow_complete_from_pending => {}
            _ => {
                return Err(Error::InvalidTransition {
                    task: task.id.clone(),
                    actual: task.status,
                    action: "complete".to_string(),
                });
            }
        }
        if !self.can_complete(task, actor) {
            return Err(Error::Unauthorized {
                actor: actor.id.clone(),
                action: "complete".to_string(),
                task: task.id.clone(),
            });
        }
        if self.config.require_confirmation && confirmation.is_none() {
            return Err(Error::ConfirmationRequired(task.id.clone()));
        }

        let mut updated = task.clone();
        updated.status = TaskStatus::Concluida;
        updated.completed_by = Some(actor.id.clone());
        updated.completed_at = Some(now);
        Ok(updated)
    }

    /// True iff `actor` may delegate `task`. Pure predicate.
    pub fn can_delegate(&self, task: &Task, actor: &UserProfile) -> bool {
        task.delegable && actor.role == Role::Gerente && task.status == TaskStatus::Pendente
    }

    /// Reassign a pending, delegable task. Only `assigned_to` changes;
    /// status and every timestamp stay as they were. The task's
    /// `delegates` list is a suggestion, not a restriction.
    pub fn delegate(&self, task: &Task, actor: &UserProfile, new_assignee: &str) -> Result<Task> {
        if !task.delegable {
            return Err(Error::NotDelegable(task.id.clone()));
        }
        if actor.role != Role::Gerente {
            return Err(Error::Unauthorized {
                actor: actor.id.clone(),
                action: "delegate".to_string(),
                task: task.id.clone(),
            });
        }
        if task.status != TaskStatus::Pendente {
            return Err(Error::InvalidTransition {
                task: task.id.clone(),
                actual: task.status,
                action: "delegate".to_string(),
            });
        }
        let new_assignee = new_assignee.trim();
        if new_assignee.is_empty() {
            return Err(Error::InvalidArgument(
                "assignee id cannot be empty".to_string(),
            ));
        }

        let mut updated = task.clone();
        updated.assigned_to = Some(new_assignee.to_string());
        Ok(updated)
    }

    /// True iff `actor` may push the due date of `task`. Pure predicate.
    pub fn can_extend(&self, task: &Task, actor: &UserProfile) -> bool {
        task.extendable && actor.role == Role::Gerente && !task.status.is_terminal()
    }

    /// Push the due date of an extendable task. Only `due_date` changes.
    pub fn extend(
        &self,
        task: &Task,
        actor: &UserProfile,
        new_due: DateTime<Utc>,
    ) -> Result<Task> {
        if !task.extendable {
            return Err(Error::NotExtendable(task.id.clone()));
        }
        if actor.role != Role::Gerente {
            return Err(Error::Unauthorized {
                actor: actor.id.clone(),
                action: "extend".to_string(),
                task: task.id.clone(),
            });
        }
        if task.status.is_terminal() {
            return Err(Error::InvalidTransition {
                task: task.id.clone(),
                actual: task.status,
                action: "extend".to_string(),
            });
        }
        if new_due <= task.due_date {
            return Err(Error::InvalidArgument(format!(
                "new due date must be after {}",
                task.due_date
            )));
        }

        let mut updated = task.clone();
        updated.due_date = new_due;
        Ok(updated)
    }
}

/// Whether a task has slipped past its deadline without being finished.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    matches!(
        task.status,
        TaskStatus::Pendente | TaskStatus::EmProgresso
    ) && task.due_date < now
}

/// Mark every overdue task `atrasada`, in place. Returns how many changed.
///
/// There is no background scheduler; callers run this pass explicitly
/// (`tnm task sweep`) before reading status-sensitive views.
pub fn sweep_overdue(tasks: &mut [Task], now: DateTime<Utc>) -> usize {
    let mut changed = 0;
    for task in tasks.iter_mut() {
        if is_overdue(task, now) {
            task.status = TaskStatus::Atrasada;
            changed += 1;
        }
    }
    changed
}

fn is_executor(task: &Task, actor_id: &str) -> bool {
    task.assigned_to.as_deref() == Some(actor_id) || task.owner == actor_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskFrequency, TaskPriority};
    use chrono::TimeZone;

    fn user(id: &str, role: Role) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            name: format!("User {id}"),
            role,
            store_id: Some("1".to_string()),
            region_id: None,
            position: None,
        }
    }

    fn pending_task() -> Task {
        Task {
            id: "t1".to_string(),
            title: "Recebimento de Mercadorias".to_string(),
            description: "Receber e conferir mercadorias.".to_string(),
            observations: None,
            priority: TaskPriority::UrgentImportant,
            frequency: TaskFrequency::Diaria,
            store_id: "1".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
            due_date: Utc.with_ymd_and_hms(2024, 1, 2, 17, 0, 0).unwrap(),
            status: TaskStatus::Pendente,
            delegable: true,
            extendable: true,
            owner: "u1".to_string(),
            delegates: vec!["u2".to_string(), "u3".to_string()],
            assigned_to: Some("u2".to_string()),
            started_by: None,
            started_at: None,
            completed_by: None,
            completed_at: None,
        }
    }

    fn rules() -> LifecycleRules {
        LifecycleRules::new(LifecycleConfig::default())
    }

    #[test]
    fn assignee_starts_pending_task() {
        let task = pending_task();
        let actor = user("u2", Role::Colaborador);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        assert!(rules().can_start(&task, &actor));
        let updated = rules().start(&task, &actor, now).unwrap();
        assert_eq!(updated.status, TaskStatus::EmProgresso);
        assert_eq!(updated.started_by.as_deref(), Some("u2"));
        assert_eq!(updated.started_at, Some(now));
        // source task untouched
        assert_eq!(task.status, TaskStatus::Pendente);
    }

    #[test]
    fn owner_may_start_even_when_assigned_elsewhere() {
        let task = pending_task();
        let actor = user("u1", Role::Gerente);
        assert!(rules().can_start(&task, &actor));
    }

    #[test]
    fn bystander_cannot_start() {
        let task = pending_task();
        let actor = user("u3", Role::Colaborador);
        assert!(!rules().can_start(&task, &actor));
        let err = rules()
            .start(&task, &actor, Utc::now())
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
    }

    #[test]
    fn start_rejected_when_not_pending() {
        let actor = user("u2", Role::Colaborador);
        let now = Utc::now();
        let started = rules().start(&pending_task(), &actor, now).unwrap();
        let err = rules().start(&started, &actor, now).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }

    #[test]
    fn start_then_complete_orders_timestamps() {
        let actor = user("u2", Role::Colaborador);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 11, 30, 0).unwrap();

        let started = rules().start(&pending_task(), &actor, t0).unwrap();
        let token = ConfirmationToken::issue();
        let done = rules()
            .complete(&started, &actor, Some(&token), t1)
            .unwrap();

        assert_eq!(done.status, TaskStatus::Concluida);
        assert_eq!(done.completed_by.as_deref(), Some("u2"));
        assert!(done.started_at.unwrap() <= done.completed_at.unwrap());
    }

    #[test]
    fn starter_may_complete_after_reassignment() {
        let starter = user("u2", Role::Colaborador);
        let started = rules()
            .start(&pending_task(), &starter, Utc::now())
            .unwrap();

        // Someone reassigned the task meanwhile; the starter can still close it.
        let mut reassigned = started.clone();
        reassigned.assigned_to = Some("u5".to_string());

        assert!(rules().can_complete(&reassigned, &starter));
    }

    #[test]
    fn complete_requires_confirmation_token() {
        let actor = user("u2", Role::Colaborador);
        let started = rules()
            .start(&pending_task(), &actor, Utc::now())
            .unwrap();
        let err = rules()
            .complete(&started, &actor, None, Utc::now())
            .unwrap_err();
        assert!(matches!(err, Error::ConfirmationRequired(_)));
    }

    #[test]
    fn confirmation_waived_by_config() {
        let rules = LifecycleRules::new(LifecycleConfig {
            allow_complete_from_pending: false,
            require_confirmation: false,
        });
        let actor = user("u2", Role::Colaborador);
        let started = rules.start(&pending_task(), &actor, Utc::now()).unwrap();
        let done = rules.complete(&started, &actor, None, Utc::now()).unwrap();
        assert_eq!(done.status, TaskStatus::Concluida);
    }

    #[test]
    fn complete_from_pending_rejected_by_default() {
        let actor = user("u2", Role::Colaborador);
        let token = ConfirmationToken::issue();
        let err = rules()
            .complete(&pending_task(), &actor, Some(&token), Utc::now())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }

    #[test]
    fn complete_from_pending_opt_in_leaves_started_unset() {
        let rules = LifecycleRules::new(LifecycleConfig {
            allow_complete_from_pending: true,
            require_confirmation: true,
        });
        let actor = user("u2", Role::Colaborador);
        let token = ConfirmationToken::issue();
        let done = rules
            .complete(&pending_task(), &actor, Some(&token), Utc::now())
            .unwrap();
        assert_eq!(done.status, TaskStatus::Concluida);
        assert!(done.started_by.is_none());
        assert!(done.started_at.is_none());
    }

    #[test]
    fn manager_delegates_pending_task() {
        let task = pending_task();
        let manager = user("u1", Role::Gerente);
        assert!(rules().can_delegate(&task, &manager));

        let updated = rules().delegate(&task, &manager, "u4").unwrap();
        assert_eq!(updated.assigned_to.as_deref(), Some("u4"));
        assert_eq!(updated.status, TaskStatus::Pendente);
        assert_eq!(updated.started_at, None);
        assert_eq!(updated.completed_at, None);
    }

    #[test]
    fn delegation_is_manager_only() {
        let task = pending_task();
        let staff = user("u2", Role::Colaborador);
        let err = rules().delegate(&task, &staff, "u4").unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
    }

    #[test]
    fn non_delegable_task_rejects_delegation() {
        let mut task = pending_task();
        task.delegable = false;
        let manager = user("u1", Role::Gerente);
        let err = rules().delegate(&task, &manager, "u4").unwrap_err();
        assert!(matches!(err, Error::NotDelegable(_)));
    }

    #[test]
    fn delegation_rejected_once_started() {
        let manager = user("u1", Role::Gerente);
        let actor = user("u2", Role::Colaborador);
        let started = rules()
            .start(&pending_task(), &actor, Utc::now())
            .unwrap();
        let err = rules().delegate(&started, &manager, "u4").unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
    }

    #[test]
    fn delegate_outside_suggestion_list_is_allowed() {
        let task = pending_task();
        let manager = user("u1", Role::Gerente);
        // "u9" is not in task.delegates; the list is advisory.
        let updated = rules().delegate(&task, &manager, "u9").unwrap();
        assert_eq!(updated.assigned_to.as_deref(), Some("u9"));
    }

    #[test]
    fn extend_pushes_due_date_forward_only() {
        let task = pending_task();
        let manager = user("u1", Role::Gerente);
        let later = Utc.with_ymd_and_hms(2024, 1, 5, 17, 0, 0).unwrap();

        let updated = rules().extend(&task, &manager, later).unwrap();
        assert_eq!(updated.due_date, later);
        assert_eq!(updated.status, task.status);

        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap();
        let err = rules().extend(&task, &manager, earlier).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn non_extendable_task_keeps_its_deadline() {
        let mut task = pending_task();
        task.extendable = false;
        let manager = user("u1", Role::Gerente);
        let later = Utc.with_ymd_and_hms(2024, 1, 5, 17, 0, 0).unwrap();
        let err = rules().extend(&task, &manager, later).unwrap_err();
        assert!(matches!(err, Error::NotExtendable(_)));
    }

    #[test]
    fn predicates_have_no_side_effects() {
        let task = pending_task();
        let actor = user("u2", Role::Colaborador);
        let snapshot = task.clone();
        for _ in 0..3 {
            let _ = rules().can_start(&task, &actor);
            let _ = rules().can_complete(&task, &actor);
            let _ = rules().can_delegate(&task, &actor);
            let _ = rules().can_extend(&task, &actor);
        }
        assert_eq!(task, snapshot);
    }

    #[test]
    fn sweep_marks_elapsed_open_tasks() {
        let actor = user("u2", Role::Colaborador);
        let mut tasks = vec![pending_task(), pending_task(), pending_task()];
        tasks[1] = rules().start(&tasks[1], &actor, Utc::now()).unwrap();
        tasks[2].status = TaskStatus::Concluida;

        let after_due = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let changed = sweep_overdue(&mut tasks, after_due);

        assert_eq!(changed, 2);
        assert_eq!(tasks[0].status, TaskStatus::Atrasada);
        assert_eq!(tasks[1].status, TaskStatus::Atrasada);
        assert_eq!(tasks[2].status, TaskStatus::Concluida);
    }

    #[test]
    fn sweep_leaves_future_deadlines_alone() {
        let mut tasks = vec![pending_task()];
        let before_due = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(sweep_overdue(&mut tasks, before_due), 0);
        assert_eq!(tasks[0].status, TaskStatus::Pendente);
    }

    #[test]
    fn terminal_states_reject_everything() {
        let manager = user("u1", Role::Gerente);
        let actor = user("u2", Role::Colaborador);
        let token = ConfirmationToken::issue();

        for status in [TaskStatus::Concluida, TaskStatus::Atrasada] {
            let mut task = pending_task();
            task.status = status;
            assert!(rules().start(&task, &actor, Utc::now()).is_err());
            assert!(rules()
                .complete(&task, &actor, Some(&token), Utc::now())
                .is_err());
            assert!(rules().delegate(&task, &manager, "u4").is_err());
        }
    }
}
