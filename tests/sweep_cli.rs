mod support;

use predicates::str::contains;
use support::{json_output, show_task, TestWorkspace};

fn new_task_due(ws: &TestWorkspace, title: &str, due: &str) -> String {
    let value = json_output(ws.cmd().args([
        "--actor",
        "1",
        "task",
        "new",
        title,
        "--description",
        "sweep test task",
        "--due",
        due,
        "--json",
    ]));
    value["data"]["ids"][0].as_str().unwrap().to_string()
}

#[test]
fn sweep_marks_overdue_open_tasks() {
    let ws = TestWorkspace::seeded();
    let overdue = new_task_due(&ws, "Entrega atrasada", "2020-01-01");
    let future = new_task_due(&ws, "Entrega futura", "2099-01-01");

    let value = json_output(ws.cmd().args(["task", "sweep", "--json"]));
    assert_eq!(value["data"]["swept"].as_u64(), Some(1));

    assert_eq!(
        show_task(&ws, &overdue)["status"].as_str(),
        Some("atrasada")
    );
    assert_eq!(show_task(&ws, &future)["status"].as_str(), Some("pendente"));
}

#[test]
fn sweep_catches_in_progress_tasks_too() {
    let ws = TestWorkspace::seeded();
    let overdue = new_task_due(&ws, "Comecou tarde", "2020-01-01");

    // assigned_to is unset, so the owner (manager) may start it
    ws.cmd()
        .args(["--actor", "1", "task", "start", &overdue])
        .assert()
        .success();

    json_output(ws.cmd().args(["task", "sweep", "--json"]));
    assert_eq!(
        show_task(&ws, &overdue)["status"].as_str(),
        Some("atrasada")
    );
}

#[test]
fn swept_tasks_are_terminal() {
    let ws = TestWorkspace::seeded();
    let overdue = new_task_due(&ws, "Perdida", "2020-01-01");
    json_output(ws.cmd().args(["task", "sweep", "--json"]));

    ws.cmd()
        .args(["--actor", "1", "task", "start", &overdue])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("atrasada"));
    ws.cmd()
        .args(["--actor", "1", "task", "complete", &overdue, "--confirm"])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn sweep_is_idempotent() {
    let ws = TestWorkspace::seeded();
    new_task_due(&ws, "Uma vez so", "2020-01-01");

    let first = json_output(ws.cmd().args(["task", "sweep", "--json"]));
    assert_eq!(first["data"]["swept"].as_u64(), Some(1));

    let second = json_output(ws.cmd().args(["task", "sweep", "--json"]));
    assert_eq!(second["data"]["swept"].as_u64(), Some(0));
}

#[test]
fn completed_tasks_never_become_overdue() {
    let ws = TestWorkspace::seeded();
    ws.write_config("[lifecycle]\nallow_complete_from_pending = true\n")
        .unwrap();
    let task = new_task_due(&ws, "Feita em cima da hora", "2020-01-01");

    ws.cmd()
        .args(["--actor", "1", "task", "complete", &task, "--confirm"])
        .assert()
        .success();

    let value = json_output(ws.cmd().args(["task", "sweep", "--json"]));
    assert_eq!(value["data"]["swept"].as_u64(), Some(0));
    assert_eq!(show_task(&ws, &task)["status"].as_str(), Some("concluida"));
}

#[test]
fn delayed_tasks_show_up_in_stats() {
    let ws = TestWorkspace::seeded();
    let value = json_output(ws.cmd().args([
        "--actor",
        "1",
        "task",
        "new",
        "Auditoria perdida",
        "--description",
        "sweep test task",
        "--due",
        "2020-01-01",
        "--assign",
        "2",
        "--json",
    ]));
    let _id = value["data"]["ids"][0].as_str().unwrap();
    json_output(ws.cmd().args(["task", "sweep", "--json"]));

    let stats = json_output(ws.cmd().args(["stats", "user", "2", "--json"]));
    assert_eq!(stats["data"]["tasks_delayed"].as_u64(), Some(1));

    let store = json_output(ws.cmd().args(["stats", "store", "1", "--json"]));
    assert_eq!(store["data"]["tasks_delayed"].as_u64(), Some(1));
}
