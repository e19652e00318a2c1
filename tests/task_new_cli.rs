mod support;

use predicates::str::contains;
use support::{json_output, show_task, TestWorkspace};

#[test]
fn manager_creates_in_own_store_by_default() {
    let ws = TestWorkspace::seeded();

    let value = json_output(ws.cmd().args([
        "--actor",
        "1",
        "task",
        "new",
        "Troca de etiquetas",
        "--description",
        "Atualizar etiquetas da gondola principal.",
        "--due",
        "2099-01-15",
        "--priority",
        "urgent",
        "--frequency",
        "semanal",
        "--delegable",
        "--assign",
        "3",
        "--delegate",
        "4",
        "--delegate",
        "5",
        "--json",
    ]));

    let ids = value["data"]["ids"].as_array().unwrap();
    assert_eq!(ids.len(), 1);
    let id = ids[0].as_str().unwrap();
    assert!(id.starts_with("task-"));

    let task = show_task(&ws, id);
    assert_eq!(task["store_id"].as_str(), Some("1"));
    assert_eq!(task["status"].as_str(), Some("pendente"));
    assert_eq!(task["priority"].as_str(), Some("urgent"));
    assert_eq!(task["frequency"].as_str(), Some("semanal"));
    assert_eq!(task["assigned_to"].as_str(), Some("3"));
    // owner defaults to the store manager
    assert_eq!(task["owner"].as_str(), Some("1"));
    assert_eq!(task["delegates"].as_array().unwrap().len(), 2);
}

#[test]
fn manager_cannot_create_in_another_store() {
    let ws = TestWorkspace::seeded();
    ws.cmd()
        .args([
            "--actor",
            "1",
            "task",
            "new",
            "Intruso",
            "--description",
            "x",
            "--due",
            "2099-01-15",
            "--store",
            "2",
        ])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("not allowed"));
}

#[test]
fn staff_cannot_create_tasks() {
    let ws = TestWorkspace::seeded();
    ws.cmd()
        .args([
            "--actor",
            "2",
            "task",
            "new",
            "Tentativa",
            "--description",
            "x",
            "--due",
            "2099-01-15",
        ])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn supervisor_fans_out_across_own_region() {
    let ws = TestWorkspace::seeded();

    let value = json_output(ws.cmd().args([
        "--actor",
        "8",
        "task",
        "new",
        "Campanha de vacinacao",
        "--description",
        "Montar o balcao da campanha regional.",
        "--due",
        "2099-03-01",
        "--region",
        "1",
        "--json",
    ]));

    let stores = value["data"]["stores"].as_array().unwrap();
    let ids = value["data"]["ids"].as_array().unwrap();
    assert_eq!(stores.len(), ids.len());
    assert!(stores.len() >= 5);

    // one task landed in each region-1 store, none elsewhere
    let region_stores = json_output(ws.cmd().args(["store", "list", "--region", "1", "--json"]));
    assert_eq!(
        stores.len() as u64,
        region_stores["data"]["total"].as_u64().unwrap()
    );
}

#[test]
fn supervisor_cannot_fan_out_into_another_region() {
    let ws = TestWorkspace::seeded();
    ws.cmd()
        .args([
            "--actor",
            "8",
            "task",
            "new",
            "Fora de alcance",
            "--description",
            "x",
            "--due",
            "2099-03-01",
            "--region",
            "2",
        ])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn admin_fans_out_to_every_store() {
    let ws = TestWorkspace::seeded();

    let value = json_output(ws.cmd().args([
        "--actor",
        "9",
        "task",
        "new",
        "Inventario nacional",
        "--description",
        "Contagem geral de estoque da rede.",
        "--due",
        "2099-02-01",
        "--all-stores",
        "--json",
    ]));

    let ids = value["data"]["ids"].as_array().unwrap();
    assert_eq!(ids.len(), 30);

    // ids are unique
    let mut seen: Vec<&str> = ids.iter().map(|id| id.as_str().unwrap()).collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 30);

    // every store now holds exactly one pending copy
    let store_7 = json_output(ws.cmd().args(["task", "list", "--store", "7", "--json"]));
    assert_eq!(store_7["data"]["total"].as_u64(), Some(1));
}

#[test]
fn only_admin_may_target_the_whole_chain() {
    let ws = TestWorkspace::seeded();
    ws.cmd()
        .args([
            "--actor",
            "8",
            "task",
            "new",
            "Ambicioso",
            "--description",
            "x",
            "--due",
            "2099-02-01",
            "--all-stores",
        ])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn creation_validates_references_and_arguments() {
    let ws = TestWorkspace::seeded();

    ws.cmd()
        .args([
            "--actor", "1", "task", "new", "X", "--description", "y", "--due", "amanha",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("invalid due date"));

    ws.cmd()
        .args([
            "--actor",
            "1",
            "task",
            "new",
            "X",
            "--description",
            "y",
            "--due",
            "2099-01-01",
            "--assign",
            "999",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("User not found"));

    ws.cmd()
        .args([
            "--actor",
            "1",
            "task",
            "new",
            "X",
            "--description",
            "y",
            "--due",
            "2099-01-01",
            "--priority",
            "maxima",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("unknown priority"));

    ws.cmd()
        .args([
            "--actor", "1", "task", "new", "   ", "--description", "y", "--due", "2099-01-01",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("title cannot be empty"));
}

#[test]
fn admin_single_store_creation_defaults_owner_to_that_stores_manager() {
    let ws = TestWorkspace::seeded();

    let value = json_output(ws.cmd().args([
        "--actor",
        "9",
        "task",
        "new",
        "Auditoria pontual",
        "--description",
        "Conferir caixa da filial.",
        "--due",
        "2099-04-01",
        "--store",
        "1",
        "--json",
    ]));
    let id = value["data"]["ids"][0].as_str().unwrap();

    let task = show_task(&ws, id);
    // store 1 has a manager (user 1), so ownership lands there
    assert_eq!(task["owner"].as_str(), Some("1"));

    // a store with no manager falls back to the creator
    let value = json_output(ws.cmd().args([
        "--actor",
        "9",
        "task",
        "new",
        "Auditoria pontual",
        "--description",
        "Conferir caixa da filial.",
        "--due",
        "2099-04-01",
        "--store",
        "2",
        "--json",
    ]));
    let id = value["data"]["ids"][0].as_str().unwrap();
    let task = show_task(&ws, id);
    assert_eq!(task["owner"].as_str(), Some("9"));
}
