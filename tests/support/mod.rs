use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Empty workspace, not yet initialized.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    /// Workspace with `tnm init --seed` already run.
    pub fn seeded() -> Self {
        let ws = Self::new();
        ws.cmd().args(["init", "--seed"]).assert().success();
        ws
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join(".tanamao")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(".tanamao.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// A tnm command rooted in this workspace with a clean environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = tnm_cmd();
        cmd.current_dir(self.dir.path());
        cmd
    }
}

pub fn tnm_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tnm").expect("tnm binary");
    cmd.env_remove("TANAMAO_ACTOR");
    cmd.env_remove("TANAMAO_ROOT");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run a command expected to succeed with --json and parse the envelope.
pub fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("json envelope")
}

/// Create a task as the seeded store manager and return its id.
pub fn new_task(ws: &TestWorkspace, title: &str, args: &[&str]) -> String {
    let mut cmd = ws.cmd();
    cmd.args([
        "--actor",
        "1",
        "task",
        "new",
        title,
        "--description",
        "integration test task",
        "--due",
        "2099-12-31",
        "--json",
    ]);
    cmd.args(args);
    let value = json_output(&mut cmd);
    value["data"]["ids"][0]
        .as_str()
        .expect("task id")
        .to_string()
}

/// Fetch one task's record through `task show --json`.
pub fn show_task(ws: &TestWorkspace, id: &str) -> Value {
    let mut cmd = ws.cmd();
    cmd.args(["task", "show", id, "--json"]);
    let value = json_output(&mut cmd);
    value["data"]["task"].clone()
}
