#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use taskmate::task::Task;
use tempfile::TempDir;

/// Isolated config file and data directory for one test.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config").join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir().join("tasks.json")
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.config_path();
        fs::create_dir_all(path.parent().expect("config parent")).expect("config dir");
        fs::write(&path, contents).expect("write config");
        path
    }

    pub fn write_store(&self, contents: &str) {
        fs::create_dir_all(self.data_dir()).expect("data dir");
        fs::write(self.store_path(), contents).expect("write store");
    }

    pub fn read_store(&self) -> Option<String> {
        fs::read_to_string(self.store_path()).ok()
    }

    pub fn tasks(&self) -> Vec<Task> {
        match self.read_store() {
            Some(raw) => serde_json::from_str(&raw).expect("valid task blob"),
            None => Vec::new(),
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskmate").expect("binary");
        cmd.env("TASKMATE_CONFIG", self.config_path())
            .env("TASKMATE_DATA_DIR", self.data_dir())
            .env_remove("RUST_LOG")
            .current_dir(self.path());
        cmd
    }

    /// Run a command with `--json` and return the parsed envelope.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json envelope")
    }

    /// `taskmate say <text> --json`, returning the reply data.
    pub fn say(&self, text: &str) -> Value {
        let mut args = vec!["say", "--yes", "--verbosity", "rich", "--json", "--"];
        args.extend(text.split_whitespace());
        let output = self
            .cmd()
            .args(&args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("say json");
        value["data"].clone()
    }
}
