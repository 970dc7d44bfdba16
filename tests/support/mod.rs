use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated data directory for one test, plus a command builder pointed at it.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write test file");
        path
    }

    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("read test file")
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    pub fn write_users(&self, lines: &[&str]) -> PathBuf {
        let mut contents = lines.join("\n");
        contents.push('\n');
        self.write_file("user.txt", &contents)
    }

    pub fn write_tasks(&self, lines: &[&str]) -> PathBuf {
        let mut contents = lines.join("\n");
        contents.push('\n');
        self.write_file("tasks.txt", &contents)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskman").expect("binary");
        cmd.arg("--data-dir").arg(self.path());
        cmd.env_remove("TASKMAN_DATA_DIR");
        cmd.env_remove("RUST_LOG");
        cmd
    }
}
