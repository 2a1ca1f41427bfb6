use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Environment variables the deploy command reads as fallbacks
const INPUT_VARS: &[&str] = &[
    "BUNNYFLOW_WORKSPACE",
    "BUNNYFLOW_DIRECTORY",
    "BUNNYFLOW_BRANCH_CURRENT",
    "BUNNYFLOW_BRANCH_MAIN",
    "BUNNY_API_KEY",
    "BUNNY_DNS_ZONE_ID",
    "BUNNYFLOW_SUBDOMAIN",
    "BUNNYFLOW_DEBUG_LIMIT",
];

/// `bunnyflow` with none of its input variables inherited
#[allow(deprecated)]
pub fn bunnyflow() -> Command {
    let mut cmd = Command::cargo_bin("bunnyflow").unwrap();
    for var in INPUT_VARS {
        cmd.env_remove(var);
    }
    cmd
}

pub struct TestWorkspace {
    pub root: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }
}
