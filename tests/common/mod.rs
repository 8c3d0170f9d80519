use std::path::{Path, PathBuf};

use assert_cmd::Command;
use recruit_config::{Config, ConfigManager};
use tempfile::TempDir;

pub const BIN: &str = "recruit_wizard_cli";

/// Isolated app home with exports kept inside the temp dir.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let manager =
            ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("config manager");
        let config = Config {
            export_dir: Some(dir.path().join("exports")),
            ..Config::default()
        };
        manager.save(&config).expect("save config");
        Self { dir }
    }

    pub fn home(&self) -> &Path {
        self.dir.path()
    }

    pub fn exports(&self, extension: &str) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(self.home().join("exports"))
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|entry| entry.path())
                    .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
                    .collect()
            })
            .unwrap_or_default();
        files.sort();
        files
    }

    /// Script-mode command fed `lines` on stdin.
    pub fn script(&self, lines: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin(BIN).expect("binary built");
        cmd.env("RECRUIT_WIZARD_HOME", self.home())
            .env("RECRUIT_WIZARD_CLI_SCRIPT", "1")
            .env_remove("RECRUIT_TEST_TEXT_INPUTS")
            .env("NO_COLOR", "1")
            .write_stdin(format!("{}\n", lines.join("\n")));
        cmd
    }
}
