use assert_cmd::Command;
use tempfile::TempDir;

pub fn mood_cmd() -> Command {
    let mut cmd = Command::cargo_bin("mood").unwrap();
    cmd.env_remove("MOOD_ROOT");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Temp directory with an initialized journal
#[allow(dead_code)]
pub fn init_journal() -> TempDir {
    let temp = TempDir::new().unwrap();
    mood_cmd().arg("init").arg(temp.path()).assert().success();
    temp
}
