use assert_cmd::Command;
use tempfile::tempdir;

fn keyrace(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("keyrace").unwrap();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

#[test]
fn help_lists_the_race_options() {
    let home = tempdir().unwrap();
    let output = keyrace(home.path()).arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--difficulty", "--word-difficulty", "--text", "--secs", "--leaderboard"] {
        assert!(stdout.contains(flag), "missing {flag} in help");
    }
}

#[test]
fn empty_leaderboard_prints_without_a_tty() {
    let home = tempdir().unwrap();
    let db = home.path().join("progress.db");
    let output = keyrace(home.path())
        .arg("--leaderboard")
        .arg("--db")
        .arg(&db)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No results yet."));
    assert!(db.exists());
}

#[test]
fn clear_leaderboard_succeeds_on_fresh_db() {
    let home = tempdir().unwrap();
    let db = home.path().join("nested").join("progress.db");
    keyrace(home.path())
        .args(["--clear-leaderboard", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout("Leaderboard cleared.\n");
}

#[test]
fn overlong_custom_text_is_rejected() {
    let home = tempdir().unwrap();
    let text = "a".repeat(1001);
    keyrace(home.path())
        .args(["--leaderboard", "-t", &text])
        .assert()
        .failure();
}

#[test]
fn race_requires_a_tty() {
    let home = tempdir().unwrap();
    let db = home.path().join("progress.db");
    keyrace(home.path())
        .arg("--db")
        .arg(&db)
        .write_stdin("")
        .assert()
        .failure();
}
