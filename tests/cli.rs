//! CLI tests for kodegen_bundler_nw.
//!
//! Run the real binary and check exit codes, output and the files left
//! on disk.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command for the bundler binary, isolated from the caller's environment.
fn bundler_cmd(cwd: &std::path::Path) -> Command {
    let mut cmd = cargo_bin_cmd!("kodegen_bundler_nw");
    cmd.current_dir(cwd)
        .env_remove("NW_BUNDLER_RUNTIME")
        .env_remove("NW_BUNDLER_TMP")
        .env_remove("NW_BUNDLER_TOOLS");
    cmd
}

/// Project + runtime layout under a temp dir.
fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::create_dir_all(root.join("app")).unwrap();
    std::fs::write(root.join("app/package.json"), r#"{"name":"demo","main":"index.html"}"#)
        .unwrap();
    std::fs::write(root.join("app/index.html"), "<html></html>").unwrap();
    std::fs::create_dir_all(root.join("tools/nw")).unwrap();
    std::fs::write(root.join("tools/nw/nw.exe"), vec![7u8; 1000]).unwrap();
    std::fs::write(root.join("tools/nw/credits.html"), "credits").unwrap();
    std::fs::write(root.join("tools/nw/nw.pak"), "pak").unwrap();
    std::fs::create_dir_all(root.join("tmp")).unwrap();
    temp
}

// =============================================================================
// Informational flags
// =============================================================================

#[test]
fn help_lists_flags() {
    let temp = TempDir::new().unwrap();
    bundler_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--src"))
        .stdout(predicate::str::contains("--pdf"));
}

#[test]
fn targets_lists_win64() {
    let temp = TempDir::new().unwrap();
    bundler_cmd(temp.path())
        .arg("--targets")
        .assert()
        .success()
        .stdout(predicate::str::contains("win64"));
}

#[test]
fn version_reports_required_tool_versions() {
    let temp = TempDir::new().unwrap();
    bundler_cmd(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains("nw.js version 1.2.0"))
        .stdout(predicate::str::contains("Anolis Resourcer version 0.9.0"));
}

#[test]
fn unknown_target_is_rejected() {
    let temp = TempDir::new().unwrap();
    bundler_cmd(temp.path())
        .args(["--target", "osx64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("osx64"));
}

// =============================================================================
// Packaging
// =============================================================================

#[test]
fn missing_manifest_exits_2_without_output() {
    let temp = project();
    std::fs::remove_file(temp.path().join("app/package.json")).unwrap();

    bundler_cmd(temp.path())
        .args(["--src", "app", "--out", "release", "--tools", "tools", "--tmp", "tmp"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("package.json"));

    assert!(!temp.path().join("release").exists());
    assert_eq!(std::fs::read_dir(temp.path().join("tmp")).unwrap().count(), 0);
}

#[test]
fn missing_runtime_exits_2_and_cleans_temp() {
    let temp = project();

    bundler_cmd(temp.path())
        .args(["--src", "app", "--out", "release", "--tmp", "tmp"])
        .args(["--nw", "no-such-runtime"])
        .assert()
        .code(2);

    assert!(!temp.path().join("release").exists());
    assert_eq!(std::fs::read_dir(temp.path().join("tmp")).unwrap().count(), 0);
}

#[test]
fn packages_project_and_warns_about_missing_icon() {
    let temp = project();

    bundler_cmd(temp.path())
        .args(["--src", "app", "--out", "release", "--tools", "tools", "--tmp", "tmp"])
        .args(["--name", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Output executable:"))
        .stdout(predicate::str::contains("SHA-256:"))
        .stderr(predicate::str::contains("icon not embedded"));

    let release = temp.path().join("release");
    let exe = std::fs::read(release.join("demo.exe")).unwrap();
    assert!(exe.len() > 1000);
    assert_eq!(&exe[..1000], vec![7u8; 1000].as_slice());
    assert!(release.join("nw.pak").exists());
    assert!(!release.join("nw.exe").exists());
    assert!(!release.join("credits.html").exists());
    assert_eq!(std::fs::read_dir(temp.path().join("tmp")).unwrap().count(), 0);
}

#[test]
fn clean_rebuild_into_project_root_is_refused() {
    let temp = project();

    bundler_cmd(temp.path())
        .args(["--src", "app", "--out", ".", "--tools", "tools", "--tmp", "tmp"])
        .arg("--clean")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("clean rebuild would erase"));

    assert!(temp.path().join("app/package.json").exists());
    assert!(temp.path().join("tools/nw/nw.exe").exists());
}

#[test]
fn quiet_run_prints_nothing_on_success() {
    let temp = project();

    bundler_cmd(temp.path())
        .args(["--src", "app", "--out", "release", "--tools", "tools", "--tmp", "tmp"])
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(temp.path().join("release/app.exe").exists());
}
