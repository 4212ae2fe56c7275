//! Integration tests for the plugpack binary.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

const FOLDER: &str = "acme-pay";
const MAIN_FILE: &str = "acme-pay.php";
const PLUGIN_NAME: &str = "Acme Pay";

fn plugpack_cmd() -> Command {
    cargo_bin_cmd!("plugpack")
}

/// Source root containing a small plugin plus development leftovers.
fn plugin_source() -> TempDir {
    let root = TempDir::new().expect("failed to create temp dir");
    let write = |rel: &str, contents: &str| {
        let path = root.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    };
    write(
        &format!("{FOLDER}/{MAIN_FILE}"),
        &format!("<?php\n/**\n * Plugin Name: {PLUGIN_NAME}\n * Version: 1.2.0\n */\n"),
    );
    write(&format!("{FOLDER}/includes/class-gateway.php"), "<?php class Gateway {}");
    write(&format!("{FOLDER}/vendor/autoload.php"), "<?php // autoload");
    write(&format!("{FOLDER}/readme.txt"), "=== Acme Pay ===");
    write(&format!("{FOLDER}/.git/HEAD"), "ref: refs/heads/main");
    write(&format!("{FOLDER}/node_modules/left-pad/index.js"), "module.exports = 1;");
    write(&format!("{FOLDER}/debug.log"), "PHP Notice");
    root
}

fn build_cmd(source: &Path, output: &Path) -> Command {
    build_cmd_for(source, output, MAIN_FILE, PLUGIN_NAME)
}

/// Build command with each identity flag passed exactly once.
fn build_cmd_for(source: &Path, output: &Path, main_file: &str, plugin_name: &str) -> Command {
    let mut cmd = plugpack_cmd();
    cmd.arg("build")
        .arg("--source-root")
        .arg(source)
        .arg("--folder")
        .arg(FOLDER)
        .arg("--main-file")
        .arg(main_file)
        .arg("--plugin-name")
        .arg(plugin_name)
        .arg("--output-dir")
        .arg(output);
    cmd
}

fn built_archives(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "zip"))
        .collect()
}

fn single_archive(dir: &Path) -> PathBuf {
    let archives = built_archives(dir);
    assert_eq!(archives.len(), 1, "expected exactly one archive: {archives:?}");
    archives.into_iter().next().unwrap()
}

fn archive_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    archive.file_names().map(str::to_string).collect()
}

#[test]
fn test_version_flag() {
    plugpack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("plugpack"));
}

#[test]
fn test_help_flag() {
    plugpack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("verify"));
}

#[test]
fn test_build_help_lists_plugin_options() {
    plugpack_cmd()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--folder"))
        .stdout(predicate::str::contains("--no-default-excludes"));
}

#[test]
fn test_build_creates_archive_with_plugin_root() {
    let source = plugin_source();
    let output = TempDir::new().unwrap();

    build_cmd(source.path(), output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Plugin archive created"))
        .stdout(predicate::str::contains(format!("Folder name: {FOLDER}")));

    let archive = single_archive(output.path());
    let file_name = archive.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with(&format!("{FOLDER}-")));
    assert!(file_name.ends_with(".zip"));

    let names = archive_names(&archive);
    assert!(names.contains(&format!("{FOLDER}/{MAIN_FILE}")));
    assert!(names.contains(&format!("{FOLDER}/includes/class-gateway.php")));
    assert!(names.contains(&format!("{FOLDER}/vendor/autoload.php")));
    assert!(names.iter().all(|n| n.starts_with(&format!("{FOLDER}/"))));
    assert!(!names.iter().any(|n| n.contains(".git/")));
    assert!(!names.iter().any(|n| n.contains("node_modules")));
    assert!(!names.iter().any(|n| n.ends_with(".log")));
}

#[test]
fn test_build_missing_source_fails_without_archive() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    build_cmd(source.path(), output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Plugin folder not found"));

    assert!(built_archives(output.path()).is_empty());
}

#[test]
fn test_build_missing_main_file_fails() {
    let source = plugin_source();
    let output = TempDir::new().unwrap();

    build_cmd_for(source.path(), output.path(), "missing.php", PLUGIN_NAME)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Main plugin file not found"));

    assert!(built_archives(output.path()).is_empty());
}

#[test]
fn test_build_dotted_main_file_rejected() {
    let source = plugin_source();
    let output = TempDir::new().unwrap();

    build_cmd_for(source.path(), output.path(), "./acme-pay.php", PLUGIN_NAME)
        .assert()
        .failure()
        .stderr(predicate::str::contains("main file must be a relative path"));

    assert!(built_archives(output.path()).is_empty());
}

#[test]
fn test_build_missing_output_dir_names_path() {
    let source = plugin_source();
    let output = TempDir::new().unwrap();
    let missing = output.path().join("dist");

    build_cmd(source.path(), &missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot create archive"))
        .stderr(predicate::str::contains(missing.display().to_string()));
}

#[test]
fn test_build_header_mismatch_is_warning() {
    let source = plugin_source();
    let output = TempDir::new().unwrap();

    build_cmd_for(source.path(), output.path(), MAIN_FILE, "Something Else")
        .assert()
        .success()
        .stdout(predicate::str::contains("Warnings:"))
        .stdout(predicate::str::contains("Plugin Name: Something Else"));

    single_archive(output.path());
}

#[test]
fn test_build_missing_dependency_stub_is_warning() {
    let source = plugin_source();
    let output = TempDir::new().unwrap();
    fs::remove_dir_all(source.path().join(FOLDER).join("vendor")).unwrap();

    build_cmd(source.path(), output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("vendor/autoload.php"));

    single_archive(output.path());
}

#[test]
fn test_build_extra_exclude() {
    let source = plugin_source();
    let output = TempDir::new().unwrap();

    build_cmd(source.path(), output.path())
        .args(["-x", "README"])
        .assert()
        .success();

    let names = archive_names(&single_archive(output.path()));
    assert!(!names.iter().any(|n| n.ends_with("readme.txt")));
}

#[test]
fn test_build_json_output() {
    let source = plugin_source();
    let output = TempDir::new().unwrap();

    let assert = build_cmd(source.path(), output.path())
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(json["operation"], "build");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["plugin_folder"], FOLDER);
    assert_eq!(json["data"]["header_verified"], true);
    assert_eq!(json["data"]["dependencies_found"], true);
    assert_eq!(json["data"]["archive_entries"], 4);
    assert_eq!(json["data"]["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn test_verify_built_archive() {
    let source = plugin_source();
    let output = TempDir::new().unwrap();
    build_cmd(source.path(), output.path()).assert().success();
    let archive = single_archive(output.path());

    plugpack_cmd()
        .arg("verify")
        .arg(&archive)
        .args(["--folder", FOLDER, "--main-file", MAIN_FILE])
        .arg("--source")
        .arg(source.path().join(FOLDER))
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Correct structure verified: {FOLDER}/{MAIN_FILE}"
        )))
        .stdout(predicate::str::contains("Archive contents match source"));
}

#[test]
fn test_verify_wrong_folder_fails() {
    let source = plugin_source();
    let output = TempDir::new().unwrap();
    build_cmd(source.path(), output.path()).assert().success();
    let archive = single_archive(output.path());

    plugpack_cmd()
        .arg("verify")
        .arg(&archive)
        .args(["--folder", "other-plugin", "--main-file", MAIN_FILE])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Zip structure is incorrect"))
        .stderr(predicate::str::contains(format!("{FOLDER}/")));
}

#[test]
fn test_verify_audit_detects_changed_source() {
    let source = plugin_source();
    let output = TempDir::new().unwrap();
    build_cmd(source.path(), output.path()).assert().success();
    let archive = single_archive(output.path());

    fs::write(source.path().join(FOLDER).join("readme.txt"), "changed").unwrap();

    plugpack_cmd()
        .arg("verify")
        .arg(&archive)
        .args(["--folder", FOLDER, "--main-file", MAIN_FILE])
        .arg("--source")
        .arg(source.path().join(FOLDER))
        .assert()
        .failure()
        .stderr(predicate::str::contains("audit found 1 issue"));
}

#[test]
fn test_list_archive() {
    let source = plugin_source();
    let output = TempDir::new().unwrap();
    build_cmd(source.path(), output.path()).assert().success();
    let archive = single_archive(output.path());

    plugpack_cmd()
        .arg("list")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{FOLDER}/{MAIN_FILE}")))
        .stdout(predicate::str::contains("node_modules").not());

    plugpack_cmd()
        .args(["list", "--long", "-H"])
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 4 files"));
}

#[test]
fn test_list_missing_archive_fails() {
    let temp = TempDir::new().unwrap();

    plugpack_cmd()
        .arg("list")
        .arg(temp.path().join("missing.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_completion_bash() {
    plugpack_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plugpack"));
}
