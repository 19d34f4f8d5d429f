//! End-to-end tests for the tfbump CLI
//!
//! These tests verify:
//! - Local runs rewrite files and dry-run mode leaves them unchanged
//! - JSON and diff output
//! - Exit codes for success, missing files and partial failures

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LABEL_URL: &str = "https://github.com/cloudposse/terraform-null-label.git";

fn label_module(label: &str, reference: &str) -> String {
    format!(
        "module \"{}\" {{\n  source = \"git::{}?ref={}\"\n}}\n",
        label, LABEL_URL, reference
    )
}

fn consul_module(version: &str) -> String {
    format!(
        "module \"consul\" {{\n  source  = \"hashicorp/consul/aws\"\n  version = \"{}\"\n}}\n",
        version
    )
}

fn git_record(name: &str, file: &str, old: &str, new: &str) -> String {
    format!(
        r#"{{
  "name": "{name}",
  "version": "{new}",
  "previous_version": "{old}",
  "requirements": [{{"file": "{file}", "requirement": null, "groups": [], "source": {{"type": "git", "url": "{url}", "branch": null, "ref": "{new}"}}}}],
  "previous_requirements": [{{"file": "{file}", "requirement": null, "groups": [], "source": {{"type": "git", "url": "{url}", "branch": null, "ref": "{old}"}}}}],
  "package_manager": "terraform"
}}"#,
        name = name,
        file = file,
        old = old,
        new = new,
        url = LABEL_URL
    )
}

fn registry_record(file: &str, old: &str, new: &str) -> String {
    registry_record_for("hashicorp/consul/aws", file, old, new)
}

fn registry_record_for(module: &str, file: &str, old: &str, new: &str) -> String {
    format!(
        r#"{{
  "name": "{module}",
  "version": "{new}",
  "previous_version": "{old}",
  "requirements": [{{"file": "{file}", "requirement": "{new}", "groups": [], "source": {{"type": "registry", "registry_hostname": "registry.terraform.io", "module_identifier": "{module}"}}}}],
  "previous_requirements": [{{"file": "{file}", "requirement": "{old}", "groups": [], "source": {{"type": "registry", "registry_hostname": "registry.terraform.io", "module_identifier": "{module}"}}}}],
  "package_manager": "terraform"
}}"#,
        module = module,
        file = file,
        old = old,
        new = new
    )
}

/// Create a project with two configuration files and a records file
fn create_test_project(records: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(
        dir.path().join("main.tf"),
        format!(
            "{}\n{}",
            label_module("origin_label", "tags/0.3.7"),
            label_module("duplicate_label", "tags/0.3.7")
        ),
    )
    .unwrap();
    fs::write(dir.path().join("consul.tf"), consul_module("0.1.0")).unwrap();
    fs::write(dir.path().join("deps.json"), records).unwrap();
    dir
}

fn tfbump(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tfbump").expect("binary should be built");
    cmd.arg(dir).arg("-D").arg(dir.join("deps.json")).env_remove("RUST_LOG");
    cmd
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

mod local_updates {
    use super::*;

    #[test]
    fn test_rewrites_files_in_place() {
        let records = format!(
            "[{}, {}]",
            git_record("origin_label", "main.tf", "tags/0.3.7", "tags/0.4.1"),
            registry_record("consul.tf", "0.1.0", "0.3.1")
        );
        let dir = create_test_project(&records);

        tfbump(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("2 files changed"));

        let main = read(dir.path(), "main.tf");
        assert!(main.contains(&label_module("origin_label", "tags/0.4.1")));
        assert!(main.contains(&label_module("duplicate_label", "tags/0.3.7")));
        assert_eq!(read(dir.path(), "consul.tf"), consul_module("0.3.1"));
    }

    #[test]
    fn test_dry_run_leaves_files_unchanged() {
        let dir = create_test_project(&registry_record("consul.tf", "0.1.0", "0.3.1"));

        tfbump(dir.path())
            .arg("--dry-run")
            .assert()
            .success()
            .stdout(predicate::str::contains("(dry-run) 1 file would change"));

        assert_eq!(read(dir.path(), "consul.tf"), consul_module("0.1.0"));
    }

    #[test]
    fn test_records_from_stdin() {
        let dir = create_test_project("");

        Command::cargo_bin("tfbump")
            .unwrap()
            .arg(dir.path())
            .args(["-D", "-"])
            .write_stdin(registry_record("consul.tf", "0.1.0", "0.3.1"))
            .assert()
            .success();

        assert_eq!(read(dir.path(), "consul.tf"), consul_module("0.3.1"));
    }

    #[test]
    fn test_no_matching_declaration_is_success() {
        let dir = create_test_project(&registry_record_for(
            "hashicorp/vault/aws",
            "consul.tf",
            "0.1.0",
            "0.3.1",
        ));

        tfbump(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("0 files changed"));

        assert_eq!(read(dir.path(), "consul.tf"), consul_module("0.1.0"));
    }

    #[test]
    fn test_unknown_git_ref_is_success() {
        let dir = create_test_project(&git_record("origin_label", "main.tf", "tags/9.9.9", "tags/10.0.0"));
        let before = read(dir.path(), "main.tf");

        tfbump(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("0 files changed"));

        assert_eq!(read(dir.path(), "main.tf"), before);
    }

    #[test]
    fn test_stale_registry_version_is_rewritten() {
        let dir = create_test_project(&registry_record("consul.tf", "9.9.9", "10.0.0"));

        tfbump(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("consul.tf: 0.1.0 -> 10.0.0"))
            .stdout(predicate::str::contains("1 file changed"));

        assert_eq!(read(dir.path(), "consul.tf"), consul_module("10.0.0"));
    }
}

mod output_formats {
    use super::*;

    #[test]
    fn test_json_output_schema() {
        let dir = create_test_project(&registry_record("consul.tf", "0.1.0", "0.3.1"));

        let output = tfbump(dir.path())
            .args(["--json", "--dry-run"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["dry_run"], true);
        assert_eq!(value["summary"]["files_changed"], 1);
        assert_eq!(value["dependencies"][0]["name"], "hashicorp/consul/aws");
        assert_eq!(value["dependencies"][0]["change"], "minor");
        assert_eq!(value["files"][0]["name"], "consul.tf");
        assert_eq!(value["files"][0]["written"], false);
    }

    #[test]
    fn test_diff_output() {
        let dir = create_test_project(&registry_record("consul.tf", "0.1.0", "0.3.1"));

        tfbump(dir.path())
            .args(["--diff", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--- a/consul.tf"))
            .stdout(predicate::str::contains("-  version = \"0.1.0\""))
            .stdout(predicate::str::contains("+  version = \"0.3.1\""));
    }

    #[test]
    fn test_json_and_diff_conflict() {
        let dir = create_test_project(&registry_record("consul.tf", "0.1.0", "0.3.1"));

        tfbump(dir.path())
            .args(["--json", "--diff"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("--json and --diff"));
    }
}

mod exit_codes {
    use super::*;

    #[test]
    fn test_missing_dependency_flag() {
        Command::cargo_bin("tfbump")
            .unwrap()
            .assert()
            .failure()
            .stderr(predicate::str::contains("--dependency"));
    }

    #[test]
    fn test_directory_without_config_files() {
        let dir = create_test_project(&registry_record("consul.tf", "0.1.0", "0.3.1"));
        fs::create_dir(dir.path().join("docs")).unwrap();

        tfbump(dir.path())
            .args(["--directory", "docs"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("dependency file not found: docs/<anything>.tf"));
    }

    #[test]
    fn test_nonexistent_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("deps.json"), registry_record("main.tf", "0.1.0", "0.3.1")).unwrap();

        Command::cargo_bin("tfbump")
            .unwrap()
            .arg(dir.path().join("missing"))
            .arg("-D")
            .arg(dir.path().join("deps.json"))
            .assert()
            .code(1);
    }

    #[test]
    fn test_invalid_records_file() {
        let dir = create_test_project("{ not json");

        tfbump(dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("deps.json"));
    }

    #[test]
    fn test_ambiguous_match_is_partial_failure() {
        let dir = create_test_project(&git_record("null_label", "main.tf", "tags/0.3.7", "tags/0.4.1"));
        let before = read(dir.path(), "main.tf");

        tfbump(dir.path())
            .assert()
            .code(2)
            .stderr(predicate::str::contains("main.tf"));

        assert_eq!(read(dir.path(), "main.tf"), before);
    }

    #[test]
    fn test_help() {
        Command::cargo_bin("tfbump")
            .unwrap()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--dependency"));
    }
}
