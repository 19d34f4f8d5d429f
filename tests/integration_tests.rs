//! Integration tests for tfbump
//!
//! These tests verify:
//! - Git, registry and Terragrunt pin rewrites against realistic files
//! - Rewrite properties (idempotence, exactness, isolation, file order)
//! - File acquisition from a local checkout
//! - Orchestrated runs that write back to disk

use std::fs;
use tempfile::TempDir;
use tfbump::domain::{
    BindingOutcome, ConfigFile, Dependency, Ecosystem, Requirement, SkipReason, SourceDescriptor,
};
use tfbump::error::{FetchError, UpdateError};
use tfbump::manifest::{get_updater, updated_dependency_files};

const LABEL_URL: &str = "https://github.com/cloudposse/terraform-null-label.git";
const MODULES_URL: &str = "git@github.com:gruntwork-io/modules-example.git";

fn git_dependency(name: &str, url: &str, file: &str, old: &str, new: &str) -> Dependency {
    Dependency::new(
        name,
        vec![Requirement::new(file, SourceDescriptor::git(url, new))],
        vec![Requirement::new(file, SourceDescriptor::git(url, old))],
    )
    .with_versions(old, new)
}

fn registry_dependency(file: &str, old: &str, new: &str) -> Dependency {
    let source = SourceDescriptor::registry("hashicorp/consul/aws", None);
    Dependency::new(
        "hashicorp/consul/aws",
        vec![Requirement::new(file, source.clone()).with_requirement(new)],
        vec![Requirement::new(file, source).with_requirement(old)],
    )
    .with_versions(old, new)
}

fn label_module(label: &str, reference: &str) -> String {
    format!(
        "module \"{}\" {{\n  source     = \"git::{}?ref={}\"\n  namespace  = \"eg\"\n  stage      = \"prod\"\n}}\n",
        label, LABEL_URL, reference
    )
}

fn label_file(origin_ref: &str) -> ConfigFile {
    ConfigFile::new(
        "main.tf",
        format!(
            "{}\n{}",
            label_module("origin_label", origin_ref),
            label_module("duplicate_label", "tags/0.3.7")
        ),
    )
}

fn consul_content(version: &str) -> String {
    format!(
        "module \"consul\" {{\n  source  = \"hashicorp/consul/aws\"\n  version = \"{}\"\n}}\n",
        version
    )
}

fn terragrunt_content(reference: &str) -> String {
    format!(
        "terragrunt = {{\n  # Terragrunt will copy the Terraform configurations\n  terraform {{\n    source = \"git::{}//consul?ref={}\"\n  }}\n\n  include = {{\n    path = \"${{find_in_parent_folders()}}\"\n  }}\n}}\n",
        MODULES_URL, reference
    )
}

mod scenarios {
    use super::*;

    #[test]
    fn test_git_pin_rewrites_only_the_labelled_module() {
        let files = vec![label_file("tags/0.3.7")];
        let dependency =
            git_dependency("origin_label", LABEL_URL, "main.tf", "tags/0.3.7", "tags/0.4.1");

        let updated = updated_dependency_files(&files, &dependency).unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0], label_file("tags/0.4.1"));
        assert!(updated[0].content.contains(&format!(
            "module \"origin_label\" {{\n  source     = \"git::{}?ref=tags/0.4.1\"\n",
            LABEL_URL
        )));
        assert!(updated[0].content.contains(&format!(
            "module \"duplicate_label\" {{\n  source     = \"git::{}?ref=tags/0.3.7\"\n",
            LABEL_URL
        )));
    }

    #[test]
    fn test_registry_version_rewrite_ignores_other_files() {
        let files = vec![
            ConfigFile::new("main.tf", consul_content("0.1.0")),
            ConfigFile::new("other.tf", consul_content("0.1.0")),
        ];
        let dependency = registry_dependency("main.tf", "0.1.0", "0.3.1");

        let updated = updated_dependency_files(&files, &dependency).unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].name, "main.tf");
        assert_eq!(
            updated[0].content,
            "module \"consul\" {\n  source  = \"hashicorp/consul/aws\"\n  version = \"0.3.1\"\n}\n"
        );
    }

    #[test]
    fn test_terragrunt_subdirectory_is_preserved() {
        let files = vec![ConfigFile::new("main.tfvars", terragrunt_content("v0.0.2"))];
        let dependency = git_dependency(
            "gruntwork-io/modules-example",
            MODULES_URL,
            "main.tfvars",
            "v0.0.2",
            "v0.0.5",
        );

        let updated = updated_dependency_files(&files, &dependency).unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].content, terragrunt_content("v0.0.5"));
        assert!(updated[0].content.contains(
            "source = \"git::git@github.com:gruntwork-io/modules-example.git//consul?ref=v0.0.5\""
        ));
    }

    #[test]
    fn test_missing_target_file_is_not_a_failure() {
        let files = vec![label_file("tags/0.3.7")];
        let dependency =
            git_dependency("origin_label", LABEL_URL, "absent.tf", "tags/0.3.7", "tags/0.4.1");

        let update = get_updater(Ecosystem::Terraform)
            .update(&files, &dependency)
            .unwrap();

        assert!(update.files.is_empty());
        assert!(update.failures.is_empty());
        assert_eq!(
            update.outcomes,
            vec![BindingOutcome::skipped(0, "absent.tf", SkipReason::FileNotPresent)]
        );
        assert!(updated_dependency_files(&files, &dependency).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_directory_is_not_found() {
        use tfbump::fetcher::{create_fetcher, LocalContents};

        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("infra")).unwrap();
        fs::write(dir.path().join("infra/README.md"), "# infra").unwrap();

        let fetcher = create_fetcher(Ecosystem::Terraform, Box::new(LocalContents::new(dir.path())));
        let err = fetcher.fetch_files("/infra").await.unwrap_err();

        assert!(err.is_not_found());
        match err {
            FetchError::DependencyFileNotFound { path } => assert!(path.starts_with("/infra")),
            other => panic!("unexpected error: {}", other),
        }
    }
}

mod properties {
    use super::*;

    #[test]
    fn test_noop_binding_never_changes_files() {
        let files = vec![label_file("tags/0.3.7")];
        let dependency =
            git_dependency("origin_label", LABEL_URL, "main.tf", "tags/0.3.7", "tags/0.3.7");

        let update = get_updater(Ecosystem::Terraform)
            .update(&files, &dependency)
            .unwrap();

        assert!(update.files.is_empty());
        assert_eq!(
            update.outcomes,
            vec![BindingOutcome::skipped(0, "main.tf", SkipReason::Unchanged)]
        );
    }

    #[test]
    fn test_second_application_changes_nothing() {
        let dependency = registry_dependency("main.tf", "0.1.0", "0.3.1");
        let files = vec![ConfigFile::new("main.tf", consul_content("0.1.0"))];
        let first = updated_dependency_files(&files, &dependency).unwrap();
        assert_eq!(first.len(), 1);
        let second = updated_dependency_files(&first, &dependency).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn test_bytes_outside_splice_are_untouched() {
        let original = format!(
            "# header comment\n{}\n// trailing {{ brace in comment\nlocals {{ x = \"}}\" }}\n",
            consul_content("0.1.0")
        );
        let files = vec![ConfigFile::new("main.tf", original.clone())];
        let dependency = registry_dependency("main.tf", "0.1.0", "0.3.1");

        let updated = updated_dependency_files(&files, &dependency).unwrap();

        assert_eq!(updated[0].content, original.replacen("\"0.1.0\"", "\"0.3.1\"", 1));
    }

    #[test]
    fn test_duplicate_at_other_ref_is_isolated() {
        let content = format!(
            "{}\n{}",
            label_module("a", "tags/0.3.7"),
            label_module("b", "tags/0.3.6")
        );
        let files = vec![ConfigFile::new("main.tf", content)];
        let dependency =
            git_dependency("null_label", LABEL_URL, "main.tf", "tags/0.3.6", "tags/0.4.1");

        let updated = updated_dependency_files(&files, &dependency).unwrap();

        assert_eq!(
            updated[0].content,
            format!(
                "{}\n{}",
                label_module("a", "tags/0.3.7"),
                label_module("b", "tags/0.4.1")
            )
        );
    }

    #[test]
    fn test_indistinguishable_duplicates_are_ambiguous() {
        let content = format!(
            "{}\n{}",
            label_module("a", "tags/0.3.7"),
            label_module("b", "tags/0.3.7")
        );
        let files = vec![ConfigFile::new("main.tf", content)];
        let dependency =
            git_dependency("null_label", LABEL_URL, "main.tf", "tags/0.3.7", "tags/0.4.1");

        let err = updated_dependency_files(&files, &dependency).unwrap_err();
        assert!(matches!(err, UpdateError::AmbiguousMatch { .. }));
        assert_eq!(err.file(), Some("main.tf"));
    }

    #[test]
    fn test_registry_source_line_is_untouched() {
        let files = vec![ConfigFile::new("main.tf", consul_content("~> 0.1"))];
        let dependency = registry_dependency("main.tf", "~> 0.1", "~> 0.3");

        let updated = updated_dependency_files(&files, &dependency).unwrap();

        let before: Vec<&str> = files[0].content.lines().collect();
        let after: Vec<&str> = updated[0].content.lines().collect();
        assert_eq!(before[1], after[1]);
        assert_eq!(after[2], "  version = \"~> 0.3\"");
    }

    #[test]
    fn test_file_order_does_not_affect_result() {
        let mut dependency = registry_dependency("main.tf", "0.1.0", "0.3.1");
        dependency.previous_requirements.push(
            Requirement::new("other.tf", SourceDescriptor::registry("hashicorp/consul/aws", None))
                .with_requirement("0.1.0"),
        );
        dependency.requirements.push(
            Requirement::new("other.tf", SourceDescriptor::registry("hashicorp/consul/aws", None))
                .with_requirement("0.2.0"),
        );

        let main = ConfigFile::new("main.tf", consul_content("0.1.0"));
        let other = ConfigFile::new("other.tf", consul_content("0.1.0"));

        let forward = updated_dependency_files(&[main.clone(), other.clone()], &dependency).unwrap();
        let mut backward = updated_dependency_files(&[other, main], &dependency).unwrap();
        backward.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(forward, backward);
        assert_eq!(forward[0].content, consul_content("0.3.1"));
        assert_eq!(forward[1].content, consul_content("0.2.0"));
    }

    #[test]
    fn test_ambiguity_in_one_file_keeps_other_file() {
        let mut dependency =
            git_dependency("null_label", LABEL_URL, "a.tf", "tags/0.3.7", "tags/0.4.1");
        dependency
            .previous_requirements
            .push(Requirement::new("b.tf", SourceDescriptor::git(LABEL_URL, "tags/0.3.7")));
        dependency
            .requirements
            .push(Requirement::new("b.tf", SourceDescriptor::git(LABEL_URL, "tags/0.4.1")));

        let ambiguous = format!(
            "{}\n{}",
            label_module("x", "tags/0.3.7"),
            label_module("y", "tags/0.3.7")
        );
        let files = vec![
            ConfigFile::new("a.tf", ambiguous.clone()),
            ConfigFile::new("b.tf", label_module("z", "tags/0.3.7")),
        ];

        let update = get_updater(Ecosystem::Terraform)
            .update(&files, &dependency)
            .unwrap();

        assert_eq!(update.failures.len(), 1);
        assert_eq!(update.files.len(), 1);
        assert_eq!(update.files[0].name, "b.tf");
        assert_eq!(update.files[0].content, label_module("z", "tags/0.4.1"));
    }
}

mod local_runs {
    use super::*;
    use std::path::PathBuf;
    use tfbump::orchestrator::Orchestrator;
    use tfbump::settings::RunConfig;

    fn config(root: PathBuf, directory: &str, dry_run: bool) -> RunConfig {
        RunConfig {
            root,
            directory: directory.to_string(),
            ecosystem: Ecosystem::Terraform,
            repository: None,
            commit: None,
            credentials: Vec::new(),
            dry_run,
        }
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("infra")).unwrap();
        fs::write(dir.path().join("infra/main.tf"), label_file("tags/0.3.7").content).unwrap();
        fs::write(dir.path().join("infra/consul.tf"), consul_content("0.1.0")).unwrap();
        fs::write(dir.path().join("infra/terraform.tfvars"), "region = \"eu-west-1\"\n").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_run_writes_changed_files() {
        let dir = project();
        let dependencies = vec![
            git_dependency("origin_label", LABEL_URL, "main.tf", "tags/0.3.7", "tags/0.4.1"),
            registry_dependency("consul.tf", "0.1.0", "0.3.1"),
        ];
        let orchestrator = Orchestrator::with_dependencies(
            config(dir.path().to_path_buf(), "infra", false),
            dependencies,
        );

        let result = orchestrator.run().await.unwrap();

        assert!(!result.has_errors());
        assert_eq!(result.summary.files_changed(), 2);
        assert_eq!(result.write_results.len(), 2);
        assert!(result.write_results.iter().all(|w| w.file_modified));
        assert_eq!(
            fs::read_to_string(dir.path().join("infra/main.tf")).unwrap(),
            label_file("tags/0.4.1").content
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("infra/consul.tf")).unwrap(),
            consul_content("0.3.1")
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("infra/terraform.tfvars")).unwrap(),
            "region = \"eu-west-1\"\n"
        );
    }

    #[tokio::test]
    async fn test_dry_run_leaves_files_unchanged() {
        let dir = project();
        let orchestrator = Orchestrator::with_dependencies(
            config(dir.path().to_path_buf(), "infra", true),
            vec![registry_dependency("consul.tf", "0.1.0", "0.3.1")],
        );

        let result = orchestrator.run().await.unwrap();

        assert_eq!(result.summary.files_changed(), 1);
        assert!(result.write_results.iter().all(|w| !w.file_modified));
        assert_eq!(
            fs::read_to_string(dir.path().join("infra/consul.tf")).unwrap(),
            consul_content("0.1.0")
        );
    }

    #[tokio::test]
    async fn test_run_on_directory_without_config_is_fatal() {
        let dir = project();
        fs::create_dir(dir.path().join("docs")).unwrap();
        let orchestrator = Orchestrator::with_dependencies(
            config(dir.path().to_path_buf(), "docs", false),
            vec![registry_dependency("consul.tf", "0.1.0", "0.3.1")],
        );

        let err = orchestrator.run().await.err().unwrap();
        assert!(err.to_string().contains("docs"));
    }
}
