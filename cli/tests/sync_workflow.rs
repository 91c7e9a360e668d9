use std::fs;

use predicates::prelude::*;

mod common;

#[test]
fn init_sync_and_sync_again() {
    let mut remote = common::remote_with_one_proto();
    let head = remote.head_revision();
    let project = tempfile::tempdir().unwrap();

    common::proto(project.path())
        .args(&["init", "--url", &remote.url(), "--proto-dir", "./proto"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Configuration initialized successfully\n",
        ))
        .stderr("");

    common::proto(project.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Synced 1 proto files at "))
        .stdout(predicate::str::contains(&head[..12]));

    // No go.mod and no --module: the module comes from the remote's URL.
    let synced = project.path().join("proto/a.proto");
    let content = fs::read_to_string(&synced).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected content:\n{}", content);
    assert_eq!(lines[0], "syntax = \"proto3\";");
    assert!(lines[1].starts_with("option go_package = \""), "{}", lines[1]);
    assert_eq!(lines[2], "package foo;");

    common::proto(project.path())
        .arg("sync")
        .assert()
        .success()
        .stdout("Already up to date\n");

    assert_eq!(fs::read_to_string(&synced).unwrap(), content);

    let config = fs::read_to_string(project.path().join(".protorc")).unwrap();
    assert!(
        config.contains(&format!("last_revision = \"{}\"", head)),
        "config was:\n{}",
        config
    );
}

#[test]
fn sync_picks_up_new_commits() {
    let mut remote = common::remote_with_one_proto();
    let project = tempfile::tempdir().unwrap();

    common::proto(project.path())
        .args(&["init", "--url", &remote.url(), "--module", "example.com/app"])
        .assert()
        .success();
    common::proto(project.path()).arg("sync").assert().success();

    remote
        .write_file("billing/invoice.proto", "syntax = \"proto3\";\n\nmessage Invoice {}\n")
        .commit_all("add billing");

    common::proto(project.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Synced 2 proto files at "))
        .stdout(predicate::str::contains("  billing/invoice.proto\n"));

    assert_eq!(
        fs::read_to_string(project.path().join("proto/billing/invoice.proto")).unwrap(),
        "syntax = \"proto3\";\noption go_package = \"example.com/app/billing\";\npackage billing;\n\nmessage Invoice {}\n"
    );
}

#[test]
fn sync_before_init_fails() {
    let project = tempfile::tempdir().unwrap();

    common::proto(project.path())
        .arg("sync")
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr("ERROR: configuration not initialized; run 'proto init' first\n");
}

#[test]
fn verbose_flag_logs_to_stderr() {
    let project = tempfile::tempdir().unwrap();

    common::proto(project.path())
        .args(&["-vv", "sync"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("dispatching"))
        .stderr(predicate::str::contains(
            "ERROR: configuration not initialized",
        ));
}

#[test]
fn missing_remote_path_lists_repository() {
    let remote = common::remote_with_one_proto();
    let project = tempfile::tempdir().unwrap();

    common::proto(project.path())
        .args(&["init", "--url", &remote.url(), "--sub-path", "protos"])
        .assert()
        .success();

    common::proto(project.path())
        .arg("sync")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with(
            "ERROR: remote path 'protos' does not exist in the repository",
        ))
        .stderr(predicate::str::contains("- a.proto ("));

    assert!(!project.path().join("proto/a.proto").exists());
}

#[test]
fn bad_url_explains_common_issues() {
    let project = tempfile::tempdir().unwrap();
    let missing = project.path().join("no-such-remote");

    common::proto(project.path())
        .args(&["init", "--url", missing.to_str().unwrap()])
        .assert()
        .success();

    common::proto(project.path())
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("ERROR: unable to clone "))
        .stderr(predicate::str::contains("Common issues:"));
}
