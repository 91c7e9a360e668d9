use std::path::Path;

use assert_cmd::Command;

use protosync_tools::TempGitRepo;

// Run the `proto` binary with `project` as its working directory.
#[allow(dead_code)]
pub fn proto(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("proto").unwrap();
    cmd.current_dir(project).env_remove("RUST_LOG");
    cmd
}

// A remote with a single proto file whose header is all on one line.
#[allow(dead_code)]
pub fn remote_with_one_proto() -> TempGitRepo {
    let mut remote = TempGitRepo::new();
    remote
        .write_file("a.proto", "syntax = \"proto3\"; package foo;")
        .commit_all("initial");
    remote
}

// Write an executable shell script to `dir/name`.
#[cfg(unix)]
#[allow(dead_code)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) {
    use std::{fs, os::unix::fs::PermissionsExt};

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}
