use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    process::Command,
};

/// A `TempGitRepo` creates a temporary git repository using the
/// command-line git from the host system. Tests use it as the remote
/// that `proto sync` clones from.
///
/// The repository starts on an unborn `main` branch. Use `write_file`
/// and `commit_all` to give it content.
///
/// Because this struct is intended for testing, its functions
/// panic instead of returning Result structs.
pub struct TempGitRepo {
    #[allow(dead_code)] // tempdir is only used for RAII
    tempdir: tempfile::TempDir,
    path: PathBuf,
}

impl TempGitRepo {
    // Create a new repo in a temporary directory.
    // This directory will be deleted when the struct is dropped.
    pub fn new() -> TempGitRepo {
        let tempdir = tempfile::tempdir().unwrap();
        let path: PathBuf = tempdir.path().to_path_buf();

        let mut r = TempGitRepo { tempdir, path };

        r.init();
        r
    }

    fn init(&mut self) {
        self.git_command(&["init", "--quiet"]);

        // The host's init.defaultBranch varies. Tests always sync from `main`.
        self.git_command(&["symbolic-ref", "HEAD", "refs/heads/main"]);
    }

    // Return the path for this repo's root (working directory).
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    // Return a locator that `git clone` accepts for this repo.
    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    // Write a file (relative to the repo root), creating parent directories.
    pub fn write_file<P: AsRef<Path>>(&mut self, rel: P, content: &str) -> &mut TempGitRepo {
        let path = self.path.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    // Stage everything and commit it on the current branch.
    pub fn commit_all(&mut self, message: &str) -> &mut TempGitRepo {
        self.git_command(&["add", "--all"]);
        self.git_command(&["commit", "--quiet", "--allow-empty", "-m", message])
    }

    // Return the full hash of the commit HEAD points to.
    pub fn head_revision(&mut self) -> String {
        let output = self
            .command("git")
            .args(&["rev-parse", "HEAD"])
            .output()
            .unwrap();
        assert!(output.status.success(), "git rev-parse HEAD failed");

        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    // Create a command struct pointing to the root of the repo.
    pub fn command<S: AsRef<OsStr>>(&mut self, program: S) -> Command {
        let mut c = Command::new(program);
        c.current_dir(&self.path)
            .env("GIT_AUTHOR_NAME", "Test Author")
            .env("GIT_AUTHOR_EMAIL", "author@example.com")
            .env("GIT_COMMITTER_NAME", "Test Committer")
            .env("GIT_COMMITTER_EMAIL", "committer@example.com");
        c
    }

    // Run a git command and return the git repo struct for method chaining.
    // Since this is used primarily for testing purposes, panics if command fails.
    pub fn git_command<I, S>(&mut self, args: I) -> &mut TempGitRepo
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self
            .command("git")
            .args(&["-c", "commit.gpgsign=false"])
            .args(args)
            .output()
            .unwrap();

        if !output.status.success() {
            panic!(
                "git command failed with status {:?}\n\nstdout:\n\n{}\n\nstderr:\n\n{}\n\n",
                output.status.code(),
                std::str::from_utf8(&output.stdout).unwrap(),
                std::str::from_utf8(&output.stderr).unwrap()
            );
        }

        self
    }
}
