use std::{
    env,
    path::{Path, PathBuf},
};

// A TempCwd points the process's working directory at a scratch
// project for the duration of a test. Every `proto` command acts on
// the project in the working directory.
//
// The previous working directory is restored when the struct is
// dropped.
//
// Because this struct is intended for testing, its functions
// panic instead of returning Result structs.
//
// Any test that uses this module should be marked #[serial].
pub(crate) struct TempCwd {
    old_path: PathBuf,
}

impl TempCwd {
    pub fn new<P: AsRef<Path>>(path: P) -> TempCwd {
        let old_path = env::current_dir().unwrap();
        env::set_current_dir(path).unwrap();

        TempCwd { old_path }
    }
}

impl Drop for TempCwd {
    fn drop(&mut self) {
        env::set_current_dir(&self.old_path).unwrap();
    }
}
