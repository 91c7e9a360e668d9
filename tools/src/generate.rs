//! Generating language SDKs by running `protoc`.

use std::{
    env,
    ffi::{OsStr, OsString},
    fs, io,
    path::{Path, PathBuf},
    process::Command,
};

use protosync_core::{rewrite, Error, Language, Result};
use tracing::{debug, info};

use crate::tree;

const PROTOC: (&str, &str) = (
    "protoc",
    "https://github.com/protocolbuffers/protobuf/releases \
     (or e.g. 'apt install protobuf-compiler', 'brew install protobuf')",
);

const GO_PLUGINS: &[(&str, &str)] = &[
    (
        "protoc-gen-go",
        "go install google.golang.org/protobuf/cmd/protoc-gen-go@latest",
    ),
    (
        "protoc-gen-go-grpc",
        "go install google.golang.org/grpc/cmd/protoc-gen-go-grpc@latest",
    ),
];

const PYTHON_PLUGINS: &[(&str, &str)] = &[("protoc-gen-mypy", "pip install mypy-protobuf")];

const NO_PROTOS_HINT: &str = "Please ensure:\n\
    1. You have run 'proto sync' to download proto files\n\
    2. proto_dir in .protorc points at the synced files";

/// The set of directories searched for `protoc` and its plugins.
#[derive(Clone, Debug)]
pub struct Toolchain {
    search_path: Vec<PathBuf>,
}

impl Toolchain {
    /// Search the directories named by the `PATH` environment variable.
    pub fn from_env() -> Toolchain {
        let search_path = env::var_os("PATH")
            .map(|path| env::split_paths(&path).collect())
            .unwrap_or_default();

        Toolchain { search_path }
    }

    /// Search only the given directories.
    pub fn with_search_path<I, P>(dirs: I) -> Toolchain
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Toolchain {
            search_path: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Return the first executable named `tool` on the search path.
    pub fn find(&self, tool: &str) -> Option<PathBuf> {
        self.search_path.iter().find_map(|dir| {
            executable_names(tool)
                .into_iter()
                .map(|name| dir.join(name))
                .find(|candidate| is_executable(candidate))
        })
    }

    /// Like `find`, but a missing tool is an `Error::ToolMissing` telling the
    /// user how to install it.
    pub fn require(&self, tool: &str, install_hint: &str) -> Result<PathBuf> {
        self.find(tool).ok_or_else(|| Error::ToolMissing {
            tool: tool.to_string(),
            install_hint: install_hint.to_string(),
        })
    }

    /// Generate the `language` SDK for every proto file under `proto_dir`
    /// into `build_dir`, running `protoc` once per file.
    ///
    /// `protoc` and the companion plugins for `language` must all be on the
    /// search path. This is checked before anything runs. Generation stops
    /// at the first file `protoc` rejects.
    ///
    /// Returns the proto files compiled, relative to `proto_dir`.
    pub fn generate(
        &self,
        language: Language,
        proto_dir: &Path,
        build_dir: &Path,
        module_name: Option<&str>,
    ) -> Result<Vec<PathBuf>> {
        let protoc = self.require(PROTOC.0, PROTOC.1)?;
        for (plugin, hint) in plugins(language) {
            self.require(plugin, hint)?;
        }

        let files = if proto_dir.is_dir() {
            tree::find_protos(proto_dir)?
        } else {
            Vec::new()
        };
        if files.is_empty() {
            return Err(Error::NoProtoFiles {
                dir: proto_dir.display().to_string(),
                listing: tree::describe(proto_dir)?,
                hint: NO_PROTOS_HINT,
            });
        }

        fs::create_dir_all(build_dir)?;

        let search_path = env::join_paths(&self.search_path)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

        for file in &files {
            let args = protoc_args(language, proto_dir, build_dir, file, module_name);

            let mut cmd = Command::new(&protoc);
            cmd.args(&args).env("PATH", &search_path);
            debug!(?cmd, "running protoc");

            let output = cmd.output()?;
            if !output.status.success() {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));

                return Err(Error::CompilationFailed {
                    file: file.clone(),
                    status: output.status.to_string(),
                    output: text.trim_end().to_string(),
                });
            }
        }

        info!(%language, count = files.len(), ?build_dir, "SDK generated");
        Ok(files)
    }
}

/// Generate an SDK using the tools found on `PATH`.
/// See [`Toolchain::generate`](struct.Toolchain.html#method.generate).
pub fn generate(
    language: Language,
    proto_dir: &Path,
    build_dir: &Path,
    module_name: Option<&str>,
) -> Result<Vec<PathBuf>> {
    Toolchain::from_env().generate(language, proto_dir, build_dir, module_name)
}

fn plugins(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::Go => GO_PLUGINS,
        Language::Python => PYTHON_PLUGINS,
    }
}

fn flag(name: &str, value: &OsStr) -> OsString {
    let mut flag = OsString::from(name);
    flag.push(value);
    flag
}

fn protoc_args(
    language: Language,
    proto_dir: &Path,
    build_dir: &Path,
    file: &Path,
    module_name: Option<&str>,
) -> Vec<OsString> {
    let out = build_dir.as_os_str();
    let mut args = Vec::new();

    match language {
        Language::Go => {
            args.push(flag("--go_out=", out));
            args.push("--go_opt=paths=source_relative".into());
            args.push(flag("--go-grpc_out=", out));
            args.push("--go-grpc_opt=paths=source_relative".into());

            if let Some(module) = module_name {
                let mapping = format!(
                    "M{}={}",
                    file.to_string_lossy(),
                    rewrite::import_path(module, file)
                );
                args.push(format!("--go_opt={}", mapping).into());
                args.push(format!("--go-grpc_opt={}", mapping).into());
            }
        }
        Language::Python => {
            args.push(flag("--python_out=", out));
            args.push(flag("--mypy_out=", out));
        }
    }

    args.push("-I".into());
    args.push(proto_dir.as_os_str().to_owned());
    args.push(proto_dir.join(file).into_os_string());
    args
}

fn executable_names(tool: &str) -> Vec<String> {
    if cfg!(windows) {
        vec![format!("{}.exe", tool), tool.to_string()]
    } else {
        vec![tool.to_string()]
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
