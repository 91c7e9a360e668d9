use std::{
    fmt::{self, Display, Formatter},
    fs, io,
    path::Path,
    str::FromStr,
};

use crate::{Error, Result};

/// A target ecosystem, used both to pick `protoc` flags when generating
/// SDKs and to decide which option line the header rewrite injects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    Go,
    Python,
}

impl Language {
    /// Guess the ecosystem of the project rooted at `dir` from its marker
    /// files. Falls back to Go when nothing matches.
    pub fn detect(dir: &Path) -> Language {
        if dir.join("go.mod").is_file() {
            Language::Go
        } else if ["pyproject.toml", "setup.py", "requirements.txt"]
            .iter()
            .any(|marker| dir.join(marker).is_file())
        {
            Language::Python
        } else {
            Language::Go
        }
    }

    /// Name of the file-level option that tells this ecosystem's generator
    /// where generated code lives, if it has one.
    pub fn package_option(self) -> Option<&'static str> {
        match self {
            Language::Go => Some("go_package"),
            Language::Python => None,
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Language::Go => write!(f, "go"),
            Language::Python => write!(f, "python"),
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "go" => Ok(Language::Go),
            "python" => Ok(Language::Python),
            other => Err(Error::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Read the module path declared by `dir/go.mod`.
///
/// Returns `None` if there is no `go.mod` or it has no `module` line.
pub fn go_module(dir: &Path) -> Result<Option<String>> {
    let text = match fs::read_to_string(dir.join("go.mod")) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    Ok(text.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let module = rest.trim().trim_matches('"');
        if module.is_empty() {
            None
        } else {
            Some(module.to_string())
        }
    }))
}

/// Derive a module name from a repository locator by dropping the scheme,
/// any credentials, and a trailing `.git`.
///
/// `https://github.com/acme/protos.git` and `git@github.com:acme/protos.git`
/// both become `github.com/acme/protos`.
pub fn module_from_repo_url(url: &str) -> String {
    let (rest, has_scheme) = match url.find("://") {
        Some(idx) => (&url[idx + 3..], true),
        None => (url, false),
    };

    let rest = match rest.rfind('@') {
        Some(idx) if !rest[..idx].contains('/') => &rest[idx + 1..],
        _ => rest,
    };

    // scp-like syntax: host:path
    let rest = match rest.find(':') {
        Some(idx) if !has_scheme && !rest[..idx].contains('/') => {
            format!("{}/{}", &rest[..idx], &rest[idx + 1..])
        }
        _ => rest.to_string(),
    };

    let rest = rest.trim_matches('/');
    rest.strip_suffix(".git").unwrap_or(rest).to_string()
}
