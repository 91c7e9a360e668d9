//! Rewrites the header of a `.proto` file so it fits the destination project.
//!
//! **IMPORTANT NOTE:** This is line-oriented text surgery, not a parser. It
//! recognizes `syntax`, `package` and `option` statements only when they start
//! a line (after header lines holding several statements have been split), and
//! it never checks that the result is a valid proto file. `protoc` does that
//! when the SDK is generated.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use tracing::debug;

use crate::{Error, Language, Result};

const HEADER_KEYWORDS: &[&str] = &["syntax", "edition", "package", "option", "import"];

/// Rewrite the header of a proto file.
///
/// - The first `package` statement is replaced with the canonical
///   `package <name>;`. Any later `package` statement is dropped.
/// - Any existing option line for `language` (`go_package` for Go) is
///   dropped, and one canonical line naming `module_name` is inserted
///   immediately after the `syntax` line, or at the top if there is none.
/// - If there is no `package` statement, one derived from the last segment
///   of `module_name` is inserted at the same place, after the option line.
///
/// A leading byte order mark is dropped. The output always ends with a
/// single newline, and rewriting an already rewritten file returns it
/// unchanged.
pub fn rewrite(content: &str, module_name: &str, language: Language) -> String {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let option = language.package_option();

    let mut out: Vec<String> = Vec::new();
    let mut syntax_at: Option<usize> = None;
    let mut have_package = false;

    for line in split_header_statements(content) {
        let trimmed = line.trim();

        if let Some(name) = package_name(trimmed) {
            if !have_package && !name.is_empty() {
                out.push(format!("package {};", name));
                have_package = true;
            }
            continue;
        }

        if option.is_some() && option_name(trimmed) == option {
            continue;
        }

        if syntax_at.is_none()
            && (starts_with_keyword(trimmed, "syntax") || starts_with_keyword(trimmed, "edition"))
        {
            syntax_at = Some(out.len());
        }

        out.push(line);
    }

    let mut header = Vec::new();
    if let Some(option) = option {
        header.push(format!("option {} = \"{}\";", option, module_name));
    }
    if !have_package {
        header.push(format!("package {};", derive_package(module_name)));
    }

    let at = syntax_at.map_or(0, |idx| idx + 1);
    out.splice(at..at, header);

    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// Write `content` to `dest_dir/relative_path`, creating parent directories
/// as needed and overwriting any existing file. Returns the written path.
///
/// Failures are reported as `Error::ProtoIo` naming the destination file.
pub fn copy_into(dest_dir: &Path, relative_path: &Path, content: &str) -> Result<PathBuf> {
    let path = dest_dir.join(relative_path);

    let written = match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
    .and_then(|_| fs::write(&path, content));

    if let Err(source) = written {
        return Err(Error::ProtoIo {
            action: "write",
            path,
            source,
        });
    }

    debug!(?path, "proto file written");
    Ok(path)
}

/// Import path for the generated code of a proto file: `module_name` for
/// files at the top of the tree, `module_name/<dir>` for files in a
/// sub-directory.
pub fn import_path(module_name: &str, relative_path: &Path) -> String {
    let dirs: Vec<String> = relative_path
        .parent()
        .into_iter()
        .flat_map(|p| p.components())
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if dirs.is_empty() {
        module_name.to_string()
    } else {
        format!("{}/{}", module_name, dirs.join("/"))
    }
}

/// Package name used when a file has none: the last segment of the module
/// name, reduced to a valid proto identifier.
fn derive_package(module_name: &str) -> String {
    let segment = module_name
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("");

    let name: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    match name.chars().next() {
        None => "proto".to_string(),
        Some(c) if c.is_ascii_alphabetic() => name,
        Some(_) => format!("pb_{}", name),
    }
}

fn starts_with_keyword(trimmed: &str, keyword: &str) -> bool {
    match trimmed.strip_prefix(keyword) {
        Some(rest) => {
            rest.is_empty()
                || rest.starts_with(|c: char| c.is_whitespace() || c == '=' || c == ';')
        }
        None => false,
    }
}

// Returns the declared name (possibly empty) if this is a package statement.
fn package_name(trimmed: &str) -> Option<&str> {
    if !starts_with_keyword(trimmed, "package") {
        return None;
    }

    let rest = &trimmed["package".len()..];
    let rest = rest.split(';').next().unwrap_or("");
    let rest = rest.split("//").next().unwrap_or("");
    Some(rest.trim())
}

fn option_name(trimmed: &str) -> Option<&str> {
    if !starts_with_keyword(trimmed, "option") {
        return None;
    }

    let rest = trimmed["option".len()..].trim_start();
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or_else(|| rest.len());
    Some(&rest[..end])
}

// Header lines such as `syntax = "proto3"; package foo;` are split so that
// every header statement starts its own line. Other lines pass through.
fn split_header_statements(content: &str) -> Vec<String> {
    let mut lines = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if HEADER_KEYWORDS
            .iter()
            .any(|kw| starts_with_keyword(trimmed, kw))
        {
            let statements = split_statements(trimmed);
            if statements.len() > 1 {
                lines.extend(statements);
                continue;
            }
        }
        lines.push(line.to_string());
    }

    lines
}

fn split_statements(line: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        match quote {
            Some(q) => {
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                ';' => {
                    statements.push(current.trim().to_string());
                    current.clear();
                }
                '/' if chars.peek() == Some(&'/') => {
                    current.extend(chars.by_ref());
                    break;
                }
                _ => {}
            },
        }
    }

    let rest = current.trim();
    if !rest.is_empty() {
        match statements.last_mut() {
            Some(last) if rest.starts_with("//") => {
                last.push(' ');
                last.push_str(rest);
            }
            _ => statements.push(rest.to_string()),
        }
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODULE: &str = "github.com/acme/billing-api";

    fn count_lines(text: &str, prefix: &str) -> usize {
        text.lines().filter(|l| l.trim().starts_with(prefix)).count()
    }

    #[test]
    fn replaces_existing_package() {
        let input = "syntax = \"proto3\";\n\npackage   foo.v1 ;  // old\n\nmessage A {}\n";
        let out = rewrite(input, MODULE, Language::Go);

        assert_eq!(
            out,
            "syntax = \"proto3\";\noption go_package = \"github.com/acme/billing-api\";\n\npackage foo.v1;\n\nmessage A {}\n"
        );
        assert_eq!(count_lines(&out, "package "), 1);
    }

    #[test]
    fn inserts_package_when_missing() {
        let input = "syntax = \"proto3\";\n\nmessage A {}\n";
        let out = rewrite(input, MODULE, Language::Go);

        assert_eq!(
            out,
            "syntax = \"proto3\";\noption go_package = \"github.com/acme/billing-api\";\npackage billing_api;\n\nmessage A {}\n"
        );
        assert_eq!(count_lines(&out, "package "), 1);
    }

    #[test]
    fn inserts_at_top_without_syntax_line() {
        let input = "message A {}\n";
        let out = rewrite(input, MODULE, Language::Go);

        assert_eq!(
            out,
            "option go_package = \"github.com/acme/billing-api\";\npackage billing_api;\nmessage A {}\n"
        );

        let out = rewrite(input, MODULE, Language::Python);
        assert_eq!(out, "package billing_api;\nmessage A {}\n");
    }

    #[test]
    fn drops_duplicate_packages() {
        let input = "syntax = \"proto3\";\npackage a;\npackage b;\n";
        let out = rewrite(input, MODULE, Language::Python);

        assert_eq!(out, "syntax = \"proto3\";\npackage a;\n");
    }

    #[test]
    fn replaces_existing_go_package() {
        let input = "syntax = \"proto3\";\npackage foo;\nimport \"x.proto\";\noption go_package = \"old/path;oldpb\";\noption java_package = \"com.foo\";\n";
        let out = rewrite(input, MODULE, Language::Go);

        assert_eq!(
            out,
            "syntax = \"proto3\";\noption go_package = \"github.com/acme/billing-api\";\npackage foo;\nimport \"x.proto\";\noption java_package = \"com.foo\";\n"
        );
        assert_eq!(count_lines(&out, "option go_package"), 1);
    }

    #[test]
    fn python_keeps_other_options() {
        let input = "syntax = \"proto3\";\npackage foo;\noption go_package = \"keep/me\";\n";
        let out = rewrite(input, MODULE, Language::Python);

        assert_eq!(out, input);
    }

    #[test]
    fn splits_one_line_header() {
        let input = "syntax = \"proto3\"; package foo;";
        let out = rewrite(input, "example.com/app", Language::Go);

        assert_eq!(
            out,
            "syntax = \"proto3\";\noption go_package = \"example.com/app\";\npackage foo;\n"
        );
    }

    #[test]
    fn leading_bom_is_dropped() {
        let input = "\u{feff}syntax = \"proto3\";\npackage foo;\n";
        let out = rewrite(input, "ex.com/m", Language::Go);

        assert_eq!(
            out,
            "syntax = \"proto3\";\noption go_package = \"ex.com/m\";\npackage foo;\n"
        );
        assert_eq!(rewrite(&out, "ex.com/m", Language::Go), out);
    }

    #[test]
    fn semicolons_in_strings_are_not_split() {
        let input = "syntax = \"proto3\";\noption go_package = \"a/b;bpb\"; // trailing\npackage foo;\n";
        let out = rewrite(input, MODULE, Language::Python);

        assert_eq!(out, input);
    }

    #[test]
    fn comments_stay_with_their_statement() {
        assert_eq!(
            split_statements("syntax = \"proto3\"; package foo; // note"),
            vec!["syntax = \"proto3\";", "package foo; // note"]
        );
        assert_eq!(split_statements("package foo"), vec!["package foo"]);
    }

    #[test]
    fn package_keyword_must_be_a_word() {
        let input = "syntax = \"proto3\";\npackage foo;\nmessage A {\n  string packages = 1;\n}\n";
        let out = rewrite(input, MODULE, Language::Python);

        assert_eq!(out, input);
    }

    #[test]
    fn rewrite_is_idempotent() {
        let inputs = [
            "syntax = \"proto3\"; package foo;",
            "syntax = \"proto3\";\n\nmessage A {}\n",
            "message A {}",
            "",
            "// header comment\nsyntax = \"proto2\";\noption go_package = \"x\";\npackage p;\n",
        ];

        for input in inputs.iter() {
            for language in [Language::Go, Language::Python].iter() {
                let once = rewrite(input, MODULE, *language);
                let twice = rewrite(&once, MODULE, *language);
                assert_eq!(once, twice, "not idempotent for {:?}", input);
            }
        }
    }

    #[test]
    fn derived_package_names() {
        assert_eq!(derive_package("github.com/acme/billing-api"), "billing_api");
        assert_eq!(derive_package("example.com/Foo.V1/"), "foo_v1");
        assert_eq!(derive_package("example.com/2fa"), "pb_2fa");
        assert_eq!(derive_package(""), "proto");
    }

    #[test]
    fn import_paths() {
        assert_eq!(import_path("ex.com/m", Path::new("a.proto")), "ex.com/m");
        assert_eq!(
            import_path("ex.com/m", Path::new("billing/v1/a.proto")),
            "ex.com/m/billing/v1"
        );
    }

    #[test]
    fn copy_into_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let rel = Path::new("a/b/c.proto");

        let path = copy_into(dir.path(), rel, "first").unwrap();
        assert_eq!(path, dir.path().join(rel));
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        copy_into(dir.path(), rel, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn copy_into_names_the_file_it_could_not_write() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), "a file, not a directory").unwrap();

        let err = copy_into(dir.path(), Path::new("a/b.proto"), "x").unwrap_err();
        if let Error::ProtoIo { action, path, .. } = &err {
            assert_eq!(*action, "write");
            assert_eq!(path, &dir.path().join("a/b.proto"));
        } else {
            panic!("wrong error: {:?}", err);
        }
        assert!(err.to_string().contains("a/b.proto"), "{}", err);
    }
}
