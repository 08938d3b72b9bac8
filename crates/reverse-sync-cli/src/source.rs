//! Resolves a text source argument: a file path or `<git-ref>:<path>`.

use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::Command;

/// A loaded text document and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub content: String,
    /// The argument as given (`main:src/content/ko/a.mdx`, `a.mdx`).
    pub descriptor: String,
    /// The path part of the descriptor.
    pub path: String,
}

/// `<ref>:<path>` is tried first when `ref` names a git revision, then the
/// argument as a plain file path.
pub fn resolve(arg: &str) -> Result<Source> {
    if let Some((reference, path)) = arg.split_once(':')
        && !reference.is_empty()
        && is_git_ref(reference)
    {
        let content = git_show(reference, path)?;
        return Ok(Source {
            content,
            descriptor: arg.to_string(),
            path: path.to_string(),
        });
    }

    if Path::new(arg).is_file() {
        let content =
            std::fs::read_to_string(arg).with_context(|| format!("Failed to read {arg}"))?;
        return Ok(Source {
            content,
            descriptor: arg.to_string(),
            path: arg.to_string(),
        });
    }

    bail!("Cannot resolve source '{arg}': not a file path or <git-ref>:<path>")
}

fn is_git_ref(reference: &str) -> bool {
    Command::new("git")
        .args(["rev-parse", "--verify", "--quiet", reference])
        .output()
        .is_ok_and(|out| out.status.success())
}

fn git_show(reference: &str, path: &str) -> Result<String> {
    let out = Command::new("git")
        .arg("show")
        .arg(format!("{reference}:{path}"))
        .output()
        .context("Failed to run git")?;
    if !out.status.success() {
        bail!(
            "Failed to get {path} at {reference}: {}",
            String::from_utf8_lossy(&out.stderr).trim()
        );
    }
    String::from_utf8(out.stdout).with_context(|| format!("{reference}:{path} is not UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn reads_plain_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page.mdx");
        std::fs::write(&file, "# Title\n").unwrap();
        let arg = file.to_string_lossy().into_owned();

        let source = resolve(&arg).unwrap();

        assert_eq!(source.content, "# Title\n");
        assert_eq!(source.path, arg);
    }

    #[test]
    fn unknown_sources_are_errors() {
        let err = resolve("no-such-ref-anywhere:missing/page.mdx").unwrap_err();
        assert!(err.to_string().contains("Cannot resolve source"));
    }
}
