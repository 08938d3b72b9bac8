//! Forward converter backed by an external program.

use reverse_sync_config::ConverterConfig;
use reverse_sync_engine::{ConvertError, ForwardConverter};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs the configured converter on a temporary copy of the markup.
///
/// The temporary directory is created inside the page directory when it
/// exists, so the converter can find the page's metadata next to its input.
#[derive(Debug, Clone)]
pub struct ProcessConverter {
    program: String,
    args: Vec<String>,
    page_id: String,
    page_dir: PathBuf,
}

impl ProcessConverter {
    pub fn new(config: &ConverterConfig, page_id: &str, page_dir: &Path) -> Self {
        ProcessConverter {
            program: config.program.clone(),
            args: config.args.clone(),
            page_id: page_id.to_string(),
            page_dir: page_dir.to_path_buf(),
        }
    }

    fn expand(&self, arg: &str, input: &Path, output: &Path) -> String {
        arg.replace("{input}", &input.to_string_lossy())
            .replace("{output}", &output.to_string_lossy())
            .replace("{page_dir}", &self.page_dir.to_string_lossy())
            .replace("{page_id}", &self.page_id)
    }
}

impl ForwardConverter for ProcessConverter {
    fn convert(&self, markup: &str) -> Result<String, ConvertError> {
        let workdir = if self.page_dir.is_dir() {
            tempfile::Builder::new()
                .prefix("reverse-sync.")
                .tempdir_in(&self.page_dir)?
        } else {
            tempfile::tempdir()?
        };
        let input = workdir.path().join("patched.xhtml");
        let output = workdir.path().join("roundtrip.mdx");
        std::fs::write(&input, markup)?;

        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| self.expand(arg, &input, &output))
            .collect();
        log::debug!("running {} {}", self.program, args.join(" "));

        let out = Command::new(&self.program).args(&args).output()?;
        if !out.status.success() {
            return Err(ConvertError::Failed {
                message: format!(
                    "{} exited with {}: {}",
                    self.program,
                    out.status,
                    String::from_utf8_lossy(&out.stderr).trim()
                ),
            });
        }
        Ok(std::fs::read_to_string(&output)?)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn shell(script: &str, args: &[&str]) -> ConverterConfig {
        ConverterConfig {
            program: "sh".to_string(),
            args: ["-c", script]
                .iter()
                .chain(args)
                .map(|s| s.to_string())
                .collect(),
        }
    }

    #[test]
    fn reads_the_output_file() {
        let page_dir = TempDir::new().unwrap();
        let config = shell(r#"cp "$0" "$1""#, &["{input}", "{output}"]);
        let converter = ProcessConverter::new(&config, "42", page_dir.path());

        assert_eq!(converter.convert("<p>x</p>").unwrap(), "<p>x</p>");
    }

    #[test]
    fn substitutes_page_placeholders() {
        let page_dir = TempDir::new().unwrap();
        let config = shell(r#"printf '%s' "$1" > "$0""#, &["{output}", "/{page_id}/verify"]);
        let converter = ProcessConverter::new(&config, "42", page_dir.path());

        assert_eq!(converter.convert("").unwrap(), "/42/verify");
    }

    #[test]
    fn non_zero_exit_reports_stderr() {
        let page_dir = TempDir::new().unwrap();
        let config = shell("echo boom >&2; exit 3", &[]);
        let converter = ProcessConverter::new(&config, "42", page_dir.path());

        let err = converter.convert("").unwrap_err();
        assert!(matches!(err, ConvertError::Failed { .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn temporary_files_are_removed() {
        let page_dir = TempDir::new().unwrap();
        let config = shell(r#"cp "$0" "$1""#, &["{input}", "{output}"]);
        ProcessConverter::new(&config, "42", page_dir.path())
            .convert("x")
            .unwrap();

        assert_eq!(std::fs::read_dir(page_dir.path()).unwrap().count(), 0);
    }
}
