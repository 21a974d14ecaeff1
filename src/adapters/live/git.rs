//! Live git adapter using `git` CLI commands.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::warn;

use crate::ports::git::GitRepo;
use crate::ports::PortResult;

/// Live git adapter that shells out to the `git` CLI inside `root`.
pub struct LiveGitRepo {
    root: PathBuf,
}

impl LiveGitRepo {
    /// Creates an adapter that runs every git command with `-C root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn git(&self, dir: &Path, args: &[&str]) -> PortResult<Vec<u8>> {
        let output = Command::new("git").arg("-C").arg(dir).args(args).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
        }
        Ok(output.stdout)
    }
}

/// Splits `-z` output into paths. Paths are taken verbatim; entries that
/// are not UTF-8 are skipped with a warning.
fn entries(stdout: &[u8]) -> Vec<String> {
    stdout
        .split(|b| *b == 0)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match std::str::from_utf8(entry) {
            Ok(path) => Some(path.to_string()),
            Err(_) => {
                warn!(path = %String::from_utf8_lossy(entry), "skipping non-UTF-8 path from git");
                None
            }
        })
        .collect()
}

impl GitRepo for LiveGitRepo {
    fn current_commit(&self) -> PortResult<String> {
        let stdout = self.git(&self.root, &["rev-parse", "HEAD"])?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    fn changed_files(&self, base: &str, head: Option<&str>) -> PortResult<Vec<String>> {
        let range = head.map(|head| format!("{base}...{head}"));
        let mut diff = vec!["diff", "--name-only", "--no-renames", "--relative", "-z"];
        diff.push(range.as_deref().unwrap_or(base));
        let mut files = entries(&self.git(&self.root, &diff)?);
        if head.is_none() {
            files.extend(entries(
                &self.git(&self.root, &["ls-files", "--others", "--exclude-standard", "-z"])?,
            ));
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    fn list_files(&self, path: &Path) -> PortResult<Vec<String>> {
        Ok(entries(&self.git(path, &["ls-files", "-z"])?))
    }
}
