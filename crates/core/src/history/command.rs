//! `git log` subprocess export.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, instrument, warn};

use super::{HistorySource, AUTHOR_FORMAT};
use crate::errors::HistoryError;

/// Runs `git log --format=%aN <%aE> <rev>...` inside a repository.
#[derive(Debug, Clone)]
pub struct GitLogCommand {
    git_binary: String,
    repo_path: PathBuf,
    revisions: Vec<String>,
}

impl GitLogCommand {
    pub fn new(
        git_binary: impl Into<String>,
        repo_path: impl AsRef<Path>,
        revisions: Vec<String>,
    ) -> Self {
        let command = Self {
            git_binary: git_binary.into(),
            repo_path: repo_path.as_ref().to_path_buf(),
            revisions,
        };
        debug!(
            git = %command.git_binary,
            repo = %command.repo_path.display(),
            revisions = ?command.revisions,
            "created GitLogCommand"
        );
        command
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec!["log".to_string(), format!("--format={}", AUTHOR_FORMAT)];
        args.extend(self.revisions.iter().cloned());
        args
    }
}

impl HistorySource for GitLogCommand {
    fn describe(&self) -> String {
        format!(
            "{} log {} in {}",
            self.git_binary,
            self.revisions.join(" "),
            self.repo_path.display()
        )
    }

    #[instrument(skip(self), fields(repo = %self.repo_path.display()))]
    fn author_records(&self) -> Result<Vec<String>, HistoryError> {
        let args = self.args();
        debug!(cmd = ?format!("{} {}", self.git_binary, args.join(" ")), "running git command");

        let output = Command::new(&self.git_binary)
            .current_dir(&self.repo_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    HistoryError::BinaryNotFound(self.git_binary.clone())
                } else {
                    HistoryError::IoError(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(exit_code, %stderr, "git log failed");
            return Err(HistoryError::CommandFailed { exit_code, stderr });
        }

        let stdout = String::from_utf8(output.stdout)?;
        let records: Vec<String> = stdout.split('\n').map(str::to_string).collect();
        info!(records = records.len(), "exported author records");
        Ok(records)
    }
}
