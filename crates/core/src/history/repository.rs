//! In-process export via `git2`.

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Oid, Repository, Signature, Sort};
use tracing::{debug, info, instrument};

use super::{format_record, HistorySource};
use crate::errors::HistoryError;

/// Walks the given revisions with libgit2 and reads each commit's author
/// through the repository mailmap, matching `git log --format=%aN <%aE>`.
pub struct RepositoryHistory {
    repo: Repository,
    repo_path: PathBuf,
    revisions: Vec<String>,
}

impl RepositoryHistory {
    /// Open the repository at `repo_path`.
    pub fn open<P: AsRef<Path>>(repo_path: P, revisions: Vec<String>) -> Result<Self, HistoryError> {
        let path = repo_path.as_ref();
        info!(path = %path.display(), "opening git repository");
        let repo = Repository::open(path).map_err(|e| match e.code() {
            ErrorCode::NotFound => HistoryError::RepositoryNotFound(path.display().to_string()),
            _ => HistoryError::Git2Error(e),
        })?;
        Ok(Self {
            repo,
            repo_path: path.to_path_buf(),
            revisions,
        })
    }

    fn resolve_revision(&self, revision: &str) -> Result<Oid, HistoryError> {
        let object = self
            .repo
            .revparse_single(revision)
            .map_err(|_| HistoryError::RevisionNotFound(revision.to_string()))?;
        let commit = object
            .peel_to_commit()
            .map_err(|_| HistoryError::RevisionNotFound(revision.to_string()))?;
        Ok(commit.id())
    }
}

impl HistorySource for RepositoryHistory {
    fn describe(&self) -> String {
        format!(
            "libgit2 walk of {} in {}",
            self.revisions.join(" "),
            self.repo_path.display()
        )
    }

    #[instrument(skip(self), fields(repo = %self.repo_path.display()))]
    fn author_records(&self) -> Result<Vec<String>, HistoryError> {
        let mailmap = self.repo.mailmap()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        for revision in &self.revisions {
            let oid = self.resolve_revision(revision)?;
            debug!(revision = %revision, %oid, "pushing revision");
            revwalk.push(oid)?;
        }

        let mut records = Vec::new();
        for oid_result in revwalk {
            let commit = self.repo.find_commit(oid_result?)?;
            let author = commit.author_with_mailmap(&mailmap)?;
            records.push(author_record(&author));
        }

        info!(records = records.len(), "exported author records");
        Ok(records)
    }
}

/// Render a signature, decoding name and email as UTF-8 with replacement.
fn author_record(author: &Signature<'_>) -> String {
    format_record(
        &String::from_utf8_lossy(author.name_bytes()),
        &String::from_utf8_lossy(author.email_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_as(repo: &Repository, name: &str, email: &str, message: &str) -> Oid {
        let sig = Signature::now(name, email).unwrap();
        let tree_id = {
            let mut index = repo.index().unwrap();
            index.write_tree().unwrap()
        };
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().map(|h| h.peel_to_commit().unwrap());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[test]
    fn test_exports_one_record_per_commit() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_as(&repo, "Ada Lovelace", "ada@example.com", "one");
        commit_as(&repo, "Ada Lovelace", "ada@example.com", "two");
        commit_as(&repo, "Jane Doe", "jdoe@users.noreply.github.com", "three");

        let history = RepositoryHistory::open(dir.path(), vec!["HEAD".into()]).unwrap();
        let mut records = history.author_records().unwrap();
        records.sort();
        assert_eq!(
            records,
            [
                "Ada Lovelace <ada@example.com>",
                "Ada Lovelace <ada@example.com>",
                "Jane Doe <jdoe@users.noreply.github.com>",
            ]
        );
    }

    #[test]
    fn test_unknown_revision() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_as(&repo, "Ada", "ada@example.com", "init");

        let history = RepositoryHistory::open(dir.path(), vec!["no-such-branch".into()]).unwrap();
        assert!(matches!(
            history.author_records(),
            Err(HistoryError::RevisionNotFound(ref rev)) if rev == "no-such-branch"
        ));
    }

    #[test]
    fn test_repo_not_found() {
        assert!(matches!(
            RepositoryHistory::open("/nonexistent/rostergen", vec!["HEAD".into()]),
            Err(HistoryError::RepositoryNotFound(_))
        ));
    }

    #[test]
    fn test_plain_directory_is_not_a_repo() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RepositoryHistory::open(dir.path(), vec!["HEAD".into()]),
            Err(HistoryError::RepositoryNotFound(_))
        ));
    }

    #[test]
    fn test_broken_repo_is_not_reported_missing() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join(".git").join("config"), "[core\nbare = \n").unwrap();

        assert!(matches!(
            RepositoryHistory::open(dir.path(), vec!["HEAD".into()]),
            Err(HistoryError::Git2Error(_))
        ));
    }
}
