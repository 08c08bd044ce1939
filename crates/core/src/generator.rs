//! Export, resolve, publish.
//!
//! [`Generator`] ties a [`HistorySource`] to the [`IdentityResolver`] and
//! the AUTHORS file. The export always completes before resolution starts,
//! and nothing touches the output file unless the export succeeded.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::authors_file;
use crate::collation::Collator;
use crate::config::HistoryConfig;
use crate::errors::{CoreError, HistoryError};
use crate::history::{GitLogCommand, HistorySource, RepositoryHistory, SourceKind};
use crate::identity::{IdentityResolver, Roster};

/// Build the history source described by `config`.
pub fn open_source(config: &HistoryConfig) -> Result<Box<dyn HistorySource>, HistoryError> {
    let source: Box<dyn HistorySource> = match config.source {
        SourceKind::Command => Box::new(GitLogCommand::new(
            config.git_binary.clone(),
            &config.repo,
            config.revisions.clone(),
        )),
        SourceKind::Libgit2 => Box::new(RepositoryHistory::open(
            &config.repo,
            config.revisions.clone(),
        )?),
    };
    Ok(source)
}

/// Result of a `generate` run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub roster: Roster,
    pub written_to: PathBuf,
}

/// Result of comparing a fresh roster with the file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// The output file does not exist yet.
    pub missing: bool,
    /// Identities the file lacks.
    pub added: Vec<String>,
    /// Identities the file has but should not.
    pub removed: Vec<String>,
    /// Identities the file lists more than once, one entry per extra copy.
    pub duplicates: Vec<String>,
    /// Same identities, each listed once, in a different order.
    pub reordered: bool,
}

impl CheckReport {
    pub fn is_up_to_date(&self) -> bool {
        !self.missing
            && self.added.is_empty()
            && self.removed.is_empty()
            && self.duplicates.is_empty()
            && !self.reordered
    }
}

/// Produces rosters and keeps the AUTHORS file in sync with them.
pub struct Generator<'a> {
    resolver: IdentityResolver<'a>,
    collator: Collator,
}

impl<'a> Generator<'a> {
    pub fn new(resolver: IdentityResolver<'a>, collator: Collator) -> Self {
        Self { resolver, collator }
    }

    pub fn collator(&self) -> &Collator {
        &self.collator
    }

    /// Export every record from `source`, then resolve them.
    #[instrument(skip_all, fields(source = %source.describe()))]
    pub fn build(&self, source: &dyn HistorySource) -> Result<Roster, HistoryError> {
        let records = source.author_records()?;
        Ok(self.resolver.resolve(records, &self.collator))
    }

    /// Full file contents for `roster`.
    pub fn render(&self, roster: &Roster) -> String {
        authors_file::render(roster.iter())
    }

    /// Build the roster and replace `output` with it.
    ///
    /// A failed export returns before `output` is opened.
    pub fn generate(
        &self,
        source: &dyn HistorySource,
        output: &Path,
    ) -> Result<GenerateReport, CoreError> {
        let roster = self.build(source)?;
        authors_file::write(output, &self.render(&roster))?;
        info!(path = %output.display(), identities = roster.len(), "generated AUTHORS file");
        Ok(GenerateReport {
            roster,
            written_to: output.to_path_buf(),
        })
    }

    /// Build the roster and compare it with the existing `output`.
    pub fn check(&self, source: &dyn HistorySource, output: &Path) -> Result<CheckReport, CoreError> {
        let roster = self.build(source)?;
        let fresh: Vec<String> = roster.iter().map(str::to_string).collect();

        let Some(existing) = authors_file::read(output)? else {
            warn!(path = %output.display(), "AUTHORS file does not exist");
            return Ok(CheckReport {
                missing: true,
                added: fresh,
                removed: Vec::new(),
                duplicates: Vec::new(),
                reordered: false,
            });
        };

        let report = compare(&existing, &fresh);
        if !report.is_up_to_date() {
            warn!(
                path = %output.display(),
                added = report.added.len(),
                removed = report.removed.len(),
                duplicates = report.duplicates.len(),
                reordered = report.reordered,
                "AUTHORS file is stale"
            );
        }
        Ok(report)
    }
}

fn compare(existing: &[String], fresh: &[String]) -> CheckReport {
    let mut old: BTreeSet<&str> = BTreeSet::new();
    let duplicates: Vec<String> = existing
        .iter()
        .filter(|i| !old.insert(i.as_str()))
        .cloned()
        .collect();
    let new: BTreeSet<&str> = fresh.iter().map(String::as_str).collect();

    let added: Vec<String> = fresh
        .iter()
        .filter(|i| !old.contains(i.as_str()))
        .cloned()
        .collect();
    let removed: Vec<String> = existing
        .iter()
        .filter(|i| !new.contains(i.as_str()))
        .cloned()
        .collect();
    let reordered =
        added.is_empty() && removed.is_empty() && duplicates.is_empty() && existing != fresh;

    CheckReport {
        missing: false,
        added,
        removed,
        duplicates,
        reordered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compare_identical() {
        let report = compare(&owned(&["a", "b"]), &owned(&["a", "b"]));
        assert!(report.is_up_to_date());
    }

    #[test]
    fn test_compare_added_and_removed() {
        let report = compare(&owned(&["a", "old"]), &owned(&["a", "new"]));
        assert_eq!(report.added, ["new"]);
        assert_eq!(report.removed, ["old"]);
        assert!(!report.reordered);
        assert!(!report.is_up_to_date());
    }

    #[test]
    fn test_compare_reordered() {
        let report = compare(&owned(&["b", "a"]), &owned(&["a", "b"]));
        assert!(report.reordered);
        assert!(!report.is_up_to_date());
    }

    #[test]
    fn test_compare_duplicate_is_not_reordering() {
        let report = compare(&owned(&["a", "b", "b"]), &owned(&["a", "b"]));
        assert_eq!(report.duplicates, ["b"]);
        assert!(report.added.is_empty());
        assert!(report.removed.is_empty());
        assert!(!report.reordered);
        assert!(!report.is_up_to_date());
    }

    #[test]
    fn test_open_source_command() {
        let config = HistoryConfig::default();
        let source = open_source(&config).unwrap();
        assert!(source.describe().starts_with("git log master 1.2.x"));
    }

    #[test]
    fn test_open_source_libgit2_missing_repo() {
        let config = HistoryConfig {
            repo: PathBuf::from("/nonexistent/rostergen"),
            source: SourceKind::Libgit2,
            ..Default::default()
        };
        assert!(matches!(
            open_source(&config),
            Err(HistoryError::RepositoryNotFound(_))
        ));
    }
}
