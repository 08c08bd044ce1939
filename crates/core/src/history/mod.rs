//! Exporting author records from revision history.
//!
//! A [`HistorySource`] produces one `Name <email>` record per commit across
//! a set of revisions. The export runs to completion before anything is
//! resolved; any failure is fatal.

pub mod command;
pub mod repository;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::HistoryError;

pub use command::GitLogCommand;
pub use repository::RepositoryHistory;

/// Format string handed to `git log`: mailmapped author name and email.
pub const AUTHOR_FORMAT: &str = "%aN <%aE>";

/// Where author records come from.
pub trait HistorySource {
    /// Short description for logs and summaries.
    fn describe(&self) -> String;

    /// Export every author record, one per commit.
    fn author_records(&self) -> Result<Vec<String>, HistoryError>;
}

/// Which [`HistorySource`] implementation to use.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Run the `git` binary.
    #[default]
    Command,
    /// Walk the repository in-process with libgit2.
    Libgit2,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Command => "command",
            Self::Libgit2 => "libgit2",
        })
    }
}

/// Format a single author record.
pub fn format_record(name: &str, email: &str) -> String {
    format!("{} <{}>", name, email)
}
