//! Roster resolution.
//!
//! [`IdentityResolver`] folds a stream of raw `Name <email>` records into
//! an ordered [`Roster`]: normalize, drop blacklisted identities, collapse
//! duplicates, force in the patch authors, then sort by collation.

use std::collections::BTreeSet;

use tracing::{debug, info, instrument, trace};

use super::normalize::{normalize, Normalized, Rule};
use super::tables::{BlacklistEntry, ReferenceTables};
use crate::collation::Collator;
use crate::errors::TableError;

/// What the resolver does with a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition<'a> {
    /// Empty record, ignored.
    Skipped,
    /// Normalized to a blacklisted identity.
    Discarded {
        normalized: Normalized,
        entry: &'a BlacklistEntry,
    },
    /// Normalized identity goes into the roster.
    Kept(Normalized),
}

/// Counters collected over one resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Records read from the stream, empty ones included.
    pub records: usize,
    pub empty: usize,
    pub corrected: usize,
    pub encoded_word_repaired: usize,
    pub github_rewritten: usize,
    pub blacklisted: usize,
    /// Kept records whose identity was already in the working set.
    pub duplicates: usize,
    /// Patch authors that were not already present in the stream.
    pub patch_authors_added: usize,
}

/// The ordered, deduplicated list of identities to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    identities: Vec<String>,
    locale: String,
    stats: ResolveStats,
}

impl Roster {
    pub fn identities(&self) -> &[String] {
        &self.identities
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identities.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.identities.iter().any(|i| i == identity)
    }

    /// Collation locale the roster was sorted under.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn stats(&self) -> &ResolveStats {
        &self.stats
    }

    pub fn into_identities(self) -> Vec<String> {
        self.identities
    }
}

/// Turns raw author records into a [`Roster`].
#[derive(Debug, Clone)]
pub struct IdentityResolver<'a> {
    tables: ReferenceTables<'a>,
}

impl IdentityResolver<'static> {
    /// Resolver over the compiled-in tables.
    pub fn builtin() -> Result<Self, TableError> {
        Self::new(ReferenceTables::builtin())
    }
}

impl<'a> IdentityResolver<'a> {
    /// Create a resolver, rejecting inconsistent tables up front.
    pub fn new(tables: ReferenceTables<'a>) -> Result<Self, TableError> {
        tables.validate()?;
        debug!(
            blacklist = tables.blacklist.len(),
            patch_authors = tables.patch_authors.len(),
            corrections = tables.corrections.len(),
            "reference tables validated"
        );
        Ok(Self { tables })
    }

    pub fn tables(&self) -> &ReferenceTables<'a> {
        &self.tables
    }

    /// Decide what happens to a single record.
    pub fn classify(&self, record: &str) -> Disposition<'a> {
        let Some(normalized) = normalize(record, &self.tables) else {
            return Disposition::Skipped;
        };
        match self.tables.blacklisted(&normalized.identity) {
            Some(entry) => Disposition::Discarded { normalized, entry },
            None => Disposition::Kept(normalized),
        }
    }

    /// Resolve a record stream into a sorted roster.
    ///
    /// The blacklist only filters the stream; patch authors are added
    /// afterwards unconditionally.
    #[instrument(skip_all, fields(locale = collator.locale()))]
    pub fn resolve<I, S>(&self, records: I, collator: &Collator) -> Roster
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = ResolveStats::default();
        let mut working = BTreeSet::new();

        for record in records {
            let record = record.as_ref();
            stats.records += 1;

            let normalized = match self.classify(record) {
                Disposition::Skipped => {
                    stats.empty += 1;
                    continue;
                }
                Disposition::Discarded { normalized, entry } => {
                    trace!(identity = %normalized.identity, reason = %entry.reason, "discarded");
                    count_rules(&mut stats, &normalized);
                    stats.blacklisted += 1;
                    continue;
                }
                Disposition::Kept(normalized) => normalized,
            };

            count_rules(&mut stats, &normalized);
            if !working.insert(normalized.identity) {
                stats.duplicates += 1;
            }
        }

        for author in self.tables.patch_authors {
            if working.insert(author.identity.to_string()) {
                stats.patch_authors_added += 1;
            }
        }

        let mut identities: Vec<String> = working.into_iter().collect();
        collator.sort(&mut identities);

        info!(
            records = stats.records,
            blacklisted = stats.blacklisted,
            duplicates = stats.duplicates,
            patch_authors_added = stats.patch_authors_added,
            roster = identities.len(),
            "resolved contributor roster"
        );

        Roster {
            identities,
            locale: collator.locale().to_string(),
            stats,
        }
    }
}

fn count_rules(stats: &mut ResolveStats, normalized: &Normalized) {
    for rule in &normalized.applied {
        match rule {
            Rule::Correction => stats.corrected += 1,
            Rule::EncodedWord => stats.encoded_word_repaired += 1,
            Rule::GitHubNoreply => stats.github_rewritten += 1,
        }
    }
}
