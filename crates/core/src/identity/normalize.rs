//! Per-record normalization rules.
//!
//! Each rule is a plain string transform. Rules run in a fixed order and
//! normalizing an already-normalized record is a no-op. The correction
//! table is consulted again after an encoded-word repair, since stripping
//! the markers can expose a correction key.

use std::fmt;

use super::tables::ReferenceTables;

/// Leading marker left behind by a MIME encoded-word that was never decoded.
const ENCODED_WORD_PREFIX: &str = "=?UTF-8 ";
/// Closing marker of the same encoded-word.
const ENCODED_WORD_SUFFIX: &str = "?=";

/// Anonymized GitHub commit email domain.
const GITHUB_NOREPLY: &str = "@users.noreply.github.com";
/// Profile URL prefix substituted for the noreply address.
const GITHUB_PROFILE: &str = "<https://github.com/";

/// A rewrite rule that changed a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Exact match in the correction table.
    Correction,
    /// Undecoded `=?UTF-8 ...?=` markers stripped.
    EncodedWord,
    /// GitHub noreply address turned into a profile URL.
    GitHubNoreply,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Correction => "correction table",
            Self::EncodedWord => "encoded-word repair",
            Self::GitHubNoreply => "github noreply rewrite",
        })
    }
}

/// A record after rewriting, with the rules that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub identity: String,
    pub applied: Vec<Rule>,
}

/// Run every rewrite rule over `record`.
///
/// Returns `None` for an empty record, which carries no identity and is
/// skipped entirely.
pub fn normalize(record: &str, tables: &ReferenceTables<'_>) -> Option<Normalized> {
    if record.is_empty() {
        return None;
    }

    let mut applied = Vec::new();
    let mut identity = match tables.correction(record) {
        Some(corrected) => {
            applied.push(Rule::Correction);
            corrected.to_string()
        }
        None => record.to_string(),
    };

    if let Some(repaired) = repair_encoded_word(&identity) {
        applied.push(Rule::EncodedWord);
        identity = match tables.correction(&repaired) {
            Some(corrected) => {
                applied.push(Rule::Correction);
                corrected.to_string()
            }
            None => repaired,
        };
    }

    if let Some(rewritten) = rewrite_github_noreply(&identity) {
        applied.push(Rule::GitHubNoreply);
        identity = rewritten;
    }

    Some(Normalized { identity, applied })
}

/// `=?UTF-8 Michał Żukowski?=` becomes `Michał Żukowski`.
fn repair_encoded_word(record: &str) -> Option<String> {
    if !record.starts_with(ENCODED_WORD_PREFIX) {
        return None;
    }
    Some(
        record
            .replace(ENCODED_WORD_PREFIX, "")
            .replace(ENCODED_WORD_SUFFIX, ""),
    )
}

/// `Jane Doe <jdoe@users.noreply.github.com>` becomes
/// `Jane Doe <https://github.com/jdoe>`.
fn rewrite_github_noreply(record: &str) -> Option<String> {
    if !record.contains(GITHUB_NOREPLY) {
        return None;
    }
    Some(record.replace(GITHUB_NOREPLY, "").replace('<', GITHUB_PROFILE))
}
