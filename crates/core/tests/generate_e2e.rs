//! End-to-end tests for AUTHORS generation.
//!
//! These tests exercise the real `Generator` with:
//! - Local git repositories built with `git2` (two branches, a mailmap)
//! - Both history sources: the `git` binary and libgit2
//! - Real AUTHORS files in temporary directories
//!
//! Tests that need the `git` binary skip gracefully if it is not installed.

use std::path::Path;
use std::process::Command;

use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

use rostergen_core::authors_file;
use rostergen_core::collation::Collator;
use rostergen_core::errors::{CoreError, HistoryError};
use rostergen_core::generator::Generator;
use rostergen_core::history::{GitLogCommand, HistorySource, RepositoryHistory};
use rostergen_core::identity::tables::PATCH_AUTHORS;
use rostergen_core::identity::IdentityResolver;

// ===========================================================================
// Helpers
// ===========================================================================

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Commit an empty tree on `branch`, creating the branch from `base` if it
/// does not exist yet.
fn commit_on(repo: &Repository, branch: &str, base: Option<Oid>, author: (&str, &str)) -> Oid {
    let sig = Signature::now(author.0, author.1).unwrap();
    let committer = Signature::now("Release Bot", "release@example.com").unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let refname = format!("refs/heads/{}", branch);
    let parent_id = repo
        .find_reference(&refname)
        .ok()
        .and_then(|r| r.target())
        .or(base);
    let parent = parent_id.map(|id| repo.find_commit(id).unwrap());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some(&refname), &sig, &committer, "change", &tree, &parents)
        .unwrap()
}

/// A repository with a `master` line and a `1.2.x` line forked from its
/// first commit, plus a `.mailmap` folding an old address.
fn sample_repo() -> (TempDir, Repository) {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    let root = commit_on(&repo, "master", None, ("Ada Lovelace", "ada@example.com"));
    commit_on(&repo, "master", None, ("Ada Lovelace", "ada@example.com"));
    commit_on(&repo, "master", None, ("Jane Doe", "jdoe@users.noreply.github.com"));
    commit_on(&repo, "master", None, ("zapman", "unknown"));
    commit_on(
        &repo,
        "master",
        None,
        ("MumbleTransifexBot", "mumbletransifexbot@mumble.info"),
    );
    commit_on(&repo, "master", None, ("Ada", "ada@old.example.com"));

    commit_on(&repo, "1.2.x", Some(root), ("Émile Zola", "emile@example.com"));
    commit_on(
        &repo,
        "1.2.x",
        Some(root),
        ("Derrick Dymock", "derrick@puppetlabs.com"),
    );
    commit_on(&repo, "1.2.x", Some(root), ("Stefan H", "dd0t@users.sourceforge.net"));

    std::fs::write(
        dir.path().join(".mailmap"),
        "Ada Lovelace <ada@example.com> <ada@old.example.com>\n",
    )
    .unwrap();

    (dir, repo)
}

/// A UTF-8 locale whose collation is not byte order, if one is installed.
fn natural_locale_available() -> Option<Collator> {
    ["en_US.UTF-8", "en_US.utf8", "de_DE.UTF-8", "de_DE.utf8"]
        .into_iter()
        .find_map(|name| Collator::from_locale(name).ok())
}

fn revisions() -> Vec<String> {
    vec!["master".into(), "1.2.x".into()]
}

fn generator() -> Generator<'static> {
    Generator::new(IdentityResolver::builtin().unwrap(), Collator::ordinal())
}

fn expected_from_stream() -> [&'static str; 4] {
    [
        "Ada Lovelace <ada@example.com>",
        "Derrick Dymock <actown@gmail.com>",
        "Jane Doe <https://github.com/jdoe>",
        "zapman",
    ]
}

/// Always fails, like `git log` exiting non-zero.
struct FailingSource;

impl HistorySource for FailingSource {
    fn describe(&self) -> String {
        "failing source".into()
    }

    fn author_records(&self) -> Result<Vec<String>, HistoryError> {
        Err(HistoryError::CommandFailed {
            exit_code: 128,
            stderr: "fatal: not a git repository".into(),
        })
    }
}

fn assert_roster_shape(lines: &[String]) {
    for identity in expected_from_stream() {
        assert_eq!(
            lines.iter().filter(|l| l.as_str() == identity).count(),
            1,
            "expected exactly one {:?}",
            identity
        );
    }
    assert!(lines.iter().any(|l| l == "Émile Zola <emile@example.com>"));
    for author in PATCH_AUTHORS {
        assert!(lines.iter().any(|l| l == author.identity), "missing {}", author.identity);
    }
    assert!(!lines.iter().any(|l| l.contains("MumbleTransifexBot")));
    assert!(!lines.iter().any(|l| l.starts_with("Stefan H <")));
    assert!(!lines.iter().any(|l| l.contains("ada@old.example.com")));

    let mut sorted = lines.to_vec();
    sorted.sort();
    assert_eq!(lines, sorted.as_slice(), "ordinal collation is byte order");
}

// ===========================================================================
// Tests
// ===========================================================================

#[test]
fn test_libgit2_source_end_to_end() {
    let (dir, _repo) = sample_repo();
    let output = dir.path().join("AUTHORS");

    let source = RepositoryHistory::open(dir.path(), revisions()).unwrap();
    let report = generator().generate(&source, &output).unwrap();
    assert_eq!(report.written_to, output);

    let lines = authors_file::read(&output).unwrap().expect("file written");
    assert_roster_shape(&lines);
    assert_eq!(lines.len(), report.roster.len());
    assert_eq!(report.roster.stats().blacklisted, 2);
}

#[test]
fn test_command_source_end_to_end() {
    if !git_available() {
        eprintln!("skipping: git binary not available");
        return;
    }
    let (dir, _repo) = sample_repo();
    let output = dir.path().join("AUTHORS");

    let source = GitLogCommand::new("git", dir.path(), revisions());
    generator().generate(&source, &output).unwrap();

    let lines = authors_file::read(&output).unwrap().expect("file written");
    assert_roster_shape(&lines);
}

#[test]
fn test_sources_agree() {
    if !git_available() {
        eprintln!("skipping: git binary not available");
        return;
    }
    let (dir, _repo) = sample_repo();
    let gen = generator();

    let via_command = gen
        .build(&GitLogCommand::new("git", dir.path(), revisions()))
        .unwrap();
    let via_libgit2 = gen
        .build(&RepositoryHistory::open(dir.path(), revisions()).unwrap())
        .unwrap();
    assert_eq!(via_command.identities(), via_libgit2.identities());
}

#[test]
fn test_runs_are_byte_identical() {
    let (dir, _repo) = sample_repo();
    let first = dir.path().join("AUTHORS.1");
    let second = dir.path().join("AUTHORS.2");

    let gen = generator();
    let source = RepositoryHistory::open(dir.path(), revisions()).unwrap();
    gen.generate(&source, &first).unwrap();
    gen.generate(&source, &second).unwrap();

    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn test_failed_export_leaves_existing_file_untouched() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("AUTHORS");
    std::fs::write(&output, "previous contents\n").unwrap();

    let err = generator().generate(&FailingSource, &output).unwrap_err();
    assert!(matches!(
        err,
        CoreError::History(HistoryError::CommandFailed { exit_code: 128, .. })
    ));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous contents\n");
}

#[test]
fn test_failed_export_creates_no_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("AUTHORS");

    assert!(generator().generate(&FailingSource, &output).is_err());
    assert!(!output.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unknown_branch_is_fatal_for_command_source() {
    if !git_available() {
        eprintln!("skipping: git binary not available");
        return;
    }
    let (dir, _repo) = sample_repo();
    let output = dir.path().join("AUTHORS");

    let source = GitLogCommand::new("git", dir.path(), vec!["master".into(), "no-such".into()]);
    let err = generator().generate(&source, &output).unwrap_err();
    match err {
        CoreError::History(HistoryError::CommandFailed { exit_code, stderr }) => {
            assert_ne!(exit_code, 0);
            assert!(!stderr.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn test_check_reports_stale_file() {
    let (dir, _repo) = sample_repo();
    let output = dir.path().join("AUTHORS");
    let gen = generator();
    let source = RepositoryHistory::open(dir.path(), revisions()).unwrap();

    let missing = gen.check(&source, &output).unwrap();
    assert!(missing.missing);
    assert!(!missing.is_up_to_date());

    gen.generate(&source, &output).unwrap();
    assert!(gen.check(&source, &output).unwrap().is_up_to_date());

    let mut lines = authors_file::read(&output).unwrap().unwrap();
    lines.retain(|l| l != "zapman");
    lines.push("Someone Gone <gone@example.com>".into());
    std::fs::write(&output, authors_file::render(lines.iter().map(String::as_str))).unwrap();

    let stale = gen.check(&source, &output).unwrap();
    assert_eq!(stale.added, ["zapman"]);
    assert_eq!(stale.removed, ["Someone Gone <gone@example.com>"]);
}

#[test]
fn test_empty_history_still_lists_patch_authors() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("AUTHORS");

    struct EmptySource;
    impl HistorySource for EmptySource {
        fn describe(&self) -> String {
            "empty".into()
        }
        fn author_records(&self) -> Result<Vec<String>, HistoryError> {
            Ok(vec![String::new()])
        }
    }

    let report = generator().generate(&EmptySource, &output).unwrap();
    assert_eq!(report.roster.len(), PATCH_AUTHORS.len());
    assert!(Path::new(&output).exists());
}

#[cfg(unix)]
#[test]
fn test_locale_collation_end_to_end() {
    // The only test in this binary that changes the process locale.
    let Some(collator) = natural_locale_available() else {
        eprintln!("skipping: no en_US/de_DE UTF-8 locale installed");
        return;
    };
    let (dir, _repo) = sample_repo();
    let output = dir.path().join("AUTHORS");

    let gen = Generator::new(IdentityResolver::builtin().unwrap(), collator);
    let source = RepositoryHistory::open(dir.path(), revisions()).unwrap();
    gen.generate(&source, &output).unwrap();

    let lines = authors_file::read(&output).unwrap().expect("file written");
    let position = |identity: &str| lines.iter().position(|l| l == identity).unwrap();
    let emile = position("Émile Zola <emile@example.com>");
    assert!(position("Derrick Dymock <actown@gmail.com>") < emile);
    assert!(emile < position("Jane Doe <https://github.com/jdoe>"));

    for pair in lines.windows(2) {
        assert_ne!(
            gen.collator().compare(&pair[0], &pair[1]),
            std::cmp::Ordering::Greater,
            "{:?} sorted before {:?}",
            pair[0],
            pair[1]
        );
    }
}
