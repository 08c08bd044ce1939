//! rostergen command-line tool.
//!
//! Generates the project's `AUTHORS` file from git history, checks an
//! existing file for staleness, and explains how individual author records
//! are treated.

mod explain;
mod style;
mod tables;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use rostergen_core::collation::Collator;
use rostergen_core::config::RosterConfig;
use rostergen_core::generator::{open_source, CheckReport, Generator};
use rostergen_core::history::SourceKind;
use rostergen_core::identity::{IdentityResolver, Roster};

/// Config file picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG: &str = "rostergen.toml";

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Generate a deduplicated, locale-sorted AUTHORS file from git history.
#[derive(Parser, Debug)]
#[command(name = "rostergen", version, about)]
struct Cli {
    /// Path to the TOML configuration file [default: ./rostergen.toml if present].
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export history, resolve the roster, and write the AUTHORS file.
    Generate {
        #[command(flatten)]
        selection: Selection,

        /// Print the file to stdout instead of writing it.
        #[arg(long)]
        stdout: bool,
    },

    /// Regenerate in memory and compare with the existing AUTHORS file.
    /// Exits non-zero when the file is missing or stale.
    Check {
        #[command(flatten)]
        selection: Selection,
    },

    /// Show how individual author records are normalized and filtered.
    Explain {
        /// Raw `Name <email>` records.
        #[arg(required = true)]
        records: Vec<String>,
    },

    /// List the compiled-in blacklist, patch authors, and corrections.
    Tables,

    /// Write a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Overrides for the `[history]`, `[output]`, and `[collation]` settings.
#[derive(Args, Debug)]
struct Selection {
    /// Path to the git repository.
    #[arg(long)]
    repo: Option<PathBuf>,

    /// Revision to export (repeatable). Replaces the configured list.
    #[arg(long = "rev", value_name = "REV")]
    revisions: Vec<String>,

    /// How to read history.
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// `git` executable for the command source.
    #[arg(long)]
    git_binary: Option<String>,

    /// AUTHORS file path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Collation locale (empty = from environment, `C` = byte order).
    #[arg(long, conflicts_with = "ordinal")]
    locale: Option<String>,

    /// Sort by byte order without touching the process locale.
    #[arg(long)]
    ordinal: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SourceArg {
    /// Run `git log`.
    Command,
    /// Walk the repository with libgit2.
    Libgit2,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Command => SourceKind::Command,
            SourceArg::Libgit2 => SourceKind::Libgit2,
        }
    }
}

impl Selection {
    fn apply(&self, config: &mut RosterConfig) {
        if let Some(repo) = &self.repo {
            config.history.repo = repo.clone();
        }
        if !self.revisions.is_empty() {
            config.history.revisions = self.revisions.clone();
        }
        if let Some(source) = self.source {
            config.history.source = source.into();
        }
        if let Some(git) = &self.git_binary {
            config.history.git_binary = git.clone();
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(locale) = &self.locale {
            config.collation.locale = locale.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", style::error(&format!("Error: {:#}", e)));
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config, cli.verbose);

    match run(cli.command, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", style::error(&format!("Error: {:#}", e)));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &RosterConfig, verbose: u8) {
    let fallback = match verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands, mut config: RosterConfig) -> Result<ExitCode> {
    match command {
        Commands::Generate { selection, stdout } => {
            selection.apply(&mut config);
            config.validate().context("invalid configuration")?;
            cmd_generate(&config, selection.ordinal, stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { selection } => {
            selection.apply(&mut config);
            config.validate().context("invalid configuration")?;
            cmd_check(&config, selection.ordinal)
        }
        Commands::Explain { records } => {
            let resolver = builtin_resolver()?;
            explain::run_explain(&resolver, &records);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Tables => {
            tables::run_tables(builtin_resolver()?.tables());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { output, force } => {
            cmd_init(&output, force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

/// An explicit `--config` must exist; the default path is optional.
fn load_config(path: Option<&Path>) -> Result<RosterConfig> {
    match path {
        Some(path) => RosterConfig::load_and_validate(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => RosterConfig::load_and_validate(DEFAULT_CONFIG)
            .with_context(|| format!("failed to load configuration from {}", DEFAULT_CONFIG)),
        None => Ok(RosterConfig::default()),
    }
}

fn builtin_resolver() -> Result<IdentityResolver<'static>> {
    IdentityResolver::builtin().context("compiled-in reference tables are inconsistent")
}

fn build_generator(config: &RosterConfig, ordinal: bool) -> Result<Generator<'static>> {
    let resolver = builtin_resolver()?;
    let collator = if ordinal {
        Collator::ordinal()
    } else {
        Collator::from_locale(&config.collation.locale)
            .context("failed to select collation locale")?
    };
    Ok(Generator::new(resolver, collator))
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_generate(config: &RosterConfig, ordinal: bool, to_stdout: bool) -> Result<()> {
    let generator = build_generator(config, ordinal)?;
    let source = open_source(&config.history).context("failed to open history source")?;

    if to_stdout {
        let roster = generator
            .build(source.as_ref())
            .context("failed to export author history")?;
        print!("{}", generator.render(&roster));
        return Ok(());
    }

    let report = generator
        .generate(source.as_ref(), &config.output.path)
        .context("failed to generate AUTHORS file")?;

    eprintln!(
        "{}",
        style::success(&format!(
            "Wrote {} identities to {}",
            report.roster.len(),
            report.written_to.display()
        ))
    );
    print_summary(&report.roster, &source.describe());
    Ok(())
}

fn print_summary(roster: &Roster, source: &str) {
    let stats = roster.stats();
    eprintln!("  {}", style::dim(&format!("source     : {}", source)));
    eprintln!("  {}", style::dim(&format!("locale     : {}", roster.locale())));
    eprintln!(
        "  {}",
        style::dim(&format!(
            "records    : {} ({} empty)",
            stats.records, stats.empty
        ))
    );
    eprintln!(
        "  {}",
        style::dim(&format!(
            "rewritten  : {} corrected, {} encoded-word, {} github",
            stats.corrected, stats.encoded_word_repaired, stats.github_rewritten
        ))
    );
    eprintln!(
        "  {}",
        style::dim(&format!(
            "dropped    : {} blacklisted, {} duplicates",
            stats.blacklisted, stats.duplicates
        ))
    );
    eprintln!(
        "  {}",
        style::dim(&format!("patch added: {}", stats.patch_authors_added))
    );
}

fn cmd_check(config: &RosterConfig, ordinal: bool) -> Result<ExitCode> {
    let generator = build_generator(config, ordinal)?;
    let source = open_source(&config.history).context("failed to open history source")?;
    let path = &config.output.path;

    let report = generator
        .check(source.as_ref(), path)
        .with_context(|| format!("failed to check {}", path.display()))?;

    print_check(&report, path);
    Ok(if report.is_up_to_date() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_check(report: &CheckReport, path: &Path) {
    if report.is_up_to_date() {
        println!("{}", style::success(&format!("{} is up to date", path.display())));
        return;
    }

    if report.missing {
        println!(
            "{}",
            style::warn(&format!(
                "{} does not exist ({} identities would be written)",
                path.display(),
                report.added.len()
            ))
        );
        return;
    }

    println!("{}", style::warn(&format!("{} is stale", path.display())));
    for identity in &report.added {
        println!("  {}", style::added(identity));
    }
    for identity in &report.removed {
        println!("  {}", style::removed(identity));
    }
    for identity in &report.duplicates {
        println!("  {}", style::removed(&format!("{} (duplicate)", identity)));
    }
    if report.reordered {
        println!("  {}", style::dim("same identities, different order"));
    }
    println!();
    println!("Run 'rostergen generate' to update it.");
}

fn cmd_init(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let text = RosterConfig::default()
        .to_toml()
        .context("failed to render default configuration")?;
    let contents = format!("# rostergen configuration\n\n{}", text);
    std::fs::write(output, contents)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "{}",
        style::success(&format!(
            "Default configuration written to {}",
            output.display()
        ))
    );
    Ok(())
}
