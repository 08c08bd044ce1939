//! rostergen core library.
//!
//! Builds a project's `AUTHORS` file from its revision history: author
//! records are exported from git, consolidated into a deduplicated roster
//! by the identity resolver, ordered by locale-aware collation, and written
//! out between a fixed header and trailer.

pub mod authors_file;
pub mod collation;
pub mod config;
pub mod errors;
pub mod generator;
pub mod history;
pub mod identity;

// Re-exports for convenience.
pub use collation::Collator;
pub use config::RosterConfig;
pub use generator::Generator;
pub use identity::{IdentityResolver, Roster};
