//! Contributor identity consolidation.
//!
//! Raw `Name <email>` records go through a fixed rewrite pipeline
//! ([`normalize`]), are filtered against the compiled-in [`tables`], and are
//! folded into an ordered roster by the [`IdentityResolver`].

pub mod normalize;
pub mod resolver;
pub mod tables;

pub use normalize::{normalize, Normalized, Rule};
pub use resolver::{Disposition, IdentityResolver, ResolveStats, Roster};
pub use tables::{BlacklistEntry, BlacklistReason, Correction, PatchAuthor, ReferenceTables};
