//! Compiled-in reference tables.
//!
//! These encode historical data-quality knowledge about the project's
//! revision history: identities to drop ([`BLACKLIST`]), identities to force
//! in ([`PATCH_AUTHORS`]), and exact-match fixes for malformed records
//! ([`CORRECTIONS`]). They are never mutated at runtime.

use std::collections::HashSet;
use std::fmt;

use crate::errors::TableError;

/// Why an identity is blacklisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlacklistReason {
    /// Placeholder or unknown commit metadata.
    Unknown,
    /// Automated account.
    Bot,
    /// Another spelling of a canonical identity that is already listed.
    AliasOf(&'static str),
    /// Anything else, with a short note.
    Other(&'static str),
}

impl fmt::Display for BlacklistReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown commit metadata"),
            Self::Bot => f.write_str("bot"),
            Self::AliasOf(canonical) => write!(f, "alias of {}", canonical),
            Self::Other(note) => f.write_str(note),
        }
    }
}

/// A blacklisted identity string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlacklistEntry {
    pub identity: &'static str,
    pub reason: BlacklistReason,
}

/// An author whose patch landed under someone else's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchAuthor {
    pub identity: &'static str,
    /// Commit the authorship was recovered from.
    pub commit: &'static str,
}

/// An exact malformed record and its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    pub malformed: &'static str,
    pub corrected: &'static str,
}

const fn deny(identity: &'static str, reason: BlacklistReason) -> BlacklistEntry {
    BlacklistEntry { identity, reason }
}

const fn patch(identity: &'static str, commit: &'static str) -> PatchAuthor {
    PatchAuthor { identity, commit }
}

use BlacklistReason::{AliasOf, Bot, Other, Unknown};

const SUMOWSKI: &str = "Bartek \"stranded\" Sumowski <sumowski@gmail.com>";
const NATVIG: &str = "Thorvald Natvig <slicer@users.sourceforge.net>";
const HACKER: &str = "Stefan Hacker <dd0t@users.sourceforge.net>";
const ZUKOWSKI: &str = "Michał \"Zuko\" Żukowski <zuczeq@gmail.com>";
const RECIO: &str = "Álvaro Manuel Recio Pérez <naproxeno@users.sourceforge.net>";
const FRASER: &str = "Jamie Fraser <fwagglechop@gmail.com>";
const KRAUTZ: &str = "Mikkel Krautz <mikkel@krautz.dk>";
const NATENOM: &str = "Natenom <natenom@natenom.com>";
const HANSEN: &str = "Jonathan E. Hansen <zentriple@users.sourceforge.net>";
const TSINMAN: &str = "Semion Tsinman <Necromancer3333@gmail.com>";
const HARU_ARC: &str = "haru_arc <arcenciel@users.sf.net>";

/// Identities that must never appear in the roster.
pub const BLACKLIST: &[BlacklistEntry] = &[
    deny("(no author) <(no author)@05730e5d-ab1b-0410-a4ac-84af385074fa>", Unknown),
    deny("root <root@DiskStation.(none)>", Unknown),
    deny("unknown <LoL@.(none)>", Unknown),
    deny("unknown <d0t@.(none)>", Unknown),
    deny("MumbleTransifexBot <mumbletransifexbot@mumble.info>", Bot),
    deny("Bartek <sumowski@users.sourceforge.net>", AliasOf(SUMOWSKI)),
    deny("Bartek Sumowksi <sumowski@gmail.com>", AliasOf(SUMOWSKI)),
    deny("Benjamin Jemlich <pcgod@gmx.net>", AliasOf("Benjamin Jemlich <pcgod@users.sourceforge.net>")),
    deny("EarlOfWenc <user@localhost>", AliasOf("EarlOfWenc <lorenz.schwittmann@gmail.com>")),
    deny("Jamie Fraser <jamie.f@mumbledog.com>", AliasOf(FRASER)),
    deny("Jamie Fraser <jamie.f@sabrienix.com>", AliasOf(FRASER)),
    deny("Álvaro M. Recio Pérez <naproxeno@users.sourceforge.net>", AliasOf(RECIO)),
    deny("Álvaro Manuel Recio Pérez <naproxeno@kepis.(none)>", AliasOf(RECIO)),
    deny("Thorvald Natvig <github@natvig.com>", AliasOf(NATVIG)),
    deny("Thorvald Natvig <thorvald@-e false.(none)>", AliasOf(NATVIG)),
    deny("Thorvald Natvig <thorvald@debian.localdomain>", AliasOf(NATVIG)),
    deny("Thorvald Natvig <thorvald@natvig.com>", AliasOf(NATVIG)),
    deny("Spaccaossi <spaccaossi@users.sourceforge.net>", AliasOf("Spaccaossi <spaccaossi@gmail.com>")),
    deny("Stefan H <dd0t@users.sourceforge.net>", AliasOf(HACKER)),
    deny("Stefan Hacker <hacker.stefan@googlemail.com>", AliasOf(HACKER)),
    deny("Stefan Hacker <hast@hast-desktop.(none)>", AliasOf(HACKER)),
    deny("Michał Żukowski <zuczeq@gmail.com>", AliasOf(ZUKOWSKI)),
    deny("Zukowski Michal <zuczeq@gmail.com>", AliasOf(ZUKOWSKI)),
    deny("Żukowski Michał <zuczeq@gmail.com>", AliasOf(ZUKOWSKI)),
    deny("zuczeq <zuczeq@users.sourceforge.net>", AliasOf(ZUKOWSKI)),
    deny("Zuko <zuczeq@gmail.com>", AliasOf(ZUKOWSKI)),
    deny(
        "Michael Ziegler and Natenom <natenom@googlemail.com>",
        Other("two authors in one record, both listed separately"),
    ),
    deny("Netbios Domain Administrator <admin@gameserver2.(none)>", Other("machine account")),
    deny("Mikkel <mikkel@krautz.dk>", AliasOf(KRAUTZ)),
    deny("Mikkel Krautz <mkrautz@users.sourceforge.net>", AliasOf(KRAUTZ)),
    deny("morris <tkmorris@users.sourceforge.net>", AliasOf("tkmorris <mauricioarozi@gmail.com>")),
    deny("bendem <bendembd@gmail.com>", AliasOf("bendem <online@bendem.be>")),
    deny("Arrai <arrai@users.sourceforge.net>", AliasOf("arrai <array.of.intellect@gmail.com>")),
    deny("Joël Troch <https://github.com/JoelTroch>", AliasOf("Joël Troch <joel.troch62@gmail.com>")),
    deny(
        "Matthias Vogelgesang <m0ta@users.sourceforge.net>",
        AliasOf("Matthias Vogelgesang <matthias.vogelgesang@gmail.com>"),
    ),
    deny("Snares <snares@users.sourceforge.net>", AliasOf("Tuck Therebelos <snares@users.sourceforge.net>")),
    deny("Natenom <natenom@googlemail.com>", AliasOf(NATENOM)),
    deny("Natenom <natenom@natenom.name>", AliasOf(NATENOM)),
    deny("Arcenciel <arcenciel@users.sourceforge.net>", AliasOf(HARU_ARC)),
    deny("arcenciel <arcenciel@users.sourceforge.net>", AliasOf(HARU_ARC)),
    deny("Jonathan <zentriple@users.sourceforge.net>", AliasOf(HANSEN)),
    deny("zentriple <zentriple@users.sourceforge.net>", AliasOf(HANSEN)),
    deny("Zentriple <zentriple@users.sourceforge.net>", AliasOf(HANSEN)),
    deny("Patrick Matthäi <the-me88@users.sourceforge.net>", AliasOf("Patrick Matthäi <pmatthaei@debian.org>")),
    deny("Jan Klass <kissaki0@gmail.com>", AliasOf("Jan Klass <kissaki@gmx.de>")),
    deny("Necromancer <necromancer3@users.sourceforge.net>", AliasOf(TSINMAN)),
    deny("Necromancer <necro3@users.sourceforge.net>", AliasOf(TSINMAN)),
    deny("svenne33 <svenne33@users.sourceforge.net>", AliasOf("Svenne33 <svenne33@users.sourceforge.net>")),
    deny(
        "lolo_32 <Alex@.(none)>",
        Other("probable alias of BAYSSE Laurent <lolo_32@users.sourceforge.net>"),
    ),
    deny("SuperNascher <kevin@nascher.org>", AliasOf("Kevin Rohland <kevin@nascher.org>")),
];

/// Authors whose patches were applied while the project used SVN. The patch
/// content is in git, but the git author metadata names whoever applied it.
/// Compiled by hand from the history.
pub const PATCH_AUTHORS: &[PatchAuthor] = &[
    patch("Opalium <opalium@users.sourceforge.net>", "6cc47c35cac16877e119cef35d9255918849495d"),
    patch("Marc Deslauriers <marc.deslauriers@canonical.com>", "d16876d804d028153f37f4f8aff770469edf6997"),
    patch("Otto Allmendinger <oallmendinger@users.sourceforge.net>", "bd690db64560cd1785c9aaed86547ffe681b60db"),
    patch("ozon <mumble-tower@users.sourceforge.net>", "143589b1a8f264026c12f974e084030eaba51428"),
    patch("Cesare Tirabassi <cesare.tirabassi@gmail.com>", "1b048e6c1516eee4f932f9f9eeeb6b13de5d15cb"),
    patch("Stefan Gehn <mETz@gehn.net>", "ddfc033c3c20a67994ef6329691f2a3616a346c0"),
    patch(
        "Thibault Capdevielled <theblackstorm@userse.sourceforge.net>",
        "c317abec96d9007cc7ca95f54e5193b48268e7ad",
    ),
    patch("Jan Braun <janbraun@gmx.net>", "51510ff8f744adc281c4eca6c0fdef5ba2ab9cbb"),
    patch("Balazs Nagy <julian7@users.sourceforge.net>", "887368a9fb5a6d35c3750a5f48d1293d4fc58df3"),
    patch("Jerome Vidal <jerhum@users.sourceforge.net>", "7814dba5f86b69f446e45c639ae3db7adfaf9c48"),
    patch("Matt M. <mokomull@users.sourceforge.net>", "82e4966bba8d390e22f43d15764c6c272dd91e2b"),
    patch("mystic_sam <mystic_sam@users.sourceforge.net>", "b40cf89632a8ac46ac92d8a7fa4091c7d035122a"),
    patch("Entitaet <entitaet@users.sourceforge.net>", "2cecce4270555e4b7fc4c9e3f39c064f72247667"),
    patch("Jakob Dettner <jakobdettner@users.sourceforge.net>", "2a6ae358c37ff0c3570ebcb8466aacd673352b95"),
    patch("derandi <derandi@users.sourceforge.net>", "b8ff5eed6ef0835b4db2ed160f1e41a045d16db4"),
    patch("Prosper_Spurius <prosper_spurius@users.sourceforge.net>", "b2f70a7802e90eea0d04eef7edc0a52178fda753"),
    patch("Leszek Godlewski <inequation@users.sourceforge.net>", "9952748561122969d02f2d9ebc49b001ffe82823"),
    patch("Mark Schreiber <mark7@users.sourceforge.net>", "2c0a0ff8244966be4d058742a3c01859bad44b37"),
    patch(
        "Sebastian Schlingmann <mit_service@users.sourceforge.net>",
        "39005601bb92b8f994e8e50887b3bb6535a2c305",
    ),
    patch("Arseniy Lartsev <ars3niy@users.sourceforge.net>", "d2b735799ca37d957def45816766ef266c2b7057"),
    patch("javitonino <javitonino@users.sourceforge.net>", "12191680451f0f9d31526908a9c0ded669f05cb8"),
    patch("Thibaut Girka", "82ffa8948f06f87f58ca7072960d7c54729e7e8b"),
    patch("Jérôme \"buggerone\" <buggerone@users.sourceforge.net>", "a1ba43376db2ec76f2cf244793bfc1565ac88454"),
    patch("Friedrich Uz-Valentin <uz_@users.sourceforge.net>", "0d9f5d03426735c4d42e9cd9fe81868b1437aa06"),
];

/// Exact-match fixes for known malformed historical records.
pub const CORRECTIONS: &[Correction] = &[
    Correction {
        malformed: "zapman <unknown>",
        corrected: "zapman",
    },
    Correction {
        malformed: "Derrick Dymock <derrick@puppetlabs.com>",
        corrected: "Derrick Dymock <actown@gmail.com>",
    },
];

// ---------------------------------------------------------------------------
// ReferenceTables
// ---------------------------------------------------------------------------

/// The set of tables a resolver runs against.
///
/// [`ReferenceTables::builtin`] is what the binary uses; tests construct
/// their own.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceTables<'a> {
    pub blacklist: &'a [BlacklistEntry],
    pub patch_authors: &'a [PatchAuthor],
    pub corrections: &'a [Correction],
}

impl ReferenceTables<'static> {
    /// The compiled-in tables.
    pub fn builtin() -> Self {
        Self {
            blacklist: BLACKLIST,
            patch_authors: PATCH_AUTHORS,
            corrections: CORRECTIONS,
        }
    }
}

impl<'a> ReferenceTables<'a> {
    /// Check that no table lists an identity twice and that the blacklist
    /// and the patch-author set are disjoint.
    pub fn validate(&self) -> Result<(), TableError> {
        let blacklisted = unique(self.blacklist.iter().map(|e| e.identity), "blacklist")?;
        unique(self.patch_authors.iter().map(|p| p.identity), "patch-author set")?;
        unique(self.corrections.iter().map(|c| c.malformed), "correction table")?;

        if let Some(identity) = self
            .patch_authors
            .iter()
            .map(|p| p.identity)
            .find(|identity| blacklisted.contains(identity))
        {
            return Err(TableError::Overlap {
                identity: identity.to_string(),
            });
        }
        Ok(())
    }

    /// Look up the blacklist entry for an exact identity string.
    pub fn blacklisted(&self, identity: &str) -> Option<&'a BlacklistEntry> {
        self.blacklist.iter().find(|e| e.identity == identity)
    }

    /// Look up the replacement for an exact malformed record.
    pub fn correction(&self, record: &str) -> Option<&'a str> {
        self.corrections
            .iter()
            .find(|c| c.malformed == record)
            .map(|c| c.corrected)
    }
}

fn unique<'a>(
    identities: impl Iterator<Item = &'a str>,
    table: &str,
) -> Result<HashSet<&'a str>, TableError> {
    let mut seen = HashSet::new();
    for identity in identities {
        if !seen.insert(identity) {
            return Err(TableError::Duplicate {
                table: table.to_string(),
                identity: identity.to_string(),
            });
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_consistent() {
        ReferenceTables::builtin().validate().unwrap();
    }

    #[test]
    fn test_overlap_is_rejected() {
        let blacklist = [deny("Thibaut Girka", Unknown)];
        let tables = ReferenceTables {
            blacklist: &blacklist,
            ..ReferenceTables::builtin()
        };
        assert_eq!(
            tables.validate(),
            Err(TableError::Overlap {
                identity: "Thibaut Girka".into()
            })
        );
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let patch_authors = [patch("A <a@example.com>", "1"), patch("A <a@example.com>", "2")];
        let tables = ReferenceTables {
            patch_authors: &patch_authors,
            ..ReferenceTables::builtin()
        };
        assert!(matches!(
            tables.validate(),
            Err(TableError::Duplicate { ref table, .. }) if table == "patch-author set"
        ));
    }

    #[test]
    fn test_lookups() {
        let tables = ReferenceTables::builtin();
        assert_eq!(tables.correction("zapman <unknown>"), Some("zapman"));
        assert_eq!(tables.correction("zapman"), None);

        let entry = tables
            .blacklisted("MumbleTransifexBot <mumbletransifexbot@mumble.info>")
            .unwrap();
        assert_eq!(entry.reason, Bot);
        assert!(tables.blacklisted("Ada Lovelace <ada@example.com>").is_none());
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(Bot.to_string(), "bot");
        assert_eq!(
            AliasOf(KRAUTZ).to_string(),
            "alias of Mikkel Krautz <mikkel@krautz.dk>"
        );
    }
}
