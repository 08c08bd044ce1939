//! The published `AUTHORS` file.
//!
//! Layout: a fixed license/provenance [`HEADER`], one roster identity per
//! line, then a fixed acknowledgement [`TRAILER`]. Writing always replaces
//! the whole file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info, instrument};

use crate::errors::AuthorsFileError;

/// Static text written before the roster.
pub const HEADER: &str = "\
// This is the official list of people who have contributed
// to, and/or hold the copyright to Mumble.
//
// The use of Mumble source code is governed by a BSD-style
// license that can be found in the LICENSE file at the root
// of the Mumble source tree or at <http://www.mumble.info/LICENSE>.
//
// Contributions made on behalf of another entity, such as a
// company are indicated with the following suffix:
//
//     John Doe <jd@mumble.info> (on behalf of $COMPANY)
//
// It is possible to mix individual contributions with company
// contributions. For example, if a contributor, over time,
// has contributed code copyrighted by the contributor, as well
// as various companies:
//
//     John Doe <jd@mumble.info> (individually, on behalf of
//                                $COMPANY1, on behalf of
//                                $COMPANY2, [...]).
//
// Mumble's code is developed in a Git repository. A log of
// every contribution ever made to Mumble is available in the
// Git repository. The Git repository can be queried to get
// detailed authorship information for copyright and attribution
// purposes for each file that makes up the software. A detailed
// analysis of contributions made to Mumble is available via GitHub's
// contribution statistics:
//
// <https://github.com/mumble-voip/mumble/graphs/contributors>

";

/// Static text written after the roster.
pub const TRAILER: &str = "
// Special thanks to:
//
//    Thorvald Natvig, for founding the Mumble project
//    and maintaining it during its formative years.
";

/// Render the full file contents for a sorted list of identities.
pub fn render<'a, I>(identities: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::from(HEADER);
    for identity in identities {
        out.push_str(identity);
        out.push('\n');
    }
    out.push_str(TRAILER);
    out
}

/// Recover the roster lines from rendered file contents.
///
/// `path` is only used in error messages.
pub fn parse(contents: &str, path: &Path) -> Result<Vec<String>, AuthorsFileError> {
    let body = contents
        .strip_prefix(HEADER)
        .ok_or_else(|| AuthorsFileError::MissingHeader(path.display().to_string()))?;
    let body = body
        .strip_suffix(TRAILER)
        .ok_or_else(|| AuthorsFileError::MissingTrailer(path.display().to_string()))?;
    Ok(body.lines().map(str::to_string).collect())
}

/// Replace the file at `path` with `contents`.
///
/// The data goes to a temporary file in the same directory that is then
/// renamed over the target, so readers see either the old file or the new
/// one. A symlinked `path` is written through to the file it points at, and
/// an existing file keeps its permissions. New files are created `0644`
/// (less the umask).
#[instrument(skip(contents), fields(path = %path.display()))]
pub fn write(path: &Path, contents: &str) -> Result<(), AuthorsFileError> {
    let io_err = |source: io::Error| AuthorsFileError::IoError {
        path: path.display().to_string(),
        source,
    };

    let target = resolve_target(path);
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = create_temp(dir, &target).map_err(io_err)?;
    tmp.write_all(contents.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    debug!(tmp = %tmp.path().display(), bytes = contents.len(), "wrote temporary AUTHORS file");

    tmp.persist(&target).map_err(|e| AuthorsFileError::Persist {
        path: path.display().to_string(),
        source: e.error,
    })?;
    info!(target = %target.display(), "AUTHORS file written");
    Ok(())
}

/// Follow symlinks so the rename lands on the real file. Paths that do not
/// resolve yet are used as given.
fn resolve_target(path: &Path) -> PathBuf {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// Temporary file in `dir` carrying the permissions `target` should end up
/// with.
fn create_temp(dir: &Path, target: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".AUTHORS");

    match fs::metadata(target) {
        Ok(meta) => {
            let tmp = builder.tempfile_in(dir)?;
            tmp.as_file().set_permissions(meta.permissions())?;
            Ok(tmp)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                builder.permissions(fs::Permissions::from_mode(0o644));
            }
            builder.tempfile_in(dir)
        }
        Err(e) => Err(e),
    }
}

/// Read and parse an existing file. A missing file is `Ok(None)`.
pub fn read(path: &Path) -> Result<Option<Vec<String>>, AuthorsFileError> {
    match fs::read_to_string(path) {
        Ok(contents) => parse(&contents, path).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(AuthorsFileError::IoError {
            path: path.display().to_string(),
            source,
        }),
    }
}
