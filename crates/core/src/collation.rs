//! Locale-aware string ordering.
//!
//! The roster is a human-facing credits list, so it is ordered the way the
//! user's locale orders names rather than by code point. [`Collator`] asks
//! the platform C library for collation keys (`strxfrm`) after selecting
//! the locale with `setlocale`.
//!
//! Locale selection is process-global. Pick it once at startup.

use std::cmp::Ordering;

use tracing::{debug, info, warn};

use crate::errors::CollationError;

/// Orders strings by collation key, falling back to byte order on ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collator {
    /// Locale name as reported by the C library, `None` for byte order.
    locale: Option<String>,
}

impl Collator {
    /// Select `name` as the process locale and collate under it.
    ///
    /// An empty name selects the locale from the environment (`LC_ALL`,
    /// `LC_COLLATE`, `LANG`), like a C program calling
    /// `setlocale(LC_ALL, "")`.
    pub fn from_locale(name: &str) -> Result<Self, CollationError> {
        let locale = sys::set_locale(name)?;
        info!(requested = name, locale = %locale, "selected collation locale");
        Ok(Self {
            locale: Some(locale),
        })
    }

    /// Plain byte-order comparison. Does not touch the process locale.
    pub fn ordinal() -> Self {
        Self { locale: None }
    }

    /// Name of the active collation locale.
    pub fn locale(&self) -> &str {
        self.locale.as_deref().unwrap_or("ordinal")
    }

    /// Collation key for `s`. Keys compare bytewise in collation order.
    pub fn sort_key(&self, s: &str) -> Vec<u8> {
        match self.locale {
            Some(_) => sys::transform(s),
            None => s.as_bytes().to_vec(),
        }
    }

    /// Compare two strings in collation order.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.sort_key(a)
            .cmp(&self.sort_key(b))
            .then_with(|| a.cmp(b))
    }

    /// Sort `items` in place in collation order.
    ///
    /// Strings with equal collation keys are ordered by bytes so the result
    /// never depends on the input order.
    pub fn sort(&self, items: &mut [String]) {
        items.sort_by_cached_key(|s| (self.sort_key(s), s.clone()));
        debug!(count = items.len(), locale = self.locale(), "sorted identities");
    }
}

#[cfg(unix)]
mod sys {
    use std::ffi::{CStr, CString};

    use super::{warn, CollationError};

    pub(super) fn set_locale(name: &str) -> Result<String, CollationError> {
        let c_name =
            CString::new(name).map_err(|_| CollationError::InvalidLocaleName(name.to_string()))?;

        // SAFETY: `c_name` is a valid NUL-terminated string that outlives the call.
        let selected = unsafe { libc::setlocale(libc::LC_ALL, c_name.as_ptr()) };
        if selected.is_null() {
            return Err(CollationError::UnsupportedLocale(name.to_string()));
        }

        // LC_ALL may report a composite of every category; name the one we use.
        // SAFETY: a null locale argument only queries the current setting.
        let collate = unsafe { libc::setlocale(libc::LC_COLLATE, std::ptr::null()) };
        if collate.is_null() {
            return Err(CollationError::UnsupportedLocale(name.to_string()));
        }
        // SAFETY: non-null results point at a NUL-terminated string owned by libc.
        Ok(unsafe { CStr::from_ptr(collate) }
            .to_string_lossy()
            .into_owned())
    }

    pub(super) fn transform(s: &str) -> Vec<u8> {
        let c_str = match CString::new(s) {
            Ok(c) => c,
            Err(_) => {
                warn!(value = s, "string contains a NUL byte, collating by bytes");
                return s.as_bytes().to_vec();
            }
        };

        // SAFETY: a zero-length destination may be null; strxfrm then only
        // reports the key length.
        let needed = unsafe { libc::strxfrm(std::ptr::null_mut(), c_str.as_ptr(), 0) };
        let mut key = vec![0u8; needed + 1];
        // SAFETY: `key` holds `key.len()` writable bytes, enough for the key
        // plus its terminator.
        let written = unsafe {
            libc::strxfrm(
                key.as_mut_ptr().cast::<libc::c_char>(),
                c_str.as_ptr(),
                key.len(),
            )
        };
        key.truncate(written.min(needed));
        key
    }
}

#[cfg(not(unix))]
mod sys {
    use super::{warn, CollationError};

    pub(super) fn set_locale(name: &str) -> Result<String, CollationError> {
        if name.contains('\0') {
            return Err(CollationError::InvalidLocaleName(name.to_string()));
        }
        warn!(requested = name, "locale collation unavailable on this platform, using byte order");
        Ok("C".to_string())
    }

    pub(super) fn transform(s: &str) -> Vec<u8> {
        s.as_bytes().to_vec()
    }
}
