//! Public site names.
//!
//! [`normalize_subdomain`] turns arbitrary business-name text into a DNS-label
//! style candidate. [`Subdomain`] is a non-empty normalized name, the key of the
//! global name mapping.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a normalized base name, before any numeric suffix.
pub const MAX_BASE_LENGTH: usize = 40;

/// Errors that can occur when parsing a [`Subdomain`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SubdomainError {
    /// Nothing usable was left after normalization.
    #[error("name {raw:?} has no characters usable in a subdomain")]
    Empty {
        /// The input as given.
        raw: String,
    },
}

/// Normalize raw text into a subdomain candidate.
///
/// Steps, in order: lowercase; replace every character outside `[a-z0-9-]`
/// with `-`; collapse runs of `-`; trim leading and trailing `-`; keep at most
/// [`MAX_BASE_LENGTH`] characters. The result may be empty.
///
/// ```
/// use tezweb_core::subdomain::normalize_subdomain;
///
/// assert_eq!(normalize_subdomain("My Café! Shop"), "my-caf-shop");
/// assert_eq!(normalize_subdomain("---"), "");
/// ```
#[must_use]
pub fn normalize_subdomain(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            c
        } else {
            '-'
        };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }

    // Every remaining character is ASCII, so char and byte counts agree.
    out.trim_matches('-')
        .chars()
        .take(MAX_BASE_LENGTH)
        .collect()
}

/// A non-empty, normalized public site name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subdomain(String);

impl Subdomain {
    /// Normalize `raw` and reject an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`SubdomainError::Empty`] if the input has no valid characters.
    pub fn parse(raw: &str) -> Result<Self, SubdomainError> {
        let normalized = normalize_subdomain(raw);
        if normalized.is_empty() {
            return Err(SubdomainError::Empty {
                raw: raw.to_owned(),
            });
        }
        Ok(Self(normalized))
    }

    /// Wrap a name that is already stored in normalized form.
    ///
    /// Stored subdomains may carry a numeric suffix past the base-length limit,
    /// so they are taken as-is rather than re-normalized.
    #[must_use]
    pub fn from_stored(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Interpret a name received in a request or typed by an operator.
    ///
    /// Input already in stored form is taken as-is, so suffixed names longer
    /// than [`MAX_BASE_LENGTH`] keep their suffix. Anything else is
    /// normalized like [`Subdomain::parse`].
    ///
    /// ```
    /// use tezweb_core::subdomain::Subdomain;
    ///
    /// assert_eq!(Subdomain::lookup("My Shop").map(Subdomain::into_inner).ok().as_deref(), Some("my-shop"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `SubdomainError::Empty` if nothing usable remains.
    pub fn lookup(raw: &str) -> Result<Self, SubdomainError> {
        let lowered = raw.trim().to_ascii_lowercase();
        let stored_form = !lowered.is_empty()
            && lowered
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
        if stored_form {
            return Ok(Self(lowered));
        }
        Self::parse(raw)
    }

    /// The `n`th suffixed candidate, `{base}-{n}`.
    #[must_use]
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}-{n}", self.0))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Subdomain` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Subdomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Site name addressed by a request `Host` header under `root_domain`.
///
/// The port is ignored and matching is case-insensitive. The bare root domain
/// and hosts outside it address no site.
///
/// ```
/// use tezweb_core::subdomain::subdomain_from_host;
///
/// assert_eq!(subdomain_from_host("Chai.TezWeb.com:443", "tezweb.com").as_deref(), Some("chai"));
/// assert_eq!(subdomain_from_host("tezweb.com", "tezweb.com"), None);
/// ```
#[must_use]
pub fn subdomain_from_host(host: &str, root_domain: &str) -> Option<String> {
    let host = host.split(':').next().unwrap_or_default().to_lowercase();
    let suffix = format!(".{}", root_domain.to_lowercase());
    host.strip_suffix(&suffix)
        .filter(|label| !label.is_empty())
        .map(str::to_owned)
}

/// Public address of a site published as `name`.
#[must_use]
pub fn public_url(name: &Subdomain, root_domain: &str) -> String {
    format!("https://{name}.{root_domain}")
}
