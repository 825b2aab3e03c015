//! Dotted version strings as the portal presents them.
//!
//! Catalog labels are `major.minor` ("2024.1"); point releases in the
//! archive carry a patch ("2021.2.1"). A patch-qualified version and a
//! patch-less one are different comparability classes, so comparison is a
//! fallible operation rather than an `Ord` impl.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?$").unwrap());

/// Immutable parsed version: `major.minor` with an optional patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionSpec {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl VersionSpec {
    /// Parse `"a.b"` or `"a.b.c"`. Anything else is a format error.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let caps = VERSION_RE.captures(s).ok_or_else(|| {
            Error::Format(format!(
                "invalid version {s:?}; expected (0-9)+.(0-9)+ or (0-9)+.(0-9)+.(0-9)+ (e.g. 2024.1 or 2024.1.0)"
            ))
        })?;

        let component = |i: usize| -> Result<u32, Error> {
            caps[i]
                .parse()
                .map_err(|_| Error::Format(format!("version component out of range in {s:?}")))
        };

        Ok(Self {
            major: component(1)?,
            minor: component(2)?,
            patch: caps.get(3).map(|m| m.as_str().parse()).transpose().map_err(
                |_| Error::Format(format!("version component out of range in {s:?}")),
            )?,
        })
    }

    /// Lexicographic comparison over (major, minor, patch).
    ///
    /// Errors when exactly one side has a patch component; `absent` is its
    /// own comparability class, not a wildcard.
    pub fn try_cmp(&self, other: &VersionSpec) -> Result<Ordering, Error> {
        if self.patch.is_some() != other.patch.is_some() {
            return Err(Error::Comparability {
                a: *self,
                b: *other,
            });
        }
        Ok((self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch)))
    }

    /// The `major.minor` projection, dropping any patch component.
    ///
    /// Used to compare a point-release target against the patch-less
    /// catalog listing.
    pub fn base(&self) -> VersionSpec {
        VersionSpec {
            major: self.major,
            minor: self.minor,
            patch: None,
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

impl FromStr for VersionSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
