use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash;

/// The shortest hex digest accepted before a signature is parsed.
const MIN_DIGEST_LEN: usize = 8;

/// A signature format generation: prefix, version token, separator, and the
/// fold that produces the digest.
///
/// Schemes are self-contained. Signatures of different schemes are never
/// comparable and there is no migration between them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    /// `nsgn` + `v001` + 16 hex digits of an XXH64 fold.
    #[default]
    NsgnV001,
    /// `ns` + `v1` + `://` + 64 hex digits of a SHA-256 fold.
    NsV1,
}

impl Scheme {
    pub const ALL: [Scheme; 2] = [Scheme::NsgnV001, Scheme::NsV1];

    /// The fixed-width scheme identifier.
    pub const fn prefix(&self) -> &'static str {
        match self {
            Scheme::NsgnV001 => "nsgn",
            Scheme::NsV1 => "ns",
        }
    }

    /// The fixed-width version token.
    pub const fn version(&self) -> &'static str {
        match self {
            Scheme::NsgnV001 => "v001",
            Scheme::NsV1 => "v1",
        }
    }

    /// The literal between the version and the digest, possibly empty.
    pub const fn separator(&self) -> &'static str {
        match self {
            Scheme::NsgnV001 => "",
            Scheme::NsV1 => "://",
        }
    }

    /// Number of bytes preceding the hex digest.
    pub const fn header_len(&self) -> usize {
        self.prefix().len() + self.version().len() + self.separator().len()
    }

    /// Signatures shorter than this are malformed.
    pub const fn min_len(&self) -> usize {
        self.header_len() + MIN_DIGEST_LEN
    }

    /// Length in bytes of the raw digest.
    pub const fn digest_len(&self) -> usize {
        match self {
            Scheme::NsgnV001 => 8,
            Scheme::NsV1 => 32,
        }
    }

    /// Whether signatures carrying the `version` token can be compared
    /// against this scheme.
    ///
    /// # Examples
    ///
    /// ```
    /// use nodesig::Scheme;
    ///
    /// assert!(Scheme::NsgnV001.is_version_compatible("v001").unwrap());
    /// assert!(!Scheme::NsgnV001.is_version_compatible("v002").unwrap());
    /// assert!(Scheme::NsgnV001.is_version_compatible("v1").is_err());
    /// ```
    pub fn is_version_compatible(&self, version: &str) -> Result<bool> {
        if version.len() != self.version().len() {
            return Err(Error::Malformed {
                reason: "unexpected version length",
            });
        }
        Ok(version == self.version())
    }

    /// Folds a canonically ordered sequence of item hashes into the digest.
    pub fn fold(&self, hashes: &[u64]) -> Vec<u8> {
        match self {
            Scheme::NsgnV001 => hash::fold_xxh64(hashes).to_vec(),
            Scheme::NsV1 => hash::fold_sha256(hashes).to_vec(),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix(), self.version())
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Scheme::ALL
            .into_iter()
            .find(|scheme| scheme.to_string() == s)
            .ok_or_else(|| format!("unknown scheme {:?}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_widths() {
        assert_eq!(Scheme::NsgnV001.header_len(), 8);
        assert_eq!(Scheme::NsgnV001.min_len(), 16);
        assert_eq!(Scheme::NsV1.header_len(), 7);
        assert_eq!(Scheme::NsV1.min_len(), 15);
    }

    #[test]
    fn test_fold_output_matches_digest_len() {
        for scheme in Scheme::ALL {
            assert_eq!(scheme.fold(&[]).len(), scheme.digest_len());
            assert_eq!(scheme.fold(&[1, 2, 3]).len(), scheme.digest_len());
        }
    }

    #[test]
    fn test_version_compatibility() {
        assert!(Scheme::NsgnV001.is_version_compatible("v001").unwrap());
        assert!(!Scheme::NsgnV001.is_version_compatible("v002").unwrap());
        assert!(Scheme::NsV1.is_version_compatible("v1").unwrap());
        assert!(!Scheme::NsV1.is_version_compatible("v2").unwrap());
    }

    #[test]
    fn test_version_wrong_width_is_malformed() {
        for version in ["", "v", "v01", "v0001"] {
            assert!(matches!(
                Scheme::NsgnV001.is_version_compatible(version),
                Err(Error::Malformed { .. })
            ));
        }
        assert!(matches!(
            Scheme::NsV1.is_version_compatible("v001"),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(Scheme::NsgnV001.to_string(), "nsgnv001");
        assert_eq!(Scheme::NsV1.to_string(), "nsv1");
        for scheme in Scheme::ALL {
            assert_eq!(scheme.to_string().parse::<Scheme>(), Ok(scheme));
        }
        assert!("nsgnv002".parse::<Scheme>().is_err());
    }

    #[test]
    fn test_default_scheme() {
        assert_eq!(Scheme::default(), Scheme::NsgnV001);
    }
}
