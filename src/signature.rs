use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::item_hash;
use crate::scheme::Scheme;
use crate::WorkUnit;

/// Expected maximum number of work units running on a single node. Only
/// used to presize the accumulator.
pub const EXPECTED_MAX_UNITS_PER_NODE: usize = 256;

/// Accumulates the work units of a node and computes their signature.
///
/// The signature depends only on the multiset of added identities, never on
/// the order in which they were added. Duplicates are not suppressed: adding
/// the same identity twice contributes two hashes.
///
/// Reading the digest sorts the internal hash sequence in place, which is
/// why [`digest`](NodeSignature::digest), [`sign`](NodeSignature::sign) and
/// [`check`](NodeSignature::check) take `&mut self`. Share an accumulator
/// across threads behind a lock.
#[derive(Clone, Debug)]
pub struct NodeSignature {
    scheme: Scheme,
    hashes: Vec<u64>,
}

impl NodeSignature {
    /// Creates an empty accumulator for the default scheme.
    pub fn new() -> Self {
        Self::with_capacity(EXPECTED_MAX_UNITS_PER_NODE)
    }

    /// Creates an empty accumulator presized for `capacity` work units. The
    /// hint has no effect on the signature.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scheme: Scheme::default(),
            hashes: Vec::with_capacity(capacity),
        }
    }

    /// Creates an empty accumulator producing signatures of `scheme`.
    pub fn with_scheme(scheme: Scheme) -> Self {
        Self {
            scheme,
            ..Self::new()
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The number of work units added so far, duplicates included.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Adds a work unit identified by `namespace` and `name`. Any string,
    /// including the empty one, is a valid identity.
    pub fn add(&mut self, namespace: &str, name: &str) {
        self.hashes.push(item_hash(namespace, name));
    }

    /// Adds a work unit through its [`WorkUnit`] capability.
    ///
    /// Both the namespace and the name are resolved before anything is
    /// recorded, so a failing work unit leaves the accumulator untouched.
    pub fn add_unit<W: WorkUnit + ?Sized>(&mut self, unit: &W) -> Result<()> {
        let namespace = unit.namespace().map_err(Error::WorkUnit)?;
        let name = unit.name().map_err(Error::WorkUnit)?;
        self.add(namespace, name);
        Ok(())
    }

    /// The raw digest of the current work units.
    ///
    /// Sorts the item hashes in ascending order and folds them through the
    /// scheme's streaming hash, each hash written as 8 little-endian bytes.
    /// An empty accumulator yields the fold's digest of zero bytes.
    pub fn digest(&mut self) -> Vec<u8> {
        self.hashes.sort_unstable();
        self.scheme.fold(&self.hashes)
    }

    /// The current signature as a value.
    pub fn signature(&mut self) -> Signature {
        Signature {
            scheme: self.scheme,
            digest: hex::encode(self.digest()),
        }
    }

    /// The current signature, `prefix ++ version ++ separator ++ hex(digest)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nodesig::NodeSignature;
    ///
    /// let mut a = NodeSignature::new();
    /// a.add("ns1", "a");
    /// a.add("ns2", "b");
    ///
    /// let mut b = NodeSignature::new();
    /// b.add("ns2", "b");
    /// b.add("ns1", "a");
    ///
    /// assert_eq!(a.sign(), b.sign());
    /// assert!(a.sign().starts_with("nsgnv001"));
    /// ```
    pub fn sign(&mut self) -> String {
        self.signature().to_string()
    }

    /// Checks that `candidate` is the signature of the current work units.
    ///
    /// Fails with [`Error::Malformed`] if the candidate cannot be parsed,
    /// with [`Error::IncompatibleVersion`] if it belongs to another version
    /// of the scheme, and with [`Error::Mismatch`] if the digests differ.
    pub fn check(&mut self, candidate: &str) -> Result<()> {
        let theirs = Signature::parse(self.scheme, candidate)?;
        let ours = hex::encode(self.digest());
        if ours != theirs.digest {
            return Err(Error::Mismatch {
                expected: theirs.digest,
                actual: ours,
            });
        }
        Ok(())
    }
}

impl Default for NodeSignature {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: AsRef<str>, M: AsRef<str>> Extend<(N, M)> for NodeSignature {
    fn extend<I: IntoIterator<Item = (N, M)>>(&mut self, iter: I) {
        for (namespace, name) in iter {
            self.add(namespace.as_ref(), name.as_ref());
        }
    }
}

impl<N: AsRef<str>, M: AsRef<str>> FromIterator<(N, M)> for NodeSignature {
    fn from_iter<I: IntoIterator<Item = (N, M)>>(iter: I) -> Self {
        let mut ns = Self::new();
        ns.extend(iter);
        ns
    }
}

/// A parsed signature. Carries no reference to the accumulator that
/// produced it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    scheme: Scheme,
    digest: String,
}

impl Signature {
    /// Splits `text` into prefix, version, separator and digest at the fixed
    /// offsets of `scheme`.
    ///
    /// The digest is kept verbatim. It is not validated as hex, so a bogus
    /// digest surfaces later as a mismatch.
    pub fn parse(scheme: Scheme, text: &str) -> Result<Self> {
        if text.len() < scheme.min_len() {
            return Err(Error::Malformed {
                reason: "signature too short",
            });
        }
        let (prefix, rest) = split_at(text, scheme.prefix().len())?;
        if prefix != scheme.prefix() {
            return Err(Error::Malformed {
                reason: "unknown prefix",
            });
        }
        let (version, rest) = split_at(rest, scheme.version().len())?;
        if !scheme.is_version_compatible(version)? {
            return Err(Error::IncompatibleVersion {
                expected: scheme.version(),
                found: version.to_string(),
            });
        }
        let (separator, digest) = split_at(rest, scheme.separator().len())?;
        if separator != scheme.separator() {
            return Err(Error::Malformed {
                reason: "missing separator",
            });
        }
        Ok(Self {
            scheme,
            digest: digest.to_string(),
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The hex-encoded digest.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.scheme, self.scheme.separator(), self.digest)
    }
}

/// Splits at a byte offset, rejecting offsets inside a multi-byte character.
fn split_at(s: &str, mid: usize) -> Result<(&str, &str)> {
    match (s.get(..mid), s.get(mid..)) {
        (Some(head), Some(tail)) => Ok((head, tail)),
        _ => Err(Error::Malformed {
            reason: "field boundary inside a character",
        }),
    }
}
