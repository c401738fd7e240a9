//! A _node signature_ is a short identifier bound to the working set of a
//! node: the unordered multiset of namespaced work units running on it at a
//! given time. It lets two parties agree that they observed the same working
//! set without enumerating, storing or transmitting all of its members. The
//! concept maps onto Kubernetes (work units are pods, nodes are nodes) but
//! does not depend on it.
//!
//! Each work unit is hashed to a 64-bit value, with the hash of its name
//! seeded by the hash of its namespace. The accumulated hashes are sorted
//! and folded through a streaming hash, so the signature does not depend on
//! the order in which work units were observed. The digest is encoded as
//! `prefix ++ version ++ separator ++ hex(digest)`, e.g.
//! `nsgnv001ef46db3751d8e999`, and a signature can be checked against an
//! accumulator for format compatibility and equality.
//!
//! The hash functions are chosen for speed and collision avoidance, not to
//! resist an adversary.

mod error;
pub mod hash;
mod scheme;
mod signature;

pub use error::{BoxError, Error, Result};
pub use scheme::Scheme;
pub use signature::{NodeSignature, Signature, EXPECTED_MAX_UNITS_PER_NODE};

/// Anything that can report the namespace and name identifying it as a work
/// unit, for example a pod object from an orchestration API.
///
/// Resolving either field may fail, in which case the error is returned by
/// [`NodeSignature::add_unit`] and nothing is added.
///
/// # Examples
///
/// ```
/// use nodesig::{BoxError, NodeSignature, WorkUnit};
///
/// struct Pod {
///     namespace: String,
///     name: Option<String>,
/// }
///
/// impl WorkUnit for Pod {
///     fn namespace(&self) -> Result<&str, BoxError> {
///         Ok(&self.namespace)
///     }
///
///     fn name(&self) -> Result<&str, BoxError> {
///         self.name.as_deref().ok_or_else(|| "pod has no name".into())
///     }
/// }
///
/// fn main() {
///     let mut ns = NodeSignature::new();
///     let pod = Pod { namespace: "default".into(), name: Some("web-0".into()) };
///     ns.add_unit(&pod).unwrap();
///
///     let pending = Pod { namespace: "default".into(), name: None };
///     assert!(ns.add_unit(&pending).is_err());
///     assert_eq!(ns.len(), 1);
/// }
/// ```
pub trait WorkUnit {
    /// The namespace the work unit belongs to.
    fn namespace(&self) -> std::result::Result<&str, BoxError>;

    /// The name of the work unit within its namespace.
    fn name(&self) -> std::result::Result<&str, BoxError>;
}

impl<N: AsRef<str>, M: AsRef<str>> WorkUnit for (N, M) {
    fn namespace(&self) -> std::result::Result<&str, BoxError> {
        Ok(self.0.as_ref())
    }

    fn name(&self) -> std::result::Result<&str, BoxError> {
        Ok(self.1.as_ref())
    }
}
