use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub const NAMESPACE_LEN: usize = 52;
pub const NAME_LEN: usize = 72;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A namespaced work unit, in the shape of the `testdata/pods.json` records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkUnit {
    #[serde(rename = "Namespace")]
    pub namespace: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl nodesig::WorkUnit for WorkUnit {
    fn namespace(&self) -> Result<&str, nodesig::BoxError> {
        Ok(&self.namespace)
    }

    fn name(&self) -> Result<&str, nodesig::BoxError> {
        Ok(&self.name)
    }
}

/// Generates random work units, with fixed-length namespaces and names
/// drawn from ASCII letters.
pub struct WorkUnitGenerator {
    rng: ChaCha8Rng,
    /// The number of generated work units.
    pub num_generated: usize,
}

impl WorkUnitGenerator {
    /// Create a generator. With a `seed`, the sequence of work units is
    /// reproducible across runs.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng, num_generated: 0 }
    }

    fn random_string(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| LETTERS[self.rng.gen_range(0..LETTERS.len())] as char)
            .collect()
    }

    /// The work units running on a node with `units_per_node` units.
    pub fn node(&mut self, units_per_node: usize) -> Vec<WorkUnit> {
        (0..units_per_node).map(|_| self.next_unit()).collect()
    }

    fn next_unit(&mut self) -> WorkUnit {
        self.num_generated += 1;
        WorkUnit {
            namespace: self.random_string(NAMESPACE_LEN),
            name: self.random_string(NAME_LEN),
        }
    }
}

impl Iterator for WorkUnitGenerator {
    type Item = WorkUnit;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_unit())
    }
}
