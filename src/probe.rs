//! Collision resolution policies and the probe sequence they generate.

/// How successive candidate buckets are chosen after a collision.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProbePolicy {
    /// `(base + k) mod C`
    Linear,
    /// `(base + k²) mod C`
    #[default]
    Quadratic,
    /// `(base + k·step) mod C` with `step = hash mod (C - 1) + 1`
    DoubleHash,
}

impl ProbePolicy {
    /// Bucket for the `k`-th probe (0-based) of `hash` in a table of
    /// `capacity` slots. Every policy starts at `hash mod capacity`.
    /// Tables never have fewer than `MINPRIME` slots.
    #[inline]
    pub(crate) fn index(self, hash: u64, k: usize, capacity: usize) -> usize {
        assert!(capacity > 1, "probe over a table of {capacity} slots");
        let cap = capacity as u64;
        let base = hash % cap;
        let k = k as u64 % cap;
        let offset = match self {
            ProbePolicy::Linear => k,
            ProbePolicy::Quadratic => (k * k) % cap,
            ProbePolicy::DoubleHash => {
                let step = hash % (cap - 1) + 1;
                (k * step) % cap
            }
        };
        ((base + offset) % cap) as usize
    }

    /// Finite probe sequence over `k = 0..capacity`.
    pub(crate) fn probe(self, hash: u64, capacity: usize) -> ProbeSeq {
        ProbeSeq {
            policy: self,
            hash,
            capacity,
            k: 0,
        }
    }
}

/// Iterator over candidate buckets for one key. With a prime capacity it
/// reaches every slot the policy can ever reach before it ends.
#[derive(Clone, Debug)]
pub(crate) struct ProbeSeq {
    policy: ProbePolicy,
    hash: u64,
    capacity: usize,
    k: usize,
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.k >= self.capacity {
            return None;
        }
        let i = self.policy.index(self.hash, self.k, self.capacity);
        self.k += 1;
        Some(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.capacity - self.k;
        (n, Some(n))
    }
}
