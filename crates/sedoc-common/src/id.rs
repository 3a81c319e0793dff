//! Identifier minting for editor documents.
//!
//! Two families of identifiers are produced:
//!
//! - a 26 character `[A-Z0-9]` string used as the document id
//! - a dashed lowercase hex string (`8-4-4-4-12`) used for every component,
//!   paragraph and node. Callers prepend `SE-` when placing it in a document.
//!
//! None of these are cryptographically secure. Uniqueness is only needed
//! inside a single document (tens of ids), so a fast PRNG is fine. Each
//! [`IdGenerator`] owns its own RNG state; create one per synthesis call so
//! overlapping calls never share a seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const HEX: &[u8] = b"0123456789abcdef";

/// Prefix the editor expects in front of every component/node identifier.
pub const COMPONENT_ID_PREFIX: &str = "SE-";

#[derive(Debug, Clone)]
pub struct IdGenerator<R = StdRng> {
    rng: R,
}

impl IdGenerator<StdRng> {
    /// Fresh generator seeded from the thread-local RNG.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Deterministic generator, mostly useful in tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for IdGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> IdGenerator<R> {
    /// 26 characters drawn uniformly from `[A-Z0-9]`.
    pub fn random_alnum26(&mut self) -> String {
        (0..26)
            .map(|_| ALNUM[self.rng.random_range(0..ALNUM.len())] as char)
            .collect()
    }

    /// `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` with lowercase hex digits.
    pub fn random_dashed_hex(&mut self) -> String {
        let mut out = String::with_capacity(36);
        for i in 0..32 {
            if matches!(i, 8 | 12 | 16 | 20) {
                out.push('-');
            }
            out.push(HEX[self.rng.random_range(0..HEX.len())] as char);
        }
        out
    }

    /// A dashed hex id with the `SE-` prefix, ready to drop into a component.
    pub fn component_id(&mut self) -> String {
        format!("{COMPONENT_ID_PREFIX}{}", self.random_dashed_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::HashSet;

    #[test]
    fn alnum26_shape() {
        let mut ids = IdGenerator::new();
        for _ in 0..50 {
            let id = ids.random_alnum26();
            assert_eq!(id.len(), 26);
            assert!(
                id.chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
        }
    }

    #[test]
    fn dashed_hex_shape() {
        let re = Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .unwrap();
        let mut ids = IdGenerator::new();
        for _ in 0..200 {
            let id = ids.random_dashed_hex();
            assert!(re.is_match(&id), "bad id {id}");
        }
    }

    #[test]
    fn component_id_has_prefix() {
        let mut ids = IdGenerator::seeded(7);
        let id = ids.component_id();
        assert!(id.starts_with("SE-"));
        assert_eq!(id.len(), 3 + 36);
    }

    #[test]
    fn seeded_generators_repeat() {
        let mut a = IdGenerator::seeded(42);
        let mut b = IdGenerator::seeded(42);
        assert_eq!(a.random_dashed_hex(), b.random_dashed_hex());
        assert_eq!(a.random_alnum26(), b.random_alnum26());
    }

    #[test]
    fn unique_within_a_document() {
        let mut ids = IdGenerator::new();
        let seen: HashSet<String> = (0..100).map(|_| ids.component_id()).collect();
        assert_eq!(seen.len(), 100);
    }
}
