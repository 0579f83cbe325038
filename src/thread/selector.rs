use rand::{rngs::StdRng, Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::config::ThreadConfig;

/// Picks which closing call-to-action a composed thread receives.
///
/// Implementations must be deterministic: the same content and candidate
/// count always yield the same index.
pub trait CtaSelector {
    fn select(&self, content: &str, candidate_count: usize) -> usize;
}

/// Index derived from a SHA-256 digest of the source content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHashSelector;

impl CtaSelector for ContentHashSelector {
    fn select(&self, content: &str, candidate_count: usize) -> usize {
        if candidate_count == 0 {
            return 0;
        }
        (stable_hash64(content) % candidate_count as u64) as usize
    }
}

/// Index drawn from an explicitly seeded RNG, independent of content.
#[derive(Debug, Clone, Copy)]
pub struct SeededSelector {
    seed: u64,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl CtaSelector for SeededSelector {
    fn select(&self, _content: &str, candidate_count: usize) -> usize {
        if candidate_count == 0 {
            return 0;
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        rng.gen_range(0..candidate_count)
    }
}

pub fn selector_for(config: &ThreadConfig) -> Box<dyn CtaSelector> {
    match config.cta_seed {
        Some(seed) => Box::new(SeededSelector::new(seed)),
        None => Box::new(ContentHashSelector),
    }
}

pub(crate) fn stable_hash64(value: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}
