//! Deterministic random streams for matches and roster generation.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

/// Random stream owned by a single match.
pub type MatchRng = CountingRng<ChaCha20Rng>;

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    /// Seed a fresh stream.
    #[must_use]
    pub fn from_seed_u64(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// Derive an independent seed for one domain of a user-visible seed.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let digest = match Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) {
        Ok(mut mac) => {
            mac.update(domain_tag);
            mac.finalize().into_bytes()
        }
        // HMAC accepts keys of any length; keep a keyed digest as the fallback.
        Err(_) => {
            let mut hasher = Sha256::new();
            hasher.update(user_seed.to_le_bytes());
            hasher.update(domain_tag);
            hasher.finalize()
        }
    };
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Seed for the match at `index` of season `year`.
#[must_use]
pub fn derive_match_seed(league_seed: u64, year: u32, index: usize) -> u64 {
    let mut tag = Vec::with_capacity(24);
    tag.extend_from_slice(b"match:");
    tag.extend_from_slice(&year.to_le_bytes());
    tag.extend_from_slice(&u64::try_from(index).unwrap_or(u64::MAX).to_le_bytes());
    derive_stream_seed(league_seed, &tag)
}

/// Seed for the schedule shuffle of season `year`.
#[must_use]
pub fn derive_schedule_seed(league_seed: u64, year: u32) -> u64 {
    let mut tag = Vec::with_capacity(16);
    tag.extend_from_slice(b"schedule:");
    tag.extend_from_slice(&year.to_le_bytes());
    derive_stream_seed(league_seed, &tag)
}
