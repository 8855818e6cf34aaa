//! Seeded randomness for a round, split into independent streams.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sha2::Sha256;

use crate::constants::{STREAM_LOCATION, STREAM_POOL, STREAM_ROUND, STREAM_SHUFFLE};

/// Domain-separated RNG streams derived from one user-visible seed.
///
/// Location choice, pool sampling and the role shuffle each draw from their
/// own stream, so changing how many draws one step makes never shifts the
/// others.
#[derive(Debug, Clone)]
pub struct RoundRng {
    seed: u64,
    location: SmallRng,
    pool: SmallRng,
    shuffle: SmallRng,
}

impl RoundRng {
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            location: SmallRng::seed_from_u64(derive_stream_seed(seed, STREAM_LOCATION)),
            pool: SmallRng::seed_from_u64(derive_stream_seed(seed, STREAM_POOL)),
            shuffle: SmallRng::seed_from_u64(derive_stream_seed(seed, STREAM_SHUFFLE)),
        }
    }

    /// Streams for round `round` of a session seeded with `session_seed`.
    ///
    /// The round index is mixed in through the HMAC domain, so neighbouring
    /// session seeds never replay each other's rounds.
    #[must_use]
    pub fn for_round(session_seed: u64, round: u64) -> Self {
        let mut domain = STREAM_ROUND.to_vec();
        domain.extend_from_slice(&round.to_le_bytes());
        Self::from_user_seed(derive_stream_seed(session_seed, &domain))
    }

    /// Seed the streams from thread-local entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_user_seed(rand::thread_rng().r#gen())
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    pub fn location(&mut self) -> &mut SmallRng {
        &mut self.location
    }

    pub fn pool(&mut self) -> &mut SmallRng {
        &mut self.pool
    }

    pub fn shuffle(&mut self) -> &mut SmallRng {
        &mut self.shuffle
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
