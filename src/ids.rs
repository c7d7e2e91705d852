//! Session UID generation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

pub const MIN_UID: u32 = 1;
/// 0 and u32::MAX are reserved by the vendor.
pub const MAX_UID: u32 = 4_294_967_294;

/// Uniform generator over `[MIN_UID, MAX_UID]`, one per facade.
#[derive(Debug)]
pub struct UidGenerator {
    rng: Mutex<StdRng>,
}

impl UidGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn next_uid(&self) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(MIN_UID..=MAX_UID)
    }

    /// Decimal form used in vendor request bodies.
    pub fn next_string(&self) -> String {
        self.next_uid().to_string()
    }
}

impl Default for UidGenerator {
    fn default() -> Self {
        Self::new()
    }
}
