use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const DEFAULT_LEVEL_DB: f64 = 0.0;

/// Lock-free shared readout of the most recent level.
///
/// The sampling driver writes after each `observe`; a display thread can
/// poll without entering the monitor's critical section.
#[derive(Clone, Debug)]
pub struct LiveLevel {
    level_bits: Arc<AtomicU64>,
}

impl LiveLevel {
    pub fn new() -> Self {
        Self {
            level_bits: Arc::new(AtomicU64::new(DEFAULT_LEVEL_DB.to_bits())),
        }
    }

    pub fn set_db(&self, db: f64) {
        self.level_bits.store(db.to_bits(), Ordering::Relaxed);
    }

    pub fn level_db(&self) -> f64 {
        f64::from_bits(self.level_bits.load(Ordering::Relaxed))
    }
}

impl Default for LiveLevel {
    fn default() -> Self {
        Self::new()
    }
}
