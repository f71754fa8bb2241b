//! Generation tokens for invalidating superseded aggregation runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared counter; every [`GenerationCounter::begin`] supersedes all earlier
/// tokens.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    current: Arc<AtomicU64>,
}

impl GenerationCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, invalidating every outstanding token.
    #[must_use]
    pub fn begin(&self) -> RunToken {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        RunToken {
            generation,
            current: Arc::clone(&self.current),
        }
    }

    #[must_use]
    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

/// Identifies one aggregation run.
#[derive(Debug, Clone)]
pub struct RunToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl RunToken {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `false` once a newer run has begun.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}
