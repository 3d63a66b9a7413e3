//! In-process channel with configurable misbehavior.
//!
//! Useful for tests and simulations: it can silently drop posts, duplicate
//! them, hand back fetches in shuffled order and carry unrelated comments.
//! All randomness comes from a seeded ChaCha20 stream so runs are repeatable.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::{Channel, ChannelError, ChannelItem};

/// How a [`MemoryChannel`] mistreats items.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelBehavior {
    /// Probability that a post is silently lost.
    pub drop_rate: f64,
    /// Probability that a post is stored twice.
    pub duplicate_rate: f64,
    /// Return fetches in random order instead of newest first.
    pub shuffle: bool,
}

impl ChannelBehavior {
    /// Never loses, duplicates or reorders anything.
    pub fn reliable() -> Self {
        Self::default()
    }
}

/// Clamps a rate into `[0, 1]`; NaN and infinities count as 0.
fn probability(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

struct State {
    /// Oldest first.
    items: Vec<ChannelItem>,
    rng: ChaCha20Rng,
    clock: DateTime<Utc>,
}

impl State {
    fn push(&mut self, author: &str, body: &str) {
        self.clock += Duration::seconds(1);
        self.items.push(ChannelItem::new(body, author, self.clock));
    }
}

/// Channel held entirely in memory.
pub struct MemoryChannel {
    behavior: ChannelBehavior,
    state: Mutex<State>,
}

impl MemoryChannel {
    /// A reliable channel.
    pub fn new() -> Self {
        Self::with_behavior(ChannelBehavior::reliable(), ChaCha20Rng::from_entropy())
    }

    /// A channel whose misbehavior is driven by `seed`.
    pub fn seeded(behavior: ChannelBehavior, seed: [u8; 32]) -> Self {
        Self::with_behavior(behavior, ChaCha20Rng::from_seed(seed))
    }

    fn with_behavior(behavior: ChannelBehavior, rng: ChaCha20Rng) -> Self {
        Self {
            behavior,
            state: Mutex::new(State {
                items: Vec::new(),
                rng,
                clock: DateTime::<Utc>::UNIX_EPOCH,
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, ChannelError> {
        self.state
            .lock()
            .map_err(|_| ChannelError::Rejected("channel state poisoned".into()))
    }

    /// Adds an item that bypasses drop/duplicate behavior, e.g. an
    /// ordinary comment from someone outside the group.
    pub fn inject_foreign(&self, author: &str, body: &str) -> Result<(), ChannelError> {
        self.lock()?.push(author, body);
        Ok(())
    }

    /// Number of stored items, duplicates included.
    pub fn len(&self) -> usize {
        self.lock().map(|s| s.items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for MemoryChannel {
    async fn post(&self, author: &str, body: &str) -> Result<(), ChannelError> {
        let mut state = self.lock()?;

        let drop_rate = probability(self.behavior.drop_rate);
        if state.rng.gen_bool(drop_rate) {
            tracing::debug!(author, "memory channel dropped item");
            return Ok(());
        }

        state.push(author, body);

        let duplicate_rate = probability(self.behavior.duplicate_rate);
        if state.rng.gen_bool(duplicate_rate) {
            state.push(author, body);
        }
        Ok(())
    }

    async fn fetch(&self) -> Result<Vec<ChannelItem>, ChannelError> {
        let mut state = self.lock()?;
        let mut items: Vec<ChannelItem> = state.items.iter().rev().cloned().collect();
        if self.behavior.shuffle {
            items.shuffle(&mut state.rng);
        }
        Ok(items)
    }
}
