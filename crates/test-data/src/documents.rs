//! Uniqueness tracking for government-style document numbers.
//!
//! Every table that mints passports, licenses, STS or PTS numbers owns one
//! [`DocumentRegistry`] for the duration of a generation run. Registries are
//! plain values passed by `&mut`; nothing is process-global, so two runs (or
//! two tests) never see each other's numbers.

use std::collections::HashSet;

use autotrack_models::DocumentPair;
use rand::Rng;

/// Set of document pairs already issued within one table.
///
/// [`mint`](Self::mint) uses rejection sampling with no retry bound. The
/// keyspace holds [`DocumentPair::KEYSPACE`] pairs (8.1 billion); callers must
/// keep the number of pairs requested from one registry far below that, or
/// minting degrades towards livelock as the space fills.
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    used: HashSet<DocumentPair>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws a fresh pair uniformly from the keyspace and records it as used.
    pub fn mint(&mut self, rng: &mut impl Rng) -> DocumentPair {
        loop {
            let pair = DocumentPair {
                serial: rng.gen_range(DocumentPair::SERIAL_RANGE),
                number: rng.gen_range(DocumentPair::NUMBER_RANGE),
            };
            if self.used.insert(pair) {
                return pair;
            }
        }
    }

    /// Marks an externally sourced pair as used.
    ///
    /// Returns `false` if the pair was already taken.
    pub fn reserve(&mut self, pair: DocumentPair) -> bool {
        self.used.insert(pair)
    }

    pub fn contains(&self, pair: &DocumentPair) -> bool {
        self.used.contains(pair)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
