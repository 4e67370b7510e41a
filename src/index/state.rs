use crate::N_SUITS;

/// Running accumulator for indexing one hand a round at a time.
///
/// Each call to [`HandIndexer::index_next_round`] folds one round's cards
/// into the per-suit sub-indices and the permutation key, then advances the
/// round counter. A state is tied to the indexer that advanced it; use
/// [`IndexerState::reset`] to start a new hand.
///
/// [`HandIndexer::index_next_round`]: super::indexer::HandIndexer::index_next_round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexerState {
    pub(super) suit_index: [u64; N_SUITS],
    pub(super) suit_multiplier: [u64; N_SUITS],
    pub(super) used: [u16; N_SUITS],
    pub(super) permutation_index: u64,
    pub(super) permutation_multiplier: u64,
    pub(super) round: usize,
}

impl Default for IndexerState {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexerState {
    pub const fn new() -> Self {
        Self {
            suit_index: [0; N_SUITS],
            suit_multiplier: [1; N_SUITS],
            used: [0; N_SUITS],
            permutation_index: 0,
            permutation_multiplier: 1,
            round: 0,
        }
    }
    /// Rounds folded in so far.
    pub fn round(&self) -> usize {
        self.round
    }
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
