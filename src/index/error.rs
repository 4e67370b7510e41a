use crate::cards::Card;

/// Reasons a round schedule cannot become an indexer.
///
/// Construction either returns a complete [`HandIndexer`] or one of these;
/// tables built before the failure are dropped with the error.
///
/// [`HandIndexer`]: super::indexer::HandIndexer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("schedule has no rounds")]
    Empty,
    #[error("schedule has {0} rounds, at most {max} allowed", max = crate::MAX_ROUNDS)]
    TooManyRounds(usize),
    #[error("round {0} deals no cards")]
    EmptyRound(usize),
    #[error("round {round} deals {cards} cards, at most {max} allowed")]
    RoundTooLarge { round: usize, cards: u8, max: u8 },
    #[error("schedule deals {0} cards, the deck only has {max}", max = crate::N_CARDS)]
    TooManyCards(usize),
    #[error("round {0} has a group of equal suits too large for a 64-bit index")]
    GroupOverflow(usize),
    #[error("round {0} has more hands than fit in a 64-bit index")]
    IndexOverflow(usize),
    #[error("round {0} needs a permutation table beyond {max} entries", max = super::permutation::MAX_PERMUTATIONS)]
    PermutationOverflow(usize),
    #[error("round {0} has no canonical configuration table to match")]
    MissingConfiguration(usize),
    #[error("invalid schedule: {0}")]
    Parse(String),
}

/// Reasons a query against a built indexer fails.
///
/// Indexing errors are caller misuse and are reported before any
/// [`IndexerState`] is modified. Unindexing errors come from out-of-range
/// input and are always recoverable.
///
/// [`IndexerState`]: super::state::IndexerState
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("card byte {0} is outside the deck")]
    InvalidCard(u8),
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("expected {expected} cards, got {got}")]
    CardCount { expected: usize, got: usize },
    #[error("every round of the hand has already been indexed")]
    Exhausted,
    #[error("round {round} is out of range for {rounds} rounds")]
    RoundOutOfRange { round: usize, rounds: usize },
    #[error("index {index} is out of range for round {round} of size {size}")]
    IndexOutOfRange { round: usize, index: u64, size: u64 },
}
