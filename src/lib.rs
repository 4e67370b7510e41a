//! Suit-isomorphic indexing of poker hands.
//!
//! Hands dealt over several betting rounds are mapped to dense integer
//! indices such that every hand reachable from another by relabeling suits
//! shares its index. The mapping is invertible: any index recovers one
//! canonical representative hand.
//!
//! ## Modules
//!
//! - [`cards`]: [`Card`](cards::Card), [`Rank`](cards::Rank), [`Suit`](cards::Suit),
//!   card sets, decks and suit relabelings
//! - [`index`]: lookup table construction, the [`HandIndexer`](index::HandIndexer)
//!   query surface (`size`, `index`, `unindex`), recall presets and a
//!   process-wide indexer cache
//!
//! ## Example
//!
//! ```
//! use hand_index::cards::Card;
//! use hand_index::index::HandIndexer;
//!
//! let indexer = HandIndexer::new(&[2]).unwrap();
//! assert_eq!(indexer.size(0), 169);
//! let cards = [Card::from(1u8), Card::from(48u8)];
//! let index = indexer.index_last(&cards).unwrap();
//! assert_eq!(index, 78);
//! assert_eq!(indexer.unindex(0, index).unwrap().cards(), &[Card::from(48u8), Card::from(1u8)]);
//! ```
pub mod cards;
pub mod index;

// ============================================================================
// DECK GEOMETRY
// ============================================================================
/// Ranks per suit.
pub const N_RANKS: usize = 13;
/// Suits per deck.
pub const N_SUITS: usize = 4;
/// Cards per deck.
pub const N_CARDS: usize = N_RANKS * N_SUITS;
/// Upper bound on the number of rounds an indexer will tabulate.
pub const MAX_ROUNDS: usize = 8;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Position of a hand within a round's index space.
pub type Index = u64;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and Monte Carlo sampling.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize terminal logging for the command line tools.
/// `verbose` lowers the threshold from INFO to DEBUG.
#[cfg(feature = "cli")]
pub fn log(verbose: bool) {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let level = match verbose {
        true => log::LevelFilter::Debug,
        false => log::LevelFilter::Info,
    };
    let term = simplelog::TermLogger::new(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    if simplelog::CombinedLogger::init(vec![term]).is_err() {
        log::warn!("logger already initialized");
    }
}
