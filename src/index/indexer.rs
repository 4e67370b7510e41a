use super::configuration::Configuration;
use super::configuration::Configurations;
use super::deal::Deal;
use super::error::IndexError;
use super::error::ScheduleError;
use super::permutation::Permutations;
use super::round::Round;
use super::schedule::Schedule;
use super::state::IndexerState;
use super::tables::Tables;
use crate::Index;
use crate::N_RANKS;
use crate::N_SUITS;
use crate::cards::Card;
use crate::cards::Rank;
use crate::cards::Suit;

/// Suit-isomorphic indexer for hands dealt over a fixed round schedule.
///
/// For every round `r`, hands dealt through `r` are mapped onto
/// `0..size(r)` such that two hands share an index exactly when one can be
/// turned into the other by relabeling suits and reordering cards within
/// rounds. [`HandIndexer::unindex`] inverts the map, returning the
/// canonical member of each class.
///
/// # Construction
///
/// All lookup tables are built up front. Construction is the only
/// expensive step; afterwards the indexer is immutable and may be shared
/// freely across threads. Building the same schedule repeatedly is best
/// left to [`cache::indexer`](super::cache::indexer).
///
/// # Index layout
///
/// A round's index space is split into consecutive blocks, one per
/// [`Configuration`]. Inside a block, each suit contributes the colex rank
/// of its cards, round by round, and suits with identical counts are
/// combined as an unordered multiset so that swapping them cannot change
/// the index.
#[derive(Debug, Clone)]
pub struct HandIndexer {
    schedule: Schedule,
    rounds: Vec<Round>,
}

impl TryFrom<Schedule> for HandIndexer {
    type Error = ScheduleError;
    fn try_from(schedule: Schedule) -> Result<Self, Self::Error> {
        log::debug!("building indexer for {}", schedule);
        let configurations = Configurations::tabulate(&schedule)?;
        let permutations = Permutations::tabulate(&schedule, &configurations)?;
        let rounds = configurations
            .into_iter()
            .zip(permutations)
            .enumerate()
            .map(|(r, (c, p))| Round::new(c, p, schedule.start(r), schedule.cards(r)))
            .collect();
        Ok(Self { schedule, rounds })
    }
}

impl HandIndexer {
    /// Builds an indexer for the given cards per round.
    pub fn new(cards_per_round: &[u8]) -> Result<Self, ScheduleError> {
        Schedule::try_from(cards_per_round).and_then(Self::try_from)
    }

    pub fn rounds(&self) -> usize {
        self.rounds.len()
    }
    pub fn cards_per_round(&self) -> &[u8] {
        self.schedule.cards_per_round()
    }
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
    /// Number of isomorphism classes of hands dealt through `round`.
    ///
    /// # Panics
    ///
    /// If `round` is not below [`HandIndexer::rounds`].
    pub fn size(&self, round: usize) -> Index {
        self.rounds[round].size()
    }
    /// Number of configurations tabulated for `round`.
    pub fn configurations(&self, round: usize) -> usize {
        self.rounds[round].configurations().len()
    }
    /// Number of permutation slots tabulated for `round`.
    pub fn permutations(&self, round: usize) -> usize {
        self.rounds[round].permutations().len()
    }
    /// A fresh accumulator for [`HandIndexer::index_next_round`].
    pub fn state(&self) -> IndexerState {
        IndexerState::new()
    }

    /// Folds the next round's cards into `state` and returns the index of
    /// the hand dealt so far.
    ///
    /// `cards` must hold exactly the cards of round `state.round()`, in any
    /// order. Every check happens before `state` is touched, so a failed
    /// call leaves it usable.
    pub fn index_next_round(
        &self,
        cards: &[Card],
        state: &mut IndexerState,
    ) -> Result<Index, IndexError> {
        let table = self.rounds.get(state.round).ok_or(IndexError::Exhausted)?;
        if cards.len() != table.cards() {
            return Err(IndexError::CardCount {
                expected: table.cards(),
                got: cards.len(),
            });
        }
        let tables = Tables::shared();
        let mut ranks = [0u16; N_SUITS];
        let mut shifted = [0u16; N_SUITS];
        for card in cards {
            if !card.is_valid() {
                return Err(IndexError::InvalidCard(u8::from(*card)));
            }
            let suit = card.suit() as usize;
            let bit = u16::from(card.rank());
            if (ranks[suit] | state.used[suit]) & bit != 0 {
                return Err(IndexError::DuplicateCard(*card));
            }
            ranks[suit] |= bit;
            shifted[suit] |= bit >> ((bit - 1) & state.used[suit]).count_ones();
        }
        for suit in 0..N_SUITS {
            let used = state.used[suit].count_ones() as usize;
            let this = ranks[suit].count_ones() as usize;
            state.suit_index[suit] +=
                state.suit_multiplier[suit] * tables.rank_set_index(shifted[suit]);
            state.suit_multiplier[suit] *= tables.ranks(N_RANKS - used, this);
            state.used[suit] |= ranks[suit];
        }
        let mut remaining = table.cards() as u64;
        for suit in 0..N_SUITS - 1 {
            let this = ranks[suit].count_ones() as u64;
            state.permutation_index += state.permutation_multiplier * this;
            state.permutation_multiplier *= remaining + 1;
            remaining -= this;
        }
        state.round += 1;
        let (configuration, ordering) = table.lookup(state.permutation_index);
        Ok(Self::combine(
            configuration,
            tables.suit_permutation(ordering),
            state,
        ))
    }

    /// Indices of a complete hand after every round.
    pub fn index_all(&self, cards: &[Card]) -> Result<Vec<Index>, IndexError> {
        self.check(cards, self.schedule.len())?;
        let mut state = self.state();
        self.rounds
            .iter()
            .map(|r| self.index_next_round(&cards[r.start()..][..r.cards()], &mut state))
            .collect()
    }

    /// Index of a complete hand after its last round.
    pub fn index_last(&self, cards: &[Card]) -> Result<Index, IndexError> {
        self.index(self.rounds() - 1, cards)
    }

    /// Index of a hand dealt through `round`; `cards` holds every card of
    /// rounds `0..=round` in dealing order.
    pub fn index(&self, round: usize, cards: &[Card]) -> Result<Index, IndexError> {
        self.round(round)?;
        self.check(cards, self.schedule.total(round))?;
        let mut state = self.state();
        let mut index = 0;
        for r in &self.rounds[..=round] {
            index = self.index_next_round(&cards[r.start()..][..r.cards()], &mut state)?;
        }
        Ok(index)
    }

    /// The canonical hand with index `index` after `round`.
    pub fn unindex(&self, round: usize, index: Index) -> Result<Deal, IndexError> {
        self.round(round)?;
        let mut cards = vec![Card::from(0u8); self.schedule.total(round)];
        self.unindex_into(round, index, &mut cards)?;
        let bounds = self.rounds[..=round]
            .iter()
            .map(Round::start)
            .chain(std::iter::once(cards.len()))
            .collect();
        Ok(Deal::new(cards, bounds))
    }

    /// Writes the canonical hand into `cards`, which must hold exactly the
    /// cards of rounds `0..=round`.
    ///
    /// Within each round, cards are grouped by suit in canonical suit order
    /// and ascending by rank within a suit.
    pub fn unindex_into(
        &self,
        round: usize,
        index: Index,
        cards: &mut [Card],
    ) -> Result<(), IndexError> {
        let table = self.round(round)?;
        if index >= table.size() {
            return Err(IndexError::IndexOutOfRange {
                round,
                index,
                size: table.size(),
            });
        }
        self.check(cards, self.schedule.total(round))?;
        let tables = Tables::shared();
        let configuration = table.configurations().locate(index);
        let mut index = index - configuration.offset();
        let mut suit_index = [0u64; N_SUITS];
        let mut i = 0;
        while i < N_SUITS {
            let j = configuration.group_end(i);
            let suit_size = configuration.suit_size(i);
            let group_size = tables.groups(suit_size + (j - i) as u64 - 1, j - i);
            let mut group_index = index % group_size;
            index /= group_size;
            for k in i..j - 1 {
                let len = j - k;
                suit_index[k] = Self::unrank(group_index, suit_size, len);
                group_index -= tables.groups(suit_index[k] + len as u64 - 1, len);
            }
            suit_index[j - 1] = group_index;
            i = j;
        }
        let mut location = self.rounds[..=round]
            .iter()
            .map(Round::start)
            .collect::<Vec<usize>>();
        for suit in 0..N_SUITS {
            let mut used = 0u16;
            let mut dealt = 0;
            for r in 0..=round {
                let n = configuration.count(suit, r, self.rounds());
                let size = tables.ranks(N_RANKS - dealt, n);
                dealt += n;
                let mut shifted = tables.rank_set(n, suit_index[suit] % size);
                suit_index[suit] /= size;
                let mut ranks = 0u16;
                while shifted != 0 {
                    let rank = tables.nth_unset(used, shifted.trailing_zeros() as usize);
                    shifted &= shifted - 1;
                    ranks |= 1 << rank;
                    cards[location[r]] = Card::from((Rank::from(rank), Suit::from(suit as u8)));
                    location[r] += 1;
                }
                used |= ranks;
            }
        }
        Ok(())
    }

    /// Index within the configuration's block: sub-indices are read in
    /// canonical suit order, and each group of equal suits is ranked as a
    /// multiset of its sorted sub-indices.
    fn combine(
        configuration: &Configuration,
        ordering: &[u8; N_SUITS],
        state: &IndexerState,
    ) -> Index {
        let tables = Tables::shared();
        let mut suit_index = ordering.map(|suit| state.suit_index[suit as usize]);
        let mut index = configuration.offset();
        let mut multiplier = 1u64;
        let mut i = 0;
        while i < N_SUITS {
            let j = configuration.group_end(i);
            let group = &mut suit_index[i..j];
            group.sort_unstable();
            let part = group
                .iter()
                .enumerate()
                .map(|(k, &sub)| tables.groups(sub + k as u64, k + 1))
                .sum::<u64>();
            let size = tables.groups(configuration.suit_size(i) + (j - i) as u64 - 1, j - i);
            index += multiplier * part;
            multiplier *= size;
            i = j;
        }
        index
    }

    /// Largest `x < suit_size` with C(x + len - 1, len) not above `group_index`.
    fn unrank(group_index: u64, suit_size: u64, len: usize) -> u64 {
        let tables = Tables::shared();
        let mut found = 0;
        let mut low = 0;
        let mut high = suit_size;
        while low < high {
            let mid = (low + high) / 2;
            if tables.groups(mid + len as u64 - 1, len) <= group_index {
                found = mid;
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        found
    }

    fn round(&self, round: usize) -> Result<&Round, IndexError> {
        self.rounds.get(round).ok_or(IndexError::RoundOutOfRange {
            round,
            rounds: self.rounds(),
        })
    }

    fn check(&self, cards: &[Card], expected: usize) -> Result<(), IndexError> {
        match cards.len() == expected {
            true => Ok(()),
            false => Err(IndexError::CardCount {
                expected,
                got: cards.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;
    use crate::cards::Deck;
    use crate::cards::Hand;
    use crate::cards::Permutation;
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use std::collections::HashSet;

    fn cards(bytes: &[u8]) -> Vec<Card> {
        bytes.iter().copied().map(Card::from).collect()
    }

    fn holdem() -> HandIndexer {
        HandIndexer::new(&[2, 3, 1, 1]).unwrap()
    }

    /// relabel suits and shuffle each round in place
    fn disguise(indexer: &HandIndexer, cards: &[Card], rng: &mut SmallRng) -> Vec<Card> {
        let mut cards = Permutation::random().relabel(cards);
        for r in 0..indexer.rounds() {
            let start = indexer.schedule().start(r);
            let end = start + indexer.schedule().cards(r);
            cards[start..end].shuffle(rng);
        }
        cards
    }

    #[test]
    fn preflop_fixtures() {
        let indexer = HandIndexer::new(&[2]).unwrap();
        assert!(indexer.size(0) == 169);
        assert!(indexer.index_last(&cards(&[0, 1])).unwrap() == 0);
        assert!(indexer.index_last(&cards(&[1, 48])).unwrap() == 78);
        assert!(indexer.unindex(0, 78).unwrap().cards() == cards(&[48, 1]).as_slice());
    }

    #[test]
    fn preflop_exhaustive() {
        let indexer = HandIndexer::new(&[2]).unwrap();
        let mut hits = vec![0usize; 169];
        for a in 0..52u8 {
            for b in (0..52u8).filter(|&b| b != a) {
                let index = indexer.index_last(&cards(&[a, b])).unwrap();
                assert!(index == indexer.index_last(&cards(&[b, a])).unwrap());
                hits[index as usize] += 1;
            }
        }
        assert!(hits.iter().all(|&n| n > 0));
        assert!(hits.iter().sum::<usize>() == 52 * 51);
        // ordered deals: 12 per pair, 8 per suited, 24 per offsuit
        assert!(hits.iter().filter(|&&n| n == 12).count() == 13);
        assert!(hits.iter().filter(|&&n| n == 8).count() == 78);
        assert!(hits.iter().filter(|&&n| n == 24).count() == 78);
    }

    #[test]
    fn preflop_round_trip() {
        let indexer = HandIndexer::new(&[2]).unwrap();
        for index in 0..indexer.size(0) {
            let deal = indexer.unindex(0, index).unwrap();
            assert!(indexer.index_last(deal.cards()).unwrap() == index);
        }
    }

    /// every index of the last round survives unindex then index, and every
    /// ordered deal lands on one of them
    fn exhaustive_round_trip(indexer: &HandIndexer, size: u64) {
        let last = indexer.rounds() - 1;
        assert!(indexer.size(last) == size);
        for index in 0..size {
            let deal = indexer.unindex(last, index).unwrap();
            assert!(indexer.index_last(deal.cards()).unwrap() == index);
        }
    }

    #[test]
    fn equal_suit_groups_round_trip() {
        // three and four suits holding one card each share a group
        exhaustive_round_trip(&HandIndexer::new(&[3]).unwrap(), 1_755);
        exhaustive_round_trip(&HandIndexer::new(&[4]).unwrap(), 16_432);
    }

    #[test]
    fn four_card_board_exhaustive() {
        let indexer = HandIndexer::new(&[4]).unwrap();
        let mut seen = HashSet::new();
        for a in 0..52u8 {
            for b in a + 1..52 {
                for c in b + 1..52 {
                    for d in c + 1..52 {
                        seen.insert(indexer.index_last(&cards(&[a, b, c, d])).unwrap());
                    }
                }
            }
        }
        assert!(seen.len() == 16_432);
        assert!(seen.iter().all(|&i| i < 16_432));
    }

    #[test]
    fn three_single_cards_round_trip() {
        let indexer = HandIndexer::new(&[1, 1, 1]).unwrap();
        exhaustive_round_trip(&indexer, 9_997);
        let mut seen = HashSet::new();
        for a in 0..52u8 {
            for b in (0..52u8).filter(|&b| b != a) {
                for c in (0..52u8).filter(|&c| c != a && c != b) {
                    seen.insert(indexer.index_last(&cards(&[a, b, c])).unwrap());
                }
            }
        }
        assert!(seen.len() == 9_997);
    }

    #[test]
    fn seven_card_stud() {
        let indexer = HandIndexer::new(&[3, 1, 1, 1, 1]).unwrap();
        assert!(indexer.size(4) == 4_846_806_640);
        let ref mut rng = SmallRng::seed_from_u64(0x57ad);
        for _ in 0..2_000 {
            let index = rng.random_range(0..indexer.size(4));
            let deal = indexer.unindex(4, index).unwrap();
            assert!(indexer.index_last(deal.cards()).unwrap() == index);
        }
        for _ in 0..500 {
            let deal = Deck::new().deal_with(7, rng);
            let other = disguise(&indexer, &deal, rng);
            assert!(indexer.index_all(&deal).unwrap() == indexer.index_all(&other).unwrap());
        }
        assert!(HandIndexer::new(&[1; 6]).unwrap().size(5) == 652_608_840);
    }

    #[test]
    fn holdem_sizes() {
        let indexer = holdem();
        assert!(indexer.rounds() == 4);
        assert!(indexer.size(0) == 169);
        assert!(indexer.size(1) == 1_286_792);
        assert!(indexer.size(2) == 55_190_538);
        assert!(indexer.size(3) == 2_428_287_420);
    }

    #[test]
    fn imperfect_recall_sizes() {
        assert!(HandIndexer::new(&[2, 4]).unwrap().size(1) == 13_960_050);
        assert!(HandIndexer::new(&[2, 5]).unwrap().size(1) == 123_156_254);
        assert!(HandIndexer::new(&[2, 3, 2]).unwrap().size(2) == 1_216_698_314);
    }

    #[test]
    fn two_single_cards_exhaustive() {
        let indexer = HandIndexer::new(&[1, 1]).unwrap();
        let mut seen = HashSet::new();
        for a in 0..52u8 {
            for b in (0..52u8).filter(|&b| b != a) {
                let index = indexer.index_last(&cards(&[a, b])).unwrap();
                assert!(index < indexer.size(1));
                seen.insert(index);
            }
        }
        assert!(indexer.size(0) == 13);
        assert!(seen.len() as u64 == indexer.size(1));
    }

    #[test]
    fn isomorphic_deals_share_indices() {
        let indexer = holdem();
        let ref mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..2_000 {
            let deal = Deck::new().deal_with(7, rng);
            let other = disguise(&indexer, &deal, rng);
            assert!(indexer.index_all(&deal).unwrap() == indexer.index_all(&other).unwrap());
        }
    }

    #[test]
    fn every_relabeling_agrees() {
        let indexer = holdem();
        let deal = Card::parse("AcKd 2h7h9s Td Qc").unwrap();
        let index = indexer.index_last(&deal).unwrap();
        for permutation in Permutation::exhaust() {
            assert!(indexer.index_last(&permutation.relabel(&deal)).unwrap() == index);
        }
    }

    #[test]
    fn random_round_trips() {
        let indexer = holdem();
        let ref mut rng = SmallRng::seed_from_u64(42);
        for round in 0..indexer.rounds() {
            for _ in 0..1_000 {
                let index = rng.random_range(0..indexer.size(round));
                let deal = indexer.unindex(round, index).unwrap();
                assert!(deal.rounds() == round + 1);
                assert!(Hand::from(&deal).size() == deal.cards().len());
                assert!(indexer.index(round, deal.cards()).unwrap() == index);
            }
        }
    }

    #[test]
    fn unindex_is_canonical() {
        let indexer = holdem();
        let ref mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..500 {
            let deal = Deck::new().deal_with(7, rng);
            let index = indexer.index_last(&deal).unwrap();
            let canonical = indexer.unindex(3, index).unwrap();
            let again = indexer.unindex(3, indexer.index_last(canonical.cards()).unwrap());
            assert!(again.unwrap() == canonical);
        }
    }

    #[test]
    fn flop_boundaries() {
        let indexer = holdem();
        let last = indexer.size(1) - 1;
        for index in [0, 1, last / 2, last - 1, last] {
            let deal = indexer.unindex(1, index).unwrap();
            assert!(indexer.index(1, deal.cards()).unwrap() == index);
        }
    }

    #[test]
    fn incremental_matches_batch() {
        let indexer = holdem();
        let ref mut rng = SmallRng::seed_from_u64(3);
        let mut state = indexer.state();
        for _ in 0..200 {
            let deal = Deck::new().deal_with(7, rng);
            state.reset();
            let incremental = [0..2, 2..5, 5..6, 6..7]
                .into_iter()
                .map(|range| indexer.index_next_round(&deal[range], &mut state).unwrap())
                .collect::<Vec<_>>();
            assert!(incremental == indexer.index_all(&deal).unwrap());
            assert!(indexer.index(1, &deal[..5]).unwrap() == incremental[1]);
            assert!(state.round() == 4);
        }
    }

    #[test]
    fn errors_leave_state_untouched() {
        let indexer = holdem();
        let mut state = indexer.state();
        let hole = Card::parse("AsKs").unwrap();
        indexer.index_next_round(&hole, &mut state).unwrap();
        let before = state;
        let repeat = Card::parse("As2c3c").unwrap();
        assert!(
            indexer.index_next_round(&repeat, &mut state)
                == Err(IndexError::DuplicateCard(Card::try_from("As").unwrap()))
        );
        let twice = Card::parse("2c2c3c").unwrap();
        assert!(matches!(
            indexer.index_next_round(&twice, &mut state),
            Err(IndexError::DuplicateCard(_))
        ));
        let invalid = cards(&[0, 60, 4]);
        assert!(indexer.index_next_round(&invalid, &mut state) == Err(IndexError::InvalidCard(60)));
        let short = Card::parse("2c3c").unwrap();
        assert!(matches!(
            indexer.index_next_round(&short, &mut state),
            Err(IndexError::CardCount { expected: 3, got: 2 })
        ));
        assert!(state == before);
    }

    #[test]
    fn exhausted_state() {
        let indexer = HandIndexer::new(&[2]).unwrap();
        let mut state = indexer.state();
        let hole = Card::parse("2c2d").unwrap();
        indexer.index_next_round(&hole, &mut state).unwrap();
        assert!(indexer.index_next_round(&hole, &mut state) == Err(IndexError::Exhausted));
    }

    #[test]
    fn query_errors() {
        let indexer = HandIndexer::new(&[2]).unwrap();
        assert!(matches!(
            indexer.unindex(0, 169),
            Err(IndexError::IndexOutOfRange { index: 169, size: 169, .. })
        ));
        assert!(matches!(
            indexer.unindex(1, 0),
            Err(IndexError::RoundOutOfRange { round: 1, rounds: 1 })
        ));
        assert!(matches!(
            indexer.index_last(&cards(&[1, 2, 3])),
            Err(IndexError::CardCount { .. })
        ));
        let mut small = [Card::from(0u8); 1];
        assert!(indexer.unindex_into(0, 0, &mut small).is_err());
    }

    #[test]
    fn construction_errors() {
        assert!(HandIndexer::new(&[]).unwrap_err() == ScheduleError::Empty);
        assert!(HandIndexer::new(&[2, 0]).unwrap_err() == ScheduleError::EmptyRound(1));
        assert!(HandIndexer::new(&[1; 9]).unwrap_err() == ScheduleError::TooManyRounds(9));
    }

    #[test]
    fn shared_across_threads() {
        let indexer = std::sync::Arc::new(HandIndexer::new(&[2, 3]).unwrap());
        let handles = (0..4u64)
            .map(|seed| {
                let indexer = indexer.clone();
                std::thread::spawn(move || {
                    let ref mut rng = SmallRng::seed_from_u64(seed);
                    (0..100)
                        .map(|_| Deck::new().deal_with(5, rng))
                        .map(|deal| indexer.index_last(&deal).unwrap())
                        .all(|index| index < indexer.size(1))
                })
            })
            .collect::<Vec<_>>();
        assert!(handles.into_iter().all(|h| h.join().unwrap()));
    }

    #[test]
    fn introspection() {
        let indexer = holdem();
        assert!(indexer.cards_per_round() == &[2, 3, 1, 1]);
        assert!(indexer.configurations(0) == 2);
        assert!((0..4).all(|r| indexer.permutations(r) > 0));
    }
}
