use super::error::ScheduleError;
use super::schedule::Schedule;
use super::tables::Tables;
use crate::N_RANKS;
use crate::N_SUITS;

/// Bits per round in a packed per-suit count.
pub const ROUND_SHIFT: usize = 4;
/// One round's nibble.
pub const ROUND_MASK: u32 = 0xf;

/// The canonical shape of a hand up to some round: how many cards of each
/// suit were dealt in each round, with suits ordered so that their packed
/// counts never increase.
///
/// Each suit's counts are packed one nibble per round with round 0 in the
/// most significant nibble, so comparing packed values compares the
/// per-round counts lexicographically.
///
/// Alongside the shape live the figures the indexer needs:
/// - `suit_size[i]`: number of distinct rank patterns suit `i` can show
/// - `equal`: bit `i` set when suit `i` has the same counts as suit `i - 1`
/// - `size`: hands of this shape, up to suit relabeling
/// - `offset`: where this shape's block starts in the round's index space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    counts: [u32; N_SUITS],
    suit_size: [u64; N_SUITS],
    equal: u8,
    size: u64,
    offset: u64,
}

impl Configuration {
    /// Derives sizes and suit groups of a canonical count vector at `round`.
    /// `offset` is left at zero until the whole round is tabulated.
    pub fn new(
        schedule: &Schedule,
        round: usize,
        counts: [u32; N_SUITS],
    ) -> Result<Self, ScheduleError> {
        let tables = Tables::shared();
        let mut suit_size = [0u64; N_SUITS];
        for suit in 0..N_SUITS {
            let mut remaining = N_RANKS;
            let mut size = 1u64;
            for r in 0..=round {
                let n = Self::nibble(schedule, counts[suit], r) as usize;
                size *= tables.ranks(remaining, n);
                remaining -= n;
            }
            suit_size[suit] = size;
        }
        let mut equal = 0u8;
        let mut size = 1u64;
        let mut i = 0;
        while i < N_SUITS {
            let j = (i + 1..N_SUITS)
                .find(|&j| counts[j] != counts[i])
                .unwrap_or(N_SUITS);
            (i + 1..j).for_each(|k| equal |= 1 << k);
            let group = tables
                .checked_groups(suit_size[i] + (j - i) as u64 - 1, j - i)
                .ok_or(ScheduleError::GroupOverflow(round))?;
            size = size
                .checked_mul(group)
                .ok_or(ScheduleError::IndexOverflow(round))?;
            i = j;
        }
        Ok(Self {
            counts,
            suit_size,
            equal,
            size,
            offset: 0,
        })
    }

    /// Packed per-suit counts.
    pub fn counts(&self) -> &[u32; N_SUITS] {
        &self.counts
    }
    /// Cards of `suit` dealt in `round` of a schedule with `rounds` rounds.
    pub fn count(&self, suit: usize, round: usize, rounds: usize) -> usize {
        (self.counts[suit] >> ROUND_SHIFT * (rounds - round - 1) & ROUND_MASK) as usize
    }
    pub fn suit_size(&self, suit: usize) -> u64 {
        self.suit_size[suit]
    }
    pub fn size(&self) -> u64 {
        self.size
    }
    pub fn offset(&self) -> u64 {
        self.offset
    }
    /// Whether `suit` shares its counts with the suit before it.
    pub fn is_equal(&self, suit: usize) -> bool {
        self.equal & 1 << suit != 0
    }
    /// One past the last suit of the group of equal suits starting at `suit`.
    pub fn group_end(&self, suit: usize) -> usize {
        (suit + 1..N_SUITS)
            .find(|&j| !self.is_equal(j))
            .unwrap_or(N_SUITS)
    }

    fn nibble(schedule: &Schedule, packed: u32, round: usize) -> u32 {
        packed >> ROUND_SHIFT * (schedule.rounds() - round - 1) & ROUND_MASK
    }
}

/// The configurations of one round, in ascending order of packed counts,
/// with offsets forming the prefix sums of their sizes.
#[derive(Debug, Clone, Default)]
pub struct Configurations(Vec<Configuration>);

impl Configurations {
    /// Enumerates every canonical count vector of every round of a schedule.
    pub fn tabulate(schedule: &Schedule) -> Result<Vec<Self>, ScheduleError> {
        let mut shapes = vec![Vec::<[u32; N_SUITS]>::new(); schedule.rounds()];
        walk(schedule, true, &mut |round, counts| shapes[round].push(*counts));
        shapes
            .into_iter()
            .enumerate()
            .map(|(round, shapes)| Self::round(schedule, round, shapes))
            .collect()
    }

    fn round(
        schedule: &Schedule,
        round: usize,
        mut shapes: Vec<[u32; N_SUITS]>,
    ) -> Result<Self, ScheduleError> {
        shapes.sort();
        let mut accum = 0u64;
        let mut configurations = Vec::with_capacity(shapes.len());
        for counts in shapes {
            let mut configuration = Configuration::new(schedule, round, counts)?;
            configuration.offset = accum;
            accum = accum
                .checked_add(configuration.size)
                .ok_or(ScheduleError::IndexOverflow(round))?;
            configurations.push(configuration);
        }
        log::debug!(
            "round {} of {}: {} configurations, {} hands",
            round,
            schedule,
            configurations.len(),
            accum
        );
        Ok(Self(configurations))
    }

    /// Number of isomorphism classes in the round.
    pub fn size(&self) -> u64 {
        self.0.last().map(|c| c.offset + c.size).unwrap_or(0)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn get(&self, position: usize) -> &Configuration {
        &self.0[position]
    }
    /// Position of a canonical count vector.
    pub fn find(&self, counts: &[u32; N_SUITS]) -> Option<usize> {
        self.0.binary_search_by(|c| c.counts.cmp(counts)).ok()
    }
    /// The configuration whose block holds `index`: the last one whose
    /// offset does not exceed it.
    pub fn locate(&self, index: u64) -> &Configuration {
        let after = self.0.partition_point(|c| c.offset <= index);
        &self.0[after.saturating_sub(1)]
    }
}

/// Depth-first walk over per-suit count vectors, round by round, calling
/// `observe` on each complete assignment of a round's cards to suits.
///
/// With `canonical` set, a suit whose counts so far equal the previous
/// suit's may not receive more cards than it, so only non-increasing
/// orderings are produced. Without it every ordering is produced.
pub fn walk<F>(schedule: &Schedule, canonical: bool, observe: &mut F)
where
    F: FnMut(usize, &[u32; N_SUITS]),
{
    let mut walk = Walk {
        schedule,
        canonical,
        used: [0; N_SUITS],
        counts: [0; N_SUITS],
        observe,
    };
    walk.recurse(0, schedule.cards(0) as u32, 0, (1 << N_SUITS) - 2);
}

struct Walk<'a, F> {
    schedule: &'a Schedule,
    canonical: bool,
    used: [u32; N_SUITS],
    counts: [u32; N_SUITS],
    observe: &'a mut F,
}

impl<F> Walk<'_, F>
where
    F: FnMut(usize, &[u32; N_SUITS]),
{
    fn recurse(&mut self, round: usize, remaining: u32, suit: usize, equal: u8) {
        if suit == N_SUITS {
            (self.observe)(round, &self.counts);
            if round + 1 < self.schedule.rounds() {
                let next = self.schedule.cards(round + 1) as u32;
                self.recurse(round + 1, next, 0, equal);
            }
            return;
        }
        let shift = ROUND_SHIFT * (self.schedule.rounds() - round - 1);
        let min = match suit {
            s if s == N_SUITS - 1 => remaining,
            _ => 0,
        };
        let mut max = (N_RANKS as u32 - self.used[suit]).min(remaining);
        let was_equal = self.canonical && equal & 1 << suit != 0;
        let previous = match was_equal {
            true => self.counts[suit - 1] >> shift & ROUND_MASK,
            false => N_RANKS as u32 + 1,
        };
        if was_equal {
            max = max.min(previous);
        }
        let (counts, used) = (self.counts[suit], self.used[suit]);
        for n in min..=max {
            let still = (was_equal && n == previous) as u8;
            let equal = equal & !(1 << suit) | still << suit;
            self.counts[suit] = counts | n << shift;
            self.used[suit] = used + n;
            self.recurse(round, remaining - n, suit + 1, equal);
        }
        self.counts[suit] = counts;
        self.used[suit] = used;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(rounds: &[u8]) -> Schedule {
        Schedule::try_from(rounds).unwrap()
    }

    #[test]
    fn preflop_shapes() {
        let ref schedule = schedule(&[2]);
        let rounds = Configurations::tabulate(schedule).unwrap();
        let preflop = &rounds[0];
        assert!(preflop.len() == 2);
        assert!(preflop.get(0).counts() == &[1, 1, 0, 0]);
        assert!(preflop.get(1).counts() == &[2, 0, 0, 0]);
        assert!(preflop.get(0).size() == 91);
        assert!(preflop.get(1).size() == 78);
        assert!(preflop.get(1).offset() == 91);
        assert!(preflop.size() == 169);
    }

    #[test]
    fn equal_groups() {
        let ref schedule = schedule(&[2]);
        let rounds = Configurations::tabulate(schedule).unwrap();
        let offsuit = rounds[0].get(0);
        assert!(offsuit.is_equal(1));
        assert!(!offsuit.is_equal(2));
        assert!(offsuit.is_equal(3));
        assert!(offsuit.group_end(0) == 2);
        assert!(offsuit.group_end(2) == 4);
        assert!(offsuit.suit_size(0) == 13);
        assert!(offsuit.suit_size(2) == 1);
    }

    #[test]
    fn shapes_are_sorted_and_canonical() {
        let ref schedule = schedule(&[2, 3, 1, 1]);
        for round in Configurations::tabulate(schedule).unwrap() {
            for i in 1..round.len() {
                assert!(round.get(i - 1).counts() < round.get(i).counts());
                assert!(round.get(i - 1).offset() < round.get(i).offset());
            }
            for i in 0..round.len() {
                let counts = round.get(i).counts();
                assert!(counts.windows(2).all(|w| w[0] >= w[1]));
            }
        }
    }

    #[test]
    fn holdem_round_sizes() {
        let ref schedule = schedule(&[2, 3, 1, 1]);
        let sizes = Configurations::tabulate(schedule)
            .unwrap()
            .iter()
            .map(|round| round.size())
            .collect::<Vec<_>>();
        assert!(sizes == vec![169, 1_286_792, 55_190_538, 2_428_287_420]);
    }

    #[test]
    fn locate_finds_blocks() {
        let ref schedule = schedule(&[2]);
        let rounds = Configurations::tabulate(schedule).unwrap();
        assert!(rounds[0].locate(0).offset() == 0);
        assert!(rounds[0].locate(90).offset() == 0);
        assert!(rounds[0].locate(91).offset() == 91);
        assert!(rounds[0].locate(168).offset() == 91);
        assert!(rounds[0].find(&[2, 0, 0, 0]) == Some(1));
        assert!(rounds[0].find(&[0, 2, 0, 0]).is_none());
    }

    #[test]
    fn unconstrained_walk_counts_every_ordering() {
        let ref schedule = schedule(&[2]);
        let mut seen = Vec::new();
        walk(schedule, false, &mut |_, counts| seen.push(*counts));
        // compositions of 2 into 4 parts
        assert!(seen.len() == 10);
    }

    #[test]
    fn large_suit_sub_indices() {
        let stud = Configurations::tabulate(&schedule(&[3, 1, 1, 1, 1])).unwrap();
        assert!(stud[4].size() == 4_846_806_640);
        let largest = (0..stud[4].len())
            .map(|c| stud[4].get(c).suit_size(0))
            .max();
        assert!(largest == Some(1_441_440));
        let singles = Configurations::tabulate(&schedule(&[1; 6])).unwrap();
        assert!(singles[5].size() == 652_608_840);
    }

    #[test]
    fn oversized_rounds_overflow_index() {
        let ref schedule = schedule(&[15, 15]);
        assert!(matches!(
            Configurations::tabulate(schedule),
            Err(ScheduleError::IndexOverflow(1))
        ));
    }
}
