use super::configuration::Configurations;
use super::configuration::ROUND_MASK;
use super::configuration::ROUND_SHIFT;
use super::configuration::walk;
use super::error::ScheduleError;
use super::schedule::Schedule;
use crate::N_SUITS;

/// Largest permutation table a round may need.
pub const MAX_PERMUTATIONS: u64 = 1 << 24;

/// Per-round lookup from a raw per-suit count vector to the configuration
/// it canonicalizes to and the suit ordering that canonicalizes it.
///
/// Count vectors are keyed by a mixed-radix number over rounds and the
/// first three suits, the same number [`IndexerState`] accumulates while
/// cards are dealt.
///
/// [`IndexerState`]: super::state::IndexerState
#[derive(Debug, Clone, Default)]
pub struct Permutations {
    configuration: Vec<u32>,
    ordering: Vec<u8>,
}

impl Permutations {
    /// Tables every round of `schedule` against its canonical
    /// `configurations`. Fails if a count vector canonicalizes to a shape
    /// missing from them, which only happens when they belong to another
    /// schedule.
    pub fn tabulate(
        schedule: &Schedule,
        configurations: &[Configurations],
    ) -> Result<Vec<Self>, ScheduleError> {
        let mut observed = vec![Vec::<(u64, [u32; N_SUITS])>::new(); schedule.rounds()];
        let mut overflow = None;
        walk(schedule, false, &mut |round, counts| {
            match Self::key(schedule, round, counts) {
                Some(key) if key < MAX_PERMUTATIONS => observed[round].push((key, *counts)),
                _ => overflow = overflow.or(Some(round)),
            }
        });
        if let Some(round) = overflow {
            return Err(ScheduleError::PermutationOverflow(round));
        }
        if configurations.len() < schedule.rounds() {
            return Err(ScheduleError::MissingConfiguration(configurations.len()));
        }
        let rounds = observed
            .into_iter()
            .zip(configurations)
            .enumerate()
            .map(|(round, (observed, configurations))| {
                Self::round(round, observed, configurations)
            })
            .collect::<Result<Vec<Self>, _>>()?;
        for (round, permutations) in rounds.iter().enumerate() {
            log::debug!(
                "round {} of {}: {} permutations",
                round,
                schedule,
                permutations.len()
            );
        }
        Ok(rounds)
    }

    fn round(
        round: usize,
        observed: Vec<(u64, [u32; N_SUITS])>,
        configurations: &Configurations,
    ) -> Result<Self, ScheduleError> {
        let len = observed.iter().map(|(key, _)| key + 1).max().unwrap_or(0) as usize;
        let mut configuration = vec![0u32; len];
        let mut ordering = vec![0u8; len];
        for (key, counts) in observed {
            let order = Self::order(&counts);
            let sorted = order.map(|suit| counts[suit]);
            configuration[key as usize] = configurations
                .find(&sorted)
                .ok_or(ScheduleError::MissingConfiguration(round))?
                as u32;
            ordering[key as usize] = Self::rank(&order);
        }
        Ok(Self {
            configuration,
            ordering,
        })
    }

    /// Number of slots in the table.
    pub fn len(&self) -> usize {
        self.configuration.len()
    }
    /// Configuration position and suit ordering number for a count key.
    pub fn get(&self, key: u64) -> (usize, usize) {
        (
            self.configuration[key as usize] as usize,
            self.ordering[key as usize] as usize,
        )
    }

    /// Mixed-radix key of a count vector through `round`: per round, the
    /// counts of the first three suits in bases `remaining + 1`.
    pub fn key(schedule: &Schedule, round: usize, counts: &[u32; N_SUITS]) -> Option<u64> {
        let mut key = 0u64;
        let mut mult = 1u64;
        for r in 0..=round {
            let shift = ROUND_SHIFT * (schedule.rounds() - r - 1);
            let mut remaining = schedule.cards(r) as u64;
            for suit in 0..N_SUITS - 1 {
                let n = (counts[suit] >> shift & ROUND_MASK) as u64;
                key = key.checked_add(mult.checked_mul(n)?)?;
                mult = mult.checked_mul(remaining + 1)?;
                remaining -= n;
            }
        }
        Some(key)
    }

    /// Suits by packed count, largest first; ties keep suit order.
    pub fn order(counts: &[u32; N_SUITS]) -> [usize; N_SUITS] {
        let mut order = [0, 1, 2, 3];
        order.sort_by(|a, b| counts[*b].cmp(&counts[*a]));
        order
    }

    /// Lehmer-style number of an ordering, inverse of
    /// [`Tables::suit_permutation`](super::tables::Tables::suit_permutation).
    pub fn rank(order: &[usize; N_SUITS]) -> u8 {
        let mut index = 0;
        let mut mult = 1;
        let mut used = 0u32;
        for (i, &suit) in order.iter().enumerate() {
            let bit = 1u32 << suit;
            let smaller = ((bit - 1) & used).count_ones() as usize;
            index += (suit - smaller) * mult;
            mult *= N_SUITS - i;
            used |= bit;
        }
        index as u8
    }
}
