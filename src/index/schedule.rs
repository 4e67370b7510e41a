use super::error::ScheduleError;
use crate::MAX_ROUNDS;
use crate::N_CARDS;

/// Most cards one round may deal. A round's per-suit count lives in one
/// 4-bit nibble of a packed configuration.
pub const MAX_CARDS_PER_ROUND: u8 = 15;

/// How many cards each betting round deals, e.g. `[2, 3, 1, 1]` for
/// hole cards, flop, turn and river.
///
/// A `Schedule` is always valid: between 1 and [`MAX_ROUNDS`] rounds, each
/// dealing at least one card, and never more cards than the deck holds.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u8>", into = "Vec<u8>"))]
pub struct Schedule(Vec<u8>);

impl Schedule {
    /// Number of rounds.
    pub fn rounds(&self) -> usize {
        self.0.len()
    }
    /// Cards dealt in `round`.
    pub fn cards(&self, round: usize) -> usize {
        self.0[round] as usize
    }
    /// Per-round card counts.
    pub fn cards_per_round(&self) -> &[u8] {
        &self.0
    }
    /// Position of the first card of `round` in a full card list.
    pub fn start(&self, round: usize) -> usize {
        self.0[..round].iter().map(|&n| n as usize).sum()
    }
    /// Cards dealt through the end of `round`.
    pub fn total(&self, round: usize) -> usize {
        self.start(round) + self.cards(round)
    }
    /// Cards dealt over the whole schedule.
    pub fn len(&self) -> usize {
        self.total(self.rounds() - 1)
    }
}

impl TryFrom<Vec<u8>> for Schedule {
    type Error = ScheduleError;
    fn try_from(rounds: Vec<u8>) -> Result<Self, Self::Error> {
        if rounds.is_empty() {
            return Err(ScheduleError::Empty);
        }
        if rounds.len() > MAX_ROUNDS {
            return Err(ScheduleError::TooManyRounds(rounds.len()));
        }
        if let Some(round) = rounds.iter().position(|&n| n == 0) {
            return Err(ScheduleError::EmptyRound(round));
        }
        if let Some(round) = rounds.iter().position(|&n| n > MAX_CARDS_PER_ROUND) {
            return Err(ScheduleError::RoundTooLarge {
                round,
                cards: rounds[round],
                max: MAX_CARDS_PER_ROUND,
            });
        }
        let total = rounds.iter().map(|&n| n as usize).sum::<usize>();
        if total > N_CARDS {
            return Err(ScheduleError::TooManyCards(total));
        }
        Ok(Self(rounds))
    }
}

impl TryFrom<&[u8]> for Schedule {
    type Error = ScheduleError;
    fn try_from(rounds: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from(rounds.to_vec())
    }
}

/// comma-separated card counts, e.g. "2,3,1,1"
impl TryFrom<&str> for Schedule {
    type Error = ScheduleError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.split(',')
            .map(str::trim)
            .map(|n| {
                n.parse::<u8>()
                    .map_err(|e| ScheduleError::Parse(format!("{:?}: {}", n, e)))
            })
            .collect::<Result<Vec<u8>, _>>()
            .and_then(Self::try_from)
    }
}

impl From<Schedule> for Vec<u8> {
    fn from(schedule: Schedule) -> Self {
        schedule.0
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let rounds = self
            .0
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "[{}]", rounds)
    }
}
