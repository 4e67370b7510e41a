use super::configuration::Configuration;
use super::configuration::Configurations;
use super::permutation::Permutations;

/// Lookup tables for one round of a schedule.
#[derive(Debug, Clone)]
pub struct Round {
    configurations: Configurations,
    permutations: Permutations,
    start: usize,
    cards: usize,
}

impl Round {
    pub fn new(
        configurations: Configurations,
        permutations: Permutations,
        start: usize,
        cards: usize,
    ) -> Self {
        Self {
            configurations,
            permutations,
            start,
            cards,
        }
    }
    /// Isomorphism classes of hands dealt through this round.
    pub fn size(&self) -> u64 {
        self.configurations.size()
    }
    /// Position of this round's first card in a full hand.
    pub fn start(&self) -> usize {
        self.start
    }
    /// Cards dealt in this round.
    pub fn cards(&self) -> usize {
        self.cards
    }
    pub fn configurations(&self) -> &Configurations {
        &self.configurations
    }
    pub fn permutations(&self) -> &Permutations {
        &self.permutations
    }
    /// Configuration and suit ordering number for a permutation key.
    pub fn lookup(&self, key: u64) -> (&Configuration, usize) {
        let (configuration, ordering) = self.permutations.get(key);
        (self.configurations.get(configuration), ordering)
    }
}
