use crate::cards::Card;
use crate::cards::Hand;

/// Canonical cards recovered from an index, in dealing order.
///
/// Rounds occupy consecutive slices; `bounds` holds each round's start
/// followed by the end of the last round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    cards: Vec<Card>,
    bounds: Vec<usize>,
}

impl Deal {
    pub(super) fn new(cards: Vec<Card>, bounds: Vec<usize>) -> Self {
        debug_assert!(bounds.last() == Some(&cards.len()));
        Self { cards, bounds }
    }
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
    /// Number of rounds dealt.
    pub fn rounds(&self) -> usize {
        self.bounds.len() - 1
    }
    /// Cards dealt in round `i`.
    pub fn round(&self, i: usize) -> &[Card] {
        &self.cards[self.bounds[i]..self.bounds[i + 1]]
    }
}

impl From<Deal> for Vec<Card> {
    fn from(deal: Deal) -> Self {
        deal.cards
    }
}

impl From<&Deal> for Hand {
    fn from(deal: &Deal) -> Self {
        Hand::from(deal.cards())
    }
}

impl std::fmt::Display for Deal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let rounds = (0..self.rounds())
            .map(|i| {
                self.round(i)
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        write!(f, "{}", rounds.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_slice_cards() {
        let cards = Card::parse("AsKs 2c3c4c 5d").unwrap();
        let deal = Deal::new(cards, vec![0, 2, 5, 6]);
        assert!(deal.rounds() == 3);
        assert!(deal.round(0) == Card::parse("AsKs").unwrap().as_slice());
        assert!(deal.round(2) == Card::parse("5d").unwrap().as_slice());
        assert!(deal.to_string() == "AsKs | 2c3c4c | 5d");
        assert!(Hand::from(&deal).size() == 6);
    }
}
