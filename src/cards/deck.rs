use super::card::Card;
use super::hand::Hand;
use rand::Rng;

/// A mutable deck of cards supporting random draws.
///
/// Wraps a [`Hand`] representing the remaining cards. Used to generate
/// random deals for verification and benchmarking: cards come out in the
/// order they are drawn, which the indexer treats as dealing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deck(Hand);

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// Creates a fresh 52-card deck.
    pub fn new() -> Self {
        Self(Hand::from(Hand::mask()))
    }
    /// Tests whether a card is still in the deck.
    pub fn contains(&self, card: &Card) -> bool {
        self.0.contains(card)
    }
    /// Number of cards left.
    pub fn size(&self) -> usize {
        self.0.size()
    }
    /// Draws and removes a uniformly random card from the deck.
    pub fn draw(&mut self) -> Card {
        self.draw_with(&mut rand::rng())
    }
    /// Same as [`Deck::draw`] with a caller-supplied generator,
    /// so seeded tests can reproduce their deals.
    pub fn draw_with<R: Rng>(&mut self, rng: &mut R) -> Card {
        debug_assert!(self.0.size() > 0);
        let i = rng.random_range(0..self.0.size());
        let card = self.0.nth(i).expect("index below deck size");
        self.0.remove(card);
        card
    }
    /// Draws `n` cards in dealing order.
    pub fn deal_with<R: Rng>(&mut self, n: usize, rng: &mut R) -> Vec<Card> {
        (0..n).map(|_| self.draw_with(rng)).collect()
    }
}
