use super::card::Card;
use super::suit::Suit;
use crate::Arbitrary;

/// Hand represents an unordered set of Cards, stored as a u64 of which only
/// the 52 LSBs are used. Each bit represents a unique card in the set.
/// Order of dealing is lost here, which is exactly what the indexer needs
/// for duplicate detection and for walking the remaining deck.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hand(u64);

impl Hand {
    pub const fn empty() -> Self {
        Self(0)
    }
    pub fn add(lhs: Self, rhs: Self) -> Self {
        debug_assert!(u64::from(lhs) & u64::from(rhs) == 0);
        Self(lhs.0 | rhs.0)
    }
    pub fn complement(&self) -> Self {
        Self(self.0 ^ Self::mask())
    }
    pub fn size(&self) -> usize {
        self.0.count_ones() as usize
    }
    pub fn contains(&self, card: &Card) -> bool {
        self.0 & u64::from(*card) != 0
    }
    pub fn remove(&mut self, card: Card) {
        self.0 &= !u64::from(card);
    }
    /// the cards of a single suit
    pub fn of(&self, suit: &Suit) -> Hand {
        Self(self.0 & u64::from(*suit))
    }
    /// the k-th lowest card in the set, if the set is large enough.
    ///
    /// popcounts skip whole 16-bit chunks, then the remainder is
    /// found by clearing low bits inside the chunk that holds it.
    pub fn nth(&self, k: usize) -> Option<Card> {
        let mut k = k as u32;
        let mut bits = self.0;
        for chunk in 0..4u32 {
            let lo = bits & 0xFFFF;
            let n = lo.count_ones();
            if k < n {
                let mut lo = lo;
                for _ in 0..k {
                    lo &= lo - 1;
                }
                return Some(Card::from((16 * chunk + lo.trailing_zeros()) as u8));
            }
            k -= n;
            bits >>= 16;
        }
        None
    }
    pub const fn mask() -> u64 {
        0x000FFFFFFFFFFFFF
    }
}

/// we can empty a hand from low to high
/// by removing the lowest card until the hand is empty
impl Iterator for Hand {
    type Item = Card;
    fn next(&mut self) -> Option<Self::Item> {
        if self.size() == 0 {
            None
        } else {
            let card = Card::from(self.0.trailing_zeros() as u8);
            self.remove(card);
            Some(card)
        }
    }
}

/// u64 isomorphism
impl From<u64> for Hand {
    fn from(n: u64) -> Self {
        Self(n & Self::mask())
    }
}
impl From<Hand> for u64 {
    fn from(h: Hand) -> Self {
        h.0
    }
}

impl From<Card> for Hand {
    fn from(card: Card) -> Self {
        Self(u64::from(card))
    }
}

/// slice of Cards, duplicates collapse
impl From<&[Card]> for Hand {
    fn from(cards: &[Card]) -> Self {
        Self(
            cards
                .iter()
                .filter(|c| c.is_valid())
                .map(|c| u64::from(*c))
                .fold(0u64, |a, b| a | b),
        )
    }
}

/// str isomorphism
impl TryFrom<&str> for Hand {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Card::parse(s).map(|cards| Self::from(cards.as_slice()))
    }
}

impl Arbitrary for Hand {
    fn random() -> Self {
        Self::from(rand::random::<u64>())
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for card in *self {
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}
