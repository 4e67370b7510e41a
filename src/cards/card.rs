use super::rank::Rank;
use super::suit::Suit;
use crate::Arbitrary;
use crate::N_CARDS;

/// A playing card encoded as a single byte.
///
/// The 52 cards are bijectively mapped to `0..52` where the encoding is
/// `rank * 4 + suit`. This yields a natural ordering where cards are sorted
/// first by rank, then by suit within each rank.
///
/// # Representations
///
/// - `u8`: Compact index `0..52`, the boundary encoding of the indexer
/// - `u64`: Single-bit representation for set membership in [`Hand`]
///
/// # Parsing
///
/// Cards can be parsed from two-character strings like `"As"` (ace of spades)
/// or `"Tc"` (ten of clubs). Use [`Card::parse`] for multiple cards.
///
/// [`Hand`]: super::hand::Hand
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card(u8);

impl Card {
    /// Extracts the rank component (2 through Ace).
    pub fn rank(&self) -> Rank {
        Rank::from(self.0 / 4)
    }
    /// Extracts the suit component (clubs, diamonds, hearts, spades).
    pub fn suit(&self) -> Suit {
        Suit::from(self.0 % 4)
    }
    /// Whether the byte names one of the 52 cards.
    /// Raw bytes are accepted by `From<u8>` so that callers holding
    /// foreign encodings get an error from the indexer instead of a panic.
    pub fn is_valid(&self) -> bool {
        (self.0 as usize) < N_CARDS
    }
    /// Parses a string of concatenated card notations into a vector of cards.
    ///
    /// Whitespace is ignored. Each card is two characters: rank then suit.
    /// Returns an error if any card fails to parse.
    pub fn parse(s: &str) -> Result<Vec<Self>, String> {
        s.replace(char::is_whitespace, "")
            .chars()
            .collect::<Vec<_>>()
            .chunks(2)
            .map(|pair| pair.iter().collect::<String>())
            .map(|pair| Self::try_from(pair.as_str()))
            .collect::<Result<Vec<Self>, _>>()
    }
}

/// (Rank, Suit) isomorphism
impl From<(Rank, Suit)> for Card {
    fn from((r, s): (Rank, Suit)) -> Self {
        Self(u8::from(r) * 4 + u8::from(s))
    }
}

/// u8 isomorphism
/// each card is mapped to its location in a sorted deck 0-51
/// Ts
/// 35
/// 0b00100011
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.0
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self(n)
    }
}

/// u64 representation
/// each card is just one bit turned on. this is a one-way morphism
/// Ts
/// xxxxxxxxxxxx 0000000000000000100000000000000000000000000000000000
impl From<Card> for u64 {
    fn from(c: Card) -> u64 {
        1 << u8::from(c)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.is_valid() {
            true => write!(f, "{}{}", self.rank(), self.suit()),
            false => write!(f, "??"),
        }
    }
}

/// str isomorphism
impl TryFrom<&str> for Card {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().len() {
            2 => {
                let rank = Rank::try_from(&s.trim()[0..1])?;
                let suit = Suit::try_from(&s.trim()[1..2])?;
                Ok(Card::from((rank, suit)))
            }
            _ => Err(format!("card must be 2 characters: {}", s)),
        }
    }
}

impl Arbitrary for Card {
    fn random() -> Self {
        Self(rand::random_range(0..N_CARDS as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_rank_suit() {
        let card = Card::random();
        let suit = card.suit();
        let rank = card.rank();
        assert!(card == Card::from((rank, suit)));
    }

    #[test]
    fn bijective_u8() {
        let card = Card::random();
        assert!(card == Card::from(u8::from(card)));
    }

    #[test]
    fn rank_major_encoding() {
        assert!(u8::from(Card::from((Rank::Two, Suit::D))) == 1);
        assert!(u8::from(Card::from((Rank::Ace, Suit::C))) == 48);
        assert!(u8::from(Card::from((Rank::Ace, Suit::S))) == 51);
    }

    #[test]
    fn parse_cards() {
        let cards = Card::parse("As Tc 2d").unwrap();
        assert!(cards.len() == 3);
        assert!(cards[0] == Card::from((Rank::Ace, Suit::S)));
        assert!(cards[1] == Card::from((Rank::Ten, Suit::C)));
        assert!(cards[2] == Card::from((Rank::Two, Suit::D)));
        assert!(Card::parse("Ax").is_err());
    }

    #[test]
    fn invalid_bytes() {
        assert!(Card::from(51u8).is_valid());
        assert!(!Card::from(52u8).is_valid());
        assert!(Card::from(52u8).to_string() == "??");
    }
}
