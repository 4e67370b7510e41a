use super::card::Card;
use super::hand::Hand;
use super::suit::Suit;
use crate::Arbitrary;

/// an array of 4 unique Suits represents
/// any of the 4! = 24 elements in the Suit permutation group.
/// by assuming a "canonical" order of suits (C < D < H < S),
/// we use [Suit; 4] to map C -> P[0], D -> P[1], H -> P[2], S -> P[3].
///
/// relabeling every card of a deal by the same Permutation
/// never changes its index.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct Permutation([Suit; 4]);

impl Permutation {
    /// the image of a card keeps its rank and moves its suit
    pub fn apply(&self, card: Card) -> Card {
        Card::from((card.rank(), self.map(&card.suit())))
    }

    /// relabel a whole deal, preserving dealing order
    pub fn relabel(&self, cards: &[Card]) -> Vec<Card> {
        cards.iter().map(|c| self.apply(*c)).collect()
    }

    /// the image of a hand under a permutation
    /// is the union of its shifted sub-Hands
    pub fn image(&self, hand: &Hand) -> Hand {
        Suit::all()
            .iter()
            .map(|suit| self.shift(suit, hand))
            .fold(Hand::empty(), |acc, x| Hand::add(acc, x))
    }

    /// the hand here gets filtered by the "old" suit
    /// and then we bitshift so that it is in its "new" suit
    /// e.g. Full Hand -> Hearts Hand -> Spades Hand
    fn shift(&self, suit: &Suit, hand: &Hand) -> Hand {
        let old = *suit;
        let new = self.map(suit);
        let shift = new as i8 - old as i8;
        let cards = u64::from(hand.of(suit));
        if shift >= 0 {
            Hand::from(cards << shift as u64)
        } else {
            Hand::from(cards >> shift.abs() as u64)
        }
    }

    /// get the image of a Suit under a Permutation
    pub fn map(&self, suit: &Suit) -> Suit {
        self.0[*suit as usize]
    }

    pub const fn identity() -> Self {
        Self(Suit::all())
    }

    /// all 24 relabelings, identity first
    pub fn exhaust() -> Vec<Self> {
        let mut all = Vec::with_capacity(24);
        let mut suits = Suit::all();
        Self::heap(suits.len(), &mut suits, &mut all);
        all
    }

    /// Heap's algorithm
    fn heap(k: usize, suits: &mut [Suit; 4], all: &mut Vec<Self>) {
        if k <= 1 {
            all.push(Self(*suits));
            return;
        }
        for i in 0..k - 1 {
            Self::heap(k - 1, suits, all);
            match k % 2 {
                0 => suits.swap(i, k - 1),
                _ => suits.swap(0, k - 1),
            }
        }
        Self::heap(k - 1, suits, all);
    }
}

impl From<[Suit; 4]> for Permutation {
    fn from(suits: [Suit; 4]) -> Self {
        debug_assert!(Suit::all().iter().all(|s| suits.contains(s)));
        Self(suits)
    }
}

impl Arbitrary for Permutation {
    fn random() -> Self {
        use rand::seq::SliceRandom;
        let mut suits = Suit::all();
        suits.shuffle(&mut rand::rng());
        Self(suits)
    }
}

impl std::fmt::Display for Permutation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for suit in Suit::all() {
            write!(f, "{}>{} ", suit, self.map(&suit))?;
        }
        Ok(())
    }
}
