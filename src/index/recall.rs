use super::cache;
use super::deal::Deal;
use super::error::IndexError;
use super::error::ScheduleError;
use super::indexer::HandIndexer;
use super::schedule::Schedule;
use crate::Index;
use crate::cards::Card;
use crate::cards::Street;
use std::sync::Arc;

/// How much of the dealing history a player distinguishes on each street.
///
/// With `hole` private cards:
///
/// | recall      | preflop | flop     | turn        | river          |
/// |-------------|---------|----------|-------------|----------------|
/// | Perfect     | `[h]`   | `[h,3]`  | `[h,3,1]`   | `[h,3,1,1]`    |
/// | Imperfect   | `[h]`   | `[h,3]`  | `[h,4]`     | `[h,5]`        |
/// | Flop        | `[h]`   | `[h,3]`  | `[h,3,1]`   | `[h,3,2]`      |
/// | PublicBoard | `[1]`   | `[3]`    | `[4]`       | `[5]`          |
///
/// Imperfect recall forgets which board cards came on which street; flop
/// recall remembers the flop but not the turn/river split; the public
/// board ignores private cards altogether.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Recall {
    #[default]
    Perfect,
    Imperfect,
    Flop,
    PublicBoard,
}

impl Recall {
    pub const fn all() -> [Self; 4] {
        [Self::Perfect, Self::Imperfect, Self::Flop, Self::PublicBoard]
    }
    /// Cards dealt per round on `street`.
    pub fn rounds(&self, hole: u8, street: Street) -> Vec<u8> {
        match (self, street) {
            (Self::PublicBoard, Street::Pref) => vec![1],
            (Self::PublicBoard, street) => vec![street.n_board() as u8],
            (_, Street::Pref) => vec![hole],
            (_, Street::Flop) => vec![hole, 3],
            (Self::Imperfect, street) => vec![hole, street.n_board() as u8],
            (Self::Flop, Street::Rive) => vec![hole, 3, 2],
            (_, Street::Turn) => vec![hole, 3, 1],
            (_, Street::Rive) => vec![hole, 3, 1, 1],
        }
    }
    /// Validated schedule of `street`.
    pub fn schedule(&self, hole: u8, street: Street) -> Result<Schedule, ScheduleError> {
        Schedule::try_from(self.rounds(hole, street))
    }
}

impl std::fmt::Display for Recall {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Perfect => write!(f, "perfect"),
            Self::Imperfect => write!(f, "imperfect"),
            Self::Flop => write!(f, "flop"),
            Self::PublicBoard => write!(f, "public"),
        }
    }
}

impl TryFrom<&str> for Recall {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "perfect" => Ok(Self::Perfect),
            "imperfect" => Ok(Self::Imperfect),
            "flop" => Ok(Self::Flop),
            "public" | "publicboard" | "board" => Ok(Self::PublicBoard),
            _ => Err(format!("unknown recall: {}", s)),
        }
    }
}

/// One indexer per street for a recall preset.
///
/// Each street's hands are indexed on the last round of that street's
/// schedule, so `cards` always means every card visible on the street in
/// dealing order: hole cards first, then the board (or the board alone
/// under [`Recall::PublicBoard`], whose preflop street takes one card and
/// tells only its rank apart). Indexers come from the process-wide
/// [`cache`], so presets sharing a schedule share tables.
#[derive(Debug, Clone)]
pub struct StreetIndexer {
    recall: Recall,
    streets: [Arc<HandIndexer>; 4],
}

impl StreetIndexer {
    pub fn new(hole: u8, recall: Recall) -> Result<Self, ScheduleError> {
        let [pref, flop, turn, rive] = Street::all()
            .map(|street| recall.schedule(hole, street).and_then(|s| cache::indexer(&s)));
        Ok(Self {
            recall,
            streets: [pref?, flop?, turn?, rive?],
        })
    }
    pub fn recall(&self) -> Recall {
        self.recall
    }
    pub fn indexer(&self, street: Street) -> &HandIndexer {
        &self.streets[street as usize]
    }
    pub fn size(&self, street: Street) -> Index {
        let indexer = self.indexer(street);
        indexer.size(indexer.rounds() - 1)
    }
    pub fn index(&self, street: Street, cards: &[Card]) -> Result<Index, IndexError> {
        self.indexer(street).index_last(cards)
    }
    pub fn unindex(&self, street: Street, index: Index) -> Result<Deal, IndexError> {
        let indexer = self.indexer(street);
        indexer.unindex(indexer.rounds() - 1, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_schedules() {
        assert!(Recall::Perfect.rounds(2, Street::Rive) == vec![2, 3, 1, 1]);
        assert!(Recall::Imperfect.rounds(2, Street::Turn) == vec![2, 4]);
        assert!(Recall::Imperfect.rounds(2, Street::Rive) == vec![2, 5]);
        assert!(Recall::Flop.rounds(2, Street::Turn) == vec![2, 3, 1]);
        assert!(Recall::Flop.rounds(2, Street::Rive) == vec![2, 3, 2]);
        assert!(Recall::PublicBoard.rounds(2, Street::Pref) == vec![1]);
        assert!(Recall::PublicBoard.rounds(2, Street::Flop) == vec![3]);
        assert!(Recall::PublicBoard.rounds(2, Street::Turn) == vec![4]);
        assert!(Recall::Perfect.rounds(4, Street::Flop) == vec![4, 3]);
    }

    #[test]
    fn public_board_sizes() {
        let indexer = StreetIndexer::new(2, Recall::PublicBoard).unwrap();
        let sizes = Street::all().map(|s| indexer.size(s));
        assert!(sizes == [13, 1755, 16432, 134459]);
    }

    #[test]
    fn public_preflop_sees_ranks() {
        let indexer = StreetIndexer::new(2, Recall::PublicBoard).unwrap();
        let spades = Card::parse("As").unwrap();
        let hearts = Card::parse("Ah").unwrap();
        let kings = Card::parse("Ks").unwrap();
        let index = indexer.index(Street::Pref, &spades).unwrap();
        assert!(index == indexer.index(Street::Pref, &hearts).unwrap());
        assert!(index != indexer.index(Street::Pref, &kings).unwrap());
        assert!(indexer.index(Street::Pref, &Card::parse("AsKs").unwrap()).is_err());
    }

    #[test]
    fn imperfect_sizes() {
        let indexer = StreetIndexer::new(2, Recall::Imperfect).unwrap();
        assert!(indexer.size(Street::Pref) == 169);
        assert!(indexer.size(Street::Flop) == 1_286_792);
        assert!(indexer.size(Street::Turn) == 13_960_050);
        assert!(indexer.size(Street::Rive) == 123_156_254);
    }

    #[test]
    fn imperfect_turn_forgets_street_order() {
        let indexer = StreetIndexer::new(2, Recall::Imperfect).unwrap();
        let a = Card::parse("AsKh 2c3d4h 5s").unwrap();
        let b = Card::parse("AsKh 5s3d4h 2c").unwrap();
        let index = indexer.index(Street::Turn, &a).unwrap();
        assert!(index == indexer.index(Street::Turn, &b).unwrap());
        let deal = indexer.unindex(Street::Turn, index).unwrap();
        assert!(indexer.index(Street::Turn, deal.cards()).unwrap() == index);
    }

    #[test]
    fn parse_names() {
        for recall in Recall::all() {
            assert!(Recall::try_from(recall.to_string().as_str()) == Ok(recall));
        }
        assert!(Recall::try_from("nope").is_err());
    }

    #[test]
    fn zero_hole_cards_rejected() {
        assert!(StreetIndexer::new(0, Recall::Perfect).is_err());
        assert!(StreetIndexer::new(0, Recall::PublicBoard).is_ok());
    }
}
