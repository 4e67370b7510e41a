/// The four betting rounds in Texas Hold'em.
///
/// Recall presets map each street to a round schedule; a street's hands are
/// indexed on the last round of that schedule.
///
/// # Combinatorics
///
/// With perfect recall of 2 hole cards:
/// - Preflop: 169 strategically-distinct starting hands
/// - Flop: 1,286,792 isomorphisms
/// - Turn: 55,190,538 isomorphisms
/// - River: 2,428,287,420 isomorphisms
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Street {
    #[default]
    Pref = 0isize,
    Flop = 1isize,
    Turn = 2isize,
    Rive = 3isize,
}

impl Street {
    /// All four streets in order.
    pub const fn all() -> [Self; 4] {
        [Self::Pref, Self::Flop, Self::Turn, Self::Rive]
    }
    /// Board cards revealed when transitioning to this street.
    pub const fn n_revealed(&self) -> usize {
        match self {
            Self::Pref => 0,
            Self::Flop => 3,
            Self::Turn => 1,
            Self::Rive => 1,
        }
    }
    /// Board cards visible on this street.
    pub const fn n_board(&self) -> usize {
        match self {
            Self::Pref => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::Rive => 5,
        }
    }
}

impl From<Street> for usize {
    fn from(street: Street) -> Self {
        street as usize
    }
}

impl TryFrom<usize> for Street {
    type Error = String;
    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Self::Pref),
            1 => Ok(Self::Flop),
            2 => Ok(Self::Turn),
            3 => Ok(Self::Rive),
            x => Err(format!("no street at position {}", x)),
        }
    }
}

impl std::fmt::Display for Street {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Pref => write!(f, "preflop"),
            Self::Flop => write!(f, "flop"),
            Self::Turn => write!(f, "turn"),
            Self::Rive => write!(f, "river"),
        }
    }
}
