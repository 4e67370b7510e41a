use crate::N_RANKS;
use crate::N_SUITS;

/// Rows of the tabulated C(n, k <= 4). Larger `n` fall back to the closed form.
pub const GROUP_ROWS: usize = 0x10000;
/// 4! orderings of the suits.
pub const N_PERMUTATIONS: usize = 24;
/// All 13 rank bits.
pub const RANK_MASK: u16 = (1 << N_RANKS) - 1;

static TABLES: std::sync::LazyLock<Tables> = std::sync::LazyLock::new(Tables::build);

/// Process-wide combinatorial lookups shared by every indexer.
///
/// Built once on first use and immutable afterwards, so any number of
/// threads may read them concurrently.
///
/// - `ranks[n][k]`: binomial C(n, k) for `n, k <= 13`
/// - `groups[n][k]`: binomial C(n, k) for `k <= 4` and `n < GROUP_ROWS`,
///   computed directly beyond that
/// - `set_to_index[s]`: colex rank of a 13-bit rank set among sets of equal size
/// - `index_to_set[k][i]`: the inverse, per set size
/// - `nth_unset[used][n]`: position of the `n`th zero bit of `used`, `0xff` if none
/// - `permutations[p]`: the `p`th ordering of the four suits
pub struct Tables {
    ranks: [[u32; N_RANKS + 1]; N_RANKS + 1],
    groups: Vec<[u64; N_SUITS + 1]>,
    set_to_index: Vec<u32>,
    index_to_set: Vec<Vec<u16>>,
    nth_unset: Vec<[u8; N_RANKS]>,
    permutations: [[u8; N_SUITS]; N_PERMUTATIONS],
}

impl Tables {
    pub fn shared() -> &'static Self {
        &TABLES
    }

    /// C(n, k) over ranks.
    pub fn ranks(&self, n: usize, k: usize) -> u64 {
        self.ranks[n][k] as u64
    }
    /// C(n, k) over suit sub-indices, `k <= 4`. Saturates at `u64::MAX`;
    /// indexers only ask for values already vetted by [`Tables::checked_groups`].
    pub fn groups(&self, n: u64, k: usize) -> u64 {
        match n < GROUP_ROWS as u64 {
            true => self.groups[n as usize][k],
            false => Self::binomial(n, k).unwrap_or(u64::MAX),
        }
    }
    /// C(n, k) over suit sub-indices, `None` past `u64`.
    pub fn checked_groups(&self, n: u64, k: usize) -> Option<u64> {
        match n < GROUP_ROWS as u64 {
            true => Some(self.groups[n as usize][k]),
            false => Self::binomial(n, k),
        }
    }
    /// Colex rank of a rank set among the sets with as many ranks.
    pub fn rank_set_index(&self, set: u16) -> u64 {
        self.set_to_index[set as usize] as u64
    }
    /// The rank set of `size` ranks with colex rank `index`.
    pub fn rank_set(&self, size: usize, index: u64) -> u16 {
        self.index_to_set[size][index as usize]
    }
    /// The `n`th rank not in `used`.
    pub fn nth_unset(&self, used: u16, n: usize) -> u8 {
        self.nth_unset[used as usize][n]
    }
    /// The `p`th ordering of suits, `p < 24`.
    pub fn suit_permutation(&self, p: usize) -> &[u8; N_SUITS] {
        &self.permutations[p]
    }

    fn build() -> Self {
        log::debug!("tabulating combinatorial lookups");
        let ranks = Self::pascal();
        let groups = Self::multisets();
        let nth_unset = Self::unset();
        let set_to_index = (0..=RANK_MASK)
            .map(|set| Self::colex(&ranks, set))
            .collect::<Vec<u32>>();
        let mut index_to_set = (0..=N_RANKS)
            .map(|k| vec![0u16; ranks[N_RANKS][k] as usize])
            .collect::<Vec<Vec<u16>>>();
        for set in 0..=RANK_MASK {
            index_to_set[set.count_ones() as usize][set_to_index[set as usize] as usize] = set;
        }
        let permutations = Self::orderings(&nth_unset);
        Self {
            ranks,
            groups,
            set_to_index,
            index_to_set,
            nth_unset,
            permutations,
        }
    }

    fn pascal() -> [[u32; N_RANKS + 1]; N_RANKS + 1] {
        let mut ranks = [[0u32; N_RANKS + 1]; N_RANKS + 1];
        for n in 0..=N_RANKS {
            ranks[n][0] = 1;
            for k in 1..=n {
                ranks[n][k] = ranks[n - 1][k - 1] + ranks[n - 1][k];
            }
        }
        ranks
    }

    fn multisets() -> Vec<[u64; N_SUITS + 1]> {
        let mut groups = vec![[0u64; N_SUITS + 1]; GROUP_ROWS];
        groups[0][0] = 1;
        for n in 1..GROUP_ROWS {
            groups[n][0] = 1;
            for k in 1..=n.min(N_SUITS) {
                groups[n][k] = groups[n - 1][k - 1] + groups[n - 1][k];
            }
        }
        groups
    }

    /// C(n, k) by the falling product; each partial product is C(n, i + 1)
    /// so every division is exact.
    fn binomial(n: u64, k: usize) -> Option<u64> {
        let n = n as u128;
        let k = k as u128;
        if n < k {
            return Some(0);
        }
        let mut c = 1u128;
        for i in 0..k {
            c = c.checked_mul(n - i)? / (i + 1);
        }
        u64::try_from(c).ok()
    }

    fn unset() -> Vec<[u8; N_RANKS]> {
        (0..=RANK_MASK)
            .map(|used| {
                let mut free = !used & RANK_MASK;
                std::array::from_fn(|_| {
                    let rank = match free {
                        0 => 0xff,
                        _ => free.trailing_zeros() as u8,
                    };
                    free &= free.wrapping_sub(1);
                    rank
                })
            })
            .collect()
    }

    /// sum of C(rank, position) over the set bits, positions counted from 1
    fn colex(ranks: &[[u32; N_RANKS + 1]; N_RANKS + 1], set: u16) -> u32 {
        let mut rest = set;
        let mut index = 0;
        let mut position = 1;
        while rest != 0 {
            index += ranks[rest.trailing_zeros() as usize][position];
            position += 1;
            rest &= rest - 1;
        }
        index
    }

    /// mixed-radix decoding of the ordering number,
    /// each digit picking among the suits not yet placed
    fn orderings(nth_unset: &[[u8; N_RANKS]]) -> [[u8; N_SUITS]; N_PERMUTATIONS] {
        std::array::from_fn(|p| {
            let mut index = p;
            let mut used = 0usize;
            std::array::from_fn(|j| {
                let suit = index % (N_SUITS - j);
                index /= N_SUITS - j;
                let shifted = nth_unset[used][suit];
                used |= 1 << shifted;
                shifted
            })
        })
    }
}
