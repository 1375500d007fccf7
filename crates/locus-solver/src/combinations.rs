//! Fixed-size subset enumeration
//!
//! Subsets come out in the order of the recursive split "take the first
//! remaining element, then skip it", which is lexicographic order over the
//! positions in the pool. The walk is lazy so only one subset is alive at a
//! time, but the number of subsets is still `C(n, p)`.

/// Iterator over every size-`p` subset of a pool, in deterministic order
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    pool: &'a [T],
    positions: Vec<usize>,
    started: bool,
    done: bool,
}

/// Enumerate every size-`p` subset of `pool`
///
/// `p = 0` yields one empty subset; `p > pool.len()` yields nothing.
pub fn combinations<T: Copy>(pool: &[T], p: usize) -> Combinations<'_, T> {
    Combinations {
        pool,
        positions: (0..p).collect(),
        started: false,
        done: p > pool.len(),
    }
}

impl<T: Copy> Combinations<'_, T> {
    /// Total number of subsets this enumeration produces, if it fits in a u64
    pub fn total(&self) -> Option<u64> {
        binomial(self.pool.len() as u64, self.positions.len() as u64)
    }

    fn advance(&mut self) -> bool {
        let n = self.pool.len();
        let p = self.positions.len();

        // Rightmost position that can still move right
        let Some(i) = (0..p).rev().find(|&i| self.positions[i] != i + n - p) else {
            return false;
        };

        self.positions[i] += 1;
        for j in i + 1..p {
            self.positions[j] = self.positions[j - 1] + 1;
        }
        true
    }
}

impl<T: Copy> Iterator for Combinations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.started {
            if !self.advance() {
                self.done = true;
                return None;
            }
        } else {
            self.started = true;
        }

        Some(self.positions.iter().map(|&i| self.pool[i]).collect())
    }
}

/// `n choose k`, or `None` on overflow
pub fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    // C(n, i) grows with i up to k, so bailing out once it leaves u64 is exact
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) is always divisible by (i + 1) here
        acc = acc * u128::from(n - i) / u128::from(i + 1);
        if acc > u128::from(u64::MAX) {
            return None;
        }
    }
    u64::try_from(acc).ok()
}
