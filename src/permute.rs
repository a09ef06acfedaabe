//! Ordered selections (r-permutations) of a slice.
//!
//! Permutations are produced lazily, depth-first: the first slot walks the
//! items in input order and the remaining slots recurse over what is left,
//! also in input order. The sequence is therefore lexicographic over item
//! positions and fully reproducible.

/// Number of ordered selections of `r` distinct items out of `n`.
pub fn permutation_count(n: usize, r: usize) -> usize {
    if r > n {
        return 0;
    }
    (n - r + 1..=n).product()
}

/// Lazily yield every ordered selection of `r` distinct items from `items`.
///
/// Yields nothing when `r > items.len()` and a single empty selection when
/// `r == 0`.
pub fn permute<T: Clone>(items: &[T], r: usize) -> Permutations<'_, T> {
    Permutations {
        items,
        indices: (0..r).collect(),
        done: r > items.len(),
    }
}

/// Iterator returned by [`permute`].
#[derive(Debug, Clone)]
pub struct Permutations<'a, T> {
    items: &'a [T],
    /// Positions (into `items`) of the next selection to yield.
    indices: Vec<usize>,
    done: bool,
}

impl<T> Permutations<'_, T> {
    /// Move `indices` to the next selection in depth-first order.
    fn advance(&mut self) -> bool {
        let n = self.items.len();
        let r = self.indices.len();

        for slot in (0..r).rev() {
            let fixed = &self.indices[..slot];
            let next = (self.indices[slot] + 1..n).find(|c| !fixed.contains(c));
            let Some(next) = next else {
                continue;
            };
            self.indices[slot] = next;

            // Refill the tail with the smallest unused positions.
            let mut candidate = 0;
            for tail in slot + 1..r {
                while self.indices[..tail].contains(&candidate) {
                    candidate += 1;
                }
                self.indices[tail] = candidate;
                candidate += 1;
            }
            return true;
        }
        false
    }
}

impl<T: Clone> Iterator for Permutations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self
            .indices
            .iter()
            .map(|&i| self.items[i].clone())
            .collect();
        if !self.advance() {
            self.done = true;
        }
        Some(current)
    }
}
