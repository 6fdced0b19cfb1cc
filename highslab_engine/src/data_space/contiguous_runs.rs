use std::iter::FusedIterator;

/// Iterates over runs of contiguous linearised element indices in a rectangular selection.
///
/// The iterator item is a tuple: (linearised index, # contiguous elements).
///
/// Iterates over the last axis fastest (i.e. C-contiguous order).
/// Trailing axes that are selected in full are merged into a single run.
/// For example, consider a 4x3 extent with linearised element indices
/// ```text
/// 0   1   2
/// 3   4   5
/// 6   7   8
/// 9  10  11
/// ```
/// A selection covering the entire extent produces
/// ```rust,ignore
/// [(0, 12)]
/// ```
/// A selection of the lower right 2x2 region produces
/// ```rust,ignore
/// [(7, 2), (10, 2)]
/// ```
#[derive(Clone, Debug)]
pub struct ContiguousRuns {
    strides: Vec<u64>,
    offset: Vec<u64>,
    count: Vec<u64>,
    /// Axes before `split` are iterated, the rest form one run.
    split: usize,
    run_length: u64,
    /// The next outer index, [`None`] when exhausted.
    next: Option<Vec<u64>>,
    remaining: usize,
}

impl ContiguousRuns {
    /// Create a new contiguous runs iterator.
    ///
    /// `offset` and `count` must have the same length as `dims` and lie within it.
    pub(crate) fn new(dims: &[u64], offset: &[u64], count: &[u64]) -> Self {
        let rank = dims.len();
        let mut strides = vec![1; rank];
        for axis in (0..rank.saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * dims[axis + 1];
        }

        let is_full = |axis: usize| offset[axis] == 0 && count[axis] == dims[axis];
        let mut split = rank.saturating_sub(1);
        while split > 0 && is_full(split) {
            split -= 1;
        }

        let run_length = if rank == 0 {
            1
        } else {
            count[split] * strides[split]
        };
        let empty = count.contains(&0);
        let remaining = if empty {
            0
        } else {
            count[..split]
                .iter()
                .map(|&count| usize::try_from(count).unwrap_or(usize::MAX))
                .product()
        };

        Self {
            strides,
            offset: offset.to_vec(),
            count: count.to_vec(),
            split,
            run_length,
            next: (!empty).then(|| vec![0; split]),
            remaining,
        }
    }

    /// Return the number of contiguous elements in every run.
    #[must_use]
    pub fn contiguous_elements(&self) -> u64 {
        self.run_length
    }
}

impl Iterator for ContiguousRuns {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let start: u64 = (0..self.strides.len())
            .map(|axis| {
                let index = current.get(axis).copied().unwrap_or(0);
                let offset = if axis <= self.split {
                    self.offset[axis]
                } else {
                    0
                };
                (offset + index) * self.strides[axis]
            })
            .sum();

        // advance the outer index, last outer axis fastest
        let mut following = current;
        let mut axis = self.split;
        let advanced = loop {
            if axis == 0 {
                break false;
            }
            axis -= 1;
            following[axis] += 1;
            if following[axis] < self.count[axis] {
                break true;
            }
            following[axis] = 0;
        };
        if advanced {
            self.next = Some(following);
        }
        self.remaining = self.remaining.saturating_sub(1);

        Some((start, self.run_length))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ContiguousRuns {}

impl FusedIterator for ContiguousRuns {}
