//! Chunk shape heuristics.

use highslab_engine::UNLIMITED;

/// The size in bytes by which chunk targets are scaled.
pub const CHUNK_BASE: u64 = 16 * 1024;

/// The soft lower limit on the chunk size in bytes.
pub const CHUNK_MIN: u64 = 8 * 1024;

/// The hard upper limit on the chunk size in bytes.
pub const CHUNK_MAX: u64 = 1024 * 1024;

/// The working extent of an axis with an [`UNLIMITED`] maximum extent.
pub const UNLIMITED_AXIS_EXTENT: u64 = 1024;

/// Guess a chunk shape for a dataset with extent `dims`, maximum extent `max_dims` and elements of
/// `element_size` bytes.
///
/// The target chunk size grows with the size of the dataset: it doubles for every tenfold increase
/// beyond 1 MiB, bounded by [`CHUNK_MIN`] and [`CHUNK_MAX`]. Axes with an [`UNLIMITED`] maximum extent
/// start at [`UNLIMITED_AXIS_EXTENT`]. Axes are then halved (rounding up) in turn, starting from the
/// first, until the chunk is below the target or within 50% of it, and below [`CHUNK_MAX`].
///
/// Returns an empty shape if `dims` is empty. Axes missing from `max_dims` are treated as limited.
///
/// If a single element is larger than [`CHUNK_MAX`], every axis of the returned shape is 1.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn guess_chunking_size(dims: &[u64], max_dims: &[u64], element_size: usize) -> Vec<u64> {
    let rank = dims.len();
    if rank == 0 {
        return Vec::new();
    }

    let mut chunk: Vec<u64> = dims
        .iter()
        .enumerate()
        .map(|(axis, &dim)| {
            if max_dims.get(axis) == Some(&UNLIMITED) {
                UNLIMITED_AXIS_EXTENT
            } else {
                dim
            }
        })
        .collect();

    let element_size = element_size as u64;
    let num_elements = |chunk: &[u64]| chunk.iter().fold(1u64, |acc, &dim| acc.saturating_mul(dim));

    let dataset_size = num_elements(&chunk).saturating_mul(element_size) as f64;
    let target_size = (CHUNK_BASE as f64 * (dataset_size / (1024.0 * 1024.0)).log10().exp2())
        .clamp(CHUNK_MIN as f64, CHUNK_MAX as f64);

    let mut idx = 0;
    loop {
        let chunk_size = num_elements(&chunk).saturating_mul(element_size);
        let chunk_size_f64 = chunk_size as f64;
        if (chunk_size_f64 < target_size
            || (chunk_size_f64 - target_size).abs() / target_size < 0.5)
            && chunk_size < CHUNK_MAX
        {
            break;
        }

        if num_elements(&chunk) == 1 {
            log::warn!(
                "element size {element_size} exceeds the maximum chunk size {CHUNK_MAX}, using a chunk of one element"
            );
            break;
        }

        let axis = idx % rank;
        chunk[axis] = chunk[axis].div_ceil(2);
        idx += 1;
    }

    chunk
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_chunking_size_bounds() {
        let chunk = guess_chunking_size(&[1000, 1000], &[1000, 1000], 8);
        let chunk_size = chunk.iter().product::<u64>() * 8;
        assert!((CHUNK_MIN..=CHUNK_MAX).contains(&chunk_size));
        assert_eq!(chunk, vec![63, 63]);
    }

    #[test]
    fn guess_chunking_size_small() {
        // already below the minimum target
        assert_eq!(guess_chunking_size(&[100], &[100], 4), vec![100]);
        assert_eq!(guess_chunking_size(&[10, 10], &[10, 10], 1), vec![10, 10]);
    }

    #[test]
    fn guess_chunking_size_unlimited() {
        // the unlimited axis starts at 1024
        let chunk = guess_chunking_size(&[1, 4], &[UNLIMITED, 4], 8);
        assert_eq!(chunk, vec![512, 2]);
        let chunk = guess_chunking_size(&[1, 4], &[UNLIMITED], 8);
        assert_eq!(chunk, vec![512, 2]);
    }

    #[test]
    fn guess_chunking_size_empty() {
        assert!(guess_chunking_size(&[], &[], 8).is_empty());
    }

    #[test]
    fn guess_chunking_size_huge_element() {
        testing_logger::setup();
        let chunk = guess_chunking_size(&[3, 5], &[3, 5], 2 * 1024 * 1024);
        assert_eq!(chunk, vec![1, 1]);
        testing_logger::validate(|captured_logs| {
            assert_eq!(captured_logs.len(), 1);
            assert_eq!(captured_logs[0].level, log::Level::Warn);
            assert!(captured_logs[0].body.contains("exceeds the maximum chunk size"));
        });
    }

    #[test]
    fn guess_chunking_size_within_extent() {
        for dims in [
            vec![1000, 1000],
            vec![7, 123_456],
            vec![50, 60, 70],
            vec![1_000_000],
            vec![3, 3, 3, 3, 3],
        ] {
            for element_size in [1, 2, 8, 64] {
                let chunk = guess_chunking_size(&dims, &dims, element_size);
                assert_eq!(chunk.len(), dims.len());
                for (&chunk, &dim) in std::iter::zip(&chunk, &dims) {
                    assert!(1 <= chunk && chunk <= dim, "{chunk} not in 1..={dim}");
                }
            }
        }
    }
}
