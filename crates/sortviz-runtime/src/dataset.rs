#![forbid(unsafe_code)]

//! Random input arrays.

use rand::Rng;
use rand::seq::SliceRandom;

/// Share of slots overwritten with a copy of another slot.
pub const DUPLICATE_FRACTION: f64 = 0.1;

/// `1..=size` with about a tenth of the slots duplicated, shuffled.
///
/// At least one duplication is attempted; arrays shorter than two have no
/// distinct target slot and skip it.
pub fn random_values<R: Rng>(size: usize, rng: &mut R) -> Vec<u32> {
    let mut values: Vec<u32> = (1..=size as u32).collect();

    if size > 1 {
        let duplicates = ((size as f64 * DUPLICATE_FRACTION).floor() as usize).max(1);
        for _ in 0..duplicates {
            let source = rng.random_range(0..size);
            let mut target = rng.random_range(0..size);
            while target == source {
                target = rng.random_range(0..size);
            }
            values[target] = values[source];
        }
    }

    values.shuffle(rng);
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::collections::BTreeSet;

    #[test]
    fn tiny_sizes() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(random_values(0, &mut rng).is_empty());
        assert_eq!(random_values(1, &mut rng), vec![1]);
    }

    #[test]
    fn values_stay_in_range_with_duplicates() {
        let mut rng = SmallRng::seed_from_u64(42);
        let values = random_values(100, &mut rng);
        assert_eq!(values.len(), 100);
        assert!(values.iter().all(|v| (1..=100).contains(v)));
        let distinct: BTreeSet<_> = values.iter().collect();
        assert!(distinct.len() < 100);
        assert!(distinct.len() >= 90);
    }

    #[test]
    fn two_elements_always_duplicate() {
        let mut rng = SmallRng::seed_from_u64(3);
        let values = random_values(2, &mut rng);
        assert_eq!(values[0], values[1]);
    }

    #[test]
    fn same_seed_same_array() {
        let a = random_values(50, &mut SmallRng::seed_from_u64(9));
        let b = random_values(50, &mut SmallRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
