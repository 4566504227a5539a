//! Weighted sampling over categories.
//!
//! A [`WeightedPool`] behaves like a bag holding `weight` copies of every
//! category: each draw takes one copy out, so categories are drawn without
//! replacement at the category level while never materialising the bag.

use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplingError {
    #[error("cannot draw {requested} from a pool holding {available}")]
    NotEnoughEntries { requested: u64, available: u64 },

    #[error("cannot draw {requested} entries when every weight is zero")]
    AllWeightsZero { requested: u64 },
}

#[derive(Debug, Clone)]
pub struct WeightedPool<K> {
    entries: Vec<(K, u64)>,
    initial: Vec<u64>,
}

impl<K: Copy + PartialEq> WeightedPool<K> {
    pub fn new(weights: impl IntoIterator<Item = (K, u64)>) -> Self {
        let entries: Vec<(K, u64)> = weights.into_iter().collect();
        let initial = entries.iter().map(|(_, w)| *w).collect();
        Self { entries, initial }
    }

    pub fn remaining(&self) -> u64 {
        self.entries.iter().map(|(_, w)| *w).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Puts every drawn copy back.
    pub fn refill(&mut self) {
        for ((_, weight), initial) in self.entries.iter_mut().zip(&self.initial) {
            *weight = *initial;
        }
    }

    /// Takes one copy out of the pool, picking each category with probability
    /// proportional to what is left of it.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<K> {
        let total = self.remaining();
        if total == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..total);
        for (key, weight) in self.entries.iter_mut() {
            if roll < *weight {
                *weight -= 1;
                return Some(*key);
            }
            roll -= *weight;
        }
        None
    }
}

fn tally<K: Copy + PartialEq>(keys: &[(K, u64)], picks: impl IntoIterator<Item = K>) -> Vec<(K, u64)> {
    let mut counts: Vec<(K, u64)> = keys.iter().map(|(k, _)| (*k, 0)).collect();
    for pick in picks {
        if let Some((_, n)) = counts.iter_mut().find(|(k, _)| *k == pick) {
            *n += 1;
        }
    }
    counts
}

/// Draws exactly `amount` entries without replacement. Fails if the pool
/// holds fewer than `amount` copies in total.
pub fn sample_without_replacement<K, R>(
    weights: &[(K, u64)],
    amount: u64,
    rng: &mut R,
) -> Result<Vec<(K, u64)>, SamplingError>
where
    K: Copy + PartialEq,
    R: Rng + ?Sized,
{
    let mut pool = WeightedPool::new(weights.iter().copied());
    let available = pool.remaining();
    if available < amount {
        return Err(SamplingError::NotEnoughEntries {
            requested: amount,
            available,
        });
    }
    let picks: Vec<K> = (0..amount).filter_map(|_| pool.draw(rng)).collect();
    Ok(tally(weights, picks))
}

/// Draws exactly `amount` entries, putting the whole bag back whenever it runs
/// dry. Within one pass over the bag this is the same as
/// [`sample_without_replacement`]; `amount` may exceed the total weight.
pub fn sample_with_refills<K, R>(
    weights: &[(K, u64)],
    amount: u64,
    rng: &mut R,
) -> Result<Vec<(K, u64)>, SamplingError>
where
    K: Copy + PartialEq,
    R: Rng + ?Sized,
{
    let mut pool = WeightedPool::new(weights.iter().copied());
    if amount > 0 && pool.is_empty() {
        return Err(SamplingError::AllWeightsZero { requested: amount });
    }
    let mut picks = Vec::with_capacity(amount as usize);
    while (picks.len() as u64) < amount {
        if pool.is_empty() {
            pool.refill();
        }
        if let Some(key) = pool.draw(rng) {
            picks.push(key);
        }
    }
    Ok(tally(weights, picks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    enum Fruit {
        Apple,
        Pear,
        Plum,
    }

    fn total(counts: &[(Fruit, u64)]) -> u64 {
        counts.iter().map(|(_, n)| n).sum()
    }

    #[test]
    fn without_replacement_never_exceeds_weights() {
        let weights = [(Fruit::Apple, 3), (Fruit::Pear, 1), (Fruit::Plum, 0)];
        let mut rng = StdRng::seed_from_u64(9);
        for amount in 0..=4 {
            let counts = sample_without_replacement(&weights, amount, &mut rng).unwrap();
            assert_eq!(total(&counts), amount);
            for ((_, drawn), (_, weight)) in counts.iter().zip(&weights) {
                assert!(drawn <= weight);
            }
        }
    }

    #[test]
    fn without_replacement_rejects_oversized_draws() {
        let weights = [(Fruit::Apple, 2), (Fruit::Pear, 1)];
        let err = sample_without_replacement(&weights, 4, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert_eq!(
            err,
            SamplingError::NotEnoughEntries {
                requested: 4,
                available: 3
            }
        );
    }

    #[test]
    fn drawing_everything_returns_the_weights() {
        let weights = [(Fruit::Apple, 5), (Fruit::Pear, 2), (Fruit::Plum, 7)];
        let counts = sample_without_replacement(&weights, 14, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(counts, weights.to_vec());
    }

    #[test]
    fn refills_allow_more_draws_than_weight() {
        let weights = [(Fruit::Apple, 1), (Fruit::Pear, 0), (Fruit::Plum, 0)];
        let counts = sample_with_refills(&weights, 50, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(counts, vec![(Fruit::Apple, 50), (Fruit::Pear, 0), (Fruit::Plum, 0)]);
    }

    #[test]
    fn refills_need_some_weight() {
        let weights = [(Fruit::Apple, 0), (Fruit::Pear, 0)];
        assert_eq!(
            sample_with_refills(&weights, 1, &mut StdRng::seed_from_u64(4)),
            Err(SamplingError::AllWeightsZero { requested: 1 })
        );
        assert_eq!(
            sample_with_refills(&weights, 0, &mut StdRng::seed_from_u64(4)).unwrap(),
            vec![(Fruit::Apple, 0), (Fruit::Pear, 0)]
        );
    }

    #[test]
    fn same_seed_same_sample() {
        let weights = [(Fruit::Apple, 100), (Fruit::Pear, 60), (Fruit::Plum, 25)];
        let a = sample_with_refills(&weights, 300, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = sample_with_refills(&weights, 300, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
        assert_eq!(total(&a), 300);
    }
}
