//! Weighted symbol sampling.
//!
//! A [`WeightTable`] is expanded into a flat pool holding `round(weight * 100)`
//! copies of each symbol, and a draw indexes that pool uniformly. Probabilities are
//! therefore granular to 1/100 of a weight unit; weights need not sum to one.

use arcade_types::casino::{SlotSymbol, WEIGHT_RESOLUTION};
use tracing::warn;

use super::{GameError, GameRng};

/// Relative weights of a categorical distribution.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightTable<S> {
    entries: Vec<(S, f64)>,
}

impl<S: Copy> WeightTable<S> {
    pub fn new(entries: Vec<(S, f64)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(S, f64)] {
        &self.entries
    }

    /// Expand into the quantized sampling pool, in table order.
    pub fn pool(&self) -> Vec<S> {
        let mut pool = Vec::new();
        for &(symbol, weight) in &self.entries {
            let copies = (weight * WEIGHT_RESOLUTION).round();
            if copies >= 1.0 {
                pool.extend(std::iter::repeat(symbol).take(copies as usize));
            }
        }
        pool
    }
}

/// Draws symbols from an expanded [`WeightTable`].
#[derive(Clone, Debug)]
pub struct Sampler<S> {
    pool: Vec<S>,
    fallback: S,
}

impl<S: Copy + std::fmt::Debug> Sampler<S> {
    /// Build a sampler; `fallback` is returned if the pool is empty.
    pub fn new(table: &WeightTable<S>, fallback: S) -> Self {
        Self {
            pool: table.pool(),
            fallback,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Draw one symbol, failing on an empty pool.
    pub fn try_sample(&self, rng: &mut GameRng) -> Result<S, GameError> {
        if self.pool.is_empty() {
            return Err(GameError::EmptySamplePool);
        }
        Ok(self.pool[rng.next_index(self.pool.len())])
    }

    /// Draw one symbol, returning the fallback on an empty pool.
    pub fn sample(&self, rng: &mut GameRng) -> S {
        self.try_sample(rng).unwrap_or_else(|_| {
            warn!(fallback = ?self.fallback, "sampling from empty pool");
            self.fallback
        })
    }
}

/// Slot weights outside free spins: jackpot and malus never appear.
pub fn slot_normal_weights() -> WeightTable<SlotSymbol> {
    WeightTable::new(vec![
        (SlotSymbol::Cherry, 0.25),
        (SlotSymbol::Lemon, 0.22),
        (SlotSymbol::Orange, 0.18),
        (SlotSymbol::Grape, 0.14),
        (SlotSymbol::Bell, 0.10),
        (SlotSymbol::Diamond, 0.07),
        (SlotSymbol::Scatter, 0.04),
    ])
}

/// Slot weights during free spins.
pub fn slot_bonus_weights() -> WeightTable<SlotSymbol> {
    let mut entries = slot_normal_weights().entries;
    entries.push((SlotSymbol::Jackpot, 0.03));
    entries.push((SlotSymbol::Malus, 0.03));
    WeightTable::new(entries)
}

/// Pick the slot weight table for the current mode.
pub fn slot_weights(allow_special: bool) -> WeightTable<SlotSymbol> {
    if allow_special {
        slot_bonus_weights()
    } else {
        slot_normal_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::create_rng;
    use std::collections::HashMap;

    #[test]
    fn test_pool_quantization() {
        let table = WeightTable::new(vec![('a', 0.5), ('b', 0.257), ('c', 0.004)]);
        let pool = table.pool();
        assert_eq!(pool.iter().filter(|&&s| s == 'a').count(), 50);
        assert_eq!(pool.iter().filter(|&&s| s == 'b').count(), 26);
        // Below the resolution: never drawn
        assert_eq!(pool.iter().filter(|&&s| s == 'c').count(), 0);
    }

    #[test]
    fn test_normal_mode_excludes_specials() {
        let sampler = Sampler::new(&slot_weights(false), SlotSymbol::Cherry);
        assert_eq!(sampler.pool_len(), 100);
        let mut rng = create_rng(1, 1);
        for _ in 0..5_000 {
            assert!(!sampler.sample(&mut rng).is_special());
        }
    }

    #[test]
    fn test_bonus_mode_includes_specials() {
        let sampler = Sampler::new(&slot_weights(true), SlotSymbol::Cherry);
        assert_eq!(sampler.pool_len(), 106);
        let mut rng = create_rng(2, 1);
        let mut specials = 0;
        for _ in 0..5_000 {
            if sampler.sample(&mut rng).is_special() {
                specials += 1;
            }
        }
        assert!(specials > 0);
    }

    #[test]
    fn test_sampling_converges_to_weights() {
        let table = slot_bonus_weights();
        let sampler = Sampler::new(&table, SlotSymbol::Cherry);
        let total: f64 = table.entries().iter().map(|(_, w)| w).sum();
        let mut rng = create_rng(3, 1);

        let draws = 200_000;
        let mut counts: HashMap<SlotSymbol, u32> = HashMap::new();
        for _ in 0..draws {
            *counts.entry(sampler.sample(&mut rng)).or_default() += 1;
        }

        for &(symbol, weight) in table.entries() {
            let expected = weight / total;
            let observed = counts.get(&symbol).copied().unwrap_or(0) as f64 / draws as f64;
            assert!(
                (observed - expected).abs() < 0.005,
                "{:?}: expected {:.4}, observed {:.4}",
                symbol,
                expected,
                observed
            );
        }
    }

    #[test]
    fn test_empty_pool_falls_back() {
        let table: WeightTable<SlotSymbol> = WeightTable::new(vec![(SlotSymbol::Bell, 0.0)]);
        let sampler = Sampler::new(&table, SlotSymbol::Cherry);
        let mut rng = create_rng(4, 1);
        assert!(sampler.is_empty());
        assert_eq!(sampler.try_sample(&mut rng), Err(GameError::EmptySamplePool));
        assert_eq!(sampler.sample(&mut rng), SlotSymbol::Cherry);
    }
}
