//! Block repository and reservoir sampling
//!
//! A [`BlockRepository`] stores values in fixed-size blocks and keeps a
//! running total per block. A [`Reservoir`] fills a repository up to its
//! maximum size and then keeps a uniform sample of everything it has ever
//! been offered by replacing random slots.

use rand::Rng;

/// Fixed-size chunk of values with its sum
#[derive(Debug, Clone)]
struct Block {
    data: Vec<f64>,
    total: f64,
}

impl Block {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            total: 0.0,
        }
    }
}

/// Values grouped in blocks of `block_size`
#[derive(Debug, Clone)]
pub struct BlockRepository {
    block_size: usize,
    blocks: Vec<Block>,
    len: usize,
}

impl BlockRepository {
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(1),
            blocks: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Sum over all blocks
    pub fn total(&self) -> f64 {
        self.blocks.iter().map(|b| b.total).sum()
    }

    pub fn push(&mut self, value: f64) {
        if self.len % self.block_size == 0 {
            self.blocks.push(Block::with_capacity(self.block_size));
        }
        if let Some(block) = self.blocks.last_mut() {
            block.data.push(value);
            block.total += value;
            self.len += 1;
        }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        let block = self.blocks.get(index / self.block_size)?;
        block.data.get(index % self.block_size).copied()
    }

    /// Overwrite the value at `index`, returning the previous one
    pub fn replace(&mut self, index: usize, value: f64) -> Option<f64> {
        let block = self.blocks.get_mut(index / self.block_size)?;
        let slot = block.data.get_mut(index % self.block_size)?;
        let old = std::mem::replace(slot, value);
        block.total += value - old;
        Some(old)
    }

    /// Values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.blocks.iter().flat_map(|b| b.data.iter().copied())
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.len = 0;
    }
}

/// Bounded uniform sample of a stream
#[derive(Debug, Clone)]
pub struct Reservoir {
    repository: BlockRepository,
    total: f64,
    max_size: usize,
    /// Values ever offered; kept across `clear`
    offered: u64,
}

impl Reservoir {
    pub fn new(max_size: usize, block_size: usize) -> Self {
        Self {
            repository: BlockRepository::new(block_size),
            total: 0.0,
            max_size,
            offered: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.repository.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repository.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Mean of the sample, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        drift_core::bounds::ratio(self.total, self.len()).ok()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Change the capacity; values beyond it are kept but never replaced
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
    }

    /// Offer a value to the sample
    pub fn add<R: Rng + ?Sized>(&mut self, value: f64, rng: &mut R) {
        if self.len() < self.max_size {
            self.repository.push(value);
            self.total += value;
        } else {
            let index = (rng.gen::<f64>() * self.offered as f64) as usize;
            if index < self.max_size {
                if let Some(old) = self.repository.replace(index, value) {
                    self.total += value - old;
                }
            }
        }
        self.offered += 1;
    }

    /// Move every value of `source` into this reservoir, emptying `source`
    pub fn absorb<R: Rng + ?Sized>(&mut self, source: &mut Reservoir, rng: &mut R) {
        for value in source.repository.iter() {
            self.add(value, rng);
        }
        source.clear();
    }

    pub fn clear(&mut self) {
        self.repository.clear();
        self.total = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_repository_blocks() {
        let mut repo = BlockRepository::new(3);
        for v in 0..7 {
            repo.push(v as f64);
        }
        assert_eq!(repo.len(), 7);
        assert_eq!(repo.block_count(), 3);
        assert_eq!(repo.get(4), Some(4.0));
        assert_eq!(repo.get(7), None);
        assert_relative_eq!(repo.total(), 21.0);

        assert_eq!(repo.replace(4, 10.0), Some(4.0));
        assert_relative_eq!(repo.total(), 27.0);
        assert_eq!(repo.iter().collect::<Vec<_>>(), vec![0.0, 1.0, 2.0, 3.0, 10.0, 5.0, 6.0]);
    }

    #[test]
    fn test_reservoir_fills_then_samples() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut reservoir = Reservoir::new(10, 4);
        for _ in 0..10 {
            reservoir.add(0.0, &mut rng);
        }
        assert_eq!(reservoir.len(), 10);
        for _ in 0..1000 {
            reservoir.add(1.0, &mut rng);
        }
        assert_eq!(reservoir.len(), 10);
        // almost every slot has been replaced by now
        assert!(reservoir.mean().unwrap() > 0.5);
        let sum: f64 = reservoir.repository.iter().sum();
        assert_relative_eq!(sum, reservoir.total(), epsilon = 1e-9);
    }

    #[test]
    fn test_absorb_moves_values() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut left = Reservoir::new(100, 10);
        let mut right = Reservoir::new(10, 10);
        for v in 0..10 {
            right.add(v as f64, &mut rng);
        }
        left.absorb(&mut right, &mut rng);
        assert_eq!(left.len(), 10);
        assert!(right.is_empty());
        assert_eq!(right.mean(), None);
        assert_relative_eq!(left.mean().unwrap(), 4.5);
    }
}
