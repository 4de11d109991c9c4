//! Exponential histogram of bucket rows
//!
//! Row `i` holds buckets that each summarise `2^i` consecutive values. Row 0
//! receives new values, so rows are ordered newest first. Inside a row,
//! bucket `0` is the oldest. Once a row holds `MAX_BUCKETS + 1` buckets its
//! two oldest are merged into one bucket of the next row, which keeps the
//! number of buckets logarithmic in the number of summarised values.

/// Buckets a row keeps before compressing
pub const MAX_BUCKETS: usize = 5;

/// Sum and variance contribution of `2^row` consecutive values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bucket {
    pub total: f64,
    pub variance: f64,
}

/// Fixed-capacity row of buckets, oldest first
#[derive(Debug, Clone, Default)]
pub struct BucketRow {
    buckets: [Bucket; MAX_BUCKETS + 1],
    len: usize,
}

impl BucketRow {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Buckets of the row, oldest first
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets[..self.len]
    }

    fn push(&mut self, bucket: Bucket) {
        debug_assert!(self.len <= MAX_BUCKETS);
        self.buckets[self.len] = bucket;
        self.len += 1;
    }

    /// Drop the `count` oldest buckets
    fn remove_oldest(&mut self, count: usize) {
        let count = count.min(self.len);
        self.buckets.copy_within(count.., 0);
        for slot in &mut self.buckets[MAX_BUCKETS + 1 - count..] {
            *slot = Bucket::default();
        }
        self.len -= count;
    }
}

/// Number of values summarised by a bucket of `row`
pub fn bucket_size(row: usize) -> usize {
    1 << row
}

/// The row arena
#[derive(Debug, Clone)]
pub struct ExponentialHistogram {
    rows: Vec<BucketRow>,
    bucket_count: usize,
}

impl Default for ExponentialHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl ExponentialHistogram {
    pub fn new() -> Self {
        Self {
            rows: vec![BucketRow::default()],
            bucket_count: 0,
        }
    }

    /// Rows, newest (row 0) first
    pub fn rows(&self) -> &[BucketRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Index of the row holding the oldest buckets
    pub fn last_row(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Add a single value as a new bucket of row 0 and compress
    pub fn insert(&mut self, value: f64) {
        if self.rows.is_empty() {
            self.rows.push(BucketRow::default());
        }
        self.rows[0].push(Bucket {
            total: value,
            variance: 0.0,
        });
        self.bucket_count += 1;
        self.compress();
    }

    fn compress(&mut self) {
        let mut row = 0;
        while row < self.rows.len() && self.rows[row].len() == MAX_BUCKETS + 1 {
            if row + 1 == self.rows.len() {
                self.rows.push(BucketRow::default());
            }
            let size = bucket_size(row) as f64;
            let [first, second] = [self.rows[row].buckets[0], self.rows[row].buckets[1]];
            let (u1, u2) = (first.total / size, second.total / size);
            let merge_variance = size * size * (u1 - u2) * (u1 - u2) / (size + size);
            self.rows[row + 1].push(Bucket {
                total: first.total + second.total,
                variance: first.variance + second.variance + merge_variance,
            });
            self.rows[row].remove_oldest(2);
            // two buckets became one
            self.bucket_count -= 1;
            row += 1;
        }
    }

    /// Remove the oldest bucket, returning it with the number of values it held
    pub fn remove_oldest(&mut self) -> Option<(usize, Bucket)> {
        let last = self.rows.len().checked_sub(1)?;
        let tail = &mut self.rows[last];
        let bucket = *tail.buckets().first()?;
        tail.remove_oldest(1);
        self.bucket_count -= 1;
        if tail.is_empty() && last > 0 {
            self.rows.pop();
        }
        Some((bucket_size(last), bucket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_shift() {
        let mut row = BucketRow::default();
        for i in 0..4 {
            row.push(Bucket {
                total: i as f64,
                variance: 0.0,
            });
        }
        row.remove_oldest(2);
        assert_eq!(row.len(), 2);
        assert_eq!(row.buckets()[0].total, 2.0);
        assert_eq!(row.buckets()[1].total, 3.0);
    }

    #[test]
    fn test_compression_cascade() {
        let mut histogram = ExponentialHistogram::new();
        for _ in 0..6 {
            histogram.insert(1.0);
        }
        // six singletons: two merged into row 1
        assert_eq!(histogram.row_count(), 2);
        assert_eq!(histogram.rows()[0].len(), 4);
        assert_eq!(histogram.rows()[1].len(), 1);
        assert_eq!(histogram.rows()[1].buckets()[0].total, 2.0);
        assert_eq!(histogram.bucket_count(), 5);

        for _ in 0..100 {
            histogram.insert(1.0);
        }
        let summarised: usize = histogram
            .rows()
            .iter()
            .enumerate()
            .map(|(row, r)| r.len() * bucket_size(row))
            .sum();
        assert_eq!(summarised, 106);
        assert!(histogram.rows().iter().all(|r| r.len() <= MAX_BUCKETS));
        let buckets: usize = histogram.rows().iter().map(|r| r.len()).sum();
        assert_eq!(buckets, histogram.bucket_count());
    }

    #[test]
    fn test_merge_variance() {
        let mut histogram = ExponentialHistogram::new();
        for v in [0.0, 1.0, 1.0, 1.0, 1.0, 1.0] {
            histogram.insert(v);
        }
        // merging 0 and 1: 1 * 1 * (0 - 1)^2 / 2
        assert_eq!(histogram.rows()[1].buckets()[0].variance, 0.5);
    }

    #[test]
    fn test_remove_oldest() {
        let mut histogram = ExponentialHistogram::new();
        for v in 0..6 {
            histogram.insert(v as f64);
        }
        let (size, bucket) = histogram.remove_oldest().unwrap();
        assert_eq!(size, 2);
        assert_eq!(bucket.total, 1.0);
        // emptied tail row is dropped
        assert_eq!(histogram.row_count(), 1);

        let (size, bucket) = histogram.remove_oldest().unwrap();
        assert_eq!(size, 1);
        assert_eq!(bucket.total, 2.0);
    }
}
