use bytemuck::{Pod, Zeroable};

/// One fixed-duration slot of the ring.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Bucket {
    /// Sum of every value added while this bucket was current.
    pub value: f64,
    /// Number of add operations recorded in this bucket.
    pub count: u64,
}

/// Circular bucket storage. Not synchronized; [`SlidingWindow`](crate::SlidingWindow)
/// guards it with a read-write lock shared with the rotation worker.
#[derive(Debug)]
pub(crate) struct Ring {
    buckets: Box<[Bucket]>,
    cursor: usize,
    retained: usize,
}

impl Ring {
    /// A freshly built ring counts every (zeroed) bucket as retained.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "ring needs at least two buckets");
        Self {
            buckets: vec![Bucket::zeroed(); capacity].into_boxed_slice(),
            cursor: 0,
            retained: capacity,
        }
    }

    #[cfg(test)]
    pub fn from_parts(values: &[f64], counts: &[u64], cursor: usize, retained: usize) -> Self {
        assert_eq!(values.len(), counts.len());
        assert!(cursor < values.len());
        assert!(retained <= values.len());
        let buckets = values
            .iter()
            .zip(counts)
            .map(|(&value, &count)| Bucket { value, count })
            .collect();
        Self {
            buckets,
            cursor,
            retained,
        }
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub fn retained(&self) -> usize {
        self.retained
    }

    #[cfg(test)]
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    #[inline(always)]
    pub fn add(&mut self, value: f64) {
        let bucket = &mut self.buckets[self.cursor];
        bucket.value += value;
        bucket.count += 1;
    }

    /// Moves the cursor one bucket forward and clears the bucket it lands on.
    ///
    /// The retained count is left alone.
    pub fn rotate(&mut self) {
        self.cursor = (self.cursor + 1) % self.buckets.len();
        self.buckets[self.cursor] = Bucket::zeroed();
    }

    /// Clears every bucket and drops the retained count to zero.
    ///
    /// Nothing raises the retained count again, so a reset ring answers every
    /// query with `(0.0, 0)` from then on.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.retained = 0;
        bytemuck::fill_zeroes(&mut self.buckets[..]);
    }

    /// Sums the newest `buckets` buckets, walking backwards from the cursor.
    ///
    /// The request is capped at the retained count. Returns the summed value and
    /// the number of add operations behind it.
    pub fn sum_back(&self, buckets: usize) -> (f64, u64) {
        let capacity = self.buckets.len();
        let buckets = buckets.min(self.retained);

        let mut total = 0.0;
        let mut count = 0;
        for i in 0..buckets {
            let bucket = &self.buckets[(self.cursor + capacity - i) % capacity];
            total += bucket.value;
            count += bucket.count;
        }

        (total, count)
    }
}
