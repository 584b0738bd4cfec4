use crate::prelude::*;

/// Number of buckets of a table built with [`Config::default`].
pub const DEFAULT_CAPACITY: usize = 16;

/// Factor the bucket count is multiplied by on every resize.
pub const DEFAULT_GROWTH_FACTOR: f64 = 1.5;

/// Chain length above which an insertion triggers a resize.
pub const DEFAULT_CHAIN_THRESHOLD: usize = 4;

/// Hash table configuration builder
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Starting number of buckets
    pub capacity: usize,

    /// Growth factor applied to the bucket count on resize
    pub growth_factor: f64,

    /// Maximum chain length tolerated after an insertion
    pub chain_threshold: usize,

    /// Whether insertions may trigger a resize
    pub auto_resize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            chain_threshold: DEFAULT_CHAIN_THRESHOLD,
            auto_resize: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the starting number of buckets.
    ///
    /// Must be at least 1.
    ///
    /// Defaults to 16.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the growth factor.
    ///
    /// On resize, the bucket count becomes `ceil(capacity * growth_factor)`, and always grows
    /// by at least one bucket. Must be finite and greater than 1.
    ///
    /// Defaults to 1.5.
    #[must_use]
    pub fn growth_factor(mut self, factor: f64) -> Self {
        self.growth_factor = factor;
        self
    }

    /// Sets the chain length threshold.
    ///
    /// When an insertion leaves its chain longer than this, the whole table is rehashed into a
    /// larger bucket array.
    ///
    /// Defaults to 4.
    #[must_use]
    pub fn chain_threshold(mut self, threshold: usize) -> Self {
        self.chain_threshold = threshold;
        self
    }

    /// Enables or disables resizing on insertion.
    ///
    /// Explicit resizes are unaffected.
    ///
    /// Defaults to `true`.
    #[must_use]
    pub fn auto_resize(mut self, enabled: bool) -> Self {
        self.auto_resize = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidCapacity(self.capacity));
        }

        if !self.growth_factor.is_finite() || self.growth_factor <= 1.0 {
            return Err(Error::InvalidGrowthFactor(self.growth_factor));
        }

        if self.chain_threshold == 0 {
            return Err(Error::InvalidThreshold);
        }

        Ok(())
    }

    /// Bucket count following `capacity` under this growth factor.
    pub(crate) fn grown_capacity(&self, capacity: usize) -> usize {
        let grown = (capacity as f64 * self.growth_factor).ceil();

        if grown >= usize::MAX as f64 {
            usize::MAX
        } else {
            (grown as usize).max(capacity.saturating_add(1))
        }
    }
}
