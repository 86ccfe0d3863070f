//! Streaming accumulators for single-pass reductions.
//!
//! Digest reduction consumes telemetry row by row, so every statistic here
//! is updated one observation at a time and never needs the full series in
//! memory. The mean uses Neumaier compensated summation.

/// Arithmetic mean over a stream of `f64` observations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    sum: f64,
    compensation: f64,
    count: u64,
}

impl RunningMean {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation.
    pub fn push(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
        self.count += 1;
    }

    /// Number of observations seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Compensated sum of all observations.
    pub fn sum(&self) -> f64 {
        self.sum + self.compensation
    }

    /// Mean of all observations, or `None` if nothing was pushed.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum() / self.count as f64)
        }
    }
}

/// Maximum over a stream of ordered observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningMax<T> {
    max: Option<T>,
}

impl<T> Default for RunningMax<T> {
    fn default() -> Self {
        Self { max: None }
    }
}

impl<T: PartialOrd + Copy> RunningMax<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation. Incomparable values (NaN) never replace the max.
    pub fn push(&mut self, value: T) {
        if value.partial_cmp(&value).is_none() {
            return;
        }
        match self.max {
            Some(current) if value <= current => {}
            _ => self.max = Some(value),
        }
    }

    /// Largest observation, or `None` if nothing was pushed.
    pub fn max(&self) -> Option<T> {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(RunningMean::new().mean(), None);
        assert_eq!(RunningMean::new().count(), 0);
    }

    #[test]
    fn mean_of_simple_series() {
        let mut m = RunningMean::new();
        for v in [1.0, 2.0, 3.0, 4.0] {
            m.push(v);
        }
        assert_eq!(m.count(), 4);
        assert!((m.mean().unwrap() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn compensated_sum_keeps_small_terms() {
        let mut m = RunningMean::new();
        m.push(1e16);
        for _ in 0..10 {
            m.push(1.0);
        }
        m.push(-1e16);
        assert_eq!(m.sum(), 10.0);
    }

    #[test]
    fn max_tracks_largest() {
        let mut m = RunningMax::new();
        for v in [3_i64, -7, 12, 5] {
            m.push(v);
        }
        assert_eq!(m.max(), Some(12));
    }

    #[test]
    fn max_of_negative_deltas() {
        let mut m = RunningMax::new();
        m.push(-40_i64);
        m.push(-10);
        assert_eq!(m.max(), Some(-10));
    }

    #[test]
    fn max_ignores_nan() {
        let mut m = RunningMax::new();
        m.push(f64::NAN);
        assert_eq!(m.max(), None);
        m.push(2.0);
        m.push(f64::NAN);
        assert_eq!(m.max(), Some(2.0));
    }

    proptest! {
        #[test]
        fn mean_matches_naive_for_moderate_values(values in prop::collection::vec(-1e6f64..1e6, 1..200)) {
            let mut m = RunningMean::new();
            for v in &values {
                m.push(*v);
            }
            let naive = values.iter().sum::<f64>() / values.len() as f64;
            prop_assert!((m.mean().unwrap() - naive).abs() <= 1e-6);
        }

        #[test]
        fn max_matches_iterator_max(values in prop::collection::vec(any::<i64>(), 1..200)) {
            let mut m = RunningMax::new();
            for v in &values {
                m.push(*v);
            }
            prop_assert_eq!(m.max(), values.iter().copied().max());
        }
    }
}
