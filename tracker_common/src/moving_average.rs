//! Incremental maintenance of the 20-point moving average over a sample history.
//!
//! The invariant kept by every function here: the sample at position `i` of the
//! retained history carries `Some(mean)` of the 20 prices ending at `i` when
//! `i >= 19`, and `None` otherwise. Appending only computes the new tail entry;
//! entries that already had a full window are never touched.
//!
//! When a `HistoryLimit` drops samples from the front, positions shift, so the
//! first 19 retained entries lose their average again.

use std::num::NonZeroUsize;

use crate::result::Result;
use crate::sample::Sample;

/// Number of prices averaged per sample.
pub const MA_WINDOW: usize = 20;

/// How many samples a series keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryLimit {
    /// Keep every sample for the lifetime of the session.
    #[default]
    Unbounded,
    /// Keep only the most recent `n` samples.
    Max(NonZeroUsize),
}

impl HistoryLimit {
    /// `None` maps to `Unbounded`.
    pub fn from_option(max: Option<NonZeroUsize>) -> Self {
        max.map_or(HistoryLimit::Unbounded, HistoryLimit::Max)
    }

    fn excess(&self, len: usize) -> usize {
        match self {
            HistoryLimit::Unbounded => 0,
            HistoryLimit::Max(max) => len.saturating_sub(max.get()),
        }
    }
}

/// Mean price of the last `MA_WINDOW` samples, or `None` when fewer exist.
pub fn mean_of_window(history: &[Sample]) -> Option<f64> {
    if history.len() < MA_WINDOW {
        return None;
    }
    let sum: f64 = history[history.len() - MA_WINDOW..]
        .iter()
        .map(|s| s.price)
        .sum();
    Some(sum / MA_WINDOW as f64)
}

/// Recompute every average in `history` from scratch.
pub fn recompute(history: &mut [Sample]) {
    for i in 0..history.len() {
        history[i].moving_average = mean_of_window(&history[..=i]);
    }
}

/// Pure transform: a copy of `history` with one new sample appended.
///
/// Prior entries are carried over unchanged; only the new sample gets a freshly
/// computed average.
pub fn append_sample(history: &[Sample], price: f64, timestamp: i64) -> Result<Vec<Sample>> {
    let mut next = Vec::with_capacity(history.len() + 1);
    next.extend_from_slice(history);
    push_sample(&mut next, price, timestamp, HistoryLimit::Unbounded)?;
    Ok(next)
}

/// Append in place and apply `limit`.
pub fn push_sample(
    history: &mut Vec<Sample>,
    price: f64,
    timestamp: i64,
    limit: HistoryLimit,
) -> Result<()> {
    let sample = Sample::new(price, timestamp)?;
    history.push(sample);
    let last = history.len() - 1;
    history[last].moving_average = mean_of_window(history);
    trim(history, limit);
    Ok(())
}

/// Drop samples beyond `limit` from the front and clear averages whose window
/// no longer fits in the retained history.
pub fn trim(history: &mut Vec<Sample>, limit: HistoryLimit) {
    let excess = limit.excess(history.len());
    if excess == 0 {
        return;
    }
    history.drain(..excess);
    let partial = history.len().min(MA_WINDOW - 1);
    for sample in &mut history[..partial] {
        sample.moving_average = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: i64 = 1_700_000_000;

    fn build(prices: &[f64]) -> Vec<Sample> {
        let mut history = Vec::new();
        for (i, &p) in prices.iter().enumerate() {
            history = append_sample(&history, p, TS + i as i64).unwrap();
        }
        history
    }

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64) * 0.7 - ((i % 3) as f64)).collect()
    }

    #[test]
    fn short_history_has_no_averages() {
        for n in 0..MA_WINDOW {
            let history = build(&ramp(n));
            assert_eq!(history.len(), n);
            assert!(history.iter().all(|s| s.moving_average.is_none()));
        }
    }

    #[test]
    fn twentieth_sample_averages_everything_so_far() {
        let prices = [
            10.0, 12.0, 11.0, 13.0, 9.0, 14.0, 15.0, 10.0, 11.0, 12.0, 16.0, 8.0, 13.0, 12.0,
            11.0, 10.0, 9.0, 14.0, 13.0, 12.0,
        ];
        let history = build(&prices);
        for sample in &history[..19] {
            assert_eq!(sample.moving_average, None);
        }
        let expected = prices.iter().sum::<f64>() / 20.0;
        let got = history[19].moving_average.unwrap();
        assert!((got - expected).abs() < 1e-9);
    }

    #[test]
    fn latest_average_uses_last_twenty_prices() {
        let prices = ramp(57);
        let history = build(&prices);
        let expected = prices[37..].iter().sum::<f64>() / 20.0;
        let got = history.last().unwrap().moving_average.unwrap();
        assert!((got - expected).abs() < 1e-9);
        assert_eq!(mean_of_window(&history), Some(got));
        assert_eq!(mean_of_window(&history[..MA_WINDOW - 1]), None);
    }

    #[test]
    fn append_keeps_existing_averages() {
        let prices = ramp(40);
        let before = build(&prices[..39]);
        let after = append_sample(&before, prices[39], TS + 39).unwrap();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
    }

    #[test]
    fn incremental_matches_full_recompute() {
        let history = build(&ramp(45));
        let mut reference = history.clone();
        for sample in &mut reference {
            sample.moving_average = Some(-1.0);
        }
        recompute(&mut reference);
        assert_eq!(history, reference);
    }

    #[test]
    fn bounded_history_keeps_invariant() {
        let limit = HistoryLimit::Max(NonZeroUsize::new(25).unwrap());
        let mut history = Vec::new();
        let prices = ramp(60);
        for (i, &p) in prices.iter().enumerate() {
            push_sample(&mut history, p, TS + i as i64, limit).unwrap();
        }
        assert_eq!(history.len(), 25);
        assert_eq!(history[0].price, prices[35]);

        let mut reference = history.clone();
        recompute(&mut reference);
        assert_eq!(history, reference);
        assert!(history[18].moving_average.is_none());
        assert!(history[19].moving_average.is_some());
    }

    #[test]
    fn small_limit_never_has_averages() {
        let limit = HistoryLimit::Max(NonZeroUsize::new(5).unwrap());
        let mut history = Vec::new();
        for (i, &p) in ramp(30).iter().enumerate() {
            push_sample(&mut history, p, TS + i as i64, limit).unwrap();
        }
        assert_eq!(history.len(), 5);
        assert!(history.iter().all(|s| s.moving_average.is_none()));
    }

    #[test]
    fn bad_timestamp_leaves_history_alone() {
        let history = build(&ramp(3));
        assert!(append_sample(&history, 1.0, i64::MIN).is_err());
    }
}
