//! Synthetic series generator used when no live feed is available.
//!
//! Each seed ticker gets a 30-sample random walk that starts at its base price.
//! Every step moves the price by `(u - 0.5) * 10` with `u` uniform in `[0, 1)`,
//! and sample `i` is stamped `(30 - i)` minutes before `now`, so the display
//! shows the last half hour at one-minute spacing.
//!
//! Output is random by design; `generate_with` takes any `Rng` so callers can
//! seed it.

use chrono::Utc;
use log::info;
use rand::Rng;

use crate::moving_average::{self, HistoryLimit};
use crate::result::Result;
use crate::seeds::SeedTicker;
use crate::series::SymbolSeries;

/// Number of samples generated per seed.
pub const SAMPLE_COUNT: usize = 30;
/// Width of the symmetric step interval; steps fall in `[-5, +5)`.
pub const STEP_SPAN: f64 = 10.0;
/// Spacing between generated samples, in seconds.
pub const SAMPLE_SPACING_SECS: i64 = 60;

/// Produces placeholder series for a fixed set of seeds.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    seeds: Vec<SeedTicker>,
}

impl SyntheticGenerator {
    /// Creates a generator over `seeds`.
    pub fn new(seeds: Vec<SeedTicker>) -> Self {
        Self { seeds }
    }

    /// Seeds this generator produces series for.
    pub fn seeds(&self) -> &[SeedTicker] {
        &self.seeds
    }

    /// Generate with the thread-local RNG, stamped relative to the current time.
    pub fn generate(&self) -> Result<Vec<SymbolSeries>> {
        self.generate_with(&mut rand::rng(), Utc::now().timestamp())
    }

    /// Generate with the provided RNG, stamped relative to `now` (epoch seconds).
    pub fn generate_with<R: Rng>(&self, rng: &mut R, now: i64) -> Result<Vec<SymbolSeries>> {
        let mut out = Vec::with_capacity(self.seeds.len());
        for seed in &self.seeds {
            let mut price = seed.base_price;
            let mut history = Vec::with_capacity(SAMPLE_COUNT);
            for i in 0..SAMPLE_COUNT {
                price += next_step(rng);
                let timestamp = now - (SAMPLE_COUNT - i) as i64 * SAMPLE_SPACING_SECS;
                moving_average::push_sample(&mut history, price, timestamp, HistoryLimit::Unbounded)?;
            }
            out.push(SymbolSeries {
                ticker: seed.ticker.clone(),
                price,
                timestamp: now,
                history,
            });
        }
        info!(
            "Generated synthetic data for {} tickers ({} samples each)",
            out.len(),
            SAMPLE_COUNT
        );
        Ok(out)
    }
}

/// One random-walk step in `[-STEP_SPAN / 2, STEP_SPAN / 2)`.
pub fn next_step<R: Rng>(rng: &mut R) -> f64 {
    let u: f64 = rng.random();
    (u - 0.5) * STEP_SPAN
}
