//! Seed tickers for synthetic data and helpers to load them from a file.

use std::io::BufRead;

use crate::error::TrackerError;

/// A ticker and the price its synthetic series starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedTicker {
    /// Symbol identifier.
    pub ticker: String,
    /// Starting price of the random walk.
    pub base_price: f64,
}

impl SeedTicker {
    /// Creates a new seed.
    pub fn new(ticker: &str, base_price: f64) -> Self {
        Self {
            ticker: ticker.to_string(),
            base_price,
        }
    }
}

/// Seeds used when no file is given: AAPL, GOOGL and TSLA.
pub fn default_seeds() -> Vec<SeedTicker> {
    vec![
        SeedTicker::new("AAPL", 150.0),
        SeedTicker::new("GOOGL", 2800.0),
        SeedTicker::new("TSLA", 800.0),
    ]
}

/// Trait providing file parsing for seeds.
pub trait SeedParser {
    /// Parses seeds from a buffered reader.
    ///
    /// Each non-empty line holds a ticker and a base price separated by
    /// whitespace or a comma. Lines starting with `#` are skipped. Returns an
    /// error if any line cannot be parsed.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<SeedTicker>, TrackerError>;
}

impl SeedParser for SeedTicker {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, TrackerError> {
        let mut seeds = Vec::new();

        for (number, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(TrackerError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed_line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|f| !f.is_empty())
                .collect();
            let [ticker, price] = fields.as_slice() else {
                return Err(TrackerError::ParseSeedsFile(format!(
                    "line {}: expected `TICKER PRICE`, got `{}`",
                    number + 1,
                    trimmed_line
                )));
            };
            let base_price: f64 = price.parse().map_err(|e| {
                TrackerError::ParseSeedsFile(format!("line {}: {}: {}", number + 1, price, e))
            })?;
            if !base_price.is_finite() || base_price <= 0.0 {
                return Err(TrackerError::ParseSeedsFile(format!(
                    "line {}: base price must be positive, got {}",
                    number + 1,
                    price
                )));
            }
            seeds.push(SeedTicker::new(ticker, base_price));
        }
        Ok(seeds)
    }
}
