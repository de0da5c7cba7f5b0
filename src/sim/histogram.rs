//! Histogram of landed balls with running statistics

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::settings::HistogramMode;
use crate::{theoretical_mean, theoretical_std_dev};

/// A statistic that may not be defined yet (e.g. a spread over zero samples)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Statistic {
    Available(f64),
    NotAvailable,
}

impl Statistic {
    pub fn value(&self) -> Option<f64> {
        match self {
            Statistic::Available(v) => Some(*v),
            Statistic::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Statistic::Available(_))
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Available(v) => fmt::Display::fmt(v, f),
            Statistic::NotAvailable => f.write_str("N/A"),
        }
    }
}

/// Statistics of the balls actually collected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleStatistics {
    pub landed: u32,
    pub mean: Statistic,
    pub std_dev: Statistic,
    pub std_dev_of_mean: Statistic,
}

/// Binomial(n, p) expectations for the current sample size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TheoreticalStatistics {
    pub mean: f64,
    pub std_dev: f64,
    /// σ / √landed, unavailable until something has landed
    pub std_dev_of_mean: Statistic,
}

impl TheoreticalStatistics {
    pub fn new(row_count: u32, probability: f64, landed: u32) -> Self {
        let std_dev = theoretical_std_dev(row_count, probability);
        Self {
            mean: theoretical_mean(row_count, probability),
            std_dev,
            std_dev_of_mean: if landed > 0 {
                Statistic::Available(std_dev / (landed as f64).sqrt())
            } else {
                Statistic::NotAvailable
            },
        }
    }
}

/// A single bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bin {
    pub count: u32,
}

/// Landed-ball accumulator, one bin per possible number of right turns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    row_count: u32,
    bins: Vec<Bin>,
    landed_count: u32,
    /// Sum of landed bin indices
    sum: f64,
    /// Sum of squared landed bin indices
    sum_of_squares: f64,
}

impl Histogram {
    pub fn new(row_count: u32) -> Self {
        Self {
            row_count,
            bins: vec![Bin::default(); row_count as usize + 1],
            landed_count: 0,
            sum: 0.0,
            sum_of_squares: 0.0,
        }
    }

    /// Record a ball in `bin_index`, returning that bin's new count
    pub fn add_ball(&mut self, bin_index: usize) -> Result<u32, ConfigError> {
        let bin_count = self.bins.len();
        let bin = self
            .bins
            .get_mut(bin_index)
            .ok_or(ConfigError::BinOutOfRange {
                index: bin_index,
                bin_count,
            })?;
        bin.count += 1;
        let count = bin.count;

        let x = bin_index as f64;
        self.landed_count += 1;
        self.sum += x;
        self.sum_of_squares += x * x;
        Ok(count)
    }

    /// Zero all bins and statistics
    pub fn reset(&mut self) {
        self.bins.iter_mut().for_each(|bin| bin.count = 0);
        self.landed_count = 0;
        self.sum = 0.0;
        self.sum_of_squares = 0.0;
    }

    /// Start over with a different number of bins
    pub fn reset_for(&mut self, row_count: u32) {
        *self = Self::new(row_count);
    }

    pub fn maximum_bin_count(&self) -> u32 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn count(&self, bin_index: usize) -> u32 {
        self.bins.get(bin_index).map(|bin| bin.count).unwrap_or(0)
    }

    pub fn counts(&self) -> Vec<u32> {
        self.bins.iter().map(|bin| bin.count).collect()
    }

    pub fn landed_count(&self) -> u32 {
        self.landed_count
    }

    /// Share of landed balls in a bin (0 while empty)
    pub fn fraction(&self, bin_index: usize) -> f64 {
        if self.landed_count == 0 {
            return 0.0;
        }
        self.count(bin_index) as f64 / self.landed_count as f64
    }

    /// Per-bin values as shown in the given mode
    pub fn values(&self, mode: HistogramMode) -> Vec<f64> {
        match mode {
            HistogramMode::Count => self.bins.iter().map(|bin| bin.count as f64).collect(),
            HistogramMode::Fraction => (0..self.bins.len()).map(|i| self.fraction(i)).collect(),
        }
    }

    pub fn sample_mean(&self) -> Statistic {
        if self.landed_count == 0 {
            return Statistic::NotAvailable;
        }
        Statistic::Available(self.sum / self.landed_count as f64)
    }

    /// Bessel-corrected sample standard deviation
    pub fn sample_std_dev(&self) -> Statistic {
        if self.landed_count < 2 {
            return Statistic::NotAvailable;
        }
        let n = self.landed_count as f64;
        let variance = (self.sum_of_squares - self.sum * self.sum / n) / (n - 1.0);
        // Cancellation can leave a tiny negative residue
        Statistic::Available(variance.max(0.0).sqrt())
    }

    pub fn sample_std_dev_of_mean(&self) -> Statistic {
        match self.sample_std_dev() {
            Statistic::Available(s) => Statistic::Available(s / (self.landed_count as f64).sqrt()),
            Statistic::NotAvailable => Statistic::NotAvailable,
        }
    }

    pub fn sample_statistics(&self) -> SampleStatistics {
        SampleStatistics {
            landed: self.landed_count,
            mean: self.sample_mean(),
            std_dev: self.sample_std_dev(),
            std_dev_of_mean: self.sample_std_dev_of_mean(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_ball_counts() {
        let mut histogram = Histogram::new(4);
        assert_eq!(histogram.bins().len(), 5);
        assert_eq!(histogram.add_ball(2).unwrap(), 1);
        assert_eq!(histogram.add_ball(2).unwrap(), 2);
        assert_eq!(histogram.add_ball(0).unwrap(), 1);
        assert_eq!(histogram.counts(), vec![1, 0, 2, 0, 0]);
        assert_eq!(histogram.landed_count(), 3);
        assert_eq!(histogram.maximum_bin_count(), 2);
    }

    #[test]
    fn test_out_of_range_bin_rejected() {
        let mut histogram = Histogram::new(4);
        assert!(matches!(
            histogram.add_ball(5),
            Err(ConfigError::BinOutOfRange { index: 5, bin_count: 5 })
        ));
        assert_eq!(histogram.landed_count(), 0);
    }

    #[test]
    fn test_sample_statistics() {
        let mut histogram = Histogram::new(6);
        assert_eq!(histogram.sample_mean(), Statistic::NotAvailable);

        histogram.add_ball(2).unwrap();
        assert_eq!(histogram.sample_mean(), Statistic::Available(2.0));
        assert_eq!(histogram.sample_std_dev(), Statistic::NotAvailable);

        for bin in [4, 4, 4, 5, 5, 6] {
            histogram.add_ball(bin).unwrap();
        }
        let mean = histogram.sample_mean().value().unwrap();
        assert!((mean - 30.0 / 7.0).abs() < 1e-12);
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 6.0];
        let var = samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / 6.0;
        let sd = histogram.sample_std_dev().value().unwrap();
        assert!((sd - var.sqrt()).abs() < 1e-12);
        let sdm = histogram.sample_std_dev_of_mean().value().unwrap();
        assert!((sdm - var.sqrt() / 7.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_reset() {
        let mut histogram = Histogram::new(3);
        histogram.add_ball(1).unwrap();
        histogram.add_ball(3).unwrap();
        histogram.reset();
        assert_eq!(histogram.counts(), vec![0; 4]);
        assert_eq!(histogram.landed_count(), 0);
        assert_eq!(histogram.sample_statistics().mean, Statistic::NotAvailable);

        histogram.reset_for(7);
        assert_eq!(histogram.bins().len(), 8);
        assert_eq!(histogram.row_count(), 7);
    }

    #[test]
    fn test_fraction_mode() {
        let mut histogram = Histogram::new(2);
        assert_eq!(histogram.values(HistogramMode::Fraction), vec![0.0; 3]);
        histogram.add_ball(0).unwrap();
        histogram.add_ball(1).unwrap();
        histogram.add_ball(1).unwrap();
        histogram.add_ball(1).unwrap();
        assert_eq!(histogram.values(HistogramMode::Count), vec![1.0, 3.0, 0.0]);
        assert_eq!(histogram.values(HistogramMode::Fraction), vec![0.25, 0.75, 0.0]);
    }

    #[test]
    fn test_theoretical_statistics() {
        let empty = TheoreticalStatistics::new(12, 0.5, 0);
        assert_eq!(empty.mean, 6.0);
        assert!((empty.std_dev - 3.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(empty.std_dev_of_mean, Statistic::NotAvailable);
        assert_eq!(empty.std_dev_of_mean.to_string(), "N/A");

        let full = TheoreticalStatistics::new(12, 0.5, 4);
        let sdm = full.std_dev_of_mean.value().unwrap();
        assert!((sdm - 3.0_f64.sqrt() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_statistic_display() {
        assert_eq!(format!("{:.2}", Statistic::Available(1.23456)), "1.23");
        assert_eq!(Statistic::NotAvailable.to_string(), "N/A");
    }
}
