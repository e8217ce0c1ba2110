//! core/histogram.rs — Fixed-edge 1D histograms with linear or log10 binning.
//!
//! Edges are `n_edges` evenly spaced points (in x or in log10 x) spanning
//! [min, max] inclusive, giving `n_edges - 1` bins. The last bin is closed
//! on the right.

use serde::{Deserialize, Serialize};

use crate::core::quantity::is_sentinel;
use crate::error::{RadiusError, RadiusResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinScale {
    Linear,
    Log,
}

/// Fixed histogram range and resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinningParams {
    pub min: f64,
    pub max: f64,
    pub n_edges: usize,
    /// Clip out-of-range values into the first/last bin instead of dropping them.
    #[serde(default = "BinningParams::default_overflow")]
    pub overflow: bool,
}

impl BinningParams {
    fn default_overflow() -> bool {
        true
    }

    /// Log bins when the range spans more than a decade of positive values,
    /// or whenever the plotted quantity is a ratio.
    pub fn scale_for(&self, quantity: &str) -> BinScale {
        let spans_decades = self.min > 0.0 && self.max / self.min > 10.0;
        if spans_decades || quantity.contains('/') {
            BinScale::Log
        } else {
            BinScale::Linear
        }
    }
}

#[derive(Debug, Clone)]
pub struct Binning {
    pub scale: BinScale,
    pub edges: Vec<f64>,
    pub overflow: bool,
}

impl Binning {
    pub fn new(params: &BinningParams, scale: BinScale) -> RadiusResult<Self> {
        let BinningParams {
            min, max, n_edges, ..
        } = *params;
        if n_edges < 2 {
            return Err(RadiusError::InvalidBinning(format!(
                "need at least 2 edges, got {n_edges}"
            )));
        }
        if !(min.is_finite() && max.is_finite() && max > min) {
            return Err(RadiusError::InvalidBinning(format!(
                "range [{min}, {max}] is empty or not finite"
            )));
        }
        let last = (n_edges - 1) as f64;
        let edges = match scale {
            BinScale::Linear => (0..n_edges)
                .map(|i| min + (max - min) * i as f64 / last)
                .collect(),
            BinScale::Log => {
                if min <= 0.0 {
                    return Err(RadiusError::InvalidBinning(format!(
                        "log binning needs a positive minimum, got {min}"
                    )));
                }
                let lo = min.log10();
                let hi = max.log10();
                (0..n_edges)
                    .map(|i| 10f64.powf(lo + (hi - lo) * i as f64 / last))
                    .collect()
            }
        };
        Ok(Self {
            scale,
            edges,
            overflow: params.overflow,
        })
    }

    /// Binning for `quantity` under the policy of [`BinningParams::scale_for`].
    pub fn for_quantity(params: &BinningParams, quantity: &str) -> RadiusResult<Self> {
        Self::new(params, params.scale_for(quantity))
    }

    #[inline]
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn min(&self) -> f64 {
        self.edges[0]
    }

    pub fn max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Bin index for `value`, or `None` when it falls outside and overflow is off.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        let n = self.n_bins();
        if value < self.min() {
            return self.overflow.then_some(0);
        }
        if value > self.max() {
            return self.overflow.then_some(n - 1);
        }
        let upper = self.edges.partition_point(|&e| e <= value);
        Some(upper.saturating_sub(1).min(n - 1))
    }
}

/// Histogram of one quantity. Sentinels and non-finite values are never binned.
#[derive(Debug, Clone)]
pub struct Hist1D {
    pub binning: Binning,
    pub counts: Vec<u64>,
    /// Finite, non-sentinel values that fell outside the range with overflow off.
    pub dropped: u64,
}

impl Hist1D {
    pub fn new(binning: Binning) -> Self {
        let counts = vec![0; binning.n_bins()];
        Self {
            binning,
            counts,
            dropped: 0,
        }
    }

    pub fn from_values(values: &[f64], binning: Binning) -> Self {
        let mut hist = Self::new(binning);
        hist.fill(values);
        hist
    }

    pub fn fill(&mut self, values: &[f64]) {
        for &value in values {
            if !value.is_finite() || is_sentinel(value) {
                continue;
            }
            match self.binning.index_of(value) {
                Some(idx) => self.counts[idx] += 1,
                None => self.dropped += 1,
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// (low edge, high edge, count) for each bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.binning
            .edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }

    /// Value below which a fraction `q` of the entries lie, interpolated
    /// linearly inside the bin that crosses `q`. `None` for an empty histogram.
    pub fn quantile(&self, q: f64) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let target = q.clamp(0.0, 1.0) * total as f64;
        let mut cumulative = 0.0;
        for (lo, hi, count) in self.bins() {
            if count == 0 {
                continue;
            }
            let next = cumulative + count as f64;
            if next >= target {
                let frac = ((target - cumulative) / count as f64).clamp(0.0, 1.0);
                return Some(lo + frac * (hi - lo));
            }
            cumulative = next;
        }
        Some(self.binning.max())
    }
}

/// Drop sentinel and non-finite entries.
pub fn valid_values(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && !is_sentinel(*v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(min: f64, max: f64, n_edges: usize) -> BinningParams {
        BinningParams {
            min,
            max,
            n_edges,
            overflow: true,
        }
    }

    #[test]
    fn scale_policy() {
        assert_eq!(params(1e-5, 1e2, 10).scale_for("x"), BinScale::Log);
        assert_eq!(params(0.0, 100.0, 10).scale_for("x"), BinScale::Linear);
        assert_eq!(params(1.0, 5.0, 10).scale_for("x"), BinScale::Linear);
        assert_eq!(params(1.0, 5.0, 10).scale_for("a/b"), BinScale::Log);
    }

    #[test]
    fn linear_edges_match_linspace() {
        let b = Binning::new(&params(0.0, 1.0, 5), BinScale::Linear).unwrap();
        assert_eq!(b.edges, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(b.n_bins(), 4);
    }

    #[test]
    fn log_edges_are_geometric() {
        let b = Binning::new(&params(1e-3, 1e2, 6), BinScale::Log).unwrap();
        for (edge, want) in b.edges.iter().zip([1e-3, 1e-2, 1e-1, 1.0, 1e1, 1e2]) {
            assert_relative_eq!(*edge, want, max_relative = 1e-12);
        }
    }

    #[test]
    fn invalid_binning_is_rejected() {
        assert!(Binning::new(&params(0.0, 1.0, 1), BinScale::Linear).is_err());
        assert!(Binning::new(&params(1.0, 1.0, 4), BinScale::Linear).is_err());
        assert!(Binning::new(&params(0.0, 1.0, 4), BinScale::Log).is_err());
    }

    #[test]
    fn right_edge_goes_to_last_bin() {
        let b = Binning::new(&params(0.0, 1.0, 5), BinScale::Linear).unwrap();
        assert_eq!(b.index_of(0.0), Some(0));
        assert_eq!(b.index_of(0.25), Some(1));
        assert_eq!(b.index_of(1.0), Some(3));
    }

    #[test]
    fn overflow_clips_or_drops() {
        let clip = Binning::new(&params(0.0, 1.0, 5), BinScale::Linear).unwrap();
        assert_eq!(clip.index_of(-3.0), Some(0));
        assert_eq!(clip.index_of(7.0), Some(3));

        let mut p = params(0.0, 1.0, 5);
        p.overflow = false;
        let hist = Hist1D::from_values(&[-3.0, 0.1, 7.0], Binning::new(&p, BinScale::Linear).unwrap());
        assert_eq!(hist.total(), 1);
        assert_eq!(hist.dropped, 2);
    }

    #[test]
    fn sentinels_never_binned() {
        let b = Binning::new(&params(-2000.0, 10.0, 11), BinScale::Linear).unwrap();
        let hist = Hist1D::from_values(&[-999.0, -1200.0, f64::NAN, f64::INFINITY, 1.0], b);
        assert_eq!(hist.total(), 1);
        assert_eq!(hist.dropped, 0);
    }

    #[test]
    fn quantile_interpolates_within_bin() {
        let b = Binning::new(&params(0.0, 10.0, 11), BinScale::Linear).unwrap();
        let values: Vec<f64> = (0..100).map(|i| i as f64 / 10.0).collect();
        let hist = Hist1D::from_values(&values, b);
        assert_eq!(hist.total(), 100);
        let q99 = hist.quantile(0.99).unwrap();
        assert_relative_eq!(q99, 9.9, max_relative = 1e-9);
        assert_relative_eq!(hist.quantile(0.5).unwrap(), 5.0, max_relative = 1e-9);
    }

    #[test]
    fn quantile_of_empty_is_none() {
        let b = Binning::new(&params(0.0, 1.0, 3), BinScale::Linear).unwrap();
        assert!(Hist1D::new(b).quantile(0.99).is_none());
    }

    #[test]
    fn valid_values_filters_sentinels() {
        assert_eq!(valid_values(&[1.0, -999.0, f64::NAN, -5.0]), vec![1.0, -5.0]);
    }
}
