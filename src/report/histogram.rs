use crate::errors::{VarError, VarResult};

/// Default bin count for return histograms.
pub const DEFAULT_BINS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over [min, max]. The last bin is closed on the
/// right so the maximum is counted.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    pub fn new(data: &[f64], bins: usize) -> VarResult<Self> {
        if data.is_empty() {
            return Err(VarError::EmptyInput);
        }
        if bins == 0 {
            return Err(VarError::Config("histogram needs at least one bin".into()));
        }

        let (mut lo, mut hi) = data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        // All values identical: widen to a unit range around them
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut out: Vec<Bin> = (0..bins)
            .map(|i| Bin {
                lower: lo + width * i as f64,
                upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
                count: 0,
            })
            .collect();

        for &v in data {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            out[idx].count += 1;
        }

        Ok(Self { bins: out })
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Index of the bin a value falls into, if it lies within the range.
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        let last = self.bins.len().checked_sub(1)?;
        self.bins.iter().position(|b| value >= b.lower && value < b.upper).or_else(|| {
            (value == self.bins[last].upper).then_some(last)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_len() {
        let data: Vec<f64> = (0..97).map(|i| ((i * 37) % 101) as f64 / 1000.0 - 0.05).collect();
        let h = Histogram::new(&data, DEFAULT_BINS).unwrap();
        assert_eq!(h.bins.len(), DEFAULT_BINS);
        assert_eq!(h.total(), data.len());
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let h = Histogram::new(&[0.0, 0.5, 1.0], 4).unwrap();
        assert_eq!(h.bins[3].count, 1);
        assert_eq!(h.bins[0].count, 1);
        assert_eq!(h.bin_of(1.0), Some(3));
        assert_eq!(h.bin_of(2.0), None);
    }

    #[test]
    fn test_constant_data_widened() {
        let h = Histogram::new(&[0.0; 5], 2).unwrap();
        assert_eq!(h.bins[0].lower, -0.5);
        assert_eq!(h.bins[1].upper, 0.5);
        assert_eq!(h.total(), 5);
    }

    #[test]
    fn test_rejects_zero_bins() {
        assert!(matches!(Histogram::new(&[1.0], 0), Err(VarError::Config(_))));
    }
}
