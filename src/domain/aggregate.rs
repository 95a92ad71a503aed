//! Missing-aware accumulators and result types for aggregate queries.
//!
//! Every accumulator ignores `None` inputs and reports `None` when it has
//! seen no values, so "not available" never collapses into zero.

#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAccumulator {
    sum: f64,
    n: usize,
}

impl MeanAccumulator {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.n += 1;
        }
    }

    pub fn finish(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CountAccumulator {
    total: u64,
    seen: bool,
}

impl CountAccumulator {
    pub fn push(&mut self, value: Option<u64>) {
        if let Some(v) = value {
            self.total = self.total.saturating_add(v);
            self.seen = true;
        }
    }

    pub fn finish(&self) -> Option<u64> {
        self.seen.then_some(self.total)
    }
}

pub fn mean<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let mut acc = MeanAccumulator::default();
    values.into_iter().for_each(|v| acc.push(v));
    acc.finish()
}

pub fn total<I: IntoIterator<Item = Option<u64>>>(values: I) -> Option<u64> {
    let mut acc = CountAccumulator::default();
    values.into_iter().for_each(|v| acc.push(v));
    acc.finish()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistrictSummary {
    pub district: u32,
    pub mean_price: Option<f64>,
    pub total_count: Option<u64>,
    pub mean_volatility: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearPoint {
    pub year: i32,
    pub mean_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub year: i32,
    pub district: u32,
    pub mean_price: f64,
}

/// One line of the downloadable detail table, values rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictYearSummary {
    pub district: u32,
    pub year: i32,
    pub mean_price: Option<f64>,
    pub total_count: Option<u64>,
    pub mean_volatility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram. The last bin is closed on the right.
pub fn histogram(values: &[f64], bins: usize) -> Option<Vec<HistogramBin>> {
    if bins == 0 || values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let width = if span > 0.0 { span / bins as f64 } else { 1.0 };

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    Some(out)
}
