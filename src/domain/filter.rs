//! Filtering and aggregate queries over a loaded [`Dataset`].
//!
//! [`filter`] is a plain function: it borrows the dataset, selects the rows
//! matching the [`FilterCriteria`] and returns a [`FilteredView`]. The view
//! never copies or mutates records; every query walks the selected indices.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::aggregate::{
    self, CountAccumulator, DistrictSummary, DistrictYearSummary, HistogramBin, MeanAccumulator,
    TrendPoint, YearPoint,
};
use crate::domain::dataset::Dataset;
use crate::domain::record::{Metric, PropertyRecord, PropertyType};

/// Which rows to keep and which category is active.
///
/// Empty `years` or `districts` select nothing, they do not mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub years: BTreeSet<i32>,
    pub districts: BTreeSet<u32>,
    pub property_type: PropertyType,
}

impl FilterCriteria {
    pub fn new<Y, D>(years: Y, districts: D, property_type: PropertyType) -> Self
    where
        Y: IntoIterator<Item = i32>,
        D: IntoIterator<Item = u32>,
    {
        Self {
            years: years.into_iter().collect(),
            districts: districts.into_iter().collect(),
            property_type,
        }
    }

    /// Every year and district present in `dataset`.
    pub fn select_all(dataset: &Dataset, property_type: PropertyType) -> Self {
        Self::new(dataset.years(), dataset.districts(), property_type)
    }

    fn matches_district(&self, record: &PropertyRecord) -> bool {
        record
            .district
            .is_some_and(|d| self.districts.contains(&d))
    }

    pub fn matches(&self, record: &PropertyRecord) -> bool {
        self.matches_district(record) && record.year.is_some_and(|y| self.years.contains(&y))
    }
}

/// A ranked row returned by [`FilteredView::top_n`].
#[derive(Debug, Clone, Copy)]
pub struct RankedRow<'a> {
    /// Position of the row in the source dataset.
    pub index: usize,
    pub value: f64,
    pub record: &'a PropertyRecord,
}

#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    criteria: FilterCriteria,
    indices: Vec<usize>,
}

pub fn filter<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let indices = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect();
    FilteredView {
        dataset,
        criteria: criteria.clone(),
        indices,
    }
}

impl<'a> FilteredView<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn property_type(&self) -> PropertyType {
        self.criteria.property_type
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Matching rows in source order.
    pub fn rows(&self) -> impl Iterator<Item = &'a PropertyRecord> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn mean_price(&self) -> Option<f64> {
        let t = self.property_type();
        aggregate::mean(self.rows().map(|r| r.price(t)))
    }

    pub fn total_count(&self) -> Option<u64> {
        let t = self.property_type();
        aggregate::total(self.rows().map(|r| r.count(t)))
    }

    pub fn mean_volatility(&self) -> Option<f64> {
        aggregate::mean(self.rows().map(|r| r.relative_stddev_pct))
    }

    pub fn by_district(&self) -> BTreeMap<u32, DistrictSummary> {
        let t = self.property_type();
        let mut groups: BTreeMap<u32, (MeanAccumulator, CountAccumulator, MeanAccumulator)> =
            BTreeMap::new();
        for r in self.rows() {
            let Some(district) = r.district else { continue };
            let (price, count, volatility) = groups.entry(district).or_default();
            price.push(r.price(t));
            count.push(r.count(t));
            volatility.push(r.relative_stddev_pct);
        }
        groups
            .into_iter()
            .map(|(district, (price, count, volatility))| {
                let summary = DistrictSummary {
                    district,
                    mean_price: price.finish(),
                    total_count: count.finish(),
                    mean_volatility: volatility.finish(),
                };
                (district, summary)
            })
            .collect()
    }

    /// Districts with a price, cheapest first (ties by district code).
    pub fn districts_sorted_by_price(&self) -> Vec<DistrictSummary> {
        let mut out: Vec<DistrictSummary> = self
            .by_district()
            .into_values()
            .filter(|s| s.mean_price.is_some())
            .collect();
        out.sort_by(|a, b| {
            let (pa, pb) = (a.mean_price.unwrap_or_default(), b.mean_price.unwrap_or_default());
            pa.total_cmp(&pb).then(a.district.cmp(&b.district))
        });
        out
    }

    /// Yearly mean price across the selected districts, ignoring the year
    /// selection so the whole trend stays visible. An empty year selection
    /// still yields nothing. Years without any price are left out.
    ///
    /// Because it reads rows outside the view, an export of the view does not
    /// carry the data behind this trend. Export followed by reload preserves
    /// the per-view aggregates only.
    pub fn by_year(&self) -> Vec<YearPoint> {
        if self.criteria.years.is_empty() {
            return Vec::new();
        }
        let t = self.property_type();
        let mut groups: BTreeMap<i32, MeanAccumulator> = BTreeMap::new();
        for r in self.dataset.records() {
            if !self.criteria.matches_district(r) {
                continue;
            }
            if let Some(year) = r.year {
                groups.entry(year).or_default().push(r.price(t));
            }
        }
        groups
            .into_iter()
            .filter_map(|(year, acc)| acc.finish().map(|mean_price| YearPoint { year, mean_price }))
            .collect()
    }

    /// Mean price per (year, district) over the filtered rows.
    pub fn by_year_and_district(&self) -> Vec<TrendPoint> {
        let t = self.property_type();
        let mut groups: BTreeMap<(i32, u32), MeanAccumulator> = BTreeMap::new();
        for r in self.rows() {
            if let (Some(year), Some(district)) = (r.year, r.district) {
                groups.entry((year, district)).or_default().push(r.price(t));
            }
        }
        groups
            .into_iter()
            .filter_map(|((year, district), acc)| {
                acc.finish().map(|mean_price| TrendPoint {
                    year,
                    district,
                    mean_price,
                })
            })
            .collect()
    }

    /// Detail table grouped by (district, year), rounded to 2 decimals.
    pub fn by_district_year(&self) -> Vec<DistrictYearSummary> {
        let t = self.property_type();
        let mut groups: BTreeMap<(u32, i32), (MeanAccumulator, CountAccumulator, MeanAccumulator)> =
            BTreeMap::new();
        for r in self.rows() {
            if let (Some(year), Some(district)) = (r.year, r.district) {
                let (price, count, volatility) = groups.entry((district, year)).or_default();
                price.push(r.price(t));
                count.push(r.count(t));
                volatility.push(r.relative_stddev_pct);
            }
        }
        groups
            .into_iter()
            .map(|((district, year), (price, count, volatility))| DistrictYearSummary {
                district,
                year,
                mean_price: price.finish().map(aggregate::round2),
                total_count: count.finish(),
                mean_volatility: volatility.finish().map(aggregate::round2),
            })
            .collect()
    }

    /// Mean price of each building type, skipping types with no data.
    pub fn mean_price_by_type(&self) -> Vec<(PropertyType, f64)> {
        PropertyType::CONCRETE
            .into_iter()
            .filter_map(|t| aggregate::mean(self.rows().map(|r| r.price(t))).map(|m| (t, m)))
            .collect()
    }

    /// (price, volatility) for rows where both are present.
    pub fn price_volatility_pairs(&self) -> Vec<(f64, f64)> {
        let t = self.property_type();
        self.rows()
            .filter_map(|r| Some((r.price(t)?, r.relative_stddev_pct?)))
            .collect()
    }

    pub fn volatility_histogram(&self, bins: usize) -> Option<Vec<HistogramBin>> {
        let values: Vec<f64> = self.rows().filter_map(|r| r.relative_stddev_pct).collect();
        aggregate::histogram(&values, bins)
    }

    /// The `n` rows with the largest (or smallest) `metric` in the active
    /// category. Rows missing the metric are not ranked; ties keep source order.
    pub fn top_n(&self, n: usize, metric: Metric, descending: bool) -> Vec<RankedRow<'a>> {
        let t = self.property_type();
        let records = self.dataset.records();
        let mut ranked: Vec<RankedRow<'a>> = self
            .indices
            .iter()
            .filter_map(|&index| {
                let record = &records[index];
                record.metric(metric, t).map(|value| RankedRow {
                    index,
                    value,
                    record,
                })
            })
            .collect();
        if descending {
            ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
        } else {
            ranked.sort_by(|a, b| a.value.total_cmp(&b.value));
        }
        ranked.truncate(n);
        ranked
    }
}
