//! Property record model and the column vocabulary of the source CSV.

use std::fmt;
use std::str::FromStr;

use crate::domain::selection::SelectionError;

/// The four price categories published per district and year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyType {
    DetachedHouse,
    MultiUnit,
    PanelBlock,
    #[default]
    AllHousing,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::DetachedHouse,
        PropertyType::MultiUnit,
        PropertyType::PanelBlock,
        PropertyType::AllHousing,
    ];

    /// Categories that describe a single building type (excludes the aggregate).
    pub const CONCRETE: [PropertyType; 3] = [
        PropertyType::DetachedHouse,
        PropertyType::MultiUnit,
        PropertyType::PanelBlock,
    ];

    /// Hungarian category name as used in the column headers.
    pub fn label(self) -> &'static str {
        match self {
            PropertyType::DetachedHouse => "Családi ház",
            PropertyType::MultiUnit => "Többlakásos társasház",
            PropertyType::PanelBlock => "Lakótelepi panel",
            PropertyType::AllHousing => "Lakások összesen",
        }
    }

    fn index(self) -> usize {
        match self {
            PropertyType::DetachedHouse => 0,
            PropertyType::MultiUnit => 1,
            PropertyType::PanelBlock => 2,
            PropertyType::AllHousing => 3,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyType::DetachedHouse => "detached",
            PropertyType::MultiUnit => "multi_unit",
            PropertyType::PanelBlock => "panel",
            PropertyType::AllHousing => "all",
        };
        f.write_str(name)
    }
}

impl FromStr for PropertyType {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "detached" | "detached_house" | "house" => Ok(PropertyType::DetachedHouse),
            "multi_unit" | "multi" | "condominium" => Ok(PropertyType::MultiUnit),
            "panel" | "panel_block" => Ok(PropertyType::PanelBlock),
            "all" | "all_housing" | "total" => Ok(PropertyType::AllHousing),
            _ => Err(SelectionError::UnknownPropertyType(s.trim().to_string())),
        }
    }
}

/// A per-row quantity that can be ranked for the active category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Price,
    Count,
    Volatility,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Price => "price",
            Metric::Count => "count",
            Metric::Volatility => "volatility",
        };
        f.write_str(name)
    }
}

impl FromStr for Metric {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" => Ok(Metric::Price),
            "count" => Ok(Metric::Count),
            "volatility" | "stddev" => Ok(Metric::Volatility),
            _ => Err(SelectionError::UnknownMetric(s.trim().to_string())),
        }
    }
}

/// Stable identifier for every column the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Year,
    District,
    Location,
    AvgPrice(PropertyType),
    Count(PropertyType),
    RelativeStddev,
}

/// Older exports name the detached-house count column after the price column.
const DETACHED_COUNT_ALIAS: &str = "Családi ház átlagár darab";

impl Column {
    /// Canonical column order, used for export.
    pub fn canonical() -> Vec<Column> {
        let mut columns = vec![Column::Year, Column::District, Column::Location];
        for t in PropertyType::ALL {
            columns.push(Column::AvgPrice(t));
            columns.push(Column::Count(t));
        }
        columns.push(Column::RelativeStddev);
        columns
    }

    pub fn header(self) -> &'static str {
        use PropertyType::*;
        match self {
            Column::Year => "Év",
            Column::District => "Kerület",
            Column::Location => "Az ingatlan helye",
            Column::AvgPrice(DetachedHouse) => "Családi ház átlagár, ezer Ft/m²",
            Column::AvgPrice(MultiUnit) => "Többlakásos társasház átlagár, ezer Ft/m²",
            Column::AvgPrice(PanelBlock) => "Lakótelepi panel átlagár, ezer Ft/m²",
            Column::AvgPrice(AllHousing) => "Lakások összesen átlagár, ezer Ft/m²",
            Column::Count(DetachedHouse) => "Családi ház darab",
            Column::Count(MultiUnit) => "Többlakásos társasház darab",
            Column::Count(PanelBlock) => "Lakótelepi panel darab",
            Column::Count(AllHousing) => "Lakások összesen darab",
            Column::RelativeStddev => "Lakások összesen relatív szórás, %",
        }
    }

    /// Resolve an already-trimmed header to a known column.
    pub fn from_header(header: &str) -> Option<Column> {
        if header == DETACHED_COUNT_ALIAS {
            return Some(Column::Count(PropertyType::DetachedHouse));
        }
        Column::canonical().into_iter().find(|c| c.header() == header)
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Column::Location)
    }

    pub fn is_required(self) -> bool {
        matches!(self, Column::Year | Column::District)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Price and transaction count for one category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFigures {
    /// Thousands of HUF per square metre.
    pub avg_price_per_sqm: Option<f64>,
    pub count: Option<u64>,
}

/// One row of the dataset. `None` marks a missing cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyRecord {
    pub year: Option<i32>,
    pub district: Option<u32>,
    pub location: Option<String>,
    pub categories: [CategoryFigures; 4],
    pub relative_stddev_pct: Option<f64>,
    /// Values of columns outside the known vocabulary, in header order.
    pub text: Vec<String>,
}

impl PropertyRecord {
    pub fn figures(&self, property_type: PropertyType) -> &CategoryFigures {
        &self.categories[property_type.index()]
    }

    pub fn figures_mut(&mut self, property_type: PropertyType) -> &mut CategoryFigures {
        &mut self.categories[property_type.index()]
    }

    pub fn price(&self, property_type: PropertyType) -> Option<f64> {
        self.figures(property_type).avg_price_per_sqm
    }

    pub fn count(&self, property_type: PropertyType) -> Option<u64> {
        self.figures(property_type).count
    }

    pub fn metric(&self, metric: Metric, property_type: PropertyType) -> Option<f64> {
        match metric {
            Metric::Price => self.price(property_type),
            Metric::Count => self.count(property_type).map(|c| c as f64),
            Metric::Volatility => self.relative_stddev_pct,
        }
    }

    /// Store a raw cell into the field behind `column`, coercing numerics.
    pub fn set_cell(&mut self, column: Column, raw: &str) {
        match column {
            Column::Year => {
                self.year = coerce_whole(raw).and_then(|v| i32::try_from(v).ok());
            }
            Column::District => {
                self.district = coerce_whole(raw).and_then(|v| u32::try_from(v).ok());
            }
            Column::Location => {
                let trimmed = raw.trim();
                self.location = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            Column::AvgPrice(t) => self.figures_mut(t).avg_price_per_sqm = coerce_number(raw),
            Column::Count(t) => {
                self.figures_mut(t).count = coerce_whole(raw).and_then(|v| u64::try_from(v).ok());
            }
            Column::RelativeStddev => self.relative_stddev_pct = coerce_number(raw),
        }
    }

    /// Render the field behind `column` as a CSV cell. Missing is empty.
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Year => self.year.map(|v| v.to_string()),
            Column::District => self.district.map(|v| v.to_string()),
            Column::Location => self.location.clone(),
            Column::AvgPrice(t) => self.price(t).map(|v| v.to_string()),
            Column::Count(t) => self.count(t).map(|v| v.to_string()),
            Column::RelativeStddev => self.relative_stddev_pct.map(|v| v.to_string()),
        }
        .unwrap_or_default()
    }
}

/// Parse a numeric cell. Empty, unparsable and non-finite values are missing.
pub fn coerce_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a cell that must hold a whole number (`2022` and `2022.0` both pass).
pub fn coerce_whole(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    coerce_number(trimmed)
        .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
        .map(|v| v as i64)
}
