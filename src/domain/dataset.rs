//! Immutable in-memory table of property records.

use std::collections::BTreeSet;

use crate::domain::record::{Column, PropertyRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<PropertyRecord>,
    headers: Vec<String>,
    columns: BTreeSet<Column>,
    text_columns: Vec<String>,
}

impl Dataset {
    /// `headers` are the trimmed source headers; `columns` the known columns
    /// among them; `text_columns` the remaining headers, in source order.
    pub fn new(
        records: Vec<PropertyRecord>,
        headers: Vec<String>,
        columns: BTreeSet<Column>,
        text_columns: Vec<String>,
    ) -> Self {
        Self {
            records,
            headers,
            columns,
            text_columns,
        }
    }

    /// Build a dataset where every numeric column is considered present.
    pub fn from_records(records: Vec<PropertyRecord>) -> Self {
        let columns: BTreeSet<Column> = Column::canonical()
            .into_iter()
            .filter(|c| c.is_numeric())
            .collect();
        let headers = Column::canonical()
            .into_iter()
            .filter(|c| columns.contains(c))
            .map(|c| c.header().to_string())
            .collect();
        Self::new(records, headers, columns, Vec::new())
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> &BTreeSet<Column> {
        &self.columns
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn text_columns(&self) -> &[String] {
        &self.text_columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years, ascending. Missing years are skipped.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.records.iter().filter_map(|r| r.year).collect();
        years.into_iter().collect()
    }

    /// Distinct district codes, ascending. Missing codes are skipped.
    pub fn districts(&self) -> Vec<u32> {
        let districts: BTreeSet<u32> = self.records.iter().filter_map(|r| r.district).collect();
        districts.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::PropertyType;

    fn record(year: Option<i32>, district: Option<u32>) -> PropertyRecord {
        PropertyRecord {
            year,
            district,
            ..Default::default()
        }
    }

    #[test]
    fn years_and_districts_are_sorted_and_distinct() {
        let ds = Dataset::from_records(vec![
            record(Some(2023), Some(5)),
            record(Some(2021), Some(1)),
            record(None, Some(5)),
            record(Some(2023), None),
        ]);
        assert_eq!(ds.years(), vec![2021, 2023]);
        assert_eq!(ds.districts(), vec![1, 5]);
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn from_records_marks_numeric_columns_present() {
        let ds = Dataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.has_column(Column::Year));
        assert!(ds.has_column(Column::AvgPrice(PropertyType::PanelBlock)));
        assert!(!ds.has_column(Column::Location));
        assert_eq!(ds.headers()[0], "Év");
        assert!(ds.text_columns().is_empty());
    }
}
