#![allow(dead_code)]

use lakaspiac::domain::dataset::Dataset;
use lakaspiac::domain::error::LakaspiacError;
use lakaspiac::domain::record::{PropertyRecord, PropertyType};
use lakaspiac::ports::dataset_port::DatasetPort;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Two districts, two years, all-housing figures only.
pub const SCENARIO_CSV: &str = "Év,Kerület,\"Lakások összesen átlagár, ezer Ft/m²\",Lakások összesen darab,\"Lakások összesen relatív szórás, %\"\n\
    2022,1,1000,10,8\n\
    2022,2,800,20,12\n\
    2023,1,1100,15,10\n\
    2023,2,900,5,\n";

/// Every known column, including a text column and a few unavailable cells.
pub const FULL_CSV: &str = "Év,Kerület,Az ingatlan helye,\
\"Családi ház átlagár, ezer Ft/m²\",Családi ház darab,\
\"Többlakásos társasház átlagár, ezer Ft/m²\",Többlakásos társasház darab,\
\"Lakótelepi panel átlagár, ezer Ft/m²\",Lakótelepi panel darab,\
\"Lakások összesen átlagár, ezer Ft/m²\",Lakások összesen darab,\
\"Lakások összesen relatív szórás, %\",Forrás\n\
2021,11,Kelenföld,700,4,820.5,30,610,50,760.25,84,9.5,KSH\n\
2021,13,Angyalföld,,,910,44,650,21,850,65,11,KSH\n\
2022,11,Kelenföld,760,3,880,28,n.a.,,800,31,10.5,KSH\n\
2022,13,,680,2,980,40,700,18,905.75,60,,\n\
2022,22,Budafok,540,12,720,9,..,,610,21,14.25,KSH\n";

pub fn make_record(
    year: i32,
    district: u32,
    price: Option<f64>,
    count: Option<u64>,
) -> PropertyRecord {
    let mut record = PropertyRecord {
        year: Some(year),
        district: Some(district),
        ..Default::default()
    };
    let figures = record.figures_mut(PropertyType::AllHousing);
    figures.avg_price_per_sqm = price;
    figures.count = count;
    record
}

pub fn with_volatility(mut record: PropertyRecord, pct: Option<f64>) -> PropertyRecord {
    record.relative_stddev_pct = pct;
    record
}

pub fn make_dataset(records: Vec<PropertyRecord>) -> Dataset {
    Dataset::from_records(records)
}

/// The two-district, two-year scenario as records.
pub fn scenario_dataset() -> Dataset {
    make_dataset(vec![
        with_volatility(make_record(2022, 1, Some(1000.0), Some(10)), Some(8.0)),
        with_volatility(make_record(2022, 2, Some(800.0), Some(20)), Some(12.0)),
        with_volatility(make_record(2023, 1, Some(1100.0), Some(15)), Some(10.0)),
        make_record(2023, 2, Some(900.0), Some(5)),
    ])
}

pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Serves a fixed dataset (or fails) and counts how often it was asked.
pub struct MockDatasetPort {
    pub dataset: Option<Dataset>,
    pub calls: Arc<AtomicUsize>,
}

impl MockDatasetPort {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Some(dataset),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            dataset: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle to the call counter, still readable after the port is boxed.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl DatasetPort for MockDatasetPort {
    fn load(&self, path: &Path) -> Result<Dataset, LakaspiacError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.dataset
            .clone()
            .ok_or_else(|| LakaspiacError::MalformedInput {
                path: path.display().to_string(),
                reason: "mock failure".to_string(),
            })
    }
}
