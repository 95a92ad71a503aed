//! Export port trait for writing filtered views to disk.

use std::path::Path;

use crate::domain::error::LakaspiacError;
use crate::domain::filter::FilteredView;

pub const DEFAULT_SUMMARY_FILE: &str = "budapest_lakaspiac_summary.csv";

pub trait ExportPort {
    /// Write the matching rows with their source columns.
    fn write_rows(&self, view: &FilteredView<'_>, output_path: &Path) -> Result<(), LakaspiacError>;

    /// Write the district-by-year summary table.
    fn write_summary(
        &self,
        view: &FilteredView<'_>,
        output_path: &Path,
    ) -> Result<(), LakaspiacError>;
}
