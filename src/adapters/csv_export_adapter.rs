//! CSV export adapter implementing [`ExportPort`].
//!
//! Output keeps the Hungarian column names of the source file so exports can
//! be loaded again by [`CsvAdapter`](crate::adapters::csv_adapter::CsvAdapter).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::domain::error::LakaspiacError;
use crate::domain::filter::FilteredView;
use crate::domain::record::Column;
use crate::ports::export_port::ExportPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExportAdapter;

fn csv_err(e: csv::Error) -> LakaspiacError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => LakaspiacError::Io(io),
        other => LakaspiacError::Io(std::io::Error::other(format!("{other:?}"))),
    }
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl CsvExportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Known columns present in the source (canonical order), then text columns.
    pub fn write_rows_to<W: Write>(
        &self,
        view: &FilteredView<'_>,
        writer: W,
    ) -> Result<usize, LakaspiacError> {
        let dataset = view.dataset();
        let columns: Vec<Column> = Column::canonical()
            .into_iter()
            .filter(|c| dataset.has_column(*c))
            .collect();

        let mut wtr = csv::Writer::from_writer(writer);
        let header: Vec<&str> = columns
            .iter()
            .map(|c| c.header())
            .chain(dataset.text_columns().iter().map(String::as_str))
            .collect();
        wtr.write_record(&header).map_err(csv_err)?;

        let mut written = 0;
        for record in view.rows() {
            let row: Vec<String> = columns
                .iter()
                .map(|c| record.cell(*c))
                .chain(record.text.iter().cloned())
                .collect();
            wtr.write_record(&row).map_err(csv_err)?;
            written += 1;
        }
        wtr.flush()?;
        Ok(written)
    }

    pub fn write_summary_to<W: Write>(
        &self,
        view: &FilteredView<'_>,
        writer: W,
    ) -> Result<usize, LakaspiacError> {
        let t = view.property_type();
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record([
            Column::District.header(),
            Column::Year.header(),
            Column::AvgPrice(t).header(),
            Column::Count(t).header(),
            Column::RelativeStddev.header(),
        ])
        .map_err(csv_err)?;

        let table = view.by_district_year();
        for line in &table {
            wtr.write_record([
                line.district.to_string(),
                line.year.to_string(),
                opt_cell(line.mean_price),
                opt_cell(line.total_count),
                opt_cell(line.mean_volatility),
            ])
            .map_err(csv_err)?;
        }
        wtr.flush()?;
        Ok(table.len())
    }
}

impl ExportPort for CsvExportAdapter {
    fn write_rows(&self, view: &FilteredView<'_>, output_path: &Path) -> Result<(), LakaspiacError> {
        let file = File::create(output_path)?;
        let n = self.write_rows_to(view, file)?;
        info!("wrote {n} rows to {}", output_path.display());
        Ok(())
    }

    fn write_summary(
        &self,
        view: &FilteredView<'_>,
        output_path: &Path,
    ) -> Result<(), LakaspiacError> {
        let file = File::create(output_path)?;
        let n = self.write_summary_to(view, file)?;
        info!("wrote {n} summary lines to {}", output_path.display());
        Ok(())
    }
}
