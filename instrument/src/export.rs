//! Polars conversion and on-disk export of recorded tables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::table::{DynamicTable, Recorder, TypedColumn};
use crate::{clear, drain, install_subscriber};

fn io_error(err: std::io::Error) -> PolarsError {
    PolarsError::IO {
        error: err.into(),
        msg: None,
    }
}

impl DynamicTable {
    /// Convert this table to a polars DataFrame, columns in first-seen order.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let columns: Vec<Column> = self
            .column_order
            .iter()
            .filter_map(|name| self.columns.get(name).map(|col| (name, col)))
            .map(|(name, col)| match col {
                TypedColumn::U64(v) => Column::new(name.into(), v),
                TypedColumn::I64(v) => Column::new(name.into(), v),
                TypedColumn::F64(v) => Column::new(name.into(), v),
                TypedColumn::Bool(v) => Column::new(name.into(), v),
                TypedColumn::Str(v) => Column::new(name.into(), v),
            })
            .collect();

        DataFrame::new(columns)
    }
}

impl Recorder {
    /// Convert all tables to polars DataFrames. Tables that fail to convert
    /// are skipped.
    pub fn to_dataframes(&self) -> HashMap<String, DataFrame> {
        self.tables
            .iter()
            .filter_map(|(name, table)| table.to_dataframe().ok().map(|df| (name.clone(), df)))
            .collect()
    }
}

/// Drain the thread-local recorder straight into DataFrames.
pub fn drain_to_dataframes() -> HashMap<String, DataFrame> {
    drain().to_dataframes()
}

/// Write each DataFrame to `{dir}/{name}.parquet`.
pub fn save_parquet(dfs: &mut HashMap<String, DataFrame>, dir: &Path) -> PolarsResult<()> {
    std::fs::create_dir_all(dir).map_err(io_error)?;
    for (name, df) in dfs.iter_mut() {
        let path = dir.join(format!("{}.parquet", name));
        let file = std::fs::File::create(&path).map_err(io_error)?;
        ParquetWriter::new(file).finish(df)?;
    }
    Ok(())
}

/// Write one DataFrame as CSV with a header row. This is the format
/// external plotting scripts read the sweep table from.
pub fn save_csv(df: &mut DataFrame, path: &Path) -> PolarsResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = std::fs::File::create(path).map_err(io_error)?;
    CsvWriter::new(file).include_header(true).finish(df)
}

/// Replace non-alphanumeric chars with `_` and truncate for use in directory names.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(60)
        .collect()
}

/// RAII guard that clears recorded data on creation and exports it on drop.
///
/// On drop every table is written to `{parent}/{name}/{table}.parquet`,
/// tables registered with [`ScopedRecorder::with_csv`] also go to
/// `{table}.csv`, and a `_ready` sentinel marks the directory complete.
///
/// ```ignore
/// let mut rec = instrument::ScopedRecorder::new("data", "sweep_g5").with_csv(["sweep"]);
/// let result = wealth_core::run_sweep(&config);
/// let dfs = rec.get();
/// // rec drops -> data/sweep_g5/{gini,sweep}.parquet, sweep.csv, _ready
/// ```
pub struct ScopedRecorder {
    run_dir: PathBuf,
    run_name: String,
    csv_tables: Vec<String>,
    dfs: Option<HashMap<String, DataFrame>>,
}

impl ScopedRecorder {
    pub fn new(parent: impl Into<PathBuf>, name: &str) -> Self {
        let run_name = sanitize(name);
        let run_dir = parent.into().join(&run_name);
        clear();
        install_subscriber();
        Self {
            run_dir,
            run_name,
            csv_tables: Vec::new(),
            dfs: None,
        }
    }

    /// Also export these tables as CSV on drop.
    pub fn with_csv<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.csv_tables.extend(tables.into_iter().map(Into::into));
        self
    }

    /// Drain recorded data and return the DataFrames. The first call drains
    /// the thread-local recorder; later calls return the cached frames.
    pub fn get(&mut self) -> &HashMap<String, DataFrame> {
        self.dfs.get_or_insert_with(drain_to_dataframes)
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    fn export(&self, dfs: &mut HashMap<String, DataFrame>) -> PolarsResult<()> {
        save_parquet(dfs, &self.run_dir)?;
        for name in &self.csv_tables {
            if let Some(df) = dfs.get_mut(name) {
                save_csv(df, &self.run_dir.join(format!("{}.csv", name)))?;
            }
        }
        std::fs::File::create(self.run_dir.join("_ready")).map_err(io_error)?;
        Ok(())
    }
}

impl Drop for ScopedRecorder {
    fn drop(&mut self) {
        let mut dfs = self.dfs.take().unwrap_or_else(drain_to_dataframes);
        if dfs.is_empty() {
            return;
        }
        match self.export(&mut dfs) {
            Ok(()) => eprintln!(
                "ScopedRecorder: wrote {} tables to {}",
                dfs.len(),
                self.run_dir.display()
            ),
            Err(e) => eprintln!("ScopedRecorder({}): export failed: {}", self.run_name, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep_table() -> DynamicTable {
        let mut table = DynamicTable::default();
        table.columns.insert(
            "return_on_capital".to_string(),
            TypedColumn::F64(vec![0.0, 0.01, 0.02]),
        );
        table
            .columns
            .insert("mean_gini".to_string(), TypedColumn::F64(vec![0.30, 0.34, 0.39]));
        table.column_order = vec!["return_on_capital".to_string(), "mean_gini".to_string()];
        table.row_count = 3;
        table
    }

    #[test]
    fn test_dataframe_keeps_column_order() {
        let df = sweep_table().to_dataframe().unwrap();
        assert_eq!(df.height(), 3);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["return_on_capital", "mean_gini"]);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("sweep g=5%"), "sweep_g_5_");
        assert_eq!(sanitize(&"x".repeat(100)).len(), 60);
    }

    #[test]
    fn test_csv_export() {
        let mut df = sweep_table().to_dataframe().unwrap();
        let dir = std::env::temp_dir().join(format!("instrument_csv_{}", std::process::id()));
        let path = dir.join("sweep.csv");

        save_csv(&mut df, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("return_on_capital,mean_gini"));
        assert_eq!(lines.count(), 3);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
