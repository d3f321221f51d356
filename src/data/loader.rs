//! Tabular dataset loading
//!
//! Reads CSV, Parquet and JSON files through polars and converts them into
//! a [`Table`]: an ordered list of columns, numeric ones materialized as
//! `Option<f64>` so missing cells survive until validation.

use crate::error::{DriftError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "tsv", "parquet", "pq", "json", "jsonl", "ndjson"];

/// Cell tokens read as missing values, same set pandas uses
const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A",
    "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Values held by a single table column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Numeric column cast to f64; `None` marks a missing cell
    Numeric(Vec<Option<f64>>),
    /// Any other column type, kept only for diagnostics
    Other { dtype: String },
}

/// A named column of a [`Table`]
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub name: String,
    pub values: ColumnValues,
}

impl TableColumn {
    pub fn is_numeric(&self) -> bool {
        matches!(self.values, ColumnValues::Numeric(_))
    }

    /// Numeric cells, or `None` for non-numeric columns
    pub fn numeric(&self) -> Option<&[Option<f64>]> {
        match &self.values {
            ColumnValues::Numeric(values) => Some(values),
            ColumnValues::Other { .. } => None,
        }
    }
}

/// Column-per-feature, row-per-observation table built from one or more files
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    label: String,
    n_rows: usize,
    columns: Vec<TableColumn>,
    sources: Vec<PathBuf>,
}

impl Table {
    /// Create a table from in-memory columns. Every numeric column must have `n_rows` cells.
    pub fn new(label: impl Into<String>, n_rows: usize, columns: Vec<TableColumn>) -> Result<Self> {
        let label = label.into();
        for column in &columns {
            if let Some(values) = column.numeric() {
                if values.len() != n_rows {
                    return Err(DriftError::InvalidInput(format!(
                        "{} column '{}' has {} rows, expected {}",
                        label,
                        column.name,
                        values.len(),
                        n_rows
                    )));
                }
            }
        }
        Ok(Self { label, n_rows, columns, sources: Vec::new() })
    }

    /// Build a table of numeric columns with no missing cells
    pub fn from_numeric(label: impl Into<String>, columns: Vec<(&str, Vec<f64>)>) -> Result<Self> {
        let n_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let columns = columns
            .into_iter()
            .map(|(name, values)| TableColumn {
                name: name.to_string(),
                values: ColumnValues::Numeric(values.into_iter().map(Some).collect()),
            })
            .collect();
        Self::new(label, n_rows, columns)
    }

    fn from_frame(label: &str, df: &DataFrame, source: &Path) -> Result<Self> {
        let columns = df
            .get_columns()
            .iter()
            .map(|series| {
                let name = series.name().to_string();
                // A column with no values at all (an empty slice) carries no type
                let values = if series.null_count() == series.len() {
                    ColumnValues::Numeric(vec![None; series.len()])
                } else if series.dtype().is_numeric() {
                    let as_f64 = series.cast(&DataType::Float64)?;
                    ColumnValues::Numeric(as_f64.f64()?.into_iter().collect())
                } else {
                    ColumnValues::Other { dtype: format!("{:?}", series.dtype()) }
                };
                Ok(TableColumn { name, values })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            label: label.to_string(),
            n_rows: df.height(),
            columns,
            sources: vec![source.to_path_buf()],
        })
    }

    /// Row-wise union. Columns missing from one side are padded with missing cells;
    /// a column that is non-numeric in either part becomes non-numeric.
    pub fn append(&mut self, other: Table) {
        let self_rows = self.n_rows;
        let other_rows = other.n_rows;
        let mut other_columns = other.columns;

        for column in &mut self.columns {
            let matching = other_columns.iter().position(|c| c.name == column.name);
            let incoming = matching.map(|idx| other_columns.remove(idx));
            column.values = match (std::mem::replace(&mut column.values, ColumnValues::Numeric(Vec::new())), incoming) {
                (ColumnValues::Numeric(mut values), Some(TableColumn { values: ColumnValues::Numeric(more), .. })) => {
                    values.extend(more);
                    ColumnValues::Numeric(values)
                }
                (ColumnValues::Numeric(mut values), None) => {
                    values.resize(self_rows + other_rows, None);
                    ColumnValues::Numeric(values)
                }
                (ColumnValues::Numeric(_), Some(TableColumn { values: other_values, .. })) => other_values,
                (other_kind, _) => other_kind,
            };
        }

        for column in other_columns {
            let values = match column.values {
                ColumnValues::Numeric(values) => {
                    let mut padded = vec![None; self_rows];
                    padded.extend(values);
                    ColumnValues::Numeric(padded)
                }
                other_kind => other_kind,
            };
            self.columns.push(TableColumn { name: column.name, values });
        }

        self.n_rows += other_rows;
        self.sources.extend(other.sources);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Total row count across all source files
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Files this table was read from, in load order
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

/// Data loader for baseline and production feature tables
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    /// Rows used by polars to infer CSV column types
    infer_schema_length: Option<usize>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self { infer_schema_length: Some(1000) }
    }

    /// Set the number of rows used for CSV schema inference (`None` scans the whole file)
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Load the baseline and production tables.
    ///
    /// Each side accepts any mix of files and directories; all files of one
    /// side are unioned row-wise into a single table.
    pub fn load(&self, baseline: &[PathBuf], production: &[PathBuf]) -> Result<(Table, Table)> {
        let baseline = self.load_table("baseline", baseline)?;
        let production = self.load_table("production", production)?;
        Ok((baseline, production))
    }

    /// Load and union every file reachable from `paths`
    pub fn load_table(&self, label: &str, paths: &[PathBuf]) -> Result<Table> {
        let start = Instant::now();
        let files = resolve_inputs(paths)?;

        let mut table: Option<Table> = None;
        for file in &files {
            let part = self.load_file(label, file)?;
            debug!(dataset = label, file = %file.display(), rows = part.n_rows(), "Loaded file");
            match table.as_mut() {
                Some(t) => t.append(part),
                None => table = Some(part),
            }
        }

        let table = table.ok_or_else(|| DriftError::DataLoad(format!("no {} input paths given", label)))?;
        info!(
            dataset = label,
            files = files.len(),
            rows = table.n_rows(),
            columns = table.n_columns(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Dataset loaded"
        );
        Ok(table)
    }

    /// Detect file format from extension and load a single file
    pub fn load_file(&self, label: &str, path: &Path) -> Result<Table> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let df = match ext.as_str() {
            "parquet" | "pq" => self.read_parquet(path),
            "json" => self.read_json(path, JsonFormat::Json),
            "jsonl" | "ndjson" => self.read_json(path, JsonFormat::JsonLines),
            "tsv" => self.read_csv(path, b'\t'),
            _ => self.read_csv(path, b','),
        }
        .map_err(|e| DriftError::DataLoad(format!("cannot parse {}: {}", path.display(), e)))?;

        Table::from_frame(label, &df, path)
    }

    fn read_csv(&self, path: &Path, separator: u8) -> PolarsResult<DataFrame> {
        let null_values = NullValues::AllColumns(NULL_TOKENS.iter().map(|t| (*t).into()).collect());
        let parse_opts = CsvParseOptions::default()
            .with_separator(separator)
            .with_null_values(Some(null_values));
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
    }

    fn read_parquet(&self, path: &Path) -> PolarsResult<DataFrame> {
        let file = File::open(path)?;
        ParquetReader::new(file).finish()
    }

    fn read_json(&self, path: &Path, format: JsonFormat) -> PolarsResult<DataFrame> {
        let file = File::open(path)?;
        JsonReader::new(file).with_json_format(format).finish()
    }
}

/// Expand directories into their data files and check every path exists.
///
/// Directory contents are sorted by file name so repeated runs read slices
/// in the same order.
pub fn resolve_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if paths.is_empty() {
        return Err(DriftError::DataLoad("no input paths given".to_string()));
    }

    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(path)
                .map_err(|e| DriftError::DataLoad(format!("cannot read directory {}: {}", path.display(), e)))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && has_supported_extension(p))
                .collect();
            if found.is_empty() {
                return Err(DriftError::DataLoad(format!(
                    "no data files found in {}",
                    path.display()
                )));
            }
            found.sort();
            files.extend(found);
        } else {
            return Err(DriftError::DataLoad(format!("path does not exist: {}", path.display())));
        }
    }
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
