//! Delimited-text (CSV/TSV) reader for training and inference tables.
use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use ndarray::{Array1, Array2};

use crate::data_handling::LabeledData;

/// Configuration for reading feature tables.
#[derive(Debug, Clone)]
pub struct TableReaderConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Column name holding the 0/1 target.
    pub target_column: String,
    /// Optional column name of a row identifier, never used as a feature.
    pub id_column: Option<String>,
    /// Optional list of feature columns to load (in order).
    /// When `None`, all columns other than target/id/ignored are features.
    pub feature_columns: Option<Vec<String>>,
    /// Columns to skip when auto-selecting features.
    pub ignore_columns: Vec<String>,
}

impl Default for TableReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            target_column: "target".to_string(),
            id_column: Some("id".to_string()),
            feature_columns: None,
            ignore_columns: Vec::new(),
        }
    }
}

impl TableReaderConfig {
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }
}

/// Read a table with a target column into a [`LabeledData`].
pub fn read_labeled_table<P: AsRef<Path>>(path: P, config: &TableReaderConfig) -> Result<LabeledData> {
    let mut reader = open_reader(path.as_ref(), config)?;
    let headers = reader
        .headers()
        .context("Failed to read header row")?
        .clone();

    let target_idx = find_column(&headers, &config.target_column)
        .ok_or_else(|| anyhow!("Missing target column '{}'", config.target_column))?;
    let feature_indices = resolve_feature_indices(&headers, config, Some(target_idx))?;

    let mut features = Vec::new();
    let mut targets = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let raw = record
            .get(target_idx)
            .ok_or_else(|| anyhow!("Missing target value at row {}", row_idx + 1))?;
        targets.push(parse_target(raw).with_context(|| format!("Invalid target at row {}", row_idx + 1))?);

        push_features(&record, &headers, &feature_indices, row_idx, &mut features)?;
    }

    let x = Array2::from_shape_vec((targets.len(), feature_indices.len()), features)
        .context("Failed to build feature matrix")?;
    let data = LabeledData::new(x, Array1::from_vec(targets), column_names(&headers, &feature_indices))?;
    data.log_summary();
    Ok(data)
}

/// Read an inference table (no target column required). Returns the feature
/// matrix and its column names.
pub fn read_feature_table<P: AsRef<Path>>(
    path: P,
    config: &TableReaderConfig,
) -> Result<(Array2<f64>, Vec<String>)> {
    let mut reader = open_reader(path.as_ref(), config)?;
    let headers = reader
        .headers()
        .context("Failed to read header row")?
        .clone();

    let target_idx = find_column(&headers, &config.target_column);
    let feature_indices = resolve_feature_indices(&headers, config, target_idx)?;

    let mut features = Vec::new();
    let mut n_rows = 0;
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        push_features(&record, &headers, &feature_indices, row_idx, &mut features)?;
        n_rows += 1;
    }

    let x = Array2::from_shape_vec((n_rows, feature_indices.len()), features)
        .context("Failed to build feature matrix")?;
    log::info!("Read {} rows with {} feature columns", n_rows, feature_indices.len());
    Ok((x, column_names(&headers, &feature_indices)))
}

fn open_reader(path: &Path, config: &TableReaderConfig) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open table: {}", path.display()))
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

fn resolve_feature_indices(
    headers: &StringRecord,
    config: &TableReaderConfig,
    target_idx: Option<usize>,
) -> Result<Vec<usize>> {
    if let Some(names) = &config.feature_columns {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = find_column(headers, name)
                .ok_or_else(|| anyhow!("Missing feature column '{}'", name))?;
            indices.push(idx);
        }
        return Ok(indices);
    }

    let id_idx = config
        .id_column
        .as_deref()
        .and_then(|name| find_column(headers, name));
    let ignore: HashSet<String> = config
        .ignore_columns
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();

    let indices: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(idx, header)| {
            Some(*idx) != target_idx
                && Some(*idx) != id_idx
                && !ignore.contains(&header.to_ascii_lowercase())
        })
        .map(|(idx, _)| idx)
        .collect();

    if indices.is_empty() {
        return Err(anyhow!("No feature columns detected in header"));
    }
    Ok(indices)
}

/// Targets may be written as integers (`0`, `1`) or as floats (`0.0`, `1.0`).
fn parse_target(raw: &str) -> Result<i32> {
    if let Ok(value) = raw.parse::<i32>() {
        return Ok(value);
    }
    let value = raw
        .parse::<f64>()
        .map_err(|_| anyhow!("'{}' is not a number", raw))?;
    if value.fract() != 0.0 {
        return Err(anyhow!("'{}' is not an integer label", raw));
    }
    Ok(value as i32)
}

fn push_features(
    record: &StringRecord,
    headers: &StringRecord,
    feature_indices: &[usize],
    row_idx: usize,
    features: &mut Vec<f64>,
) -> Result<()> {
    for &idx in feature_indices {
        let value = record
            .get(idx)
            .ok_or_else(|| anyhow!("Missing feature value at row {}", row_idx + 1))?;
        let parsed = value.parse::<f64>().with_context(|| {
            format!(
                "Invalid feature '{}' at row {}",
                headers.get(idx).unwrap_or(""),
                row_idx + 1
            )
        })?;
        features.push(parsed);
    }
    Ok(())
}

fn column_names(headers: &StringRecord, indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or("").to_string())
        .collect()
}
