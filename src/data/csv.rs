//! CSV dataset loading
//!
//! Supports files where the last column is the label and all other columns
//! are features. A header row is detected automatically and lines starting
//! with '#' are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::{Array1, Array2};

use crate::core::{Result, SvmError};
use crate::data::DenseDataset;

impl DenseDataset {
    /// Load a dataset from a CSV file.
    ///
    /// The last column is taken as the label; headers are detected
    /// automatically.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SvmError::IoError)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Load a dataset from any CSV reader
    pub fn from_csv_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut labels: Vec<f64> = Vec::new();
        let mut width = None;
        let mut first_data_line = true;

        for line in reader.lines() {
            let line = line.map_err(SvmError::IoError)?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if first_data_line {
                first_data_line = false;
                if is_header_line(line) {
                    continue;
                }
            }

            let (features, label) = parse_data_line(line)?;
            match width {
                None => width = Some(features.len()),
                Some(w) if w != features.len() => {
                    return Err(SvmError::ParseError(format!(
                        "inconsistent column count: expected {w}, got {} in line: {line}",
                        features.len()
                    )));
                }
                Some(_) => {}
            }
            rows.push(features);
            labels.push(label);
        }

        if rows.is_empty() {
            return Err(SvmError::EmptyDataset);
        }

        let width = width.unwrap_or(0);
        let mut features = Array2::zeros((rows.len(), width));
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                features[[i, j]] = value;
            }
        }
        DenseDataset::new(features, Array1::from(labels))
    }
}

/// A line is treated as a header when most of its feature fields fail to
/// parse as numbers
fn is_header_line(line: &str) -> bool {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 2 {
        return false;
    }
    let non_numeric = fields
        .iter()
        .take(fields.len() - 1)
        .filter(|field| field.trim().parse::<f64>().is_err())
        .count();
    non_numeric > fields.len() / 2
}

fn parse_data_line(line: &str) -> Result<(Vec<f64>, f64)> {
    let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
    if fields.len() < 2 {
        return Err(SvmError::ParseError(format!(
            "line has too few fields: {line}"
        )));
    }

    let label_str = fields[fields.len() - 1];
    let label = label_str
        .parse::<f64>()
        .map_err(|_| SvmError::ParseError(format!("invalid label: {label_str}")))?;

    let mut features = Vec::with_capacity(fields.len() - 1);
    for field in &fields[..fields.len() - 1] {
        let value = field
            .parse::<f64>()
            .map_err(|_| SvmError::ParseError(format!("invalid feature value: {field}")))?;
        features.push(value);
    }
    Ok((features, label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Dataset;
    use ndarray::array;
    use std::io::Cursor;

    #[test]
    fn test_csv_without_header() {
        let data = "1.0,2.0,1\n-1.0,-2.0,-1\n";
        let dataset = DenseDataset::from_csv_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 2);
        assert_eq!(dataset.features(), array![[1.0, 2.0], [-1.0, -2.0]].view());
        assert_eq!(dataset.labels(), array![1.0, -1.0].view());
    }

    #[test]
    fn test_csv_with_header() {
        let data = "x1,x2,label\n1.0,2.0,1\n-1.0,-2.0,-1\n";
        let dataset = DenseDataset::from_csv_reader(Cursor::new(data)).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_csv_skips_comments_and_blank_lines() {
        let data = "# comment\n\n1.0,1\n0.5,-1\n";
        let dataset = DenseDataset::from_csv_reader(Cursor::new(data)).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 1);
    }

    #[test]
    fn test_csv_zero_labels_remapped() {
        let data = "1.0,1\n2.0,0\n";
        let dataset = DenseDataset::from_csv_reader(Cursor::new(data)).unwrap();
        assert_eq!(dataset.labels(), array![1.0, -1.0].view());
    }

    #[test]
    fn test_csv_ragged_rows_rejected() {
        let data = "1.0,2.0,1\n1.0,-1\n";
        let result = DenseDataset::from_csv_reader(Cursor::new(data));
        assert!(matches!(result, Err(SvmError::ParseError(_))));
    }

    #[test]
    fn test_csv_invalid_value_rejected() {
        let data = "1.0,abc,1\n";
        let result = DenseDataset::from_csv_reader(Cursor::new(data));
        assert!(matches!(result, Err(SvmError::ParseError(_))));
    }

    #[test]
    fn test_csv_empty_input_rejected() {
        let result = DenseDataset::from_csv_reader(Cursor::new("# only a comment\n"));
        assert!(matches!(result, Err(SvmError::EmptyDataset)));
    }
}
