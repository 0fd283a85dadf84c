// File: tsv.rs
// Created: 2026-10-16
// Description: Tab separated inputs: numeric matrices and single columns of labels

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::Array2;

use crate::error::{MetricError, Result};

fn open_lines<P: AsRef<Path>>(path: P) -> Result<impl Iterator<Item = std::io::Result<String>>> {
    let file = File::open(path.as_ref())?;
    Ok(BufReader::new(file).lines())
}

/// Read one column of a tsv file. With `header`, the first line is skipped.
/// Blank lines are ignored.
pub fn read_one_column_of_tsv_as_vec<P: AsRef<Path>>(path: P, col_index: usize, header: bool) -> Result<Vec<String>> {
    let mut vec = Vec::new();
    for (line_no, line) in open_lines(path)?.enumerate().skip(header as usize) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line.split('\t').collect::<Vec<_>>();
        let value = row.get(col_index).ok_or_else(|| {
            MetricError::Parse(format!(
                "line {}: column {} requested but only {} found",
                line_no + 1,
                col_index,
                row.len()
            ))
        })?;
        vec.push(value.trim().to_string());
    }
    Ok(vec)
}

/// Read a numeric matrix, one row per line with tab or space separated values.
pub fn read_matrix_tsv<P: AsRef<Path>>(path: P, header: bool) -> Result<Array2<f64>> {
    let mut values = Vec::new();
    let mut ncols: Option<usize> = None;
    let mut nrows = 0usize;
    for (line_no, line) in open_lines(path)?.enumerate().skip(header as usize) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let before = values.len();
        for field in line.split_whitespace() {
            let value = field
                .parse::<f64>()
                .map_err(|e| MetricError::Parse(format!("line {}: {} ({})", line_no + 1, field, e)))?;
            values.push(value);
        }
        let width = values.len() - before;
        match ncols {
            None => ncols = Some(width),
            Some(n) if n != width => {
                return Err(MetricError::Parse(format!(
                    "line {}: expected {} values, found {}",
                    line_no + 1,
                    n,
                    width
                )))
            }
            _ => {}
        }
        nrows += 1;
    }
    Array2::from_shape_vec((nrows, ncols.unwrap_or(0)), values).map_err(|e| MetricError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    fn write_tmp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_matrix() {
        let file = write_tmp("0\t1\t0\n1 0.5 0\n\n0\t0\t1\n");
        let matrix = read_matrix_tsv(file.path(), false).unwrap();
        assert_eq!(matrix, array![[0.0, 1.0, 0.0], [1.0, 0.5, 0.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_read_matrix_with_header_and_ragged_rows() {
        let file = write_tmp("p0\tp1\n0.1\t0.9\n");
        assert_eq!(read_matrix_tsv(file.path(), true).unwrap(), array![[0.1, 0.9]]);
        let ragged = write_tmp("0\t1\n0\n");
        assert!(matches!(read_matrix_tsv(ragged.path(), false), Err(MetricError::Parse(_))));
        let text = write_tmp("0\tone\n");
        assert!(matches!(read_matrix_tsv(text.path(), false), Err(MetricError::Parse(_))));
    }

    #[test]
    fn test_read_one_column() {
        let file = write_tmp("subject\tcondition\nsub-01\trest\nsub-02\ttask\n");
        assert_eq!(read_one_column_of_tsv_as_vec(file.path(), 0, true).unwrap(), vec!["sub-01", "sub-02"]);
        assert_eq!(read_one_column_of_tsv_as_vec(file.path(), 1, false).unwrap(), vec!["condition", "rest", "task"]);
        assert!(read_one_column_of_tsv_as_vec(file.path(), 2, false).is_err());
    }
}
