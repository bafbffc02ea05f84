use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::token2id::Id2Token;

/// A sparse matrix read from a Matrix Market coordinate file.
///
/// Entries keep the order of the file and use 1-based indices, as the
/// exchange format does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMatrix {
    rows: usize,
    cols: usize,
    entries: Vec<(u32, u32, f64)>,
}

impl CoordinateMatrix {
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn nonzero_count(&self) -> usize {
        self.entries.len()
    }

    /// (row, column, value) triples, 1-based.
    pub fn entries(&self) -> impl Iterator<Item = (u32, u32, f64)> + '_ {
        self.entries.iter().copied()
    }
}

/// Read a sparse matrix from a Matrix Market file.
///
/// The path must carry the `.mm` extension; anything else is rejected
/// before the file is opened. The file handle is scoped to this call.
///
/// # Errors
/// * `Error::FileExtension` for a non-`.mm` path.
/// * `Error::MatrixMarket` for content that does not follow the coordinate
///   format (missing banner, malformed dimensions or entries, out-of-range
///   indices, wrong entry count).
pub fn read_matrix_market(path: impl AsRef<Path>) -> Result<CoordinateMatrix> {
    let path = path.as_ref();
    if path.extension().and_then(|e| e.to_str()) != Some("mm") {
        return Err(Error::FileExtension(path.display().to_string()));
    }

    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let banner = lines
        .next()
        .transpose()?
        .ok_or_else(|| Error::MatrixMarket("empty file".to_string()))?;
    if !banner.starts_with("%%MatrixMarket") {
        return Err(Error::MatrixMarket(format!(
            "missing %%MatrixMarket banner, found {banner:?}"
        )));
    }

    // skip comment lines, then read the dimensions line
    let mut dims = None;
    for line in lines.by_ref() {
        let line = line?;
        if line.starts_with('%') || line.trim().is_empty() {
            continue;
        }
        dims = Some(line);
        break;
    }
    let dims = dims.ok_or_else(|| Error::MatrixMarket("missing dimensions line".to_string()))?;
    let mut fields = dims.split_whitespace();
    let rows = parse_field::<usize>(fields.next(), &dims)?;
    let cols = parse_field::<usize>(fields.next(), &dims)?;
    let nnz = parse_field::<usize>(fields.next(), &dims)?;

    let mut entries = Vec::with_capacity(nnz);
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let row = parse_field::<u32>(fields.next(), &line)?;
        let col = parse_field::<u32>(fields.next(), &line)?;
        let value = parse_field::<f64>(fields.next(), &line)?;
        if row as usize > rows || col as usize > cols || row == 0 || col == 0 {
            return Err(Error::MatrixMarket(format!(
                "entry ({row}, {col}) is outside the declared {rows}x{cols} shape"
            )));
        }
        entries.push((row, col, value));
    }

    if entries.len() != nnz {
        return Err(Error::MatrixMarket(format!(
            "declared {nnz} entries, found {}",
            entries.len()
        )));
    }

    debug!(rows, cols, nnz, "Matrix Market file read");
    Ok(CoordinateMatrix {
        rows,
        cols,
        entries,
    })
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, line: &str) -> Result<T> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| Error::MatrixMarket(format!("malformed line {line:?}")))
}

/// Read an id-to-token mapping from a headerless two-column CSV file.
///
/// Column 0 is the integer identifier, column 1 the token. Note the
/// direction: the file stores id first, so this returns an [`Id2Token`],
/// not a [`Token2Id`](crate::Token2Id).
pub fn read_token2id(path: impl AsRef<Path>) -> Result<Id2Token> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())?;

    let mut mapping = Id2Token::new();
    for record in reader.records() {
        let record = record?;
        let (Some(id), Some(token)) = (record.get(0), record.get(1)) else {
            return Err(Error::Token2IdFormat(format!(
                "expected two columns, got {}",
                record.len()
            )));
        };
        let id: u32 = id
            .trim()
            .parse()
            .map_err(|_| Error::Token2IdFormat(format!("{id:?} is not an integer id")))?;
        mapping.insert(id, token);
    }

    debug!(num_tokens = mapping.len(), "token2id CSV read");
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn wrong_extension_is_rejected_before_reading() {
        // the path does not even exist; the extension check comes first
        let result = read_matrix_market("corpus.txt");
        assert!(matches!(result, Err(Error::FileExtension(_))));
    }

    #[test]
    fn coordinate_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.mm");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "%%MatrixMarket matrix coordinate real general").unwrap();
        writeln!(file, "% produced by a corpus export").unwrap();
        writeln!(file, "2 5 4").unwrap();
        writeln!(file, "1 1 1").unwrap();
        writeln!(file, "1 4 1").unwrap();
        writeln!(file, "2 1 1").unwrap();
        writeln!(file, "2 5 2").unwrap();
        drop(file);

        let matrix = read_matrix_market(&path).unwrap();
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 5);
        assert_eq!(matrix.nonzero_count(), 4);
        let entries: Vec<(u32, u32, f64)> = matrix.entries().collect();
        assert_eq!(entries[0], (1, 1, 1.0));
        assert_eq!(entries[3], (2, 5, 2.0));
    }

    #[test]
    fn missing_banner_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.mm");
        std::fs::write(&path, "2 2 0\n").unwrap();
        assert!(matches!(
            read_matrix_market(&path),
            Err(Error::MatrixMarket(_))
        ));
    }

    #[test]
    fn out_of_range_entry_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.mm");
        std::fs::write(
            &path,
            "%%MatrixMarket matrix coordinate real general\n1 1 1\n2 1 1\n",
        )
        .unwrap();
        assert!(matches!(
            read_matrix_market(&path),
            Err(Error::MatrixMarket(_))
        ));
    }

    #[test]
    fn entry_count_must_match_the_declaration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.mm");
        std::fs::write(
            &path,
            "%%MatrixMarket matrix coordinate real general\n1 1 2\n1 1 1\n",
        )
        .unwrap();
        assert!(matches!(
            read_matrix_market(&path),
            Err(Error::MatrixMarket(_))
        ));
    }

    #[test]
    fn token2id_csv_keeps_the_file_direction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.csv");
        std::fs::write(&path, "0,this\n1,is\n2,an\n3,example\n").unwrap();

        let mapping = read_token2id(&path).unwrap();
        assert_eq!(mapping.len(), 4);
        assert_eq!(mapping.get(0), Some("this"));
        assert_eq!(mapping.get(3), Some("example"));
    }

    #[test]
    fn non_integer_id_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.csv");
        std::fs::write(&path, "zero,this\n").unwrap();
        assert!(matches!(
            read_token2id(&path),
            Err(Error::Token2IdFormat(_))
        ));
    }
}
