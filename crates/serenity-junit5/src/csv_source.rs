use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::CsvSourceError;

/// Rows read from one or more CSV files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTestData {
    /// Header row of the first file
    pub headers: Vec<String>,
    /// One map of header -> field per record, in file order
    pub rows: Vec<HashMap<String, String>>,
}

/// Reads test data from CSV files with a header row
#[derive(Debug, Clone)]
pub struct CsvTestDataSource {
    paths: Vec<PathBuf>,
    delimiter: u8,
}

impl CsvTestDataSource {
    pub fn new<I, P>(paths: I, delimiter: char) -> Result<Self, CsvSourceError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        if !delimiter.is_ascii() {
            return Err(CsvSourceError::InvalidDelimiter(delimiter));
        }
        Ok(Self {
            paths: paths.into_iter().map(Into::into).collect(),
            delimiter: delimiter as u8,
        })
    }

    /// Read every file in order.
    ///
    /// Each file is closed before the next is opened, including when reading fails.
    pub fn load(&self) -> Result<CsvTestData, CsvSourceError> {
        if self.paths.is_empty() {
            return Err(CsvSourceError::NoResources);
        }

        let mut data = CsvTestData::default();
        for (index, path) in self.paths.iter().enumerate() {
            let (headers, rows) = self.read_file(path)?;
            if index == 0 {
                data.headers = headers;
            }
            data.rows.extend(rows);
        }
        Ok(data)
    }

    fn read_file(
        &self,
        path: &Path,
    ) -> Result<(Vec<String>, Vec<HashMap<String, String>>), CsvSourceError> {
        let file = File::open(path).map_err(|source| CsvSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |source| CsvSourceError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()
            .map_err(parse_error)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(parse_error)?;
            rows.push(
                headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect(),
            );
        }

        debug!(path = %path.display(), rows = rows.len(), "Read CSV test data");
        Ok((headers, rows))
    }
}
