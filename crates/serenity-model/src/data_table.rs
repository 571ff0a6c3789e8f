use serde::Serialize;
use std::fmt;

/// A single cell of a parameter table.
///
/// Values are opaque to the reporting layer; they are only ever rendered
/// (via [`fmt::Display`]) or serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// An absent value, e.g. a CSV column missing from one of several files
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Text(String),
    /// A type name supplied as a parameter
    Class(String),
    /// The name of an enum constant
    EnumConstant(String),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Null => Ok(()),
            ParameterValue::Bool(b) => write!(f, "{}", b),
            ParameterValue::Int(i) => write!(f, "{}", i),
            // keeps the decimal point of whole numbers: 2.0, not 2
            ParameterValue::Float(x) => write!(f, "{:?}", x),
            ParameterValue::Char(c) => write!(f, "{}", c),
            ParameterValue::Text(s) | ParameterValue::Class(s) | ParameterValue::EnumConstant(s) => {
                f.write_str(s)
            }
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(s: &str) -> Self {
        ParameterValue::Text(s.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(s: String) -> Self {
        ParameterValue::Text(s)
    }
}

impl From<bool> for ParameterValue {
    fn from(b: bool) -> Self {
        ParameterValue::Bool(b)
    }
}

impl From<char> for ParameterValue {
    fn from(c: char) -> Self {
        ParameterValue::Char(c)
    }
}

impl From<i8> for ParameterValue {
    fn from(i: i8) -> Self {
        ParameterValue::Int(i.into())
    }
}

impl From<i16> for ParameterValue {
    fn from(i: i16) -> Self {
        ParameterValue::Int(i.into())
    }
}

impl From<i32> for ParameterValue {
    fn from(i: i32) -> Self {
        ParameterValue::Int(i.into())
    }
}

impl From<i64> for ParameterValue {
    fn from(i: i64) -> Self {
        ParameterValue::Int(i)
    }
}

/// Goes through the shortest decimal form of the `f32`, so `0.1f32` stays `0.1`.
impl From<f32> for ParameterValue {
    fn from(x: f32) -> Self {
        ParameterValue::Float(x.to_string().parse().unwrap_or_else(|_| f64::from(x)))
    }
}

impl From<f64> for ParameterValue {
    fn from(x: f64) -> Self {
        ParameterValue::Float(x)
    }
}

impl<T: Into<ParameterValue>> From<Option<T>> for ParameterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ParameterValue::Null)
    }
}

/// Column headings "Parameter 1" .. "Parameter N".
pub fn numbered_column_headings(number_of_columns: usize) -> Vec<String> {
    (1..=number_of_columns)
        .map(|i| format!("Parameter {}", i))
        .collect()
}

/// A named, rectangular table of test parameters.
///
/// Every row holds exactly `headers().len()` cells. Tables are only created
/// through [`DataTableBuilder`], which enforces that shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    headers: Vec<String>,
    rows: Vec<Vec<ParameterValue>>,
}

impl DataTable {
    /// Start building a table with the given column headers
    pub fn with_headers<I, S>(headers: I) -> DataTableBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DataTableBuilder {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<ParameterValue>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[ParameterValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// All cells of the named column, top to bottom
    pub fn column(&self, header: &str) -> Option<Vec<&ParameterValue>> {
        let index = self.headers.iter().position(|h| h == header)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builder for [`DataTable`].
#[derive(Debug, Clone)]
pub struct DataTableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<ParameterValue>>,
}

impl DataTableBuilder {
    pub fn and_rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<ParameterValue>>,
    {
        self.rows.extend(rows);
        self
    }

    pub fn and_row(mut self, row: Vec<ParameterValue>) -> Self {
        self.rows.push(row);
        self
    }

    /// Build the table, making it rectangular.
    ///
    /// The width is the larger of the header count and the widest row.
    /// Missing headers become "Parameter N" and short rows are padded with
    /// [`ParameterValue::Null`].
    pub fn build(self) -> DataTable {
        let DataTableBuilder { mut headers, mut rows } = self;

        let width = rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(headers.len());

        for i in headers.len()..width {
            headers.push(format!("Parameter {}", i + 1));
        }
        for row in &mut rows {
            row.resize(width, ParameterValue::Null);
        }

        DataTable { headers, rows }
    }
}
