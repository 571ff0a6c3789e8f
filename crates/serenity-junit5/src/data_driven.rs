//! Parameter tables for the data-driven tests of a test class.

use serenity_core::EnvironmentVariables;
use serenity_model::{numbered_column_headings, DataTable, DataTableRegistry, ParameterValue};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::csv_source::CsvTestDataSource;
use crate::descriptor::{ClassIntrospection, MethodDescriptor};
use crate::error::CsvSourceError;
use crate::sources::{CsvFileSource, EnumSource, SourceKind};

/// Property naming the directory CSV resources are resolved against
pub const DATA_DIR_PROPERTY: &str = "serenity.data.dir";

/// Property holding the default CSV file delimiter
pub const CSV_DELIMITER_PROPERTY: &str = "serenity.csv.delimiter";

/// Settings for reading external test data
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    /// Directory `CsvFileSource` resources are resolved against
    pub resource_dir: PathBuf,
    /// Delimiter for CSV files whose annotation does not name one
    pub csv_delimiter: char,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            resource_dir: PathBuf::from("."),
            csv_delimiter: ',',
        }
    }
}

impl ExtractorConfig {
    /// Defaults overridden by `serenity.data.dir` and `serenity.csv.delimiter`
    pub fn from_environment(environment: &EnvironmentVariables) -> Self {
        let mut config = Self::default();

        if let Some(dir) = environment.optional_property(DATA_DIR_PROPERTY) {
            config.resource_dir = PathBuf::from(dir);
        }

        if let Some(delimiter) = environment.optional_property(CSV_DELIMITER_PROPERTY) {
            let mut chars = delimiter.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => config.csv_delimiter = c,
                _ => warn!("Invalid {} value: {:?}", CSV_DELIMITER_PROPERTY, delimiter),
            }
        }

        config
    }
}

/// The parameter tables of one test class.
///
/// Tables are built eagerly when the class is examined; the registry is never
/// modified afterwards. Building never fails: methods whose data cannot be
/// read are left out.
///
/// ```
/// use serenity_junit5::{parse_test_class, DataDrivenAnnotations};
///
/// let test_class = parse_test_class(r#"
/// name: com.acme.CalculatorTest
/// methods:
///   - name: adds
///     parameters: [a, b, sum]
///     annotations:
///       - ParameterizedTest
///       - name: CsvSource
///         value: ["1,2,3", "4,5,9"]
/// "#).unwrap();
///
/// let annotations = DataDrivenAnnotations::for_class(&test_class);
/// let table = annotations
///     .parameter_tables()
///     .table_for("com.acme.CalculatorTest", "adds")
///     .unwrap();
///
/// assert_eq!(table.headers(), ["a", "b", "sum"]);
/// assert_eq!(table.row_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DataDrivenAnnotations {
    class_name: String,
    parameter_tables: DataTableRegistry,
}

impl DataDrivenAnnotations {
    pub fn for_class(test_class: &dyn ClassIntrospection) -> Self {
        Self::with_config(test_class, &ExtractorConfig::default())
    }

    pub fn with_config(test_class: &dyn ClassIntrospection, config: &ExtractorConfig) -> Self {
        Self {
            class_name: test_class.canonical_name().to_string(),
            parameter_tables: generate_parameter_tables(test_class, config),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn parameter_tables(&self) -> &DataTableRegistry {
        &self.parameter_tables
    }

    pub fn into_parameter_tables(self) -> DataTableRegistry {
        self.parameter_tables
    }
}

/// Public methods that are eligible data-driven tests, with their source
pub fn find_test_data_methods(
    test_class: &dyn ClassIntrospection,
) -> Vec<(&MethodDescriptor, SourceKind)> {
    test_class
        .methods()
        .iter()
        .filter(|method| method.public)
        .filter_map(|method| SourceKind::of(method).map(|source| (method, source)))
        .collect()
}

fn generate_parameter_tables(
    test_class: &dyn ClassIntrospection,
    config: &ExtractorConfig,
) -> DataTableRegistry {
    let class_name = test_class.canonical_name();
    let mut tables = BTreeMap::new();

    for (method, source) in find_test_data_methods(test_class) {
        let table_name = DataTableRegistry::table_key(class_name, &method.name);

        let rows = match &source {
            SourceKind::Value(value_source) => one_column(value_source.values()),
            SourceKind::CsvInline(csv_source) => csv_source.rows(),
            SourceKind::Enum(enum_source) => enum_source_rows(test_class, enum_source),
            SourceKind::CsvFile(file_source) => match csv_file_rows(file_source, config) {
                Ok(rows) => rows,
                Err(e) => {
                    error!(
                        table = %table_name,
                        error_code = e.error_code(),
                        error = %e,
                        "Cannot load csv resource"
                    );
                    continue;
                }
            },
        };

        info!(
            table = %table_name,
            source = source.name(),
            rows = rows.len(),
            "Registered parameter table"
        );
        let table = create_parameters_table(&method.parameters, rows);
        if tables.insert(table_name.clone(), table).is_some() {
            warn!(table = %table_name, "Overloaded test method replaces an earlier parameter table");
        }
    }

    tables.into_iter().collect()
}

fn one_column(values: Vec<ParameterValue>) -> Vec<Vec<ParameterValue>> {
    values.into_iter().map(|value| vec![value]).collect()
}

fn enum_source_rows(
    test_class: &dyn ClassIntrospection,
    source: &EnumSource,
) -> Vec<Vec<ParameterValue>> {
    if source.value.is_empty() {
        warn!("EnumSource does not name an enum type");
        return Vec::new();
    }
    let Some(constants) = test_class.enum_constants(&source.value) else {
        warn!(enum_type = %source.value, "Unknown enum type in EnumSource");
        return Vec::new();
    };

    match source.select(&constants) {
        Ok(selected) => one_column(selected.into_iter().map(ParameterValue::EnumConstant).collect()),
        Err(e) => {
            warn!(enum_type = %source.value, error = %e, "Invalid EnumSource name pattern");
            Vec::new()
        }
    }
}

/// Rows follow the header order declared in the file, not the parameter order.
fn csv_file_rows(
    source: &CsvFileSource,
    config: &ExtractorConfig,
) -> Result<Vec<Vec<ParameterValue>>, CsvSourceError> {
    let paths = source
        .resources
        .iter()
        .map(|resource| config.resource_dir.join(resource.trim_start_matches('/')))
        .chain(source.files.iter().map(PathBuf::from));
    let delimiter = source.delimiter.unwrap_or(config.csv_delimiter);

    let data = CsvTestDataSource::new(paths, delimiter)?.load()?;

    Ok(data
        .rows
        .iter()
        .map(|row| {
            data.headers
                .iter()
                .map(|header| ParameterValue::from(row.get(header).cloned()))
                .collect()
        })
        .collect())
}

/// Declared parameter names, trimmed, without empty names
fn column_names(parameters: &[String]) -> Vec<String> {
    parameters
        .join(",")
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn create_parameters_table(parameters: &[String], rows: Vec<Vec<ParameterValue>>) -> DataTable {
    let number_of_columns = rows.first().map_or(0, Vec::len);
    let mut headers = column_names(parameters);
    if headers.is_empty() {
        headers = numbered_column_headings(number_of_columns);
    }
    DataTable::with_headers(headers).and_rows(rows).build()
}
