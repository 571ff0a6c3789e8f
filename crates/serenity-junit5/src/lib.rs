//! # Serenity JUnit 5
//!
//! Extracts the data tables of parameterized tests so reports can render one
//! example table per data-driven scenario.
//!
//! Test classes are described in YAML: each method lists its parameter names
//! and annotations. A method is a data-driven test when it is public, carries
//! `ParameterizedTest` and exactly one of the supported data sources:
//!
//! * `ValueSource`: literal values, one column
//! * `CsvSource`: inline CSV lines
//! * `CsvFileSource`: CSV files with a header row
//! * `EnumSource`: constants of an enum declared under `enums`
//!
//! ## Example
//!
//! ```
//! use serenity_junit5::{parse_test_class, DataDrivenAnnotations};
//! use serenity_model::ParameterValue;
//!
//! let yaml = r#"
//! name: com.acme.PaletteTest
//! enums:
//!   com.acme.Colour: [RED, GREEN, BLUE]
//! methods:
//!   - name: paints
//!     parameters: [colour]
//!     annotations:
//!       - ParameterizedTest
//!       - name: EnumSource
//!         value: com.acme.Colour
//!         names: [RED, BLUE]
//!   - name: counts
//!     parameters: [number]
//!     annotations:
//!       - ParameterizedTest
//!       - name: ValueSource
//!         ints: [1, 2, 3]
//! "#;
//!
//! let test_class = parse_test_class(yaml).unwrap();
//! let tables = DataDrivenAnnotations::for_class(&test_class).into_parameter_tables();
//!
//! assert_eq!(tables.len(), 2);
//! let colours = tables.table_for("com.acme.PaletteTest", "paints").unwrap();
//! assert_eq!(colours.rows()[1], [ParameterValue::EnumConstant("BLUE".to_string())]);
//! ```

mod cleanup;
mod csv_source;
mod data_driven;
mod descriptor;
mod error;
mod parser;

pub mod sources;

pub use cleanup::{Junit5CleanupAnnotations, JUNIT5_CLEANUP_ANNOTATIONS};
pub use csv_source::{CsvTestData, CsvTestDataSource};
pub use data_driven::{
    find_test_data_methods, DataDrivenAnnotations, ExtractorConfig, CSV_DELIMITER_PROPERTY,
    DATA_DIR_PROPERTY,
};
pub use descriptor::{
    AnnotationDescriptor, ClassIntrospection, MethodDescriptor, TestClassCatalog,
    TestClassDescriptor,
};
pub use error::{CsvSourceError, DescriptorError};
pub use parser::{load_test_class, load_test_classes, parse_test_class, parse_test_classes};
pub use sources::SourceKind;

/// Returns a version string for the Serenity JUnit 5 crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
