//! # Serenity Model
//!
//! Shared data types for data-driven test reporting.
//!
//! A parameterized test produces one [`DataTable`] (named columns, one row per
//! invocation). All tables found on a test class are gathered in a
//! [`DataTableRegistry`], keyed by `<class canonical name>.<method name>`,
//! which the reporting layer uses to render one example table per scenario.
//!
//! ## Example
//!
//! ```
//! use serenity_model::{DataTable, DataTableRegistry, ParameterValue};
//!
//! let table = DataTable::with_headers(["a", "b"])
//!     .and_row(vec![ParameterValue::from(1), ParameterValue::from(2)])
//!     .build();
//!
//! let registry: DataTableRegistry = [(
//!     DataTableRegistry::table_key("com.acme.AdditionTest", "adds"),
//!     table,
//! )]
//! .into_iter()
//! .collect();
//!
//! let table = registry.table_for("com.acme.AdditionTest", "adds").unwrap();
//! assert_eq!(table.headers(), ["a", "b"]);
//! assert_eq!(table.rows()[0][1].to_string(), "2");
//! ```

mod data_table;
mod registry;

pub use data_table::{numbered_column_headings, DataTable, DataTableBuilder, ParameterValue};
pub use registry::DataTableRegistry;

/// Returns a version string for the Serenity model crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
