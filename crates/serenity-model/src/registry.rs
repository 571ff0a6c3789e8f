use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};

use crate::data_table::DataTable;

/// Parameter tables of one test class, keyed by `<class>.<method>`.
///
/// A registry is assembled once (via [`FromIterator`]) and is read-only
/// afterwards. Iteration follows key order, so two registries built from the
/// same class compare equal and serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataTableRegistry {
    tables: BTreeMap<String, DataTable>,
}

impl DataTableRegistry {
    /// The key under which a method's table is registered
    pub fn table_key(class_name: &str, method_name: &str) -> String {
        format!("{}.{}", class_name, method_name)
    }

    pub fn get(&self, key: &str) -> Option<&DataTable> {
        self.tables.get(key)
    }

    pub fn table_for(&self, class_name: &str, method_name: &str) -> Option<&DataTable> {
        self.get(&Self::table_key(class_name, method_name))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, DataTable> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Later entries replace earlier ones with the same key.
impl FromIterator<(String, DataTable)> for DataTableRegistry {
    fn from_iter<I: IntoIterator<Item = (String, DataTable)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DataTableRegistry {
    type Item = (&'a String, &'a DataTable);
    type IntoIter = btree_map::Iter<'a, String, DataTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
