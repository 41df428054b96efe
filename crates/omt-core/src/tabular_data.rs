//! # Tabular Data — Keyed Tables of Composite Rows
//!
//! A `TabularData` maps index keys to composite rows of one tabular type.
//! The index key of a row is the ordered tuple of its index item values.
//!
//! ## Invariants
//!
//! - Every row's composite type is assignable to the tabular row type.
//! - No two rows share an index key. Inserting a duplicate fails with
//!   `KeyAlreadyExists` and leaves the table unchanged.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::composite_data::CompositeData;
use crate::error::OpenDataError;
use crate::open_type::OpenType;
use crate::tabular::TabularType;
use crate::value::OpenValue;

/// The ordered index item values identifying one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey(Vec<Option<OpenValue>>);

impl IndexKey {
    /// Build a key from its component values.
    pub fn new(values: Vec<Option<OpenValue>>) -> Self {
        Self(values)
    }

    /// Build a key from non-null component values.
    pub fn of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<OpenValue>,
    {
        Self(values.into_iter().map(|v| Some(v.into())).collect())
    }

    /// Component values in index order.
    pub fn values(&self) -> &[Option<OpenValue>] {
        &self.0
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match v {
                Some(v) => f.write_str(&v.render())?,
                None => f.write_str("null")?,
            }
        }
        f.write_str(")")
    }
}

/// A value of a tabular type.
#[derive(Debug, Clone)]
pub struct TabularData {
    tabular_type: Arc<TabularType>,
    rows: HashMap<IndexKey, CompositeData>,
}

impl TabularData {
    /// An empty table of the given type.
    pub fn new(tabular_type: impl Into<Arc<TabularType>>) -> Self {
        Self {
            tabular_type: tabular_type.into(),
            rows: HashMap::new(),
        }
    }

    /// The tabular type of this table.
    pub fn tabular_type(&self) -> &Arc<TabularType> {
        &self.tabular_type
    }

    /// The open type of this table.
    pub fn open_type(&self) -> OpenType {
        OpenType::Tabular(self.tabular_type.clone())
    }

    /// The index key `row` would be stored under.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOpenType` if the row's type is not assignable to the
    /// table's row type.
    pub fn calculate_index(&self, row: &CompositeData) -> Result<IndexKey, OpenDataError> {
        let expected = self.tabular_type.row_type();
        if !expected.is_assignable_from(row.composite_type()) {
            return Err(OpenDataError::InvalidOpenType {
                expected: expected.type_name().to_string(),
                actual: row.composite_type().type_name().to_string(),
            });
        }
        let names: Vec<&str> = self
            .tabular_type
            .index_names()
            .iter()
            .map(String::as_str)
            .collect();
        let values = row.get_all(&names)?;
        Ok(IndexKey(values.into_iter().map(|v| v.cloned()).collect()))
    }

    /// Insert a row.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOpenType` for a row of the wrong type and
    /// `KeyAlreadyExists` if a row with the same index key is present.
    pub fn put(&mut self, row: CompositeData) -> Result<(), OpenDataError> {
        let key = self.calculate_index(&row)?;
        if self.rows.contains_key(&key) {
            return Err(OpenDataError::KeyAlreadyExists {
                key: key.to_string(),
            });
        }
        self.rows.insert(key, row);
        Ok(())
    }

    /// Insert several rows, all or nothing. Duplicates within the batch are
    /// rejected the same way as duplicates against existing rows.
    pub fn put_all<I>(&mut self, rows: I) -> Result<(), OpenDataError>
    where
        I: IntoIterator<Item = CompositeData>,
    {
        let mut staged = Vec::new();
        let mut batch_keys = HashSet::new();
        for row in rows {
            let key = self.calculate_index(&row)?;
            if self.rows.contains_key(&key) || !batch_keys.insert(key.clone()) {
                return Err(OpenDataError::KeyAlreadyExists {
                    key: key.to_string(),
                });
            }
            staged.push((key, row));
        }
        self.rows.extend(staged);
        Ok(())
    }

    /// Check that `key` has the arity and component types of the index.
    fn check_key(&self, key: &IndexKey) -> Result<(), OpenDataError> {
        let index_types: Vec<&OpenType> = self.tabular_type.index_types().collect();
        if key.len() != index_types.len() {
            return Err(OpenDataError::invalid_key(format!(
                "key {key} has {} components, index of {} has {}",
                key.len(),
                self.tabular_type.type_name(),
                index_types.len()
            )));
        }
        for (i, (value, expected)) in key.values().iter().zip(index_types).enumerate() {
            if let Some(v) = value {
                if !expected.is_value(v) {
                    return Err(OpenDataError::invalid_key(format!(
                        "component {i} of key {key} is {}, expected {}",
                        v.kind_label(),
                        expected.type_name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// The row stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the key does not fit the index.
    pub fn get(&self, key: &IndexKey) -> Result<Option<&CompositeData>, OpenDataError> {
        self.check_key(key)?;
        Ok(self.rows.get(key))
    }

    /// Whether a row is stored under `key`.
    pub fn contains_key(&self, key: &IndexKey) -> Result<bool, OpenDataError> {
        self.check_key(key)?;
        Ok(self.rows.contains_key(key))
    }

    /// Whether `row` is stored in the table.
    pub fn contains_value(&self, row: &CompositeData) -> bool {
        self.rows.values().any(|r| r == row)
    }

    /// Remove and return the row stored under `key`.
    pub fn remove(&mut self, key: &IndexKey) -> Result<Option<CompositeData>, OpenDataError> {
        self.check_key(key)?;
        Ok(self.rows.remove(key))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Remove every row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Index keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &IndexKey> {
        self.rows.keys()
    }

    /// Rows, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &CompositeData> {
        self.rows.values()
    }
}

impl PartialEq for TabularData {
    fn eq(&self, other: &Self) -> bool {
        self.tabular_type == other.tabular_type && self.rows == other.rows
    }
}

impl Eq for TabularData {}

impl Hash for TabularData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tabular_type.hash(state);
        self.rows.len().hash(state);
        // Order-independent combination of the per-row hashes.
        let mut combined: u64 = 0;
        for (key, row) in &self.rows {
            let mut h = DefaultHasher::new();
            key.hash(&mut h);
            row.hash(&mut h);
            combined = combined.wrapping_add(h.finish());
        }
        combined.hash(state);
    }
}

impl fmt::Display for TabularData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows: Vec<String> = self
            .rows
            .iter()
            .map(|(k, r)| format!("{k}={r}"))
            .collect();
        rows.sort();
        write!(
            f,
            "TabularData(tabularType={},contents={{{}}})",
            self.tabular_type.type_name(),
            rows.join(", ")
        )
    }
}
