//! # Tabular Types — Keyed Row Collections
//!
//! A `TabularType` pairs a row `CompositeType` with an ordered list of index
//! item names. The values of the index items form the key that must be unique
//! across the rows of a table.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::composite::CompositeType;
use crate::error::OpenDataError;
use crate::open_type::OpenType;

/// A keyed collection type of composite rows.
#[derive(Debug, Clone)]
pub struct TabularType {
    type_name: String,
    description: String,
    row_type: Arc<CompositeType>,
    index_names: Vec<String>,
}

impl TabularType {
    /// Define a tabular type.
    ///
    /// # Errors
    ///
    /// Returns `MalformedType` if the type name or description is blank, if
    /// the index list is empty, if an index name is not an item of the row
    /// type, or if an index name repeats.
    pub fn new(
        type_name: impl Into<String>,
        description: impl Into<String>,
        row_type: impl Into<Arc<CompositeType>>,
        index_names: Vec<String>,
    ) -> Result<Self, OpenDataError> {
        let type_name = type_name.into();
        let description = description.into();
        let row_type = row_type.into();
        let malformed = |reason: String| OpenDataError::malformed(type_name.clone(), reason);

        if type_name.trim().is_empty() {
            return Err(malformed("type name must not be blank".into()));
        }
        if description.trim().is_empty() {
            return Err(malformed("description must not be blank".into()));
        }
        if index_names.is_empty() {
            return Err(malformed("at least one index name is required".into()));
        }
        for (i, name) in index_names.iter().enumerate() {
            if !row_type.contains_key(name) {
                return Err(malformed(format!(
                    "index name {name:?} is not an item of row type {}",
                    row_type.type_name()
                )));
            }
            if index_names[..i].contains(name) {
                return Err(malformed(format!("duplicate index name {name:?}")));
            }
        }

        Ok(Self {
            type_name,
            description,
            row_type,
            index_names,
        })
    }

    /// The type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The type description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The composite type every row conforms to.
    pub fn row_type(&self) -> &Arc<CompositeType> {
        &self.row_type
    }

    /// Index item names, in key order.
    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }

    /// Open types of the index items, in key order.
    pub fn index_types(&self) -> impl Iterator<Item = &OpenType> {
        self.index_names
            .iter()
            .filter_map(|n| self.row_type.item_type(n))
    }

    /// Same type name, identical index names, and an assignable row type.
    pub fn is_assignable_from(&self, other: &TabularType) -> bool {
        self.type_name == other.type_name
            && self.index_names == other.index_names
            && self.row_type.is_assignable_from(&other.row_type)
    }
}

impl PartialEq for TabularType {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.row_type == other.row_type
            && self.index_names == other.index_names
    }
}

impl Eq for TabularType {}

impl Hash for TabularType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.row_type.hash(state);
        self.index_names.hash(state);
    }
}

impl fmt::Display for TabularType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TabularType(name={},rowType={},indexNames=({}))",
            self.type_name,
            self.row_type,
            self.index_names.join(",")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::ItemDef;
    use crate::simple::SimpleType;

    fn row() -> Arc<CompositeType> {
        Arc::new(
            CompositeType::new(
                "Point",
                "A point",
                vec![
                    ItemDef::new("x", "x", SimpleType::Integer),
                    ItemDef::new("y", "y", SimpleType::Integer),
                ],
            )
            .unwrap(),
        )
    }

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_index_names_must_exist_in_row() {
        let err = TabularType::new("Points", "points", row(), names(&["z"])).unwrap_err();
        assert!(matches!(err, OpenDataError::MalformedType { .. }));
    }

    #[test]
    fn test_index_names_must_be_nonempty_and_unique() {
        assert!(TabularType::new("Points", "points", row(), vec![]).is_err());
        assert!(TabularType::new("Points", "points", row(), names(&["x", "x"])).is_err());
    }

    #[test]
    fn test_equality_is_index_order_sensitive() {
        let xy = TabularType::new("Points", "points", row(), names(&["x", "y"])).unwrap();
        let yx = TabularType::new("Points", "points", row(), names(&["y", "x"])).unwrap();
        let xy2 = TabularType::new("Points", "other words", row(), names(&["x", "y"])).unwrap();
        assert_ne!(xy, yx);
        assert_eq!(xy, xy2);
    }

    #[test]
    fn test_index_types_follow_key_order() {
        let t = TabularType::new("Points", "points", row(), names(&["y"])).unwrap();
        let types: Vec<_> = t.index_types().collect();
        assert_eq!(types, vec![&OpenType::Simple(SimpleType::Integer)]);
    }
}
