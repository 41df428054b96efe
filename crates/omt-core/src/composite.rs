//! # Composite Types — Fixed-Shape Records
//!
//! A `CompositeType` maps unique, case-sensitive item names to an item open
//! type and an item description. Declaration order is kept for iteration,
//! but equality and hashing treat the items as a set.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::OpenDataError;
use crate::open_type::OpenType;

/// One item of a composite type.
#[derive(Debug, Clone)]
pub struct ItemDef {
    /// Item name, unique within the composite type.
    pub name: String,
    /// Human-readable description of the item.
    pub description: String,
    /// Open type of the item's values.
    pub open_type: OpenType,
}

impl ItemDef {
    /// Convenience constructor.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        open_type: impl Into<OpenType>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            open_type: open_type.into(),
        }
    }
}

/// A fixed-shape record type.
#[derive(Debug, Clone)]
pub struct CompositeType {
    type_name: String,
    description: String,
    items: Vec<ItemDef>,
    /// Item name → position in `items`.
    positions: BTreeMap<String, usize>,
}

impl CompositeType {
    /// Define a composite type.
    ///
    /// # Errors
    ///
    /// Returns `MalformedType` if the type name or description is blank, if
    /// there are no items, if an item name or description is blank, or if an
    /// item name repeats.
    pub fn new(
        type_name: impl Into<String>,
        description: impl Into<String>,
        items: Vec<ItemDef>,
    ) -> Result<Self, OpenDataError> {
        let type_name = type_name.into();
        let description = description.into();
        let malformed = |reason: String| OpenDataError::malformed(type_name.clone(), reason);

        if type_name.trim().is_empty() {
            return Err(malformed("type name must not be blank".into()));
        }
        if description.trim().is_empty() {
            return Err(malformed("description must not be blank".into()));
        }
        if items.is_empty() {
            return Err(malformed("a composite type needs at least one item".into()));
        }

        let mut positions = BTreeMap::new();
        for (i, item) in items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(malformed(format!("item #{i} has a blank name")));
            }
            if item.description.trim().is_empty() {
                return Err(malformed(format!("item {:?} has a blank description", item.name)));
            }
            if positions.insert(item.name.clone(), i).is_some() {
                return Err(malformed(format!("duplicate item name {:?}", item.name)));
            }
        }

        Ok(Self {
            type_name,
            description,
            items,
            positions,
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

    /// Items in declaration order.
    pub fn items(&self) -> &[ItemDef] {
        &self.items
    }

    /// Item names in declaration order.
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.name.as_str())
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: a composite type has at least one item.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an item with this exact name is declared.
    pub fn contains_key(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Look up an item definition.
    pub fn item(&self, name: &str) -> Option<&ItemDef> {
        self.positions.get(name).map(|&i| &self.items[i])
    }

    /// Open type of the named item.
    pub fn item_type(&self, name: &str) -> Option<&OpenType> {
        self.item(name).map(|i| &i.open_type)
    }

    /// Description of the named item.
    pub fn item_description(&self, name: &str) -> Option<&str> {
        self.item(name).map(|i| i.description.as_str())
    }

    /// Same type name, and every item of `self` is present in `other` with an
    /// assignable type. `other` may declare extra items.
    pub fn is_assignable_from(&self, other: &CompositeType) -> bool {
        self.type_name == other.type_name
            && self.items.iter().all(|item| {
                other
                    .item_type(&item.name)
                    .is_some_and(|t| item.open_type.is_assignable_from(t))
            })
    }
}

impl PartialEq for CompositeType {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .all(|item| other.item_type(&item.name) == Some(&item.open_type))
    }
}

impl Eq for CompositeType {}

impl Hash for CompositeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        // `positions` iterates in name order, which makes the hash independent
        // of declaration order.
        for (name, &i) in &self.positions {
            name.hash(state);
            self.items[i].open_type.hash(state);
        }
    }
}

impl fmt::Display for CompositeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeType(name={},items=(", self.type_name)?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "(itemName={},itemType={})", item.name, item.open_type)?;
        }
        f.write_str("))")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simple::SimpleType;

    fn point(order: &[&str]) -> CompositeType {
        let items = order
            .iter()
            .map(|n| ItemDef::new(*n, format!("{n} coordinate"), SimpleType::Integer))
            .collect();
        CompositeType::new("Point", "A point", items).unwrap()
    }

    #[test]
    fn test_declaration_order_kept() {
        let p = point(&["y", "x"]);
        assert_eq!(p.item_names().collect::<Vec<_>>(), vec!["y", "x"]);
    }

    #[test]
    fn test_equality_ignores_item_order() {
        assert_eq!(point(&["x", "y"]), point(&["y", "x"]));
    }

    #[test]
    fn test_equality_ignores_descriptions() {
        let a = point(&["x"]);
        let b = CompositeType::new(
            "Point",
            "Another description",
            vec![ItemDef::new("x", "abscissa", SimpleType::Integer)],
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_respects_names_and_types() {
        assert_ne!(point(&["x", "y"]), point(&["x", "z"]));
        let other_type = CompositeType::new(
            "Point",
            "A point",
            vec![
                ItemDef::new("x", "x", SimpleType::Long),
                ItemDef::new("y", "y", SimpleType::Integer),
            ],
        )
        .unwrap();
        assert_ne!(point(&["x", "y"]), other_type);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let p = point(&["x", "X"]);
        assert!(p.contains_key("x"));
        assert!(p.contains_key("X"));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let err = CompositeType::new(
            "Point",
            "A point",
            vec![
                ItemDef::new("x", "x", SimpleType::Integer),
                ItemDef::new("x", "again", SimpleType::Long),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, OpenDataError::MalformedType { .. }));
    }

    #[test]
    fn test_blank_fields_rejected() {
        let item = || vec![ItemDef::new("x", "x", SimpleType::Integer)];
        assert!(CompositeType::new(" ", "d", item()).is_err());
        assert!(CompositeType::new("T", "", item()).is_err());
        assert!(CompositeType::new("T", "d", vec![]).is_err());
        assert!(CompositeType::new("T", "d", vec![ItemDef::new("", "x", SimpleType::Integer)]).is_err());
        assert!(CompositeType::new("T", "d", vec![ItemDef::new("x", " ", SimpleType::Integer)]).is_err());
    }

    #[test]
    fn test_assignable_from_wider_type() {
        let narrow = point(&["x", "y"]);
        let wide = point(&["x", "y", "z"]);
        assert!(narrow.is_assignable_from(&wide));
        assert!(!wide.is_assignable_from(&narrow));
        assert!(narrow.is_assignable_from(&narrow));
    }

    #[test]
    fn test_hash_ignores_item_order() {
        use std::collections::hash_map::DefaultHasher;
        let hash = |c: &CompositeType| {
            let mut h = DefaultHasher::new();
            c.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&point(&["x", "y"])), hash(&point(&["y", "x"])));
    }
}
