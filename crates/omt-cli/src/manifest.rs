//! # Manifest Loading
//!
//! A manifest names composite and tabular types and lists attribute and
//! parameter definitions whose descriptors carry raw constraint fields:
//!
//! ```yaml
//! types:
//!   Point:
//!     kind: composite
//!     description: a point on the grid
//!     items:
//!       - { name: x, description: column, type: integer }
//!       - { name: y, description: row, type: integer }
//!   Points:
//!     kind: tabular
//!     description: points by column
//!     row: Point
//!     index: [x]
//! attributes:
//!   - name: Timeout
//!     description: request timeout in ms
//!     type: integer
//!     access: read_write
//!     descriptor: { minValue: 0, maxValue: 60000, defaultValue: 5000 }
//! parameters:
//!   - name: mode
//!     description: operating mode
//!     type: string
//!     descriptor: { legalValues: [fast, slow], defaultValue: fast }
//! ```
//!
//! Type references are a simple type (`integer` or `java.lang.Integer`), a
//! name from `types`, or either followed by `[]` per array dimension.
//! Primitive names (`int[]`, `long[][]`) give primitive arrays, so an array
//! of boxed longs is written with the class name (`java.lang.Long[]`).

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use omt_constraint::{AttributeAccess, Descriptor};
use omt_core::{ArrayType, CompositeType, ItemDef, OpenType, SimpleType, TabularType};

/// Top-level manifest document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Named composite and tabular types.
    #[serde(default)]
    pub types: BTreeMap<String, TypeDefinition>,
    /// Attribute definitions.
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    /// Operation parameter definitions.
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
}

/// A named type definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum TypeDefinition {
    /// A fixed-shape record.
    Composite {
        /// Human-readable description.
        description: String,
        /// Items in declaration order.
        items: Vec<ItemDefinition>,
    },
    /// Rows of a composite type keyed by some of its items.
    Tabular {
        /// Human-readable description.
        description: String,
        /// Reference to the row's composite type.
        row: String,
        /// Index item names, in order.
        index: Vec<String>,
    },
}

/// One composite item.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemDefinition {
    /// Item name.
    pub name: String,
    /// Item description.
    pub description: String,
    /// Item type reference.
    #[serde(rename = "type")]
    pub type_ref: String,
}

/// Attribute access, as written in manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// Readable only.
    #[default]
    ReadOnly,
    /// Readable and writable.
    ReadWrite,
    /// Writable only.
    WriteOnly,
    /// Readable through an `is` getter.
    Getter,
}

impl From<Access> for AttributeAccess {
    fn from(access: Access) -> Self {
        match access {
            Access::ReadOnly => AttributeAccess::read_only(),
            Access::ReadWrite => AttributeAccess::read_write(),
            Access::WriteOnly => AttributeAccess::write_only(),
            Access::Getter => AttributeAccess::getter(),
        }
    }
}

/// An attribute definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeDefinition {
    /// Attribute name.
    pub name: String,
    /// Attribute description.
    pub description: String,
    /// Type reference.
    #[serde(rename = "type")]
    pub type_ref: String,
    /// Access flags.
    #[serde(default)]
    pub access: Access,
    /// Free-form descriptor fields.
    #[serde(default)]
    pub descriptor: serde_json::Map<String, serde_json::Value>,
}

/// An operation parameter definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDefinition {
    /// Parameter name.
    pub name: String,
    /// Parameter description.
    pub description: String,
    /// Type reference.
    #[serde(rename = "type")]
    pub type_ref: String,
    /// Free-form descriptor fields.
    #[serde(default)]
    pub descriptor: serde_json::Map<String, serde_json::Value>,
}

/// Convert a definition's free-form fields into a [`Descriptor`].
pub fn descriptor_of(fields: &serde_json::Map<String, serde_json::Value>) -> Result<Descriptor> {
    Ok(Descriptor::from_json(fields.clone())?)
}

impl Manifest {
    /// Load a manifest. Files ending in `.json` are read as JSON, everything
    /// else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest: {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("parsing manifest JSON: {}", path.display()))
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("parsing manifest YAML: {}", path.display()))
        }
    }

    /// Resolve a type reference against the simple types and the named types.
    pub fn resolve(&self, type_ref: &str) -> Result<OpenType> {
        Resolver {
            manifest: self,
            stack: BTreeSet::new(),
        }
        .resolve(type_ref)
    }
}

struct Resolver<'a> {
    manifest: &'a Manifest,
    stack: BTreeSet<String>,
}

impl Resolver<'_> {
    fn resolve(&mut self, type_ref: &str) -> Result<OpenType> {
        let type_ref = type_ref.trim();
        let base = type_ref.trim_end_matches("[]");
        let dimension = (type_ref.len() - base.len()) / 2;
        if base.is_empty() {
            bail!("empty type reference");
        }
        if dimension == 0 {
            return self.resolve_base(base);
        }
        if let Some(primitive) = primitive_kind(base) {
            let array = ArrayType::primitive(primitive)?;
            return if dimension == 1 {
                Ok(array.into())
            } else {
                Ok(ArrayType::new(dimension - 1, array)?.into())
            };
        }
        let element = self.resolve_base(base)?;
        Ok(ArrayType::new(dimension, element)?.into())
    }

    fn resolve_base(&mut self, name: &str) -> Result<OpenType> {
        if let Ok(simple) = name.parse::<SimpleType>() {
            return Ok(simple.into());
        }
        let definition = self
            .manifest
            .types
            .get(name)
            .ok_or_else(|| anyhow!("unknown type '{name}'"))?;
        if !self.stack.insert(name.to_string()) {
            bail!("type '{name}' refers to itself");
        }
        let resolved = self.define(name, definition);
        self.stack.remove(name);
        resolved
    }

    fn define(&mut self, name: &str, definition: &TypeDefinition) -> Result<OpenType> {
        match definition {
            TypeDefinition::Composite { description, items } => {
                let mut defs = Vec::with_capacity(items.len());
                for item in items {
                    let open_type = self
                        .resolve(&item.type_ref)
                        .with_context(|| format!("item '{}' of '{name}'", item.name))?;
                    defs.push(ItemDef::new(item.name.clone(), item.description.clone(), open_type));
                }
                Ok(CompositeType::new(name, description.clone(), defs)?.into())
            }
            TypeDefinition::Tabular {
                description,
                row,
                index,
            } => {
                let row_type = match self.resolve(row)? {
                    OpenType::Composite(composite) => composite,
                    other => bail!(
                        "row type of '{name}' must be a composite type, not {}",
                        other.type_name()
                    ),
                };
                let tabular: TabularType =
                    TabularType::new(name, description.clone(), Arc::clone(&row_type), index.clone())?;
                Ok(tabular.into())
            }
        }
    }
}

fn primitive_kind(name: &str) -> Option<SimpleType> {
    SimpleType::all()
        .iter()
        .copied()
        .find(|kind| kind.primitive_name() == Some(name))
}
