//! # omt-core — Open Types for Management Data
//!
//! This crate defines the small, closed vocabulary of structural type
//! descriptors that lets remote, non-native management clients introspect and
//! validate attributes and operation parameters without sharing
//! application-specific classes. Every other crate in the workspace depends on
//! `omt-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Tagged union, not a class hierarchy.** [`OpenType`] is an enum over
//!    simple, array, composite and tabular descriptors. Every `match` on it is
//!    exhaustive; adding a variant is a compile-time obligation everywhere.
//!
//! 2. **Structural identity.** Open types are equal when they are structurally
//!    identical. Composite item sets compare order-independently, tabular
//!    index lists order-sensitively. `Hash` agrees with equality so types can
//!    key caches.
//!
//! 3. **Checked at construction.** [`CompositeType`], [`TabularType`],
//!    [`ArrayType`], [`CompositeData`], [`TabularData`] and [`ArrayValue`]
//!    validate their shape in their constructors. A value that exists is well
//!    formed.
//!
//! 4. **One parser per simple kind.** [`SimpleType::parser`] is the single
//!    canonical text parser for each kind, and `Display` on [`OpenValue`]
//!    renders the canonical text it accepts.
//!
//! 5. **Immutable and shareable.** Types hold their payloads behind `Arc`;
//!    there is no global or interior-mutable state.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `omt-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - No logging; callers decide what to report.

pub mod composite;
pub mod composite_data;
pub mod decimal;
pub mod error;
pub mod object_name;
pub mod open_type;
pub mod simple;
pub mod tabular;
pub mod tabular_data;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use composite::{CompositeType, ItemDef};
pub use composite_data::CompositeData;
pub use decimal::Decimal;
pub use error::{ConversionError, OpenDataError};
pub use object_name::ObjectName;
pub use open_type::{ArrayType, OpenType, COMPOSITE_DATA_CLASS, TABULAR_DATA_CLASS};
pub use simple::{SimpleType, TextParser, SIMPLE_TYPE_COUNT};
pub use tabular::TabularType;
pub use tabular_data::{IndexKey, TabularData};
pub use value::{ArrayValue, OpenValue};

pub use num_bigint::BigInt;
