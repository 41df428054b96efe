//! # omt-constraint — Constraint & Default-Value Validation
//!
//! Resolves the `defaultValue`, `minValue`, `maxValue` and `legalValues`
//! fields attached to an open-typed attribute or parameter, and exposes the
//! validated result through immutable info objects.
//!
//! ## Pipeline
//!
//! ```text
//! Descriptor ──► ConstraintDescriptor ──► Coercer ──► ConstraintValidator ──► ResolvedConstraints
//!  (raw map)       (four raw fields)     (typed)      (consistency rules)        (held by infos)
//! ```
//!
//! - [`descriptor`]: the raw field map and its projection onto the four
//!   recognized fields.
//! - [`coerce`]: raw text or native values to [`omt_core::OpenValue`]s,
//!   with an explicit per-type conversion table for non-simple types.
//! - [`validate`]: cross-field consistency rules, fail-fast.
//! - [`info`]: [`OpenParameterInfo`] and [`OpenAttributeInfo`].
//!
//! ## Crate Policy
//!
//! - Depends only on `omt-core` internally.
//! - No global state. Validation is a pure function of the open type, the
//!   raw fields and the caller-supplied conversion table.
//! - Every refusal is a [`ConstraintError`]; nothing is dropped or
//!   downgraded silently.

pub mod coerce;
pub mod descriptor;
pub mod error;
pub mod info;
pub mod raw;
pub mod validate;

pub use coerce::{Coercer, TextConversion, TextConversions, TextFn};
pub use descriptor::{
    ConstraintDescriptor, ConstraintField, Descriptor, DEFAULT_VALUE_FIELD, LEGAL_VALUES_FIELD,
    MAX_VALUE_FIELD, MIN_VALUE_FIELD, OPEN_TYPE_FIELD, ORIGINAL_TYPE_FIELD,
};
pub use error::ConstraintError;
pub use info::{AttributeAccess, OpenAttributeInfo, OpenParameterInfo};
pub use raw::RawValue;
pub use validate::{ConstraintValidator, ConstraintValues, ResolvedConstraints};
