//! # Check Subcommand
//!
//! Builds every type, attribute and parameter a manifest defines and
//! reports the resolved constraints. Every definition is checked, and the
//! exit status is non-zero if any of them failed.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use omt_constraint::{
    ConstraintError, ConstraintValidator, OpenAttributeInfo, OpenParameterInfo,
    ResolvedConstraints,
};

use crate::manifest::{descriptor_of, Manifest};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON document.
    Json,
}

/// Arguments for `omt check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Manifest to check (YAML, or JSON when the extension is `.json`).
    pub manifest: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// What a report entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A named type.
    Type,
    /// An attribute.
    Attribute,
    /// An operation parameter.
    Parameter,
}

impl EntryKind {
    fn label(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Attribute => "attribute",
            Self::Parameter => "parameter",
        }
    }
}

/// Resolved constraint values, rendered as canonical text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintsView {
    /// Rendered `defaultValue`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Rendered `minValue`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<String>,
    /// Rendered `maxValue`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<String>,
    /// Rendered `legalValues`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_values: Option<Vec<String>>,
}

impl From<&ResolvedConstraints> for ConstraintsView {
    fn from(c: &ResolvedConstraints) -> Self {
        Self {
            default_value: c.default_value().map(ToString::to_string),
            min_value: c.min_value().map(ToString::to_string),
            max_value: c.max_value().map(ToString::to_string),
            legal_values: c
                .legal_values()
                .map(|values| values.iter().map(ToString::to_string).collect()),
        }
    }
}

/// Why a definition failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Error kind, e.g. `constraint_conflict`.
    pub kind: String,
    /// Full message.
    pub message: String,
}

impl From<&ConstraintError> for Failure {
    fn from(err: &ConstraintError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Result of checking one definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// What was checked.
    pub kind: EntryKind,
    /// Definition name.
    pub name: String,
    /// Resolved open type name, when the type resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_type: Option<String>,
    /// Resolved constraints, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<ConstraintsView>,
    /// Failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Failure>,
}

impl Entry {
    /// Whether the definition is valid.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn failed(kind: EntryKind, name: &str, open_type: Option<String>, error: Failure) -> Self {
        Self {
            kind,
            name: name.to_string(),
            open_type,
            constraints: None,
            error: Some(error),
        }
    }

    fn type_error(kind: EntryKind, name: &str, err: &anyhow::Error) -> Self {
        Self::failed(
            kind,
            name,
            None,
            Failure {
                kind: "malformed_type".into(),
                message: format!("{err:#}"),
            },
        )
    }
}

/// Outcome of a whole manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// One entry per definition, types first.
    pub entries: Vec<Entry>,
    /// Number of failed entries.
    pub failures: usize,
}

impl CheckReport {
    /// Whether every definition is valid.
    pub fn is_ok(&self) -> bool {
        self.failures == 0
    }
}

/// Check every definition in `manifest`.
pub fn check_manifest(manifest: &Manifest, validator: &ConstraintValidator) -> CheckReport {
    let mut entries = Vec::new();

    for name in manifest.types.keys() {
        entries.push(match manifest.resolve(name) {
            Ok(open_type) => Entry {
                kind: EntryKind::Type,
                name: name.clone(),
                open_type: Some(open_type.type_name()),
                constraints: None,
                error: None,
            },
            Err(err) => Entry::type_error(EntryKind::Type, name, &err),
        });
    }

    for def in &manifest.attributes {
        let kind = EntryKind::Attribute;
        let open_type = match manifest.resolve(&def.type_ref) {
            Ok(t) => t,
            Err(err) => {
                entries.push(Entry::type_error(kind, &def.name, &err));
                continue;
            }
        };
        let built = descriptor_of(&def.descriptor).and_then(|descriptor| {
            Ok(OpenAttributeInfo::from_descriptor(
                def.name.clone(),
                def.description.clone(),
                &open_type,
                def.access.into(),
                &descriptor,
                validator,
            )?)
        });
        entries.push(entry_for(kind, &def.name, &open_type, built.map(|i| i.constraints().clone())));
    }

    for def in &manifest.parameters {
        let kind = EntryKind::Parameter;
        let open_type = match manifest.resolve(&def.type_ref) {
            Ok(t) => t,
            Err(err) => {
                entries.push(Entry::type_error(kind, &def.name, &err));
                continue;
            }
        };
        let built = descriptor_of(&def.descriptor).and_then(|descriptor| {
            Ok(OpenParameterInfo::from_descriptor(
                def.name.clone(),
                def.description.clone(),
                &open_type,
                &descriptor,
                validator,
            )?)
        });
        entries.push(entry_for(kind, &def.name, &open_type, built.map(|i| i.constraints().clone())));
    }

    let failures = entries.iter().filter(|e| !e.is_ok()).count();
    CheckReport { entries, failures }
}

fn entry_for(
    kind: EntryKind,
    name: &str,
    open_type: &omt_core::OpenType,
    built: Result<ResolvedConstraints>,
) -> Entry {
    match built {
        Ok(constraints) => {
            tracing::debug!(kind = kind.label(), definition = name, constraints = %constraints, "definition is valid");
            Entry {
                kind,
                name: name.to_string(),
                open_type: Some(open_type.type_name()),
                constraints: Some(ConstraintsView::from(&constraints)),
                error: None,
            }
        }
        Err(err) => {
            let failure = match err.downcast_ref::<ConstraintError>() {
                Some(constraint_err) => Failure::from(constraint_err),
                None => Failure {
                    kind: "invalid_definition".into(),
                    message: format!("{err:#}"),
                },
            };
            tracing::warn!(kind = kind.label(), definition = name, error = %failure.message, "definition is invalid");
            Entry::failed(kind, name, Some(open_type.type_name()), failure)
        }
    }
}

/// Render a report as text.
pub fn render_text(report: &CheckReport) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        let open_type = entry.open_type.as_deref().unwrap_or("?");
        match &entry.error {
            None => {
                out.push_str(&format!("  {} {}: OK ({open_type})\n", entry.kind.label(), entry.name));
                if let Some(c) = &entry.constraints {
                    if let Some(v) = &c.default_value {
                        out.push_str(&format!("    defaultValue: {v}\n"));
                    }
                    if let Some(v) = &c.min_value {
                        out.push_str(&format!("    minValue:     {v}\n"));
                    }
                    if let Some(v) = &c.max_value {
                        out.push_str(&format!("    maxValue:     {v}\n"));
                    }
                    if let Some(v) = &c.legal_values {
                        out.push_str(&format!("    legalValues:  [{}]\n", v.join(", ")));
                    }
                }
            }
            Some(failure) => {
                out.push_str(&format!(
                    "  {} {}: INVALID [{}]\n    - {}\n",
                    entry.kind.label(),
                    entry.name,
                    failure.kind,
                    failure.message
                ));
            }
        }
    }
    out.push_str(&format!(
        "\n{} definitions, {} invalid\n",
        report.entries.len(),
        report.failures
    ));
    out
}

/// Execute `omt check`. Returns the process exit code.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let manifest = Manifest::load(&args.manifest)?;
    tracing::info!(
        path = %args.manifest.display(),
        types = manifest.types.len(),
        attributes = manifest.attributes.len(),
        parameters = manifest.parameters.len(),
        "checking manifest"
    );
    let report = check_manifest(&manifest, &ConstraintValidator::new());
    match args.format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(if report.is_ok() { 0 } else { 1 })
}
