//! SHACL vocabulary used when reading validation reports.

use strum::{Display, EnumIter, IntoStaticStr};

// =============================================================================
// Namespace Constants
// =============================================================================

pub const SH_PREFIX: &str = "sh";
pub const SH_NS: &str = "http://www.w3.org/ns/shacl#";
/// Bindings every report gets before its own `@prefix` declarations.
pub const CORE_PREFIXES: &[(&str, &str)] = &[
    ("xml", "http://www.w3.org/XML/1998/namespace"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub const SH_VALIDATION_REPORT: &str = "http://www.w3.org/ns/shacl#ValidationReport";
pub const SH_VALIDATION_RESULT: &str = "http://www.w3.org/ns/shacl#ValidationResult";
pub const SH_CONFORMS: &str = "http://www.w3.org/ns/shacl#conforms";
pub const SH_FOCUS_NODE: &str = "http://www.w3.org/ns/shacl#focusNode";

/// Group key for results whose focus node is not a named resource.
pub const CATALOG_KEY: &str = "catalog";

// =============================================================================
// Result Fields
// =============================================================================

/// The optional attributes read from every `sh:ValidationResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ResultField {
    Message,
    Value,
    Path,
    Detail,
    Severity,
    Constraint,
}

impl ResultField {
    /// Predicate IRI carrying this field.
    pub fn predicate(&self) -> &'static str {
        match self {
            ResultField::Message => "http://www.w3.org/ns/shacl#resultMessage",
            ResultField::Value => "http://www.w3.org/ns/shacl#value",
            ResultField::Path => "http://www.w3.org/ns/shacl#resultPath",
            ResultField::Detail => "http://www.w3.org/ns/shacl#resultDetail",
            ResultField::Severity => "http://www.w3.org/ns/shacl#resultSeverity",
            ResultField::Constraint => "http://www.w3.org/ns/shacl#sourceConstraintComponent",
        }
    }
}

// =============================================================================
// Severity Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Severity {
    Info,
    Warning,
    Violation,
}

impl Severity {
    /// Recognizes the three SHACL severity IRIs. Custom severities yield `None`.
    pub fn from_iri(iri: &str) -> Option<Self> {
        match iri {
            "http://www.w3.org/ns/shacl#Info" => Some(Severity::Info),
            "http://www.w3.org/ns/shacl#Warning" => Some(Severity::Warning),
            "http://www.w3.org/ns/shacl#Violation" => Some(Severity::Violation),
            _ => None,
        }
    }
}
