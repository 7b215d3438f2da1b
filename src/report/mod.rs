//! SHACL validation-report reading
//!
//! - **graph** - parse a serialized report into an ordered statement list
//! - **namespaces** - per-graph prefix bindings for compact names
//! - **result** - field extraction and line formatting for one result
//! - **grouper** - group formatted lines by focus node, summarize severities
//! - **vocab** - SHACL IRIs and the fixed result-field table

pub mod graph;
pub mod grouper;
pub mod namespaces;
pub mod result;
pub mod vocab;

pub use graph::{Statement, ValidationGraph, resolve_format};
pub use grouper::{GroupedErrors, ReportSummary, ValidationReportGrouper};
pub use namespaces::NamespaceTable;
pub use result::{FieldValue, ResultFields};
pub use vocab::{CATALOG_KEY, ResultField, Severity};
