//! Grouping of SHACL validation results by focus node.
//!
//! # Example
//!
//! ```rust
//! use shacl_report::ValidationReportGrouper;
//!
//! let report = r#"
//!     @prefix sh: <http://www.w3.org/ns/shacl#> .
//!     _:r1 a sh:ValidationResult ;
//!         sh:focusNode <http://example.org/dataset/1> ;
//!         sh:resultSeverity sh:Violation ;
//!         sh:resultPath <http://example.org/title> ;
//!         sh:resultMessage "Title is required" .
//! "#;
//!
//! let grouper = ValidationReportGrouper::parse(report.as_bytes(), "turtle")?;
//! let errors = grouper.group_errors_by_node()?;
//! assert_eq!(
//!     errors.get("http://example.org/dataset/1").unwrap(),
//!     ["[http://example.org/dataset/1]: sh:Violation: [http://example.org/title]: 'Title is required'  ()"]
//! );
//! # Ok::<(), shacl_report::ReportError>(())
//! ```

use crate::error::{ParseFailure, ReportError, Result};
use crate::report::graph::ValidationGraph;
use crate::report::namespaces::NamespaceTable;
use crate::report::result::ResultFields;
use crate::report::vocab::{
    CORE_PREFIXES, ResultField, SH_CONFORMS, SH_NS, SH_PREFIX, SH_VALIDATION_REPORT,
    SH_VALIDATION_RESULT, Severity,
};
use indexmap::IndexMap;
use oxigraph::model::Term;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

// =============================================================================
// Grouped Errors
// =============================================================================

/// Diagnostic lines keyed by focus node, in the order results were encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedErrors {
    #[serde(flatten)]
    groups: IndexMap<String, Vec<String>>,
    #[serde(skip)]
    processed: usize,
}

impl GroupedErrors {
    fn push(&mut self, node: String, line: String) {
        self.groups.entry(node).or_default().push(line);
        self.processed += 1;
    }

    pub fn get(&self, node: &str) -> Option<&[String]> {
        self.groups.get(node).map(Vec::as_slice)
    }

    /// Number of validation results that produced a line.
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Number of distinct focus-node groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(node, lines)| (node.as_str(), lines.as_slice()))
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.groups
    }
}

// =============================================================================
// Report Summary
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// The report's own `sh:conforms` flag, when it declares one.
    pub conforms: Option<bool>,
    pub results: usize,
    pub violations: usize,
    pub warnings: usize,
    pub infos: usize,
    /// Results with a missing or non-standard severity.
    pub unclassified: usize,
}

// =============================================================================
// Grouper
// =============================================================================

/// Reads one validation report and groups its results by focus node.
#[derive(Debug, Clone)]
pub struct ValidationReportGrouper {
    graph: ValidationGraph,
    explicit_prefixes: Vec<(String, String)>,
    document_prefixes: bool,
}

impl ValidationReportGrouper {
    /// Parses a serialized report and binds the prefixes used for compact names:
    /// the core `xml`/`rdf`/`rdfs`/`xsd` bindings, the document's own `@prefix`
    /// declarations, then `sh`.
    pub fn parse<R: Read>(reader: R, format: &str) -> Result<Self> {
        let graph = ValidationGraph::parse(reader, format)?;
        tracing::debug!(statements = graph.len(), format, "SHACL result graph parsed");
        let mut grouper = Self {
            graph,
            explicit_prefixes: Vec::new(),
            document_prefixes: true,
        };
        grouper.rebind_namespaces();
        Ok(grouper)
    }

    /// Reads and parses a report file. An unreadable file is a parse failure.
    pub fn from_path<P: AsRef<Path>>(path: P, format: &str) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            ReportError::parse(
                format,
                ParseFailure::Io(std::io::Error::new(
                    e.kind(),
                    format!("{}: {e}", path.display()),
                )),
            )
        })?;
        Self::parse(bytes.as_slice(), format)
    }

    /// Registers an extra prefix binding on this instance only.
    ///
    /// Explicit bindings take precedence over core and document bindings.
    pub fn with_prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.explicit_prefixes.retain(|(existing, _)| existing != prefix);
        self.explicit_prefixes
            .push((prefix.to_string(), namespace.to_string()));
        self.rebind_namespaces();
        self
    }

    /// Ignores the `@prefix` declarations of the parsed document.
    pub fn without_document_prefixes(mut self) -> Self {
        self.document_prefixes = false;
        self.rebind_namespaces();
        self
    }

    /// Later bindings win, so the order is core, document, `sh`, explicit.
    fn rebind_namespaces(&mut self) {
        let mut table = NamespaceTable::new();
        for (prefix, namespace) in CORE_PREFIXES {
            table.bind(*prefix, *namespace);
        }
        if self.document_prefixes {
            for (prefix, namespace) in self.graph.document_prefixes() {
                table.bind(prefix.as_str(), namespace.as_str());
            }
        }
        table.bind(SH_PREFIX, SH_NS);
        for (prefix, namespace) in &self.explicit_prefixes {
            table.bind(prefix.as_str(), namespace.as_str());
        }
        *self.graph.namespaces_mut() = table;
    }

    pub fn graph(&self) -> &ValidationGraph {
        &self.graph
    }

    fn results(&self) -> Vec<&Term> {
        self.graph.subjects_of_type(SH_VALIDATION_RESULT)
    }

    /// Formats every validation result and groups the lines by focus node.
    ///
    /// Results without a named focus node are grouped under `"catalog"`. A
    /// field that cannot be rendered aborts the whole pass.
    pub fn group_errors_by_node(&self) -> Result<GroupedErrors> {
        let mut grouped = GroupedErrors::default();
        for result in self.results() {
            let fields = ResultFields::extract(&self.graph, result);
            let line = fields.format_line(result).inspect_err(|e| {
                tracing::error!(error = %e, "SHACL error for parsing results");
            })?;
            grouped.push(fields.node, line);
        }
        tracing::debug!(
            processed = grouped.processed(),
            groups = grouped.len(),
            "SHACL results processed and grouped"
        );
        Ok(grouped)
    }

    /// Tallies results by severity and reads the report's `sh:conforms` flag.
    pub fn summarize(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            conforms: self.conforms(),
            ..ReportSummary::default()
        };
        for result in self.results() {
            summary.results += 1;
            let severity = match self.graph.value(result, ResultField::Severity.predicate()) {
                Some(Term::NamedNode(iri)) => Severity::from_iri(iri.as_str()),
                _ => None,
            };
            match severity {
                Some(Severity::Violation) => summary.violations += 1,
                Some(Severity::Warning) => summary.warnings += 1,
                Some(Severity::Info) => summary.infos += 1,
                None => summary.unclassified += 1,
            }
        }
        summary
    }

    fn conforms(&self) -> Option<bool> {
        self.graph
            .subjects_of_type(SH_VALIDATION_REPORT)
            .into_iter()
            .find_map(|report| match self.graph.value(report, SH_CONFORMS)? {
                Term::Literal(lit) => match lit.value() {
                    "true" | "1" => Some(true),
                    "false" | "0" => Some(false),
                    _ => None,
                },
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_NODES: &str = r#"
        @prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix dcat: <http://www.w3.org/ns/dcat#> .

        [] a sh:ValidationReport ;
            sh:conforms false ;
            sh:result _:r1, _:r2, _:r3 .

        _:r1 a sh:ValidationResult ;
            sh:focusNode <http://example.org/dataset/1> ;
            sh:resultSeverity sh:Violation ;
            sh:resultPath dcat:keyword ;
            sh:resultMessage "Keyword missing" .

        _:r2 a sh:ValidationResult ;
            sh:focusNode <http://example.org/dataset/2> ;
            sh:resultSeverity sh:Warning ;
            sh:resultMessage "Check landing page" .

        _:r3 a sh:ValidationResult ;
            sh:focusNode <http://example.org/dataset/1> ;
            sh:resultSeverity sh:Info ;
            sh:resultMessage "Consider a description" .
    "#;

    #[test]
    fn test_groups_keep_encounter_order() {
        let grouper = ValidationReportGrouper::parse(TWO_NODES.as_bytes(), "turtle").unwrap();
        let errors = grouper.group_errors_by_node().unwrap();

        assert_eq!(errors.processed(), 3);
        assert_eq!(
            errors.keys().collect::<Vec<_>>(),
            ["http://example.org/dataset/1", "http://example.org/dataset/2"]
        );
        let first = errors.get("http://example.org/dataset/1").unwrap();
        assert_eq!(first.len(), 2);
        assert!(first[0].contains("'Keyword missing'"));
        assert!(first[1].contains("'Consider a description'"));
    }

    #[test]
    fn test_document_prefixes_bound_by_default() {
        let errors = ValidationReportGrouper::parse(TWO_NODES.as_bytes(), "turtle")
            .unwrap()
            .group_errors_by_node()
            .unwrap();
        let line = &errors.get("http://example.org/dataset/1").unwrap()[0];
        assert!(line.contains("[dcat:keyword]"), "{line}");

        let plain = ValidationReportGrouper::parse(TWO_NODES.as_bytes(), "turtle")
            .unwrap()
            .without_document_prefixes()
            .group_errors_by_node()
            .unwrap();
        let line = &plain.get("http://example.org/dataset/1").unwrap()[0];
        assert!(line.contains("[http://www.w3.org/ns/dcat#keyword]"), "{line}");
        assert!(line.contains(": sh:Violation: "), "{line}");
    }

    #[test]
    fn test_core_prefixes_bound_without_declarations() {
        let ttl = r#"
            _:r a <http://www.w3.org/ns/shacl#ValidationResult> ;
                <http://www.w3.org/ns/shacl#value> <http://www.w3.org/2001/XMLSchema#string> ;
                <http://www.w3.org/ns/shacl#resultPath> <http://www.w3.org/2000/01/rdf-schema#label> .
        "#;
        let errors = ValidationReportGrouper::parse(ttl.as_bytes(), "turtle")
            .unwrap()
            .group_errors_by_node()
            .unwrap();
        assert_eq!(
            errors.get("catalog").unwrap(),
            ["[catalog]: : [rdfs:label]: '' , Value: [xsd:string] ()"]
        );
    }

    #[test]
    fn test_explicit_prefix_wins_over_document_prefix() {
        let grouper = ValidationReportGrouper::parse(TWO_NODES.as_bytes(), "turtle")
            .unwrap()
            .with_prefix("dcat", "http://example.org/elsewhere#")
            .with_prefix("kw", "http://www.w3.org/ns/dcat#");
        let namespaces = grouper.graph().namespaces();
        assert_eq!(namespaces.namespace("dcat"), Some("http://example.org/elsewhere#"));
        assert_eq!(namespaces.namespace("sh"), Some("http://www.w3.org/ns/shacl#"));

        let errors = grouper.group_errors_by_node().unwrap();
        let line = &errors.get("http://example.org/dataset/1").unwrap()[0];
        assert!(line.contains("[kw:keyword]"), "{line}");
    }

    #[test]
    fn test_document_cannot_rebind_sh() {
        let ttl = r#"
            @prefix sh: <http://example.org/not-shacl#> .
            @prefix shacl: <http://www.w3.org/ns/shacl#> .
            _:r a shacl:ValidationResult ; shacl:resultSeverity shacl:Violation .
        "#;
        let errors = ValidationReportGrouper::parse(ttl.as_bytes(), "turtle")
            .unwrap()
            .group_errors_by_node()
            .unwrap();
        assert_eq!(errors.get("catalog").unwrap(), ["[catalog]: sh:Violation: []: ''  ()"]);
    }

    #[test]
    fn test_summary_counts_severities() {
        let grouper = ValidationReportGrouper::parse(TWO_NODES.as_bytes(), "turtle").unwrap();
        let summary = grouper.summarize();
        assert_eq!(
            summary,
            ReportSummary {
                conforms: Some(false),
                results: 3,
                violations: 1,
                warnings: 1,
                infos: 1,
                unclassified: 0,
            }
        );
    }

    #[test]
    fn test_summary_without_report_node() {
        let ttl = "@prefix sh: <http://www.w3.org/ns/shacl#> . _:r a sh:ValidationResult .";
        let summary = ValidationReportGrouper::parse(ttl.as_bytes(), "turtle")
            .unwrap()
            .summarize();
        assert_eq!(summary.conforms, None);
        assert_eq!(summary.unclassified, 1);
    }

    #[test]
    fn test_grouped_errors_serialize_as_plain_mapping() {
        let grouper = ValidationReportGrouper::parse(TWO_NODES.as_bytes(), "turtle").unwrap();
        let json = serde_json::to_value(grouper.group_errors_by_node().unwrap()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["http://example.org/dataset/2"].as_array().unwrap().len(), 1);
    }
}
