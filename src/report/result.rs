//! Field extraction and line formatting for a single validation result.

use crate::error::{ReportError, Result};
use crate::report::graph::ValidationGraph;
use crate::report::namespaces::NamespaceTable;
use crate::report::vocab::{CATALOG_KEY, ResultField, SH_FOCUS_NODE};
use oxigraph::model::Term;
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// A field value as found in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Literal(String),
    Reference(String),
}

impl FieldValue {
    /// Reads a term as a field value. Blank nodes and empty literals count as absent.
    pub fn from_term(term: &Term) -> Option<Self> {
        match term {
            Term::Literal(lit) if !lit.value().is_empty() => {
                Some(FieldValue::Literal(lit.value().to_string()))
            }
            Term::NamedNode(node) => Some(FieldValue::Reference(node.as_str().to_string())),
            _ => None,
        }
    }

    pub fn render(&self, namespaces: &NamespaceTable) -> String {
        match self {
            FieldValue::Literal(text) => text.clone(),
            FieldValue::Reference(iri) => namespaces.compact(iri),
        }
    }
}

/// The rendered fields and focus key of one `sh:ValidationResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFields {
    pub node: String,
    fields: HashMap<ResultField, String>,
}

impl ResultFields {
    pub fn extract(graph: &ValidationGraph, result: &Term) -> Self {
        let fields = ResultField::iter()
            .filter_map(|field| {
                let value = graph
                    .value(result, field.predicate())
                    .and_then(FieldValue::from_term)?;
                Some((field, value.render(graph.namespaces())))
            })
            .collect();

        let node = match graph.value(result, SH_FOCUS_NODE) {
            Some(Term::NamedNode(node)) => node.as_str().to_string(),
            _ => CATALOG_KEY.to_string(),
        };

        Self { node, fields }
    }

    pub fn get(&self, field: ResultField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    fn segment(&self, field: ResultField) -> &str {
        self.get(field).unwrap_or("")
    }

    /// Formats the diagnostic line:
    /// `[<node>]: <severity>: [<path>]: '<message>' <value-suffix> (<constraint>)`.
    ///
    /// `result` names the result node in the error when a field holds text that
    /// cannot be rendered.
    pub fn format_line(&self, result: &Term) -> Result<String> {
        check_renderable("focus node", &self.node, result)?;
        for field in ResultField::iter().filter(|f| *f != ResultField::Detail) {
            if let Some(text) = self.get(field) {
                check_renderable(field.into(), text, result)?;
            }
        }

        let value_suffix = match self.get(ResultField::Value) {
            Some(value) => format!(", Value: [{value}]"),
            None => String::new(),
        };

        Ok(format!(
            "[{}]: {}: [{}]: '{}' {} ({})",
            self.node,
            self.segment(ResultField::Severity),
            self.segment(ResultField::Path),
            self.segment(ResultField::Message),
            value_suffix,
            self.segment(ResultField::Constraint),
        ))
    }
}

/// Control characters other than tab, line feed and carriage return cannot be
/// placed in a diagnostic line.
fn check_renderable(field: &'static str, text: &str, result: &Term) -> Result<()> {
    match text
        .chars()
        .find(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
    {
        Some(c) => Err(ReportError::Encoding {
            field,
            result: result.to_string(),
            reason: format!("control character U+{:04X}", c as u32),
        }),
        None => Ok(()),
    }
}
