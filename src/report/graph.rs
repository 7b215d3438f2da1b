//! In-memory graph of a parsed validation report.
//!
//! Statements are kept in parse order so that results can be enumerated in the
//! order they were encountered in the document. Named graphs in quad formats
//! are merged into one statement list.

use crate::error::{ParseFailure, ReportError, Result};
use crate::report::namespaces::NamespaceTable;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{NamedNode, Term};
use std::collections::{HashMap, HashSet};
use std::io::Read;

/// One (subject, predicate, object) statement of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: Term,
    pub predicate: NamedNode,
    pub object: Term,
}

#[derive(Debug, Clone)]
pub struct ValidationGraph {
    statements: Vec<Statement>,
    by_subject: HashMap<Term, Vec<usize>>,
    namespaces: NamespaceTable,
    document_prefixes: Vec<(String, String)>,
}

impl ValidationGraph {
    /// Parses `reader` under the syntax named by `format_label`.
    ///
    /// Every failure of the underlying parser, including undecodable bytes, is
    /// mapped to [`ReportError::Parse`] here and nowhere else.
    pub fn parse<R: Read>(reader: R, format_label: &str) -> Result<Self> {
        let format = resolve_format(format_label)?;
        let mut parser = RdfParser::from_format(format).for_reader(reader);

        let mut statements = Vec::new();
        let mut by_subject: HashMap<Term, Vec<usize>> = HashMap::new();
        for quad in parser.by_ref() {
            let quad = quad.map_err(|e| ReportError::parse(format_label, e))?;
            let subject = Term::from(quad.subject);
            by_subject
                .entry(subject.clone())
                .or_default()
                .push(statements.len());
            statements.push(Statement {
                subject,
                predicate: quad.predicate,
                object: quad.object,
            });
        }

        let document_prefixes = parser
            .prefixes()
            .map(|(prefix, namespace)| (prefix.to_string(), namespace.to_string()))
            .collect();

        Ok(Self {
            statements,
            by_subject,
            namespaces: NamespaceTable::new(),
            document_prefixes,
        })
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub(crate) fn namespaces_mut(&mut self) -> &mut NamespaceTable {
        &mut self.namespaces
    }

    /// `@prefix` declarations seen while parsing, in declaration order.
    pub fn document_prefixes(&self) -> &[(String, String)] {
        &self.document_prefixes
    }

    /// First object of `(subject, predicate, ?)` in parse order.
    pub fn value(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.by_subject
            .get(subject)?
            .iter()
            .map(|&idx| &self.statements[idx])
            .find(|st| st.predicate.as_str() == predicate)
            .map(|st| &st.object)
    }

    /// Subjects typed as `class`, each once, in the order their type statement appeared.
    pub fn subjects_of_type(&self, class: &str) -> Vec<&Term> {
        let mut seen = HashSet::new();
        self.statements
            .iter()
            .filter(|st| st.predicate.as_str() == crate::report::vocab::RDF_TYPE)
            .filter(|st| matches!(&st.object, Term::NamedNode(node) if node.as_str() == class))
            .map(|st| &st.subject)
            .filter(|subject| seen.insert(*subject))
            .collect()
    }
}

/// Maps a format label to the parser's format.
///
/// Accepts the common short names, then anything the RDF library recognises
/// as a media type or file extension.
pub fn resolve_format(label: &str) -> Result<RdfFormat> {
    let normalized = label.trim().to_ascii_lowercase();
    let format = match normalized.as_str() {
        "turtle" | "ttl" => Some(RdfFormat::Turtle),
        "nt" | "ntriples" | "n-triples" => Some(RdfFormat::NTriples),
        "n3" => Some(RdfFormat::N3),
        "xml" | "rdfxml" | "rdf/xml" | "pretty-xml" => Some(RdfFormat::RdfXml),
        "trig" => Some(RdfFormat::TriG),
        "nquads" | "nq" | "n-quads" => Some(RdfFormat::NQuads),
        other => RdfFormat::from_media_type(other).or_else(|| RdfFormat::from_extension(other)),
    };
    format.ok_or_else(|| ReportError::parse(label, ParseFailure::UnsupportedFormat(label.to_string())))
}
