pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod report;

pub use config::{CliArgs, OutputFormat, ReportConfig, ReportInput};
pub use error::{ParseFailure, ReportError};
pub use logging::{LogDestination, LogFormat, LoggingConfig, init_logging};
pub use report::{
    GroupedErrors, ReportSummary, ValidationGraph, ValidationReportGrouper, CATALOG_KEY,
};

use anyhow::{Context, Result};
use std::io::Write;

/// Loads the configured report, groups its results and writes them to `out`.
pub fn run<W: Write>(config: &ReportConfig, out: &mut W) -> Result<ReportSummary> {
    let span = tracing::info_span!("group_report", input = %config.input, format = %config.format);
    let _enter = span.enter();

    let mut grouper = match &config.input {
        ReportInput::File(path) => ValidationReportGrouper::from_path(path, &config.format),
        ReportInput::Stdin => ValidationReportGrouper::parse(std::io::stdin().lock(), &config.format),
    }
    .with_context(|| format!("failed to load validation report {}", config.input))?;

    for (prefix, namespace) in &config.prefixes {
        grouper = grouper.with_prefix(prefix, namespace);
    }
    if !config.document_prefixes {
        grouper = grouper.without_document_prefixes();
    }

    let errors = grouper
        .group_errors_by_node()
        .with_context(|| format!("failed to group validation results of {}", config.input))?;
    let summary = grouper.summarize();

    tracing::info!(
        results = summary.results,
        groups = errors.len(),
        violations = summary.violations,
        "validation report grouped"
    );

    render::write_report(out, config.output, &errors, &summary)?;
    Ok(summary)
}
