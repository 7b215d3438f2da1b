//! Text and JSON rendering of grouped diagnostics.

use crate::config::OutputFormat;
use crate::report::{GroupedErrors, ReportSummary};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a ReportSummary,
    errors: &'a GroupedErrors,
}

pub fn write_report<W: Write>(
    out: &mut W,
    output: OutputFormat,
    errors: &GroupedErrors,
    summary: &ReportSummary,
) -> Result<()> {
    match output {
        OutputFormat::Text => write_text(out, errors, summary),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &JsonReport { summary, errors })
                .context("Failed to serialize grouped errors")?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn write_text<W: Write>(out: &mut W, errors: &GroupedErrors, summary: &ReportSummary) -> Result<()> {
    for (node, lines) in errors.iter() {
        writeln!(out, "{node}")?;
        for line in lines {
            writeln!(out, "  {line}")?;
        }
    }

    let conforms = match summary.conforms {
        Some(true) => "conforms",
        Some(false) => "does not conform",
        None => "conformance not declared",
    };
    writeln!(
        out,
        "{} results in {} groups ({} violations, {} warnings, {} infos); {conforms}",
        summary.results,
        errors.len(),
        summary.violations,
        summary.warnings,
        summary.infos,
    )?;
    Ok(())
}
