//! End-to-end tests for loading a configured report and rendering it.

use anyhow::Result;
use shacl_report::{CliArgs, OutputFormat, ReportConfig, run};
use std::io::Write;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("reports")
        .join(name)
}

fn config_for(report: PathBuf, output: OutputFormat) -> Result<ReportConfig> {
    let config = ReportConfig::from_args(CliArgs {
        report,
        output: Some(output),
        ..CliArgs::default()
    })?;
    config.validate()?;
    Ok(config)
}

#[test]
fn test_run_text_output() -> Result<()> {
    let config = config_for(fixture("dataset_report.ttl"), OutputFormat::Text)?;
    let mut out = Vec::new();
    let summary = run(&config, &mut out)?;

    assert_eq!(summary.results, 4);
    let text = String::from_utf8(out)?;
    assert!(text.starts_with("https://example.org/dataset/water-quality\n  [https://example.org/dataset/water-quality]: sh:Violation: "));
    assert!(text.contains("\ncatalog\n  [catalog]: sh:Warning: "));
    assert!(text.trim_end().ends_with(
        "4 results in 3 groups (2 violations, 1 warnings, 1 infos); does not conform"
    ));
    Ok(())
}

#[test]
fn test_run_json_output_with_prefixes() -> Result<()> {
    let config = ReportConfig::from_args(CliArgs {
        report: fixture("dataset_report.ttl"),
        output: Some(OutputFormat::Json),
        prefixes: Some(vec!["terms=http://purl.org/dc/terms/".into()]),
        ..CliArgs::default()
    })?;
    let mut out = Vec::new();
    run(&config, &mut out)?;

    let json: serde_json::Value = serde_json::from_slice(&out)?;
    let groups = json["errors"].as_object().unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(
        groups["https://example.org/distribution/csv"][0],
        "[https://example.org/distribution/csv]: sh:Info: [dcat:byteSize]: 'Byte size looks small' , Value: [42] ()"
    );
    let first = groups["https://example.org/dataset/water-quality"][0].as_str().unwrap();
    assert!(first.contains("[terms:title]"), "{first}");
    assert_eq!(json["summary"]["results"], 4);
    Ok(())
}

#[test]
fn test_run_without_document_prefixes() -> Result<()> {
    let config = ReportConfig::from_args(CliArgs {
        report: fixture("dataset_report.ttl"),
        no_document_prefixes: true,
        ..CliArgs::default()
    })?;
    let mut out = Vec::new();
    run(&config, &mut out)?;

    let text = String::from_utf8(out)?;
    assert!(text.contains("[http://purl.org/dc/terms/title]"), "{text}");
    assert!(text.contains(": sh:Violation: "));
    Ok(())
}

#[test]
fn test_run_reports_parse_failure_with_context() -> Result<()> {
    let config = config_for(fixture("malformed.ttl"), OutputFormat::Text)?;
    let mut out = Vec::new();
    let err = run(&config, &mut out).unwrap_err();

    assert!(err.to_string().contains("failed to load validation report"));
    let parse = err.downcast_ref::<shacl_report::ReportError>().unwrap();
    assert!(parse.is_parse());
    assert!(out.is_empty());
    Ok(())
}

#[test]
fn test_run_with_ntriples_config_file() -> Result<()> {
    let mut report = tempfile::Builder::new().suffix(".nt").tempfile()?;
    writeln!(
        report,
        "_:r <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/ns/shacl#ValidationResult> ."
    )?;
    writeln!(
        report,
        "_:r <http://www.w3.org/ns/shacl#focusNode> <http://example.org/dataset/1> ."
    )?;

    let mut settings = tempfile::Builder::new().suffix(".yml").tempfile()?;
    writeln!(settings, "format: ntriples\noutput: json")?;

    let config = ReportConfig::from_args(CliArgs {
        report: report.path().to_path_buf(),
        config: Some(settings.path().to_path_buf()),
        ..CliArgs::default()
    })?;
    config.validate()?;

    let mut out = Vec::new();
    run(&config, &mut out)?;
    let json: serde_json::Value = serde_json::from_slice(&out)?;
    assert_eq!(
        json["errors"]["http://example.org/dataset/1"][0],
        "[http://example.org/dataset/1]: : []: ''  ()"
    );
    assert_eq!(json["summary"]["unclassified"], 1);
    Ok(())
}
