use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_FORMAT: &str = "turtle";
const STDIN_INPUT: &str = "-";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Where the report document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportInput {
    Stdin,
    File(PathBuf),
}

impl std::fmt::Display for ReportInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportInput::Stdin => write!(f, "<stdin>"),
            ReportInput::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub input: ReportInput,
    pub format: String,
    pub output: OutputFormat,
    pub prefixes: Vec<(String, String)>,
    pub document_prefixes: bool,
}

impl ReportConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            report,
            config,
            format: cli_format,
            output: cli_output,
            prefixes: cli_prefixes,
            no_document_prefixes: cli_no_document_prefixes,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            format: file_format,
            output: file_output,
            prefixes: file_prefixes,
            document_prefixes: file_document_prefixes,
        } = file_config;

        let input = if report.as_os_str() == STDIN_INPUT {
            ReportInput::Stdin
        } else {
            ReportInput::File(report)
        };

        let format = cli_format
            .or(file_format)
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string())
            .trim()
            .to_string();

        let output = cli_output.or(file_output).unwrap_or_default();

        // File bindings first so that a CLI binding of the same prefix replaces it.
        let mut prefixes = Vec::new();
        for binding in file_prefixes
            .unwrap_or_default()
            .iter()
            .chain(cli_prefixes.unwrap_or_default().iter())
        {
            let (prefix, namespace) = parse_prefix_binding(binding)?;
            prefixes.retain(|(existing, _): &(String, String)| *existing != prefix);
            prefixes.push((prefix, namespace));
        }

        let document_prefixes = !cli_no_document_prefixes && file_document_prefixes.unwrap_or(true);

        Ok(Self {
            input,
            format,
            output,
            prefixes,
            document_prefixes,
        })
    }

    /// Checks the configuration before any report is read.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.format.is_empty(), "format label must not be empty");
        crate::report::resolve_format(&self.format)
            .with_context(|| format!("invalid format label '{}'", self.format))?;

        if let ReportInput::File(path) = &self.input {
            anyhow::ensure!(path.exists(), "report file {:?} does not exist", path);
            anyhow::ensure!(path.is_file(), "report path {:?} is not a file", path);
        }

        for (prefix, namespace) in &self.prefixes {
            anyhow::ensure!(
                !namespace.is_empty(),
                "prefix '{}' is bound to an empty namespace",
                prefix
            );
        }

        tracing::debug!(
            input = %self.input,
            format = %self.format,
            output = %self.output,
            prefixes = self.prefixes.len(),
            "configuration validated"
        );
        Ok(())
    }
}

/// Splits a `PREFIX=NAMESPACE` binding.
pub fn parse_prefix_binding(binding: &str) -> Result<(String, String)> {
    let (prefix, namespace) = binding
        .split_once('=')
        .with_context(|| format!("prefix binding '{binding}' must look like PREFIX=NAMESPACE"))?;
    let prefix = prefix.trim();
    let namespace = namespace.trim();
    anyhow::ensure!(
        prefix
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.')),
        "invalid prefix name '{prefix}'"
    );
    anyhow::ensure!(
        !namespace.is_empty(),
        "prefix '{prefix}' is bound to an empty namespace"
    );
    Ok((prefix.to_string(), namespace.to_string()))
}

#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "shacl-report",
    about = "Group SHACL validation results by focus node",
    version
)]
pub struct CliArgs {
    #[arg(value_name = "REPORT", help = "Validation report to read, or '-' for stdin")]
    pub report: PathBuf,

    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "SHACL_REPORT_FORMAT",
        value_name = "LABEL",
        help = "RDF syntax of the report (turtle, nt, xml, trig, ...)"
    )]
    pub format: Option<String>,

    #[arg(
        long,
        env = "SHACL_REPORT_OUTPUT",
        value_enum,
        value_name = "OUTPUT",
        help = "Output format (text or json)"
    )]
    pub output: Option<OutputFormat>,

    #[arg(
        long = "prefix",
        env = "SHACL_REPORT_PREFIXES",
        value_name = "PREFIX=NAMESPACE",
        value_delimiter = ',',
        help = "Extra prefix bindings for compact names"
    )]
    pub prefixes: Option<Vec<String>>,

    #[arg(
        long,
        env = "SHACL_REPORT_NO_DOCUMENT_PREFIXES",
        help = "Ignore the @prefix declarations of the report when compacting names"
    )]
    pub no_document_prefixes: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    format: Option<String>,
    output: Option<OutputFormat>,
    prefixes: Option<Vec<String>>,
    document_prefixes: Option<bool>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
