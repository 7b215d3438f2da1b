use clap::Parser;
use shacl_report::{CliArgs, LoggingConfig, ReportConfig, init_logging, run};

fn main() -> anyhow::Result<()> {
    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(logging_config)?;

    let cli = CliArgs::parse();
    let config = ReportConfig::from_args(cli)?;

    // Fail fast on bad configuration before reading the report
    config.validate()?;

    let stdout = std::io::stdout();
    run(&config, &mut stdout.lock())?;
    Ok(())
}
