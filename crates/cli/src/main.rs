//! entigen command line entry point

mod cli;
mod commands;
mod errors;
mod tracing;

use crate::cli::parse;
use crate::commands::Command;
use crate::tracing::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = parse();

    init_tracing(TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        ..TracingConfig::default()
    })?;

    let command: Command = cli.command.into();
    let output = commands::execute(command).await?;
    print_output(&output);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    if !output.is_empty() {
        println!("{output}");
    }
}
