//! Command dispatch

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::Destination;
use crate::cli::args::Cli;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if cli.init_config {
        return write_stdout(Settings::template().as_bytes());
    }
    if let Some(shell) = cli.completions {
        print_completions(shell);
        return Ok(());
    }

    if cli.show_config {
        let settings = Settings::load(cli.config.as_deref())?;
        return write_stdout(settings.to_yaml()?.as_bytes());
    }

    // usage errors are reported before any file is touched
    let file = cli
        .file
        .as_deref()
        .ok_or_else(|| CliError::Usage("missing input file".into()))?;
    let destination = destination(cli)?;
    let settings = Settings::load(cli.config.as_deref())?;
    _sort(file, &destination, cli.k8s, settings)
}

/// Map the mutually exclusive output flags to a destination.
pub fn destination(cli: &Cli) -> CliResult<Destination> {
    match (cli.inplace, &cli.output) {
        (true, Some(_)) => Err(CliError::Usage(
            "cannot use both -i and -o flags together".into(),
        )),
        (true, None) => Ok(Destination::InPlace),
        (false, Some(path)) => Ok(Destination::File(path.clone())),
        (false, None) => Ok(Destination::Stdout),
    }
}

#[instrument(skip(settings))]
fn _sort(file: &Path, destination: &Destination, k8s: bool, settings: Settings) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let options = container.sort_options(k8s);
    debug!("list sort rules: {:?}", options.list_sort_keys);

    let sorted = container
        .sort_service()
        .sort_file(file, destination, &options)?;

    match destination {
        Destination::Stdout => write_stdout(&sorted)?,
        Destination::InPlace => output::success(&format!("sorted {} in-place", file.display())),
        Destination::File(out) => output::success(&format!(
            "sorted {} -> {}",
            file.display(),
            out.display()
        )),
    }
    Ok(())
}

fn write_stdout(bytes: &[u8]) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(bytes)
        .and_then(|_| stdout.flush())
        .map_err(|e| InfraError::io("write stdout", e))?;
    Ok(())
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
