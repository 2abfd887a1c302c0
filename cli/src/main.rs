mod cli;
mod commands;
mod output;
mod timing;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::commands::batch::BatchArgs;
use crate::commands::place::PlaceArgs;
use crate::commands::{generate_completions, run_batch, run_place};
use crate::output::Output;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing with timing support
    timing::init_tracing(cli.verbose, cli.timing);

    let output = Output::new();
    match run(cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            output.error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, output: &Output) -> Result<()> {
    let qr = cli.qr.settings();
    match cli.command {
        Commands::Place {
            source,
            rect,
            output_dir,
            links_file,
            links,
        } => run_place(
            PlaceArgs {
                source,
                rect,
                output_dir,
                links_file,
                links,
            },
            qr,
            output,
        ),
        Commands::Batch {
            template,
            roster,
            rect,
            output: path,
        } => run_batch(
            BatchArgs {
                template,
                roster,
                rect,
                output: path,
            },
            qr,
            output,
        ),
        Commands::Completions { shell } => generate_completions(shell),
    }
}
