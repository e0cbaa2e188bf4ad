use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use repath::cli::{commands, output, Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("repath=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            ref path,
            ref out,
            stdout,
        } => {
            let outcome = commands::run_convert(
                path,
                out.as_deref(),
                stdout,
                cli.project.as_deref(),
                cli.ext,
                &cli.include,
                &cli.exclude,
            )?;

            if let Some(ref text) = outcome.rendered {
                print!("{}", text);
            } else {
                println!("{}", output::format_convert_summary(&outcome, &cli.format));
            }

            if outcome.files_failed > 0 {
                std::process::exit(1);
            }
        }

        Commands::Aliases => {
            let entries = commands::run_aliases(".", cli.project.as_deref())?;
            println!("{}", output::format_aliases(&entries, &cli.format));
        }
    }

    Ok(())
}
