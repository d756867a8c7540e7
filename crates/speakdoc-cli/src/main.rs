//! CLI entry point - the composition root.
//!
//! Settings are resolved once, the speech stack is built by bootstrap, and
//! each command is dispatched to its handler.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use speakdoc_cli::{Cli, CliError, Commands, Synthesizer, bootstrap, handlers, load_settings};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command.as_ref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let settings = load_settings(
        cli.config.as_deref(),
        &cli.settings_overrides(),
        cli.voice.as_deref(),
    )?;

    match command {
        Commands::Segment { file, json, .. } => {
            let ctx = bootstrap(settings, &Synthesizer::Paced);
            handlers::segment::execute(&ctx, file, *json).await?;
        }
        Commands::Voices {
            dry_run,
            json,
            program,
        } => {
            let ctx = bootstrap(settings, &Synthesizer::from_flags(*dry_run, program));
            handlers::voices::execute(&ctx, *json).await?;
        }
        Commands::Read {
            file,
            from,
            dry_run,
            program,
            ..
        } => {
            let ctx = bootstrap(settings, &Synthesizer::from_flags(*dry_run, program));
            handlers::read::execute(&ctx, file, *from).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before the filter so RUST_LOG can come from it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
