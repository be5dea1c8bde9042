mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "focuslog=debug"
    } else if quiet {
        "error"
    } else {
        "focuslog=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Cli::parse();
    init_tracing(args.verbose, args.quiet);
    cli::output::set_quiet(args.quiet);

    let result = match &args.command {
        Commands::Init => cli::commands::init::execute(&args.config),
        Commands::Record {
            author,
            message,
            at,
        } => cli::commands::record::execute(
            &args.config,
            &args.dotenv,
            author,
            message,
            at.as_deref(),
        ),
        Commands::Listen => cli::commands::listen::execute(&args.config, &args.dotenv),
        Commands::Summary { period } => cli::commands::summary::execute(&args.config, period),
        Commands::Status => cli::commands::status::execute(&args.config),
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
