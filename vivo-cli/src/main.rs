mod cli;
mod commands;
mod config;
mod error;
mod output;

use crate::{
    cli::Args,
    commands::{Action, CommandExecutor},
    config::AppConfig,
    error::Result,
};
use clap::Parser;
#[cfg(feature = "colored-output")]
use colored::*;
use std::process;
use tracing::{Level, debug};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let quiet = args.quiet;
    let mut colored = !args.clean;

    if let Err(e) = run(args, &mut colored).await {
        debug!(error = ?e, "Application error");
        if !quiet {
            #[cfg(feature = "colored-output")]
            {
                if colored {
                    eprintln!("{}", e.to_string().red().bold());
                } else {
                    eprintln!("{e}");
                }
            }
            #[cfg(not(feature = "colored-output"))]
            {
                let _ = colored;
                eprintln!("{e}");
            }
        }
        process::exit(1);
    }
}

/// `colored` is updated from the merged configuration once it is loaded.
async fn run(args: Args, colored: &mut bool) -> Result<()> {
    init_logging(args.verbose, args.quiet)?;

    let config = AppConfig::load(args.config.as_deref())?.with_args(&args);
    *colored = config.colored;

    if args.show_config {
        println!("{}", config.show()?);
        return Ok(());
    }

    let action = Action {
        info: args.info,
        source: args.source,
        json: args.json,
        clean: args.clean,
    };

    let executor = CommandExecutor::new(config, args.quiet)?;
    executor.run(&args.urls, action).await
}

fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    let subscriber = tracing_subscriber::registry().with(filter);

    // Keeps an already installed global subscriber.
    let _ = subscriber
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(verbose)
                .with_writer(std::io::stderr),
        )
        .try_init();
    Ok(())
}
