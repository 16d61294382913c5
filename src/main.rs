use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use tomato::cli::args::{Cli, Commands};
use tomato::cli::commands::{self, Context};
use tomato::logging::{self, LogTarget};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::load(cli.config.clone(), cli.output)?;

    let interactive = matches!(cli.command, Commands::Start(_));
    let target = LogTarget::resolve(&ctx.config.logging, &ctx.paths, interactive);
    logging::init(&ctx.config.logging, &target)?;

    let output = match &cli.command {
        Commands::Start(args) => commands::start(&ctx, args).await?,
        Commands::Today => commands::today(&ctx).await?,
        Commands::History { limit } => commands::history(&ctx, *limit).await?,
        Commands::Config(args) => commands::config(&ctx, &args.command)?,
        Commands::Completions { shell } => commands::completions(*shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
