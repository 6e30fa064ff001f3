//! Configurator CLI - exercise the variant configurator against a storefront backend.
//!
//! Commands:
//! - `configurator resolve` - Resolve a selection to a variant
//! - `configurator add` - Add a variant (or a resolved selection) to the cart
//! - `configurator cart` - Show the cart
//! - `configurator favorite` - Toggle a product favorite

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{AddArgs, CartArgs, FavoriteArgs, ResolveArgs};

/// Configurator CLI - resolve product variants and manage the cart
#[derive(Parser)]
#[command(name = "configurator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = "CONFIGURATOR_BASE_URL")]
    base_url: Option<String>,

    /// Bearer token for cart and favorites requests
    #[arg(long, global = true, env = "CONFIGURATOR_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Human)]
    log_format: LogFormat,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a selection to a variant
    Resolve(ResolveArgs),

    /// Add an item to the cart
    Add(AddArgs),

    /// Show the cart
    Cart(CartArgs),

    /// Toggle a product favorite
    Favorite(FavoriteArgs),
}

fn init_tracing(format: LogFormat, level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Human => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { cli.log_level.as_str() };
    init_tracing(cli.log_format, level);

    let output = output::Output::new(cli.json);

    let ctx = match context::Context::load(
        cli.config.as_deref(),
        cli.base_url.as_deref(),
        cli.token.as_deref(),
        output.clone(),
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, &ctx).await,
        Commands::Add(args) => commands::add::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Favorite(args) => commands::favorite::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
