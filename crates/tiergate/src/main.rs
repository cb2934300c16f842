// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiergate - cost-optimizing tier router for LLM requests.
//!
//! This is the binary entry point. `route` shows the full routing math for a
//! single prompt; `config` prints the effective configuration.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tiergate_router::router::DEFAULT_MAX_OUTPUT_TOKENS;

use crate::commands::RouteInput;

/// Tiergate - cost-optimizing tier router for LLM requests.
#[derive(Parser, Debug)]
#[command(name = "tiergate", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Route one prompt and print the decision and scoring breakdown as JSON.
    Route(RouteArgs),
    /// Validate and print the effective configuration.
    Config,
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// User prompt text.
    #[arg(long)]
    prompt: String,

    /// System prompt text.
    #[arg(long)]
    system: Option<String>,

    /// Requested maximum output tokens.
    #[arg(long, default_value_t = DEFAULT_MAX_OUTPUT_TOKENS)]
    max_tokens: u64,

    /// Explicit session id.
    #[arg(long)]
    session: Option<String>,

    /// The request carries tool schemas.
    #[arg(long)]
    tools: bool,

    /// Tool name carried by the request; repeatable.
    #[arg(long = "tool")]
    tool_names: Vec<String>,
}

impl From<RouteArgs> for RouteInput {
    fn from(args: RouteArgs) -> Self {
        Self {
            prompt: args.prompt,
            system: args.system,
            max_tokens: args.max_tokens,
            session: args.session,
            tools: args.tools,
            tool_names: args.tool_names,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => tiergate_config::load_and_validate_path(path),
        None => tiergate_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            tiergate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    logging::init_tracing(&config.logging);

    let result = match cli.command {
        Some(Commands::Route(args)) => commands::route(config, &args.into()).await,
        Some(Commands::Config) => commands::show_config(&config),
        None => Ok("tiergate: use --help for available commands".to_string()),
    };

    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("tiergate: {e}");
            std::process::exit(1);
        }
    }
}
