//! openai-query — send a prompt and MCP tool list to a chat completions API
//!
//! Usage:
//!   openai-query <content_file> <mcp_tools_file> <api_key>

use std::process::ExitCode;

use anyhow::Context;
use openai_query::config::{CONFIG_PATH_ENV, ENV_OVERRIDES};
use openai_query::render::render;
use openai_query::{QueryArgs, QueryConfig, QuerySession};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() == 1 {
        match args[0].as_str() {
            "help" | "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            "version" | "--version" | "-V" => {
                println!("openai-query {}", env!("CARGO_PKG_VERSION"));
                return ExitCode::SUCCESS;
            }
            _ => {}
        }
    }

    let Some(query) = QueryArgs::from_positional(&args) else {
        print_usage();
        return ExitCode::FAILURE;
    };

    match run(&query).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the round trip produced a successful outcome.
async fn run(query: &QueryArgs) -> anyhow::Result<bool> {
    let config = QueryConfig::load().context("loading configuration")?;
    let pacer = config.pacing.into_pacer();
    let session = QuerySession::new(&config, config.transport());

    let result = session.run(query).await?;

    let mut stdout = std::io::stdout();
    render(&result.events, &mut stdout, pacer.as_ref())
        .await
        .context("writing output")?;

    if let Err(failure) = &result.outcome {
        tracing::debug!(kind = %failure.kind, detail = %failure.detail, "query failed");
    }
    Ok(result.is_ok())
}

fn init_tracing() {
    // Logs go to stderr; stdout carries only the rendered answer.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_usage() {
    println!(
        r#"Usage: openai-query <content_file> <mcp_tools_file> <api_key>

ARGS:
    <content_file>      File with the prompt text (missing file = empty prompt)
    <mcp_tools_file>    JSON array of {{"name", "description"}} tool descriptors
    <api_key>           API key sent as a bearer token

ENVIRONMENT:"#
    );
    println!("    {:<27} YAML config file", CONFIG_PATH_ENV);
    for (name, description) in ENV_OVERRIDES {
        println!("    {name:<27} {description}");
    }
    println!("    {:<27} Log filter (logs go to stderr)", "RUST_LOG");
}
