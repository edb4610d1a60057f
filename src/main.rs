//! ens-context: MCP server for ENS root-context lookups.
//!
//! Usage:
//!   ens-context --mcp                      # Start MCP server (stdin/stdout)
//!   ens-context resolve <id>               # One-shot lookup
//!   ens-context name <id>                  # Show the ENS name offline

use clap::{Parser, Subcommand};
use ens_context::config::{RpcConfig, RPC_URL_ENV};
use ens_context::server::EnsContextServer;
use ens_context::services::{ens, ContentFetcher, EnsClient};
use ens_context::session::Session;
use ens_context::types::Address;
use ens_context::{fmt, identifier, tools};
use rmcp::ServiceExt;
use std::io::{IsTerminal, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ens-context")]
#[command(about = "MCP server that resolves identifiers to ENS root-context records")]
#[command(version)]
struct Cli {
    /// Run as MCP server (stdin/stdout JSON-RPC)
    #[arg(long)]
    mcp: bool,

    /// Ethereum JSON-RPC endpoint
    #[arg(long, env = RPC_URL_ENV, hide_env_values = true)]
    rpc_url: Option<String>,

    /// ENS registry address (default: mainnet registry)
    #[arg(long, env = "ENS_REGISTRY")]
    registry: Option<Address>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the root-context record for an identifier
    Resolve {
        /// Identifier, e.g. id:core.subname
        id: String,

        /// First line to show (0-indexed)
        #[arg(short, long, default_value = "0")]
        start_line: usize,

        /// Include an execution suggestion
        #[arg(short = 'x', long)]
        exec: bool,

        /// Namespace for shorthand identifiers, e.g. id:core
        #[arg(short, long)]
        namespace: Option<String>,

        /// Print JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Show the ENS name and namehash for an identifier without network access
    Name {
        /// Identifier, e.g. id:core.subname
        id: String,

        /// Namespace for shorthand identifiers, e.g. id:core
        #[arg(short, long)]
        namespace: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // CRITICAL: Log to stderr only (stdout is JSON-RPC for MCP)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ens_context=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = RpcConfig::new(cli.rpc_url, cli.registry);
    let color = !cli.no_color && std::io::stdout().is_terminal();

    if cli.mcp {
        run_mcp_server(&config).await
    } else if let Some(cmd) = cli.command {
        run_cli(&config, cmd, color).await
    } else {
        // Default: show help
        eprintln!("Use --mcp to start MCP server, or a subcommand for CLI mode.");
        eprintln!("Run with --help for more information.");
        std::process::exit(1);
    }
}

async fn run_mcp_server(config: &RpcConfig) -> anyhow::Result<()> {
    tracing::info!("Starting MCP server");

    let server = EnsContextServer::new(config);

    // Run the MCP server on stdin/stdout
    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}

async fn run_cli(config: &RpcConfig, cmd: Commands, color: bool) -> anyhow::Result<()> {
    let session = Session::new();
    let mut stdout = std::io::stdout().lock();

    match cmd {
        Commands::Resolve {
            id,
            start_line,
            exec,
            namespace,
            json,
        } => {
            if let Some(ns) = namespace {
                session.set_namespace(&ns)?;
            }
            // Unconfigured endpoints are reported by the tool itself.
            let fetcher = EnsClient::from_config(config)
                .ok()
                .map(|client| ContentFetcher::new(Arc::new(client)));
            let input = tools::ResolveInput { id, start_line };
            let result = if exec {
                tools::execute_resolve_exec(fetcher.as_ref(), &session, input).await
            } else {
                tools::execute_resolve(fetcher.as_ref(), &session, input).await
            }?;
            if json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&result)?)?;
            } else {
                fmt::fmt_resolve(&mut stdout, &result, color)?;
            }
        }

        Commands::Name { id, namespace } => {
            let namespace = match namespace {
                Some(ns) => Some(session.set_namespace(&ns)?),
                None => None,
            };
            let parsed = identifier::parse(&id, namespace.as_deref())?;
            let normalized = ens::normalize(&parsed.external_name())?;
            fmt::fmt_name(&mut stdout, &parsed, &ens::namehash(&normalized), color)?;
        }
    }

    Ok(())
}
