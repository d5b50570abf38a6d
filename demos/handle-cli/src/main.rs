//! # Handle CLI
//!
//! Resolve a Cardano handle to the address holding it, or list the handles
//! held by an address.
//!
//! ```text
//! BLOCKFROST_PROJECT_ID=mainnet... handle-cli resolve '$sundae'
//! handle-cli --env preview --backend indexer lookup addr_test1...
//! ```

use anyhow::{Context, Result};
use cardano_handle::http::HttpResolver;
use cardano_handle::indexer::{IndexerClient, IndexerResolver, Settings};
use cardano_handle::{AssetResolver, Environment, HandleClient};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "handle-cli", version, about = "Resolve Cardano handles", long_about = None)]
struct Args {
    /// Network the handles belong to
    #[arg(long, default_value = "mainnet")]
    env: Environment,

    /// Indexer project id; its prefix selects the hosted indexer
    #[arg(long, env = "BLOCKFROST_PROJECT_ID", hide_env_values = true)]
    project_id: String,

    /// Resolver backend
    #[arg(long, value_enum, default_value_t = Backend::Http)]
    backend: Backend,

    /// Self-hosted indexer base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    /// Plain HTTP requests
    Http,
    /// Typed indexer client
    Indexer,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the address holding a handle
    Resolve {
        /// Handle, with or without the leading `$`
        handle: String,
    },
    /// Print the handles held by a stake or payment address
    Lookup {
        /// Stake (`stake...`) or payment (`addr...`) address
        address: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).with_target(false).finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set subscriber")?;

    match args.backend {
        Backend::Http => {
            let mut resolver = HttpResolver::new(args.project_id.as_str())?;
            if let Some(base_url) = &args.base_url {
                resolver = resolver.with_base_url(base_url)?;
            }
            run(HandleClient::new(args.env, resolver), args.command).await
        }
        Backend::Indexer => {
            let mut settings = Settings::new().network(args.env);
            if let Some(base_url) = args.base_url {
                settings = settings.base_url(base_url);
            }
            let client = IndexerClient::new(&args.project_id, settings)?;
            run(HandleClient::new(args.env, IndexerResolver::with_client(client)), args.command)
                .await
        }
    }
}

async fn run<R: AssetResolver>(client: HandleClient<R>, command: Command) -> Result<()> {
    tracing::debug!(env = %client.environment(), "using policy {}", client.policy_id());

    match command {
        Command::Resolve { handle } => {
            let address = client.resolve_address(&handle).await?;
            println!("{address}");
        }
        Command::Lookup { address } => {
            let handles = client.lookup_handles(&address).await?;
            if handles.is_empty() {
                tracing::info!("no handles held by {address}");
            }
            for handle in handles {
                println!("${handle}");
            }
        }
    }
    Ok(())
}
