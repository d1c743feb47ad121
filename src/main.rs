use std::io;
use std::path::PathBuf;

use clap::Parser;
use nodewallet::{config::AppConfig, repl::Repl, HttpTransport, Wallet};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nodewallet")]
#[command(about = "Interactive wallet for a node's JSON API", version)]
struct Cli {
    /// Node API server, host:port or a full URL
    #[arg(long)]
    server: Option<String>,

    /// Directory holding the key file
    #[arg(long)]
    datadir: Option<PathBuf>,

    /// Extra configuration file layered over config/default and config/local
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level, including request and response bodies
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the prompt
    let default_filter = if cli.verbose { "nodewallet=debug" } else { "nodewallet=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = AppConfig::load_from(cli.config.as_deref())?;
    if let Some(server) = cli.server {
        config.node.server = server;
    }
    if let Some(datadir) = cli.datadir {
        config.wallet.datadir = datadir;
    }
    info!("Starting nodewallet v{}", env!("CARGO_PKG_VERSION"));

    let transport = HttpTransport::new(&config.node)?;
    let wallet = Wallet::open(&config.wallet, transport)?;

    if let Err(e) = wallet.sanity().await {
        error!("Node at {} is not reachable: {}", wallet.node_url(), e);
        return Err(anyhow::anyhow!("sanity check failed against {}", wallet.node_url()));
    }

    let stdin = io::stdin();
    let mut repl = Repl::new(wallet, stdin.lock(), io::stdout());
    repl.welcome()?;
    repl.run().await?;

    Ok(())
}
