use anyhow::Result;
use clap::Parser;
use link_shortener::config::{self, StorageBackend};
use link_shortener::server;
use tracing_subscriber::EnvFilter;

/// Short link HTTP service.
#[derive(Parser)]
#[command(name = "link-shortener")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bind address, overrides `LISTEN`
    #[arg(short, long)]
    listen: Option<String>,

    /// Link store, overrides `STORAGE`
    #[arg(short, long, value_enum)]
    storage: Option<StorageBackend>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = config::Config::from_env_with_storage(cli.storage)?;
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }
    config.validate()?;

    init_tracing(&config.log_level, &config.log_format);
    config.print_summary();

    server::run(config).await
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
