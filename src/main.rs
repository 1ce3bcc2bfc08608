use clap::Parser;
use mimalloc::MiMalloc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use zomato_insights::{Store, cli::Cli, config::Config};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(url) = cli.database.clone() {
        cfg.database_url = url;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(database_url = %cfg.database_url, loglevel = %cfg.loglevel);

    let store = Store::open(&cfg.database_url).await.inspect_err(|e| {
        error!(error = %e, "startup failed");
    })?;

    match zomato_insights::cli::run(&store, cli.command).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            error!(kind = ?e.kind(), error = %e, "command failed");
            Err(e.into())
        }
    }
}
