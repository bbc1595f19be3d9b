use anyhow::Result;
use clap::Parser;
use shelf_sync::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may come from a local .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let result = run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "shelf-sync exited with error");
    }
    result
}
