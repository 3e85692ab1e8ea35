use anyhow::Result;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    nomikai::cli::run().await
}
