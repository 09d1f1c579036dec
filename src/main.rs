use anyhow::Result;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    newsrag::cli::run().await
}
