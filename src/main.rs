use clap::Parser;
use trip_insights::cli::{run, Cli};
use trip_insights::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
