use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    causal_cli::main_entry().await
}
