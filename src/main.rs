use tanacal::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting tanacal");

    // Load configuration
    let config = startup::load_config()?;

    // Serve until Ctrl-C
    startup::start_server(config).await
}
