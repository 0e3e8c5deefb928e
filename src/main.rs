//! Nutrition Tracker
//!
//! An MCP server for daily nutrition goals and meal logging.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutritrack::build_info;
use nutritrack::config::{AppConfig, DEFAULT_LOG_DIRECTIVE};
use nutritrack::mcp::NutritrackService;
use nutritrack::store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(DEFAULT_LOG_DIRECTIVE.parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = AppConfig::from_env()?;
    let store = store::open_store(&config)?;
    eprintln!("Store backend: {}", store.backend_name());

    // Create the nutritrack service
    let service = NutritrackService::new(&config, store);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
