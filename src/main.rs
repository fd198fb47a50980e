use clap::Parser;
use doxysearch::SymbolServer;
use doxysearch::cli::{Cli, Commands, render};
use rmcp::{ServiceExt, transport::stdio};
use std::io::Write as _;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr to keep stdout clean for results and the MCP protocol
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else if matches!(cli.command, Commands::Serve) {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    doxysearch::tracing::init(level);

    let table = cli.load_table()?;

    if !matches!(cli.command, Commands::Serve) {
        let output = render(&cli.command, &table)?;
        std::io::stdout().lock().write_all(output.as_bytes())?;
        return Ok(());
    }

    tracing::info!(
        "Starting doxysearch MCP server with {} symbols from {}",
        table.len(),
        cli.dir.display()
    );

    let server = SymbolServer::new(Arc::new(table));
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
