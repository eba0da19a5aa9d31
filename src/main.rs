use baasix_mcp::mcp::server::McpServer;

#[tokio::main]
async fn main() {
    // Configuration problems are unrecoverable: refuse to start.
    let server = match McpServer::new() {
        Ok(server) => server,
        Err(err) => {
            eprintln!("baasix-mcp: {}", err);
            std::process::exit(2);
        }
    };
    if let Err(err) = server.run_stdio().await {
        eprintln!("baasix-mcp: {}", err);
        std::process::exit(1);
    }
}
