use floor_server::{print_banner, Config, Server, ServerState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, logging)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    floor_server::init_logger_with_file(Some(&config.log_level), None);

    print_banner();
    tracing::info!("Comanda Floor Server starting...");

    // 2. Wire storage and engines
    let state = ServerState::initialize(&config)?;

    // 3. Serve HTTP until ctrl-c
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
