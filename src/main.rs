use std::time::Duration;

use arena_core::ArenaWorld;
use arena_server::config::{parse_cli_args, ServerConfig};
use arena_server::game_loop::run_game_loop;
use arena_server::shutdown::{self, shutdown_channel, ShutdownRx};

#[tokio::main]
async fn main() {
    observability::init_logging();

    let config = parse_cli_args();
    tracing::info!("Arena server starting...");

    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    let config_clone = config.clone();
    let server_future = async move {
        run_arena_server(config_clone, shutdown_rx).await;
    };

    tokio::select! {
        _ = shutdown::wait_for_signal() => {
            tracing::info!("Shutdown signal received, stopping server...");
            shutdown_tx.trigger();
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        _ = server_future => {}
    }

    tracing::info!("Server stopped.");
}

async fn run_arena_server(config: ServerConfig, shutdown_rx: ShutdownRx) {
    let (gateway_tx, gateway_rx) = tokio::sync::mpsc::unbounded_channel();
    let (outbound_tx, outbound_rx) = tokio::sync::mpsc::unbounded_channel();
    let (register_tx, register_rx) = tokio::sync::mpsc::unbounded_channel();
    let (unregister_tx, unregister_rx) = tokio::sync::mpsc::unbounded_channel();

    // Output router
    tokio::spawn(net::output_router::run_output_router(
        outbound_rx,
        register_rx,
        unregister_rx,
    ));

    // Web server with shutdown support
    let ws_addr = config.net.ws_addr.clone();
    let static_dir = {
        let p = std::path::PathBuf::from(&config.net.static_dir);
        if p.is_dir() {
            Some(p)
        } else {
            None
        }
    };
    let max_connections = config.net.max_connections;
    let ws_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        if let Err(e) = net::web_server::run_web_server_with_shutdown(
            ws_addr,
            gateway_tx,
            register_tx,
            unregister_tx,
            static_dir,
            max_connections,
            ws_shutdown.into_inner(),
        )
        .await
        {
            tracing::error!("Web server error: {}", e);
        }
    });

    tracing::info!("Arena server listening on {}", config.net.ws_addr);

    // The game task owns the world; everything else talks to it over channels.
    let world = ArenaWorld::new(config.to_game_settings());
    run_game_loop(
        world,
        config.to_tick_config(),
        gateway_rx,
        outbound_tx,
        shutdown_rx,
    )
    .await;
}
