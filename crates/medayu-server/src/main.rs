//! Binary entrypoint for the Medayu manager backend.
//!
//! Configuration comes from `MEDAYU_*` environment variables; see
//! [`ServerConfig::from_env`].

use medayu_server::config::ServerConfig;
use medayu_server::router::build_router;
use medayu_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let addr = format!("0.0.0.0:{}", config.port);

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "failed to initialize application state");
            std::process::exit(1);
        }
    };

    let app = build_router(state);

    tracing::info!("medayu server starting on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, addr = %addr, "failed to bind");
            std::process::exit(1);
        }
    };
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "server stopped");
        std::process::exit(1);
    }
}
