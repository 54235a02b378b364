use axum::{Router, routing::get};
use huddle_server::{AppState, ServerConfig, http, ws_handler};
use tower_http::cors::{Any, CorsLayer};
use tracing::{Level, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = ServerConfig::from_env();
    let state = AppState::new();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/rooms/{room_id}", get(http::describe_room))
        .route("/rooms/{room_id}/exists", get(http::room_exists))
        .layer(cors)
        .with_state(state);

    info!("Signaling server listening on http://{}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
