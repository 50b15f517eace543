mod event;
mod llm;
mod palette;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Non-fatal when unconfigured: the relay runs and AI prompts get the
    // fallback reply.
    let responder = services::ai::AiResponder::from_env();

    let state = state::AppState::new(Arc::new(responder));

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "relaychat listening");
    axum::serve(listener, app).await.expect("server failed");
}
