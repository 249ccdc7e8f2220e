//! HTTP server module

mod request_id;
mod routes;
mod state;

pub use request_id::{request_id_middleware, REQUEST_ID_HEADER};
pub use routes::{create_router, FILE_FIELD, UPLOAD_PREVIEW_CHARS};
pub use state::AppState;

use anyhow::Result;

use crate::config::Config;

/// Run the HTTP server until Ctrl-C
pub async fn run_server(config: &Config) -> Result<()> {
    let state = AppState::from_settings(&config.completion)?
        .with_upload_dir(config.server.upload_dir.clone());
    let app = create_router(state, &config.server);

    let host = &config.server.host;
    let port = config.server.port;
    let listener = match tokio::net::TcpListener::bind((host.as_str(), port)).await {
        Ok(l) => l,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            eprintln!("\n\x1b[31mError:\x1b[0m Port {} is already in use.\n", port);
            eprintln!("Try a different port with:");
            eprintln!("  \x1b[36mquizgen serve --port <PORT>\x1b[0m\n");
            eprintln!("Example:");
            eprintln!("  quizgen serve --port {}", port.wrapping_add(1));
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        host = %host,
        port = port,
        model = %config.completion.model,
        max_upload_mb = config.server.max_upload_mb,
        "server listening"
    );

    println!("Server running on http://{}:{}", host, port);
    println!("\nAPI Endpoints:");
    println!("  GET    /health     - Health check");
    println!("  POST   /upload/    - Extract text preview (multipart `file`)");
    println!("  POST   /reviewer/  - Generate a study reviewer");
    println!("  POST   /quiz/      - Generate a structured quiz");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
