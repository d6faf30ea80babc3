#[tokio::main]
async fn main() {
    huddle_observability::init();

    let config = huddle_api::config::AppConfig::from_env();
    let addr = config.bind_addr.clone();
    let app = huddle_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
