use std::{net::SocketAddr, sync::Arc};

use server::{
    api::ApiContext,
    build_router,
    config::load_settings,
    store::ActivityStore,
    AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let api = ApiContext {
        store: ActivityStore::seeded(),
    };
    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "activities server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
