use gse_terminal::{
    api::{self, AppState},
    core::config::ResearchConfig,
    init,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = ResearchConfig::from_env()?;
    let service = init::initialize_service(&config)?;

    let app = api::build_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
